//! Interactive terminal UI.

pub mod board;
