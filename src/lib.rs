//! taskdeck - Task Tracker Library
//!
//! This library provides the core functionality for the taskdeck CLI,
//! a task tracker backed by a local document store.
//!
//! # Core Concepts
//!
//! - **Document Store**: a file-backed collection of task documents,
//!   opened once and reused for the session
//! - **Repository**: the CRUD operations (list, create, update, edit,
//!   delete) with identifier validation and due-date normalization
//! - **Task List View**: the client-held projection of the store, patched
//!   optimistically after each successful mutation
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `taskdeck.toml`
//! - `error`: Error types and result aliases
//! - `lock`: File locking and atomic writes for the store
//! - `output`: CLI output formatting (human and JSON)
//! - `repo`: Task repository over the document store
//! - `store`: Document store gateway
//! - `sync`: Client-held task list and reconciliation rules
//! - `task`: Task domain model and date normalization
//! - `ui`: Interactive board (ratatui)

pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod output;
pub mod repo;
pub mod store;
pub mod sync;
pub mod task;
pub mod ui;

pub use error::{Error, Result};
