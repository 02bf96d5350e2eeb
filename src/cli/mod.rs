//! Command-line interface for taskdeck
//!
//! This module defines the CLI structure using clap derive macros.
//! Command implementations live in the `tasks` submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;
use crate::repo::TaskRepository;
use crate::store::DocumentStore;

pub mod tasks;

/// taskdeck - Task tracker
///
/// Create, list, edit, complete, and delete tasks backed by a local
/// document store.
#[derive(Parser, Debug)]
#[command(name = "taskdeck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Store directory (defaults to config or the platform data dir)
    #[arg(long, global = true, env = "TASKDECK_STORE")]
    pub store: Option<PathBuf>,

    /// Path to a taskdeck.toml config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new task
    Add {
        /// Task title
        title: String,

        /// Longer description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Due date (2024-01-10, 2024-01-10T14:30, or RFC 3339)
        #[arg(long, required = true)]
        due: String,
    },

    /// List all tasks ordered by due date
    List,

    /// Mark a task as completed
    Done {
        /// Task id
        id: String,
    },

    /// Mark a completed task as pending again
    Reopen {
        /// Task id
        id: String,
    },

    /// Edit a task's title, description, or due date
    Edit {
        /// Task id
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New due date
        #[arg(long)]
        due: Option<String>,
    },

    /// Delete a task
    Rm {
        /// Task id
        id: String,
    },

    /// Open the interactive board
    Board,
}

impl Cli {
    /// Build the repository from flags + config and dispatch the subcommand.
    pub fn run(self) -> Result<()> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => {
                let cwd = std::env::current_dir()?;
                Config::load_from_dir(&cwd)
            }
        };
        if let Some(store) = &self.store {
            config.store.path = Some(store.clone());
        }

        let store = DocumentStore::open(&config.store)?;
        let repo = TaskRepository::new(store);

        let output = crate::output::OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::Add {
                title,
                description,
                due,
            } => tasks::run_add(
                &repo,
                tasks::AddOptions {
                    title,
                    description,
                    due,
                },
                output,
            ),
            Commands::List => tasks::run_list(&repo, output),
            Commands::Done { id } => tasks::run_set_completed(&repo, &id, true, output),
            Commands::Reopen { id } => tasks::run_set_completed(&repo, &id, false, output),
            Commands::Edit {
                id,
                title,
                description,
                due,
            } => tasks::run_edit(
                &repo,
                &id,
                tasks::EditOptions {
                    title,
                    description,
                    due,
                },
                output,
            ),
            Commands::Rm { id } => tasks::run_delete(&repo, &id, output),
            Commands::Board => crate::ui::board::run(repo),
        }
    }
}
