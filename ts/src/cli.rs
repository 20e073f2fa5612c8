//! CLI argument parsing for the `ts` binary

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ts")]
#[command(author, version, about = "Direct task store access", long_about = None)]
pub struct Cli {
    /// Path to the store file (defaults to the shared concierge store)
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all tasks in insertion order
    List,

    /// Add a pending task
    Add {
        /// Task title
        #[arg(required = true)]
        title: String,

        /// Free-form due note, stored verbatim
        #[arg(short, long)]
        due: Option<String>,
    },

    /// Mark a task completed by exact id
    Complete {
        /// Full task id
        #[arg(required = true)]
        id: String,
    },

    /// Delete a task by exact id
    Delete {
        /// Full task id
        #[arg(required = true)]
        id: String,
    },
}
