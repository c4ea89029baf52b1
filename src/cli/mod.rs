//! CLI Module
//!
//! Command-line host for namesync: builds and inspects on-disk projects and
//! triggers sync invocations.

pub mod commands;
pub mod prompt;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ConflictPolicy;

/// Namesync - keep source item and layer names in sync
#[derive(Parser, Debug)]
#[command(name = "namesync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Selection flags shared by `select` and `sync`.
#[derive(clap::Args, Debug, Default)]
pub struct SelectionArgs {
    /// Layer to select, as COMP:INDEX (repeatable)
    #[arg(short, long = "layer", value_name = "COMP:INDEX")]
    pub layers: Vec<String>,

    /// Source item to select, by id or name (repeatable)
    #[arg(short, long = "item", value_name = "ITEM")]
    pub items: Vec<String>,
}

impl SelectionArgs {
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty() && self.items.is_empty()
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new, empty project directory
    #[command(name = "init")]
    Init {
        /// Path for the new project
        path: PathBuf,

        /// Project display name (defaults to the directory name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Add a source item
    #[command(name = "add-item")]
    AddItem {
        /// Path to the project
        path: PathBuf,

        /// Item name
        name: String,
    },

    /// Add an empty composition
    #[command(name = "add-comp")]
    AddComp {
        /// Path to the project
        path: PathBuf,

        /// Composition name
        name: String,
    },

    /// Append a layer to a composition
    #[command(name = "add-layer")]
    AddLayer {
        /// Path to the project
        path: PathBuf,

        /// Composition id or name
        comp: String,

        /// Layer name
        name: String,

        /// Source item id or name; omit for text/shape/camera layers
        #[arg(short, long)]
        source: Option<String>,
    },

    /// Store the selection used by `sync` when no selection flags are given
    #[command(name = "select")]
    Select {
        /// Path to the project
        path: PathBuf,

        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Propagate names for the current selection
    #[command(name = "sync")]
    Sync {
        /// Path to the project
        path: PathBuf,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Composition (id or name) to leave untouched (repeatable)
        #[arg(short, long, value_name = "COMP")]
        exclude: Vec<String>,

        /// Pick compositions interactively
        #[arg(long, conflicts_with = "exclude")]
        interactive: bool,

        /// Conflict policy for layer -> source pushes
        #[arg(long, value_name = "first|last")]
        policy: Option<ConflictPolicy>,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Undo the last sync
    #[command(name = "undo")]
    Undo {
        /// Path to the project
        path: PathBuf,
    },

    /// Redo the last undone sync
    #[command(name = "redo")]
    Redo {
        /// Path to the project
        path: PathBuf,
    },

    /// Show sync history
    #[command(name = "history")]
    History {
        /// Path to the project
        path: PathBuf,
    },

    /// Print current project state
    #[command(name = "print-state")]
    PrintState {
        /// Path to the project
        path: PathBuf,
    },
}
