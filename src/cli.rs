//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::DEFAULT_API_URL;
use crate::ports::remote::{ListQuery, SortKey, StatusFilter};
use crate::task::TaskId;

/// Top-level CLI parser for `tickit`.
#[derive(Debug, Parser)]
#[command(name = "tickit", version, about = "Manage a remote to-do list")]
pub struct Cli {
    /// Root URL of the to-do API.
    #[arg(long, global = true, env = "TICKIT_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List tasks.
    List {
        /// Which tasks to show.
        #[arg(long, value_enum, default_value_t = StatusArg::All)]
        status: StatusArg,
        /// Sort order.
        #[arg(long, value_enum, default_value_t = SortArg::Id)]
        sort: SortArg,
    },
    /// Add a task.
    Add {
        /// Task text.
        text: String,
    },
    /// Replace a task's text.
    Edit {
        /// Task id.
        id: TaskId,
        /// New text.
        text: String,
    },
    /// Flip a task between completed and pending.
    Toggle {
        /// Task id.
        id: TaskId,
    },
    /// Delete a task.
    Delete {
        /// Task id.
        id: TaskId,
    },
    /// Show completion statistics.
    Stats,
    /// Write all tasks to a JSON file.
    Export {
        /// Output file. Defaults to `todo-list-YYYY-MM-DD.json`.
        path: Option<PathBuf>,
    },
    /// Replace all tasks on the server with the contents of a JSON file.
    Import {
        /// Input file.
        path: PathBuf,
    },
    /// Keep refreshing and print changes made elsewhere.
    Watch {
        /// Refresh period in milliseconds.
        #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
        interval_ms: u64,
        /// Stop after this many refreshes.
        #[arg(long)]
        ticks: Option<u64>,
    },
}

/// `--status` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// Every task.
    All,
    /// Completed tasks.
    Completed,
    /// Pending tasks.
    Pending,
}

/// `--sort` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    /// By id.
    Id,
    /// By text.
    Text,
    /// Completed first.
    Status,
}

/// Builds the list query for `list` flags.
#[must_use]
pub fn list_query(status: StatusArg, sort: SortArg) -> ListQuery {
    let status = match status {
        StatusArg::All => StatusFilter::All,
        StatusArg::Completed => StatusFilter::Completed,
        StatusArg::Pending => StatusFilter::Pending,
    };
    let sort = match sort {
        SortArg::Id => SortKey::Id,
        SortArg::Text => SortKey::Text,
        SortArg::Status => SortKey::Status,
    };
    ListQuery { status, sort }
}
