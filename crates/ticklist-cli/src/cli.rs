use clap::{Parser, Subcommand, ValueEnum};
use ticklist_core::tasks::Filter;

/// CLI surface definition. One subcommand per store operation; no subcommand
/// launches the interactive view.
#[derive(Parser, Debug)]
#[command(
    name = "ticklist",
    about = "Local-first task list for your terminal",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Optional subcommand; defaults to launching the TUI when absent.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Launch the interactive TUI (press q or Esc to exit).
    Tui,
    /// Add a task to the top of the list.
    Add {
        /// Task title; must not be blank.
        title: String,
        /// Optional longer description.
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List tasks, optionally restricted to active or completed ones.
    List {
        #[arg(long, value_enum, default_value = "all")]
        filter: FilterArg,
    },
    /// Flip a task between active and completed.
    Toggle { id: String },
    /// Change a task's title and/or description. An empty --description
    /// removes the description.
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a task.
    Rm { id: String },
    /// Print version and exit.
    Version,
    /// Run a health check against the task slot on disk.
    Health,
    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Create a default config file if one does not exist.
    Init,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterArg {
    All,
    Active,
    Completed,
}

impl From<FilterArg> for Filter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => Filter::All,
            FilterArg::Active => Filter::Active,
            FilterArg::Completed => Filter::Completed,
        }
    }
}
