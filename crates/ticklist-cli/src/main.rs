mod cli;
mod config;
mod storage;
mod tasks;
mod tui;

use clap::Parser;
use color_eyre::Result;
use ticklist_core::{storage::SlotStore, store::TodoStore, tasks::Task};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::ConfigCommand;

/// Entry point wiring the CLI to the store and the TUI.
fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = cli::Cli::parse();
    let config = config::load()?;
    match cli.command.unwrap_or(cli::Command::Tui) {
        cli::Command::Tui => {
            let slot = storage::slot_from_config(&config)?;
            let mut store = TodoStore::open(slot);
            tui::launch(&mut store)?
        }
        cli::Command::Add { title, description } => {
            tasks::add(&config, &title, description.as_deref())?
        }
        cli::Command::List { filter } => tasks::list(&config, filter.into())?,
        cli::Command::Toggle { id } => tasks::toggle(&config, &id)?,
        cli::Command::Edit {
            id,
            title,
            description,
        } => tasks::edit(&config, &id, title.as_deref(), description.as_deref())?,
        cli::Command::Rm { id } => tasks::remove(&config, &id)?,
        cli::Command::Version => print_version(),
        cli::Command::Health => run_health(&config)?,
        cli::Command::Config(ConfigCommand::Init) => init_config(&config)?,
    }

    Ok(())
}

fn init_tracing() {
    // Respect user-provided filters, default to info to avoid noisy stdout.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn print_version() {
    println!("ticklist {}", env!("CARGO_PKG_VERSION"));
}

/// Runs a quick health check of the task slot on disk.
fn run_health(config: &config::Config) -> Result<()> {
    let slot = storage::slot_from_config(config)?;
    let path = slot.path().display().to_string();
    let task_count = run_slot_health(&slot)?;
    println!("Storage: ok ({path}, {task_count} tasks)");
    Ok(())
}

/// Reads the slot without the store's silent recovery, so a corrupt payload
/// is reported here instead of swallowed.
fn run_slot_health<S: SlotStore>(slot: &S) -> Result<usize> {
    let raw = slot
        .load_raw()
        .map_err(|e| color_eyre::eyre::eyre!(e.to_string()))?;
    let tasks: Vec<Task> = match raw {
        Some(raw) => serde_json::from_str(&raw)?,
        None => Vec::new(),
    };
    Ok(tasks.len())
}

fn init_config(config: &config::Config) -> Result<()> {
    let path = config::write_default_if_missing(config)?;
    println!("Config initialized at {}", path.display());
    Ok(())
}
