use color_eyre::Result;
use ticklist_core::{
    storage::SlotStore,
    store::TodoStore,
    tasks::{Filter, Task},
};
use ticklist_storage::file_slot::FileSlot;
use uuid::Uuid;

use crate::{config::Config, storage};

/// Execute the `add` subcommand. Blank titles are rejected here, at the
/// boundary, before they reach the store.
pub fn add(config: &Config, title: &str, description: Option<&str>) -> Result<()> {
    if title.trim().is_empty() {
        color_eyre::eyre::bail!("a task needs a non-empty title");
    }
    let mut store = open_store(config)?;
    if let Some(id) = store.add(title, description) {
        println!("Created task {id}");
    }
    Ok(())
}

/// Execute the `list` subcommand.
pub fn list(config: &Config, filter: Filter) -> Result<()> {
    let mut store = open_store(config)?;
    store.set_filter(filter);
    for line in render_list(&store) {
        println!("{line}");
    }
    Ok(())
}

/// Execute the `toggle` subcommand.
pub fn toggle(config: &Config, id: &str) -> Result<()> {
    let id = parse_id(id)?;
    let mut store = open_store(config)?;
    store.toggle(id);
    match store.tasks().iter().find(|t| t.id == id) {
        Some(task) if task.completed => println!("Completed: {}", task.title),
        Some(task) => println!("Reopened: {}", task.title),
        None => println!("No task with id {id}"),
    }
    Ok(())
}

/// Execute the `edit` subcommand. An empty `--description` clears the
/// description; the title keeps its old value if the patch is blank.
pub fn edit(config: &Config, id: &str, title: Option<&str>, description: Option<&str>) -> Result<()> {
    let id = parse_id(id)?;
    let mut store = open_store(config)?;
    store.update(id, title, description);
    match store.tasks().iter().find(|t| t.id == id) {
        Some(task) => println!("Updated: {}", task.title),
        None => println!("No task with id {id}"),
    }
    Ok(())
}

/// Execute the `rm` subcommand.
pub fn remove(config: &Config, id: &str) -> Result<()> {
    let id = parse_id(id)?;
    let mut store = open_store(config)?;
    let known = store.tasks().iter().any(|t| t.id == id);
    store.delete(id);
    if known {
        println!("Deleted task {id}");
    } else {
        println!("No task with id {id}");
    }
    Ok(())
}

fn open_store(config: &Config) -> Result<TodoStore<FileSlot>> {
    Ok(TodoStore::open(storage::slot_from_config(config)?))
}

fn parse_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|e| color_eyre::eyre::eyre!("invalid task id `{id}`: {e}"))
}

/// Render the list view: a counts header the way the filter bar shows it,
/// then one entry per visible task, newest first.
fn render_list<S: SlotStore>(store: &TodoStore<S>) -> Vec<String> {
    let counts = store.counts();
    let mut lines = vec![format!(
        "all {} | active {} | completed {}",
        counts.total, counts.active, counts.completed
    )];

    let visible = store.visible();
    if visible.is_empty() {
        if counts.total == 0 {
            lines.push("No tasks yet. Add one with `ticklist add <title>`.".to_string());
        } else {
            lines.push("Nothing matches this filter.".to_string());
        }
        return lines;
    }

    for task in visible {
        lines.push(format!("{} [{}] {}", task.id, status_mark(task), task.title));
        if let Some(desc) = &task.description {
            lines.push(format!("    {desc}"));
        }
    }
    lines
}

fn status_mark(task: &Task) -> &'static str {
    if task.completed {
        "x"
    } else {
        " "
    }
}
