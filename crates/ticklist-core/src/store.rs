use tracing::{instrument, warn};
use uuid::Uuid;

use crate::{
    storage::SlotStore,
    tasks::{Counts, Filter, Task},
};

/// The one state-management module: owns the ordered task collection, the
/// session filter, and the single in-progress-edit marker. Every mutation
/// writes the full collection back through the slot before returning; a
/// failed write is logged and otherwise ignored, it never rolls back the
/// in-memory change.
///
/// Construct one instance at startup and pass it by reference to whatever
/// consumes it. Not meant for concurrent mutation; callers wanting shared
/// access must wrap the whole store in a single lock so mutate-then-persist
/// stays one critical section.
pub struct TodoStore<S: SlotStore> {
    slot: S,
    tasks: Vec<Task>,
    filter: Filter,
    editing: Option<Uuid>,
}

impl<S: SlotStore> TodoStore<S> {
    /// Open the store over a slot. An absent, unreadable, or unparsable slot
    /// falls back to an empty collection; recovery is silent apart from a
    /// log line. The filter and edit marker always start at their defaults.
    pub fn open(slot: S) -> Self {
        let tasks = match slot.load_raw() {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(tasks) => tasks,
                Err(err) => {
                    warn!("discarding unparsable task slot: {err}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!("task slot unreadable, starting empty: {err}");
                Vec::new()
            }
        };

        Self {
            slot,
            tasks,
            filter: Filter::default(),
            editing: None,
        }
    }

    /// Add a task at the front of the collection (newest first) and return
    /// its id. A title that is empty after trimming is rejected and leaves
    /// the collection unchanged.
    #[instrument(skip(self, description))]
    pub fn add(&mut self, title: &str, description: Option<&str>) -> Option<Uuid> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        let task = Task::new(title.to_string(), description);
        let id = task.id;
        self.tasks.insert(0, task);
        self.persist();
        Some(id)
    }

    /// Flip the completion state of the task with this id. Unknown ids are a
    /// silent no-op.
    #[instrument(skip(self))]
    pub fn toggle(&mut self, id: Uuid) {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return;
        };
        task.completed = !task.completed;
        self.persist();
    }

    /// Partial update: `None` leaves a field unchanged; a description patch
    /// that is empty after trimming clears the description. A title patch
    /// that trims to empty is ignored so no stored title ever goes blank.
    /// Closes the edit session when it points at this task. Unknown ids are
    /// a silent no-op.
    #[instrument(skip(self, title, description))]
    pub fn update(&mut self, id: Uuid, title: Option<&str>, description: Option<&str>) {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return;
        };

        if let Some(title) = title {
            let title = title.trim();
            if !title.is_empty() {
                task.title = title.to_string();
            }
        }
        if let Some(description) = description {
            let description = description.trim();
            task.description = if description.is_empty() {
                None
            } else {
                Some(description.to_string())
            };
        }

        if self.editing == Some(id) {
            self.editing = None;
        }
        self.persist();
    }

    /// Remove the task with this id, releasing the edit marker if it pointed
    /// at it. Unknown ids are a silent no-op.
    #[instrument(skip(self))]
    pub fn delete(&mut self, id: Uuid) {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return;
        }
        if self.editing == Some(id) {
            self.editing = None;
        }
        self.persist();
    }

    /// Set the session filter. Not persisted; a fresh store always opens on
    /// `Filter::All`.
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Mark a task as open for in-place editing. At most one at a time; the
    /// id is not validated here, the marker is reconciled by `update` and
    /// `delete` instead.
    pub fn start_editing(&mut self, id: Uuid) {
        self.editing = Some(id);
    }

    pub fn cancel_editing(&mut self) {
        self.editing = None;
    }

    pub fn editing(&self) -> Option<Uuid> {
        self.editing
    }

    /// The collection projected through the session filter, order preserved.
    /// Recomputed from the authoritative sequence on every call.
    pub fn visible(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| self.filter.keeps(task))
            .collect()
    }

    /// Per-filter totals over the full collection, independent of the
    /// session filter.
    pub fn counts(&self) -> Counts {
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        Counts {
            total: self.tasks.len(),
            active: self.tasks.len() - completed,
            completed,
        }
    }

    /// The full collection, unfiltered.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    fn persist(&self) {
        let payload = match serde_json::to_string(&self.tasks) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("failed to serialize tasks: {err}");
                return;
            }
        };
        if let Err(err) = self.slot.save_raw(&payload) {
            // Best effort: the in-memory mutation stands either way.
            warn!("failed to persist tasks: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::storage::{InMemorySlot, SlotError, SlotStore};

    use super::*;

    #[test]
    fn add_prepends_and_counts() {
        let mut store = TodoStore::open(InMemorySlot::new());
        store.add("Buy milk", None).expect("add");
        let newest = store.add("Walk the dog", None).expect("add");

        let counts = store.counts();
        assert_eq!(counts.total, 2);
        assert_eq!(counts.active, 2);
        assert_eq!(counts.completed, 0);

        let visible = store.visible();
        assert_eq!(visible[0].id, newest);
        assert_eq!(visible[0].title, "Walk the dog");
        assert_eq!(visible[1].title, "Buy milk");
    }

    #[test]
    fn add_trims_title_and_description() {
        let mut store = TodoStore::open(InMemorySlot::new());
        store.add("  Buy milk  ", Some("  two liters  ")).expect("add");
        let tasks = store.tasks();
        assert_eq!(tasks[0].title, "Buy milk");
        assert_eq!(tasks[0].description.as_deref(), Some("two liters"));
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut store = TodoStore::open(InMemorySlot::new());
        assert_eq!(store.add("", None), None);
        assert_eq!(store.add("   \t ", None), None);
        assert_eq!(store.counts().total, 0);
    }

    #[test]
    fn blank_description_means_no_description() {
        let mut store = TodoStore::open(InMemorySlot::new());
        store.add("Buy milk", Some("   ")).expect("add");
        assert_eq!(store.tasks()[0].description, None);
    }

    #[test]
    fn ids_stay_unique_across_operations() {
        let mut store = TodoStore::open(InMemorySlot::new());
        let mut ids = Vec::new();
        for i in 0..20 {
            ids.push(store.add(&format!("task {i}"), None).expect("add"));
        }
        store.delete(ids[3]);
        store.toggle(ids[7]);
        store.add("one more", None).expect("add");

        let seen: HashSet<_> = store.tasks().iter().map(|t| t.id).collect();
        assert_eq!(seen.len(), store.tasks().len());
    }

    #[test]
    fn toggle_twice_restores_state() {
        let mut store = TodoStore::open(InMemorySlot::new());
        let id = store.add("Ship", None).expect("add");

        store.toggle(id);
        assert!(store.tasks()[0].completed);
        store.toggle(id);
        assert!(!store.tasks()[0].completed);
    }

    #[test]
    fn mutations_on_unknown_ids_are_no_ops() {
        let mut store = TodoStore::open(InMemorySlot::new());
        let id = store.add("Ship", None).expect("add");
        store.delete(id);

        store.toggle(id);
        store.update(id, Some("renamed"), None);
        store.delete(id);
        assert_eq!(store.counts().total, 0);
    }

    #[test]
    fn filters_project_by_completion() {
        let mut store = TodoStore::open(InMemorySlot::new());
        let done = store.add("done", None).expect("add");
        store.add("open", None).expect("add");
        store.toggle(done);

        store.set_filter(Filter::Active);
        assert!(store.visible().iter().all(|t| !t.completed));
        assert_eq!(store.visible().len(), 1);

        store.set_filter(Filter::Completed);
        assert!(store.visible().iter().all(|t| t.completed));
        assert_eq!(store.visible().len(), 1);

        store.set_filter(Filter::All);
        assert_eq!(store.visible().len(), 2);
    }

    #[test]
    fn counts_ignore_the_session_filter() {
        let mut store = TodoStore::open(InMemorySlot::new());
        let done = store.add("done", None).expect("add");
        store.add("open", None).expect("add");
        store.toggle(done);

        store.set_filter(Filter::Completed);
        let counts = store.counts();
        assert_eq!(counts.total, 2);
        assert_eq!(counts.active, 1);
        assert_eq!(counts.completed, 1);
    }

    #[test]
    fn update_applies_only_provided_fields() {
        let mut store = TodoStore::open(InMemorySlot::new());
        let id = store.add("Buy milk", Some("two liters")).expect("add");

        store.update(id, Some("Buy oat milk"), None);
        assert_eq!(store.tasks()[0].title, "Buy oat milk");
        assert_eq!(store.tasks()[0].description.as_deref(), Some("two liters"));

        store.update(id, None, Some("one liter"));
        assert_eq!(store.tasks()[0].title, "Buy oat milk");
        assert_eq!(store.tasks()[0].description.as_deref(), Some("one liter"));
    }

    #[test]
    fn empty_description_patch_clears_it() {
        let mut store = TodoStore::open(InMemorySlot::new());
        let id = store.add("Buy milk", Some("two liters")).expect("add");
        store.update(id, None, Some(""));
        assert_eq!(store.tasks()[0].description, None);
    }

    #[test]
    fn blank_title_patch_keeps_existing_title() {
        let mut store = TodoStore::open(InMemorySlot::new());
        let id = store.add("Buy milk", None).expect("add");
        store.update(id, Some("   "), None);
        assert_eq!(store.tasks()[0].title, "Buy milk");
    }

    #[test]
    fn update_closes_a_matching_edit_session() {
        let mut store = TodoStore::open(InMemorySlot::new());
        let id = store.add("Buy milk", None).expect("add");

        store.start_editing(id);
        store.update(id, Some("Buy oat milk"), None);
        assert_eq!(store.editing(), None);
    }

    #[test]
    fn delete_releases_a_matching_edit_marker() {
        let mut store = TodoStore::open(InMemorySlot::new());
        let id = store.add("Buy milk", None).expect("add");
        let other = store.add("Walk the dog", None).expect("add");

        store.start_editing(id);
        store.delete(other);
        assert_eq!(store.editing(), Some(id));

        store.delete(id);
        assert_eq!(store.editing(), None);
    }

    #[test]
    fn cancel_editing_clears_the_marker() {
        let mut store = TodoStore::open(InMemorySlot::new());
        let id = store.add("Buy milk", None).expect("add");
        store.start_editing(id);
        store.cancel_editing();
        assert_eq!(store.editing(), None);
    }

    #[test]
    fn reload_round_trips_tasks_and_resets_session_state() {
        let slot = InMemorySlot::new();
        let mut store = TodoStore::open(slot.clone());
        let done = store.add("done", Some("with notes")).expect("add");
        store.add("open", None).expect("add");
        store.toggle(done);
        store.set_filter(Filter::Completed);
        store.start_editing(done);

        let reloaded = TodoStore::open(slot);
        assert_eq!(reloaded.tasks(), store.tasks());
        assert_eq!(reloaded.filter(), Filter::All);
        assert_eq!(reloaded.editing(), None);
    }

    #[test]
    fn unparsable_slot_opens_empty() {
        let slot = InMemorySlot::new();
        slot.save_raw("not json at all {{{").expect("seed");

        let store = TodoStore::open(slot);
        assert_eq!(store.counts().total, 0);
        assert_eq!(store.filter(), Filter::All);
    }

    #[test]
    fn persisted_payload_uses_the_legacy_field_layout() {
        let slot = InMemorySlot::new();
        let mut store = TodoStore::open(slot.clone());
        store.add("Buy milk", None).expect("add");

        let raw = slot.load_raw().expect("load").expect("payload");
        assert!(raw.contains("\"createdAt\""));
        assert!(raw.contains("\"completed\":false"));
        assert!(!raw.contains("description"));
        assert!(!raw.contains("filter"));
        assert!(!raw.contains("editing"));
    }

    #[test]
    fn a_failing_slot_does_not_block_mutations() {
        struct BrokenSlot;
        impl SlotStore for BrokenSlot {
            fn load_raw(&self) -> Result<Option<String>, SlotError> {
                Err(SlotError::Storage {
                    reason: "disk on fire".into(),
                })
            }
            fn save_raw(&self, _payload: &str) -> Result<(), SlotError> {
                Err(SlotError::Storage {
                    reason: "disk on fire".into(),
                })
            }
        }

        let mut store = TodoStore::open(BrokenSlot);
        let id = store.add("still works", None).expect("add");
        store.toggle(id);
        assert!(store.tasks()[0].completed);
    }
}
