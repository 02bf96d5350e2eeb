//! Client-held task list and its reconciliation rules.
//!
//! [`TaskListView`] mirrors the repository's List result as of the last full
//! load. It is a disposable projection of the store, never a second source
//! of truth: between loads it is patched optimistically, one rule per
//! repository operation, and each rule runs only after that operation has
//! reported success. On failure the caller leaves the view untouched and
//! surfaces the error instead.
//!
//! The due-date ordering is authoritative only immediately after a full
//! load; local patches deliberately do not re-sort.

use crate::task::{DocumentId, TaskRecord, TaskUpdate};

/// Ordered task sequence mirroring the last full List
#[derive(Debug, Clone, Default)]
pub struct TaskListView {
    tasks: Vec<TaskRecord>,
}

impl TaskListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a view from a fresh List result
    pub fn from_tasks(tasks: Vec<TaskRecord>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn find(&self, id: DocumentId) -> Option<&TaskRecord> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Replace the whole view with a fresh List result (full page load)
    pub fn reload(&mut self, tasks: Vec<TaskRecord>) {
        self.tasks = tasks;
    }

    /// Create succeeded: prepend the record returned by the repository.
    pub fn apply_create(&mut self, task: TaskRecord) {
        self.tasks.insert(0, task);
    }

    /// Field update succeeded: patch the matching record in place.
    ///
    /// Returns false when no local record matches (e.g. the view was loaded
    /// before the task existed); the caller may choose to reload.
    pub fn apply_update(&mut self, id: DocumentId, update: &TaskUpdate) -> bool {
        match self.tasks.iter_mut().find(|task| task.id == id) {
            Some(task) => {
                task.apply(update);
                true
            }
            None => false,
        }
    }

    /// Edit succeeded: replace the matching record with the edited values.
    pub fn apply_edit(&mut self, id: DocumentId, update: &TaskUpdate) -> bool {
        match self.tasks.iter_mut().find(|task| task.id == id) {
            Some(task) => {
                let mut replacement = task.clone();
                replacement.apply(update);
                *task = replacement;
                true
            }
            None => false,
        }
    }

    /// Delete succeeded: remove the matching record.
    pub fn apply_delete(&mut self, id: DocumentId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        self.tasks.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::parse_due_date;

    fn task(title: &str, due: &str) -> TaskRecord {
        TaskRecord {
            id: DocumentId::generate(),
            title: title.to_string(),
            description: String::new(),
            due_date: parse_due_date(due).unwrap(),
            completed: false,
        }
    }

    #[test]
    fn create_prepends() {
        let mut view = TaskListView::from_tasks(vec![task("old", "2024-01-01")]);
        view.apply_create(task("new", "2024-06-01"));

        assert_eq!(view.len(), 2);
        assert_eq!(view.tasks()[0].title, "new");
    }

    #[test]
    fn update_patches_in_place_without_resorting() {
        let first = task("a", "2024-01-01");
        let second = task("b", "2024-02-01");
        let first_id = first.id;
        let mut view = TaskListView::from_tasks(vec![first, second]);

        let done = view.apply_update(
            first_id,
            &TaskUpdate {
                completed: Some(true),
                due_date: Some(parse_due_date("2024-12-01").unwrap()),
                ..TaskUpdate::default()
            },
        );

        assert!(done);
        // Still first, even though its due date now sorts after "b".
        assert_eq!(view.tasks()[0].id, first_id);
        assert!(view.tasks()[0].completed);
    }

    #[test]
    fn update_of_unknown_id_leaves_view_unchanged() {
        let mut view = TaskListView::from_tasks(vec![task("a", "2024-01-01")]);
        let untouched = view.tasks().to_vec();

        let done = view.apply_update(
            DocumentId::generate(),
            &TaskUpdate {
                completed: Some(true),
                ..TaskUpdate::default()
            },
        );

        assert!(!done);
        assert_eq!(view.tasks(), untouched.as_slice());
    }

    #[test]
    fn edit_replaces_record() {
        let record = task("draft", "2024-01-01");
        let id = record.id;
        let mut view = TaskListView::from_tasks(vec![record]);

        view.apply_edit(
            id,
            &TaskUpdate {
                title: Some("final".to_string()),
                description: Some("polished".to_string()),
                due_date: Some(parse_due_date("2024-02-01").unwrap()),
                ..TaskUpdate::default()
            },
        );

        let edited = view.find(id).unwrap();
        assert_eq!(edited.title, "final");
        assert_eq!(edited.description, "polished");
        assert_eq!(edited.id, id);
    }

    #[test]
    fn delete_removes_by_id() {
        let keep = task("keep", "2024-01-01");
        let drop = task("drop", "2024-02-01");
        let drop_id = drop.id;
        let mut view = TaskListView::from_tasks(vec![keep, drop]);

        assert!(view.apply_delete(drop_id));
        assert!(!view.apply_delete(drop_id));
        assert_eq!(view.len(), 1);
        assert_eq!(view.tasks()[0].title, "keep");
    }

    #[test]
    fn reload_discards_local_state() {
        let mut view = TaskListView::from_tasks(vec![task("stale", "2024-01-01")]);
        view.reload(vec![task("fresh", "2024-03-01")]);

        assert_eq!(view.len(), 1);
        assert_eq!(view.tasks()[0].title, "fresh");
    }
}
