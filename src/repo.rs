//! Task repository: the four CRUD operations against the document store.
//!
//! The repository owns identifier validation and due-date normalization;
//! nothing reaches the store as a raw string. Every operation either fully
//! succeeds or fully fails, with no partial mutations and no internal
//! retries, and every failure is logged before it propagates.

use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::store::{DocumentStore, NewDocument};
use crate::task::{
    self, DocumentId, NewTaskInput, TaskFieldsInput, TaskRecord, TaskUpdate,
};

/// Repository over an opened [`DocumentStore`].
///
/// The store handle is constructed once by the caller and injected here, so
/// tests can point the repository at a temp-directory store.
#[derive(Debug, Clone)]
pub struct TaskRepository {
    store: DocumentStore,
}

impl TaskRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// All tasks, ordered by ascending due date.
    pub fn list(&self) -> Result<Vec<TaskRecord>> {
        let tasks = self.store.find_sorted().map_err(|err| {
            error!(error = %err, "failed to fetch tasks");
            err
        })?;
        debug!(count = tasks.len(), "fetched task list");
        Ok(tasks)
    }

    /// Create a task; the store assigns the identifier.
    ///
    /// Returns the stored record, echoing the payload plus the new id.
    pub fn create(&self, input: NewTaskInput) -> Result<TaskRecord> {
        let title = task::validate_title(&input.title)?;
        let due_date = task::parse_due_date(&input.due_date)?;

        let record = self
            .store
            .insert_one(NewDocument {
                title,
                description: input.description,
                due_date,
                completed: input.completed,
            })
            .and_then(|record| {
                self.store.invalidate_listing()?;
                Ok(record)
            })
            .map_err(|err| {
                error!(error = %err, "failed to create task");
                err
            })?;

        debug!(id = %record.id, "created task");
        Ok(record)
    }

    /// Partial field replacement, commonly just the `completed` flag.
    ///
    /// Returns the normalized change set that was persisted, for the view
    /// synchronizer to apply locally.
    pub fn update_fields(&self, id: &str, fields: TaskFieldsInput) -> Result<TaskUpdate> {
        let (id, update) = self.prepare_mutation(id, fields)?;

        let outcome = self.store.update_one(id, &update).map_err(|err| {
            error!(task_id = %id, error = %err, "failed to update task");
            err
        })?;
        if outcome.matched == 0 {
            let err = Error::NotFound(id.to_string());
            error!(task_id = %id, error = %err, "failed to update task");
            return Err(err);
        }
        self.store.invalidate_listing().map_err(|err| {
            error!(task_id = %id, error = %err, "failed to update task");
            err
        })?;

        debug!(task_id = %id, modified = outcome.modified, "updated task");
        Ok(update)
    }

    /// Replace the editable field set (title, description, due date).
    ///
    /// Same machinery as [`Self::update_fields`], but zero documents
    /// *modified* is an error here: either the id matched nothing or the new
    /// values were identical to the old ones. The store result cannot tell
    /// the two apart, so both surface as `NoChangeOrNotFound`.
    pub fn edit(&self, id: &str, fields: TaskFieldsInput) -> Result<TaskUpdate> {
        let (id, update) = self.prepare_mutation(id, fields)?;

        let outcome = self.store.update_one(id, &update).map_err(|err| {
            error!(task_id = %id, error = %err, "failed to edit task");
            err
        })?;
        if outcome.modified == 0 {
            let err = Error::NoChangeOrNotFound(id.to_string());
            error!(task_id = %id, error = %err, "failed to edit task");
            return Err(err);
        }
        self.store.invalidate_listing().map_err(|err| {
            error!(task_id = %id, error = %err, "failed to edit task");
            err
        })?;

        debug!(task_id = %id, "edited task");
        Ok(update)
    }

    /// Delete the task matching `id`. Deleting an id that matches nothing is
    /// not an error; the operation is idempotent.
    pub fn delete(&self, id: &str) -> Result<()> {
        let id = DocumentId::parse(id)?;

        let removed = self
            .store
            .delete_one(id)
            .and_then(|removed| {
                self.store.invalidate_listing()?;
                Ok(removed)
            })
            .map_err(|err| {
                error!(task_id = %id, error = %err, "failed to delete task");
                err
            })?;

        debug!(task_id = %id, removed, "deleted task");
        Ok(())
    }

    /// Shared front half of update/edit: id syntax check before the store
    /// sees the filter, then field normalization.
    fn prepare_mutation(
        &self,
        id: &str,
        fields: TaskFieldsInput,
    ) -> Result<(DocumentId, TaskUpdate)> {
        let id = DocumentId::parse(id)?;
        if fields.is_empty() {
            return Err(Error::Validation("no fields to update".to_string()));
        }
        let update = task::normalize_fields(fields)?;
        Ok((id, update))
    }
}
