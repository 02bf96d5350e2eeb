//! Task domain model.
//!
//! A task document carries an opaque store-assigned identifier, a title, a
//! free-form description, a due date, and a completion flag. Due dates are
//! canonical absolute instants (`DateTime<Utc>`) everywhere past the input
//! boundary; raw user input (`2024-01-10`, `2024-01-10T14:30`, or full
//! RFC 3339) is converted exactly once, never stored mixed.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Opaque unique identifier assigned by the store on insert.
///
/// Identifiers are UUID v4 and never reused. Raw strings must pass
/// [`DocumentId::parse`] before they may appear in a store lookup filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validate identifier syntax.
    ///
    /// Returns `Error::InvalidIdentifier` when the string is not a UUID, so
    /// malformed ids are rejected before they reach the store.
    pub fn parse(raw: &str) -> Result<Self> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| Error::InvalidIdentifier(raw.to_string()))
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A persisted task document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: DocumentId,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub completed: bool,
}

impl TaskRecord {
    /// Apply a change set in place. Returns true when any field changed.
    pub fn apply(&mut self, update: &TaskUpdate) -> bool {
        let mut changed = false;
        if let Some(title) = &update.title {
            if *title != self.title {
                self.title = title.clone();
                changed = true;
            }
        }
        if let Some(description) = &update.description {
            if *description != self.description {
                self.description = description.clone();
                changed = true;
            }
        }
        if let Some(due_date) = update.due_date {
            if due_date != self.due_date {
                self.due_date = due_date;
                changed = true;
            }
        }
        if let Some(completed) = update.completed {
            if completed != self.completed {
                self.completed = completed;
                changed = true;
            }
        }
        changed
    }
}

/// Payload for creating a task; the store assigns the identifier.
#[derive(Debug, Clone)]
pub struct NewTaskInput {
    pub title: String,
    pub description: String,
    /// Raw due date as entered (`2024-01-10`, `2024-01-10T14:30`, RFC 3339)
    pub due_date: String,
    pub completed: bool,
}

/// Arbitrary subset of mutable fields, raw form
#[derive(Debug, Clone, Default)]
pub struct TaskFieldsInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub completed: Option<bool>,
}

impl TaskFieldsInput {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.completed.is_none()
    }
}

/// Normalized change set as persisted; due date in canonical instant form.
///
/// Returned by repository mutations so the view synchronizer can patch its
/// local copy with exactly what the store now holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.completed.is_none()
    }
}

/// Validate a title: non-empty after trimming.
pub fn validate_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("title cannot be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Parse a raw due date into the canonical instant form.
///
/// Accepted shapes, in order: RFC 3339 (`2024-01-10T14:30:00Z`), a local
/// date-time without offset (`2024-01-10T14:30` or with seconds), and a bare
/// date (`2024-01-10`, taken as midnight UTC).
pub fn parse_due_date(raw: &str) -> Result<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("due date cannot be empty".to_string()));
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&midnight));
        }
    }

    Err(Error::Validation(format!("unparseable due date: {trimmed}")))
}

/// Normalize a raw field subset into a canonical change set.
pub fn normalize_fields(input: TaskFieldsInput) -> Result<TaskUpdate> {
    let title = input.title.map(|title| validate_title(&title)).transpose()?;
    let due_date = input
        .due_date
        .as_deref()
        .map(parse_due_date)
        .transpose()?;
    Ok(TaskUpdate {
        title,
        description: input.description,
        due_date,
        completed: input.completed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            assert!(seen.insert(DocumentId::generate().to_string()));
        }
    }

    #[test]
    fn parse_rejects_malformed_id() {
        let err = DocumentId::parse("not-a-uuid").unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier(_)));
    }

    #[test]
    fn parse_accepts_round_tripped_id() {
        let id = DocumentId::generate();
        assert_eq!(DocumentId::parse(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn bare_date_becomes_midnight_utc() {
        let instant = parse_due_date("2024-01-10").unwrap();
        assert_eq!(instant.to_rfc3339(), "2024-01-10T00:00:00+00:00");
    }

    #[test]
    fn datetime_local_parses_without_offset() {
        let instant = parse_due_date("2024-01-10T14:30").unwrap();
        assert_eq!(instant.to_rfc3339(), "2024-01-10T14:30:00+00:00");
    }

    #[test]
    fn rfc3339_offset_is_normalized_to_utc() {
        let instant = parse_due_date("2024-01-10T14:30:00+02:00").unwrap();
        assert_eq!(instant.to_rfc3339(), "2024-01-10T12:30:00+00:00");
    }

    #[test]
    fn garbage_due_date_is_a_validation_error() {
        let err = parse_due_date("next tuesday").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn empty_title_rejected() {
        assert!(matches!(
            validate_title("   "),
            Err(Error::Validation(_))
        ));
        assert_eq!(validate_title("  Buy milk ").unwrap(), "Buy milk");
    }

    #[test]
    fn apply_reports_whether_anything_changed() {
        let mut task = TaskRecord {
            id: DocumentId::generate(),
            title: "A".to_string(),
            description: String::new(),
            due_date: parse_due_date("2024-01-10").unwrap(),
            completed: false,
        };

        let same = TaskUpdate {
            completed: Some(false),
            ..TaskUpdate::default()
        };
        assert!(!task.apply(&same));

        let flip = TaskUpdate {
            completed: Some(true),
            ..TaskUpdate::default()
        };
        assert!(task.apply(&flip));
        assert!(task.completed);
    }

    #[test]
    fn normalize_fields_converts_due_date() {
        let update = normalize_fields(TaskFieldsInput {
            title: Some("  X  ".to_string()),
            due_date: Some("2024-03-01".to_string()),
            ..TaskFieldsInput::default()
        })
        .unwrap();
        assert_eq!(update.title.as_deref(), Some("X"));
        assert_eq!(
            update.due_date.unwrap().to_rfc3339(),
            "2024-03-01T00:00:00+00:00"
        );
    }
}
