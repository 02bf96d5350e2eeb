//! Document store gateway.
//!
//! The store is a single collection of task documents kept under one root
//! directory:
//!
//! ```text
//! <root>/
//!   tasks.json        # the collection (JSON array of documents)
//!   listing.json      # rendered listing cache (sorted by due date)
//!   *.lock            # flock files guarding reads and writes
//! ```
//!
//! A [`DocumentStore`] is opened once and reused for the life of the
//! session; it is constructed explicitly and handed to the repository, so
//! tests can substitute a store rooted in a temp directory. All writes go
//! through lock + temp + rename, so the collection file is never observed
//! half-written. Infrastructure failures surface as
//! [`Error::StoreUnavailable`]; they never hang and never leave a partial
//! mutation behind.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::lock::{self, FileLock};
use crate::task::{DocumentId, TaskRecord, TaskUpdate};

const COLLECTION_FILE: &str = "tasks.json";
const LISTING_FILE: &str = "listing.json";

/// Fields of a document to insert; the store assigns the identifier.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub completed: bool,
}

/// Result of a partial update, Mongo-style.
///
/// `matched` counts documents the id filter hit; `modified` counts documents
/// whose stored values actually changed. A matched document with identical
/// values yields `modified == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// Rendered listing cache persisted alongside the collection
#[derive(Debug, Serialize, Deserialize)]
struct Listing {
    generated_at: DateTime<Utc>,
    tasks: Vec<TaskRecord>,
}

/// Handle to the document store, opened once and reused
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
    lock_timeout_ms: u64,
}

impl DocumentStore {
    /// Open the store, creating its root directory if needed.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let root = config.resolved_path()?;
        fs::create_dir_all(&root)
            .map_err(|err| unavailable(&root, "cannot create store root", &err))?;
        Ok(Self {
            root,
            lock_timeout_ms: config.lock_timeout_ms,
        })
    }

    /// Open a store rooted at an explicit directory (tests, `--store`)
    pub fn open_at(root: impl Into<PathBuf>, lock_timeout_ms: u64) -> Result<Self> {
        let config = StoreConfig {
            path: Some(root.into()),
            lock_timeout_ms,
        };
        Self::open(&config)
    }

    /// Store root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_file(&self) -> PathBuf {
        self.root.join(COLLECTION_FILE)
    }

    fn listing_file(&self) -> PathBuf {
        self.root.join(LISTING_FILE)
    }

    // =========================================================================
    // Collection operations
    // =========================================================================

    /// Insert one document; the store assigns a fresh unique identifier.
    pub fn insert_one(&self, doc: NewDocument) -> Result<TaskRecord> {
        self.update_collection(|tasks| {
            let mut id = DocumentId::generate();
            // v4 collisions are not expected; the loop keeps the uniqueness
            // invariant unconditional anyway.
            while tasks.iter().any(|task| task.id == id) {
                id = DocumentId::generate();
            }
            let record = TaskRecord {
                id,
                title: doc.title.clone(),
                description: doc.description.clone(),
                due_date: doc.due_date,
                completed: doc.completed,
            };
            tasks.push(record.clone());
            Ok((record, true))
        })
    }

    /// All documents ordered by ascending due date, ties broken by id.
    ///
    /// Serves the rendered listing cache when present; otherwise rebuilds
    /// it from the collection and persists it for the next call.
    pub fn find_sorted(&self) -> Result<Vec<TaskRecord>> {
        if let Some(listing) = self.read_listing()? {
            return Ok(listing.tasks);
        }

        // The collection lock stays held until the cache is persisted, so a
        // mutation cannot slip between the read and the listing write and
        // have its invalidation overwritten by a stale cache.
        let path = self.collection_file();
        let _lock = FileLock::acquire(lock::lock_path_for(&path), self.lock_timeout_ms)?;
        let mut tasks = read_collection_at(&path)?;
        sort_by_due_date(&mut tasks);

        let listing = Listing {
            generated_at: Utc::now(),
            tasks,
        };
        let json = serde_json::to_string_pretty(&listing)?;
        lock::write_atomic_locked(&self.listing_file(), json.as_bytes(), self.lock_timeout_ms)?;
        Ok(listing.tasks)
    }

    /// Apply a partial field replacement to the document matching `id`.
    pub fn update_one(&self, id: DocumentId, update: &TaskUpdate) -> Result<UpdateOutcome> {
        self.update_collection(|tasks| {
            let Some(task) = tasks.iter_mut().find(|task| task.id == id) else {
                return Ok((
                    UpdateOutcome {
                        matched: 0,
                        modified: 0,
                    },
                    false,
                ));
            };
            let changed = task.apply(update);
            Ok((
                UpdateOutcome {
                    matched: 1,
                    modified: u64::from(changed),
                },
                changed,
            ))
        })
    }

    /// Remove the document matching `id`. Returns the number removed (0 or 1).
    pub fn delete_one(&self, id: DocumentId) -> Result<u64> {
        self.update_collection(|tasks| {
            let before = tasks.len();
            tasks.retain(|task| task.id != id);
            let removed = (before - tasks.len()) as u64;
            Ok((removed, removed > 0))
        })
    }

    /// Drop the rendered listing cache so the next full load re-reads the
    /// collection. This is the cache-invalidation signal issued after every
    /// mutation; it carries no data of its own.
    pub fn invalidate_listing(&self) -> Result<()> {
        let path = self.listing_file();
        let _lock = FileLock::acquire(lock::lock_path_for(&path), self.lock_timeout_ms)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(unavailable(&path, "cannot invalidate listing", &err)),
        }
    }

    // =========================================================================
    // Internal IO
    // =========================================================================

    /// Read-modify-write the collection under one held lock.
    ///
    /// The mutator returns `(result, dirty)`; the file is rewritten only
    /// when `dirty` is set, so a no-op update does not touch the disk.
    fn update_collection<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<TaskRecord>) -> Result<(T, bool)>,
    {
        let path = self.collection_file();
        let _lock = FileLock::acquire(lock::lock_path_for(&path), self.lock_timeout_ms)?;

        let mut tasks = read_collection_at(&path)?;
        let (result, dirty) = f(&mut tasks)?;

        if dirty {
            let json = serde_json::to_string_pretty(&tasks)?;
            lock::write_atomic(&path, json.as_bytes())?;
        }

        Ok(result)
    }

    fn read_listing(&self) -> Result<Option<Listing>> {
        let path = self.listing_file();
        let _lock = FileLock::acquire(lock::lock_path_for(&path), self.lock_timeout_ms)?;
        if !path.exists() {
            return Ok(None);
        }
        let content =
            fs::read_to_string(&path).map_err(|err| unavailable(&path, "cannot read listing", &err))?;
        // A stale or damaged cache is rebuilt, not surfaced.
        Ok(serde_json::from_str(&content).ok())
    }
}

fn read_collection_at(path: &Path) -> Result<Vec<TaskRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content =
        fs::read_to_string(path).map_err(|err| unavailable(path, "cannot read collection", &err))?;
    serde_json::from_str(&content)
        .map_err(|err| unavailable(path, "collection is not valid JSON", &err))
}

fn sort_by_due_date(tasks: &mut [TaskRecord]) {
    tasks.sort_by(|left, right| {
        left.due_date
            .cmp(&right.due_date)
            .then_with(|| left.id.to_string().cmp(&right.id.to_string()))
    });
}

fn unavailable(path: &Path, what: &str, err: &dyn std::fmt::Display) -> Error {
    Error::StoreUnavailable(format!("{what} ({}): {err}", path.display()))
}
