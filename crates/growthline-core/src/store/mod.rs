//! Hierarchical document store.
//!
//! Documents are schemaless JSON objects addressed by a [`DocumentPath`]
//! (`collection/doc/collection/doc/...`). The [`DocumentStore`] trait is the
//! seam the record manager talks to; [`SqliteDocumentStore`] is the embedded
//! implementation backed by a single SQLite file.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │ TimelineRecords │───▶│  DocumentStore  │───▶│     SQLite      │
//! │  (records/)     │    │  (trait)        │    │  (store/sqlite) │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! Server timestamps are requested per field through
//! [`NewDocument::server_timestamps`] and resolved by the store at write time.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use jiff::Timestamp;
use serde_json::{Map, Value};

use crate::error::{Result, TimelineError};

pub mod path;
pub mod sqlite;

pub use path::{CollectionPath, DocumentPath};
pub use sqlite::SqliteDocumentStore;

/// Field map of a document body.
pub type Fields = Map<String, Value>;

/// A stored document as read back from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Document id (last path segment)
    pub id: String,

    /// Document body
    pub fields: Fields,

    /// When the document was created, as recorded by the store
    pub create_time: Option<Timestamp>,

    /// When the document was last written, as recorded by the store
    pub update_time: Option<Timestamp>,
}

/// A document to be created.
#[derive(Debug, Clone, Default)]
pub struct NewDocument {
    /// Document body
    pub fields: Fields,

    /// Top-level fields the store fills with its own write time
    pub server_timestamps: Vec<String>,
}

impl NewDocument {
    pub fn new(fields: Fields) -> Self {
        Self {
            fields,
            server_timestamps: Vec::new(),
        }
    }

    /// Requests a server-assigned timestamp for `field`.
    pub fn with_server_timestamp(mut self, field: impl Into<String>) -> Self {
        self.server_timestamps.push(field.into());
        self
    }
}

/// Assignment of one named (dotted) field.
///
/// Numeric segments index into arrays, so `timeline.phases.2.completed`
/// addresses a single flag without rewriting its siblings.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldUpdate {
    pub path: String,
    pub value: Value,
}

impl FieldUpdate {
    pub fn new(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            path: path.into(),
            value: value.into(),
        }
    }
}

/// Full contents of a collection at one point in time.
pub type Snapshot = Vec<Document>;

/// Stream of full collection snapshots pushed by the store.
pub type SnapshotStream = Pin<Box<dyn Stream<Item = Result<Snapshot>> + Send>>;

/// Abstraction over hierarchical document stores.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Creates a document under an explicit id. Fails if the id exists.
    async fn create(&self, path: &DocumentPath, document: NewDocument) -> Result<Document>;

    /// Reads a single document.
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>>;

    /// Lists every document of a collection in store-native (id) order.
    async fn list(&self, collection: &CollectionPath) -> Result<Vec<Document>>;

    /// Assigns named fields of an existing document, leaving the rest intact.
    async fn update(&self, path: &DocumentPath, updates: &[FieldUpdate]) -> Result<()>;

    /// Deletes a document. Deleting a missing document succeeds.
    async fn delete(&self, path: &DocumentPath) -> Result<()>;

    /// Subscribes to a collection. The stream yields the current snapshot
    /// first and a fresh one after every change.
    async fn subscribe(&self, collection: &CollectionPath) -> Result<SnapshotStream>;
}

/// Applies field updates to a document body.
///
/// Intermediate object keys are created on demand; array indexes must exist.
pub(crate) fn apply_updates(fields: &mut Fields, updates: &[FieldUpdate]) -> Result<()> {
    for update in updates {
        let segments: Vec<&str> = update.path.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(TimelineError::validation("path")
                .with_reason(format!("invalid field path '{}'", update.path)));
        }
        let (first, rest) = segments.split_first().ok_or_else(|| {
            TimelineError::validation("path").with_reason("empty field path")
        })?;
        if rest.is_empty() {
            fields.insert((*first).to_string(), update.value.clone());
            continue;
        }
        let slot = fields
            .entry((*first).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        set_nested(slot, rest, update.value.clone(), &update.path)?;
    }
    Ok(())
}

fn set_nested(target: &mut Value, segments: &[&str], value: Value, full_path: &str) -> Result<()> {
    let Some((head, tail)) = segments.split_first() else {
        *target = value;
        return Ok(());
    };

    let missing = || {
        TimelineError::validation("path")
            .with_reason(format!("field path '{full_path}' does not exist"))
    };

    let next = match target {
        Value::Object(map) => {
            if tail.is_empty() {
                map.insert((*head).to_string(), value);
                return Ok(());
            }
            map.entry((*head).to_string())
                .or_insert_with(|| Value::Object(Map::new()))
        }
        Value::Array(items) => {
            let index: usize = head.parse().map_err(|_| missing())?;
            items.get_mut(index).ok_or_else(missing)?
        }
        _ => return Err(missing()),
    };

    set_nested(next, tail, value, full_path)
}
