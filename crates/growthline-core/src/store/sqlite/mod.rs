//! SQLite-backed document store.
//!
//! Each operation opens its own connection on the blocking thread pool, so the
//! store handle is cheap to clone and never holds a connection across an
//! await point. Subscriptions are served by a background task per subscriber
//! that re-reads the collection whenever this process writes to the store, and
//! on a poll tick to pick up writes made by other processes.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use async_trait::async_trait;
use jiff::Timestamp;
use log::{debug, warn};
use rusqlite::Connection;
use tokio::{
    sync::{mpsc, Notify},
    task,
    time::MissedTickBehavior,
};
use tokio_stream::wrappers::ReceiverStream;

use super::{
    CollectionPath, Document, DocumentPath, DocumentStore, FieldUpdate, NewDocument, Snapshot,
    SnapshotStream,
};
use crate::error::{Result, StoreResultExt, TimelineError};

mod migrations;
mod queries;

/// How often subscriptions re-read their collection when nothing in this
/// process has written to it.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Number of snapshots buffered per subscriber.
const SUBSCRIPTION_BUFFER: usize = 16;

/// How long a connection waits for another writer before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database connection and document queries.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Opens a connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = Self::connect(path)?;
        db.initialize_schema()?;
        Ok(db)
    }

    /// Opens a connection to an already initialized database.
    pub fn connect<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection =
            Connection::open(path).store_context("open", "Failed to open database connection")?;
        connection
            .busy_timeout(BUSY_TIMEOUT)
            .store_context("open", "Failed to set busy timeout")?;
        Ok(Self { connection })
    }
}

/// Document store persisted in a single SQLite file.
#[derive(Debug, Clone)]
pub struct SqliteDocumentStore {
    db_path: PathBuf,
    changes: Arc<Notify>,
    poll_interval: Duration,
}

impl SqliteDocumentStore {
    /// Opens (creating if needed) the store at `path`.
    ///
    /// # Errors
    ///
    /// Returns `TimelineError::FileSystem` if the parent directory cannot be
    /// created, `TimelineError::Store` if schema initialization fails.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| TimelineError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let store = Self {
            db_path,
            changes: Arc::new(Notify::new()),
            poll_interval: DEFAULT_POLL_INTERVAL,
        };
        let init_path = store.db_path.clone();
        task::spawn_blocking(move || Database::new(&init_path).map(drop))
            .await
            .map_err(|e| TimelineError::Configuration {
                message: format!("Task join error: {e}"),
            })??;
        debug!("Opened document store at {}", store.db_path.display());
        Ok(store)
    }

    /// Overrides how often subscriptions poll for external changes.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Path of the backing database file.
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Returns the default database path following the XDG Base Directory
    /// specification: `$XDG_DATA_HOME/growthline/growthline.db`.
    pub fn default_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("growthline")
            .place_data_file("growthline.db")
            .map_err(|e| TimelineError::XdgDirectory(e.to_string()))
    }

    /// Runs `f` against a fresh connection on the blocking pool. The schema
    /// is set up once by [`Self::open`].
    async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = Database::connect(&db_path)?;
            f(&mut db)
        })
        .await
        .map_err(|e| TimelineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    fn notify_change(&self) {
        self.changes.notify_waiters();
    }
}

/// Identity of a snapshot's contents; two equal fingerprints mean nothing
/// changed.
fn fingerprint(snapshot: &Snapshot) -> Vec<(String, Option<Timestamp>)> {
    snapshot
        .iter()
        .map(|doc| (doc.id.clone(), doc.update_time))
        .collect()
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn create(&self, path: &DocumentPath, document: NewDocument) -> Result<Document> {
        let collection = path.collection().to_string();
        let id = path.id().to_string();
        let created = self
            .blocking(move |db| db.insert_document(&collection, &id, &document))
            .await?;
        debug!("Created document {path}");
        self.notify_change();
        Ok(created)
    }

    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>> {
        let collection = path.collection().to_string();
        let id = path.id().to_string();
        self.blocking(move |db| db.get_document(&collection, &id))
            .await
    }

    async fn list(&self, collection: &CollectionPath) -> Result<Vec<Document>> {
        let collection = collection.to_string();
        self.blocking(move |db| db.list_documents(&collection))
            .await
    }

    async fn update(&self, path: &DocumentPath, updates: &[FieldUpdate]) -> Result<()> {
        let collection = path.collection().to_string();
        let id = path.id().to_string();
        let updates = updates.to_vec();
        self.blocking(move |db| db.update_document(&collection, &id, &updates))
            .await?;
        debug!("Updated document {path}");
        self.notify_change();
        Ok(())
    }

    async fn delete(&self, path: &DocumentPath) -> Result<()> {
        let collection = path.collection().to_string();
        let id = path.id().to_string();
        self.blocking(move |db| db.delete_document(&collection, &id))
            .await?;
        debug!("Deleted document {path}");
        self.notify_change();
        Ok(())
    }

    async fn subscribe(&self, collection: &CollectionPath) -> Result<SnapshotStream> {
        let initial = self.list(collection).await?;
        let (tx, rx) = mpsc::channel(SUBSCRIPTION_BUFFER);
        let mut last = fingerprint(&initial);
        tx.send(Ok(initial))
            .await
            .map_err(|_| TimelineError::store("subscribe", "Subscriber dropped").build())?;

        let store = self.clone();
        let collection = collection.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(store.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = store.changes.notified() => {}
                    _ = tx.closed() => break,
                }

                let message = match store.list(&collection).await {
                    Ok(snapshot) => {
                        let current = fingerprint(&snapshot);
                        if current == last {
                            continue;
                        }
                        last = current;
                        Ok(snapshot)
                    }
                    Err(e) => {
                        warn!("Subscription to {collection} failed to read: {e}");
                        Err(e)
                    }
                };

                if tx.send(message).await.is_err() {
                    break;
                }
            }
            debug!("Subscription to {collection} closed");
        });

        Ok(Box::pin(ReceiverStream::new(rx)))
    }
}
