#![allow(dead_code)]

use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use growthline_core::{
    models::{BusinessInputs, OwnerId, Phase, Timeline},
    params::GenerateTimeline,
    store::{
        CollectionPath, Document, DocumentPath, FieldUpdate, NewDocument, SnapshotStream,
    },
    AppContext, AppNamespace, DocumentStore, Result, SqliteDocumentStore, TimelineError,
    TimelineGenerator,
};
use serde_json::json;
use tempfile::TempDir;
use tokio::sync::Notify;

/// Helper function to open a store in a temporary directory
pub async fn create_test_store() -> (TempDir, SqliteDocumentStore) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = SqliteDocumentStore::open(temp_dir.path().join("test.db"))
        .await
        .expect("Failed to open store")
        .with_poll_interval(Duration::from_millis(50));
    (temp_dir, store)
}

/// Context signed in as `owner` on top of `store`.
pub fn context_for(store: Arc<dyn DocumentStore>, owner: Option<&str>) -> AppContext {
    AppContext::new(store, AppNamespace::default(), owner.map(OwnerId::from))
}

pub fn bakery_request() -> GenerateTimeline {
    GenerateTimeline {
        business_type: "Local bakery".to_string(),
        business_position: "1 year old, 2 employees".to_string(),
        growth_goals: "Open second location in 18 months".to_string(),
        api_key: Some("test-key".to_string()),
    }
}

pub fn bakery_inputs() -> BusinessInputs {
    bakery_request().inputs()
}

pub fn bakery_timeline() -> Timeline {
    Timeline {
        title: "Bakery Growth Plan".to_string(),
        phases: vec![Phase {
            name: "Foundation".to_string(),
            duration: "Months 1-6".to_string(),
            objectives: vec!["Stabilize cash flow".to_string()],
            focus_areas: vec!["Operations".to_string()],
            metrics: vec!["Monthly revenue".to_string()],
            notes: "Focus on unit economics.".to_string(),
            completed: false,
        }],
    }
}

/// Timeline with `count` phases named "Phase 1", "Phase 2", ...
pub fn timeline_with_phases(title: &str, count: usize) -> Timeline {
    Timeline {
        title: title.to_string(),
        phases: (1..=count)
            .map(|n| Phase {
                name: format!("Phase {n}"),
                duration: format!("Quarter {n}"),
                objectives: vec![format!("Objective {n}")],
                focus_areas: vec!["Sales".to_string(), "Hiring".to_string()],
                metrics: vec!["Revenue".to_string()],
                notes: String::new(),
                completed: false,
            })
            .collect(),
    }
}

/// Success body of the generation endpoint wrapping `timeline`.
pub fn gemini_body(timeline: &Timeline) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "text": serde_json::to_string(timeline).unwrap() }]
            }
        }]
    })
}

/// Generator returning a fixed timeline.
pub struct StaticGenerator {
    pub timeline: Timeline,
    pub calls: AtomicUsize,
}

impl StaticGenerator {
    pub fn new(timeline: Timeline) -> Self {
        Self {
            timeline,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TimelineGenerator for StaticGenerator {
    async fn generate(&self, params: &GenerateTimeline) -> Result<Timeline> {
        params.validate()?;
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.timeline.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Generator whose request never completes.
pub struct StalledGenerator;

#[async_trait]
impl TimelineGenerator for StalledGenerator {
    async fn generate(&self, _params: &GenerateTimeline) -> Result<Timeline> {
        std::future::pending().await
    }

    fn name(&self) -> &str {
        "stalled"
    }
}

/// Store wrapper that fails chosen operations and can hold updates until
/// released.
pub struct FlakyStore {
    inner: SqliteDocumentStore,
    pub fail_create: AtomicBool,
    pub fail_update: AtomicBool,
    pub fail_delete: AtomicBool,
    pub hold_updates: AtomicBool,
    pub update_entered: Notify,
    pub update_release: Notify,
    pub deletes: AtomicUsize,
}

impl FlakyStore {
    pub fn new(inner: SqliteDocumentStore) -> Self {
        Self {
            inner,
            fail_create: AtomicBool::new(false),
            fail_update: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
            hold_updates: AtomicBool::new(false),
            update_entered: Notify::new(),
            update_release: Notify::new(),
            deletes: AtomicUsize::new(0),
        }
    }

    fn injected(operation: &str) -> TimelineError {
        TimelineError::store(operation, "injected failure").build()
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn create(&self, path: &DocumentPath, document: NewDocument) -> Result<Document> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(Self::injected("create"));
        }
        self.inner.create(path, document).await
    }

    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>> {
        self.inner.get(path).await
    }

    async fn list(&self, collection: &CollectionPath) -> Result<Vec<Document>> {
        self.inner.list(collection).await
    }

    async fn update(&self, path: &DocumentPath, updates: &[FieldUpdate]) -> Result<()> {
        if self.hold_updates.load(Ordering::SeqCst) {
            self.update_entered.notify_one();
            self.update_release.notified().await;
        }
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(Self::injected("update"));
        }
        self.inner.update(path, updates).await
    }

    async fn delete(&self, path: &DocumentPath) -> Result<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(Self::injected("delete"));
        }
        self.inner.delete(path).await
    }

    async fn subscribe(&self, collection: &CollectionPath) -> Result<SnapshotStream> {
        self.inner.subscribe(collection).await
    }
}
