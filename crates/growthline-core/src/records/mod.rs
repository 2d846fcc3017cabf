//! Timeline record manager.
//!
//! [`TimelineRecords`] persists generated timelines under the owner's
//! collection and keeps an in-memory copy of that owner's records for the
//! presentation layer. Completion toggles and deletes are applied to the
//! in-memory copy before the store confirms them and are rolled back when the
//! store write fails.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │      Board      │───▶│ TimelineRecords │───▶│  DocumentStore  │
//! │                 │◀───│ (memory copy)   │◀───│  (snapshots)    │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! Store snapshots (from [`TimelineRecords::list`] or a live
//! [`TimelineRecords::watch`] stream) replace the in-memory copy through
//! [`TimelineRecords::apply_snapshot`], which keeps in-flight optimistic edits
//! so a snapshot taken before a write lands does not undo it on screen.

use std::{
    collections::{HashMap, HashSet},
    pin::Pin,
    sync::Arc,
};

use futures::{Stream, StreamExt};
use log::{debug, warn};
use tokio::sync::Mutex;

use crate::{
    error::{Result, TimelineError},
    models::{AppNamespace, BusinessInputs, OwnerId, RecordId, Timeline, TimelineRecord},
    store::{CollectionPath, Document, DocumentStore, FieldUpdate},
};

pub mod document;

/// Stream of full, ordered record lists for one owner.
pub type RecordStream = Pin<Box<dyn Stream<Item = Result<Vec<TimelineRecord>>> + Send>>;

/// In-memory copy of one owner's records plus the optimistic edits not yet
/// confirmed by the store.
#[derive(Debug, Default)]
struct LocalRecords {
    owner: Option<OwnerId>,
    entries: Vec<TimelineRecord>,
    pending_toggles: HashMap<(RecordId, usize), bool>,
    pending_deletes: HashSet<RecordId>,
}

impl LocalRecords {
    /// Drops everything held for a previous owner.
    fn switch_owner(&mut self, owner: &OwnerId) {
        if self.owner.as_ref() != Some(owner) {
            *self = Self {
                owner: Some(owner.clone()),
                ..Self::default()
            };
        }
    }

    fn position(&self, id: &RecordId) -> Option<usize> {
        self.entries.iter().position(|r| &r.id == id)
    }

    /// Replaces the entries with `incoming`, re-applying pending edits.
    fn reconcile(&mut self, incoming: Vec<TimelineRecord>) {
        let mut entries: Vec<TimelineRecord> = incoming
            .into_iter()
            .filter(|r| !self.pending_deletes.contains(&r.id))
            .collect();

        for ((id, index), completed) in &self.pending_toggles {
            if let Some(phase) = entries
                .iter_mut()
                .find(|r| &r.id == id)
                .and_then(|r| r.timeline.phases.get_mut(*index))
            {
                phase.completed = *completed;
            }
        }

        self.entries = entries;
    }
}

/// Orders records newest first when every record carries a creation time.
/// Otherwise the incoming (store-native) order is kept.
pub fn order_records(mut records: Vec<TimelineRecord>) -> Vec<TimelineRecord> {
    if records.iter().all(|r| r.created_at.is_some()) {
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }
    records
}

fn require_owner(owner: Option<&OwnerId>) -> Result<&OwnerId> {
    owner.ok_or(TimelineError::NotAuthenticated)
}

/// Manager for one namespace's timeline records.
pub struct TimelineRecords {
    store: Arc<dyn DocumentStore>,
    namespace: AppNamespace,
    local: Mutex<LocalRecords>,
}

impl TimelineRecords {
    pub fn new(store: Arc<dyn DocumentStore>, namespace: AppNamespace) -> Self {
        Self {
            store,
            namespace,
            local: Mutex::new(LocalRecords::default()),
        }
    }

    pub fn namespace(&self) -> &AppNamespace {
        &self.namespace
    }

    /// Collection holding `owner`'s records:
    /// `artifacts/{namespace}/users/{owner}/timelines`.
    pub fn collection(&self, owner: &OwnerId) -> Result<CollectionPath> {
        CollectionPath::new([
            "artifacts",
            self.namespace.as_str(),
            "users",
            owner.as_str(),
            "timelines",
        ])
    }

    fn decode_all(&self, documents: &[Document], owner: &OwnerId) -> Vec<TimelineRecord> {
        documents
            .iter()
            .filter_map(|doc| match document::decode(doc, &self.namespace, owner) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping unreadable timeline document {}: {e}", doc.id);
                    None
                }
            })
            .collect()
    }

    /// Saves a freshly generated timeline under a new id.
    ///
    /// The confirmed record is placed at the front of the in-memory list.
    ///
    /// # Errors
    ///
    /// Returns `TimelineError::NotAuthenticated` without an owner,
    /// `TimelineError::Store` if the write fails.
    pub async fn save(
        &self,
        owner: Option<&OwnerId>,
        inputs: &BusinessInputs,
        timeline: &Timeline,
    ) -> Result<RecordId> {
        let owner = require_owner(owner)?;
        let id = RecordId::generate();
        let path = self.collection(owner)?.doc(id.as_str())?;

        let created = self
            .store
            .create(&path, document::encode(&self.namespace, owner, inputs, timeline)?)
            .await?;
        let record = document::decode(&created, &self.namespace, owner)?;
        debug!("Saved timeline {id} for {owner}");

        let mut local = self.local.lock().await;
        local.switch_owner(owner);
        local.entries.retain(|r| r.id != id);
        local.entries.insert(0, record);
        Ok(id)
    }

    /// Lists every record of `owner` and refreshes the in-memory copy.
    pub async fn list(&self, owner: Option<&OwnerId>) -> Result<Vec<TimelineRecord>> {
        let owner = require_owner(owner)?;
        let documents = self.store.list(&self.collection(owner)?).await?;
        let records = order_records(self.decode_all(&documents, owner));
        debug!("Listed {} timelines for {owner}", records.len());
        Ok(self.apply_snapshot(Some(owner), records).await)
    }

    /// Reads one record and updates it in the in-memory copy.
    ///
    /// # Errors
    ///
    /// Returns `TimelineError::RecordNotFound` if no such document exists.
    pub async fn get(&self, owner: Option<&OwnerId>, id: &RecordId) -> Result<TimelineRecord> {
        let owner = require_owner(owner)?;
        let path = self.collection(owner)?.doc(id.as_str())?;
        let document = self
            .store
            .get(&path)
            .await?
            .ok_or_else(|| TimelineError::RecordNotFound { id: id.to_string() })?;
        let mut record = document::decode(&document, &self.namespace, owner)?;

        let mut local = self.local.lock().await;
        local.switch_owner(owner);
        for ((pending_id, index), completed) in &local.pending_toggles {
            if pending_id == id {
                if let Some(phase) = record.timeline.phases.get_mut(*index) {
                    phase.completed = *completed;
                }
            }
        }
        match local.position(id) {
            Some(pos) => local.entries[pos] = record.clone(),
            None => local.entries.push(record.clone()),
        }
        Ok(record)
    }

    /// Flips the completion flag of one phase and returns the new value.
    ///
    /// The in-memory flag flips first; the store receives a single field
    /// assignment. If the store write fails the flag is flipped back.
    ///
    /// # Errors
    ///
    /// Returns `TimelineError::RecordNotFound` if the record is not in the
    /// in-memory list, `TimelineError::Validation` if `phase_index` is out of
    /// range, `TimelineError::Store` if the write fails.
    pub async fn set_phase_completion(
        &self,
        owner: Option<&OwnerId>,
        id: &RecordId,
        phase_index: usize,
    ) -> Result<bool> {
        let owner = require_owner(owner)?;
        let path = self.collection(owner)?.doc(id.as_str())?;

        let completed = {
            let mut local = self.local.lock().await;
            local.switch_owner(owner);
            let pos = local
                .position(id)
                .ok_or_else(|| TimelineError::RecordNotFound { id: id.to_string() })?;
            let phase = local.entries[pos]
                .timeline
                .phases
                .get_mut(phase_index)
                .ok_or_else(|| {
                    TimelineError::validation("phaseIndex").with_reason(format!(
                        "timeline {id} has no phase with index {phase_index}"
                    ))
                })?;
            phase.completed = !phase.completed;
            let completed = phase.completed;
            local
                .pending_toggles
                .insert((id.clone(), phase_index), completed);
            completed
        };

        let result = self
            .store
            .update(
                &path,
                &[FieldUpdate::new(document::completion_field(phase_index), completed)],
            )
            .await;

        let mut local = self.local.lock().await;
        let key = (id.clone(), phase_index);
        if local.pending_toggles.get(&key) == Some(&completed) {
            local.pending_toggles.remove(&key);
        }

        match result {
            Ok(()) => {
                debug!("Set phase {phase_index} of {id} completed={completed}");
                Ok(completed)
            }
            Err(e) => {
                warn!("Reverting completion toggle of phase {phase_index} on {id}: {e}");
                if let Some(pos) = local.position(id) {
                    if let Some(phase) = local.entries[pos].timeline.phases.get_mut(phase_index) {
                        if phase.completed == completed {
                            phase.completed = !completed;
                        }
                    }
                }
                Err(e)
            }
        }
    }

    /// Deletes a record. Returns `false` without touching the store when the
    /// record is not in the in-memory list.
    ///
    /// The record leaves the in-memory list first; if the store delete fails
    /// it is put back at its previous position.
    pub async fn delete(&self, owner: Option<&OwnerId>, id: &RecordId) -> Result<bool> {
        let owner = require_owner(owner)?;
        let path = self.collection(owner)?.doc(id.as_str())?;

        let (pos, removed) = {
            let mut local = self.local.lock().await;
            local.switch_owner(owner);
            let Some(pos) = local.position(id) else {
                debug!("Timeline {id} is not loaded; nothing to delete");
                return Ok(false);
            };
            let removed = local.entries.remove(pos);
            local.pending_deletes.insert(id.clone());
            (pos, removed)
        };

        let result = self.store.delete(&path).await;

        let mut local = self.local.lock().await;
        local.pending_deletes.remove(id);

        match result {
            Ok(()) => {
                debug!("Deleted timeline {id}");
                Ok(true)
            }
            Err(e) => {
                warn!("Restoring timeline {id} after failed delete: {e}");
                if local.position(id).is_none() {
                    let pos = pos.min(local.entries.len());
                    local.entries.insert(pos, removed);
                }
                Err(e)
            }
        }
    }

    /// Subscribes to `owner`'s collection. Every item is the full, ordered
    /// record list; feed it to [`Self::apply_snapshot`].
    pub async fn watch(&self, owner: Option<&OwnerId>) -> Result<RecordStream> {
        let owner = require_owner(owner)?.clone();
        let snapshots = self.store.subscribe(&self.collection(&owner)?).await?;
        let namespace = self.namespace.clone();

        let stream = snapshots.map(move |snapshot| {
            snapshot.map(|documents| {
                let records = documents
                    .iter()
                    .filter_map(|doc| match document::decode(doc, &namespace, &owner) {
                        Ok(record) => Some(record),
                        Err(e) => {
                            warn!("Skipping unreadable timeline document {}: {e}", doc.id);
                            None
                        }
                    })
                    .collect();
                order_records(records)
            })
        });
        Ok(Box::pin(stream))
    }

    /// Replaces the in-memory copy with a store snapshot, keeping pending
    /// toggles and deletes, and returns the resulting list.
    pub async fn apply_snapshot(
        &self,
        owner: Option<&OwnerId>,
        snapshot: Vec<TimelineRecord>,
    ) -> Vec<TimelineRecord> {
        let mut local = self.local.lock().await;
        match owner {
            Some(owner) => local.switch_owner(owner),
            None => {
                *local = LocalRecords::default();
                return Vec::new();
            }
        }
        local.reconcile(snapshot);
        local.entries.clone()
    }

    /// The in-memory record list.
    pub async fn records(&self) -> Vec<TimelineRecord> {
        self.local.lock().await.entries.clone()
    }

    /// One record from the in-memory list.
    pub async fn cached(&self, id: &RecordId) -> Option<TimelineRecord> {
        let local = self.local.lock().await;
        local.position(id).map(|pos| local.entries[pos].clone())
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::models::Phase;

    fn record(id: &str, created_at: Option<i64>) -> TimelineRecord {
        TimelineRecord {
            id: RecordId::from(id),
            owner: OwnerId::from("u1"),
            app_namespace: AppNamespace::default(),
            inputs: BusinessInputs::default(),
            timeline: Timeline {
                title: format!("Plan {id}"),
                phases: vec![Phase {
                    name: "Only".to_string(),
                    duration: "Q1".to_string(),
                    objectives: Vec::new(),
                    focus_areas: Vec::new(),
                    metrics: Vec::new(),
                    notes: String::new(),
                    completed: false,
                }],
            },
            created_at: created_at.map(|s| Timestamp::from_second(s).unwrap()),
        }
    }

    fn ids(records: &[TimelineRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_order_newest_first_when_all_timestamped() {
        let ordered = order_records(vec![
            record("a", Some(100)),
            record("b", Some(300)),
            record("c", Some(200)),
        ]);
        assert_eq!(ids(&ordered), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_order_falls_back_to_store_order_when_a_timestamp_is_missing() {
        let ordered = order_records(vec![
            record("a", Some(100)),
            record("b", None),
            record("c", Some(200)),
        ]);
        assert_eq!(ids(&ordered), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_reconcile_keeps_pending_edits() {
        let mut local = LocalRecords::default();
        local.switch_owner(&OwnerId::from("u1"));
        local
            .pending_toggles
            .insert((RecordId::from("a"), 0), true);
        local.pending_deletes.insert(RecordId::from("b"));

        local.reconcile(vec![record("a", None), record("b", None), record("c", None)]);

        assert_eq!(ids(&local.entries), vec!["a", "c"]);
        assert!(local.entries[0].timeline.phases[0].completed);
        assert!(!local.entries[1].timeline.phases[0].completed);
    }

    #[test]
    fn test_switching_owner_clears_local_state() {
        let mut local = LocalRecords::default();
        local.switch_owner(&OwnerId::from("u1"));
        local.entries.push(record("a", None));
        local.pending_deletes.insert(RecordId::from("a"));

        local.switch_owner(&OwnerId::from("u1"));
        assert_eq!(local.entries.len(), 1);

        local.switch_owner(&OwnerId::from("u2"));
        assert!(local.entries.is_empty());
        assert!(local.pending_deletes.is_empty());
    }
}
