//! Persisted timeline record model.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{AppNamespace, OwnerId, RecordId, Timeline};

/// The three free-text inputs a timeline was generated from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BusinessInputs {
    /// Key growth goals, e.g. "Open second location in 18 months"
    pub growth_goals: String,

    /// Business type or industry, e.g. "Local bakery"
    pub business_type: String,

    /// Current business position, e.g. "1 year old, 2 employees"
    pub business_position: String,
}

/// A persisted timeline together with its originating inputs and ownership
/// metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineRecord {
    /// Document id, unique within the owner's collection
    pub id: RecordId,

    /// User the record belongs to, immutable after creation
    pub owner: OwnerId,

    /// Deployment partition key
    pub app_namespace: AppNamespace,

    /// Inputs the timeline was generated from, immutable once saved
    pub inputs: BusinessInputs,

    /// The generated timeline
    pub timeline: Timeline,

    /// Server-assigned creation time. Absent while a write has not resolved
    /// its server timestamp.
    pub created_at: Option<Timestamp>,
}

impl TimelineRecord {
    /// Looks up a phase by index.
    pub fn phase(&self, index: usize) -> Option<&super::Phase> {
        self.timeline.phases.get(index)
    }
}
