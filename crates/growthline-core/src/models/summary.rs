//! Record summary model for history lists.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{RecordId, TimelineRecord};

/// Compact view of a saved timeline used by history listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordSummary {
    /// Record id
    pub id: RecordId,

    /// Timeline title
    pub title: String,

    /// Business type the timeline was generated for
    pub business_type: String,

    /// Total number of phases
    pub total_phases: usize,

    /// Number of phases marked completed
    pub completed_phases: usize,

    /// Server creation time, when resolved
    pub created_at: Option<Timestamp>,
}

impl From<&TimelineRecord> for RecordSummary {
    fn from(record: &TimelineRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.timeline.title.clone(),
            business_type: record.inputs.business_type.clone(),
            total_phases: record.timeline.phases.len(),
            completed_phases: record.timeline.completed_phases(),
            created_at: record.created_at,
        }
    }
}
