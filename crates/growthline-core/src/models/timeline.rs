//! Timeline and phase models.

use serde::{Deserialize, Serialize};

/// A generated growth timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Timeline {
    /// Display title of the whole timeline
    #[serde(rename = "timelineTitle")]
    pub title: String,

    /// Chronologically ordered phases
    pub phases: Vec<Phase>,
}

/// One chronological stage of a timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    /// Name of the phase, e.g. "Year 1: Foundation & Early Traction"
    #[serde(rename = "phaseName")]
    pub name: String,

    /// Suggested duration, e.g. "Months 1-6"
    pub duration: String,

    /// Key objectives or activities
    #[serde(rename = "keyObjectives")]
    pub objectives: Vec<String>,

    /// Primary areas of focus
    pub focus_areas: Vec<String>,

    /// Metrics to track progress
    #[serde(rename = "potentialMetrics")]
    pub metrics: Vec<String>,

    /// Free-text advice, may be empty
    #[serde(default)]
    pub notes: String,

    /// Whether the user marked the phase as done. Documents written before
    /// completion tracking existed carry no flag.
    #[serde(default)]
    pub completed: bool,
}

impl Timeline {
    /// Number of phases marked as completed.
    pub fn completed_phases(&self) -> usize {
        self.phases.iter().filter(|p| p.completed).count()
    }
}
