//! Data models for timelines and their persisted records.
//!
//! This module contains the core domain models of the growthline system.
//! Display implementations for these models are located in
//! [`crate::display::models`] to keep data structures apart from presentation
//! logic.
//!
//! The serialized field names of [`Timeline`] and [`Phase`] match the shape
//! requested from the generation endpoint (`timelineTitle`, `phaseName`,
//! `keyObjectives`, ...), so the generated payload, the stored document and the
//! in-memory value share a single type.
//!
//! # Examples
//!
//! ```rust
//! use growthline_core::models::{Phase, Timeline};
//!
//! let timeline: Timeline = serde_json::from_str(r#"{
//!     "timelineTitle": "Bakery Growth Plan",
//!     "phases": [{
//!         "phaseName": "Foundation",
//!         "duration": "Months 1-6",
//!         "keyObjectives": ["Stabilize cash flow"],
//!         "focusAreas": ["Operations"],
//!         "potentialMetrics": ["Monthly revenue"],
//!         "notes": "Focus on unit economics."
//!     }]
//! }"#).unwrap();
//!
//! assert_eq!(timeline.phases[0].name, "Foundation");
//! assert!(!timeline.phases[0].completed);
//! ```

pub mod ids;
pub mod record;
pub mod summary;
pub mod timeline;

#[cfg(test)]
mod tests;

pub use ids::{AppNamespace, OwnerId, RecordId};
pub use record::{BusinessInputs, TimelineRecord};
pub use summary::RecordSummary;
pub use timeline::{Phase, Timeline};
