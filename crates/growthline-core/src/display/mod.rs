//! Markdown presentation of timelines, history and operation outcomes.
//!
//! Domain models implement `Display` directly ([`models`]); collections and
//! operation outcomes get newtype wrappers so every front end formats them the
//! same way.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Wrappers        │    │   Markdown      │
//! │ (Timeline, ...) │───▶│ (RecordSummaries│───▶│   (terminal)    │
//! │                 │    │  CreateResult)  │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! - [`models`]: timeline detail, record and summary rendering
//! - [`overview`]: the "Timeline Overview" strip
//! - [`collections`]: history listing
//! - [`results`]: create / update / delete outcomes
//! - [`status`]: success and failure lines
//! - [`datetime`]: local time formatting
//!
//! ```rust
//! use growthline_core::display::OperationStatus;
//!
//! let status = OperationStatus::failure("Failed to load saved timelines");
//! assert_eq!(status.to_string(), "Error: Failed to load saved timelines\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod overview;
pub mod results;
pub mod status;

pub use collections::RecordSummaries;
pub use datetime::{CreatedAt, LocalDateTime};
pub use models::{TimelineDetail, NO_NOTES};
pub use overview::{focus_preview, TimelineOverview};
pub use results::{CreateResult, DeleteResult, UpdateResult};
pub use status::OperationStatus;
