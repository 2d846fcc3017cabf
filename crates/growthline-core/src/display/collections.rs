//! Collection wrapper for history listings.

use std::fmt;

use crate::models::{RecordSummary, TimelineRecord};

/// Newtype wrapper for displaying the saved-timelines history.
///
/// # Examples
///
/// ```rust
/// use growthline_core::display::RecordSummaries;
///
/// let empty = RecordSummaries(vec![]);
/// assert_eq!(empty.to_string(), "No saved timelines found.\n");
/// ```
pub struct RecordSummaries(pub Vec<RecordSummary>);

impl RecordSummaries {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RecordSummary> {
        self.0.iter()
    }
}

impl From<&[TimelineRecord]> for RecordSummaries {
    fn from(records: &[TimelineRecord]) -> Self {
        Self(records.iter().map(RecordSummary::from).collect())
    }
}

impl<'a> IntoIterator for &'a RecordSummaries {
    type Item = &'a RecordSummary;
    type IntoIter = std::slice::Iter<'a, RecordSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for RecordSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No saved timelines found.");
        }
        for summary in &self.0 {
            write!(f, "{summary}")?;
        }
        Ok(())
    }
}
