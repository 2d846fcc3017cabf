//! Hierarchical collection and document paths.

use std::fmt;

use crate::error::{Result, TimelineError};

/// Path of a collection: an odd number of segments, alternating collection
/// and document ids, e.g. `artifacts/app/users/u1/timelines`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath {
    segments: Vec<String>,
}

/// Path of a single document inside a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentPath {
    collection: CollectionPath,
    id: String,
}

fn check_segment(segment: &str) -> Result<()> {
    if segment.is_empty() {
        return Err(TimelineError::validation("path").with_reason("path segments must not be empty"));
    }
    if segment.contains('/') {
        return Err(TimelineError::validation("path")
            .with_reason(format!("path segment '{segment}' must not contain '/'")));
    }
    Ok(())
}

impl CollectionPath {
    /// Builds a collection path from its segments.
    ///
    /// # Errors
    ///
    /// Returns `TimelineError::Validation` when a segment is empty, contains a
    /// slash, or the segment count is even (which would name a document).
    pub fn new<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.len() % 2 == 0 {
            return Err(TimelineError::validation("path")
                .with_reason("a collection path needs an odd number of segments"));
        }
        for segment in &segments {
            check_segment(segment)?;
        }
        Ok(Self { segments })
    }

    /// Parses a slash separated collection path.
    pub fn parse(path: &str) -> Result<Self> {
        Self::new(path.split('/'))
    }

    /// Addresses a document in this collection.
    pub fn doc(&self, id: impl Into<String>) -> Result<DocumentPath> {
        let id = id.into();
        check_segment(&id)?;
        Ok(DocumentPath {
            collection: self.clone(),
            id,
        })
    }
}

impl DocumentPath {
    pub fn collection(&self) -> &CollectionPath {
        &self.collection
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}
