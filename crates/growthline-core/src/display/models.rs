//! Display implementations for domain models.
//!
//! Everything renders as markdown so the CLI can hand it to the terminal
//! renderer unchanged.

use std::fmt;

use super::{datetime::CreatedAt, overview::TimelineOverview};
use crate::models::{Phase, RecordSummary, Timeline, TimelineRecord};

/// Shown in place of empty phase notes.
pub const NO_NOTES: &str = "No specific notes for this phase.";

/// Full timeline rendering with an optional completion marker per phase.
pub struct TimelineDetail<'a> {
    pub timeline: &'a Timeline,
    pub show_completion: bool,
}

impl<'a> TimelineDetail<'a> {
    pub fn new(timeline: &'a Timeline) -> Self {
        Self {
            timeline,
            show_completion: true,
        }
    }

    /// Hides the per-phase completion marker.
    pub fn without_completion(mut self) -> Self {
        self.show_completion = false;
        self
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, heading: &str, items: &[String]) -> fmt::Result {
    writeln!(f, "#### {heading}")?;
    writeln!(f)?;
    if items.is_empty() {
        writeln!(f, "- N/A")?;
    }
    for item in items {
        writeln!(f, "- {item}")?;
    }
    writeln!(f)
}

impl Phase {
    fn fmt_phase(
        &self,
        f: &mut fmt::Formatter<'_>,
        number: usize,
        show_completion: bool,
    ) -> fmt::Result {
        write!(f, "### Phase {number}: {}", self.name)?;
        if show_completion {
            let marker = if self.completed {
                "✓ Completed"
            } else {
                "○ Open"
            };
            write!(f, " ({marker})")?;
        }
        writeln!(f)?;
        writeln!(f)?;
        writeln!(f, "- **Duration**: {}", self.duration)?;
        writeln!(f)?;

        write_list(f, "Key Objectives", &self.objectives)?;
        write_list(f, "Focus Areas", &self.focus_areas)?;
        write_list(f, "Potential Metrics", &self.metrics)?;

        writeln!(f, "#### Notes")?;
        writeln!(f)?;
        if self.notes.trim().is_empty() {
            writeln!(f, "{NO_NOTES}")?;
        } else {
            writeln!(f, "{}", self.notes)?;
        }
        writeln!(f)
    }
}

impl fmt::Display for TimelineDetail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.timeline.title)?;
        writeln!(f)?;

        if self.timeline.phases.is_empty() {
            return writeln!(f, "No phases in this timeline.");
        }

        write!(f, "{}", TimelineOverview(self.timeline))?;
        writeln!(f)?;

        for (index, phase) in self.timeline.phases.iter().enumerate() {
            phase.fmt_phase(f, index + 1, self.show_completion)?;
        }
        Ok(())
    }
}

impl fmt::Display for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", TimelineDetail::new(self))
    }
}

impl fmt::Display for TimelineRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- **ID**: {}", self.id)?;
        writeln!(f, "- **Business Type**: {}", self.inputs.business_type)?;
        writeln!(f, "- **Current Position**: {}", self.inputs.business_position)?;
        writeln!(f, "- **Growth Goals**: {}", self.inputs.growth_goals)?;
        writeln!(f, "- **Created**: {}", CreatedAt(self.created_at.as_ref()))?;
        writeln!(
            f,
            "- **Progress**: {}/{} phases completed",
            self.timeline.completed_phases(),
            self.timeline.phases.len()
        )?;
        writeln!(f)?;
        write!(f, "{}", self.timeline)
    }
}

impl fmt::Display for RecordSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "## {} ({}/{})",
            self.title, self.completed_phases, self.total_phases
        )?;
        writeln!(f)?;
        writeln!(f, "- **ID**: {}", self.id)?;
        writeln!(f, "- **Business Type**: {}", self.business_type)?;
        writeln!(f, "- **Created**: {}", CreatedAt(self.created_at.as_ref()))?;
        writeln!(f)
    }
}
