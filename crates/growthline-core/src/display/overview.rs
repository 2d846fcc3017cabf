//! Compact one-row-per-phase strip shown above the timeline detail.

use std::fmt;

use crate::models::Timeline;

/// Number of focus areas shown per phase in the overview.
const FOCUS_PREVIEW_LEN: usize = 2;

/// First focus areas of a phase, `...` when some were cut, `N/A` when there
/// are none.
pub fn focus_preview(focus_areas: &[String]) -> String {
    if focus_areas.is_empty() {
        return "N/A".to_string();
    }
    let mut preview = focus_areas
        .iter()
        .take(FOCUS_PREVIEW_LEN)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if focus_areas.len() > FOCUS_PREVIEW_LEN {
        preview.push_str("...");
    }
    preview
}

/// Markdown table summarizing every phase of a timeline.
///
/// # Examples
///
/// ```rust
/// use growthline_core::{display::TimelineOverview, models::Timeline};
///
/// let timeline = Timeline { title: "Plan".to_string(), phases: vec![] };
/// assert!(TimelineOverview(&timeline).to_string().is_empty());
/// ```
pub struct TimelineOverview<'a>(pub &'a Timeline);

impl fmt::Display for TimelineOverview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.phases.is_empty() {
            return Ok(());
        }

        writeln!(f, "## Timeline Overview")?;
        writeln!(f)?;
        writeln!(f, "| # | Phase | Duration | Focus |")?;
        writeln!(f, "|---|---|---|---|")?;
        for (index, phase) in self.0.phases.iter().enumerate() {
            writeln!(
                f,
                "| {} | {} | {} | {} |",
                index + 1,
                phase.name,
                phase.duration,
                focus_preview(&phase.focus_areas)
            )?;
        }
        Ok(())
    }
}
