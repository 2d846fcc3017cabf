//! Prompt text and response schema sent to the generation endpoint.

use serde_json::{json, Value};

use crate::params::GenerateTimeline;

/// Builds the natural-language instruction for a timeline request.
pub fn build_prompt(params: &GenerateTimeline) -> String {
    format!(
        "Analyze the following business information and generate a strategic growth timeline.\n\
         The timeline should be based on common growth models, industry best practices, and \
         patterns observed in similar successful businesses.\n\
         Provide a detailed, actionable, and phased approach.\n\
         \n\
         Business Type/Industry: {}\n\
         Current Business Position: {}\n\
         Key Growth Goals: {}\n\
         \n\
         Please structure your response as a JSON object adhering to the following schema.\n\
         The timeline should include a main title and several distinct phases. Each phase should \
         have a name, suggested duration, key objectives, primary focus areas, potential metrics \
         to track, and any relevant notes or advice.",
        params.business_type.trim(),
        params.business_position.trim(),
        params.growth_goals.trim(),
    )
}

fn string_list(description: &str) -> Value {
    json!({
        "type": "ARRAY",
        "description": description,
        "items": { "type": "STRING" }
    })
}

/// Declarative shape constraint for the generated document. Every field is
/// required.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "timelineTitle": {
                "type": "STRING",
                "description": "A concise title for the overall growth timeline (e.g., 'Strategic Growth Roadmap for [Business Type]')."
            },
            "phases": {
                "type": "ARRAY",
                "description": "An array of distinct phases or major milestones in the growth timeline.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "phaseName": {
                            "type": "STRING",
                            "description": "Name of the growth phase (e.g., 'Year 1: Foundation & Early Traction')."
                        },
                        "duration": {
                            "type": "STRING",
                            "description": "Suggested duration for this phase (e.g., 'Months 1-6', 'Q1-Q2 202X')."
                        },
                        "keyObjectives": string_list(
                            "List of key objectives or activities for this phase (e.g., 'Develop MVP', 'Secure first 10 clients')."
                        ),
                        "focusAreas": string_list(
                            "Primary areas of focus during this phase (e.g., 'Product Development', 'Market Research', 'Initial Sales & Marketing')."
                        ),
                        "potentialMetrics": string_list(
                            "Key performance indicators or metrics to track progress (e.g., 'User Acquisition Rate', 'Customer Lifetime Value', 'Monthly Recurring Revenue')."
                        ),
                        "notes": {
                            "type": "STRING",
                            "description": "Any additional notes, advice, warnings, or considerations for this phase based on similar businesses or common pitfalls."
                        }
                    },
                    "required": ["phaseName", "duration", "keyObjectives", "focusAreas", "potentialMetrics", "notes"]
                }
            }
        },
        "required": ["timelineTitle", "phases"]
    })
}
