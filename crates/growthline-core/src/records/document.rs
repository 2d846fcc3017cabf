//! Mapping between [`TimelineRecord`] and its stored document body.
//!
//! The inputs are flattened into the top level of the document next to the
//! embedded timeline, and the owner and namespace are repeated as `userId` and
//! `appId`:
//!
//! ```json
//! {
//!   "growthGoals": "...", "businessType": "...", "businessPosition": "...",
//!   "timeline": { "timelineTitle": "...", "phases": [ ... ] },
//!   "createdAt": "2024-05-01T09:30:00Z",
//!   "appId": "default-growth-timeline-app",
//!   "userId": "..."
//! }
//! ```

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::{Result, TimelineError},
    models::{AppNamespace, BusinessInputs, OwnerId, RecordId, Timeline, TimelineRecord},
    store::{Document, Fields, NewDocument},
};

/// Field holding the server-assigned creation time.
pub const CREATED_AT_FIELD: &str = "createdAt";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutgoingRecord<'a> {
    growth_goals: &'a str,
    business_type: &'a str,
    business_position: &'a str,
    timeline: &'a Timeline,
    app_id: &'a AppNamespace,
    user_id: &'a OwnerId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecord {
    #[serde(default)]
    growth_goals: String,
    #[serde(default)]
    business_type: String,
    #[serde(default)]
    business_position: String,
    timeline: Timeline,
    #[serde(default)]
    app_id: Option<AppNamespace>,
    #[serde(default)]
    user_id: Option<OwnerId>,
    #[serde(default)]
    created_at: Option<Timestamp>,
}

/// Builds the document written when a record is first saved. `createdAt` is
/// left for the store to fill.
pub fn encode(
    namespace: &AppNamespace,
    owner: &OwnerId,
    inputs: &BusinessInputs,
    timeline: &Timeline,
) -> Result<NewDocument> {
    let outgoing = OutgoingRecord {
        growth_goals: &inputs.growth_goals,
        business_type: &inputs.business_type,
        business_position: &inputs.business_position,
        timeline,
        app_id: namespace,
        user_id: owner,
    };

    let fields: Fields = match serde_json::to_value(&outgoing)? {
        Value::Object(map) => map,
        other => {
            return Err(TimelineError::Configuration {
                message: format!("record encoded to a non-object value: {other}"),
            })
        }
    };

    Ok(NewDocument::new(fields).with_server_timestamp(CREATED_AT_FIELD))
}

/// Reads a stored document back into a record.
///
/// `namespace` and `owner` fill in for documents that predate the `appId` and
/// `userId` fields; the collection path already scopes them.
pub fn decode(
    document: &Document,
    namespace: &AppNamespace,
    owner: &OwnerId,
) -> Result<TimelineRecord> {
    let stored: StoredRecord = serde_json::from_value(Value::Object(document.fields.clone()))?;

    Ok(TimelineRecord {
        id: RecordId(document.id.clone()),
        owner: stored.user_id.unwrap_or_else(|| owner.clone()),
        app_namespace: stored.app_id.unwrap_or_else(|| namespace.clone()),
        inputs: BusinessInputs {
            growth_goals: stored.growth_goals,
            business_type: stored.business_type,
            business_position: stored.business_position,
        },
        timeline: stored.timeline,
        created_at: stored.created_at,
    })
}

/// Field path of one phase's completion flag.
pub fn completion_field(phase_index: usize) -> String {
    format!("timeline.phases.{phase_index}.completed")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::Phase;

    fn timeline() -> Timeline {
        Timeline {
            title: "Bakery Growth Plan".to_string(),
            phases: vec![Phase {
                name: "Foundation".to_string(),
                duration: "Months 1-6".to_string(),
                objectives: vec!["Stabilize cash flow".to_string()],
                focus_areas: vec!["Operations".to_string()],
                metrics: vec!["Monthly revenue".to_string()],
                notes: "Focus on unit economics.".to_string(),
                completed: false,
            }],
        }
    }

    #[test]
    fn test_encode_flattens_inputs_and_requests_server_timestamp() {
        let inputs = BusinessInputs {
            growth_goals: "Second location".to_string(),
            business_type: "Local bakery".to_string(),
            business_position: "1 year old".to_string(),
        };
        let doc = encode(
            &AppNamespace::default(),
            &OwnerId::from("u1"),
            &inputs,
            &timeline(),
        )
        .unwrap();

        assert_eq!(doc.fields["businessType"], "Local bakery");
        assert_eq!(doc.fields["growthGoals"], "Second location");
        assert_eq!(doc.fields["userId"], "u1");
        assert_eq!(doc.fields["appId"], AppNamespace::DEFAULT);
        assert_eq!(doc.fields["timeline"]["timelineTitle"], "Bakery Growth Plan");
        assert!(!doc.fields.contains_key(CREATED_AT_FIELD));
        assert_eq!(doc.server_timestamps, vec![CREATED_AT_FIELD.to_string()]);
    }

    #[test]
    fn test_decode_tolerates_missing_metadata() {
        let fields = match json!({
            "businessType": "Cafe",
            "timeline": {
                "timelineTitle": "Plan",
                "phases": [{
                    "phaseName": "One",
                    "duration": "Q1",
                    "keyObjectives": [],
                    "focusAreas": [],
                    "potentialMetrics": [],
                    "notes": ""
                }]
            }
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let document = Document {
            id: "abc".to_string(),
            fields,
            create_time: None,
            update_time: None,
        };

        let record = decode(&document, &AppNamespace::from("ns"), &OwnerId::from("u9")).unwrap();
        assert_eq!(record.id.as_str(), "abc");
        assert_eq!(record.owner.as_str(), "u9");
        assert_eq!(record.app_namespace.as_str(), "ns");
        assert_eq!(record.inputs.business_type, "Cafe");
        assert!(record.created_at.is_none());
        assert!(!record.timeline.phases[0].completed);
    }

    #[test]
    fn test_decode_reads_created_at() {
        let mut fields = encode(
            &AppNamespace::default(),
            &OwnerId::from("u1"),
            &BusinessInputs::default(),
            &timeline(),
        )
        .unwrap()
        .fields;
        fields.insert(CREATED_AT_FIELD.to_string(), json!("2024-05-01T09:30:00Z"));
        let document = Document {
            id: "x".to_string(),
            fields,
            create_time: None,
            update_time: None,
        };

        let record = decode(&document, &AppNamespace::default(), &OwnerId::from("u1")).unwrap();
        assert_eq!(
            record.created_at,
            Some("2024-05-01T09:30:00Z".parse::<Timestamp>().unwrap())
        );
    }

    #[test]
    fn test_completion_field_path() {
        assert_eq!(completion_field(2), "timeline.phases.2.completed");
    }
}
