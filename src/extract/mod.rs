//! Parameter extraction: raw parameter document → typed parameter record.
//!
//! Extraction never fails. Missing or malformed input resolves to per-type
//! defaults and is reported back as `ExtractionIssue`s for the analyzer.

pub mod fields;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::normalize::StepType;
use crate::sequence::{
    CircularMoveParams, CounterParams, GotoParams, LinearMoveParams, MotionParams, Point2, Point3,
    RelMoveParams, StepParams, WaitParams,
};
use fields::FieldReader;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ExtractionIssue {
    /// No parameter document at all.
    MissingBlob,
    /// A document is present but is not a JSON object.
    MalformedBlob { reason: String },
    /// A candidate key for `field` existed but held the wrong kind of value.
    InvalidField { field: String, found: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub params: StepParams,
    pub issues: Vec<ExtractionIssue>,
}

const POSITION_KEYS: &[&str] = &["target_position", "position", "pos"];
const DELAY_KEYS: &[&str] = &["delay_ms", "delay"];
const GOTO_TARGET_KEYS: &[&str] = &["to", "label", "jump_target", "to_step"];

/// Extract the parameters of a node from its raw, unparsed document.
pub fn extract_params(step_type: &StepType, raw: Option<&str>) -> Extraction {
    let raw = raw.map(str::trim).filter(|r| !r.is_empty());
    let Some(raw) = raw else {
        return extract_from_value(step_type, None);
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(doc) => extract_from_value(step_type, Some(&doc)),
        Err(e) => {
            let mut extraction = extract_from_value(step_type, None);
            extraction.issues = vec![ExtractionIssue::MalformedBlob {
                reason: e.to_string(),
            }];
            extraction
        }
    }
}

/// Extract the parameters of a node from an already-parsed document.
pub fn extract_from_value(step_type: &StepType, doc: Option<&Value>) -> Extraction {
    let (root, mut issues) = match doc {
        None => (None, vec![ExtractionIssue::MissingBlob]),
        Some(Value::Object(map)) => (Some(map), Vec::new()),
        Some(other) => (
            None,
            vec![ExtractionIssue::MalformedBlob {
                reason: format!("expected a JSON object, found {}", kind_name(other)),
            }],
        ),
    };

    let mut r = FieldReader::new(root);
    let params = match step_type {
        StepType::Motion => StepParams::Motion(MotionParams {
            axis: r.text("axis", &["axis"], ""),
            pos: r.number("position", POSITION_KEYS, 0.0),
            speed: r.number("speed", &["speed"], 0.0),
        }),
        StepType::Wait => StepParams::Wait(WaitParams {
            delay_ms: r.integer("delay", DELAY_KEYS, 0),
        }),
        StepType::LinearMove => StepParams::LinearMove(LinearMoveParams {
            target: Point3 {
                x: r.number("target.X", &["target.X", "target.x", "target_x"], 0.0),
                y: r.number("target.Y", &["target.Y", "target.y", "target_y"], 0.0),
                z: r.number("target.Z", &["target.Z", "target.z", "target_z"], 0.0),
            },
            speed: r.number("speed", &["speed"], 0.0),
        }),
        StepType::RelMove => StepParams::RelMove(RelMoveParams {
            axis: r.text("axis", &["axis"], ""),
            distance: r.number("distance", &["distance", "dist"], 0.0),
            speed: r.number("speed", &["speed"], 0.0),
        }),
        StepType::CircularMove => StepParams::CircularMove(CircularMoveParams {
            center: Point2 {
                x: r.number("center.X", &["center.X", "center.x", "center_x"], 0.0),
                y: r.number("center.Y", &["center.Y", "center.y", "center_y"], 0.0),
            },
            end: Point2 {
                x: r.number("end.X", &["end.X", "end.x", "end_x"], 0.0),
                y: r.number("end.Y", &["end.Y", "end.y", "end_y"], 0.0),
            },
            direction: direction(&mut r),
        }),
        StepType::Counter => StepParams::Counter(CounterParams {
            name: r.text("name", &["name"], ""),
            initial: r.integer("initial", &["initial"], 0),
            target: r.integer("target", &["target"], 0),
            increment: r.integer("increment", &["increment"], 1),
        }),
        StepType::Goto => StepParams::Goto(GotoParams {
            to: r.text("to", GOTO_TARGET_KEYS, ""),
            description: r.text("description", &["description"], ""),
        }),
        StepType::Start | StepType::End | StepType::Io | StepType::Other(_) => {
            StepParams::Passthrough(embedded_params(&r))
        }
    };

    issues.extend(r.finish());
    Extraction { params, issues }
}

fn direction(r: &mut FieldReader<'_>) -> String {
    let raw = r.text("direction", &["direction", "dir"], "CW");
    let upper = raw.trim().to_uppercase();
    if upper == "CW" || upper == "CCW" {
        upper
    } else {
        r.invalid("direction", &Value::String(raw));
        "CW".to_string()
    }
}

fn embedded_params(r: &FieldReader<'_>) -> Map<String, Value> {
    r.object("params").cloned().unwrap_or_default()
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_document_reports_single_issue() {
        let e = extract_params(&StepType::Wait, Some("{not json"));
        assert_eq!(e.params, StepParams::Wait(WaitParams { delay_ms: 0 }));
        assert!(matches!(e.issues.as_slice(), [ExtractionIssue::MalformedBlob { .. }]));
    }

    #[test]
    fn blank_document_counts_as_missing() {
        let e = extract_params(&StepType::Start, Some("   "));
        assert_eq!(e.params, StepParams::empty());
        assert_eq!(e.issues, vec![ExtractionIssue::MissingBlob]);
    }

    #[test]
    fn non_object_document_is_malformed() {
        let e = extract_params(&StepType::Motion, Some("[1,2,3]"));
        assert!(matches!(
            e.issues.as_slice(),
            [ExtractionIssue::MalformedBlob { reason }] if reason.contains("an array")
        ));
    }

    #[test]
    fn direction_is_normalized() {
        let e = extract_params(&StepType::CircularMove, Some(r#"{"direction":"ccw"}"#));
        match e.params {
            StepParams::CircularMove(p) => assert_eq!(p.direction, "CCW"),
            other => panic!("expected circular move params, got {:?}", other),
        }

        let e = extract_params(&StepType::CircularMove, Some(r#"{"direction":"left"}"#));
        match &e.params {
            StepParams::CircularMove(p) => assert_eq!(p.direction, "CW"),
            other => panic!("expected circular move params, got {:?}", other),
        }
        assert_eq!(e.issues.len(), 1);
    }
}
