//! Compiled sequence types: the JSON program handed to the motion runner.
//!
//! Field order in each parameter record is the key order of the emitted JSON.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::CompilerError;
use crate::normalize::StepType;

pub const DEFAULT_SEQUENCE_NAME: &str = "Sequence";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sequence {
    pub sequence_name: String,
    pub steps: Vec<Step>,
}

impl Sequence {
    pub fn to_json_pretty(&self) -> Result<String, CompilerError> {
        serde_json::to_string_pretty(self).map_err(|e| {
            CompilerError::compile("C002", format!("Failed to serialize sequence: {}", e))
        })
    }

    pub fn step(&self, id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    pub id: String,
    #[serde(rename = "type")]
    pub step_type: StepType,
    pub params: StepParams,
    pub next: Option<String>,
}

/// Per-type parameter record. Serialized without a tag; the step's `type`
/// says which shape to expect.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StepParams {
    Motion(MotionParams),
    Wait(WaitParams),
    LinearMove(LinearMoveParams),
    RelMove(RelMoveParams),
    CircularMove(CircularMoveParams),
    Counter(CounterParams),
    Goto(GotoParams),
    /// START, END, IO and unknown types: the embedded `params` object, verbatim.
    Passthrough(Map<String, Value>),
}

impl StepParams {
    pub fn empty() -> Self {
        StepParams::Passthrough(Map::new())
    }

    /// Compact single-line JSON, as shown in diagnostic listings.
    pub fn to_compact_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MotionParams {
    pub axis: String,
    #[serde(serialize_with = "whole_number")]
    pub pos: f64,
    #[serde(serialize_with = "whole_number")]
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaitParams {
    pub delay_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Point3 {
    #[serde(rename = "X", serialize_with = "whole_number")]
    pub x: f64,
    #[serde(rename = "Y", serialize_with = "whole_number")]
    pub y: f64,
    #[serde(rename = "Z", serialize_with = "whole_number")]
    pub z: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Point2 {
    #[serde(rename = "X", serialize_with = "whole_number")]
    pub x: f64,
    #[serde(rename = "Y", serialize_with = "whole_number")]
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearMoveParams {
    pub target: Point3,
    #[serde(serialize_with = "whole_number")]
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelMoveParams {
    pub axis: String,
    #[serde(serialize_with = "whole_number")]
    pub distance: f64,
    #[serde(serialize_with = "whole_number")]
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircularMoveParams {
    pub center: Point2,
    pub end: Point2,
    pub direction: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CounterParams {
    pub name: String,
    pub initial: i64,
    pub target: i64,
    pub increment: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GotoParams {
    pub to: String,
    pub description: String,
}

/// Integral values are written without a fraction (`1000`, not `1000.0`).
fn whole_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if value.fract() == 0.0 && value.abs() <= MAX_EXACT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
