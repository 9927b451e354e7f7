//! Ingestion of externally generated sequences.
//!
//! A text-generation service is prompted to answer with a sequence in the
//! compiled shape, but answers arrive as free text and use a flatter parameter
//! schema (`target_x`, `to_step`, …). This module recovers the JSON object and
//! canonicalizes it into a `Sequence`.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};

use crate::compile::step_id;
use crate::error::CompilerError;
use crate::extract::extract_from_value;
use crate::normalize::{StepType, normalize_type};
use crate::options::CompileOptions;
use crate::sequence::{Sequence, Step, StepParams};

#[derive(Debug, Deserialize)]
struct GeneratedSequence {
    #[serde(default)]
    sequence_name: Option<String>,
    #[serde(default)]
    steps: Vec<GeneratedStep>,
}

#[derive(Debug, Deserialize)]
struct GeneratedStep {
    #[serde(default)]
    id: String,
    #[serde(rename = "type")]
    step_type: String,
    #[serde(default)]
    params: Option<Value>,
    #[serde(default)]
    next: Option<String>,
}

/// The outermost `{ … }` span of a free-text response.
pub fn extract_json_object(text: &str) -> Result<&str, CompilerError> {
    let start = text.find('{');
    let end = text.rfind('}');
    match (start, end) {
        (Some(s), Some(e)) if e > s => Ok(&text[s..=e]),
        _ => Err(CompilerError::ingest(
            "I001",
            "No JSON object found in generated text",
        )),
    }
}

/// Turn a generated response into a canonical sequence.
///
/// Step types are normalized. Typed steps have their params re-resolved so
/// flat or legacy keys land in the canonical shape; other steps keep their
/// params object as given. A missing `next` points at the following step.
pub fn ingest_sequence(text: &str, options: &CompileOptions) -> Result<Sequence, CompilerError> {
    let json = extract_json_object(text)?;
    let generated: GeneratedSequence = serde_json::from_str(json).map_err(|e| {
        CompilerError::ingest(
            "I002",
            format!("Generated JSON is not a sequence: {}", e),
        )
    })?;

    let ids: Vec<String> = generated
        .steps
        .iter()
        .enumerate()
        .map(|(i, s)| {
            if s.id.trim().is_empty() {
                step_id(i)
            } else {
                s.id.clone()
            }
        })
        .collect();

    let steps: Vec<Step> = generated
        .steps
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            let step_type = normalize_type(&s.step_type);
            let params = if has_verbatim_params(&step_type) {
                match s.params {
                    Some(Value::Object(map)) => StepParams::Passthrough(map),
                    _ => StepParams::empty(),
                }
            } else {
                let extraction = extract_from_value(&step_type, s.params.as_ref());
                if !extraction.issues.is_empty() {
                    trace!(step = %ids[i], issues = ?extraction.issues, "generated params defaulted");
                }
                extraction.params
            };
            let next = s.next.or_else(|| ids.get(i + 1).cloned());
            Step {
                id: ids[i].clone(),
                step_type,
                params,
                next,
            }
        })
        .collect();

    let sequence_name = generated
        .sequence_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| options.sequence_name.clone());
    debug!(steps = steps.len(), name = %sequence_name, "ingested generated sequence");

    Ok(Sequence {
        sequence_name,
        steps,
    })
}

/// Types without a typed parameter record keep generated params verbatim.
fn has_verbatim_params(step_type: &StepType) -> bool {
    matches!(
        step_type,
        StepType::Start | StepType::End | StepType::Io | StepType::Other(_)
    )
}
