//! WASM entry points for the browser editor.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::diagnose::{self, DiagnosticReport};
use crate::error::CompilerError;
use crate::options::CompileOptions;
use crate::sequence::Sequence;

/// Full pipeline: project JSON → graph → compiled sequence.
/// Returns `{status: "success", sequence_name, steps}` or `{status: "errors", errors}`.
#[wasm_bindgen]
pub fn compile_project(project_json: &str, options_json: &str) -> JsValue {
    let result = compile_project_inner(project_json, options_json);
    to_js(&result)
}

fn compile_project_inner(project_json: &str, options_json: &str) -> CompileResult {
    let options = match CompileOptions::from_json(options_json) {
        Ok(o) => o,
        Err(e) => return CompileResult::Errors {
            errors: vec![ErrorDto::from(e)],
        },
    };

    let graph = match crate::project::restore(project_json) {
        Ok(g) => g,
        Err(e) => return CompileResult::Errors {
            errors: vec![ErrorDto::from(e)],
        },
    };

    match crate::compile::compile(&graph, &options) {
        Ok(sequence) => CompileResult::Success(sequence),
        Err(e) => CompileResult::Errors {
            errors: vec![ErrorDto::from(e)],
        },
    }
}

/// Project JSON → diagnostic report (data plus rendered text).
#[wasm_bindgen]
pub fn diagnose_project(project_json: &str) -> JsValue {
    let result = diagnose_project_inner(project_json);
    to_js(&result)
}

fn diagnose_project_inner(project_json: &str) -> DiagnoseResult {
    let report = crate::project::restore(project_json).and_then(|graph| diagnose::analyze(&graph));
    match report {
        Ok(report) => DiagnoseResult::Success {
            text: report.render(),
            report,
        },
        Err(e) => DiagnoseResult::Errors {
            errors: vec![ErrorDto::from(e)],
        },
    }
}

/// Free-text generator response → canonical sequence.
#[wasm_bindgen]
pub fn ingest_sequence(text: &str) -> JsValue {
    let result = ingest_sequence_inner(text);
    to_js(&result)
}

fn ingest_sequence_inner(text: &str) -> CompileResult {
    match crate::ingest::ingest_sequence(text, &CompileOptions::default()) {
        Ok(sequence) => CompileResult::Success(sequence),
        Err(e) => CompileResult::Errors {
            errors: vec![ErrorDto::from(e)],
        },
    }
}

/// Maps (pass-through params, nested JSON objects) become plain JS objects
/// rather than ES2015 `Map`s, so results survive `JSON.stringify`.
fn to_js<T: Serialize>(value: &T) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Serialize)]
struct ErrorDto {
    code: String,
    phase: String,
    message: String,
    node_id: Option<String>,
}

impl From<CompilerError> for ErrorDto {
    fn from(e: CompilerError) -> Self {
        ErrorDto {
            code: e.code,
            phase: e.phase.to_string(),
            message: e.message,
            node_id: e.node_id,
        }
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(tag = "status")]
enum CompileResult {
    #[serde(rename = "success")]
    Success(Sequence),
    #[serde(rename = "errors")]
    Errors { errors: Vec<ErrorDto> },
}

#[derive(Debug, serde::Serialize)]
#[serde(tag = "status")]
enum DiagnoseResult {
    #[serde(rename = "success")]
    Success {
        report: DiagnosticReport,
        text: String,
    },
    #[serde(rename = "errors")]
    Errors { errors: Vec<ErrorDto> },
}
