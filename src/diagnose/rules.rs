//! Per-step parameter rules.

use super::report::Diagnostic;
use crate::compile::CompiledStep;
use crate::extract::ExtractionIssue;
use crate::normalize::StepType;
use crate::sequence::StepParams;

/// Run every parameter rule against one compiled step.
pub fn check_step(compiled: &CompiledStep, findings: &mut Vec<Diagnostic>) {
    let step = &compiled.step;
    let mut push = |d: Diagnostic| findings.push(d.at(&step.id, compiled.node));

    if let StepType::Other(name) = &step.step_type {
        push(Diagnostic::warning(
            "W008",
            format!("Unknown step type '{}'", name),
        ));
    }

    for issue in &compiled.issues {
        match issue {
            ExtractionIssue::MissingBlob if step.step_type.is_terminal() => {}
            ExtractionIssue::MissingBlob => push(Diagnostic::warning(
                "W002",
                "Step has no parameter data; defaults used",
            )),
            ExtractionIssue::MalformedBlob { reason } => push(Diagnostic::error(
                "E003",
                format!("Parameter data could not be parsed: {}", reason),
            )),
            ExtractionIssue::InvalidField { field, found } => push(Diagnostic::warning(
                "W012",
                format!("Field '{}' has invalid value {}; default used", field, found),
            )),
        }
    }

    match &step.params {
        StepParams::Motion(p) => {
            if p.axis.trim().is_empty() {
                push(Diagnostic::warning("W003", "MOTION axis is empty"));
            }
            if p.pos == 0.0 {
                push(Diagnostic::warning("W004", "MOTION position is 0"));
            }
            if p.speed == 0.0 {
                push(Diagnostic::warning("W005", "MOTION speed is 0"));
            }
        }
        StepParams::Wait(p) => {
            if p.delay_ms == 0 {
                push(Diagnostic::warning("W006", "WAIT delay is 0"));
            }
        }
        StepParams::Counter(p) => {
            if p.name.trim().is_empty() {
                push(Diagnostic::warning("W007", "COUNTER name is empty"));
            }
        }
        StepParams::Goto(p) => {
            if p.to.trim().is_empty() {
                push(Diagnostic::error("E002", "GOTO target is empty"));
            }
        }
        StepParams::LinearMove(_)
        | StepParams::RelMove(_)
        | StepParams::CircularMove(_)
        | StepParams::Passthrough(_) => {}
    }
}
