//! Diagnostic report data and its plain-text rendering.

use std::fmt;

use serde::Serialize;

use super::writer::ReportWriter;
use crate::graph::NodeId;
use crate::normalize::StepType;
use crate::sequence::StepParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub code: &'static str,
    pub severity: Severity,
    pub message: String,
    /// The step the finding is about, if it is about one step.
    pub step_id: Option<String>,
    pub node: Option<NodeId>,
}

impl Diagnostic {
    pub fn warning(code: &'static str, message: impl Into<String>) -> Self {
        Diagnostic {
            code,
            severity: Severity::Warning,
            message: message.into(),
            step_id: None,
            node: None,
        }
    }

    pub fn error(code: &'static str, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            ..Diagnostic::warning(code, message)
        }
    }

    pub fn at(mut self, step_id: &str, node: NodeId) -> Self {
        self.step_id = Some(step_id.to_string());
        self.node = Some(node);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.step_id {
            Some(id) => write!(f, "[{}] {}: {}", self.code, id, self.message),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

/// Where a step's output port leads in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Outgoing {
    NoOutputPort,
    Unconnected,
    /// `target` is the step the first connection leads to; `connections`
    /// counts every connection on the port.
    Connected { target: String, connections: usize },
}

impl fmt::Display for Outgoing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outgoing::NoOutputPort => write!(f, "no output port"),
            Outgoing::Unconnected => write!(f, "not connected"),
            Outgoing::Connected {
                target,
                connections: 1,
            } => write!(f, "-> {}", target),
            Outgoing::Connected {
                target,
                connections,
            } => write!(f, "-> {} (first of {} connections)", target, connections),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepEntry {
    pub step_id: String,
    pub step_type: StepType,
    pub label: String,
    pub raw_type: String,
    pub has_params: bool,
    pub params: StepParams,
    pub outgoing: Outgoing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeCount {
    pub step_type: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticReport {
    pub steps: Vec<StepEntry>,
    /// Step types in order of first appearance.
    pub type_counts: Vec<TypeCount>,
    pub warnings: Vec<Diagnostic>,
    pub errors: Vec<Diagnostic>,
}

impl DiagnosticReport {
    pub fn passed(&self) -> bool {
        self.warnings.is_empty() && self.errors.is_empty()
    }

    /// Every finding, warnings first.
    pub fn findings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.warnings.iter().chain(self.errors.iter())
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.findings().any(|d| d.code == code)
    }

    /// Findings about step `step_id`.
    pub fn findings_for<'a>(
        &'a self,
        step_id: &'a str,
    ) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.findings()
            .filter(move |d| d.step_id.as_deref() == Some(step_id))
    }

    pub fn render(&self) -> String {
        let mut w = ReportWriter::new();
        w.line("=== Sequence Diagnostics ===");
        w.blank();

        w.section("Steps");
        for entry in &self.steps {
            w.line(&format!(
                "{} {} \"{}\" (raw: {})",
                entry.step_id, entry.step_type, entry.label, entry.raw_type
            ));
            w.indent();
            w.line(&format!(
                "parameters: {}",
                if entry.has_params { "present" } else { "none" }
            ));
            w.line(&format!("resolved: {}", entry.params.to_compact_json()));
            w.line(&format!("outgoing: {}", entry.outgoing));
            w.dedent();
        }
        w.end_section();

        w.section("Type Counts");
        for tc in &self.type_counts {
            w.line(&format!("{}: {}", tc.step_type, tc.count));
        }
        w.end_section();

        render_findings(&mut w, "Warnings", &self.warnings);
        render_findings(&mut w, "Errors", &self.errors);

        if self.passed() {
            w.line("Result: PASS");
        } else {
            w.line(&format!(
                "Result: FAIL (warnings: {}, errors: {})",
                self.warnings.len(),
                self.errors.len()
            ));
        }
        w.finish()
    }
}

fn render_findings(w: &mut ReportWriter, title: &str, findings: &[Diagnostic]) {
    w.line(&format!("[{}] ({})", title, findings.len()));
    w.indent();
    if findings.is_empty() {
        w.line("(none)");
    }
    for (i, d) in findings.iter().enumerate() {
        w.line(&format!("{}. {}", i + 1, d));
    }
    w.end_section();
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
