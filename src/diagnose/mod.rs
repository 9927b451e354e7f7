//! Pre-flight diagnostics over the compiled step list.
//!
//! Re-runs linearization and extraction, then classifies everything suspicious
//! as a warning or an error. Findings never stop compilation.

pub mod report;
pub mod rules;
pub mod structural;
mod writer;

use std::collections::HashSet;

use tracing::debug;

use crate::compile::{compile_steps, step_ids};
use crate::error::CompilerError;
use crate::graph::{Graph, TopologyView};
use crate::linearize::linearize;

pub use report::{Diagnostic, DiagnosticReport, Outgoing, Severity, StepEntry, TypeCount};

/// Analyze the graph and build the full diagnostic report.
pub fn analyze(graph: &Graph) -> Result<DiagnosticReport, CompilerError> {
    if graph.is_empty() {
        return Err(CompilerError::nothing_to_compile());
    }

    let linear = linearize(graph);
    let compiled = compile_steps(graph, &linear);
    let ids = step_ids(&compiled);
    let view = TopologyView::build(graph);
    let reachable: HashSet<_> = linear
        .entry
        .map(|entry| view.reachable_from(entry).into_iter().collect())
        .unwrap_or_default();

    let mut findings = Vec::new();
    structural::check_entry(graph, &mut findings);

    let mut steps = Vec::with_capacity(compiled.len());
    let mut type_counts: Vec<TypeCount> = Vec::new();
    for c in &compiled {
        let Some(node) = graph.node(c.node) else {
            continue;
        };

        rules::check_step(c, &mut findings);
        structural::check_placement(graph, &linear, &reachable, c.node, &c.step.id, &mut findings);

        let outgoing = match node.output_port() {
            None => Outgoing::NoOutputPort,
            Some(_) => {
                let connections: Vec<_> = graph.outgoing(c.node).collect();
                match connections.first() {
                    None => Outgoing::Unconnected,
                    Some(first) => Outgoing::Connected {
                        target: ids
                            .get(&first.target)
                            .cloned()
                            .unwrap_or_else(|| first.target.to_string()),
                        connections: connections.len(),
                    },
                }
            }
        };

        let type_name = c.step.step_type.as_str();
        match type_counts.iter_mut().find(|tc| tc.step_type == type_name) {
            Some(tc) => tc.count += 1,
            None => type_counts.push(TypeCount {
                step_type: type_name.to_string(),
                count: 1,
            }),
        }

        steps.push(StepEntry {
            step_id: c.step.id.clone(),
            step_type: c.step.step_type.clone(),
            label: node.label.clone(),
            raw_type: node.raw_type.clone(),
            has_params: node.has_params(),
            params: c.step.params.clone(),
            outgoing,
        });
    }

    structural::check_cycles(&view, &ids, &mut findings);

    let (warnings, errors): (Vec<_>, Vec<_>) = findings
        .into_iter()
        .partition(|d| d.severity == Severity::Warning);
    debug!(
        steps = steps.len(),
        warnings = warnings.len(),
        errors = errors.len(),
        "diagnostics complete"
    );

    Ok(DiagnosticReport {
        steps,
        type_counts,
        warnings,
        errors,
    })
}
