//! Sequence compilation: Graph → Sequence.

use std::collections::HashMap;

use tracing::debug;

use crate::error::CompilerError;
use crate::extract::{ExtractionIssue, extract_params};
use crate::graph::{Graph, NodeId};
use crate::linearize::{Linearization, linearize};
use crate::options::CompileOptions;
use crate::sequence::{Sequence, Step};

/// Step identifier for the step at 0-based `index`: `node_01`, `node_02`, …
pub fn step_id(index: usize) -> String {
    format!("node_{:02}", index + 1)
}

/// One compiled step together with the node it came from.
#[derive(Debug, Clone)]
pub struct CompiledStep {
    pub node: NodeId,
    pub step: Step,
    pub issues: Vec<ExtractionIssue>,
}

/// Build the steps for a linearized graph. `next` follows step order, not
/// graph connections.
pub fn compile_steps(graph: &Graph, linear: &Linearization) -> Vec<CompiledStep> {
    let count = linear.order.len();
    linear
        .order
        .iter()
        .enumerate()
        .filter_map(|(i, &id)| {
            let node = graph.node(id)?;
            let step_type = node.step_type();
            let extraction = extract_params(&step_type, node.raw_params.as_deref());
            Some(CompiledStep {
                node: id,
                step: Step {
                    id: step_id(i),
                    step_type,
                    params: extraction.params,
                    next: (i + 1 < count).then(|| step_id(i + 1)),
                },
                issues: extraction.issues,
            })
        })
        .collect()
}

/// Map from node handle to the step identifier it compiled to.
pub fn step_ids(steps: &[CompiledStep]) -> HashMap<NodeId, String> {
    steps
        .iter()
        .map(|c| (c.node, c.step.id.clone()))
        .collect()
}

/// Compile the graph into a linear sequence.
///
/// Only an empty graph fails. Bad parameter data and topology problems still
/// compile (with defaults) and show up in `diagnose::analyze` instead.
pub fn compile(graph: &Graph, options: &CompileOptions) -> Result<Sequence, CompilerError> {
    if graph.is_empty() {
        return Err(CompilerError::nothing_to_compile());
    }

    let linear = linearize(graph);
    let steps: Vec<Step> = compile_steps(graph, &linear)
        .into_iter()
        .map(|c| c.step)
        .collect();
    debug!(
        steps = steps.len(),
        entry = ?linear.entry,
        name = %options.sequence_name,
        "compiled sequence"
    );

    Ok(Sequence {
        sequence_name: options.sequence_name.clone(),
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_zero_padded() {
        assert_eq!(step_id(0), "node_01");
        assert_eq!(step_id(8), "node_09");
        assert_eq!(step_id(99), "node_100");
    }
}
