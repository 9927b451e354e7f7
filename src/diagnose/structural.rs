//! Graph-level topology rules.

use std::collections::{HashMap, HashSet};

use super::report::Diagnostic;
use crate::graph::{Graph, NodeId, TopologyView};
use crate::linearize::{Linearization, start_nodes};

/// Entry-node findings: missing or duplicated START.
pub fn check_entry(graph: &Graph, findings: &mut Vec<Diagnostic>) {
    let starts = start_nodes(graph);
    match starts.len() {
        0 => findings.push(Diagnostic::warning(
            "W001",
            "No START node; steps follow graph order",
        )),
        1 => {}
        n => findings.push(Diagnostic::warning(
            "W011",
            format!(
                "{} START nodes found; linearization starts at the first one",
                n
            ),
        )),
    }
}

/// Findings about one node's place in the graph: unreached by the walk, or
/// fanning out into connections the walk ignores.
pub fn check_placement(
    graph: &Graph,
    linear: &Linearization,
    reachable: &HashSet<NodeId>,
    node: NodeId,
    step_id: &str,
    findings: &mut Vec<Diagnostic>,
) {
    if linear.is_unreached(node) {
        let message = if reachable.contains(&node) {
            "Unconnected node: only reachable from START through an ignored branch"
        } else {
            "Unconnected node: not reachable from START"
        };
        findings.push(Diagnostic::error("E001", message).at(step_id, node));
    }

    let fan_out = graph.outgoing(node).count();
    if fan_out > 1 {
        findings.push(
            Diagnostic::warning(
                "W010",
                format!(
                    "Output has {} connections; only the first is followed",
                    fan_out
                ),
            )
            .at(step_id, node),
        );
    }
}

/// Every directed cycle in the graph, named by step identifiers.
pub fn check_cycles(
    view: &TopologyView,
    step_ids: &HashMap<NodeId, String>,
    findings: &mut Vec<Diagnostic>,
) {
    for cycle in view.cycles() {
        let names: Vec<&str> = cycle
            .iter()
            .filter_map(|id| step_ids.get(id).map(String::as_str))
            .collect();
        let Some((&first_node, first_step)) = cycle.first().zip(names.first()) else {
            continue;
        };
        findings.push(
            Diagnostic::warning(
                "W009",
                format!("Connections form a cycle through {}", names.join(", ")),
            )
            .at(first_step, first_node),
        );
    }
}
