//! Linearization of the step graph into an ordered node list.

use std::collections::HashSet;

use tracing::trace;

use crate::graph::{Graph, NodeId};
use crate::normalize::StepType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Linearization {
    /// Every node of the graph, each exactly once, in step order.
    pub order: Vec<NodeId>,
    /// The START node the walk began at, if the graph has one.
    pub entry: Option<NodeId>,
    /// Index into `order` where the appended, unreached nodes begin.
    tail_start: usize,
}

impl Linearization {
    /// Nodes reached by the walk from START.
    pub fn chain(&self) -> &[NodeId] {
        &self.order[..self.tail_start]
    }

    /// Nodes appended after the walk because START never reached them.
    /// Empty when the graph has no START node.
    pub fn unreached(&self) -> &[NodeId] {
        &self.order[self.tail_start..]
    }

    pub fn is_unreached(&self, id: NodeId) -> bool {
        self.unreached().contains(&id)
    }
}

/// START nodes in graph enumeration order.
pub fn start_nodes(graph: &Graph) -> Vec<NodeId> {
    graph
        .nodes()
        .filter(|n| n.step_type() == StepType::Start)
        .map(|n| n.id())
        .collect()
}

/// Walk from START along the first outgoing connection of each node, stopping
/// at a dead end or at the first revisited node, then append every node the
/// walk missed in graph order. Without a START node the result is graph order.
pub fn linearize(graph: &Graph) -> Linearization {
    let Some(entry) = start_nodes(graph).into_iter().next() else {
        let order: Vec<NodeId> = graph.nodes().map(|n| n.id()).collect();
        let tail_start = order.len();
        trace!(nodes = order.len(), "no START node, using graph order");
        return Linearization {
            order,
            entry: None,
            tail_start,
        };
    };

    let mut visited = HashSet::new();
    let mut order = Vec::new();
    let mut current = Some(entry);
    while let Some(id) = current {
        if !visited.insert(id) {
            trace!(node = %id, "walk revisited a node, truncating");
            break;
        }
        order.push(id);
        current = graph.first_successor(id);
    }

    let tail_start = order.len();
    order.extend(
        graph
            .nodes()
            .map(|n| n.id())
            .filter(|id| !visited.contains(id)),
    );
    trace!(
        chain = tail_start,
        appended = order.len() - tail_start,
        "linearized graph"
    );

    Linearization {
        order,
        entry: Some(entry),
        tail_start,
    }
}
