//! petgraph-based read-only view of a `Graph`, used for whole-graph analysis.

use std::collections::HashMap;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;

use super::{ConnectionId, Graph, NodeId};

pub struct TopologyView {
    pub graph: DiGraph<NodeId, ConnectionId>,
    pub node_indices: HashMap<NodeId, NodeIndex>,
    /// Enumeration position of each node in the source graph.
    order: HashMap<NodeId, usize>,
}

impl TopologyView {
    pub fn build(source: &Graph) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();
        let mut order = HashMap::new();

        for (position, node) in source.nodes().enumerate() {
            let idx = graph.add_node(node.id());
            node_indices.insert(node.id(), idx);
            order.insert(node.id(), position);
        }

        for conn in source.connections() {
            if let (Some(&s), Some(&t)) = (
                node_indices.get(&conn.source),
                node_indices.get(&conn.target),
            ) {
                graph.add_edge(s, t, conn.id());
            }
        }

        TopologyView {
            graph,
            node_indices,
            order,
        }
    }

    /// Every directed cycle, as its member nodes in graph enumeration order.
    /// Cycles are listed by their earliest member.
    pub fn cycles(&self) -> Vec<Vec<NodeId>> {
        let mut cycles: Vec<Vec<NodeId>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| match scc.as_slice() {
                [single] => self.graph.contains_edge(*single, *single),
                _ => true,
            })
            .map(|scc| {
                let mut members: Vec<NodeId> = scc.into_iter().map(|idx| self.graph[idx]).collect();
                members.sort_by_key(|id| self.position(*id));
                members
            })
            .collect();
        cycles.sort_by_key(|members| members.first().map(|id| self.position(*id)));
        cycles
    }

    /// Nodes reachable from `from` along any connection, `from` included.
    pub fn reachable_from(&self, from: NodeId) -> Vec<NodeId> {
        let Some(&start) = self.node_indices.get(&from) else {
            return vec![];
        };
        let mut reached = Vec::new();
        let mut bfs = Bfs::new(&self.graph, start);
        while let Some(nx) = bfs.next(&self.graph) {
            reached.push(self.graph[nx]);
        }
        reached.sort_by_key(|id| self.position(*id));
        reached
    }

    fn position(&self, id: NodeId) -> usize {
        self.order.get(&id).copied().unwrap_or(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeSpec;

    #[test]
    fn finds_loop_and_self_loop() {
        let mut g = Graph::new();
        let a = g.add_node(NodeSpec::new("WAIT"));
        let b = g.add_node(NodeSpec::new("WAIT"));
        let c = g.add_node(NodeSpec::new("WAIT"));
        g.connect(b, a).unwrap();
        g.connect(a, b).unwrap();
        g.connect(c, c).unwrap();

        let view = TopologyView::build(&g);
        assert_eq!(view.cycles(), vec![vec![a, b], vec![c]]);
    }

    #[test]
    fn acyclic_chain_has_no_cycles() {
        let mut g = Graph::new();
        let a = g.add_node(NodeSpec::new("START"));
        let b = g.add_node(NodeSpec::new("END"));
        g.connect(a, b).unwrap();
        let view = TopologyView::build(&g);
        assert!(view.cycles().is_empty());
        assert_eq!(view.reachable_from(a), vec![a, b]);
    }
}
