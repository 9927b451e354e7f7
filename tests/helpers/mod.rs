#![allow(dead_code)]

use seqc::graph::{Graph, NodeId, NodeSpec};

// =============================================================================
// Graph builders
// =============================================================================

/// Add a node with an optional raw parameter document.
pub fn node(graph: &mut Graph, raw_type: &str, params: Option<&str>) -> NodeId {
    let mut spec = NodeSpec::new(raw_type).label(raw_type.to_lowercase());
    if let Some(raw) = params {
        spec = spec.params(raw);
    }
    graph.add_node(spec)
}

/// Connect each node to the next one.
pub fn wire(graph: &mut Graph, ids: &[NodeId]) {
    for pair in ids.windows(2) {
        graph
            .connect(pair[0], pair[1])
            .expect("chain nodes should carry the connection");
    }
}

/// START → MOTION(X, 1000 Puls, 500 Puls) → END, wired in order.
pub fn scenario_a() -> (Graph, Vec<NodeId>) {
    let mut g = Graph::new();
    let ids = vec![
        node(&mut g, "START", None),
        node(
            &mut g,
            "MOTION",
            Some(
                r#"{"axis":"X","target_position":{"value":1000,"unit":"Puls"},"speed":{"value":500,"unit":"Puls"}}"#,
            ),
        ),
        node(&mut g, "END", None),
    ];
    wire(&mut g, &ids);
    (g, ids)
}

/// START → `middle.len()` WAIT steps → END, each WAIT with a non-zero delay.
pub fn wait_chain(middle: usize) -> (Graph, Vec<NodeId>) {
    let mut g = Graph::new();
    let mut ids = vec![node(&mut g, "START", None)];
    for i in 0..middle {
        let raw = format!(r#"{{"delay_ms":{}}}"#, (i + 1) * 10);
        ids.push(node(&mut g, "WAIT", Some(&raw)));
    }
    ids.push(node(&mut g, "END", None));
    wire(&mut g, &ids);
    (g, ids)
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn fixture_graph(json: &str) -> Graph {
    seqc::project::restore(json).expect("fixture should parse")
}
