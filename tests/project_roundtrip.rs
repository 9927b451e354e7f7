//! Project file persistence: save/load round-trip and lenient loading.

mod helpers;

use helpers::fixture_graph;
use proptest::prelude::*;
use seqc::graph::{Graph, NodeId, NodeSpec};
use seqc::project::{self, ProjectFile};

/// Node attributes and connection pairs (as enumeration positions), which
/// survive a round-trip while handles do not.
fn shape(g: &Graph) -> (Vec<(String, String, f64, f64, Option<String>)>, Vec<(usize, usize)>) {
    let nodes: Vec<_> = g.nodes().collect();
    let position = |id: NodeId| nodes.iter().position(|n| n.id() == id).unwrap();
    (
        nodes
            .iter()
            .map(|n| {
                (
                    n.raw_type.clone(),
                    n.label.clone(),
                    n.position.x,
                    n.position.y,
                    n.raw_params.clone(),
                )
            })
            .collect(),
        g.connections()
            .map(|c| (position(c.source), position(c.target)))
            .collect(),
    )
}

#[test]
fn save_writes_index_pairs() {
    let g = fixture_graph(include_str!("fixtures/scenario_a.json"));
    let saved = project::save(&g);
    assert_eq!(saved.nodes.len(), 3);
    assert_eq!(saved.nodes[1].node_type, "M");
    assert_eq!(saved.nodes[1].original_label, "Move X");
    assert_eq!(
        saved
            .connections
            .iter()
            .map(|c| (c.from_node_index, c.to_node_index))
            .collect::<Vec<_>>(),
        vec![(0, 1), (1, 2)]
    );
}

#[test]
fn saved_json_uses_editor_field_names() {
    let g = fixture_graph(include_str!("fixtures/scenario_a.json"));
    let json: serde_json::Value =
        serde_json::from_str(&project::save(&g).to_json_pretty().unwrap()).unwrap();
    let first = &json["nodes"][0];
    assert_eq!(first["nodeType"], "START");
    assert_eq!(first["originalLabel"], "Start");
    assert!(first["jsonData"].is_null());
    assert_eq!(json["connections"][0]["fromNodeIndex"], 0);
    assert_eq!(json["connections"][0]["toNodeIndex"], 1);
}

#[test]
fn out_of_range_and_impossible_connections_are_dropped() {
    let g = fixture_graph(include_str!("fixtures/dangling_indices.json"));
    assert_eq!(g.node_count(), 2);
    assert_eq!(g.connection_count(), 1);
}

#[test]
fn save_indexes_around_removed_nodes() {
    let mut g = Graph::new();
    let start = g.add_node(NodeSpec::new("START"));
    let gone = g.add_node(NodeSpec::new("WAIT"));
    let end = g.add_node(NodeSpec::new("END"));
    g.connect(start, gone).unwrap();
    g.connect(start, end).unwrap();
    g.remove_node(gone);

    let saved = project::save(&g);
    assert_eq!(saved.nodes.len(), 2);
    assert_eq!(saved.connections.len(), 1);
    assert_eq!(saved.connections[0].to_node_index, 1);
}

#[test]
fn load_replaces_existing_contents() {
    let mut g = Graph::new();
    g.add_node(NodeSpec::new("WAIT"));
    g.add_node(NodeSpec::new("WAIT"));
    let project = ProjectFile::from_json(include_str!("fixtures/cycle.json")).unwrap();
    project::load(&mut g, &project);
    assert_eq!(g.node_count(), 3);
    assert_eq!(g.connection_count(), 3);
}

#[test]
fn handles_from_before_a_load_stay_dead() {
    let mut g = Graph::new();
    let selected = g.add_node(NodeSpec::new("WAIT").label("selected"));
    let project = ProjectFile::from_json(
        r#"{"nodes":[{"nodeType":"START","originalLabel":"fresh start","x":0,"y":0,"jsonData":null}],"connections":[]}"#,
    )
    .unwrap();
    project::load(&mut g, &project);

    assert!(g.node(selected).is_none());
    assert!(g.remove_node(selected).is_none());
    let labels: Vec<&str> = g.nodes().map(|n| n.label.as_str()).collect();
    assert_eq!(labels, vec!["fresh start"]);
}

#[test]
fn malformed_project_is_a_parse_error() {
    let err = project::restore("{\"nodes\": [").unwrap_err();
    assert_eq!(err.code, "P001");
}

proptest! {
    #[test]
    fn save_then_load_preserves_shape(
        nodes in prop::collection::vec(
            (
                prop::sample::select(vec!["START", "END", "WAIT", "M", "SET DO", "GOTO", "Homing"]),
                "[a-z ]{0,8}",
                -500i32..500,
                -500i32..500,
                prop::option::of(r#"\{"delay_ms":[0-9]{1,3}\}"#),
            ),
            1..12,
        ),
        edges in prop::collection::vec((0usize..12, 0usize..12), 0..20),
    ) {
        let mut g = Graph::new();
        let ids: Vec<_> = nodes
            .iter()
            .map(|(ty, label, x, y, raw)| {
                let mut spec = NodeSpec::new(*ty).label(label.clone()).at(*x as f64, *y as f64);
                if let Some(raw) = raw {
                    spec = spec.params(raw.clone());
                }
                g.add_node(spec)
            })
            .collect();
        for (a, b) in edges {
            if let (Some(&a), Some(&b)) = (ids.get(a), ids.get(b)) {
                let _ = g.connect(a, b);
            }
        }

        let text = project::save(&g).to_json_pretty().unwrap();
        let restored = project::restore(&text).unwrap();
        prop_assert_eq!(shape(&restored), shape(&g));
    }
}
