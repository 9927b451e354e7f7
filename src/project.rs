//! Project file persistence: graph topology only, independent of the compiled
//! sequence format.
//!
//! Connections are stored as index pairs into the `nodes` array as it was at
//! save time.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::CompilerError;
use crate::graph::{Graph, NodeId, NodeSpec};
use crate::normalize::normalize_type;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    #[serde(default)]
    pub nodes: Vec<ProjectNode>,
    #[serde(default)]
    pub connections: Vec<ProjectConnection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectNode {
    #[serde(alias = "type")]
    pub node_type: String,
    #[serde(default, alias = "label")]
    pub original_label: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    /// Raw parameter document. Older files may hold it inline as an object.
    #[serde(default, alias = "rawParams", deserialize_with = "raw_document")]
    pub json_data: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConnection {
    #[serde(alias = "fromIndex")]
    pub from_node_index: i64,
    #[serde(alias = "toIndex")]
    pub to_node_index: i64,
}

fn raw_document<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

impl ProjectFile {
    pub fn from_json(json: &str) -> Result<Self, CompilerError> {
        serde_json::from_str(json).map_err(|e| {
            CompilerError::parse("P001", format!("Failed to parse project JSON: {}", e))
        })
    }

    pub fn to_json_pretty(&self) -> Result<String, CompilerError> {
        serde_json::to_string_pretty(self).map_err(|e| {
            CompilerError::parse("P003", format!("Failed to serialize project: {}", e))
        })
    }
}

/// Snapshot the graph's topology.
pub fn save(graph: &Graph) -> ProjectFile {
    let index_of = |id: NodeId| graph.nodes().position(|n| n.id() == id);

    let nodes = graph
        .nodes()
        .map(|n| ProjectNode {
            node_type: n.raw_type.clone(),
            original_label: n.label.clone(),
            x: n.position.x,
            y: n.position.y,
            json_data: n.raw_params.clone(),
        })
        .collect();

    let connections = graph
        .connections()
        .filter_map(|c| {
            Some(ProjectConnection {
                from_node_index: index_of(c.source)? as i64,
                to_node_index: index_of(c.target)? as i64,
            })
        })
        .collect();

    ProjectFile { nodes, connections }
}

/// Replace the graph's contents with the project's.
///
/// Port presence is re-derived from each node's canonical type. Connections
/// whose indices fall outside the node list, or that the re-derived ports
/// cannot carry, are dropped.
pub fn load(graph: &mut Graph, project: &ProjectFile) {
    graph.clear();

    let ids: Vec<NodeId> = project
        .nodes
        .iter()
        .map(|n| {
            let (has_input, has_output) = normalize_type(&n.node_type).default_ports();
            let mut spec = NodeSpec::new(n.node_type.clone())
                .label(n.original_label.clone())
                .at(n.x, n.y)
                .ports(has_input, has_output);
            if let Some(raw) = &n.json_data {
                spec = spec.params(raw.clone());
            }
            graph.add_node(spec)
        })
        .collect();

    let mut dropped = 0usize;
    for conn in &project.connections {
        let endpoints = usize::try_from(conn.from_node_index)
            .ok()
            .and_then(|i| ids.get(i))
            .zip(usize::try_from(conn.to_node_index).ok().and_then(|i| ids.get(i)));
        let Some((&source, &target)) = endpoints else {
            trace!(from = conn.from_node_index, to = conn.to_node_index, "dropping out-of-range connection");
            dropped += 1;
            continue;
        };
        if let Err(e) = graph.connect(source, target) {
            trace!(error = %e, "dropping connection the ports cannot carry");
            dropped += 1;
        }
    }

    debug!(
        nodes = graph.node_count(),
        connections = graph.connection_count(),
        dropped,
        "loaded project"
    );
}

/// Parse a project file and build a fresh graph from it.
pub fn restore(json: &str) -> Result<Graph, CompilerError> {
    let project = ProjectFile::from_json(json)?;
    let mut graph = Graph::new();
    load(&mut graph, &project);
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_object_document_is_kept_as_text() {
        let project = ProjectFile::from_json(
            r#"{"nodes":[{"nodeType":"WAIT","originalLabel":"W","x":0,"y":0,"jsonData":{"delay_ms":5}}],"connections":[]}"#,
        )
        .unwrap();
        assert_eq!(project.nodes[0].json_data.as_deref(), Some(r#"{"delay_ms":5}"#));
    }

    #[test]
    fn short_field_names_are_accepted() {
        let project = ProjectFile::from_json(
            r#"{"nodes":[{"type":"START","label":"S","x":1,"y":2,"rawParams":null}],
                "connections":[{"fromIndex":0,"toIndex":3}]}"#,
        )
        .unwrap();
        assert_eq!(project.nodes[0].node_type, "START");
        assert_eq!(project.nodes[0].original_label, "S");
        assert_eq!(project.connections[0].to_node_index, 3);
    }
}
