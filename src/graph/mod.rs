//! In-memory step graph under edit: an arena of nodes and connections.
//!
//! Nodes and connections are addressed by opaque handles that are never reused
//! within one `Graph`, so enumeration order is always insertion order. Ports are
//! not stored separately; a `Port` is the owning node's handle plus a direction.

pub mod topology;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::normalize::{StepType, normalize_type};

pub use topology::TopologyView;

/// Handle of a node inside one `Graph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Handle of a connection inside one `Graph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    Input,
    Output,
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortDirection::Input => write!(f, "input"),
            PortDirection::Output => write!(f, "output"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Port {
    pub node: NodeId,
    pub direction: PortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    pub label: String,
    pub raw_type: String,
    /// Parameter document as written by the parameter editor. Never parsed here.
    pub raw_params: Option<String>,
    pub position: Position,
    has_input: bool,
    has_output: bool,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn step_type(&self) -> StepType {
        normalize_type(&self.raw_type)
    }

    pub fn input_port(&self) -> Option<Port> {
        self.has_input.then_some(Port {
            node: self.id,
            direction: PortDirection::Input,
        })
    }

    pub fn output_port(&self) -> Option<Port> {
        self.has_output.then_some(Port {
            node: self.id,
            direction: PortDirection::Output,
        })
    }

    /// True when a parameter document is present and not blank.
    pub fn has_params(&self) -> bool {
        self.raw_params
            .as_deref()
            .is_some_and(|raw| !raw.trim().is_empty())
    }
}

/// Description of a node to insert. Ports default to what the raw type implies.
#[derive(Debug, Clone)]
pub struct NodeSpec {
    raw_type: String,
    label: Option<String>,
    raw_params: Option<String>,
    position: Position,
    ports: Option<(bool, bool)>,
}

impl NodeSpec {
    pub fn new(raw_type: impl Into<String>) -> Self {
        Self {
            raw_type: raw_type.into(),
            label: None,
            raw_params: None,
            position: Position::default(),
            ports: None,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn params(mut self, raw: impl Into<String>) -> Self {
        self.raw_params = Some(raw.into());
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position { x, y };
        self
    }

    /// Override port presence (`has_input`, `has_output`).
    pub fn ports(mut self, has_input: bool, has_output: bool) -> Self {
        self.ports = Some((has_input, has_output));
        self
    }
}

/// Port presence implied by an editor type label.
///
/// Jump import/export markers are half-nodes in the editor; everything else
/// follows its canonical type.
pub fn default_ports(raw_type: &str) -> (bool, bool) {
    match raw_type.trim().to_ascii_uppercase().as_str() {
        "JUMP IMPORT" => (true, false),
        "JUMP EXPORT" => (false, true),
        _ => normalize_type(raw_type).default_ports(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    id: ConnectionId,
    pub source: NodeId,
    pub target: NodeId,
}

impl Connection {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn source_port(&self) -> Port {
        Port {
            node: self.source,
            direction: PortDirection::Output,
        }
    }

    pub fn target_port(&self) -> Port {
        Port {
            node: self.target,
            direction: PortDirection::Input,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("node {0} does not exist in this graph")]
    UnknownNode(NodeId),
    #[error("node {0} has no output port")]
    NoOutputPort(NodeId),
    #[error("node {0} has no input port")]
    NoInputPort(NodeId),
    #[error("expected an {expected} port on node {node}, got an {found} port")]
    WrongDirection {
        node: NodeId,
        expected: PortDirection,
        found: PortDirection,
    },
}

impl GraphError {
    pub fn code(&self) -> &'static str {
        match self {
            GraphError::UnknownNode(_) => "G001",
            GraphError::NoOutputPort(_) => "G002",
            GraphError::NoInputPort(_) => "G003",
            GraphError::WrongDirection { .. } => "G004",
        }
    }

    pub fn node(&self) -> Option<NodeId> {
        match self {
            GraphError::UnknownNode(n)
            | GraphError::NoOutputPort(n)
            | GraphError::NoInputPort(n)
            | GraphError::WrongDirection { node: n, .. } => Some(*n),
        }
    }
}

/// Owns every node and connection under edit.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Option<Node>>,
    connections: Vec<Option<Connection>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, spec: NodeSpec) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let (has_input, has_output) = spec.ports.unwrap_or_else(|| default_ports(&spec.raw_type));
        let label = spec.label.unwrap_or_else(|| spec.raw_type.clone());
        self.nodes.push(Some(Node {
            id,
            label,
            raw_type: spec.raw_type,
            raw_params: spec.raw_params,
            position: spec.position,
            has_input,
            has_output,
        }));
        id
    }

    /// Remove a node and every connection touching it.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        let node = self.nodes.get_mut(id.0 as usize)?.take()?;
        for slot in self.connections.iter_mut() {
            if slot.is_some_and(|c| c.source == id || c.target == id) {
                *slot = None;
            }
        }
        Some(node)
    }

    pub fn add_connection(&mut self, from: Port, to: Port) -> Result<ConnectionId, GraphError> {
        if from.direction != PortDirection::Output {
            return Err(GraphError::WrongDirection {
                node: from.node,
                expected: PortDirection::Output,
                found: from.direction,
            });
        }
        if to.direction != PortDirection::Input {
            return Err(GraphError::WrongDirection {
                node: to.node,
                expected: PortDirection::Input,
                found: to.direction,
            });
        }
        let source = self.node(from.node).ok_or(GraphError::UnknownNode(from.node))?;
        if source.output_port().is_none() {
            return Err(GraphError::NoOutputPort(from.node));
        }
        let target = self.node(to.node).ok_or(GraphError::UnknownNode(to.node))?;
        if target.input_port().is_none() {
            return Err(GraphError::NoInputPort(to.node));
        }

        let id = ConnectionId(self.connections.len() as u32);
        self.connections.push(Some(Connection {
            id,
            source: from.node,
            target: to.node,
        }));
        Ok(id)
    }

    /// Wire `source`'s output port to `target`'s input port.
    pub fn connect(&mut self, source: NodeId, target: NodeId) -> Result<ConnectionId, GraphError> {
        let from = self
            .node(source)
            .ok_or(GraphError::UnknownNode(source))?
            .output_port()
            .ok_or(GraphError::NoOutputPort(source))?;
        let to = self
            .node(target)
            .ok_or(GraphError::UnknownNode(target))?
            .input_port()
            .ok_or(GraphError::NoInputPort(target))?;
        self.add_connection(from, to)
    }

    pub fn remove_connection(&mut self, id: ConnectionId) -> Option<Connection> {
        self.connections.get_mut(id.0 as usize)?.take()
    }

    /// Replace a node's parameter document. A non-empty string `label` inside
    /// the document becomes the node's display label.
    pub fn set_raw_params(&mut self, id: NodeId, raw: Option<String>) -> Result<(), GraphError> {
        let node = self
            .nodes
            .get_mut(id.0 as usize)
            .and_then(Option::as_mut)
            .ok_or(GraphError::UnknownNode(id))?;
        if let Some(label) = raw.as_deref().and_then(label_from_params) {
            node.label = label;
        }
        node.raw_params = raw;
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize).and_then(Option::as_ref)
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().flatten()
    }

    /// Connections in insertion order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter().flatten()
    }

    /// Connections leaving `id`'s output port, in insertion order.
    pub fn outgoing(&self, id: NodeId) -> impl Iterator<Item = &Connection> {
        self.connections().filter(move |c| c.source == id)
    }

    pub fn incoming(&self, id: NodeId) -> impl Iterator<Item = &Connection> {
        self.connections().filter(move |c| c.target == id)
    }

    /// Target of the first connection leaving `id`, if any.
    pub fn first_successor(&self, id: NodeId) -> Option<NodeId> {
        self.outgoing(id).next().map(|c| c.target)
    }

    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }

    pub fn connection_count(&self) -> usize {
        self.connections().count()
    }

    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    /// Drop every node and connection. Handles issued before the clear stay
    /// retired.
    pub fn clear(&mut self) {
        self.nodes.iter_mut().for_each(|slot| *slot = None);
        self.connections.iter_mut().for_each(|slot| *slot = None);
    }
}

fn label_from_params(raw: &str) -> Option<String> {
    let doc: serde_json::Value = serde_json::from_str(raw).ok()?;
    match doc.get("label")? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}
