//! Unified compiler error type used across all phases.

use crate::graph::GraphError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Parse,
    Graph,
    Compile,
    Ingest,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Parse => write!(f, "Parse"),
            Phase::Graph => write!(f, "Graph"),
            Phase::Compile => write!(f, "Compile"),
            Phase::Ingest => write!(f, "Ingest"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompilerError {
    pub code: String,
    pub phase: Phase,
    pub message: String,
    pub node_id: Option<String>,
}

impl std::fmt::Display for CompilerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.node_id {
            Some(id) => write!(
                f,
                "[{}:{}] {} (node '{}')",
                self.phase, self.code, self.message, id
            ),
            None => write!(f, "[{}:{}] {}", self.phase, self.code, self.message),
        }
    }
}

impl std::error::Error for CompilerError {}

impl From<GraphError> for CompilerError {
    fn from(e: GraphError) -> Self {
        let node_id = e.node().map(|n| n.to_string());
        CompilerError {
            code: e.code().to_string(),
            phase: Phase::Graph,
            message: e.to_string(),
            node_id,
        }
    }
}

impl CompilerError {
    pub fn parse(code: &str, message: impl Into<String>) -> Self {
        CompilerError {
            code: code.into(),
            phase: Phase::Parse,
            message: message.into(),
            node_id: None,
        }
    }

    pub fn compile(code: &str, message: impl Into<String>) -> Self {
        CompilerError {
            code: code.into(),
            phase: Phase::Compile,
            message: message.into(),
            node_id: None,
        }
    }

    pub fn ingest(code: &str, message: impl Into<String>) -> Self {
        CompilerError {
            code: code.into(),
            phase: Phase::Ingest,
            message: message.into(),
            node_id: None,
        }
    }

    /// The single structural compile failure: an empty graph.
    pub fn nothing_to_compile() -> Self {
        CompilerError::compile("C001", "Nothing to compile: the graph has no nodes")
    }
}
