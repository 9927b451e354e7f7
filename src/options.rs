//! Caller-supplied compile settings.

use serde::{Deserialize, Serialize};

use crate::error::CompilerError;
use crate::sequence::DEFAULT_SEQUENCE_NAME;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompileOptions {
    /// Written to the compiled sequence's `sequence_name`.
    #[serde(alias = "sequence_name")]
    pub sequence_name: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            sequence_name: DEFAULT_SEQUENCE_NAME.to_string(),
        }
    }
}

impl CompileOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            sequence_name: name.into(),
        }
    }

    /// Parse options from JSON. Blank input means defaults.
    pub fn from_json(json: &str) -> Result<Self, CompilerError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json).map_err(|e| {
            CompilerError::parse("P002", format!("Failed to parse compile options: {}", e))
        })
    }
}
