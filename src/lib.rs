//! Graph-to-sequence compiler for visual motion-control programs.
//!
//! An editor builds a graph of typed step nodes (motion, wait, I/O, flow
//! control, counters) joined by directional wires. This crate turns that graph
//! into an ordered, linear step program (JSON) and a pre-flight diagnostic
//! report:
//!
//! 1. `linearize` walks from the START node along first connections and
//!    appends whatever the walk missed.
//! 2. `normalize` maps editor labels onto canonical step types.
//! 3. `extract` resolves each step's parameters from its loosely-structured
//!    parameter document.
//! 4. `compile` assembles the `Sequence`; `diagnose` reports what looks wrong.
//!
//! `project` persists graph topology and `ingest` accepts sequences produced
//! by an external text-generation service.

pub mod compile;
pub mod diagnose;
pub mod error;
pub mod extract;
pub mod graph;
pub mod ingest;
pub mod linearize;
pub mod normalize;
pub mod options;
pub mod project;
pub mod sequence;
pub mod wasm;

pub use compile::compile;
pub use diagnose::{DiagnosticReport, analyze};
pub use error::CompilerError;
pub use graph::{Graph, NodeId, NodeSpec};
pub use normalize::{StepType, normalize_type};
pub use options::CompileOptions;
pub use sequence::{Sequence, Step, StepParams};
