//! Pipeline execution engine
//!
//! This crate turns a submitted node/edge set into a response: it validates
//! the graph, derives one deterministic execution order, walks the nodes
//! per category, resolves `{{node-id}}` placeholders along the way and
//! collects the sink outputs.

mod graph;
mod interpolate;
mod runner;

pub use graph::{execution_order, is_acyclic};
pub use interpolate::interpolate;
pub use runner::{PipelineRunner, DEFAULT_INSTRUCTIONS, NO_OUTPUT_SENTINEL};
