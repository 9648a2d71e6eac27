//! Core abstractions for the pipeline engine
//!
//! This crate provides the wire model, category dispatch, error taxonomy and
//! the text-completion boundary trait that all other components depend on.

mod category;
mod completion;
mod error;
mod pipeline;
mod template;

pub use category::NodeCategory;
pub use completion::TextCompletion;
pub use error::{CompletionError, GraphError, PipelineError, RegistryError};
pub use pipeline::{NodeData, ParseResponse, Pipeline, PipelineEdge, PipelineNode};
pub use template::{NodeTemplate, TemplateDraft};

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
