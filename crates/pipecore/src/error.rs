use thiserror::Error;

/// Top-level error for a pipeline run.
///
/// Transparent on both arms so the response `error` string is exactly the
/// underlying diagnostic.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Completion(#[from] CompletionError),
}

/// Structural problems caught before any node executes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Pipeline contains a cycle and is not a valid DAG")]
    CycleDetected,
}

/// Failures from the text-completion collaborator.
#[derive(Error, Debug, Clone)]
pub enum CompletionError {
    /// The credential was never configured; no network attempt was made.
    #[error("{0}")]
    Configuration(String),

    /// Any transport or provider failure, normalized to one diagnostic.
    #[error("{0}")]
    Provider(String),
}

/// Node template registry outcomes, mapped onto HTTP statuses by the server.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Node with type '{0}' already exists")]
    DuplicateType(String),

    #[error("Node with type '{0}' not found")]
    NotFound(String),
}
