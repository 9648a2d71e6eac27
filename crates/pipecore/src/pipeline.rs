use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Complete pipeline submission: the node list and the dependency edges
/// between them, sent atomically per run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pipeline {
    pub nodes: Vec<PipelineNode>,
    pub edges: Vec<PipelineEdge>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: PipelineNode) {
        self.nodes.push(node);
    }

    /// Add a dependency edge: `source` must resolve before `target` consumes it.
    pub fn connect(&mut self, source: impl Into<String>, target: impl Into<String>) {
        self.edges.push(PipelineEdge {
            source: source.into(),
            target: target.into(),
        });
    }
}

/// One unit of work in a pipeline.
///
/// The `type` tag selects the execution category (see [`crate::NodeCategory`]);
/// nodes with no tag or no data payload are skipped by the runner. Editors
/// attach extra fields (position, dimensions, ...) which deserialization
/// simply ignores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineNode {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<NodeData>,
}

impl PipelineNode {
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: Some(node_type.into()),
            data: Some(NodeData::default()),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.data
            .get_or_insert_with(NodeData::default)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_field("text", text.into())
    }
}

/// Directed connection between two nodes. Extra wire fields (handles, edge
/// ids, markers) are tolerated and dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineEdge {
    pub source: String,
    pub target: String,
}

/// Open data payload of a node: a mapping from field name to loosely-typed
/// value, so new node categories never require a schema change.
///
/// The typed accessors read the editor's wire field names verbatim
/// (`Instructions` and `Prompt` are capitalized on the wire) and yield `Some`
/// only for a non-empty string value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeData {
    fields: serde_json::Map<String, serde_json::Value>,
}

impl NodeData {
    pub fn insert(&mut self, key: String, value: serde_json::Value) {
        self.fields.insert(key, value);
    }

    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.fields.get(field)
    }

    fn text_field(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Literal text of a source node.
    pub fn text(&self) -> Option<&str> {
        self.text_field("text")
    }

    /// Custom instruction text of a transform node.
    pub fn instructions(&self) -> Option<&str> {
        self.text_field("Instructions")
    }

    /// Prompt template of a transform node.
    pub fn prompt(&self) -> Option<&str> {
        self.text_field("Prompt")
    }

    /// Generic output field, the last interpolation fallback.
    pub fn output(&self) -> Option<&str> {
        self.text_field("output")
    }
}

/// Response of one pipeline run.
///
/// Errors are response-body facts: a cycle sets `is_dag = false` plus a
/// message, an execution failure keeps `is_dag = true` and sets only the
/// message. `outputs` is the ordered list of single-entry
/// `{sink_id: value}` records, omitted entirely for a zero-node pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct ParseResponse {
    pub num_nodes: usize,
    pub num_edges: usize,
    pub is_dag: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<HashMap<String, String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
