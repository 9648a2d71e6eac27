use crate::graph::execution_order;
use crate::interpolate::interpolate;
use pipecore::{
    NodeCategory, NodeData, ParseResponse, Pipeline, PipelineEdge, PipelineError, PipelineNode,
    TextCompletion,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Instruction block sent with every transform request; a node's own
/// `Instructions` text is appended below it on its own line.
pub const DEFAULT_INSTRUCTIONS: &str =
    "You are an expert researcher with strong analytical and summarization skills.\n\
     Your task is to research and analyze the text provided below, identifying the most important facts, insights, and implications.\n\
     Strict requirements:\n\
     - Your response must be no more than 100 words.\n\
     - Be factual, concise, and neutral in tone.\n\
     - Do not add assumptions or information not supported by the input text.\n\
     - Avoid repetition and unnecessary context.";

/// Editor placeholder a prompt template may still carry; treated as absent.
const PROMPT_PLACEHOLDER: &str = "Enter Query/Prompt";

/// Value reported for a sink node that never received an input.
pub const NO_OUTPUT_SENTINEL: &str = "No output generated";

/// Drives one pipeline run: schedules the nodes, dispatches each by category
/// and folds the results into a [`ParseResponse`].
///
/// The runner holds no per-run state; each run owns its output map, so one
/// runner can serve concurrent runs without locking.
pub struct PipelineRunner {
    completion: Arc<dyn TextCompletion>,
}

impl PipelineRunner {
    pub fn new(completion: Arc<dyn TextCompletion>) -> Self {
        Self { completion }
    }

    /// Run a pipeline, folding every outcome into the response body.
    ///
    /// A cycle reports `is_dag = false` plus the error message; an execution
    /// failure keeps `is_dag = true`, sets the message and discards any
    /// outputs produced before the failure. A zero-node pipeline reports its
    /// counts and omits `outputs` entirely.
    pub async fn run(&self, pipeline: &Pipeline) -> ParseResponse {
        let num_nodes = pipeline.nodes.len();
        let num_edges = pipeline.edges.len();

        if pipeline.nodes.is_empty() {
            return ParseResponse {
                num_nodes,
                num_edges,
                is_dag: true,
                outputs: None,
                error: None,
            };
        }

        match self.execute(pipeline).await {
            Ok(outputs) => ParseResponse {
                num_nodes,
                num_edges,
                is_dag: true,
                outputs: Some(collect_sink_outputs(&pipeline.nodes, &outputs)),
                error: None,
            },
            Err(err) => ParseResponse {
                num_nodes,
                num_edges,
                is_dag: !matches!(err, PipelineError::Graph(_)),
                outputs: None,
                error: Some(err.to_string()),
            },
        }
    }

    /// Execute the nodes in scheduled order and return the raw output map.
    ///
    /// Nodes without a data payload or with a type tag outside the known
    /// categories are skipped. The first collaborator failure aborts the run.
    pub async fn execute(
        &self,
        pipeline: &Pipeline,
    ) -> Result<HashMap<String, String>, PipelineError> {
        let order = execution_order(&pipeline.nodes, &pipeline.edges)?;
        let index = node_index(&pipeline.nodes);
        let mut outputs: HashMap<String, String> = HashMap::new();

        tracing::debug!("Executing {} nodes in scheduled order", order.len());

        for id in order {
            let Some(node) = index.get(id).copied() else {
                continue;
            };
            let Some(data) = node.data.as_ref() else {
                tracing::debug!("Skipping node {} without a data payload", id);
                continue;
            };
            let Some(category) = node.node_type.as_deref().and_then(NodeCategory::from_tag)
            else {
                tracing::debug!("Skipping node {} with unrecognized type {:?}", id, node.node_type);
                continue;
            };

            match category {
                NodeCategory::Source => {
                    let text = data.text().unwrap_or_default();
                    outputs.insert(id.to_string(), text.to_string());
                }
                NodeCategory::Transform => {
                    let generated = self
                        .run_transform(id, data, &pipeline.edges, &index, &outputs)
                        .await?;
                    outputs.insert(id.to_string(), generated);
                }
                NodeCategory::Sink => {
                    let resolved = connected_inputs(id, &pipeline.edges, &index)
                        .into_iter()
                        .find_map(|input| outputs.get(input.id.as_str()).cloned());
                    if let Some(value) = resolved {
                        outputs.insert(id.to_string(), value);
                    }
                }
            }
        }

        Ok(outputs)
    }

    /// Assemble the prompt for one transform node and call the collaborator.
    async fn run_transform(
        &self,
        id: &str,
        data: &NodeData,
        edges: &[PipelineEdge],
        index: &HashMap<&str, &PipelineNode>,
        outputs: &HashMap<String, String>,
    ) -> Result<String, PipelineError> {
        let mut fragments = Vec::new();
        for input in connected_inputs(id, edges, index) {
            if let Some(output) = outputs.get(input.id.as_str()) {
                fragments.push(output.clone());
            } else if let Some(text) = input.data.as_ref().and_then(NodeData::text) {
                fragments.push(text.to_string());
            }
        }
        let combined_input = fragments.join("\n");

        let mut instructions = DEFAULT_INSTRUCTIONS.to_string();
        if let Some(custom) = data.instructions() {
            instructions.push('\n');
            instructions.push_str(custom);
        }

        let raw_template = data.prompt().unwrap_or_default();
        let template = interpolate(raw_template, outputs, index);
        let instructions = interpolate(&instructions, outputs, index);

        // The placeholder check runs on the interpolated template; whether to
        // append the combined input depends on the raw template, which tells
        // markers and marker expansions apart.
        let final_prompt = if !template.is_empty() && template != PROMPT_PLACEHOLDER {
            if raw_template.contains("{{") {
                template
            } else {
                format!("{template}\n\nInput: {combined_input}")
            }
        } else {
            combined_input
        };

        tracing::info!("Executing transform node {}", id);
        let generated = self.completion.complete(&final_prompt, &instructions).await?;
        Ok(generated)
    }
}

/// Index nodes by id; on duplicate ids the first occurrence wins.
fn node_index(nodes: &[PipelineNode]) -> HashMap<&str, &PipelineNode> {
    let mut index = HashMap::with_capacity(nodes.len());
    for node in nodes {
        index.entry(node.id.as_str()).or_insert(node);
    }
    index
}

/// Upstream nodes of `target` in edge-list order; unknown sources are skipped.
fn connected_inputs<'a>(
    target: &str,
    edges: &'a [PipelineEdge],
    index: &HashMap<&str, &'a PipelineNode>,
) -> Vec<&'a PipelineNode> {
    edges
        .iter()
        .filter(|edge| edge.target == target)
        .filter_map(|edge| index.get(edge.source.as_str()).copied())
        .collect()
}

/// One single-entry record per sink node, in submission order; sinks that
/// never resolved report [`NO_OUTPUT_SENTINEL`].
fn collect_sink_outputs(
    nodes: &[PipelineNode],
    outputs: &HashMap<String, String>,
) -> Vec<HashMap<String, String>> {
    nodes
        .iter()
        .filter(|node| {
            node.node_type.as_deref().and_then(NodeCategory::from_tag) == Some(NodeCategory::Sink)
        })
        .map(|node| {
            let value = outputs
                .get(node.id.as_str())
                .cloned()
                .unwrap_or_else(|| NO_OUTPUT_SENTINEL.to_string());
            HashMap::from([(node.id.clone(), value)])
        })
        .collect()
}
