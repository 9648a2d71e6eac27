use petgraph::algo::is_cyclic_directed;
use petgraph::graph::DiGraph;
use pipecore::{GraphError, PipelineEdge, PipelineNode};
use std::collections::{HashMap, VecDeque};

/// Build the dependency graph over the distinct node ids of a pipeline.
///
/// Duplicate ids keep their first occurrence; an edge is added only when both
/// endpoints name known nodes, so dangling references never influence the
/// structure.
fn build_graph<'a>(nodes: &'a [PipelineNode], edges: &[PipelineEdge]) -> DiGraph<&'a str, ()> {
    let mut graph = DiGraph::new();
    let mut indices = HashMap::new();

    for node in nodes {
        indices
            .entry(node.id.as_str())
            .or_insert_with(|| graph.add_node(node.id.as_str()));
    }

    for edge in edges {
        if let (Some(&source), Some(&target)) = (
            indices.get(edge.source.as_str()),
            indices.get(edge.target.as_str()),
        ) {
            graph.add_edge(source, target, ());
        }
    }

    graph
}

/// Check whether the pipeline forms a DAG. Pure, O(V+E).
pub fn is_acyclic(nodes: &[PipelineNode], edges: &[PipelineEdge]) -> bool {
    !is_cyclic_directed(&build_graph(nodes, edges))
}

/// Derive the execution order with Kahn's algorithm.
///
/// The FIFO queue is seeded with all zero-in-degree nodes in submission
/// order and successors are decremented in edge-list order, so the result is
/// deterministic for a given submission: nodes appear in the order they
/// first reach zero in-degree. A cycle leaves nodes that never reach zero;
/// instead of silently omitting them the whole order is refused with
/// [`GraphError::CycleDetected`].
pub fn execution_order<'a>(
    nodes: &'a [PipelineNode],
    edges: &'a [PipelineEdge],
) -> Result<Vec<&'a str>, GraphError> {
    let mut ids: Vec<&str> = Vec::new();
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut in_degree: HashMap<&str, usize> = HashMap::new();

    for node in nodes {
        let id = node.id.as_str();
        if !in_degree.contains_key(id) {
            ids.push(id);
            adjacency.insert(id, Vec::new());
            in_degree.insert(id, 0);
        }
    }

    for edge in edges {
        // Both endpoints must be known: a dangling edge must not leave a
        // real node with an in-degree it can never shed.
        let Some(degree) = in_degree.get_mut(edge.target.as_str()) else {
            continue;
        };
        if let Some(successors) = adjacency.get_mut(edge.source.as_str()) {
            successors.push(edge.target.as_str());
            *degree += 1;
        }
    }

    let mut queue: VecDeque<&str> = ids
        .iter()
        .copied()
        .filter(|id| in_degree[id] == 0)
        .collect();
    let mut order = Vec::with_capacity(ids.len());

    while let Some(id) = queue.pop_front() {
        order.push(id);
        if let Some(successors) = adjacency.get(id) {
            for &successor in successors {
                if let Some(degree) = in_degree.get_mut(successor) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(successor);
                    }
                }
            }
        }
    }

    if order.len() != ids.len() {
        return Err(GraphError::CycleDetected);
    }
    Ok(order)
}
