use pipecore::{GraphError, PipelineEdge, PipelineNode};
use piperuntime::{execution_order, is_acyclic};

fn node(id: &str) -> PipelineNode {
    PipelineNode::new(id, "text")
}

fn edge(source: &str, target: &str) -> PipelineEdge {
    PipelineEdge {
        source: source.to_string(),
        target: target.to_string(),
    }
}

#[test]
fn linear_chain_orders_dependencies_first() {
    let nodes = vec![node("c"), node("a"), node("b")];
    let edges = vec![edge("a", "b"), edge("b", "c")];

    assert_eq!(execution_order(&nodes, &edges).unwrap(), vec!["a", "b", "c"]);
}

#[test]
fn ready_nodes_keep_submission_order() {
    let nodes = vec![node("x"), node("y"), node("z")];

    assert_eq!(execution_order(&nodes, &[]).unwrap(), vec!["x", "y", "z"]);
}

#[test]
fn diamond_orders_siblings_by_submission() {
    let nodes = vec![node("a"), node("b"), node("c"), node("d")];
    let edges = vec![
        edge("a", "b"),
        edge("a", "c"),
        edge("b", "d"),
        edge("c", "d"),
    ];

    assert_eq!(
        execution_order(&nodes, &edges).unwrap(),
        vec!["a", "b", "c", "d"]
    );
}

#[test]
fn order_respects_every_edge() {
    let nodes: Vec<_> = ["f", "e", "d", "c", "b", "a"].into_iter().map(node).collect();
    let edges = vec![edge("a", "b"), edge("b", "c"), edge("d", "c"), edge("e", "f")];

    let order = execution_order(&nodes, &edges).unwrap();
    assert_eq!(order.len(), nodes.len());

    let position = |id: &str| order.iter().position(|n| *n == id).unwrap();
    for e in &edges {
        assert!(position(&e.source) < position(&e.target));
    }
}

#[test]
fn back_edge_to_ancestor_flips_acyclicity() {
    let nodes = vec![node("a"), node("b"), node("c")];
    let mut edges = vec![edge("a", "b"), edge("b", "c")];

    assert!(is_acyclic(&nodes, &edges));
    assert_eq!(execution_order(&nodes, &edges).unwrap(), vec!["a", "b", "c"]);

    edges.push(edge("c", "a"));
    assert!(!is_acyclic(&nodes, &edges));
    assert_eq!(
        execution_order(&nodes, &edges),
        Err(GraphError::CycleDetected)
    );
}

#[test]
fn self_loop_is_a_cycle() {
    let nodes = vec![node("a")];
    let edges = vec![edge("a", "a")];

    assert!(!is_acyclic(&nodes, &edges));
    assert!(execution_order(&nodes, &edges).is_err());
}

#[test]
fn cycle_error_names_the_problem() {
    let nodes = vec![node("a"), node("b")];
    let edges = vec![edge("a", "b"), edge("b", "a")];

    let err = execution_order(&nodes, &edges).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Pipeline contains a cycle and is not a valid DAG"
    );
}

#[test]
fn dangling_edges_never_count() {
    let nodes = vec![node("a"), node("b")];
    let edges = vec![edge("ghost", "b"), edge("a", "missing"), edge("a", "b")];

    assert!(is_acyclic(&nodes, &edges));
    assert_eq!(execution_order(&nodes, &edges).unwrap(), vec!["a", "b"]);
}

#[test]
fn duplicate_ids_resolve_to_first_occurrence() {
    let nodes = vec![node("a"), node("b"), node("a")];
    let edges = vec![edge("a", "b")];

    assert_eq!(execution_order(&nodes, &edges).unwrap(), vec!["a", "b"]);
}

#[test]
fn empty_pipeline_is_trivially_acyclic() {
    assert!(is_acyclic(&[], &[]));
    assert_eq!(execution_order(&[], &[]).unwrap(), Vec::<&str>::new());
}
