//! Tests for PhyloGraph

use rstest::rstest;

use scaletree::domain::PhyloGraph;

fn graph_from(edges: &[(&str, &str)]) -> PhyloGraph {
    let mut graph = PhyloGraph::new();
    for (a, b) in edges {
        graph.add_edge(a, b);
    }
    graph
}

#[test]
fn given_existing_edge_when_adding_again_then_graph_is_unchanged() {
    // Arrange
    let mut graph = graph_from(&[("a", "b")]);

    // Act
    let added = graph.add_edge("b", "a");

    // Assert
    assert!(!added);
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.degree("a"), Some(1));
}

#[test]
fn given_self_loop_when_adding_then_ignored() {
    let mut graph = PhyloGraph::new();

    let added = graph.add_edge("a", "a");

    assert!(!added);
    assert!(!graph.contains("a"));
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn given_node_when_removed_then_incident_edges_disappear() {
    // Arrange
    let mut graph = graph_from(&[("a", "b"), ("b", "c")]);

    // Act
    let removed = graph.remove_node("b");

    // Assert
    assert!(removed);
    assert!(!graph.contains("b"));
    assert_eq!(graph.degree("a"), Some(0));
    assert_eq!(graph.degree("c"), Some(0));
    assert_eq!(graph.edge_count(), 0);
    assert!(!graph.remove_node("b"));
}

#[test]
fn given_unordered_insertions_when_listing_then_nodes_and_edges_are_sorted() {
    let graph = graph_from(&[("z", "m"), ("a", "m")]);

    let nodes: Vec<&str> = graph.nodes().collect();

    assert_eq!(nodes, vec!["a", "m", "z"]);
    assert_eq!(
        graph.edges(),
        vec![
            ("a".to_string(), "m".to_string()),
            ("m".to_string(), "z".to_string())
        ]
    );
    assert_eq!(graph.neighbors("m"), vec!["a", "z"]);
}

#[test]
fn given_two_components_when_queried_then_components_and_connectivity_match() {
    // Arrange
    let mut graph = graph_from(&[("a", "b"), ("c", "d")]);
    graph.add_node("e");

    // Act
    let components = graph.components();

    // Assert
    assert_eq!(components.len(), 3);
    assert_eq!(components[0], vec!["a".to_string(), "b".to_string()]);
    assert!(graph.connected("a", "b"));
    assert!(!graph.connected("a", "c"));
    assert!(!graph.connected("a", "missing"));
}

#[rstest]
#[case(&[("a", "b"), ("b", "c")], true)]
#[case(&[("a", "b"), ("b", "c"), ("c", "a")], false)]
#[case(&[], true)]
fn given_graph_when_checking_forest_then_detects_cycles(
    #[case] edges: &[(&str, &str)],
    #[case] expected: bool,
) {
    let graph = graph_from(edges);
    assert_eq!(graph.is_forest(), expected);
}

#[test]
fn given_tree_when_finding_path_then_returns_both_ends() {
    let graph = graph_from(&[("leaf", "mid"), ("mid", "root"), ("root", "other")]);

    let path = graph.path("leaf", "root");

    assert_eq!(
        path,
        Some(vec!["leaf".to_string(), "mid".to_string(), "root".to_string()])
    );
    assert_eq!(graph.path("leaf", "missing"), None);
}

#[test]
fn given_branching_node_when_searching_then_nearest_branch_point_found() {
    // Arrange: hub has three neighbours
    let graph = graph_from(&[("leaf", "mid"), ("mid", "hub"), ("hub", "x"), ("hub", "y")]);

    // Act
    let found = graph.nearest_branch_point("leaf");

    // Assert
    assert_eq!(found, Some("hub"));
}

#[test]
fn given_path_graph_when_searching_branch_point_then_none() {
    let mut graph = graph_from(&[("a", "b"), ("b", "c")]);
    graph.add_node("alone");

    assert_eq!(graph.nearest_branch_point("a"), None);
    assert_eq!(graph.nearest_branch_point("alone"), None);
    assert_eq!(graph.nearest_branch_point("missing"), None);
}

#[test]
fn given_same_structure_when_built_in_different_order_then_graphs_equal() {
    let first = graph_from(&[("a", "b"), ("b", "c")]);
    let second = graph_from(&[("c", "b"), ("b", "a")]);

    assert_eq!(first, second);
}
