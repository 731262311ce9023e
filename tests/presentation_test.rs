//! Tests for roles, styles, anchors and rendering of finished trees

use scaletree::domain::{
    classify, NodeRole, PhyloGraph, Rank, RecordTable, StyleConfig, StyledTree, TaxonRecord,
    TreeBuilder, TreeNodeConvert, TreeSimplifier, Trunk,
};

fn styled(rows: &[[&str; 5]], leaf: Rank) -> (Trunk, StyledTree) {
    let trunk = Trunk::new();
    let table: RecordTable = rows
        .iter()
        .map(|[f, sf, t, g, s]| TaxonRecord::from_raw(f, sf, t, g, s))
        .collect();
    let raw = TreeBuilder::new(leaf).build(&trunk, &table);
    let graph = TreeSimplifier::new(&trunk).simplify(raw).unwrap();
    let tree = classify(graph, &trunk, &StyleConfig::default());
    (trunk, tree)
}

const TWO_FAMILIES: [[&str; 5]; 3] = [
    ["nymphalidae", "", "", "n1", ""],
    ["nymphalidae", "", "", "n2", ""],
    ["zyganidae", "", "", "z1", ""],
];

#[test]
fn given_finished_tree_when_classified_then_roles_follow_priority() {
    // Arrange & Act
    let (_, tree) = styled(&TWO_FAMILIES, Rank::Genus);

    // Assert
    assert_eq!(tree.role("nymphalidae"), Some(NodeRole::BackboneFamily));
    assert_eq!(tree.role("zyganidae"), Some(NodeRole::BackboneFamily));
    assert_eq!(tree.role("r"), Some(NodeRole::Connector));
    assert_eq!(tree.role("n1"), Some(NodeRole::LeafSpecies));
    assert_eq!(tree.role("missing"), None);
    assert_eq!(tree.families(), vec!["nymphalidae", "zyganidae"]);
}

#[test]
fn given_inner_taxon_with_children_when_classified_then_hierarchy_level() {
    // Arrange: raw graph, taxon with two children
    let trunk = Trunk::new();
    let mut graph = PhyloGraph::new();
    graph.add_edge("pieridae", "pierinae");
    graph.add_edge("pierinae", "pieris");
    graph.add_edge("pierinae", "aporia");

    // Act
    let tree = classify(graph, &trunk, &StyleConfig::default());

    // Assert
    assert_eq!(tree.role("pierinae"), Some(NodeRole::HierarchyLevel));
    assert_eq!(tree.role("pieris"), Some(NodeRole::LeafSpecies));
    assert_eq!(tree.style("pierinae").map(|s| s.color.as_str()), Some("black"));
    assert_eq!(tree.style("pieridae").map(|s| s.color.as_str()), Some("red"));
    assert_eq!(tree.style("pieris").map(|s| s.size), Some(700));
}

#[test]
fn given_tree_with_root_when_anchoring_then_root_is_anchor() {
    let (_, tree) = styled(&TWO_FAMILIES, Rank::Genus);

    assert_eq!(tree.anchors(), vec!["r"]);
    assert_eq!(tree.anchor_of("n1"), Some("r"));
}

#[test]
fn given_tree_without_connectors_when_anchoring_then_family_is_anchor() {
    let rows = [
        ["pieridae", "", "", "g1", ""],
        ["pieridae", "", "", "g2", ""],
    ];

    let (_, tree) = styled(&rows, Rank::Genus);

    assert_eq!(tree.anchors(), vec!["pieridae"]);
    assert_eq!(
        tree.lineage("g1"),
        Some(vec!["g1".to_string(), "pieridae".to_string()])
    );
}

#[test]
fn given_leaf_when_tracing_lineage_then_path_ends_at_root() {
    let (_, tree) = styled(&TWO_FAMILIES, Rank::Genus);

    let lineage = tree.lineage("n1");

    assert_eq!(
        lineage,
        Some(vec!["n1".to_string(), "nymphalidae".to_string(), "r".to_string()])
    );
}

#[test]
fn given_tree_when_viewed_as_json_then_has_nodes_edges_and_families() {
    // Arrange
    let (_, tree) = styled(&TWO_FAMILIES, Rank::Genus);

    // Act
    let json = serde_json::to_value(tree.view()).unwrap();

    // Assert
    let nodes = json["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 6);
    let root = nodes.iter().find(|n| n["label"] == "r").unwrap();
    assert_eq!(root["role"], "connector");
    assert_eq!(root["color"], "blue");
    assert_eq!(root["degree"], 2);
    let family = nodes.iter().find(|n| n["label"] == "nymphalidae").unwrap();
    assert_eq!(family["role"], "backbone-family");
    assert_eq!(json["edges"].as_array().unwrap().len(), 5);
    assert_eq!(json["edges"][0], serde_json::json!(["n1", "nymphalidae"]));
    assert_eq!(json["families"], serde_json::json!(["nymphalidae", "zyganidae"]));
}

#[test]
fn given_tree_when_rendered_as_text_then_labels_carry_roles() {
    let (_, tree) = styled(&TWO_FAMILIES, Rank::Genus);

    let rendered = tree.to_tree_strings();

    assert_eq!(rendered.len(), 1);
    let text = rendered[0].to_string();
    assert!(text.starts_with("r [connector]"));
    assert!(text.contains("nymphalidae [backbone-family]"));
    assert!(text.contains("z1 [leaf-species]"));
}
