//! Tests for PhylogenyService: the full build pipeline

use std::sync::Arc;

use rstest::rstest;

use scaletree::application::services::PhylogenyService;
use scaletree::application::ApplicationError;
use scaletree::config::Settings;
use scaletree::domain::{
    Backbone, DomainError, NodeRole, Rank, RecordTable, StyleConfig, TaxonRecord, Trunk,
};
use scaletree::util::testing;

fn table(rows: &[[&str; 5]]) -> RecordTable {
    rows.iter()
        .map(|[f, sf, t, g, s]| TaxonRecord::from_raw(f, sf, t, g, s))
        .collect()
}

fn service(leaf: Rank) -> PhylogenyService {
    PhylogenyService::new(Arc::new(Trunk::new()), leaf, StyleConfig::default())
}

const PIERIDAE: [[&str; 5]; 2] = [
    ["pieridae", "", "", "g1", "s1"],
    ["pieridae", "", "", "g2", "s2"],
];

#[rstest]
#[case::genus_leaf(Rank::Genus, ["g1", "g2"])]
#[case::species_leaf(Rank::Species, ["s1", "s2"])]
fn given_two_lineages_of_one_family_when_building_then_three_node_tree(
    #[case] leaf: Rank,
    #[case] leaves: [&str; 2],
) {
    // Arrange
    testing::init_test_setup();
    let service = service(leaf);

    // Act
    let tree = service.build(&table(&PIERIDAE)).unwrap();

    // Assert
    let graph = tree.graph();
    assert_eq!(graph.node_count(), 3);
    for label in leaves {
        assert_eq!(graph.neighbors(label), vec!["pieridae"]);
        assert_eq!(tree.role(label), Some(NodeRole::LeafSpecies));
    }
    assert_eq!(tree.families(), vec!["pieridae"]);
}

#[test]
fn given_raw_build_when_requested_then_backbone_connectors_still_present() {
    let service = service(Rank::Genus);

    let tree = service.build_unsimplified(&table(&PIERIDAE));

    assert!(tree.graph().contains("t4"));
    assert_eq!(tree.role("t4"), Some(NodeRole::Connector));
    assert!(tree.graph().contains("g1"));
}

#[test]
fn given_taxon_in_tree_when_tracing_lineage_then_path_and_branch_point() {
    // Arrange
    let service = service(Rank::Genus);
    let records = table(&[
        ["nymphalidae", "", "", "n1", ""],
        ["nymphalidae", "", "", "n2", ""],
        ["zyganidae", "", "", "z1", ""],
    ]);
    let tree = service.build(&records).unwrap();

    // Act
    let lineage = service.lineage(&tree, " N1 ").unwrap();

    // Assert
    assert_eq!(lineage.path, vec!["n1", "nymphalidae", "r"]);
    assert_eq!(lineage.nearest_branch_point.as_deref(), Some("nymphalidae"));
}

#[test]
fn given_unknown_taxon_when_tracing_lineage_then_unknown_taxon_error() {
    let service = service(Rank::Genus);
    let tree = service.build(&table(&PIERIDAE)).unwrap();

    let result = service.lineage(&tree, "danaus");

    assert!(matches!(result, Err(ApplicationError::UnknownTaxon(_))));
}

#[test]
fn given_tree_when_serialised_then_json_document_is_produced() {
    let service = service(Rank::Genus);
    let tree = service.build(&table(&PIERIDAE)).unwrap();

    let json = service.to_json(&tree).unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["nodes"].as_array().unwrap().len(), 3);
    assert_eq!(value["families"], serde_json::json!(["pieridae"]));
}

#[test]
fn given_family_segment_when_building_then_only_that_family_remains() {
    // Arrange
    let service = service(Rank::Genus);
    let records = table(&[
        ["pieridae", "", "", "g1", ""],
        ["nymphalidae", "", "", "n1", ""],
    ]);

    // Act
    let segments = records.segment_by(Rank::Family);
    let tree = service.build(&segments["nymphalidae"]).unwrap();

    // Assert
    assert_eq!(segments.len(), 2);
    assert_eq!(tree.families(), vec!["nymphalidae"]);
    assert!(!tree.graph().contains("g1"));
}

#[test]
fn given_leaf_override_when_derived_then_trunk_is_shared() {
    let base = service(Rank::Genus);

    let species = base.with_leaf_rank(Rank::Species);

    assert_eq!(species.leaf_rank(), Rank::Species);
    assert_eq!(base.leaf_rank(), Rank::Genus);
    assert_eq!(species.trunk().root(), base.trunk().root());
}

#[test]
fn given_invalid_backbone_in_settings_when_creating_service_then_domain_error() {
    let settings = Settings {
        backbone: Some(Backbone {
            root: "missing".to_string(),
            connectors: vec!["r".to_string()],
            families: vec!["fam".to_string()],
            edges: vec![("r".to_string(), "fam".to_string())],
        }),
        ..Settings::default()
    };

    let result = PhylogenyService::from_settings(&settings);

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::InvalidBackbone(_)))
    ));
}
