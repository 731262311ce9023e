//! The curated family backbone the full tree grows from.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::graph::PhyloGraph;

/// Declarative description of a backbone: families, connectors and their wiring.
///
/// Connectors stand in for unlabelled common ancestors between families.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backbone {
    /// Connector that anchors the whole backbone
    pub root: String,
    /// Synthetic connector ids, root included
    pub connectors: Vec<String>,
    /// Family names, in display order
    pub families: Vec<String>,
    /// Undirected edges between families and connectors
    pub edges: Vec<(String, String)>,
}

impl Default for Backbone {
    /// Lepidoptera families sampled by the scale project.
    fn default() -> Self {
        let families = [
            "lycaenidae",
            "nymphalidae",
            "zyganidae",
            "saturniidae",
            "papilionidae",
            "hesperiidae",
            "uraniidae",
            "pieridae",
        ];
        let connectors = ["r", "t0", "t1", "t2", "t3", "t4", "t5"];
        let edges = [
            ("r", "zyganidae"),
            ("r", "t0"),
            ("t0", "t1"),
            ("t0", "t2"),
            ("t2", "saturniidae"),
            ("t2", "uraniidae"),
            ("t1", "papilionidae"),
            ("t1", "t3"),
            ("t3", "hesperiidae"),
            ("t3", "t4"),
            ("t4", "t5"),
            ("t4", "pieridae"),
            ("t5", "lycaenidae"),
            ("t5", "nymphalidae"),
        ];
        Self {
            root: "r".to_string(),
            connectors: connectors.iter().map(|s| s.to_string()).collect(),
            families: families.iter().map(|s| s.to_string()).collect(),
            edges: edges
                .iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
        }
    }
}

/// Immutable backbone graph plus the metadata the builder and simplifier need.
#[derive(Debug, Clone)]
pub struct Trunk {
    graph: PhyloGraph,
    all_fams: Vec<String>,
    traversal_nodes: BTreeSet<String>,
    root: String,
}

impl Default for Trunk {
    fn default() -> Self {
        Self::new()
    }
}

impl Trunk {
    /// The curated Lepidoptera backbone.
    pub fn new() -> Self {
        Self::from_backbone(&Backbone::default())
            .unwrap_or_else(|e| unreachable!("curated backbone is a tree: {e}"))
    }

    /// Build and validate a trunk from a declared backbone.
    pub fn from_backbone(backbone: &Backbone) -> DomainResult<Self> {
        let families: BTreeSet<&str> = backbone.families.iter().map(String::as_str).collect();
        let connectors: BTreeSet<&str> = backbone.connectors.iter().map(String::as_str).collect();

        if let Some(both) = families.intersection(&connectors).next() {
            return Err(DomainError::InvalidBackbone(format!(
                "'{both}' is declared both as family and connector"
            )));
        }
        if !connectors.contains(backbone.root.as_str()) {
            return Err(DomainError::InvalidBackbone(format!(
                "root '{}' is not a declared connector",
                backbone.root
            )));
        }

        let mut graph = PhyloGraph::new();
        for label in connectors.iter().chain(families.iter()) {
            graph.add_node(label);
        }
        for (a, b) in &backbone.edges {
            for end in [a, b] {
                if !graph.contains(end) {
                    return Err(DomainError::InvalidBackbone(format!(
                        "edge endpoint '{end}' is neither family nor connector"
                    )));
                }
            }
            if !graph.add_edge(a, b) {
                return Err(DomainError::InvalidBackbone(format!(
                    "edge '{a}'-'{b}' is a duplicate or a self-loop"
                )));
            }
        }

        let components = graph.components();
        if components.len() != 1 || graph.edge_count() + 1 != graph.node_count() {
            return Err(DomainError::InvalidBackbone(format!(
                "expected a single tree, found {} component(s) with {} nodes and {} edges",
                components.len(),
                graph.node_count(),
                graph.edge_count()
            )));
        }

        let traversal_nodes = graph
            .nodes()
            .filter(|label| !families.contains(label))
            .map(str::to_string)
            .collect();
        debug!(
            "trunk: {} families, {} connectors",
            backbone.families.len(),
            backbone.connectors.len()
        );

        Ok(Self {
            graph,
            all_fams: backbone.families.clone(),
            traversal_nodes,
            root: backbone.root.clone(),
        })
    }

    pub fn graph(&self) -> &PhyloGraph {
        &self.graph
    }

    /// Family names carried by the backbone.
    pub fn all_fams(&self) -> &[String] {
        &self.all_fams
    }

    /// Backbone nodes that are not families: the synthetic connectors.
    pub fn traversal_nodes(&self) -> &BTreeSet<String> {
        &self.traversal_nodes
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn is_family(&self, label: &str) -> bool {
        self.all_fams.iter().any(|f| f == label)
    }

    pub fn is_connector(&self, label: &str) -> bool {
        self.traversal_nodes.contains(label)
    }

    pub fn is_root(&self, label: &str) -> bool {
        self.root == label
    }
}
