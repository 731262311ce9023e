//! Display roles and styles for the finished tree.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::graph::PhyloGraph;
use crate::domain::trunk::Trunk;

/// What a node stands for in the rendered tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeRole {
    BackboneFamily,
    Connector,
    HierarchyLevel,
    LeafSpecies,
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeRole::BackboneFamily => "backbone-family",
            NodeRole::Connector => "connector",
            NodeRole::HierarchyLevel => "hierarchy-level",
            NodeRole::LeafSpecies => "leaf-species",
        };
        f.write_str(name)
    }
}

/// Visual attributes of one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleStyle {
    pub color: String,
    pub size: u32,
}

impl RoleStyle {
    fn new(color: &str) -> Self {
        Self {
            color: color.to_string(),
            size: 700,
        }
    }
}

/// Per-role styles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub family: RoleStyle,
    pub connector: RoleStyle,
    pub hierarchy: RoleStyle,
    pub leaf: RoleStyle,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            family: RoleStyle::new("red"),
            connector: RoleStyle::new("blue"),
            hierarchy: RoleStyle::new("black"),
            leaf: RoleStyle::new("green"),
        }
    }
}

impl StyleConfig {
    pub fn for_role(&self, role: NodeRole) -> &RoleStyle {
        match role {
            NodeRole::BackboneFamily => &self.family,
            NodeRole::Connector => &self.connector,
            NodeRole::HierarchyLevel => &self.hierarchy,
            NodeRole::LeafSpecies => &self.leaf,
        }
    }
}

/// Role of `label` in `graph` given the backbone metadata.
pub fn role_of(graph: &PhyloGraph, trunk: &Trunk, label: &str) -> NodeRole {
    if trunk.is_family(label) {
        NodeRole::BackboneFamily
    } else if trunk.is_connector(label) {
        NodeRole::Connector
    } else if graph.degree(label).unwrap_or(0) <= 1 {
        NodeRole::LeafSpecies
    } else {
        NodeRole::HierarchyLevel
    }
}

/// A finished tree with a role and style per node.
#[derive(Debug, Clone)]
pub struct StyledTree {
    graph: PhyloGraph,
    roles: BTreeMap<String, NodeRole>,
    styles: StyleConfig,
    root: Option<String>,
}

/// Serialised node entry.
#[derive(Debug, Clone, Serialize)]
pub struct NodeView<'a> {
    pub label: &'a str,
    pub role: NodeRole,
    pub degree: usize,
    pub color: &'a str,
    pub size: u32,
}

/// Serialised tree: nodes, edges and surviving families.
#[derive(Debug, Clone, Serialize)]
pub struct TreeView<'a> {
    pub nodes: Vec<NodeView<'a>>,
    pub edges: Vec<(String, String)>,
    pub families: Vec<&'a str>,
}

/// Classify every node of a finished graph.
pub fn classify(graph: PhyloGraph, trunk: &Trunk, styles: &StyleConfig) -> StyledTree {
    let roles = graph
        .nodes()
        .map(|label| (label.to_string(), role_of(&graph, trunk, label)))
        .collect();
    let root = graph
        .contains(trunk.root())
        .then(|| trunk.root().to_string());
    StyledTree {
        graph,
        roles,
        styles: styles.clone(),
        root,
    }
}

impl StyledTree {
    pub fn graph(&self) -> &PhyloGraph {
        &self.graph
    }

    pub fn role(&self, label: &str) -> Option<NodeRole> {
        self.roles.get(label).copied()
    }

    pub fn style(&self, label: &str) -> Option<&RoleStyle> {
        self.role(label).map(|role| self.styles.for_role(role))
    }

    /// Labels holding `role`, sorted.
    pub fn with_role(&self, role: NodeRole) -> Vec<&str> {
        self.roles
            .iter()
            .filter(|(_, r)| **r == role)
            .map(|(label, _)| label.as_str())
            .collect()
    }

    /// Backbone families present in the tree.
    pub fn families(&self) -> Vec<&str> {
        self.with_role(NodeRole::BackboneFamily)
    }

    /// One display anchor per connected component.
    ///
    /// The backbone root when present, otherwise the first connector, then the
    /// first family, then the smallest label of the component.
    pub fn anchors(&self) -> Vec<&str> {
        self.graph
            .components()
            .iter()
            .filter_map(|component| {
                let pick = |role: NodeRole| {
                    component
                        .iter()
                        .find(|label| self.role(label) == Some(role))
                };
                let chosen = self
                    .root
                    .as_ref()
                    .filter(|root| component.contains(*root))
                    .or_else(|| pick(NodeRole::Connector))
                    .or_else(|| pick(NodeRole::BackboneFamily))
                    .or_else(|| component.first())?;
                self.graph
                    .nodes()
                    .find(|label| *label == chosen.as_str())
            })
            .collect()
    }

    /// Anchor of the component containing `label`.
    pub fn anchor_of(&self, label: &str) -> Option<&str> {
        self.anchors()
            .into_iter()
            .find(|anchor| self.graph.connected(anchor, label) || *anchor == label)
    }

    /// Path from `label` up to its component anchor, `label` first.
    pub fn lineage(&self, label: &str) -> Option<Vec<String>> {
        let anchor = self.anchor_of(label)?;
        self.graph.path(label, anchor)
    }

    /// Serialisable snapshot for external renderers.
    pub fn view(&self) -> TreeView<'_> {
        let nodes = self
            .roles
            .iter()
            .map(|(label, &role)| {
                let style = self.styles.for_role(role);
                NodeView {
                    label,
                    role,
                    degree: self.graph.degree(label).unwrap_or(0),
                    color: &style.color,
                    size: style.size,
                }
            })
            .collect();
        TreeView {
            nodes,
            edges: self.graph.edges(),
            families: self.families(),
        }
    }
}
