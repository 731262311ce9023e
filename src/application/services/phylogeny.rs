//! Phylogeny service
//!
//! Runs the build → simplify → classify pipeline over a record table.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{
    classify, parse_taxon, PhyloGraph, Rank, RecordTable, StyleConfig, StyledTree, TreeBuilder,
    TreeSimplifier, Trunk,
};

/// Where a taxon sits in a finished tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lineage {
    /// Path from the taxon to its component anchor, taxon first
    pub path: Vec<String>,
    /// Closest node with more than two neighbours, if any
    pub nearest_branch_point: Option<String>,
}

/// Service building minimal phylogenetic trees.
///
/// Holds the trunk, built once and shared read-only across builds.
pub struct PhylogenyService {
    trunk: Arc<Trunk>,
    builder: TreeBuilder,
    styles: StyleConfig,
}

impl PhylogenyService {
    /// Create a service around an existing trunk.
    pub fn new(trunk: Arc<Trunk>, leaf_rank: Rank, styles: StyleConfig) -> Self {
        Self {
            trunk,
            builder: TreeBuilder::new(leaf_rank),
            styles,
        }
    }

    /// Create a service from settings, validating a configured backbone.
    pub fn from_settings(settings: &Settings) -> ApplicationResult<Self> {
        let trunk = match &settings.backbone {
            Some(backbone) => Trunk::from_backbone(backbone)?,
            None => Trunk::new(),
        };
        Ok(Self::new(
            Arc::new(trunk),
            settings.leaf_rank,
            settings.style.clone(),
        ))
    }

    /// Same trunk and styles, different leaf rank.
    pub fn with_leaf_rank(&self, leaf_rank: Rank) -> Self {
        Self::new(Arc::clone(&self.trunk), leaf_rank, self.styles.clone())
    }

    pub fn trunk(&self) -> &Trunk {
        &self.trunk
    }

    pub fn leaf_rank(&self) -> Rank {
        self.builder.leaf_rank()
    }

    /// Backbone grown with every observed taxon, before simplification.
    pub fn build_raw(&self, table: &RecordTable) -> PhyloGraph {
        self.builder.build(&self.trunk, table)
    }

    /// Raw hierarchy with display roles, for inspection.
    pub fn build_unsimplified(&self, table: &RecordTable) -> StyledTree {
        classify(self.build_raw(table), &self.trunk, &self.styles)
    }

    /// Minimal tree for `table`.
    #[instrument(level = "debug", skip_all, fields(rows = table.len()))]
    pub fn build(&self, table: &RecordTable) -> ApplicationResult<StyledTree> {
        let raw = self.build_raw(table);
        let simplified = TreeSimplifier::new(&self.trunk).simplify(raw)?;
        let tree = classify(simplified, &self.trunk, &self.styles);
        info!(
            "built tree: {} nodes, {} families",
            tree.graph().node_count(),
            tree.families().len()
        );
        Ok(tree)
    }

    /// Path to the anchor and nearest branch point of `taxon` in `tree`.
    pub fn lineage(&self, tree: &StyledTree, taxon: &str) -> ApplicationResult<Lineage> {
        let label = parse_taxon(taxon)
            .filter(|label| tree.graph().contains(label))
            .ok_or_else(|| ApplicationError::UnknownTaxon(taxon.to_string()))?;
        let path = tree
            .lineage(&label)
            .ok_or_else(|| ApplicationError::UnknownTaxon(taxon.to_string()))?;
        let nearest_branch_point = tree
            .graph()
            .nearest_branch_point(&label)
            .map(str::to_string);
        debug!("lineage: {} -> {:?}", label, path);
        Ok(Lineage {
            path,
            nearest_branch_point,
        })
    }

    /// Pretty JSON document of `tree` for external renderers.
    pub fn to_json(&self, tree: &StyledTree) -> ApplicationResult<String> {
        serde_json::to_string_pretty(&tree.view()).map_err(|e| ApplicationError::OperationFailed {
            context: "serialize tree".to_string(),
            source: Box::new(e),
        })
    }
}
