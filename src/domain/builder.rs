//! Grows the backbone into the full observed taxonomic hierarchy.

use std::collections::BTreeSet;

use itertools::Itertools;
use tracing::{debug, instrument, warn};

use crate::domain::graph::PhyloGraph;
use crate::domain::taxon::{Rank, RecordTable};
use crate::domain::trunk::Trunk;

/// Builds the raw (unsimplified) hierarchy from a record table.
///
/// Ranks from `Subfamily` down to the configured leaf rank are walked
/// outermost first. Missing ranks are bridged: a taxon whose parent rank is
/// unrecorded attaches to its nearest recorded ancestor instead.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    leaf_rank: Rank,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new(Rank::Genus)
    }
}

impl TreeBuilder {
    /// `leaf_rank` below `Subfamily` is clamped to `Subfamily`.
    pub fn new(leaf_rank: Rank) -> Self {
        Self {
            leaf_rank: leaf_rank.max(Rank::Subfamily),
        }
    }

    pub fn leaf_rank(&self) -> Rank {
        self.leaf_rank
    }

    /// Extend a copy of the trunk with every taxon observed in `table`.
    ///
    /// Never fails: ambiguous or unresolvable rows are skipped, which may
    /// leave parts of the result disconnected.
    #[instrument(level = "debug", skip_all, fields(rows = table.len(), leaf = %self.leaf_rank))]
    pub fn build(&self, trunk: &Trunk, table: &RecordTable) -> PhyloGraph {
        let mut graph = trunk.graph().clone();
        let ranks = Rank::down_to(self.leaf_rank);

        Self::warn_unknown_families(trunk, table);

        for i in 1..ranks.len() {
            let level = ranks[i];
            let sub_level = ranks.get(i + 1).copied();

            for parent in table.distinct(level) {
                if i == 1 {
                    if let Some(p) = parent {
                        graph.add_node(p);
                        Self::anchor_to_family(&mut graph, table, level, p);
                    }
                }

                let Some(sub_level) = sub_level else {
                    continue;
                };
                let children: Vec<Option<&str>> = table
                    .rows_where(level, parent)
                    .map(|row| row.get(sub_level))
                    .unique()
                    .collect();

                for child in children {
                    match (parent, child) {
                        (None, Some(c)) => {
                            Self::bridge_up(&mut graph, table, level, sub_level, c);
                            graph.add_node(c);
                        }
                        (Some(p), None) => {
                            if let Some(&grand_level) = ranks.get(i + 2) {
                                Self::bridge_down(
                                    &mut graph,
                                    table,
                                    level,
                                    sub_level,
                                    grand_level,
                                    p,
                                );
                            }
                        }
                        (Some(p), Some(c)) => {
                            graph.add_node(c);
                            link(&mut graph, p, c);
                        }
                        (None, None) => {}
                    }
                }
            }
        }

        let observed: BTreeSet<&str> = table.families().into_iter().collect();
        for family in trunk.all_fams() {
            if !observed.contains(family.as_str()) && graph.remove_node(family) {
                debug!("build: removed family without records: {}", family);
            }
        }

        debug!(
            "build: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        graph
    }

    /// First walked rank: attach to the family when all its rows agree on one.
    fn anchor_to_family(graph: &mut PhyloGraph, table: &RecordTable, level: Rank, value: &str) {
        let families: Vec<Option<&str>> = table
            .rows_where(level, Some(value))
            .map(|row| row.family.as_deref())
            .unique()
            .collect();
        match families.as_slice() {
            [Some(family)] => link(graph, family, value),
            _ => debug!(
                "build: {} '{}' has no unique family anchor ({} candidates)",
                level,
                value,
                families.len()
            ),
        }
    }

    /// Parent rank unrecorded: connect `child` to its nearest recorded ancestor.
    fn bridge_up(
        graph: &mut PhyloGraph,
        table: &RecordTable,
        level: Rank,
        sub_level: Rank,
        child: &str,
    ) {
        let ancestor = table
            .rows_where(sub_level, Some(child))
            .find(|row| row.get(level).is_none())
            .and_then(|row| row.nearest_ancestor(level));
        match ancestor {
            Some(ancestor) => link(graph, child, ancestor),
            None => debug!("build: {} '{}' has no recorded ancestor", sub_level, child),
        }
    }

    /// Child rank unrecorded: connect the grandchildren directly to `parent`.
    fn bridge_down(
        graph: &mut PhyloGraph,
        table: &RecordTable,
        level: Rank,
        sub_level: Rank,
        grand_level: Rank,
        parent: &str,
    ) {
        let grandchildren: Vec<&str> = table
            .rows_where(level, Some(parent))
            .filter(|row| row.get(sub_level).is_none())
            .filter_map(|row| row.get(grand_level))
            .unique()
            .collect();
        for grandchild in grandchildren {
            link(graph, grandchild, parent);
        }
    }

    fn warn_unknown_families(trunk: &Trunk, table: &RecordTable) {
        for family in table.families() {
            if !trunk.is_family(family) {
                warn!("family '{}' is not part of the backbone", family);
            }
        }
    }
}

/// Add an edge unless it would close a cycle.
fn link(graph: &mut PhyloGraph, a: &str, b: &str) {
    if a == b {
        return;
    }
    let exists = graph.neighbors(a).contains(&b);
    if !exists && graph.connected(a, b) {
        debug!("build: skipped cross-link '{}'-'{}'", a, b);
        return;
    }
    graph.add_edge(a, b);
}
