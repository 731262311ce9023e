//! Collapses pass-through nodes until only divergence points remain.

use tracing::{debug, instrument, trace};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::graph::PhyloGraph;
use crate::domain::trunk::Trunk;

/// Reduces a raw hierarchy to its minimal tree.
///
/// Each pass works from the degrees observed at its start:
/// 1. every degree-2 node that is neither a backbone family nor the root is
///    removed and its two neighbours are joined directly;
/// 2. connectors (other than the root) with at most one neighbour are
///    removed, as is a root left with a single neighbour.
///
/// The root is never collapsed. It is pruned only when a single lineage
/// passes through it. An isolated root, or one joining two lineages, stays.
///
/// Passes repeat until the node and edge sets stop changing.
#[derive(Debug, Clone, Copy)]
pub struct TreeSimplifier<'t> {
    trunk: &'t Trunk,
}

impl<'t> TreeSimplifier<'t> {
    pub fn new(trunk: &'t Trunk) -> Self {
        Self { trunk }
    }

    /// Run passes to the fixed point.
    #[instrument(level = "debug", skip_all, fields(nodes = graph.node_count()))]
    pub fn simplify(&self, mut graph: PhyloGraph) -> DomainResult<PhyloGraph> {
        let mut passes = 0usize;
        loop {
            let before = graph.clone();
            graph = self.simplify_once(graph)?;
            passes += 1;
            if graph == before {
                break;
            }
        }
        debug!(
            "simplify: stable after {} pass(es), {} nodes, {} edges",
            passes,
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }

    /// One reduce-then-prune pass.
    pub fn simplify_once(&self, mut graph: PhyloGraph) -> DomainResult<PhyloGraph> {
        let mut reducible = Vec::new();
        let mut dangling = Vec::new();
        for label in graph.nodes() {
            let degree = graph.degree(label).unwrap_or(0);
            match degree {
                2 if self.is_reducible(label) => reducible.push(label.to_string()),
                0 | 1 if self.is_dangling(label, degree) => dangling.push(label.to_string()),
                _ => {}
            }
        }

        for node in &reducible {
            collapse(&mut graph, node)?;
        }
        for node in &dangling {
            trace!("simplify: pruned connector {}", node);
            graph.remove_node(node);
        }
        Ok(graph)
    }

    fn is_reducible(&self, label: &str) -> bool {
        !self.trunk.is_family(label) && !self.trunk.is_root(label)
    }

    fn is_dangling(&self, label: &str, degree: usize) -> bool {
        if self.trunk.is_root(label) {
            degree == 1
        } else {
            self.trunk.is_connector(label)
        }
    }
}

/// Replace `node` by a direct edge between its two neighbours.
fn collapse(graph: &mut PhyloGraph, node: &str) -> DomainResult<()> {
    let neighbors: Vec<String> = graph
        .neighbors(node)
        .into_iter()
        .map(str::to_string)
        .collect();
    let [a, b] = neighbors.as_slice() else {
        return Err(DomainError::NotReducible {
            node: node.to_string(),
            degree: neighbors.len(),
        });
    };
    trace!("simplify: collapsed {} into {}-{}", node, a, b);
    graph.remove_node(node);
    graph.add_edge(a, b);
    Ok(())
}
