//! Undirected label-keyed graph backing the phylogenetic tree.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use generational_arena::{Arena, Index};
use tracing::instrument;

/// Node in the arena: a taxon (or connector) label and its adjacency.
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub label: String,
    neighbors: Vec<Index>,
}

impl GraphNode {
    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }
}

/// Simple undirected graph: no self-loops, no multi-edges.
///
/// Nodes live in a generational arena so removals never invalidate the
/// indices of surviving nodes. The label map is ordered, which makes every
/// iteration over the graph deterministic.
#[derive(Debug, Clone)]
pub struct PhyloGraph {
    arena: Arena<GraphNode>,
    index: BTreeMap<String, Index>,
}

impl Default for PhyloGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for PhyloGraph {
    fn eq(&self, other: &Self) -> bool {
        self.index.keys().eq(other.index.keys()) && self.edges() == other.edges()
    }
}

impl Eq for PhyloGraph {}

impl PhyloGraph {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            index: BTreeMap::new(),
        }
    }

    /// Add a node; no-op when the label already exists.
    #[instrument(level = "trace", skip(self))]
    pub fn add_node(&mut self, label: &str) -> Index {
        if let Some(&idx) = self.index.get(label) {
            return idx;
        }
        let idx = self.arena.insert(GraphNode {
            label: label.to_string(),
            neighbors: Vec::new(),
        });
        self.index.insert(label.to_string(), idx);
        idx
    }

    /// Add an edge, creating missing endpoints.
    ///
    /// Returns `false` when nothing changed (self-loop or existing edge).
    #[instrument(level = "trace", skip(self))]
    pub fn add_edge(&mut self, a: &str, b: &str) -> bool {
        if a == b {
            return false;
        }
        let ia = self.add_node(a);
        let ib = self.add_node(b);
        if self.arena[ia].neighbors.contains(&ib) {
            return false;
        }
        self.arena[ia].neighbors.push(ib);
        self.arena[ib].neighbors.push(ia);
        true
    }

    /// Remove a node and all its incident edges.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_node(&mut self, label: &str) -> bool {
        let Some(idx) = self.index.remove(label) else {
            return false;
        };
        if let Some(node) = self.arena.remove(idx) {
            for neighbor in node.neighbors {
                if let Some(n) = self.arena.get_mut(neighbor) {
                    n.neighbors.retain(|&i| i != idx);
                }
            }
        }
        true
    }

    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    pub fn node(&self, label: &str) -> Option<&GraphNode> {
        self.index.get(label).and_then(|&idx| self.arena.get(idx))
    }

    pub fn degree(&self, label: &str) -> Option<usize> {
        self.node(label).map(GraphNode::degree)
    }

    /// Neighbour labels, sorted.
    pub fn neighbors(&self, label: &str) -> Vec<&str> {
        let mut labels: Vec<&str> = self
            .node(label)
            .map(|node| {
                node.neighbors
                    .iter()
                    .filter_map(|&i| self.arena.get(i))
                    .map(|n| n.label.as_str())
                    .collect()
            })
            .unwrap_or_default();
        labels.sort_unstable();
        labels
    }

    /// Node labels in sorted order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// Edges as sorted `(smaller, larger)` label pairs.
    pub fn edges(&self) -> Vec<(String, String)> {
        let mut edges = Vec::with_capacity(self.edge_count());
        for (label, &idx) in &self.index {
            for &n in &self.arena[idx].neighbors {
                let other = &self.arena[n].label;
                if label < other {
                    edges.push((label.clone(), other.clone()));
                }
            }
        }
        edges.sort();
        edges
    }

    pub fn node_count(&self) -> usize {
        self.index.len()
    }

    pub fn edge_count(&self) -> usize {
        self.arena.iter().map(|(_, n)| n.degree()).sum::<usize>() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// True when a path joins `a` and `b`.
    pub fn connected(&self, a: &str, b: &str) -> bool {
        match (self.index.get(a), self.index.get(b)) {
            (Some(&ia), Some(&ib)) => self.bfs(ia).contains(&ib),
            _ => false,
        }
    }

    /// Connected components, each sorted by label, ordered by their first label.
    pub fn components(&self) -> Vec<Vec<String>> {
        let mut seen: HashSet<Index> = HashSet::new();
        let mut components = Vec::new();
        for &idx in self.index.values() {
            if seen.contains(&idx) {
                continue;
            }
            let members = self.bfs(idx);
            seen.extend(members.iter().copied());
            let mut labels: Vec<String> = members
                .into_iter()
                .map(|i| self.arena[i].label.clone())
                .collect();
            labels.sort();
            components.push(labels);
        }
        components
    }

    /// Every component satisfies `edges == nodes - 1`.
    pub fn is_forest(&self) -> bool {
        self.components().iter().all(|component| {
            let degree_sum: usize = component
                .iter()
                .filter_map(|label| self.degree(label))
                .sum();
            degree_sum / 2 + 1 == component.len()
        })
    }

    /// Shortest path from `from` to `to`, both ends included.
    pub fn path(&self, from: &str, to: &str) -> Option<Vec<String>> {
        let &start = self.index.get(from)?;
        let &goal = self.index.get(to)?;
        let mut previous: HashMap<Index, Index> = HashMap::new();
        let mut queue = VecDeque::from([start]);
        let mut seen = HashSet::from([start]);
        while let Some(current) = queue.pop_front() {
            if current == goal {
                let mut path = vec![self.arena[current].label.clone()];
                let mut cursor = current;
                while let Some(&p) = previous.get(&cursor) {
                    path.push(self.arena[p].label.clone());
                    cursor = p;
                }
                path.reverse();
                return Some(path);
            }
            for next in self.sorted_neighbors(current) {
                if seen.insert(next) {
                    previous.insert(next, current);
                    queue.push_back(next);
                }
            }
        }
        None
    }

    /// Closest node other than `from` with more than two neighbours.
    ///
    /// Breadth-first, ties broken by label. `None` when the component holds
    /// no branch point (including an isolated node).
    pub fn nearest_branch_point(&self, from: &str) -> Option<&str> {
        let &start = self.index.get(from)?;
        self.bfs(start)
            .into_iter()
            .skip(1)
            .map(|i| &self.arena[i])
            .find(|node| node.degree() > 2)
            .map(|node| node.label.as_str())
    }

    fn sorted_neighbors(&self, idx: Index) -> Vec<Index> {
        let mut neighbors = self.arena[idx].neighbors.clone();
        neighbors.sort_by(|a, b| self.arena[*a].label.cmp(&self.arena[*b].label));
        neighbors
    }

    /// Breadth-first visit order starting at `start` (included first).
    fn bfs(&self, start: Index) -> Vec<Index> {
        let mut order = Vec::new();
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            order.push(current);
            for next in self.sorted_neighbors(current) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        order
    }
}
