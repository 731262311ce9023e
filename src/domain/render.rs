//! Text rendering of styled trees via `termtree`.

use termtree::Tree;
use tracing::instrument;

use crate::domain::presentation::StyledTree;
use crate::domain::trunk::Trunk;

pub trait TreeNodeConvert {
    /// One text tree per connected component.
    fn to_tree_strings(&self) -> Vec<Tree<String>>;
}

impl TreeNodeConvert for StyledTree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_strings(&self) -> Vec<Tree<String>> {
        fn build_tree(tree: &StyledTree, label: &str, parent: Option<&str>) -> Tree<String> {
            let leaves: Vec<Tree<String>> = tree
                .graph()
                .neighbors(label)
                .into_iter()
                .filter(|n| Some(*n) != parent)
                .map(|child| build_tree(tree, child, Some(label)))
                .collect();
            Tree::new(node_label(tree, label)).with_leaves(leaves)
        }

        self.anchors()
            .into_iter()
            .map(|anchor| build_tree(self, anchor, None))
            .collect()
    }
}

impl TreeNodeConvert for Trunk {
    fn to_tree_strings(&self) -> Vec<Tree<String>> {
        fn build_tree(trunk: &Trunk, label: &str, parent: Option<&str>) -> Tree<String> {
            let leaves: Vec<Tree<String>> = trunk
                .graph()
                .neighbors(label)
                .into_iter()
                .filter(|n| Some(*n) != parent)
                .map(|child| build_tree(trunk, child, Some(label)))
                .collect();
            Tree::new(label.to_string()).with_leaves(leaves)
        }

        vec![build_tree(self, self.root(), None)]
    }
}

fn node_label(tree: &StyledTree, label: &str) -> String {
    match tree.role(label) {
        Some(role) => format!("{label} [{role}]"),
        None => label.to_string(),
    }
}
