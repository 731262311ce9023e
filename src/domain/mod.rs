//! Domain layer: taxonomic records and the phylogenetic tree pipeline
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod error;
pub mod graph;
pub mod presentation;
pub mod render;
pub mod simplifier;
pub mod taxon;
pub mod trunk;

pub use builder::TreeBuilder;
pub use error::{DomainError, DomainResult};
pub use graph::PhyloGraph;
pub use presentation::{classify, NodeRole, RoleStyle, StyleConfig, StyledTree, TreeView};
pub use render::TreeNodeConvert;
pub use simplifier::TreeSimplifier;
pub use taxon::{parse_taxon, Rank, RecordTable, TaxonRecord};
pub use trunk::{Backbone, Trunk};
