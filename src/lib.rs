//! Minimal phylogenetic trees for Lepidoptera wing-scale specimens.
//!
//! Layers:
//! - `domain`: taxa, the backbone trunk, tree building and simplification
//! - `application`: record loading and the build/simplify/classify pipeline
//! - `infrastructure`: filesystem boundary and service wiring
//! - `cli`: argument parsing and output

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
