//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem) but are themselves
//! concrete structs, not traits.

mod phylogeny;
mod records;

pub use phylogeny::{Lineage, PhylogenyService};
pub use records::{parse_records, RecordService};
