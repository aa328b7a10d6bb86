//! stripclust-algorithms: Cluster finding for double-sided strip modules.
//!
//! This crate provides the stages of the strip cluster finder:
//! - **Index/Sort** - per-side strip lists, deduplicated and strip ordered
//! - **Builder** - runs of adjacent strips become one-sided clusters
//! - **Splitter** - clusters are cut at interior signal dips
//! - **Crossing** - stereo intersection of a P and an N strip
//! - **Assembler** - rec points from every valid P/N pair
//!
#![warn(missing_docs)]

mod assembler;
mod builder;
pub mod crossing;
mod finder;
mod index;
mod sort;
mod splitter;

pub use assembler::{AssemblyCounts, RecPointAssembler};
pub use builder::build_clusters;
pub use crossing::{solve_crossing, CrossingError, CrossingSolver, LocalPoint};
pub use finder::{event_statistics, ClusterFinder, ModuleResult, ModuleScratch};
pub use index::DigitIndex;
pub use sort::{is_strictly_increasing, sort_by_strip};
pub use splitter::{find_split_points, order_by_first_strip, split_cluster, split_clusters};

// Re-export core configuration types
pub use stripclust_core::clustering::{ClusterFinderConfig, ErrorModel, ModuleStatistics};
