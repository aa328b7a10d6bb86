//! stripclust-core: Core traits and types for silicon strip detector processing.
//!
//! This crate provides the foundational abstractions for strip digits,
//! one-sided clusters, module geometry and reconstructed points.
//!

pub mod cluster;
pub mod clustering;
pub mod digit;
pub mod error;
pub mod geometry;
pub mod recpoint;

pub use cluster::{Cluster, ModuleClusters};
pub use clustering::{ClusterFinderConfig, ErrorModel, ModuleStatistics};
pub use digit::{Digit, ModuleDigits, Side, TrackIds};
pub use error::{Error, Result};
pub use geometry::{GeometryProvider, Layer, LayeredGeometry, ModuleGeometry, StepFactors};
pub use recpoint::{RawCluster, RawClusterSink, RecPoint, RecPointSink};
