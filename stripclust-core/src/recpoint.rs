//! Reconstructed points and the sinks that collect them.

use crate::digit::TrackIds;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A reconstructed space point inside one module.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecPoint {
    /// Local x relative to the module centre.
    pub x: f64,
    /// Local z relative to the module centre.
    pub z: f64,
    /// Charge (larger of the two side signals).
    pub q: f64,
    /// Energy deposit estimate (keV).
    pub dedx: f64,
    /// Variance of x.
    pub sigma_x2: f64,
    /// Variance of z.
    pub sigma_z2: f64,
    /// Tracks of the P-side cluster.
    pub tracks: TrackIds,
}

/// Per-pair diagnostic record of a P/N cluster match.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawCluster {
    /// Total P-side signal.
    pub signal_p: f64,
    /// Total N-side signal.
    pub signal_n: f64,
    /// P-side strip multiplicity.
    pub multiplicity_p: usize,
    /// N-side strip multiplicity.
    pub multiplicity_n: usize,
    /// Charge mismatch `|signal_p - signal_n|`.
    pub q_err: f64,
    /// Number of tracks associated with the P-side cluster.
    pub n_tracks: usize,
}

/// Receives reconstructed points, one call per point.
pub trait RecPointSink {
    /// Takes ownership of a point.
    fn add_rec_point(&mut self, point: RecPoint);
}

impl RecPointSink for Vec<RecPoint> {
    fn add_rec_point(&mut self, point: RecPoint) {
        self.push(point);
    }
}

/// Receives the raw cluster diagnostics.
pub trait RawClusterSink {
    /// Takes ownership of a record.
    fn add_raw_cluster(&mut self, cluster: RawCluster);
}

impl RawClusterSink for Vec<RawCluster> {
    fn add_raw_cluster(&mut self, cluster: RawCluster) {
        self.push(cluster);
    }
}

/// Discards diagnostics.
impl RawClusterSink for () {
    fn add_raw_cluster(&mut self, _cluster: RawCluster) {}
}
