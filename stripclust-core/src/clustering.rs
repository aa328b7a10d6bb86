//! Cluster finder configuration and statistics.

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How rec point variances are assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ErrorModel {
    /// Fixed `rms_x`/`rms_z`, independent of the cluster.
    #[default]
    Fixed,
    /// Propagate a one-strip position error through the stereo crossing.
    Propagated,
}

/// Configuration for the strip cluster finder.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClusterFinderConfig {
    /// Split clusters at interior signal dips.
    pub split_overlapped: bool,
    /// A digit is a dip when its signal is below this fraction of both neighbours.
    pub split_factor: f64,
    /// Re-order clusters by first strip after splitting.
    pub order_clusters: bool,
    /// ADC count to keV conversion.
    pub adc_to_kev: f64,
    /// Scale applied to local coordinates and errors (micron to cm by default).
    pub length_scale: f64,
    /// Fixed x resolution, geometry length units.
    pub rms_x: f64,
    /// Fixed z resolution, geometry length units.
    pub rms_z: f64,
    /// Variance assignment.
    pub error_model: ErrorModel,
}

impl Default for ClusterFinderConfig {
    fn default() -> Self {
        Self {
            split_overlapped: false,
            split_factor: 0.75,
            order_clusters: true,
            // 50 ADC -> 30000 e-h pairs at 3.6 eV each
            adc_to_kev: 2.16,
            length_scale: 1.0e-4,
            rms_x: 20.0,
            rms_z: 800.0,
            error_model: ErrorModel::Fixed,
        }
    }
}

impl ClusterFinderConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables overlap splitting.
    #[must_use]
    pub fn with_split_overlapped(mut self, split: bool) -> Self {
        self.split_overlapped = split;
        self
    }

    /// Sets the dip fraction used for splitting.
    #[must_use]
    pub fn with_split_factor(mut self, factor: f64) -> Self {
        self.split_factor = factor;
        self
    }

    /// Enables or disables cluster re-ordering.
    #[must_use]
    pub fn with_order_clusters(mut self, order: bool) -> Self {
        self.order_clusters = order;
        self
    }

    /// Sets the ADC to keV conversion.
    #[must_use]
    pub fn with_adc_to_kev(mut self, factor: f64) -> Self {
        self.adc_to_kev = factor;
        self
    }

    /// Sets the output length scale.
    #[must_use]
    pub fn with_length_scale(mut self, scale: f64) -> Self {
        self.length_scale = scale;
        self
    }

    /// Sets the fixed resolutions.
    #[must_use]
    pub fn with_resolution(mut self, rms_x: f64, rms_z: f64) -> Self {
        self.rms_x = rms_x;
        self.rms_z = rms_z;
        self
    }

    /// Sets the variance model.
    #[must_use]
    pub fn with_error_model(mut self, model: ErrorModel) -> Self {
        self.error_model = model;
        self
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        if !(self.split_factor > 0.0 && self.split_factor <= 1.0) {
            return Err(Error::ConfigError(format!(
                "split_factor must be in (0, 1], got {}",
                self.split_factor
            )));
        }
        if !(self.adc_to_kev.is_finite() && self.adc_to_kev >= 0.0) {
            return Err(Error::ConfigError(format!(
                "adc_to_kev must be non-negative, got {}",
                self.adc_to_kev
            )));
        }
        if !(self.length_scale.is_finite() && self.length_scale > 0.0) {
            return Err(Error::ConfigError(format!(
                "length_scale must be positive, got {}",
                self.length_scale
            )));
        }
        if !(self.rms_x >= 0.0 && self.rms_z >= 0.0) {
            return Err(Error::ConfigError(
                "resolutions must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Counters collected while processing modules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModuleStatistics {
    /// Modules processed.
    pub modules: usize,
    /// Unique P-side digits.
    pub digits_p: usize,
    /// Unique N-side digits.
    pub digits_n: usize,
    /// Digits dropped for repeating a strip number.
    pub duplicates: usize,
    /// P-side clusters after splitting.
    pub clusters_p: usize,
    /// N-side clusters after splitting.
    pub clusters_n: usize,
    /// Splits applied.
    pub splits: usize,
    /// P/N pairs handed to the crossing solver.
    pub pairs_tested: usize,
    /// Rec points emitted.
    pub rec_points: usize,
}

impl ModuleStatistics {
    /// Adds another set of counters to this one.
    pub fn merge(&mut self, other: &ModuleStatistics) {
        self.modules += other.modules;
        self.digits_p += other.digits_p;
        self.digits_n += other.digits_n;
        self.duplicates += other.duplicates;
        self.clusters_p += other.clusters_p;
        self.clusters_n += other.clusters_n;
        self.splits += other.splits;
        self.pairs_tested += other.pairs_tested;
        self.rec_points += other.rec_points;
    }

    /// Fraction of tested pairs that produced a rec point.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn acceptance(&self) -> f64 {
        if self.pairs_tested == 0 {
            0.0
        } else {
            self.rec_points as f64 / self.pairs_tested as f64
        }
    }
}
