//! One-sided strip clusters.

use crate::digit::{Digit, Side, TrackIds};
use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A run of adjacent fired strips on one side of a module.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cluster {
    side: Side,
    digits: Vec<Digit>,
    /// Set on clusters created by a split that had a cluster to their left.
    pub left_neighbour: bool,
    /// Set when the cluster touched another one on its right before a split.
    pub right_neighbour: bool,
}

impl Cluster {
    /// Creates an empty cluster.
    #[must_use]
    pub fn new(side: Side) -> Self {
        Self {
            side,
            digits: Vec::new(),
            left_neighbour: false,
            right_neighbour: false,
        }
    }

    /// Creates a cluster with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(side: Side, capacity: usize) -> Self {
        Self {
            side,
            digits: Vec::with_capacity(capacity),
            left_neighbour: false,
            right_neighbour: false,
        }
    }

    /// Adds a member digit. The caller keeps members strip-contiguous.
    pub fn push(&mut self, digit: Digit) {
        debug_assert_eq!(digit.side, self.side);
        self.digits.push(digit);
    }

    /// Side this cluster belongs to.
    #[inline]
    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Number of member digits (strip multiplicity).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    /// Returns true if the cluster has no members.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Member digits in strip order.
    #[must_use]
    pub fn digits(&self) -> &[Digit] {
        &self.digits
    }

    /// Member strip numbers in order.
    pub fn strips(&self) -> impl Iterator<Item = u32> + '_ {
        self.digits.iter().map(|d| d.strip)
    }

    /// Member signals in order.
    pub fn signals(&self) -> impl Iterator<Item = f64> + '_ {
        self.digits.iter().map(|d| d.signal)
    }

    /// Signal of the member at `index`.
    #[must_use]
    pub fn signal(&self, index: usize) -> Option<f64> {
        self.digits.get(index).map(|d| d.signal)
    }

    /// Strip number of the first member.
    #[must_use]
    pub fn first_strip(&self) -> Option<u32> {
        self.digits.first().map(|d| d.strip)
    }

    /// Sum of member signals.
    #[must_use]
    pub fn total_signal(&self) -> f64 {
        self.signals().sum()
    }

    /// Tracks of the first member digit.
    #[must_use]
    pub fn tracks(&self) -> TrackIds {
        self.digits.first().map_or(TrackIds::NONE, |d| d.tracks)
    }

    /// Signal-weighted strip centroid, in strip-pitch units.
    ///
    /// Falls back to the plain strip mean when the total signal is zero.
    /// Returns `None` for an empty cluster.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn position(&self) -> Option<f64> {
        if self.digits.is_empty() {
            return None;
        }
        let total = self.total_signal();
        if total > 0.0 {
            let weighted: f64 = self
                .digits
                .iter()
                .map(|d| f64::from(d.strip) * d.signal)
                .sum();
            Some(weighted / total)
        } else {
            let sum: f64 = self.strips().map(f64::from).sum();
            Some(sum / self.digits.len() as f64)
        }
    }

    /// True if every consecutive pair of members differs by exactly one strip.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        self.digits.windows(2).all(|w| w[0].precedes(&w[1]))
    }

    /// Moves members `index..` into a new cluster of the same side.
    ///
    /// Returns `None` (and leaves `self` untouched) unless
    /// `0 < index < len`, so neither part can end up empty.
    /// Neighbour flags are left to the caller.
    #[must_use]
    pub fn split_off(&mut self, index: usize) -> Option<Cluster> {
        if index == 0 || index >= self.digits.len() {
            return None;
        }
        Some(Cluster {
            side: self.side,
            digits: self.digits.split_off(index),
            left_neighbour: false,
            right_neighbour: false,
        })
    }
}

/// Clusters found on both sides of one module.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModuleClusters {
    /// P-side clusters.
    pub p: Vec<Cluster>,
    /// N-side clusters.
    pub n: Vec<Cluster>,
}

impl ModuleClusters {
    /// Clusters of one side.
    #[must_use]
    pub fn side(&self, side: Side) -> &[Cluster] {
        match side {
            Side::P => &self.p,
            Side::N => &self.n,
        }
    }

    /// Mutable clusters of one side.
    pub fn side_mut(&mut self, side: Side) -> &mut Vec<Cluster> {
        match side {
            Side::P => &mut self.p,
            Side::N => &mut self.n,
        }
    }

    /// Cluster lookup that reports a bad index as an error.
    pub fn try_cluster(&self, side: Side, index: usize) -> Result<&Cluster> {
        let clusters = self.side(side);
        clusters.get(index).ok_or(Error::IndexOutOfRange {
            side,
            index,
            len: clusters.len(),
        })
    }

    /// Cluster lookup that logs a bad index and yields `None`.
    #[must_use]
    pub fn cluster(&self, side: Side, index: usize) -> Option<&Cluster> {
        match self.try_cluster(side, index) {
            Ok(cluster) => Some(cluster),
            Err(err) => {
                log::warn!("{err}");
                None
            }
        }
    }

    /// Total number of clusters on both sides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.p.len() + self.n.len()
    }

    /// Returns true if neither side has clusters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.p.is_empty() && self.n.is_empty()
    }

    /// Empties both sides, keeping allocations.
    pub fn clear(&mut self) {
        self.p.clear();
        self.n.clear();
    }
}
