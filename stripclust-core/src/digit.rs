//! Digit types for strip detector readout.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Readout side of a double-sided strip module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    /// P side (junction side).
    P,
    /// N side (ohmic side).
    N,
}

impl Side {
    /// Both sides, P first.
    pub const ALL: [Side; 2] = [Side::P, Side::N];

    /// Returns the opposite side.
    #[inline]
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Side::P => Side::N,
            Side::N => Side::P,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::P => f.write_str("P"),
            Side::N => f.write_str("N"),
        }
    }
}

/// Monte Carlo track ids contributing to a digit, `-1` for empty slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackIds(pub [i32; 3]);

impl TrackIds {
    /// No associated tracks.
    pub const NONE: TrackIds = TrackIds([-1; 3]);

    /// Creates a track id set from raw ids.
    #[inline]
    #[must_use]
    pub fn new(ids: [i32; 3]) -> Self {
        Self(ids)
    }

    /// Creates a set holding a single track.
    #[inline]
    #[must_use]
    pub fn single(id: i32) -> Self {
        Self([id, -1, -1])
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&id| id >= 0).count()
    }

    /// Iterates over the occupied slots.
    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.0.iter().copied().filter(|&id| id >= 0)
    }

    /// Returns the raw slots.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> [i32; 3] {
        self.0
    }
}

impl Default for TrackIds {
    fn default() -> Self {
        Self::NONE
    }
}

/// A single fired strip.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Digit {
    /// Strip number on its side.
    pub strip: u32,
    /// Readout side.
    pub side: Side,
    /// Signal amplitude (ADC counts).
    pub signal: f64,
    /// Contributing tracks.
    pub tracks: TrackIds,
}

impl Digit {
    /// Creates a digit without track association.
    #[inline]
    #[must_use]
    pub fn new(strip: u32, side: Side, signal: f64) -> Self {
        Self {
            strip,
            side,
            signal,
            tracks: TrackIds::NONE,
        }
    }

    /// Attaches track ids.
    #[inline]
    #[must_use]
    pub fn with_tracks(mut self, tracks: TrackIds) -> Self {
        self.tracks = tracks;
        self
    }

    /// Shorthand for a P-side digit.
    #[inline]
    #[must_use]
    pub fn p(strip: u32, signal: f64) -> Self {
        Self::new(strip, Side::P, signal)
    }

    /// Shorthand for an N-side digit.
    #[inline]
    #[must_use]
    pub fn n(strip: u32, signal: f64) -> Self {
        Self::new(strip, Side::N, signal)
    }

    /// True if `other` sits on the next strip of the same side.
    #[inline]
    #[must_use]
    pub fn precedes(&self, other: &Self) -> bool {
        self.side == other.side && self.strip.checked_add(1) == Some(other.strip)
    }
}

/// Digits of one module, as handed over by the digitization stage.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModuleDigits {
    /// Module id used for the geometry lookup.
    pub module: u32,
    /// All digits of the module, both sides.
    pub digits: Vec<Digit>,
}

impl ModuleDigits {
    /// Creates an empty module record.
    #[must_use]
    pub fn new(module: u32) -> Self {
        Self {
            module,
            digits: Vec::new(),
        }
    }

    /// Creates a module record from digits.
    #[must_use]
    pub fn with_digits(module: u32, digits: Vec<Digit>) -> Self {
        Self { module, digits }
    }

    /// Adds a digit.
    pub fn push(&mut self, digit: Digit) {
        self.digits.push(digit);
    }

    /// Number of digits on both sides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    /// Returns true if the module fired no strips.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }
}
