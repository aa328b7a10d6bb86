//! Per-side digit index lists.

use std::collections::HashSet;

use stripclust_core::digit::{Digit, Side};

/// Indices into a module's digit slice, split by side.
///
/// Each side holds at most one index per strip number; the first digit
/// seen on a strip wins.
#[derive(Debug, Default, Clone)]
pub struct DigitIndex {
    p: Vec<usize>,
    n: Vec<usize>,
    seen_p: HashSet<u32>,
    seen_n: HashSet<u32>,
}

impl DigitIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds both lists from `digits`, in discovery order.
    ///
    /// Returns the number of duplicate digits that were dropped.
    pub fn fill(&mut self, digits: &[Digit]) -> usize {
        self.clear();
        let mut duplicates = 0;
        for (idx, digit) in digits.iter().enumerate() {
            let (list, seen) = match digit.side {
                Side::P => (&mut self.p, &mut self.seen_p),
                Side::N => (&mut self.n, &mut self.seen_n),
            };
            if seen.insert(digit.strip) {
                list.push(idx);
            } else {
                log::debug!(
                    "dropping duplicate {} side digit on strip {} (index {idx})",
                    digit.side,
                    digit.strip
                );
                duplicates += 1;
            }
        }
        duplicates
    }

    /// Index list of one side.
    #[must_use]
    pub fn side(&self, side: Side) -> &[usize] {
        match side {
            Side::P => &self.p,
            Side::N => &self.n,
        }
    }

    /// Mutable index list of one side.
    pub fn side_mut(&mut self, side: Side) -> &mut Vec<usize> {
        match side {
            Side::P => &mut self.p,
            Side::N => &mut self.n,
        }
    }

    /// Number of indexed digits on one side.
    #[must_use]
    pub fn len(&self, side: Side) -> usize {
        self.side(side).len()
    }

    /// Returns true if neither side has digits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.p.is_empty() && self.n.is_empty()
    }

    /// Empties the lists, keeping allocations for the next module.
    pub fn clear(&mut self) {
        self.p.clear();
        self.n.clear();
        self.seen_p.clear();
        self.seen_n.clear();
    }
}
