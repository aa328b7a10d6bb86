//! One-dimensional cluster building from sorted strip lists.

use stripclust_core::cluster::Cluster;
use stripclust_core::digit::{Digit, Side};

/// Groups strip-sorted digits into maximal runs of consecutive strips.
///
/// `indices` must be sorted by strip (see [`crate::sort::sort_by_strip`]).
/// Clusters are appended to `out` in strip order; returns how many were added.
pub fn build_clusters(
    side: Side,
    indices: &[usize],
    digits: &[Digit],
    out: &mut Vec<Cluster>,
) -> usize {
    let Some((&first, rest)) = indices.split_first() else {
        return 0;
    };

    let start = out.len();
    let mut current = Cluster::new(side);
    current.push(digits[first]);
    let mut previous = &digits[first];

    for &idx in rest {
        let digit = &digits[idx];
        if !previous.precedes(digit) {
            out.push(std::mem::replace(&mut current, Cluster::new(side)));
        }
        current.push(*digit);
        previous = digit;
    }
    out.push(current);

    out.len() - start
}
