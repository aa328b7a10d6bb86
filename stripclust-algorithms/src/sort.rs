//! Strip-order sorting of digit index lists.

use stripclust_core::digit::Digit;

/// Stably sorts `indices` by ascending strip number of the referenced digits.
pub fn sort_by_strip(indices: &mut [usize], digits: &[Digit]) {
    if indices.len() < 2 {
        return;
    }
    indices.sort_by_key(|&idx| digits[idx].strip);
}

/// True if the referenced strip numbers are strictly increasing.
#[must_use]
pub fn is_strictly_increasing(indices: &[usize], digits: &[Digit]) -> bool {
    indices
        .windows(2)
        .all(|w| digits[w[0]].strip < digits[w[1]].strip)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_by_strip() {
        let digits = vec![Digit::p(9, 1.0), Digit::p(2, 1.0), Digit::p(5, 1.0)];
        let mut indices = vec![0, 1, 2];
        sort_by_strip(&mut indices, &digits);
        assert_eq!(indices, vec![1, 2, 0]);
        assert!(is_strictly_increasing(&indices, &digits));
    }

    #[test]
    fn test_sort_is_idempotent() {
        let digits = vec![Digit::n(4, 1.0), Digit::n(1, 1.0), Digit::n(3, 1.0)];
        let mut once = vec![0, 1, 2];
        sort_by_strip(&mut once, &digits);
        let mut twice = once.clone();
        sort_by_strip(&mut twice, &digits);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_trivial_lists() {
        let digits = vec![Digit::p(1, 1.0)];
        let mut empty: Vec<usize> = Vec::new();
        sort_by_strip(&mut empty, &digits);
        assert!(empty.is_empty());
        let mut single = vec![0];
        sort_by_strip(&mut single, &digits);
        assert_eq!(single, vec![0]);
    }
}
