/// Precomputed coverage offsets for every remainder class of a window size.
///
/// For a domain of length `L` and windows of size `S` with `m = S / 2`, tiling from any
/// offset of the set returned by [`GridPlanner::coverage_offsets`] in steps of `S` covers
/// every residue of `[0, L)`:
///
/// - `L mod S == 0`: `[m]`, the centered tiling
/// - `1 <= L mod S <= m`: `[0, L mod S)`
/// - `m < L mod S < S`: `[L mod S - m, m]`
///
/// A domain that fits inside one centered window (`m < L <= S`) gets the centered offset
/// alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPlanner {
    window_size: usize,
    table: Vec<Vec<usize>>, // Offset set indexed by `L % window_size`
}

impl GridPlanner {
    /// # Panics
    ///
    /// Panics if `window_size` is zero.
    pub fn new(window_size: usize) -> Self {
        assert!(window_size > 0, "window size must be positive");
        let padding = window_size / 2;

        let mut table = Vec::with_capacity(window_size);
        table.push(vec![padding]);
        for remainder in 1..window_size {
            let offsets = if remainder <= padding {
                (0..remainder).collect()
            } else {
                (remainder - padding..=padding).collect()
            };
            table.push(offsets);
        }

        Self { window_size, table }
    }

    #[inline]
    pub fn centered_offset(&self) -> usize {
        self.window_size / 2
    }

    pub fn coverage_offsets(&self, length: usize) -> &[usize] {
        if length == 0 {
            return &[];
        }
        if length > self.centered_offset() && length <= self.window_size {
            return &self.table[0];
        }
        &self.table[length % self.window_size]
    }
}

pub fn coverage_offsets(length: usize, window_size: usize) -> Vec<usize> {
    GridPlanner::new(window_size)
        .coverage_offsets(length)
        .to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn covered_by_tiling(offset: usize, length: usize, window_size: usize) -> Vec<bool> {
        let margin = window_size / 2;
        let mut covered = vec![false; length];
        let mut origin = offset;
        while origin < length {
            let start = origin.saturating_sub(margin);
            let end = (origin + window_size - margin).min(length);
            covered[start..end].iter_mut().for_each(|c| *c = true);
            origin += window_size;
        }
        covered
    }

    #[test]
    fn exact_multiple_uses_single_centered_offset() {
        assert_eq!(coverage_offsets(128, 64), vec![32]);
        assert_eq!(coverage_offsets(64, 64), vec![32]);
    }

    #[test]
    fn small_remainder_uses_offsets_below_remainder() {
        assert_eq!(coverage_offsets(64 + 3, 64), vec![0, 1, 2]);
        assert_eq!(coverage_offsets(64 + 32, 64), (0..32).collect::<Vec<_>>());
    }

    #[test]
    fn large_remainder_uses_offsets_up_to_center() {
        assert_eq!(coverage_offsets(64 + 60, 64), vec![28, 29, 30, 31, 32]);
        assert_eq!(coverage_offsets(64 + 33, 64), (1..=32).collect::<Vec<_>>());
    }

    #[test]
    fn domain_within_one_window_uses_centered_offset() {
        assert_eq!(coverage_offsets(40, 64), vec![32]);
        assert_eq!(coverage_offsets(33, 64), vec![32]);
    }

    #[test]
    fn very_short_domain_falls_back_to_remainder_class() {
        assert_eq!(coverage_offsets(5, 64), vec![0, 1, 2, 3, 4]);
        assert_eq!(coverage_offsets(1, 64), vec![0]);
    }

    #[test]
    fn offsets_are_deterministic_and_bounded_by_center() {
        let planner = GridPlanner::new(64);
        for length in 1..400 {
            let offsets = planner.coverage_offsets(length);
            assert_eq!(offsets, planner.coverage_offsets(length));
            assert!(!offsets.is_empty());
            assert!(offsets.iter().all(|&o| o <= planner.centered_offset()));
        }
    }

    #[test]
    fn every_coverage_offset_covers_every_residue() {
        for window_size in [8, 10, 16, 64] {
            let planner = GridPlanner::new(window_size);
            for length in 1..(5 * window_size + 7) {
                for &offset in planner.coverage_offsets(length) {
                    let covered = covered_by_tiling(offset, length, window_size);
                    assert!(
                        covered.iter().all(|&c| c),
                        "offset {offset} leaves gaps for L={length}, S={window_size}"
                    );
                }
            }
        }
    }

    #[test]
    fn zero_length_has_no_offsets() {
        assert!(GridPlanner::new(64).coverage_offsets(0).is_empty());
    }

    #[test]
    #[should_panic(expected = "window size must be positive")]
    fn zero_window_size_panics() {
        GridPlanner::new(0);
    }
}
