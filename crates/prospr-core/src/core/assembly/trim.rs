use crate::core::models::window::{Window, WindowAxis};
use ndarray::{ArrayView1, ArrayView2, ArrayView3, s};
use std::ops::Range;

/// Which end of a window axis is being trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Leading,
    Trailing,
}

/// The part of one window axis that lies inside the domain, and where it lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisTrim {
    pub keep_start: usize, // First kept bin within the window
    pub keep_end: usize,   // One past the last kept bin within the window
    pub place_at: usize,   // Domain position of `keep_start`
}

impl AxisTrim {
    /// Number of window bins beyond `edge` that fall outside `[0, domain_length)`.
    ///
    /// The window spans `[origin - margin, origin - margin + window_size)`.
    pub fn discarded(
        origin: usize,
        window_size: usize,
        domain_length: usize,
        margin: usize,
        edge: Edge,
    ) -> usize {
        match edge {
            Edge::Leading => margin.saturating_sub(origin),
            Edge::Trailing => (origin + window_size).saturating_sub(domain_length + margin),
        }
    }

    pub fn new(origin: usize, window_size: usize, domain_length: usize, margin: usize) -> Self {
        let leading = Self::discarded(origin, window_size, domain_length, margin, Edge::Leading);
        let trailing = Self::discarded(origin, window_size, domain_length, margin, Edge::Trailing);
        let keep_end = window_size.saturating_sub(trailing);
        debug_assert!(
            keep_end > leading,
            "window at origin {origin} keeps no bins of a {domain_length}-residue domain"
        );

        Self {
            keep_start: leading,
            keep_end,
            place_at: origin.saturating_sub(margin),
        }
    }

    #[inline]
    pub fn kept_len(&self) -> usize {
        self.keep_end.saturating_sub(self.keep_start)
    }

    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.keep_start..self.keep_end
    }

    #[inline]
    pub fn placement(&self) -> Range<usize> {
        self.place_at..self.place_at + self.kept_len()
    }
}

/// Trims for both axes of one window.
///
/// Every tensor belonging to the window (the pairwise prediction, the 2-D mask, the
/// per-residue predictions and the 1-D profiles) must be cut through the same trim so
/// values and weights stay index-aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowTrim {
    pub row: AxisTrim,
    pub col: AxisTrim,
}

impl WindowTrim {
    pub fn for_window(window: &Window, domain_length: usize) -> Self {
        let margin = window.margin();
        Self {
            row: AxisTrim::new(window.i, window.size, domain_length, margin),
            col: AxisTrim::new(window.j, window.size, domain_length, margin),
        }
    }

    #[inline]
    pub fn axis(&self, axis: WindowAxis) -> AxisTrim {
        match axis {
            WindowAxis::Row => self.row,
            WindowAxis::Column => self.col,
        }
    }

    /// Trims a `depth x S x S` tensor on both spatial axes.
    pub fn pairwise<'a>(&self, tensor: ArrayView3<'a, f64>) -> ArrayView3<'a, f64> {
        tensor.slice_move(s![.., self.row.range(), self.col.range()])
    }

    pub fn mask<'a>(&self, mask: ArrayView2<'a, f64>) -> ArrayView2<'a, f64> {
        mask.slice_move(s![self.row.range(), self.col.range()])
    }

    /// Trims a `depth x S` tensor along `axis`.
    pub fn residue<'a>(
        &self,
        axis: WindowAxis,
        tensor: ArrayView2<'a, f64>,
    ) -> ArrayView2<'a, f64> {
        tensor.slice_move(s![.., self.axis(axis).range()])
    }

    pub fn profile<'a>(
        &self,
        axis: WindowAxis,
        profile: ArrayView1<'a, f64>,
    ) -> ArrayView1<'a, f64> {
        profile.slice_move(s![self.axis(axis).range()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assembly::mask::{WeightMask, WeightingMode};
    use ndarray::{Array2, Array3};

    const S: usize = 64;
    const M: usize = 32;

    #[test]
    fn interior_window_is_kept_whole() {
        let trim = AxisTrim::new(96, S, 300, M);
        assert_eq!(trim.range(), 0..64);
        assert_eq!(trim.placement(), 64..128);
    }

    #[test]
    fn leading_overhang_discards_front_bins() {
        assert_eq!(AxisTrim::discarded(0, S, 300, M, Edge::Leading), 32);
        assert_eq!(AxisTrim::discarded(10, S, 300, M, Edge::Leading), 22);
        assert_eq!(AxisTrim::discarded(40, S, 300, M, Edge::Leading), 0);

        let trim = AxisTrim::new(10, S, 300, M);
        assert_eq!(trim.range(), 22..64);
        assert_eq!(trim.placement(), 0..42);
    }

    #[test]
    fn trailing_overhang_keeps_front_bins() {
        // origin 90 in a 100-residue domain: original rule keeps S - (o - (L - m)) bins.
        let keep = S - (90 - (100 - M));
        assert_eq!(AxisTrim::discarded(90, S, 100, M, Edge::Trailing), S - keep);

        let trim = AxisTrim::new(90, S, 100, M);
        assert_eq!(trim.range(), 0..keep);
        assert_eq!(trim.placement(), 58..100);
    }

    #[test]
    fn window_at_exact_boundary_is_not_trimmed() {
        assert_eq!(AxisTrim::discarded(68, S, 100, M, Edge::Trailing), 0);
        assert_eq!(AxisTrim::discarded(69, S, 100, M, Edge::Trailing), 1);
    }

    #[test]
    fn short_domain_trims_both_edges() {
        let trim = AxisTrim::new(3, S, 10, M);
        assert_eq!(trim.range(), 29..39);
        assert_eq!(trim.placement(), 0..10);

        let centered = AxisTrim::new(32, S, 40, M);
        assert_eq!(centered.range(), 0..40);
        assert_eq!(centered.placement(), 0..40);
    }

    #[test]
    fn kept_region_always_lands_inside_domain() {
        for length in 1..200 {
            for origin in 0..length {
                let trim = AxisTrim::new(origin, S, length, M);
                assert!(trim.kept_len() > 0, "empty trim at o={origin}, L={length}");
                assert!(trim.placement().end <= length);
                assert_eq!(trim.place_at + M, origin + trim.keep_start);
            }
        }
    }

    #[test]
    fn trimmed_prediction_and_weights_share_shape() {
        let mask = WeightMask::square(S, WeightingMode::Centered);
        let prediction = Array3::<f64>::zeros((10, S, S));
        let residue = Array2::<f64>::zeros((37, S));

        for length in [5, 33, 40, 64, 65, 100, 150] {
            for i in (0..length).step_by(7) {
                for j in (0..length).step_by(11) {
                    let trim = WindowTrim::for_window(&Window::new(i, j, S), length);
                    let trimmed = trim.pairwise(prediction.view());
                    let weights = trim.mask(mask.full());
                    assert_eq!(&trimmed.shape()[1..], weights.shape());

                    for axis in WindowAxis::BOTH {
                        let values = trim.residue(axis, residue.view());
                        let profile = trim.profile(axis, mask.profile(axis));
                        assert_eq!(values.shape()[1], profile.len());
                        assert_eq!(profile.len(), trim.axis(axis).kept_len());
                    }
                }
            }
        }
    }

    #[test]
    fn trim_slices_select_expected_bins() {
        let prediction = Array3::from_shape_fn((1, S, S), |(_, r, c)| (r * S + c) as f64);
        let trim = WindowTrim::for_window(&Window::new(0, 90, S), 100);
        let trimmed = trim.pairwise(prediction.view());

        assert_eq!(trimmed.shape(), &[1, 32, 42]);
        assert_eq!(trimmed[[0, 0, 0]], (32 * S) as f64);
        assert_eq!(trimmed[[0, 31, 41]], (63 * S + 41) as f64);
    }
}
