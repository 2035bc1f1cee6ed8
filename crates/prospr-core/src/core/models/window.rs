use std::fmt;

/// One square crop of the pairwise prediction surface.
///
/// The origin is the window's center residue along each axis: a window with origin `o`
/// and size `S` spans residues `[o - S/2, o - S/2 + S)`, so windows near the start of the
/// sequence hang over the leading boundary and are trimmed before accumulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Window {
    pub i: usize,    // Origin along the row (first residue) axis
    pub j: usize,    // Origin along the column (second residue) axis
    pub size: usize, // Edge length S of the square crop
}

/// The two spatial axes of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowAxis {
    Row,
    Column,
}

impl Window {
    pub fn new(i: usize, j: usize, size: usize) -> Self {
        Self { i, j, size }
    }

    #[inline]
    pub fn origin(&self) -> (usize, usize) {
        (self.i, self.j)
    }

    /// Half the window size; the distance from the origin to the window's leading edge.
    #[inline]
    pub fn margin(&self) -> usize {
        self.size / 2
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.i, self.j)
    }
}

impl WindowAxis {
    pub const BOTH: [WindowAxis; 2] = [WindowAxis::Row, WindowAxis::Column];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margin_is_half_the_window_size() {
        assert_eq!(Window::new(0, 0, 64).margin(), 32);
        assert_eq!(Window::new(0, 0, 8).margin(), 4);
    }

    #[test]
    fn origin_and_display_use_row_then_column() {
        let window = Window::new(3, 70, 64);
        assert_eq!(window.origin(), (3, 70));
        assert_eq!(window.to_string(), "(3, 70)");
    }

    #[test]
    fn windows_order_row_major() {
        let mut windows = vec![
            Window::new(64, 0, 64),
            Window::new(0, 64, 64),
            Window::new(0, 0, 64),
        ];
        windows.sort();
        assert_eq!(
            windows,
            vec![
                Window::new(0, 0, 64),
                Window::new(0, 64, 64),
                Window::new(64, 0, 64),
            ]
        );
    }
}
