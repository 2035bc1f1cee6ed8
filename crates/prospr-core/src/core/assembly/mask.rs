use crate::core::models::window::WindowAxis;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, s};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const RING_COUNT: usize = 4;
const RING_WEIGHT_STEP: f64 = 0.25;

/// How window outputs are weighted before they are accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeightingMode {
    /// Concentric rings, from 0.25 at the window edge up to 1.0 in the core.
    #[default]
    Centered,
    /// Weight 1 everywhere. Ablation mode.
    Uniform,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown weighting mode '{0}'. Expected 'centered' or 'uniform'")]
pub struct WeightingModeParseError(pub String);

impl WeightingMode {
    /// Label used in result descriptions.
    pub fn label(self) -> &'static str {
        match self {
            WeightingMode::Centered => "WEIGHTED",
            WeightingMode::Uniform => "UNIFORM",
        }
    }
}

impl fmt::Display for WeightingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightingMode::Centered => f.write_str("centered"),
            WeightingMode::Uniform => f.write_str("uniform"),
        }
    }
}

impl FromStr for WeightingMode {
    type Err = WeightingModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "centered" | "weighted" => Ok(WeightingMode::Centered),
            "uniform" => Ok(WeightingMode::Uniform),
            _ => Err(WeightingModeParseError(s.to_string())),
        }
    }
}

/// Spatial weights over one window plus the 1-D profiles through its center.
///
/// `row_profile` runs along the row (i) axis and is the mask column through the center;
/// `col_profile` runs along the column (j) axis and is the mask row through the center.
/// Per-residue channels, which have only one spatial axis per window side, are weighted
/// with these profiles.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightMask {
    mode: WeightingMode,
    full: Array2<f64>,
    row_profile: Array1<f64>,
    col_profile: Array1<f64>,
}

impl WeightMask {
    /// # Panics
    ///
    /// Panics if either dimension of `shape` is zero.
    pub fn build(shape: (usize, usize), mode: WeightingMode) -> Self {
        let (rows, cols) = shape;
        assert!(rows > 0 && cols > 0, "weight mask shape must be non-empty");

        let full = match mode {
            WeightingMode::Centered => centered_rings(rows, cols),
            WeightingMode::Uniform => Array2::ones((rows, cols)),
        };
        let row_profile = full.column(cols / 2).to_owned();
        let col_profile = full.row(rows / 2).to_owned();

        Self {
            mode,
            full,
            row_profile,
            col_profile,
        }
    }

    pub fn square(size: usize, mode: WeightingMode) -> Self {
        Self::build((size, size), mode)
    }

    #[inline]
    pub fn mode(&self) -> WeightingMode {
        self.mode
    }

    #[inline]
    pub fn full(&self) -> ArrayView2<'_, f64> {
        self.full.view()
    }

    #[inline]
    pub fn row_profile(&self) -> ArrayView1<'_, f64> {
        self.row_profile.view()
    }

    #[inline]
    pub fn col_profile(&self) -> ArrayView1<'_, f64> {
        self.col_profile.view()
    }

    pub fn profile(&self, axis: WindowAxis) -> ArrayView1<'_, f64> {
        match axis {
            WindowAxis::Row => self.row_profile(),
            WindowAxis::Column => self.col_profile(),
        }
    }
}

fn centered_rings(rows: usize, cols: usize) -> Array2<f64> {
    let row_step = rows / (2 * RING_COUNT);
    let col_step = cols / (2 * RING_COUNT);

    let mut mask = Array2::zeros((rows, cols));
    for ring in 0..RING_COUNT {
        let weight = RING_WEIGHT_STEP * (ring + 1) as f64;
        let (r0, r1) = (row_step * ring, rows - row_step * ring);
        let (c0, c1) = (col_step * ring, cols - col_step * ring);
        mask.slice_mut(s![r0..r1, c0..c1]).fill(weight);
    }
    mask
}
