//! # Assembly Geometry
//!
//! Pure coordinate bookkeeping for tiling a protein with fixed-size windows.
//!
//! - [`grid`] - Precomputed window start offsets that guarantee full coverage
//! - [`mask`] - Spatial weights favouring window centers over window edges
//! - [`trim`] - Trimming of windows that overhang either end of the sequence
//!
//! A window with origin `o` and size `S` spans residues `[o - S/2, o - S/2 + S)`. All three
//! submodules share that convention; the trimming arithmetic depends on it.

pub mod grid;
pub mod mask;
pub mod trim;
