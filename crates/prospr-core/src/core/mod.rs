//! # Core Module
//!
//! Stateless building blocks of crop assembly.
//!
//! ## Architecture
//!
//! - **Data Models** ([`models`]) - Sequence domains, windows, prediction channels and the
//!   fixed per-channel prediction records
//! - **Tiling Geometry** ([`assembly`]) - Coverage offsets, center-weighted masks and
//!   boundary trimming of windows
//! - **Numerics** ([`utils`]) - Per-window standardization and depth-wise softmax
//!
//! Nothing in this module holds mutable state across calls or touches a random source;
//! everything here is deterministic in its inputs.

pub mod assembly;
pub mod models;
pub mod utils;
