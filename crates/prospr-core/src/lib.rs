//! # ProSPr Core Library
//!
//! The crop-assembly engine behind ProSPr protein structure predictions. The predictive
//! network only accepts a fixed-size square window ("crop") of a protein, so this library
//! tiles the whole sequence with overlapping windows, asks an external model for a
//! prediction per window, and stitches the weighted window outputs back into
//! whole-sequence distance, secondary-structure, torsion-angle and solvent-accessibility
//! maps.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`SequenceDomain`, `Window`,
//!   `Channel`, prediction records) and the pure tiling geometry: coverage offsets,
//!   weight masks and boundary trimming.
//!
//! - **[`engine`]: The Logic Core.** The stateful layer. It owns crop scheduling with an
//!   injected random source, the accumulation buffers, the per-model assembly pass, the
//!   ensemble averager, and the traits through which the external model and feature
//!   provider are reached.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures: a full prediction for one
//!   domain across one or more model instances, and a model-free coverage diagnostic.

pub mod core;
pub mod engine;
pub mod workflows;
