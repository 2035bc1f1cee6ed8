//! # Workflows Module
//!
//! Top-level entry points that tie the [`engine`](crate::engine) and
//! [`core`](crate::core) layers into complete procedures.
//!
//! - **Prediction** ([`predict`]) - Model selection, input validation, one assembly pass
//!   per selected model, ensembling and probability normalization for one domain.
//! - **Coverage** ([`coverage`]) - A model-free dry run of the crop plan that reports
//!   how much mask weight every position of a domain would receive.

pub mod coverage;
pub mod predict;
