//! # Engine Module
//!
//! The stateful half of crop assembly: everything that draws random numbers, owns
//! accumulation buffers, or talks to the external model.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Window size, offset count, batching, weighting and
//!   model selection, assembled through a builder
//! - **Error Handling** ([`error`]) - The engine-wide error type
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Crop Scheduling** ([`scheduler`]) - Offset-pair selection and window tiling with an
//!   injected random source
//! - **Accumulation** ([`accumulator`]) - Weighted sum and weight-total buffers over the
//!   whole domain
//! - **External Collaborators** ([`model`]) - The model and feature-provider traits
//! - **Assembly Pass** ([`pass`]) - One model's full plan, infer, trim, accumulate and
//!   finalize cycle
//! - **Ensembling** ([`ensemble`]) - Averaging across model instances and probability
//!   normalization
//!
//! Passes for different model instances share no mutable state; with the `parallel`
//! feature they run concurrently and meet only in the final reduction.

pub mod accumulator;
pub mod config;
pub mod ensemble;
pub mod error;
pub mod model;
pub mod pass;
pub mod progress;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod testing;
