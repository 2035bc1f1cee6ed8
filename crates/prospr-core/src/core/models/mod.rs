//! # Models Module
//!
//! Data structures shared by every layer of the crop-assembly pipeline.
//!
//! - [`domain`] - The protein sequence being predicted
//! - [`window`] - A single square crop of the prediction surface
//! - [`channel`] - The output channels of the model contract and their constants
//! - [`prediction`] - Fixed records holding one array per channel

pub mod channel;
pub mod domain;
pub mod prediction;
pub mod window;
