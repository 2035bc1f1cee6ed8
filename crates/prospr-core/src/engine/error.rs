use thiserror::Error;

use super::config::ConfigError;
use super::model::{FeatureError, ModelError};
use crate::core::models::channel::Channel;
use crate::core::models::prediction::ShapeMismatch;
use crate::core::models::window::Window;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Network '{requested}' is not available. Available networks: {}", available.join(", "))]
    InvalidSelection {
        requested: String,
        available: Vec<String>,
    },

    #[error("No model instances were supplied")]
    NoModels,

    #[error("Input features for domain '{domain}' are invalid: {source}")]
    InvalidInput {
        domain: String,
        source: FeatureError,
    },

    #[error("Failed to extract features for window {window}: {source}")]
    Features { window: Window, source: FeatureError },

    #[error("Model inference failed: {source}")]
    Model {
        #[from]
        source: ModelError,
    },

    #[error("Model output for channel '{channel}' has shape {found:?}, expected {expected:?}")]
    ModelContract {
        channel: Channel,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("Model '{model}' returned {found} predictions for a batch of {expected} windows")]
    BatchMismatch {
        model: String,
        expected: usize,
        found: usize,
    },

    #[error("Channel '{channel}' has {count} positions that no window covered")]
    UncoveredPositions { channel: Channel, count: usize },

    #[error("Internal logic error: {0}")]
    Internal(String),
}

impl From<ShapeMismatch> for EngineError {
    fn from(mismatch: ShapeMismatch) -> Self {
        EngineError::ModelContract {
            channel: mismatch.channel,
            expected: mismatch.expected,
            found: mismatch.found,
        }
    }
}
