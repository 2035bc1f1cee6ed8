//! Seams to the two external collaborators of an assembly pass: the trained network
//! that scores a batch of windows, and the provider that cuts per-window input features
//! out of the domain's feature set.

use super::config::NetworkSelection;
use super::error::EngineError;
use crate::core::models::domain::SequenceDomain;
use crate::core::models::prediction::CropPrediction;
use crate::core::models::window::Window;
use ndarray::{Array3, ArrayView4};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeatureError {
    #[error("Missing input feature: {0}")]
    Missing(String),

    #[error("Feature tensor has shape {found:?}, expected {expected}")]
    Shape { expected: String, found: Vec<usize> },

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Model '{model}' failed: {message}")]
pub struct ModelError {
    pub model: String,
    pub message: String,
}

impl ModelError {
    pub fn new(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            message: message.into(),
        }
    }
}

/// A trained crop network.
///
/// `predict_batch` receives a `batch x depth x S x S` input tensor and must return one
/// [`CropPrediction`] per batch entry, in batch order. Implementations are shared across
/// concurrent passes and must not rely on interior mutation for correctness.
pub trait CropModel: Send + Sync {
    fn name(&self) -> &str;

    fn predict_batch(&self, inputs: ArrayView4<'_, f32>) -> Result<Vec<CropPrediction>, ModelError>;
}

/// Produces `depth x S x S` feature crops for windows of a domain.
///
/// Positions of a window that fall outside the domain are expected to be zero-filled.
pub trait FeatureProvider: Sync {
    /// Checks that the domain's feature set is complete. Called once per prediction,
    /// before any window is scheduled.
    fn validate(&self, domain: &SequenceDomain) -> Result<(), FeatureError>;

    fn crop_features(
        &self,
        domain: &SequenceDomain,
        window: &Window,
    ) -> Result<Array3<f32>, FeatureError>;
}

/// Resolves a [`NetworkSelection`] against the supplied model instances.
pub fn select_models<'a>(
    selection: &NetworkSelection,
    models: &'a [Box<dyn CropModel>],
) -> Result<Vec<&'a dyn CropModel>, EngineError> {
    if models.is_empty() {
        return Err(EngineError::NoModels);
    }

    match selection {
        NetworkSelection::All => Ok(models.iter().map(|m| m.as_ref()).collect()),
        NetworkSelection::Named(name) => models
            .iter()
            .find(|m| m.name() == name)
            .map(|m| vec![m.as_ref()])
            .ok_or_else(|| EngineError::InvalidSelection {
                requested: name.clone(),
                available: models.iter().map(|m| m.name().to_string()).collect(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    impl CropModel for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn predict_batch(
            &self,
            _inputs: ArrayView4<'_, f32>,
        ) -> Result<Vec<CropPrediction>, ModelError> {
            Err(ModelError::new(self.0, "not used"))
        }
    }

    fn instances() -> Vec<Box<dyn CropModel>> {
        vec![Box::new(Named("a")), Box::new(Named("b")), Box::new(Named("c"))]
    }

    #[test]
    fn select_all_returns_every_instance_in_order() {
        let models = instances();
        let selected = select_models(&NetworkSelection::All, &models).unwrap();
        let names: Vec<_> = selected.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn select_named_returns_single_instance() {
        let models = instances();
        let selected =
            select_models(&NetworkSelection::Named("b".to_string()), &models).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name(), "b");
    }

    #[test]
    fn select_unknown_name_lists_available_networks() {
        let models = instances();
        let Err(err) = select_models(&NetworkSelection::Named("z".to_string()), &models) else {
            panic!("expected an invalid selection");
        };
        match err {
            EngineError::InvalidSelection {
                requested,
                available,
            } => {
                assert_eq!(requested, "z");
                assert_eq!(available, vec!["a", "b", "c"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn select_from_empty_set_fails() {
        let models: Vec<Box<dyn CropModel>> = Vec::new();
        assert!(matches!(
            select_models(&NetworkSelection::All, &models),
            Err(EngineError::NoModels)
        ));
    }
}
