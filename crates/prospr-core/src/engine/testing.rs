//! Stub collaborators shared by the engine and workflow tests.

use super::model::{CropModel, FeatureError, FeatureProvider, ModelError};
use crate::core::models::channel::Channel;
use crate::core::models::domain::SequenceDomain;
use crate::core::models::prediction::{CropPrediction, ResidueMaps};
use crate::core::models::window::Window;
use ndarray::{Array2, Array3, ArrayView4, Axis};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Two-channel features holding the window origin: channel 0 is `i`, channel 1 is `j`.
pub struct OriginFeatures;

impl FeatureProvider for OriginFeatures {
    fn validate(&self, _domain: &SequenceDomain) -> Result<(), FeatureError> {
        Ok(())
    }

    fn crop_features(
        &self,
        _domain: &SequenceDomain,
        window: &Window,
    ) -> Result<Array3<f32>, FeatureError> {
        let mut crop = Array3::zeros((2, window.size, window.size));
        crop.index_axis_mut(Axis(0), 0).fill(window.i as f32);
        crop.index_axis_mut(Axis(0), 1).fill(window.j as f32);
        Ok(crop)
    }
}

/// Fails validation as if the domain's feature file lacked a required entry.
pub struct IncompleteFeatures;

impl FeatureProvider for IncompleteFeatures {
    fn validate(&self, domain: &SequenceDomain) -> Result<(), FeatureError> {
        Err(FeatureError::Missing(format!("pssm for {}", domain.id())))
    }

    fn crop_features(
        &self,
        _domain: &SequenceDomain,
        _window: &Window,
    ) -> Result<Array3<f32>, FeatureError> {
        Err(FeatureError::Other("features were never validated".to_string()))
    }
}

/// Emits the same value in every bin of every channel and records each batch size.
pub struct ConstantModel {
    pub name: String,
    pub value: f64,
    pub window_size: usize,
    pub calls: AtomicUsize,
    pub batch_sizes: Mutex<Vec<usize>>,
}

impl ConstantModel {
    pub fn new(name: &str, value: f64, window_size: usize) -> Self {
        Self {
            name: name.to_string(),
            value,
            window_size,
            calls: AtomicUsize::new(0),
            batch_sizes: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CropModel for ConstantModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict_batch(
        &self,
        inputs: ArrayView4<'_, f32>,
    ) -> Result<Vec<CropPrediction>, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let batch = inputs.len_of(Axis(0));
        self.batch_sizes
            .lock()
            .map_err(|_| ModelError::new(&self.name, "batch log poisoned"))?
            .push(batch);
        Ok((0..batch)
            .map(|_| CropPrediction::from_elem(self.window_size, self.value))
            .collect())
    }
}

/// Predicts a smooth function of absolute residue position, reading each window's
/// origin from [`OriginFeatures`].
///
/// Correct stitching reproduces [`FieldModel::pairwise`] and [`FieldModel::residue`]
/// exactly at every domain position.
pub struct FieldModel {
    pub window_size: usize,
}

impl FieldModel {
    pub fn pairwise(depth: usize, p: f64, q: f64) -> f64 {
        depth as f64 * 1000.0 + p * 10.0 + q
    }

    pub fn residue(depth: usize, p: f64) -> f64 {
        depth as f64 * 100.0 + p
    }

    fn axis_positions(&self, origin: f32) -> Vec<f64> {
        let start = origin as f64 - (self.window_size / 2) as f64;
        (0..self.window_size).map(|k| start + k as f64).collect()
    }

    fn residue_maps(&self, positions: &[f64]) -> ResidueMaps {
        let make = |channel: Channel| {
            Array2::from_shape_fn((channel.depth(), self.window_size), |(d, k)| {
                Self::residue(d, positions[k])
            })
        };
        ResidueMaps {
            secondary_structure: make(Channel::SecondaryStructure),
            phi: make(Channel::Phi),
            psi: make(Channel::Psi),
            solvent_accessibility: make(Channel::SolventAccessibility),
        }
    }
}

impl CropModel for FieldModel {
    fn name(&self) -> &str {
        "field"
    }

    fn predict_batch(
        &self,
        inputs: ArrayView4<'_, f32>,
    ) -> Result<Vec<CropPrediction>, ModelError> {
        Ok(inputs
            .outer_iter()
            .map(|crop| {
                let rows = self.axis_positions(crop[[0, 0, 0]]);
                let cols = self.axis_positions(crop[[1, 0, 0]]);
                CropPrediction {
                    distance: Array3::from_shape_fn(
                        (Channel::Distance.depth(), self.window_size, self.window_size),
                        |(d, r, c)| Self::pairwise(d, rows[r], cols[c]),
                    ),
                    row: self.residue_maps(&rows),
                    col: self.residue_maps(&cols),
                }
            })
            .collect())
    }
}

/// Returns one prediction fewer than it was asked for.
pub struct ShortBatchModel {
    pub window_size: usize,
}

impl CropModel for ShortBatchModel {
    fn name(&self) -> &str {
        "short"
    }

    fn predict_batch(
        &self,
        inputs: ArrayView4<'_, f32>,
    ) -> Result<Vec<CropPrediction>, ModelError> {
        let batch = inputs.len_of(Axis(0));
        Ok((1..batch)
            .map(|_| CropPrediction::from_elem(self.window_size, 0.0))
            .collect())
    }
}

pub fn domain(length: usize) -> SequenceDomain {
    let sequence: String = "ACDEFGHIKLMNPQRSTVWY".chars().cycle().take(length).collect();
    SequenceDomain::new("T0000", &sequence).expect("stub sequence is valid")
}
