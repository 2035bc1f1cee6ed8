use super::accumulator::Accumulator;
use super::config::AssemblyConfig;
use super::error::EngineError;
use super::model::{CropModel, FeatureError, FeatureProvider};
use super::progress::{Progress, ProgressReporter};
use super::scheduler::{CropPlan, plan_crops};
use crate::core::assembly::mask::WeightMask;
use crate::core::models::domain::SequenceDomain;
use crate::core::models::prediction::PredictionMaps;
use crate::core::models::window::Window;
use ndarray::{Array3, Array4, Axis};
use rand::Rng;
use tracing::{debug, info, instrument};

/// Finalized maps of one model instance, with the plan that produced them.
#[derive(Debug, Clone)]
pub struct PassOutput {
    pub model: String,
    pub plan: CropPlan,
    pub maps: PredictionMaps,
}

/// Runs one model over a fresh crop plan of `domain` and stitches the results.
///
/// Windows are sent to the model in batches of at most `config.batch_size`; each
/// prediction is trimmed, weighted and merged as soon as its batch returns. The
/// caller is responsible for validating `features` beforehand.
#[instrument(skip_all, name = "assembly_pass", fields(model = model.name(), domain = domain.id()))]
pub fn run(
    domain: &SequenceDomain,
    model: &dyn CropModel,
    features: &dyn FeatureProvider,
    config: &AssemblyConfig,
    rng: &mut impl Rng,
    reporter: &ProgressReporter,
) -> Result<PassOutput, EngineError> {
    let length = domain.len();
    let plan = plan_crops(length, config.window_size, config.num_offsets, rng);
    info!(
        offset_pairs = plan.offset_pairs.len(),
        windows = plan.len(),
        "Starting assembly pass."
    );

    let mask = WeightMask::square(config.window_size, config.weighting);
    let mut accumulator = Accumulator::new(length, config.normalization);

    reporter.report(Progress::TaskStart {
        total_steps: plan.len() as u64,
    });
    for batch in plan.windows.chunks(config.batch_size) {
        let inputs = build_batch(domain, features, batch, config.window_size)?;
        let predictions = model.predict_batch(inputs.view())?;
        if predictions.len() != batch.len() {
            return Err(EngineError::BatchMismatch {
                model: model.name().to_string(),
                expected: batch.len(),
                found: predictions.len(),
            });
        }

        for (window, prediction) in batch.iter().zip(&predictions) {
            accumulator.merge_window(window, prediction, &mask)?;
        }
        reporter.report(Progress::TaskIncrement {
            steps: batch.len() as u64,
        });
    }
    reporter.report(Progress::TaskFinish);

    debug!(merged = accumulator.merged_windows(), "Finalizing accumulators.");
    let maps = accumulator.finalize()?;

    Ok(PassOutput {
        model: model.name().to_string(),
        plan,
        maps,
    })
}

/// Stacks the feature crops of `batch` into a `batch x depth x S x S` tensor.
fn build_batch(
    domain: &SequenceDomain,
    features: &dyn FeatureProvider,
    batch: &[Window],
    window_size: usize,
) -> Result<Array4<f32>, EngineError> {
    let mut crops: Vec<Array3<f32>> = Vec::with_capacity(batch.len());
    for window in batch {
        let crop = features
            .crop_features(domain, window)
            .map_err(|source| EngineError::Features {
                window: *window,
                source,
            })?;

        let depth = crops.first().map_or(crop.len_of(Axis(0)), |c| c.len_of(Axis(0)));
        if crop.shape() != [depth, window_size, window_size] {
            return Err(EngineError::Features {
                window: *window,
                source: FeatureError::Shape {
                    expected: format!("[{depth}, {window_size}, {window_size}]"),
                    found: crop.shape().to_vec(),
                },
            });
        }
        crops.push(crop);
    }

    let views: Vec<_> = crops.iter().map(|c| c.view()).collect();
    ndarray::stack(Axis(0), &views)
        .map_err(|e| EngineError::Internal(format!("failed to stack feature crops: {e}")))
}
