use super::config::AssemblyConfig;
use super::error::EngineError;
use super::model::{CropModel, FeatureProvider};
use super::pass::{self, PassOutput};
use super::progress::{Progress, ProgressReporter};
use crate::core::models::channel::Channel;
use crate::core::models::domain::SequenceDomain;
use crate::core::models::prediction::PredictionMaps;
use crate::core::utils::numeric::softmax_depth;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// What one model instance contributed to an ensemble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassSummary {
    pub model: String,
    pub offset_pairs: usize,
    pub windows: usize,
}

impl From<&PassOutput> for PassSummary {
    fn from(output: &PassOutput) -> Self {
        Self {
            model: output.model.clone(),
            offset_pairs: output.plan.offset_pairs.len(),
            windows: output.plan.len(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnsembleOutput {
    /// Per-channel probabilities: softmax over depth of the cross-model mean.
    pub maps: PredictionMaps,
    pub passes: Vec<PassSummary>,
}

/// Runs one assembly pass per model instance and combines the results.
///
/// Each pass gets its own random source, seeded from the caller's generator before any
/// pass starts, so a seeded run is reproducible whether passes run one after another or
/// concurrently.
pub struct EnsembleAverager<'a> {
    config: &'a AssemblyConfig,
}

impl<'a> EnsembleAverager<'a> {
    pub fn new(config: &'a AssemblyConfig) -> Self {
        Self { config }
    }

    /// Averages all passes and normalizes the mean into probabilities.
    #[instrument(skip_all, name = "ensemble", fields(domain = domain.id(), models = models.len()))]
    pub fn combine(
        &self,
        domain: &SequenceDomain,
        models: &[&dyn CropModel],
        features: &dyn FeatureProvider,
        rng: &mut impl Rng,
        reporter: &ProgressReporter,
    ) -> Result<EnsembleOutput, EngineError> {
        let (mean, passes) = self.average_passes(domain, models, features, rng, reporter)?;
        info!(passes = passes.len(), "Normalizing ensemble mean into probabilities.");
        Ok(EnsembleOutput {
            maps: normalize_probabilities(mean),
            passes,
        })
    }

    /// Runs every pass and returns the element-wise arithmetic mean of their maps,
    /// before any probability normalization.
    pub fn average_passes(
        &self,
        domain: &SequenceDomain,
        models: &[&dyn CropModel],
        features: &dyn FeatureProvider,
        rng: &mut impl Rng,
        reporter: &ProgressReporter,
    ) -> Result<(PredictionMaps, Vec<PassSummary>), EngineError> {
        if models.is_empty() {
            return Err(EngineError::NoModels);
        }
        features
            .validate(domain)
            .map_err(|source| EngineError::InvalidInput {
                domain: domain.id().to_string(),
                source,
            })?;

        let seeds: Vec<u64> = models.iter().map(|_| rng.r#gen()).collect();
        let outputs = self.run_passes(domain, models, features, &seeds, reporter)?;

        let passes = outputs.iter().map(PassSummary::from).collect();
        let mean = average(outputs.into_iter().map(|o| o.maps).collect())?;
        Ok((mean, passes))
    }

    fn run_passes(
        &self,
        domain: &SequenceDomain,
        models: &[&dyn CropModel],
        features: &dyn FeatureProvider,
        seeds: &[u64],
        reporter: &ProgressReporter,
    ) -> Result<Vec<PassOutput>, EngineError> {
        let total = models.len();
        let run_one = |(index, (model, seed)): (usize, (&&dyn CropModel, &u64))| {
            reporter.report(Progress::PassStart {
                model: model.name().to_string(),
                index,
                total,
            });
            let mut rng = StdRng::seed_from_u64(*seed);
            pass::run(domain, *model, features, self.config, &mut rng, reporter)
        };

        #[cfg(not(feature = "parallel"))]
        let results: Vec<Result<PassOutput, EngineError>> =
            models.iter().zip(seeds).enumerate().map(run_one).collect();

        #[cfg(feature = "parallel")]
        let results: Vec<Result<PassOutput, EngineError>> = models
            .par_iter()
            .zip(seeds.par_iter())
            .enumerate()
            .map(run_one)
            .collect();

        results.into_iter().collect()
    }
}

/// Element-wise arithmetic mean of per-model maps.
pub fn average(maps: Vec<PredictionMaps>) -> Result<PredictionMaps, EngineError> {
    let count = maps.len();
    let mut iter = maps.into_iter();
    let Some(mut total) = iter.next() else {
        return Err(EngineError::NoModels);
    };
    for maps in iter {
        if maps.length() != total.length() {
            return Err(EngineError::Internal(format!(
                "cannot average maps of length {} and {}",
                total.length(),
                maps.length()
            )));
        }
        total += &maps;
    }
    total *= 1.0 / count as f64;
    Ok(total)
}

/// Softmax over the depth axis of every channel, at every position.
pub fn normalize_probabilities(mut maps: PredictionMaps) -> PredictionMaps {
    for channel in Channel::ALL {
        softmax_depth(maps.view_mut(channel));
    }
    maps
}
