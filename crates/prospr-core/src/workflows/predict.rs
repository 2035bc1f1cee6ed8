use crate::core::models::channel::{Channel, DIST_BIN_MAP};
use crate::core::models::domain::SequenceDomain;
use crate::core::models::prediction::PredictionMaps;
use crate::engine::config::AssemblyConfig;
use crate::engine::ensemble::{EnsembleAverager, PassSummary};
use crate::engine::error::EngineError;
use crate::engine::model::{CropModel, FeatureProvider, select_models};
use crate::engine::progress::{Progress, ProgressReporter};
use ndarray::ArrayViewD;
use tracing::{info, instrument};

/// Full-domain probability maps for one domain, with a record of how they were made.
#[derive(Debug, Clone)]
pub struct PredictionResult {
    pub domain: String,
    pub sequence: String,
    pub networks: Vec<String>,
    pub description: String,
    pub dist_bin_map: Vec<f64>,
    pub passes: Vec<PassSummary>,
    pub maps: PredictionMaps,
}

impl PredictionResult {
    pub fn channel(&self, channel: Channel) -> ArrayViewD<'_, f64> {
        self.maps.view(channel)
    }

    /// Every channel keyed by its short name (`dist`, `ss`, `phi`, `psi`, `asa`).
    pub fn channels(&self) -> impl Iterator<Item = (&'static str, ArrayViewD<'_, f64>)> {
        self.maps.iter().map(|(channel, view)| (channel.name(), view))
    }

    /// Offset pairs tiled per model pass.
    pub fn offset_pairs(&self) -> usize {
        self.passes.iter().map(|p| p.offset_pairs).max().unwrap_or(0)
    }

    pub fn windows_per_pass(&self) -> Vec<usize> {
        self.passes.iter().map(|p| p.windows).collect()
    }
}

#[instrument(skip_all, name = "prediction_workflow", fields(domain = domain.id()))]
pub fn run(
    domain: &SequenceDomain,
    models: &[Box<dyn CropModel>],
    features: &dyn FeatureProvider,
    config: &AssemblyConfig,
    reporter: &ProgressReporter,
) -> Result<PredictionResult, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Preparation",
    });
    let selected = select_models(&config.networks, models)?;
    let networks: Vec<String> = selected.iter().map(|m| m.name().to_string()).collect();
    info!(
        length = domain.len(),
        networks = %networks.join(", "),
        "Selected networks for prediction."
    );
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart {
        name: "Crop Assembly",
    });
    let mut rng = config.rng();
    let ensemble =
        EnsembleAverager::new(config).combine(domain, &selected, features, &mut rng, reporter)?;
    reporter.report(Progress::PhaseFinish);

    let mut result = PredictionResult {
        domain: domain.id().to_string(),
        sequence: domain.sequence().to_string(),
        networks,
        description: String::new(),
        dist_bin_map: DIST_BIN_MAP.to_vec(),
        passes: ensemble.passes,
        maps: ensemble.maps,
    };
    result.description = describe(&result, config);
    info!(description = %result.description, "Prediction finished.");
    Ok(result)
}

fn describe(result: &PredictionResult, config: &AssemblyConfig) -> String {
    format!(
        "{} predictions made with {} using {} crop assembly of {} grids, reported as PROBABILITIES",
        result.domain,
        result.networks.join(", "),
        config.weighting.label(),
        result.offset_pairs(),
    )
}
