use crate::core::assembly::mask::WeightMask;
use crate::core::assembly::trim::WindowTrim;
use crate::core::models::window::WindowAxis;
use crate::engine::accumulator::ChannelBuffer;
use crate::engine::config::{AssemblyConfig, ConfigError};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::scheduler::plan_crops;
use rand::Rng;
use tracing::{info, instrument, warn};

/// Spread of accumulated mask weight over one kind of position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightStats {
    pub min: f64,
    pub max: f64,
    pub uncovered: usize,
}

impl WeightStats {
    fn of(buffer: &ChannelBuffer) -> Self {
        let totals = buffer.weight_total();
        Self {
            min: totals.iter().copied().fold(f64::INFINITY, f64::min),
            max: totals.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            uncovered: buffer.uncovered(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoverageReport {
    pub length: usize,
    pub window_size: usize,
    pub offset_pairs: Vec<(usize, usize)>,
    pub coverage_pairs: usize,
    pub windows: usize,
    pub pairwise: WeightStats, // Over every (i, j) residue pair
    pub residue: WeightStats,  // Over every residue, row and column profiles combined
}

impl CoverageReport {
    /// True when every pair and every residue received positive weight.
    pub fn is_complete(&self) -> bool {
        self.pairwise.uncovered == 0 && self.residue.uncovered == 0
    }
}

/// Plans crops for a domain of `length` residues and accumulates only the mask weights,
/// without running any model.
#[instrument(skip_all, name = "coverage_workflow", fields(length = length))]
pub fn run(
    length: usize,
    config: &AssemblyConfig,
    rng: &mut impl Rng,
    reporter: &ProgressReporter,
) -> Result<CoverageReport, EngineError> {
    if length == 0 {
        return Err(ConfigError::InvalidParameter {
            name: "length",
            reason: "domain must contain at least one residue".to_string(),
        }
        .into());
    }

    reporter.report(Progress::PhaseStart {
        name: "Coverage Check",
    });
    let plan = plan_crops(length, config.window_size, config.num_offsets, rng);
    let mask = WeightMask::square(config.window_size, config.weighting);

    let mut pairwise = ChannelBuffer::zeros(&[1, length, length]);
    let mut residue = ChannelBuffer::zeros(&[1, length]);

    reporter.report(Progress::TaskStart {
        total_steps: plan.len() as u64,
    });
    for batch in plan.windows.chunks(config.batch_size) {
        for window in batch {
            let trim = WindowTrim::for_window(window, length);
            pairwise.add_weight(
                trim.mask(mask.full()).into_dyn(),
                &[trim.row.place_at, trim.col.place_at],
            )?;
            for axis in WindowAxis::BOTH {
                residue.add_weight(
                    trim.profile(axis, mask.profile(axis)).into_dyn(),
                    &[trim.axis(axis).place_at],
                )?;
            }
        }
        reporter.report(Progress::TaskIncrement {
            steps: batch.len() as u64,
        });
    }
    reporter.report(Progress::TaskFinish);

    let report = CoverageReport {
        length,
        window_size: config.window_size,
        coverage_pairs: plan.coverage_pairs,
        windows: plan.len(),
        pairwise: WeightStats::of(&pairwise),
        residue: WeightStats::of(&residue),
        offset_pairs: plan.offset_pairs,
    };

    if report.is_complete() {
        info!(
            windows = report.windows,
            min_weight = report.pairwise.min,
            "Every position is covered."
        );
    } else {
        warn!(
            uncovered_pairs = report.pairwise.uncovered,
            uncovered_residues = report.residue.uncovered,
            "Crop plan leaves positions without weight."
        );
    }
    reporter.report(Progress::PhaseFinish);
    Ok(report)
}
