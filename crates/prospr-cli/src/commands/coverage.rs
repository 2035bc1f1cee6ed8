use crate::cli::CoverageArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use prospr::engine::progress::ProgressReporter;
use prospr::workflows::coverage::{self, CoverageReport, WeightStats};
use tracing::{info, warn};

pub fn run(args: CoverageArgs) -> Result<()> {
    let config = build_config(&args.assembly)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the coverage workflow...");
    let mut rng = config.rng();
    let report = coverage::run(args.length, &config, &mut rng, &reporter)?;

    println!("{}", render(&report));

    if report.is_complete() {
        Ok(())
    } else {
        warn!("Coverage is incomplete.");
        Err(CliError::Coverage(format!(
            "{} residue pairs and {} residues received no weight",
            report.pairwise.uncovered, report.residue.uncovered
        )))
    }
}

fn render_stats(label: &str, stats: &WeightStats) -> String {
    format!(
        "  {:<10} min {:>8.4}  max {:>8.4}  uncovered {}",
        label, stats.min, stats.max, stats.uncovered
    )
}

fn render(report: &CoverageReport) -> String {
    [
        format!(
            "Coverage of a {}-residue domain by {} windows of size {} ({} offset pairs, {} from coverage offsets)",
            report.length,
            report.windows,
            report.window_size,
            report.offset_pairs.len(),
            report.coverage_pairs
        ),
        render_stats("pairwise", &report.pairwise),
        render_stats("residue", &report.residue),
        if report.is_complete() {
            "✓ Every position is covered".to_string()
        } else {
            "✗ Some positions are uncovered".to_string()
        },
    ]
    .join("\n")
}
