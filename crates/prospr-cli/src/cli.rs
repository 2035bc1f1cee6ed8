use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Wendy Billings, Jacob Stern, Bryce Hedelius, Dennis Della Corte",
    version,
    about = "ProSPr CLI - Inspect and validate the crop-assembly plans ProSPr uses to stitch fixed-size network predictions into whole-protein maps.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress console log output except for errors; a log file still records debug detail
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the coverage offsets, offset pairs and windows planned for a domain length.
    Plan(PlanArgs),
    /// Tile a domain with the weight masks alone and report how every position is covered.
    Coverage(CoverageArgs),
}

/// Arguments for the `plan` subcommand.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Number of residues in the domain.
    #[arg(short = 'L', long, value_name = "INT")]
    pub length: usize,

    /// List every planned window origin.
    #[arg(long)]
    pub show_windows: bool,

    #[command(flatten)]
    pub assembly: AssemblyArgs,
}

/// Arguments for the `coverage` subcommand.
#[derive(Args, Debug)]
pub struct CoverageArgs {
    /// Number of residues in the domain.
    #[arg(short = 'L', long, value_name = "INT")]
    pub length: usize,

    #[command(flatten)]
    pub assembly: AssemblyArgs,
}

/// Crop-assembly settings shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct AssemblyArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the edge length of the square crop window.
    #[arg(short = 'w', long, value_name = "INT")]
    pub window_size: Option<usize>,

    /// Override the number of distinct offset pairs tiled per model pass.
    #[arg(short = 'n', long, value_name = "INT")]
    pub num_offsets: Option<usize>,

    /// Override the maximum number of windows per model call.
    #[arg(short, long, value_name = "INT")]
    pub batch_size: Option<usize>,

    /// Weight every window bin equally instead of favouring the window center.
    #[arg(long)]
    pub uniform: bool,

    /// Accumulate raw window outputs without per-window standardization.
    #[arg(long)]
    pub no_normalize: bool,

    /// Seed for offset sampling. Runs without a seed draw from system entropy.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S assembly.num-offsets=5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
