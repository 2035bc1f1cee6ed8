use crate::error::Result;
use std::fs::File;
use std::path::PathBuf;
use tracing::Subscriber;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{Layer, filter::LevelFilter, fmt, prelude::*};

/// Console level for `-v` count and `--quiet`.
pub fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Level for the log file: never coarser than DEBUG, so per-batch detail is kept even
/// when the console is quiet.
pub fn file_level(verbosity: u8) -> LevelFilter {
    level_for(verbosity, false).max(LevelFilter::DEBUG)
}

/// File layer that also records when each span closes, so every assembly pass and
/// ensemble logs its busy and idle time.
fn file_layer<S>(file: File, verbosity: u8) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(file_level(verbosity))
}

/// Installs the global subscriber: a compact stderr layer filtered by `level_for`, plus a
/// file layer filtered by `file_level` when `log_file` is given.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact()
        .with_filter(level_for(verbosity, quiet));

    let file_layer = match log_file {
        Some(path) => Some(file_layer(File::create(&path)?, verbosity)),
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}
