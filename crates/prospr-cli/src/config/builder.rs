use super::defaults::DefaultsConfig;
use super::file::{FileAssemblyConfig, FileConfig};
use crate::cli::AssemblyArgs;
use crate::error::{CliError, Result};
use prospr::core::assembly::mask::WeightingMode;
use prospr::engine::config::{AssemblyConfig, AssemblyConfigBuilder, WindowNormalization};
use std::fmt::Display;
use std::str::FromStr;

/// Layers built-in defaults, the optional config file, `--set` overrides and explicit
/// flags, in increasing precedence.
pub fn build_config(args: &AssemblyArgs) -> Result<AssemblyConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;
    let file = file_config.assembly.take().unwrap_or_default();

    let weighting = if args.uniform {
        WeightingMode::Uniform
    } else {
        file.weighting.unwrap_or(defaults.weighting)
    };
    let normalization = if args.no_normalize {
        WindowNormalization::Disabled
    } else {
        file.normalization.unwrap_or(defaults.normalization)
    };

    AssemblyConfigBuilder::new()
        .window_size(
            args.window_size
                .or(file.window_size)
                .unwrap_or(defaults.window_size),
        )
        .num_offsets(
            args.num_offsets
                .or(file.num_offsets)
                .unwrap_or(defaults.num_offsets),
        )
        .batch_size(
            args.batch_size
                .or(file.batch_size)
                .unwrap_or(defaults.batch_size),
        )
        .weighting(weighting)
        .normalization(normalization)
        .seed(args.seed.or(file.seed))
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

fn parse_value<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| CliError::Config(format!("Invalid value for {}: {} ({})", key, value, e)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let assembly: &mut FileAssemblyConfig =
            config.assembly.get_or_insert_with(Default::default);

        match key.trim() {
            "assembly.window-size" => assembly.window_size = Some(parse_value(key, value)?),
            "assembly.num-offsets" => assembly.num_offsets = Some(parse_value(key, value)?),
            "assembly.batch-size" => assembly.batch_size = Some(parse_value(key, value)?),
            "assembly.weighting" => assembly.weighting = Some(parse_value(key, value)?),
            "assembly.normalization" => assembly.normalization = Some(parse_value(key, value)?),
            "assembly.seed" => assembly.seed = Some(parse_value(key, value)?),
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
