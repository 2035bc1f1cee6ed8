use crate::error::{CliError, Result};
use prospr::core::assembly::mask::WeightingMode;
use prospr::engine::config::WindowNormalization;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileAssemblyConfig {
    pub window_size: Option<usize>,
    pub num_offsets: Option<usize>,
    pub batch_size: Option<usize>,
    pub weighting: Option<WeightingMode>,
    pub normalization: Option<WindowNormalization>,
    pub seed: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub assembly: Option<FileAssemblyConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_assembly_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prospr.toml");
        fs::write(
            &path,
            r#"
            [assembly]
            window-size = 32
            num-offsets = 4
            weighting = "uniform"
            seed = 11
            "#,
        )
        .unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        let assembly = config.assembly.unwrap();
        assert_eq!(assembly.window_size, Some(32));
        assert_eq!(assembly.num_offsets, Some(4));
        assert_eq!(assembly.batch_size, None);
        assert_eq!(assembly.weighting, Some(WeightingMode::Uniform));
        assert_eq!(assembly.seed, Some(11));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prospr.toml");
        fs::write(&path, "[assembly]\ncrop-size = 64\n").unwrap();

        let result = FileConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn network_selection_is_not_a_file_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prospr.toml");
        fs::write(&path, "[assembly]\nnetworks = \"b\"\n").unwrap();

        let result = FileConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let result = FileConfig::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
