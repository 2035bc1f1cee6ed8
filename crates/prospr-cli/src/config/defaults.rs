use prospr::core::assembly::mask::WeightingMode;
use prospr::core::models::channel::CROP_SIZE;
use prospr::engine::config::WindowNormalization;

/// Built-in settings: the production ProSPr assembly of ten weighted grids of 64 x 64
/// crops, two windows per model call.
pub struct DefaultsConfig {
    pub window_size: usize,
    pub num_offsets: usize,
    pub batch_size: usize,
    pub weighting: WeightingMode,
    pub normalization: WindowNormalization,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            window_size: CROP_SIZE,
            num_offsets: 10,
            batch_size: 2,
            weighting: WeightingMode::Centered,
            normalization: WindowNormalization::Standardize,
        }
    }
}
