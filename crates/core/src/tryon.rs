//! Fixed generation parameters for the virtual try-on endpoint.
//!
//! The parameters never vary between calls, so two calls with the same
//! garment and person images against the same endpoint version produce the
//! same output.

use serde::Serialize;

/// Garment description sent with every request.
pub const GARMENT_DESCRIPTION: &str = "clothing";

/// Denoising step count.
pub const DENOISE_STEPS: u32 = 30;

/// Random seed.
pub const SEED: i64 = 42;

/// Parameters sent alongside the two source images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationParams {
    pub garment_description: String,
    /// Let the endpoint compute the garment mask automatically.
    pub auto_mask: bool,
    /// Crop and resize the person image before inference.
    pub auto_crop: bool,
    pub denoise_steps: u32,
    pub seed: i64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            garment_description: GARMENT_DESCRIPTION.to_string(),
            auto_mask: true,
            auto_crop: false,
            denoise_steps: DENOISE_STEPS,
            seed: SEED,
        }
    }
}
