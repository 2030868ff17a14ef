//! Catalog validation rules for products, models, and try-on model selection.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::types::DbId;

/// Minimum number of models a product can be fanned out to.
pub const MIN_SELECTED_MODELS: usize = 1;

/// Maximum number of models a product can be fanned out to.
pub const MAX_SELECTED_MODELS: usize = 3;

/// Image extensions accepted for product and model uploads.
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

/// Validate a caller-selected model list for a try-on fan-out.
///
/// The list must hold between [`MIN_SELECTED_MODELS`] and
/// [`MAX_SELECTED_MODELS`] ids and must not repeat an id.
pub fn validate_model_selection(model_ids: &[DbId]) -> Result<(), CoreError> {
    if model_ids.len() < MIN_SELECTED_MODELS {
        return Err(CoreError::Validation(format!(
            "Select at least {MIN_SELECTED_MODELS} model"
        )));
    }
    if model_ids.len() > MAX_SELECTED_MODELS {
        return Err(CoreError::Validation(format!(
            "Select at most {MAX_SELECTED_MODELS} models, got {}",
            model_ids.len()
        )));
    }

    let mut seen = HashSet::with_capacity(model_ids.len());
    for id in model_ids {
        if !seen.insert(*id) {
            return Err(CoreError::Validation(format!(
                "Model {id} is selected more than once"
            )));
        }
    }
    Ok(())
}

/// Validate a product or model display name.
pub fn validate_name(field: &str, name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Validate an optional product price. Prices must be finite and non-negative.
pub fn validate_price(price: Option<f64>) -> Result<(), CoreError> {
    match price {
        Some(p) if !p.is_finite() || p < 0.0 => Err(CoreError::Validation(format!(
            "price must be a non-negative number, got {p}"
        ))),
        _ => Ok(()),
    }
}

/// Validate that an uploaded file name carries a supported image extension.
pub fn validate_image_file_name(file_name: &str) -> Result<(), CoreError> {
    let ext = crate::naming::file_extension(file_name)
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if SUPPORTED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unsupported image format '{file_name}'. Supported: {}",
            SUPPORTED_IMAGE_EXTENSIONS.join(", ")
        )))
    }
}

/// Parse a model selection from a form value such as `"3,1,2"`.
///
/// Whitespace is ignored, order is preserved, and empty entries are skipped.
pub fn parse_model_ids(raw: &str) -> Result<Vec<DbId>, CoreError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<DbId>()
                .map_err(|_| CoreError::Validation(format!("Invalid model id '{s}'")))
        })
        .collect()
}
