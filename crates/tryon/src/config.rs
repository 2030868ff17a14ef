//! Try-on client configuration.

use std::time::Duration;

/// Default Gradio space running the IDM-VTON model.
pub const DEFAULT_ENDPOINT_URL: &str = "https://yisol-idm-vton.hf.space";

/// Path prefix of the Gradio HTTP API.
pub const DEFAULT_API_PREFIX: &str = "/gradio_api";

/// Legacy per-account variables, read when `TRYON_API_KEYS` is unset.
const LEGACY_KEY_VARS: [&str; 3] = [
    "HUGGING_FACE_API_KEY_1",
    "HUGGING_FACE_API_KEY_2",
    "HUGGING_FACE_API_KEY_3",
];

#[derive(Debug, Clone)]
pub struct TryOnConfig {
    pub endpoint_url: String,
    pub api_prefix: String,
    /// Account tokens for rotation. Empty means the free tier.
    pub api_keys: Vec<String>,
    /// Upper bound for one inference round trip.
    pub timeout: Duration,
}

impl TryOnConfig {
    /// Load try-on configuration from environment variables.
    ///
    /// | Env Var                          | Default                           |
    /// |----------------------------------|-----------------------------------|
    /// | `TRYON_ENDPOINT_URL`             | `https://yisol-idm-vton.hf.space` |
    /// | `TRYON_API_PREFIX`               | `/gradio_api`                     |
    /// | `TRYON_API_KEYS`                 | unset (comma-separated tokens)    |
    /// | `HUGGING_FACE_API_KEY_1..3`      | unset, used if the above is unset |
    /// | `TRYON_TIMEOUT_SECS`             | `300`                             |
    pub fn from_env() -> Self {
        let endpoint_url =
            std::env::var("TRYON_ENDPOINT_URL").unwrap_or_else(|_| DEFAULT_ENDPOINT_URL.into());
        let api_prefix =
            std::env::var("TRYON_API_PREFIX").unwrap_or_else(|_| DEFAULT_API_PREFIX.into());

        let api_keys = match std::env::var("TRYON_API_KEYS") {
            Ok(list) => split_keys(&list),
            Err(_) => LEGACY_KEY_VARS
                .iter()
                .filter_map(|var| std::env::var(var).ok())
                .filter(|k| !k.trim().is_empty())
                .collect(),
        };

        let timeout_secs: u64 = std::env::var("TRYON_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("TRYON_TIMEOUT_SECS must be a valid u64");

        Self {
            endpoint_url,
            api_prefix,
            api_keys,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

fn split_keys(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_list_is_trimmed() {
        assert_eq!(split_keys(" hf_a, ,hf_b "), vec!["hf_a", "hf_b"]);
        assert!(split_keys("").is_empty());
    }
}
