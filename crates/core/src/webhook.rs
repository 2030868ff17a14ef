//! Shared-secret checks for partner webhooks.
//!
//! Both directions (outbound product notifications and inbound manual media)
//! authenticate with the same secret carried in [`WEBHOOK_SECRET_HEADER`].

use subtle::ConstantTimeEq;

/// Header carrying the shared secret.
pub const WEBHOOK_SECRET_HEADER: &str = "X-Webhook-Secret";

/// Check a caller-provided secret against the configured one.
///
/// Returns `false` when no secret is configured, when the caller sent none,
/// or when they differ. The comparison runs in constant time.
pub fn verify_shared_secret(expected: Option<&str>, provided: Option<&str>) -> bool {
    match (expected, provided) {
        (Some(expected), Some(provided)) if !expected.is_empty() => {
            expected.as_bytes().ct_eq(provided.as_bytes()).into()
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_secret_passes() {
        assert!(verify_shared_secret(Some("s3cret"), Some("s3cret")));
    }

    #[test]
    fn wrong_or_missing_secret_fails() {
        assert!(!verify_shared_secret(Some("s3cret"), Some("guess")));
        assert!(!verify_shared_secret(Some("s3cret"), Some("s3cret ")));
        assert!(!verify_shared_secret(Some("s3cret"), None));
    }

    #[test]
    fn unconfigured_secret_rejects_everything() {
        assert!(!verify_shared_secret(None, Some("anything")));
        assert!(!verify_shared_secret(Some(""), Some("")));
        assert!(!verify_shared_secret(None, None));
    }
}
