//! Object naming for uploaded media.
//!
//! Stored objects get a collision-resistant name built from the upload time
//! and a short random suffix, keeping the extension of the original file:
//! `{unix_millis}-{suffix}.{ext}`.

use rand::Rng;

/// Length of the random suffix appended after the timestamp.
pub const SUFFIX_LENGTH: usize = 7;

/// Characters the random suffix is drawn from.
const SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Extract the extension of a file name, if it has one.
///
/// Returns `None` for names without a dot, names ending in a dot, and
/// dot-files such as `.env`.
pub fn file_extension(file_name: &str) -> Option<&str> {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let (stem, ext) = base.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext)
}

/// Build an object name from its parts.
///
/// ```
/// use vline_core::naming::object_name;
///
/// assert_eq!(object_name(1700000000000, "k3j9x2a", Some("png")), "1700000000000-k3j9x2a.png");
/// assert_eq!(object_name(1700000000000, "k3j9x2a", None), "1700000000000-k3j9x2a");
/// ```
pub fn object_name(unix_millis: i64, suffix: &str, extension: Option<&str>) -> String {
    match extension {
        Some(ext) => format!("{unix_millis}-{suffix}.{ext}"),
        None => format!("{unix_millis}-{suffix}"),
    }
}

/// Generate a random lowercase alphanumeric suffix of [`SUFFIX_LENGTH`].
pub fn random_suffix() -> String {
    let mut rng = rand::rng();
    (0..SUFFIX_LENGTH)
        .map(|_| SUFFIX_CHARSET[rng.random_range(0..SUFFIX_CHARSET.len())] as char)
        .collect()
}

/// Generate a fresh object name for an uploaded file, preserving its extension.
pub fn generate_object_name(original_file_name: &str) -> String {
    object_name(
        chrono::Utc::now().timestamp_millis(),
        &random_suffix(),
        file_extension(original_file_name),
    )
}
