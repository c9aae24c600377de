//! Object key derivation.

use uuid::Uuid;

/// Longest file name segment kept in an object key.
const MAX_NAME_LEN: usize = 128;

/// Build a fresh object key of the form `<uuid>/<sanitized name>`.
///
/// The UUID prefix keeps keys unique even when two uploads share a name.
pub fn object_key(name: &str) -> String {
    format!("{}/{}", Uuid::new_v4(), sanitize_name(name))
}

/// Reduce a client-supplied file name to a safe single path segment.
///
/// Directory components are dropped, and anything outside
/// `[A-Za-z0-9._-]` becomes `_`.
pub fn sanitize_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let mut cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_NAME_LEN)
        .collect();

    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.len() != cleaned.len() {
        cleaned = trimmed.to_string();
    }
    if cleaned.is_empty() {
        return "file".to_string();
    }
    cleaned
}
