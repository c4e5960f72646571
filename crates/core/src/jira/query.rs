//! JQL builders.

/// Every visible issue, newest first.
pub const ALL_BY_CREATED_DESC: &str = "ORDER BY created DESC";

/// Select exactly `keys`: `key IN (A-1, B-2)`.
///
/// Keys are internal identifiers and are not escaped; callers must not pass
/// untrusted input.
pub fn key_in_query<S: AsRef<str>>(keys: &[S]) -> String {
    let joined = keys
        .iter()
        .map(|k| k.as_ref())
        .collect::<Vec<_>>()
        .join(", ");
    format!("key IN ({})", joined)
}
