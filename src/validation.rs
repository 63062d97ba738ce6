//! Input validation for HTTP check definitions
//!
//! Pure predicates with no I/O. They run before any store is touched, so a
//! rejected definition never produces a partial write.

use crate::error::{HttpCheckError, Result};
use regex::Regex;
use std::sync::OnceLock;

/// `scheme://host.tld[/path]` with scheme http/https and a 2-4 letter TLD.
const URI_PATTERN: &str = r"^(http|https)://[a-zA-Z0-9.-]+\.[a-zA-Z]{2,4}(/.*)?$";

fn uri_regex() -> &'static Regex {
    static URI_REGEX: OnceLock<Regex> = OnceLock::new();
    URI_REGEX.get_or_init(|| Regex::new(URI_PATTERN).expect("URI pattern is a valid regex"))
}

/// Returns true when `uri` is an http(s) target with a dotted host.
pub fn is_valid_uri(uri: &str) -> bool {
    uri_regex().is_match(uri)
}

/// Validates a target URI, producing a `Validation` error on mismatch.
pub fn validate_uri(uri: &str) -> Result<()> {
    if is_valid_uri(uri) {
        Ok(())
    } else {
        Err(HttpCheckError::Validation(format!(
            "Invalid URI format: {uri:?}"
        )))
    }
}

/// Validates the display name used as the resource name.
///
/// Resource names must be RFC 1123 subdomains: lowercase alphanumerics, `-`
/// and `.`, starting and ending alphanumeric, at most 253 characters.
pub fn validate_name(name: &str) -> Result<()> {
    const MAX_NAME_LENGTH: usize = 253;

    if name.is_empty() {
        return Err(HttpCheckError::Validation(
            "Check name cannot be empty".to_string(),
        ));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(HttpCheckError::Validation(format!(
            "Check name too long: {} chars (max: {MAX_NAME_LENGTH})",
            name.len()
        )));
    }

    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.');
    let alnum_edges = name.starts_with(|c: char| c.is_ascii_alphanumeric())
        && name.ends_with(|c: char| c.is_ascii_alphanumeric());

    if valid_chars && alnum_edges {
        Ok(())
    } else {
        Err(HttpCheckError::Validation(format!(
            "Check name {name:?} must consist of lowercase alphanumerics, '-' or '.'"
        )))
    }
}
