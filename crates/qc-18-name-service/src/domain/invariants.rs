//! # Registry Invariants
//!
//! Name rules and structural checks over registry state.
//!
//! ## Invariants
//!
//! - At most one `Approved` alias per owner
//! - Names unique among `Pending` and `Approved` aliases
//! - An application exists iff its alias is `Pending`
//! - At most one application per applicant

use super::errors::AliasError;

/// Default upper bound on alias length, in characters.
pub const DEFAULT_MAX_NAME_LENGTH: usize = 64;

/// Trim, validate and lower-case an alias name.
pub fn normalize_alias_name(raw: &str, max_len: usize) -> Result<String, AliasError> {
    let name = raw.trim();
    let invalid = |reason: String| AliasError::InvalidName {
        name: raw.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(invalid("name is empty".into()));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(invalid(format!("character {c:?} not allowed")));
    }
    // ASCII only from here, so bytes and characters agree
    if name.len() > max_len {
        return Err(invalid(format!("longer than {max_len} characters")));
    }

    Ok(name.to_ascii_lowercase())
}
