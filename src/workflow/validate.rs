//! Operator input validation for `init`.
use regex::Regex;
use std::sync::OnceLock;

/// Minimum accepted length of a personal access token.
pub const MIN_CREDENTIAL_LEN: usize = 40;

fn repository_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*/[A-Za-z0-9_.-]+$").expect("valid repository regex")
    })
}

/// Accept `owner/name` identifiers.
pub fn validate_repository(value: &str) -> Result<(), String> {
    if repository_pattern().is_match(value) {
        Ok(())
    } else {
        Err("Repository must be in format 'username/repo-name'".to_string())
    }
}

/// Accept tokens of at least [`MIN_CREDENTIAL_LEN`] characters.
pub fn validate_credential(value: &str) -> Result<(), String> {
    if value.chars().count() >= MIN_CREDENTIAL_LEN {
        Ok(())
    } else {
        Err(format!(
            "PAT should be at least {MIN_CREDENTIAL_LEN} characters long"
        ))
    }
}
