//! Presence checks for the deployment `.env` file.
//!
//! Only keys are inspected; values are never read into the result. A file that
//! exists but cannot be read as UTF-8 text is reported as absent with a
//! warning so the calling flow keeps going.
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Keys whose presence is required before a deployment is considered viable.
pub const REQUIRED_VARIABLES: [&str; 3] = ["SERVER_HOST", "SERVER_USER", "SSH_PRIVATE_KEY"];

/// Variables the deploy templates expect, shown when the file is missing.
pub const RECOMMENDED_VARIABLES: [(&str, &str); 8] = [
    ("SERVER_HOST", "SSH host for GitHub Actions"),
    ("SERVER_USER", "SSH username for GitHub Actions"),
    ("SSH_PRIVATE_KEY", "SSH private key for GitHub Actions"),
    ("APP_NAME", "Your application name"),
    ("DEBUG_MODE", "Debug mode (True/False)"),
    ("API_VERSION", "API version (e.g., v1)"),
    ("ENVIRONMENT", "Deployment environment (e.g., production)"),
    ("PORT", "Application port"),
];

/// Result of one inspection; recomputed on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFileStatus {
    pub exists: bool,
    pub missing_required: BTreeSet<String>,
    /// Set when the file exists on disk but could not be read.
    pub read_warning: Option<String>,
}

/// True iff a regular file is readable at `path`.
pub fn file_exists(path: &Path) -> bool {
    path.is_file() && fs::File::open(path).is_ok()
}

/// Required names absent from the file; the full set when it cannot be read.
pub fn missing_required_variables(path: &Path, required: &[&str]) -> BTreeSet<String> {
    inspect(path, required).missing_required
}

/// Check existence and required keys in one read.
pub fn inspect(path: &Path, required: &[&str]) -> EnvFileStatus {
    let all_missing = || required.iter().map(|name| name.to_string()).collect();
    if !path.is_file() {
        return EnvFileStatus {
            exists: false,
            missing_required: all_missing(),
            read_warning: None,
        };
    }
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "env file unreadable");
            return EnvFileStatus {
                exists: false,
                missing_required: all_missing(),
                read_warning: Some(format!("could not read {}: {err}", path.display())),
            };
        }
    };
    let present = present_keys(&text);
    let missing_required = required
        .iter()
        .filter(|name| !present.contains(**name))
        .map(|name| name.to_string())
        .collect();
    EnvFileStatus {
        exists: true,
        missing_required,
        read_warning: None,
    }
}

/// Keys from `KEY=VALUE` lines, skipping blanks and `#` comments.
fn present_keys(text: &str) -> BTreeSet<&str> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, _)| key.trim())
        .filter(|key| !key.is_empty())
        .collect()
}
