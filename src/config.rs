//! Tool configuration.
//!
//! Each setting resolves in priority order:
//! 1. CLI flag
//! 2. `config.json` (`--config`, or the platform config dir)
//! 3. `FASTAPI_DEPLOY_*` environment variable
//! 4. built-in default
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://github-secrets.vercel.app/api/github-secrets";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const API_URL_ENV: &str = "FASTAPI_DEPLOY_API_URL";
pub const TEMPLATES_DIR_ENV: &str = "FASTAPI_DEPLOY_TEMPLATES_DIR";
const CONFIG_DIR_NAME: &str = "fastapi-deploy";
const CONFIG_FILE_NAME: &str = "config.json";

/// On-disk config; every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub api_url: Option<String>,
    pub templates_dir: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
}

/// Overrides supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub api_url: Option<String>,
    pub templates_dir: Option<PathBuf>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployConfig {
    pub api_url: String,
    pub templates_dir: Option<PathBuf>,
    pub request_timeout: Duration,
}

/// Default config file location, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load the config file; a missing file yields an empty config.
pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parse config JSON {}", path.display()))
}

/// Resolve settings from flags, the config file and the process environment.
pub fn load(overrides: &ConfigOverrides) -> Result<DeployConfig> {
    let file = match overrides.config_path.clone().or_else(default_config_path) {
        Some(path) => load_config_file(&path)?,
        None => ConfigFile::default(),
    };
    let env_lookup = |key: &str| env::var(key).ok();
    resolve(overrides, &file, env_lookup)
}

fn resolve<F>(overrides: &ConfigOverrides, file: &ConfigFile, env_lookup: F) -> Result<DeployConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |value: String| {
        let trimmed = value.trim().to_string();
        (!trimmed.is_empty()).then_some(trimmed)
    };
    let non_empty_path = |path: PathBuf| (!path.as_os_str().is_empty()).then_some(path);
    let api_url = overrides
        .api_url
        .clone()
        .and_then(non_empty)
        .or_else(|| file.api_url.clone().and_then(non_empty))
        .or_else(|| env_lookup(API_URL_ENV).and_then(non_empty))
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let templates_dir = overrides
        .templates_dir
        .clone()
        .and_then(non_empty_path)
        .or_else(|| file.templates_dir.clone().and_then(non_empty_path))
        .or_else(|| env_lookup(TEMPLATES_DIR_ENV).and_then(non_empty).map(PathBuf::from));
    let timeout_secs = file
        .request_timeout_secs
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

    let config = DeployConfig {
        api_url,
        templates_dir,
        request_timeout: Duration::from_secs(timeout_secs),
    };
    validate(&config)?;
    Ok(config)
}

/// Reject settings that cannot work.
pub fn validate(config: &DeployConfig) -> Result<()> {
    if !config.api_url.starts_with("http://") && !config.api_url.starts_with("https://") {
        return Err(anyhow!(
            "api_url must be an http(s) URL, got {}",
            config.api_url
        ));
    }
    if config.request_timeout.is_zero() {
        return Err(anyhow!("request_timeout_secs must be greater than zero"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = resolve(&ConfigOverrides::default(), &ConfigFile::default(), no_env)
            .expect("resolve defaults");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.templates_dir, None);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn flag_beats_file_beats_env() {
        let env = |key: &str| match key {
            API_URL_ENV => Some("http://env.example/api".to_string()),
            TEMPLATES_DIR_ENV => Some("/env/templates".to_string()),
            _ => None,
        };
        let file = ConfigFile {
            api_url: Some("http://file.example/api".to_string()),
            templates_dir: None,
            request_timeout_secs: Some(5),
        };

        let from_file = resolve(&ConfigOverrides::default(), &file, env).expect("resolve");
        assert_eq!(from_file.api_url, "http://file.example/api");
        assert_eq!(from_file.templates_dir, Some(PathBuf::from("/env/templates")));
        assert_eq!(from_file.request_timeout, Duration::from_secs(5));

        let overrides = ConfigOverrides {
            config_path: None,
            api_url: Some("https://flag.example/api".to_string()),
            templates_dir: Some(PathBuf::from("/flag/templates")),
        };
        let from_flag = resolve(&overrides, &file, env).expect("resolve");
        assert_eq!(from_flag.api_url, "https://flag.example/api");
        assert_eq!(from_flag.templates_dir, Some(PathBuf::from("/flag/templates")));
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let file = ConfigFile {
            api_url: Some("ftp://example".to_string()),
            ..ConfigFile::default()
        };
        let err = resolve(&ConfigOverrides::default(), &file, no_env).unwrap_err();
        assert!(err.to_string().contains("http(s)"));

        let file = ConfigFile {
            request_timeout_secs: Some(0),
            ..ConfigFile::default()
        };
        assert!(resolve(&ConfigOverrides::default(), &file, no_env).is_err());
    }

    #[test]
    fn blank_flag_falls_back_to_config_file_before_env() {
        let env = |key: &str| (key == API_URL_ENV).then(|| "http://env.example/api".to_string());
        let file = ConfigFile {
            api_url: Some("http://file.example/api".to_string()),
            templates_dir: Some(PathBuf::from("/srv/templates")),
            ..ConfigFile::default()
        };
        let overrides = ConfigOverrides {
            api_url: Some("   ".to_string()),
            templates_dir: Some(PathBuf::new()),
            ..ConfigOverrides::default()
        };

        let config = resolve(&overrides, &file, env).expect("resolve");
        assert_eq!(config.api_url, "http://file.example/api");
        assert_eq!(config.templates_dir, Some(PathBuf::from("/srv/templates")));
    }

    #[test]
    fn config_file_round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        assert_eq!(load_config_file(&path).expect("missing file"), ConfigFile::default());

        fs::write(&path, r#"{"api_url": "http://localhost:9000/api", "unknown": true}"#)
            .expect("write config");
        let file = load_config_file(&path).expect("load config");
        assert_eq!(file.api_url.as_deref(), Some("http://localhost:9000/api"));

        fs::write(&path, "{not json").expect("write config");
        let err = load_config_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parse config JSON"));
    }
}
