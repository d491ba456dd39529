use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::schema::IntakeConfig;
use crate::error::ConfigError;

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<IntakeConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<IntakeConfig, ConfigError> {
    let config: IntakeConfig = serde_json::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Layers defaults, an optional JSON file and environment variables.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Loads using the process environment.
    pub fn load(&self) -> Result<IntakeConfig, ConfigError> {
        self.load_with(|key| std::env::var(key).ok())
    }

    /// Loads using an arbitrary key lookup in place of the process environment.
    pub fn load_with<F>(&self, lookup: F) -> Result<IntakeConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match &self.file {
            Some(path) => load_config(path)?,
            None => IntakeConfig::default(),
        };

        apply_env_overrides(&mut config, lookup)?;
        validate_config(&config)?;
        Ok(config)
    }
}

pub fn apply_env_overrides<F>(config: &mut IntakeConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("WATCH_DIR") {
        config.watch_dir = PathBuf::from(v);
    }
    if let Some(v) = get("SUCCESS_DIR") {
        config.success_dir = PathBuf::from(v);
    }
    if let Some(v) = get("REVIEW_DIR") {
        config.review_dir = PathBuf::from(v);
    }
    if let Some(v) = get("OUTPUT_CSV") {
        config.output_csv = PathBuf::from(v);
    }
    if let Some(v) = get("LOG_FILE") {
        config.log_file = PathBuf::from(v);
    }
    if let Some(v) = get("SETTLE_DELAY_MS") {
        config.settle_delay_ms = parse_value("SETTLE_DELAY_MS", &v)?;
    }
    if let Some(v) = get("MOVE_RETRIES") {
        config.move_retries = parse_value("MOVE_RETRIES", &v)?;
    }
    if let Some(v) = get("RETRY_BACKOFF_MS") {
        config.retry_backoff_ms = parse_value("RETRY_BACKOFF_MS", &v)?;
    }
    if let Some(v) = get("EXTRACT_TIMEOUT_SECS") {
        config.extract_timeout_secs = parse_value("EXTRACT_TIMEOUT_SECS", &v)?;
    }
    if let Some(v) = get("POLL_INTERVAL_MS") {
        config.poll_interval_ms = parse_value("POLL_INTERVAL_MS", &v)?;
    }
    if let Some(v) = get("DEBOUNCE_MS") {
        config.debounce_ms = parse_value("DEBOUNCE_MS", &v)?;
    }
    if let Some(v) = get("STABILITY_WINDOW_MS") {
        config.stability_window_ms = parse_value("STABILITY_WINDOW_MS", &v)?;
    }
    if let Some(v) = get("SCAN_EXISTING") {
        config.scan_existing = parse_flag("SCAN_EXISTING", &v)?;
    }

    Ok(())
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        key: key.to_string(),
        reason: format!("'{}': {}", raw, e),
    })
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid {
            key: key.to_string(),
            reason: format!("'{}' is not a boolean", other),
        }),
    }
}

fn validate_config(config: &IntakeConfig) -> Result<(), ConfigError> {
    if config.move_retries == 0 {
        return Err(ConfigError::Invalid {
            key: "move_retries".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let paths = [
        ("watch_dir", &config.watch_dir),
        ("success_dir", &config.success_dir),
        ("review_dir", &config.review_dir),
        ("output_csv", &config.output_csv),
        ("log_file", &config.log_file),
    ];
    for (key, path) in paths {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                key: key.to_string(),
                reason: "path must not be empty".to_string(),
            });
        }
    }

    Ok(())
}

/// Creates the watch, success and review roots if missing.
pub fn ensure_roots(config: &IntakeConfig) -> Result<(), ConfigError> {
    for root in config.roots() {
        std::fs::create_dir_all(root).map_err(|e| ConfigError::CreateDirectory {
            path: root.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}
