// src/environment.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Base URL of the CV parsing service
    pub parser_url: String,
    /// Base URL of the employee storage service
    pub employee_url: String,
    pub storage_path: PathBuf,
    pub log_path: PathBuf,
    pub auth_delay_ms: u64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            parser_url: "http://localhost:8000".to_string(),
            employee_url: "http://localhost:3000".to_string(),
            storage_path: PathBuf::from(".profile-desk/storage.toml"),
            log_path: PathBuf::from("/tmp/profile-desk.log"),
            auth_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: Option<EnvironmentConfig>,
    #[serde(default)]
    production: Option<EnvironmentConfig>,
}

impl EnvironmentConfig {
    /// Load configuration for the current environment. An explicit path must
    /// exist; the default `config.yaml` is optional.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let environment = Self::get_environment();
        Self::load_with(config_path, &environment, |key| std::env::var(key).ok())
    }

    pub fn get_environment() -> String {
        std::env::var("PROFILE_DESK_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_with(
        config_path: Option<&Path>,
        environment: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let config = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Self::from_yaml(&content, environment)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else if config_path.is_some() {
            anyhow::bail!("Config file not found: {}", path.display());
        } else {
            Self::default()
        };

        let config = config.with_overrides(lookup);

        Ok(Self {
            storage_path: Self::resolve_path(&config.storage_path)?,
            log_path: Self::resolve_path(&config.log_path)?,
            ..config
        })
    }

    fn from_yaml(content: &str, environment: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(content)?;

        let section = match environment {
            "production" => file.production,
            _ => file.local,
        };
        Ok(section.unwrap_or_default())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("CV_SERVICE_URL") {
            self.parser_url = url;
        }
        if let Some(url) = lookup("EMPLOYEE_SERVICE_URL") {
            self.employee_url = url;
        }
        if let Some(path) = lookup("PROFILE_DESK_STORAGE") {
            self.storage_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("PROFILE_DESK_LOG") {
            self.log_path = PathBuf::from(path);
        }
        self
    }

    fn resolve_path(path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            let current_dir = std::env::current_dir().context("Failed to get current directory")?;
            Ok(current_dir.join(path))
        }
    }

    pub fn auth_delay(&self) -> Duration {
        Duration::from_millis(self.auth_delay_ms)
    }
}
