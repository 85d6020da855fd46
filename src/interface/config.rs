use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "rpc-testgen.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid identifier `{0}`")]
    InvalidIdentifier(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

fn ident_regex() -> &'static Regex {
    static IDENT: OnceLock<Regex> = OnceLock::new();
    IDENT.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap())
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GenerateConfig {
    /// Project source root scanned for RPC service traits.
    #[serde(default = "default_project_path")]
    pub project_path: String,

    /// Module directory (relative to the project root) that holds the target
    /// bindings and receives the generated artifacts.
    #[serde(default = "default_target_path")]
    pub target_path: String,

    /// Bindings to generate for. Empty means every binding in the target
    /// module whose type matches a discovered service.
    #[serde(default)]
    pub bindings: Vec<String>,

    /// Force a specific service trait instead of matching by declared type.
    #[serde(default)]
    pub service: Option<String>,

    /// Also emit the run_tests.sh helper (default true).
    #[serde(default)]
    pub emit_run_script: Option<bool>,

    /// Enable verbose output.
    #[serde(default)]
    pub verbose: Option<bool>,
}

fn default_project_path() -> String {
    ".".to_string()
}

fn default_target_path() -> String {
    "src".to_string()
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            project_path: default_project_path(),
            target_path: default_target_path(),
            bindings: Vec::new(),
            service: None,
            emit_run_script: Some(true),
            verbose: Some(false),
        }
    }
}

impl GenerateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project_path.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "project_path must not be empty".to_string(),
            ));
        }
        if self.target_path.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "target_path must not be empty".to_string(),
            ));
        }
        for binding in &self.bindings {
            if !ident_regex().is_match(binding) {
                return Err(ConfigError::InvalidIdentifier(binding.clone()));
            }
        }
        if let Some(service) = &self.service {
            if !ident_regex().is_match(service) {
                return Err(ConfigError::InvalidIdentifier(service.clone()));
            }
        }
        Ok(())
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose.unwrap_or(false)
    }

    pub fn emit_run_script(&self) -> bool {
        self.emit_run_script.unwrap_or(true)
    }
}
