// config module - loads analysis settings from toml

use crate::error::AssistantError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// file name looked up in the project root when no config is given
pub const PROJECT_CONFIG_FILE: &str = ".abap-assistant.toml";

/// env var pointing at a config file
pub const CONFIG_ENV_VAR: &str = "ABAP_ASSISTANT_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub source: SourceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// how many naming prefixes are kept as project conventions
    pub top_prefixes: usize,
    /// non-empty lines inspected when sniffing whether a document is abap
    pub detection_line_budget: usize,
    /// only documents that look like abap feed the miner and the analyser
    pub require_detection: bool,
    pub max_file_size_kb: u64,
    pub max_files: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_prefixes: 5,
            detection_line_budget: 50,
            require_detection: true,
            max_file_size_kb: 512,
            max_files: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    /// directory names never descended into
    pub skip_dirs: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            skip_dirs: vec![
                ".git".to_string(),
                "target".to_string(),
                "node_modules".to_string(),
            ],
        }
    }
}

impl Config {
    /// resolve the config for a project: explicit path, then env var, then
    /// `.abap-assistant.toml` in the project root, then defaults
    pub fn load(explicit: Option<&Path>, project_root: Option<&Path>) -> Result<Self, AssistantError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                debug!("using config from {}={}", CONFIG_ENV_VAR, path);
                return Self::from_file(Path::new(&path));
            }
        }

        if let Some(root) = project_root {
            let candidate: PathBuf = root.join(PROJECT_CONFIG_FILE);
            if candidate.is_file() {
                return Self::from_file(&candidate);
            }
        }

        debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self, AssistantError> {
        let raw = fs::read_to_string(path).map_err(|source| AssistantError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&raw).map_err(|source| AssistantError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, AssistantError> {
        let config: Config = toml::from_str(raw).map_err(|source| AssistantError::ConfigParse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AssistantError> {
        if self.analysis.top_prefixes == 0 {
            return Err(AssistantError::InvalidConfig {
                key: "analysis.top_prefixes",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.analysis.detection_line_budget == 0 {
            return Err(AssistantError::InvalidConfig {
                key: "analysis.detection_line_budget",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.analysis.max_file_size_kb.saturating_mul(1024)
    }
}
