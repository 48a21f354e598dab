// error module - typed failures for config and source loading

use std::path::PathBuf;

/// errors raised by the library before any analysis runs
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config value for {key}: {reason}")]
    InvalidConfig { key: &'static str, reason: String },

    #[error("source root {0} does not exist or is not a directory")]
    MissingSourceRoot(PathBuf),

    #[error("{0} is not a readable file")]
    NotAFile(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
