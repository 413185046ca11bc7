//! Error types for qt-core

use thiserror::Error;

/// Core error type for settings and execution context
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Settings file not found
    #[error("[E001] Settings file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid settings value combination
    #[error("[E002] Invalid settings: {message}")]
    ConfigInvalid { message: String },

    /// E003: Unknown setting name
    #[error("[E003] Unknown setting '{name}'")]
    UnknownSetting { name: String },

    /// E004: Setting value cannot be parsed
    #[error("[E004] Invalid value '{value}' for setting '{name}': expected {expected}")]
    InvalidSettingValue {
        name: String,
        value: String,
        expected: &'static str,
    },

    /// E005: Settings that must change together were changed apart
    #[error("[E005] Inconsistent settings: {message}")]
    InconsistentSettings { message: String },

    /// E006: Query was cancelled through its process list entry
    #[error("[E006] Query '{query_id}' was cancelled")]
    QueryCancelled { query_id: String },

    /// E007: IO error with file path context
    #[error("[E007] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E008: YAML parse error
    #[error("[E008] Settings parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
