use std::path::PathBuf;
use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by the engine.
///
/// Expected classification outcomes (an unknown rule-set id, a consent block)
/// are modelled as results, never as errors.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Quality gate stage outside `pre`/`during`/`post`
    #[error("Unknown quality gate stage: {0}")]
    UnknownStage(String),

    /// A required input field was not supplied
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// A file could not be read
    #[error("Failed to read file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Preferences failed validation
    #[error("Invalid preferences: {0}")]
    InvalidPreferences(String),

    /// Dotted config key does not address a preferences field
    #[error("Invalid config key: {0}")]
    InvalidConfigKey(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    /// Create a missing input error
    pub fn missing_input(msg: impl Into<String>) -> Self {
        Self::MissingInput(msg.into())
    }

    /// Create an invalid preferences error
    pub fn invalid_preferences(msg: impl Into<String>) -> Self {
        Self::InvalidPreferences(msg.into())
    }

    /// Stable machine-readable code used by the command API and MCP tools
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnknownStage(_) => "unknown_stage",
            Self::MissingInput(_) => "missing_input",
            Self::FileRead { .. } => "file_unreadable",
            Self::InvalidPreferences(_) | Self::InvalidConfigKey(_) => "config_error",
            Self::Io(_) => "io_error",
            Self::Json(_) => "invalid_request",
        }
    }
}
