//! Error types for the cadastro-core library.

use thiserror::Error;

/// Main error type for the cadastro library.
///
/// Field extraction never fails; these errors only come from loading,
/// saving and checking configuration.
#[derive(Error, Debug)]
pub enum CadastroError {
    /// Configuration value out of range.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed configuration file.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Invalid configuration values.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    /// Label lookahead outside the supported window.
    #[error("lookahead_lines must be between 1 and {max}, got {value}")]
    Lookahead { value: usize, max: usize },

    /// A synonym that would match every line.
    #[error("empty label synonym for {0}")]
    EmptySynonym(String),

    /// A section header that would match every line.
    #[error("empty section header")]
    EmptySectionHeader,

    /// Ranker threshold below zero.
    #[error("threshold for {field} must not be negative, got {value}")]
    NegativeThreshold { field: String, value: f64 },
}

/// Result type for the cadastro library.
pub type Result<T> = std::result::Result<T, CadastroError>;
