//! Error types for report generation

use thiserror::Error;

/// Errors raised while generating a report
#[derive(Error, Debug)]
pub enum ReportError {
    /// Error reading, editing or writing the Word package
    #[error("Document error: {0}")]
    Ooxml(#[from] listgen_ooxml::OoxmlError),

    /// Error reading a configuration file or writing the report
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A list was requested for a style that no numbering definition binds
    #[error("No numbering definition is bound to style '{0}'")]
    StyleNotFound(String),

    /// Invalid report configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Malformed TOML configuration
    #[error("Configuration parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for report generation
pub type Result<T> = std::result::Result<T, ReportError>;
