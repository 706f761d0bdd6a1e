//! Error types for loglight

use thiserror::Error;

/// Result type alias for loglight operations
pub type Result<T> = std::result::Result<T, HighlightError>;

/// Errors surfaced by the settings layer and the command line front end.
///
/// Pattern compilation failures are deliberately absent: a rule with a bad
/// pattern simply never matches.
#[derive(Error, Debug)]
pub enum HighlightError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed settings file: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Cannot write settings: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Cannot determine settings file location")]
    NoConfigPath,

    #[error("No such highlighter set: {0}")]
    NoSuchSet(String),

    #[error("{0}")]
    Message(String),
}
