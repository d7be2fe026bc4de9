//! Core error types for cookflow-core.
//!
//! Only the I/O edges of the library can fail: configuration, recipe files
//! and the data directory. Navigation at a boundary, duplicate gestures and
//! missing steps are not errors; those paths return `None` or an empty event
//! list instead.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for cookflow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Recipe file could not be read
    #[error("Failed to read recipe from {path}: {source}")]
    RecipeRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Recipe file could not be parsed
    #[error("Failed to parse recipe: {0}")]
    RecipeParse(#[from] toml::de::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Data directory could not be created
    #[error("Failed to access data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Validation errors for recipe content.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// Two steps share an id
    #[error("Duplicate step id '{0}'")]
    DuplicateId(String),

    /// Invalid value
    #[error("Invalid value for '{field}' in step {step}: {message}")]
    InvalidValue {
        step: usize,
        field: String,
        message: String,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
