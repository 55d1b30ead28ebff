//! Error types for the CLI.
//!
//! Fatal errors bubble up as [`CliError`] and end the run. Per-project
//! config errors are [`ConfigError`]s collected by discovery instead.

use std::path::PathBuf;
use thiserror::Error;

use gql_codegen::{PluginError, SchemaError};

use crate::cache::SchemaKey;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Main error type for CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Discovery could not walk the root.
    #[error("Failed to discover projects: {0}")]
    Discovery(#[from] DiscoveryError),

    /// A primed project's config could not be read back.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    /// A schema set failed to load.
    #[error("Failed to load schema: {0}")]
    Load(#[from] LoadError),

    /// A generation task failed.
    #[error("Failed to generate output: {0}")]
    Generate(#[from] GenerateError),

    /// Error writing output files.
    #[error("Failed to write output: {0}")]
    Write(#[from] WriteError),

    /// Discovery succeeded but no schema was loaded.
    #[error("No schemas loaded")]
    NoSchemas,

    /// A spawned task panicked or was cancelled.
    #[error("Task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Generic IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error during project discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Root directory does not exist.
    #[error("Directory not found: {path}")]
    RootNotFound { path: PathBuf },

    /// The directory walk failed.
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Error resolving one project's config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading config.
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid YAML syntax or shape.
    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Invalid JSON syntax or shape.
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The script runtime could not be started.
    #[error("Failed to run '{program}' for {path}: {source}")]
    RuntimeSpawn {
        program: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The script runtime exited with an error.
    #[error("Failed to evaluate {path}: {message}")]
    Script { path: PathBuf, message: String },

    /// The file name matches no known config format.
    #[error("Unsupported config file: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Error loading a schema set.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A schema glob is malformed.
    #[error("Invalid schema pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A schema glob matched no files.
    #[error("Schema pattern '{pattern}' matched no files")]
    NoMatches { pattern: String },

    /// The loader rejected the schema set.
    #[error("{source} (schema set: {key})")]
    Schema {
        key: SchemaKey,
        #[source]
        source: SchemaError,
    },
}

/// Error inside a generation task.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// No schema was loaded for a project's key.
    #[error("No schema loaded for {key}")]
    MissingSchema { key: SchemaKey },

    /// A plugin failed.
    #[error("Plugin '{plugin}' failed for {destination}: {source}")]
    Plugin {
        plugin: String,
        destination: PathBuf,
        #[source]
        source: PluginError,
    },
}

/// Error writing output files.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to create directory.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("Failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DiscoveryError {
    /// Create a root not found error.
    pub fn not_found(path: PathBuf) -> Self {
        Self::RootNotFound { path }
    }
}

impl ConfigError {
    /// Create an invalid value error.
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a script evaluation error.
    pub fn script(path: PathBuf, message: impl Into<String>) -> Self {
        Self::Script {
            path,
            message: message.into(),
        }
    }
}

impl LoadError {
    /// Create an invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}
