//! Error types for schema loading, type emission and plugins.

use std::path::PathBuf;
use thiserror::Error;

/// Error raised while loading a schema set into a [`Schema`](crate::schema::Schema).
#[derive(Debug, Error)]
pub enum SchemaError {
    /// No schema files were given.
    #[error("No schema inputs given to load")]
    NoInputs,

    /// A schema file could not be read.
    #[error("Failed to read schema {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The parser rejected a schema file.
    #[error("Invalid GraphQL in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// The same type name was defined twice.
    #[error("Type '{name}' is defined more than once")]
    DuplicateType { name: String },

    /// An extension targets a type that was never defined.
    #[error("Cannot extend unknown type '{name}'")]
    UnknownExtension { name: String },

    /// An extension targets a type of another kind.
    #[error("Cannot extend {actual} '{name}' as {expected}")]
    ExtensionKindMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Error raised while rendering a single type definition.
///
/// These never abort emission: the definition is logged and skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmitError {
    /// A union without member types has no TypeScript rendering.
    #[error("Union '{name}' has no member types")]
    EmptyUnion { name: String },

    /// An enum without values has no meaningful rendering.
    #[error("Enum '{name}' has no values")]
    EmptyEnum { name: String },
}

/// Error raised by a plugin while appending to its output.
#[derive(Debug, Error)]
pub enum PluginError {
    /// Output serialization failed.
    #[error("Failed to serialize output of plugin '{plugin}': {source}")]
    Serialize {
        plugin: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl SchemaError {
    /// Create a parse error for a file.
    pub fn parse(path: PathBuf, message: impl Into<String>) -> Self {
        Self::Parse {
            path,
            message: message.into(),
        }
    }

    /// Create a duplicate type error.
    pub fn duplicate_type(name: impl Into<String>) -> Self {
        Self::DuplicateType { name: name.into() }
    }

    /// Create an unknown extension error.
    pub fn unknown_extension(name: impl Into<String>) -> Self {
        Self::UnknownExtension { name: name.into() }
    }
}
