//! # gql-codegen
//!
//! Turns GraphQL schema documents into generated TypeScript declarations.
//!
//! This crate holds everything that operates on a single, already-loaded
//! schema: the immutable schema model, the parser adapter that builds it,
//! and the plugins that render it. Discovering projects and scheduling work
//! across them lives in `gql-codegen-cli`.
//!
//! ## Quick Start
//!
//! ```rust
//! use gql_codegen::plugin::{PluginRegistry, PluginTask};
//! use gql_codegen::schema::SchemaLoader;
//! use gql_codegen::settings::Settings;
//!
//! let schema = SchemaLoader::load_str("type Query { hello: String! }").unwrap();
//! let settings = Settings::default();
//! let registry = PluginRegistry::builtin();
//!
//! let mut output = String::new();
//! let mut task = PluginTask::new(&schema, &mut output, &settings);
//! registry.get("typescript").unwrap().run(&mut task).unwrap();
//!
//! assert!(output.contains("hello: Scalars['String'];"));
//! ```
//!
//! ## Modules
//!
//! - [`schema`] - Schema model and `graphql-parser` adapter
//! - [`settings`] - Resolved per-project settings
//! - [`plugin`] - Plugin trait, registry and built-in plugins
//! - [`error`] - Error types

pub mod error;
pub mod plugin;
pub mod schema;
pub mod settings;

// Re-export main types for convenience
pub use error::{EmitError, PluginError, SchemaError};
pub use plugin::{Plugin, PluginRegistry, PluginTask};
pub use schema::{Schema, SchemaLoader};
pub use settings::{DestinationSettings, Settings};
