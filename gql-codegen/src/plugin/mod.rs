//! Plugin capability definition.
//!
//! A plugin is a named code generator that appends to a shared output
//! buffer. Every destination runs its plugins in declared order against
//! the same [`PluginTask`], so later plugins see (and follow) the output of
//! earlier ones.
//!
//! # Example
//!
//! ```rust
//! use gql_codegen::plugin::{Plugin, PluginTask};
//! use gql_codegen::error::PluginError;
//!
//! #[derive(Debug)]
//! struct Banner;
//!
//! impl Plugin for Banner {
//!     fn name(&self) -> &'static str {
//!         "banner"
//!     }
//!
//!     fn run(&self, task: &mut PluginTask<'_>) -> Result<(), PluginError> {
//!         task.output.push_str("// hello\n");
//!         Ok(())
//!     }
//! }
//! ```

pub mod introspection;
pub mod registry;
pub mod typescript;

pub use introspection::IntrospectionPlugin;
pub use registry::PluginRegistry;
pub use typescript::TypescriptPlugin;

use std::fmt;

use crate::error::PluginError;
use crate::schema::Schema;
use crate::settings::Settings;

/// Trait for code generation plugins.
///
/// Implementations must be stateless with respect to a single run: the same
/// plugin instance is shared by every concurrently running task.
pub trait Plugin: fmt::Debug + Send + Sync {
    /// Returns the name this plugin is selected by in config files.
    ///
    /// This is a short lowercase string (e.g. "typescript").
    fn name(&self) -> &'static str;

    /// Append this plugin's output to `task.output`.
    fn run(&self, task: &mut PluginTask<'_>) -> Result<(), PluginError>;
}

/// Everything a plugin may read, plus the buffer it writes to.
#[derive(Debug)]
pub struct PluginTask<'a> {
    /// The loaded schema, shared read-only across tasks.
    pub schema: &'a Schema,

    /// Output buffer owned by the current destination.
    pub output: &'a mut String,

    /// The project's resolved settings.
    pub settings: &'a Settings,
}

impl<'a> PluginTask<'a> {
    /// Create a task over a schema, buffer and settings.
    pub fn new(schema: &'a Schema, output: &'a mut String, settings: &'a Settings) -> Self {
        Self {
            schema,
            output,
            settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaLoader;

    #[derive(Debug)]
    struct Echo;

    impl Plugin for Echo {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn run(&self, task: &mut PluginTask<'_>) -> Result<(), PluginError> {
            let count = task.schema.types().len();
            task.output.push_str(&format!("{count}\n"));
            Ok(())
        }
    }

    #[test]
    fn test_plugins_share_one_buffer() {
        let schema = SchemaLoader::load_str("type Query { a: Int }").unwrap();
        let settings = Settings::default();
        let mut output = String::from("start\n");

        let mut task = PluginTask::new(&schema, &mut output, &settings);
        Echo.run(&mut task).unwrap();
        Echo.run(&mut task).unwrap();

        assert_eq!(output, "start\n6\n6\n");
    }
}
