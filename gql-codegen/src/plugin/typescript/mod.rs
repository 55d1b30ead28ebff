//! The `typescript` plugin: TypeScript declarations for every schema type.

pub mod emitter;
pub mod type_mapper;

pub use emitter::{EmitReport, TypeScriptEmitter};
pub use type_mapper::{Position, TypeMapper};

use super::{Plugin, PluginTask};
use crate::error::PluginError;

/// Emits TypeScript types for the whole schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypescriptPlugin;

impl TypescriptPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Plugin for TypescriptPlugin {
    fn name(&self) -> &'static str {
        "typescript"
    }

    fn run(&self, task: &mut PluginTask<'_>) -> Result<(), PluginError> {
        let report = TypeScriptEmitter::new().emit(task.schema, task.output);
        if !report.skipped.is_empty() {
            tracing::warn!(
                skipped = report.skipped.len(),
                "Some definitions could not be emitted"
            );
        }
        Ok(())
    }
}
