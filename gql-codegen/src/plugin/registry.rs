//! Plugin registry mapping config names to implementations.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{IntrospectionPlugin, Plugin, TypescriptPlugin};

/// Registry of available plugins, keyed by [`Plugin::name`].
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    plugins: BTreeMap<&'static str, Arc<dyn Plugin>>,
}

impl PluginRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            plugins: BTreeMap::new(),
        }
    }

    /// Create a registry with the plugins shipped by this crate.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(TypescriptPlugin::new());
        registry.register(IntrospectionPlugin::new());
        registry
    }

    /// Register a plugin, replacing any plugin with the same name.
    pub fn register(&mut self, plugin: impl Plugin + 'static) {
        self.plugins.insert(plugin.name(), Arc::new(plugin));
    }

    /// Get a plugin by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Plugin>> {
        self.plugins.get(name)
    }

    /// Check if a plugin is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// Registered plugin names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.plugins.keys().copied()
    }

    /// Names from `requested` that no registered plugin answers to,
    /// deduplicated and in first-seen order.
    pub fn unknown<'a>(&self, requested: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
        let mut unknown = Vec::new();
        for name in requested {
            if !self.contains(name) && !unknown.contains(&name) {
                unknown.push(name);
            }
        }
        unknown
    }

    /// Get the number of registered plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}
