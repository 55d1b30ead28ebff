//! Resolved project settings.
//!
//! This is the contract between config resolution and everything
//! downstream of it: plugins receive a `&Settings`, never the config file.

use std::collections::BTreeMap;

/// Settings resolved from one project's codegen config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Schema entries as declared, relative to the project root. Never empty.
    pub schemas: Vec<String>,

    /// Operation document globs as declared.
    pub documents: Vec<String>,

    /// Whether existing outputs may be overwritten.
    pub overwrite: bool,

    /// Destination path (as declared) to what is generated there.
    pub generates: BTreeMap<String, DestinationSettings>,
}

/// What gets generated into one destination file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestinationSettings {
    /// Plugin names, run in declared order.
    pub plugins: Vec<String>,

    /// Optional preset name.
    pub preset: Option<String>,
}

impl Settings {
    /// Iterate over every plugin name referenced by any destination.
    pub fn plugin_names(&self) -> impl Iterator<Item = &str> {
        self.generates
            .values()
            .flat_map(|destination| destination.plugins.iter().map(String::as_str))
    }
}

impl DestinationSettings {
    /// Create destination settings for the given plugins.
    pub fn with_plugins<I, S>(plugins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            plugins: plugins.into_iter().map(Into::into).collect(),
            preset: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_names_spans_destinations() {
        let mut settings = Settings::default();
        settings
            .generates
            .insert("a.ts".to_string(), DestinationSettings::with_plugins(["typescript"]));
        settings.generates.insert(
            "b.json".to_string(),
            DestinationSettings::with_plugins(["introspection", "typescript"]),
        );

        let names: Vec<_> = settings.plugin_names().collect();
        assert_eq!(names, vec!["typescript", "introspection", "typescript"]);
    }
}
