//! A discovered generation project.

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};
use std::sync::{Arc, OnceLock};

use gql_codegen::settings::Settings;

use crate::cache::SchemaKey;
use crate::config::ConfigResolver;
use crate::error::ConfigError;
use crate::paths;

/// One codegen config file and the directory it lives in.
///
/// Identity is the pair (root, config file). Settings are resolved on first
/// access and memoized for the rest of the run.
#[derive(Debug)]
pub struct Project {
    /// Absolute directory containing the config file.
    root: PathBuf,

    /// Config file name within `root`.
    config_file: PathBuf,

    resolver: Arc<dyn ConfigResolver>,

    settings: OnceLock<Settings>,
}

impl Project {
    /// Create a project for `root/config_file`.
    pub fn new(
        root: impl Into<PathBuf>,
        config_file: impl Into<PathBuf>,
        resolver: Arc<dyn ConfigResolver>,
    ) -> Self {
        Self {
            root: root.into(),
            config_file: config_file.into(),
            resolver,
            settings: OnceLock::new(),
        }
    }

    /// Create a project whose settings are already known.
    pub fn with_settings(
        root: impl Into<PathBuf>,
        config_file: impl Into<PathBuf>,
        resolver: Arc<dyn ConfigResolver>,
        settings: Settings,
    ) -> Self {
        let project = Self::new(root, config_file, resolver);
        // A fresh cell is always empty.
        let _ = project.settings.set(settings);
        project
    }

    /// Get the project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the config file name.
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Full path of the config file.
    pub fn config_path(&self) -> PathBuf {
        self.root.join(&self.config_file)
    }

    /// Resolve settings, memoizing the first success.
    ///
    /// A failed resolution is not cached; discovery never keeps a project
    /// whose settings failed, so later calls only hit the memo.
    pub fn settings(&self) -> Result<&Settings, ConfigError> {
        if let Some(settings) = self.settings.get() {
            return Ok(settings);
        }

        let resolved = self.resolver.resolve(&self.config_path())?;
        Ok(self.settings.get_or_init(|| resolved))
    }

    /// Schema entries resolved against the root (globs left unexpanded).
    pub fn schema_entries(&self) -> Result<Vec<SchemaEntry>, ConfigError> {
        Ok(self
            .settings()?
            .schemas
            .iter()
            .map(|declared| SchemaEntry::resolve(&self.root, declared))
            .collect())
    }

    /// The schema-set key shared by projects loading the same files.
    pub fn schema_key(&self) -> Result<SchemaKey, ConfigError> {
        let entries = self.schema_entries()?;
        Ok(SchemaKey::new(entries.iter().map(SchemaEntry::key_part)))
    }

    /// Absolute path of a declared destination.
    pub fn destination_path(&self, declared: &str) -> PathBuf {
        paths::resolve(&self.root, Path::new(declared))
    }
}

/// A declared schema entry, resolved against a project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaEntry {
    /// An absolute, cleaned file path.
    File(PathBuf),
    /// A glob pattern. The root it was joined to is escaped.
    Pattern(String),
}

impl SchemaEntry {
    /// Resolve `declared` against `root`.
    ///
    /// Only the declared text decides whether the entry is a glob, so
    /// metacharacters in the root's own path are matched literally.
    pub fn resolve(root: &Path, declared: &str) -> Self {
        if !is_glob(declared) {
            return Self::File(paths::resolve(root, Path::new(declared)));
        }

        let declared = paths::clean(Path::new(declared));
        if declared.is_absolute() {
            return Self::Pattern(declared.to_string_lossy().into_owned());
        }

        let mut base = root.to_path_buf();
        let mut rest = PathBuf::new();
        for component in declared.components() {
            match component {
                Component::ParentDir if rest.as_os_str().is_empty() => {
                    base.pop();
                }
                other => rest.push(other.as_os_str()),
            }
        }

        let base = glob::Pattern::escape(&base.to_string_lossy());
        Self::Pattern(format!(
            "{}{}{}",
            base.trim_end_matches(MAIN_SEPARATOR),
            MAIN_SEPARATOR,
            rest.to_string_lossy()
        ))
    }

    /// This entry's contribution to a [`SchemaKey`].
    pub fn key_part(&self) -> Cow<'_, str> {
        match self {
            Self::File(path) => path.to_string_lossy(),
            Self::Pattern(pattern) => Cow::Borrowed(pattern),
        }
    }
}

/// Whether a declared schema entry contains glob metacharacters.
pub fn is_glob(declared: &str) -> bool {
    declared.contains(['*', '?', '['])
}
