//! Project discovery.
//!
//! This module walks a directory tree for codegen config files, skipping
//! package-manager directories entirely, and primes every project's
//! settings. A project whose config fails to resolve is recorded as a
//! [`ProjectLoadError`] and does not stop discovery.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::{DirEntry, WalkDir};

use gql_codegen::plugin::PluginRegistry;

use crate::config::{is_config_file, ConfigResolver, ConfigResolvers};
use crate::error::{ConfigError, DiscoveryError};
use crate::paths;
use crate::project::Project;

/// Directory names whose subtrees are never searched.
pub const PRUNED_DIRECTORIES: [&str; 6] = [
    "node_modules",
    "bower_components",
    "jspm_packages",
    "vendor_modules",
    ".yarn",
    ".pnpm-store",
];

/// A project whose settings could not be resolved.
#[derive(Debug)]
pub struct ProjectLoadError {
    /// Directory containing the config file.
    pub root: PathBuf,

    /// Config file name.
    pub config_file: PathBuf,

    pub error: ConfigError,
}

impl fmt::Display for ProjectLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            self.root.join(&self.config_file).display(),
            self.error
        )
    }
}

/// Outcome of a discovery pass.
#[derive(Debug, Default)]
pub struct DiscoveryReport {
    /// Projects whose settings resolved, ordered by config path.
    pub projects: Vec<Arc<Project>>,

    /// Projects that failed to resolve.
    pub errors: Vec<ProjectLoadError>,
}

/// Scanner for discovering codegen projects.
#[derive(Debug)]
pub struct ProjectScanner {
    /// Root directory to scan.
    root: PathBuf,

    /// Extra directory names to prune.
    excluded: Vec<String>,

    resolver: Arc<dyn ConfigResolver>,

    registry: Arc<PluginRegistry>,
}

impl ProjectScanner {
    /// Create a new scanner for the given root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            excluded: Vec::new(),
            resolver: Arc::new(ConfigResolvers::default()),
            registry: Arc::new(PluginRegistry::builtin()),
        }
    }

    /// Set the resolver used to prime settings.
    pub fn with_resolver(mut self, resolver: Arc<dyn ConfigResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Set the registry unknown plugins are checked against.
    pub fn with_registry(mut self, registry: Arc<PluginRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Prune additional directory names.
    pub fn with_excluded<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.extend(names.into_iter().map(Into::into));
        self
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find every config file below the root, sorted by path.
    pub fn find_config_files(&self) -> Result<Vec<PathBuf>, DiscoveryError> {
        if !self.root.exists() {
            return Err(DiscoveryError::not_found(self.root.clone()));
        }
        let root =
            paths::absolute(&self.root).map_err(|_| DiscoveryError::not_found(self.root.clone()))?;

        let mut files = Vec::new();
        let walker = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_pruned(entry));

        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_file() && is_config_file(entry.path()) {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    /// Discover projects and prime their settings.
    pub fn scan(&self) -> Result<DiscoveryReport, DiscoveryError> {
        let mut report = DiscoveryReport::default();

        for path in self.find_config_files()? {
            let (Some(root), Some(config_file)) = (path.parent(), path.file_name()) else {
                continue;
            };
            let project = Project::new(root, config_file, Arc::clone(&self.resolver));

            match self.prime(&project) {
                Ok(()) => {
                    tracing::debug!(project = %path.display(), "Discovered project");
                    report.projects.push(Arc::new(project));
                }
                Err(error) => {
                    tracing::warn!(project = %path.display(), %error, "Failed to load project");
                    report.errors.push(ProjectLoadError {
                        root: project.root().to_path_buf(),
                        config_file: project.config_file().to_path_buf(),
                        error,
                    });
                }
            }
        }

        Ok(report)
    }

    /// Resolve settings once and report what the run cannot honor.
    fn prime(&self, project: &Project) -> Result<(), ConfigError> {
        let settings = project.settings()?;
        let config = project.config_path();

        for plugin in self.registry.unknown(settings.plugin_names()) {
            tracing::warn!(
                project = %config.display(),
                plugin = %plugin,
                "Unknown plugin will be skipped"
            );
        }

        let presets: BTreeSet<&str> = settings
            .generates
            .values()
            .filter_map(|destination| destination.preset.as_deref())
            .collect();
        for preset in presets {
            tracing::warn!(
                project = %config.display(),
                preset = %preset,
                "Presets are not supported; running plugins only"
            );
        }

        Ok(())
    }

    fn is_pruned(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }

        let name = entry.file_name().to_string_lossy();
        let name: &str = &name;
        PRUNED_DIRECTORIES.contains(&name) || self.excluded.iter().any(|excluded| excluded == name)
    }
}
