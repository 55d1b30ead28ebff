//! # gql-codegen-cli
//!
//! Finds every GraphQL codegen project below a directory and generates all
//! of their outputs in one concurrent run.
//!
//! ## Architecture
//!
//! A run has three phases, separated by barriers:
//!
//! 1. [`discovery`] walks the tree and primes each project's settings
//! 2. [`cache`] loads each distinct schema set once, all sets in parallel
//! 3. [`scheduler`] runs one task per project destination, all in parallel
//!
//! Supporting modules:
//!
//! - [`config`] - Config file formats and resolvers
//! - [`project`] - The project descriptor
//! - [`writer`] - File output and dry-run support
//! - [`logging`] - Tracing subscriber setup
//! - [`error`] - Error types and handling

pub mod cache;
pub mod config;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod paths;
pub mod project;
pub mod scheduler;
pub mod writer;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use gql_codegen::plugin::PluginRegistry;

// Re-export main types for convenience
pub use cache::{SchemaCache, SchemaKey};
pub use config::{ConfigResolver, ConfigResolvers};
pub use discovery::{DiscoveryReport, ProjectLoadError, ProjectScanner};
pub use error::{CliError, CliResult};
pub use project::Project;
pub use scheduler::Scheduler;
pub use writer::{FileWriter, WriteResult};

/// Options for a full run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory to search for projects.
    pub root: PathBuf,

    /// Render without writing.
    pub dry_run: bool,

    /// Runtime used for script configs.
    pub js_runtime: String,

    /// Extra directory names to prune.
    pub exclude: Vec<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            dry_run: false,
            js_runtime: config::DEFAULT_JS_RUNTIME.to_string(),
            exclude: Vec::new(),
        }
    }
}

/// What a successful run did.
#[derive(Debug)]
pub struct RunSummary {
    /// Number of projects that were generated.
    pub projects: usize,

    /// Projects skipped because their config failed to resolve.
    pub load_errors: Vec<ProjectLoadError>,

    /// Number of distinct schema sets loaded.
    pub schemas: usize,

    /// One result per destination, sorted by path.
    pub outputs: Vec<WriteResult>,

    pub elapsed: Duration,
}

/// Discover, load and generate everything below `options.root`.
///
/// Fails if discovery fails, if no schema was loaded, or on the first
/// schema load, plugin or write failure.
pub async fn run(options: &RunOptions) -> CliResult<RunSummary> {
    let started = Instant::now();
    let registry = Arc::new(PluginRegistry::builtin());
    let resolver: Arc<dyn ConfigResolver> =
        Arc::new(ConfigResolvers::new(options.js_runtime.clone()));

    let scanner = ProjectScanner::new(&options.root)
        .with_resolver(resolver)
        .with_registry(Arc::clone(&registry))
        .with_excluded(options.exclude.iter().cloned());
    tracing::debug!(root = %scanner.root().display(), "Scanning for projects");
    let report = tokio::task::spawn_blocking(move || scanner.scan()).await??;
    tracing::info!(
        projects = report.projects.len(),
        errors = report.errors.len(),
        "Discovery finished"
    );

    let cache = SchemaCache::load(&report.projects).await?;
    if cache.is_empty() {
        return Err(CliError::NoSchemas);
    }
    tracing::info!(schemas = cache.len(), "Schemas loaded");

    let scheduler = Scheduler::new(registry, FileWriter::new(options.dry_run));
    let outputs = scheduler.run(&report.projects, &cache).await?;

    Ok(RunSummary {
        projects: report.projects.len(),
        load_errors: report.errors,
        schemas: cache.len(),
        outputs,
        elapsed: started.elapsed(),
    })
}
