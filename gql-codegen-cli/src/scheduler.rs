//! Execution scheduler: one concurrent task per project destination.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::task::JoinSet;

use gql_codegen::plugin::{PluginRegistry, PluginTask};
use gql_codegen::schema::Schema;

use crate::cache::SchemaCache;
use crate::error::{CliError, CliResult, GenerateError};
use crate::project::Project;
use crate::writer::{FileWriter, WriteResult};

/// Everything needed to render one destination file.
#[derive(Debug, Clone)]
pub struct GenerationTask {
    /// Absolute destination path.
    pub destination: PathBuf,

    /// Plugin names, run in declared order.
    pub plugins: Vec<String>,

    pub project: Arc<Project>,

    pub schema: Arc<Schema>,
}

impl GenerationTask {
    /// Render the destination and write it.
    ///
    /// Unknown plugins are skipped; they were already reported once during
    /// discovery.
    pub fn run(&self, registry: &PluginRegistry, writer: &FileWriter) -> CliResult<WriteResult> {
        writer.ensure_parent(&self.destination)?;

        let settings = self.project.settings()?;
        let mut output = String::new();
        let mut task = PluginTask::new(&self.schema, &mut output, settings);

        for name in &self.plugins {
            match registry.get(name) {
                Some(plugin) => {
                    plugin
                        .run(&mut task)
                        .map_err(|source| GenerateError::Plugin {
                            plugin: name.clone(),
                            destination: self.destination.clone(),
                            source,
                        })?;
                }
                None => tracing::debug!(
                    plugin = %name,
                    destination = %self.destination.display(),
                    "Skipping unknown plugin"
                ),
            }
        }

        let result = writer.write(&self.destination, &output)?;
        tracing::info!(
            destination = %self.destination.display(),
            bytes = result.bytes(),
            "Generated"
        );
        Ok(result)
    }
}

/// Dispatches generation tasks over a loaded [`SchemaCache`].
#[derive(Debug, Clone)]
pub struct Scheduler {
    registry: Arc<PluginRegistry>,
    writer: FileWriter,
}

impl Scheduler {
    /// Create a scheduler.
    pub fn new(registry: Arc<PluginRegistry>, writer: FileWriter) -> Self {
        Self { registry, writer }
    }

    /// Build one task per destination of every project.
    pub fn plan(
        &self,
        projects: &[Arc<Project>],
        cache: &SchemaCache,
    ) -> CliResult<Vec<GenerationTask>> {
        let mut tasks = Vec::new();

        for project in projects {
            let key = project.schema_key()?;
            let schema = cache
                .get(&key)
                .cloned()
                .ok_or(GenerateError::MissingSchema { key })?;

            for (destination, settings) in &project.settings()?.generates {
                tasks.push(GenerationTask {
                    destination: project.destination_path(destination),
                    plugins: settings.plugins.clone(),
                    project: Arc::clone(project),
                    schema: Arc::clone(&schema),
                });
            }
        }

        Ok(tasks)
    }

    /// Run every task concurrently and wait for all of them.
    ///
    /// Results are sorted by destination. If any task failed, the first
    /// failure is returned once every task has finished.
    pub async fn run(
        &self,
        projects: &[Arc<Project>],
        cache: &SchemaCache,
    ) -> CliResult<Vec<WriteResult>> {
        let tasks = self.plan(projects, cache)?;
        tracing::debug!(
            tasks = tasks.len(),
            dry_run = self.writer.is_dry_run(),
            "Dispatching generation tasks"
        );

        let mut set = JoinSet::new();
        for task in tasks {
            let registry = Arc::clone(&self.registry);
            let writer = self.writer;
            set.spawn_blocking(move || task.run(&registry, &writer));
        }

        let mut results = Vec::new();
        let mut first_error: Option<CliError> = None;
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(Ok(result)) => results.push(result),
                Ok(Err(error)) => {
                    tracing::error!(%error, "Generation task failed");
                    first_error.get_or_insert(error);
                }
                Err(error) => {
                    first_error.get_or_insert(error.into());
                }
            }
        }

        if let Some(error) = first_error {
            return Err(error);
        }

        results.sort_by(|a, b| a.path().cmp(b.path()));
        Ok(results)
    }
}
