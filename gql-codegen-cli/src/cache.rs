//! Schema cache and the concurrent load phase.
//!
//! Projects that reference the same set of schema files share one loaded
//! [`Schema`]. Every distinct set is loaded exactly once, all sets in
//! parallel, and the cache is only handed to readers after every load has
//! finished.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::task::JoinSet;

use gql_codegen::schema::{Schema, SchemaLoader};

use crate::error::{CliError, CliResult, LoadError};
use crate::project::{Project, SchemaEntry};

/// Separator between entries of a [`SchemaKey`].
pub const SCHEMA_KEY_SEPARATOR: &str = ",";

/// Canonical identity of a schema set: sorted, deduplicated entries joined
/// with [`SCHEMA_KEY_SEPARATOR`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaKey(String);

impl SchemaKey {
    /// Build a key from schema entries in any order.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries: Vec<String> = entries
            .into_iter()
            .map(|e| e.as_ref().to_string())
            .collect();
        entries.sort();
        entries.dedup();
        Self(entries.join(SCHEMA_KEY_SEPARATOR))
    }

    /// Get the key as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Loaded schemas by key. Read-only once built.
#[derive(Debug, Default)]
pub struct SchemaCache {
    schemas: HashMap<SchemaKey, Arc<Schema>>,
}

impl SchemaCache {
    /// Load every distinct schema set referenced by `projects`.
    ///
    /// Each set is loaded once, from the project with the lexicographically
    /// first root. Loads run concurrently; this returns only after all of
    /// them finished. The first failure is returned after the rest drained.
    pub async fn load(projects: &[Arc<Project>]) -> CliResult<Self> {
        let plan = plan_loads(projects)?;

        let mut set = JoinSet::new();
        for (key, load) in plan {
            tracing::debug!(
                key = %key,
                project = %load.root.display(),
                "Loading schema set"
            );
            set.spawn_blocking(move || {
                let result = load_schema_set(&key, &load.entries);
                (key, result)
            });
        }

        // Every task owns its slot; slots are merged here, after the barrier.
        let mut slots = Vec::new();
        let mut first_error: Option<CliError> = None;
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((key, Ok(schema))) => slots.push((key, schema)),
                Ok((key, Err(error))) => {
                    tracing::error!(key = %key, %error, "Schema load failed");
                    first_error.get_or_insert(error.into());
                }
                Err(error) => {
                    first_error.get_or_insert(error.into());
                }
            }
        }

        if let Some(error) = first_error {
            return Err(error);
        }

        let schemas = slots
            .into_iter()
            .map(|(key, schema)| (key, Arc::new(schema)))
            .collect();
        Ok(Self { schemas })
    }

    /// Get the schema loaded for a key.
    pub fn get(&self, key: &SchemaKey) -> Option<&Arc<Schema>> {
        self.schemas.get(key)
    }

    /// Get the number of distinct schemas loaded.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Check if nothing was loaded.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// The load input chosen for one key.
#[derive(Debug)]
struct PlannedLoad {
    root: PathBuf,
    entries: Vec<SchemaEntry>,
}

/// Pick one representative project per distinct key.
fn plan_loads(projects: &[Arc<Project>]) -> CliResult<BTreeMap<SchemaKey, PlannedLoad>> {
    let mut plan: BTreeMap<SchemaKey, PlannedLoad> = BTreeMap::new();

    for project in projects {
        let key = project.schema_key()?;
        let root = project.root();

        let keep_existing = plan
            .get(&key)
            .is_some_and(|existing| existing.root.as_path() <= root);
        if keep_existing {
            continue;
        }

        plan.insert(
            key,
            PlannedLoad {
                root: root.to_path_buf(),
                entries: project.schema_entries()?,
            },
        );
    }

    Ok(plan)
}

/// Expand globs and parse one schema set.
fn load_schema_set(key: &SchemaKey, entries: &[SchemaEntry]) -> Result<Schema, LoadError> {
    let files = expand_entries(entries)?;
    SchemaLoader::load_files(&files).map_err(|source| LoadError::Schema {
        key: key.clone(),
        source,
    })
}

/// Replace glob entries by their sorted matches.
fn expand_entries(entries: &[SchemaEntry]) -> Result<Vec<PathBuf>, LoadError> {
    let mut files = Vec::new();

    for entry in entries {
        let pattern = match entry {
            SchemaEntry::File(path) => {
                files.push(path.clone());
                continue;
            }
            SchemaEntry::Pattern(pattern) => pattern,
        };

        let mut matches = glob::glob(pattern)
            .map_err(|e| LoadError::invalid_pattern(pattern.as_str(), e.to_string()))?
            .filter_map(Result::ok)
            .filter(|p| p.is_file())
            .collect::<Vec<_>>();
        if matches.is_empty() {
            return Err(LoadError::NoMatches {
                pattern: pattern.clone(),
            });
        }

        matches.sort();
        files.extend(matches);
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_schema_key_ignores_order_and_duplicates() {
        let a = SchemaKey::new(["b.graphql", "a.graphql"]);
        let b = SchemaKey::new(["a.graphql", "b.graphql", "a.graphql"]);

        assert_eq!(a, b);
        assert_eq!(a.as_str(), "a.graphql,b.graphql");
        assert_eq!(a.to_string(), "a.graphql,b.graphql");
    }

    #[test]
    fn test_expand_entries() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("schema")).unwrap();
        fs::write(dir.path().join("schema/b.graphql"), "type B { b: Int }").unwrap();
        fs::write(dir.path().join("schema/a.graphql"), "type A { a: Int }").unwrap();
        fs::write(dir.path().join("root.graphql"), "type Query { a: A }").unwrap();

        let files = expand_entries(&[
            SchemaEntry::resolve(dir.path(), "root.graphql"),
            SchemaEntry::resolve(dir.path(), "schema/*.graphql"),
        ])
        .unwrap();

        assert_eq!(
            files,
            vec![
                dir.path().join("root.graphql"),
                dir.path().join("schema/a.graphql"),
                dir.path().join("schema/b.graphql"),
            ]
        );
    }

    #[test]
    fn test_glob_without_matches_fails() {
        let dir = TempDir::new().unwrap();
        let err = expand_entries(&[SchemaEntry::resolve(dir.path(), "*.graphql")]).unwrap_err();
        assert!(matches!(err, LoadError::NoMatches { .. }));
    }

    #[test]
    fn test_metacharacters_in_root_are_literal() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("proj[1]");
        fs::create_dir_all(root.join("schema")).unwrap();
        fs::write(root.join("root.graphql"), "type Query { a: Int }").unwrap();
        fs::write(root.join("schema/a.graphql"), "type A { a: Int }").unwrap();

        let files = expand_entries(&[
            SchemaEntry::resolve(&root, "root.graphql"),
            SchemaEntry::resolve(&root, "schema/*.graphql"),
        ])
        .unwrap();

        assert_eq!(
            files,
            vec![root.join("root.graphql"), root.join("schema/a.graphql")]
        );
    }
}
