//! Codegen config resolution.
//!
//! A project is defined by a `codegen.*` file. Declarative files (YAML or
//! JSON) are deserialized directly; script files (TypeScript or
//! JavaScript) are evaluated by an external JavaScript runtime that prints
//! the default export as JSON. Both paths end in the same [`RawConfig`]
//! validation, so the rest of the CLI only ever sees [`Settings`].

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;

use gql_codegen::settings::{DestinationSettings, Settings};

use crate::error::ConfigError;
use crate::paths;

/// Default JavaScript runtime for script configs.
pub const DEFAULT_JS_RUNTIME: &str = "node";

/// Environment variable carrying the config path into the runtime.
pub const CONFIG_PATH_ENV: &str = "GQL_CODEGEN_CONFIG";

/// Evaluates a config module and prints its default export as JSON.
const EVALUATE_CONFIG: &str = r#"
import { pathToFileURL } from 'node:url';
const mod = await import(pathToFileURL(process.env.GQL_CODEGEN_CONFIG).href);
let config = mod.default ?? mod;
if (typeof config === 'function') config = config();
config = await config;
process.stdout.write(JSON.stringify(config ?? null));
"#;

/// Recognized config formats, by extension.
const FORMATS: [(&str, ConfigFormat); 9] = [
    ("yml", ConfigFormat::Yaml),
    ("yaml", ConfigFormat::Yaml),
    ("json", ConfigFormat::Json),
    ("ts", ConfigFormat::Script),
    ("mts", ConfigFormat::Script),
    ("cts", ConfigFormat::Script),
    ("js", ConfigFormat::Script),
    ("mjs", ConfigFormat::Script),
    ("cjs", ConfigFormat::Script),
];

/// How a config file is turned into settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Script,
}

impl ConfigFormat {
    /// Detect the format of a config file by name.
    ///
    /// Any file name ending in `codegen.<ext>` is a config file, so
    /// `codegen.yml` and `app.codegen.ts` both match.
    pub fn detect(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        FORMATS
            .iter()
            .find(|(ext, _)| {
                name.strip_suffix(ext)
                    .is_some_and(|stem| stem.ends_with("codegen."))
            })
            .map(|(_, format)| *format)
    }
}

/// Check if a path names a codegen config file.
pub fn is_config_file(path: &Path) -> bool {
    ConfigFormat::detect(path).is_some()
}

// =============================================================================
// Raw config shape
// =============================================================================

/// A config file as written, before validation.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawConfig {
    #[serde(default)]
    pub schema: Option<OneOrMany>,

    #[serde(default)]
    pub documents: Option<OneOrMany>,

    #[serde(default)]
    pub overwrite: Option<bool>,

    #[serde(default)]
    pub generates: Option<BTreeMap<String, RawDestination>>,
}

/// A single string or a list of strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// One `generates` entry as written.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawDestination {
    #[serde(default)]
    pub plugins: Vec<RawPlugin>,

    #[serde(default)]
    pub preset: Option<String>,
}

/// A plugin entry: a bare name, or a one-key map of name to plugin config.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPlugin {
    Name(String),
    Configured(BTreeMap<String, serde_json::Value>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

impl RawPlugin {
    fn into_name(self) -> Result<String, ConfigError> {
        match self {
            RawPlugin::Name(name) => Ok(name),
            RawPlugin::Configured(map) if map.len() == 1 => {
                Ok(map.into_keys().next().unwrap_or_default())
            }
            RawPlugin::Configured(map) => Err(ConfigError::invalid_value(
                "plugins",
                format!("expected a plugin name, found a map with {} keys", map.len()),
            )),
        }
    }
}

impl RawConfig {
    /// Validate into [`Settings`].
    pub fn into_settings(self) -> Result<Settings, ConfigError> {
        let schemas = self.schema.map(OneOrMany::into_vec).unwrap_or_default();
        if schemas.is_empty() {
            return Err(ConfigError::invalid_value(
                "schema",
                "at least one schema is required",
            ));
        }
        for entry in &schemas {
            if entry.trim().is_empty() {
                return Err(ConfigError::invalid_value(
                    "schema",
                    "schema entries must not be empty",
                ));
            }
            if entry.starts_with("http://") || entry.starts_with("https://") {
                return Err(ConfigError::invalid_value(
                    "schema",
                    format!("remote schema '{}' is not supported", entry),
                ));
            }
        }

        let mut generates = BTreeMap::new();
        let mut seen = HashSet::new();
        for (destination, raw) in self.generates.unwrap_or_default() {
            if !seen.insert(paths::clean(Path::new(&destination))) {
                return Err(ConfigError::invalid_value(
                    "generates",
                    format!("destination '{}' is declared more than once", destination),
                ));
            }

            let plugins = raw
                .plugins
                .into_iter()
                .map(RawPlugin::into_name)
                .collect::<Result<Vec<_>, _>>()?;
            generates.insert(
                destination,
                DestinationSettings {
                    plugins,
                    preset: raw.preset,
                },
            );
        }

        Ok(Settings {
            schemas,
            documents: self.documents.map(OneOrMany::into_vec).unwrap_or_default(),
            overwrite: self.overwrite.unwrap_or(false),
            generates,
        })
    }
}

// =============================================================================
// Resolvers
// =============================================================================

/// Turns a config file into settings.
pub trait ConfigResolver: fmt::Debug + Send + Sync {
    /// Resolve the config at `path`.
    fn resolve(&self, path: &Path) -> Result<Settings, ConfigError>;
}

/// Resolver for YAML and JSON configs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclarativeResolver;

impl ConfigResolver for DeclarativeResolver {
    fn resolve(&self, path: &Path) -> Result<Settings, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let raw: RawConfig = match ConfigFormat::detect(path) {
            Some(ConfigFormat::Yaml) => {
                serde_yaml::from_str(&content).map_err(|e| ConfigError::Yaml {
                    path: path.to_path_buf(),
                    source: e,
                })?
            }
            Some(ConfigFormat::Json) => {
                serde_json::from_str(&content).map_err(|e| ConfigError::Json {
                    path: path.to_path_buf(),
                    source: e,
                })?
            }
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };

        raw.into_settings()
    }
}

/// Resolver for TypeScript and JavaScript configs.
#[derive(Debug, Clone)]
pub struct ScriptResolver {
    /// Runtime executable.
    program: String,
}

impl Default for ScriptResolver {
    fn default() -> Self {
        Self::new(DEFAULT_JS_RUNTIME)
    }
}

impl ScriptResolver {
    /// Create a resolver running `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Build the runtime invocation for a config file.
    pub fn command(&self, path: &Path) -> Command {
        let mut command = Command::new(&self.program);
        if is_typescript(path) {
            command.arg("--experimental-strip-types");
        }
        command
            .arg("--no-warnings")
            .arg("--input-type=module")
            .arg("-e")
            .arg(EVALUATE_CONFIG)
            .env(CONFIG_PATH_ENV, path);
        if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            command.current_dir(dir);
        }
        command
    }
}

impl ConfigResolver for ScriptResolver {
    fn resolve(&self, path: &Path) -> Result<Settings, ConfigError> {
        tracing::debug!(path = %path.display(), runtime = %self.program, "Evaluating config script");

        let output = self
            .command(path)
            .output()
            .map_err(|e| ConfigError::RuntimeSpawn {
                program: self.program.clone(),
                path: path.to_path_buf(),
                source: e,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConfigError::script(path.to_path_buf(), stderr.trim()));
        }

        let raw: RawConfig = serde_json::from_slice(&output.stdout).map_err(|e| ConfigError::Json {
            path: path.to_path_buf(),
            source: e,
        })?;
        raw.into_settings()
    }
}

fn is_typescript(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext, "ts" | "mts" | "cts"))
}

/// Resolver that dispatches on the config file format.
#[derive(Debug, Clone, Default)]
pub struct ConfigResolvers {
    declarative: DeclarativeResolver,
    script: ScriptResolver,
}

impl ConfigResolvers {
    /// Create a dispatcher using `js_runtime` for script configs.
    pub fn new(js_runtime: impl Into<String>) -> Self {
        Self {
            declarative: DeclarativeResolver,
            script: ScriptResolver::new(js_runtime),
        }
    }
}

impl ConfigResolver for ConfigResolvers {
    fn resolve(&self, path: &Path) -> Result<Settings, ConfigError> {
        match ConfigFormat::detect(path) {
            Some(ConfigFormat::Yaml | ConfigFormat::Json) => self.declarative.resolve(path),
            Some(ConfigFormat::Script) => self.script.resolve(path),
            None => Err(ConfigError::UnsupportedFormat {
                path: PathBuf::from(path),
            }),
        }
    }
}
