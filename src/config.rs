//! Layered configuration: defaults -> TOML file -> environment -> CLI flags.
//!
//! # Environment variables
//!
//! Prefixed with `ELIXIR_` and double-underscore separated for nested keys:
//! - `ELIXIR_INDEXING__WORKERS=8` sets `indexing.workers`
//! - `ELIXIR_INDEXING__BLOB_TIMEOUT_SECS=30` sets `indexing.blob_timeout_secs`
//! - `ELIXIR_LOGGING__DEFAULT=debug` sets `logging.default`

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("elixir-xref")
}

fn default_workers() -> usize {
    num_cpus::get().max(1)
}

fn default_blob_timeout_secs() -> u64 {
    60
}

fn default_collaborator_command() -> String {
    "elixir-data".to_string()
}

fn default_logging_level() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Directory backing the index store (the LMDB environment lives under `index/`).
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub indexing: IndexingConfig,

    #[serde(default)]
    pub collaborator: CollaboratorConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            data_dir: default_data_dir(),
            indexing: IndexingConfig::default(),
            collaborator: CollaboratorConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexingConfig {
    /// Size of the stage-2 worker pool. Blobs are chunked per §5.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Per-blob timeout for external parser invocations (§5).
    #[serde(default = "default_blob_timeout_secs")]
    pub blob_timeout_secs: u64,

    /// Whether this project maintains the DT-compatible tables (mirrors the
    /// collaborator's `dts-comp` answer but can be forced via config for tests).
    #[serde(default)]
    pub dts_comp_override: Option<bool>,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        IndexingConfig {
            workers: default_workers(),
            blob_timeout_secs: default_blob_timeout_secs(),
            dts_comp_override: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CollaboratorConfig {
    /// Path or name of the collaborator command (§6).
    #[serde(default = "default_collaborator_command")]
    pub command: String,

    /// Extra fixed arguments prepended to every invocation (e.g. a repo path).
    #[serde(default)]
    pub base_args: Vec<String>,
}

impl Default for CollaboratorConfig {
    fn default() -> Self {
        CollaboratorConfig {
            command: default_collaborator_command(),
            base_args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_level")]
    pub default: String,

    #[serde(default)]
    pub modules: HashMap<String, String>,

    #[serde(default = "default_true")]
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            default: default_logging_level(),
            modules: HashMap::new(),
            ansi: true,
        }
    }
}

impl Settings {
    /// Load layered configuration: defaults -> `<config_path>` (if present) -> env.
    ///
    /// CLI flag overrides are applied by callers afterwards via [`Settings::with_overrides`]
    /// so that clap owns the "did the user actually pass this flag" question.
    pub fn load(config_path: Option<&std::path::Path>) -> Result<Settings, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));

        if let Some(path) = config_path {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment.merge(Env::prefixed("ELIXIR_").split("__"));
        figment.extract()
    }

    /// Apply CLI-level overrides that take precedence over everything else.
    pub fn with_overrides(mut self, data_dir: Option<PathBuf>, workers: Option<usize>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        if let Some(w) = workers {
            self.indexing.workers = w;
        }
        self
    }

    pub fn index_path(&self) -> PathBuf {
        self.data_dir.join("index")
    }

    /// Where `init` writes the starter config: next to the data directory
    /// (spec §6), not inside it — `elixir-xref.toml` is meant to be found
    /// and edited before the first `update` run creates `data_dir`.
    fn starter_config_path(&self) -> PathBuf {
        match self.data_dir.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join("elixir-xref.toml"),
            _ => PathBuf::from("elixir-xref.toml"),
        }
    }

    fn save(&self, path: &std::path::Path) -> std::io::Result<()> {
        let toml_str = toml::to_string_pretty(self).expect("Settings always serializes to TOML");
        std::fs::write(path, toml_str)
    }

    /// Write a starter configuration file, refusing to clobber an existing
    /// one unless `force` is set.
    pub fn init_config_file(force: bool) -> std::io::Result<PathBuf> {
        let settings = Settings::default();
        let config_path = settings.starter_config_path();

        if config_path.exists() && !force {
            return Err(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("configuration file already exists at {}", config_path.display()),
            ));
        }

        settings.save(&config_path)?;
        Ok(config_path)
    }
}
