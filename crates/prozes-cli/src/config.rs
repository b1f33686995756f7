//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables `PROZES_<SECTION>__<KEY>`, e.g.
//!    `PROZES_TEMPLATES__STORE_PATH`
//! 3. Config file (`--config FILE`, or the platform config dir)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::warn;

const ENV_PREFIX: &str = "PROZES";

/// Keys accepted by `prozes config get|set`.
pub const KEYS: &[&str] = &[
    "defaults.author",
    "output.no_color",
    "output.format",
    "templates.store_path",
    "templates.exclude",
];

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Values applied to new templates.
    pub defaults: Defaults,
    pub output: OutputConfig,
    /// Template store settings.
    pub templates: TemplateConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Author recorded by `template save` when `--author` is absent.
    pub author: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `auto`, `human`, `plain` or `json`; used when `--output-format` is `auto`.
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Store root. Defaults to `<data dir>/prozes/templates`.
    pub store_path: Option<PathBuf>,
    /// Exclude patterns added to every `template save`.
    pub exclude: Vec<String>,
}

impl AppConfig {
    /// Load configuration: defaults, then the config file, then environment.
    ///
    /// A missing file is not an error, so `init` and `config set` can create
    /// it. A malformed one is.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let path = Self::resolve_path(config_file.map(PathBuf::as_path));
        if config_file.is_some() && !path.exists() {
            warn!(path = %path.display(), "Config file not found, using defaults");
        }

        Config::builder()
            .add_source(Config::try_from(&Self::default()).context("invalid built-in defaults")?)
            .add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("templates.exclude"),
            )
            .build()
            .with_context(|| format!("failed to read configuration from {}", path.display()))?
            .try_deserialize()
            .context("invalid configuration")
    }

    /// The file `load` reads and `init` / `config set` write.
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::config_path)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.prozes.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".prozes.toml"))
    }

    /// Where templates live: `--store`/`PROZES_STORE`, then config, then the
    /// platform data dir.
    pub fn store_path(&self, flag: Option<&Path>) -> PathBuf {
        if let Some(path) = flag {
            return path.to_path_buf();
        }
        if let Some(path) = &self.templates.store_path {
            return path.clone();
        }
        project_dirs()
            .map(|d| d.data_dir().join("templates"))
            .unwrap_or_else(|| PathBuf::from(".prozes").join("templates"))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "prozes", "prozes")
}
