//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `STRATA__<SECTION>__<KEY>`
//! 3. Config file: `--config`, else `config.toml` in the platform config dir
//! 4. Built-in defaults

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use strata_adapters::remote::{DEFAULT_API_URL, GitHubConfig};
use strata_core::domain::{ContextValue, MarkerInfix};

const ENV_PREFIX: &str = "STRATA";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub templates: TemplatesConfig,
    /// Hosted template repository; `--remote` fails without it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteConfig>,
    pub prune: PruneConfig,
    /// Extra render values available to every template.
    #[serde(default)]
    pub variables: BTreeMap<String, ContextValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplatesConfig {
    /// Directory holding `shared/` and `<language>/...`.
    pub local_root: PathBuf,
    /// Infix identifying files to render, e.g. `README.marker.md`.
    #[serde(default = "default_marker")]
    pub marker: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub owner: String,
    pub repo: String,
    #[serde(default = "default_reference")]
    pub reference: String,
    /// Directory inside the repository holding the template layout.
    #[serde(default = "default_remote_root")]
    pub root: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Name of the environment variable holding the access token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PruneConfig {
    /// Rules applied to every private artifact.
    #[serde(default)]
    pub shared: Vec<String>,
    /// Extra rules per language directory name.
    #[serde(default)]
    pub languages: BTreeMap<String, Vec<String>>,
}

fn default_marker() -> String {
    MarkerInfix::DEFAULT.to_string()
}

fn default_reference() -> String {
    "main".into()
}

fn default_remote_root() -> String {
    "templates".into()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".into()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            templates: TemplatesConfig {
                local_root: default_local_root(),
                marker: default_marker(),
            },
            remote: None,
            prune: PruneConfig {
                shared: vec![
                    "CODE_OF_CONDUCT.md".into(),
                    "CONTRIBUTING.md".into(),
                    "SECURITY.md".into(),
                    ".github/ISSUE_TEMPLATE".into(),
                ],
                languages: BTreeMap::new(),
            },
            variables: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, file and environment.
    ///
    /// An explicit `config_file` must exist; the platform default may not.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::config_path(), false),
        };
        Self::build(&path, required, environment())
    }

    fn build(path: &Path, required: bool, env: Environment) -> anyhow::Result<Self> {
        if required && !path.is_file() {
            anyhow::bail!("config file not found: {}", path.display());
        }

        let settings = Config::builder()
            .add_source(Config::try_from(&Self::default()).context("invalid built-in defaults")?)
            .add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(env)
            .build()
            .with_context(|| format!("failed to read configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .context("configuration has an unexpected shape")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.strata.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "strata", "strata")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".strata.toml"))
    }

    /// Default file content written by `strata init`.
    pub fn default_toml() -> anyhow::Result<String> {
        let body = toml::to_string_pretty(&Self::default())
            .context("failed to serialise default configuration")?;
        Ok(format!("{body}{REMOTE_EXAMPLE}"))
    }

    /// Shared rules followed by the rules for `language`.
    pub fn prune_rules(&self, language: &str) -> Vec<&str> {
        self.prune
            .shared
            .iter()
            .chain(self.prune.languages.get(language).into_iter().flatten())
            .map(String::as_str)
            .collect()
    }
}

impl RemoteConfig {
    /// Client settings, with the token read from `token_env` if set.
    pub fn github(&self) -> GitHubConfig {
        let token = std::env::var(&self.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty());
        GitHubConfig {
            api_url: self.api_url.clone(),
            reference: self.reference.clone(),
            token,
            timeout: Duration::from_secs(self.timeout_secs),
            ..GitHubConfig::new(&self.owner, &self.repo)
        }
    }
}

fn default_local_root() -> PathBuf {
    directories::ProjectDirs::from("com", "strata", "strata")
        .map(|d| d.data_dir().join("templates"))
        .unwrap_or_else(|| PathBuf::from("templates"))
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_SEPARATOR)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
}

const REMOTE_EXAMPLE: &str = r#"
# [remote]
# owner = "your-org"
# repo = "templates"
# reference = "main"
# root = "templates"
# token_env = "GITHUB_TOKEN"
# timeout_secs = 30
"#;
