//! Configuration file loading with precedence handling.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Reviews per page.
pub const DEFAULT_PAGE_SIZE: usize = 20;
/// Collapsed body line limit.
pub const DEFAULT_COLLAPSED_MAX_LINES: usize = crate::model::DEFAULT_COLLAPSED_MAX_LINES;
/// Screens of remaining content that trigger the next page.
pub const DEFAULT_PREFETCH_SCREENS: f64 = crate::state::DEFAULT_PREFETCH_SCREENS;
/// Simulated round trip of the fixture provider.
pub const DEFAULT_SIMULATED_LATENCY_MS: u64 = 300;

/// Environment variable naming an explicit config file.
pub const ENV_CONFIG: &str = "REVIEWLIST_CONFIG";
/// Environment variable overriding `fixture_path`.
pub const ENV_FIXTURE: &str = "REVIEWLIST_FIXTURE";
/// Environment variable overriding `page_size`.
pub const ENV_PAGE_SIZE: &str = "REVIEWLIST_PAGE_SIZE";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A setting has a value the application cannot use.
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue {
        /// Setting or environment variable name.
        key: String,
        /// What is wrong with it.
        reason: String,
    },

    /// No fixture was given on the command line, in the environment or in the config file.
    #[error("No reviews fixture given (pass a path or set REVIEWLIST_FIXTURE)")]
    MissingFixture,
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/reviewlist/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Reviews JSON fixture served by the page provider.
    #[serde(default)]
    pub fixture_path: Option<PathBuf>,

    /// Reviews per page.
    #[serde(default)]
    pub page_size: Option<usize>,

    /// Body lines shown before "Show more...".
    #[serde(default)]
    pub collapsed_max_lines: Option<usize>,

    /// Near-end prefetch threshold in screens.
    #[serde(default)]
    pub prefetch_screens: Option<f64>,

    /// Delay before each fixture page is returned.
    #[serde(default)]
    pub simulated_latency_ms: Option<u64>,

    /// Directory holding avatar images, looked up by URL file name.
    #[serde(default)]
    pub avatar_dir: Option<PathBuf>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Reviews JSON served by the fixture provider.
    pub fixture_path: Option<PathBuf>,
    /// Reviews per page.
    pub page_size: usize,
    /// Body lines shown before a row is expanded.
    pub collapsed_max_lines: usize,
    /// Remaining screens of content that trigger the next page.
    pub prefetch_screens: f64,
    /// Delay before every fixture response.
    pub simulated_latency_ms: u64,
    /// Directory avatar files are read from.
    pub avatar_dir: Option<PathBuf>,
    /// File the tracing subscriber writes to.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            fixture_path: None,
            page_size: DEFAULT_PAGE_SIZE,
            collapsed_max_lines: DEFAULT_COLLAPSED_MAX_LINES,
            prefetch_screens: DEFAULT_PREFETCH_SCREENS,
            simulated_latency_ms: DEFAULT_SIMULATED_LATENCY_MS,
            avatar_dir: None,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Rejects values the controller and layout cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a zero page size or a negative or non-finite
    /// prefetch threshold.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "page_size".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.prefetch_screens.is_finite() || self.prefetch_screens < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "prefetch_screens".to_string(),
                reason: format!("must be a non-negative number, got {}", self.prefetch_screens),
            });
        }
        Ok(self)
    }

    /// The fixture to serve.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFixture`] if no source provided one.
    pub fn require_fixture(&self) -> Result<&PathBuf, ConfigError> {
        self.fixture_path.as_ref().ok_or(ConfigError::MissingFixture)
    }
}

/// Command-line overrides; `None` leaves the resolved value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    /// Positional fixture argument.
    pub fixture_path: Option<PathBuf>,
    /// `--page-size`.
    pub page_size: Option<usize>,
    /// `--latency-ms`.
    pub simulated_latency_ms: Option<u64>,
    /// `--avatar-dir`.
    pub avatar_dir: Option<PathBuf>,
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/reviewlist/reviewlist.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("reviewlist").join("reviewlist.log")
    } else {
        PathBuf::from("reviewlist.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/reviewlist/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("reviewlist").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `REVIEWLIST_CONFIG` environment variable
/// 3. Default path `~/.config/reviewlist/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        fixture_path: config.fixture_path.or(defaults.fixture_path),
        page_size: config.page_size.unwrap_or(defaults.page_size),
        collapsed_max_lines: config
            .collapsed_max_lines
            .unwrap_or(defaults.collapsed_max_lines),
        prefetch_screens: config.prefetch_screens.unwrap_or(defaults.prefetch_screens),
        simulated_latency_ms: config
            .simulated_latency_ms
            .unwrap_or(defaults.simulated_latency_ms),
        avatar_dir: config.avatar_dir.or(defaults.avatar_dir),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `REVIEWLIST_FIXTURE`: Override fixture path
/// - `REVIEWLIST_PAGE_SIZE`: Override page size
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if `REVIEWLIST_PAGE_SIZE` is not an unsigned integer.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if let Ok(fixture) = std::env::var(ENV_FIXTURE) {
        if !fixture.is_empty() {
            config.fixture_path = Some(PathBuf::from(fixture));
        }
    }

    if let Ok(page_size) = std::env::var(ENV_PAGE_SIZE) {
        config.page_size = page_size
            .trim()
            .parse()
            .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                key: ENV_PAGE_SIZE.to_string(),
                reason: format!("{page_size:?}: {e}"),
            })?;
    }

    Ok(config)
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, cli: CliOverrides) -> ResolvedConfig {
    if let Some(fixture) = cli.fixture_path {
        config.fixture_path = Some(fixture);
    }

    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }

    if let Some(latency) = cli.simulated_latency_ms {
        config.simulated_latency_ms = latency;
    }

    if let Some(dir) = cli.avatar_dir {
        config.avatar_dir = Some(dir);
    }

    config
}

/// Runs the whole precedence chain and validates the result.
///
/// # Errors
///
/// Returns any load, env or validation error.
pub fn resolve(
    config_path: Option<PathBuf>,
    cli: CliOverrides,
) -> Result<ResolvedConfig, ConfigError> {
    let file = load_config_with_precedence(config_path)?;
    let config = apply_env_overrides(merge_config(file))?;
    apply_cli_overrides(config, cli).validate()
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
