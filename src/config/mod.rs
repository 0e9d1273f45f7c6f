//! Configuration module.
//!
//! Settings resolve through Defaults → config file → environment → command line.

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, resolve, CliOverrides,
    ConfigError, ConfigFile, ResolvedConfig, DEFAULT_PAGE_SIZE, DEFAULT_SIMULATED_LATENCY_MS,
};
