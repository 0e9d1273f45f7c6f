//! Review list - Entry Point

use clap::Parser;
use reviewlist::config::{self, CliOverrides};
use reviewlist::model::{AppError, RowFactory, Typography};
use reviewlist::source::{AvatarSource, DirectoryAvatarSource, FixtureProvider};
use reviewlist::state::PaginationController;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Review list - browse a paginated reviews feed in the terminal
#[derive(Parser, Debug)]
#[command(name = "reviewlist")]
#[command(version)]
#[command(about = "Browse a paginated list of reviews in the terminal")]
pub struct Args {
    /// Path to the reviews JSON fixture
    pub fixture: Option<PathBuf>,

    /// Reviews fetched per page
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub page_size: Option<u64>,

    /// Simulated latency of every page request, in milliseconds
    #[arg(long)]
    pub latency_ms: Option<u64>,

    /// Directory holding avatar images, looked up by URL file name
    #[arg(long)]
    pub avatar_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            fixture_path: self.fixture.clone(),
            page_size: self.page_size.map(|n| n as usize),
            simulated_latency_ms: self.latency_ms,
            avatar_dir: self.avatar_dir.clone(),
        }
    }
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = config::resolve(args.config.clone(), args.overrides())?;

    reviewlist::logging::init(&config.log_file_path)?;
    info!(config = ?config, "Configuration loaded and resolved");

    let fixture = config.require_fixture()?.clone();
    let provider = FixtureProvider::new(
        &fixture,
        config.page_size,
        Duration::from_millis(config.simulated_latency_ms),
    );
    // Surface a bad fixture before the terminal is taken over
    let total = provider.load()?;
    info!(path = %fixture.display(), total, "Fixture loaded");

    let factory = RowFactory::new(Typography::terminal(), config.collapsed_max_lines);
    let controller = PaginationController::new(provider, factory, config.page_size)
        .with_prefetch_screens(config.prefetch_screens);

    let avatars = config.avatar_dir.as_ref().map(|dir| {
        if !dir.is_dir() {
            warn!(dir = %dir.display(), "Avatar directory not found; placeholders only");
        }
        Arc::new(DirectoryAvatarSource::new(dir)) as Arc<dyn AvatarSource>
    });

    reviewlist::view::run(controller, avatars)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_help_does_not_error() {
        // Help returns Err with DisplayHelp, which is success
        let result = Args::try_parse_from(["reviewlist", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let err = Args::try_parse_from(["reviewlist", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_args_defaults() {
        let args = Args::parse_from(["reviewlist"]);
        assert_eq!(args.fixture, None);
        assert_eq!(args.page_size, None);
        assert_eq!(args.latency_ms, None);
        assert_eq!(args.avatar_dir, None);
        assert_eq!(args.config, None);
        assert_eq!(args.overrides(), CliOverrides::default());
    }

    #[test]
    fn test_fixture_positional() {
        let args = Args::parse_from(["reviewlist", "reviews.json"]);
        assert_eq!(args.fixture, Some(PathBuf::from("reviews.json")));
    }

    #[test]
    fn test_page_size_rejects_zero() {
        let err = Args::try_parse_from(["reviewlist", "--page-size", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_page_size_rejects_non_numeric() {
        assert!(Args::try_parse_from(["reviewlist", "--page-size", "many"]).is_err());
    }

    #[test]
    fn test_combined_flags_become_overrides() {
        let args = Args::parse_from([
            "reviewlist",
            "data/reviews.json",
            "--page-size",
            "10",
            "--latency-ms",
            "0",
            "--avatar-dir",
            "data/avatars",
            "--config",
            "/custom/config.toml",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("/custom/config.toml")));
        assert_eq!(
            args.overrides(),
            CliOverrides {
                fixture_path: Some(PathBuf::from("data/reviews.json")),
                page_size: Some(10),
                simulated_latency_ms: Some(0),
                avatar_dir: Some(PathBuf::from("data/avatars")),
            }
        );
    }

    #[test]
    fn test_cli_overrides_win_over_file_values() {
        use reviewlist::config::{apply_cli_overrides, merge_config, ConfigFile};

        let file = ConfigFile {
            page_size: Some(50),
            simulated_latency_ms: Some(900),
            ..ConfigFile::default()
        };
        let args = Args::parse_from(["reviewlist", "--page-size", "5"]);

        let resolved = apply_cli_overrides(merge_config(Some(file)), args.overrides());
        assert_eq!(resolved.page_size, 5, "CLI page size should override the file");
        assert_eq!(resolved.simulated_latency_ms, 900);
    }
}
