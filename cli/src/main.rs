//! Campus Reviews CLI server
//!
//! ```sh
//! # Run with default config (~/.config/campus-reviews/config.toml)
//! reviews-service
//!
//! # Custom config path and port
//! reviews-service --config /etc/campus-reviews/config.toml --port 9090
//!
//! # Require two approvals instead of the configured threshold
//! reviews-service --min-approvals 2
//!
//! # Validate config without starting
//! reviews-service --check
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use campus_reviews::config::AppConfig;
use campus_reviews::shared::errors::ConfigError;
use campus_reviews::server::{init_tracing, ServerHandle, ServerOptions};

/// REST service for reviews of campus points of sale.
#[derive(Parser, Debug)]
#[command(
    name = "reviews-service",
    version,
    about = "REST service for reviewing campus cafes, bakeries and cafeterias",
    long_about = "Campus Reviews: CRUD for points of sale, users and reviews, \
                  with peer approval of reviews.\n\n\
                  Default config: ~/.config/campus-reviews/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "REVIEWS_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Override the number of approvals a review needs.
    #[arg(long)]
    min_approvals: Option<u32>,

    /// Validate the configuration and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(ref level) = self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(min) = self.min_approvals {
            config.approval.min_count = min;
        }
    }

    /// Effective configuration: the file at `path` (defaults when it does
    /// not exist) with command-line overrides applied, validated.
    fn resolve_config(&self, path: &Path) -> Result<AppConfig, ConfigError> {
        let mut config = AppConfig::load(path)?;
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(campus_reviews::default_config_path);

    // ── Load configuration ─────────────────────────────────────
    let config = match cli.resolve_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Invalid configuration in {}: {}", config_path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("Configuration is valid");
        println!("   Config file   : {}", config_path.display());
        println!("   API address   : {}", config.server.address());
        println!("   Database      : {}", config.database.connection_url());
        println!("   Log level     : {}", config.logging.level);
        println!("   Min approvals : {}", config.approval.min_count);
        return ExitCode::SUCCESS;
    }

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    // ── Start server ───────────────────────────────────────────
    let handle = match ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start: {}", e);
            return ExitCode::FAILURE;
        }
    };

    handle.install_signal_handler();
    info!("Press Ctrl+C to shutdown gracefully.");
    handle.wait().await;

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_config_values() {
        let cli = Cli::parse_from([
            "reviews-service",
            "--port",
            "9191",
            "--log-level",
            "debug",
            "--min-approvals",
            "2",
        ]);
        let mut config = AppConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.server.port, 9191);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.approval.min_count, 2);
    }

    #[test]
    fn zero_approvals_fails_validation() {
        let cli = Cli::parse_from(["reviews-service", "--min-approvals", "0"]);
        let mut config = AppConfig::default();
        cli.apply_overrides(&mut config);
        assert!(config.validate().is_err());
    }

    fn write_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "reviews-cli-{}-{}.toml",
            std::process::id(),
            name
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn invalid_config_file_is_not_replaced_by_defaults() {
        let path = write_config("zero-threshold", "[approval]\nmin_count = 0\n");
        let cli = Cli::parse_from(["reviews-service"]);
        let err = cli.resolve_config(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_config_file_is_rejected() {
        let path = write_config("malformed", "[server\nport = ");
        let cli = Cli::parse_from(["reviews-service"]);
        let err = cli.resolve_config(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_config_file_uses_defaults_with_overrides() {
        let cli = Cli::parse_from(["reviews-service", "--min-approvals", "2"]);
        let config = cli
            .resolve_config(Path::new("/nonexistent/reviews-cli.toml"))
            .unwrap();
        assert_eq!(config.approval.min_count, 2);
        assert_eq!(config.server.port, 8080);
    }
}
