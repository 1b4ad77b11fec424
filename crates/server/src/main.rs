//! Storefront server startup: configuration check and bootstrap

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use config::{global, mask_secret, Config, ConfigLoader, ConfigValidator, ProductSource};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "storefront", version, about = "Storefront server configuration")]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, env = "CONFIG_PATH", default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the configuration and print the resolved settings
    Check,
    /// Write an example configuration file
    Init {
        /// Where to write the example (defaults to --config)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    // Load .env file if it exists
    if let Err(e) = dotenv::dotenv() {
        if !e.not_found() {
            eprintln!("Could not load .env file: {}", e);
        }
    }

    init_logging()?;

    let cli = Cli::parse();
    info!("Starting storefront v{}", env!("CARGO_PKG_VERSION"));

    match cli.command.unwrap_or(Command::Check) {
        Command::Check => check(&cli.config),
        Command::Init { output, force } => init(output.as_deref().unwrap_or(cli.config.as_path()), force),
    }
}

fn check(config_path: &Path) -> Result<()> {
    let config = global::load(config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;

    let report = ConfigValidator::validate(config);
    for issue in &report.warnings {
        warn!(field = %issue.field, "{}", issue.message);
    }
    info!("{}", report.summary());

    for (name, value) in settings_summary(config) {
        println!("{:<28} {}", name, value);
    }

    Ok(())
}

fn init(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        bail!("{} already exists, pass --force to overwrite it", output.display());
    }

    ConfigLoader::write_example(output)?;
    info!(path = %output.display(), "Example configuration written");
    Ok(())
}

/// Resolved settings as display rows, secrets masked
fn settings_summary(config: &Config) -> Vec<(&'static str, String)> {
    let product_source = match config.product_source() {
        ProductSource::Internal => format!("internal (seed: {})", config.seed_file),
        ProductSource::External(url) => format!("external ({})", url),
    };

    vec![
        ("GrpcPort", config.grpc_port.clone()),
        ("GeminiModel", config.gemini_model.clone()),
        ("BatchSize", config.batch_size.to_string()),
        ("BatchTimeout", format!("{:?}", config.batch_timeout)),
        ("GoogleApiKey", mask_secret(&config.google_api_key).to_string()),
        ("ProductSource", product_source),
        ("WebServerPort", config.web_server.port.clone()),
        ("ImageDir", config.web_server.image_dir.clone()),
        ("Store", config.store.receipt_lines().join(", ")),
        ("OrderConfirmationCallback", config.order_confirmation_callback.clone()),
    ]
}

/// Initialize logging based on environment variables
fn init_logging() -> Result<()> {
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match log_format.as_str() {
        "pretty" => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to initialize pretty logging")?;
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to initialize JSON logging")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    fn row<'a>(rows: &'a [(&'static str, String)], name: &str) -> &'a str {
        rows.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
            .unwrap()
    }

    #[test]
    fn test_cli_defaults_to_check() {
        let cli = Cli::try_parse_from(["storefront", "--config", "store.yaml"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("store.yaml"));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_init_flags() {
        let cli = Cli::try_parse_from(["storefront", "init", "--output", "out.yaml", "--force"]).unwrap();
        match cli.command {
            Some(Command::Init { output, force }) => {
                assert_eq!(output, Some(PathBuf::from("out.yaml")));
                assert!(force);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_summary_masks_api_key() {
        let config = Config {
            google_api_key: "AIza-secret".to_string(),
            batch_timeout: Duration::from_millis(1500),
            ..Config::EMPTY
        };

        let rows = settings_summary(&config);
        assert_eq!(row(&rows, "GoogleApiKey"), "<redacted>");
        assert_eq!(row(&rows, "BatchTimeout"), "1.5s");
        assert_eq!(row(&rows, "ProductSource"), "external ()");
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        init(&path, false).unwrap();
        assert!(init(&path, false).is_err());
        init(&path, true).unwrap();

        let config = ConfigLoader::load(&path).unwrap();
        assert_eq!(config.grpc_port, "50051");
    }
}
