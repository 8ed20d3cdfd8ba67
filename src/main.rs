use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use training_record_server::config::{AppConfig, CliConfig, FileConfig};
use training_record_server::server::metrics;
use training_record_server::{
    run_server, MissingMenuPolicy, RequestsLoggingLevel, SqliteTrainingStore, TrainingManager,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    if path_buf.is_absolute() {
        return Ok(path_buf);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(path_buf))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite training database file, created if missing.
    #[clap(long, env = "TRAINING_DB_PATH", value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// Path to a TOML config file. Its values override the command line.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, env = "TRAINING_PORT", default_value_t = 3001)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// What to do with a new record whose menu name matches no menu.
    #[clap(long, default_value = "allow")]
    pub missing_menu_policy: MissingMenuPolicy,

    /// Maximum time a single store operation may take, in milliseconds.
    #[clap(long, default_value_t = 10_000)]
    pub store_timeout_ms: u64,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db_path: self.db_path.clone(),
            port: self.port,
            metrics_port: self.metrics_port,
            logging_level: self.logging_level.clone(),
            missing_menu_policy: self.missing_menu_policy,
            store_timeout_ms: self.store_timeout_ms,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}...", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let app_config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!(
        "Opening SQLite training database at {:?}...",
        app_config.db_path
    );
    let store = Arc::new(SqliteTrainingStore::new(&app_config.db_path)?);

    info!("Initializing metrics...");
    metrics::init_metrics();

    info!(
        "Missing menu policy: {}, store timeout: {}ms",
        app_config.missing_menu_policy, app_config.store_timeout_ms
    );
    let training_manager = TrainingManager::new(store, app_config.missing_menu_policy);

    run_server(app_config.server_config(), training_manager).await
}
