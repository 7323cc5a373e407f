//! Wheeladmin main entry point

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use wheeladmin_api::{start_server, AppState};
use wheeladmin_config::Config;
use wheeladmin_core::anomaly::GeminiModel;
use wheeladmin_core::{AnomalyDetector, RestBackend};

#[derive(Parser, Debug)]
#[command(name = "wheeladmin")]
#[command(version = "0.1.0")]
#[command(about = "Admin console for a wheelchair rental platform", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    // A missing .env is normal outside development
    dotenvy::dotenv().ok();

    let config = match Config::load(args.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.to_details());
            anyhow::bail!("failed to load configuration from {}", args.config.display());
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str())).init();
    log::info!("Config loaded from {}", args.config.display());
    log::info!("Backend: {}", config.backend.base_url);

    let backend = RestBackend::new(&config.backend).context("failed to build backend client")?;
    let model = GeminiModel::new(&config.model, config.model.api_key()).context("failed to build model client")?;
    let detector = AnomalyDetector::new(Arc::new(model));
    log::info!("Anomaly detection model: {}", detector.model_name());

    let state = AppState::new(config, Arc::new(backend), Arc::new(detector));

    let rt = Runtime::new()?;
    rt.block_on(start_server(state)).context("server error")?;
    Ok(())
}
