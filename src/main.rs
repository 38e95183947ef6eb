use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tariff_check::TariffChecker;
use tariff_check::config::Config;
use tariff_check::logging::{get_logger, init_logging};
use tracing::{debug, error, info};

/// Publish the cheapest evcc price window to Home Assistant
#[derive(Debug, Parser)]
#[command(name = "ttc", version = env!("APP_VERSION"))]
struct Args {
    /// Config file (TOML or YAML); defaults to ./config.toml or /etc/ttc/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        get_logger("main").warn(&format!("Unable to listen for Ctrl-C: {}", e));
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (config_path, config) = Config::load(args.config.as_deref()).map_err(|e| {
        eprintln!("Fatal error config file: {}", e);
        e
    })?;

    println!("\n-- Tibber Tariff Check via EVCC ({}) --\n", env!("APP_VERSION"));

    init_logging(&config.logging, config.global.debug)?;
    debug!("Application started");
    info!("Using config {}", config_path.display());

    let checker = TariffChecker::from_http()?;

    if args.once {
        config.validate()?;
        let outcome = checker.run_once(&config).await?;
        info!(
            "Single cycle done: {} published={}",
            outcome.choice, outcome.published
        );
        return Ok(());
    }

    match checker.run(&config_path, shutdown_signal()).await {
        Ok(()) => {
            info!("Shutdown complete");
            Ok(())
        }
        Err(e) => {
            error!("Checker failed with error: {}", e);
            Err(anyhow::anyhow!("Checker error: {}", e))
        }
    }
}
