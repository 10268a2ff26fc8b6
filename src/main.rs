//! Moneyweb main entry point

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use moneyweb_client::MoneyClient;
use moneyweb_config::{Config, ConfigError};
use moneyweb_web::start_server;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "moneyweb")]
#[command(version = "0.1.0")]
#[command(about = "A lightweight HTMX front-end for a personal finance REST API", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print a default configuration file and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.print_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    // The log level lives in the config, so the logger starts after loading it
    let (config, missing) = match Config::load(&args.config) {
        Ok(config) => (config, false),
        Err(ConfigError::FileNotFound { .. }) => (Config::default(), true),
        Err(e) => {
            eprintln!("{}", e.report());
            return Err(e).with_context(|| format!("cannot load {}", args.config.display()));
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.logging.level)).init();

    if missing {
        log::warn!("Config file {} not found, using defaults", args.config.display());
    } else {
        log::info!("Config loaded from {}", args.config.display());
    }

    let client = MoneyClient::from_config(&config);
    let rt = Runtime::new()?;
    rt.block_on(start_server(config, client))
        .context("server failed")?;

    Ok(())
}
