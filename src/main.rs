use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use nxprom::config::Config;
use nxprom::schedule::Scheduler;
use nxprom::{poll, reload};

#[derive(Parser, Debug)]
#[command(name = "nxprom", about = "NX-API poller exporting Prometheus metrics")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yml")]
    conf: String,

    /// Validate config and exit
    #[arg(long)]
    check: bool,

    /// Print version and exit
    #[arg(short, long)]
    version: bool,
}

#[tokio::main(worker_threads = 2)]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("nxprom {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Load and validate configuration
    let config = Config::load(&cli.conf)?;
    config.validate()?;

    if cli.check {
        println!("Configuration is valid.");
        return Ok(());
    }

    // Initialize logging
    init_logging(&config)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        hosts = config.host_count(),
        push = %if config.push.is_empty() { "stdout" } else { config.push.as_str() },
        "Starting nxprom"
    );

    if let Err(e) = run(cli.conf, config).await {
        error!(error = %e, "Poller terminated with error");
        return Err(e);
    }

    Ok(())
}

fn init_logging(config: &Config) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    Ok(())
}

async fn run(conf_path: String, config: Config) -> Result<()> {
    let push = if config.push.is_empty() { None } else { Some(config.push.clone()) };
    let one_shot = config.poll_interval()?.is_none();

    let (reload_tx, reload_rx) = tokio::sync::mpsc::channel(1);
    reload::spawn_watcher(conf_path, reload_tx);

    let scheduler = Scheduler::new(config)?;

    // Rounds run as spawned tasks so a slow device never delays the
    // schedule. One-shot mode collects the handles and drains them
    // before exit; continuous mode is fire and forget.
    let mut rounds = Vec::new();
    scheduler
        .run(reload_rx, |target| {
            let handle = tokio::spawn(poll::run_round(target, push.clone()));
            if one_shot {
                rounds.push(handle);
            }
        })
        .await;

    for handle in rounds {
        let _ = handle.await;
    }

    Ok(())
}
