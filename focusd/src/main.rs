use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use focusd::clock::SystemClock;
use focusd::config::Settings;
use focusd::http;
use focusd::schedules::ScheduleStore;
use focusd::state::StateRegister;

/// focusd - local focus-mode scheduling daemon
#[derive(Parser)]
#[command(name = "focusd")]
#[command(about = "Local focus-mode scheduling daemon", long_about = None)]
struct Cli {
    /// Port to bind on localhost (overrides focusd.toml)
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory with schedule definitions (overrides focusd.toml)
    #[arg(short, long, value_name = "DIR")]
    schedules_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut settings = Settings::load()?;
    if let Some(port) = cli.port {
        settings.port = port;
    }
    if let Some(dir) = cli.schedules_dir {
        settings.schedules_dir = dir;
    }

    let store = ScheduleStore::load(&settings.schedules_dir);
    let names = store.names();
    if names.is_empty() {
        info!(
            dir = %settings.schedules_dir.display(),
            "no schedule configurations found, serving pause/override only"
        );
    } else {
        info!(count = names.len(), "loaded schedule configurations");
    }

    // Schedule files are read once; edits require a restart.
    let state = http::app_state(
        Arc::new(StateRegister::new()),
        Arc::new(store),
        Arc::new(SystemClock),
    );

    http::serve(settings.port, state).await
}
