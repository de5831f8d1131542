use anyhow::{Context, Result};
use chrono::{Local, TimeZone, Utc};
use clap::{Parser, Subcommand};
use directories::BaseDirs;
use focus_api::{Ack, ApiError, FocusSchedule, FocusStatus, OverrideRequest, PauseRequest, DEFAULT_PORT};

#[derive(Parser)]
#[command(name = "focusctl")]
#[command(about = "Control the focusd daemon", long_about = None)]
struct Cli {
    /// Daemon port on localhost
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current focus status
    Status,
    /// Pause focus for a number of minutes
    Pause {
        #[arg(value_name = "MINUTES")]
        minutes: u32,
    },
    /// Force a named configuration for a number of minutes
    Override {
        #[arg(value_name = "NAME")]
        name: String,
        #[arg(value_name = "MINUTES")]
        minutes: u32,
    },
    /// List the configured schedule names
    Configurations,
    /// Print the schedule configuration directory
    ConfigPath,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = DaemonClient::new(cli.port);

    match cli.command {
        Commands::Status => {
            let status = client.status().await?;
            print_status(&status);
        }
        Commands::Pause { minutes } => {
            client.pause(minutes_from_now(minutes)).await?;
            println!("Focus schedule paused for {} minutes", minutes);
        }
        Commands::Override { name, minutes } => {
            client.set_override(&name, minutes_from_now(minutes)).await?;
            println!("Using schedule '{}' for {} minutes", name, minutes);
        }
        Commands::Configurations => {
            let names = client.configurations().await?;
            if names.is_empty() {
                println!("No schedules configured");
            } else {
                for name in names {
                    println!("{}", name);
                }
            }
        }
        Commands::ConfigPath => {
            println!("{}", config_path().display());
        }
    }

    Ok(())
}

struct DaemonClient {
    http: reqwest::Client,
    base: String,
}

impl DaemonClient {
    fn new(port: u16) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: format!("http://localhost:{}", port),
        }
    }

    async fn status(&self) -> Result<FocusStatus> {
        let response = self
            .http
            .get(format!("{}/status", self.base))
            .send()
            .await
            .map_err(connection_error)?;
        Ok(response.json().await.context("decoding status response")?)
    }

    async fn configurations(&self) -> Result<Vec<String>> {
        let response = self
            .http
            .get(format!("{}/configurations", self.base))
            .send()
            .await
            .map_err(connection_error)?;
        Ok(response
            .json()
            .await
            .context("decoding configurations response")?)
    }

    async fn pause(&self, until: i64) -> Result<()> {
        let response = self
            .http
            .post(format!("{}/pause", self.base))
            .json(&PauseRequest { until })
            .send()
            .await
            .map_err(connection_error)?;
        check_ack(response.json().await.context("decoding pause response")?)
    }

    async fn set_override(&self, name: &str, until: i64) -> Result<()> {
        let response = self
            .http
            .post(format!("{}/override", self.base))
            .json(&OverrideRequest {
                name: name.to_string(),
                until,
            })
            .send()
            .await
            .map_err(connection_error)?;
        check_ack(response.json().await.context("decoding override response")?)
    }
}

/// Failures ride on HTTP 200; the status field is the real signal.
fn check_ack(ack: Ack) -> Result<()> {
    if ack.is_error() {
        let message = ack.message.unwrap_or_else(|| "unknown error".to_string());
        return Err(ApiError::Daemon(message).into());
    }
    Ok(())
}

fn connection_error(err: reqwest::Error) -> anyhow::Error {
    if err.is_connect() {
        ApiError::ConnectionRefused.into()
    } else {
        err.into()
    }
}

fn minutes_from_now(minutes: u32) -> i64 {
    Utc::now().timestamp() + i64::from(minutes) * 60
}

fn config_path() -> std::path::PathBuf {
    match BaseDirs::new() {
        Some(dirs) => dirs.home_dir().join(".config").join("focus"),
        None => std::path::PathBuf::from(".config/focus"),
    }
}

fn print_status(status: &FocusStatus) {
    // Same precedence the daemon resolves with: pause > override > schedule.
    if let Some(until) = status.pause.until {
        println!("Focus is paused until {}", format_time(until));
    } else if let FocusSchedule {
        name: Some(name),
        until: Some(until),
    } = &status.override_
    {
        println!("Focusing using '{}' until {}", name, format_time(*until));
    } else if let FocusSchedule {
        name: Some(name),
        until: Some(until),
    } = &status.schedule
    {
        println!("Planned focus using '{}' until {}", name, format_time(*until));
    } else {
        println!("No focus schedule is active");
    }
}

fn format_time(ts: i64) -> String {
    match Local.timestamp_opt(ts, 0).single() {
        Some(time) => time.format("%H:%M").to_string(),
        None => ts.to_string(),
    }
}
