//! Admin commands
//!
//! Inspect and repair lock state in a shared backend. Commands run against
//! the storage and event bus named in the configuration.

use clap::{Parser, Subcommand};
use reslock_application::ports::LockProvider;
use reslock_domain::error::Result;
use reslock_infrastructure::config::ConfigLoader;
use reslock_infrastructure::di::{AppContext, init_app};
use reslock_infrastructure::logging::init_logging;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

/// Command line interface for reslock
#[derive(Parser, Debug)]
#[command(name = "reslock")]
#[command(about = "Inspect and manage distributed resource locks")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List active locks with their holders and remaining lifetime
    List,
    /// Print the number of active locks
    Count,
    /// Show the holder and expiry of one resource
    Info {
        /// Resource name, without the key prefix
        resource: String,
    },
    /// Force-release a lock held under a known lock id
    Release {
        /// Resource name, without the key prefix
        resource: String,
        /// Lock id of the current holder
        lock_id: String,
    },
    /// Show permits used in the current throttling window
    ThrottleStatus {
        /// Resource name, without the key prefix
        resource: String,
    },
}

/// Load configuration, initialize logging and run one command
pub async fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let config = loader.load()?;
    init_logging(&config.logging)?;

    let context = init_app(config).await?;
    let result = execute(&context, &cli.command, out).await;
    context.shutdown();
    result
}

/// Run one command against an initialized context
pub async fn execute(context: &AppContext, command: &Command, out: &mut impl Write) -> Result<()> {
    let locks = context.lock_provider();
    match command {
        Command::List => {
            let active = locks.list_active_locks().await?;
            if active.is_empty() {
                writeln!(out, "No active locks")?;
            }
            for info in active {
                writeln!(
                    out,
                    "{}\t{}\t{}",
                    info.resource,
                    info.lock_id,
                    format_expiry(info.expires_in)
                )?;
            }
        }
        Command::Count => {
            writeln!(out, "{}", locks.get_active_locks_count().await?)?;
        }
        Command::Info { resource } => match locks.get_lock_info(resource).await? {
            Some(info) => {
                writeln!(out, "resource:   {}", info.resource)?;
                writeln!(out, "lock id:    {}", info.lock_id)?;
                writeln!(out, "expires in: {}", format_expiry(info.expires_in))?;
            }
            None => writeln!(out, "{resource} is not locked")?,
        },
        Command::Release { resource, lock_id } => {
            let held = locks
                .get_lock_info(resource)
                .await?
                .is_some_and(|info| info.lock_id == *lock_id);
            locks.release(resource, lock_id, None).await?;
            if held {
                writeln!(out, "Released {resource}")?;
            } else {
                writeln!(out, "{resource} is not held by {lock_id}")?;
            }
        }
        Command::ThrottleStatus { resource } => {
            let throttling = context.throttling_provider();
            let hits = throttling.current_hits(resource).await?;
            let options = throttling.options();
            writeln!(
                out,
                "{resource}: {hits}/{} permits used in the current {} window",
                options.max_hits_per_period,
                format_duration(options.period)
            )?;
        }
    }
    Ok(())
}

fn format_expiry(expires_in: Option<Duration>) -> String {
    expires_in.map_or_else(|| "never".to_string(), format_duration)
}

fn format_duration(duration: Duration) -> String {
    if duration.subsec_millis() == 0 {
        format!("{}s", duration.as_secs())
    } else {
        format!("{:.3}s", duration.as_secs_f64())
    }
}
