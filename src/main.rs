//! Command-line entry point for folder sync.
//!
//! Keeps a remote media-control service's playlists and soundboards in step
//! with a local directory tree, or purges / lists the remote side.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use core_runtime::config::{
    SyncConfig, DEFAULT_HOST, DEFAULT_PLAYLISTS_DIR, DEFAULT_PORT, DEFAULT_SOUNDBOARDS_DIR,
};
use core_runtime::logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
use core_service::{bootstrap_desktop, RemoteSnapshot, RunSummary, SyncMode};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "folder-sync", version)]
#[command(about = "Sync a Playlists/Soundboards folder tree to a remote media-control service")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    remote: RemoteArgs,

    #[command(flatten)]
    logging: LoggingArgs,
}

#[derive(Subcommand)]
enum Command {
    /// Sync changes made after startup; existing files are ignored
    Watch(WatchArgs),
    /// Re-send every existing entry, then keep syncing changes
    Backfill(WatchArgs),
    /// Remove every remote playlist and soundboard
    Purge,
    /// List remote playlists and soundboards
    View {
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct WatchArgs {
    /// Root directory containing the playlists and soundboards folders
    #[arg(short, long)]
    root: PathBuf,

    /// Name of the playlists folder under root
    #[arg(long, default_value = DEFAULT_PLAYLISTS_DIR)]
    playlists_dir: String,

    /// Name of the soundboards folder under root
    #[arg(long, default_value = DEFAULT_SOUNDBOARDS_DIR)]
    soundboards_dir: String,

    /// Milliseconds between queue ticks
    #[arg(long, default_value_t = 250)]
    tick_ms: u64,

    /// Maximum concurrent remote calls (unbounded when omitted)
    #[arg(long)]
    max_in_flight: Option<usize>,
}

#[derive(Args)]
struct RemoteArgs {
    /// Remote service host
    #[arg(long, global = true, default_value = DEFAULT_HOST)]
    host: String,

    /// Remote service port
    #[arg(long, global = true, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Pause between removals during purge, in milliseconds
    #[arg(long, global = true, default_value_t = 500)]
    purge_delay_ms: u64,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    timeout_secs: u64,
}

#[derive(Args)]
struct LoggingArgs {
    /// Log output format: pretty, json or compact
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// Minimum level for workspace crates
    #[arg(long, global = true, default_value = "info")]
    log_level: LogLevel,

    /// Full filter directive, overriding --log-level (e.g. "core_sync=trace")
    #[arg(long, global = true)]
    log_filter: Option<String>,
}

impl LoggingArgs {
    fn to_config(&self) -> LoggingConfig {
        let mut config = LoggingConfig::default().with_level(self.log_level);
        if let Some(format) = self.log_format {
            config = config.with_format(format);
        }
        if let Some(filter) = &self.log_filter {
            config = config.with_filter(filter.clone());
        }
        config
    }
}

impl Command {
    fn mode(&self) -> SyncMode {
        match self {
            Self::Watch(_) => SyncMode::Watch,
            Self::Backfill(_) => SyncMode::Backfill,
            Self::Purge => SyncMode::Purge,
            Self::View { .. } => SyncMode::View,
        }
    }
}

fn build_config(cli: &Cli) -> Result<SyncConfig> {
    let remote = &cli.remote;
    let mut builder = SyncConfig::builder()
        .host(remote.host.clone())
        .port(remote.port)
        .purge_delay(Duration::from_millis(remote.purge_delay_ms))
        .request_timeout(Duration::from_secs(remote.timeout_secs));

    if let Command::Watch(args) | Command::Backfill(args) = &cli.command {
        let root = canonical_root(&args.root)?;
        builder = builder
            .root(root)
            .playlists_dir(args.playlists_dir.clone())
            .soundboards_dir(args.soundboards_dir.clone())
            .tick_interval(Duration::from_millis(args.tick_ms));

        if let Some(limit) = args.max_in_flight {
            builder = builder.max_in_flight(limit);
        }
    }

    builder.build().context("Invalid configuration")
}

fn canonical_root(root: &Path) -> Result<PathBuf> {
    let root = root
        .canonicalize()
        .with_context(|| format!("Root directory {} is not accessible", root.display()))?;

    anyhow::ensure!(root.is_dir(), "Root {} is not a directory", root.display());
    Ok(root)
}

fn print_snapshot(snapshot: &RemoteSnapshot, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
        return Ok(());
    }

    println!("Playlists ({}):", snapshot.playlists.len());
    for playlist in &snapshot.playlists {
        println!("  {:<24} {}", playlist.title.as_deref().unwrap_or("-"), playlist.url);
    }

    println!("Soundboards ({}):", snapshot.soundboards.len());
    for soundboard in &snapshot.soundboards {
        println!("  {:<24} {}", soundboard.title.as_deref().unwrap_or("-"), soundboard.url);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.logging.to_config())?;

    let config = build_config(&cli)?;
    let service = bootstrap_desktop(config)?;

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Shutdown requested"),
                Err(e) => warn!(error = %e, "Failed to listen for ctrl-c"),
            }
            shutdown.cancel();
        }
    });

    match service.run(cli.command.mode(), shutdown).await? {
        RunSummary::Watched(stats) => {
            info!(
                dispatched = stats.dispatched,
                failed = stats.failed,
                dropped_pending = stats.pending,
                "Sync stopped"
            );
        }
        RunSummary::Purged(report) => {
            println!(
                "Removed {} playlists and {} soundboards ({} failures)",
                report.playlists_removed, report.soundboards_removed, report.failures
            );
        }
        RunSummary::Viewed(snapshot) => {
            let json = matches!(cli.command, Command::View { json: true });
            print_snapshot(&snapshot, json)?;
        }
    }

    Ok(())
}
