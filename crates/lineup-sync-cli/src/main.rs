use clap::{ArgAction, Parser, Subcommand};
use lineup_sync_config::PathManager;
use lineup_sync_core::{SyncOptions, DEFAULT_CONCURRENCY};
use std::path::PathBuf;
use commands::{channels, playlists, sync, validate};

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "lineup-sync")]
#[command(about = "Sync Plex playlists, Letterboxd lists and title files into Tunarr channels")]
#[command(version)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Also write logs to a daily-rotated file (default location when no path is given)
    #[arg(long, global = true, value_name = "PATH", num_args = 0..=1)]
    log_file: Option<Option<PathBuf>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile channel lineups with their sources
    #[command(long_about = "Resolve every configured channel's source against Plex and replace the matching Tunarr channel's lineup. Channels are processed one at a time; a failing channel does not stop the others. Exits non-zero if any channel failed.")]
    Sync {
        /// Channels file (defaults to $LINEUP_SYNC_CONFIG, ./channels.toml, then the user config directory)
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Only sync channels with this name or number (repeatable)
        #[arg(long = "channel", value_name = "NAME_OR_NUMBER")]
        selectors: Vec<String>,

        /// Resolve and diff without changing anything in Tunarr
        #[arg(long, action = ArgAction::SetTrue)]
        dry_run: bool,

        /// Simultaneous Plex searches per channel
        #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
        concurrency: usize,

        /// Seed for reproducible shuffling
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Load and validate the channels file without contacting any server
    Validate {
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
    /// List playlists on the Plex server
    Playlists,
    /// List Tunarr channels and their lineup sizes
    Channels,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_file = cli
        .log_file
        .map(|path| path.unwrap_or_else(|| PathManager::default().log_file()));
    logging::init_logging_with_file(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    let success = match cli.command {
        Commands::Sync {
            config,
            selectors,
            dry_run,
            concurrency,
            seed,
        } => {
            let options = SyncOptions {
                dry_run,
                concurrency: concurrency.max(1),
                shuffle_seed: seed,
            };
            sync::run_sync(config, selectors, options, &output).await?
        }
        Commands::Validate { config } => validate::run_validate(config, &output)?,
        Commands::Playlists => playlists::run_playlists(&output).await?,
        Commands::Channels => channels::run_channels(&output).await?,
    };

    if !success {
        std::process::exit(1);
    }
    Ok(())
}
