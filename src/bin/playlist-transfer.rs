mod commands;

use clap::Parser;
use commands::{execute_command, Commands};
use playlist_transfer::TransferConfig;
use std::path::PathBuf;

/// Copy Spotify playlists to YouTube without inserting duplicates
#[derive(Parser)]
#[command(
    name = "playlist-transfer",
    about = "Copy Spotify playlists to YouTube without inserting duplicates",
    long_about = None
)]
struct Cli {
    /// Show detailed debug information
    #[arg(long, global = true)]
    verbose: bool,

    /// Config file to use instead of ~/.config/playlist-transfer/config.json
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = match TransferConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = execute_command(args.command, &config).await {
        eprintln!("❌ Command failed: {e}");
        std::process::exit(1);
    }

    Ok(())
}
