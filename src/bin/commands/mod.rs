pub mod list;
pub mod transfer;
pub mod utils;

use clap::{Subcommand, ValueEnum};
use playlist_transfer::TransferConfig;

#[derive(ValueEnum, Clone, Copy)]
pub enum Service {
    /// Spotify playlists (the transfer source)
    Spotify,
    /// YouTube playlists (the transfer destination)
    Youtube,
}

#[derive(ValueEnum, Clone, Copy)]
pub enum MatchStrategy {
    /// Take the first search result
    First,
    /// Prefer the first result whose channel mentions the artist
    Artist,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List playlists on one of the services
    ///
    /// Prints one playlist per line with its identifier, which is what the
    /// transfer command expects.
    ///
    /// Usage examples:
    /// # List your Spotify playlists
    /// playlist-transfer list
    ///
    /// # List the playlists already on YouTube
    /// playlist-transfer list --service youtube
    List {
        /// Which service to list
        #[arg(long, value_enum, default_value = "spotify")]
        service: Service,

        /// Print playlists as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Transfer Spotify playlists to YouTube
    ///
    /// Each Spotify playlist is copied into the YouTube playlist with the same
    /// name, which is created when missing. Tracks already present are skipped,
    /// so running the same transfer twice adds nothing the second time.
    /// Press Ctrl-C to stop after the current track.
    ///
    /// Usage examples:
    /// # Transfer two playlists
    /// playlist-transfer transfer 37i9dQZF1DXcBWIGoYBM5M 5ABHKGoOzxkaa28ttQV9sE
    ///
    /// # Transfer everything, writing 20 tracks per batch
    /// playlist-transfer transfer --all --batch-size 20
    Transfer {
        /// Spotify playlist identifiers
        #[arg(required_unless_present = "all")]
        playlist_ids: Vec<String>,

        /// Transfer every playlist in the Spotify library
        #[arg(long, conflicts_with = "playlist_ids")]
        all: bool,

        /// Tracks written per destination request (1-100)
        #[arg(long)]
        batch_size: Option<usize>,

        /// How to choose among search results
        #[arg(long, value_enum, default_value = "first")]
        strategy: MatchStrategy,

        /// Print events as JSON lines instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Execute the given command with the loaded configuration
pub async fn execute_command(
    command: Commands,
    config: &TransferConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::List { service, json } => match service {
            Service::Spotify => list::handle_list_spotify(config, json).await,
            Service::Youtube => list::handle_list_youtube(config, json).await,
        },

        Commands::Transfer {
            playlist_ids,
            all,
            batch_size,
            strategy,
            json,
        } => {
            let batch_size = batch_size.unwrap_or(config.batch_size);
            transfer::handle_transfer(config, playlist_ids, all, batch_size, strategy, json).await
        }
    }
}
