use playlist_transfer::services::{SpotifyClient, YouTubeClient};
use playlist_transfer::{PlaylistSummary, Result, TransferConfig, TransferError};

fn http_client() -> Box<dyn http_client::HttpClient + Send + Sync> {
    Box::new(http_client::native::NativeClient::new())
}

/// Print setup help when a token is missing, then pass the error on.
fn explain_missing_token(error: TransferError) -> TransferError {
    if matches!(error, TransferError::AuthNotReady) {
        print_token_help();
    }
    error
}

pub fn build_spotify_client(config: &TransferConfig) -> Result<SpotifyClient> {
    let token = config.spotify_token().map_err(explain_missing_token)?;
    Ok(SpotifyClient::with_base_url(
        http_client(),
        token.to_string(),
        config.spotify_api_base.clone(),
    ))
}

pub fn build_youtube_client(config: &TransferConfig) -> Result<YouTubeClient> {
    let token = config.youtube_token().map_err(explain_missing_token)?;
    Ok(YouTubeClient::with_base_url(
        http_client(),
        token.to_string(),
        config.youtube_api_base.clone(),
    ))
}

/// Build both service clients, or explain which tokens are missing.
pub fn build_clients(config: &TransferConfig) -> Result<(SpotifyClient, YouTubeClient)> {
    config.tokens().map_err(explain_missing_token)?;
    Ok((build_spotify_client(config)?, build_youtube_client(config)?))
}

fn print_token_help() {
    eprintln!("Access token missing. Set it in the config file or the environment:");
    eprintln!("  SPOTIFY_ACCESS_TOKEN=<token with playlist-read-private scope>");
    eprintln!("  YOUTUBE_ACCESS_TOKEN=<token with youtube scope>");
    eprintln!();
}

/// One line per playlist: id, name and track count when known.
pub fn format_playlist(playlist: &PlaylistSummary) -> String {
    match playlist.track_count {
        Some(count) => format!("{}  {} ({count} tracks)", playlist.id, playlist.name),
        None => format!("{}  {}", playlist.id, playlist.name),
    }
}

/// Print a serializable value as a single JSON line.
pub fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize output to JSON: {e}"),
    }
}
