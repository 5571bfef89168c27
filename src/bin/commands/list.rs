use super::utils::{build_spotify_client, build_youtube_client, format_playlist, print_json};
use playlist_transfer::{DestinationCatalog, PlaylistSummary, SourceCatalog, TransferConfig};

/// Handle `list --service spotify`
pub async fn handle_list_spotify(
    config: &TransferConfig,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let spotify = build_spotify_client(config)?;
    log::info!("Listing Spotify playlists");
    let playlists = spotify.list_playlists().await?;
    print_playlists(&playlists, json);
    Ok(())
}

/// Handle `list --service youtube`
pub async fn handle_list_youtube(
    config: &TransferConfig,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let youtube = build_youtube_client(config)?;
    log::info!("Listing YouTube playlists");
    let playlists = youtube.list_playlists().await?;
    print_playlists(&playlists, json);
    Ok(())
}

fn print_playlists(playlists: &[PlaylistSummary], json: bool) {
    for playlist in playlists {
        if json {
            print_json(playlist);
        } else {
            println!("{}", format_playlist(playlist));
        }
    }

    if !json {
        if playlists.is_empty() {
            println!("No playlists found");
        } else {
            println!(
                "\n{} playlist{}",
                playlists.len(),
                if playlists.len() == 1 { "" } else { "s" }
            );
        }
    }
}
