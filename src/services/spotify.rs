//! Spotify Web API as a [`SourceCatalog`].

use super::transport::{parse_json, ApiTransport};
use crate::catalog::SourceCatalog;
use crate::config::DEFAULT_SPOTIFY_API_BASE;
use crate::{PlaylistSummary, Result, SourcePlaylistInfo, SourceTrack, TrackPage};
use async_trait::async_trait;
use http_client::HttpClient;
use serde::Deserialize;

/// Largest page size the playlist tracks endpoint accepts.
const TRACKS_PAGE_LIMIT: u32 = 100;
const PLAYLISTS_PAGE_LIMIT: u32 = 50;
const TRACK_FIELDS: &str = "items(track(id,name,artists(name))),next";

/// Reads playlists from the Spotify Web API with a pre-issued access token.
///
/// The token needs the `playlist-read-private` scope to see private playlists.
#[derive(Clone)]
pub struct SpotifyClient {
    transport: ApiTransport,
}

impl SpotifyClient {
    pub fn new(client: Box<dyn HttpClient + Send + Sync>, access_token: String) -> Self {
        Self::with_base_url(client, access_token, DEFAULT_SPOTIFY_API_BASE.to_string())
    }

    /// Create a client against a custom API base URL.
    ///
    /// This is useful for testing against a local stub.
    pub fn with_base_url(
        client: Box<dyn HttpClient + Send + Sync>,
        access_token: String,
        base_url: String,
    ) -> Self {
        Self {
            transport: ApiTransport::new(client, access_token, base_url),
        }
    }

    fn first_tracks_page_url(&self, playlist_id: &str) -> String {
        self.transport.url(&format!(
            "/playlists/{}/tracks?limit={}&fields={}",
            urlencoding::encode(playlist_id),
            TRACKS_PAGE_LIMIT,
            urlencoding::encode(TRACK_FIELDS)
        ))
    }
}

#[derive(Debug, Deserialize)]
struct Paging<T> {
    items: Vec<T>,
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistObject {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    tracks: Option<TracksRef>,
}

#[derive(Debug, Deserialize)]
struct TracksRef {
    total: u32,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    track: Option<TrackObject>,
}

#[derive(Debug, Deserialize)]
struct TrackObject {
    id: Option<String>,
    name: String,
    #[serde(default)]
    artists: Vec<ArtistObject>,
}

#[derive(Debug, Deserialize)]
struct ArtistObject {
    name: String,
}

impl From<PlaylistObject> for PlaylistSummary {
    fn from(playlist: PlaylistObject) -> Self {
        PlaylistSummary {
            id: playlist.id,
            name: playlist.name,
            track_count: playlist.tracks.map(|t| t.total),
        }
    }
}

/// Parse one page of `GET /playlists/{id}/tracks`.
///
/// Items without a track object (content removed from the catalog) are dropped.
fn parse_tracks_page(body: &str) -> Result<TrackPage> {
    let page: Paging<PlaylistItem> = parse_json(body)?;
    let tracks = page
        .items
        .into_iter()
        .filter_map(|item| item.track)
        .map(|track| SourceTrack {
            primary_artist: track
                .artists
                .into_iter()
                .next()
                .map(|artist| artist.name)
                .unwrap_or_default(),
            title: track.name,
            source_id: track.id.unwrap_or_default(),
        })
        .collect();

    Ok(TrackPage {
        tracks,
        next: page.next,
    })
}

fn parse_playlist_info(body: &str) -> Result<SourcePlaylistInfo> {
    let playlist: PlaylistObject = parse_json(body)?;
    Ok(SourcePlaylistInfo {
        id: playlist.id,
        name: playlist.name,
        description: playlist.description.unwrap_or_default(),
    })
}

#[async_trait]
impl SourceCatalog for SpotifyClient {
    async fn list_playlists(&self) -> Result<Vec<PlaylistSummary>> {
        let mut playlists = Vec::new();
        let mut url = Some(
            self.transport
                .url(&format!("/me/playlists?limit={PLAYLISTS_PAGE_LIMIT}")),
        );

        while let Some(current) = url {
            let page: Paging<PlaylistObject> = self.transport.get_json(&current).await?;
            playlists.extend(page.items.into_iter().map(PlaylistSummary::from));
            url = page.next;
        }

        log::debug!("Found {} Spotify playlists", playlists.len());
        Ok(playlists)
    }

    async fn get_playlist(&self, playlist_id: &str) -> Result<SourcePlaylistInfo> {
        let url = self.transport.url(&format!(
            "/playlists/{}?fields=id,name,description",
            urlencoding::encode(playlist_id)
        ));
        let body = self.transport.get(&url).await?;
        parse_playlist_info(&body)
    }

    async fn get_tracks_page(&self, playlist_id: &str, next: Option<String>) -> Result<TrackPage> {
        // Spotify's continuation token is the absolute URL of the next page.
        let url = next.unwrap_or_else(|| self.first_tracks_page_url(playlist_id));
        let body = self.transport.get(&url).await?;
        parse_tracks_page(&body)
    }
}
