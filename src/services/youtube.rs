//! YouTube Data API v3 as a [`DestinationCatalog`].

use super::transport::{into_write_error, parse_json, ApiTransport};
use crate::catalog::DestinationCatalog;
use crate::config::DEFAULT_YOUTUBE_API_BASE;
use crate::{PlaylistSummary, Result, SongMatch, TransferError};
use async_trait::async_trait;
use http_client::HttpClient;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashSet;

const PAGE_LIMIT: u32 = 50;
/// The "Music" video category.
const MUSIC_CATEGORY_ID: &str = "10";
const MAX_TITLE_CHARS: usize = 150;
const MAX_DESCRIPTION_CHARS: usize = 5000;

/// Writes playlists through the YouTube Data API with a pre-issued access token.
///
/// The token needs the `https://www.googleapis.com/auth/youtube` scope.
/// Playlists are created private unless [`with_privacy_status`](Self::with_privacy_status)
/// says otherwise.
#[derive(Clone)]
pub struct YouTubeClient {
    transport: ApiTransport,
    privacy_status: String,
}

impl YouTubeClient {
    pub fn new(client: Box<dyn HttpClient + Send + Sync>, access_token: String) -> Self {
        Self::with_base_url(client, access_token, DEFAULT_YOUTUBE_API_BASE.to_string())
    }

    /// Create a client against a custom API base URL.
    pub fn with_base_url(
        client: Box<dyn HttpClient + Send + Sync>,
        access_token: String,
        base_url: String,
    ) -> Self {
        Self {
            transport: ApiTransport::new(client, access_token, base_url),
            privacy_status: "private".to_string(),
        }
    }

    /// Privacy for created playlists: `private`, `unlisted` or `public`.
    pub fn with_privacy_status(mut self, privacy_status: impl Into<String>) -> Self {
        self.privacy_status = privacy_status.into();
        self
    }

    fn paged_url(&self, path_and_query: &str, page_token: Option<&str>) -> String {
        let mut url = self
            .transport
            .url(&format!("{path_and_query}&maxResults={PAGE_LIMIT}"));
        if let Some(token) = page_token {
            url.push_str("&pageToken=");
            url.push_str(&urlencoding::encode(token));
        }
        url
    }

    async fn insert_playlist_item(&self, playlist_id: &str, video_id: &str) -> Result<()> {
        let url = self.transport.url("/playlistItems?part=snippet");
        let payload = json!({
            "snippet": {
                "playlistId": playlist_id,
                "resourceId": {
                    "kind": "youtube#video",
                    "videoId": video_id,
                }
            }
        });
        let _: serde_json::Value = self.transport.post_json(&url, &payload).await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistResource {
    id: String,
    snippet: PlaylistSnippet,
    content_details: Option<PlaylistContentDetails>,
}

#[derive(Debug, Deserialize)]
struct PlaylistSnippet {
    title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistContentDetails {
    item_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemResource {
    content_details: PlaylistItemContentDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemContentDetails {
    video_id: String,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    id: SearchResultId,
    snippet: SearchSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResultId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchSnippet {
    title: String,
    channel_title: String,
}

#[derive(Debug, Deserialize)]
struct CreatedResource {
    id: String,
}

fn parse_playlists_page(body: &str) -> Result<(Vec<PlaylistSummary>, Option<String>)> {
    let page: ListResponse<PlaylistResource> = parse_json(body)?;
    let playlists = page
        .items
        .into_iter()
        .map(|playlist| PlaylistSummary {
            id: playlist.id,
            name: playlist.snippet.title,
            track_count: playlist.content_details.map(|d| d.item_count),
        })
        .collect();
    Ok((playlists, page.next_page_token))
}

fn parse_playlist_items_page(body: &str) -> Result<(Vec<String>, Option<String>)> {
    let page: ListResponse<PlaylistItemResource> = parse_json(body)?;
    let ids = page
        .items
        .into_iter()
        .map(|item| item.content_details.video_id)
        .collect();
    Ok((ids, page.next_page_token))
}

/// Search results that are not videos (channels, playlists) carry no video id and are dropped.
fn parse_search_results(body: &str) -> Result<Vec<SongMatch>> {
    let page: ListResponse<SearchResult> = parse_json(body)?;
    Ok(page
        .items
        .into_iter()
        .filter_map(|result| {
            result.id.video_id.map(|track_id| SongMatch {
                track_id,
                title: result.snippet.title,
                artist: result.snippet.channel_title,
            })
        })
        .collect())
}

/// YouTube rejects angle brackets in playlist text and caps lengths.
fn sanitize(text: &str, max_chars: usize) -> String {
    text.chars()
        .filter(|c| *c != '<' && *c != '>')
        .take(max_chars)
        .collect()
}

#[async_trait]
impl DestinationCatalog for YouTubeClient {
    async fn list_playlists(&self) -> Result<Vec<PlaylistSummary>> {
        let mut playlists = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let url = self.paged_url(
                "/playlists?part=snippet,contentDetails&mine=true",
                page_token.as_deref(),
            );
            let body = self.transport.get(&url).await?;
            let (page, next) = parse_playlists_page(&body)?;
            playlists.extend(page);

            match next {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        log::debug!("Found {} YouTube playlists", playlists.len());
        Ok(playlists)
    }

    async fn create_playlist(&self, name: &str, description: &str) -> Result<String> {
        let url = self.transport.url("/playlists?part=snippet,status");
        let payload = json!({
            "snippet": {
                "title": sanitize(name, MAX_TITLE_CHARS),
                "description": sanitize(description, MAX_DESCRIPTION_CHARS),
            },
            "status": {
                "privacyStatus": self.privacy_status,
            }
        });

        let created: CreatedResource = self
            .transport
            .post_json(&url, &payload)
            .await
            .map_err(into_write_error)?;
        Ok(created.id)
    }

    async fn get_playlist_track_ids(&self, playlist_id: &str) -> Result<HashSet<String>> {
        let mut ids = HashSet::new();
        let mut page_token: Option<String> = None;

        loop {
            let url = self.paged_url(
                &format!(
                    "/playlistItems?part=contentDetails&playlistId={}",
                    urlencoding::encode(playlist_id)
                ),
                page_token.as_deref(),
            );
            let body = self.transport.get(&url).await?;
            let (page, next) = parse_playlist_items_page(&body)?;
            ids.extend(page);

            match next {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(ids)
    }

    async fn append_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()> {
        // The Data API has no batch insert; stop at the first rejected item.
        for (position, video_id) in track_ids.iter().enumerate() {
            self.insert_playlist_item(playlist_id, video_id)
                .await
                .map_err(|e| match into_write_error(e) {
                    TransferError::Write(message) => TransferError::Write(format!(
                        "item {} of {} ({video_id}): {message}",
                        position + 1,
                        track_ids.len()
                    )),
                    other => other,
                })?;
        }
        Ok(())
    }

    async fn search_songs(&self, query: &str, limit: usize) -> Result<Vec<SongMatch>> {
        let url = self.transport.url(&format!(
            "/search?part=snippet&type=video&videoCategoryId={MUSIC_CATEGORY_ID}&maxResults={}&q={}",
            limit.clamp(1, PAGE_LIMIT as usize),
            urlencoding::encode(query)
        ));
        let body = self.transport.get(&url).await?;
        parse_search_results(&body)
    }
}
