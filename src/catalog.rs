use crate::{PlaylistSummary, Result, SongMatch, SourcePlaylistInfo, TrackPage};
use async_trait::async_trait;
use std::collections::HashSet;

/// Read access to the service playlists are copied from.
///
/// Implementations are expected to be authenticated already; the transfer
/// engine never deals with credentials.
///
/// # Mocking Support
///
/// When the `mock` feature is enabled, this crate provides `MockSourceCatalog`
/// that implements this trait using the `mockall` library.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait SourceCatalog: Send + Sync {
    /// List the current user's playlists, across all pages.
    async fn list_playlists(&self) -> Result<Vec<PlaylistSummary>>;

    /// Fetch a playlist's name and description.
    async fn get_playlist(&self, playlist_id: &str) -> Result<SourcePlaylistInfo>;

    /// Fetch one page of a playlist's tracks.
    ///
    /// `next` is `None` for the first page and otherwise the continuation token
    /// returned by the previous page.
    async fn get_tracks_page(&self, playlist_id: &str, next: Option<String>) -> Result<TrackPage>;
}

/// Read/write access to the service playlists are copied to.
///
/// # Mocking Support
///
/// When the `mock` feature is enabled, this crate provides
/// `MockDestinationCatalog` that implements this trait using the `mockall`
/// library.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait DestinationCatalog: Send + Sync {
    /// List the current user's playlists on the destination.
    async fn list_playlists(&self) -> Result<Vec<PlaylistSummary>>;

    /// Create a playlist and return its identifier.
    ///
    /// Fails with [`TransferError::Write`](crate::TransferError::Write) when the
    /// service rejects the request.
    async fn create_playlist(&self, name: &str, description: &str) -> Result<String>;

    /// Identifiers of every track currently in the playlist.
    async fn get_playlist_track_ids(&self, playlist_id: &str) -> Result<HashSet<String>>;

    /// Append tracks to the end of a playlist, in order.
    ///
    /// `track_ids` is never empty. No partial-application guarantee is made:
    /// on error some of the tracks may already have been added.
    async fn append_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()>;

    /// Song-scoped free-text search, best hits first.
    async fn search_songs(&self, query: &str, limit: usize) -> Result<Vec<SongMatch>>;
}
