use crate::catalog::SourceCatalog;
use crate::{Result, SourcePlaylist, SourceTrack, TransferError};

use async_trait::async_trait;

/// Async iterator trait for paginated catalog data.
///
/// Pages are fetched lazily as items are consumed, so a caller that only needs
/// the first few items never pays for the whole listing.
#[async_trait]
pub trait AsyncPaginatedIterator<T: Send> {
    /// Fetch the next item from the iterator.
    ///
    /// This method automatically handles pagination, fetching new pages as needed.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(item))` - Next item in the sequence
    /// - `Ok(None)` - No more items available
    /// - `Err(...)` - Network or parsing error occurred
    async fn next(&mut self) -> Result<Option<T>>;

    /// Collect all remaining items into a Vec.
    ///
    /// **Warning**: This method will fetch ALL remaining pages.
    async fn collect_all(&mut self) -> Result<Vec<T>> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await? {
            items.push(item);
        }
        Ok(items)
    }

    /// Take up to n items from the iterator.
    async fn take(&mut self, n: usize) -> Result<Vec<T>> {
        let mut items = Vec::new();
        for _ in 0..n {
            match self.next().await? {
                Some(item) => items.push(item),
                None => break,
            }
        }
        Ok(items)
    }

    /// Number of pages fetched so far.
    fn current_page(&self) -> u32;
}

/// Iterator over a source playlist's tracks, following continuation tokens.
///
/// Every page error is reported as
/// [`TransferError::SourceUnavailable`], whatever the underlying cause.
pub struct PlaylistTracksIterator<'a, S: SourceCatalog + ?Sized> {
    source: &'a S,
    playlist_id: String,
    next_token: Option<String>,
    pages_fetched: u32,
    has_more: bool,
    buffer: std::vec::IntoIter<SourceTrack>,
}

impl<'a, S: SourceCatalog + ?Sized> PlaylistTracksIterator<'a, S> {
    pub fn new(source: &'a S, playlist_id: impl Into<String>) -> Self {
        Self {
            source,
            playlist_id: playlist_id.into(),
            next_token: None,
            pages_fetched: 0,
            has_more: true,
            buffer: Vec::new().into_iter(),
        }
    }

    async fn fetch_next_page(&mut self) -> Result<()> {
        let page = self
            .source
            .get_tracks_page(&self.playlist_id, self.next_token.take())
            .await
            .map_err(|e| {
                TransferError::SourceUnavailable(format!(
                    "fetching page {} of playlist {}: {e}",
                    self.pages_fetched + 1,
                    self.playlist_id
                ))
            })?;

        self.pages_fetched += 1;
        log::debug!(
            "Fetched page {} of playlist {} ({} tracks, more: {})",
            self.pages_fetched,
            self.playlist_id,
            page.tracks.len(),
            page.has_next_page()
        );

        self.has_more = page.has_next_page();
        self.next_token = page.next;
        self.buffer = page.tracks.into_iter();
        Ok(())
    }
}

#[async_trait]
impl<'a, S: SourceCatalog + ?Sized> AsyncPaginatedIterator<SourceTrack>
    for PlaylistTracksIterator<'a, S>
{
    async fn next(&mut self) -> Result<Option<SourceTrack>> {
        loop {
            if let Some(track) = self.buffer.next() {
                return Ok(Some(track));
            }
            if !self.has_more {
                return Ok(None);
            }
            // A page may legitimately be empty while still pointing at a next one.
            self.fetch_next_page().await?;
        }
    }

    fn current_page(&self) -> u32 {
        self.pages_fetched
    }
}

/// Fetch every track of a source playlist, in playlist order.
pub async fn list_all_tracks<S: SourceCatalog + ?Sized>(
    source: &S,
    playlist_id: &str,
) -> Result<Vec<SourceTrack>> {
    PlaylistTracksIterator::new(source, playlist_id)
        .collect_all()
        .await
}

/// Fetch a source playlist's metadata together with all of its tracks.
pub async fn fetch_playlist<S: SourceCatalog + ?Sized>(
    source: &S,
    playlist_id: &str,
) -> Result<SourcePlaylist> {
    let info = source.get_playlist(playlist_id).await.map_err(|e| {
        TransferError::SourceUnavailable(format!("fetching playlist {playlist_id}: {e}"))
    })?;
    let tracks = list_all_tracks(source, playlist_id).await?;
    Ok(SourcePlaylist::from_info(info, tracks))
}
