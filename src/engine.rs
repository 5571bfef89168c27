//! The transfer reconciliation engine.
//!
//! For each selected source playlist the engine finds or creates the matching
//! destination playlist, resolves every source track to a destination
//! identifier, skips identifiers the destination playlist already holds, and
//! appends the rest in bounded batches. Everything inside a run is sequential;
//! the run itself is a `Send` future that a host can spawn on its own task.

use crate::cancel::CancellationState;
use crate::catalog::{DestinationCatalog, SourceCatalog};
use crate::config::validate_batch_size;
use crate::events::{percent_of, LogSink, ProgressKind, ProgressSink, TransferEventEmitter};
use crate::iterator::fetch_playlist;
use crate::resolver::{MatchPolicy, TrackResolver};
use crate::{
    DestinationPlaylistRef, ExistingTrackSet, Result, SourcePlaylist, TransferError,
    TransferTally,
};
use std::collections::HashSet;
use std::sync::Arc;

/// Orchestrates playlist transfers from a source catalog to a destination catalog.
///
/// # Examples
///
/// ```rust,no_run
/// use playlist_transfer::services::{SpotifyClient, YouTubeClient};
/// use playlist_transfer::{Result, TransferEngine};
/// use std::sync::Arc;
///
/// # async fn run() -> Result<()> {
/// let spotify = SpotifyClient::new(
///     Box::new(http_client::native::NativeClient::new()),
///     "spotify-access-token".to_string(),
/// );
/// let youtube = YouTubeClient::new(
///     Box::new(http_client::native::NativeClient::new()),
///     "youtube-access-token".to_string(),
/// );
///
/// let engine = TransferEngine::builder()
///     .source(Arc::new(spotify))
///     .destination(Arc::new(youtube))
///     .build()?;
///
/// let tally = engine.transfer(&["37i9dQZF1DXcBWIGoYBM5M".to_string()], 50).await?;
/// println!("{tally}");
/// # Ok(())
/// # }
/// ```
pub struct TransferEngine {
    source: Arc<dyn SourceCatalog>,
    destination: Arc<dyn DestinationCatalog>,
    resolver: TrackResolver,
    sink: Arc<dyn ProgressSink>,
    cancellation: CancellationState,
}

/// Builder for [`TransferEngine`].
///
/// Both catalogs are required; everything else has a default.
#[derive(Default)]
pub struct TransferEngineBuilder {
    source: Option<Arc<dyn SourceCatalog>>,
    destination: Option<Arc<dyn DestinationCatalog>>,
    policy: Option<Box<dyn MatchPolicy>>,
    sink: Option<Arc<dyn ProgressSink>>,
    cancellation: Option<CancellationState>,
}

impl TransferEngineBuilder {
    pub fn source(mut self, source: Arc<dyn SourceCatalog>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn destination(mut self, destination: Arc<dyn DestinationCatalog>) -> Self {
        self.destination = Some(destination);
        self
    }

    /// Replace the default first-result match policy.
    pub fn match_policy(mut self, policy: Box<dyn MatchPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Where progress events go. Defaults to [`LogSink`].
    pub fn progress_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn cancellation(mut self, cancellation: CancellationState) -> Self {
        self.cancellation = Some(cancellation);
        self
    }

    /// Build the engine, failing with [`TransferError::AuthNotReady`] unless
    /// both catalogs were supplied.
    pub fn build(self) -> Result<TransferEngine> {
        let (Some(source), Some(destination)) = (self.source, self.destination) else {
            return Err(TransferError::AuthNotReady);
        };

        Ok(TransferEngine {
            source,
            destination,
            resolver: self
                .policy
                .map(TrackResolver::new)
                .unwrap_or_default(),
            sink: self.sink.unwrap_or_else(|| Arc::new(LogSink)),
            cancellation: self.cancellation.unwrap_or_default(),
        })
    }
}

/// How a single playlist's transfer ended.
struct PlaylistOutcome {
    tally: TransferTally,
    cancelled: bool,
}

impl PlaylistOutcome {
    fn finished(tally: TransferTally) -> Self {
        Self {
            tally,
            cancelled: false,
        }
    }
}

impl TransferEngine {
    pub fn builder() -> TransferEngineBuilder {
        TransferEngineBuilder::default()
    }

    /// Handle that cancels this engine's runs when triggered.
    pub fn cancellation(&self) -> CancellationState {
        self.cancellation.clone()
    }

    /// Transfer the given source playlists, in order.
    ///
    /// Returns the aggregate tally. Playlist creation and batch write failures
    /// are reported as events and do not stop the run; a source failure aborts
    /// it with [`TransferError::SourceUnavailable`]. A playlist id selected more
    /// than once is transferred once, at its first position.
    ///
    /// A cancellation request stops the current run, or the next one if no
    /// run is in progress, and is cleared once that run has stopped.
    pub async fn transfer(
        &self,
        source_playlist_ids: &[String],
        batch_size: usize,
    ) -> Result<TransferTally> {
        let result = self.run(source_playlist_ids, batch_size).await;
        if matches!(result, Err(TransferError::Cancelled { .. })) {
            self.cancellation.reset();
        }
        result
    }

    async fn run(&self, source_playlist_ids: &[String], batch_size: usize) -> Result<TransferTally> {
        let batch_size = validate_batch_size(batch_size)?;
        let selection = self.dedupe_selection(source_playlist_ids);
        let playlist_count = selection.len();
        let mut run_tally = TransferTally::default();

        log::info!(
            "Starting transfer of {} playlists (batch size {}, match policy {})",
            playlist_count,
            batch_size,
            self.resolver.policy_name()
        );

        for (index, playlist_id) in selection.iter().enumerate() {
            if self.cancellation.is_cancelled() {
                return Err(self.cancelled(run_tally));
            }

            self.sink.emit_progress(
                0,
                ProgressKind::PlaylistStarted,
                format!("Processing playlist {} of {}", index + 1, playlist_count),
            );

            let playlist = match fetch_playlist(self.source.as_ref(), playlist_id).await {
                Ok(playlist) => playlist,
                Err(e) => {
                    self.sink
                        .emit_progress(0, ProgressKind::Error, e.to_string());
                    return Err(e);
                }
            };

            let outcome = self.transfer_playlist(&playlist, batch_size).await;
            run_tally += outcome.tally;
            self.sink
                .emit_playlist_finished(&playlist.name, outcome.tally);

            if outcome.cancelled {
                return Err(self.cancelled(run_tally));
            }
        }

        log::info!("Transfer finished: {run_tally}");
        self.sink.emit_completed(run_tally);
        Ok(run_tally)
    }

    fn dedupe_selection<'a>(&self, source_playlist_ids: &'a [String]) -> Vec<&'a String> {
        let mut seen = HashSet::new();
        let mut selection = Vec::with_capacity(source_playlist_ids.len());
        for playlist_id in source_playlist_ids {
            if seen.insert(playlist_id.as_str()) {
                selection.push(playlist_id);
            } else {
                self.sink.emit_progress(
                    0,
                    ProgressKind::Info,
                    format!("Playlist {playlist_id} selected more than once, transferring it once"),
                );
            }
        }
        selection
    }

    fn cancelled(&self, run_tally: TransferTally) -> TransferError {
        log::info!("Transfer cancelled: {run_tally}");
        self.sink.emit_cancelled(run_tally);
        TransferError::Cancelled { tally: run_tally }
    }

    async fn transfer_playlist(
        &self,
        playlist: &SourcePlaylist,
        batch_size: usize,
    ) -> PlaylistOutcome {
        let track_count = playlist.tracks.len();

        let destination = match self.ensure_destination_playlist(playlist).await {
            Ok(destination) => destination,
            Err(e) => {
                log::error!("{e}");
                self.sink
                    .emit_progress(0, ProgressKind::Error, e.to_string());
                return PlaylistOutcome::finished(TransferTally::all_not_found(track_count));
            }
        };

        let mut existing: ExistingTrackSet = if destination.is_newly_created {
            HashSet::new()
        } else {
            match self
                .destination
                .get_playlist_track_ids(&destination.id)
                .await
            {
                Ok(ids) => ids,
                Err(e) => {
                    let message = format!(
                        "Error reading tracks of playlist {}: {e}",
                        destination.name
                    );
                    log::error!("{message}");
                    self.sink.emit_progress(0, ProgressKind::Error, message);
                    return PlaylistOutcome::finished(TransferTally::all_not_found(track_count));
                }
            }
        };
        log::debug!(
            "Playlist {} starts with {} tracks on the destination",
            destination.name,
            existing.len()
        );

        let mut tally = TransferTally::default();
        let mut pending: Vec<String> = Vec::with_capacity(batch_size);

        for (index, track) in playlist.tracks.iter().enumerate() {
            if self.cancellation.is_cancelled() {
                self.flush(&destination.id, &mut pending, &mut tally).await;
                tally.total = index;
                return PlaylistOutcome {
                    tally,
                    cancelled: true,
                };
            }

            let percentage = percent_of(index + 1, track_count);
            match self.resolver.resolve(self.destination.as_ref(), track).await {
                None => {
                    tally.not_found += 1;
                    self.sink.emit_progress(
                        percentage,
                        ProgressKind::TrackNotFound,
                        format!("Not found: {track}"),
                    );
                }
                Some(track_id) => {
                    if existing.insert(track_id.clone()) {
                        pending.push(track_id);
                        tally.added += 1;
                        self.sink.emit_progress(
                            percentage,
                            ProgressKind::TrackAdded,
                            format!("Added: {track}"),
                        );
                    } else {
                        tally.skipped += 1;
                        self.sink.emit_progress(
                            percentage,
                            ProgressKind::TrackSkipped,
                            format!("Skipped: {track} (already in playlist)"),
                        );
                    }
                }
            }

            if pending.len() >= batch_size {
                self.flush(&destination.id, &mut pending, &mut tally).await;
            }
        }

        self.flush(&destination.id, &mut pending, &mut tally).await;
        tally.total = track_count;
        PlaylistOutcome::finished(tally)
    }

    /// Reuse a destination playlist with exactly the source's name, or create one.
    async fn ensure_destination_playlist(
        &self,
        playlist: &SourcePlaylist,
    ) -> Result<DestinationPlaylistRef> {
        let create_failed = |reason: String| TransferError::DestinationCreateFailed {
            name: playlist.name.clone(),
            reason,
        };

        let existing = self
            .destination
            .list_playlists()
            .await
            .map_err(|e| create_failed(format!("listing destination playlists: {e}")))?;

        if let Some(found) = existing.into_iter().find(|p| p.name == playlist.name) {
            self.sink.emit_progress(
                0,
                ProgressKind::PlaylistReused,
                format!("Playlist {} already exists", playlist.name),
            );
            return Ok(DestinationPlaylistRef {
                id: found.id,
                name: found.name,
                is_newly_created: false,
            });
        }

        self.sink.emit_progress(
            0,
            ProgressKind::PlaylistCreating,
            format!("Creating playlist {}", playlist.name),
        );
        let id = self
            .destination
            .create_playlist(&playlist.name, &playlist.description)
            .await
            .map_err(|e| create_failed(e.to_string()))?;
        log::info!("Created destination playlist {} ({id})", playlist.name);

        Ok(DestinationPlaylistRef {
            id,
            name: playlist.name.clone(),
            is_newly_created: true,
        })
    }

    /// Write the pending batch, if any, and clear it.
    ///
    /// A rejected write is reported and counted in `failed_writes`; the tracks
    /// stay counted as added.
    async fn flush(&self, playlist_id: &str, pending: &mut Vec<String>, tally: &mut TransferTally) {
        if pending.is_empty() {
            return;
        }
        let batch = std::mem::take(pending);
        log::debug!("Appending {} tracks to {playlist_id}", batch.len());

        if let Err(e) = self.destination.append_tracks(playlist_id, &batch).await {
            let failure = TransferError::DestinationWriteFailed {
                playlist_id: playlist_id.to_string(),
                count: batch.len(),
                reason: e.to_string(),
            };
            log::error!("{failure}");
            tally.failed_writes += batch.len();
            self.sink
                .emit_progress(0, ProgressKind::Error, failure.to_string());
        }
    }
}
