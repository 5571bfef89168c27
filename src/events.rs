//! # Transfer Events
//!
//! The transfer engine reports progress through the [`ProgressSink`] trait and
//! knows nothing about how events are presented. Events are delivered
//! synchronously, in the order the underlying operations happen.
//!
//! Three sinks ship with the crate: [`LogSink`] forwards to the `log` facade,
//! [`ChannelSink`] marshals events to another task over an ordered channel, and
//! any `Fn(&TransferEvent)` closure can be used directly as a callback.

use crate::TransferTally;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// What a progress event is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressKind {
    /// A new source playlist is being processed
    PlaylistStarted,
    /// A destination playlist with the same name was found and reused
    PlaylistReused,
    /// A destination playlist is being created
    PlaylistCreating,
    /// A track was queued for insertion
    TrackAdded,
    /// A track resolved to an identifier already in the destination playlist
    TrackSkipped,
    /// No destination match was found for a track
    TrackNotFound,
    /// Informational message not tied to a track
    Info,
    /// A recoverable failure (playlist creation, batch write)
    Error,
}

/// A single progress update: a percentage and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// The timestamp when the event was emitted
    pub timestamp: DateTime<Utc>,
    /// Progress through the current playlist, 0-100
    pub percentage: u8,
    pub kind: ProgressKind,
    pub message: String,
}

/// Events emitted by the transfer engine during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferEvent {
    /// Incremental progress
    Progress(ProgressEvent),
    /// One source playlist has been fully processed
    PlaylistFinished {
        /// The timestamp when the playlist finished
        timestamp: DateTime<Utc>,
        /// Source playlist name
        playlist: String,
        /// Counters for this playlist alone
        tally: TransferTally,
    },
    /// The run finished; `tally` is the aggregate over all playlists
    Completed {
        /// The timestamp when the run finished
        timestamp: DateTime<Utc>,
        tally: TransferTally,
    },
    /// The run stopped early because cancellation was requested
    Cancelled {
        /// The timestamp when cancellation was observed
        timestamp: DateTime<Utc>,
        /// Aggregate of everything processed before stopping
        tally: TransferTally,
    },
}

impl TransferEvent {
    /// Percentage carried by this event, for progress bars.
    pub fn percentage(&self) -> u8 {
        match self {
            TransferEvent::Progress(progress) => progress.percentage,
            TransferEvent::PlaylistFinished { .. } | TransferEvent::Completed { .. } => 100,
            TransferEvent::Cancelled { .. } => 0,
        }
    }

    /// Human-readable line describing this event.
    pub fn message(&self) -> String {
        match self {
            TransferEvent::Progress(progress) => progress.message.clone(),
            TransferEvent::PlaylistFinished { playlist, tally, .. } => {
                format!("Finished playlist {playlist} ({tally})")
            }
            TransferEvent::Completed { tally, .. } => format!("Transfer complete! ({tally})"),
            TransferEvent::Cancelled { tally, .. } => format!("Transfer cancelled ({tally})"),
        }
    }
}

/// A passive consumer of transfer events.
///
/// Implementations must return quickly; the engine waits for `on_event` before
/// moving on.
pub trait ProgressSink: Send + Sync {
    fn on_event(&self, event: &TransferEvent);
}

impl<F> ProgressSink for F
where
    F: Fn(&TransferEvent) + Send + Sync,
{
    fn on_event(&self, event: &TransferEvent) {
        self(event)
    }
}

/// Forwards events to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn on_event(&self, event: &TransferEvent) {
        match event {
            TransferEvent::Progress(ProgressEvent {
                kind: ProgressKind::Error,
                message,
                ..
            }) => log::error!("{message}"),
            TransferEvent::Progress(ProgressEvent {
                kind: ProgressKind::TrackNotFound,
                message,
                ..
            }) => log::warn!("{message}"),
            TransferEvent::Progress(ProgressEvent {
                percentage,
                message,
                ..
            }) => log::info!("[{percentage:>3}%] {message}"),
            other => log::info!("{}", other.message()),
        }
    }
}

/// A handle for receiving transfer events on another task.
pub type TransferEventReceiver = mpsc::UnboundedReceiver<TransferEvent>;

/// Sends events over an unbounded channel so they can cross task boundaries
/// without loss or reordering.
///
/// # Examples
///
/// ```rust
/// use playlist_transfer::events::{create_transfer_channel, ProgressSink, TransferEvent};
/// use playlist_transfer::TransferTally;
///
/// # tokio_test::block_on(async {
/// let (sink, mut events) = create_transfer_channel();
/// sink.on_event(&TransferEvent::Completed {
///     timestamp: chrono::Utc::now(),
///     tally: TransferTally::default(),
/// });
/// drop(sink);
///
/// while let Some(event) = events.recv().await {
///     println!("{}", event.message());
/// }
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<TransferEvent>,
}

impl ProgressSink for ChannelSink {
    fn on_event(&self, event: &TransferEvent) {
        // Ignore send errors (receiver dropped)
        let _ = self.tx.send(event.clone());
    }
}

/// Creates a [`ChannelSink`] and the receiver that drains it.
pub fn create_transfer_channel() -> (ChannelSink, TransferEventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelSink { tx }, rx)
}

/// Helper trait for emitting transfer events.
///
/// This trait provides convenient methods for building and emitting the
/// different event types through any [`ProgressSink`].
pub trait TransferEventEmitter {
    /// Emit a progress event.
    fn emit_progress(&self, percentage: u8, kind: ProgressKind, message: String);

    /// Emit a playlist finished event.
    fn emit_playlist_finished(&self, playlist: &str, tally: TransferTally);

    /// Emit a run completed event.
    fn emit_completed(&self, tally: TransferTally);

    /// Emit a run cancelled event.
    fn emit_cancelled(&self, tally: TransferTally);
}

impl<T: ProgressSink + ?Sized> TransferEventEmitter for T {
    fn emit_progress(&self, percentage: u8, kind: ProgressKind, message: String) {
        self.on_event(&TransferEvent::Progress(ProgressEvent {
            timestamp: Utc::now(),
            percentage: percentage.min(100),
            kind,
            message,
        }));
    }

    fn emit_playlist_finished(&self, playlist: &str, tally: TransferTally) {
        self.on_event(&TransferEvent::PlaylistFinished {
            timestamp: Utc::now(),
            playlist: playlist.to_string(),
            tally,
        });
    }

    fn emit_completed(&self, tally: TransferTally) {
        self.on_event(&TransferEvent::Completed {
            timestamp: Utc::now(),
            tally,
        });
    }

    fn emit_cancelled(&self, tally: TransferTally) {
        self.on_event(&TransferEvent::Cancelled {
            timestamp: Utc::now(),
            tally,
        });
    }
}

/// Percentage of `processed` out of `total`, rounded down.
pub fn percent_of(processed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((processed.min(total) * 100) / total) as u8
}
