//! Data types shared by the catalog clients and the transfer engine.
//!
//! Source-side types describe what is read from the source service, destination
//! types describe what the engine discovers or creates on the destination
//! service, and [`TransferTally`] is the run accounting.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::AddAssign;

// ================================================================================================
// SOURCE CATALOG
// ================================================================================================

/// A track as read from the source service.
///
/// Only the metadata needed to search the destination is kept: the title and
/// the first credited artist.
///
/// # Examples
///
/// ```rust
/// use playlist_transfer::SourceTrack;
///
/// let track = SourceTrack::new("Paranoid Android", "Radiohead", "6LgJvl0Xdtc73RJ1mmpotq");
/// assert_eq!(track.search_query(), "Paranoid Android Radiohead");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceTrack {
    /// The track title
    pub title: String,
    /// The first credited artist (empty when the source lists none)
    pub primary_artist: String,
    /// Source-service identifier, opaque to the engine
    pub source_id: String,
}

impl SourceTrack {
    pub fn new(
        title: impl Into<String>,
        primary_artist: impl Into<String>,
        source_id: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            primary_artist: primary_artist.into(),
            source_id: source_id.into(),
        }
    }

    /// Free-text query used to look the track up on the destination service.
    pub fn search_query(&self) -> String {
        format!("{} {}", self.title, self.primary_artist)
    }
}

impl std::fmt::Display for SourceTrack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} by {}", self.title, self.primary_artist)
    }
}

/// Playlist metadata from the source service, without its tracks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePlaylistInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// A fully fetched source playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePlaylist {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Tracks in playlist order
    pub tracks: Vec<SourceTrack>,
}

impl SourcePlaylist {
    pub fn from_info(info: SourcePlaylistInfo, tracks: Vec<SourceTrack>) -> Self {
        Self {
            id: info.id,
            name: info.name,
            description: info.description,
            tracks,
        }
    }
}

/// One page of a source playlist's tracks.
///
/// `next` is the continuation token for the following page; `None` marks the
/// last page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrackPage {
    pub tracks: Vec<SourceTrack>,
    pub next: Option<String>,
}

impl TrackPage {
    pub fn has_next_page(&self) -> bool {
        self.next.is_some()
    }
}

/// A row in a playlist listing, on either service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    /// Number of tracks, when the service reports it in listings
    pub track_count: Option<u32>,
}

// ================================================================================================
// DESTINATION CATALOG
// ================================================================================================

/// One hit from a song-scoped search on the destination service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongMatch {
    /// Destination track identifier
    pub track_id: String,
    pub title: String,
    /// Artist or channel credited for the hit
    pub artist: String,
}

/// The destination playlist a source playlist is being copied into.
///
/// `is_newly_created` tells the engine it can skip fetching existing tracks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationPlaylistRef {
    pub id: String,
    pub name: String,
    pub is_newly_created: bool,
}

/// Destination identifiers already present in (or queued for) a destination playlist.
pub type ExistingTrackSet = HashSet<String>;

// ================================================================================================
// TALLY
// ================================================================================================

/// Counters for a playlist transfer or a whole run.
///
/// `added + skipped + not_found == total` always holds. `failed_writes` counts
/// the part of `added` whose batch write was rejected by the destination; those
/// tracks were attempted but are not confirmed.
///
/// # Examples
///
/// ```rust
/// use playlist_transfer::TransferTally;
///
/// let mut run = TransferTally::default();
/// run += TransferTally { total: 3, added: 2, skipped: 1, not_found: 0, failed_writes: 0 };
/// run += TransferTally { total: 2, added: 0, skipped: 0, not_found: 2, failed_writes: 0 };
/// assert_eq!(run.total, 5);
/// assert!(run.is_consistent());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransferTally {
    pub total: usize,
    pub added: usize,
    pub skipped: usize,
    pub not_found: usize,
    pub failed_writes: usize,
}

impl TransferTally {
    /// Tally for a playlist whose tracks could not be transferred at all.
    pub fn all_not_found(count: usize) -> Self {
        Self {
            total: count,
            not_found: count,
            ..Self::default()
        }
    }

    /// Number of tracks accounted for by the outcome counters.
    pub fn processed(&self) -> usize {
        self.added + self.skipped + self.not_found
    }

    pub fn is_consistent(&self) -> bool {
        self.processed() == self.total
    }
}

impl AddAssign for TransferTally {
    fn add_assign(&mut self, other: Self) {
        self.total += other.total;
        self.added += other.added;
        self.skipped += other.skipped;
        self.not_found += other.not_found;
        self.failed_writes += other.failed_writes;
    }
}

impl std::fmt::Display for TransferTally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "total: {}, added: {}, skipped: {}, not found: {}",
            self.total, self.added, self.skipped, self.not_found
        )?;
        if self.failed_writes > 0 {
            write!(f, " ({} unconfirmed)", self.failed_writes)?;
        }
        Ok(())
    }
}
