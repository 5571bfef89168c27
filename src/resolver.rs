//! Track resolution: map a source track onto a destination track identifier.
//!
//! The resolver issues one song-scoped search per track and lets a
//! [`MatchPolicy`] pick among the hits. The default policy trusts the first hit,
//! with no duration or album disambiguation; stricter policies plug in without
//! touching the engine.

use crate::catalog::DestinationCatalog;
use crate::{SongMatch, SourceTrack};

/// Number of search hits requested per track.
pub const SEARCH_LIMIT: usize = 5;

/// Strategy for choosing a destination track among search hits.
pub trait MatchPolicy: Send + Sync {
    /// Pick the destination identifier for `track`, or `None` for no match.
    ///
    /// `candidates` are in the order the destination service ranked them.
    fn select(&self, track: &SourceTrack, candidates: &[SongMatch]) -> Option<String>;

    /// Get a human-readable name for this policy
    fn policy_name(&self) -> &str;
}

/// Trust the destination's ranking and take the first hit.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstResultPolicy;

impl MatchPolicy for FirstResultPolicy {
    fn select(&self, _track: &SourceTrack, candidates: &[SongMatch]) -> Option<String> {
        candidates.first().map(|hit| hit.track_id.clone())
    }

    fn policy_name(&self) -> &str {
        "first-result"
    }
}

/// Take the first hit whose credited artist mentions the source's primary artist.
///
/// Comparison is case-insensitive and ignores runs of whitespace. A source
/// track with no artist falls back to the first hit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtistMatchPolicy;

impl ArtistMatchPolicy {
    fn normalize(value: &str) -> String {
        value
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

impl MatchPolicy for ArtistMatchPolicy {
    fn select(&self, track: &SourceTrack, candidates: &[SongMatch]) -> Option<String> {
        let wanted = Self::normalize(&track.primary_artist);
        if wanted.is_empty() {
            return FirstResultPolicy.select(track, candidates);
        }
        candidates
            .iter()
            .find(|hit| Self::normalize(&hit.artist).contains(&wanted))
            .map(|hit| hit.track_id.clone())
    }

    fn policy_name(&self) -> &str {
        "artist-match"
    }
}

/// Resolves source tracks against a destination catalog.
pub struct TrackResolver {
    policy: Box<dyn MatchPolicy>,
}

impl Default for TrackResolver {
    fn default() -> Self {
        Self::new(Box::new(FirstResultPolicy))
    }
}

impl TrackResolver {
    pub fn new(policy: Box<dyn MatchPolicy>) -> Self {
        Self { policy }
    }

    pub fn policy_name(&self) -> &str {
        self.policy.policy_name()
    }

    /// Resolve one track to a destination identifier.
    ///
    /// Returns `None` when the search yields nothing acceptable. A failed
    /// search is logged and also reported as `None`; a missing match is an
    /// expected outcome, not an error.
    pub async fn resolve<D: DestinationCatalog + ?Sized>(
        &self,
        destination: &D,
        track: &SourceTrack,
    ) -> Option<String> {
        let query = track.search_query();
        let candidates = match destination.search_songs(&query, SEARCH_LIMIT).await {
            Ok(candidates) => candidates,
            Err(e) => {
                log::warn!("Search for '{query}' failed: {e}");
                return None;
            }
        };

        let selected = self.policy.select(track, &candidates);
        log::debug!(
            "Resolved '{}' with {} candidates via {}: {:?}",
            query,
            candidates.len(),
            self.policy.policy_name(),
            selected
        );
        selected
    }
}
