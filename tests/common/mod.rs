#![allow(dead_code)]
use async_trait::async_trait;
use playlist_transfer::{
    CancellationState, DestinationCatalog, PlaylistSummary, ProgressKind, ProgressSink, Result,
    SongMatch, SourceCatalog, SourcePlaylistInfo, SourceTrack, TrackPage, TransferEngine,
    TransferError, TransferEvent,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub fn track(title: &str, artist: &str) -> SourceTrack {
    SourceTrack::new(title, artist, format!("sp-{title}"))
}

/// In-memory source catalog. Each playlist is served as a list of pages whose
/// continuation tokens are `page-<n>`.
#[derive(Default)]
pub struct FakeSource {
    playlists: HashMap<String, (SourcePlaylistInfo, Vec<Vec<SourceTrack>>)>,
    /// Fail the tracks request for this page index (0-based)
    pub fail_page: Option<usize>,
    pub page_requests: Mutex<Vec<(String, Option<String>)>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a playlist served as a single page.
    pub fn with_playlist(self, id: &str, name: &str, tracks: Vec<SourceTrack>) -> Self {
        self.with_paged_playlist(id, name, vec![tracks])
    }

    pub fn with_paged_playlist(mut self, id: &str, name: &str, pages: Vec<Vec<SourceTrack>>) -> Self {
        let info = SourcePlaylistInfo {
            id: id.to_string(),
            name: name.to_string(),
            description: format!("{name} description"),
        };
        self.playlists.insert(id.to_string(), (info, pages));
        self
    }

    pub fn failing_on_page(mut self, page: usize) -> Self {
        self.fail_page = Some(page);
        self
    }

    pub fn page_request_count(&self) -> usize {
        self.page_requests.lock().unwrap().len()
    }
}

#[async_trait]
impl SourceCatalog for FakeSource {
    async fn list_playlists(&self) -> Result<Vec<PlaylistSummary>> {
        let mut summaries: Vec<PlaylistSummary> = self
            .playlists
            .values()
            .map(|(info, pages)| PlaylistSummary {
                id: info.id.clone(),
                name: info.name.clone(),
                track_count: Some(pages.iter().map(Vec::len).sum::<usize>() as u32),
            })
            .collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }

    async fn get_playlist(&self, playlist_id: &str) -> Result<SourcePlaylistInfo> {
        self.playlists
            .get(playlist_id)
            .map(|(info, _)| info.clone())
            .ok_or_else(|| TransferError::Http(format!("HTTP 404: no playlist {playlist_id}")))
    }

    async fn get_tracks_page(&self, playlist_id: &str, next: Option<String>) -> Result<TrackPage> {
        self.page_requests
            .lock()
            .unwrap()
            .push((playlist_id.to_string(), next.clone()));

        let index = match next.as_deref() {
            None => 0,
            Some(token) => token
                .strip_prefix("page-")
                .and_then(|n| n.parse().ok())
                .ok_or_else(|| TransferError::Parse(format!("bad token {token}")))?,
        };
        if self.fail_page == Some(index) {
            return Err(TransferError::Http("HTTP 503: try later".to_string()));
        }

        let (_, pages) = self
            .playlists
            .get(playlist_id)
            .ok_or_else(|| TransferError::Http(format!("HTTP 404: no playlist {playlist_id}")))?;
        let tracks = pages.get(index).cloned().unwrap_or_default();
        let next = (index + 1 < pages.len()).then(|| format!("page-{}", index + 1));
        Ok(TrackPage { tracks, next })
    }
}

struct FakePlaylist {
    id: String,
    name: String,
    track_ids: Vec<String>,
}

/// In-memory destination catalog that records every write.
#[derive(Default)]
pub struct FakeDestination {
    songs: HashMap<String, Vec<SongMatch>>,
    playlists: Mutex<Vec<FakePlaylist>>,
    pub appends: Mutex<Vec<(String, Vec<String>)>>,
    pub creates: Mutex<Vec<String>>,
    pub track_id_fetches: Mutex<usize>,
    pub searches: Mutex<Vec<String>>,
    pub fail_create: bool,
    pub fail_append: bool,
    pub fail_search: bool,
    /// Cancel this state once the given number of searches has happened
    pub cancel_after_searches: Option<(usize, CancellationState)>,
}

impl FakeDestination {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a search hit for the query built from `title` and `artist`.
    pub fn with_song(mut self, title: &str, artist: &str, video_id: &str) -> Self {
        self.songs
            .entry(format!("{title} {artist}"))
            .or_default()
            .push(SongMatch {
                track_id: video_id.to_string(),
                title: title.to_string(),
                artist: artist.to_string(),
            });
        self
    }

    pub fn with_playlist(self, id: &str, name: &str, track_ids: &[&str]) -> Self {
        self.playlists.lock().unwrap().push(FakePlaylist {
            id: id.to_string(),
            name: name.to_string(),
            track_ids: track_ids.iter().map(|t| t.to_string()).collect(),
        });
        self
    }

    pub fn failing_creates(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn failing_appends(mut self) -> Self {
        self.fail_append = true;
        self
    }

    pub fn failing_searches(mut self) -> Self {
        self.fail_search = true;
        self
    }

    pub fn cancelling_after(mut self, searches: usize, cancellation: CancellationState) -> Self {
        self.cancel_after_searches = Some((searches, cancellation));
        self
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.appends
            .lock()
            .unwrap()
            .iter()
            .map(|(_, ids)| ids.len())
            .collect()
    }

    pub fn appended_ids(&self) -> Vec<String> {
        self.appends
            .lock()
            .unwrap()
            .iter()
            .flat_map(|(_, ids)| ids.clone())
            .collect()
    }

    pub fn playlist_tracks(&self, name: &str) -> Option<Vec<String>> {
        self.playlists
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.track_ids.clone())
    }

    pub fn create_count(&self) -> usize {
        self.creates.lock().unwrap().len()
    }

    pub fn track_id_fetch_count(&self) -> usize {
        *self.track_id_fetches.lock().unwrap()
    }
}

#[async_trait]
impl DestinationCatalog for FakeDestination {
    async fn list_playlists(&self) -> Result<Vec<PlaylistSummary>> {
        Ok(self
            .playlists
            .lock()
            .unwrap()
            .iter()
            .map(|p| PlaylistSummary {
                id: p.id.clone(),
                name: p.name.clone(),
                track_count: Some(p.track_ids.len() as u32),
            })
            .collect())
    }

    async fn create_playlist(&self, name: &str, _description: &str) -> Result<String> {
        if self.fail_create {
            return Err(TransferError::Write("HTTP 403: quota exceeded".to_string()));
        }
        self.creates.lock().unwrap().push(name.to_string());
        let mut playlists = self.playlists.lock().unwrap();
        let id = format!("PL{}", playlists.len() + 1);
        playlists.push(FakePlaylist {
            id: id.clone(),
            name: name.to_string(),
            track_ids: Vec::new(),
        });
        Ok(id)
    }

    async fn get_playlist_track_ids(&self, playlist_id: &str) -> Result<HashSet<String>> {
        *self.track_id_fetches.lock().unwrap() += 1;
        self.playlists
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == playlist_id)
            .map(|p| p.track_ids.iter().cloned().collect())
            .ok_or_else(|| TransferError::Http(format!("HTTP 404: no playlist {playlist_id}")))
    }

    async fn append_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()> {
        self.appends
            .lock()
            .unwrap()
            .push((playlist_id.to_string(), track_ids.to_vec()));
        if self.fail_append {
            return Err(TransferError::Write("HTTP 409: playlist locked".to_string()));
        }
        if let Some(playlist) = self
            .playlists
            .lock()
            .unwrap()
            .iter_mut()
            .find(|p| p.id == playlist_id)
        {
            playlist.track_ids.extend(track_ids.iter().cloned());
        }
        Ok(())
    }

    async fn search_songs(&self, query: &str, limit: usize) -> Result<Vec<SongMatch>> {
        let count = {
            let mut searches = self.searches.lock().unwrap();
            searches.push(query.to_string());
            searches.len()
        };
        if let Some((after, cancellation)) = &self.cancel_after_searches {
            if count >= *after {
                cancellation.cancel();
            }
        }
        if self.fail_search {
            return Err(TransferError::Http("HTTP 500: search backend".to_string()));
        }
        Ok(self
            .songs
            .get(query)
            .map(|hits| hits.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}

/// Keeps every event it receives.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<TransferEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<TransferEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events().iter().map(TransferEvent::message).collect()
    }

    pub fn progress_of_kind(&self, kind: ProgressKind) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                TransferEvent::Progress(progress) if progress.kind == kind => {
                    Some(progress.message)
                }
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for RecordingSink {
    fn on_event(&self, event: &TransferEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

pub fn build_engine(
    source: &Arc<FakeSource>,
    destination: &Arc<FakeDestination>,
    sink: &Arc<RecordingSink>,
) -> TransferEngine {
    TransferEngine::builder()
        .source(source.clone())
        .destination(destination.clone())
        .progress_sink(sink.clone())
        .build()
        .unwrap()
}

pub fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
