pub mod cancel;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod iterator;
pub mod resolver;
pub mod services;
pub mod types;

pub use cancel::CancellationState;
pub use catalog::{DestinationCatalog, SourceCatalog};
pub use config::TransferConfig;
pub use engine::{TransferEngine, TransferEngineBuilder};
pub use error::TransferError;
pub use events::{
    create_transfer_channel, ChannelSink, LogSink, ProgressEvent, ProgressKind, ProgressSink,
    TransferEvent, TransferEventEmitter, TransferEventReceiver,
};
pub use iterator::{list_all_tracks, AsyncPaginatedIterator, PlaylistTracksIterator};
pub use resolver::{ArtistMatchPolicy, FirstResultPolicy, MatchPolicy, TrackResolver};
pub use types::{
    DestinationPlaylistRef, ExistingTrackSet, PlaylistSummary, SongMatch, SourcePlaylist,
    SourcePlaylistInfo, SourceTrack, TrackPage, TransferTally,
};

// Re-export mock types for testing
#[cfg(feature = "mock")]
pub use catalog::{MockDestinationCatalog, MockSourceCatalog};

pub type Result<T> = std::result::Result<T, TransferError>;
