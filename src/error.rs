use crate::types::TransferTally;
use thiserror::Error;

/// Error types for playlist transfer operations.
///
/// Most failures inside a transfer run are recoverable and never surface here:
/// a playlist that cannot be created, or a batch that cannot be written, is
/// reported as a progress event and the run carries on. The variants below are
/// what callers see when an operation as a whole cannot proceed.
///
/// # Error Handling Examples
///
/// ```rust,no_run
/// use playlist_transfer::{TransferEngine, TransferError};
///
/// # async fn run(engine: TransferEngine) {
/// match engine.transfer(&["37i9dQZF1DXcBWIGoYBM5M".to_string()], 50).await {
///     Ok(tally) => println!("Added {} tracks", tally.added),
///     Err(TransferError::SourceUnavailable(msg)) => eprintln!("Spotify failed: {}", msg),
///     Err(TransferError::Cancelled { tally }) => {
///         eprintln!("Stopped early after {} tracks", tally.total);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # }
/// ```
#[derive(Error, Debug)]
pub enum TransferError {
    /// A transfer was attempted without both service clients configured.
    ///
    /// This is raised before the engine starts; no requests have been made.
    #[error("Both source and destination clients must be configured before transferring")]
    AuthNotReady,

    /// Listing or fetching from the source service failed.
    ///
    /// This aborts the whole run.
    #[error("Source service unavailable: {0}")]
    SourceUnavailable(String),

    /// The destination playlist could not be created.
    #[error("Failed to create destination playlist '{name}': {reason}")]
    DestinationCreateFailed {
        /// Name of the playlist that was being created
        name: String,
        /// Description of the underlying failure
        reason: String,
    },

    /// A batch of tracks could not be appended to the destination playlist.
    #[error("Failed to add {count} tracks to playlist {playlist_id}: {reason}")]
    DestinationWriteFailed {
        /// Destination playlist identifier
        playlist_id: String,
        /// Number of identifiers in the failed batch
        count: usize,
        /// Description of the underlying failure
        reason: String,
    },

    /// HTTP/network related errors.
    ///
    /// This includes connection failures, timeouts and unexpected status codes.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The service rejected the access token.
    ///
    /// Tokens are minted outside this crate; an expired or under-scoped token
    /// ends up here.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Rate limiting from a service.
    ///
    /// The `retry_after` field is taken from the `Retry-After` header when the
    /// service provides one.
    #[error("Rate limited, retry after {retry_after} seconds")]
    RateLimit {
        /// Number of seconds to wait before retrying
        retry_after: u64,
    },

    /// Failed to parse a service response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The destination service rejected a write.
    #[error("Write rejected: {0}")]
    Write(String),

    /// Batch size outside the accepted range.
    #[error("Invalid batch size {0}: must be between 1 and 100")]
    InvalidBatchSize(usize),

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The run was cancelled cooperatively.
    ///
    /// `tally` holds everything processed before cancellation was observed.
    #[error("Transfer cancelled after {} tracks", .tally.total)]
    Cancelled {
        /// Partial aggregate tally at the point of cancellation
        tally: TransferTally,
    },
}
