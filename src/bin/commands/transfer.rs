use super::utils::{build_clients, print_json};
use super::MatchStrategy;
use playlist_transfer::{
    create_transfer_channel, ArtistMatchPolicy, FirstResultPolicy, MatchPolicy, ProgressKind,
    SourceCatalog, TransferConfig, TransferEngine, TransferError, TransferEvent,
};
use std::sync::Arc;

/// Handle the transfer command
///
/// The engine runs on its own task and reports over a channel; this task
/// renders the events and turns Ctrl-C into a cooperative cancel.
pub async fn handle_transfer(
    config: &TransferConfig,
    playlist_ids: Vec<String>,
    all: bool,
    batch_size: usize,
    strategy: MatchStrategy,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (spotify, youtube) = build_clients(config)?;

    let playlist_ids = if all {
        let playlists = spotify.list_playlists().await?;
        log::info!("Selected all {} Spotify playlists", playlists.len());
        playlists.into_iter().map(|p| p.id).collect()
    } else {
        playlist_ids
    };

    let policy: Box<dyn MatchPolicy> = match strategy {
        MatchStrategy::First => Box::new(FirstResultPolicy),
        MatchStrategy::Artist => Box::new(ArtistMatchPolicy),
    };

    let (sink, mut events) = create_transfer_channel();
    let engine = TransferEngine::builder()
        .source(Arc::new(spotify))
        .destination(Arc::new(youtube))
        .match_policy(policy)
        .progress_sink(Arc::new(sink))
        .build()?;

    let cancellation = engine.cancellation();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\n⏹️  Stopping after the current track...");
            cancellation.cancel();
        }
    });

    let run = tokio::spawn(async move { engine.transfer(&playlist_ids, batch_size).await });

    // The channel closes when the engine (and with it the sink) is dropped.
    while let Some(event) = events.recv().await {
        if json {
            print_json(&event);
        } else {
            render_event(&event);
        }
    }

    match run.await? {
        Ok(_) => Ok(()),
        Err(TransferError::Cancelled { tally }) => {
            log::info!("Partial result after cancellation: {tally}");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn render_event(event: &TransferEvent) {
    match event {
        TransferEvent::Progress(progress) => {
            let icon = match progress.kind {
                ProgressKind::PlaylistStarted => "📋",
                ProgressKind::PlaylistReused => "♻️ ",
                ProgressKind::PlaylistCreating => "🆕",
                ProgressKind::TrackAdded => "✅",
                ProgressKind::TrackSkipped => "⏭️ ",
                ProgressKind::TrackNotFound => "❓",
                ProgressKind::Info => "ℹ️ ",
                ProgressKind::Error => "❌",
            };
            match progress.kind {
                ProgressKind::TrackAdded
                | ProgressKind::TrackSkipped
                | ProgressKind::TrackNotFound => {
                    println!("  [{:>3}%] {icon} {}", progress.percentage, progress.message)
                }
                _ => println!("{icon} {}", progress.message),
            }
        }
        TransferEvent::PlaylistFinished { .. } => println!("🏁 {}\n", event.message()),
        TransferEvent::Completed { tally, .. } => {
            println!("🎉 {}", event.message());
            if tally.failed_writes > 0 {
                println!(
                    "⚠️  {} added tracks could not be confirmed; rerun the transfer to retry them",
                    tally.failed_writes
                );
            }
        }
        TransferEvent::Cancelled { .. } => println!("⏹️  {}", event.message()),
    }
}
