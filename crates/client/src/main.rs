//! Merge-kingdom client binary.
//!
//! # Environment
//!
//! See [`merge_client::ClientConfig::from_env`]. A `.env` file in the working
//! directory is honored.
//!
//! ```bash
//! GAME_SESSION_ID=alice AUTOPLAY_SECONDS=60 cargo run -p merge-client
//! ```

use anyhow::Result;
use merge_client::{Autoplay, ClientConfig, build_runtime, session_context, setup_logging};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    let session = session_context(&config);
    let _guard = setup_logging(&session.session_id, config.log_dir.as_deref())?;

    tracing::info!("Starting merge-kingdom");
    tracing::info!("Session ID: {}", session.session_id);

    let runtime = build_runtime(&config, session).await?;
    if runtime.resumed() {
        tracing::info!("Resumed saved progress");
    }

    let handle = runtime.handle();
    let logger = merge_client::spawn_event_logger(&handle);

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let report = Autoplay::new(handle.clone(), rng, config.autoplay_step)
        .run(config.autoplay)
        .await?;

    let view = handle.query_state().await?;
    tracing::info!(
        level = view.state.player.level,
        gold = view.state.player.gold,
        gems = view.state.player.gems,
        restored = view.state.parcels.iter().filter(|parcel| parcel.unlocked).count(),
        moves = report.moves,
        "Session summary"
    );

    drop(handle);
    runtime.shutdown().await?;
    let _ = logger.await;

    tracing::info!("Client shutdown complete");
    Ok(())
}
