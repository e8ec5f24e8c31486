use std::time::Duration;

use merge_client::{Autoplay, ClientConfig, build_runtime, session_context};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn config(save_dir: &std::path::Path) -> ClientConfig {
    ClientConfig {
        session_id: Some("tester".into()),
        save_data_dir: Some(save_dir.to_path_buf()),
        seed: Some(42),
        ..ClientConfig::default()
    }
}

#[tokio::test(start_paused = true)]
async fn autoplay_session_saves_and_resumes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config(dir.path());

    let runtime = build_runtime(&config, session_context(&config))
        .await
        .expect("runtime");
    assert!(!runtime.resumed());

    let report = Autoplay::new(runtime.handle(), StdRng::seed_from_u64(1), config.autoplay_step)
        .run(Duration::from_secs(20))
        .await
        .expect("autoplay");
    assert!(report.moves > 0);
    assert!(report.applied > 0);

    let played = runtime.handle().query_state().await.expect("query");
    assert!(played.state.player.xp > 0 || played.state.player.level > 1);
    runtime.shutdown().await.expect("shutdown");

    assert!(dir.path().join("save_tester.json").exists());

    let resumed = build_runtime(&config, session_context(&config))
        .await
        .expect("runtime");
    assert!(resumed.resumed());
    let view = resumed.handle().query_state().await.expect("query");
    assert_eq!(view.state.player, played.state.player);
    resumed.shutdown().await.expect("shutdown");
}

#[tokio::test(start_paused = true)]
async fn unreadable_game_config_fails_fast() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = ClientConfig {
        game_config_path: Some(dir.path().join("missing.toml")),
        ..config(dir.path())
    };

    assert!(build_runtime(&config, session_context(&config)).await.is_err());
}
