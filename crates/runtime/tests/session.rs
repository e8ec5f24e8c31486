use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use merge_core::{
    ActionResult, Board, Cell, CombineOutcome, Difficulty, GameConfig, GameState, Gem, ItemKind,
    ItemRequirement, Match3Phase, Mission, Parcel, ShopOffer, SlotIndex, TapOutcome,
};
use merge_runtime::{
    EconomyEvent, Event, InMemorySnapshotRepo, LoreProvider, MissionProvider, ProgressEvent,
    Runtime, RuntimeConfig, RuntimeHandle, SessionContext, SessionEvent, Snapshot,
    SnapshotRepository, Topic,
};
use tokio::sync::broadcast;

const PLAYER: &str = "alice";

fn config() -> RuntimeConfig {
    RuntimeConfig {
        start_at_night: Some(false),
        ..RuntimeConfig::default()
    }
}

async fn start(repo: Arc<InMemorySnapshotRepo>) -> Runtime {
    Runtime::builder()
        .config(config())
        .session(SessionContext::new(PLAYER))
        .repository(repo)
        .seed(7)
        .build()
        .await
        .expect("runtime should start")
}

fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

async fn merge_pair(handle: &RuntimeHandle, kind: ItemKind, level: u8) -> SlotIndex {
    let from = spawned_slot(handle, kind, level).await;
    let to = spawned_slot(handle, kind, level).await;
    let reply = handle.combine(from, to).await.expect("combine");
    match reply.outcome().map(|outcome| &outcome.result) {
        Some(ActionResult::Combined(CombineOutcome::Merged { slot, .. })) => *slot,
        other => panic!("expected a merge, got {other:?}"),
    }
}

async fn spawned_slot(handle: &RuntimeHandle, kind: ItemKind, level: u8) -> SlotIndex {
    let reply = handle.spawn(kind, level).await.expect("spawn");
    match reply.outcome().map(|outcome| &outcome.result) {
        Some(ActionResult::Spawned { slot, .. }) => *slot,
        other => panic!("expected a spawn, got {other:?}"),
    }
}

fn earning_snapshot(income: u64) -> Snapshot {
    let parcel = Parcel {
        id: "p1".into(),
        name: "Royal Gardens".into(),
        description: String::new(),
        unlocked: true,
        cost_gold: 100,
        requirements: vec![ItemRequirement::single(ItemKind::Wood, 3)],
        income_per_cycle: income,
    };
    let state = GameState::new(1, &GameConfig::default(), vec![parcel], Vec::new());
    Snapshot::capture(&state)
}

/// Lore that arrives a second after it was asked for.
struct SlowLore;

#[async_trait]
impl LoreProvider for SlowLore {
    async fn generate_lore(&self, _kind: ItemKind, _level: u8) -> String {
        tokio::time::sleep(Duration::from_secs(1)).await;
        "Carved from the first oak of the realm.".to_owned()
    }
}

/// A single quick mission: one matching swap reaches the target.
struct SprintMissions;

#[async_trait]
impl MissionProvider for SprintMissions {
    async fn generate_missions(&self, _player_level: u32) -> Vec<Mission> {
        vec![Mission {
            id: "sprint".into(),
            name: "Sprint".into(),
            description: None,
            energy_cost: 2,
            target_score: 100,
            moves: 5,
            reward: ItemKind::Potion,
            difficulty: Difficulty::Easy,
            color: "potion".into(),
        }]
    }
}

async fn start_sprint() -> Runtime {
    Runtime::builder()
        .config(config())
        .session(SessionContext::new(PLAYER))
        .repository(Arc::new(InMemorySnapshotRepo::new()))
        .mission_provider(Arc::new(SprintMissions))
        .seed(7)
        .build()
        .await
        .expect("runtime should start")
}

/// First adjacent pair whose exchange leaves at least one run on the board.
fn matching_swap(rows: &[Vec<Gem>]) -> (Cell, Cell) {
    for row in 0..rows.len() {
        for col in 0..rows[row].len() {
            let here = Cell::new(row, col);
            for there in [Cell::new(row, col + 1), Cell::new(row + 1, col)] {
                if there.row >= rows.len() || there.col >= rows[row].len() {
                    continue;
                }
                let mut swapped = rows.to_vec();
                let gem = swapped[here.row][here.col];
                swapped[here.row][here.col] = swapped[there.row][there.col];
                swapped[there.row][there.col] = gem;
                let board = Board::from_rows(swapped).expect("rectangular board");
                if !board.find_matches().is_empty() {
                    return (here, there);
                }
            }
        }
    }
    panic!("board has no matching swap");
}

async fn start_swap(handle: &RuntimeHandle) {
    let started = handle.start_mission("sprint").await.expect("start");
    assert!(started.is_applied());

    let view = handle.query_state().await.expect("query");
    let (from, to) = matching_swap(&view.match3.expect("board open").board);
    assert_eq!(handle.tap(from).await.expect("tap"), TapOutcome::Selected(from));
    assert_eq!(
        handle.tap(to).await.expect("tap"),
        TapOutcome::SwapStarted { from, to }
    );
}

// ================================================================
// Grid actions
// ================================================================

#[tokio::test(start_paused = true)]
async fn spawn_and_merge_through_handle() {
    let runtime = start(Arc::new(InMemorySnapshotRepo::new())).await;
    let handle = runtime.handle();

    let slot = merge_pair(&handle, ItemKind::Wood, 1).await;

    let view = handle.query_state().await.expect("query");
    let item = view.state.grid.get(slot).expect("merged item");
    assert_eq!(item.kind, ItemKind::Wood);
    assert_eq!(item.level(), 2);
    assert_eq!(view.state.grid.occupied_count(), 1);
    assert_eq!(view.state.player.xp, 20);

    runtime.shutdown().await.expect("shutdown");
}

#[tokio::test(start_paused = true)]
async fn rejection_is_a_reply_not_an_error() {
    let runtime = start(Arc::new(InMemorySnapshotRepo::new())).await;
    let handle = runtime.handle();
    let mut session = handle.subscribe(Topic::Session);

    let slot = spawned_slot(&handle, ItemKind::Stone, 1).await;
    let reply = handle.combine(slot, slot).await.expect("reply");

    let rejection = reply.rejection().expect("rejected");
    assert_eq!(rejection.code, "GRID_SAME_SLOT");
    assert!(drain(&mut session).iter().any(|event| matches!(
        event,
        Event::Session(SessionEvent::ActionRejected { rejection, .. })
            if rejection.code == "GRID_SAME_SLOT"
    )));

    let view = handle.query_state().await.expect("query");
    assert_eq!(view.state.grid.occupied_count(), 1);

    runtime.shutdown().await.expect("shutdown");
}

// ================================================================
// Economy
// ================================================================

#[tokio::test(start_paused = true)]
async fn restored_parcels_pay_income() {
    let repo = Arc::new(InMemorySnapshotRepo::with_snapshot(
        "save_alice",
        earning_snapshot(10),
    ));
    let runtime = start(repo).await;
    assert!(runtime.resumed());
    let handle = runtime.handle();
    let mut economy = handle.subscribe(Topic::Economy);

    tokio::time::sleep(Duration::from_millis(5_500)).await;

    let view = handle.query_state().await.expect("query");
    assert_eq!(view.state.player.gold, 110);
    assert!(drain(&mut economy).iter().any(|event| matches!(
        event,
        Event::Economy(EconomyEvent::Income { gold: 10, .. })
    )));

    runtime.shutdown().await.expect("shutdown");
}

#[tokio::test(start_paused = true)]
async fn inactive_session_earns_nothing() {
    let repo = Arc::new(InMemorySnapshotRepo::with_snapshot(
        "save_alice",
        earning_snapshot(10),
    ));
    let runtime = start(repo).await;
    let handle = runtime.handle();

    handle.set_active(false).await.expect("pause");
    tokio::time::sleep(Duration::from_secs(12)).await;

    let view = handle.query_state().await.expect("query");
    assert!(!view.active);
    assert_eq!(view.state.player.gold, 100);
    assert_eq!(view.income_progress, 0);

    handle.set_active(true).await.expect("resume");
    tokio::time::sleep(Duration::from_millis(5_500)).await;
    let view = handle.query_state().await.expect("query");
    assert_eq!(view.state.player.gold, 110);

    runtime.shutdown().await.expect("shutdown");
}

#[tokio::test(start_paused = true)]
async fn quick_merges_start_frenzy() {
    let runtime = start(Arc::new(InMemorySnapshotRepo::new())).await;
    let handle = runtime.handle();
    let mut economy = handle.subscribe(Topic::Economy);

    for _ in 0..3 {
        merge_pair(&handle, ItemKind::Crop, 1).await;
    }

    let view = handle.query_state().await.expect("query");
    assert_eq!(view.combo, 3);
    assert!(view.is_frenzy);
    assert!(drain(&mut economy).iter().any(|event| matches!(
        event,
        Event::Economy(EconomyEvent::FrenzyStarted { combo: 3 })
    )));

    tokio::time::sleep(Duration::from_millis(5_200)).await;
    let view = handle.query_state().await.expect("query");
    assert!(!view.is_frenzy);

    runtime.shutdown().await.expect("shutdown");
}

// ================================================================
// Lore enrichment
// ================================================================

#[tokio::test(start_paused = true)]
async fn lore_lands_on_rare_merge() {
    let runtime = Runtime::builder()
        .config(config())
        .lore_provider(Arc::new(SlowLore))
        .build()
        .await
        .expect("runtime should start");
    let handle = runtime.handle();
    let mut progress = handle.subscribe(Topic::Progress);

    let slot = merge_pair(&handle, ItemKind::Wood, 4).await;
    tokio::time::sleep(Duration::from_secs(2)).await;

    let view = handle.query_state().await.expect("query");
    let item = view.state.grid.get(slot).expect("merged item");
    assert_eq!(
        item.lore.as_deref(),
        Some("Carved from the first oak of the realm.")
    );
    assert!(drain(&mut progress).iter().any(|event| matches!(
        event,
        Event::Progress(ProgressEvent::LoreApplied { item: id }) if *id == item.id
    )));

    runtime.shutdown().await.expect("shutdown");
}

#[tokio::test(start_paused = true)]
async fn lore_for_sold_item_is_dropped() {
    let runtime = Runtime::builder()
        .config(config())
        .lore_provider(Arc::new(SlowLore))
        .build()
        .await
        .expect("runtime should start");
    let handle = runtime.handle();
    let mut progress = handle.subscribe(Topic::Progress);

    let slot = merge_pair(&handle, ItemKind::Wood, 4).await;
    let sold = handle.sell(slot).await.expect("sell");
    assert!(sold.is_applied());

    tokio::time::sleep(Duration::from_secs(2)).await;

    let view = handle.query_state().await.expect("query");
    assert_eq!(view.state.grid.occupied_count(), 0);
    assert!(!drain(&mut progress).iter().any(|event| matches!(
        event,
        Event::Progress(ProgressEvent::LoreApplied { .. })
    )));

    runtime.shutdown().await.expect("shutdown");
}

// ================================================================
// Missions
// ================================================================

#[tokio::test(start_paused = true)]
async fn mission_board_lifecycle() {
    let runtime = start(Arc::new(InMemorySnapshotRepo::new())).await;
    let handle = runtime.handle();

    let view = handle.query_state().await.expect("query");
    let mission = view.state.missions.first().expect("missions").clone();
    let energy = view.state.player.energy;

    assert_eq!(handle.tap(Cell::new(0, 0)).await.expect("tap"), TapOutcome::Ignored);

    let started = handle.start_mission(mission.id.clone()).await.expect("start");
    assert!(started.is_applied());

    let again = handle.start_mission(mission.id.clone()).await.expect("start");
    assert_eq!(
        again.rejection().map(|rejection| rejection.code.as_str()),
        Some("MISSION_IN_PROGRESS")
    );

    assert_eq!(
        handle.tap(Cell::new(0, 0)).await.expect("tap"),
        TapOutcome::Selected(Cell::new(0, 0))
    );
    let view = handle.query_state().await.expect("query");
    let board = view.match3.expect("board open");
    assert_eq!(board.mission, mission.id);
    assert_eq!(board.moves_left, mission.moves);
    assert_eq!(view.state.player.energy, energy - mission.energy_cost);

    assert!(handle.exit_mission().await.expect("exit"));
    assert!(!handle.exit_mission().await.expect("exit"));

    let view = handle.query_state().await.expect("query");
    assert!(view.match3.is_none());
    assert_eq!(view.state.player.energy, energy - mission.energy_cost);

    runtime.shutdown().await.expect("shutdown");
}

#[tokio::test(start_paused = true)]
async fn mission_without_energy_is_rejected() {
    let mut snapshot = earning_snapshot(0);
    snapshot.player.energy = 1;
    let repo = Arc::new(InMemorySnapshotRepo::with_snapshot("save_alice", snapshot));
    let runtime = start(repo).await;
    let handle = runtime.handle();
    handle.set_active(false).await.expect("pause");

    let view = handle.query_state().await.expect("query");
    let mission = view.state.missions.first().expect("missions").clone();

    let reply = handle.start_mission(mission.id).await.expect("start");
    assert_eq!(
        reply.rejection().map(|rejection| rejection.code.as_str()),
        Some("MISSION_INSUFFICIENT_ENERGY")
    );
    let view = handle.query_state().await.expect("query");
    assert!(view.match3.is_none());
    assert_eq!(view.state.player.energy, 1);

    runtime.shutdown().await.expect("shutdown");
}

#[tokio::test(start_paused = true)]
async fn settled_swap_wins_and_pays_the_reward() {
    let runtime = start_sprint().await;
    let handle = runtime.handle();
    handle.set_active(false).await.expect("pause");
    let mut progress = handle.subscribe(Topic::Progress);

    start_swap(&handle).await;

    tokio::time::sleep(Duration::from_millis(400)).await;
    let view = handle.query_state().await.expect("query");
    let board = view.match3.expect("board still open");
    assert_eq!(board.moves_left, 4);
    assert!(board.score >= 300);
    assert_eq!(board.phase, Match3Phase::Finishing);

    tokio::time::sleep(Duration::from_millis(1_100)).await;
    let view = handle.query_state().await.expect("query");
    assert!(view.match3.is_none());
    // 100 XP from level 1 is exactly one level-up
    assert_eq!((view.state.player.level, view.state.player.xp), (2, 0));

    let finished = drain(&mut progress).into_iter().find_map(|event| match event {
        Event::Progress(ProgressEvent::MissionFinished { result, reward, .. }) => {
            Some((result, reward))
        }
        _ => None,
    });
    let (result, reward) = finished.expect("mission finished");
    assert!(result.success);
    let reward = reward.expect("reward granted");
    assert_eq!(reward.kind, ItemKind::Potion);
    let (slot, item) = reward.placed.expect("reward placed");
    assert_eq!(view.state.grid.get(slot).map(|placed| placed.id), Some(item));

    runtime.shutdown().await.expect("shutdown");
}

#[tokio::test(start_paused = true)]
async fn exit_cancels_pending_settle() {
    let runtime = start_sprint().await;
    let handle = runtime.handle();
    handle.set_active(false).await.expect("pause");

    start_swap(&handle).await;
    assert!(handle.exit_mission().await.expect("exit"));
    let abandoned = handle.query_state().await.expect("query");
    let mut progress = handle.subscribe(Topic::Progress);

    tokio::time::sleep(Duration::from_secs(2)).await;

    let view = handle.query_state().await.expect("query");
    assert!(view.match3.is_none());
    assert_eq!(view.state, abandoned.state);
    assert!(!drain(&mut progress).iter().any(|event| matches!(
        event,
        Event::Progress(ProgressEvent::Board(_) | ProgressEvent::MissionFinished { .. })
    )));

    runtime.shutdown().await.expect("shutdown");
}

#[tokio::test(start_paused = true)]
async fn gems_buy_gold_through_handle() {
    let runtime = start(Arc::new(InMemorySnapshotRepo::new())).await;
    let handle = runtime.handle();
    handle.set_active(false).await.expect("pause");

    assert!(handle.buy(ShopOffer::GoldPouch).await.expect("buy").is_applied());
    let reply = handle.buy(ShopOffer::EnergyRefill).await.expect("buy");
    assert!(reply.is_applied());

    let view = handle.query_state().await.expect("query");
    assert_eq!(view.state.player.gold, 600);
    assert_eq!(view.state.player.gems, 10);
    assert_eq!(view.state.player.energy, view.state.player.max_energy);

    runtime.shutdown().await.expect("shutdown");
}

// ================================================================
// Persistence
// ================================================================

#[tokio::test(start_paused = true)]
async fn resumes_saved_progress() {
    let mut snapshot = earning_snapshot(0);
    snapshot.player.gold = 777;
    let repo = Arc::new(InMemorySnapshotRepo::with_snapshot("save_alice", snapshot));

    let runtime = start(repo).await;
    assert!(runtime.resumed());

    let view = runtime.handle().query_state().await.expect("query");
    assert_eq!(view.state.player.gold, 777);
    assert!(!view.state.missions.is_empty(), "missions are regenerated on load");

    runtime.shutdown().await.expect("shutdown");
}

#[tokio::test(start_paused = true)]
async fn shutdown_writes_final_save() {
    let repo = Arc::new(InMemorySnapshotRepo::new());
    let runtime = start(Arc::clone(&repo)).await;
    assert!(!runtime.resumed());

    spawned_slot(&runtime.handle(), ItemKind::Potion, 2).await;
    runtime.shutdown().await.expect("shutdown");

    let saved = repo.load("save_alice").expect("load").expect("saved");
    assert_eq!(saved.grid.occupied_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn reset_wipes_progress_and_save() {
    let repo = Arc::new(InMemorySnapshotRepo::new());
    let runtime = start(Arc::clone(&repo)).await;
    let handle = runtime.handle();
    let mut session = handle.subscribe(Topic::Session);

    spawned_slot(&handle, ItemKind::Wood, 3).await;
    runtime.flush().await.expect("flush");
    assert!(repo.exists("save_alice"));

    handle.reset_progress().await.expect("reset");
    runtime.flush().await.expect("flush");
    assert!(!repo.exists("save_alice"));

    let view = handle.query_state().await.expect("query");
    assert_eq!(view.state.grid.occupied_count(), 0);
    assert_eq!(view.state.player.gold, 100);
    assert!(drain(&mut session)
        .iter()
        .any(|event| matches!(event, Event::Session(SessionEvent::ProgressReset))));

    runtime.shutdown().await.expect("shutdown");
}
