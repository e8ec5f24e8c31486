//! Headless player that drives a session through [`RuntimeHandle`].
//!
//! [`plan`] is a pure function from a [`SessionView`] to the next [`Move`];
//! [`Autoplay`] polls the runtime, plays one move per step and tallies the
//! replies.

use std::collections::HashMap;
use std::time::Duration;

use merge_core::{
    Cell, GameConfig, ItemId, ItemKind, Match3Phase, ShopOffer, SlotIndex, plan_restoration,
};
use merge_runtime::{
    ActionReply, EconomyEvent, Event, ProgressEvent, RuntimeError, RuntimeHandle, SessionView,
    Topic,
};
use rand::Rng;
use rand::seq::SliceRandom;
use strum::IntoEnumIterator;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

const TARGET: &str = "client::autoplay";

/// Chance per step of entering a mission when energy allows it.
const MISSION_CHANCE: f64 = 0.15;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Move {
    Acknowledge(ItemId),
    Buy(ShopOffer),
    Restore(String),
    Merge { from: SlotIndex, to: SlotIndex },
    Spawn(ItemKind),
    StartMission(String),
    Tap(Cell),
    Wait,
}

/// Picks the next move for `view`.
///
/// While a match-3 board is open only taps are played. Otherwise the
/// priority is: acknowledge new items, restore an affordable parcel, merge
/// the lowest matching pair, occasionally start a mission (refilling energy
/// with gems when none is affordable), spawn.
pub fn plan(view: &SessionView, rng: &mut impl Rng) -> Move {
    if let Some(board) = &view.match3 {
        let rows = board.board.len();
        let cols = board.board.first().map_or(0, Vec::len);
        return match board.phase {
            Match3Phase::Ready if rows > 0 && cols > 0 => {
                Move::Tap(Cell::new(rng.gen_range(0..rows), rng.gen_range(0..cols)))
            }
            Match3Phase::Selected(cell) => neighbours(cell, rows, cols)
                .choose(rng)
                .copied()
                .map_or(Move::Wait, Move::Tap),
            _ => Move::Wait,
        };
    }

    let state = &view.state;

    if let Some((_, item)) = state.grid.items().find(|(_, item)| item.is_new) {
        return Move::Acknowledge(item.id);
    }

    if let Some(parcel) = state.parcels.iter().find(|parcel| {
        !parcel.unlocked
            && state.player.can_afford(parcel.cost_gold)
            && plan_restoration(&state.grid, parcel).is_ok()
    }) {
        return Move::Restore(parcel.id.clone());
    }

    if let Some((from, to)) = lowest_pair(view) {
        return Move::Merge { from, to };
    }

    if rng.gen_bool(MISSION_CHANCE) {
        let playable = state.missions.iter().filter(|mission| mission.is_playable());
        let mut affordable = playable.clone().filter(|m| m.energy_cost <= state.player.energy);
        if let Some(mission) = affordable.next() {
            return Move::StartMission(mission.id.clone());
        }
        let refill = ShopOffer::EnergyRefill;
        if playable.count() > 0
            && state.player.gems >= refill.price_gems()
            && state.player.energy < state.player.max_energy
        {
            return Move::Buy(refill);
        }
    }

    if state.grid.first_empty().is_some() {
        let kinds: Vec<ItemKind> = ItemKind::iter().collect();
        if let Some(kind) = kinds.choose(rng) {
            return Move::Spawn(*kind);
        }
    }

    Move::Wait
}

/// Two slots holding the same kind at the same, lowest mergeable level.
fn lowest_pair(view: &SessionView) -> Option<(SlotIndex, SlotIndex)> {
    let mut first_seen: HashMap<(ItemKind, u8), SlotIndex> = HashMap::new();
    let mut best: Option<(u8, SlotIndex, SlotIndex)> = None;

    for (slot, item) in view.state.grid.items() {
        if item.level() >= GameConfig::MAX_ITEM_LEVEL {
            continue;
        }
        match first_seen.get(&(item.kind, item.level())) {
            Some(&from) => {
                if best.is_none_or(|(level, ..)| item.level() < level) {
                    best = Some((item.level(), from, slot));
                }
            }
            None => {
                first_seen.insert((item.kind, item.level()), slot);
            }
        }
    }

    best.map(|(_, from, to)| (from, to))
}

fn neighbours(cell: Cell, rows: usize, cols: usize) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(4);
    if cell.row > 0 {
        cells.push(Cell::new(cell.row - 1, cell.col));
    }
    if cell.row + 1 < rows {
        cells.push(Cell::new(cell.row + 1, cell.col));
    }
    if cell.col > 0 {
        cells.push(Cell::new(cell.row, cell.col - 1));
    }
    if cell.col + 1 < cols {
        cells.push(Cell::new(cell.row, cell.col + 1));
    }
    cells
}

/// Tally of an autoplay run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AutoplayReport {
    pub moves: u32,
    pub applied: u32,
    pub rejected: u32,
}

impl AutoplayReport {
    fn record(&mut self, reply: &ActionReply) {
        match reply {
            ActionReply::Applied(_) => self.applied += 1,
            ActionReply::Rejected(rejection) => {
                debug!(target: TARGET, code = %rejection.code, "Move rejected");
                self.rejected += 1;
            }
        }
    }
}

pub struct Autoplay<R> {
    handle: RuntimeHandle,
    rng: R,
    step: Duration,
}

impl<R: Rng> Autoplay<R> {
    pub fn new(handle: RuntimeHandle, rng: R, step: Duration) -> Self {
        Self { handle, rng, step }
    }

    /// Plays until `duration` has elapsed.
    pub async fn run(mut self, duration: Duration) -> Result<AutoplayReport, RuntimeError> {
        let deadline = Instant::now() + duration;
        let mut report = AutoplayReport::default();

        while Instant::now() < deadline {
            let view = self.handle.query_state().await?;
            let next = plan(&view, &mut self.rng);
            self.play(&next, &mut report).await?;
            tokio::time::sleep(self.step).await;
        }

        info!(
            target: TARGET,
            moves = report.moves,
            applied = report.applied,
            rejected = report.rejected,
            "Autoplay finished"
        );
        Ok(report)
    }

    async fn play(&self, next: &Move, report: &mut AutoplayReport) -> Result<(), RuntimeError> {
        let handle = &self.handle;
        let reply = match next {
            Move::Wait => return Ok(()),
            Move::Tap(cell) => {
                report.moves += 1;
                let outcome = handle.tap(*cell).await?;
                debug!(target: TARGET, ?cell, ?outcome, "Tap");
                return Ok(());
            }
            Move::Acknowledge(item) => handle.acknowledge(*item).await?,
            Move::Buy(offer) => handle.buy(*offer).await?,
            Move::Restore(parcel) => handle.restore(parcel.clone()).await?,
            Move::Merge { from, to } => handle.combine(*from, *to).await?,
            Move::Spawn(kind) => handle.spawn(*kind, 1).await?,
            Move::StartMission(mission) => handle.start_mission(mission.clone()).await?,
        };
        report.moves += 1;
        report.record(&reply);
        Ok(())
    }
}

/// Logs progress and economy events until the bus closes.
pub fn spawn_event_logger(handle: &RuntimeHandle) -> JoinHandle<()> {
    let mut receivers = handle.subscribe_multiple(&[Topic::Progress, Topic::Economy]);
    let progress = receivers.remove(&Topic::Progress);
    let economy = receivers.remove(&Topic::Economy);

    tokio::spawn(async move {
        let (Some(mut progress), Some(mut economy)) = (progress, economy) else {
            return;
        };
        loop {
            let received = tokio::select! {
                event = progress.recv() => event,
                event = economy.recv() => event,
            };
            match received {
                Ok(event) => log_event(&event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(target: TARGET, skipped, "Event logger fell behind");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

fn log_event(event: &Event) {
    match event {
        Event::Progress(ProgressEvent::LevelUp(level_up)) => {
            info!(target: TARGET, level = level_up.level, "Level up")
        }
        Event::Progress(ProgressEvent::LoreApplied { item }) => {
            info!(target: TARGET, %item, "Lore discovered")
        }
        Event::Progress(ProgressEvent::MissionFinished {
            mission, result, ..
        }) => info!(
            target: TARGET,
            mission = %mission,
            success = result.success,
            score = result.score,
            "Mission finished"
        ),
        Event::Economy(EconomyEvent::Income { gold, .. }) => {
            info!(target: TARGET, gold, "Income")
        }
        Event::Economy(EconomyEvent::FrenzyStarted { combo }) => {
            info!(target: TARGET, combo, "Frenzy!")
        }
        Event::Economy(EconomyEvent::DayNight { is_night }) => {
            info!(target: TARGET, is_night, "Day/night changed")
        }
        other => debug!(target: TARGET, event = ?other, "Event"),
    }
}

#[cfg(test)]
mod tests {
    use merge_core::{GameState, Grid, Item, Mission};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn view(state: GameState) -> SessionView {
        SessionView {
            state,
            active: true,
            is_night: false,
            is_frenzy: false,
            income_progress: 0,
            combo: 0,
            match3: None,
        }
    }

    fn fresh_state() -> GameState {
        GameState::new(
            1,
            &GameConfig::default(),
            merge_content::default_parcels(),
            Vec::<Mission>::new(),
        )
    }

    /// Fills `slots` with acknowledged items; the rest of the grid is emptied.
    fn with_items(mut state: GameState, items: &[(SlotIndex, ItemKind, u8)]) -> GameState {
        let mut slots: Vec<Option<Item>> = vec![None; state.grid.len()];
        for &(slot, kind, level) in items {
            let id = state.allocate_item_id();
            let mut item = Item::spawned(id, kind, level).expect("valid level");
            item.is_new = false;
            slots[slot] = Some(item);
        }
        state.grid = Grid::from_slots(slots);
        state
    }

    #[test]
    fn empty_grid_spawns() {
        let mut rng = StdRng::seed_from_u64(3);
        let next = plan(&view(fresh_state()), &mut rng);
        assert!(matches!(next, Move::Spawn(_)), "got {next:?}");
    }

    #[test]
    fn new_items_are_acknowledged_first() {
        let mut state = with_items(
            fresh_state(),
            &[(0, ItemKind::Wood, 1), (1, ItemKind::Wood, 1), (2, ItemKind::Stone, 1)],
        );
        let mut slots = state.grid.slots().to_vec();
        let fresh = slots[2].as_mut().expect("item");
        fresh.is_new = true;
        let id = fresh.id;
        state.grid = Grid::from_slots(slots);

        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(plan(&view(state), &mut rng), Move::Acknowledge(id));
    }

    #[test]
    fn restores_affordable_parcel_before_merging() {
        let state = with_items(
            fresh_state(),
            &[(0, ItemKind::Wood, 3), (1, ItemKind::Stone, 1), (2, ItemKind::Stone, 1)],
        );

        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(plan(&view(state), &mut rng), Move::Restore("p1".into()));
    }

    #[test]
    fn merges_lowest_pair() {
        let state = with_items(
            fresh_state(),
            &[
                (0, ItemKind::Stone, 3),
                (1, ItemKind::Wood, 1),
                (4, ItemKind::Stone, 3),
                (7, ItemKind::Wood, 1),
            ],
        );

        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            plan(&view(state), &mut rng),
            Move::Merge { from: 1, to: 7 }
        );
    }

    #[test]
    fn max_level_items_are_never_merged() {
        let state = with_items(
            fresh_state(),
            &[
                (0, ItemKind::Potion, GameConfig::MAX_ITEM_LEVEL),
                (1, ItemKind::Potion, GameConfig::MAX_ITEM_LEVEL),
            ],
        );

        assert_eq!(lowest_pair(&view(state)), None);
    }

    #[test]
    fn refills_energy_when_no_mission_is_affordable() {
        let mut state = with_items(fresh_state(), &[(0, ItemKind::Wood, 1)]);
        state.missions = merge_content::fallback_missions(1);
        state.player.energy = 0;

        let mut rng = StdRng::seed_from_u64(0);
        let moves: Vec<Move> = (0..64).map(|_| plan(&view(state.clone()), &mut rng)).collect();

        assert!(moves.contains(&Move::Buy(ShopOffer::EnergyRefill)));
        assert!(!moves.iter().any(|next| matches!(next, Move::StartMission(_))));
    }

    #[test]
    fn neighbours_stay_on_board() {
        assert_eq!(neighbours(Cell::new(0, 0), 7, 6).len(), 2);
        assert_eq!(neighbours(Cell::new(3, 3), 7, 6).len(), 4);
        assert_eq!(neighbours(Cell::new(6, 5), 7, 6).len(), 2);
    }
}
