//! Session worker that owns the authoritative [`merge_core::GameState`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), executes
//! actions via [`merge_core::GameEngine`], drives the economy clock, runs the
//! match-3 board and its timers, and folds enrichment results back in. All
//! mutation happens on this task, one message at a time.

use std::sync::Arc;
use std::time::Duration;

use merge_core::{
    Action, ActionResult, Cell, ComboTracker, EconomyClock, EconomyReport, Effect, EffectSink,
    ExecuteError, GameEngine, GameState, ItemId, LoreRequest, Match3Phase, Match3Session, Mission,
    Parcel, Resolution, TapOutcome, TransitionPhase, compute_seed, seed_context,
};
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::api::{ActionReply, Rejection, SessionView};
use crate::events::{
    BusEffectSink, EconomyEvent, Event, EventBus, Match3View, ProgressEvent, SessionEvent,
};
use crate::oracle::OracleManager;
use crate::providers::{LoreProvider, MissionProvider};
use crate::repository::Snapshot;

const TARGET: &str = "runtime::session";

/// Commands that can be sent to the session worker
pub enum Command {
    Execute {
        action: Action,
        reply: oneshot::Sender<ActionReply>,
    },
    StartMission {
        mission: String,
        reply: oneshot::Sender<ActionReply>,
    },
    Tap {
        cell: Cell,
        reply: oneshot::Sender<TapOutcome>,
    },
    ExitMission {
        reply: oneshot::Sender<bool>,
    },
    SetActive {
        active: bool,
    },
    ResetProgress {
        reply: oneshot::Sender<()>,
    },
    QueryState {
        reply: oneshot::Sender<SessionView>,
    },
    /// Stop even if handles are still alive.
    Shutdown,
}

/// Messages from tasks this worker spawned.
enum Internal {
    Lore {
        epoch: u64,
        item: ItemId,
        lore: String,
    },
    Missions {
        epoch: u64,
        level: u32,
        missions: Vec<Mission>,
    },
    Match3 {
        generation: u64,
        timer: Match3Timer,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Match3Timer {
    Settle,
    Complete,
}

struct ActiveMission {
    mission: Mission,
    session: Match3Session,
    timer: Option<JoinHandle<()>>,
}

/// Enrichment collaborators used by the worker.
#[derive(Clone)]
pub struct Providers {
    pub lore: Arc<dyn LoreProvider>,
    pub missions: Arc<dyn MissionProvider>,
}

/// Background task that owns one player's session.
pub struct SessionWorker {
    state: GameState,
    oracles: OracleManager,
    clock: EconomyClock,
    combo: ComboTracker,
    mission: Option<ActiveMission>,
    /// Bumped whenever the board is opened or closed; stale timers compare against it.
    match3_generation: u64,
    /// Bumped on reset; enrichment from an earlier epoch is dropped.
    epoch: u64,
    started_at: Instant,
    fresh_parcels: Vec<Parcel>,
    providers: Providers,
    event_bus: EventBus,
    sink: BusEffectSink,
    command_rx: mpsc::Receiver<Command>,
    internal_tx: mpsc::UnboundedSender<Internal>,
    internal_rx: mpsc::UnboundedReceiver<Internal>,
    enrichment: JoinSet<()>,
}

impl SessionWorker {
    pub fn new(
        state: GameState,
        oracles: OracleManager,
        clock: EconomyClock,
        fresh_parcels: Vec<Parcel>,
        providers: Providers,
        event_bus: EventBus,
        command_rx: mpsc::Receiver<Command>,
    ) -> Self {
        let (internal_tx, internal_rx) = mpsc::unbounded_channel();
        let combo = ComboTracker::new(oracles.config().combo.clone());
        Self {
            state,
            oracles,
            clock,
            combo,
            mission: None,
            match3_generation: 0,
            epoch: 0,
            started_at: Instant::now(),
            fresh_parcels,
            providers,
            sink: BusEffectSink::new(event_bus.clone()),
            event_bus,
            command_rx,
            internal_tx,
            internal_rx,
            enrichment: JoinSet::new(),
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        let tick = self.oracles.config().economy.tick().max(Duration::from_millis(1));
        let mut ticker = tokio::time::interval(tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_tick = Instant::now();

        info!(target: TARGET, seed = self.state.seed, "Session worker started");

        loop {
            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some(message) = self.internal_rx.recv() => self.handle_internal(message),
                _ = ticker.tick() => {
                    let now = Instant::now();
                    self.advance_economy(now.saturating_duration_since(last_tick));
                    last_tick = now;
                }
                Some(joined) = self.enrichment.join_next(), if !self.enrichment.is_empty() => {
                    if let Err(error) = joined
                        && error.is_panic()
                    {
                        error!(target: TARGET, %error, "Enrichment task panicked");
                    }
                }
            }
        }

        self.teardown();
    }

    fn teardown(&mut self) {
        if let Some(active) = self.mission.take()
            && let Some(timer) = active.timer
        {
            timer.abort();
        }
        self.enrichment.abort_all();
        info!(target: TARGET, nonce = self.state.nonce, "Session worker stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Execute { action, reply } => {
                let result = self.execute(action);
                let _ = reply.send(result);
            }
            Command::StartMission { mission, reply } => {
                let result = self.start_mission(mission);
                let _ = reply.send(result);
            }
            Command::Tap { cell, reply } => {
                let result = self.tap(cell);
                let _ = reply.send(result);
            }
            Command::ExitMission { reply } => {
                let _ = reply.send(self.exit_mission());
            }
            Command::SetActive { active } => self.set_active(active),
            Command::ResetProgress { reply } => {
                self.reset_progress();
                let _ = reply.send(());
            }
            Command::QueryState { reply } => {
                let _ = reply.send(self.view());
            }
            Command::Shutdown => {}
        }
    }

    fn handle_internal(&mut self, message: Internal) {
        match message {
            Internal::Lore { epoch, item, lore } => self.apply_lore(epoch, item, lore),
            Internal::Missions {
                epoch,
                level,
                missions,
            } => self.append_missions(epoch, level, missions),
            Internal::Match3 { generation, timer } => self.fire_match3_timer(generation, timer),
        }
    }

    // ===== actions =====

    fn execute(&mut self, action: Action) -> ActionReply {
        // Execute against a cloned state so a rejection can never leave partial mutations
        let env = self.oracles.as_game_env();
        let mut working_state = self.state.clone();
        let result = GameEngine::with_sink(&mut working_state, &self.sink).execute(env, &action);

        match result {
            Ok(outcome) => {
                self.state = working_state;
                self.after_commit(&action, &outcome.result, &outcome.level_ups, outcome.nonce);
                ActionReply::Applied(Box::new(outcome))
            }
            Err(error) => {
                let rejection = Rejection::from(&error);
                self.report_rejection(&action, &error, &rejection);
                ActionReply::Rejected(rejection)
            }
        }
    }

    fn after_commit(
        &mut self,
        action: &Action,
        result: &ActionResult,
        level_ups: &[merge_core::LevelUp],
        nonce: u64,
    ) {
        self.event_bus
            .publish(Event::Session(SessionEvent::ActionApplied {
                action: action.as_snake_case().to_owned(),
                nonce,
            }));

        for level_up in level_ups {
            info!(target: TARGET, level = level_up.level, "Level up");
            self.event_bus
                .publish(Event::Progress(ProgressEvent::LevelUp(*level_up)));
            self.request_missions(level_up.level);
        }

        if let Some(request) = result.lore_request() {
            self.request_lore(request.clone());
        }

        if result.is_merge() {
            self.register_merge();
        }

        self.publish_state_changed();
    }

    fn report_rejection(&self, action: &Action, error: &ExecuteError, rejection: &Rejection) {
        let phase = error.phase();
        if phase == TransitionPhase::PreValidate {
            debug!(
                target: TARGET,
                action = ?action,
                phase = phase.as_str(),
                code = %rejection.code,
                error = %error,
                "Action rejected during pre-validate"
            );
        } else {
            error!(
                target: TARGET,
                action = ?action,
                phase = phase.as_str(),
                code = %rejection.code,
                error = %error,
                "Action rejected during apply"
            );
        }

        self.event_bus
            .publish(Event::Session(SessionEvent::ActionRejected {
                action: action.as_snake_case().to_owned(),
                rejection: rejection.clone(),
            }));
    }

    fn register_merge(&mut self) {
        let update = self.combo.register_merge(self.started_at.elapsed());
        if !update.fired {
            return;
        }

        self.sink.notify(Effect::combo_popup(update.count));
        if self.clock.trigger_frenzy() {
            info!(target: TARGET, combo = update.count, "Frenzy started");
            self.event_bus
                .publish(Event::Economy(EconomyEvent::FrenzyStarted {
                    combo: update.count,
                }));
        }
    }

    fn publish_state_changed(&self) {
        self.event_bus
            .publish(Event::Session(SessionEvent::StateChanged {
                snapshot: Box::new(Snapshot::capture(&self.state)),
            }));
    }

    // ===== enrichment =====

    fn request_lore(&mut self, request: LoreRequest) {
        let provider = Arc::clone(&self.providers.lore);
        let tx = self.internal_tx.clone();
        let epoch = self.epoch;

        self.enrichment.spawn(async move {
            let lore = provider.generate_lore(request.kind, request.level).await;
            let _ = tx.send(Internal::Lore {
                epoch,
                item: request.item,
                lore,
            });
        });
    }

    fn request_missions(&mut self, level: u32) {
        let provider = Arc::clone(&self.providers.missions);
        let tx = self.internal_tx.clone();
        let epoch = self.epoch;

        self.enrichment.spawn(async move {
            let missions = provider.generate_missions(level).await;
            let _ = tx.send(Internal::Missions {
                epoch,
                level,
                missions,
            });
        });
    }

    fn apply_lore(&mut self, epoch: u64, item: ItemId, lore: String) {
        if epoch != self.epoch {
            debug!(target: TARGET, %item, "Dropping lore requested before a reset");
            return;
        }
        if lore.is_empty() {
            debug!(target: TARGET, %item, "No lore generated");
            return;
        }
        // Correlated by id: the item may have moved, merged away or been sold.
        if self.state.grid.position_of(item).is_none() {
            debug!(target: TARGET, %item, "Dropping lore for an item that no longer exists");
            return;
        }

        if self.execute(Action::apply_lore(item, lore)).is_applied() {
            self.event_bus
                .publish(Event::Progress(ProgressEvent::LoreApplied { item }));
        }
    }

    fn append_missions(&mut self, epoch: u64, level: u32, missions: Vec<Mission>) {
        if epoch != self.epoch {
            debug!(target: TARGET, level, "Dropping missions requested before a reset");
            return;
        }

        let mut added = Vec::new();
        for mission in missions {
            if self.state.mission(&mission.id).is_none() {
                self.state.missions.push(mission.clone());
                added.push(mission);
            }
        }

        if added.is_empty() {
            debug!(target: TARGET, level, "No new missions");
            return;
        }

        info!(target: TARGET, level, count = added.len(), "Missions added");
        self.event_bus
            .publish(Event::Progress(ProgressEvent::MissionsAdded {
                level,
                missions: added,
            }));
    }

    // ===== match-3 =====

    fn start_mission(&mut self, id: String) -> ActionReply {
        if let Some(active) = &self.mission {
            let rejection = Rejection::new(
                "MISSION_IN_PROGRESS",
                format!("mission '{}' is still running", active.mission.id),
            );
            debug!(target: TARGET, mission = %id, "Mission start rejected: board already open");
            return ActionReply::Rejected(rejection);
        }

        let reply = self.execute(Action::start_mission(id.clone()));
        if reply.is_applied()
            && let Some(mission) = self.state.mission(&id).cloned()
        {
            self.open_board(mission);
        }
        reply
    }

    fn open_board(&mut self, mission: Mission) {
        let seed = compute_seed(self.state.seed, self.state.nonce, seed_context::MATCH3_BOARD);
        let mut session = Match3Session::new(
            &self.oracles.config().match3,
            mission.moves,
            mission.target_score,
            seed,
        );
        let phase = session.begin();

        self.match3_generation += 1;
        info!(target: TARGET, mission = %mission.id, "Mission started");
        self.event_bus
            .publish(Event::Progress(ProgressEvent::MissionStarted {
                mission: mission.id.clone(),
            }));

        self.mission = Some(ActiveMission {
            mission,
            session,
            timer: None,
        });
        self.publish_board();

        if phase == Ok(Match3Phase::Finishing) {
            self.schedule(Match3Timer::Complete);
        }
    }

    fn tap(&mut self, cell: Cell) -> TapOutcome {
        let Some(active) = self.mission.as_mut() else {
            return TapOutcome::Ignored;
        };

        let outcome = active.session.tap(cell);
        match outcome {
            TapOutcome::Ignored => {}
            TapOutcome::SwapStarted { .. } => {
                self.publish_board();
                self.schedule(Match3Timer::Settle);
            }
            TapOutcome::Selected(_) | TapOutcome::Deselected => self.publish_board(),
        }
        outcome
    }

    fn exit_mission(&mut self) -> bool {
        let Some(active) = self.mission.take() else {
            return false;
        };
        if let Some(timer) = active.timer {
            timer.abort();
        }
        self.match3_generation += 1;

        info!(target: TARGET, mission = %active.mission.id, "Mission abandoned");
        self.event_bus
            .publish(Event::Progress(ProgressEvent::MissionAbandoned {
                mission: active.mission.id,
            }));
        true
    }

    fn schedule(&mut self, timer: Match3Timer) {
        let config = &self.oracles.config().match3;
        let delay = match timer {
            Match3Timer::Settle => config.settle_delay(),
            Match3Timer::Complete => config.completion_delay(),
        };
        let Some(active) = self.mission.as_mut() else {
            return;
        };

        let generation = self.match3_generation;
        let tx = self.internal_tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Internal::Match3 { generation, timer });
        });

        if let Some(previous) = active.timer.replace(handle) {
            previous.abort();
        }
    }

    fn fire_match3_timer(&mut self, generation: u64, timer: Match3Timer) {
        if generation != self.match3_generation {
            debug!(target: TARGET, ?timer, "Dropping stale match-3 timer");
            return;
        }
        match timer {
            Match3Timer::Settle => self.settle_swap(),
            Match3Timer::Complete => self.complete_mission(),
        }
    }

    fn settle_swap(&mut self) {
        let Some(active) = self.mission.as_mut() else {
            return;
        };
        active.timer = None;

        match active.session.resolve_swap() {
            Ok(Resolution::Matched { finished, .. }) => {
                self.publish_board();
                if finished {
                    self.schedule(Match3Timer::Complete);
                }
            }
            Ok(Resolution::Reverted) => self.publish_board(),
            Err(error) => debug!(target: TARGET, %error, "Settle timer found no pending swap"),
        }
    }

    fn complete_mission(&mut self) {
        let Some(mut active) = self.mission.take() else {
            return;
        };
        let result = match active.session.finish() {
            Ok(result) => result,
            Err(error) => {
                debug!(target: TARGET, %error, "Completion timer fired early");
                self.mission = Some(active);
                return;
            }
        };
        self.match3_generation += 1;

        let mission = active.mission.id;
        let reply = self.execute(Action::complete_mission(
            mission.clone(),
            result.success,
            result.score,
        ));
        let reward = match reply.outcome().map(|outcome| &outcome.result) {
            Some(ActionResult::MissionCompleted { reward }) => reward.clone(),
            _ => None,
        };

        info!(
            target: TARGET,
            mission = %mission,
            success = result.success,
            score = result.score,
            "Mission finished"
        );
        self.event_bus
            .publish(Event::Progress(ProgressEvent::MissionFinished {
                mission,
                result,
                reward,
            }));
    }

    fn publish_board(&self) {
        if let Some(active) = &self.mission {
            self.event_bus
                .publish(Event::Progress(ProgressEvent::Board(Match3View::capture(
                    &active.mission.id,
                    &active.session,
                ))));
        }
    }

    // ===== economy & lifecycle =====

    fn advance_economy(&mut self, delta: Duration) {
        let report = self.clock.advance(delta, &mut self.state, &self.sink);
        if report.is_quiet() {
            return;
        }
        self.publish_economy(&report);

        if report.gold_earned > 0 || report.energy_gained > 0 {
            self.publish_state_changed();
        }
    }

    fn publish_economy(&self, report: &EconomyReport) {
        if report.gold_earned > 0 {
            self.event_bus.publish(Event::Economy(EconomyEvent::Income {
                gold: report.gold_earned,
                cycles: report.income_cycles,
            }));
        }
        if report.energy_gained > 0 {
            self.event_bus
                .publish(Event::Economy(EconomyEvent::EnergyRegenerated {
                    amount: report.energy_gained,
                }));
        }
        for &is_night in &report.day_night_changes {
            self.event_bus
                .publish(Event::Economy(EconomyEvent::DayNight { is_night }));
        }
        if report.frenzy_ended {
            self.event_bus.publish(Event::Economy(EconomyEvent::FrenzyEnded));
        }
    }

    fn set_active(&mut self, active: bool) {
        if self.clock.is_active() == active {
            return;
        }
        self.clock.set_active(active);
        info!(target: TARGET, active, "Session activity changed");
        self.event_bus
            .publish(Event::Session(SessionEvent::ActiveChanged { active }));
    }

    fn reset_progress(&mut self) {
        self.exit_mission();
        self.enrichment.abort_all();
        self.epoch += 1;

        self.state = GameState::new(
            rand::random(),
            self.oracles.config(),
            self.fresh_parcels.clone(),
            Vec::new(),
        );
        self.clock.reset();
        self.combo.reset();

        info!(target: TARGET, seed = self.state.seed, "Progress reset");
        self.event_bus
            .publish(Event::Session(SessionEvent::ProgressReset));
        self.request_missions(self.state.player.level);
    }

    fn view(&self) -> SessionView {
        SessionView {
            state: self.state.clone(),
            active: self.clock.is_active(),
            is_night: self.clock.is_night(),
            is_frenzy: self.clock.is_frenzy(),
            income_progress: self.clock.income_progress(),
            combo: self.combo.count(),
            match3: self
                .mission
                .as_ref()
                .map(|active| Match3View::capture(&active.mission.id, &active.session)),
        }
    }
}
