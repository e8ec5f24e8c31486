//! Fixed-tick economy clock: passive income, energy regeneration, the
//! day/night cycle and the frenzy latch.
//!
//! The clock does not read time. Callers advance it with elapsed
//! [`Duration`]s; leftovers smaller than one tick are carried to the next
//! call, so the result is the same whether a minute arrives as one call or
//! six hundred.

use core::time::Duration;

use crate::config::EconomyConfig;
use crate::events::{Effect, EffectKind, EffectSink};
use crate::state::GameState;

/// Income progress units per full cycle.
pub const PROGRESS_FULL: u32 = 10_000;

/// What happened during one [`EconomyClock::advance`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EconomyReport {
    pub ticks: u32,
    pub income_cycles: u32,
    pub gold_earned: u64,
    pub energy_gained: u32,
    /// Night state after each toggle, in order.
    pub day_night_changes: Vec<bool>,
    pub frenzy_ended: bool,
}

impl EconomyReport {
    /// True when no state visible to the player changed.
    pub fn is_quiet(&self) -> bool {
        self.gold_earned == 0
            && self.energy_gained == 0
            && self.day_night_changes.is_empty()
            && !self.frenzy_ended
    }
}

#[derive(Clone, Debug)]
pub struct EconomyClock {
    config: EconomyConfig,
    active: bool,
    /// Active play time processed so far, in whole ticks.
    elapsed: Duration,
    carry: Duration,
    income_progress: u32,
    energy_elapsed: Duration,
    day_night_elapsed: Duration,
    frenzy_until: Option<Duration>,
    is_night: bool,
}

impl EconomyClock {
    /// Creates an inactive clock.
    pub fn new(config: EconomyConfig, is_night: bool) -> Self {
        Self {
            config,
            active: false,
            elapsed: Duration::ZERO,
            carry: Duration::ZERO,
            income_progress: 0,
            energy_elapsed: Duration::ZERO,
            day_night_elapsed: Duration::ZERO,
            frenzy_until: None,
            is_night,
        }
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_night(&self) -> bool {
        self.is_night
    }

    pub fn is_frenzy(&self) -> bool {
        self.frenzy_until.is_some_and(|until| self.elapsed < until)
    }

    /// Progress toward the next income payout, in `0..PROGRESS_FULL`.
    pub fn income_progress(&self) -> u32 {
        self.income_progress
    }

    /// Latches frenzy for the configured duration.
    ///
    /// Returns `false` and changes nothing when frenzy is already running;
    /// re-triggering never extends it.
    pub fn trigger_frenzy(&mut self) -> bool {
        if self.is_frenzy() {
            return false;
        }
        self.frenzy_until = Some(self.elapsed + self.config.frenzy_duration());
        true
    }

    /// Clears frenzy and all accumulated progress, keeping the night flag.
    pub fn reset(&mut self) {
        *self = Self {
            active: self.active,
            ..Self::new(self.config.clone(), self.is_night)
        };
    }

    /// Advances the clock by `delta`, applying every completed tick to `state`.
    ///
    /// A no-op while inactive; partial ticks are kept for the next call.
    pub fn advance(
        &mut self,
        delta: Duration,
        state: &mut GameState,
        sink: &dyn EffectSink,
    ) -> EconomyReport {
        let mut report = EconomyReport::default();
        if !self.active {
            return report;
        }

        let tick = self.config.tick();
        if tick.is_zero() {
            return report;
        }

        self.carry = self.carry.saturating_add(delta);
        while self.carry >= tick {
            self.carry -= tick;
            self.tick(state, sink, &mut report);
        }

        report
    }

    fn tick(&mut self, state: &mut GameState, sink: &dyn EffectSink, report: &mut EconomyReport) {
        let tick = self.config.tick();
        report.ticks += 1;

        let frenzy = self.is_frenzy();
        let cycle_ms = if frenzy {
            self.config.frenzy_income_cycle_ms
        } else {
            self.config.income_cycle_ms
        };
        let step = (self.config.tick_ms.saturating_mul(u64::from(PROGRESS_FULL)) / cycle_ms.max(1))
            .min(u64::from(PROGRESS_FULL)) as u32;
        self.income_progress += step;

        if self.income_progress >= PROGRESS_FULL {
            self.income_progress = 0;
            let multiplier = if frenzy {
                self.config.frenzy_income_multiplier
            } else {
                1
            };
            let income = state.passive_income().saturating_mul(multiplier);
            report.income_cycles += 1;
            if income > 0 {
                state.player.gold = state.player.gold.saturating_add(income);
                report.gold_earned += income;
                sink.notify(Effect::gold_popup(income));
                sink.notify(Effect::new(EffectKind::CoinRain));
            }
        }

        self.elapsed += tick;

        self.energy_elapsed += tick;
        let regen = self.config.energy_regen_period();
        if !regen.is_zero() && self.energy_elapsed >= regen {
            self.energy_elapsed -= regen;
            report.energy_gained += state.player.regenerate_energy(1);
        }

        self.day_night_elapsed += tick;
        let day_night = self.config.day_night_period();
        if !day_night.is_zero() && self.day_night_elapsed >= day_night {
            self.day_night_elapsed -= day_night;
            let text = if self.is_night { "Sunrise" } else { "Nightfall" };
            self.is_night = !self.is_night;
            report.day_night_changes.push(self.is_night);
            sink.notify(Effect::text_popup(text));
        }

        if self.frenzy_until.is_some_and(|until| self.elapsed >= until) {
            self.frenzy_until = None;
            report.frenzy_ended = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::events::{NullSink, RecordingSink};
    use crate::state::{ItemRequirement, ItemKind, Parcel};

    fn state_with_income(income: u64) -> GameState {
        let parcel = Parcel {
            id: "p1".into(),
            name: "Gardens".into(),
            description: String::new(),
            unlocked: true,
            cost_gold: 100,
            requirements: vec![ItemRequirement::single(ItemKind::Wood, 3)],
            income_per_cycle: income,
        };
        GameState::new(1, &GameConfig::new(), vec![parcel], Vec::new())
    }

    fn active_clock() -> EconomyClock {
        let mut clock = EconomyClock::new(EconomyConfig::default(), false);
        clock.set_active(true);
        clock
    }

    #[test]
    fn one_cycle_pays_once() {
        let mut state = state_with_income(5);
        let mut clock = active_clock();

        let report = clock.advance(Duration::from_millis(4_900), &mut state, &NullSink);
        assert_eq!(report.gold_earned, 0);

        let report = clock.advance(Duration::from_millis(100), &mut state, &NullSink);
        assert_eq!(report.gold_earned, 5);
        assert_eq!(state.player.gold, 105);
        assert_eq!(clock.income_progress(), 0);
    }

    #[test]
    fn frenzy_quadruples_accrual() {
        let mut normal = state_with_income(5);
        let mut clock = active_clock();
        let base = clock
            .advance(Duration::from_millis(5_000), &mut normal, &NullSink)
            .gold_earned;

        let mut boosted = state_with_income(5);
        let mut clock = active_clock();
        assert!(clock.trigger_frenzy());
        let report = clock.advance(Duration::from_millis(5_000), &mut boosted, &NullSink);

        assert_eq!(report.gold_earned, 4 * base);
        assert!(report.frenzy_ended);
        assert!(!clock.is_frenzy());
    }

    #[test]
    fn retrigger_does_not_extend_frenzy() {
        let mut state = state_with_income(0);
        let mut clock = active_clock();

        assert!(clock.trigger_frenzy());
        clock.advance(Duration::from_millis(3_000), &mut state, &NullSink);
        assert!(!clock.trigger_frenzy());

        clock.advance(Duration::from_millis(2_000), &mut state, &NullSink);
        assert!(!clock.is_frenzy());
    }

    #[test]
    fn inactive_clock_keeps_progress() {
        let mut state = state_with_income(5);
        let mut clock = active_clock();
        clock.advance(Duration::from_millis(2_500), &mut state, &NullSink);
        let progress = clock.income_progress();

        clock.set_active(false);
        let report = clock.advance(Duration::from_secs(60), &mut state, &NullSink);
        assert_eq!(report, EconomyReport::default());
        assert_eq!(clock.income_progress(), progress);

        clock.set_active(true);
        let report = clock.advance(Duration::from_millis(2_500), &mut state, &NullSink);
        assert_eq!(report.gold_earned, 5);
    }

    #[test]
    fn sub_tick_deltas_accumulate() {
        let mut state = state_with_income(5);
        let mut clock = active_clock();
        let mut earned = 0;
        for _ in 0..200 {
            earned += clock
                .advance(Duration::from_millis(25), &mut state, &NullSink)
                .gold_earned;
        }
        assert_eq!(earned, 5);
    }

    #[test]
    fn energy_regenerates_every_thirty_seconds_up_to_cap() {
        let mut state = state_with_income(0);
        state.player.energy = 48;
        let mut clock = active_clock();

        let report = clock.advance(Duration::from_secs(90), &mut state, &NullSink);
        assert_eq!(report.energy_gained, 2);
        assert_eq!(state.player.energy, 50);
    }

    #[test]
    fn day_night_toggles_with_popup() {
        let mut state = state_with_income(0);
        let sink = RecordingSink::new();
        let mut clock = active_clock();

        let report = clock.advance(Duration::from_secs(600), &mut state, &sink);
        assert_eq!(report.day_night_changes, vec![true, false]);
        let texts: Vec<_> = sink.effects().into_iter().filter_map(|e| e.text).collect();
        assert_eq!(texts, vec!["Nightfall".to_string(), "Sunrise".to_string()]);
    }
}
