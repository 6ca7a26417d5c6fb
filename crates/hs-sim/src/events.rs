//! Random cooling events.
//!
//! A disturbance (a lid lifted, cold water splashed in) that removes a
//! random total amount of temperature over a random duration, following a
//! randomized per-second profile. All draws come from the caller's RNG.

use crate::error::{SimError, SimResult};
use rand::Rng;
use rand::seq::SliceRandom;
use rand_distr::{ChiSquared, Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

/// Chance that an event starts during one simulated second.
pub const TRIGGER_PROBABILITY_PER_S: f64 = 1.0 / 300.0;
/// Smallest total drop an event can have (°C).
pub const MIN_TOTAL_DROP_C: f64 = 0.01;
/// Largest total drop an event can have (°C).
pub const MAX_TOTAL_DROP_C: f64 = 50.0;
/// Floor of every per-second profile value (°C).
pub const MIN_STEP_DROP_C: f64 = 0.01;
/// Shortest event duration regardless of configuration (s).
pub const MIN_DURATION_S: f64 = 1.0;

const CHI_SQUARED_DOF: f64 = 3.0;
const DURATION_REL_STD: f64 = 0.25;
const DURATION_RESAMPLE_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomEventConfig {
    /// Mean total temperature drop per event (°C)
    pub total_drop_mean_c: f64,
    /// Mean event duration (s)
    pub duration_mean_s: f64,
    /// Lower duration bound (s), raised to 1 s if smaller
    pub duration_min_s: f64,
    /// Upper duration bound (s)
    pub duration_max_s: f64,
    /// Relative spread of the per-second profile (std / mean)
    pub profile_spread: f64,
}

impl Default for RandomEventConfig {
    fn default() -> Self {
        Self {
            total_drop_mean_c: 5.0,
            duration_mean_s: 5.0,
            duration_min_s: 1.0,
            duration_max_s: 60.0,
            profile_spread: 0.5,
        }
    }
}

impl RandomEventConfig {
    pub fn validate(&self) -> SimResult<()> {
        let finite = [
            self.total_drop_mean_c,
            self.duration_mean_s,
            self.duration_min_s,
            self.duration_max_s,
            self.profile_spread,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(SimError::NonPhysical {
                what: "random event parameters must be finite",
            });
        }
        if self.duration_mean_s <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "random event mean duration must be positive",
            });
        }
        let (lo, hi) = self.duration_bounds();
        if hi < lo {
            return Err(SimError::InvalidArg {
                what: "random event maximum duration is below the minimum",
            });
        }
        if self.profile_spread < 0.0 {
            return Err(SimError::InvalidArg {
                what: "random event profile spread must be non-negative",
            });
        }
        Ok(())
    }

    /// Effective duration range: the lower bound is never below 1 s.
    pub fn duration_bounds(&self) -> (f64, f64) {
        (self.duration_min_s.max(MIN_DURATION_S), self.duration_max_s)
    }
}

/// History entry for one started event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    pub start_time_s: f64,
    /// Fluid temperature when the event started (°C)
    pub initial_temp_c: f64,
    pub total_drop_c: f64,
    pub duration_s: f64,
    /// Per-second drop magnitudes, in application order
    pub profile_c: Vec<f64>,
}

/// Read-only view of the event in progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActiveEventState {
    pub start_time_s: f64,
    pub duration_s: f64,
    pub elapsed_s: f64,
    pub remaining_s: f64,
    pub total_drop_c: f64,
    pub average_drop_per_s: f64,
}

#[derive(Debug, Clone)]
struct ActiveEvent {
    start_time_s: f64,
    duration_s: f64,
    total_drop_c: f64,
    profile: Vec<f64>,
    remaining_s: f64,
}

#[derive(Debug, Clone)]
pub struct RandomEventGenerator {
    config: RandomEventConfig,
    chi_squared: ChiSquared<f64>,
    active: Option<ActiveEvent>,
    history: Vec<EventRecord>,
}

impl RandomEventGenerator {
    pub fn new(config: RandomEventConfig) -> SimResult<Self> {
        config.validate()?;
        let chi_squared = ChiSquared::new(CHI_SQUARED_DOF).map_err(|e| SimError::Backend {
            message: e.to_string(),
        })?;
        Ok(Self {
            config,
            chi_squared,
            active: None,
            history: Vec::new(),
        })
    }

    pub fn config(&self) -> &RandomEventConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Bernoulli draw with probability 1/300.
    ///
    /// Always false while an event is active; no draw is consumed then.
    pub fn try_trigger<R: Rng>(&self, _time_s: f64, rng: &mut R) -> bool {
        if self.active.is_some() {
            return false;
        }
        rng.random::<f64>() < TRIGGER_PROBABILITY_PER_S
    }

    /// Start a new event at `time_s`, replacing any event in progress.
    ///
    /// Returns `(total_drop_c, duration_s)`.
    pub fn start_event<R: Rng>(
        &mut self,
        time_s: f64,
        current_temp_c: f64,
        rng: &mut R,
    ) -> (f64, f64) {
        let total_drop_c = sample_total_drop(&self.chi_squared, self.config.total_drop_mean_c, rng);
        let duration_s = sample_duration(&self.config, rng);
        let profile = sample_profile(total_drop_c, duration_s, self.config.profile_spread, rng);

        self.history.push(EventRecord {
            start_time_s: time_s,
            initial_temp_c: current_temp_c,
            total_drop_c,
            duration_s,
            profile_c: profile.clone(),
        });
        self.active = Some(ActiveEvent {
            start_time_s: time_s,
            duration_s,
            total_drop_c,
            profile,
            remaining_s: duration_s,
        });
        (total_drop_c, duration_s)
    }

    /// Temperature drop contributed during the step ending at `time_s`.
    ///
    /// Indexes the profile by whole elapsed seconds. The event is cleared,
    /// and 0 returned, once elapsed runs past the last profile entry, so the
    /// applied drops sum to `total_drop_c` and a fractional tail of the
    /// duration contributes nothing.
    pub fn process_event(&mut self, time_s: f64, time_step_s: f64) -> f64 {
        let Some(active) = self.active.as_mut() else {
            return 0.0;
        };
        let elapsed = (time_s - active.start_time_s).max(0.0);
        let index = elapsed.floor() as usize;
        let Some(per_second) = active.profile.get(index).copied() else {
            self.active = None;
            return 0.0;
        };
        active.remaining_s = (active.duration_s - elapsed).max(0.0);
        per_second * time_step_s
    }

    pub fn active_state(&self) -> Option<ActiveEventState> {
        self.active.as_ref().map(|a| ActiveEventState {
            start_time_s: a.start_time_s,
            duration_s: a.duration_s,
            elapsed_s: a.duration_s - a.remaining_s,
            remaining_s: a.remaining_s,
            total_drop_c: a.total_drop_c,
            average_drop_per_s: a.total_drop_c / a.duration_s,
        })
    }

    pub fn history(&self) -> &[EventRecord] {
        &self.history
    }

    pub fn reset(&mut self) {
        self.active = None;
        self.history.clear();
    }
}

/// Chi-squared(3) scaled to the configured mean, clamped to [0.01, 50].
///
/// A non-positive mean yields the minimum drop.
pub fn sample_total_drop<R: Rng>(chi_squared: &ChiSquared<f64>, mean_c: f64, rng: &mut R) -> f64 {
    if mean_c <= 0.0 {
        return MIN_TOTAL_DROP_C;
    }
    let x: f64 = chi_squared.sample(rng);
    (x * mean_c / CHI_SQUARED_DOF).clamp(MIN_TOTAL_DROP_C, MAX_TOTAL_DROP_C)
}

/// Normal(mean, mean/4) resampled until it lands inside the duration bounds.
///
/// Falls back to the mean clamped into the bounds.
pub fn sample_duration<R: Rng>(config: &RandomEventConfig, rng: &mut R) -> f64 {
    let (lo, hi) = config.duration_bounds();
    let mean = config.duration_mean_s;
    let std = mean * DURATION_REL_STD;
    for _ in 0..DURATION_RESAMPLE_LIMIT {
        let z: f64 = StandardNormal.sample(rng);
        let d = mean + std * z;
        if (lo..=hi).contains(&d) {
            return d;
        }
    }
    mean.clamp(lo, hi)
}

/// Per-second drop magnitudes for an event of `floor(duration)` seconds.
///
/// Values are drawn around `total / n` with relative `spread`, floored at
/// 0.01 °C, rescaled so they sum to `total`, then shuffled.
pub fn sample_profile<R: Rng>(total_c: f64, duration_s: f64, spread: f64, rng: &mut R) -> Vec<f64> {
    let n = (duration_s.floor() as usize).max(1);
    let std = total_c / n as f64 * spread;
    // keep the draw mostly positive before flooring
    let mean = (total_c / n as f64).max(3.0 * std);

    let mut profile: Vec<f64> = (0..n)
        .map(|_| {
            let z: f64 = StandardNormal.sample(rng);
            (mean + std * z).max(MIN_STEP_DROP_C)
        })
        .collect();
    rescale_to_total(&mut profile, total_c);
    profile.shuffle(rng);
    profile
}

/// Rescale the part above the floor so the profile sums to `total_c`.
///
/// Every value stays at or above `MIN_STEP_DROP_C` unless the total is too
/// small to give each second the floor, in which case the total is spread
/// evenly.
fn rescale_to_total(profile: &mut [f64], total_c: f64) {
    let n = profile.len() as f64;
    if n == 0.0 {
        return;
    }
    let floor_total = MIN_STEP_DROP_C * n;
    if total_c < floor_total {
        profile.iter_mut().for_each(|v| *v = total_c / n);
        return;
    }
    let target_excess = total_c - floor_total;
    let excess: f64 = profile.iter().map(|v| v - MIN_STEP_DROP_C).sum();
    if excess <= 0.0 {
        profile
            .iter_mut()
            .for_each(|v| *v = MIN_STEP_DROP_C + target_excess / n);
        return;
    }
    let factor = target_excess / excess;
    for v in profile.iter_mut() {
        *v = MIN_STEP_DROP_C + (*v - MIN_STEP_DROP_C) * factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimRng;
    use approx::assert_relative_eq;

    fn generator() -> RandomEventGenerator {
        RandomEventGenerator::new(RandomEventConfig::default()).unwrap()
    }

    #[test]
    fn config_validation() {
        assert!(RandomEventConfig::default().validate().is_ok());
        let bad = RandomEventConfig {
            duration_min_s: 10.0,
            duration_max_s: 5.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let bad = RandomEventConfig {
            duration_mean_s: 0.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        // minimum below 1 s is raised, so max 0.5 is invalid
        let bad = RandomEventConfig {
            duration_min_s: 0.0,
            duration_max_s: 0.5,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn no_trigger_while_active() {
        let mut rng = SimRng::from_seed_u64(3);
        let mut g = generator();
        g.start_event(10.0, 50.0, &mut rng.0);
        for t in 11..1000 {
            assert!(!g.try_trigger(t as f64, &mut rng.0));
        }
    }

    #[test]
    fn trigger_rate_is_about_one_in_300() {
        let mut rng = SimRng::from_seed_u64(11);
        let g = generator();
        let hits = (0..300_000)
            .filter(|t| g.try_trigger(*t as f64, &mut rng.0))
            .count();
        // expected 1000, generous band
        assert!((800..1200).contains(&hits), "hits = {hits}");
    }

    #[test]
    fn event_applies_its_total_then_ends() {
        let mut rng = SimRng::from_seed_u64(5);
        let mut g = generator();
        let (total, duration) = g.start_event(100.0, 50.0, &mut rng.0);
        assert!(g.is_active());

        let mut applied = 0.0;
        let mut t = 100.0;
        loop {
            let drop = g.process_event(t, 1.0);
            if !g.is_active() {
                assert_eq!(drop, 0.0);
                break;
            }
            applied += drop;
            t += 1.0;
        }
        assert_relative_eq!(t - 100.0, duration.floor());
        assert!((applied - total).abs() < 1e-9);
        assert_eq!(g.process_event(t + 1.0, 1.0), 0.0);
    }

    #[test]
    fn short_events_apply_exactly_their_total() {
        let mut g = generator();
        for seed in 0..200 {
            let mut rng = SimRng::from_seed_u64(seed);
            let start = seed as f64 * 100.0;
            let (total, _) = g.start_event(start, 50.0, &mut rng.0);
            let mut applied = 0.0;
            let mut t = start;
            while g.is_active() {
                applied += g.process_event(t, 1.0);
                t += 1.0;
            }
            assert!(
                (applied - total).abs() < 1e-9,
                "seed {seed}: total {total} applied {applied}"
            );
        }
    }

    #[test]
    fn half_second_steps_apply_the_same_total() {
        let mut rng = SimRng::from_seed_u64(21);
        let mut g = generator();
        let (total, _) = g.start_event(0.0, 50.0, &mut rng.0);
        let mut applied = 0.0;
        let mut t = 0.0;
        while g.is_active() {
            applied += g.process_event(t, 0.5);
            t += 0.5;
        }
        assert!((applied - total).abs() < 1e-9);
    }

    #[test]
    fn inactive_generator_contributes_nothing() {
        let mut g = generator();
        assert_eq!(g.process_event(5.0, 1.0), 0.0);
        assert!(g.active_state().is_none());
    }

    #[test]
    fn active_state_tracks_progress() {
        let mut rng = SimRng::from_seed_u64(9);
        let mut g = generator();
        let (total, duration) = g.start_event(0.0, 40.0, &mut rng.0);
        g.process_event(0.5, 0.5);
        let state = g.active_state().unwrap();
        assert_relative_eq!(state.elapsed_s, 0.5);
        assert_relative_eq!(state.remaining_s, duration - 0.5);
        assert_relative_eq!(state.average_drop_per_s, total / duration);
    }

    #[test]
    fn zero_mean_gives_minimum_drop() {
        let mut rng = SimRng::from_seed_u64(1);
        let mut g = RandomEventGenerator::new(RandomEventConfig {
            total_drop_mean_c: 0.0,
            ..Default::default()
        })
        .unwrap();
        let (total, _) = g.start_event(0.0, 30.0, &mut rng.0);
        assert_relative_eq!(total, MIN_TOTAL_DROP_C);
        let sum: f64 = g.history()[0].profile_c.iter().sum();
        assert_relative_eq!(sum, MIN_TOTAL_DROP_C, epsilon = 1e-12);
    }

    #[test]
    fn rescale_keeps_floor_and_sum() {
        let mut profile = vec![0.01, 0.01, 3.0, 0.5];
        rescale_to_total(&mut profile, 2.0);
        assert_relative_eq!(profile.iter().sum::<f64>(), 2.0, epsilon = 1e-12);
        assert!(profile.iter().all(|v| *v >= MIN_STEP_DROP_C - 1e-12));
    }

    #[test]
    fn rescale_all_floored_spreads_evenly() {
        let mut profile = vec![0.01; 4];
        rescale_to_total(&mut profile, 1.0);
        for v in &profile {
            assert_relative_eq!(*v, 0.25, epsilon = 1e-12);
        }
    }

    #[test]
    fn history_survives_until_reset() {
        let mut rng = SimRng::from_seed_u64(2);
        let mut g = generator();
        g.start_event(1.0, 20.0, &mut rng.0);
        g.start_event(50.0, 25.0, &mut rng.0);
        assert_eq!(g.history().len(), 2);
        g.reset();
        assert!(g.history().is_empty());
        assert!(!g.is_active());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn total_drop_is_bounded(seed in any::<u64>(), mean in -5.0f64..100.0) {
                let mut rng = SimRng::from_seed_u64(seed);
                let chi = ChiSquared::new(CHI_SQUARED_DOF).unwrap();
                let total = sample_total_drop(&chi, mean, &mut rng.0);
                prop_assert!((MIN_TOTAL_DROP_C..=MAX_TOTAL_DROP_C).contains(&total));
            }

            #[test]
            fn duration_is_bounded(
                seed in any::<u64>(),
                mean in 0.5f64..100.0,
                min in 0.0f64..20.0,
                span in 0.0f64..60.0,
            ) {
                let config = RandomEventConfig {
                    duration_mean_s: mean,
                    duration_min_s: min,
                    duration_max_s: min.max(MIN_DURATION_S) + span,
                    ..Default::default()
                };
                let mut rng = SimRng::from_seed_u64(seed);
                let d = sample_duration(&config, &mut rng.0);
                let (lo, hi) = config.duration_bounds();
                prop_assert!(d >= lo && d <= hi);
                prop_assert!(d >= min);
            }

            #[test]
            fn profile_sums_to_total(
                seed in any::<u64>(),
                total in 0.01f64..50.0,
                duration in 1.0f64..60.0,
                spread in 0.0f64..2.0,
            ) {
                let mut rng = SimRng::from_seed_u64(seed);
                let profile = sample_profile(total, duration, spread, &mut rng.0);
                prop_assert_eq!(profile.len(), duration.floor() as usize);
                let sum: f64 = profile.iter().sum();
                prop_assert!((sum - total).abs() < 1e-9);
                if total >= MIN_STEP_DROP_C * profile.len() as f64 {
                    prop_assert!(profile.iter().all(|v| *v >= MIN_STEP_DROP_C - 1e-12));
                }
            }
        }
    }
}
