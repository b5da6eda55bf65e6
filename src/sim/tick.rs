//! Fixed timestep simulation tick
//!
//! Phases run in a fixed order: strike resolution, gear decay, effect decay,
//! dot advancement, spawning. Strikes are resolved against pre-move positions
//! and before the gear decays, so a hit can cancel the gear in the same tick.

use rand::Rng;

use super::dot::{Direction, DotId, DotStep};
use super::state::{Effect, Simulation};
use crate::consts::{SPAWN_OFFSET, TRACK_LEN};

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Dots destroyed by a hit
    pub hits: u64,
    pub missed: bool,
    /// Dots that reached their sink
    pub lost: u64,
    pub spawned: Option<DotId>,
}

impl TickOutcome {
    /// Dots resolved this tick (the amount the retired count grew by)
    pub fn resolved(&self) -> u64 {
        self.hits + u64::from(self.missed) + self.lost
    }
}

/// Advance the simulation by one tick
pub fn tick(state: &mut Simulation) -> TickOutcome {
    let mut outcome = TickOutcome::default();
    if state.finished {
        return outcome;
    }
    state.time_ticks += 1;

    resolve_strike(state, &mut outcome);
    decay_gear(state);
    decay_effect(state);
    advance_dots(state, &mut outcome);
    outcome.spawned = maybe_spawn(state);

    outcome
}

/// Check the cell the gear points at for a hit, or record a miss on the
/// gear's last active tick.
fn resolve_strike(state: &mut Simulation, outcome: &mut TickOutcome) {
    let Some(dir) = state.actor.gear else {
        return;
    };
    // Off-track neighbours count as empty
    let target = dir.step(state.actor.pos);
    let struck = target.map(|cell| state.index.take(cell)).unwrap_or_default();

    if !struck.is_empty() {
        for id in &struck {
            if state.dots.remove(id).is_none() {
                panic!("dot {id} indexed at {target:?} is not alive");
            }
        }
        let count = struck.len() as u64;
        log::debug!("Hit {:?}: {} dot(s) at {:?}", dir, count, target);

        state.stats.times_hit += count;
        state.actor.effect = Some(Effect::Hit(dir));
        state.actor.effect_countdown = state.settings.effect_speed;
        state.actor.gear = None;
        state.actor.gear_reset_countdown = 0;
        outcome.hits = count;
    } else if state.actor.gear_reset_countdown == 1 {
        log::debug!("Miss {:?}", dir);

        state.stats.times_missed += 1;
        state.actor.effect = Some(Effect::Miss(dir));
        state.actor.effect_countdown = state.settings.effect_speed;
        outcome.missed = true;
    }
}

fn decay_gear(state: &mut Simulation) {
    let actor = &mut state.actor;
    if actor.gear_reset_countdown == 0 {
        actor.gear = None;
    } else {
        actor.gear_reset_countdown -= 1;
    }
}

fn decay_effect(state: &mut Simulation) {
    let actor = &mut state.actor;
    if actor.effect_countdown == 0 {
        actor.effect = None;
    } else {
        actor.effect_countdown -= 1;
    }
}

fn advance_dots(state: &mut Simulation, outcome: &mut TickOutcome) {
    let mut lost = Vec::new();

    for dot in state.dots.values_mut() {
        match dot.advance() {
            DotStep::Waiting => {}
            DotStep::Moved { from, to } => state.index.relocate(dot.id, from, to),
            DotStep::ReachedSink { from, .. } => {
                state.index.remove(from, dot.id);
                lost.push(dot.id);
            }
        }
    }

    outcome.lost = lost.len() as u64;
    state.stats.dots_lost += outcome.lost;
    for id in lost {
        state.dots.remove(&id);
        log::debug!("Dot {} reached its sink", id);
    }
}

/// Roll for a spawn on each side; never more than one dot per tick.
fn maybe_spawn(state: &mut Simulation) -> Option<DotId> {
    let prob = state.settings.dot_probability;
    let mut from_left = state.rng.random_bool(prob);
    let mut from_right = state.rng.random_bool(prob);
    if from_left && from_right {
        if state.rng.random::<bool>() {
            from_left = false;
        } else {
            from_right = false;
        }
    }

    let sink = state.actor.pos;
    let (momentum, pos) = if from_left {
        (Direction::Right, sink.checked_sub(SPAWN_OFFSET))
    } else if from_right {
        (Direction::Left, Some(sink + SPAWN_OFFSET).filter(|&p| p < TRACK_LEN))
    } else {
        return None;
    };

    let Some(pos) = pos else {
        log::warn!(
            "Dropped {:?}-moving spawn: actor at {} puts it off the track",
            momentum,
            sink
        );
        return None;
    };

    let speed = state.settings.dot_speed;
    let id = state.insert_dot(momentum, pos, sink, speed);
    state.stats.dots_spawned += 1;
    log::debug!("Spawned dot {} at {} heading {:?}", id, pos, momentum);
    Some(id)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::consts::*;
    use crate::game::Game;
    use crate::settings::Settings;
    use crate::sim::Input;

    /// A simulation that never spawns on its own
    fn quiet_sim() -> Simulation {
        let settings = Settings {
            dot_probability: 0.0,
            ..Default::default()
        };
        Simulation::with_settings(settings, 12345)
    }

    #[test]
    fn test_hit_right() {
        let mut sim = quiet_sim();
        let id = sim.insert_dot(Direction::Left, 40, 39, 7);
        sim.move_right();

        let outcome = tick(&mut sim);
        assert_eq!(outcome.hits, 1);
        assert_eq!(sim.stats.times_hit, 1);
        assert!(sim.dot(id).is_none());
        assert!(sim.dots_at(40).is_empty());
        assert_eq!(sim.actor.gear, None);
        assert_eq!(sim.actor.gear_reset_countdown, 0);
        assert_eq!(sim.actor.effect, Some(Effect::Hit(Direction::Right)));
        assert_eq!(sim.get_board()[40], HIT_GLYPH);
    }

    #[test]
    fn test_hit_left_counts_every_dot_in_cell() {
        let mut sim = quiet_sim();
        sim.insert_dot(Direction::Right, 38, 39, 4);
        sim.insert_dot(Direction::Right, 38, 39, 9);
        sim.move_left();

        let outcome = tick(&mut sim);
        assert_eq!(outcome.hits, 2);
        assert_eq!(sim.stats.times_hit, 2);
        assert_eq!(sim.dot_count(), 0);
        assert_eq!(sim.stats.dots_lost, 0);
        assert!(sim.index_consistent());
    }

    #[test]
    fn test_miss_recorded_once_per_activation() {
        let mut sim = quiet_sim();
        sim.move_right();

        let mut misses = Vec::new();
        for _ in 0..(PLAYER_SPEED + 4) {
            misses.push(tick(&mut sim).missed);
        }
        assert_eq!(sim.stats.times_missed, 1);
        // The miss lands on the tick the countdown reads 1
        assert_eq!(misses.iter().position(|&m| m), Some(PLAYER_SPEED as usize - 1));
        assert_eq!(sim.actor.gear, None);
        assert_eq!(sim.actor.effect, Some(Effect::Miss(Direction::Right)));
    }

    #[test]
    fn test_miss_does_not_force_neutral() {
        let mut sim = quiet_sim();
        sim.move_left();
        sim.actor.gear_reset_countdown = 1;

        tick(&mut sim);
        assert_eq!(sim.stats.times_missed, 1);
        // Gear survives the miss tick and decays on the next one
        assert_eq!(sim.actor.gear, Some(Direction::Left));
        assert_eq!(sim.actor.gear_reset_countdown, 0);

        tick(&mut sim);
        assert_eq!(sim.actor.gear, None);
        assert_eq!(sim.stats.times_missed, 1);
    }

    #[test]
    fn test_effect_decays() {
        let mut sim = quiet_sim();
        sim.move_left();
        sim.actor.gear_reset_countdown = 1;
        tick(&mut sim);
        assert!(sim.actor.effect.is_some());

        for _ in 0..EFFECT_SPEED {
            tick(&mut sim);
        }
        assert_eq!(sim.actor.effect, None);
    }

    #[test]
    fn test_dot_lost_at_sink() {
        let mut sim = quiet_sim();
        let id = sim.insert_dot(Direction::Right, 10, 39, 4);

        for _ in 0..4 {
            tick(&mut sim);
        }
        assert_eq!(sim.dot(id).map(|d| d.pos), Some(11));

        let total = (39 - 10) * 4;
        for _ in 4..(total - 1) {
            let outcome = tick(&mut sim);
            assert_eq!(outcome.lost, 0);
        }
        assert_eq!(sim.dot(id).map(|d| d.pos), Some(38));

        let outcome = tick(&mut sim);
        assert_eq!(outcome.lost, 1);
        assert_eq!(sim.stats.dots_lost, 1);
        assert!(sim.dot(id).is_none());
        assert!(sim.dots_at(39).is_empty());

        tick(&mut sim);
        assert_eq!(sim.stats.dots_lost, 1);
    }

    #[test]
    fn test_collision_uses_pre_move_positions() {
        let mut sim = quiet_sim();
        // Due to move this tick from 41 to 40, but the strike checks first
        sim.insert_dot(Direction::Left, 41, 39, 1);
        sim.move_right();

        let outcome = tick(&mut sim);
        assert_eq!(outcome.hits, 0);
        assert_eq!(sim.dots_at(40).len(), 1);

        // Countdown reads 1 now and the cell is occupied: a hit, not a miss
        let outcome = tick(&mut sim);
        assert_eq!(outcome.hits, 1);
        assert_eq!(sim.stats.times_missed, 0);
    }

    #[test]
    fn test_spawn_positions() {
        let settings = Settings {
            dot_probability: 1.0,
            ..Default::default()
        };
        let mut sim = Simulation::with_settings(settings, 5);
        let id = tick(&mut sim).spawned.unwrap();
        let dot = sim.dot(id).unwrap();
        assert_eq!(dot.sink(), 39);
        match dot.momentum {
            Direction::Right => assert_eq!(dot.pos, 0),
            Direction::Left => assert_eq!(dot.pos, 78),
        }
        assert_eq!(dot.ticks_until_move, DOT_SPEED);
        assert_eq!(sim.stats.dots_spawned, 1);
    }

    #[test]
    fn test_certain_spawns_pick_both_sides() {
        let settings = Settings {
            dot_probability: 1.0,
            ..Default::default()
        };
        let mut sim = Simulation::with_settings(settings, 77);
        let mut seen_left = false;
        let mut seen_right = false;
        for _ in 0..64 {
            let id = tick(&mut sim).spawned.unwrap();
            match sim.dot(id).unwrap().momentum {
                Direction::Right => seen_left = true,
                Direction::Left => seen_right = true,
            }
        }
        assert!(seen_left && seen_right);
        assert_eq!(sim.stats.dots_spawned, 64);
    }

    #[test]
    fn test_off_track_spawn_dropped() {
        let settings = Settings {
            dot_probability: 1.0,
            ..Default::default()
        };
        let mut sim = Simulation::with_settings(settings, 3);
        // 45 + 39 is past the end of the track, so only left spawns land
        sim.actor.pos = 45;
        for _ in 0..32 {
            if let Some(id) = tick(&mut sim).spawned {
                assert_eq!(sim.dot(id).unwrap().pos, 6);
            }
        }
        assert_eq!(sim.stats.dots_spawned, sim.dot_count() as u64 + sim.stats.dots_lost);
        assert!(sim.index_consistent());
    }

    #[test]
    fn test_no_ticks_after_quit() {
        let mut sim = quiet_sim();
        sim.insert_dot(Direction::Right, 10, 39, 1);
        sim.quit();
        let outcome = tick(&mut sim);
        assert_eq!(outcome, TickOutcome::default());
        assert_eq!(sim.time_ticks, 0);
        assert_eq!(sim.dot(1).map(|d| d.pos), Some(10));
    }

    #[test]
    fn test_determinism() {
        let inputs = [Input::None, Input::Right, Input::None, Input::Left];
        let settings = Settings {
            dot_probability: 0.2,
            ..Default::default()
        };
        let mut sim1 = Simulation::with_settings(settings.clone(), 99999);
        let mut sim2 = Simulation::with_settings(settings, 99999);

        for i in 0..500 {
            let input = inputs[i % inputs.len()];
            sim1.apply_input(input);
            sim2.apply_input(input);
            assert_eq!(tick(&mut sim1), tick(&mut sim2));
        }
        assert_eq!(sim1.get_board(), sim2.get_board());
        assert_eq!(sim1.stats, sim2.stats);
    }

    fn input_strategy() -> impl Strategy<Value = Input> {
        prop_oneof![
            3 => Just(Input::None),
            1 => Just(Input::Left),
            1 => Just(Input::Right),
        ]
    }

    proptest! {
        #[test]
        fn prop_invariants_hold_every_tick(
            seed in any::<u64>(),
            prob in 0.0f64..=1.0,
            inputs in prop::collection::vec(input_strategy(), 1..400),
        ) {
            let settings = Settings { dot_probability: prob, ..Default::default() };
            let mut sim = Simulation::with_settings(settings, seed);
            let mut sinks = std::collections::BTreeMap::new();
            let mut retired = 0;

            for input in inputs {
                sim.apply_input(input);
                let gear_before = sim.actor.gear;
                let outcome = tick(&mut sim);

                prop_assert!(sim.index_consistent());

                // Sinks never change once assigned
                for dot in sim.dots() {
                    let sink = *sinks.entry(dot.id).or_insert(dot.sink());
                    prop_assert_eq!(sink, dot.sink());
                }

                // Hits cancel the gear; misses leave it to decay
                if outcome.hits > 0 {
                    prop_assert_eq!(sim.actor.gear, None);
                    prop_assert_eq!(sim.actor.gear_reset_countdown, 0);
                }
                if outcome.missed {
                    prop_assert_eq!(sim.actor.gear, gear_before);
                }
                prop_assert!(!(outcome.hits > 0 && outcome.missed));

                let now = sim.stats.retired();
                prop_assert!(now >= retired);
                prop_assert_eq!(now - retired, outcome.resolved());
                retired = now;

                prop_assert_eq!(
                    sim.stats.dots_spawned,
                    sim.dot_count() as u64 + sim.stats.times_hit + sim.stats.dots_lost
                );
            }
        }
    }
}
