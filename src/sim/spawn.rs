//! Procedural spawning
//!
//! The planner decides what pattern to place next from the current progress
//! and a seeded RNG; the scheduler decides when. Placement into the tracker
//! happens in the tick so plans can be inspected on their own.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::EntityKind;
use super::lane::{LANE_COUNT, Lane};
use super::ramp;
use crate::consts::TOKEN_SPACING;
use crate::tuning::Tuning;

/// A pattern chosen by the planner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnPlan {
    /// One obstacle in one lane
    Single { lane: Lane, kind: EntityKind },
    /// Low barriers in every lane except `open_lane`, side by side
    MultiBlock { open_lane: Lane },
    /// A straight line of tokens in one lane
    TokenRun { lane: Lane, count: u32 },
}

/// One entity to place: kind, lane and distance behind the spawn line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub kind: EntityKind,
    pub lane: Lane,
    pub trail: f32,
}

impl SpawnPlan {
    /// Expand the plan into individual placements
    pub fn placements(&self) -> Vec<Placement> {
        match *self {
            SpawnPlan::Single { lane, kind } => vec![Placement {
                kind,
                lane,
                trail: 0.0,
            }],
            SpawnPlan::MultiBlock { open_lane } => Lane::all()
                .into_iter()
                .filter(|&lane| lane != open_lane)
                .map(|lane| Placement {
                    kind: EntityKind::LowBarrier,
                    lane,
                    trail: 0.0,
                })
                .collect(),
            SpawnPlan::TokenRun { lane, count } => (0..count)
                .map(|i| Placement {
                    kind: EntityKind::Token,
                    lane,
                    trail: i as f32 * TOKEN_SPACING,
                })
                .collect(),
        }
    }

    pub fn is_obstacle(&self) -> bool {
        !matches!(self, SpawnPlan::TokenRun { .. })
    }
}

fn random_lane<R: Rng + ?Sized>(rng: &mut R) -> Lane {
    Lane::from_index(rng.random_range(0..LANE_COUNT as usize))
}

/// Choose the next pattern at progress `t`.
///
/// Draw order is fixed so a seed always yields the same sequence: the
/// obstacle roll, the multi-block roll (obstacles only, once unlocked), the
/// lane, then the obstacle type or token count.
pub fn plan_spawn<R: Rng + ?Sized>(rng: &mut R, t: f32, tuning: &Tuning) -> SpawnPlan {
    let t = t.clamp(0.0, 1.0);
    let roll: f32 = rng.random();

    if roll < ramp::obstacle_chance(t, tuning) {
        let multi = t > tuning.multi_block_min_progress
            && rng.random::<f32>() < ramp::multi_block_chance(t, tuning);
        if multi {
            return SpawnPlan::MultiBlock {
                open_lane: random_lane(rng),
            };
        }

        let lane = random_lane(rng);
        let kind = if rng.random::<f32>() < ramp::low_barrier_chance(t, tuning) {
            EntityKind::LowBarrier
        } else {
            EntityKind::OverheadBarrier
        };
        SpawnPlan::Single { lane, kind }
    } else {
        let lane = random_lane(rng);
        let count = rng.random_range(tuning.token_run_min..=tuning.token_run_max);
        SpawnPlan::TokenRun { lane, count }
    }
}

/// Recurring spawn timer
///
/// Each firing re-arms with an interval computed from the progress at that
/// moment, so cadence tightens as the run speeds up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnScheduler {
    interval_ms: f32,
    elapsed_ms: f32,
    active: bool,
}

impl SpawnScheduler {
    /// Armed with the base interval but not yet counting
    pub fn primed(tuning: &Tuning) -> Self {
        Self {
            interval_ms: tuning.spawn_interval_base_ms,
            elapsed_ms: 0.0,
            active: false,
        }
    }

    pub fn start(&mut self) {
        self.active = true;
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn interval_ms(&self) -> f32 {
        self.interval_ms
    }

    /// Milliseconds until the next firing
    pub fn remaining_ms(&self) -> f32 {
        (self.interval_ms - self.elapsed_ms).max(0.0)
    }

    pub fn advance(&mut self, dt_ms: f32) {
        if self.active {
            self.elapsed_ms += dt_ms;
        }
    }

    /// Consume one due firing, if any
    pub fn take_due(&mut self) -> bool {
        if self.active && self.elapsed_ms >= self.interval_ms {
            self.elapsed_ms -= self.interval_ms;
            true
        } else {
            false
        }
    }

    /// Set the interval for the next firing
    pub fn rearm(&mut self, interval_ms: f32) {
        self.interval_ms = interval_ms.max(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_multi_block_leaves_one_lane_open() {
        for open in Lane::all() {
            let placements = SpawnPlan::MultiBlock { open_lane: open }.placements();
            assert_eq!(placements.len(), 2);
            assert!(placements.iter().all(|p| p.lane != open));
            assert!(placements.iter().all(|p| p.kind == EntityKind::LowBarrier));
            assert!(placements.iter().all(|p| p.trail == 0.0));
        }
    }

    #[test]
    fn test_token_run_spacing() {
        let placements = SpawnPlan::TokenRun {
            lane: Lane::LEFT,
            count: 4,
        }
        .placements();
        let trails: Vec<f32> = placements.iter().map(|p| p.trail).collect();
        assert_eq!(trails, vec![0.0, 90.0, 180.0, 270.0]);
        assert!(placements.iter().all(|p| p.lane == Lane::LEFT));
    }

    #[test]
    fn test_no_multi_block_before_unlock() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..2000 {
            let plan = plan_spawn(&mut rng, 0.35, &tuning);
            assert!(!matches!(plan, SpawnPlan::MultiBlock { .. }));
        }
    }

    #[test]
    fn test_multi_block_appears_late() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let multi = (0..2000)
            .filter(|_| matches!(plan_spawn(&mut rng, 1.0, &tuning), SpawnPlan::MultiBlock { .. }))
            .count();
        // 0.82 * 0.22 ≈ 18% of spawns
        assert!(multi > 200 && multi < 520, "got {multi}");
    }

    #[test]
    fn test_obstacle_share_rises_with_progress() {
        let tuning = Tuning::default();
        let share = |t: f32| {
            let mut rng = Pcg32::seed_from_u64(99);
            (0..4000)
                .filter(|_| plan_spawn(&mut rng, t, &tuning).is_obstacle())
                .count()
        };
        let early = share(0.0);
        let late = share(1.0);
        assert!(late > early);
        assert!(early > 1900 && early < 2500, "early {early}");
        assert!(late > 3050 && late < 3500, "late {late}");
    }

    #[test]
    fn test_overhead_share_rises_with_progress() {
        let tuning = Tuning {
            obstacle_chance_start: 1.0,
            obstacle_chance_end: 1.0,
            multi_block_chance: 0.0,
            ..Default::default()
        };
        let overhead = |t: f32| {
            let mut rng = Pcg32::seed_from_u64(3);
            (0..4000)
                .filter(|_| {
                    matches!(
                        plan_spawn(&mut rng, t, &tuning),
                        SpawnPlan::Single {
                            kind: EntityKind::OverheadBarrier,
                            ..
                        }
                    )
                })
                .count()
        };
        assert!(overhead(1.0) > overhead(0.0));
    }

    #[test]
    fn test_same_seed_same_plans() {
        let tuning = Tuning::default();
        let mut a = Pcg32::seed_from_u64(2024);
        let mut b = Pcg32::seed_from_u64(2024);
        for i in 0..200 {
            let t = (i as f32 / 200.0).min(1.0);
            assert_eq!(plan_spawn(&mut a, t, &tuning), plan_spawn(&mut b, t, &tuning));
        }
    }

    #[test]
    fn test_scheduler_fires_and_rearms() {
        let tuning = Tuning::default();
        let mut scheduler = SpawnScheduler::primed(&tuning);

        // Primed but idle: time does not count
        scheduler.advance(5000.0);
        assert!(!scheduler.take_due());

        scheduler.start();
        scheduler.advance(1199.0);
        assert!(!scheduler.take_due());
        scheduler.advance(1.0);
        assert!(scheduler.take_due());
        assert!(!scheduler.take_due());

        scheduler.rearm(600.0);
        assert_eq!(scheduler.remaining_ms(), 600.0);
        scheduler.advance(1300.0);
        assert!(scheduler.take_due());
        assert!(scheduler.take_due());
        assert!(!scheduler.take_due());

        scheduler.stop();
        scheduler.advance(10_000.0);
        assert!(!scheduler.take_due());
    }

    proptest! {
        #[test]
        fn prop_plans_are_solvable(seed in any::<u64>(), t in 0.0f32..=1.0) {
            let tuning = Tuning::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let plan = plan_spawn(&mut rng, t, &tuning);
            let placements = plan.placements();
            match plan {
                SpawnPlan::MultiBlock { open_lane } => {
                    prop_assert!(placements.iter().all(|p| p.lane != open_lane));
                    prop_assert_eq!(placements.len(), 2);
                }
                SpawnPlan::Single { .. } => prop_assert_eq!(placements.len(), 1),
                SpawnPlan::TokenRun { count, .. } => {
                    prop_assert!((3..=6).contains(&count));
                    prop_assert_eq!(placements.len(), count as usize);
                }
            }
            // Obstacles never fill all three lanes at one forward position
            let blocked = placements.iter().filter(|p| p.kind.is_obstacle()).count();
            prop_assert!(blocked < LANE_COUNT as usize);
        }
    }
}
