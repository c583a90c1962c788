//! Spawn scheduling and placement
//!
//! Obstacles and collectibles each come from a [`SpawnTimer`], an explicit
//! task the session starts, suspends, resumes and stops. Placement picks a
//! subtype and a lane offset; the session inserts the entity at the field's
//! right edge.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::FieldGeometry;
use super::state::{CollectibleKind, ObstacleKind};
use crate::tuning::{Schedule, Tuning};

/// Upper bound on firings per poll; a larger backlog is dropped
const MAX_FIRINGS_PER_POLL: u32 = 4;

/// Timer lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerState {
    Stopped,
    Armed,
    Suspended,
}

/// A repeating spawn timer driven by elapsed wall-clock time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnTimer {
    pub schedule: Schedule,
    /// Milliseconds until the next firing
    remaining_ms: f64,
    state: TimerState,
}

impl SpawnTimer {
    pub fn new(schedule: Schedule) -> Self {
        Self {
            schedule,
            remaining_ms: 0.0,
            state: TimerState::Stopped,
        }
    }

    /// Arm the timer. The first poll fires immediately.
    pub fn start(&mut self) {
        self.remaining_ms = 0.0;
        self.state = TimerState::Armed;
    }

    pub fn stop(&mut self) {
        self.state = TimerState::Stopped;
    }

    /// Hold the countdown where it is
    pub fn suspend(&mut self) {
        if self.state == TimerState::Armed {
            self.state = TimerState::Suspended;
        }
    }

    pub fn resume(&mut self) {
        if self.state == TimerState::Suspended {
            self.state = TimerState::Armed;
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == TimerState::Armed
    }

    pub fn remaining_ms(&self) -> f64 {
        self.remaining_ms
    }

    /// Count down by `elapsed_ms` and return how many times the timer fired
    pub fn poll<R: Rng>(&mut self, elapsed_ms: f64, rng: &mut R, speed: f32, base_speed: f32) -> u32 {
        if self.state != TimerState::Armed {
            return 0;
        }
        if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
            self.remaining_ms -= elapsed_ms;
        }

        let mut fired = 0;
        while self.remaining_ms <= 0.0 {
            fired += 1;
            let gap = self.schedule.next_interval(rng, speed, base_speed);
            if fired >= MAX_FIRINGS_PER_POLL {
                self.remaining_ms = gap;
                break;
            }
            self.remaining_ms += gap;
        }
        fired
    }
}

/// Uniform pick over the three obstacle types
pub fn pick_obstacle<R: Rng>(rng: &mut R) -> ObstacleKind {
    ObstacleKind::ALL[rng.random_range(0..ObstacleKind::ALL.len())]
}

/// Lane offset for a new obstacle
pub fn obstacle_bottom<R: Rng>(
    kind: ObstacleKind,
    rng: &mut R,
    field: &FieldGeometry,
    tuning: &Tuning,
) -> f32 {
    match kind {
        ObstacleKind::Bush => tuning.ground_level,
        ObstacleKind::Pipe => field.pipe_bottom(tuning.ground_level),
        ObstacleKind::Seagull => random_in_band(rng, field.upper_band()),
    }
}

/// Droplet or barrel, barrels with `barrel_chance`
pub fn pick_collectible<R: Rng>(rng: &mut R, barrel_chance: f64) -> CollectibleKind {
    if rng.random_bool(barrel_chance.clamp(0.0, 1.0)) {
        CollectibleKind::Barrel
    } else {
        CollectibleKind::Droplet
    }
}

/// Lane offset for a new collectible
pub fn collectible_bottom<R: Rng>(
    kind: CollectibleKind,
    rng: &mut R,
    field: &FieldGeometry,
    tuning: &Tuning,
) -> f32 {
    match kind {
        CollectibleKind::Barrel => tuning.ground_level,
        CollectibleKind::Droplet => random_in_band(rng, field.upper_band()),
    }
}

fn random_in_band<R: Rng>(rng: &mut R, (low, high): (f32, f32)) -> f32 {
    if high > low {
        rng.random_range(low..=high)
    } else {
        low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn fixed(interval_ms: f64) -> SpawnTimer {
        SpawnTimer::new(Schedule::Fixed { interval_ms })
    }

    #[test]
    fn test_stopped_timer_never_fires() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut timer = fixed(100.0);
        assert_eq!(timer.poll(1000.0, &mut rng, 3.0, 3.0), 0);
    }

    #[test]
    fn test_fires_immediately_then_on_interval() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut timer = fixed(1500.0);
        timer.start();
        assert_eq!(timer.poll(16.0, &mut rng, 3.0, 3.0), 1);
        assert_eq!(timer.poll(1000.0, &mut rng, 3.0, 3.0), 0);
        assert_eq!(timer.poll(484.0, &mut rng, 3.0, 3.0), 1);
    }

    #[test]
    fn test_suspended_timer_holds_countdown() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut timer = fixed(1000.0);
        timer.start();
        timer.poll(0.0, &mut rng, 3.0, 3.0);
        timer.poll(400.0, &mut rng, 3.0, 3.0);
        let remaining = timer.remaining_ms();

        timer.suspend();
        assert_eq!(timer.state(), TimerState::Suspended);
        assert_eq!(timer.poll(5000.0, &mut rng, 3.0, 3.0), 0);
        assert_eq!(timer.remaining_ms(), remaining);

        timer.resume();
        assert_eq!(timer.poll(600.0, &mut rng, 3.0, 3.0), 1);
    }

    #[test]
    fn test_resume_does_not_restart_stopped_timer() {
        let mut timer = fixed(1000.0);
        timer.start();
        timer.stop();
        timer.resume();
        assert_eq!(timer.state(), TimerState::Stopped);
    }

    #[test]
    fn test_backlog_is_capped() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut timer = fixed(10.0);
        timer.start();
        assert_eq!(
            timer.poll(10_000.0, &mut rng, 3.0, 3.0),
            MAX_FIRINGS_PER_POLL
        );
        assert!(timer.remaining_ms() > 0.0);
    }

    #[test]
    fn test_obstacle_lanes() {
        let mut rng = Pcg32::seed_from_u64(11);
        let field = FieldGeometry::default();
        let tuning = Tuning::default();
        let (low, high) = field.upper_band();

        assert_eq!(
            obstacle_bottom(ObstacleKind::Bush, &mut rng, &field, &tuning),
            80.0
        );
        assert_eq!(
            obstacle_bottom(ObstacleKind::Pipe, &mut rng, &field, &tuning),
            300.0
        );
        for _ in 0..50 {
            let y = obstacle_bottom(ObstacleKind::Seagull, &mut rng, &field, &tuning);
            assert!((low..=high).contains(&y));
        }
    }

    #[test]
    fn test_collectible_lanes() {
        let mut rng = Pcg32::seed_from_u64(5);
        let field = FieldGeometry::default();
        let tuning = Tuning::default();
        let (low, high) = field.upper_band();

        assert_eq!(
            collectible_bottom(CollectibleKind::Barrel, &mut rng, &field, &tuning),
            tuning.ground_level
        );
        for _ in 0..50 {
            let y = collectible_bottom(CollectibleKind::Droplet, &mut rng, &field, &tuning);
            assert!((low..=high).contains(&y));
        }
    }

    #[test]
    fn test_subtype_distribution() {
        let mut rng = Pcg32::seed_from_u64(2024);
        let mut obstacle_counts = [0u32; 3];
        let mut barrels = 0u32;
        let samples = 3000;
        for _ in 0..samples {
            match pick_obstacle(&mut rng) {
                ObstacleKind::Bush => obstacle_counts[0] += 1,
                ObstacleKind::Pipe => obstacle_counts[1] += 1,
                ObstacleKind::Seagull => obstacle_counts[2] += 1,
            }
            if pick_collectible(&mut rng, 0.2) == CollectibleKind::Barrel {
                barrels += 1;
            }
        }
        for count in obstacle_counts {
            assert!((800..1200).contains(&count), "count {count}");
        }
        assert!((450..750).contains(&barrels), "barrels {barrels}");
    }
}
