//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`]. The defaults reproduce the
//! richest variant of the game (held jump, point penalties, randomized
//! obstacle gaps, speed-scaled collectibles); the policy enums select the
//! simpler variants.

use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating tuning data
#[derive(Error, Debug)]
pub enum TuningError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// How the jump input shapes the rise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JumpStyle {
    /// Rise continues only while the input stays held, capped at the peak
    #[default]
    Held,
    /// Rise always runs to the peak once started
    Fixed,
}

/// What touching an obstacle does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Subtract the obstacle's penalty (score clamps at zero)
    #[default]
    Penalty,
    /// End the run as lost
    Fatal,
}

/// Interval policy for a spawn timer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum Schedule {
    /// Constant gap
    Fixed { interval_ms: f64 },
    /// Gap drawn uniformly from `[min_ms, max_ms]`
    Randomized { min_ms: f64, max_ms: f64 },
    /// Gap shrinks as the scroll speed grows: `base_ms * base_speed / speed`
    SpeedScaled { base_ms: f64, min_ms: f64 },
}

impl Schedule {
    /// Draw the next gap in milliseconds
    pub fn next_interval<R: Rng>(&self, rng: &mut R, speed: f32, base_speed: f32) -> f64 {
        match *self {
            Schedule::Fixed { interval_ms } => interval_ms,
            Schedule::Randomized { min_ms, max_ms } => {
                if max_ms > min_ms {
                    rng.random_range(min_ms..=max_ms)
                } else {
                    min_ms
                }
            }
            Schedule::SpeedScaled { base_ms, min_ms } => {
                let ratio = if speed > 0.0 {
                    f64::from(base_speed) / f64::from(speed)
                } else {
                    1.0
                };
                (base_ms * ratio).max(min_ms)
            }
        }
    }

    fn validate(&self, field: &'static str) -> Result<(), TuningError> {
        let ok = match *self {
            Schedule::Fixed { interval_ms } => interval_ms > 0.0,
            Schedule::Randomized { min_ms, max_ms } => min_ms > 0.0 && max_ms >= min_ms,
            Schedule::SpeedScaled { base_ms, min_ms } => base_ms > 0.0 && min_ms > 0.0,
        };
        if ok {
            Ok(())
        } else {
            Err(TuningError::Invalid {
                field,
                reason: "intervals must be positive and ordered",
            })
        }
    }
}

/// Game balance values, loadable from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Jump ===
    pub jump_style: JumpStyle,
    /// Maximum height above ground reached by a jump (px)
    pub jump_peak: f32,
    /// Rise per tick while jumping (px)
    pub lift_speed: f32,
    /// Gravity strength; the fall per tick is `gravity * fall_multiplier`
    pub gravity: f32,
    pub fall_multiplier: f32,
    /// Bottom offset of the ground lane (px)
    pub ground_level: f32,

    // === Scrolling & difficulty ===
    /// Scroll speed at the start of a run (px per tick)
    pub base_speed: f32,
    /// Speed added at every ramp threshold
    pub speed_increment: f32,
    /// Score step between ramps
    pub ramp_every: u32,
    /// Score that wins the run
    pub win_score: u32,
    /// Entities at or left of this x are pruned
    pub offscreen_x: f32,

    // === Rules ===
    pub collision_policy: CollisionPolicy,
    /// Chance that a collectible is a barrel rather than a droplet
    pub barrel_chance: f64,

    // === Spawning ===
    pub obstacle_schedule: Schedule,
    pub collectible_schedule: Schedule,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            jump_style: JumpStyle::Held,
            jump_peak: 420.0,
            lift_speed: 12.0,
            gravity: 2.0,
            fall_multiplier: 2.0,
            ground_level: 80.0,

            base_speed: 3.0,
            speed_increment: 1.5,
            ramp_every: 10,
            win_score: 50,
            offscreen_x: -100.0,

            collision_policy: CollisionPolicy::Penalty,
            barrel_chance: 0.2,

            obstacle_schedule: Schedule::Randomized {
                min_ms: 1000.0,
                max_ms: 2000.0,
            },
            collectible_schedule: Schedule::SpeedScaled {
                base_ms: 1200.0,
                min_ms: 400.0,
            },
        }
    }
}

impl Tuning {
    /// The simplest variant: fixed jump, fatal obstacles, fixed spawn gaps
    pub fn classic() -> Self {
        Self {
            jump_style: JumpStyle::Fixed,
            collision_policy: CollisionPolicy::Fatal,
            obstacle_schedule: Schedule::Fixed {
                interval_ms: 1500.0,
            },
            collectible_schedule: Schedule::Fixed {
                interval_ms: 1200.0,
            },
            ..Self::default()
        }
    }

    /// Parse and validate tuning from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject values that would stall or break the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be a positive number",
                })
            }
        }

        positive("jump_peak", self.jump_peak)?;
        positive("lift_speed", self.lift_speed)?;
        positive("gravity", self.gravity)?;
        positive("fall_multiplier", self.fall_multiplier)?;
        positive("base_speed", self.base_speed)?;

        if !self.ground_level.is_finite() || self.ground_level < 0.0 {
            return Err(TuningError::Invalid {
                field: "ground_level",
                reason: "must be zero or more",
            });
        }
        if !self.speed_increment.is_finite() || self.speed_increment < 0.0 {
            return Err(TuningError::Invalid {
                field: "speed_increment",
                reason: "speed may never decrease",
            });
        }
        if self.ramp_every == 0 {
            return Err(TuningError::Invalid {
                field: "ramp_every",
                reason: "must be at least 1",
            });
        }
        if self.win_score == 0 {
            return Err(TuningError::Invalid {
                field: "win_score",
                reason: "must be at least 1",
            });
        }
        if !self.offscreen_x.is_finite() {
            return Err(TuningError::Invalid {
                field: "offscreen_x",
                reason: "must be finite",
            });
        }
        if !(0.0..=1.0).contains(&self.barrel_chance) {
            return Err(TuningError::Invalid {
                field: "barrel_chance",
                reason: "must be within 0..=1",
            });
        }

        self.obstacle_schedule.validate("obstacle_schedule")?;
        self.collectible_schedule.validate("collectible_schedule")?;
        Ok(())
    }

    /// Fall distance per tick
    #[inline]
    pub fn fall_speed(&self) -> f32 {
        self.gravity * self.fall_multiplier
    }
}
