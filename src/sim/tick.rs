//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session deterministically, plus the
//! frame driver that turns display-frame time into ticks and spawn-timer
//! firings.

use super::state::{GameEvent, GamePhase, GameState, RemovalReason};
use super::{autopilot, collision, physics};
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump input currently held (key, mouse button or touch down)
    pub jump_held: bool,
    /// A press arrived since the last tick. Cleared by the frame driver once
    /// a tick has consumed it.
    pub jump_pressed: bool,
    /// Demo mode: the autopilot decides the jump input
    pub autopilot: bool,
}

/// Advance the session by one fixed timestep. No-op unless running.
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.phase != GamePhase::Running {
        return;
    }

    let (hold, pressed) = if input.autopilot {
        (autopilot::wants_jump(state), false)
    } else {
        (input.jump_held, input.jump_pressed)
    };

    state.time_ticks += 1;

    // Player, then the field
    physics::step(&mut state.player, hold, pressed, &state.tuning);
    physics::scroll(&mut state.entities, state.scoring.speed);

    // Contacts
    let player_rect = state.player.rect();
    let resolution = collision::resolve(
        &mut state.scoring,
        &player_rect,
        &state.entities,
        &state.tuning,
    );

    if !resolution.removed.is_empty() {
        state
            .entities
            .retain(|e| !resolution.removed.iter().any(|(id, _)| *id == e.id));
        for &(id, reason) in &resolution.removed {
            state.emit(GameEvent::Removed { id, reason });
        }
    }
    if resolution.score_delta != 0 {
        let score = state.scoring.score;
        state.emit(GameEvent::ScoreChanged { score });
    }
    // One event per threshold crossed, oldest first
    let step = state.tuning.ramp_every.max(1);
    let top = state.scoring.last_ramp_score;
    for i in (0..resolution.ramps).rev() {
        let threshold = top - i * step;
        let speed = state.scoring.speed - state.tuning.speed_increment * i as f32;
        log::info!("Speed ramped to {:.1} at score {}", speed, threshold);
        state.emit(GameEvent::SpeedRamped { speed, threshold });
    }

    // Off-screen pruning
    let offscreen_x = state.tuning.offscreen_x;
    let mut pruned = Vec::new();
    state.entities.retain(|e| {
        let keep = e.x > offscreen_x;
        if !keep {
            pruned.push(e.id);
        }
        keep
    });
    for id in pruned {
        state.emit(GameEvent::Removed {
            id,
            reason: RemovalReason::Offscreen,
        });
    }

    if let Some(outcome) = resolution.outcome {
        state.end_game(outcome);
    }
}

/// Converts display-frame deltas into fixed ticks and spawn-timer polls
#[derive(Debug, Clone, Default)]
pub struct FrameDriver {
    accumulator_ms: f64,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop any partial tick (call after starting a new run)
    pub fn reset(&mut self) {
        self.accumulator_ms = 0.0;
    }

    /// Run one display frame. Returns the number of ticks executed and
    /// whether another frame should be scheduled. A queued jump press is
    /// cleared once a tick has seen it.
    pub fn advance(
        &mut self,
        state: &mut GameState,
        input: &mut TickInput,
        dt_ms: f64,
    ) -> FrameResult {
        match state.phase {
            GamePhase::Running => {}
            GamePhase::Paused => {
                self.accumulator_ms = 0.0;
                input.jump_pressed = false;
                return FrameResult {
                    ticks: 0,
                    keep_running: true,
                };
            }
            GamePhase::Idle | GamePhase::Ended(_) => {
                self.accumulator_ms = 0.0;
                input.jump_pressed = false;
                return FrameResult {
                    ticks: 0,
                    keep_running: false,
                };
            }
        }

        let dt_ms = if dt_ms.is_finite() {
            dt_ms.clamp(0.0, MAX_FRAME_MS)
        } else {
            0.0
        };
        self.accumulator_ms += dt_ms;

        let mut ticks = 0;
        while self.accumulator_ms >= SIM_DT_MS && ticks < MAX_SUBSTEPS {
            tick(state, input);
            input.jump_pressed = false;
            self.accumulator_ms -= SIM_DT_MS;
            ticks += 1;
            if !state.is_running() {
                break;
            }
        }
        if ticks == MAX_SUBSTEPS {
            self.accumulator_ms = self.accumulator_ms.min(SIM_DT_MS);
        }

        // Spawns land after this frame's ticks and are first moved next frame
        state.poll_spawners(dt_ms);

        FrameResult {
            ticks,
            keep_running: matches!(state.phase, GamePhase::Running | GamePhase::Paused),
        }
    }
}

/// Outcome of one [`FrameDriver::advance`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameResult {
    pub ticks: u32,
    /// False once the session is idle or ended; the caller stops scheduling frames
    pub keep_running: bool,
}
