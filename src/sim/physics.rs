//! Player jump physics and field scrolling
//!
//! All quantities are per tick; the simulation runs at a fixed timestep.

use super::state::{Entity, JumpPhase, Player};
use crate::tuning::{JumpStyle, Tuning};

/// Advance the player one tick and return the new bottom offset.
///
/// A press edge while grounded starts a jump, as does a press queued since
/// the last tick (`press_queued`), so a tap released before the tick runs is
/// not lost. A held jump rises by `lift_speed` while the input stays down and
/// the peak is not reached; afterwards gravity pulls the player back to the
/// ground. A jump always rises on the tick it starts.
pub fn step(player: &mut Player, hold_input: bool, press_queued: bool, tuning: &Tuning) -> f32 {
    let pressed = press_queued || (hold_input && !player.hold_input);
    player.hold_input = hold_input;

    let ground = tuning.ground_level;
    let peak = ground + tuning.jump_peak;

    let mut started = false;
    if pressed && player.jump == JumpPhase::Grounded && player.bottom <= ground {
        player.jump = JumpPhase::Rising;
        started = true;
    }

    if player.jump == JumpPhase::Rising {
        let keep_rising = match tuning.jump_style {
            JumpStyle::Held => hold_input || started,
            JumpStyle::Fixed => true,
        };
        if keep_rising && player.bottom < peak {
            player.bottom = (player.bottom + tuning.lift_speed).min(peak);
            return player.bottom;
        }
        player.jump = JumpPhase::Falling;
    }

    // Falling, or elevated without a jump in progress
    if player.bottom > ground {
        player.jump = JumpPhase::Falling;
        player.bottom -= tuning.fall_speed();
    }
    if player.bottom <= ground {
        player.bottom = ground;
        player.jump = JumpPhase::Grounded;
    }

    player.bottom
}

/// Move every entity left by the current speed
pub fn scroll(entities: &mut [Entity], speed: f32) {
    for entity in entities {
        entity.x -= speed;
    }
}
