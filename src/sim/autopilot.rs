//! Demo-mode input: holds the jump while a ground-lane obstacle is close.

use super::state::GameState;
use crate::consts::PLAYER_HEIGHT;

/// Ticks of warning the autopilot wants before an obstacle arrives
const LEAD_TICKS: f32 = 14.0;

/// Whether the autopilot would hold the jump input this tick
pub fn wants_jump(state: &GameState) -> bool {
    let player = state.player.rect();
    let lead = state.speed().max(0.0) * LEAD_TICKS;
    let lane_top = state.tuning.ground_level + PLAYER_HEIGHT;

    state
        .entities
        .iter()
        .filter(|e| e.kind.is_obstacle() && e.bottom < lane_top)
        .any(|e| {
            let rect = e.rect();
            rect.right() >= player.left() && rect.left() - player.right() <= lead
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{EntityKind, ObstacleKind};
    use crate::tuning::Tuning;

    #[test]
    fn test_jumps_for_close_bush_only() {
        let mut state = GameState::new(1, Tuning::default());
        state.start();
        assert!(!wants_jump(&state));

        let bush = state
            .place_entity(EntityKind::Obstacle(ObstacleKind::Bush), 600.0, 80.0)
            .unwrap();
        assert!(!wants_jump(&state));

        state.entities.retain(|e| e.id != bush);
        state.place_entity(EntityKind::Obstacle(ObstacleKind::Bush), 220.0, 80.0);
        assert!(wants_jump(&state));
    }

    #[test]
    fn test_ignores_high_obstacles() {
        let mut state = GameState::new(1, Tuning::default());
        state.start();
        state.place_entity(EntityKind::Obstacle(ObstacleKind::Pipe), 200.0, 300.0);
        state.place_entity(EntityKind::Obstacle(ObstacleKind::Seagull), 200.0, 480.0);
        assert!(!wants_jump(&state));
    }
}
