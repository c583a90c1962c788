//! Collision detection and scoring response
//!
//! The player and every entity are axis-aligned boxes. Contacts are resolved
//! obstacles first, then collectibles, each in spawn order. Scoring changes
//! (penalties, pickups, speed ramps, the win check) happen here so that a
//! single tick sees them in a fixed order.

use super::geometry::Rect;
use super::state::{Entity, EntityId, EntityKind, Outcome, RemovalReason, Scoring};
use crate::tuning::{CollisionPolicy, Tuning};

/// One entity touching the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub id: EntityId,
    pub kind: EntityKind,
}

/// Result of resolving one tick's contacts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Net score change actually applied (after clamping)
    pub score_delta: i64,
    /// Entities to remove, with the reason
    pub removed: Vec<(EntityId, RemovalReason)>,
    /// Speed ramps applied
    pub ramps: u32,
    /// Set when the contacts ended the run
    pub outcome: Option<Outcome>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.outcome.is_none()
    }
}

/// Every entity overlapping the player, obstacles first
pub fn detect(player: &Rect, entities: &[Entity]) -> Vec<Contact> {
    let touching = |e: &&Entity| player.overlaps(&e.rect());
    let obstacles = entities
        .iter()
        .filter(|e| e.kind.is_obstacle())
        .filter(touching);
    let collectibles = entities
        .iter()
        .filter(|e| !e.kind.is_obstacle())
        .filter(touching);

    obstacles
        .chain(collectibles)
        .map(|e| Contact {
            id: e.id,
            kind: e.kind,
        })
        .collect()
}

/// Apply penalties, pickups, ramps and end conditions for this tick's contacts.
///
/// Processing stops at the first contact that ends the run, so a won or lost
/// run never scores further in the same tick.
pub fn resolve(
    scoring: &mut Scoring,
    player: &Rect,
    entities: &[Entity],
    tuning: &Tuning,
) -> Resolution {
    let mut resolution = Resolution::default();

    for contact in detect(player, entities) {
        match contact.kind {
            EntityKind::Obstacle(kind) => {
                resolution.removed.push((contact.id, RemovalReason::Hit));
                match tuning.collision_policy {
                    CollisionPolicy::Penalty => {
                        resolution.score_delta += scoring.apply_penalty(kind.penalty());
                        log::debug!("Hit {} (-{})", kind.name(), kind.penalty());
                    }
                    CollisionPolicy::Fatal => {
                        log::debug!("Hit {}: run lost", kind.name());
                        resolution.outcome = Some(Outcome::Lost);
                        break;
                    }
                }
            }
            EntityKind::Collectible(kind) => {
                resolution.removed.push((contact.id, RemovalReason::Collected));
                let before = scoring.score;
                resolution.ramps += scoring.add_points(kind.points(), tuning);
                resolution.score_delta += i64::from(scoring.score) - i64::from(before);

                if scoring.score >= tuning.win_score {
                    resolution.outcome = Some(Outcome::Won);
                    break;
                }
            }
        }
    }

    resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{CollectibleKind, ObstacleKind, Player};

    fn player_rect() -> Rect {
        Player::grounded(80.0).rect()
    }

    fn at_player(id: EntityId, kind: EntityKind) -> Entity {
        Entity {
            id,
            kind,
            x: 120.0,
            bottom: 100.0,
        }
    }

    const DROPLET: EntityKind = EntityKind::Collectible(CollectibleKind::Droplet);
    const BARREL: EntityKind = EntityKind::Collectible(CollectibleKind::Barrel);
    const PIPE: EntityKind = EntityKind::Obstacle(ObstacleKind::Pipe);
    const SEAGULL: EntityKind = EntityKind::Obstacle(ObstacleKind::Seagull);

    #[test]
    fn test_detect_orders_obstacles_first() {
        let entities = [
            at_player(1, DROPLET),
            at_player(2, PIPE),
            Entity {
                id: 3,
                kind: SEAGULL,
                x: 700.0,
                bottom: 480.0,
            },
        ];
        let contacts = detect(&player_rect(), &entities);
        let ids: Vec<_> = contacts.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_touching_edge_counts() {
        let player = player_rect();
        let entity = Entity {
            id: 1,
            kind: DROPLET,
            x: player.right(),
            bottom: player.bottom(),
        };
        assert_eq!(detect(&player, &[entity]).len(), 1);

        let apart = Entity {
            x: player.right() + 0.5,
            ..entity
        };
        assert!(detect(&player, &[apart]).is_empty());
    }

    #[test]
    fn test_pipe_penalty_clamps() {
        let tuning = Tuning::default();
        let mut scoring = Scoring::new(3.0);
        scoring.score = 1;

        let resolution = resolve(&mut scoring, &player_rect(), &[at_player(4, PIPE)], &tuning);
        assert_eq!(scoring.score, 0);
        assert_eq!(resolution.score_delta, -1);
        assert_eq!(resolution.removed, vec![(4, RemovalReason::Hit)]);
        assert!(resolution.outcome.is_none());
    }

    #[test]
    fn test_seagull_costs_three() {
        let tuning = Tuning::default();
        let mut scoring = Scoring::new(3.0);
        scoring.score = 10;
        resolve(&mut scoring, &player_rect(), &[at_player(1, SEAGULL)], &tuning);
        assert_eq!(scoring.score, 7);
    }

    #[test]
    fn test_pickups_score_and_ramp() {
        let tuning = Tuning::default();
        let mut scoring = Scoring::new(3.0);
        scoring.score = 5;

        let entities = [at_player(1, BARREL), at_player(2, DROPLET)];
        let resolution = resolve(&mut scoring, &player_rect(), &entities, &tuning);
        assert_eq!(scoring.score, 11);
        assert_eq!(resolution.score_delta, 6);
        assert_eq!(resolution.ramps, 1);
        assert_eq!(resolution.removed.len(), 2);
        assert!((scoring.speed - 4.5).abs() < 1e-6);
    }

    #[test]
    fn test_win_stops_processing() {
        let tuning = Tuning::default();
        let mut scoring = Scoring::new(3.0);
        scoring.score = 48;
        scoring.last_ramp_score = 40;

        let entities = [at_player(1, BARREL), at_player(2, DROPLET)];
        let resolution = resolve(&mut scoring, &player_rect(), &entities, &tuning);
        assert_eq!(resolution.outcome, Some(Outcome::Won));
        assert_eq!(scoring.score, 53);
        assert_eq!(resolution.removed, vec![(1, RemovalReason::Collected)]);
        assert_eq!(resolution.ramps, 1);
    }

    #[test]
    fn test_fatal_policy_loses() {
        let tuning = Tuning {
            collision_policy: CollisionPolicy::Fatal,
            ..Tuning::default()
        };
        let mut scoring = Scoring::new(3.0);
        scoring.score = 8;

        let entities = [at_player(1, DROPLET), at_player(2, PIPE)];
        let resolution = resolve(&mut scoring, &player_rect(), &entities, &tuning);
        assert_eq!(resolution.outcome, Some(Outcome::Lost));
        assert_eq!(scoring.score, 8);
        assert_eq!(resolution.removed, vec![(2, RemovalReason::Hit)]);
    }

    #[test]
    fn test_no_contacts_is_empty() {
        let tuning = Tuning::default();
        let mut scoring = Scoring::new(3.0);
        let far = Entity {
            id: 1,
            kind: PIPE,
            x: 600.0,
            bottom: 300.0,
        };
        assert!(resolve(&mut scoring, &player_rect(), &[far], &tuning).is_empty());
    }
}
