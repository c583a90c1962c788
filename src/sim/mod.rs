//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod geometry;
pub mod physics;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Contact, Resolution, detect, resolve};
pub use geometry::{FieldGeometry, Rect, overlap};
pub use spawner::{SpawnTimer, TimerState};
pub use state::{
    CollectibleKind, Entity, EntityId, EntityKind, GameEvent, GamePhase, GameState, JumpPhase,
    ObstacleKind, Outcome, Player, RemovalReason, Scoring,
};
pub use tick::{FrameDriver, FrameResult, TickInput, tick};
