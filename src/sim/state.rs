//! Game state and core simulation types
//!
//! A [`GameState`] is one session: it owns the player, every live entity,
//! the score and speed, and both spawn timers. Callers create it, drive it
//! with [`crate::sim::tick`] or a [`crate::sim::FrameDriver`], and discard it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::{FieldGeometry, Rect};
use super::spawner::{self, SpawnTimer};
use crate::consts::*;
use crate::tuning::Tuning;

/// Entity identifier, unique within a session
pub type EntityId = u32;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting on the start screen
    Idle,
    /// Active gameplay
    Running,
    /// Frozen, resumable
    Paused,
    /// Run finished
    Ended(Outcome),
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Thorny bush on the ground lane
    Bush,
    /// Pipe in the mid lane
    Pipe,
    /// Seagull in the upper band
    Seagull,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [Self::Bush, Self::Pipe, Self::Seagull];

    pub fn size(&self) -> Vec2 {
        match self {
            Self::Bush => Vec2::splat(150.0),
            Self::Pipe => Vec2::splat(200.0),
            Self::Seagull => Vec2::splat(120.0),
        }
    }

    /// Points lost on contact
    pub fn penalty(&self) -> u32 {
        match self {
            Self::Bush | Self::Pipe => 2,
            Self::Seagull => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bush => "bush",
            Self::Pipe => "pipe",
            Self::Seagull => "seagull",
        }
    }
}

/// Collectible types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectibleKind {
    Droplet,
    Barrel,
}

impl CollectibleKind {
    pub fn size(&self) -> Vec2 {
        match self {
            Self::Droplet => Vec2::splat(66.0),
            Self::Barrel => Vec2::splat(100.0),
        }
    }

    /// Points gained on pickup
    pub fn points(&self) -> u32 {
        match self {
            Self::Droplet => 1,
            Self::Barrel => 5,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Droplet => "droplet",
            Self::Barrel => "barrel",
        }
    }
}

/// Typed discriminator for everything that scrolls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Obstacle(ObstacleKind),
    Collectible(CollectibleKind),
}

impl EntityKind {
    pub fn size(&self) -> Vec2 {
        match self {
            Self::Obstacle(kind) => kind.size(),
            Self::Collectible(kind) => kind.size(),
        }
    }

    pub fn is_obstacle(&self) -> bool {
        matches!(self, Self::Obstacle(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Obstacle(kind) => kind.name(),
            Self::Collectible(kind) => kind.name(),
        }
    }
}

/// An obstacle or collectible in the field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Left edge, decreases as the field scrolls
    pub x: f32,
    /// Bottom offset from the field's bottom edge
    pub bottom: f32,
}

impl Entity {
    pub fn size(&self) -> Vec2 {
        self.kind.size()
    }

    pub fn rect(&self) -> Rect {
        Rect::from_corner(self.x, self.bottom, self.size())
    }
}

/// Vertical movement state of the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JumpPhase {
    #[default]
    Grounded,
    Rising,
    Falling,
}

/// The runner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Bottom offset from the field's bottom edge
    pub bottom: f32,
    pub jump: JumpPhase,
    /// Jump input as seen on the previous tick (for press edges)
    pub hold_input: bool,
}

impl Player {
    pub fn grounded(ground_level: f32) -> Self {
        Self {
            bottom: ground_level,
            jump: JumpPhase::Grounded,
            hold_input: false,
        }
    }

    pub fn is_airborne(&self) -> bool {
        self.jump != JumpPhase::Grounded
    }

    pub fn rect(&self) -> Rect {
        Rect::from_corner(
            PLAYER_LEFT,
            self.bottom,
            Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
        )
    }
}

/// Score, scroll speed and the ramp marker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scoring {
    pub score: u32,
    /// Scroll speed in px per tick
    pub speed: f32,
    /// Highest ramp threshold already applied
    pub last_ramp_score: u32,
}

impl Scoring {
    pub fn new(base_speed: f32) -> Self {
        Self {
            score: 0,
            speed: base_speed,
            last_ramp_score: 0,
        }
    }

    /// Subtract a penalty, clamping at zero. Returns the signed change.
    pub fn apply_penalty(&mut self, penalty: u32) -> i64 {
        let before = self.score;
        self.score = self.score.saturating_sub(penalty);
        i64::from(self.score) - i64::from(before)
    }

    /// Add points and ramp the speed once for every new threshold reached.
    /// Returns the number of ramps applied.
    pub fn add_points(&mut self, points: u32, tuning: &Tuning) -> u32 {
        self.score = self.score.saturating_add(points);

        let step = tuning.ramp_every.max(1);
        let reached = self.score / step * step;
        if reached <= self.last_ramp_score {
            return 0;
        }

        let ramps = (reached - self.last_ramp_score) / step;
        self.speed += tuning.speed_increment * ramps as f32;
        self.last_ramp_score = reached;
        ramps
    }
}

/// Why an entity left the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalReason {
    /// Picked up by the player
    Collected,
    /// Obstacle struck the player
    Hit,
    /// Scrolled past the left edge
    Offscreen,
    /// Cleared by a new run
    Reset,
}

/// Notifications for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Spawned(Entity),
    Removed { id: EntityId, reason: RemovalReason },
    ScoreChanged { score: u32 },
    SpeedRamped { speed: f32, threshold: u32 },
    PhaseChanged { from: GamePhase, to: GamePhase },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub field: FieldGeometry,
    pub phase: GamePhase,
    pub scoring: Scoring,
    pub player: Player,
    /// Live entities in spawn order
    pub entities: Vec<Entity>,
    pub obstacle_timer: SpawnTimer,
    pub collectible_timer: SpawnTimer,
    /// Simulation tick counter for the current run
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
    next_id: EntityId,
}

impl GameState {
    /// Create an idle session
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            field: FieldGeometry::default(),
            phase: GamePhase::Idle,
            scoring: Scoring::new(tuning.base_speed),
            player: Player::grounded(tuning.ground_level),
            entities: Vec::new(),
            obstacle_timer: SpawnTimer::new(tuning.obstacle_schedule),
            collectible_timer: SpawnTimer::new(tuning.collectible_schedule),
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    /// Update the field geometry (degenerate sizes fall back to defaults)
    pub fn set_field(&mut self, field: FieldGeometry) {
        self.field = field.sanitized();
    }

    pub fn score(&self) -> u32 {
        self.scoring.score
    }

    pub fn speed(&self) -> f32 {
        self.scoring.speed
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            GamePhase::Ended(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending notifications
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        self.phase = to;
        self.emit(GameEvent::PhaseChanged { from, to });
    }

    /// Begin a fresh run from Idle or Ended
    pub fn start(&mut self) {
        if !matches!(self.phase, GamePhase::Idle | GamePhase::Ended(_)) {
            log::debug!("start ignored in {:?}", self.phase);
            return;
        }

        for entity in std::mem::take(&mut self.entities) {
            self.emit(GameEvent::Removed {
                id: entity.id,
                reason: RemovalReason::Reset,
            });
        }
        self.scoring = Scoring::new(self.tuning.base_speed);
        self.player = Player::grounded(self.tuning.ground_level);
        self.time_ticks = 0;

        self.obstacle_timer = SpawnTimer::new(self.tuning.obstacle_schedule);
        self.collectible_timer = SpawnTimer::new(self.tuning.collectible_schedule);
        self.obstacle_timer.start();
        self.collectible_timer.start();

        self.emit(GameEvent::ScoreChanged { score: 0 });
        self.set_phase(GamePhase::Running);
        log::info!("Run started (seed {})", self.seed);
    }

    /// Freeze a running session
    pub fn pause(&mut self) {
        if self.phase != GamePhase::Running {
            return;
        }
        self.obstacle_timer.suspend();
        self.collectible_timer.suspend();
        self.set_phase(GamePhase::Paused);
        log::info!("Paused at score {}", self.scoring.score);
    }

    /// Continue a paused session
    pub fn resume(&mut self) {
        if self.phase != GamePhase::Paused {
            return;
        }
        self.obstacle_timer.resume();
        self.collectible_timer.resume();
        self.set_phase(GamePhase::Running);
        log::info!("Resumed");
    }

    /// Pause when running, resume when paused
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Running => self.pause(),
            GamePhase::Paused => self.resume(),
            _ => {}
        }
    }

    /// Finish the run. Both spawn timers stop; the score is frozen.
    pub fn end_game(&mut self, outcome: Outcome) {
        if !matches!(self.phase, GamePhase::Running | GamePhase::Paused) {
            return;
        }
        self.obstacle_timer.stop();
        self.collectible_timer.stop();
        self.set_phase(GamePhase::Ended(outcome));
        log::info!(
            "Run ended: {:?} with score {} after {} ticks",
            outcome,
            self.scoring.score,
            self.time_ticks
        );
    }

    /// Insert an entity at an explicit position. No-op unless running.
    pub fn place_entity(&mut self, kind: EntityKind, x: f32, bottom: f32) -> Option<EntityId> {
        if !self.is_running() {
            return None;
        }
        let entity = Entity {
            id: self.next_entity_id(),
            kind,
            x,
            bottom,
        };
        self.entities.push(entity);
        self.emit(GameEvent::Spawned(entity));
        log::debug!(
            "Spawned {} #{} at bottom {:.0}",
            kind.name(),
            entity.id,
            bottom
        );
        Some(entity.id)
    }

    /// Spawn a random obstacle at the right edge. No-op unless running.
    pub fn spawn_obstacle(&mut self) -> Option<EntityId> {
        if !self.is_running() {
            return None;
        }
        let kind = spawner::pick_obstacle(&mut self.rng);
        let bottom = spawner::obstacle_bottom(kind, &mut self.rng, &self.field, &self.tuning);
        self.place_entity(EntityKind::Obstacle(kind), self.field.width, bottom)
    }

    /// Spawn a random collectible at the right edge. No-op unless running.
    pub fn spawn_collectible(&mut self) -> Option<EntityId> {
        if !self.is_running() {
            return None;
        }
        let kind = spawner::pick_collectible(&mut self.rng, self.tuning.barrel_chance);
        let bottom = spawner::collectible_bottom(kind, &mut self.rng, &self.field, &self.tuning);
        self.place_entity(EntityKind::Collectible(kind), self.field.width, bottom)
    }

    /// Advance both spawn timers by wall-clock time and perform their spawns
    pub fn poll_spawners(&mut self, elapsed_ms: f64) {
        if !self.is_running() {
            return;
        }
        let speed = self.scoring.speed;
        let base = self.tuning.base_speed;

        let obstacles = self
            .obstacle_timer
            .poll(elapsed_ms, &mut self.rng, speed, base);
        for _ in 0..obstacles {
            self.spawn_obstacle();
        }

        let collectibles = self
            .collectible_timer
            .poll(elapsed_ms, &mut self.rng, speed, base);
        for _ in 0..collectibles {
            self.spawn_collectible();
        }
    }
}
