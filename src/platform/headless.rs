//! In-memory stage for native runs and tests

use std::collections::HashMap;

use serde::Serialize;

use super::{Overlay, Presenter, Stage};
use crate::consts::SIM_DT_MS;
use crate::sim::{
    Entity, EntityId, EntityKind, FieldGeometry, FrameDriver, GameEvent, GameState, Outcome,
    RemovalReason, TickInput,
};
use crate::tuning::Tuning;

/// A stage operation as received
#[derive(Debug, Clone, PartialEq)]
pub enum StageCall {
    Create(EntityId, EntityKind),
    Remove(EntityId),
    Score(u32, u32),
    ShowOverlay(Overlay, u32),
    HideOverlay,
}

/// Records stage calls and mirrors what a page would display
#[derive(Debug, Clone, Default)]
pub struct HeadlessStage {
    pub field: FieldGeometry,
    /// Live entities: kind, x, bottom
    pub entities: HashMap<EntityId, (EntityKind, f32, f32)>,
    pub player_bottom: f32,
    pub player_airborne: bool,
    pub score: Option<(u32, u32)>,
    pub overlay: Option<Overlay>,
    pub final_score: u32,
    /// Structural calls in order (positions are not logged)
    pub calls: Vec<StageCall>,
}

impl HeadlessStage {
    pub fn with_field(field: FieldGeometry) -> Self {
        Self {
            field,
            ..Self::default()
        }
    }
}

impl Stage for HeadlessStage {
    type Handle = EntityId;

    fn field_geometry(&self) -> FieldGeometry {
        self.field
    }

    fn create_entity(&mut self, entity: &Entity) -> EntityId {
        self.entities
            .insert(entity.id, (entity.kind, entity.x, entity.bottom));
        self.calls.push(StageCall::Create(entity.id, entity.kind));
        entity.id
    }

    fn set_position(&mut self, handle: &EntityId, x: f32, bottom: f32) {
        if let Some(slot) = self.entities.get_mut(handle) {
            slot.1 = x;
            slot.2 = bottom;
        }
    }

    fn remove_entity(&mut self, handle: EntityId) {
        self.entities.remove(&handle);
        self.calls.push(StageCall::Remove(handle));
    }

    fn set_player(&mut self, bottom: f32, airborne: bool) {
        self.player_bottom = bottom;
        self.player_airborne = airborne;
    }

    fn render_score(&mut self, score: u32, win_threshold: u32) {
        self.score = Some((score, win_threshold));
        self.calls.push(StageCall::Score(score, win_threshold));
    }

    fn show_overlay(&mut self, overlay: Overlay, final_score: u32) {
        self.overlay = Some(overlay);
        self.final_score = final_score;
        self.calls.push(StageCall::ShowOverlay(overlay, final_score));
    }

    fn hide_overlay(&mut self) {
        self.overlay = None;
        self.calls.push(StageCall::HideOverlay);
    }
}

/// What a demo run did
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DemoSummary {
    pub seed: u64,
    pub outcome: Option<Outcome>,
    pub score: u32,
    pub speed: f32,
    pub ticks: u64,
    pub spawned: u32,
    pub collected: u32,
    pub hits: u32,
    pub ramps: u32,
}

/// Play one autopilot session against a headless stage for at most
/// `max_seconds` of simulated time.
pub fn play_demo(seed: u64, tuning: Tuning, max_seconds: f64) -> DemoSummary {
    let mut state = GameState::new(seed, tuning);
    let mut presenter = Presenter::new(HeadlessStage::default());
    let mut driver = FrameDriver::new();
    let mut input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    presenter.show_idle(&mut state);
    state.start();

    let mut summary = DemoSummary {
        seed,
        ..Default::default()
    };
    let frames = (max_seconds.max(0.0) * 1000.0 / SIM_DT_MS).ceil() as u64;

    for _ in 0..frames {
        presenter.refresh_field(&mut state);
        let frame = driver.advance(&mut state, &mut input, SIM_DT_MS);

        let events = state.drain_events();
        for event in &events {
            match event {
                GameEvent::Spawned(_) => summary.spawned += 1,
                GameEvent::Removed {
                    reason: RemovalReason::Collected,
                    ..
                } => summary.collected += 1,
                GameEvent::Removed {
                    reason: RemovalReason::Hit,
                    ..
                } => summary.hits += 1,
                GameEvent::SpeedRamped { .. } => summary.ramps += 1,
                _ => {}
            }
        }
        presenter.apply(&events, &state);

        if !frame.keep_running {
            break;
        }
    }

    summary.outcome = state.outcome();
    summary.score = state.score();
    summary.speed = state.speed();
    summary.ticks = state.time_ticks;
    log::info!(
        "Demo finished: {:?}, score {}, {} ticks",
        summary.outcome,
        summary.score,
        summary.ticks
    );
    summary
}
