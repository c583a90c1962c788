//! Platform abstraction layer
//!
//! The simulation never touches the page. A [`Stage`] is the presentation
//! capability it needs (create, move and remove visual entities, paint the
//! score bar, show overlays), and the [`Presenter`] replays session events
//! onto a stage once per frame.

use std::collections::HashMap;

use crate::sim::{Entity, EntityId, FieldGeometry, GameEvent, GamePhase, GameState, Outcome};

#[cfg(target_arch = "wasm32")]
pub mod dom;
pub mod headless;

pub use headless::{DemoSummary, HeadlessStage, StageCall, play_demo};

/// Full-screen messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Start,
    Paused,
    Won,
    Lost,
}

/// Title and message markup for the game-over panel, `None` for overlays
/// that have no panel
pub fn end_screen(overlay: Overlay, final_score: u32) -> Option<(&'static str, String)> {
    let delivered =
        format!("You delivered <span id=\"final-score\">{final_score}</span> drops of clean water!");
    match overlay {
        Overlay::Won => Some((
            "You Win!",
            format!("{delivered}<br>Thank you for making a difference!"),
        )),
        Overlay::Lost => Some(("Game Over!", delivered)),
        Overlay::Start | Overlay::Paused => None,
    }
}

/// Presentation collaborator
pub trait Stage {
    /// Handle to one visual entity
    type Handle;

    /// Current visible play field
    fn field_geometry(&self) -> FieldGeometry;

    fn create_entity(&mut self, entity: &Entity) -> Self::Handle;
    fn set_position(&mut self, handle: &Self::Handle, x: f32, bottom: f32);
    fn remove_entity(&mut self, handle: Self::Handle);

    fn set_player(&mut self, bottom: f32, airborne: bool);

    fn render_score(&mut self, score: u32, win_threshold: u32);
    fn show_overlay(&mut self, overlay: Overlay, final_score: u32);
    fn hide_overlay(&mut self);
}

/// Keeps a stage in step with a session
pub struct Presenter<S: Stage> {
    stage: S,
    handles: HashMap<EntityId, S::Handle>,
}

impl<S: Stage> Presenter<S> {
    pub fn new(stage: S) -> Self {
        Self {
            stage,
            handles: HashMap::new(),
        }
    }

    pub fn stage(&self) -> &S {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut S {
        &mut self.stage
    }

    /// Number of visual entities the presenter is tracking
    pub fn live_handles(&self) -> usize {
        self.handles.len()
    }

    /// Re-read the stage's play field so spawns follow a resized page
    pub fn refresh_field(&self, state: &mut GameState) {
        state.set_field(self.stage.field_geometry());
    }

    /// Paint the start screen for an idle session
    pub fn show_idle(&mut self, state: &mut GameState) {
        self.refresh_field(state);
        self.stage.render_score(state.score(), state.tuning.win_score);
        self.stage.show_overlay(Overlay::Start, state.score());
    }

    /// Apply pending events, then push every live position to the stage
    pub fn sync(&mut self, state: &mut GameState) {
        let events = state.drain_events();
        self.apply(&events, state);
    }

    /// Replay already-drained events, then push every live position
    pub fn apply(&mut self, events: &[GameEvent], state: &GameState) {
        let win = state.tuning.win_score;

        for event in events {
            match *event {
                GameEvent::Spawned(ref entity) => {
                    let handle = self.stage.create_entity(entity);
                    self.handles.insert(entity.id, handle);
                }
                GameEvent::Removed { id, .. } => {
                    if let Some(handle) = self.handles.remove(&id) {
                        self.stage.remove_entity(handle);
                    }
                }
                GameEvent::ScoreChanged { score } => {
                    self.stage.render_score(score, win);
                }
                GameEvent::SpeedRamped { speed, threshold } => {
                    log::debug!("Stage notified of ramp to {speed:.1} at {threshold}");
                }
                GameEvent::PhaseChanged { to, .. } => {
                    let score = state.score();
                    match to {
                        GamePhase::Idle => self.stage.show_overlay(Overlay::Start, score),
                        GamePhase::Running => self.stage.hide_overlay(),
                        GamePhase::Paused => self.stage.show_overlay(Overlay::Paused, score),
                        GamePhase::Ended(Outcome::Won) => {
                            self.stage.show_overlay(Overlay::Won, score)
                        }
                        GamePhase::Ended(Outcome::Lost) => {
                            self.stage.show_overlay(Overlay::Lost, score)
                        }
                    }
                }
            }
        }

        for entity in &state.entities {
            if let Some(handle) = self.handles.get(&entity.id) {
                self.stage.set_position(handle, entity.x, entity.bottom);
            }
        }
        self.stage
            .set_player(state.player.bottom, state.player.is_airborne());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT_MS;
    use crate::sim::{CollectibleKind, EntityKind, FrameDriver, TickInput, tick};
    use crate::tuning::Tuning;

    #[test]
    fn test_presenter_tracks_entities() {
        let mut state = GameState::new(1, Tuning::default());
        let mut presenter = Presenter::new(HeadlessStage::default());
        presenter.show_idle(&mut state);
        assert_eq!(presenter.stage().overlay, Some(Overlay::Start));

        state.start();
        state.place_entity(
            EntityKind::Collectible(CollectibleKind::Droplet),
            600.0,
            480.0,
        );
        presenter.sync(&mut state);
        assert_eq!(presenter.live_handles(), 1);
        assert_eq!(presenter.stage().overlay, None);
        assert_eq!(presenter.stage().score, Some((0, 50)));

        tick(&mut state, &TickInput::default());
        presenter.sync(&mut state);
        let (_, x, _) = presenter.stage().entities[&1];
        assert_eq!(x, 597.0);

        state.pause();
        presenter.sync(&mut state);
        assert_eq!(presenter.stage().overlay, Some(Overlay::Paused));
    }

    #[test]
    fn test_presenter_removes_on_collect() {
        let mut state = GameState::new(2, Tuning::default());
        let mut presenter = Presenter::new(HeadlessStage::default());
        state.start();
        state.place_entity(EntityKind::Collectible(CollectibleKind::Barrel), 150.0, 80.0);
        presenter.sync(&mut state);

        tick(&mut state, &TickInput::default());
        presenter.sync(&mut state);
        assert_eq!(presenter.live_handles(), 0);
        assert!(presenter.stage().entities.is_empty());
        assert_eq!(presenter.stage().score, Some((5, 50)));
        assert!(
            presenter
                .stage()
                .calls
                .iter()
                .any(|c| matches!(c, StageCall::Remove(1)))
        );
    }

    #[test]
    fn test_end_screen_wording() {
        let (title, message) = end_screen(Overlay::Won, 50).unwrap();
        assert_eq!(title, "You Win!");
        assert_eq!(
            message,
            "You delivered <span id=\"final-score\">50</span> drops of clean water!\
             <br>Thank you for making a difference!"
        );

        let (title, message) = end_screen(Overlay::Lost, 7).unwrap();
        assert_eq!(title, "Game Over!");
        assert!(!message.contains("Thank you"));
        assert!(message.contains(">7<"));

        assert!(end_screen(Overlay::Paused, 7).is_none());
    }

    #[test]
    fn test_resize_moves_spawn_edge() {
        let mut state = GameState::new(4, Tuning::default());
        let stage = HeadlessStage::with_field(FieldGeometry::new(800.0, 600.0));
        let mut presenter = Presenter::new(stage);
        presenter.show_idle(&mut state);
        state.start();

        presenter.stage_mut().field = FieldGeometry::new(1400.0, 900.0);
        presenter.refresh_field(&mut state);
        assert_eq!(state.field.width, 1400.0);

        FrameDriver::new().advance(&mut state, &mut TickInput::default(), SIM_DT_MS);
        assert_eq!(state.entities.len(), 2);
        assert!(state.entities.iter().all(|e| e.x == 1400.0));
    }

    #[test]
    fn test_presenter_shows_end_overlay() {
        let mut state = GameState::new(3, Tuning::default());
        let mut presenter = Presenter::new(HeadlessStage::default());
        state.start();
        state.scoring.score = 49;
        state.place_entity(EntityKind::Collectible(CollectibleKind::Droplet), 150.0, 100.0);
        tick(&mut state, &TickInput::default());
        presenter.sync(&mut state);
        assert_eq!(presenter.stage().overlay, Some(Overlay::Won));
        assert_eq!(presenter.stage().final_score, 50);
    }
}
