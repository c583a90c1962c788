//! Drop Dash - a side-scrolling water runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, spawning, session state)
//! - `platform`: Presentation bridge (stage trait, presenter, DOM stage on web)
//! - `tuning`: Data-driven game balance and variant policies

pub mod platform;
pub mod sim;
pub mod tuning;

pub use tuning::{CollisionPolicy, JumpStyle, Schedule, Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (60 Hz, one tick per display frame)
    pub const SIM_DT_MS: f64 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the driver will accept (ms)
    pub const MAX_FRAME_MS: f64 = 100.0;

    /// Play field fallback when the stage reports a degenerate size
    pub const DEFAULT_FIELD_WIDTH: f32 = 800.0;
    pub const DEFAULT_FIELD_HEIGHT: f32 = 600.0;
    /// Score bar placement used when the stage has none to report
    pub const DEFAULT_HUD_BOTTOM: f32 = 56.0;
    pub const DEFAULT_HUD_HEIGHT: f32 = 24.0;
    /// Gap kept between the score bar and the top lane
    pub const HUD_CLEARANCE: f32 = 10.0;

    /// Player placement (fixed column, only the bottom offset moves)
    pub const PLAYER_LEFT: f32 = 100.0;
    pub const PLAYER_WIDTH: f32 = 90.0;
    pub const PLAYER_HEIGHT: f32 = 120.0;

    /// Pipe lane margins
    pub const PIPE_MIN_ABOVE_GROUND: f32 = 60.0;
    pub const PIPE_BELOW_TOP_ROW: f32 = 100.0;
    /// Upper lane ceiling as a fraction of field height
    pub const UPPER_BAND_RATIO: f32 = 0.8;
}
