//! Keyma Quest - A computer literacy adventure in six zones
//!
//! Core modules:
//! - `catalog`: Static level definitions
//! - `sim`: Deterministic game logic (controller, scheduler, challenges)
//! - `audio`: Sound cue sink (Web Audio on wasm, logging on native)
//! - `ui`: HUD view model for the screen host
//! - `settings`: Player preferences and admin secret

pub mod audio;
pub mod catalog;
pub mod settings;
pub mod sim;
pub mod ui;

pub use audio::{AudioSink, BgmMode, Cue, CueLog, LogAudio};
pub use catalog::{LEVELS, LevelDefinition, LevelKind};
pub use settings::Settings;
pub use sim::{ChallengeInput, GameController, GamePhase};

/// Game configuration constants
pub mod consts {
    /// Longest frame the host may feed into one tick (ms)
    pub const MAX_FRAME_MS: u64 = 100;

    /// Pointer challenge: hits needed and reward
    pub const POINTER_HITS_REQUIRED: u32 = 10;
    pub const POINTER_REWARD: u32 = 200;
    /// Target bounds in percent of the play area
    pub const POINTER_TOP_RANGE: (f32, f32) = (20.0, 80.0);
    pub const POINTER_LEFT_RANGE: (f32, f32) = (15.0, 85.0);

    /// Typing challenge: hits needed and reward
    pub const TYPING_HITS_REQUIRED: u32 = 10;
    pub const TYPING_REWARD: u32 = 200;
    /// New symbol every 1.4 seconds
    pub const SPAWN_INTERVAL_MS: u64 = 1400;
    /// Fall step (~60 Hz)
    pub const MOVE_INTERVAL_MS: u64 = 16;
    /// Pause between the last hit and reporting completion
    pub const TYPING_COMPLETE_DELAY_MS: u64 = 300;
    /// Spawn x range (percent)
    pub const SYMBOL_X_RANGE: (f32, f32) = (10.0, 90.0);
    /// Symbols appear just above the top edge
    pub const SYMBOL_START_Y: f32 = -10.0;
    /// Symbols at or below this line are gone
    pub const SYMBOL_FLOOR_Y: f32 = 95.0;
    /// Fall speed range (percent per move step)
    pub const SYMBOL_SPEED_RANGE: (f32, f32) = (0.3, 0.7);

    /// Clipboard challenge
    pub const PASTES_REQUIRED: usize = 5;
    pub const CLIPBOARD_REWARD: u32 = 100;

    /// Directory challenge
    pub const TREASURE_REWARD: u32 = 300;

    /// Judgment challenge
    pub const POINTS_PER_CORRECT: u32 = 50;
    pub const FEEDBACK_DELAY_MS: u64 = 1000;

    /// Welcome screen "connecting" delay
    pub const BOOT_DELAY_MS: u64 = 2000;
}
