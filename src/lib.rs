//! Treasure Hunt AR - session core for a timed augmented-reality treasure hunt
//!
//! Core modules:
//! - `sim`: Deterministic session logic (timer, registry, placement, selection, arbiter)
//! - `host`: Collaborator boundary (presentation, feedback, tracking control)
//! - `platform`: Clock and environment capability checks
//! - `settings`: The persisted sound preference
//! - `audio`: Procedural feedback tones

pub mod audio;
pub mod error;
pub mod host;
pub mod platform;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::EnvironmentError;
pub use settings::{MemoryStore, PreferenceStore, Settings};

/// Game configuration constants
pub mod consts {
    /// Number of collectibles spawned per session
    pub const COLLECTIBLE_COUNT: usize = 4;

    /// Challenge length
    pub const CHALLENGE_DURATION_SECS: u64 = 30;
    pub const CHALLENGE_DURATION_MS: u64 = CHALLENGE_DURATION_SECS * 1000;
    /// Countdown display refresh period
    pub const COUNTDOWN_TICK_MS: u64 = 100;

    /// Delay between a collection and the completion check (lets feedback play)
    pub const COMPLETION_CHECK_DELAY_MS: u64 = 500;
    /// Delay between ending tracking on success and the success presentation
    pub const SUCCESS_REVEAL_DELAY_MS: u64 = 1000;
    /// Delay between the failure presentation and ending tracking
    pub const FAILURE_TRACKING_END_DELAY_MS: u64 = 100;

    /// Horizontal offset of each collectible from the anchor (x and z)
    pub const PLACEMENT_OFFSET: f32 = 1.0;
    /// Height of each collectible above the anchor
    pub const PLACEMENT_LIFT: f32 = 0.3;
    /// Hit-test radius (half-diagonal of a 0.4 x 0.3 card)
    pub const COLLECTIBLE_HIT_RADIUS: f32 = 0.25;

    /// Reward range, upper bound exclusive
    pub const REWARD_MIN: u32 = 10;
    pub const REWARD_MAX: u32 = 60;

    /// Scale applied when a collectible is picked up
    pub const COLLECT_SCALE_POP: f32 = 1.2;
    /// Delay before the fade-out starts
    pub const FADE_DELAY_MS: u64 = 200;
    /// Opacity lost per second while fading (0.05 per frame at 60 Hz)
    pub const FADE_PER_SEC: f32 = 3.0;

    /// Hover animation (cosmetic)
    pub const HOVER_AMPLITUDE: f32 = 0.03;
    pub const HOVER_SPEED: f32 = 0.002;
    /// Frame rate the per-frame spin speed is expressed in
    pub const SPIN_FRAMES_PER_SEC: f64 = 60.0;
    /// Roll turns at this fraction of the yaw rate
    pub const SPIN_ROLL_RATIO: f32 = 0.5;
}
