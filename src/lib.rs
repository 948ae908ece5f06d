//! Hedgehog Dash - An endless runner over a field of mushrooms
//!
//! Core modules:
//! - `sim`: Simulation (actor physics, obstacle spawning, collisions, session state)
//! - `config`: Data-driven game balance
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser input mapping
//! - `persistence`: High score and mute flag storage
//! - `audio`: Sound cue sink (Web Audio tones in the browser)
//! - `ui`: HUD text formatting

pub mod audio;
pub mod config;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod ui;

pub use config::{FieldGeometry, GameConfig};
pub use sim::{InputEvent, Session, SessionState};

/// Game configuration constants
pub mod consts {
    /// Reference frame length (60 Hz). Per-step physics constants are tuned
    /// for this step and scaled by `delta / REFERENCE_FRAME_MS`.
    pub const REFERENCE_FRAME_MS: f64 = 1000.0 / 60.0;
    /// Largest delta fed to the simulation in one frame (tab switches, stalls)
    pub const MAX_FRAME_MS: f64 = 100.0;

    /// Playing field (canvas units, y grows downward)
    pub const FIELD_WIDTH: f32 = 600.0;
    pub const FIELD_HEIGHT: f32 = 150.0;
    pub const GROUND_Y: f32 = 120.0;

    /// Hedgehog defaults
    pub const ACTOR_X: f32 = 50.0;
    pub const ACTOR_SIZE: f32 = 30.0;
    /// Downward acceleration per reference step
    pub const GRAVITY: f32 = 0.6;
    /// Upward velocity applied by an instant jump
    pub const JUMP_IMPULSE: f32 = 12.0;

    /// Collision boxes are inset by this much on their trailing edges
    pub const COLLISION_TOLERANCE: f32 = 5.0;

    /// Mushroom defaults
    pub const BASE_SPEED: f32 = 3.0;
    pub const MAX_SPEED: f32 = 8.0;
    pub const SPAWN_INTERVAL_MS: f64 = 2000.0;
    pub const MIN_SPAWN_INTERVAL_MS: f64 = 1000.0;
    pub const MAX_LIVE_OBSTACLES: usize = 3;
}

/// Convert a frame delta into a multiple of the reference step.
///
/// Zero, negative and non-finite deltas count as exactly one reference step.
#[inline]
pub fn frame_scale(delta_ms: f64) -> f32 {
    if delta_ms.is_finite() && delta_ms > 0.0 {
        (delta_ms / consts::REFERENCE_FRAME_MS) as f32
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_scale_reference_step_is_one() {
        assert!((frame_scale(consts::REFERENCE_FRAME_MS) - 1.0).abs() < 1e-6);
        assert!((frame_scale(consts::REFERENCE_FRAME_MS * 2.0) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_frame_scale_degenerate_deltas() {
        assert_eq!(frame_scale(0.0), 1.0);
        assert_eq!(frame_scale(-5.0), 1.0);
        assert_eq!(frame_scale(f64::NAN), 1.0);
        assert_eq!(frame_scale(f64::INFINITY), 1.0);
    }
}
