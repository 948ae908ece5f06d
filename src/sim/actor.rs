//! The hedgehog: gravity integration and the two jump models

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::config::{ActorConfig, JumpModel};
use crate::frame_scale;

/// Cosmetic animation cycles through this many frames
pub const ANIMATION_FRAMES: f32 = 4.0;
/// Animation frames advanced per reference step
const ANIMATION_SPEED: f32 = 0.1;

/// Whether the actor is standing on the ground
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpState {
    Grounded,
    Airborne,
}

/// Impulse for a charged jump held for `held_ms`.
///
/// The hold time is clamped to `[0, max_charge_ms]` and the impulse is
/// interpolated linearly between `min_impulse` and `max_impulse`.
pub fn charged_impulse(held_ms: f64, min_impulse: f32, max_impulse: f32, max_charge_ms: f64) -> f32 {
    let ratio = if max_charge_ms > 0.0 {
        (held_ms / max_charge_ms).clamp(0.0, 1.0) as f32
    } else {
        1.0
    };
    min_impulse + (max_impulse - min_impulse) * ratio
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Top-left corner; x never changes after spawn
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity per reference step (negative is up)
    pub velocity: f32,
    /// Top edge y while standing on the ground
    pub ground_y: f32,
    pub state: JumpState,
    /// Timestamp of the press that started a charged jump
    pub charge_start_ms: Option<f64>,
    /// Cosmetic walk cycle in `[0, ANIMATION_FRAMES)`
    pub anim_frame: f32,
    gravity: f32,
    jump: JumpModel,
}

impl Actor {
    /// Create the actor standing on the ground
    pub fn new(config: &ActorConfig, ground_y: f32) -> Self {
        Self {
            pos: Vec2::new(config.x, ground_y),
            size: Vec2::new(config.width, config.height),
            velocity: 0.0,
            ground_y,
            state: JumpState::Grounded,
            charge_start_ms: None,
            anim_frame: 0.0,
            gravity: config.gravity,
            jump: config.jump,
        }
    }

    pub fn jump_model(&self) -> JumpModel {
        self.jump
    }

    pub fn is_grounded(&self) -> bool {
        self.state == JumpState::Grounded
    }

    /// Currently holding a charged jump
    pub fn is_charging(&self) -> bool {
        self.charge_start_ms.is_some()
    }

    /// Back to ground rest with no motion and no pending charge
    pub fn reset(&mut self) {
        self.pos.y = self.ground_y;
        self.velocity = 0.0;
        self.state = JumpState::Grounded;
        self.charge_start_ms = None;
        self.anim_frame = 0.0;
    }

    /// Collision box at the latest integrated position
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Launch with the given upward impulse if standing. Returns whether it launched.
    pub fn jump(&mut self, impulse: f32) -> bool {
        if self.state != JumpState::Grounded {
            return false;
        }
        self.velocity = -impulse;
        self.state = JumpState::Airborne;
        true
    }

    /// Jump button went down. Returns true if the actor left the ground.
    pub fn press_jump(&mut self, now_ms: f64) -> bool {
        match self.jump {
            JumpModel::Instant { impulse } => self.jump(impulse),
            JumpModel::Charged { .. } => {
                if self.is_grounded() && self.charge_start_ms.is_none() {
                    self.charge_start_ms = Some(now_ms);
                }
                false
            }
        }
    }

    /// Jump button came up. Returns true if the actor left the ground.
    ///
    /// A release without a recorded press is ignored.
    pub fn release_jump(&mut self, now_ms: f64) -> bool {
        let JumpModel::Charged {
            min_impulse,
            max_impulse,
            max_charge_ms,
        } = self.jump
        else {
            return false;
        };
        let Some(start) = self.charge_start_ms.take() else {
            return false;
        };
        let impulse = charged_impulse(now_ms - start, min_impulse, max_impulse, max_charge_ms);
        self.jump(impulse)
    }

    /// Integrate gravity over `delta_ms` (scaled to the 60 Hz reference step)
    pub fn update(&mut self, delta_ms: f64) {
        let scale = frame_scale(delta_ms);

        self.velocity += self.gravity * scale;
        self.pos.y += self.velocity * scale;

        // The ground is a hard floor
        if self.pos.y >= self.ground_y {
            self.pos.y = self.ground_y;
            self.velocity = 0.0;
            self.state = JumpState::Grounded;
        }

        self.anim_frame = (self.anim_frame + ANIMATION_SPEED * scale) % ANIMATION_FRAMES;
    }
}
