//! Simulation module
//!
//! All gameplay logic lives here. This module stays free of rendering and
//! platform dependencies:
//! - Time enters only as frame deltas and input timestamps
//! - Seeded RNG only
//! - Stable iteration order (spawn order)

pub mod actor;
pub mod collision;
pub mod obstacle;
pub mod scoring;
pub mod session;
pub mod spawner;
pub mod tick;

pub use actor::{Actor, JumpState};
pub use collision::{Rect, collides, collides_with_tolerance};
pub use obstacle::{DangerTier, Obstacle, ObstacleKind, SizeTier};
pub use session::{InputEvent, Session, SessionState};
pub use spawner::ObstacleManager;
pub use tick::{FrameTimer, StepReport, autopilot_should_jump, step};
