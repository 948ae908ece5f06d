//! Variable timestep simulation step
//!
//! One step advances the hedgehog, then the mushrooms, then checks for a hit.
//! Frame deltas come from the host clock and are sanitised by [`FrameTimer`].

use super::actor::Actor;
use super::collision::collides_with_tolerance;
use super::obstacle::Obstacle;
use super::spawner::ObstacleManager;
use crate::consts::{MAX_FRAME_MS, REFERENCE_FRAME_MS};

/// Turns host timestamps into usable frame deltas
#[derive(Debug, Clone, Default)]
pub struct FrameTimer {
    last_ms: Option<f64>,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart timing from `now_ms` (start of a run)
    pub fn reset(&mut self, now_ms: f64) {
        self.last_ms = Some(now_ms);
    }

    pub fn last_ms(&self) -> Option<f64> {
        self.last_ms
    }

    /// Milliseconds since the previous call.
    ///
    /// Zero, negative or non-finite gaps count as one reference step; long
    /// gaps (tab switch) are clamped to `MAX_FRAME_MS`.
    pub fn delta(&mut self, now_ms: f64) -> f64 {
        let delta = match self.last_ms {
            Some(last) => now_ms - last,
            None => REFERENCE_FRAME_MS,
        };
        if now_ms.is_finite() {
            self.last_ms = Some(now_ms);
        }
        if !delta.is_finite() || delta <= 0.0 {
            REFERENCE_FRAME_MS
        } else {
            delta.min(MAX_FRAME_MS)
        }
    }
}

/// What happened during one step
#[derive(Debug, Clone, Default)]
pub struct StepReport {
    /// Id of the first live mushroom the hedgehog hit
    pub collision: Option<u32>,
    /// Mushrooms that left the field this step
    pub despawned: Vec<Obstacle>,
}

/// Advance the hedgehog and the mushrooms by `delta_ms`, then test for a hit.
///
/// Mushrooms are tested in spawn order and the first hit ends the test.
pub fn step(actor: &mut Actor, manager: &mut ObstacleManager, delta_ms: f64, tolerance: f32) -> StepReport {
    actor.update(delta_ms);
    let despawned = manager.advance(delta_ms);

    let hedgehog = actor.bounds();
    let collision = manager
        .obstacles()
        .iter()
        .find(|o| collides_with_tolerance(&hedgehog, &o.bounds(), tolerance))
        .map(|o| o.id);

    StepReport {
        collision,
        despawned,
    }
}

/// Demo autopilot: jump when the nearest mushroom ahead is within reach.
///
/// Reach grows with the scroll speed so the bot keeps up as the game speeds up.
pub fn autopilot_should_jump(actor: &Actor, obstacles: &[Obstacle]) -> bool {
    if !actor.is_grounded() {
        return false;
    }
    let front = actor.pos.x + actor.size.x;
    obstacles
        .iter()
        .filter(|o| o.right() > actor.pos.x)
        .min_by(|a, b| {
            a.pos
                .x
                .partial_cmp(&b.pos.x)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .is_some_and(|o| {
            let gap = o.pos.x - front;
            gap >= 0.0 && gap < o.speed * 6.0 + 4.0
        })
}
