//! Mushroom spawning, scrolling and difficulty ramp
//!
//! The manager owns every live mushroom in spawn order. Spawning is driven by
//! an elapsed-time accumulator; difficulty is raised from outside (the session
//! calls `increase_difficulty` / `increase_speed` at score milestones).

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::obstacle::Obstacle;
use crate::config::{DifficultyConfig, FieldGeometry, ObstacleConfig, SpeedModel};
use crate::frame_scale;

/// Owns the live mushrooms and the spawn/difficulty state
#[derive(Debug, Clone)]
pub struct ObstacleManager {
    config: ObstacleConfig,
    difficulty: DifficultyConfig,
    field: FieldGeometry,
    /// Live mushrooms, oldest first
    obstacles: Vec<Obstacle>,
    /// Milliseconds accumulated toward the next spawn
    spawn_timer_ms: f64,
    spawn_interval_ms: f64,
    speed: f32,
    target_speed: f32,
    rng: Pcg32,
    next_id: u32,
}

impl ObstacleManager {
    pub fn new(
        config: ObstacleConfig,
        difficulty: DifficultyConfig,
        field: FieldGeometry,
        seed: u64,
    ) -> Self {
        Self {
            config,
            difficulty,
            field,
            obstacles: Vec::new(),
            spawn_timer_ms: 0.0,
            spawn_interval_ms: config.spawn_interval_ms,
            speed: config.base_speed,
            target_speed: config.base_speed,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn obstacles_mut(&mut self) -> &mut [Obstacle] {
        &mut self.obstacles
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn target_speed(&self) -> f32 {
        self.target_speed
    }

    pub fn spawn_interval_ms(&self) -> f64 {
        self.spawn_interval_ms
    }

    pub fn spawn_timer_ms(&self) -> f64 {
        self.spawn_timer_ms
    }

    /// X of the most recently spawned mushroom still on the field
    pub fn last_spawn_x(&self) -> Option<f32> {
        self.obstacles.last().map(|o| o.pos.x)
    }

    /// Empty field, base speed, initial interval
    pub fn reset(&mut self) {
        self.obstacles.clear();
        self.spawn_timer_ms = 0.0;
        self.spawn_interval_ms = self.config.spawn_interval_ms;
        self.speed = self.config.base_speed;
        self.target_speed = self.config.base_speed;
    }

    /// Advance one frame. Returns the mushrooms that left the field this frame.
    pub fn advance(&mut self, delta_ms: f64) -> Vec<Obstacle> {
        self.ease_speed(delta_ms);

        let speed = self.speed;
        for obstacle in &mut self.obstacles {
            obstacle.speed = speed;
            obstacle.update(delta_ms);
        }

        let mut despawned = Vec::new();
        self.obstacles.retain(|o| {
            if o.is_off_screen() {
                despawned.push(o.clone());
                false
            } else {
                true
            }
        });

        if delta_ms.is_finite() && delta_ms > 0.0 {
            self.spawn_timer_ms += delta_ms;
        }
        if self.spawn_timer_ms >= self.spawn_interval_ms && self.spawn() {
            self.spawn_timer_ms = 0.0;
            if self.rng.random::<f32>() < self.config.cluster_chance {
                self.spawn();
            }
        }

        despawned
    }

    /// Spawn one mushroom at the right edge, respecting the gap and the cap.
    /// Returns false when the field is already full.
    pub fn spawn(&mut self) -> bool {
        if self.obstacles.len() >= self.config.max_live {
            return false;
        }

        let x = match self.obstacles.last() {
            Some(last) => self.field.width.max(last.right() + self.config.min_gap),
            None => self.field.width,
        };
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);

        let obstacle = Obstacle::random(
            id,
            x,
            self.field.ground_y,
            self.speed,
            self.config.kinds,
            &self.config.size_weights,
            &mut self.rng,
        );
        log::trace!(
            "spawned {:?} {:?} at x={:.1} (live={})",
            obstacle.kind,
            obstacle.tier,
            x,
            self.obstacles.len() + 1
        );
        self.obstacles.push(obstacle);
        true
    }

    /// Small speed increase plus a shorter spawn interval
    pub fn increase_difficulty(&mut self) {
        self.raise_target(self.difficulty.speed_step);
        self.spawn_interval_ms = (self.spawn_interval_ms * self.difficulty.interval_decay)
            .max(self.config.min_spawn_interval_ms);
        log::debug!(
            "difficulty up: target speed {:.2}, spawn interval {:.0}ms",
            self.target_speed,
            self.spawn_interval_ms
        );
    }

    /// Larger speed increase; spawn interval untouched
    pub fn increase_speed(&mut self) {
        self.raise_target(self.difficulty.speed_bump);
        log::debug!("speed up: target speed {:.2}", self.target_speed);
    }

    fn raise_target(&mut self, step: f32) {
        self.target_speed = (self.target_speed + step).min(self.config.max_speed);
        if self.config.speed_model == SpeedModel::Instant {
            self.speed = self.target_speed;
        }
    }

    fn ease_speed(&mut self, delta_ms: f64) {
        match self.config.speed_model {
            SpeedModel::Instant => self.speed = self.target_speed,
            SpeedModel::Eased { rate } => {
                let t = (rate * frame_scale(delta_ms)).min(1.0);
                self.speed += (self.target_speed - self.speed) * t;
                self.speed = self.speed.min(self.config.max_speed);
            }
        }
    }
}
