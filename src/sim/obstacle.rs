//! Mushroom obstacles

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::config::{KindSet, SizeWeights};
use crate::frame_scale;

/// How threatening a mushroom looks. Cosmetic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DangerTier {
    Low,
    Medium,
    High,
    Extreme,
}

/// Mushroom variety; decides the points it is worth and its danger tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Red,
    Brown,
    Purple,
    Golden,
    Blue,
    Spotted,
    Shadow,
}

impl ObstacleKind {
    pub const CLASSIC: [ObstacleKind; 4] = [
        ObstacleKind::Red,
        ObstacleKind::Brown,
        ObstacleKind::Purple,
        ObstacleKind::Golden,
    ];

    pub const EXTENDED: [ObstacleKind; 7] = [
        ObstacleKind::Red,
        ObstacleKind::Brown,
        ObstacleKind::Purple,
        ObstacleKind::Golden,
        ObstacleKind::Blue,
        ObstacleKind::Spotted,
        ObstacleKind::Shadow,
    ];

    /// Kinds available under a set
    pub fn set(kinds: KindSet) -> &'static [ObstacleKind] {
        match kinds {
            KindSet::Classic => &Self::CLASSIC,
            KindSet::Extended => &Self::EXTENDED,
        }
    }

    pub fn points(&self) -> u64 {
        match self {
            ObstacleKind::Red | ObstacleKind::Blue => 1,
            ObstacleKind::Brown | ObstacleKind::Spotted => 2,
            ObstacleKind::Purple => 3,
            ObstacleKind::Shadow => 4,
            ObstacleKind::Golden => 5,
        }
    }

    pub fn danger(&self) -> DangerTier {
        match self {
            ObstacleKind::Red | ObstacleKind::Blue => DangerTier::Low,
            ObstacleKind::Brown | ObstacleKind::Spotted => DangerTier::Medium,
            ObstacleKind::Purple | ObstacleKind::Shadow => DangerTier::High,
            ObstacleKind::Golden => DangerTier::Extreme,
        }
    }
}

/// Mushroom size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeTier {
    Small,
    Medium,
    Large,
}

impl SizeTier {
    /// (width, height)
    pub fn dimensions(&self) -> Vec2 {
        match self {
            SizeTier::Small => Vec2::new(25.0, 30.0),
            SizeTier::Medium => Vec2::new(35.0, 40.0),
            SizeTier::Large => Vec2::new(45.0, 50.0),
        }
    }

    /// Map a uniform sample in `[0, 1)` onto a tier
    pub fn from_roll(roll: f32, weights: &SizeWeights) -> Self {
        if roll < weights.small {
            SizeTier::Small
        } else if roll < weights.small + weights.medium {
            SizeTier::Medium
        } else {
            SizeTier::Large
        }
    }
}

/// Cosmetic animation speed (frames per reference step)
const ANIMATION_SPEED: f32 = 0.15;

/// A mushroom scrolling toward the hedgehog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Top-left corner; only x changes after spawn
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: ObstacleKind,
    pub tier: SizeTier,
    /// Leftward speed per reference step
    pub speed: f32,
    /// Set once the mushroom has paid out; never cleared
    pub scored: bool,
    pub anim_frame: f32,
}

impl Obstacle {
    pub fn new(id: u32, x: f32, ground_y: f32, kind: ObstacleKind, tier: SizeTier, speed: f32) -> Self {
        let size = tier.dimensions();
        Self {
            id,
            pos: Vec2::new(x, ground_y - size.y),
            size,
            kind,
            tier,
            speed,
            scored: false,
            anim_frame: 0.0,
        }
    }

    /// Random kind (uniform over the set) and size (weighted), standing on the ground
    pub fn random<R: Rng>(
        id: u32,
        x: f32,
        ground_y: f32,
        speed: f32,
        kinds: KindSet,
        weights: &SizeWeights,
        rng: &mut R,
    ) -> Self {
        let set = ObstacleKind::set(kinds);
        let kind = set[rng.random_range(0..set.len())];
        let tier = SizeTier::from_roll(rng.random::<f32>(), weights);
        Self::new(id, x, ground_y, kind, tier, speed)
    }

    /// Scroll left over `delta_ms`
    pub fn update(&mut self, delta_ms: f64) {
        let scale = frame_scale(delta_ms);
        self.pos.x -= self.speed * scale;
        self.anim_frame = (self.anim_frame + ANIMATION_SPEED * scale) % 4.0;
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    /// Fully past the left edge of the field
    pub fn is_off_screen(&self) -> bool {
        self.right() < 0.0
    }

    /// Trailing edge is behind the actor's fixed x
    pub fn has_passed(&self, actor_x: f32) -> bool {
        self.right() < actor_x
    }

    pub fn points(&self) -> u64 {
        self.kind.points()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::REFERENCE_FRAME_MS;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_stands_on_ground() {
        let obstacle = Obstacle::new(1, 600.0, 120.0, ObstacleKind::Red, SizeTier::Large, 3.0);
        assert_eq!(obstacle.pos, Vec2::new(600.0, 70.0));
        assert_eq!(obstacle.bounds().bottom(), 120.0);
        assert!(!obstacle.scored);
    }

    #[test]
    fn test_update_scales_with_delta() {
        let mut obstacle = Obstacle::new(1, 600.0, 120.0, ObstacleKind::Red, SizeTier::Small, 3.0);
        obstacle.update(REFERENCE_FRAME_MS);
        assert!((obstacle.pos.x - 597.0).abs() < 1e-4);
        obstacle.update(REFERENCE_FRAME_MS * 2.0);
        assert!((obstacle.pos.x - 591.0).abs() < 1e-4);
    }

    #[test]
    fn test_degenerate_delta_moves_one_step() {
        let mut obstacle = Obstacle::new(1, 600.0, 120.0, ObstacleKind::Red, SizeTier::Small, 3.0);
        obstacle.update(0.0);
        assert!((obstacle.pos.x - 597.0).abs() < 1e-4);
        obstacle.update(-40.0);
        assert!((obstacle.pos.x - 594.0).abs() < 1e-4);
    }

    #[test]
    fn test_off_screen_and_passed() {
        let mut obstacle = Obstacle::new(1, 30.0, 120.0, ObstacleKind::Red, SizeTier::Small, 3.0);
        assert!(!obstacle.has_passed(50.0));
        obstacle.pos.x = 24.0;
        assert!(obstacle.has_passed(50.0));
        assert!(!obstacle.is_off_screen());
        obstacle.pos.x = -25.0;
        assert!(!obstacle.is_off_screen());
        obstacle.pos.x = -25.5;
        assert!(obstacle.is_off_screen());
    }

    #[test]
    fn test_kind_points_and_danger() {
        let total: u64 = ObstacleKind::CLASSIC.iter().map(|k| k.points()).sum();
        assert_eq!(total, 1 + 2 + 3 + 5);
        assert_eq!(ObstacleKind::Golden.danger(), DangerTier::Extreme);
        assert_eq!(ObstacleKind::set(KindSet::Extended).len(), 7);
    }

    #[test]
    fn test_size_roll_boundaries() {
        let weights = SizeWeights {
            small: 0.3,
            medium: 0.4,
        };
        assert_eq!(SizeTier::from_roll(0.0, &weights), SizeTier::Small);
        assert_eq!(SizeTier::from_roll(0.29, &weights), SizeTier::Small);
        assert_eq!(SizeTier::from_roll(0.3, &weights), SizeTier::Medium);
        assert_eq!(SizeTier::from_roll(0.69, &weights), SizeTier::Medium);
        assert_eq!(SizeTier::from_roll(0.71, &weights), SizeTier::Large);
    }

    #[test]
    fn test_random_uses_only_active_set() {
        let mut rng = Pcg32::seed_from_u64(7);
        for id in 0..200 {
            let obstacle = Obstacle::random(
                id,
                600.0,
                120.0,
                3.0,
                KindSet::Classic,
                &SizeWeights::default(),
                &mut rng,
            );
            assert!(ObstacleKind::CLASSIC.contains(&obstacle.kind));
            assert_eq!(obstacle.size, obstacle.tier.dimensions());
        }
    }

    proptest! {
        #[test]
        fn prop_moving_obstacle_leaves_in_bounded_steps(
            x in 0.0f32..2000.0,
            speed in 0.1f32..20.0,
        ) {
            let mut obstacle = Obstacle::new(1, x, 120.0, ObstacleKind::Red, SizeTier::Large, speed);
            // Allow for f32 drift over long runs
            let bound = ((x + obstacle.size.x) / speed * 1.01).ceil() as u32 + 2;
            let mut steps = 0;
            while !obstacle.is_off_screen() {
                obstacle.update(REFERENCE_FRAME_MS);
                steps += 1;
                prop_assert!(steps <= bound);
            }
        }

        #[test]
        fn prop_stationary_obstacle_never_leaves(x in 0.0f32..2000.0, steps in 1usize..500) {
            let mut obstacle = Obstacle::new(1, x, 120.0, ObstacleKind::Red, SizeTier::Small, 0.0);
            for _ in 0..steps {
                obstacle.update(REFERENCE_FRAME_MS);
                prop_assert!(!obstacle.is_off_screen());
            }
        }
    }
}
