//! Score arithmetic for the two scoring policies

use super::obstacle::Obstacle;
use crate::config::ScoreTrigger;

/// Whole points earned after surviving `elapsed_ms`
pub fn survival_score(elapsed_ms: f64, ms_per_point: u64) -> u64 {
    if ms_per_point == 0 || !elapsed_ms.is_finite() || elapsed_ms <= 0.0 {
        return 0;
    }
    (elapsed_ms / ms_per_point as f64).floor() as u64
}

/// Number of positive multiples of `every` in `(prev, new]`
pub fn milestones_crossed(prev: u64, new: u64, every: u64) -> u64 {
    if every == 0 || new <= prev {
        return 0;
    }
    new / every - prev / every
}

/// Pay out an obstacle if the trigger has fired and it has not paid yet.
///
/// `despawned` is true for obstacles that left the field this frame.
pub fn award(obstacle: &mut Obstacle, trigger: ScoreTrigger, actor_x: f32, despawned: bool) -> Option<u64> {
    if obstacle.scored {
        return None;
    }
    let fired = match trigger {
        ScoreTrigger::OffScreen => despawned,
        ScoreTrigger::PassedActor => despawned || obstacle.has_passed(actor_x),
    };
    if !fired {
        return None;
    }
    obstacle.scored = true;
    Some(obstacle.points())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacle::{ObstacleKind, SizeTier};
    use proptest::prelude::*;

    fn mushroom(x: f32, kind: ObstacleKind) -> Obstacle {
        Obstacle::new(1, x, 120.0, kind, SizeTier::Small, 3.0)
    }

    #[test]
    fn test_survival_score_floors() {
        assert_eq!(survival_score(0.0, 100), 0);
        assert_eq!(survival_score(99.9, 100), 0);
        assert_eq!(survival_score(1000.0, 100), 10);
        assert_eq!(survival_score(1050.0, 100), 10);
        assert_eq!(survival_score(-20.0, 100), 0);
        assert_eq!(survival_score(f64::NAN, 100), 0);
    }

    #[test]
    fn test_milestones_crossed() {
        assert_eq!(milestones_crossed(0, 99, 100), 0);
        assert_eq!(milestones_crossed(99, 100, 100), 1);
        assert_eq!(milestones_crossed(100, 100, 100), 0);
        // A single big jump can cross several milestones
        assert_eq!(milestones_crossed(95, 310, 100), 3);
        assert_eq!(milestones_crossed(14, 16, 15), 1);
        assert_eq!(milestones_crossed(10, 5, 15), 0);
    }

    #[test]
    fn test_passed_actor_awards_once() {
        let mut obstacle = mushroom(100.0, ObstacleKind::Purple);
        assert_eq!(award(&mut obstacle, ScoreTrigger::PassedActor, 50.0, false), None);
        obstacle.pos.x = 20.0;
        assert_eq!(award(&mut obstacle, ScoreTrigger::PassedActor, 50.0, false), Some(3));
        assert!(obstacle.scored);
        assert_eq!(award(&mut obstacle, ScoreTrigger::PassedActor, 50.0, false), None);
        assert_eq!(award(&mut obstacle, ScoreTrigger::PassedActor, 50.0, true), None);
    }

    #[test]
    fn test_off_screen_waits_for_despawn() {
        let mut obstacle = mushroom(0.0, ObstacleKind::Golden);
        assert_eq!(award(&mut obstacle, ScoreTrigger::OffScreen, 50.0, false), None);
        assert_eq!(award(&mut obstacle, ScoreTrigger::OffScreen, 50.0, true), Some(5));
        assert_eq!(award(&mut obstacle, ScoreTrigger::OffScreen, 50.0, true), None);
    }

    proptest! {
        #[test]
        fn prop_award_never_double_counts(
            xs in prop::collection::vec(-100.0f32..700.0, 1..50),
            off_screen in any::<bool>(),
        ) {
            let trigger = if off_screen { ScoreTrigger::OffScreen } else { ScoreTrigger::PassedActor };
            let mut obstacle = mushroom(600.0, ObstacleKind::Brown);
            let mut total = 0;
            for x in xs {
                obstacle.pos.x = x;
                let gone = obstacle.is_off_screen();
                total += award(&mut obstacle, trigger, 50.0, gone).unwrap_or(0);
            }
            prop_assert!(total == 0 || total == 2);
        }

        #[test]
        fn prop_milestones_sum_over_steps(steps in prop::collection::vec(0u64..40, 0..100), every in 1u64..50) {
            let mut score = 0;
            let mut crossed = 0;
            for step in steps {
                crossed += milestones_crossed(score, score + step, every);
                score += step;
            }
            prop_assert_eq!(crossed, score / every);
        }
    }
}
