//! Run lifecycle: waiting, playing, game over
//!
//! A `Session` owns everything one game needs. The host feeds it input events
//! and animation-frame timestamps; it answers whether another frame is wanted.

use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::obstacle::Obstacle;
use super::scoring::{award, milestones_crossed, survival_score};
use super::spawner::ObstacleManager;
use super::tick::{FrameTimer, step};
use crate::audio::{AudioSink, SoundCue};
use crate::config::{ConfigError, GameConfig, ScoringPolicy};
use crate::persistence::GameStorage;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Before the first run
    Waiting,
    Playing,
    Over,
}

/// Player intents, already mapped from raw devices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    JumpPress,
    JumpRelease,
    Start,
    Restart,
    ToggleMute,
}

pub struct Session {
    config: GameConfig,
    state: SessionState,
    actor: Actor,
    manager: ObstacleManager,
    score: u64,
    high_score: u64,
    muted: bool,
    run_start_ms: f64,
    timer: FrameTimer,
    storage: GameStorage,
    audio: Box<dyn AudioSink>,
}

impl Session {
    /// Build a session in `Waiting`, loading the high score and mute flag
    pub fn new(
        config: GameConfig,
        storage: GameStorage,
        audio: Box<dyn AudioSink>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let actor = Actor::new(&config.actor, config.actor_ground_y());
        let manager = ObstacleManager::new(
            config.obstacles,
            config.difficulty,
            config.field,
            config.seed,
        );
        let high_score = storage.high_score();
        let muted = storage.muted();
        log::info!("session ready (high score {high_score}, muted {muted})");

        Ok(Self {
            config,
            state: SessionState::Waiting,
            actor,
            manager,
            score: 0,
            high_score,
            muted,
            run_start_ms: 0.0,
            timer: FrameTimer::new(),
            storage,
            audio,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == SessionState::Playing
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        self.manager.obstacles()
    }

    pub fn manager(&self) -> &ObstacleManager {
        &self.manager
    }

    /// Timestamp the current (or last) run started at
    pub fn run_start_ms(&self) -> f64 {
        self.run_start_ms
    }

    /// Wipe the persisted values and forget the high score
    pub fn clear_saved_data(&mut self) {
        self.storage.clear_all();
        self.high_score = 0;
        log::info!("saved data cleared");
    }

    /// Apply one input event delivered at `now_ms`
    pub fn handle_input(&mut self, event: InputEvent, now_ms: f64) {
        match (event, self.state) {
            (InputEvent::ToggleMute, _) => {
                self.muted = !self.muted;
                self.storage.save_muted(self.muted);
                log::info!("muted: {}", self.muted);
            }
            (InputEvent::JumpPress, SessionState::Waiting) => self.start_run(now_ms),
            (InputEvent::JumpPress, SessionState::Playing) => {
                if self.actor.press_jump(now_ms) {
                    self.cue(SoundCue::Jump);
                }
            }
            (InputEvent::JumpRelease, SessionState::Playing) => {
                if self.actor.release_jump(now_ms) {
                    self.cue(SoundCue::Jump);
                }
            }
            (InputEvent::Start | InputEvent::Restart, SessionState::Waiting | SessionState::Over) => {
                self.start_run(now_ms)
            }
            _ => {}
        }
    }

    /// Advance one animation frame. Returns true while another frame is wanted.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        if self.state != SessionState::Playing {
            return false;
        }

        let delta_ms = self.timer.delta(now_ms);
        let prev_score = self.score;

        if let ScoringPolicy::Survival { ms_per_point, .. } = self.config.scoring {
            let elapsed = survival_score(now_ms - self.run_start_ms, ms_per_point);
            self.score = self.score.max(elapsed);
        }

        let report = step(
            &mut self.actor,
            &mut self.manager,
            delta_ms,
            self.config.collision_tolerance,
        );
        if let Some(id) = report.collision {
            log::debug!("hit mushroom {id}");
            self.game_over();
            return false;
        }

        if let ScoringPolicy::Obstacles { trigger, .. } = self.config.scoring {
            let actor_x = self.actor.pos.x;
            let mut gained = 0;
            for mut obstacle in report.despawned {
                gained += award(&mut obstacle, trigger, actor_x, true).unwrap_or(0);
            }
            for obstacle in self.manager.obstacles_mut() {
                gained += award(obstacle, trigger, actor_x, false).unwrap_or(0);
            }
            if gained > 0 {
                self.score += gained;
                self.cue(SoundCue::Score);
            }
        }

        self.apply_milestones(prev_score);
        true
    }

    fn apply_milestones(&mut self, prev_score: u64) {
        match self.config.scoring {
            ScoringPolicy::Survival {
                difficulty_every,
                speed_bump_every,
                ..
            } => {
                let steps = milestones_crossed(prev_score, self.score, difficulty_every);
                for _ in 0..steps {
                    self.manager.increase_difficulty();
                }
                for _ in 0..milestones_crossed(prev_score, self.score, speed_bump_every) {
                    self.manager.increase_speed();
                }
                if steps > 0 {
                    self.cue(SoundCue::Score);
                }
            }
            ScoringPolicy::Obstacles {
                difficulty_every, ..
            } => {
                for _ in 0..milestones_crossed(prev_score, self.score, difficulty_every) {
                    self.manager.increase_difficulty();
                }
            }
        }
    }

    fn start_run(&mut self, now_ms: f64) {
        self.actor.reset();
        self.manager.reset();
        self.score = 0;
        self.run_start_ms = now_ms;
        self.timer.reset(now_ms);
        self.state = SessionState::Playing;
        self.audio.resume();
        log::info!("run started");
    }

    fn game_over(&mut self) {
        self.state = SessionState::Over;
        self.cue(SoundCue::Collision);
        if self.score > self.high_score {
            self.high_score = self.score;
            self.storage.save_high_score(self.score);
            log::info!("game over: new high score {}", self.score);
        } else {
            log::info!("game over: score {} (best {})", self.score, self.high_score);
        }
    }

    fn cue(&mut self, cue: SoundCue) {
        if !self.muted {
            self.audio.play(cue);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::config::{JumpModel, ObstacleConfig, ScoreTrigger, SpeedModel};
    use crate::consts::REFERENCE_FRAME_MS;
    use crate::persistence::{HIGH_SCORE_KEY, KeyValueStore, MemoryStore};

    #[derive(Clone, Default)]
    struct RecordingAudio(Rc<RefCell<Vec<SoundCue>>>);

    impl AudioSink for RecordingAudio {
        fn play(&mut self, cue: SoundCue) {
            self.0.borrow_mut().push(cue);
        }
    }

    struct Harness {
        session: Session,
        store: MemoryStore,
        cues: RecordingAudio,
    }

    fn harness(config: GameConfig) -> Harness {
        let store = MemoryStore::new();
        let cues = RecordingAudio::default();
        let session = Session::new(
            config,
            GameStorage::new(Box::new(store.clone())),
            Box::new(cues.clone()),
        )
        .unwrap();
        Harness {
            session,
            store,
            cues,
        }
    }

    /// No spawns unless a test places mushrooms itself
    fn quiet_config() -> GameConfig {
        GameConfig {
            obstacles: ObstacleConfig {
                spawn_interval_ms: 1.0e9,
                cluster_chance: 0.0,
                ..ObstacleConfig::default()
            },
            ..GameConfig::default()
        }
    }

    fn obstacles_config(trigger: ScoreTrigger) -> GameConfig {
        GameConfig {
            scoring: ScoringPolicy::Obstacles {
                trigger,
                difficulty_every: 15,
            },
            ..quiet_config()
        }
    }

    /// Drop a mushroom right on top of the hedgehog
    fn place_mushroom_on_actor(session: &mut Session) {
        session.manager.spawn();
        let x = session.actor.pos.x;
        if let Some(o) = session.manager.obstacles_mut().last_mut() {
            o.pos.x = x;
        }
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = GameConfig::default();
        config.actor.gravity = -1.0;
        let result = Session::new(config, GameStorage::in_memory(), Box::new(RecordingAudio::default()));
        assert!(matches!(result, Err(ConfigError::NonPositiveGravity(_))));
    }

    #[test]
    fn test_new_loads_saved_values() {
        let mut store = MemoryStore::new();
        store.set(HIGH_SCORE_KEY, "77").unwrap();
        store.set(crate::persistence::MUTE_KEY, "true").unwrap();
        let session = Session::new(
            GameConfig::default(),
            GameStorage::new(Box::new(store)),
            Box::new(RecordingAudio::default()),
        )
        .unwrap();
        assert_eq!(session.high_score(), 77);
        assert!(session.is_muted());
        assert_eq!(session.state(), SessionState::Waiting);
    }

    #[test]
    fn test_waiting_does_not_step() {
        let mut h = harness(quiet_config());
        assert!(!h.session.frame(100.0));
        assert_eq!(h.session.score(), 0);
        assert_eq!(h.session.state(), SessionState::Waiting);
    }

    #[test]
    fn test_jump_press_starts_run_without_jumping() {
        let mut h = harness(quiet_config());
        h.session.handle_input(InputEvent::JumpPress, 500.0);
        assert_eq!(h.session.state(), SessionState::Playing);
        assert!(h.session.actor().is_grounded());
        assert_eq!(h.session.run_start_ms(), 500.0);

        h.session.handle_input(InputEvent::JumpPress, 520.0);
        assert!(!h.session.actor().is_grounded());
        assert_eq!(*h.cues.0.borrow(), vec![SoundCue::Jump]);
    }

    #[test]
    fn test_collision_ends_run_and_keeps_high_score() {
        let mut h = harness(quiet_config());
        h.session.handle_input(InputEvent::Start, 0.0);
        place_mushroom_on_actor(&mut h.session);

        assert!(!h.session.frame(REFERENCE_FRAME_MS));
        assert_eq!(h.session.state(), SessionState::Over);
        assert_eq!(h.session.score(), 0);
        assert_eq!(h.session.high_score(), 0);
        assert!(h.store.raw(HIGH_SCORE_KEY).is_none());
        assert_eq!(*h.cues.0.borrow(), vec![SoundCue::Collision]);

        // Over halts stepping and ignores jumps
        assert!(!h.session.frame(100.0));
        h.session.handle_input(InputEvent::JumpPress, 120.0);
        assert_eq!(h.session.state(), SessionState::Over);
    }

    #[test]
    fn test_survival_score_and_single_difficulty_step() {
        let mut h = harness(quiet_config());
        h.session.handle_input(InputEvent::Start, 1000.0);
        assert!(h.session.frame(2000.0));
        assert_eq!(h.session.score(), 10);
        assert_eq!(h.session.manager().target_speed(), 3.0);

        assert!(h.session.frame(11_000.0));
        assert_eq!(h.session.score(), 100);
        assert_eq!(h.session.manager().target_speed(), 3.5);
        assert!((h.session.manager().spawn_interval_ms() - 0.95e9).abs() < 1.0);

        // Same score again does not re-trigger
        assert!(h.session.frame(11_050.0));
        assert_eq!(h.session.manager().target_speed(), 3.5);
    }

    #[test]
    fn test_survival_speed_bump_at_300() {
        let mut h = harness(quiet_config());
        h.session.handle_input(InputEvent::Start, 0.0);
        h.session.frame(30_000.0);
        assert_eq!(h.session.score(), 300);
        // Three difficulty steps (+1.5) and one speed bump (+1.0)
        assert!((h.session.manager().target_speed() - 5.5).abs() < 1e-5);
    }

    #[test]
    fn test_game_over_saves_new_high_score() {
        let mut h = harness(quiet_config());
        h.session.handle_input(InputEvent::Start, 0.0);
        h.session.frame(4_200.0);
        assert_eq!(h.session.score(), 42);
        place_mushroom_on_actor(&mut h.session);
        h.session.frame(4_216.0);
        assert_eq!(h.session.state(), SessionState::Over);
        assert_eq!(h.session.high_score(), 42);
        assert_eq!(h.store.raw(HIGH_SCORE_KEY).as_deref(), Some("42"));

        // A worse run leaves it alone
        h.session.handle_input(InputEvent::Restart, 10_000.0);
        assert_eq!(h.session.score(), 0);
        assert!(h.session.obstacles().is_empty());
        h.session.frame(10_500.0);
        place_mushroom_on_actor(&mut h.session);
        h.session.frame(10_516.0);
        assert_eq!(h.session.high_score(), 42);
    }

    #[test]
    fn test_start_ignored_while_playing() {
        let mut h = harness(quiet_config());
        h.session.handle_input(InputEvent::Start, 0.0);
        h.session.frame(1_000.0);
        h.session.handle_input(InputEvent::Restart, 1_010.0);
        assert_eq!(h.session.run_start_ms(), 0.0);
        assert_eq!(h.session.score(), 10);
    }

    #[test]
    fn test_mute_persists_and_silences() {
        let mut h = harness(quiet_config());
        h.session.handle_input(InputEvent::ToggleMute, 0.0);
        assert!(h.session.is_muted());
        assert_eq!(h.store.raw(crate::persistence::MUTE_KEY).as_deref(), Some("true"));

        h.session.handle_input(InputEvent::Start, 0.0);
        h.session.handle_input(InputEvent::JumpPress, 10.0);
        place_mushroom_on_actor(&mut h.session);
        h.session.frame(20.0);
        assert!(h.cues.0.borrow().is_empty());
    }

    #[test]
    fn test_passed_actor_scores_once() {
        let mut h = harness(obstacles_config(ScoreTrigger::PassedActor));
        h.session.handle_input(InputEvent::Start, 0.0);
        h.session.manager.spawn();
        let kind_points = h.session.obstacles()[0].points();
        // Just about to clear the hedgehog
        let width = h.session.obstacles()[0].size.x;
        h.session.manager.obstacles_mut()[0].pos.x = h.session.actor().pos.x - width + 1.0;

        let mut now = 0.0;
        for _ in 0..40 {
            now += REFERENCE_FRAME_MS;
            assert!(h.session.frame(now));
        }
        assert_eq!(h.session.score(), kind_points);
        assert!(h.session.obstacles().is_empty());
    }

    #[test]
    fn test_off_screen_scores_after_despawn() {
        let mut h = harness(obstacles_config(ScoreTrigger::OffScreen));
        h.session.handle_input(InputEvent::Start, 0.0);
        h.session.manager.spawn();
        let points = h.session.obstacles()[0].points();
        let width = h.session.obstacles()[0].size.x;
        h.session.manager.obstacles_mut()[0].pos.x = -width + 4.0;

        assert!(h.session.frame(REFERENCE_FRAME_MS));
        assert_eq!(h.session.score(), 0);
        assert!(h.session.frame(REFERENCE_FRAME_MS * 2.0));
        assert_eq!(h.session.score(), points);
        assert!(h.cues.0.borrow().contains(&SoundCue::Score));
    }

    #[test]
    fn test_obstacle_policy_difficulty_every_15() {
        let mut h = harness(obstacles_config(ScoreTrigger::PassedActor));
        h.session.handle_input(InputEvent::Start, 0.0);
        h.session.score = 14;
        h.session.manager.spawn();
        let width = h.session.obstacles()[0].size.x;
        h.session.manager.obstacles_mut()[0].pos.x = -width + 2.0;
        h.session.frame(REFERENCE_FRAME_MS);
        assert!(h.session.score() >= 15);
        assert_eq!(h.session.manager().target_speed(), 3.5);
    }

    #[test]
    fn test_charged_jump_through_session() {
        let mut config = quiet_config();
        config.actor.jump = JumpModel::Charged {
            min_impulse: 8.0,
            max_impulse: 15.0,
            max_charge_ms: 300.0,
        };
        let mut h = harness(config);
        h.session.handle_input(InputEvent::Start, 0.0);
        h.session.handle_input(InputEvent::JumpRelease, 50.0);
        assert!(h.session.actor().is_grounded());

        h.session.handle_input(InputEvent::JumpPress, 100.0);
        assert!(h.session.actor().is_grounded());
        h.session.handle_input(InputEvent::JumpRelease, 400.0);
        assert_eq!(h.session.actor().velocity, -15.0);
    }

    #[test]
    fn test_instant_speed_model_snaps() {
        let mut config = quiet_config();
        config.obstacles.speed_model = SpeedModel::Instant;
        let mut h = harness(config);
        h.session.handle_input(InputEvent::Start, 0.0);
        h.session.frame(10_000.0);
        assert_eq!(h.session.manager().speed(), 3.5);
    }

    #[test]
    fn test_clear_saved_data() {
        let mut h = harness(quiet_config());
        h.session.handle_input(InputEvent::Start, 0.0);
        h.session.frame(500.0);
        place_mushroom_on_actor(&mut h.session);
        h.session.frame(516.0);
        assert_eq!(h.session.high_score(), 5);
        h.session.clear_saved_data();
        assert_eq!(h.session.high_score(), 0);
        assert!(h.store.is_empty());
    }
}
