//! Data-driven game balance
//!
//! Every tunable the simulation reads lives here. Variant behaviour (jump
//! model, scoring policy, speed smoothing, mushroom set) is picked with enums
//! rather than mode flags, so one `GameConfig` describes one complete ruleset.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Playing field dimensions in canvas units (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldGeometry {
    pub width: f32,
    pub height: f32,
    /// Y of the ground line; actors and mushrooms stand on it
    pub ground_y: f32,
}

impl Default for FieldGeometry {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            ground_y: GROUND_Y,
        }
    }
}

/// How a jump press turns into upward velocity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum JumpModel {
    /// Fixed impulse applied on press
    Instant { impulse: f32 },
    /// Press-and-hold: impulse grows linearly with hold time up to `max_charge_ms`
    Charged {
        min_impulse: f32,
        max_impulse: f32,
        max_charge_ms: f64,
    },
}

impl Default for JumpModel {
    fn default() -> Self {
        JumpModel::Instant {
            impulse: JUMP_IMPULSE,
        }
    }
}

/// Player character tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    /// Fixed horizontal position
    pub x: f32,
    pub width: f32,
    pub height: f32,
    /// Downward acceleration per reference step
    pub gravity: f32,
    pub jump: JumpModel,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            x: ACTOR_X,
            width: ACTOR_SIZE,
            height: ACTOR_SIZE,
            gravity: GRAVITY,
            jump: JumpModel::default(),
        }
    }
}

/// Which mushrooms can appear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindSet {
    /// Red, brown, purple, golden
    #[default]
    Classic,
    /// Classic plus blue, spotted, shadow
    Extended,
}

/// Probability of the small and medium size tiers; large takes the remainder
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeWeights {
    pub small: f32,
    pub medium: f32,
}

impl Default for SizeWeights {
    fn default() -> Self {
        Self {
            small: 0.35,
            medium: 0.35,
        }
    }
}

/// How the scroll speed follows its target after a difficulty bump
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum SpeedModel {
    /// Current speed jumps straight to the target
    Instant,
    /// Current speed closes `rate` of the remaining gap per reference step
    Eased { rate: f32 },
}

impl Default for SpeedModel {
    fn default() -> Self {
        SpeedModel::Eased { rate: 0.01 }
    }
}

/// Mushroom spawning and movement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    pub kinds: KindSet,
    pub size_weights: SizeWeights,
    /// Scroll speed per reference step at the start of a run
    pub base_speed: f32,
    pub max_speed: f32,
    pub speed_model: SpeedModel,
    pub spawn_interval_ms: f64,
    pub min_spawn_interval_ms: f64,
    /// Minimum horizontal gap between consecutive spawns
    pub min_gap: f32,
    /// Chance that a spawn brings a second mushroom right behind it
    pub cluster_chance: f32,
    /// Live mushroom cap
    pub max_live: usize,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            kinds: KindSet::default(),
            size_weights: SizeWeights::default(),
            base_speed: BASE_SPEED,
            max_speed: MAX_SPEED,
            speed_model: SpeedModel::default(),
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            min_spawn_interval_ms: MIN_SPAWN_INTERVAL_MS,
            min_gap: 40.0,
            cluster_chance: 0.15,
            max_live: MAX_LIVE_OBSTACLES,
        }
    }
}

/// Step sizes for the two difficulty operations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    /// Target speed added by `increase_difficulty`
    pub speed_step: f32,
    /// Spawn interval multiplier applied by `increase_difficulty`
    pub interval_decay: f64,
    /// Target speed added by `increase_speed`
    pub speed_bump: f32,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            speed_step: 0.5,
            interval_decay: 0.95,
            speed_bump: 1.0,
        }
    }
}

/// When an avoided mushroom pays out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTrigger {
    /// When it leaves the field on the left
    OffScreen,
    /// When its trailing edge passes the hedgehog
    #[default]
    PassedActor,
}

/// How score accumulates during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ScoringPolicy {
    /// One point per `ms_per_point` survived
    Survival {
        ms_per_point: u64,
        /// Score multiple that triggers `increase_difficulty`
        difficulty_every: u64,
        /// Score multiple that triggers `increase_speed`
        speed_bump_every: u64,
    },
    /// Each avoided mushroom pays its point value once
    Obstacles {
        trigger: ScoreTrigger,
        difficulty_every: u64,
    },
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        ScoringPolicy::Survival {
            ms_per_point: 100,
            difficulty_every: 100,
            speed_bump_every: 300,
        }
    }
}

/// Complete ruleset for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub field: FieldGeometry,
    pub actor: ActorConfig,
    pub obstacles: ObstacleConfig,
    pub difficulty: DifficultyConfig,
    pub scoring: ScoringPolicy,
    pub collision_tolerance: f32,
    /// RNG seed for mushroom spawning
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field: FieldGeometry::default(),
            actor: ActorConfig::default(),
            obstacles: ObstacleConfig::default(),
            difficulty: DifficultyConfig::default(),
            scoring: ScoringPolicy::default(),
            collision_tolerance: COLLISION_TOLERANCE,
            seed: 0x4845_4447,
        }
    }
}

/// Configuration rejected at load time
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Parse(String),
    InvalidField { width: f32, height: f32, ground_y: f32 },
    InvalidActorSize { width: f32, height: f32 },
    NonPositiveGravity(f32),
    InvalidJump(&'static str),
    InvalidSpeedRange { base: f32, max: f32 },
    InvalidSpawnInterval { initial: f64, min: f64 },
    InvalidSizeWeights { small: f32, medium: f32 },
    InvalidClusterChance(f32),
    ZeroObstacleCap,
    InvalidDifficulty(&'static str),
    InvalidScoring(&'static str),
    NegativeTolerance(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::InvalidField {
                width,
                height,
                ground_y,
            } => write!(
                f,
                "invalid field: {width}x{height} with ground at {ground_y}"
            ),
            Self::InvalidActorSize { width, height } => {
                write!(f, "invalid actor size: {width}x{height}")
            }
            Self::NonPositiveGravity(g) => write!(f, "gravity must be positive, got {g}"),
            Self::InvalidJump(reason) => write!(f, "invalid jump model: {reason}"),
            Self::InvalidSpeedRange { base, max } => {
                write!(f, "speed range invalid: base={base}, max={max}")
            }
            Self::InvalidSpawnInterval { initial, min } => write!(
                f,
                "spawn interval invalid: initial={initial}ms, min={min}ms"
            ),
            Self::InvalidSizeWeights { small, medium } => {
                write!(f, "size weights invalid: small={small}, medium={medium}")
            }
            Self::InvalidClusterChance(p) => {
                write!(f, "cluster chance must be within 0..=1, got {p}")
            }
            Self::ZeroObstacleCap => write!(f, "max_live must allow at least one obstacle"),
            Self::InvalidDifficulty(reason) => write!(f, "invalid difficulty: {reason}"),
            Self::InvalidScoring(reason) => write!(f, "invalid scoring policy: {reason}"),
            Self::NegativeTolerance(t) => {
                write!(f, "collision tolerance must not be negative, got {t}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl GameConfig {
    /// Parse and validate a JSON ruleset. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Ground-rest y for the actor (top edge while standing)
    pub fn actor_ground_y(&self) -> f32 {
        self.field.ground_y - self.actor.height
    }

    /// Reject rulesets the simulation cannot honour
    pub fn validate(&self) -> Result<(), ConfigError> {
        let field = &self.field;
        if !(field.width > 0.0
            && field.height > 0.0
            && field.ground_y > 0.0
            && field.ground_y <= field.height)
        {
            return Err(ConfigError::InvalidField {
                width: field.width,
                height: field.height,
                ground_y: field.ground_y,
            });
        }

        let actor = &self.actor;
        if !(actor.width > 0.0 && actor.height > 0.0 && actor.height <= field.ground_y) {
            return Err(ConfigError::InvalidActorSize {
                width: actor.width,
                height: actor.height,
            });
        }
        // Landing is only guaranteed with a strictly positive pull
        if !(actor.gravity > 0.0) {
            return Err(ConfigError::NonPositiveGravity(actor.gravity));
        }
        match actor.jump {
            JumpModel::Instant { impulse } if !(impulse > 0.0) => {
                return Err(ConfigError::InvalidJump("impulse must be positive"));
            }
            JumpModel::Charged {
                min_impulse,
                max_impulse,
                max_charge_ms,
            } => {
                if !(min_impulse > 0.0 && min_impulse <= max_impulse) {
                    return Err(ConfigError::InvalidJump(
                        "charged impulses need 0 < min <= max",
                    ));
                }
                if !(max_charge_ms > 0.0) {
                    return Err(ConfigError::InvalidJump("max_charge_ms must be positive"));
                }
            }
            _ => {}
        }

        let obstacles = &self.obstacles;
        if !(obstacles.base_speed >= 0.0 && obstacles.base_speed <= obstacles.max_speed) {
            return Err(ConfigError::InvalidSpeedRange {
                base: obstacles.base_speed,
                max: obstacles.max_speed,
            });
        }
        if !(obstacles.min_spawn_interval_ms > 0.0
            && obstacles.min_spawn_interval_ms <= obstacles.spawn_interval_ms)
        {
            return Err(ConfigError::InvalidSpawnInterval {
                initial: obstacles.spawn_interval_ms,
                min: obstacles.min_spawn_interval_ms,
            });
        }
        let weights = obstacles.size_weights;
        if !(weights.small >= 0.0 && weights.medium >= 0.0 && weights.small + weights.medium <= 1.0)
        {
            return Err(ConfigError::InvalidSizeWeights {
                small: weights.small,
                medium: weights.medium,
            });
        }
        if !(0.0..=1.0).contains(&obstacles.cluster_chance) {
            return Err(ConfigError::InvalidClusterChance(obstacles.cluster_chance));
        }
        if obstacles.max_live == 0 {
            return Err(ConfigError::ZeroObstacleCap);
        }
        if let SpeedModel::Eased { rate } = obstacles.speed_model {
            if !(rate > 0.0 && rate <= 1.0) {
                return Err(ConfigError::InvalidDifficulty("eased rate must be within (0, 1]"));
            }
        }

        let difficulty = &self.difficulty;
        if !(difficulty.interval_decay > 0.0 && difficulty.interval_decay <= 1.0) {
            return Err(ConfigError::InvalidDifficulty(
                "interval_decay must be within (0, 1]",
            ));
        }
        if !(difficulty.speed_step >= 0.0 && difficulty.speed_bump >= 0.0) {
            return Err(ConfigError::InvalidDifficulty("speed steps must not be negative"));
        }

        match self.scoring {
            ScoringPolicy::Survival {
                ms_per_point,
                difficulty_every,
                speed_bump_every,
            } => {
                if ms_per_point == 0 || difficulty_every == 0 || speed_bump_every == 0 {
                    return Err(ConfigError::InvalidScoring("survival intervals must be non-zero"));
                }
            }
            ScoringPolicy::Obstacles {
                difficulty_every, ..
            } => {
                if difficulty_every == 0 {
                    return Err(ConfigError::InvalidScoring("difficulty_every must be non-zero"));
                }
            }
        }

        if !(self.collision_tolerance >= 0.0) {
            return Err(ConfigError::NegativeTolerance(self.collision_tolerance));
        }

        Ok(())
    }
}
