//! Simulation settings
//!
//! Shapes, colors, speeds and spawn policy for every entity kind. Loaded from
//! JSON; any key left out falls back to the built-in defaults.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::entity::Rgb;

/// Settings loading errors
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Values that parse but cannot drive a simulation
    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Arena extents, centered on the origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaSettings {
    pub width: f32,
    pub height: f32,
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

/// Player ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipSettings {
    /// Outline; the first vertex is the nose projectiles leave from
    pub vertices: Vec<Vec2>,
    pub color: Rgb,
    pub hit_color: Rgb,
    /// Ticks between shots
    pub reload_ticks: u32,
    /// Degrees turned per rotate command
    pub rotation_step: i32,
}

impl Default for ShipSettings {
    fn default() -> Self {
        Self {
            vertices: vec![
                Vec2::new(20.0, 0.0),
                Vec2::new(-10.0, -10.0),
                Vec2::new(0.0, 0.0),
                Vec2::new(-10.0, 10.0),
            ],
            color: Rgb::WHITE,
            hit_color: Rgb::RED,
            reload_ticks: SHIP_RELOAD_TICKS,
            rotation_step: SHIP_ROTATION_STEP,
        }
    }
}

/// Projectiles fired by the ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileSettings {
    pub vertices: Vec<Vec2>,
    pub color: Rgb,
    pub speed: f32,
    /// Remove the projectile as well when it destroys an obstacle
    pub consumed_on_hit: bool,
}

impl Default for ProjectileSettings {
    fn default() -> Self {
        Self {
            vertices: vec![Vec2::new(-3.0, 0.0), Vec2::new(3.0, 0.0)],
            color: Rgb::WHITE,
            speed: PROJECTILE_SPEED,
            consumed_on_hit: false,
        }
    }
}

/// Drifting obstacles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleSettings {
    pub vertices: Vec<Vec2>,
    pub color: Rgb,
    pub hit_color: Rgb,
}

impl Default for ObstacleSettings {
    fn default() -> Self {
        let h = OBSTACLE_HALF_WIDTH;
        Self {
            vertices: vec![
                Vec2::new(h, h),
                Vec2::new(-h, h),
                Vec2::new(-h, -h),
                Vec2::new(h, -h),
            ],
            color: Rgb::WHITE,
            hit_color: Rgb::RED,
        }
    }
}

/// How a new obstacle picks its start, heading and speed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpawnPolicy {
    /// Always enter at the middle of the left edge
    Fixed { heading: i32, speed: f32 },
    /// Enter anywhere along the left edge with a seeded random heading and speed
    Scattered {
        seed: u64,
        /// Maximum deviation from heading 0, in degrees
        heading_jitter: u32,
        min_speed: f32,
        max_speed: f32,
    },
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        SpawnPolicy::Fixed {
            heading: 0,
            speed: OBSTACLE_SPEED,
        }
    }
}

/// Obstacle spawner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerSettings {
    /// Ticks before the first obstacle may appear
    pub countdown: u32,
    /// Total obstacles the spawner will ever produce
    pub max_count: u32,
    pub policy: SpawnPolicy,
}

impl Default for SpawnerSettings {
    fn default() -> Self {
        Self {
            countdown: SPAWN_COUNTDOWN,
            max_count: SPAWN_MAX_COUNT,
            policy: SpawnPolicy::default(),
        }
    }
}

/// Collision detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionSettings {
    /// Absolute tolerance on squared center distance at tangency
    pub tolerance: f32,
}

impl Default for CollisionSettings {
    fn default() -> Self {
        Self {
            tolerance: COLLISION_TOLERANCE,
        }
    }
}

/// Everything a world needs at construction time
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub arena: ArenaSettings,
    pub ship: ShipSettings,
    pub projectile: ProjectileSettings,
    pub obstacle: ObstacleSettings,
    pub spawner: SpawnerSettings,
    pub collision: CollisionSettings,
}

impl Settings {
    /// Parse and validate settings from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json_string(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.arena.width > 0.0 && self.arena.height > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "arena must have a positive size, got {}x{}",
                self.arena.width, self.arena.height
            )));
        }
        if self.ship.vertices.is_empty() {
            return Err(SettingsError::Invalid(
                "ship needs at least one vertex (its nose)".into(),
            ));
        }
        if self.projectile.speed < 0.0 {
            return Err(SettingsError::Invalid(format!(
                "projectile speed must not be negative, got {}",
                self.projectile.speed
            )));
        }
        if self.collision.tolerance < 0.0 {
            return Err(SettingsError::Invalid(format!(
                "collision tolerance must not be negative, got {}",
                self.collision.tolerance
            )));
        }
        if let SpawnPolicy::Scattered {
            min_speed,
            max_speed,
            ..
        } = self.spawner.policy
        {
            if !(min_speed.is_finite() && max_speed.is_finite()) {
                return Err(SettingsError::Invalid(format!(
                    "spawn speeds must be finite, got {min_speed}..={max_speed}"
                )));
            }
            if min_speed > max_speed {
                return Err(SettingsError::Invalid(format!(
                    "spawn speed range is empty: {min_speed} > {max_speed}"
                )));
            }
        }
        Ok(())
    }

    /// Half the arena width and height
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.arena.width / 2.0, self.arena.height / 2.0)
    }
}
