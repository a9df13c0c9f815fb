//! Asteroid Arena - A 2D arena simulation kernel
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, entities, collisions, world)
//! - `settings`: Data-driven shapes, colors, speeds and spawn policy
//!
//! Rendering, input polling and frame timing live outside this crate. The
//! caller feeds commands and elapsed time in, and reads back a snapshot of
//! world-space polygons.

pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};
pub use sim::{Entity, EntityId, EntityKind, TickInput, World, tick};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the headless driver (30 Hz)
    pub const SIM_DT: f32 = 1.0 / 30.0;

    /// Arena dimensions (world origin is the arena center, Y grows downward)
    pub const ARENA_WIDTH: f32 = 500.0;
    pub const ARENA_HEIGHT: f32 = 500.0;

    /// Ship defaults
    pub const SHIP_RELOAD_TICKS: u32 = 10;
    pub const SHIP_ROTATION_STEP: i32 = 10;

    /// Projectile defaults
    pub const PROJECTILE_SPEED: f32 = 150.0;

    /// Obstacle defaults
    pub const OBSTACLE_HALF_WIDTH: f32 = 10.0;
    pub const OBSTACLE_SPEED: f32 = 10.0;

    /// Spawner defaults
    pub const SPAWN_COUNTDOWN: u32 = 30;
    pub const SPAWN_MAX_COUNT: u32 = 1;

    /// Absolute tolerance for tangent bounding circles
    pub const COLLISION_TOLERANCE: f32 = 1e-4;
}

/// Normalize an integer angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: i32) -> i32 {
    angle.rem_euclid(360)
}
