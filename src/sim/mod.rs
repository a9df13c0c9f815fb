//! Deterministic simulation module
//!
//! All arena logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod geometry;
pub mod spawner;
pub mod tick;
pub mod world;

pub use collision::{BoundingCircle, CollisionReport, CollisionReports, CollisionResolver, Resolution};
pub use entity::{CollisionResponse, Entity, EntityId, EntityKind, EntityTable, Rgb, ShipState};
pub use geometry::{direction, local_to_world, move_in_direction, rotate, translate};
pub use spawner::Spawner;
pub use tick::{TickInput, tick};
pub use world::{RenderItem, TickSummary, World};
