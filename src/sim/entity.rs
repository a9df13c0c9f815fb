//! Entities and their per-kind behavior
//!
//! Every simulated object shares the same base state (position, heading,
//! visual rotation, speed, shape) and carries an [`EntityKind`] that selects
//! its tick and collision behavior.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{BoundingCircle, CollisionReport};
use super::geometry::{local_to_world, move_in_direction};
use crate::normalize_degrees;
use crate::settings::{ObstacleSettings, ProjectileSettings, ShipSettings};

/// Identity assigned by the world on registration (0 = not yet registered)
pub type EntityId = u32;

/// Entity storage keyed by id; iteration is always in ascending id order
pub type EntityTable = BTreeMap<EntityId, Entity>;

/// Display color, opaque to the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const RED: Rgb = Rgb(255, 0, 0);
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::WHITE
    }
}

/// Player ship state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipState {
    /// Ticks left before the ship may fire again
    pub reload_counter: u32,
    /// Value the counter is reset to after firing
    pub reload_ticks: u32,
}

impl ShipState {
    pub fn new(reload_ticks: u32) -> Self {
        Self {
            reload_counter: reload_ticks,
            reload_ticks,
        }
    }

    #[inline]
    pub fn is_reloading(&self) -> bool {
        self.reload_counter > 0
    }
}

/// Closed set of entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Ship(ShipState),
    Projectile {
        /// Remove the projectile too when it destroys an obstacle
        consumed_on_hit: bool,
    },
    Obstacle,
}

impl EntityKind {
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Ship(_) => "ship",
            EntityKind::Projectile { .. } => "projectile",
            EntityKind::Obstacle => "obstacle",
        }
    }
}

/// What a collision handler asks the world to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionResponse {
    /// Nothing changed
    Ignored,
    /// The reporting entity switched to its hit state
    Hit,
    /// The other entity must leave the world (and optionally the reporter)
    Destroyed { target: EntityId, consume_self: bool },
}

impl CollisionResponse {
    /// Ids this response removes, given the reporting entity's id
    pub fn removals(&self, reporter: EntityId) -> impl Iterator<Item = EntityId> {
        let (target, this) = match *self {
            CollisionResponse::Destroyed { target, consume_self } => {
                (Some(target), consume_self.then_some(reporter))
            }
            _ => (None, None),
        };
        target.into_iter().chain(this)
    }
}

/// `angle + delta` in [0, 360); both operands are reduced first so any i32 works
#[inline]
fn add_degrees(angle: i32, delta: i32) -> i32 {
    normalize_degrees(normalize_degrees(angle) + normalize_degrees(delta))
}

/// A simulated object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    /// World-space position of the local origin
    pub position: Vec2,
    /// Direction of travel, degrees in [0, 360)
    pub heading_angle: i32,
    /// Visual rotation, degrees in [0, 360)
    pub rotation_angle: i32,
    /// World units per second
    pub speed: f32,
    /// Outline in entity-local space
    pub local_vertices: Vec<Vec2>,
    pub bounding_circle: BoundingCircle,
    pub color: Rgb,
    /// Color shown once the entity has been hit
    pub hit_color: Rgb,
    pub hit: bool,
    pub kind: EntityKind,
}

impl Entity {
    /// Base constructor: stationary, unrotated, not yet registered
    pub fn new(kind: EntityKind, position: Vec2, local_vertices: Vec<Vec2>, color: Rgb) -> Self {
        let bounding_circle = BoundingCircle::enclosing(position, &local_vertices);
        Self {
            id: 0,
            position,
            heading_angle: 0,
            rotation_angle: 0,
            speed: 0.0,
            local_vertices,
            bounding_circle,
            color,
            hit_color: color,
            hit: false,
            kind,
        }
    }

    /// Player ship, stationary at `position`
    pub fn ship(position: Vec2, settings: &ShipSettings) -> Self {
        let mut ship = Self::new(
            EntityKind::Ship(ShipState::new(settings.reload_ticks)),
            position,
            settings.vertices.clone(),
            settings.color,
        );
        ship.hit_color = settings.hit_color;
        ship
    }

    /// Projectile travelling along `heading` at the configured speed
    pub fn projectile(position: Vec2, heading: i32, settings: &ProjectileSettings) -> Self {
        let mut projectile = Self::new(
            EntityKind::Projectile {
                consumed_on_hit: settings.consumed_on_hit,
            },
            position,
            settings.vertices.clone(),
            settings.color,
        );
        projectile.heading_angle = normalize_degrees(heading);
        // Drawn along its flight path
        projectile.rotation_angle = projectile.heading_angle;
        projectile.speed = settings.speed;
        projectile
    }

    /// Obstacle drifting along `heading` at `speed`
    pub fn obstacle(position: Vec2, heading: i32, speed: f32, settings: &ObstacleSettings) -> Self {
        let mut obstacle = Self::new(
            EntityKind::Obstacle,
            position,
            settings.vertices.clone(),
            settings.color,
        );
        obstacle.heading_angle = normalize_degrees(heading);
        obstacle.speed = speed;
        obstacle.hit_color = settings.hit_color;
        obstacle
    }

    pub fn is_ship(&self) -> bool {
        matches!(self.kind, EntityKind::Ship(_))
    }

    pub fn is_projectile(&self) -> bool {
        matches!(self.kind, EntityKind::Projectile { .. })
    }

    pub fn is_obstacle(&self) -> bool {
        matches!(self.kind, EntityKind::Obstacle)
    }

    /// Reload counter, for ships only
    pub fn reload_counter(&self) -> Option<u32> {
        match self.kind {
            EntityKind::Ship(ship) => Some(ship.reload_counter),
            _ => None,
        }
    }

    /// Advance one tick of `dt` seconds
    pub fn process(&mut self, dt: f32) {
        if let EntityKind::Ship(ship) = &mut self.kind {
            ship.reload_counter = ship.reload_counter.saturating_sub(1);
        }

        if self.speed != 0.0 {
            self.position = move_in_direction(self.position, self.heading_angle, self.speed * dt);
        }
        self.refresh_bounding_circle();
    }

    /// Recompute the bounding circle from the current position and shape
    pub fn refresh_bounding_circle(&mut self) {
        self.bounding_circle = BoundingCircle::enclosing(self.position, &self.local_vertices);
    }

    /// Turn the direction of travel
    pub fn rotate_heading(&mut self, delta_degrees: i32) {
        self.heading_angle = add_degrees(self.heading_angle, delta_degrees);
    }

    /// Spin the entity about its origin. A ship's heading follows its nose.
    pub fn rotate_visual(&mut self, delta_degrees: i32) {
        self.rotation_angle = add_degrees(self.rotation_angle, delta_degrees);
        if self.is_ship() {
            self.rotate_heading(delta_degrees);
        }
    }

    /// Outline in world space
    pub fn world_vertices(&self) -> Vec<Vec2> {
        self.local_vertices
            .iter()
            .map(|&v| local_to_world(v, self.position, self.rotation_angle))
            .collect()
    }

    /// Fire a projectile from the ship's nose (its first vertex).
    ///
    /// Returns `None` while reloading, or when called on anything but a ship.
    /// The caller registers the projectile with the world.
    pub fn fire(&mut self, settings: &ProjectileSettings) -> Option<Entity> {
        let EntityKind::Ship(ship) = &mut self.kind else {
            return None;
        };
        if ship.is_reloading() {
            return None;
        }
        let nose = *self.local_vertices.first()?;
        ship.reload_counter = ship.reload_ticks;

        let start = local_to_world(nose, self.position, self.heading_angle);
        Some(Entity::projectile(start, self.heading_angle, settings))
    }

    /// Switch to the hit state
    pub fn mark_hit(&mut self) {
        self.hit = true;
        self.color = self.hit_color;
    }

    /// React to overlapping `other`.
    ///
    /// Removals are returned, not applied, so the caller can defer them until
    /// every handler of the pass has run.
    pub fn collision_handler(
        &mut self,
        report: &CollisionReport,
        other: &EntityKind,
    ) -> CollisionResponse {
        match (self.kind, *other) {
            // Projectiles never threaten the ship
            (EntityKind::Ship(_), EntityKind::Projectile { .. }) => CollisionResponse::Ignored,
            (EntityKind::Ship(_), EntityKind::Obstacle) => {
                self.mark_hit();
                CollisionResponse::Hit
            }
            (EntityKind::Ship(_), EntityKind::Ship(_)) => {
                log::warn!("ship {} overlapped another ship {}", self.id, report.other);
                CollisionResponse::Ignored
            }
            (EntityKind::Projectile { consumed_on_hit }, EntityKind::Obstacle) => {
                CollisionResponse::Destroyed {
                    target: report.other,
                    consume_self: consumed_on_hit,
                }
            }
            (EntityKind::Projectile { .. }, EntityKind::Ship(_) | EntityKind::Projectile { .. }) => {
                CollisionResponse::Ignored
            }
            (EntityKind::Obstacle, _) => {
                self.mark_hit();
                CollisionResponse::Hit
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    fn report(reporter: EntityId, other: EntityId) -> CollisionReport {
        CollisionReport { reporter, other }
    }

    #[test]
    fn test_process_moves_along_heading_and_refreshes_circle() {
        let settings = Settings::default();
        let mut obstacle = Entity::obstacle(Vec2::ZERO, 90, 10.0, &settings.obstacle);

        obstacle.process(0.5);

        assert!((obstacle.position - Vec2::new(0.0, 5.0)).length() < 1e-4);
        assert_eq!(obstacle.bounding_circle.center, obstacle.position);
    }

    #[test]
    fn test_process_stationary_keeps_position() {
        let settings = Settings::default();
        let mut ship = Entity::ship(Vec2::new(3.0, 4.0), &settings.ship);
        ship.process(1.0);
        assert_eq!(ship.position, Vec2::new(3.0, 4.0));
        assert_eq!(ship.bounding_circle.center, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_square_bounding_radius() {
        let settings = Settings::default();
        let mut obstacle = Entity::obstacle(Vec2::ZERO, 0, 0.0, &settings.obstacle);
        obstacle.local_vertices = vec![
            Vec2::new(5.0, 5.0),
            Vec2::new(-5.0, 5.0),
            Vec2::new(-5.0, -5.0),
            Vec2::new(5.0, -5.0),
        ];
        obstacle.process(0.1);
        assert!((obstacle.bounding_circle.radius - 5.0 * std::f32::consts::SQRT_2).abs() < 1e-4);
    }

    #[test]
    fn test_rotate_heading_wraps() {
        let mut e = Entity::new(EntityKind::Obstacle, Vec2::ZERO, Vec::new(), Rgb::WHITE);
        e.rotate_heading(-30);
        assert_eq!(e.heading_angle, 330);
        e.rotate_heading(60);
        assert_eq!(e.heading_angle, 30);
    }

    #[test]
    fn test_rotate_by_extreme_deltas() {
        let settings = Settings::default();
        let mut ship = Entity::ship(Vec2::ZERO, &settings.ship);
        ship.rotate_visual(10);
        ship.rotate_visual(i32::MAX);
        let expected = normalize_degrees(10 + i32::MAX.rem_euclid(360));
        assert_eq!(ship.rotation_angle, expected);
        assert_eq!(ship.heading_angle, expected);

        ship.rotate_visual(i32::MIN);
        let expected = normalize_degrees(expected + i32::MIN.rem_euclid(360));
        assert_eq!(ship.rotation_angle, expected);
        assert_eq!(ship.heading_angle, expected);

        ship.rotate_heading(i32::MAX);
        ship.rotate_heading(i32::MIN);
        assert!((0..360).contains(&ship.heading_angle));
    }

    #[test]
    fn test_ship_overlapping_ship_is_ignored() {
        let settings = Settings::default();
        let mut ship = Entity::ship(Vec2::ZERO, &settings.ship);
        let other = EntityKind::Ship(ShipState::new(settings.ship.reload_ticks));
        let response = ship.collision_handler(&report(1, 2), &other);
        assert_eq!(response, CollisionResponse::Ignored);
        assert!(!ship.hit);
        assert_eq!(response.removals(1).count(), 0);
    }

    #[test]
    fn test_rotate_visual_only_ship_turns_heading() {
        let settings = Settings::default();
        let mut ship = Entity::ship(Vec2::ZERO, &settings.ship);
        ship.rotate_visual(-10);
        assert_eq!(ship.rotation_angle, 350);
        assert_eq!(ship.heading_angle, 350);

        let mut obstacle = Entity::obstacle(Vec2::ZERO, 0, 0.0, &settings.obstacle);
        obstacle.rotate_visual(45);
        assert_eq!(obstacle.rotation_angle, 45);
        assert_eq!(obstacle.heading_angle, 0);
    }

    #[test]
    fn test_world_vertices_follow_rotation_and_position() {
        let settings = Settings::default();
        let mut ship = Entity::ship(Vec2::new(10.0, 10.0), &settings.ship);
        ship.rotate_visual(90);
        let nose = ship.world_vertices()[0];
        assert!((nose - Vec2::new(10.0, 30.0)).length() < 1e-4);
    }

    #[test]
    fn test_fire_when_ready() {
        let settings = Settings::default();
        let mut ship = Entity::ship(Vec2::ZERO, &settings.ship);
        for _ in 0..settings.ship.reload_ticks {
            ship.process(0.1);
        }
        assert_eq!(ship.reload_counter(), Some(0));

        let projectile = ship.fire(&settings.projectile).expect("ship should fire");
        assert!(projectile.is_projectile());
        assert_eq!(projectile.heading_angle, ship.heading_angle);
        assert!((projectile.position - Vec2::new(20.0, 0.0)).length() < 1e-4);
        assert_eq!(projectile.speed, settings.projectile.speed);
        assert_eq!(ship.reload_counter(), Some(settings.ship.reload_ticks));
    }

    #[test]
    fn test_fire_while_reloading() {
        let settings = Settings::default();
        let mut ship = Entity::ship(Vec2::ZERO, &settings.ship);
        let before = ship.reload_counter();
        assert!(ship.fire(&settings.projectile).is_none());
        assert_eq!(ship.reload_counter(), before);
    }

    #[test]
    fn test_fire_follows_heading() {
        let settings = Settings::default();
        let mut ship = Entity::ship(Vec2::ZERO, &settings.ship);
        ship.kind = EntityKind::Ship(ShipState {
            reload_counter: 0,
            reload_ticks: 5,
        });
        ship.rotate_visual(-90);

        let projectile = ship.fire(&settings.projectile).expect("ship should fire");
        assert_eq!(projectile.heading_angle, 270);
        assert!((projectile.position - Vec2::new(0.0, -20.0)).length() < 1e-4);
    }

    #[test]
    fn test_only_ships_fire() {
        let settings = Settings::default();
        let mut obstacle = Entity::obstacle(Vec2::ZERO, 0, 0.0, &settings.obstacle);
        assert!(obstacle.fire(&settings.projectile).is_none());
    }

    #[test]
    fn test_ship_ignores_projectiles() {
        let settings = Settings::default();
        let mut ship = Entity::ship(Vec2::ZERO, &settings.ship);
        let other = EntityKind::Projectile {
            consumed_on_hit: false,
        };
        let response = ship.collision_handler(&report(1, 2), &other);
        assert_eq!(response, CollisionResponse::Ignored);
        assert!(!ship.hit);
        assert_eq!(ship.color, settings.ship.color);
    }

    #[test]
    fn test_ship_hit_by_obstacle() {
        let settings = Settings::default();
        let mut ship = Entity::ship(Vec2::ZERO, &settings.ship);
        let response = ship.collision_handler(&report(1, 2), &EntityKind::Obstacle);
        assert_eq!(response, CollisionResponse::Hit);
        assert!(ship.hit);
        assert_eq!(ship.color, settings.ship.hit_color);
    }

    #[test]
    fn test_projectile_destroys_obstacle() {
        let settings = Settings::default();
        let mut projectile = Entity::projectile(Vec2::ZERO, 0, &settings.projectile);
        let response = projectile.collision_handler(&report(3, 7), &EntityKind::Obstacle);
        assert_eq!(
            response,
            CollisionResponse::Destroyed {
                target: 7,
                consume_self: false
            }
        );
        assert_eq!(response.removals(3).collect::<Vec<_>>(), vec![7]);
    }

    #[test]
    fn test_consumed_projectile_removes_itself() {
        let mut settings = Settings::default();
        settings.projectile.consumed_on_hit = true;
        let mut projectile = Entity::projectile(Vec2::ZERO, 0, &settings.projectile);
        let response = projectile.collision_handler(&report(3, 7), &EntityKind::Obstacle);
        assert_eq!(response.removals(3).collect::<Vec<_>>(), vec![7, 3]);
    }

    #[test]
    fn test_obstacle_marks_itself_hit() {
        let settings = Settings::default();
        let mut obstacle = Entity::obstacle(Vec2::ZERO, 0, 10.0, &settings.obstacle);
        let other = EntityKind::Projectile {
            consumed_on_hit: false,
        };
        let response = obstacle.collision_handler(&report(2, 3), &other);
        assert_eq!(response, CollisionResponse::Hit);
        assert!(obstacle.hit);
        assert_eq!(obstacle.color, settings.obstacle.hit_color);
        assert_eq!(response.removals(2).count(), 0);
    }
}
