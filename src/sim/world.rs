//! World registry and per-tick pipeline
//!
//! The world owns every live entity, hands out ids, and runs one tick as:
//! spawn, move, cull off-arena entities, resolve collisions.

use glam::Vec2;

use super::collision::{CollisionResolver, Resolution};
use super::entity::{Entity, EntityId, EntityTable, Rgb};
use super::spawner::Spawner;
use crate::settings::Settings;

/// One entity as the renderer sees it
#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem {
    pub vertices: Vec<Vec2>,
    pub color: Rgb,
}

/// What happened during one call to [`World::process`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickSummary {
    /// Obstacle registered by the spawner this tick
    pub spawned: Option<EntityId>,
    /// Entities removed for leaving the arena
    pub culled: Vec<EntityId>,
    pub collisions: Resolution,
}

pub struct World {
    settings: Settings,
    entities: EntityTable,
    /// Last id handed out; ids start at 1 and are never reused
    last_id: EntityId,
    ship_id: Option<EntityId>,
    spawner: Spawner,
    resolver: CollisionResolver,
    half_extents: Vec2,
    ticks: u64,
}

impl World {
    /// A world holding the player ship at the origin
    pub fn new(settings: Settings) -> Self {
        let mut world = Self::empty(settings);
        let ship = Entity::ship(Vec2::ZERO, &world.settings.ship);
        world.ship_id = Some(world.add(ship));
        log::info!(
            "World created: {}x{}, ship {:?}",
            world.settings.arena.width,
            world.settings.arena.height,
            world.ship_id
        );
        world
    }

    /// A world with no entities at all
    pub fn empty(settings: Settings) -> Self {
        let half_extents = settings.half_extents();
        let spawner = Spawner::new(&settings.spawner, &settings.obstacle, half_extents);
        let resolver = CollisionResolver::new(settings.collision.tolerance);
        Self {
            settings,
            entities: EntityTable::new(),
            last_id: 0,
            ship_id: None,
            spawner,
            resolver,
            half_extents,
            ticks: 0,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Register an entity, returning its new id
    pub fn add(&mut self, mut entity: Entity) -> EntityId {
        self.last_id += 1;
        entity.id = self.last_id;
        entity.refresh_bounding_circle();
        self.entities.insert(entity.id, entity);
        self.last_id
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Live entities in ascending id order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn ship_id(&self) -> Option<EntityId> {
        self.ship_id
    }

    pub fn ship(&self) -> Option<&Entity> {
        self.ship_id.and_then(|id| self.entities.get(&id))
    }

    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    /// Ticks processed so far
    pub fn elapsed_ticks(&self) -> u64 {
        self.ticks
    }

    /// Turn the ship (and its heading) by `delta_degrees`
    pub fn rotate_ship(&mut self, delta_degrees: i32) {
        match self.ship_id.and_then(|id| self.entities.get_mut(&id)) {
            Some(ship) => ship.rotate_visual(delta_degrees),
            None => log::warn!("rotate ignored: no ship in the world"),
        }
    }

    /// Fire from the ship, registering the projectile. `None` while reloading.
    pub fn fire(&mut self) -> Option<EntityId> {
        let Some(ship) = self.ship_id.and_then(|id| self.entities.get_mut(&id)) else {
            log::warn!("fire ignored: no ship in the world");
            return None;
        };
        let projectile = ship.fire(&self.settings.projectile)?;
        let id = self.add(projectile);
        log::debug!("Projectile {} fired", id);
        Some(id)
    }

    /// Advance the whole world by `dt` seconds
    pub fn process(&mut self, dt: f32) -> TickSummary {
        debug_assert!(dt >= 0.0, "negative tick duration {dt}");
        self.ticks += 1;
        let mut summary = TickSummary::default();

        self.spawner.process();
        if let Some(obstacle) = self.spawner.get_new() {
            summary.spawned = Some(self.add(obstacle));
        }

        for entity in self.entities.values_mut() {
            entity.process(dt);
        }

        summary.culled = self.remove_not_visible();
        summary.collisions = self.resolver.handle(&mut self.entities);

        summary
    }

    /// World-space outlines and colors of every live entity
    pub fn snapshot(&self) -> Vec<RenderItem> {
        self.entities
            .values()
            .map(|e| RenderItem {
                vertices: e.world_vertices(),
                color: e.color,
            })
            .collect()
    }

    /// Strictly inside the arena; points on an edge are outside
    pub fn is_in_bounds(&self, point: Vec2) -> bool {
        let h = self.half_extents;
        point.x > -h.x && point.x < h.x && point.y > -h.y && point.y < h.y
    }

    /// An entity is visible while any of its vertices is in bounds
    pub fn is_visible(&self, entity: &Entity) -> bool {
        entity
            .world_vertices()
            .into_iter()
            .any(|v| self.is_in_bounds(v))
    }

    fn remove_not_visible(&mut self) -> Vec<EntityId> {
        let gone: Vec<EntityId> = self
            .entities
            .values()
            .filter(|e| !self.is_visible(e))
            .map(|e| e.id)
            .collect();

        for id in &gone {
            if let Some(entity) = self.entities.remove(id) {
                log::debug!("Culled {} {} at {:?}", entity.kind.name(), id, entity.position);
            }
        }
        gone
    }
}
