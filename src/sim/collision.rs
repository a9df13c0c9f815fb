//! Collision detection and response
//!
//! Every entity is approximated by a circle centered on its position. Each
//! tick the resolver tests all pairs of live entities, builds at most one
//! report per entity and hands each report to that entity's handler.

use std::ops::Bound::{Excluded, Unbounded};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{CollisionResponse, EntityId, EntityTable};
use crate::consts::COLLISION_TOLERANCE;

/// Circle enclosing an entity's shape at its current position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingCircle {
    pub center: Vec2,
    pub radius: f32,
}

impl BoundingCircle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Circle at `center` reaching the local vertex farthest from the origin.
    ///
    /// Rotation keeps distances from the origin, so the circle holds for any
    /// heading. An empty shape gives a zero radius.
    pub fn enclosing(center: Vec2, local_vertices: &[Vec2]) -> Self {
        let max_sq = local_vertices
            .iter()
            .map(|v| v.length_squared())
            .fold(0.0_f32, f32::max);
        Self::new(center, max_sq.sqrt())
    }

    /// Overlap test; tangent circles count as touching
    #[inline]
    pub fn intersects(&self, other: &BoundingCircle) -> bool {
        self.intersects_within(other, COLLISION_TOLERANCE)
    }

    /// Overlap test with an explicit absolute tolerance on the squared distance
    pub fn intersects_within(&self, other: &BoundingCircle, tolerance: f32) -> bool {
        let distance_sq = (self.center - other.center).length_squared();
        let reach = self.radius + other.radius;
        let threshold = reach * reach;
        distance_sq <= threshold || (distance_sq - threshold).abs() <= tolerance
    }
}

/// One side of a detected overlap: `reporter` touched `other`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionReport {
    pub reporter: EntityId,
    pub other: EntityId,
}

/// Reports keyed by reporting entity, at most one each
pub type CollisionReports = std::collections::BTreeMap<EntityId, CollisionReport>;

/// Outcome of one resolution pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Number of entities that received a report
    pub reports: usize,
    /// Entities switched to their hit state
    pub hits: Vec<EntityId>,
    /// Entities removed from the table, ascending
    pub removed: Vec<EntityId>,
}

/// All-pairs circle collision pass
#[derive(Debug, Clone, Copy)]
pub struct CollisionResolver {
    tolerance: f32,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::new(COLLISION_TOLERANCE)
    }
}

impl CollisionResolver {
    pub fn new(tolerance: f32) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Find overlapping pairs in ascending id order.
    ///
    /// Both sides of a pair get a report. An entity is reported at most once:
    /// the first pair found wins and any later pair touching an entity that
    /// already has a report is skipped.
    pub fn detect_all(&self, entities: &EntityTable) -> CollisionReports {
        let mut reports = CollisionReports::new();

        for (&first_id, first) in entities {
            if reports.contains_key(&first_id) {
                continue;
            }
            for (&second_id, second) in entities.range((Excluded(first_id), Unbounded)) {
                if reports.contains_key(&second_id) {
                    continue;
                }
                if first
                    .bounding_circle
                    .intersects_within(&second.bounding_circle, self.tolerance)
                {
                    reports.insert(
                        first_id,
                        CollisionReport {
                            reporter: first_id,
                            other: second_id,
                        },
                    );
                    reports.insert(
                        second_id,
                        CollisionReport {
                            reporter: second_id,
                            other: first_id,
                        },
                    );
                    break;
                }
            }
        }

        reports
    }

    /// Detect, then dispatch every report to its entity's handler.
    ///
    /// Handlers run against the table as it was at the start of the pass;
    /// removals they request are applied once all of them have run.
    pub fn handle(&self, entities: &mut EntityTable) -> Resolution {
        let reports = self.detect_all(entities);
        let mut resolution = Resolution {
            reports: reports.len(),
            ..Default::default()
        };
        if reports.is_empty() {
            return resolution;
        }

        let mut pending = Vec::new();
        for report in reports.values() {
            let Some(other_kind) = entities.get(&report.other).map(|e| e.kind) else {
                continue;
            };
            let Some(entity) = entities.get_mut(&report.reporter) else {
                continue;
            };

            let response = entity.collision_handler(report, &other_kind);
            log::debug!(
                "collision: {} {} with {} {} -> {:?}",
                entity.kind.name(),
                report.reporter,
                other_kind.name(),
                report.other,
                response
            );
            if response == CollisionResponse::Hit {
                resolution.hits.push(report.reporter);
            }
            pending.extend(response.removals(report.reporter));
        }

        pending.sort_unstable();
        pending.dedup();
        for id in pending {
            if entities.remove(&id).is_some() {
                resolution.removed.push(id);
            }
        }

        resolution
    }
}
