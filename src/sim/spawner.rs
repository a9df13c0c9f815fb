//! Countdown-driven obstacle spawner
//!
//! The countdown drops by one per tick and never goes below zero. Once it
//! reaches zero the spawner hands out one obstacle per call until it has
//! produced `max_count` of them.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::entity::Entity;
use crate::settings::{ObstacleSettings, SpawnPolicy, SpawnerSettings};

#[derive(Debug, Clone)]
pub struct Spawner {
    countdown: u32,
    max_count: u32,
    spawned: u32,
    policy: SpawnPolicy,
    obstacle: ObstacleSettings,
    /// Arena half width and half height
    half_extents: Vec2,
    rng: Pcg32,
}

/// Make a policy safe to sample from, whether or not its settings were validated
fn sanitize_policy(policy: &SpawnPolicy) -> SpawnPolicy {
    let SpawnPolicy::Scattered {
        seed,
        heading_jitter,
        min_speed,
        max_speed,
    } = *policy
    else {
        return policy.clone();
    };

    let finite = |speed: f32| {
        if speed.is_finite() {
            speed
        } else {
            log::warn!("Non-finite spawn speed {speed}, using 0");
            0.0
        }
    };
    let (mut min_speed, mut max_speed) = (finite(min_speed), finite(max_speed));
    if min_speed > max_speed {
        log::warn!("Spawn speed range {min_speed}..={max_speed} is inverted, swapping bounds");
        std::mem::swap(&mut min_speed, &mut max_speed);
    }

    SpawnPolicy::Scattered {
        seed,
        heading_jitter,
        min_speed,
        max_speed,
    }
}

impl Spawner {
    pub fn new(settings: &SpawnerSettings, obstacle: &ObstacleSettings, half_extents: Vec2) -> Self {
        let seed = match settings.policy {
            SpawnPolicy::Scattered { seed, .. } => seed,
            SpawnPolicy::Fixed { .. } => 0,
        };
        Self {
            countdown: settings.countdown,
            max_count: settings.max_count,
            spawned: 0,
            policy: sanitize_policy(&settings.policy),
            obstacle: obstacle.clone(),
            half_extents,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Ticks left before spawning may start
    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    /// Obstacles produced so far
    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    pub fn max_count(&self) -> u32 {
        self.max_count
    }

    /// True once the cap has been reached
    pub fn is_exhausted(&self) -> bool {
        self.spawned >= self.max_count
    }

    /// Advance the countdown by one tick
    pub fn process(&mut self) {
        self.countdown = self.countdown.saturating_sub(1);
    }

    /// A new obstacle if the countdown has expired and the cap allows it
    pub fn get_new(&mut self) -> Option<Entity> {
        if self.countdown > 0 || self.is_exhausted() {
            return None;
        }

        let left_edge = -self.half_extents.x;
        let (position, heading, speed) = match self.policy {
            SpawnPolicy::Fixed { heading, speed } => (Vec2::new(left_edge, 0.0), heading, speed),
            SpawnPolicy::Scattered {
                heading_jitter,
                min_speed,
                max_speed,
                ..
            } => {
                // Keep the whole shape inside the top and bottom edges
                let radius = self
                    .obstacle
                    .vertices
                    .iter()
                    .map(|v| v.length())
                    .fold(0.0_f32, f32::max);
                let span = (self.half_extents.y - radius).max(0.0);
                let y = if span > 0.0 {
                    self.rng.random_range(-span..span)
                } else {
                    0.0
                };
                let jitter = heading_jitter.min(180) as i32;
                let heading = self.rng.random_range(-jitter..=jitter);
                let speed = self.rng.random_range(min_speed..=max_speed);
                (Vec2::new(left_edge, y), heading, speed)
            }
        };

        self.spawned += 1;
        log::info!(
            "Spawning obstacle {}/{} at ({:.1}, {:.1}) heading {} speed {:.1}",
            self.spawned,
            self.max_count,
            position.x,
            position.y,
            heading,
            speed
        );
        Some(Entity::obstacle(position, heading, speed, &self.obstacle))
    }
}
