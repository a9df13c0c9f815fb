//! Fixed timestep simulation tick
//!
//! Applies one frame's worth of player commands, then advances the world.

use super::world::{TickSummary, World};

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Degrees to turn the ship (negative = counter-clockwise on screen)
    pub rotate: i32,
    /// Fire a projectile if the ship has reloaded
    pub fire: bool,
}

impl TickInput {
    /// Turn left by `steps` rotation steps of `step` degrees
    pub fn rotate_left(steps: i32, step: i32) -> Self {
        Self {
            rotate: steps.saturating_mul(step).saturating_neg(),
            ..Default::default()
        }
    }

    /// Turn right by `steps` rotation steps of `step` degrees
    pub fn rotate_right(steps: i32, step: i32) -> Self {
        Self {
            rotate: steps.saturating_mul(step),
            ..Default::default()
        }
    }

    pub fn fire() -> Self {
        Self {
            fire: true,
            ..Default::default()
        }
    }
}

/// Apply `input` and advance `world` by `dt` seconds
pub fn tick(world: &mut World, input: &TickInput, dt: f32) -> TickSummary {
    if input.rotate != 0 {
        world.rotate_ship(input.rotate);
    }
    if input.fire {
        // Still reloading is an ordinary outcome
        let _ = world.fire();
    }
    world.process(dt)
}
