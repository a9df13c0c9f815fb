//! 2D transform primitives
//!
//! Angles are integer degrees. The world's Y axis grows downward (screen
//! convention), so a positive angle turns clockwise on screen: rotating
//! `(1, 0)` by 90 yields `(0, 1)`.
//!
//! Sine and cosine come from a per-degree table built once, so every caller
//! sees identical values for the same angle.

use std::sync::LazyLock;

use glam::Vec2;

use crate::normalize_degrees;

/// (sin, cos) for every whole degree in [0, 360)
static TRIG_TABLE: LazyLock<[(f32, f32); 360]> = LazyLock::new(|| {
    let mut table = [(0.0, 0.0); 360];
    for (deg, entry) in table.iter_mut().enumerate() {
        *entry = (deg as f32).to_radians().sin_cos();
    }
    table
});

/// Sine and cosine of an integer angle (any sign, taken modulo 360)
#[inline]
pub fn sin_cos(angle_degrees: i32) -> (f32, f32) {
    TRIG_TABLE[normalize_degrees(angle_degrees) as usize]
}

/// Unit vector pointing along `angle_degrees`
#[inline]
pub fn direction(angle_degrees: i32) -> Vec2 {
    let (sin, cos) = sin_cos(angle_degrees);
    Vec2::new(cos, sin)
}

/// Rotate `v` about the origin
pub fn rotate(v: Vec2, angle_degrees: i32) -> Vec2 {
    let (sin, cos) = sin_cos(angle_degrees);
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Component-wise offset
#[inline]
pub fn translate(v: Vec2, dx: f32, dy: f32) -> Vec2 {
    Vec2::new(v.x + dx, v.y + dy)
}

/// Offset `v` by `length` along `angle_degrees`
pub fn move_in_direction(v: Vec2, angle_degrees: i32, length: f32) -> Vec2 {
    v + direction(angle_degrees) * length
}

/// Map a vertex from entity-local space into world space.
///
/// Rotation happens first, about the local origin, then the result is
/// translated to the entity position.
pub fn local_to_world(local_vertex: Vec2, translation: Vec2, rotation_angle: i32) -> Vec2 {
    let rotated = rotate(local_vertex, rotation_angle);
    translate(rotated, translation.x, translation.y)
}
