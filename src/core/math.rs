//! Vector Helpers
//!
//! Small math routines shared by the physics, vehicle and combat code.
//! All vectors are `glam::Vec3` in a Y-up world.

use glam::{Quat, Vec2, Vec3};

/// World up axis.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Reference forward direction for headings (torque angle 0).
pub const REFERENCE_FORWARD: Vec3 = Vec3::NEG_Z;

/// Rotate the reference forward vector about world up by `degrees`.
#[inline]
pub fn heading_from_degrees(degrees: f32) -> Vec3 {
    Quat::from_rotation_y(degrees.to_radians()) * REFERENCE_FORWARD
}

/// Right-hand direction for a forward vector.
///
/// Falls back to +X when `front` is parallel to world up.
#[inline]
pub fn right_of(front: Vec3) -> Vec3 {
    front.cross(WORLD_UP).try_normalize().unwrap_or(Vec3::X)
}

/// Forward vector from yaw/pitch in degrees (yaw -90 looks down -Z).
pub fn front_from_euler(yaw_degrees: f32, pitch_degrees: f32) -> Vec3 {
    let (yaw, pitch) = (yaw_degrees.to_radians(), pitch_degrees.to_radians());
    Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
        .try_normalize()
        .unwrap_or(REFERENCE_FORWARD)
}

/// Signed hit angle in degrees between two forward vectors.
///
/// Takes the planar heading of `a - b`, which is what the HUD hit marker
/// rotates by.
#[inline]
pub fn hit_angle_degrees(a: Vec3, b: Vec3) -> f32 {
    let delta = a - b;
    delta.z.atan2(delta.x).to_degrees()
}

/// Move `value` toward zero by at most `step` without crossing it.
#[inline]
pub fn approach_zero(value: f32, step: f32) -> f32 {
    if value > 0.0 {
        (value - step).max(0.0)
    } else {
        (value + step).min(0.0)
    }
}

/// Horizontal (XZ) distance between two points.
#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x, a.z).distance(Vec2::new(b.x, b.z))
}

/// Cap a vector's length to `max`, renormalizing if it exceeds it.
#[inline]
pub fn cap_length(v: Vec3, max: f32) -> Vec3 {
    if v.length() > max {
        v.normalize_or_zero() * max
    } else {
        v
    }
}

/// Replace NaN/infinite components with zero.
#[inline]
pub fn sanitize(v: Vec3) -> Vec3 {
    if v.is_finite() {
        v
    } else {
        Vec3::new(finite_or_zero(v.x), finite_or_zero(v.y), finite_or_zero(v.z))
    }
}

#[inline]
fn finite_or_zero(x: f32) -> f32 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}
