//! Translation of planar pointer motion into rotation about the pie center.

use crate::geometry::{Point, Vector};

/// The initial fling velocity, and every drag delta, is divided by this amount.
pub const FLING_VELOCITY_DOWNSCALE: i32 = 4;

/// Reduces a 2D vector at a touch position to a signed scalar.
///
/// The magnitude is the vector's length. The sign comes from the dot product with the
/// perpendicular of the radius vector `(x, y)`: positive for clockwise motion on screen,
/// negative for counter-clockwise, zero when the motion is purely radial.
pub fn vector_to_scalar(motion: Vector, radius: Vector) -> f64 {
    let dot = radius.perpendicular().dot(motion);
    let sign = if dot > 0.0 {
        1.0
    } else if dot < 0.0 {
        -1.0
    } else {
        0.0
    };
    motion.length() * sign
}

/// Rotation delta for a drag displacement `delta` observed at `touch`.
pub fn drag_to_rotation_delta(delta: Vector, touch: Point, center: Point) -> f64 {
    vector_to_scalar(delta, touch.relative_to(center))
}

/// Angular velocity for a fling released at `touch`.
pub fn fling_to_angular_velocity(velocity: Vector, touch: Point, center: Point) -> f64 {
    vector_to_scalar(velocity, touch.relative_to(center))
}

/// Truncates a scalar and divides it by `downscale`, rounding toward zero.
pub fn downscale(scalar: f64, downscale: i32) -> i32 {
    scalar as i32 / downscale
}
