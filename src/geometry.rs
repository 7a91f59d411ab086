//! Direction and orientation helpers shared by the skeleton and the rotation
//! engine. Everything here is deterministic near singularities.

use std::f64::consts::PI;

use nalgebra::{Matrix3, Rotation3, Unit, UnitQuaternion, Vector3};

use crate::pose::Landmark;

pub type Direction = Unit<Vector3<f64>>;

/// Vectors shorter than this are treated as zero length
pub const MIN_LENGTH: f64 = 1e-12;

/// `dot <= -1 + ANTI_PARALLEL_TOLERANCE` counts as a half turn
pub const ANTI_PARALLEL_TOLERANCE: f64 = 1e-12;

pub fn point(landmark: &Landmark) -> Vector3<f64> {
    Vector3::new(landmark.x, landmark.y, landmark.z)
}

/// Unit vector from `start` to `end`, `None` when the points coincide
pub fn direction(start: &Landmark, end: &Landmark) -> Option<Direction> {
    Unit::try_new(point(end) - point(start), MIN_LENGTH)
}

/// Any unit axis orthogonal to `v`, always the same one for the same input.
///
/// Crosses with the world axis least aligned with `v` (ties resolve x, y, z),
/// so the result never degenerates.
pub fn orthogonal_axis(v: &Direction) -> Direction {
    let v = v.into_inner();
    let abs = v.abs();
    let helper = if abs.x <= abs.y && abs.x <= abs.z {
        Vector3::x()
    } else if abs.y <= abs.z {
        Vector3::y()
    } else {
        Vector3::z()
    };
    Unit::new_normalize(helper.cross(&v))
}

/// Shortest-arc rotation taking `from` onto `to`.
///
/// Opposite vectors have no unique shortest arc; the half turn is taken about
/// [`orthogonal_axis`] of `from`.
pub fn rotation_between(from: &Direction, to: &Direction) -> UnitQuaternion<f64> {
    let (a, b) = (from.into_inner(), to.into_inner());
    let cos = a.dot(&b).clamp(-1.0, 1.0);
    if cos <= -1.0 + ANTI_PARALLEL_TOLERANCE {
        return UnitQuaternion::from_axis_angle(&orthogonal_axis(from), PI);
    }
    match Unit::try_new_and_get(a.cross(&b), MIN_LENGTH) {
        // atan2 keeps precision at small angles where acos(cos) does not
        Some((axis, sin)) => UnitQuaternion::from_axis_angle(&axis, sin.atan2(cos)),
        None => UnitQuaternion::identity(),
    }
}

/// Orientation of a right-handed orthonormal frame given as its columns.
///
/// Uses nalgebra's trace / largest-diagonal branch extraction, so no branch
/// divides by a value near zero.
pub fn basis_to_quaternion(x: &Direction, y: &Direction, z: &Direction) -> UnitQuaternion<f64> {
    let matrix = Matrix3::from_columns(&[x.into_inner(), y.into_inner(), z.into_inner()]);
    UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(matrix))
}
