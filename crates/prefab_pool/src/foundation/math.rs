//! Math utilities and types
//!
//! Spatial types shared by the scene and the pools. Everything is built on
//! nalgebra; the aliases keep call sites short.

pub use nalgebra::{UnitQuaternion, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create from full transform specification
    pub fn from_parts(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Combine this (parent) transform with a child's local transform
    pub fn combine(&self, child: &Transform) -> Transform {
        Transform {
            position: self.transform_point(child.position),
            rotation: self.rotation * child.rotation,
            scale: self.scale.component_mul(&child.scale),
        }
    }

    /// Map a point from this transform's local space into the parent space
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * self.scale.component_mul(&point)
    }

    /// Map a point from the parent space into this transform's local space
    ///
    /// Axes with zero scale collapse to zero instead of producing infinities.
    pub fn inverse_transform_point(&self, point: Vec3) -> Vec3 {
        let unrotated = self.rotation.inverse() * (point - self.position);
        unrotated.component_mul(&reciprocal_scale(&self.scale))
    }
}

fn reciprocal_scale(scale: &Vec3) -> Vec3 {
    scale.map(|s| if s.abs() <= f32::EPSILON { 0.0 } else { 1.0 / s })
}

/// Rotation whose local +Z axis points along `direction`, with +Y kept as
/// close to `up` as possible.
///
/// Returns `None` for a zero-length direction.
pub fn look_rotation(direction: Vec3, up: Vec3) -> Option<Quat> {
    let direction = direction.try_normalize(f32::MIN_POSITIVE)?;
    // face_towards degenerates when direction and up are parallel
    let up = match up.try_normalize(f32::MIN_POSITIVE) {
        Some(up) if direction.cross(&up).norm_squared() > f32::EPSILON => up,
        _ => Vec3::z(),
    };
    Some(Quat::face_towards(&direction, &up))
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;
}
