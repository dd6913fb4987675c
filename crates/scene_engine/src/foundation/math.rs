//! Math utilities and types
//!
//! Provides the fundamental math types used by the layout, animation, and
//! physics subsystems.

pub use nalgebra::{Quaternion, Unit, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and uniform scale
///
/// Scene objects carry uniform scale only; the size-class multiplier scales
/// all three axes equally.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Uniform scale factor
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: 1.0,
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

    /// Create a transform with position and uniform scale
    pub fn from_position_scale(position: Vec3, scale: f32) -> Self {
        Self {
            position,
            rotation: Quat::identity(),
            scale,
        }
    }

    /// Compose a rotation onto this transform (applied after existing rotation)
    pub fn rotate(&mut self, rotation: Quat) {
        self.rotation = self.rotation * rotation;
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::*;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Wrap an angle in degrees into [0, 360)
    pub fn wrap_degrees(angle: f32) -> f32 {
        let wrapped = angle % 360.0;
        if wrapped < 0.0 {
            wrapped + 360.0
        } else {
            wrapped
        }
    }

    /// Wrap an angle in radians into [0, 2*pi)
    pub fn wrap_radians(angle: f32) -> f32 {
        let wrapped = angle % constants::TAU;
        if wrapped < 0.0 {
            wrapped + constants::TAU
        } else {
            wrapped
        }
    }

    /// Quaternion rotation about the Y axis, angle in degrees
    pub fn rotation_y_deg(degrees: f32) -> Quat {
        Quat::from_axis_angle(&Vec3::y_axis(), deg_to_rad(degrees))
    }

    /// Quaternion rotation about the Z axis, angle in degrees
    pub fn rotation_z_deg(degrees: f32) -> Quat {
        Quat::from_axis_angle(&Vec3::z_axis(), deg_to_rad(degrees))
    }
}
