//! Collision primitives
//!
//! World-space bounding volumes used by the physics step and the orbital
//! collision probe. Spheres are the primary broad-phase shape; the AABB is
//! kept on every object for spatial queries over the registry.

use crate::foundation::math::Vec3;

/// World-space sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// Sphere center in world coordinates
    pub center: Vec3,
    /// Sphere radius
    pub radius: f32,
}

impl BoundingSphere {
    /// Construct a sphere from center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Whether two spheres overlap
    pub fn intersects(&self, other: &BoundingSphere) -> bool {
        let combined = self.radius + other.radius;
        (self.center - other.center).magnitude_squared() < combined * combined
    }

    /// Overlap depth along the center line, zero when separated
    pub fn penetration_depth(&self, other: &BoundingSphere) -> f32 {
        let combined = self.radius + other.radius;
        (combined - (self.center - other.center).magnitude()).max(0.0)
    }
}

/// World-space axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Construct a box from corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Whether two boxes overlap on all three axes
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Whether a point lies inside the box
    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }
}
