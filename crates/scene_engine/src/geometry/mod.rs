//! Geometry and bounds utilities
//!
//! Pure functions mapping object archetypes and size classes to dimensions,
//! bounding volumes, and floor-constrained positions. Every subsystem that
//! mutates an object's position routes the result through
//! [`Floor::constrain`]; the constraint is never reimplemented locally.

use crate::foundation::math::Vec3;

/// Lattice spacing used by the placement solver and relation offsets
pub const DEFAULT_SPACING: f32 = 5.0;

/// Slack subtracted from the spacing when testing placement collisions
pub const COLLISION_TOLERANCE: f32 = 0.5;

/// X coordinate where the placement lattice starts
pub const GRID_ORIGIN_X: f32 = -5.0;

/// Z coordinate where the placement lattice starts
pub const GRID_ORIGIN_Z: f32 = -5.0;

/// X extent past which the lattice wraps to the next row
pub const GRID_WRAP_X: f32 = 15.0;

/// Discrete size class attached to every scene object
///
/// Unrecognized size strings fall back to [`SizeClass::Medium`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeClass {
    /// 0.4x base dimensions
    Tiny,
    /// 0.7x base dimensions
    Small,
    /// 1.0x base dimensions (default)
    #[default]
    Medium,
    /// 1.5x base dimensions
    Large,
    /// 2.0x base dimensions
    Huge,
}

impl SizeClass {
    /// Parse a size string; unknown values map to Medium
    pub fn parse(size: &str) -> Self {
        match size {
            "tiny" => Self::Tiny,
            "small" => Self::Small,
            "large" | "big" => Self::Large,
            "huge" => Self::Huge,
            _ => Self::Medium,
        }
    }

    /// Scalar multiplier applied to base dimensions
    pub fn multiplier(self) -> f32 {
        match self {
            Self::Tiny => 0.4,
            Self::Small => 0.7,
            Self::Medium => 1.0,
            Self::Large => 1.5,
            Self::Huge => 2.0,
        }
    }
}

/// Base (unscaled) dimensions for a model archetype
///
/// Unknown archetypes get a unit cube; the table only needs to be roughly
/// right since it feeds bounding volumes, not rendering.
pub fn base_dimensions(kind: &str) -> Vec3 {
    match kind {
        "cube" | "box" => Vec3::new(1.0, 1.0, 1.0),
        "sphere" | "ball" => Vec3::new(1.0, 1.0, 1.0),
        "chair" => Vec3::new(1.0, 2.0, 1.0),
        "table" => Vec3::new(2.0, 1.5, 1.0),
        "teapot" => Vec3::new(1.2, 1.0, 1.2),
        _ => Vec3::new(1.0, 1.0, 1.0),
    }
}

/// Axis-aligned bounding box for an archetype at a given size class
///
/// Dimensions are the base table scaled by the size multiplier; offsets are
/// centered on the object origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsSpec {
    /// Scaled dimensions (width, height, depth)
    pub dimensions: Vec3,
    /// Offset from origin to the box minimum corner
    pub min_offset: Vec3,
    /// Offset from origin to the box maximum corner
    pub max_offset: Vec3,
}

/// Compute the scaled bounding box for (archetype, size class)
pub fn bounding_box(kind: &str, size: SizeClass) -> BoundsSpec {
    let dimensions = base_dimensions(kind) * size.multiplier();
    let half = dimensions / 2.0;
    BoundsSpec {
        dimensions,
        min_offset: -half,
        max_offset: half,
    }
}

/// Bounding sphere radius: half the diagonal of the scaled bounding box
pub fn bounding_sphere_radius(kind: &str, size: SizeClass) -> f32 {
    bounding_box(kind, size).dimensions.magnitude() / 2.0
}

/// The ground plane every object must stay above
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Floor {
    /// World Y coordinate of the floor plane
    pub level: f32,
}

impl Floor {
    /// Clearance margin kept between an object's lower extent and the floor
    pub const MARGIN: f32 = 0.2;

    /// Distinct absolute margin enforced once more at spawn time
    pub const ABSOLUTE_MARGIN: f32 = 0.5;

    /// Create a floor at the given level
    pub fn new(level: f32) -> Self {
        Self { level }
    }

    /// Raise a position so the object's lower extent clears the floor
    ///
    /// Idempotent and monotone: never lowers a position.
    pub fn constrain(&self, position: Vec3, object_height: f32) -> Vec3 {
        let min_y = self.level + object_height / 2.0 + Self::MARGIN;
        if position.y < min_y {
            Vec3::new(position.x, min_y, position.z)
        } else {
            position
        }
    }

    /// Spawn-time safety net with the absolute margin
    ///
    /// Applied in addition to [`Floor::constrain`], never instead of it.
    pub fn constrain_absolute(&self, position: Vec3, object_height: f32) -> Vec3 {
        let absolute_min_y = self.level + Self::ABSOLUTE_MARGIN;
        if position.y < absolute_min_y {
            Vec3::new(position.x, absolute_min_y + object_height / 2.0, position.z)
        } else {
            position
        }
    }
}

impl Default for Floor {
    fn default() -> Self {
        Self { level: -2.0 }
    }
}
