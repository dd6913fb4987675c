//! Orbital (two-body) animation coupling
//!
//! A primary object revolves around a reference object's current position at
//! a fixed radius and angular speed. The orbit writes the primary's base
//! position, so its own per-object directives keep composing on top of the
//! moving center.

use crate::foundation::math::utils;

/// Orbit parameterization, fixed per animation type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitKind {
    /// Radius 5.0, angular speed 0.5 rad/s
    Orbit,
    /// Radius 3.0, angular speed 1.0 rad/s
    Circle,
    /// Radius 7.0, angular speed 0.3 rad/s
    Revolve,
}

impl OrbitKind {
    /// Parse an orbital animation type, accepting word variants; unknown
    /// types yield `None`
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "orbit" | "orbiting" => Some(Self::Orbit),
            "circle" | "circling" => Some(Self::Circle),
            "revolve" | "revolving" => Some(Self::Revolve),
            _ => None,
        }
    }

    /// Orbit radius in world units
    pub fn radius(self) -> f32 {
        match self {
            Self::Orbit => 5.0,
            Self::Circle => 3.0,
            Self::Revolve => 7.0,
        }
    }

    /// Angular speed in radians per second
    pub fn speed(self) -> f32 {
        match self {
            Self::Orbit => 0.5,
            Self::Circle => 1.0,
            Self::Revolve => 0.3,
        }
    }
}

/// Validated orbital couple from the scene description
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalSpec {
    /// Id of the object being moved
    pub primary: String,
    /// Id of the object orbited around
    pub reference: String,
    /// Fixed radius/speed parameterization
    pub kind: OrbitKind,
    /// Free-text description from the translator, informational only
    pub description: Option<String>,
}

/// Live orbital state: the spec plus the advancing angle
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalAnimation {
    /// The couple being animated
    pub spec: OrbitalSpec,
    /// Current angle in radians, wrapped into [0, 2*pi)
    pub current_angle: f32,
}

impl OrbitalAnimation {
    /// Start an orbit at angle zero
    pub fn new(spec: OrbitalSpec) -> Self {
        Self {
            spec,
            current_angle: 0.0,
        }
    }

    /// Advance the angle by `speed * dt`, wrapping mod 2*pi
    pub fn advance(&mut self, dt: f32) {
        self.current_angle = utils::wrap_radians(self.current_angle + self.spec.kind.speed() * dt);
    }
}
