//! # Scene Engine
//!
//! A procedural 3D scene layout and animation engine driven by structured
//! scene descriptions.
//!
//! ## Features
//!
//! - **Scene Descriptions**: Validated JSON input with objects, spatial
//!   relations, and orbital animation couples
//! - **Placement Solver**: Deterministic lattice layout, relation offsets,
//!   and greedy collision resolution
//! - **Procedural Animation**: Composable per-object directives plus
//!   two-body orbital coupling
//! - **Physics**: Gravity, floor bounces, and sphere-contact impulses for
//!   objects animation does not own
//! - **Backend Agnostic**: Rendering goes through a trait; a headless
//!   recording backend ships for tests and tooling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut backend = HeadlessBackend::new();
//!     let builder = SceneBuilder::new(StaticResolver::primitives());
//!
//!     let payload = br#"{
//!         "objects": [
//!             {"id": "a", "object": "cube", "attributes": {"animations": ["rotate"]}},
//!             {"id": "b", "object": "sphere", "attributes": {"color": "red"}}
//!         ],
//!         "relations": [{"object_1": "a", "object_2": "b", "relation": "left"}]
//!     }"#;
//!     let mut scene = builder.build(payload, &mut backend)?;
//!
//!     let physics = PhysicsWorld::new();
//!     loop {
//!         scene.animations.update(&mut scene.registry, &mut backend, 0.016);
//!         physics.step(&mut scene.registry, &mut backend, 0.016);
//!     }
//! }
//! ```

#![warn(missing_docs)]

pub mod animation;
pub mod assets;
pub mod config;
pub mod foundation;
pub mod generate;
pub mod geometry;
pub mod physics;
pub mod render;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        animation::{AnimationEngine, AnimationKind, OrbitKind, OrbitalSpec},
        assets::{ModelLibrary, ModelResolver, StaticResolver},
        config::{Config, ConfigError, ViewerConfig},
        foundation::{
            math::{Quat, Transform, Vec3},
            time::TickClock,
        },
        generate::{CommandTranslator, GenerateError, SceneGenerator, Translator},
        geometry::{Floor, SizeClass},
        physics::PhysicsWorld,
        render::{Color, HeadlessBackend, RenderBackend, RenderableId},
        scene::{ParseError, Scene, SceneBuilder, SceneDescription, SceneRegistry},
    };
}
