//! Scene subsystem: description parsing, placement, and object registry
//!
//! Data flows one way: [`description`] turns raw JSON into validated specs,
//! [`layout`] assigns every placeable object a floor-constrained position,
//! [`registry`] owns the live objects, and [`builder`] strings the whole
//! pipeline together the way the viewer loads a generated scene.

pub mod builder;
pub mod description;
pub mod layout;
pub mod registry;

pub use builder::SceneBuilder;
pub use description::{ObjectSpec, ParseError, RelationKind, RelationSpec, SceneDescription};
pub use layout::PlacementMap;
pub use registry::{SceneObject, SceneRegistry};

use crate::animation::AnimationEngine;
use crate::render::RenderBackend;

/// A built scene: the object registry plus its animation engine
///
/// The two halves stay consistent only when mutated together, so removal
/// and clearing go through this type: [`Scene::remove`] drops the object
/// and every orbital couple referencing it, which keeps a later respawn of
/// the same id from inheriting stale couples.
pub struct Scene {
    /// Live objects
    pub registry: SceneRegistry,
    /// Per-object directives and orbital couples
    pub animations: AnimationEngine,
}

impl Scene {
    /// Remove an object and every orbital couple referencing it
    ///
    /// Returns whether the id was present.
    pub fn remove<B: RenderBackend>(&mut self, id: &str, backend: &mut B) -> bool {
        let removed = self.registry.remove(id, backend);
        if removed {
            self.animations.purge_object(id);
        }
        removed
    }

    /// Remove every object and orbital couple
    pub fn clear<B: RenderBackend>(&mut self, backend: &mut B) {
        self.registry.clear(backend);
        self.animations.clear();
    }
}
