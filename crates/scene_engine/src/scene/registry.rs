//! Live scene object registry
//!
//! The registry is the single owner of spawned objects. Everything else
//! (animation, physics, the driver loop) addresses objects by string id and
//! goes through the registry to mutate them. Objects keep insertion order so
//! per-tick walks are deterministic.

use std::collections::HashMap;
use std::path::Path;

use crate::animation::{AnimationKind, AnimationState};
use crate::foundation::math::{Transform, Vec3};
use crate::geometry::{self, Floor, SizeClass};
use crate::physics::primitives::{Aabb, BoundingSphere};
use crate::render::{Color, RenderBackend, RenderableId};
use crate::scene::description::ObjectSpec;

/// One live object in the scene
#[derive(Debug, Clone)]
pub struct SceneObject {
    /// Unique id within the scene
    pub id: String,
    /// Model archetype name
    pub kind: String,
    /// Size class fixed at spawn
    pub size: SizeClass,
    /// Base color fixed at spawn
    pub color: Color,
    /// Ordered animation directives
    pub animations: Vec<AnimationKind>,
    /// Current world position
    pub position: Vec3,
    /// Base position animations compose around
    pub original_position: Vec3,
    /// Per-directive phase accumulators
    pub animation_state: AnimationState,
    /// Last committed pose
    pub transform: Transform,
    /// World-space collision radius
    pub bounding_sphere_radius: f32,
    /// Unscaled (by pulse) height of the scaled bounding box
    pub base_height: f32,
    /// Offset from position to the box minimum corner
    pub min_offset: Vec3,
    /// Offset from position to the box maximum corner
    pub max_offset: Vec3,
    /// Current linear velocity, physics-owned
    pub velocity: Vec3,
    /// Whether the physics step currently simulates this object
    pub dynamic: bool,
    /// Backend handle, `None` when renderable creation failed
    pub renderable: Option<RenderableId>,
}

impl SceneObject {
    /// Bounding-box height under an arbitrary pose scale
    ///
    /// `base_height` already includes the size-class multiplier, so the pose
    /// scale (multiplier times any pulse factor) is applied relative to it.
    pub fn height_at_scale(&self, scale: f32) -> f32 {
        self.base_height * scale / self.size.multiplier().max(f32::EPSILON)
    }

    /// Height of the bounding box at the current committed scale
    pub fn scaled_height(&self) -> f32 {
        self.height_at_scale(self.transform.scale)
    }

    /// Whether any animation directive drives this object
    pub fn animated(&self) -> bool {
        !self.animations.is_empty()
    }

    /// Bounding sphere at the current position
    pub fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::new(self.position, self.bounding_sphere_radius)
    }

    /// Bounding sphere as if the object sat at `position`
    pub fn bounding_sphere_at(&self, position: Vec3) -> BoundingSphere {
        BoundingSphere::new(position, self.bounding_sphere_radius)
    }

    /// World-space bounding box at the current position
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.position + self.min_offset, self.position + self.max_offset)
    }

    /// Move the object, keeping the committed transform in step
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.transform.position = position;
    }

    /// Commit an animation pose, re-asserting the floor constraint
    pub fn commit_pose(&mut self, pose: &Transform, floor: &Floor) {
        let position = floor.constrain(pose.position, self.height_at_scale(pose.scale));
        self.transform = Transform {
            position,
            rotation: pose.rotation,
            scale: pose.scale,
        };
        self.position = position;
    }
}

/// Owner of all live scene objects
pub struct SceneRegistry {
    objects: Vec<SceneObject>,
    index: HashMap<String, usize>,
    floor: Floor,
}

impl SceneRegistry {
    /// Create an empty registry over the given floor
    pub fn new(floor: Floor) -> Self {
        Self {
            objects: Vec::new(),
            index: HashMap::new(),
            floor,
        }
    }

    /// The ground plane objects are constrained against
    pub fn floor(&self) -> Floor {
        self.floor
    }

    /// Number of live objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Whether an object with this id exists
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Snapshot of ids in insertion order
    ///
    /// Taken before destructive walks so removal cannot invalidate iteration.
    pub fn ids(&self) -> Vec<String> {
        self.objects.iter().map(|object| object.id.clone()).collect()
    }

    /// Look up an object by id
    pub fn get(&self, id: &str) -> Option<&SceneObject> {
        self.index.get(id).map(|&i| &self.objects[i])
    }

    /// Look up an object mutably by id
    pub fn get_mut(&mut self, id: &str) -> Option<&mut SceneObject> {
        match self.index.get(id) {
            Some(&i) => Some(&mut self.objects[i]),
            None => None,
        }
    }

    /// Objects in insertion order
    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    /// Objects in insertion order, mutable
    pub fn objects_mut(&mut self) -> impl Iterator<Item = &mut SceneObject> {
        self.objects.iter_mut()
    }

    /// Object at an insertion-order index
    pub fn at(&self, index: usize) -> &SceneObject {
        &self.objects[index]
    }

    /// Object at an insertion-order index, mutable
    pub fn at_mut(&mut self, index: usize) -> &mut SceneObject {
        &mut self.objects[index]
    }

    /// Two distinct objects by index, both mutable
    ///
    /// Panics if the indices are equal or out of range.
    pub fn pair_mut(&mut self, a: usize, b: usize) -> (&mut SceneObject, &mut SceneObject) {
        assert_ne!(a, b, "pair_mut requires distinct indices");
        if a < b {
            let (head, tail) = self.objects.split_at_mut(b);
            (&mut head[a], &mut tail[0])
        } else {
            let (head, tail) = self.objects.split_at_mut(a);
            (&mut tail[0], &mut head[b])
        }
    }

    /// Spawn an object at a solver-assigned position
    ///
    /// The position is floor-constrained (relative margin, then the spawn
    /// safety net with the absolute margin) before anything is stored.
    /// Renderable creation failure is logged and leaves `renderable` empty;
    /// the object still participates in layout, animation, and physics.
    pub fn spawn<B: RenderBackend>(
        &mut self,
        spec: &ObjectSpec,
        position: Vec3,
        model: &Path,
        backend: &mut B,
    ) -> &SceneObject {
        debug_assert!(!self.contains(&spec.id), "duplicate spawn of {:?}", spec.id);

        let bounds = geometry::bounding_box(&spec.kind, spec.size);
        let height = bounds.dimensions.y;
        let position = self.floor.constrain(position, height);
        let position = self.floor.constrain_absolute(position, height);

        let scale = spec.size.multiplier();
        let renderable = match backend.create_renderable(model, spec.color, scale) {
            Ok(id) => Some(id),
            Err(err) => {
                log::warn!("spawning {:?} without a renderable: {err}", spec.id);
                None
            }
        };

        let object = SceneObject {
            id: spec.id.clone(),
            kind: spec.kind.clone(),
            size: spec.size,
            color: spec.color,
            animations: spec.animations.clone(),
            position,
            original_position: position,
            animation_state: AnimationState::default(),
            transform: Transform::from_position_scale(position, scale),
            bounding_sphere_radius: geometry::bounding_sphere_radius(&spec.kind, spec.size),
            base_height: height,
            min_offset: bounds.min_offset,
            max_offset: bounds.max_offset,
            velocity: Vec3::zeros(),
            dynamic: false,
            renderable,
        };
        if let Some(id) = object.renderable {
            backend.set_pose(id, position, object.transform.rotation, scale);
        }
        log::info!("spawned {:?} ({}) at {position:?}", object.id, object.kind);

        self.index.insert(object.id.clone(), self.objects.len());
        self.objects.push(object);
        self.objects.last().unwrap()
    }

    /// Remove an object, destroying its renderable
    ///
    /// Returns whether the id was present. Callers holding a full
    /// [`Scene`](crate::scene::Scene) go through
    /// [`Scene::remove`](crate::scene::Scene::remove), which also purges
    /// orbital couples referencing the id.
    pub fn remove<B: RenderBackend>(&mut self, id: &str, backend: &mut B) -> bool {
        let Some(position) = self.index.remove(id) else {
            return false;
        };
        let object = self.objects.remove(position);
        if let Some(renderable) = object.renderable {
            backend.destroy_renderable(renderable);
        }
        for (i, object) in self.objects.iter().enumerate().skip(position) {
            self.index.insert(object.id.clone(), i);
        }
        log::info!("removed {id:?}");
        true
    }

    /// Remove every object, destroying all renderables
    pub fn clear<B: RenderBackend>(&mut self, backend: &mut B) {
        for object in self.objects.drain(..) {
            if let Some(renderable) = object.renderable {
                backend.destroy_renderable(renderable);
            }
        }
        self.index.clear();
        log::info!("scene cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessBackend;
    use approx::assert_relative_eq;

    fn spec(id: &str, kind: &str, size: SizeClass) -> ObjectSpec {
        ObjectSpec {
            id: id.to_string(),
            kind: kind.to_string(),
            size,
            color: Color::GRAY,
            animations: Vec::new(),
        }
    }

    fn model() -> &'static Path {
        Path::new("models/cube.obj")
    }

    #[test]
    fn test_spawn_constrains_and_registers() {
        let mut registry = SceneRegistry::new(Floor::new(-2.0));
        let mut backend = HeadlessBackend::new();

        let object = registry.spawn(
            &spec("a", "cube", SizeClass::Medium),
            Vec3::new(0.0, -10.0, 0.0),
            model(),
            &mut backend,
        );
        assert!(object.position.y >= -2.0 + 0.5 + Floor::MARGIN);
        assert_eq!(object.position, object.original_position);
        assert_eq!(backend.renderable_count(), 1);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("a"));
    }

    #[test]
    fn test_spawn_respects_size_class() {
        let mut registry = SceneRegistry::new(Floor::default());
        let mut backend = HeadlessBackend::new();

        let object = registry.spawn(
            &spec("big", "chair", SizeClass::Huge),
            Vec3::new(0.0, 100.0, 0.0),
            model(),
            &mut backend,
        );
        assert_relative_eq!(object.base_height, 4.0);
        assert_relative_eq!(object.transform.scale, 2.0);
        let pose = backend.pose(object.renderable.unwrap()).unwrap();
        assert_relative_eq!(pose.scale, 2.0);
    }

    #[test]
    fn test_remove_destroys_renderable_and_reindexes() {
        let mut registry = SceneRegistry::new(Floor::default());
        let mut backend = HeadlessBackend::new();
        for id in ["a", "b", "c"] {
            registry.spawn(
                &spec(id, "cube", SizeClass::Medium),
                Vec3::zeros(),
                model(),
                &mut backend,
            );
        }

        assert!(registry.remove("b", &mut backend));
        assert!(!registry.remove("b", &mut backend));
        assert_eq!(registry.len(), 2);
        assert_eq!(backend.renderable_count(), 2);

        // Later objects must still resolve after the index shift
        assert_eq!(registry.get("c").unwrap().id, "c");
        assert_eq!(registry.at(1).id, "c");
    }

    #[test]
    fn test_clear_empties_backend() {
        let mut registry = SceneRegistry::new(Floor::default());
        let mut backend = HeadlessBackend::new();
        for id in ["a", "b"] {
            registry.spawn(
                &spec(id, "sphere", SizeClass::Small),
                Vec3::zeros(),
                model(),
                &mut backend,
            );
        }
        registry.clear(&mut backend);
        assert!(registry.is_empty());
        assert_eq!(backend.renderable_count(), 0);
    }

    #[test]
    fn test_pair_mut_returns_distinct_objects() {
        let mut registry = SceneRegistry::new(Floor::default());
        let mut backend = HeadlessBackend::new();
        for id in ["a", "b"] {
            registry.spawn(
                &spec(id, "cube", SizeClass::Medium),
                Vec3::zeros(),
                model(),
                &mut backend,
            );
        }
        let (a, b) = registry.pair_mut(0, 1);
        a.velocity = Vec3::new(1.0, 0.0, 0.0);
        b.velocity = Vec3::new(-1.0, 0.0, 0.0);
        assert_ne!(registry.at(0).velocity, registry.at(1).velocity);
    }

    #[test]
    fn test_commit_pose_keeps_floor_clearance() {
        let mut registry = SceneRegistry::new(Floor::new(-2.0));
        let mut backend = HeadlessBackend::new();
        registry.spawn(
            &spec("a", "cube", SizeClass::Medium),
            Vec3::new(0.0, 5.0, 0.0),
            model(),
            &mut backend,
        );

        let floor = registry.floor();
        let object = registry.get_mut("a").unwrap();
        let pose = Transform::from_position_scale(Vec3::new(0.0, -20.0, 0.0), 1.0);
        object.commit_pose(&pose, &floor);
        assert_relative_eq!(object.position.y, -2.0 + 0.5 + Floor::MARGIN);
        assert_eq!(object.transform.position, object.position);
    }
}
