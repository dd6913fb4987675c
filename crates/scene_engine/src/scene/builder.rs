//! Scene construction pipeline
//!
//! One call takes a raw description payload all the way to a populated
//! registry and animation engine: parse, place, resolve collisions, spawn,
//! register orbital couples. Parsing is the only fatal stage; everything
//! after degrades per object and logs.

use std::collections::HashMap;

use crate::animation::AnimationEngine;
use crate::assets::ModelResolver;
use crate::geometry::Floor;
use crate::render::RenderBackend;
use crate::scene::description::{ParseError, SceneDescription};
use crate::scene::layout;
use crate::scene::registry::SceneRegistry;
use crate::scene::Scene;

/// Builds live scenes from description payloads
pub struct SceneBuilder<R> {
    resolver: R,
    floor: Floor,
}

impl<R: ModelResolver> SceneBuilder<R> {
    /// Create a builder over a model resolver and the default floor
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            floor: Floor::default(),
        }
    }

    /// Override the floor level
    pub fn with_floor(mut self, floor: Floor) -> Self {
        self.floor = floor;
        self
    }

    /// The model resolver the builder spawns through
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Build a scene from a raw JSON payload
    ///
    /// Returns a [`Scene`]: the populated registry plus an animation engine
    /// with the description's orbital couples registered. A parse failure
    /// leaves nothing constructed.
    pub fn build<B: RenderBackend>(
        &self,
        payload: &[u8],
        backend: &mut B,
    ) -> Result<Scene, ParseError> {
        let description = SceneDescription::parse(payload)?;
        Ok(self.build_described(&description, backend))
    }

    /// Build a scene from an already validated description
    pub fn build_described<B: RenderBackend>(
        &self,
        description: &SceneDescription,
        backend: &mut B,
    ) -> Scene {
        log::info!(
            "building scene: {} objects, {} relations, {} orbital couples",
            description.objects.len(),
            description.relations.len(),
            description.orbitals.len()
        );

        let mut placements = layout::place(
            &description.objects,
            &description.relations,
            &self.resolver,
            &self.floor,
        );
        layout::resolve_collisions(&mut placements, &description.objects, &self.floor);

        let specs_by_id: HashMap<&str, _> = description
            .objects
            .iter()
            .map(|spec| (spec.id.as_str(), spec))
            .collect();

        let mut registry = SceneRegistry::new(self.floor);
        for (id, position) in placements.iter() {
            let Some(spec) = specs_by_id.get(id) else {
                continue;
            };
            // Placement already proved the model resolves
            let Some(model) = self.resolver.resolve(&spec.kind) else {
                continue;
            };
            registry.spawn(spec, position, &model, backend);
        }

        let mut animations = AnimationEngine::new();
        for orbital in &description.orbitals {
            animations.add_orbital(orbital.clone(), &registry);
        }

        Scene {
            registry,
            animations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{AnimationKind, OrbitKind, OrbitalSpec};
    use crate::assets::StaticResolver;
    use crate::foundation::math::Vec3;
    use crate::geometry::{SizeClass, DEFAULT_SPACING};
    use crate::physics::{PhysicsWorld, FLOOR_CONTACT_MARGIN};
    use crate::render::{Color, HeadlessBackend};
    use crate::scene::description::{ObjectSpec, RelationKind, RelationSpec};
    use approx::assert_relative_eq;
    use rand::{Rng, SeedableRng};

    fn builder() -> SceneBuilder<StaticResolver> {
        SceneBuilder::new(StaticResolver::primitives())
    }

    #[test]
    fn test_full_pipeline() {
        let json = br#"{
            "objects": [
                {"id": "a", "object": "cube", "attributes": {"animations": ["rotate"]}},
                {"id": "b", "object": "sphere", "attributes": {"size": "large", "color": "red"}}
            ],
            "relations": [
                {"object_1": "a", "object_2": "b", "relation": "left"}
            ]
        }"#;

        let mut backend = HeadlessBackend::new();
        let scene = builder().build(json, &mut backend).unwrap();

        assert_eq!(scene.registry.len(), 2);
        assert_eq!(backend.renderable_count(), 2);

        let a = scene.registry.get("a").unwrap();
        let b = scene.registry.get("b").unwrap();
        assert_eq!(a.animations, vec![AnimationKind::Rotate]);
        assert_relative_eq!(a.position.x, b.position.x - DEFAULT_SPACING);
    }

    #[test]
    fn test_unresolvable_objects_are_skipped() {
        let json = br#"{
            "objects": [
                {"id": "u", "object": "unicorn"},
                {"id": "a", "object": "cube"}
            ],
            "relations": []
        }"#;

        let mut backend = HeadlessBackend::new();
        let scene = builder().build(json, &mut backend).unwrap();
        assert_eq!(scene.registry.len(), 1);
        assert!(scene.registry.get("u").is_none());
        assert!(scene.registry.get("a").is_some());
    }

    #[test]
    fn test_parse_failure_builds_nothing() {
        let mut backend = HeadlessBackend::new();
        let result = builder().build(b"{broken", &mut backend);
        assert!(result.is_err());
        assert_eq!(backend.renderable_count(), 0);
    }

    #[test]
    fn test_orbitals_registered_when_endpoints_exist() {
        let json = br#"{
            "objects": [
                {"id": "moon", "object": "sphere"},
                {"id": "planet", "object": "sphere"}
            ],
            "relations": [],
            "animation_couples": [
                {"primary_object": "moon", "reference_object": "planet", "animation_type": "orbit"},
                {"primary_object": "ghost", "reference_object": "planet", "animation_type": "circle"}
            ]
        }"#;

        let mut backend = HeadlessBackend::new();
        let scene = builder().build(json, &mut backend).unwrap();
        assert_eq!(scene.animations.orbital_count(), 1);
    }

    #[test]
    fn test_remove_purges_orbital_couples() {
        let json = br#"{
            "objects": [
                {"id": "moon", "object": "sphere"},
                {"id": "planet", "object": "sphere"}
            ],
            "relations": [],
            "animation_couples": [
                {"primary_object": "moon", "reference_object": "planet", "animation_type": "orbit"}
            ]
        }"#;

        let mut backend = HeadlessBackend::new();
        let mut scene = builder().build(json, &mut backend).unwrap();
        assert_eq!(scene.animations.orbital_count(), 1);

        assert!(scene.remove("planet", &mut backend));
        assert!(scene.registry.get("planet").is_none());
        assert_eq!(scene.animations.orbital_count(), 0);
        assert_eq!(backend.renderable_count(), 1);

        // A respawn of the same id must not inherit the old couple
        let spec = ObjectSpec {
            id: "planet".to_string(),
            kind: "sphere".to_string(),
            size: SizeClass::Medium,
            color: Color::GRAY,
            animations: Vec::new(),
        };
        scene.registry.spawn(
            &spec,
            Vec3::new(0.0, 5.0, 0.0),
            std::path::Path::new("primitives/sphere.obj"),
            &mut backend,
        );
        scene
            .animations
            .update(&mut scene.registry, &mut backend, 0.016);
        assert_eq!(scene.animations.orbital_count(), 0);
    }

    #[test]
    fn test_clear_empties_both_halves() {
        let json = br#"{
            "objects": [
                {"id": "moon", "object": "sphere"},
                {"id": "planet", "object": "sphere"}
            ],
            "relations": [],
            "animation_couples": [
                {"primary_object": "moon", "reference_object": "planet", "animation_type": "revolve"}
            ]
        }"#;

        let mut backend = HeadlessBackend::new();
        let mut scene = builder().build(json, &mut backend).unwrap();
        scene.clear(&mut backend);
        assert!(scene.registry.is_empty());
        assert_eq!(scene.animations.orbital_count(), 0);
        assert_eq!(backend.renderable_count(), 0);
    }

    #[test]
    fn test_custom_floor_applies_to_spawns() {
        let json = br#"{
            "objects": [{"id": "a", "object": "cube"}],
            "relations": []
        }"#;

        let mut backend = HeadlessBackend::new();
        let builder = builder().with_floor(Floor::new(3.0));
        let scene = builder.build(json, &mut backend).unwrap();
        let a = scene.registry.get("a").unwrap();
        assert!(a.position.y >= 3.0 + 0.5 + Floor::MARGIN - 1e-6);
    }

    fn random_description(rng: &mut impl Rng) -> SceneDescription {
        let kinds = ["cube", "box", "sphere", "ball", "chair", "table", "teapot"];
        let sizes = [
            SizeClass::Tiny,
            SizeClass::Small,
            SizeClass::Medium,
            SizeClass::Large,
            SizeClass::Huge,
        ];
        let directives = [
            AnimationKind::Rotate,
            AnimationKind::Bounce,
            AnimationKind::Float,
            AnimationKind::Pulse,
            AnimationKind::Swing,
            AnimationKind::Glow,
        ];
        let relation_kinds = [
            RelationKind::Left,
            RelationKind::Right,
            RelationKind::Behind,
            RelationKind::Front,
            RelationKind::Above,
            RelationKind::Below,
            RelationKind::Near,
        ];
        let orbit_kinds = [OrbitKind::Orbit, OrbitKind::Circle, OrbitKind::Revolve];

        let object_count = rng.gen_range(1..=8);
        let objects: Vec<ObjectSpec> = (0..object_count)
            .map(|i| {
                let mut animations = Vec::new();
                for kind in directives {
                    if rng.gen_bool(0.3) {
                        animations.push(kind);
                    }
                }
                ObjectSpec {
                    id: format!("obj{i}"),
                    kind: kinds[rng.gen_range(0..kinds.len())].to_string(),
                    size: sizes[rng.gen_range(0..sizes.len())],
                    color: Color::GRAY,
                    animations,
                }
            })
            .collect();

        let relations: Vec<RelationSpec> = (0..rng.gen_range(0..6))
            .map(|_| RelationSpec {
                subject: format!("obj{}", rng.gen_range(0..object_count)),
                object: format!("obj{}", rng.gen_range(0..object_count)),
                kind: relation_kinds[rng.gen_range(0..relation_kinds.len())],
            })
            .collect();

        let orbitals: Vec<OrbitalSpec> = (0..rng.gen_range(0..3))
            .map(|_| OrbitalSpec {
                primary: format!("obj{}", rng.gen_range(0..object_count)),
                reference: format!("obj{}", rng.gen_range(0..object_count)),
                kind: orbit_kinds[rng.gen_range(0..orbit_kinds.len())],
                description: None,
            })
            .collect();

        SceneDescription {
            objects,
            relations,
            orbitals,
        }
    }

    #[test]
    fn test_floor_invariant_over_randomized_scenes() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0xf1008);

        for _ in 0..25 {
            let description = random_description(&mut rng);
            let mut backend = HeadlessBackend::new();
            let mut scene = builder().build_described(&description, &mut backend);
            let physics = PhysicsWorld::new();
            let floor = scene.registry.floor();

            for id in scene.registry.ids() {
                if rng.gen_bool(0.4) {
                    let velocity = Vec3::new(
                        rng.gen_range(-6.0..6.0),
                        rng.gen_range(-6.0..6.0),
                        rng.gen_range(-6.0..6.0),
                    );
                    physics.apply_impulse(&mut scene.registry, &id, velocity);
                }
            }

            let ticks = rng.gen_range(1..400);
            for _ in 0..ticks {
                scene
                    .animations
                    .update(&mut scene.registry, &mut backend, 0.016);
                physics.step(&mut scene.registry, &mut backend, 0.016);
            }

            for object in scene.registry.objects() {
                // Layout and animation hold the half-height clearance;
                // physics rests on the sphere contact height, which for
                // squat archetypes sits slightly below it. Either bound
                // keeps the object out of the floor.
                let layout_min =
                    floor.level + object.scaled_height() / 2.0 + Floor::MARGIN;
                let contact_min =
                    floor.level + object.bounding_sphere_radius + FLOOR_CONTACT_MARGIN;
                let min_y = layout_min.min(contact_min);
                assert!(
                    object.position.y >= min_y - 1e-3,
                    "{} at y {} below clearance {} after {} ticks",
                    object.id,
                    object.position.y,
                    min_y,
                    ticks
                );
            }
        }
    }
}
