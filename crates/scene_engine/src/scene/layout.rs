//! Placement solver
//!
//! Assigns every placeable object an initial lattice position, applies the
//! pairwise relation offsets, and runs a greedy collision-resolution pass.
//! None of this raises hard errors: objects without a resolvable model are
//! dropped (and logged), relations with missing endpoints are skipped, and
//! residual overlap after the attempt budget is accepted as-is.

use std::collections::HashMap;

use crate::assets::ModelResolver;
use crate::foundation::math::Vec3;
use crate::geometry::{
    self, Floor, COLLISION_TOLERANCE, DEFAULT_SPACING, GRID_ORIGIN_X, GRID_ORIGIN_Z, GRID_WRAP_X,
};
use crate::scene::description::{ObjectSpec, RelationKind, RelationSpec};

/// Shift attempts per object before accepting residual overlap
const MAX_RESOLVE_ATTEMPTS: u32 = 10;

/// Insertion-ordered map from object id to world position
///
/// Iteration order is the order ids were first inserted, which makes the
/// whole placement pipeline deterministic for a given description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementMap {
    order: Vec<String>,
    positions: HashMap<String, Vec3>,
}

impl PlacementMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a position; first insertion fixes iteration order
    pub fn set(&mut self, id: &str, position: Vec3) {
        if !self.positions.contains_key(id) {
            self.order.push(id.to_string());
        }
        self.positions.insert(id.to_string(), position);
    }

    /// Look up a position by id
    pub fn get(&self, id: &str) -> Option<Vec3> {
        self.positions.get(id).copied()
    }

    /// Whether an id has a position
    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Number of placed objects
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids in insertion order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// (id, position) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Vec3)> {
        self.order
            .iter()
            .map(|id| (id.as_str(), self.positions[id]))
    }
}

/// Offset applied to the subject relative to the object's position
fn relation_offset(kind: RelationKind) -> Vec3 {
    match kind {
        RelationKind::Left => Vec3::new(-DEFAULT_SPACING, 0.0, 0.0),
        RelationKind::Right => Vec3::new(DEFAULT_SPACING, 0.0, 0.0),
        RelationKind::Behind => Vec3::new(0.0, 0.0, -DEFAULT_SPACING),
        RelationKind::Front => Vec3::new(0.0, 0.0, DEFAULT_SPACING),
        RelationKind::Above => Vec3::new(0.0, DEFAULT_SPACING, 0.0),
        RelationKind::Below => Vec3::new(0.0, -DEFAULT_SPACING * 0.5, 0.0),
        RelationKind::Near => Vec3::new(DEFAULT_SPACING * 0.5, 0.0, 0.0),
    }
}

/// Scaled height used for the floor constraint of an object spec
fn spec_height(spec: &ObjectSpec) -> f32 {
    geometry::bounding_box(&spec.kind, spec.size).dimensions.y
}

/// Compute initial positions and apply relation offsets
///
/// Objects are laid out in input order on an X/Z lattice starting at the
/// grid origin, stepping one spacing unit in X and wrapping to the next Z
/// row past the wrap extent. Objects whose archetype has no resolvable model
/// are excluded from the result. Every written position is floor-constrained
/// immediately; upstream values are never trusted.
pub fn place<R: ModelResolver>(
    objects: &[ObjectSpec],
    relations: &[RelationSpec],
    resolver: &R,
    floor: &Floor,
) -> PlacementMap {
    let mut placements = PlacementMap::new();
    let specs_by_id: HashMap<&str, &ObjectSpec> =
        objects.iter().map(|spec| (spec.id.as_str(), spec)).collect();

    let mut grid_x = GRID_ORIGIN_X;
    let mut grid_z = GRID_ORIGIN_Z;

    for spec in objects {
        // Inclusion filter: only objects with a renderable model get placed.
        if resolver.resolve(&spec.kind).is_none() {
            log::info!(
                "object {:?} of type {:?} has no resolvable model, dropping",
                spec.id,
                spec.kind
            );
            grid_x += DEFAULT_SPACING;
            if grid_x > GRID_WRAP_X {
                grid_x = GRID_ORIGIN_X;
                grid_z += DEFAULT_SPACING;
            }
            continue;
        }

        let raw = Vec3::new(grid_x, floor.level + 2.0, grid_z);
        let position = floor.constrain(raw, spec_height(spec));
        placements.set(&spec.id, position);
        log::debug!("placed {:?} at {position:?}", spec.id);

        grid_x += DEFAULT_SPACING;
        if grid_x > GRID_WRAP_X {
            grid_x = GRID_ORIGIN_X;
            grid_z += DEFAULT_SPACING;
        }
    }

    // Relations in declaration order; the last relation naming a subject
    // wins. Missing endpoints skip the relation without error.
    for relation in relations {
        if !placements.contains(&relation.subject) || !placements.contains(&relation.object) {
            log::debug!(
                "skipping relation {:?} {:?} {:?}: endpoint not placed",
                relation.subject,
                relation.kind,
                relation.object
            );
            continue;
        }

        let anchor = placements
            .get(&relation.object)
            .unwrap_or_else(Vec3::zeros);
        let height = specs_by_id
            .get(relation.subject.as_str())
            .map(|spec| spec_height(spec))
            .unwrap_or(1.0);

        let position = floor.constrain(anchor + relation_offset(relation.kind), height);
        placements.set(&relation.subject, position);
    }

    placements
}

/// Greedy in-place collision resolution over a placement map
///
/// For each position in insertion order: while it sits closer than
/// `spacing - tolerance` to any already-accepted position and the attempt
/// budget is not exhausted, shift it one spacing unit along +X. After the
/// budget the position is accepted regardless; this is best-effort, not
/// globally optimal.
pub fn resolve_collisions(
    placements: &mut PlacementMap,
    objects: &[ObjectSpec],
    floor: &Floor,
) {
    let specs_by_id: HashMap<&str, &ObjectSpec> =
        objects.iter().map(|spec| (spec.id.as_str(), spec)).collect();
    let min_distance = DEFAULT_SPACING - COLLISION_TOLERANCE;

    let ids: Vec<String> = placements.ids().map(str::to_string).collect();
    let mut accepted: Vec<Vec3> = Vec::with_capacity(ids.len());

    for id in &ids {
        let mut position = match placements.get(id) {
            Some(position) => position,
            None => continue,
        };

        let mut attempts = 0;
        let mut collides = true;
        while collides && attempts < MAX_RESOLVE_ATTEMPTS {
            collides = false;
            for existing in &accepted {
                if (position - existing).magnitude() < min_distance {
                    position.x += DEFAULT_SPACING;
                    collides = true;
                    break;
                }
            }
            attempts += 1;
        }
        if collides {
            log::debug!("residual overlap for {id:?} after {MAX_RESOLVE_ATTEMPTS} attempts");
        }

        let height = specs_by_id
            .get(id.as_str())
            .map(|spec| spec_height(spec))
            .unwrap_or(1.0);
        position = floor.constrain(position, height);

        accepted.push(position);
        placements.set(id, position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::StaticResolver;
    use crate::geometry::SizeClass;
    use crate::render::Color;
    use approx::assert_relative_eq;

    fn cube(id: &str) -> ObjectSpec {
        ObjectSpec {
            id: id.to_string(),
            kind: "cube".to_string(),
            size: SizeClass::Medium,
            color: Color::GRAY,
            animations: Vec::new(),
        }
    }

    fn floor() -> Floor {
        Floor::new(-2.0)
    }

    #[test]
    fn test_lattice_layout_and_wrap() {
        let objects: Vec<ObjectSpec> =
            (0..6).map(|i| cube(&format!("c{i}"))).collect();
        let resolver = StaticResolver::primitives();
        let placements = place(&objects, &[], &resolver, &floor());

        assert_eq!(placements.len(), 6);
        let first = placements.get("c0").unwrap();
        let second = placements.get("c1").unwrap();
        assert_relative_eq!(second.x - first.x, DEFAULT_SPACING);
        assert_relative_eq!(second.z, first.z);

        // Lattice runs -5, 0, 5, 10, 15 and wraps to the next row
        let sixth = placements.get("c5").unwrap();
        assert_relative_eq!(sixth.x, GRID_ORIGIN_X);
        assert_relative_eq!(sixth.z, GRID_ORIGIN_Z + DEFAULT_SPACING);
    }

    #[test]
    fn test_unresolvable_object_is_dropped() {
        let mut unicorn = cube("u");
        unicorn.kind = "unicorn".to_string();
        let objects = vec![unicorn, cube("a")];
        let resolver = StaticResolver::primitives();
        let placements = place(&objects, &[], &resolver, &floor());

        assert!(!placements.contains("u"));
        assert!(placements.contains("a"));
    }

    #[test]
    fn test_left_relation_offsets_subject() {
        let objects = vec![cube("a"), cube("b")];
        let relations = vec![RelationSpec {
            subject: "a".to_string(),
            object: "b".to_string(),
            kind: RelationKind::Left,
        }];
        let resolver = StaticResolver::primitives();
        let placements = place(&objects, &relations, &resolver, &floor());

        let a = placements.get("a").unwrap();
        let b = placements.get("b").unwrap();
        assert_relative_eq!(a.x, b.x - DEFAULT_SPACING);
        assert_relative_eq!(a.y, b.y);
    }

    #[test]
    fn test_last_relation_wins() {
        let objects = vec![cube("a"), cube("b"), cube("c")];
        let relations = vec![
            RelationSpec {
                subject: "a".to_string(),
                object: "b".to_string(),
                kind: RelationKind::Left,
            },
            RelationSpec {
                subject: "a".to_string(),
                object: "c".to_string(),
                kind: RelationKind::Front,
            },
        ];
        let resolver = StaticResolver::primitives();
        let placements = place(&objects, &relations, &resolver, &floor());

        let a = placements.get("a").unwrap();
        let c = placements.get("c").unwrap();
        assert_relative_eq!(a.x, c.x);
        assert_relative_eq!(a.z, c.z + DEFAULT_SPACING);
    }

    #[test]
    fn test_relation_with_missing_endpoint_is_skipped() {
        let objects = vec![cube("a")];
        let relations = vec![RelationSpec {
            subject: "a".to_string(),
            object: "ghost".to_string(),
            kind: RelationKind::Right,
        }];
        let resolver = StaticResolver::primitives();
        let placements = place(&objects, &relations, &resolver, &floor());
        assert_relative_eq!(placements.get("a").unwrap().x, GRID_ORIGIN_X);
    }

    #[test]
    fn test_below_relation_stays_floor_constrained() {
        let objects = vec![cube("a"), cube("b")];
        let relations = vec![RelationSpec {
            subject: "a".to_string(),
            object: "b".to_string(),
            kind: RelationKind::Below,
        }];
        let resolver = StaticResolver::primitives();
        let f = floor();
        let placements = place(&objects, &relations, &resolver, &f);

        let a = placements.get("a").unwrap();
        assert!(a.y >= f.level + 0.5 + Floor::MARGIN - 1e-6);
    }

    #[test]
    fn test_collision_resolution_separates_stacked_positions() {
        let objects = vec![cube("a"), cube("b"), cube("c")];
        let f = floor();
        let mut placements = PlacementMap::new();
        for spec in &objects {
            placements.set(&spec.id, Vec3::new(0.0, 0.0, 0.0));
        }

        resolve_collisions(&mut placements, &objects, &f);

        let positions: Vec<Vec3> = placements.iter().map(|(_, p)| p).collect();
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                let distance = (positions[i] - positions[j]).magnitude();
                assert!(
                    distance >= DEFAULT_SPACING - COLLISION_TOLERANCE - 1e-6,
                    "objects {i} and {j} still overlap at distance {distance}"
                );
            }
        }
    }

    #[test]
    fn test_placement_is_deterministic() {
        let objects = vec![cube("a"), cube("b"), cube("c"), cube("d")];
        let relations = vec![RelationSpec {
            subject: "c".to_string(),
            object: "a".to_string(),
            kind: RelationKind::Near,
        }];
        let resolver = StaticResolver::primitives();
        let f = floor();

        let mut first = place(&objects, &relations, &resolver, &f);
        resolve_collisions(&mut first, &objects, &f);
        let mut second = place(&objects, &relations, &resolver, &f);
        resolve_collisions(&mut second, &objects, &f);

        assert_eq!(first, second);
    }

    #[test]
    fn test_resolution_terminates_on_large_pileup() {
        // Far more overlapping entries than the attempt budget can separate;
        // the pass must still terminate and keep every id.
        let objects: Vec<ObjectSpec> = (0..40).map(|i| cube(&format!("c{i}"))).collect();
        let mut placements = PlacementMap::new();
        for spec in &objects {
            placements.set(&spec.id, Vec3::zeros());
        }
        resolve_collisions(&mut placements, &objects, &floor());
        assert_eq!(placements.len(), 40);
    }
}
