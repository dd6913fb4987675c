//! Rigid-body-lite physics over the scene registry
//!
//! Objects opt in by being marked dynamic (an impulse or a collision marks
//! them). Each step integrates gravity, bounces off the floor with energy
//! loss, damps velocity, and settles objects below a rest threshold.
//! Contacts use bounding spheres only.
//!
//! Animated objects are never simulated: the animation engine rebuilds their
//! pose from scratch each tick, so physics writing to them would be undone a
//! tick later. Directive-driven motion wins over simulation.

pub mod primitives;

pub use primitives::{Aabb, BoundingSphere};

use crate::foundation::math::Vec3;
use crate::render::RenderBackend;
use crate::scene::registry::SceneRegistry;

/// Gravitational acceleration on Y
pub const GRAVITY: f32 = -9.8;

/// Fraction of vertical speed kept after a floor bounce
pub const RESTITUTION: f32 = 0.6;

/// Per-step velocity damping factor
pub const DAMPING: f32 = 0.98;

/// Clearance kept between the bounding sphere and the floor at contact
pub const FLOOR_CONTACT_MARGIN: f32 = 0.1;

/// Speed below which a dynamic object settles
pub const REST_SPEED: f32 = 0.01;

/// Speed given to an object struck by a dynamic one
pub const COLLISION_IMPULSE: f32 = 2.0;

/// Drives the physics simulation over a registry
#[derive(Debug, Default)]
pub struct PhysicsWorld;

impl PhysicsWorld {
    /// Create a physics world
    pub fn new() -> Self {
        Self
    }

    /// Give an object a velocity and mark it dynamic
    ///
    /// No-op for unknown ids and for animated objects.
    pub fn apply_impulse(&self, registry: &mut SceneRegistry, id: &str, velocity: Vec3) {
        let Some(object) = registry.get_mut(id) else {
            log::warn!("impulse on unknown object {id:?}");
            return;
        };
        if object.animated() {
            log::debug!("ignoring impulse on animated object {id:?}");
            return;
        }
        object.velocity = velocity;
        object.dynamic = true;
    }

    /// Advance the simulation by `dt` seconds
    pub fn step<B: RenderBackend>(
        &self,
        registry: &mut SceneRegistry,
        backend: &mut B,
        dt: f32,
    ) {
        self.integrate(registry, backend, dt);
        self.resolve_contacts(registry);
    }

    fn integrate<B: RenderBackend>(
        &self,
        registry: &mut SceneRegistry,
        backend: &mut B,
        dt: f32,
    ) {
        let floor = registry.floor();

        for object in registry.objects_mut() {
            if !object.dynamic || object.animated() {
                continue;
            }

            object.velocity.y += GRAVITY * dt;
            let mut position = object.position + object.velocity * dt;

            let contact_y = floor.level + object.bounding_sphere_radius + FLOOR_CONTACT_MARGIN;
            if position.y < contact_y {
                position.y = contact_y;
                object.velocity.y = -object.velocity.y * RESTITUTION;
            }

            if object.velocity.magnitude() < REST_SPEED {
                object.velocity = Vec3::zeros();
                object.dynamic = false;
                log::debug!("{:?} settled at {position:?}", object.id);
            }
            object.velocity *= DAMPING;

            object.set_position(position);
            // Keep the animation base point in step so a directive added
            // later composes around the rest position.
            object.original_position = position;
            if let Some(renderable) = object.renderable {
                backend.set_pose(
                    renderable,
                    position,
                    object.transform.rotation,
                    object.transform.scale,
                );
            }
        }
    }

    fn resolve_contacts(&self, registry: &mut SceneRegistry) {
        let count = registry.len();
        for i in 0..count {
            for j in (i + 1)..count {
                if registry.at(i).animated() || registry.at(j).animated() {
                    continue;
                }
                if !registry.at(i).bounding_sphere().intersects(&registry.at(j).bounding_sphere())
                {
                    continue;
                }

                let (a, b) = registry.pair_mut(i, j);
                let normal = (b.position - a.position).try_normalize(f32::EPSILON);
                let Some(normal) = normal else {
                    continue;
                };

                match (a.dynamic, b.dynamic) {
                    (true, true) => {
                        // Equal-mass elastic exchange of the velocity
                        // components along the contact normal. Separating
                        // pairs are left alone so the exchange cannot pull
                        // them back together.
                        let relative = (b.velocity - a.velocity).dot(&normal);
                        if relative >= 0.0 {
                            continue;
                        }
                        let a_along = a.velocity.dot(&normal);
                        let b_along = b.velocity.dot(&normal);
                        a.velocity += normal * (b_along - a_along);
                        b.velocity += normal * (a_along - b_along);
                    }
                    (true, false) => {
                        b.velocity = normal * COLLISION_IMPULSE;
                        b.dynamic = true;
                        log::debug!("{:?} knocked {:?} into motion", a.id, b.id);
                    }
                    (false, true) => {
                        a.velocity = -normal * COLLISION_IMPULSE;
                        a.dynamic = true;
                        log::debug!("{:?} knocked {:?} into motion", b.id, a.id);
                    }
                    (false, false) => {}
                }
            }
        }
    }
}
