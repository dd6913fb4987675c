//! Per-object procedural animation
//!
//! Each scene object carries an ordered list of [`AnimationKind`] directives.
//! Every tick the engine rebuilds the object's pose from scratch: start at
//! the object's base position with identity rotation and the size-class
//! scale, then fold each directive's contribution in order. Directives never
//! see each other's state; each kind owns one phase accumulator on the
//! object and composes additively (position), multiplicatively (scale), or
//! by quaternion multiplication (rotation).
//!
//! Orbital couples run as a second pass after all per-object passes, see
//! [`orbital`].

pub mod orbital;

pub use orbital::{OrbitKind, OrbitalAnimation, OrbitalSpec};

use crate::foundation::math::{utils, Transform, Vec3};
use crate::geometry::Floor;
use crate::render::RenderBackend;
use crate::scene::registry::SceneRegistry;

/// Closed set of per-object animation directives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    /// Continuous rotation about Y, 30 degrees per second
    Rotate,
    /// Vertical hops: |sin(phase)| * 2 added to Y, phase rate 2/s
    Bounce,
    /// Gentle drift: sin(phase) * 1 added to Y, phase rate 0.5/s
    Float,
    /// Scale pulse: 1 + sin(phase) * 0.2 multiplied in, phase rate 3/s
    Pulse,
    /// Pendulum: sin(phase) * 15 degrees about Z, phase rate 1.5/s
    Swing,
    /// Recognized but intentionally without effect
    Glow,
}

impl AnimationKind {
    /// Parse an animation directive, accepting the word variants the
    /// translator emits; unknown directives yield `None`
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "rotate" | "rotation" | "spin" => Some(Self::Rotate),
            "bounce" | "bouncing" | "jump" => Some(Self::Bounce),
            "float" | "floating" => Some(Self::Float),
            "pulse" | "pulsing" => Some(Self::Pulse),
            "swing" | "swinging" | "oscillate" => Some(Self::Swing),
            "glow" => Some(Self::Glow),
            _ => None,
        }
    }
}

/// Per-object phase accumulators, one per animation kind
///
/// Phases only ever advance; the rotation angle wraps mod 360 to keep the
/// accumulator bounded over long runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationState {
    /// Bounce phase in radians
    pub bounce_phase: f32,
    /// Float phase in radians
    pub float_phase: f32,
    /// Pulse phase in radians
    pub pulse_phase: f32,
    /// Swing phase in radians
    pub swing_phase: f32,
    /// Rotation angle in degrees, wrapped into [0, 360)
    pub rotation_angle: f32,
}

/// Drives per-object and orbital animation over the registry
#[derive(Default)]
pub struct AnimationEngine {
    orbitals: Vec<OrbitalAnimation>,
}

impl AnimationEngine {
    /// Create an engine with no orbital couples
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an orbital couple
    ///
    /// Both endpoints must already exist in the registry; otherwise the spec
    /// is logged and skipped. Never fatal.
    pub fn add_orbital(&mut self, spec: OrbitalSpec, registry: &SceneRegistry) {
        if registry.get(&spec.primary).is_none() || registry.get(&spec.reference).is_none() {
            log::warn!(
                "skipping orbital couple {} -> {}: endpoint missing",
                spec.primary,
                spec.reference
            );
            return;
        }
        log::debug!(
            "orbital couple registered: {} {:?} around {}",
            spec.primary,
            spec.kind,
            spec.reference
        );
        self.orbitals.push(OrbitalAnimation::new(spec));
    }

    /// Drop orbital couples referencing a removed object id
    pub fn purge_object(&mut self, id: &str) {
        self.orbitals
            .retain(|orbital| orbital.spec.primary != id && orbital.spec.reference != id);
    }

    /// Drop all orbital couples
    pub fn clear(&mut self) {
        self.orbitals.clear();
    }

    /// Number of registered orbital couples
    pub fn orbital_count(&self) -> usize {
        self.orbitals.len()
    }

    /// Advance all animations by `dt` seconds and push poses to the backend
    pub fn update<B: RenderBackend>(
        &mut self,
        registry: &mut SceneRegistry,
        backend: &mut B,
        dt: f32,
    ) {
        let floor = registry.floor();

        // Snapshot ids so a mid-tick removal cannot invalidate the walk.
        let ids = registry.ids();
        for id in &ids {
            let Some(object) = registry.get_mut(id) else {
                continue;
            };
            if object.animations.is_empty() {
                continue;
            }

            let mut pose = Transform::from_position_scale(
                object.original_position,
                object.size.multiplier(),
            );

            let directives = object.animations.clone();
            for kind in directives {
                let state = &mut object.animation_state;
                match kind {
                    AnimationKind::Rotate => {
                        state.rotation_angle =
                            utils::wrap_degrees(state.rotation_angle + 30.0 * dt);
                        pose.rotate(utils::rotation_y_deg(state.rotation_angle));
                    }
                    AnimationKind::Bounce => {
                        state.bounce_phase += 2.0 * dt;
                        pose.position.y += state.bounce_phase.sin().abs() * 2.0;
                    }
                    AnimationKind::Float => {
                        state.float_phase += 0.5 * dt;
                        pose.position.y += state.float_phase.sin();
                    }
                    AnimationKind::Pulse => {
                        state.pulse_phase += 3.0 * dt;
                        pose.scale *= 1.0 + state.pulse_phase.sin() * 0.2;
                    }
                    AnimationKind::Swing => {
                        state.swing_phase += 1.5 * dt;
                        pose.rotate(utils::rotation_z_deg(state.swing_phase.sin() * 15.0));
                    }
                    AnimationKind::Glow => {}
                }

                // Scale-aware floor re-check after every fold; redundant for
                // most directives but keeps the invariant unconditional.
                pose.position =
                    floor.constrain(pose.position, object.height_at_scale(pose.scale));
            }

            object.commit_pose(&pose, &floor);
            if let Some(renderable) = object.renderable {
                backend.set_pose(renderable, pose.position, pose.rotation, pose.scale);
            }
        }

        self.update_orbitals(registry, backend, dt, &floor);
    }

    fn update_orbitals<B: RenderBackend>(
        &mut self,
        registry: &mut SceneRegistry,
        backend: &mut B,
        dt: f32,
        floor: &Floor,
    ) {
        for orbital in &mut self.orbitals {
            let Some(reference) = registry.get(&orbital.spec.reference) else {
                continue;
            };
            let reference_position = reference.position;

            let Some(primary) = registry.get(&orbital.spec.primary) else {
                continue;
            };
            let radius = orbital.spec.kind.radius();
            orbital.advance(dt);

            let mut position = Vec3::new(
                reference_position.x + orbital.current_angle.cos() * radius,
                reference_position.y,
                reference_position.z + orbital.current_angle.sin() * radius,
            );

            // One-shot probe: if the orbit point lands inside another
            // object's bounding sphere, step over it vertically and accept.
            let probe = primary.bounding_sphere_at(position);
            let bump = primary.bounding_sphere_radius * 2.0;
            let collides = registry.objects().any(|other| {
                other.id != orbital.spec.primary
                    && other.id != orbital.spec.reference
                    && probe.intersects(&other.bounding_sphere())
            });
            if collides {
                position.y += bump;
            }

            position = floor.constrain(position, primary.scaled_height());

            let Some(primary) = registry.get_mut(&orbital.spec.primary) else {
                continue;
            };
            // The orbit moves the base point so per-object directives keep
            // composing around the moving center next tick.
            primary.original_position = position;
            primary.set_position(position);
            if let Some(renderable) = primary.renderable {
                backend.set_pose(
                    renderable,
                    position,
                    primary.transform.rotation,
                    primary.transform.scale,
                );
            }
        }
    }
}
