//! Backend abstraction for the rendering collaborator
//!
//! The layout engine never touches graphics-API state. It asks a
//! [`RenderBackend`] to instantiate a renderable for an archetype, pushes
//! poses to it every tick, and destroys renderables when scene objects are
//! removed. [`HeadlessBackend`] is the recording implementation used by the
//! driver binary and by tests.

pub mod color;

pub use color::Color;

use std::path::{Path, PathBuf};

use slotmap::{new_key_type, SlotMap};
use thiserror::Error;

use crate::foundation::math::{Quat, Vec3};

new_key_type! {
    /// Handle to a renderable owned by the backend
    pub struct RenderableId;
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Rendering collaborator errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// The backend could not instantiate a renderable for the model
    #[error("failed to create renderable for model {0:?}")]
    CreationFailed(PathBuf),
}

/// Main rendering backend trait
///
/// Implementations own the renderables; the scene registry only holds the
/// opaque handles and destroys them explicitly.
pub trait RenderBackend {
    /// Instantiate a renderable from a resolved model file
    fn create_renderable(
        &mut self,
        model: &Path,
        color: Color,
        scale: f32,
    ) -> BackendResult<RenderableId>;

    /// Destroy a renderable; the handle is invalid afterwards
    fn destroy_renderable(&mut self, id: RenderableId);

    /// Push a world-space pose to a renderable
    fn set_pose(&mut self, id: RenderableId, position: Vec3, rotation: Quat, scale: f32);
}

/// Last pose pushed to a headless renderable
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPose {
    /// Source model path the renderable was created from
    pub model: PathBuf,
    /// Base color assigned at creation
    pub color: Color,
    /// World translation
    pub position: Vec3,
    /// World rotation
    pub rotation: Quat,
    /// Uniform scale
    pub scale: f32,
}

/// Render backend that records poses instead of drawing
///
/// Used headless by `sceneview` and throughout the test suite.
#[derive(Default)]
pub struct HeadlessBackend {
    renderables: SlotMap<RenderableId, RecordedPose>,
}

impl HeadlessBackend {
    /// Create an empty headless backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live renderables
    pub fn renderable_count(&self) -> usize {
        self.renderables.len()
    }

    /// Look up the last recorded pose for a renderable
    pub fn pose(&self, id: RenderableId) -> Option<&RecordedPose> {
        self.renderables.get(id)
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_renderable(
        &mut self,
        model: &Path,
        color: Color,
        scale: f32,
    ) -> BackendResult<RenderableId> {
        let id = self.renderables.insert(RecordedPose {
            model: model.to_path_buf(),
            color,
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale,
        });
        log::debug!("created renderable {id:?} for model {model:?}");
        Ok(id)
    }

    fn destroy_renderable(&mut self, id: RenderableId) {
        if self.renderables.remove(id).is_none() {
            log::warn!("destroy_renderable called with stale handle {id:?}");
        }
    }

    fn set_pose(&mut self, id: RenderableId, position: Vec3, rotation: Quat, scale: f32) {
        if let Some(pose) = self.renderables.get_mut(id) {
            pose.position = position;
            pose.rotation = rotation;
            pose.scale = scale;
        }
    }
}
