//! The contract between the simulation and whatever draws it.

use crate::camera::Camera;
use crate::model::LoadedModel;
use engine_core::{Transform, VisualHandle};

/// Errors surfaced by a rendering substrate.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("unknown visual handle {0:?}")]
    UnknownVisual(VisualHandle),

    #[error("surface failure: {0}")]
    Surface(String),
}

/// Procedural placeholder shapes the substrate knows how to build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisualDesc {
    /// Player capsule.
    Player,
    /// Lumpy creature body tinted with an RGB colour.
    Deformed { tint: u32 },
    /// Glowing pickup; lore items are green slabs, materials orange octahedra.
    Collectible { lore: bool },
    /// Factory building, floor, pipes and machinery.
    Factory,
}

/// Scene-graph and frame primitives consumed by the game loop.
///
/// Implementations own the scene graph. Entities only keep the handle
/// returned by [`RenderSurface::create_visual`].
pub trait RenderSurface {
    /// Build a placeholder visual and return its handle.
    fn create_visual(&mut self, desc: VisualDesc) -> VisualHandle;

    /// Replace a visual's placeholder geometry with a loaded model.
    fn attach_model(&mut self, handle: VisualHandle, model: &LoadedModel) -> Result<(), RenderError>;

    fn set_visual_transform(
        &mut self,
        handle: VisualHandle,
        transform: &Transform,
    ) -> Result<(), RenderError>;

    fn set_visual_visible(&mut self, handle: VisualHandle, visible: bool) -> Result<(), RenderError>;

    /// Draw the current scene from `camera`.
    fn render(&mut self, camera: &Camera) -> Result<(), RenderError>;

    /// Output resolution multiplier (pixel ratio).
    fn set_render_scale(&mut self, scale: f32);

    fn set_shadows_enabled(&mut self, enabled: bool);

    fn shadows_enabled(&self) -> bool;
}
