//! A rendering substrate with no GPU behind it.
//!
//! Tracks the scene graph state the game pushes so it can run without a
//! window and so tests can inspect what would have been drawn.

use std::collections::HashMap;

use engine_core::{Transform, VisualHandle};
use glam::Mat4;

use crate::camera::Camera;
use crate::model::LoadedModel;
use crate::surface::{RenderError, RenderSurface, VisualDesc};

/// State of one visual as last pushed by the game.
#[derive(Debug, Clone)]
pub struct VisualState {
    pub desc: VisualDesc,
    pub transform: Transform,
    pub visible: bool,
    /// Number of geometry-bearing nodes in the attached model, if any.
    pub model_nodes: Option<usize>,
}

#[derive(Debug)]
pub struct HeadlessSurface {
    visuals: HashMap<VisualHandle, VisualState>,
    next_handle: u32,
    frames_rendered: u64,
    render_scale: f32,
    shadows_enabled: bool,
    last_view_projection: Mat4,
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self {
            visuals: HashMap::new(),
            next_handle: 0,
            frames_rendered: 0,
            render_scale: 1.0,
            shadows_enabled: true,
            last_view_projection: Mat4::IDENTITY,
        }
    }

    pub fn visual(&self, handle: VisualHandle) -> Option<&VisualState> {
        self.visuals.get(&handle)
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn render_scale(&self) -> f32 {
        self.render_scale
    }

    pub fn last_view_projection(&self) -> Mat4 {
        self.last_view_projection
    }

    fn visual_mut(&mut self, handle: VisualHandle) -> Result<&mut VisualState, RenderError> {
        self.visuals
            .get_mut(&handle)
            .ok_or(RenderError::UnknownVisual(handle))
    }
}

impl RenderSurface for HeadlessSurface {
    fn create_visual(&mut self, desc: VisualDesc) -> VisualHandle {
        let handle = VisualHandle(self.next_handle);
        self.next_handle += 1;
        self.visuals.insert(
            handle,
            VisualState {
                desc,
                transform: Transform::default(),
                visible: true,
                model_nodes: None,
            },
        );
        handle
    }

    fn attach_model(&mut self, handle: VisualHandle, model: &LoadedModel) -> Result<(), RenderError> {
        let visual = self.visual_mut(handle)?;
        visual.model_nodes = Some(model.renderable_nodes().count());
        Ok(())
    }

    fn set_visual_transform(
        &mut self,
        handle: VisualHandle,
        transform: &Transform,
    ) -> Result<(), RenderError> {
        self.visual_mut(handle)?.transform = *transform;
        Ok(())
    }

    fn set_visual_visible(&mut self, handle: VisualHandle, visible: bool) -> Result<(), RenderError> {
        self.visual_mut(handle)?.visible = visible;
        Ok(())
    }

    fn render(&mut self, camera: &Camera) -> Result<(), RenderError> {
        self.last_view_projection = camera.view_projection_matrix();
        self.frames_rendered += 1;
        Ok(())
    }

    fn set_render_scale(&mut self, scale: f32) {
        self.render_scale = scale;
    }

    fn set_shadows_enabled(&mut self, enabled: bool) {
        self.shadows_enabled = enabled;
    }

    fn shadows_enabled(&self) -> bool {
        self.shadows_enabled
    }
}
