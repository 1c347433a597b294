use crate::render::{BlendFactor, PipelineState};

/// Preview look and camera.
///
/// Defaults reproduce the inspector's fixed preview: green clear, red
/// geometry, 45 degree lens, camera 5 units back and not fitted to the mesh.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PreviewConfig {
    pub clear_color: [f32; 4],
    pub fill_color: [f32; 4],
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
    /// Camera distance along view-space depth for the fixed view.
    pub eye_distance: f32,
    /// Aim the camera at the decoded bounds instead of the fixed view.
    pub fit_camera_to_bounds: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 1.0, 0.0, 1.0],
            fill_color: [1.0, 0.0, 0.0, 1.0],
            fov_y_degrees: 45.0,
            z_near: 0.1,
            z_far: 1000.0,
            eye_distance: 5.0,
            fit_camera_to_bounds: false,
        }
    }
}

impl PreviewConfig {
    /// Fixed-function state for the preview program: depth, blend and cull
    /// off, additive alpha blend function.
    pub fn pipeline_state(&self) -> PipelineState {
        PipelineState {
            clear_color: self.clear_color,
            depth_test: false,
            cull_faces: false,
            blend: false,
            blend_func: (BlendFactor::SrcAlpha, BlendFactor::One),
        }
    }
}
