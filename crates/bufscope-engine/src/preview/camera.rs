use bufscope_layout::BoundingBox;
use glam::{Mat4, Vec3};

use super::PreviewConfig;

/// Perspective projection for a `width` x `height` target.
///
/// Right-handed, depth mapped to 0..1 as wgpu expects.
pub fn projection(config: &PreviewConfig, width: u32, height: u32) -> Mat4 {
    let aspect = width.max(1) as f32 / height.max(1) as f32;
    Mat4::perspective_rh(config.fov_y_degrees.to_radians(), aspect, config.z_near, config.z_far)
}

/// Camera `eye_distance` units back along view depth, no rotation.
pub fn fixed_view(config: &PreviewConfig) -> Mat4 {
    Mat4::from_translation(Vec3::new(0.0, 0.0, -config.eye_distance))
}

/// Camera looking down -Z at the centre of `bounds`, far enough back for
/// the bounding sphere to fill the vertical field of view.
///
/// Falls back to [`fixed_view`] for empty or non-finite bounds.
pub fn fit_view(config: &PreviewConfig, bounds: &BoundingBox) -> Mat4 {
    if bounds.is_empty() || !bounds.min.is_finite() || !bounds.max.is_finite() {
        return fixed_view(config);
    }
    let center = bounds.center();
    let radius = bounds.radius();
    let half_fov = (config.fov_y_degrees.to_radians() * 0.5).max(f32::EPSILON);
    let distance = if radius > 0.0 {
        radius / half_fov.sin()
    } else {
        config.eye_distance
    };
    Mat4::look_at_rh(center + Vec3::Z * distance, center, Vec3::Y)
}
