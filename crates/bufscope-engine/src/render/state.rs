/// Blend factors the fixed pipeline can name.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcAlpha,
    OneMinusSrcAlpha,
}

/// Fixed-function state applied once when the preview program is created.
///
/// Nothing changes it afterwards, so a frame's output depends only on the
/// [`FramePlan`](super::FramePlan) and this value.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PipelineState {
    pub clear_color: [f32; 4],
    pub depth_test: bool,
    pub cull_faces: bool,
    pub blend: bool,
    /// (source, destination); only used when `blend` is set.
    pub blend_func: (BlendFactor, BlendFactor),
}
