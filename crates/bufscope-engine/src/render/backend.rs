use anyhow::Result;

use super::{FramePlan, PipelineState};

/// Opaque name of a GPU-side buffer, issued by a [`BufferAllocator`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct BufferHandle(pub u64);

/// Opaque name of a linked shader program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ProgramId(pub u32);

/// Binding point a buffer is created for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferUsage {
    Vertex,
    Index,
}

/// Shader program source handed to [`RenderBackend::create_program`].
#[derive(Debug, Copy, Clone)]
pub struct ProgramDesc<'a> {
    pub label: &'a str,
    /// WGSL with `vs_main` / `fs_main` entry points.
    pub wgsl: &'a str,
}

/// Creates and destroys GPU buffers.
///
/// Split from [`RenderBackend`] so buffer sources can upload their content
/// without seeing the rest of the context.
pub trait BufferAllocator {
    fn create_buffer(&mut self, label: &str, contents: &[u8], usage: BufferUsage) -> Result<BufferHandle>;

    /// Releases `handle`. Unknown handles are ignored.
    fn destroy_buffer(&mut self, handle: BufferHandle);
}

/// The rendering context the preview drives.
pub trait RenderBackend: BufferAllocator {
    /// Drawable size in pixels, queried once per frame.
    fn surface_size(&self) -> (u32, u32);

    /// Compiles and links `desc` and fixes the pipeline `state` it renders with.
    fn create_program(&mut self, desc: &ProgramDesc<'_>, state: &PipelineState) -> Result<ProgramId>;

    fn delete_program(&mut self, program: ProgramId);

    /// Clears the target and issues the single draw call described by `plan`.
    fn render_frame(&mut self, program: ProgramId, plan: &FramePlan) -> Result<()>;
}
