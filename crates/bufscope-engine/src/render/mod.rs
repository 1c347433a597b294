//! The rendering-context seam.
//!
//! The preview never talks to a graphics API directly. It allocates buffers
//! through [`BufferAllocator`] and hands one [`FramePlan`] per frame to a
//! [`RenderBackend`]. [`WgpuBackend`] is the on-screen implementation.

mod backend;
mod plan;
#[cfg(test)]
pub(crate) mod recording;
mod state;
mod wgpu_backend;

pub use backend::{BufferAllocator, BufferHandle, BufferUsage, ProgramDesc, ProgramId, RenderBackend};
pub use plan::{AttributePointer, DrawCall, FramePlan, IndexType, PrimitiveMode};
pub use state::{BlendFactor, PipelineState};
pub use wgpu_backend::WgpuBackend;
