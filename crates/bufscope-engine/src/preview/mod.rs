//! Buffer preview: which captured draw is current, and drawing it.
//!
//! [`BufferPreview`] owns the rendering context and the fixed program;
//! [`DrawStateManager`] owns the GPU handles of the current [`DrawState`].

mod camera;
mod config;
mod draw_state;
mod error;
mod manager;
mod renderer;

pub use camera::{fit_view, fixed_view, projection};
pub use config::PreviewConfig;
pub use draw_state::{BufferBinding, DrawRange, DrawState};
pub use error::PreviewError;
pub use manager::{DrawStateManager, POSITION_ATTRIBUTE};
pub use renderer::BufferPreview;
