//! bufscope engine crate.
//!
//! Turns a captured draw call (array buffer + layout version + optional index
//! buffer) into an on-screen preview:
//! - `buffer`: captured buffer sources and their versions
//! - `preview`: draw-state lifecycle and the preview renderer
//! - `render`: the rendering-context seam and its wgpu implementation
//! - `device` / `window`: GPU and window plumbing for hosts

pub mod buffer;
pub mod device;
pub mod logging;
pub mod preview;
pub mod render;
pub mod window;

pub use bufscope_layout as layout;
