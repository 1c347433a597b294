//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the preview window, and hands the window's
//! GPU context to the application once it exists.

mod app;
mod runtime;

pub use app::{App, AppControl};
pub use runtime::{Runtime, RuntimeConfig};
pub use winit::keyboard::KeyCode;
