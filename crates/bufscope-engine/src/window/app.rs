use winit::dpi::PhysicalSize;
use winit::keyboard::KeyCode;

use crate::device::Gpu;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by [`Runtime`](super::Runtime).
pub trait App {
    /// Called once the window and its GPU context exist. The app takes
    /// ownership of the context.
    fn on_ready(&mut self, gpu: Gpu) -> anyhow::Result<()>;

    /// Called after the window's drawable size changed.
    fn on_resize(&mut self, size: PhysicalSize<u32>) {
        let _ = size;
    }

    /// Called for key presses (not repeats, not releases).
    fn on_key(&mut self, key: KeyCode) -> AppControl {
        let _ = key;
        AppControl::Continue
    }

    /// Called whenever the window needs repainting.
    fn on_frame(&mut self) -> AppControl;

    /// Called once before the event loop exits.
    fn on_exit(&mut self) {}
}
