use bufscope_engine::device::Gpu;
use bufscope_engine::preview::{BufferPreview, PreviewConfig, PreviewError};
use bufscope_engine::render::WgpuBackend;
use bufscope_engine::window::{App, AppControl, KeyCode};
use winit::dpi::PhysicalSize;

use crate::demo::DemoCapture;

/// Interactive viewer over [`DemoCapture`].
pub struct StudioApp {
    demo: DemoCapture,
    config: PreviewConfig,
    preview: Option<BufferPreview<WgpuBackend>>,

    version: usize,
    indexed: bool,
    cleared: bool,
}

impl StudioApp {
    pub fn new() -> Self {
        Self {
            demo: DemoCapture::new(),
            config: PreviewConfig::default(),
            preview: None,
            version: 0,
            indexed: true,
            cleared: false,
        }
    }

    /// Pushes the selected draw state into the preview.
    fn apply(&mut self) -> AppControl {
        let Some(preview) = self.preview.as_mut() else {
            return AppControl::Continue;
        };

        let draw_state = if self.cleared {
            None
        } else {
            match self.demo.draw_state(self.version, self.indexed) {
                Ok(ds) => Some(ds),
                Err(e) => {
                    log::error!("cannot build draw state: {e}");
                    None
                }
            }
        };

        let result = preview.set_buffer(draw_state);
        match preview.bounds() {
            Some(b) if !b.is_empty() => log::info!(
                "version {} ({}): bounds {:?}..{:?}",
                self.version + 1,
                if self.indexed { "indexed" } else { "points" },
                b.min.to_array(),
                b.max.to_array()
            ),
            Some(_) => log::info!("version {}: no vertices", self.version + 1),
            None => log::info!("preview cleared"),
        }
        report(result)
    }
}

fn report(result: Result<(), PreviewError>) -> AppControl {
    match result {
        Ok(()) => AppControl::Continue,
        Err(PreviewError::Backend(e)) => {
            log::error!("render failed: {e:#}");
            AppControl::Exit
        }
        Err(e) => {
            log::error!("{e}");
            AppControl::Continue
        }
    }
}

impl App for StudioApp {
    fn on_ready(&mut self, gpu: Gpu) -> anyhow::Result<()> {
        let preview = BufferPreview::new(WgpuBackend::new(gpu), self.config)?;
        self.preview = Some(preview);
        match self.apply() {
            AppControl::Continue => Ok(()),
            AppControl::Exit => anyhow::bail!("first preview frame failed"),
        }
    }

    fn on_resize(&mut self, size: PhysicalSize<u32>) {
        if let Some(backend) = self.preview.as_mut().and_then(|p| p.backend_mut().ok()) {
            backend.resize(size);
        }
    }

    fn on_key(&mut self, key: KeyCode) -> AppControl {
        match key {
            KeyCode::Escape => return AppControl::Exit,
            KeyCode::KeyV => {
                self.version = (self.version + 1) % self.demo.version_count();
                self.cleared = false;
            }
            KeyCode::KeyI => {
                self.indexed = !self.indexed;
                self.cleared = false;
            }
            KeyCode::KeyF => {
                self.config.fit_camera_to_bounds = !self.config.fit_camera_to_bounds;
                log::info!("fit camera: {}", self.config.fit_camera_to_bounds);
                if let Some(preview) = self.preview.as_mut() {
                    preview.set_config(self.config);
                }
                return AppControl::Continue;
            }
            KeyCode::KeyC => self.cleared = true,
            _ => return AppControl::Continue,
        }
        self.apply()
    }

    fn on_frame(&mut self) -> AppControl {
        match self.preview.as_mut() {
            Some(preview) => report(preview.draw()),
            None => AppControl::Continue,
        }
    }

    fn on_exit(&mut self) {
        if let Some(mut preview) = self.preview.take() {
            if let Err(e) = preview.dispose() {
                log::warn!("dispose failed: {e}");
            }
        }
    }
}
