use bufscope_layout::BoundingBox;

use super::camera::{fit_view, fixed_view, projection};
use super::{DrawRange, DrawState, DrawStateManager, PreviewConfig, PreviewError};
use crate::render::{DrawCall, FramePlan, ProgramDesc, ProgramId, RenderBackend};

const PREVIEW_PROGRAM: ProgramDesc<'static> = ProgramDesc {
    label: "bufscope preview",
    wgsl: include_str!("../render/shaders/preview.wgsl"),
};

/// Renders the current captured draw call with a fixed solid-color pipeline.
///
/// Owns the rendering context. After [`dispose`](Self::dispose) every method
/// returns [`PreviewError::Disposed`]; dropping an undisposed preview
/// disposes it.
pub struct BufferPreview<B: RenderBackend> {
    backend: Option<B>,
    program: ProgramId,
    manager: DrawStateManager,
    config: PreviewConfig,
}

impl<B: RenderBackend> BufferPreview<B> {
    /// Creates the preview program on `backend`.
    pub fn new(mut backend: B, config: PreviewConfig) -> Result<Self, PreviewError> {
        let program = backend
            .create_program(&PREVIEW_PROGRAM, &config.pipeline_state())
            .map_err(PreviewError::ContextAcquisition)?;

        log::debug!("preview program {program:?} ready");
        Ok(Self {
            backend: Some(backend),
            program,
            manager: DrawStateManager::new(),
            config,
        })
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    /// Replaces look/camera settings. The clear color is part of the fixed
    /// pipeline state and keeps its value from construction.
    pub fn set_config(&mut self, config: PreviewConfig) {
        self.config = config;
    }

    pub fn backend(&self) -> Result<&B, PreviewError> {
        self.backend.as_ref().ok_or(PreviewError::Disposed)
    }

    pub fn backend_mut(&mut self) -> Result<&mut B, PreviewError> {
        self.backend.as_mut().ok_or(PreviewError::Disposed)
    }

    /// The draw state currently previewed, if any.
    pub fn draw_state(&self) -> Option<&DrawState> {
        self.manager.current()
    }

    /// Bounds of the current position attribute; see
    /// [`DrawStateManager::bounds`].
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.manager.bounds()
    }

    /// Makes `draw_state` current (or clears it) and redraws.
    pub fn set_buffer(&mut self, draw_state: Option<DrawState>) -> Result<(), PreviewError> {
        let backend = self.backend.as_mut().ok_or(PreviewError::Disposed)?;
        self.manager.set_buffer(draw_state, backend)?;
        self.draw()
    }

    /// Renders one frame of the current draw state. Does nothing when no draw
    /// state is set.
    pub fn draw(&mut self) -> Result<(), PreviewError> {
        let backend = self.backend.as_mut().ok_or(PreviewError::Disposed)?;
        let (Some(ds), Some(vertex_buffer)) = (self.manager.current(), self.manager.array_handle()) else {
            return Ok(());
        };

        let (width, height) = backend.surface_size();

        let view = match self.manager.bounds() {
            Some(b) if self.config.fit_camera_to_bounds => fit_view(&self.config, &b),
            _ => fixed_view(&self.config),
        };

        let draw = match &ds.range {
            DrawRange::Arrays { first } => DrawCall::Arrays {
                first: *first,
                count: ds.count,
            },
            DrawRange::Elements {
                index_type,
                byte_offset,
                ..
            } => {
                let Some(buffer) = self.manager.element_handle() else {
                    return Ok(());
                };
                DrawCall::Elements {
                    buffer,
                    index_type: *index_type,
                    count: ds.count,
                    byte_offset: *byte_offset,
                }
            }
        };

        let plan = FramePlan {
            viewport: (width, height),
            projection: projection(&self.config, width, height),
            view,
            fill_color: self.config.fill_color,
            mode: ds.mode,
            vertex_buffer,
            position: ds.position,
            draw,
        };

        backend.render_frame(self.program, &plan)?;
        Ok(())
    }

    /// Releases the draw state's handles, deletes the program and drops the
    /// rendering context.
    pub fn dispose(&mut self) -> Result<(), PreviewError> {
        let mut backend = self.backend.take().ok_or(PreviewError::Disposed)?;
        self.manager.clear(&mut backend);
        backend.delete_program(self.program);
        log::debug!("preview disposed");
        Ok(())
    }

    pub fn is_disposed(&self) -> bool {
        self.backend.is_none()
    }
}

impl<B: RenderBackend> Drop for BufferPreview<B> {
    fn drop(&mut self) {
        if !self.is_disposed() {
            let _ = self.dispose();
        }
    }
}
