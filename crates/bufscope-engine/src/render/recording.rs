//! In-memory backend for tests: records every call instead of drawing.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use anyhow::{bail, Result};

use super::{
    BufferAllocator, BufferHandle, BufferUsage, FramePlan, PipelineState, ProgramDesc, ProgramId,
    RenderBackend,
};

#[derive(Debug, Clone)]
pub(crate) struct LiveBuffer {
    pub label: String,
    pub contents: Vec<u8>,
    pub usage: BufferUsage,
}

/// Shared with the test; survives the backend being dropped by its owner.
#[derive(Debug, Default)]
pub(crate) struct Journal {
    pub live: usize,
    /// Highest number of buffers alive at once.
    pub peak_live: usize,
    pub deleted_programs: Vec<ProgramId>,
}

#[derive(Default)]
pub(crate) struct RecordingBackend {
    pub size: (u32, u32),
    next_handle: u64,
    pub live: BTreeMap<BufferHandle, LiveBuffer>,
    pub created: usize,
    pub destroyed: Vec<BufferHandle>,
    pub programs: Vec<(ProgramId, PipelineState)>,
    pub journal: Rc<RefCell<Journal>>,
    pub frames: Vec<FramePlan>,

    pub fail_programs: bool,
    /// Buffer creation fails for labels equal to this.
    pub fail_buffer_label: Option<String>,
}

impl RecordingBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            ..Self::default()
        }
    }

    pub fn live_labels(&self) -> Vec<&str> {
        self.live.values().map(|b| b.label.as_str()).collect()
    }
}

impl BufferAllocator for RecordingBackend {
    fn create_buffer(&mut self, label: &str, contents: &[u8], usage: BufferUsage) -> Result<BufferHandle> {
        if self.fail_buffer_label.as_deref() == Some(label) {
            bail!("refusing to create {label}");
        }
        self.next_handle += 1;
        let handle = BufferHandle(self.next_handle);
        self.live.insert(
            handle,
            LiveBuffer {
                label: label.to_string(),
                contents: contents.to_vec(),
                usage,
            },
        );
        self.created += 1;
        let mut journal = self.journal.borrow_mut();
        journal.live += 1;
        journal.peak_live = journal.peak_live.max(journal.live);
        Ok(handle)
    }

    fn destroy_buffer(&mut self, handle: BufferHandle) {
        assert!(
            self.live.remove(&handle).is_some(),
            "buffer {handle:?} released twice or never created"
        );
        self.destroyed.push(handle);
        self.journal.borrow_mut().live -= 1;
    }
}

impl RenderBackend for RecordingBackend {
    fn surface_size(&self) -> (u32, u32) {
        self.size
    }

    fn create_program(&mut self, _desc: &ProgramDesc<'_>, state: &PipelineState) -> Result<ProgramId> {
        if self.fail_programs {
            bail!("no context");
        }
        let id = ProgramId(self.programs.len() as u32 + 1);
        self.programs.push((id, *state));
        Ok(id)
    }

    fn delete_program(&mut self, program: ProgramId) {
        self.journal.borrow_mut().deleted_programs.push(program);
    }

    fn render_frame(&mut self, _program: ProgramId, plan: &FramePlan) -> Result<()> {
        self.frames.push(plan.clone());
        Ok(())
    }
}
