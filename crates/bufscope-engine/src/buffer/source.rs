use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use bufscope_layout::AttributeDescriptor;

use crate::render::{BufferAllocator, BufferHandle, BufferUsage};

/// Identity of one buffer source, unique per process.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SourceId(u64);

impl SourceId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// An immutable snapshot of a buffer: where in its history, and how its
/// bytes are laid out at that point.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferVersion {
    source: SourceId,
    revision: usize,
    structure: Rc<[AttributeDescriptor]>,
}

impl BufferVersion {
    pub fn new(source: SourceId, revision: usize, structure: impl Into<Rc<[AttributeDescriptor]>>) -> Self {
        Self {
            source,
            revision,
            structure: structure.into(),
        }
    }

    /// The buffer this version belongs to.
    pub fn source(&self) -> SourceId {
        self.source
    }

    /// Number of history entries the content is built from.
    pub fn revision(&self) -> usize {
        self.revision
    }

    /// Attributes in interleave order.
    pub fn structure(&self) -> &[AttributeDescriptor] {
        &self.structure
    }
}

/// A buffer the preview can read and upload at a given version.
pub trait BufferSource {
    /// Name used for GPU objects and logs.
    fn label(&self) -> &str;

    /// Rebuilds the content as of `version`, or `None` when it cannot be
    /// reconstructed.
    fn materialize(&self, version: &BufferVersion) -> Option<Vec<u8>>;

    /// Uploads `version` and returns the GPU handle.
    ///
    /// Content that cannot be materialized uploads as an empty buffer so the
    /// caller still owns a handle for the slot.
    fn acquire_handle(
        &self,
        allocator: &mut dyn BufferAllocator,
        version: &BufferVersion,
        usage: BufferUsage,
    ) -> Result<BufferHandle> {
        let contents = self.materialize(version).unwrap_or_default();
        allocator.create_buffer(self.label(), &contents, usage)
    }

    fn release_handle(&self, allocator: &mut dyn BufferAllocator, handle: BufferHandle) {
        allocator.destroy_buffer(handle);
    }
}
