use std::fmt;
use std::rc::Rc;

use crate::buffer::{BufferSource, BufferVersion};
use crate::render::{AttributePointer, IndexType, PrimitiveMode};

/// A buffer at one version.
#[derive(Clone)]
pub struct BufferBinding {
    pub source: Rc<dyn BufferSource>,
    pub version: BufferVersion,
}

impl BufferBinding {
    pub fn new(source: Rc<dyn BufferSource>, version: BufferVersion) -> Self {
        Self { source, version }
    }
}

impl fmt::Debug for BufferBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferBinding")
            .field("source", &self.source.label())
            .field("revision", &self.version.revision())
            .finish()
    }
}

/// Where the vertices of the draw come from.
#[derive(Debug, Clone)]
pub enum DrawRange {
    /// `drawArrays`: `count` vertices starting at `first`.
    Arrays { first: u32 },
    /// `drawElements`: `count` indices starting `byte_offset` bytes into the
    /// element buffer.
    Elements {
        buffer: BufferBinding,
        index_type: IndexType,
        byte_offset: u64,
    },
}

/// One captured draw call to preview. Immutable; replace it to change it.
#[derive(Debug, Clone)]
pub struct DrawState {
    pub mode: PrimitiveMode,
    pub array_buffer: BufferBinding,
    /// How the vertex stage fetches positions from `array_buffer`.
    pub position: AttributePointer,
    pub count: u32,
    pub range: DrawRange,
}

impl DrawState {
    /// Non-indexed draw of `count` vertices from `first`.
    pub fn arrays(
        mode: PrimitiveMode,
        array_buffer: BufferBinding,
        position: AttributePointer,
        first: u32,
        count: u32,
    ) -> Self {
        Self {
            mode,
            array_buffer,
            position,
            count,
            range: DrawRange::Arrays { first },
        }
    }

    /// Indexed draw of `count` elements.
    pub fn elements(
        mode: PrimitiveMode,
        array_buffer: BufferBinding,
        position: AttributePointer,
        element_buffer: BufferBinding,
        index_type: IndexType,
        byte_offset: u64,
        count: u32,
    ) -> Self {
        Self {
            mode,
            array_buffer,
            position,
            count,
            range: DrawRange::Elements {
                buffer: element_buffer,
                index_type,
                byte_offset,
            },
        }
    }

    pub fn element_buffer(&self) -> Option<&BufferBinding> {
        match &self.range {
            DrawRange::Arrays { .. } => None,
            DrawRange::Elements { buffer, .. } => Some(buffer),
        }
    }
}
