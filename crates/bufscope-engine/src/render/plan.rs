use bufscope_layout::{infer_stride, AttributeDescriptor, ComponentType, LayoutError};
use glam::Mat4;

use super::BufferHandle;

/// Primitive topology of the captured draw call.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PrimitiveMode {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl PrimitiveMode {
    /// Maps a GL draw mode (`GL_POINTS` = 0 .. `GL_TRIANGLE_FAN` = 6).
    pub fn from_gl(mode: u32) -> Option<Self> {
        Some(match mode {
            0 => Self::Points,
            1 => Self::Lines,
            2 => Self::LineLoop,
            3 => Self::LineStrip,
            4 => Self::Triangles,
            5 => Self::TriangleStrip,
            6 => Self::TriangleFan,
            _ => return None,
        })
    }
}

/// Element type of an index buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum IndexType {
    Uint8,
    Uint16,
}

impl IndexType {
    #[inline]
    pub fn byte_width(self) -> u64 {
        match self {
            Self::Uint8 => 1,
            Self::Uint16 => 2,
        }
    }

    pub fn from_gl(value: u32) -> Option<Self> {
        match value {
            0x1401 => Some(Self::Uint8),
            0x1403 => Some(Self::Uint16),
            _ => None,
        }
    }
}

/// How the vertex stage fetches the position attribute from the array buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct AttributePointer {
    pub component_type: ComponentType,
    pub component_count: usize,
    pub normalized: bool,
    /// Never 0; tightly packed layouts are resolved when the pointer is built.
    pub stride: u64,
    pub offset: u64,
}

impl AttributePointer {
    /// Pointer for attribute `index` of `layout`, using the layout's stride.
    pub fn from_layout(layout: &[AttributeDescriptor], index: usize) -> Result<Self, LayoutError> {
        let attr = layout.get(index).ok_or(LayoutError::AttributeIndexOutOfRange {
            index,
            len: layout.len(),
        })?;
        let stride = infer_stride(layout)?;
        Ok(Self {
            component_type: attr.component_type,
            component_count: attr.component_count,
            normalized: attr.normalized,
            stride: stride as u64,
            offset: attr.byte_offset as u64,
        })
    }

    /// Bytes one fetch of this attribute reads.
    #[inline]
    pub fn byte_span(&self) -> u64 {
        (self.component_type.byte_width() * self.component_count) as u64
    }
}

/// The one draw call of a preview frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum DrawCall {
    Arrays {
        first: u32,
        count: u32,
    },
    Elements {
        buffer: BufferHandle,
        index_type: IndexType,
        count: u32,
        byte_offset: u64,
    },
}

/// Everything a backend needs to render one preview frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    /// Viewport in pixels, origin at 0,0.
    pub viewport: (u32, u32),
    pub projection: Mat4,
    pub view: Mat4,
    pub fill_color: [f32; 4],
    pub mode: PrimitiveMode,
    pub vertex_buffer: BufferHandle,
    pub position: AttributePointer,
    pub draw: DrawCall,
}
