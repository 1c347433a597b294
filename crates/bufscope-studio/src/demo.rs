//! A small captured scene: one interleaved cube buffer with two versions and
//! a 16-bit index buffer.

use std::rc::Rc;

use bufscope_engine::buffer::{BufferVersion, CapturedBuffer};
use bufscope_engine::layout::{AttributeDescriptor, ComponentType, LayoutError};
use bufscope_engine::preview::{BufferBinding, DrawState, POSITION_ATTRIBUTE};
use bufscope_engine::render::{AttributePointer, IndexType, PrimitiveMode};

/// float32x3 position, then unorm8x4 color.
const STRIDE: usize = 16;

const CORNERS: [[f32; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

#[rustfmt::skip]
const INDICES: [u16; 36] = [
    0, 2, 1, 0, 3, 2, // back
    4, 5, 6, 4, 6, 7, // front
    0, 1, 5, 0, 5, 4, // bottom
    3, 7, 6, 3, 6, 2, // top
    0, 4, 7, 0, 7, 3, // left
    1, 2, 6, 1, 6, 5, // right
];

/// Corner moved by the second upload.
const EDITED_CORNER: usize = 6;
const EDITED_POSITION: [f32; 3] = [2.5, 2.5, 2.5];

fn layout() -> Vec<AttributeDescriptor> {
    vec![
        AttributeDescriptor::new(ComponentType::Float32, 3, 0).with_stride(STRIDE),
        AttributeDescriptor::new(ComponentType::Uint8, 4, 12)
            .with_stride(STRIDE)
            .with_normalized(true),
    ]
}

fn vertex_bytes() -> Vec<u8> {
    let mut bytes = Vec::with_capacity(CORNERS.len() * STRIDE);
    for (i, p) in CORNERS.iter().enumerate() {
        bytes.extend_from_slice(bytemuck::cast_slice(p));
        let shade = (i as u8) * 32;
        bytes.extend_from_slice(&[shade, 255 - shade, 128, 255]);
    }
    bytes
}

/// The captured buffers and the versions recorded while capturing.
pub struct DemoCapture {
    vertices: Rc<CapturedBuffer>,
    indices: Rc<CapturedBuffer>,
    vertex_versions: Vec<BufferVersion>,
    index_version: BufferVersion,
}

impl DemoCapture {
    pub fn new() -> Self {
        let layout: Rc<[AttributeDescriptor]> = layout().into();

        let mut vertices = CapturedBuffer::new("cube vertices");
        vertices.upload(vertex_bytes());
        let original = vertices.snapshot(layout.clone());
        vertices.upload_sub(
            EDITED_CORNER * STRIDE,
            bytemuck::cast_slice::<f32, u8>(&EDITED_POSITION).to_vec(),
        );
        let edited = vertices.snapshot(layout);

        let mut indices = CapturedBuffer::new("cube indices");
        indices.upload(bytemuck::cast_slice::<u16, u8>(&INDICES).to_vec());
        let index_version = indices.snapshot(Vec::<AttributeDescriptor>::new());

        Self {
            vertices: Rc::new(vertices),
            indices: Rc::new(indices),
            vertex_versions: vec![original, edited],
            index_version,
        }
    }

    pub fn version_count(&self) -> usize {
        self.vertex_versions.len()
    }

    /// Draw state for vertex version `version` (wrapped), either the indexed
    /// cube or its corners as points.
    pub fn draw_state(&self, version: usize, indexed: bool) -> Result<DrawState, LayoutError> {
        let version = &self.vertex_versions[version % self.vertex_versions.len()];
        let position = AttributePointer::from_layout(version.structure(), POSITION_ATTRIBUTE)?;
        let array = BufferBinding::new(self.vertices.clone(), version.clone());

        Ok(if indexed {
            let element = BufferBinding::new(self.indices.clone(), self.index_version.clone());
            DrawState::elements(
                PrimitiveMode::Triangles,
                array,
                position,
                element,
                IndexType::Uint16,
                0,
                INDICES.len() as u32,
            )
        } else {
            DrawState::arrays(PrimitiveMode::Points, array, position, 0, CORNERS.len() as u32)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bufscope_engine::layout::{bounds, extract};
    use bufscope_engine::preview::DrawRange;

    fn decoded_bounds(ds: &DrawState) -> bufscope_engine::layout::BoundingBox {
        let b = &ds.array_buffer;
        let bytes = b.source.materialize(&b.version).unwrap();
        let positions = extract(&bytes, b.version.structure(), POSITION_ATTRIBUTE).unwrap();
        bounds(&positions, 3)
    }

    #[test]
    fn versions_differ_only_by_the_edit() {
        let demo = DemoCapture::new();
        assert_eq!(demo.version_count(), 2);

        let before = decoded_bounds(&demo.draw_state(0, true).unwrap());
        let after = decoded_bounds(&demo.draw_state(1, true).unwrap());

        assert_eq!(before.max.to_array(), [1.0, 1.0, 1.0]);
        assert_eq!(after.max.to_array(), EDITED_POSITION);
        assert_eq!(before.min, after.min);
    }

    #[test]
    fn indexed_toggle_selects_draw_kind() {
        let demo = DemoCapture::new();

        let indexed = demo.draw_state(0, true).unwrap();
        assert_eq!(indexed.count, 36);
        assert!(matches!(
            indexed.range,
            DrawRange::Elements { index_type: IndexType::Uint16, byte_offset: 0, .. }
        ));

        let points = demo.draw_state(0, false).unwrap();
        assert_eq!(points.mode, PrimitiveMode::Points);
        assert_eq!(points.count, 8);
        assert!(points.element_buffer().is_none());
    }

    #[test]
    fn version_index_wraps() {
        let demo = DemoCapture::new();
        let wrapped = demo.draw_state(2, false).unwrap();
        assert_eq!(wrapped.array_buffer.version.revision(), 1);
        assert_eq!(wrapped.position.stride, STRIDE as u64);
    }
}
