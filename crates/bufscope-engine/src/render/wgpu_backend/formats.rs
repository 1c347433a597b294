//! Mapping from captured draw parameters to what wgpu can express.

use std::ops::Range;

use bufscope_layout::ComponentType;

use crate::render::{AttributePointer, BlendFactor, IndexType, PrimitiveMode};

/// Topology for `mode`, or `None` when wgpu has no equivalent.
///
/// Line loops are drawn open (as a strip); the closing segment is lost.
pub(super) fn primitive_topology(mode: PrimitiveMode) -> Option<wgpu::PrimitiveTopology> {
    use wgpu::PrimitiveTopology as T;
    match mode {
        PrimitiveMode::Points => Some(T::PointList),
        PrimitiveMode::Lines => Some(T::LineList),
        PrimitiveMode::LineLoop | PrimitiveMode::LineStrip => Some(T::LineStrip),
        PrimitiveMode::Triangles => Some(T::TriangleList),
        PrimitiveMode::TriangleStrip => Some(T::TriangleStrip),
        PrimitiveMode::TriangleFan => None,
    }
}

/// Vertex format feeding the shader's `vec3<f32>` position.
///
/// Float formats map directly. Integer formats only map when normalized,
/// because a float shader input cannot take raw integers. wgpu has no
/// three-component 8/16-bit formats.
pub(super) fn vertex_format(p: &AttributePointer) -> Option<wgpu::VertexFormat> {
    use wgpu::VertexFormat as F;
    Some(match (p.component_type, p.component_count, p.normalized) {
        (ComponentType::Float32, 1, _) => F::Float32,
        (ComponentType::Float32, 2, _) => F::Float32x2,
        (ComponentType::Float32, 3, _) => F::Float32x3,
        (ComponentType::Float32, 4, _) => F::Float32x4,
        (ComponentType::Int8, 2, true) => F::Snorm8x2,
        (ComponentType::Int8, 4, true) => F::Snorm8x4,
        (ComponentType::Uint8, 2, true) => F::Unorm8x2,
        (ComponentType::Uint8, 4, true) => F::Unorm8x4,
        (ComponentType::Int16, 2, true) => F::Snorm16x2,
        (ComponentType::Int16, 4, true) => F::Snorm16x4,
        (ComponentType::Uint16, 2, true) => F::Unorm16x2,
        (ComponentType::Uint16, 4, true) => F::Unorm16x4,
        _ => return None,
    })
}

/// Index format on the GPU. 8-bit indices are widened before upload.
pub(super) fn index_format(ty: IndexType) -> wgpu::IndexFormat {
    match ty {
        IndexType::Uint8 | IndexType::Uint16 => wgpu::IndexFormat::Uint16,
    }
}

// wgpu requires vertex strides and buffer offsets to be multiples of 4.
const VERTEX_ALIGN: u64 = 4;

/// Whether wgpu accepts `p` as a single-attribute vertex buffer layout: aligned
/// stride and offset, stride within the device limit, and the attribute fits
/// inside one stride.
pub(super) fn vertex_layout_fits(p: &AttributePointer, max_stride: u64) -> bool {
    p.stride % VERTEX_ALIGN == 0
        && p.offset % VERTEX_ALIGN == 0
        && p.stride <= max_stride
        && p.byte_span() <= p.stride
}

/// Index range of an indexed draw, or `None` when it is empty or reaches past
/// the `buffer_len`-byte index buffer.
pub(super) fn index_range(
    buffer_len: u64,
    index_type: IndexType,
    byte_offset: u64,
    count: u32,
) -> Option<Range<u32>> {
    let width = index_type.byte_width();
    if count == 0 || byte_offset % width != 0 {
        return None;
    }
    let first = byte_offset / width;
    if first + u64::from(count) > buffer_len / width {
        return None;
    }
    let first = u32::try_from(first).ok()?;
    Some(first..first.checked_add(count)?)
}

pub(super) fn is_strip(topology: wgpu::PrimitiveTopology) -> bool {
    matches!(
        topology,
        wgpu::PrimitiveTopology::LineStrip | wgpu::PrimitiveTopology::TriangleStrip
    )
}

pub(super) fn blend_factor(f: BlendFactor) -> wgpu::BlendFactor {
    match f {
        BlendFactor::Zero => wgpu::BlendFactor::Zero,
        BlendFactor::One => wgpu::BlendFactor::One,
        BlendFactor::SrcAlpha => wgpu::BlendFactor::SrcAlpha,
        BlendFactor::OneMinusSrcAlpha => wgpu::BlendFactor::OneMinusSrcAlpha,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pointer(ty: ComponentType, count: usize, normalized: bool) -> AttributePointer {
        AttributePointer {
            component_type: ty,
            component_count: count,
            normalized,
            stride: 16,
            offset: 0,
        }
    }

    #[test]
    fn float_positions_map_directly() {
        assert_eq!(
            vertex_format(&pointer(ComponentType::Float32, 3, false)),
            Some(wgpu::VertexFormat::Float32x3)
        );
    }

    #[test]
    fn raw_integers_are_not_expressible() {
        assert_eq!(vertex_format(&pointer(ComponentType::Int16, 2, false)), None);
        assert_eq!(vertex_format(&pointer(ComponentType::Uint8, 3, true)), None);
        assert_eq!(
            vertex_format(&pointer(ComponentType::Int16, 4, true)),
            Some(wgpu::VertexFormat::Snorm16x4)
        );
    }

    #[test]
    fn attribute_wider_than_stride_is_rejected() {
        let mut p = pointer(ComponentType::Float32, 3, false);
        p.stride = 4;
        assert!(!vertex_layout_fits(&p, 2048));

        p.stride = 12;
        assert!(vertex_layout_fits(&p, 2048));
    }

    #[test]
    fn misaligned_or_oversized_strides_are_rejected() {
        let mut p = pointer(ComponentType::Float32, 1, false);
        p.stride = 6;
        assert!(!vertex_layout_fits(&p, 2048));

        p.stride = 16;
        p.offset = 2;
        assert!(!vertex_layout_fits(&p, 2048));

        p.offset = 0;
        assert!(!vertex_layout_fits(&p, 8));
    }

    #[test]
    fn index_ranges_stay_inside_the_buffer() {
        assert_eq!(index_range(12, IndexType::Uint16, 2, 5), Some(1..6));
        assert_eq!(index_range(12, IndexType::Uint16, 2, 6), None);
        assert_eq!(index_range(12, IndexType::Uint16, 1, 1), None);
        assert_eq!(index_range(6, IndexType::Uint8, 3, 3), Some(3..6));
    }

    #[test]
    fn empty_index_draws_are_skipped() {
        assert_eq!(index_range(0, IndexType::Uint16, 0, 0), None);
        assert_eq!(index_range(8, IndexType::Uint16, 0, 0), None);
        assert_eq!(index_range(0, IndexType::Uint8, 0, 1), None);
    }

    #[test]
    fn fans_have_no_topology() {
        assert_eq!(primitive_topology(PrimitiveMode::TriangleFan), None);
        assert_eq!(
            primitive_topology(PrimitiveMode::LineLoop),
            Some(wgpu::PrimitiveTopology::LineStrip)
        );
    }
}
