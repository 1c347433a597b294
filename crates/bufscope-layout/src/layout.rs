use crate::error::LayoutError;
use crate::types::AttributeDescriptor;

/// Rejects layouts the reader cannot walk.
///
/// Checks that the layout is non-empty and every attribute has at least one
/// component. Stride is checked separately by [`infer_stride`].
pub fn validate(layout: &[AttributeDescriptor]) -> Result<(), LayoutError> {
    if layout.is_empty() {
        return Err(LayoutError::EmptyLayout);
    }
    if let Some(index) = layout.iter().position(|d| d.component_count == 0) {
        return Err(LayoutError::ZeroComponents { index });
    }
    Ok(())
}

/// Returns the byte distance between consecutive vertex records.
///
/// The layout is one shared interleave: the first attribute's declared stride
/// applies to every attribute. A declared stride of 0 means tightly packed, in
/// which case the stride is the furthest byte any attribute reaches.
pub fn infer_stride(layout: &[AttributeDescriptor]) -> Result<usize, LayoutError> {
    let first = layout.first().ok_or(LayoutError::EmptyLayout)?;

    let stride = if first.declared_stride != 0 {
        first.declared_stride
    } else {
        layout.iter().map(AttributeDescriptor::byte_end).max().unwrap_or(0)
    };

    if stride == 0 {
        return Err(LayoutError::ZeroStride);
    }

    log::trace!("stride {stride} for {} attribute(s)", layout.len());
    Ok(stride)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ComponentType::*;

    fn attr(ty: crate::ComponentType, count: usize, offset: usize) -> AttributeDescriptor {
        AttributeDescriptor::new(ty, count, offset)
    }

    #[test]
    fn declared_stride_wins_over_offsets() {
        let layout = [
            attr(Float32, 3, 0).with_stride(32),
            attr(Float32, 4, 12).with_stride(32),
        ];
        assert_eq!(infer_stride(&layout), Ok(32));
    }

    #[test]
    fn first_declared_stride_is_authoritative() {
        // Later attributes disagree; only the first one counts.
        let layout = [attr(Uint8, 4, 0).with_stride(8), attr(Uint8, 4, 4).with_stride(64)];
        assert_eq!(infer_stride(&layout), Ok(8));
    }

    #[test]
    fn zero_stride_packs_to_furthest_byte() {
        let layout = [attr(Float32, 3, 0), attr(Float32, 2, 12)];
        assert_eq!(infer_stride(&layout), Ok(20));
    }

    #[test]
    fn packing_uses_max_not_last() {
        let layout = [attr(Int16, 2, 8), attr(Uint8, 4, 0)];
        assert_eq!(infer_stride(&layout), Ok(12));
    }

    #[test]
    fn empty_layout_is_rejected() {
        assert_eq!(infer_stride(&[]), Err(LayoutError::EmptyLayout));
        assert_eq!(validate(&[]), Err(LayoutError::EmptyLayout));
    }

    #[test]
    fn zero_width_layout_is_rejected() {
        let layout = [attr(Float32, 0, 0)];
        assert_eq!(infer_stride(&layout), Err(LayoutError::ZeroStride));
        assert_eq!(validate(&layout), Err(LayoutError::ZeroComponents { index: 0 }));
    }
}
