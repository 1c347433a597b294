use crate::error::LayoutError;
use crate::layout::{infer_stride, validate};
use crate::types::AttributeDescriptor;

/// Number of whole records in a buffer of `byte_len` bytes.
///
/// A trailing partial record is dropped.
#[inline]
pub fn record_count(byte_len: usize, stride: usize) -> usize {
    if stride == 0 { 0 } else { byte_len / stride }
}

/// Decodes attribute `target` of every record in `content`.
///
/// Records are `infer_stride(layout)` bytes apart. Inside a record the
/// attributes are laid out back to back in declared order starting at the
/// record base, so the target starts after the spans of every attribute
/// before it. Each record is checked to hold the full attribute walk before
/// it is read.
///
/// The result is record-major, component-minor, with
/// `component_count * record_count` values. Integer components are widened to
/// their numeric value; `normalized` is not applied.
pub fn extract(
    content: &[u8],
    layout: &[AttributeDescriptor],
    target: usize,
) -> Result<Vec<f32>, LayoutError> {
    validate(layout)?;
    let attr = layout.get(target).ok_or(LayoutError::AttributeIndexOutOfRange {
        index: target,
        len: layout.len(),
    })?;
    let stride = infer_stride(layout)?;

    let inner_offset: usize = layout[..target].iter().map(AttributeDescriptor::byte_span).sum();
    let walk_span: usize = layout.iter().map(AttributeDescriptor::byte_span).sum();

    let codec = attr.component_type.codec();
    let records = record_count(content.len(), stride);
    let mut out = Vec::with_capacity(records * attr.component_count);

    for record in 0..records {
        let base = record * stride;
        if base + walk_span > content.len() {
            return Err(LayoutError::RecordOverrun {
                record,
                needed: base + walk_span,
                available: content.len(),
            });
        }

        let start = base + inner_offset;
        let bytes = &content[start..start + attr.byte_span()];
        out.extend(bytes.chunks_exact(codec.width).map(codec.read));
    }

    log::trace!(
        "decoded attribute {target}: {records} record(s), {} value(s)",
        out.len()
    );
    Ok(out)
}
