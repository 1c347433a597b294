use thiserror::Error;

/// A vertex layout that cannot be decoded.
///
/// These are caller errors: the layout is rejected up front rather than
/// walked, so a bad capture never loops or reads out of bounds.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum LayoutError {
    #[error("layout has no attributes")]
    EmptyLayout,

    #[error("layout resolves to a zero-byte stride")]
    ZeroStride,

    #[error("attribute {index} has zero components")]
    ZeroComponents { index: usize },

    #[error("attribute index {index} out of range for a layout of {len} attributes")]
    AttributeIndexOutOfRange { index: usize, len: usize },

    #[error("record {record} needs {needed} bytes but the buffer holds {available}")]
    RecordOverrun {
        record: usize,
        needed: usize,
        available: usize,
    },
}
