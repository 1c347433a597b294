/// Scalar type of one attribute component as stored in the buffer.
///
/// Values are read in native byte order, matching how the traced API
/// received them from the application.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum ComponentType {
    Int8 = 0,
    Uint8 = 1,
    Int16 = 2,
    Uint16 = 3,
    Float32 = 4,
}

/// Byte width + reader for one component type.
///
/// `read` receives a slice of exactly `width` bytes.
#[derive(Copy, Clone)]
pub(crate) struct ComponentCodec {
    pub width: usize,
    pub read: fn(&[u8]) -> f32,
}

// Indexed by `ComponentType as usize`.
static CODECS: [ComponentCodec; 5] = [
    ComponentCodec { width: 1, read: read_i8 },
    ComponentCodec { width: 1, read: read_u8 },
    ComponentCodec { width: 2, read: read_i16 },
    ComponentCodec { width: 2, read: read_u16 },
    ComponentCodec { width: 4, read: read_f32 },
];

fn read_i8(b: &[u8]) -> f32 {
    f32::from(bytemuck::pod_read_unaligned::<i8>(b))
}

fn read_u8(b: &[u8]) -> f32 {
    f32::from(b[0])
}

fn read_i16(b: &[u8]) -> f32 {
    f32::from(bytemuck::pod_read_unaligned::<i16>(b))
}

fn read_u16(b: &[u8]) -> f32 {
    f32::from(bytemuck::pod_read_unaligned::<u16>(b))
}

fn read_f32(b: &[u8]) -> f32 {
    bytemuck::pod_read_unaligned::<f32>(b)
}

impl ComponentType {
    #[inline]
    pub(crate) fn codec(self) -> &'static ComponentCodec {
        &CODECS[self as usize]
    }

    /// Size of one component in bytes.
    #[inline]
    pub fn byte_width(self) -> usize {
        self.codec().width
    }

    /// Maps a GL component type enum (`GL_BYTE` .. `GL_FLOAT`).
    ///
    /// Returns `None` for types the decoder does not handle (e.g. `GL_FIXED`,
    /// `GL_HALF_FLOAT`) instead of guessing a width.
    pub fn from_gl(value: u32) -> Option<Self> {
        match value {
            0x1400 => Some(ComponentType::Int8),
            0x1401 => Some(ComponentType::Uint8),
            0x1402 => Some(ComponentType::Int16),
            0x1403 => Some(ComponentType::Uint16),
            0x1406 => Some(ComponentType::Float32),
            _ => None,
        }
    }
}

/// One interleaved attribute inside a vertex record.
///
/// `declared_stride == 0` means "tightly packed, infer it". `normalized` is
/// recorded from the capture but the decoder returns raw numeric values; it
/// only affects how a GPU backend fetches the attribute.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct AttributeDescriptor {
    pub component_type: ComponentType,
    pub component_count: usize,
    pub byte_offset: usize,
    pub declared_stride: usize,
    pub normalized: bool,
}

impl AttributeDescriptor {
    #[inline]
    pub const fn new(component_type: ComponentType, component_count: usize, byte_offset: usize) -> Self {
        Self {
            component_type,
            component_count,
            byte_offset,
            declared_stride: 0,
            normalized: false,
        }
    }

    #[inline]
    pub const fn with_stride(mut self, stride: usize) -> Self {
        self.declared_stride = stride;
        self
    }

    #[inline]
    pub const fn with_normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }

    /// Bytes covered by one occurrence of this attribute.
    #[inline]
    pub fn byte_span(&self) -> usize {
        self.component_type.byte_width() * self.component_count
    }

    /// First byte past this attribute, relative to the record start.
    #[inline]
    pub fn byte_end(&self) -> usize {
        self.byte_offset + self.byte_span()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_follow_component_type() {
        assert_eq!(ComponentType::Int8.byte_width(), 1);
        assert_eq!(ComponentType::Uint8.byte_width(), 1);
        assert_eq!(ComponentType::Int16.byte_width(), 2);
        assert_eq!(ComponentType::Uint16.byte_width(), 2);
        assert_eq!(ComponentType::Float32.byte_width(), 4);
    }

    #[test]
    fn span_is_width_times_count() {
        let d = AttributeDescriptor::new(ComponentType::Int16, 3, 8);
        assert_eq!(d.byte_span(), 6);
        assert_eq!(d.byte_end(), 14);
    }

    #[test]
    fn codec_reads_signed_and_unsigned() {
        let neg = (-2i16).to_ne_bytes();
        assert_eq!((ComponentType::Int16.codec().read)(&neg), -2.0);
        assert_eq!((ComponentType::Uint16.codec().read)(&neg), 65534.0);
        assert_eq!((ComponentType::Int8.codec().read)(&[0xff]), -1.0);
        assert_eq!((ComponentType::Uint8.codec().read)(&[0xff]), 255.0);
    }

    #[test]
    fn gl_enums_map_known_types_only() {
        assert_eq!(ComponentType::from_gl(0x1406), Some(ComponentType::Float32));
        assert_eq!(ComponentType::from_gl(0x1401), Some(ComponentType::Uint8));
        assert_eq!(ComponentType::from_gl(0x140B), None); // GL_HALF_FLOAT
    }
}
