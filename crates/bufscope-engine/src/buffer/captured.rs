use bufscope_layout::AttributeDescriptor;

use super::{BufferSource, BufferVersion, SourceId};

/// One recorded write to a buffer's data store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upload {
    /// Replaces the whole store (`bufferData`).
    Data(Vec<u8>),
    /// Overwrites bytes in place (`bufferSubData`).
    SubData { offset: usize, bytes: Vec<u8> },
}

/// A buffer recorded from a trace as an append-only list of uploads.
///
/// Versions never copy data: [`CapturedBuffer::snapshot`] only records how
/// long the history was, and [`materialize`](BufferSource::materialize)
/// replays that prefix.
#[derive(Debug)]
pub struct CapturedBuffer {
    id: SourceId,
    label: String,
    history: Vec<Upload>,
}

impl CapturedBuffer {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: SourceId::next(),
            label: label.into(),
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> SourceId {
        self.id
    }

    pub fn upload(&mut self, bytes: impl Into<Vec<u8>>) {
        self.history.push(Upload::Data(bytes.into()));
    }

    pub fn upload_sub(&mut self, offset: usize, bytes: impl Into<Vec<u8>>) {
        self.history.push(Upload::SubData {
            offset,
            bytes: bytes.into(),
        });
    }

    /// Pins the current content under `structure`.
    pub fn snapshot(&self, structure: impl Into<std::rc::Rc<[AttributeDescriptor]>>) -> BufferVersion {
        BufferVersion::new(self.id, self.history.len(), structure)
    }
}

impl BufferSource for CapturedBuffer {
    fn label(&self) -> &str {
        &self.label
    }

    fn materialize(&self, version: &BufferVersion) -> Option<Vec<u8>> {
        if version.source() != self.id {
            log::debug!("{}: version belongs to another buffer", self.label);
            return None;
        }
        let prefix = self.history.get(..version.revision())?;

        let mut store: Option<Vec<u8>> = None;
        for (i, upload) in prefix.iter().enumerate() {
            match upload {
                Upload::Data(bytes) => store = Some(bytes.clone()),
                Upload::SubData { offset, bytes } => {
                    let Some(data) = store.as_mut() else {
                        log::warn!("{}: upload {i} patches a buffer with no data store", self.label);
                        continue;
                    };
                    let end = offset.checked_add(bytes.len());
                    match end.and_then(|end| data.get_mut(*offset..end)) {
                        Some(dst) => dst.copy_from_slice(bytes),
                        None => log::warn!(
                            "{}: upload {i} writes {} bytes at {} past the {}-byte store",
                            self.label,
                            bytes.len(),
                            offset,
                            data.len()
                        ),
                    }
                }
            }
        }
        store
    }
}
