use bufscope_layout::{extract, infer_stride, validate, BoundingBox, LayoutError};

use super::{BufferBinding, DrawState, PreviewError};
use crate::render::{BufferAllocator, BufferHandle, BufferUsage};

/// Attribute decoded for bounds. Captures carry no semantics, so the first
/// attribute is taken to be the position.
pub const POSITION_ATTRIBUTE: usize = 0;

/// A draw state together with the GPU handles it holds.
struct Bound {
    state: DrawState,
    array_handle: BufferHandle,
    element_handle: Option<BufferHandle>,
    bounds: Option<BoundingBox>,
}

/// Owns the current [`DrawState`] and the GPU handles acquired for it.
///
/// Two states: empty, or bound to exactly one draw state with one array
/// handle and at most one element handle. Handles are released before new
/// ones are acquired, so two draw states never hold handles at once.
#[derive(Default)]
pub struct DrawStateManager {
    current: Option<Bound>,
}

impl DrawStateManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_bound(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&DrawState> {
        self.current.as_ref().map(|b| &b.state)
    }

    pub fn array_handle(&self) -> Option<BufferHandle> {
        self.current.as_ref().map(|b| b.array_handle)
    }

    pub fn element_handle(&self) -> Option<BufferHandle> {
        self.current.as_ref().and_then(|b| b.element_handle)
    }

    /// Bounds of the current position attribute.
    ///
    /// `None` when nothing is bound or the array content was unavailable. A
    /// draw state with zero vertices yields an empty box.
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.current.as_ref().and_then(|b| b.bounds)
    }

    /// Replaces the current draw state.
    ///
    /// Previous handles are released first. On error every handle taken by
    /// this call is released again and the manager is left empty.
    pub fn set_buffer(
        &mut self,
        next: Option<DrawState>,
        allocator: &mut dyn BufferAllocator,
    ) -> Result<(), PreviewError> {
        self.clear(allocator);
        if let Some(state) = next {
            self.current = Some(Self::bind(state, allocator)?);
        }
        Ok(())
    }

    /// Releases all handles and forgets the draw state.
    pub fn clear(&mut self, allocator: &mut dyn BufferAllocator) {
        if let Some(bound) = self.current.take() {
            Self::release(bound, allocator);
        }
    }

    fn bind(state: DrawState, allocator: &mut dyn BufferAllocator) -> Result<Bound, PreviewError> {
        let layout = state.array_buffer.version.structure();
        validate(layout)?;
        infer_stride(layout)?;

        let array = &state.array_buffer;
        let array_handle = acquire(array, allocator, BufferUsage::Vertex)?;

        let mut bound = Bound {
            array_handle,
            element_handle: None,
            bounds: None,
            state,
        };

        if let Some(element) = bound.state.element_buffer() {
            match acquire(element, allocator, BufferUsage::Index) {
                Ok(handle) => bound.element_handle = Some(handle),
                Err(e) => {
                    Self::release(bound, allocator);
                    return Err(e);
                }
            }
        }

        match decode_bounds(&bound.state.array_buffer) {
            Ok(bounds) => bound.bounds = bounds,
            Err(e) => {
                Self::release(bound, allocator);
                return Err(e.into());
            }
        }

        log::debug!(
            "bound {:?} draw of {} from {} (bounds: {:?})",
            bound.state.mode,
            bound.state.count,
            bound.state.array_buffer.source.label(),
            bound.bounds
        );
        Ok(bound)
    }

    fn release(bound: Bound, allocator: &mut dyn BufferAllocator) {
        let Bound {
            state,
            array_handle,
            element_handle,
            ..
        } = bound;
        state.array_buffer.source.release_handle(allocator, array_handle);
        if let (Some(handle), Some(element)) = (element_handle, state.element_buffer()) {
            element.source.release_handle(allocator, handle);
        }
    }
}

fn acquire(
    binding: &BufferBinding,
    allocator: &mut dyn BufferAllocator,
    usage: BufferUsage,
) -> Result<BufferHandle, PreviewError> {
    binding
        .source
        .acquire_handle(allocator, &binding.version, usage)
        .map_err(|source| PreviewError::HandleAcquisition {
            label: binding.source.label().to_string(),
            source,
        })
}

/// Decodes the position attribute and bounds it. `Ok(None)` when the content
/// cannot be materialized.
fn decode_bounds(binding: &BufferBinding) -> Result<Option<BoundingBox>, LayoutError> {
    let Some(content) = binding.source.materialize(&binding.version) else {
        log::warn!(
            "{}: content unavailable at revision {}; previewing without bounds",
            binding.source.label(),
            binding.version.revision()
        );
        return Ok(None);
    };

    let layout = binding.version.structure();
    let positions = extract(&content, layout, POSITION_ATTRIBUTE)?;
    let bounds = BoundingBox::from_positions(&positions, layout[POSITION_ATTRIBUTE].component_count);
    if bounds.is_empty() {
        log::debug!("{}: no vertices to bound", binding.source.label());
    }
    Ok(Some(bounds))
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use bufscope_layout::{AttributeDescriptor, ComponentType};
    use glam::Vec3;

    use super::*;
    use crate::buffer::{BufferSource, BufferVersion, CapturedBuffer};
    use crate::render::recording::RecordingBackend;
    use crate::render::{AttributePointer, IndexType, PrimitiveMode};

    fn float_layout() -> Vec<AttributeDescriptor> {
        vec![AttributeDescriptor::new(ComponentType::Float32, 3, 0)]
    }

    fn vertex_binding(label: &str, positions: &[f32]) -> BufferBinding {
        let mut buf = CapturedBuffer::new(label);
        buf.upload(bytemuck::cast_slice::<f32, u8>(positions).to_vec());
        let version = buf.snapshot(float_layout());
        BufferBinding::new(Rc::new(buf), version)
    }

    fn index_binding(label: &str, indices: &[u16]) -> BufferBinding {
        let mut buf = CapturedBuffer::new(label);
        buf.upload(bytemuck::cast_slice::<u16, u8>(indices).to_vec());
        let version = buf.snapshot(Vec::<AttributeDescriptor>::new());
        BufferBinding::new(Rc::new(buf), version)
    }

    fn pointer() -> AttributePointer {
        AttributePointer::from_layout(&float_layout(), 0).unwrap()
    }

    fn triangle(label: &str) -> DrawState {
        let array = vertex_binding(label, &[0.0, 0.0, 0.0, 1.0, 2.0, 3.0, -1.0, 5.0, 0.0]);
        DrawState::arrays(PrimitiveMode::Triangles, array, pointer(), 0, 3)
    }

    fn indexed(label: &str) -> DrawState {
        let array = vertex_binding(label, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        let elements = index_binding(&format!("{label} indices"), &[0, 1, 2]);
        DrawState::elements(PrimitiveMode::Triangles, array, pointer(), elements, IndexType::Uint16, 0, 3)
    }

    #[test]
    fn binding_acquires_handles_and_bounds() {
        let mut backend = RecordingBackend::new(64, 64);
        let mut mgr = DrawStateManager::new();

        mgr.set_buffer(Some(triangle("vbo")), &mut backend).unwrap();

        assert!(mgr.is_bound());
        assert_eq!(backend.live_labels(), vec!["vbo"]);
        assert_eq!(mgr.element_handle(), None);
        let b = mgr.bounds().unwrap();
        assert_eq!(b.min, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 5.0, 3.0));
    }

    #[test]
    fn clearing_releases_each_handle_once() {
        let mut backend = RecordingBackend::new(64, 64);
        let mut mgr = DrawStateManager::new();
        mgr.set_buffer(Some(indexed("vbo")), &mut backend).unwrap();
        let array = mgr.array_handle().unwrap();
        let element = mgr.element_handle().unwrap();

        mgr.set_buffer(None, &mut backend).unwrap();
        mgr.set_buffer(None, &mut backend).unwrap();

        assert!(!mgr.is_bound());
        assert!(backend.live.is_empty());
        let mut destroyed = backend.destroyed.clone();
        destroyed.sort();
        assert_eq!(destroyed, vec![array, element]);
    }

    #[test]
    fn rebinding_never_overlaps_handles() {
        let mut backend = RecordingBackend::new(64, 64);
        let mut mgr = DrawStateManager::new();

        mgr.set_buffer(Some(indexed("first")), &mut backend).unwrap();
        mgr.set_buffer(Some(indexed("second")), &mut backend).unwrap();

        let mut labels = backend.live_labels();
        labels.sort();
        assert_eq!(labels, vec!["second", "second indices"]);
        assert_eq!(backend.destroyed.len(), 2);
        assert_eq!(backend.created, 4);
        // One indexed draw holds two handles; the first pair is gone before
        // the second is created.
        assert_eq!(backend.journal.borrow().peak_live, 2);
    }

    #[test]
    fn unavailable_content_still_binds() {
        let mut backend = RecordingBackend::new(64, 64);
        let mut mgr = DrawStateManager::new();

        let buf = CapturedBuffer::new("never uploaded");
        let version = buf.snapshot(float_layout());
        let array = BufferBinding::new(Rc::new(buf), version);
        let state = DrawState::arrays(PrimitiveMode::Points, array, pointer(), 0, 0);

        mgr.set_buffer(Some(state), &mut backend).unwrap();

        assert!(mgr.is_bound());
        assert_eq!(mgr.bounds(), None);
        assert_eq!(backend.live.values().next().map(|b| b.contents.len()), Some(0));
    }

    #[test]
    fn zero_vertices_give_an_empty_box() {
        let mut backend = RecordingBackend::new(64, 64);
        let mut mgr = DrawStateManager::new();
        let state = DrawState::arrays(PrimitiveMode::Points, vertex_binding("vbo", &[]), pointer(), 0, 0);

        mgr.set_buffer(Some(state), &mut backend).unwrap();
        assert!(mgr.bounds().unwrap().is_empty());
    }

    #[test]
    fn degenerate_layout_fails_without_holding_handles() {
        let mut backend = RecordingBackend::new(64, 64);
        let mut mgr = DrawStateManager::new();
        mgr.set_buffer(Some(triangle("old")), &mut backend).unwrap();

        let mut buf = CapturedBuffer::new("bad");
        buf.upload(vec![0u8; 16]);
        let version = buf.snapshot(vec![AttributeDescriptor::new(ComponentType::Float32, 0, 0)]);
        let state = DrawState::arrays(PrimitiveMode::Points, BufferBinding::new(Rc::new(buf), version), pointer(), 0, 1);

        let err = mgr.set_buffer(Some(state), &mut backend).unwrap_err();

        assert!(matches!(err, PreviewError::Layout(LayoutError::ZeroComponents { index: 0 })));
        assert!(!mgr.is_bound());
        assert!(backend.live.is_empty());
    }

    #[test]
    fn overrunning_records_release_acquired_handles() {
        let mut backend = RecordingBackend::new(64, 64);
        let mut mgr = DrawStateManager::new();

        let mut buf = CapturedBuffer::new("short stride");
        buf.upload(vec![0u8; 12]);
        let version = buf.snapshot(vec![
            AttributeDescriptor::new(ComponentType::Float32, 1, 0).with_stride(4),
            AttributeDescriptor::new(ComponentType::Float32, 1, 4).with_stride(4),
        ]);
        let array = BufferBinding::new(Rc::new(buf), version);
        let elements = index_binding("indices", &[0]);
        let state = DrawState::elements(PrimitiveMode::Points, array, pointer(), elements, IndexType::Uint16, 0, 1);

        let err = mgr.set_buffer(Some(state), &mut backend).unwrap_err();

        assert!(matches!(err, PreviewError::Layout(LayoutError::RecordOverrun { .. })));
        assert!(backend.live.is_empty());
        assert_eq!(backend.destroyed.len(), 2);
    }

    #[test]
    fn failed_element_acquisition_leaves_nothing_bound() {
        let mut backend = RecordingBackend::new(64, 64);
        backend.fail_buffer_label = Some("vbo indices".to_string());
        let mut mgr = DrawStateManager::new();

        let err = mgr.set_buffer(Some(indexed("vbo")), &mut backend).unwrap_err();

        assert!(matches!(err, PreviewError::HandleAcquisition { ref label, .. } if label == "vbo indices"));
        assert!(!mgr.is_bound());
        assert!(backend.live.is_empty());
    }

    #[test]
    fn handles_are_released_through_their_source() {
        struct Counting {
            inner: CapturedBuffer,
            released: std::cell::Cell<usize>,
        }
        impl BufferSource for Counting {
            fn label(&self) -> &str {
                self.inner.label()
            }
            fn materialize(&self, version: &BufferVersion) -> Option<Vec<u8>> {
                self.inner.materialize(version)
            }
            fn release_handle(&self, allocator: &mut dyn BufferAllocator, handle: BufferHandle) {
                self.released.set(self.released.get() + 1);
                allocator.destroy_buffer(handle);
            }
        }

        let mut inner = CapturedBuffer::new("counted");
        inner.upload(vec![0u8; 12]);
        let version = inner.snapshot(float_layout());
        let source = Rc::new(Counting {
            inner,
            released: std::cell::Cell::new(0),
        });
        let array = BufferBinding::new(source.clone(), version);

        let mut backend = RecordingBackend::new(64, 64);
        let mut mgr = DrawStateManager::new();
        mgr.set_buffer(Some(DrawState::arrays(PrimitiveMode::Points, array, pointer(), 0, 1)), &mut backend)
            .unwrap();
        mgr.clear(&mut backend);

        assert_eq!(source.released.get(), 1);
    }
}
