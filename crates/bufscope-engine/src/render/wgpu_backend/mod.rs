//! wgpu implementation of the preview rendering context.

mod formats;
mod pipeline;

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use anyhow::{Context, Result};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::device::{Gpu, SurfaceErrorAction};
use crate::render::{
    BufferAllocator, BufferHandle, BufferUsage, DrawCall, FramePlan, IndexType, PipelineState,
    ProgramDesc, ProgramId, RenderBackend,
};

use formats::{index_format, index_range, is_strip, primitive_topology, vertex_format, vertex_layout_fits};
use pipeline::{PipelineKey, Program, Uniforms};

struct GpuBuffer {
    buffer: wgpu::Buffer,
    len: u64,
    usage: BufferUsage,
    /// CPU copy of index data, kept so 8-bit indices can be widened.
    indices: Option<Vec<u8>>,
    widened: Option<wgpu::Buffer>,
}

/// How a validated plan maps onto one wgpu draw.
struct ResolvedDraw {
    key: PipelineKey,
    vertex_offset: u64,
    call: ResolvedCall,
}

enum ResolvedCall {
    Arrays(Range<u32>),
    Indexed {
        buffer: BufferHandle,
        widened: bool,
        range: Range<u32>,
    },
}

/// Renders preview frames into a window surface through wgpu.
///
/// Captured draws that wgpu cannot express (triangle fans, raw integer
/// positions, misaligned strides) still clear the frame but draw nothing;
/// each cause is logged once.
pub struct WgpuBackend {
    gpu: Gpu,
    buffers: HashMap<BufferHandle, GpuBuffer>,
    next_buffer: u64,
    programs: HashMap<ProgramId, Program>,
    next_program: u32,
    warned: HashSet<&'static str>,
}

impl WgpuBackend {
    pub fn new(gpu: Gpu) -> Self {
        Self {
            gpu,
            buffers: HashMap::new(),
            next_buffer: 0,
            programs: HashMap::new(),
            next_program: 0,
            warned: HashSet::new(),
        }
    }

    /// Follows a window resize.
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.gpu.resize(size);
    }

    fn warn_once(&mut self, cause: &'static str, detail: impl std::fmt::Display) {
        if self.warned.insert(cause) {
            log::warn!("{cause}: {detail}");
        }
    }

    /// Checks `plan` against wgpu's rules. `None` means clear-only.
    fn resolve(&mut self, plan: &FramePlan) -> Option<ResolvedDraw> {
        let Some(topology) = primitive_topology(plan.mode) else {
            self.warn_once("unsupported primitive mode", format!("{:?} is not drawn", plan.mode));
            return None;
        };
        let p = plan.position;
        let Some(format) = vertex_format(&p) else {
            self.warn_once(
                "unsupported position format",
                format!("{:?}x{} (normalized: {})", p.component_type, p.component_count, p.normalized),
            );
            return None;
        };
        let max_stride = u64::from(self.gpu.device().limits().max_vertex_buffer_array_stride);
        if !vertex_layout_fits(&p, max_stride) {
            self.warn_once(
                "unsupported vertex layout",
                format!("{}-byte attribute at offset {} with stride {}", p.byte_span(), p.offset, p.stride),
            );
            return None;
        }

        let vbuf = self.buffers.get(&plan.vertex_buffer)?;
        // Vertices whose position fetch fits inside the buffer.
        let addressable = if vbuf.len >= p.offset + p.byte_span() {
            (vbuf.len - p.offset - p.byte_span()) / p.stride + 1
        } else {
            0
        };

        let (strip_index_format, call) = match plan.draw {
            DrawCall::Arrays { first, count } => {
                if u64::from(first) + u64::from(count) > addressable {
                    self.warn_once(
                        "vertex range out of bounds",
                        format!("{first}+{count} of {addressable} vertices"),
                    );
                    return None;
                }
                (None, ResolvedCall::Arrays(first..first + count))
            }
            DrawCall::Elements {
                buffer,
                index_type,
                count,
                byte_offset,
            } => {
                let ibuf = self.buffers.get(&buffer)?;
                if ibuf.usage != BufferUsage::Index {
                    self.warn_once("unusable index buffer", format!("{buffer:?} is not an index buffer"));
                    return None;
                }
                let len = ibuf.len;
                let Some(range) = index_range(len, index_type, byte_offset, count) else {
                    self.warn_once(
                        "unusable index range",
                        format!("{count} {index_type:?} indices at byte {byte_offset} of {len}"),
                    );
                    return None;
                };
                let format = index_format(index_type);
                (
                    is_strip(topology).then_some(format),
                    ResolvedCall::Indexed {
                        buffer,
                        widened: index_type == IndexType::Uint8,
                        range,
                    },
                )
            }
        };

        if addressable == 0 {
            return None;
        }

        Some(ResolvedDraw {
            key: PipelineKey {
                topology,
                strip_index_format,
                format,
                stride: p.stride,
            },
            vertex_offset: p.offset,
            call,
        })
    }

    /// Uploads a 16-bit copy of 8-bit index data on first use.
    fn ensure_widened(&mut self, handle: BufferHandle) -> Result<()> {
        let entry = self
            .buffers
            .get_mut(&handle)
            .context("index buffer was released")?;
        if entry.widened.is_some() {
            return Ok(());
        }
        let bytes = entry.indices.as_deref().unwrap_or_default();
        let wide: Vec<u16> = bytes.iter().map(|&i| u16::from(i)).collect();
        entry.widened = Some(self.gpu.device().create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("bufscope widened indices"),
            contents: bytemuck::cast_slice(&wide),
            usage: wgpu::BufferUsages::INDEX,
        }));
        Ok(())
    }
}

impl BufferAllocator for WgpuBackend {
    fn create_buffer(&mut self, label: &str, contents: &[u8], usage: BufferUsage) -> Result<BufferHandle> {
        let wgpu_usage = match usage {
            BufferUsage::Vertex => wgpu::BufferUsages::VERTEX,
            BufferUsage::Index => wgpu::BufferUsages::INDEX,
        };
        let buffer = self.gpu.device().create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage: wgpu_usage,
        });

        self.next_buffer += 1;
        let handle = BufferHandle(self.next_buffer);
        self.buffers.insert(
            handle,
            GpuBuffer {
                buffer,
                len: contents.len() as u64,
                usage,
                indices: (usage == BufferUsage::Index).then(|| contents.to_vec()),
                widened: None,
            },
        );
        log::debug!("created {label} ({} bytes) as {handle:?}", contents.len());
        Ok(handle)
    }

    fn destroy_buffer(&mut self, handle: BufferHandle) {
        if let Some(entry) = self.buffers.remove(&handle) {
            entry.buffer.destroy();
            if let Some(w) = entry.widened {
                w.destroy();
            }
        }
    }
}

impl RenderBackend for WgpuBackend {
    fn surface_size(&self) -> (u32, u32) {
        let size = self.gpu.size();
        (size.width, size.height)
    }

    fn create_program(&mut self, desc: &ProgramDesc<'_>, state: &PipelineState) -> Result<ProgramId> {
        if state.depth_test || state.cull_faces {
            log::warn!("depth test and face culling are not available in the preview pipeline");
        }
        let program = Program::new(self.gpu.device(), desc, *state, self.gpu.surface_format());
        self.next_program += 1;
        let id = ProgramId(self.next_program);
        self.programs.insert(id, program);
        Ok(id)
    }

    fn delete_program(&mut self, program: ProgramId) {
        self.programs.remove(&program);
    }

    fn render_frame(&mut self, program: ProgramId, plan: &FramePlan) -> Result<()> {
        let size = self.gpu.size();
        if size.width == 0 || size.height == 0 {
            return Ok(());
        }
        anyhow::ensure!(self.programs.contains_key(&program), "unknown program {program:?}");

        let resolved = self.resolve(plan);
        if let Some(ResolvedDraw {
            call: ResolvedCall::Indexed { buffer, widened: true, .. },
            ..
        }) = &resolved
        {
            self.ensure_widened(*buffer)?;
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => Err(anyhow::anyhow!("surface out of memory")),
                    _ => Ok(()),
                };
            }
        };

        let device = self.gpu.device();
        let queue = self.gpu.queue();
        let prog = self
            .programs
            .get_mut(&program)
            .context("program deleted mid-frame")?;

        let uniforms = Uniforms {
            proj: plan.projection.to_cols_array_2d(),
            view: plan.view.to_cols_array_2d(),
            color: plan.fill_color,
        };
        queue.write_buffer(&prog.uniforms, 0, bytemuck::bytes_of(&uniforms));

        let [r, g, b, a] = prog.state.clear_color.map(f64::from);
        let clear = wgpu::Color { r, g, b, a };
        let bind_group = prog.bind_group.clone();
        let pipeline = resolved.as_ref().map(|d| prog.pipeline(device, d.key).clone());

        {
            let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("bufscope preview pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let (Some(draw), Some(pipeline)) = (&resolved, &pipeline) {
                let (vw, vh) = plan.viewport;
                rpass.set_viewport(
                    0.0,
                    0.0,
                    vw.clamp(1, size.width) as f32,
                    vh.clamp(1, size.height) as f32,
                    0.0,
                    1.0,
                );
                rpass.set_pipeline(pipeline);
                rpass.set_bind_group(0, &bind_group, &[]);

                if let Some(vbuf) = self.buffers.get(&plan.vertex_buffer) {
                    rpass.set_vertex_buffer(0, vbuf.buffer.slice(draw.vertex_offset..));
                }

                match &draw.call {
                    ResolvedCall::Arrays(range) => rpass.draw(range.clone(), 0..1),
                    ResolvedCall::Indexed {
                        buffer,
                        widened,
                        range,
                    } => {
                        if let Some(ibuf) = self.buffers.get(buffer) {
                            let gpu_buffer = if *widened {
                                ibuf.widened.as_ref().unwrap_or(&ibuf.buffer)
                            } else {
                                &ibuf.buffer
                            };
                            rpass.set_index_buffer(gpu_buffer.slice(..), wgpu::IndexFormat::Uint16);
                            rpass.draw_indexed(range.clone(), 0, 0..1);
                        }
                    }
                }
            }
        }

        self.gpu.submit(frame);
        Ok(())
    }
}
