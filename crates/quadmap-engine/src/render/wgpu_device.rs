use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::sync::atomic::{AtomicU32, Ordering};

use bytemuck::{Pod, Zeroable};

use crate::coords::{Mat3, Viewport};
use crate::host::{
    AttribLayout, AttribLocation, BlendFactor, BufferId, BufferTarget, BufferUsage, ContextId,
    DeviceContext, rgba_len, ShaderId, ShaderProgram, TextureId, Topology, UniformLocation,
};

use super::{RenderCtx, RenderTarget};

static NEXT_CONTEXT: AtomicU32 = AtomicU32::new(1);

// ── uniforms ──────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct TilemapUniform {
    projection: [[f32; 4]; 3],
    model: [[f32; 4]; 3],
}

const UNIFORM_SIZE: u64 = std::mem::size_of::<TilemapUniform>() as u64;

// ── recorded draws ────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
struct PipelineKey {
    blend: (BlendFactor, BlendFactor),
    topology: Topology,
    layout: AttribLayout,
}

/// Device state captured by one `draw_arrays`, replayed on [`WgpuDevice::flush`].
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDraw {
    pub blend: (BlendFactor, BlendFactor),
    pub topology: Topology,
    pub layout: AttribLayout,
    pub projection: Mat3,
    pub model: Mat3,
    pub texture: TextureId,
    /// Contents of the attribute's buffer at draw time.
    pub vertices: Vec<u8>,
    pub first: u32,
    pub count: u32,
}

impl PendingDraw {
    fn key(&self) -> PipelineKey {
        PipelineKey {
            blend: self.blend,
            topology: self.topology,
            layout: self.layout,
        }
    }
}

// ── host-side objects ─────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct BufferSlot {
    data: Vec<u8>,
}

struct GpuTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
}

#[derive(Default)]
struct TextureSlot {
    width: u32,
    height: u32,
    /// Pixels waiting for upload; emptied once on the GPU.
    pixels: Vec<u8>,
    dirty: bool,
    gpu: Option<GpuTexture>,
}

#[derive(Debug, Copy, Clone)]
struct VertexAttrib {
    layout: AttribLayout,
    buffer: BufferId,
}

/// GL-style [`DeviceContext`] backed by wgpu.
///
/// Calls between frames only touch host memory. Each `draw_arrays` snapshots
/// the current program, blend function, uniforms, bound texture and vertex
/// data; [`flush`](Self::flush) uploads what changed and replays the
/// snapshots into the target in submission order.
///
/// Only [`ShaderProgram::TILEMAP`] is understood; draws with any other
/// program are dropped with a one-time debug message.
pub struct WgpuDevice {
    id: ContextId,
    viewport: Viewport,

    buffers: Vec<BufferSlot>,
    textures: Vec<TextureSlot>,

    array_buffer: Option<BufferId>,
    element_buffer: Option<BufferId>,
    active_unit: u32,
    units: HashMap<u32, TextureId>,
    program: Option<ShaderId>,
    blend: (BlendFactor, BlendFactor),
    mat3_uniforms: HashMap<UniformLocation, Mat3>,
    i32_uniforms: HashMap<UniformLocation, i32>,
    attribs: HashMap<AttribLocation, VertexAttrib>,
    enabled_attribs: HashSet<AttribLocation>,

    pending: Vec<PendingDraw>,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    shader: Option<wgpu::ShaderModule>,
    pipeline_layout: Option<wgpu::PipelineLayout>,
    uniform_bgl: Option<wgpu::BindGroupLayout>,
    texture_bgl: Option<wgpu::BindGroupLayout>,
    sampler: Option<wgpu::Sampler>,

    uniform_ubo: Option<wgpu::Buffer>,
    uniform_bind_group: Option<wgpu::BindGroup>,
    uniform_capacity: usize,

    vertex_vbo: Option<wgpu::Buffer>,
    vertex_capacity: u64,

    warned_program: bool,
    warned_attrib: bool,
    warned_texture: bool,
    warned_target: bool,
}

impl WgpuDevice {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            id: ContextId(NEXT_CONTEXT.fetch_add(1, Ordering::Relaxed)),
            viewport,
            buffers: Vec::new(),
            textures: Vec::new(),
            array_buffer: None,
            element_buffer: None,
            active_unit: 0,
            units: HashMap::new(),
            program: None,
            blend: (BlendFactor::One, BlendFactor::Zero),
            mat3_uniforms: HashMap::new(),
            i32_uniforms: HashMap::new(),
            attribs: HashMap::new(),
            enabled_attribs: HashSet::new(),
            pending: Vec::new(),
            pipeline_format: None,
            pipelines: HashMap::new(),
            shader: None,
            pipeline_layout: None,
            uniform_bgl: None,
            texture_bgl: None,
            sampler: None,
            uniform_ubo: None,
            uniform_bind_group: None,
            uniform_capacity: 0,
            vertex_vbo: None,
            vertex_capacity: 0,
            warned_program: false,
            warned_attrib: false,
            warned_texture: false,
            warned_target: false,
        }
    }

    /// Sets the drawing-buffer size (physical pixels) reported to nodes.
    /// Call once per frame with the surface size.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Draws recorded since the last flush.
    pub fn pending_draws(&self) -> &[PendingDraw] {
        &self.pending
    }

    /// Drops recorded draws without rendering them (the frame was skipped).
    pub fn discard_pending(&mut self) -> usize {
        let n = self.pending.len();
        self.pending.clear();
        n
    }

    /// Uploads dirty textures and vertex data, then replays every pending
    /// draw into `target` (loading, not clearing, its contents).
    pub fn flush(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        if self.pending.is_empty() {
            return;
        }
        let draws = std::mem::take(&mut self.pending);

        self.ensure_layouts(ctx);
        self.ensure_sampler(ctx);
        self.upload_textures(ctx);
        for draw in &draws {
            self.ensure_pipeline(ctx, draw.key());
        }

        let stride = self.uniform_stride(ctx);
        let mut uniform_bytes = vec![0u8; stride as usize * draws.len()];
        let mut vertex_bytes: Vec<u8> = Vec::new();
        let mut vertex_ranges: Vec<Range<u64>> = Vec::with_capacity(draws.len());

        for (i, draw) in draws.iter().enumerate() {
            let u = TilemapUniform {
                projection: draw.projection.to_padded_cols(),
                model: draw.model.to_padded_cols(),
            };
            let at = i * stride as usize;
            uniform_bytes[at..at + UNIFORM_SIZE as usize].copy_from_slice(bytemuck::bytes_of(&u));

            let start = vertex_bytes.len() as u64;
            vertex_bytes.extend_from_slice(&draw.vertices);
            // COPY_BUFFER_ALIGNMENT
            vertex_bytes.resize(vertex_bytes.len().next_multiple_of(4), 0);
            vertex_ranges.push(start..vertex_bytes.len() as u64);
        }

        if vertex_bytes.is_empty() {
            return;
        }

        self.ensure_uniform_capacity(ctx, draws.len(), stride);
        self.ensure_vertex_capacity(ctx, vertex_bytes.len() as u64);

        let Some(ubo) = self.uniform_ubo.as_ref() else { return };
        let Some(uniform_bind_group) = self.uniform_bind_group.as_ref() else { return };
        let Some(vbo) = self.vertex_vbo.as_ref() else { return };

        ctx.queue.write_buffer(ubo, 0, &uniform_bytes);
        ctx.queue.write_buffer(vbo, 0, &vertex_bytes);

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("quadmap tilemap pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        if ctx.viewport.is_valid() {
            rpass.set_viewport(0.0, 0.0, ctx.viewport.width, ctx.viewport.height, 0.0, 1.0);
        }

        for (i, draw) in draws.iter().enumerate() {
            let Some(pipeline) = self.pipelines.get(&draw.key()) else { continue };
            let Some(gpu) = texture_slot(&self.textures, draw.texture).and_then(|s| s.gpu.as_ref())
            else {
                continue;
            };

            let range = &vertex_ranges[i];
            let offset = range.start + draw.layout.offset as u64;
            if offset >= range.end {
                continue;
            }

            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, uniform_bind_group, &[(i as u64 * stride) as u32]);
            rpass.set_bind_group(1, &gpu.bind_group, &[]);
            rpass.set_vertex_buffer(0, vbo.slice(offset..range.end));
            rpass.draw(draw.first..draw.first + draw.count, 0..1);
        }

        log::trace!("WgpuDevice {:?}: flushed {} draw(s)", self.id, draws.len());
    }

    // ── recording ─────────────────────────────────────────────────────────

    fn record_draw(&mut self, topology: Topology, first: u32, count: u32) {
        let program = ShaderProgram::TILEMAP;

        if self.program != Some(program.id) {
            if !self.warned_program {
                log::debug!("WgpuDevice: draw with unknown program {:?} dropped", self.program);
                self.warned_program = true;
            }
            return;
        }

        let attrib = self
            .attribs
            .get(&program.a_position)
            .copied()
            .filter(|_| self.enabled_attribs.contains(&program.a_position));
        let Some(attrib) = attrib else {
            if !self.warned_attrib {
                log::debug!("WgpuDevice: draw without an enabled position attribute dropped");
                self.warned_attrib = true;
            }
            return;
        };

        let unit = self
            .i32_uniforms
            .get(&program.u_image_sampler)
            .copied()
            .unwrap_or(0);
        let texture = u32::try_from(unit)
            .ok()
            .and_then(|unit| self.units.get(&unit))
            .copied();
        let Some(texture) = texture else {
            if !self.warned_texture {
                log::debug!("WgpuDevice: draw without a texture on unit {unit} dropped");
                self.warned_texture = true;
            }
            return;
        };

        let Some(vertices) = buffer_slot(&self.buffers, attrib.buffer).map(|s| s.data.clone())
        else {
            return;
        };

        let uniform = |loc: UniformLocation| {
            self.mat3_uniforms
                .get(&loc)
                .copied()
                .unwrap_or(Mat3::IDENTITY)
        };

        self.pending.push(PendingDraw {
            blend: self.blend,
            topology,
            layout: attrib.layout,
            projection: uniform(program.u_projection_matrix),
            model: uniform(program.u_model_matrix),
            texture,
            vertices,
            first,
            count,
        });
    }

    // ── GPU resources ─────────────────────────────────────────────────────

    fn ensure_layouts(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_layout.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quadmap tilemap shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/tilemap.wgsl").into()),
        });

        let uniform_bgl = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("quadmap tilemap uniform bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(UNIFORM_SIZE),
                    },
                    count: None,
                }],
            });

        let texture_bgl = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("quadmap tilemap texture bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("quadmap tilemap pipeline layout"),
                bind_group_layouts: &[&uniform_bgl, &texture_bgl],
                immediate_size: 0,
            });

        self.shader = Some(shader);
        self.uniform_bgl = Some(uniform_bgl);
        self.texture_bgl = Some(texture_bgl);
        self.pipeline_layout = Some(pipeline_layout);

        self.pipelines.clear();
        self.uniform_ubo = None;
        self.uniform_bind_group = None;
        self.uniform_capacity = 0;
    }

    fn ensure_sampler(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_some() {
            return;
        }
        self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("quadmap tilemap sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        }));
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>, key: PipelineKey) {
        if self.pipeline_format != Some(ctx.surface_format) {
            self.pipelines.clear();
            self.pipeline_format = Some(ctx.surface_format);
        }
        if self.pipelines.contains_key(&key) {
            return;
        }
        let Some(shader) = self.shader.as_ref() else { return };
        let Some(layout) = self.pipeline_layout.as_ref() else { return };

        let attributes = [wgpu::VertexAttribute {
            format: vertex_format(key.layout.components),
            offset: 0,
            shader_location: 0,
        }];
        let (src, dst) = key.blend;
        let component = wgpu::BlendComponent {
            src_factor: blend_factor(src),
            dst_factor: blend_factor(dst),
            operation: wgpu::BlendOperation::Add,
        };

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("quadmap tilemap pipeline"),
            layout: Some(layout),

            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: key.layout.byte_stride() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &attributes,
                }],
            },

            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState {
                        color: component,
                        alpha: component,
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: primitive_topology(key.topology),
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("WgpuDevice: built pipeline for {:?}", key);
        self.pipelines.insert(key, pipeline);
    }

    fn upload_textures(&mut self, ctx: &RenderCtx<'_>) {
        let Some(bgl) = self.texture_bgl.as_ref() else { return };
        let Some(sampler) = self.sampler.as_ref() else { return };

        for (i, slot) in self.textures.iter_mut().enumerate().filter(|(_, s)| s.dirty) {
            slot.dirty = false;
            let pixels = std::mem::take(&mut slot.pixels);
            let (width, height) = (slot.width, slot.height);

            if width == 0 || height == 0 || rgba_len(width, height) != Some(pixels.len()) {
                log::warn!(
                    "WgpuDevice: texture {} has invalid image {}x{} ({} bytes); skipped",
                    i + 1,
                    width,
                    height,
                    pixels.len()
                );
                continue;
            }

            let size = wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            };

            let reuse = matches!(&slot.gpu, Some(g) if g.width == width && g.height == height);
            if !reuse {
                let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
                    label: Some("quadmap tilemap texture"),
                    size,
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format: wgpu::TextureFormat::Rgba8UnormSrgb,
                    usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                    view_formats: &[],
                });
                let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
                let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("quadmap tilemap texture bind group"),
                    layout: bgl,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::TextureView(&view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::Sampler(sampler),
                        },
                    ],
                });
                log::debug!("WgpuDevice: allocated texture {} ({}x{})", i + 1, width, height);
                slot.gpu = Some(GpuTexture {
                    texture,
                    bind_group,
                    width,
                    height,
                });
            }

            let Some(gpu) = slot.gpu.as_ref() else { continue };
            ctx.queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &gpu.texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &pixels,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(width * 4),
                    rows_per_image: Some(height),
                },
                size,
            );
        }
    }

    fn uniform_stride(&self, ctx: &RenderCtx<'_>) -> u64 {
        let align = u64::from(ctx.device.limits().min_uniform_buffer_offset_alignment).max(1);
        UNIFORM_SIZE.next_multiple_of(align)
    }

    fn ensure_uniform_capacity(&mut self, ctx: &RenderCtx<'_>, draws: usize, stride: u64) {
        if draws <= self.uniform_capacity && self.uniform_bind_group.is_some() {
            return;
        }
        let Some(bgl) = self.uniform_bgl.as_ref() else { return };

        let new_cap = draws.next_power_of_two().max(16);
        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quadmap tilemap uniform ubo"),
            size: new_cap as u64 * stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quadmap tilemap uniform bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &ubo,
                    offset: 0,
                    size: wgpu::BufferSize::new(UNIFORM_SIZE),
                }),
            }],
        });

        self.uniform_ubo = Some(ubo);
        self.uniform_bind_group = Some(bind_group);
        self.uniform_capacity = new_cap;
    }

    fn ensure_vertex_capacity(&mut self, ctx: &RenderCtx<'_>, bytes: u64) {
        if bytes <= self.vertex_capacity && self.vertex_vbo.is_some() {
            return;
        }

        let new_cap = bytes.next_power_of_two().max(1024);
        self.vertex_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quadmap tilemap vbo"),
            size: new_cap,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.vertex_capacity = new_cap;
    }
}

impl DeviceContext for WgpuDevice {
    fn id(&self) -> ContextId {
        self.id
    }

    fn drawing_buffer_size(&self) -> Viewport {
        self.viewport
    }

    fn create_buffer(&mut self) -> BufferId {
        self.buffers.push(BufferSlot::default());
        BufferId(self.buffers.len() as u32)
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: BufferId) {
        match target {
            BufferTarget::Array => self.array_buffer = Some(buffer),
            BufferTarget::ElementArray => self.element_buffer = Some(buffer),
        }
    }

    fn buffer_data(&mut self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        let bound = match target {
            BufferTarget::Array => self.array_buffer,
            BufferTarget::ElementArray => self.element_buffer,
        };
        let Some(slot) = bound.and_then(|id| buffer_slot_mut(&mut self.buffers, id)) else {
            if !self.warned_target {
                log::debug!("WgpuDevice: buffer_data with nothing bound to {:?}", target);
                self.warned_target = true;
            }
            return;
        };
        slot.data.clear();
        slot.data.extend_from_slice(data);
        log::trace!("WgpuDevice: {} bytes into {:?} ({:?})", data.len(), bound, usage);
    }

    fn create_texture(&mut self) -> TextureId {
        self.textures.push(TextureSlot::default());
        TextureId(self.textures.len() as u32)
    }

    fn active_texture(&mut self, unit: u32) {
        self.active_unit = unit;
    }

    fn bind_texture(&mut self, texture: TextureId) {
        self.units.insert(self.active_unit, texture);
    }

    fn tex_image_2d(&mut self, width: u32, height: u32, rgba: &[u8]) {
        let Some(&bound) = self.units.get(&self.active_unit) else { return };
        let Some(slot) = texture_slot_mut(&mut self.textures, bound) else { return };
        slot.width = width;
        slot.height = height;
        slot.pixels = rgba.to_vec();
        slot.dirty = true;
    }

    fn use_program(&mut self, program: ShaderId) {
        self.program = Some(program);
    }

    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.blend = (src, dst);
    }

    fn uniform_matrix3(&mut self, location: UniformLocation, matrix: &Mat3) {
        self.mat3_uniforms.insert(location, *matrix);
    }

    fn uniform_i32(&mut self, location: UniformLocation, value: i32) {
        self.i32_uniforms.insert(location, value);
    }

    fn vertex_attrib_pointer(&mut self, location: AttribLocation, layout: AttribLayout) {
        let Some(buffer) = self.array_buffer else {
            if !self.warned_attrib {
                log::debug!("WgpuDevice: vertex_attrib_pointer with no array buffer bound");
                self.warned_attrib = true;
            }
            return;
        };
        self.attribs.insert(location, VertexAttrib { layout, buffer });
    }

    fn enable_vertex_attrib_array(&mut self, location: AttribLocation) {
        self.enabled_attribs.insert(location);
    }

    fn draw_arrays(&mut self, topology: Topology, first: u32, count: u32) {
        self.record_draw(topology, first, count);
    }
}

// ── helpers ───────────────────────────────────────────────────────────────

fn buffer_slot(buffers: &[BufferSlot], id: BufferId) -> Option<&BufferSlot> {
    buffers.get(id.0.checked_sub(1)? as usize)
}

fn buffer_slot_mut(buffers: &mut [BufferSlot], id: BufferId) -> Option<&mut BufferSlot> {
    buffers.get_mut(id.0.checked_sub(1)? as usize)
}

fn texture_slot(textures: &[TextureSlot], id: TextureId) -> Option<&TextureSlot> {
    textures.get(id.0.checked_sub(1)? as usize)
}

fn texture_slot_mut(textures: &mut [TextureSlot], id: TextureId) -> Option<&mut TextureSlot> {
    textures.get_mut(id.0.checked_sub(1)? as usize)
}

fn blend_factor(f: BlendFactor) -> wgpu::BlendFactor {
    match f {
        BlendFactor::Zero => wgpu::BlendFactor::Zero,
        BlendFactor::One => wgpu::BlendFactor::One,
        BlendFactor::SrcAlpha => wgpu::BlendFactor::SrcAlpha,
        BlendFactor::OneMinusSrcAlpha => wgpu::BlendFactor::OneMinusSrcAlpha,
        BlendFactor::DstColor => wgpu::BlendFactor::Dst,
        BlendFactor::OneMinusSrcColor => wgpu::BlendFactor::OneMinusSrc,
    }
}

fn primitive_topology(t: Topology) -> wgpu::PrimitiveTopology {
    match t {
        Topology::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
        Topology::TriangleList => wgpu::PrimitiveTopology::TriangleList,
    }
}

fn vertex_format(components: u32) -> wgpu::VertexFormat {
    match components {
        1 => wgpu::VertexFormat::Float32,
        2 => wgpu::VertexFormat::Float32x2,
        3 => wgpu::VertexFormat::Float32x3,
        _ => wgpu::VertexFormat::Float32x4,
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use winit::dpi::PhysicalSize;

    use super::*;
    use crate::coords::Vec2;
    use crate::host::{BaseTexture, BlendMode, HostManagers, NodeBase, TransformableNode};
    use crate::tilemap::{quad_geometry, TilemapNode};

    fn device() -> WgpuDevice {
        WgpuDevice::new(Viewport::new(800.0, 600.0))
    }

    #[test]
    fn contexts_get_distinct_ids() {
        assert_ne!(device().id(), device().id());
    }

    #[test]
    fn buffer_data_replaces_bound_buffer() {
        let mut d = device();
        let a = d.create_buffer();
        let b = d.create_buffer();

        d.bind_buffer(BufferTarget::Array, a);
        d.buffer_data(BufferTarget::Array, &[1, 2, 3, 4], BufferUsage::Static);
        d.buffer_data(BufferTarget::Array, &[5, 6], BufferUsage::Dynamic);

        assert_eq!(buffer_slot(&d.buffers, a).map(|s| s.data.clone()), Some(vec![5, 6]));
        assert_eq!(buffer_slot(&d.buffers, b).map(|s| s.data.len()), Some(0));
    }

    #[test]
    fn draw_without_program_is_dropped() {
        let mut d = device();
        d.draw_arrays(Topology::TriangleStrip, 0, 4);
        assert!(d.pending_draws().is_empty());
    }

    #[test]
    fn tex_image_targets_texture_on_active_unit() {
        let mut d = device();
        let t = d.create_texture();
        d.active_texture(0);
        d.bind_texture(t);
        d.tex_image_2d(2, 1, &[0; 8]);

        let slot = texture_slot(&d.textures, t).map(|s| (s.width, s.height, s.dirty));
        assert_eq!(slot, Some((2, 1, true)));
    }

    #[test]
    fn tilemap_node_records_one_pending_draw() {
        let mut d = device();
        let mut host = HostManagers::new();
        let texture = Rc::new(BaseTexture::checkerboard(64, 32, 8, [255; 4], [0; 4]));
        let mut node = TilemapNode::new(texture.clone());
        node.set_position(10.0, 20.0);
        node.update_transform(&NodeBase::new());

        node.render(&mut host.session(&mut d));

        let draws = d.pending_draws();
        assert_eq!(draws.len(), 1);
        let draw = &draws[0];
        assert_eq!(draw.blend, BlendMode::Normal.factors());
        assert_eq!(draw.topology, Topology::TriangleStrip);
        assert_eq!(draw.layout, AttribLayout::packed_f32(4));
        assert_eq!(draw.projection, Mat3::projection(800.0, 600.0));
        assert_eq!(draw.model, Mat3::model(10.0, 20.0, 0.0, 1.0, 1.0));
        assert_eq!(draw.vertices, bytemuck::cast_slice::<f32, u8>(&quad_geometry(64.0, 32.0)));
        assert_eq!((draw.first, draw.count), (0, 4));
        assert_eq!(Some(draw.texture), texture.device_texture(d.id()));

        let slot = texture_slot(&d.textures, draw.texture).map(|s| (s.width, s.height, s.dirty));
        assert_eq!(slot, Some((64, 32, true)));
    }

    #[test]
    fn pose_is_in_surface_pixels_at_any_scale_factor() {
        // 1280x720 logical window at scale factor 2
        let mut d = device();
        d.set_viewport(Viewport::from_physical(PhysicalSize::new(2560, 1440)));
        let mut host = HostManagers::new();
        let mut node = TilemapNode::new(Rc::new(BaseTexture::checkerboard(64, 32, 8, [255; 4], [0; 4])));
        node.set_position(64.0, 0.0);
        node.update_transform(&NodeBase::new());

        node.render(&mut host.session(&mut d));

        let draw = &d.pending_draws()[0];
        assert_eq!(draw.projection, Mat3::projection(2560.0, 1440.0));

        let to_px = |local: Vec2| {
            let clip = draw.projection.transform_point(draw.model.transform_point(local));
            Vec2::new((clip.x + 1.0) * 0.5 * 2560.0, (1.0 - clip.y) * 0.5 * 1440.0)
        };
        let origin = to_px(Vec2::new(0.0, 0.0));
        let far = to_px(Vec2::new(64.0, 32.0));
        assert!((origin.x - 64.0).abs() < 1e-2 && origin.y.abs() < 1e-2);
        assert!((far.x - 128.0).abs() < 1e-2 && (far.y - 32.0).abs() < 1e-2);
    }
}
