use crate::coords::{Mat3, Viewport};

/// Identifies one device context (one GPU device/surface pair).
///
/// Per-context state on shared resources (texture uploads) is keyed by this id.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ContextId(pub u32);

/// Device-side buffer handle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BufferId(pub u32);

/// Device-side texture handle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Shader program handle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ShaderId(pub u32);

/// Vertex attribute slot in a shader program.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct AttribLocation(pub u32);

/// Uniform slot in a shader program.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    Array,
    ElementArray,
}

/// Upload frequency hint.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    Static,
    Dynamic,
    Stream,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Topology {
    TriangleStrip,
    TriangleList,
}

/// Blend factors understood by `DeviceContext::blend_func`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstColor,
    OneMinusSrcColor,
}

/// Layout of a float vertex attribute inside the bound array buffer.
///
/// `stride == 0` means tightly packed (`components * 4` bytes).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct AttribLayout {
    pub components: u32,
    pub normalized: bool,
    pub stride: u32,
    pub offset: u32,
}

impl AttribLayout {
    /// Tightly packed `components` x f32, no normalization, no offset.
    #[inline]
    pub const fn packed_f32(components: u32) -> Self {
        Self {
            components,
            normalized: false,
            stride: 0,
            offset: 0,
        }
    }

    /// Effective byte stride between consecutive vertices.
    #[inline]
    pub fn byte_stride(&self) -> u32 {
        if self.stride == 0 {
            self.components * 4
        } else {
            self.stride
        }
    }
}

/// Immediate-mode device context consumed by scene nodes.
///
/// Calls mutate binding state (bound buffer, active texture unit, uniforms)
/// the way a GL-style context does; `draw_arrays` consumes the current state.
/// Failures are not reported through this interface: backends treat them as
/// fatal or log them.
pub trait DeviceContext {
    fn id(&self) -> ContextId;

    /// Current drawing-surface size in pixels.
    fn drawing_buffer_size(&self) -> Viewport;

    fn create_buffer(&mut self) -> BufferId;
    fn bind_buffer(&mut self, target: BufferTarget, buffer: BufferId);
    /// Replaces the contents of the buffer bound to `target`.
    fn buffer_data(&mut self, target: BufferTarget, data: &[u8], usage: BufferUsage);

    fn create_texture(&mut self) -> TextureId;
    fn active_texture(&mut self, unit: u32);
    /// Binds `texture` to the active unit.
    fn bind_texture(&mut self, texture: TextureId);
    /// Uploads tightly packed RGBA8 pixels to the texture bound on the active unit.
    fn tex_image_2d(&mut self, width: u32, height: u32, rgba: &[u8]);

    fn use_program(&mut self, program: ShaderId);
    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor);

    fn uniform_matrix3(&mut self, location: UniformLocation, matrix: &Mat3);
    fn uniform_i32(&mut self, location: UniformLocation, value: i32);

    /// Points `location` at the buffer currently bound to `BufferTarget::Array`.
    fn vertex_attrib_pointer(&mut self, location: AttribLocation, layout: AttribLayout);
    fn enable_vertex_attrib_array(&mut self, location: AttribLocation);

    fn draw_arrays(&mut self, topology: Topology, first: u32, count: u32);
}
