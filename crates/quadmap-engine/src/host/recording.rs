//! Test double that records every host call in order.

use std::cell::RefCell;
use std::rc::Rc;

use crate::coords::{Mat3, Viewport};

use super::batch::SpriteBatch;
use super::blend::{BlendMode, BlendModeStack};
use super::device::{
    AttribLayout, AttribLocation, BlendFactor, BufferId, BufferTarget, BufferUsage, ContextId,
    DeviceContext, ShaderId, TextureId, Topology, UniformLocation,
};
use super::session::RenderSession;
use super::shader::{ShaderProgram, ShaderRegistry};
use super::texture::{BaseTexture, TextureManager, TextureUploader};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateBuffer(BufferId),
    BindBuffer(BufferTarget, BufferId),
    BufferData(BufferTarget, Vec<u8>, BufferUsage),
    CreateTexture(TextureId),
    ActiveTexture(u32),
    BindTexture(TextureId),
    TexImage2d(u32, u32),
    UseProgram(ShaderId),
    BlendFunc(BlendFactor, BlendFactor),
    UniformMatrix3(UniformLocation, Mat3),
    UniformI32(UniformLocation, i32),
    VertexAttribPointer(AttribLocation, AttribLayout),
    EnableVertexAttribArray(AttribLocation),
    DrawArrays(Topology, u32, u32),
    SetShader(ShaderId),
    SetBlendMode(BlendMode),
    BatchStop,
    BatchStart,
    UpdateTexture,
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

pub struct RecordingDevice {
    log: CallLog,
    id: ContextId,
    size: Viewport,
    next_buffer: u32,
    next_texture: u32,
}

impl RecordingDevice {
    /// Stand-alone recorded device with its own log.
    pub fn new(size: Viewport) -> (Self, CallLog) {
        Self::with_context(size, ContextId(1))
    }

    /// Like [`new`](Self::new), with an explicit context id.
    pub fn with_context(size: Viewport, id: ContextId) -> (Self, CallLog) {
        let log: CallLog = Rc::new(RefCell::new(Vec::new()));
        let device = Self {
            log: log.clone(),
            id,
            size,
            next_buffer: 0,
            next_texture: 0,
        };
        (device, log)
    }
}

impl DeviceContext for RecordingDevice {
    fn id(&self) -> ContextId {
        self.id
    }

    fn drawing_buffer_size(&self) -> Viewport {
        self.size
    }

    fn create_buffer(&mut self) -> BufferId {
        self.next_buffer += 1;
        let id = BufferId(self.next_buffer);
        self.log.borrow_mut().push(Call::CreateBuffer(id));
        id
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: BufferId) {
        self.log.borrow_mut().push(Call::BindBuffer(target, buffer));
    }

    fn buffer_data(&mut self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        self.log
            .borrow_mut()
            .push(Call::BufferData(target, data.to_vec(), usage));
    }

    fn create_texture(&mut self) -> TextureId {
        self.next_texture += 1;
        let id = TextureId(self.next_texture);
        self.log.borrow_mut().push(Call::CreateTexture(id));
        id
    }

    fn active_texture(&mut self, unit: u32) {
        self.log.borrow_mut().push(Call::ActiveTexture(unit));
    }

    fn bind_texture(&mut self, texture: TextureId) {
        self.log.borrow_mut().push(Call::BindTexture(texture));
    }

    fn tex_image_2d(&mut self, width: u32, height: u32, _rgba: &[u8]) {
        self.log.borrow_mut().push(Call::TexImage2d(width, height));
    }

    fn use_program(&mut self, program: ShaderId) {
        self.log.borrow_mut().push(Call::UseProgram(program));
    }

    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.log.borrow_mut().push(Call::BlendFunc(src, dst));
    }

    fn uniform_matrix3(&mut self, location: UniformLocation, matrix: &Mat3) {
        self.log
            .borrow_mut()
            .push(Call::UniformMatrix3(location, *matrix));
    }

    fn uniform_i32(&mut self, location: UniformLocation, value: i32) {
        self.log.borrow_mut().push(Call::UniformI32(location, value));
    }

    fn vertex_attrib_pointer(&mut self, location: AttribLocation, layout: AttribLayout) {
        self.log
            .borrow_mut()
            .push(Call::VertexAttribPointer(location, layout));
    }

    fn enable_vertex_attrib_array(&mut self, location: AttribLocation) {
        self.log
            .borrow_mut()
            .push(Call::EnableVertexAttribArray(location));
    }

    fn draw_arrays(&mut self, topology: Topology, first: u32, count: u32) {
        self.log
            .borrow_mut()
            .push(Call::DrawArrays(topology, first, count));
    }
}

struct RecordingShaders(CallLog);

impl ShaderRegistry for RecordingShaders {
    fn tilemap_shader(&self) -> ShaderProgram {
        ShaderProgram::TILEMAP
    }

    fn set_shader(&mut self, _device: &mut dyn DeviceContext, program: &ShaderProgram) -> bool {
        self.0.borrow_mut().push(Call::SetShader(program.id));
        true
    }
}

struct RecordingBlend(CallLog);

impl BlendModeStack for RecordingBlend {
    fn set_blend_mode(&mut self, _device: &mut dyn DeviceContext, mode: BlendMode) -> bool {
        self.0.borrow_mut().push(Call::SetBlendMode(mode));
        true
    }
}

struct RecordingBatch(CallLog);

impl SpriteBatch for RecordingBatch {
    fn stop(&mut self) {
        self.0.borrow_mut().push(Call::BatchStop);
    }

    fn start(&mut self) {
        self.0.borrow_mut().push(Call::BatchStart);
    }
}

struct RecordingUploader(CallLog, TextureManager);

impl TextureUploader for RecordingUploader {
    fn update_texture(&mut self, device: &mut dyn DeviceContext, texture: &BaseTexture) {
        self.0.borrow_mut().push(Call::UpdateTexture);
        self.1.update_texture(device, texture);
    }
}

/// A full recorded host: device plus every collaborator, sharing one log.
pub struct RecordingHost {
    log: CallLog,
    device: RecordingDevice,
    shaders: RecordingShaders,
    blend_modes: RecordingBlend,
    batch: RecordingBatch,
    textures: RecordingUploader,
}

impl RecordingHost {
    pub fn new(size: Viewport) -> Self {
        let (device, log) = RecordingDevice::new(size);
        Self {
            device,
            shaders: RecordingShaders(log.clone()),
            blend_modes: RecordingBlend(log.clone()),
            batch: RecordingBatch(log.clone()),
            textures: RecordingUploader(log.clone(), TextureManager::new()),
            log,
        }
    }

    pub fn context_id(&self) -> ContextId {
        self.device.id
    }

    pub fn session(&mut self) -> RenderSession<'_> {
        RenderSession {
            device: &mut self.device,
            shaders: &mut self.shaders,
            blend_modes: &mut self.blend_modes,
            batch: &mut self.batch,
            textures: &mut self.textures,
        }
    }

    /// Returns and clears the recorded calls.
    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.log.borrow_mut())
    }
}
