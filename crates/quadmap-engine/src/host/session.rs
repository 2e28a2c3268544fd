use super::batch::{PassthroughBatch, SpriteBatch};
use super::blend::{BlendModeManager, BlendModeStack};
use super::device::DeviceContext;
use super::shader::{ShaderManager, ShaderRegistry};
use super::texture::{TextureManager, TextureUploader};

/// Everything a node needs from the host for one render pass.
///
/// Borrowed for the duration of the pass; the collaborators are independent
/// so each can be replaced (or recorded in tests) separately.
pub struct RenderSession<'a> {
    pub device: &'a mut dyn DeviceContext,
    pub shaders: &'a mut dyn ShaderRegistry,
    pub blend_modes: &'a mut dyn BlendModeStack,
    pub batch: &'a mut dyn SpriteBatch,
    pub textures: &'a mut dyn TextureUploader,
}

/// Default set of host managers, owned by a renderer across frames.
#[derive(Debug, Default)]
pub struct HostManagers {
    pub shaders: ShaderManager,
    pub blend_modes: BlendModeManager,
    pub batch: PassthroughBatch,
    pub textures: TextureManager,
}

impl HostManagers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrows the managers together with `device` as a render session.
    pub fn session<'a>(&'a mut self, device: &'a mut dyn DeviceContext) -> RenderSession<'a> {
        RenderSession {
            device,
            shaders: &mut self.shaders,
            blend_modes: &mut self.blend_modes,
            batch: &mut self.batch,
            textures: &mut self.textures,
        }
    }
}
