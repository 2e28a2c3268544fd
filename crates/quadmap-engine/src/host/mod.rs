//! Host-renderer interfaces consumed by scene nodes.
//!
//! A node never talks to a GPU API directly. It receives a [`RenderSession`]
//! bundling the device context and the host managers (shaders, blend modes,
//! sprite batch, texture uploads) and drives them through these traits.
//!
//! Default manager implementations live next to their traits; any backend
//! only has to provide a [`DeviceContext`].

mod batch;
mod blend;
mod device;
mod node;
mod session;
mod shader;
mod texture;

#[cfg(test)]
pub(crate) mod recording;

pub use batch::{PassthroughBatch, SpriteBatch};
pub use blend::{BlendMode, BlendModeManager, BlendModeStack};
pub use device::{
    AttribLayout, AttribLocation, BlendFactor, BufferId, BufferTarget, BufferUsage, ContextId,
    DeviceContext, ShaderId, TextureId, Topology, UniformLocation,
};
pub use node::{NodeBase, TransformableNode};
pub use session::{HostManagers, RenderSession};
pub use shader::{ShaderManager, ShaderProgram, ShaderRegistry};
pub use texture::{rgba_len, BaseTexture, TextureManager, TextureUploadState, TextureUploader};
