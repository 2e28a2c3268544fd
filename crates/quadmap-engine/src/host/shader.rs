use super::device::{AttribLocation, ContextId, DeviceContext, ShaderId, UniformLocation};

/// Locations exposed by the tilemap shader program.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ShaderProgram {
    pub id: ShaderId,
    pub a_position: AttribLocation,
    pub u_projection_matrix: UniformLocation,
    pub u_model_matrix: UniformLocation,
    pub u_image_sampler: UniformLocation,
}

impl ShaderProgram {
    /// Tilemap program: `vec4 aPosition` (xy = position, zw = uv),
    /// `mat3 uProjectionMatrix`, `mat3 uModelMatrix`, `sampler2D uImageSampler`.
    pub const TILEMAP: ShaderProgram = ShaderProgram {
        id: ShaderId(1),
        a_position: AttribLocation(0),
        u_projection_matrix: UniformLocation(0),
        u_model_matrix: UniformLocation(1),
        u_image_sampler: UniformLocation(2),
    };
}

/// Host shader registry.
pub trait ShaderRegistry {
    /// The program used by tilemap nodes.
    fn tilemap_shader(&self) -> ShaderProgram;

    /// Makes `program` current. Returns `false` when it already was.
    fn set_shader(&mut self, device: &mut dyn DeviceContext, program: &ShaderProgram) -> bool;
}

/// Registry that tracks the current program and skips redundant switches.
///
/// The tracked program is keyed by device context, so a fresh context (after
/// a loss, or a second window) always gets its program selected.
#[derive(Debug)]
pub struct ShaderManager {
    tilemap: ShaderProgram,
    current: Option<(ContextId, ShaderId)>,
}

impl ShaderManager {
    pub fn new() -> Self {
        Self {
            tilemap: ShaderProgram::TILEMAP,
            current: None,
        }
    }
}

impl Default for ShaderManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderRegistry for ShaderManager {
    fn tilemap_shader(&self) -> ShaderProgram {
        self.tilemap
    }

    fn set_shader(&mut self, device: &mut dyn DeviceContext, program: &ShaderProgram) -> bool {
        let current = Some((device.id(), program.id));
        if self.current == current {
            return false;
        }
        self.current = current;
        device.use_program(program.id);
        true
    }
}
