use std::rc::Rc;

use crate::coords::{Affine, Mat3, Rect, Vec2};
use crate::host::{BaseTexture, BlendMode, NodeBase, RenderSession, TransformableNode};

use super::bounds::transformed_bounds;
use super::geometry::{local_vertices, quad_geometry, QUAD_FLOATS, QUAD_VERTEX_COUNT};
use super::resources::GpuResources;

/// Position, rotation (radians) and scale of a node in its parent's space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pose {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        position: Vec2::new(0.0, 0.0),
        rotation: 0.0,
        scale: Vec2::new(1.0, 1.0),
    };

    /// Unrotated, unscaled pose at `(x, y)`.
    pub const fn at(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            ..Self::IDENTITY
        }
    }

    pub fn to_matrix(&self) -> Mat3 {
        Mat3::model(
            self.position.x,
            self.position.y,
            self.rotation,
            self.scale.x,
            self.scale.y,
        )
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A single textured quad, sized to its texture, drawn through the host's
/// tilemap shader.
///
/// Device buffers are created on the first [`render`](TransformableNode::render)
/// and kept for the node's lifetime; releasing them is up to the host.
#[derive(Debug)]
pub struct TilemapNode {
    pub(super) base: NodeBase,
    pub(super) texture: Rc<BaseTexture>,
    pub(super) dirty: bool,
    pub(super) blend_mode: BlendMode,
    pub(super) geometry: [f32; QUAD_FLOATS],
    pub(super) pose: Pose,
    pub(super) transform: Option<Mat3>,
    pub(super) resources: GpuResources,
}

impl TilemapNode {
    pub fn new(texture: Rc<BaseTexture>) -> Self {
        let geometry = quad_geometry(texture.width() as f32, texture.height() as f32);
        Self {
            base: NodeBase::new(),
            texture,
            dirty: true,
            blend_mode: BlendMode::Normal,
            geometry,
            pose: Pose::IDENTITY,
            transform: None,
            resources: GpuResources::new(),
        }
    }

    pub fn texture(&self) -> &Rc<BaseTexture> {
        &self.texture
    }

    pub fn geometry(&self) -> &[f32; QUAD_FLOATS] {
        &self.geometry
    }

    /// Local-space corners of the quad, in strip order.
    pub fn vertices(&self) -> [Vec2; QUAD_VERTEX_COUNT as usize] {
        local_vertices(&self.geometry)
    }

    /// Model matrix from the last `update_transform`, if any ran yet.
    pub fn transform(&self) -> Option<Mat3> {
        self.transform
    }

    pub fn resources(&self) -> &GpuResources {
        &self.resources
    }

    // ── pose ──────────────────────────────────────────────────────────────

    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Takes effect on the next `update_transform`.
    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.pose.position = Vec2::new(x, y);
    }

    pub fn set_rotation(&mut self, radians: f32) {
        self.pose.rotation = radians;
    }

    pub fn set_scale(&mut self, sx: f32, sy: f32) {
        self.pose.scale = Vec2::new(sx, sy);
    }

    // ── state flags ───────────────────────────────────────────────────────

    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend_mode = mode;
    }

    /// True until the geometry has been uploaded after construction or the
    /// last [`on_texture_update`](Self::on_texture_update).
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Texture-changed hook: flags the node for a fresh upload.
    pub fn on_texture_update(&mut self) {
        self.dirty = true;
    }

    /// Forgets device buffers after the owning context was lost.
    ///
    /// The handles are not released; the next draw allocates new ones.
    pub fn on_context_lost(&mut self) {
        self.resources.invalidate();
        self.dirty = true;
    }
}

impl TransformableNode for TilemapNode {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn update_transform(&mut self, parent: &NodeBase) {
        let model = self.pose.to_matrix();
        self.transform = Some(model);
        self.base.propagate(parent, &Affine::from_mat3(&model));
    }

    fn render(&mut self, session: &mut RenderSession<'_>) {
        self.draw(session);
    }

    fn bounds(&mut self, matrix: Option<&Affine>) -> Rect {
        let m = matrix.copied().unwrap_or_else(|| self.base.world_transform());

        let Some(bounds) = transformed_bounds(&self.vertices(), &m) else {
            return Rect::EMPTY;
        };

        self.base.cache_bounds(bounds);
        bounds
    }
}
