use crate::coords::{Affine, Rect};

use super::session::RenderSession;

/// Scene-graph state shared by every node: visibility, alpha, composed world
/// transform and the bounds cache.
#[derive(Debug, Clone)]
pub struct NodeBase {
    pub visible: bool,
    pub alpha: f32,
    world_transform: Affine,
    world_alpha: f32,
    current_bounds: Option<Rect>,
}

impl NodeBase {
    pub fn new() -> Self {
        Self {
            visible: true,
            alpha: 1.0,
            world_transform: Affine::IDENTITY,
            world_alpha: 1.0,
            current_bounds: None,
        }
    }

    /// Composes `local` under `parent`: world = parent.world x local.
    pub fn propagate(&mut self, parent: &NodeBase, local: &Affine) {
        self.world_transform = parent.world_transform * *local;
        self.world_alpha = parent.world_alpha * self.alpha;
    }

    #[inline]
    pub fn world_transform(&self) -> Affine {
        self.world_transform
    }

    #[inline]
    pub fn world_alpha(&self) -> f32 {
        self.world_alpha
    }

    /// Whether the node should draw at all this frame.
    #[inline]
    pub fn is_renderable(&self) -> bool {
        self.visible && self.alpha > 0.0
    }

    /// Bounds computed last in this render pass, if any.
    #[inline]
    pub fn current_bounds(&self) -> Option<Rect> {
        self.current_bounds
    }

    #[inline]
    pub fn cache_bounds(&mut self, bounds: Rect) {
        self.current_bounds = Some(bounds);
    }
}

impl Default for NodeBase {
    fn default() -> Self {
        Self::new()
    }
}

/// Capability interface of a renderable scene-graph node.
///
/// The host drives one frame as `update` -> `update_transform` -> `render`.
pub trait TransformableNode {
    fn base(&self) -> &NodeBase;
    fn base_mut(&mut self) -> &mut NodeBase;

    /// Per-frame logic hook.
    fn update(&mut self) {}

    /// Runs after every node has been updated.
    fn post_update(&mut self) {}

    /// Recomputes local state and composes the world transform under `parent`.
    fn update_transform(&mut self, parent: &NodeBase);

    fn render(&mut self, session: &mut RenderSession<'_>);

    /// Axis-aligned bounds under `matrix`, or under the node's world transform.
    fn bounds(&mut self, matrix: Option<&Affine>) -> Rect;
}
