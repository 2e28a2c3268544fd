use std::path::PathBuf;
use std::rc::Rc;

use quadmap_engine::coords::{ColorRgba, Viewport};
use quadmap_engine::core::{App, AppControl, FrameCtx};
use quadmap_engine::host::{BaseTexture, HostManagers, NodeBase, TransformableNode};
use quadmap_engine::render::WgpuDevice;
use quadmap_engine::tilemap::TilemapNode;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowId;

use crate::cli::StudioConfig;
use crate::texture;

/// Renders one tilemap node per frame under an identity root.
///
/// Escape quits; R reloads the texture file, when one was given.
pub struct StudioApp {
    root: NodeBase,
    node: TilemapNode,
    texture_path: Option<PathBuf>,
    spin: f32,
    clear: ColorRgba,

    device: WgpuDevice,
    managers: HostManagers,

    logged_bounds: bool,
}

impl StudioApp {
    pub fn new(config: &StudioConfig, texture: BaseTexture) -> Self {
        let mut node = TilemapNode::new(Rc::new(texture));
        node.set_pose(config.pose);
        node.set_blend_mode(config.blend);

        Self {
            root: NodeBase::new(),
            node,
            texture_path: config.texture.clone(),
            spin: config.spin,
            clear: config.clear,
            device: WgpuDevice::new(Viewport::new(1.0, 1.0)),
            managers: HostManagers::new(),
            logged_bounds: false,
        }
    }

    fn reload_texture(&mut self) {
        let Some(path) = self.texture_path.as_deref() else {
            log::info!("no texture file to reload");
            return;
        };

        match texture::reload(path, self.node.texture()) {
            Ok(()) => self.node.on_texture_update(),
            Err(err) => log::warn!("texture reload failed: {err:#}"),
        }
    }
}

impl App for StudioApp {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Escape) =>
            {
                AppControl::Exit
            }
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Character("r".into()) =>
            {
                self.reload_texture();
                AppControl::Continue
            }
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let skipped = self.device.discard_pending();
        if skipped > 0 {
            log::trace!("dropped {skipped} draw(s) from a skipped frame");
        }

        if self.spin != 0.0 {
            let pose = self.node.pose();
            self.node.set_rotation(pose.rotation + self.spin * ctx.time.dt);
        }

        self.node.update();
        self.node.update_transform(&self.root);

        if !self.logged_bounds {
            log::info!("tilemap bounds: {:?}", self.node.bounds(None));
            self.logged_bounds = true;
        }

        let viewport = ctx.drawing_buffer();
        if !viewport.is_valid() {
            return AppControl::Continue;
        }

        self.device.set_viewport(viewport);
        self.node.render(&mut self.managers.session(&mut self.device));
        self.node.post_update();

        let device = &mut self.device;
        ctx.render(self.clear, |rctx, target| device.flush(rctx, target))
    }
}
