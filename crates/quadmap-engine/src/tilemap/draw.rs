use crate::coords::Mat3;
use crate::host::{AttribLayout, BufferTarget, BufferUsage, RenderSession, Topology};

use super::geometry::{FLOATS_PER_VERTEX, QUAD_VERTEX_COUNT};
use super::node::TilemapNode;

/// Texture unit the tilemap sampler reads from.
const SAMPLER_UNIT: u32 = 0;

impl TilemapNode {
    /// One frame's draw: suspends the sprite batch, binds program, uniforms,
    /// texture and vertex data, issues a 4-vertex strip and resumes the batch.
    pub(super) fn draw(&mut self, session: &mut RenderSession<'_>) {
        if !self.base.is_renderable() {
            return;
        }

        session.batch.stop();

        let buffers = self.resources.ensure(&mut *session.device, &self.geometry);

        let program = session.shaders.tilemap_shader();
        session.shaders.set_shader(&mut *session.device, &program);
        session
            .blend_modes
            .set_blend_mode(&mut *session.device, self.blend_mode);

        let device = &mut *session.device;
        let projection = Mat3::for_viewport(device.drawing_buffer_size());

        device.uniform_matrix3(program.u_projection_matrix, &projection);
        device.uniform_i32(program.u_image_sampler, SAMPLER_UNIT as i32);
        device.active_texture(SAMPLER_UNIT);
        device.uniform_matrix3(
            program.u_model_matrix,
            &self.transform.unwrap_or(Mat3::IDENTITY),
        );

        let ctx = device.id();
        match self.texture.device_texture(ctx) {
            Some(texture) => device.bind_texture(texture),
            None => session.textures.update_texture(&mut *session.device, &self.texture),
        }

        let device = &mut *session.device;
        device.bind_buffer(BufferTarget::Array, buffers.position);
        device.buffer_data(
            BufferTarget::Array,
            bytemuck::cast_slice(&self.geometry),
            BufferUsage::Static,
        );
        device.vertex_attrib_pointer(
            program.a_position,
            AttribLayout::packed_f32(FLOATS_PER_VERTEX as u32),
        );
        device.enable_vertex_attrib_array(program.a_position);
        device.draw_arrays(Topology::TriangleStrip, 0, QUAD_VERTEX_COUNT);
        self.dirty = false;

        log::trace!(
            "tilemap draw on {:?}: {:?} {}x{}",
            ctx,
            buffers.position,
            self.texture.width(),
            self.texture.height()
        );

        session.batch.start();
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::coords::{Viewport, Vec2};
    use crate::host::recording::{Call, RecordingHost};
    use crate::host::{
        AttribLocation, BaseTexture, BlendMode, BufferId, NodeBase, ShaderId, TextureId,
        TransformableNode, UniformLocation,
    };
    use crate::tilemap::{quad_geometry, Pose};

    use super::*;

    fn host() -> RecordingHost {
        RecordingHost::new(Viewport::new(800.0, 600.0))
    }

    fn node(w: u32, h: u32) -> TilemapNode {
        TilemapNode::new(Rc::new(BaseTexture::checkerboard(w, h, 4, [255; 4], [0; 4])))
    }

    fn geometry_bytes(w: f32, h: f32) -> Vec<u8> {
        bytemuck::cast_slice(&quad_geometry(w, h)).to_vec()
    }

    /// Calls shared by every draw once resources and texture are in place.
    fn steady_frame(model: Mat3, texture: TextureId, geometry: Vec<u8>) -> Vec<Call> {
        vec![
            Call::BatchStop,
            Call::SetShader(ShaderId(1)),
            Call::SetBlendMode(BlendMode::Normal),
            Call::UniformMatrix3(UniformLocation(0), Mat3::projection(800.0, 600.0)),
            Call::UniformI32(UniformLocation(2), 0),
            Call::ActiveTexture(0),
            Call::UniformMatrix3(UniformLocation(1), model),
            Call::BindTexture(texture),
            Call::BindBuffer(BufferTarget::Array, BufferId(1)),
            Call::BufferData(BufferTarget::Array, geometry, BufferUsage::Static),
            Call::VertexAttribPointer(AttribLocation(0), AttribLayout::packed_f32(4)),
            Call::EnableVertexAttribArray(AttribLocation(0)),
            Call::DrawArrays(Topology::TriangleStrip, 0, 4),
            Call::BatchStart,
        ]
    }

    #[test]
    fn first_draw_initializes_then_uploads_texture() {
        let mut host = host();
        let mut n = node(64, 32);
        n.update_transform(&NodeBase::new());

        n.render(&mut host.session());

        let geometry = geometry_bytes(64.0, 32.0);
        assert_eq!(
            host.take_calls(),
            vec![
                Call::BatchStop,
                Call::CreateBuffer(BufferId(1)),
                Call::CreateBuffer(BufferId(2)),
                Call::CreateBuffer(BufferId(3)),
                Call::CreateBuffer(BufferId(4)),
                Call::BindBuffer(BufferTarget::Array, BufferId(1)),
                Call::BufferData(BufferTarget::Array, geometry.clone(), BufferUsage::Static),
                Call::SetShader(ShaderId(1)),
                Call::SetBlendMode(BlendMode::Normal),
                Call::UniformMatrix3(UniformLocation(0), Mat3::projection(800.0, 600.0)),
                Call::UniformI32(UniformLocation(2), 0),
                Call::ActiveTexture(0),
                Call::UniformMatrix3(UniformLocation(1), Mat3::IDENTITY),
                Call::UpdateTexture,
                Call::CreateTexture(TextureId(1)),
                Call::BindTexture(TextureId(1)),
                Call::TexImage2d(64, 32),
                Call::BindBuffer(BufferTarget::Array, BufferId(1)),
                Call::BufferData(BufferTarget::Array, geometry, BufferUsage::Static),
                Call::VertexAttribPointer(AttribLocation(0), AttribLayout::packed_f32(4)),
                Call::EnableVertexAttribArray(AttribLocation(0)),
                Call::DrawArrays(Topology::TriangleStrip, 0, 4),
                Call::BatchStart,
            ]
        );
        assert!(n.resources().is_initialized());
        assert!(!n.is_dirty());
    }

    #[test]
    fn later_draws_are_identical_and_allocate_nothing() {
        let mut host = host();
        let mut n = node(64, 32);
        n.update_transform(&NodeBase::new());
        n.render(&mut host.session());
        host.take_calls();

        n.render(&mut host.session());
        let second = host.take_calls();
        n.render(&mut host.session());
        let third = host.take_calls();

        assert_eq!(second, third);
        assert_eq!(
            second,
            steady_frame(Mat3::IDENTITY, TextureId(1), geometry_bytes(64.0, 32.0))
        );
        assert!(!second.iter().any(|c| matches!(c, Call::CreateBuffer(_))));
    }

    #[test]
    fn hidden_or_transparent_node_makes_no_calls() {
        let mut host = host();

        let mut n = node(8, 8);
        n.base_mut().visible = false;
        n.render(&mut host.session());
        assert!(host.take_calls().is_empty());
        assert!(!n.resources().is_initialized());

        for alpha in [0.0, -0.5, f32::NEG_INFINITY] {
            let mut n = node(8, 8);
            n.base_mut().alpha = alpha;
            n.update_transform(&NodeBase::new());
            n.render(&mut host.session());
            assert!(host.take_calls().is_empty(), "alpha {alpha} drew");
            assert!(!n.resources().is_initialized());
        }
    }

    #[test]
    fn stale_texture_is_reuploaded_through_the_uploader() {
        let mut host = host();
        let mut n = node(8, 8);
        n.render(&mut host.session());
        host.take_calls();

        n.texture().mark_stale();
        n.render(&mut host.session());
        let calls = host.take_calls();

        let upload = calls
            .iter()
            .position(|c| *c == Call::UpdateTexture)
            .expect("stale texture goes through the uploader");
        assert_eq!(calls[upload + 1], Call::BindTexture(TextureId(1)));
        assert_eq!(calls[upload + 2], Call::TexImage2d(8, 8));
        assert!(!calls.iter().any(|c| matches!(c, Call::CreateTexture(_))));
        assert!(!n.texture().is_stale(host.context_id()));
    }

    #[test]
    fn blend_mode_is_forwarded() {
        let mut host = host();
        let mut n = node(8, 8);
        n.set_blend_mode(BlendMode::Add);
        n.render(&mut host.session());
        assert!(host.take_calls().contains(&Call::SetBlendMode(BlendMode::Add)));
    }

    #[test]
    fn context_loss_reallocates_buffers() {
        let mut host = host();
        let mut n = node(8, 8);
        n.render(&mut host.session());
        n.on_context_lost();
        assert!(n.is_dirty());
        host.take_calls();

        n.render(&mut host.session());
        let created = host
            .take_calls()
            .into_iter()
            .filter(|c| matches!(c, Call::CreateBuffer(_)))
            .count();
        assert_eq!(created, 4);
    }

    #[test]
    fn end_to_end_posed_quad_on_800x600() {
        let mut host = host();
        let mut n = node(64, 32);
        n.set_pose(Pose {
            position: Vec2::new(10.0, 20.0),
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
        });
        n.update_transform(&NodeBase::new());
        n.render(&mut host.session());
        n.render(&mut host.session());

        let calls = host.take_calls();
        let uploads: Vec<&Mat3> = calls
            .iter()
            .filter_map(|c| match c {
                Call::UniformMatrix3(_, m) => Some(m),
                _ => None,
            })
            .collect();
        assert_eq!(uploads.len(), 4);

        let projection = uploads[0];
        assert!((projection.m[0] - 0.0025).abs() < 1e-6);
        assert!((projection.m[4] + 2.0 / 600.0).abs() < 1e-6);
        assert_eq!(projection.m[8], 1.0);
        assert_eq!((projection.m[6], projection.m[7]), (-1.0, 1.0));

        let model = uploads[1];
        assert_eq!(
            model.cols(),
            [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [10.0, 20.0, 1.0]]
        );

        let geometry = geometry_bytes(64.0, 32.0);
        let data_uploads = calls
            .iter()
            .filter(|c| matches!(c, Call::BufferData(_, bytes, _) if *bytes == geometry))
            .count();
        // one initial upload plus one per frame
        assert_eq!(data_uploads, 3);

        let draws = calls
            .iter()
            .filter(|c| **c == Call::DrawArrays(Topology::TriangleStrip, 0, 4))
            .count();
        assert_eq!(draws, 2);

        assert_eq!(
            n.vertices(),
            [
                Vec2::new(0.0, 32.0),
                Vec2::new(0.0, 0.0),
                Vec2::new(64.0, 32.0),
                Vec2::new(64.0, 0.0),
            ]
        );
    }
}
