use crate::host::{BufferId, BufferTarget, BufferUsage, DeviceContext};

use super::geometry::QUAD_FLOATS;

/// Device buffers owned by one tilemap node.
///
/// Only `position` is populated; `index`, `uv` and `color` are allocated
/// alongside it and reserved.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct QuadBuffers {
    pub position: BufferId,
    pub index: BufferId,
    pub uv: BufferId,
    pub color: BufferId,
}

/// Lazily created device resources: `None` until the first draw.
#[derive(Debug, Default)]
pub struct GpuResources {
    buffers: Option<QuadBuffers>,
}

impl GpuResources {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.buffers.is_some()
    }

    /// Returns the node's buffers, allocating them and uploading `geometry`
    /// (static hint) on the first call only.
    pub fn ensure(
        &mut self,
        device: &mut dyn DeviceContext,
        geometry: &[f32; QUAD_FLOATS],
    ) -> QuadBuffers {
        if let Some(buffers) = self.buffers {
            return buffers;
        }

        let buffers = QuadBuffers {
            position: device.create_buffer(),
            index: device.create_buffer(),
            uv: device.create_buffer(),
            color: device.create_buffer(),
        };

        device.bind_buffer(BufferTarget::Array, buffers.position);
        device.buffer_data(
            BufferTarget::Array,
            bytemuck::cast_slice(geometry),
            BufferUsage::Static,
        );

        log::debug!("tilemap buffers created on {:?}: {:?}", device.id(), buffers);

        self.buffers = Some(buffers);
        buffers
    }

    /// Drops the handles without touching the device (the context that owned
    /// them is gone). The next draw allocates again.
    pub fn invalidate(&mut self) {
        self.buffers = None;
    }
}
