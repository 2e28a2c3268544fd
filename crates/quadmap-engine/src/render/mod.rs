//! GPU rendering backend.
//!
//! [`WgpuDevice`] implements the host [`DeviceContext`](crate::host::DeviceContext)
//! over wgpu: GL-style calls mutate host-side state, `draw_arrays` snapshots
//! that state, and [`WgpuDevice::flush`] replays the snapshots in one render pass.
//!
//! Convention:
//! - Geometry is in logical pixels (top-left origin, +Y down).
//! - The vertex shader applies `projection * model` from the uniform block.

mod ctx;
mod wgpu_device;

pub use ctx::{RenderCtx, RenderTarget};
pub use wgpu_device::{PendingDraw, WgpuDevice};
