//! GPU device + surface management.
//!
//! - creates the wgpu Instance/Adapter/Device/Queue
//! - creates & configures the Surface (swapchain) for one window
//! - acquires frames and hands out encoders/views for the render backend

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
