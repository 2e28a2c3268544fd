//! quadmap engine crate.
//!
//! A tilemap scene-graph node that draws one texture-sized quad through a
//! host renderer, plus the wgpu/winit runtime that hosts it.
//!
//! - [`tilemap`]: the node, its geometry, device resources and bounds
//! - [`host`]: traits the node consumes (device context, managers, base node)
//! - [`render`]: the wgpu implementation of the device context

pub mod coords;
pub mod host;
pub mod tilemap;

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod render;
