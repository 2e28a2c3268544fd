//! Coordinate, geometry and transform types shared by the tilemap core and
//! the GPU backend.
//!
//! Canonical CPU space:
//! - Pixels, origin top-left
//! - +X right, +Y down
//!
//! `Mat3` carries the column-major 3x3 matrices uploaded as shader uniforms;
//! `Affine` is the scene-graph world transform used for bounds.

mod affine;
mod color;
mod mat3;
mod rect;
mod vec2;
mod viewport;

pub use affine::Affine;
pub use color::ColorRgba;
pub use mat3::Mat3;
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
