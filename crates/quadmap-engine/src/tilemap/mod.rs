//! Tilemap node: one texture-mapped quad sized to its texture.
//!
//! - `geometry`: the 16-float interleaved position/uv strip
//! - `resources`: lazily created device buffers
//! - `draw`: the per-frame draw protocol against a [`RenderSession`](crate::host::RenderSession)
//! - `bounds`: world-space axis-aligned bounds

mod bounds;
mod draw;
mod geometry;
mod node;
mod resources;

pub use bounds::transformed_bounds;
pub use geometry::{local_vertices, quad_geometry, FLOATS_PER_VERTEX, QUAD_FLOATS, QUAD_VERTEX_COUNT};
pub use node::{Pose, TilemapNode};
pub use resources::{GpuResources, QuadBuffers};
