//! Interleaved quad geometry.
//!
//! Layout, one vertex per row, triangle-strip order:
//!
//! ```text
//! idx   x  y   u  v
//!  0    l  b   0  1
//!  4    l  t   0  0
//!  8    r  b   1  1
//! 12    r  t   1  0
//! ```

use crate::coords::Vec2;

/// Floats per vertex: position (x, y) followed by uv (u, v).
pub const FLOATS_PER_VERTEX: usize = 4;

/// Vertices in the quad strip.
pub const QUAD_VERTEX_COUNT: u32 = 4;

/// Floats in the whole quad buffer.
pub const QUAD_FLOATS: usize = FLOATS_PER_VERTEX * QUAD_VERTEX_COUNT as usize;

/// Builds the quad covering `(0, 0)..(width, height)` with uv `(0, 0)..(1, 1)`.
pub fn quad_geometry(width: f32, height: f32) -> [f32; QUAD_FLOATS] {
    let (l, t) = (0.0, 0.0);
    let (r, b) = (l + width, t + height);

    [
        l, b, 0.0, 1.0, //
        l, t, 0.0, 0.0, //
        r, b, 1.0, 1.0, //
        r, t, 1.0, 0.0, //
    ]
}

/// Local-space (x, y) of each vertex, in buffer order.
pub fn local_vertices(geometry: &[f32; QUAD_FLOATS]) -> [Vec2; QUAD_VERTEX_COUNT as usize] {
    let at = |v: usize| Vec2::new(geometry[v * FLOATS_PER_VERTEX], geometry[v * FLOATS_PER_VERTEX + 1]);
    [at(0), at(1), at(2), at(3)]
}
