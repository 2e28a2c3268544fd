use bytemuck::{Pod, Zeroable};

use super::{Vec2, Viewport};

/// Column-major 3x3 matrix, laid out exactly as a `mat3` uniform upload expects.
///
/// Element `m[col * 3 + row]`. Translation lives in `m[6]`, `m[7]`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Mat3 {
    pub m: [f32; 9],
}

impl Mat3 {
    pub const IDENTITY: Mat3 = Mat3 {
        m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    };

    #[inline]
    pub const fn from_array(m: [f32; 9]) -> Self {
        Self { m }
    }

    /// Maps top-left-origin pixel coordinates of a `width` x `height` surface
    /// to clip space, flipping Y: `(0, 0) -> (-1, 1)`, `(w, h) -> (1, -1)`.
    ///
    /// Both dimensions must be positive; this is not checked.
    pub fn projection(width: f32, height: f32) -> Self {
        Self::from_array([
            2.0 / width,
            0.0,
            0.0,
            0.0,
            -2.0 / height,
            0.0,
            -1.0,
            1.0,
            1.0,
        ])
    }

    /// Projection for the current drawing surface.
    #[inline]
    pub fn for_viewport(viewport: Viewport) -> Self {
        Self::projection(viewport.width, viewport.height)
    }

    /// 2D affine model matrix from a pose.
    ///
    /// Rotation-scale block `[c*sx, -s*sy, s*sx, c*sy]` (column-major), translation `(x, y)`.
    pub fn model(x: f32, y: f32, angle_radians: f32, scale_x: f32, scale_y: f32) -> Self {
        let (s, c) = angle_radians.sin_cos();
        Self::from_array([
            c * scale_x,
            -s * scale_y,
            0.0,
            s * scale_x,
            c * scale_y,
            0.0,
            x,
            y,
            1.0,
        ])
    }

    /// Columns as `[[m0, m1, m2], [m3, m4, m5], [m6, m7, m8]]`.
    #[inline]
    pub fn cols(&self) -> [[f32; 3]; 3] {
        let m = &self.m;
        [[m[0], m[1], m[2]], [m[3], m[4], m[5]], [m[6], m[7], m[8]]]
    }

    /// Columns padded to 16 bytes each (WGSL `mat3x3<f32>` uniform layout).
    #[inline]
    pub fn to_padded_cols(&self) -> [[f32; 4]; 3] {
        let [c0, c1, c2] = self.cols();
        [
            [c0[0], c0[1], c0[2], 0.0],
            [c1[0], c1[1], c1[2], 0.0],
            [c2[0], c2[1], c2[2], 0.0],
        ]
    }

    /// Applies the matrix to the homogeneous point `(p.x, p.y, 1)`.
    #[inline]
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        let m = &self.m;
        Vec2::new(
            m[0] * p.x + m[3] * p.y + m[6],
            m[1] * p.x + m[4] * p.y + m[7],
        )
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}
