use core::ops::Mul;

use super::{Mat3, Vec2};

/// 2D affine transform in scene-graph form.
///
/// Maps `(x, y)` to `(a*x + c*y + tx, b*x + d*y + ty)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Affine {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Affine {
    pub const IDENTITY: Affine = Affine::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    #[inline]
    pub const fn new(a: f32, b: f32, c: f32, d: f32, tx: f32, ty: f32) -> Self {
        Self { a, b, c, d, tx, ty }
    }

    #[inline]
    pub const fn translation(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Reads the affine part of a column-major `Mat3`.
    #[inline]
    pub fn from_mat3(m: &Mat3) -> Self {
        Self::new(m.m[0], m.m[1], m.m[3], m.m[4], m.m[6], m.m[7])
    }

    #[inline]
    pub fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.a * p.x + self.c * p.y + self.tx,
            self.d * p.y + self.b * p.x + self.ty,
        )
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// `parent * local`: applies `local` first, then `parent`.
impl Mul for Affine {
    type Output = Affine;

    fn mul(self, local: Affine) -> Affine {
        let p = self;
        Affine {
            a: p.a * local.a + p.c * local.b,
            b: p.b * local.a + p.d * local.b,
            c: p.a * local.c + p.c * local.d,
            d: p.b * local.c + p.d * local.d,
            tx: p.a * local.tx + p.c * local.ty + p.tx,
            ty: p.b * local.tx + p.d * local.ty + p.ty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_leaves_points_alone() {
        let p = Vec2::new(3.5, -2.0);
        assert_eq!(Affine::IDENTITY.apply(p), p);
    }

    #[test]
    fn apply_mixes_axes_through_b_and_c() {
        let m = Affine::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        // x' = a*x + c*y + tx, y' = d*y + b*x + ty
        assert_eq!(m.apply(Vec2::new(1.0, 1.0)), Vec2::new(9.0, 12.0));
    }

    #[test]
    fn composition_applies_local_first() {
        let parent = Affine::new(2.0, 0.0, 0.0, 2.0, 10.0, 0.0);
        let local = Affine::translation(1.0, 1.0);
        let world = parent * local;
        let p = Vec2::new(0.0, 0.0);
        assert_eq!(world.apply(p), parent.apply(local.apply(p)));
        assert_eq!(world.apply(p), Vec2::new(12.0, 2.0));
    }

    #[test]
    fn from_mat3_agrees_with_mat3_transform() {
        let m = Mat3::model(4.0, 9.0, 0.3, 2.0, 0.5);
        let a = Affine::from_mat3(&m);
        let p = Vec2::new(1.25, -7.0);
        let (lhs, rhs) = (a.apply(p), m.transform_point(p));
        assert!((lhs.x - rhs.x).abs() < 1e-5 && (lhs.y - rhs.y).abs() < 1e-5);
    }
}
