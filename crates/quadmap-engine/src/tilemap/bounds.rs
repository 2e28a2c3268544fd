use crate::coords::{Affine, Rect, Vec2};

/// Axis-aligned bounds of `vertices` under `m`.
///
/// `None` when no finite extent exists: no vertices, or a transform that
/// pushes a coordinate to infinity.
pub fn transformed_bounds(vertices: &[Vec2], m: &Affine) -> Option<Rect> {
    let mut min = Vec2::splat(f32::INFINITY);
    let mut max = Vec2::splat(f32::NEG_INFINITY);

    for &v in vertices {
        let p = m.apply(v);
        min = min.min(p);
        max = max.max(p);
    }

    let rect = Rect::from_min_max(min, max);
    rect.is_finite().then_some(rect)
}
