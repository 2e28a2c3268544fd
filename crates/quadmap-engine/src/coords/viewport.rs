use winit::dpi::PhysicalSize;

/// Drawing-surface size in pixels.
///
/// The projection matrix maps this rectangle (top-left origin) onto clip space.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Drawing buffer of a surface configured at `size`.
    #[inline]
    pub fn from_physical(size: PhysicalSize<u32>) -> Self {
        Self::new(size.width as f32, size.height as f32)
    }

    /// Both sides positive and finite (a minimized window is not).
    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_physical_keeps_device_pixels() {
        let v = Viewport::from_physical(PhysicalSize::new(2560, 1440));
        assert_eq!(v, Viewport::new(2560.0, 1440.0));
        assert!(v.is_valid());
    }

    #[test]
    fn minimized_surface_is_invalid() {
        assert!(!Viewport::from_physical(PhysicalSize::new(0, 720)).is_valid());
        assert!(!Viewport::new(f32::NAN, 1.0).is_valid());
    }
}
