use super::device::{BlendFactor, ContextId, DeviceContext};

/// Blend mode of a renderable node.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    #[default]
    Normal,
    Add,
    Multiply,
    Screen,
}

impl BlendMode {
    /// Source/destination factors for premultiplied-alpha color.
    pub fn factors(self) -> (BlendFactor, BlendFactor) {
        match self {
            BlendMode::Normal => (BlendFactor::One, BlendFactor::OneMinusSrcAlpha),
            BlendMode::Add => (BlendFactor::SrcAlpha, BlendFactor::One),
            BlendMode::Multiply => (BlendFactor::DstColor, BlendFactor::OneMinusSrcAlpha),
            BlendMode::Screen => (BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcColor),
        }
    }
}

/// Host blend-mode state.
pub trait BlendModeStack {
    /// Applies `mode`. Returns `false` when it was already active.
    fn set_blend_mode(&mut self, device: &mut dyn DeviceContext, mode: BlendMode) -> bool;
}

/// Tracks the active mode per device context.
#[derive(Debug, Default)]
pub struct BlendModeManager {
    current: Option<(ContextId, BlendMode)>,
}

impl BlendModeManager {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlendModeStack for BlendModeManager {
    fn set_blend_mode(&mut self, device: &mut dyn DeviceContext, mode: BlendMode) -> bool {
        let current = Some((device.id(), mode));
        if self.current == current {
            return false;
        }
        self.current = current;
        let (src, dst) = mode.factors();
        device.blend_func(src, dst);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Viewport;
    use crate::host::recording::{Call, RecordingDevice};

    #[test]
    fn applies_factors_only_on_change() {
        let (mut device, log) = RecordingDevice::new(Viewport::new(1.0, 1.0));
        let mut blend = BlendModeManager::new();

        assert!(blend.set_blend_mode(&mut device, BlendMode::Normal));
        assert!(!blend.set_blend_mode(&mut device, BlendMode::Normal));
        assert!(blend.set_blend_mode(&mut device, BlendMode::Add));

        assert_eq!(
            *log.borrow(),
            vec![
                Call::BlendFunc(BlendFactor::One, BlendFactor::OneMinusSrcAlpha),
                Call::BlendFunc(BlendFactor::SrcAlpha, BlendFactor::One),
            ]
        );
        assert_eq!(blend.current.map(|(_, mode)| mode), Some(BlendMode::Add));
    }

    #[test]
    fn new_context_gets_blend_func_again() {
        let (mut first, _) = RecordingDevice::new(Viewport::new(1.0, 1.0));
        let (mut second, log) =
            RecordingDevice::with_context(Viewport::new(1.0, 1.0), ContextId(2));
        let mut blend = BlendModeManager::new();

        assert!(blend.set_blend_mode(&mut first, BlendMode::Normal));
        assert!(blend.set_blend_mode(&mut second, BlendMode::Normal));
        assert_eq!(
            *log.borrow(),
            vec![Call::BlendFunc(BlendFactor::One, BlendFactor::OneMinusSrcAlpha)]
        );
    }
}
