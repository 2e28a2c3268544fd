use std::cell::RefCell;
use std::collections::HashMap;

use super::device::{ContextId, DeviceContext, TextureId};

/// Upload state of a texture on one device context.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextureUploadState {
    /// Never uploaded to this context.
    Pending,
    /// A device copy exists but is older than the source pixels.
    Stale(TextureId),
    /// The device copy matches the source pixels.
    Uploaded(TextureId),
}

impl TextureUploadState {
    #[inline]
    pub fn needs_upload(self) -> bool {
        !matches!(self, TextureUploadState::Uploaded(_))
    }

    #[inline]
    pub fn handle(self) -> Option<TextureId> {
        match self {
            TextureUploadState::Pending => None,
            TextureUploadState::Stale(id) | TextureUploadState::Uploaded(id) => Some(id),
        }
    }
}

/// Byte length of a tightly packed `width` x `height` RGBA8 image, `None`
/// when it does not fit in `usize`.
pub fn rgba_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|texels| texels.checked_mul(4))
}

/// Source image shared by every node that draws it.
///
/// Owns RGBA8 pixels plus one upload state per device context. Shared through
/// `Rc`; interior mutability makes it single-threaded by construction.
#[derive(Debug)]
pub struct BaseTexture {
    width: u32,
    height: u32,
    pixels: RefCell<Vec<u8>>,
    uploads: RefCell<HashMap<ContextId, TextureUploadState>>,
}

impl BaseTexture {
    /// Wraps tightly packed RGBA8 pixels. `rgba.len()` must be `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        debug_assert_eq!(Some(rgba.len()), rgba_len(width, height));
        Self {
            width,
            height,
            pixels: RefCell::new(rgba),
            uploads: RefCell::new(HashMap::new()),
        }
    }

    /// Two-color checkerboard with square cells of `cell` pixels.
    pub fn checkerboard(width: u32, height: u32, cell: u32, even: [u8; 4], odd: [u8; 4]) -> Self {
        let cell = cell.max(1);
        let mut rgba = Vec::with_capacity(rgba_len(width, height).unwrap_or(0));
        for y in 0..height {
            for x in 0..width {
                let texel = if (x / cell + y / cell) % 2 == 0 { even } else { odd };
                rgba.extend_from_slice(&texel);
            }
        }
        Self::from_rgba(width, height, rgba)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn upload_state(&self, ctx: ContextId) -> TextureUploadState {
        self.uploads
            .borrow()
            .get(&ctx)
            .copied()
            .unwrap_or(TextureUploadState::Pending)
    }

    #[inline]
    pub fn is_stale(&self, ctx: ContextId) -> bool {
        self.upload_state(ctx).needs_upload()
    }

    /// Device handle for `ctx`, only when the device copy is current.
    pub fn device_texture(&self, ctx: ContextId) -> Option<TextureId> {
        match self.upload_state(ctx) {
            TextureUploadState::Uploaded(id) => Some(id),
            _ => None,
        }
    }

    pub fn mark_uploaded(&self, ctx: ContextId, texture: TextureId) {
        self.uploads
            .borrow_mut()
            .insert(ctx, TextureUploadState::Uploaded(texture));
    }

    /// Marks every context's device copy as out of date.
    pub fn mark_stale(&self) {
        for state in self.uploads.borrow_mut().values_mut() {
            if let TextureUploadState::Uploaded(id) = *state {
                *state = TextureUploadState::Stale(id);
            }
        }
    }

    /// Replaces the source pixels and marks every device copy stale.
    ///
    /// Dimensions are fixed; a buffer of the wrong length is rejected.
    pub fn set_pixels(&self, rgba: Vec<u8>) -> bool {
        let expected = rgba_len(self.width, self.height);
        if expected != Some(rgba.len()) {
            log::warn!(
                "BaseTexture::set_pixels: expected {:?} bytes for {}x{}, got {}",
                expected,
                self.width,
                self.height,
                rgba.len()
            );
            return false;
        }
        *self.pixels.borrow_mut() = rgba;
        self.mark_stale();
        true
    }

    pub fn with_pixels<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        f(&self.pixels.borrow())
    }
}

/// Host entry point that (re)uploads a texture to a device context.
pub trait TextureUploader {
    /// Uploads `texture` to `device`, binds it on the active unit and marks it current.
    fn update_texture(&mut self, device: &mut dyn DeviceContext, texture: &BaseTexture);
}

/// Uploader that reuses an existing device handle when there is one.
#[derive(Debug, Default)]
pub struct TextureManager;

impl TextureManager {
    pub fn new() -> Self {
        Self
    }
}

impl TextureUploader for TextureManager {
    fn update_texture(&mut self, device: &mut dyn DeviceContext, texture: &BaseTexture) {
        let ctx = device.id();
        let handle = match texture.upload_state(ctx).handle() {
            Some(id) => id,
            None => {
                let id = device.create_texture();
                log::debug!(
                    "created device texture {:?} ({}x{}) on {:?}",
                    id,
                    texture.width(),
                    texture.height(),
                    ctx
                );
                id
            }
        };

        device.bind_texture(handle);
        texture.with_pixels(|rgba| device.tex_image_2d(texture.width(), texture.height(), rgba));
        texture.mark_uploaded(ctx, handle);
    }
}
