use std::path::Path;

use anyhow::{Context, Result};
use quadmap_engine::host::BaseTexture;

const CHECKER_LIGHT: [u8; 4] = [0xe0, 0xd8, 0xc8, 0xff];
const CHECKER_DARK: [u8; 4] = [0x4a, 0x6c, 0x6f, 0xff];

fn decode(path: &Path) -> Result<(u32, u32, Vec<u8>)> {
    let img = image::open(path)
        .with_context(|| format!("failed to decode texture {}", path.display()))?
        .to_rgba8();

    let (width, height) = img.dimensions();
    anyhow::ensure!(width > 0 && height > 0, "texture {} is empty", path.display());

    Ok((width, height, img.into_raw()))
}

/// Decodes an image file into an RGBA8 texture.
pub fn load(path: &Path) -> Result<BaseTexture> {
    let (width, height, rgba) = decode(path)?;
    log::info!("loaded {} ({width}x{height})", path.display());
    Ok(BaseTexture::from_rgba(width, height, rgba))
}

/// Re-reads `path` into `texture`, marking its device copies stale.
///
/// The image must keep the texture's dimensions; the quad is sized once.
pub fn reload(path: &Path, texture: &BaseTexture) -> Result<()> {
    let (width, height, rgba) = decode(path)?;
    anyhow::ensure!(
        (width, height) == (texture.width(), texture.height()),
        "{} is now {width}x{height}, expected {}x{}",
        path.display(),
        texture.width(),
        texture.height()
    );
    anyhow::ensure!(texture.set_pixels(rgba), "pixel buffer size mismatch");

    log::info!("reloaded {}", path.display());
    Ok(())
}

/// Texture used when no file is given.
pub fn checkerboard() -> BaseTexture {
    BaseTexture::checkerboard(256, 128, 16, CHECKER_LIGHT, CHECKER_DARK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_error() {
        let err = load(Path::new("does/not/exist.png")).err().map(|e| e.to_string());
        assert_eq!(
            err.as_deref(),
            Some("failed to decode texture does/not/exist.png")
        );
    }

    fn write_png(name: &str, width: u32, height: u32, texel: [u8; 4]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("quadmap-{}-{name}.png", std::process::id()));
        image::RgbaImage::from_pixel(width, height, image::Rgba(texel))
            .save(&path)
            .expect("write test png");
        path
    }

    #[test]
    fn reload_replaces_pixels_and_marks_stale() {
        use quadmap_engine::host::{ContextId, TextureId};

        let path = write_png("reload", 2, 1, [10, 20, 30, 255]);
        let t = load(&path).expect("load");
        t.mark_uploaded(ContextId(1), TextureId(1));

        write_png("reload", 2, 1, [200, 100, 50, 255]);
        reload(&path, &t).expect("reload");

        assert!(t.is_stale(ContextId(1)));
        t.with_pixels(|px| assert_eq!(&px[0..4], &[200, 100, 50, 255]));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn reload_rejects_resized_image() {
        let path = write_png("resized", 2, 1, [0, 0, 0, 255]);
        let t = load(&path).expect("load");

        write_png("resized", 4, 4, [0, 0, 0, 255]);
        let err = reload(&path, &t).err().map(|e| e.to_string());
        assert!(err.is_some_and(|e| e.ends_with("is now 4x4, expected 2x1")));
        t.with_pixels(|px| assert_eq!(px.len(), 8));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn checkerboard_is_wider_than_tall() {
        let t = checkerboard();
        assert_eq!((t.width(), t.height()), (256, 128));
    }
}
