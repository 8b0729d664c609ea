use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::ColorImage;

// ---------------------------------------------------------------------------
// PNG export of a screenshot region
// ---------------------------------------------------------------------------

/// Write an egui screenshot (or a region cut from one) as a PNG file.
pub fn save_png(image: &ColorImage, path: &Path) -> Result<()> {
    let [width, height] = image.size;
    let bytes: Vec<u8> = image.pixels.iter().flat_map(|c| c.to_array()).collect();
    let buffer = image::RgbaImage::from_raw(width as u32, height as u32, bytes)
        .context("screenshot buffer does not match its size")?;
    buffer
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!("Saved {width}x{height} plot to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_a_readable_png() {
        let rgba: Vec<u8> = [255, 0, 0, 255].repeat(6);
        let image = ColorImage::from_rgba_unmultiplied([3, 2], &rgba);
        let path = std::env::temp_dir().join(format!("rusty_fit_export_{}.png", std::process::id()));

        save_png(&image, &path).unwrap();
        let decoded = image::open(&path).unwrap().to_rgba8();
        std::fs::remove_file(&path).ok();

        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn reports_unwritable_paths() {
        let image = ColorImage::from_rgba_unmultiplied([1, 1], &[0, 0, 0, 255]);
        let err = save_png(&image, Path::new("/nonexistent-dir/plot.png")).unwrap_err();
        assert!(format!("{err:#}").contains("writing /nonexistent-dir/plot.png"));
    }
}
