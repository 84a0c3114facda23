//! Logo asset loading.
//!
//! Decodes the logo, optionally paints it white (so the multiply tint
//! produces the pure overlay hue whatever the artwork's colors), and scales
//! it to a fixed fraction of the primary monitor's width.

use crate::error::Result;
use crate::tint::LogoImage;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, RgbaImage};
use std::path::Path;

/// How to prepare the decoded logo.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogoOptions {
    /// Width of the primary monitor in pixels.
    pub primary_width: u32,
    /// Logo width is `primary_width / scale_divisor`.
    pub scale_divisor: u32,
    pub whiten: bool,
}

/// Load, whiten and scale the logo at `path`.
pub fn load_logo(path: &Path, opts: LogoOptions) -> Result<LogoImage> {
    let decoded = ImageReader::open(path)?.decode()?;
    tracing::info!(
        "Loaded logo {} ({}x{})",
        path.display(),
        decoded.width(),
        decoded.height()
    );
    Ok(prepare_logo(decoded, opts))
}

/// Whiten and scale an already decoded image.
pub fn prepare_logo(img: DynamicImage, opts: LogoOptions) -> LogoImage {
    let mut rgba = img.to_rgba8();
    if opts.whiten {
        whiten(&mut rgba);
    }

    let (width, height) = scaled_size(rgba.width(), rgba.height(), opts);
    let scaled = if (width, height) == rgba.dimensions() {
        rgba
    } else {
        image::imageops::resize(&rgba, width, height, FilterType::Lanczos3)
    };
    LogoImage::new(scaled)
}

/// Set every pixel's color to white, keeping its alpha.
pub fn whiten(img: &mut RgbaImage) {
    for pixel in img.pixels_mut() {
        pixel[0] = 255;
        pixel[1] = 255;
        pixel[2] = 255;
    }
}

/// Target logo size: width from the monitor, height keeping aspect ratio
/// (truncated). Never smaller than 1x1.
pub fn scaled_size(src_width: u32, src_height: u32, opts: LogoOptions) -> (u32, u32) {
    let target_w = (opts.primary_width / opts.scale_divisor.max(1)).max(1);
    let scale = target_w as f64 / src_width.max(1) as f64;
    let target_h = ((src_height as f64 * scale) as u32).max(1);
    (target_w, target_h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use image::Rgba;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::TempDir;

    fn opts(primary_width: u32, whiten: bool) -> LogoOptions {
        LogoOptions {
            primary_width,
            scale_divisor: 6,
            whiten,
        }
    }

    #[rstest]
    #[case(1920, 400, 200, (320, 160))]
    #[case(2560, 1000, 444, (426, 189))]
    #[case(1366, 227, 100, (227, 100))]
    #[case(3, 50, 50, (1, 1))]
    fn scaled_size_keeps_aspect(
        #[case] primary: u32,
        #[case] w: u32,
        #[case] h: u32,
        #[case] expected: (u32, u32),
    ) {
        assert_eq!(scaled_size(w, h, opts(primary, true)), expected);
    }

    #[test]
    fn whiten_keeps_alpha() {
        let mut img = RgbaImage::from_fn(3, 1, |x, _| Rgba([10, 20, 30, (x * 100) as u8]));
        whiten(&mut img);
        assert_eq!(img.get_pixel(0, 0), &Rgba([255, 255, 255, 0]));
        assert_eq!(img.get_pixel(1, 0), &Rgba([255, 255, 255, 100]));
        assert_eq!(img.get_pixel(2, 0), &Rgba([255, 255, 255, 200]));
    }

    #[test]
    fn prepare_without_whiten_keeps_colors() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(6, 2, Rgba([1, 2, 3, 255])));
        let logo = prepare_logo(img, opts(36, false));
        assert_eq!((logo.width(), logo.height()), (6, 2));
        assert_eq!(logo.pixels().get_pixel(0, 0), &Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn load_logo_from_png() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("logo.png");
        RgbaImage::from_pixel(40, 20, Rgba([0, 0, 200, 255]))
            .save(&path)
            .unwrap();

        let logo = load_logo(&path, opts(1200, true)).unwrap();

        assert_eq!((logo.width(), logo.height()), (200, 100));
        let center = logo.pixels().get_pixel(100, 50);
        assert_eq!([center[0], center[1], center[2]], [255, 255, 255]);
    }

    #[test]
    fn missing_logo_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_logo(&tmp.path().join("nope.png"), opts(1920, true)).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn corrupt_logo_is_image_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("logo.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let err = load_logo(&path, opts(1920, true)).unwrap_err();
        assert!(matches!(err, Error::Image(_)));
    }
}
