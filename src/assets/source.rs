use std::path::Path;

use anyhow::Context as _;
use image::imageops::{self, FilterType};
use image::{Rgb32FImage, RgbImage};

use crate::config::FitMode;
use crate::foundation::error::{MosaicError, MosaicResult};
use crate::render::raster;

/// Produces a fixed-size RGB buffer for a photo.
///
/// Implementations must be deterministic per call. Cropping policy is theirs.
pub trait ImageSource: Sync {
    /// Load `path` and fit it into exactly `width x height` pixels.
    fn load_and_fit(&self, path: &Path, width: u32, height: u32) -> MosaicResult<RgbImage>;
}

/// Produces the background image whose slices are blended into the photos.
pub trait MaskSource {
    /// Load `path` resized to the full canvas, channels normalized to `0.0..=1.0`.
    fn load_mask(&self, path: &Path, width: u32, height: u32) -> MosaicResult<Rgb32FImage>;

    /// Slice `w x h` at `(x, y)` out of a loaded mask, truncated at the mask edge.
    fn extract_region(&self, mask: &Rgb32FImage, x: u32, y: u32, w: u32, h: u32) -> Rgb32FImage {
        let x = x.min(mask.width());
        let y = y.min(mask.height());
        let w = w.min(mask.width() - x);
        let h = h.min(mask.height() - y);
        imageops::crop_imm(mask, x, y, w, h).to_image()
    }
}

/// Decodes photos from disk with the `image` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsImageSource {
    /// Cell fitting policy.
    pub fit: FitMode,
}

impl FsImageSource {
    /// Create a source with the given fit policy.
    pub fn new(fit: FitMode) -> Self {
        Self { fit }
    }
}

impl ImageSource for FsImageSource {
    fn load_and_fit(&self, path: &Path, width: u32, height: u32) -> MosaicResult<RgbImage> {
        if width == 0 || height == 0 {
            return Err(MosaicError::validation("target size must be non-zero"));
        }
        let img = image::open(path)
            .with_context(|| format!("decode image '{}'", path.display()))?
            .to_rgb8();
        Ok(match self.fit {
            FitMode::Cover => fit_cover(&img, width, height),
            FitMode::Contain => fit_contain(&img, width, height),
        })
    }
}

/// Scale to cover `width x height`, then center-crop.
pub fn fit_cover(img: &RgbImage, width: u32, height: u32) -> RgbImage {
    let (sw, sh) = img.dimensions();
    if sw == 0 || sh == 0 {
        return raster::white(width, height);
    }
    let s = (f64::from(width) / f64::from(sw)).max(f64::from(height) / f64::from(sh));
    let nw = ((f64::from(sw) * s).ceil() as u32).max(width);
    let nh = ((f64::from(sh) * s).ceil() as u32).max(height);
    let resized = imageops::resize(img, nw, nh, FilterType::Lanczos3);
    let x = (nw - width) / 2;
    let y = (nh - height) / 2;
    imageops::crop_imm(&resized, x, y, width, height).to_image()
}

/// Scale to fit inside `width x height` (never upscaling) and center on white.
pub fn fit_contain(img: &RgbImage, width: u32, height: u32) -> RgbImage {
    let (sw, sh) = img.dimensions();
    let mut out = raster::white(width, height);
    if sw == 0 || sh == 0 {
        return out;
    }
    let s = (f64::from(width) / f64::from(sw))
        .min(f64::from(height) / f64::from(sh))
        .min(1.0);
    let nw = ((f64::from(sw) * s).round() as u32).clamp(1, width);
    let nh = ((f64::from(sh) * s).round() as u32).clamp(1, height);
    let thumb = imageops::resize(img, nw, nh, FilterType::Lanczos3);
    imageops::overlay(
        &mut out,
        &thumb,
        i64::from((width - nw) / 2),
        i64::from((height - nh) / 2),
    );
    out
}

/// Reads the background mask from disk with the `image` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsMaskSource;

impl MaskSource for FsMaskSource {
    fn load_mask(&self, path: &Path, width: u32, height: u32) -> MosaicResult<Rgb32FImage> {
        let img = image::open(path)
            .with_context(|| format!("decode mask '{}'", path.display()))?
            .to_rgb8();
        let resized = imageops::resize(&img, width, height, FilterType::Lanczos3);
        Ok(image::DynamicImage::ImageRgb8(resized).to_rgb32f())
    }
}

/// White mask of the given shape, used when the real one cannot be read.
pub fn white_mask(width: u32, height: u32) -> Rgb32FImage {
    Rgb32FImage::from_pixel(width, height, image::Rgb([1.0, 1.0, 1.0]))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
