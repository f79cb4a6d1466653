//! RGB8 raster primitives used by the compositor.
//!
//! Everything here works on `image::RgbImage` (tightly packed RGB8, row-major). The canvas is
//! opaque white; "transparency" is realized by fading pixels toward white.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

use crate::foundation::core::{Affine, Canvas, Point};
use crate::foundation::error::{MosaicError, MosaicResult};
use crate::foundation::math::{mix_u8, unit_to_u8_weight};

/// Canvas background.
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
/// Color of the thin border drawn around photos at rest.
pub const BORDER_GRAY: Rgb<u8> = Rgb([220, 220, 220]);
/// Rotated pixels are only copied when some channel is below this value.
pub const NEAR_WHITE_THRESHOLD: u8 = 250;

/// Solid white buffer.
pub fn white(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, WHITE)
}

/// Linear blend `a * (1 - t) + b * t`.
pub fn crossfade(a: &RgbImage, b: &RgbImage, t: f64) -> MosaicResult<RgbImage> {
    if a.dimensions() != b.dimensions() {
        return Err(MosaicError::validation(format!(
            "crossfade expects equal-size buffers, got {:?} and {:?}",
            a.dimensions(),
            b.dimensions()
        )));
    }
    let w = unit_to_u8_weight(t);
    let mut out = a.clone();
    for (d, s) in out.iter_mut().zip(b.as_raw().iter()) {
        *d = mix_u8(*d, *s, w);
    }
    Ok(out)
}

/// Fade toward white in place: `pixel * opacity + 255 * (1 - opacity)`.
pub fn fade_toward_white(img: &mut RgbImage, opacity: f64) {
    let w = unit_to_u8_weight(opacity);
    if w == 255 {
        return;
    }
    for c in img.iter_mut() {
        *c = mix_u8(255, *c, w);
    }
}

/// Resample about the buffer size; `scale == 1` is a plain copy.
pub fn scale(img: &RgbImage, factor: f64) -> RgbImage {
    let (w, h) = img.dimensions();
    let nw = ((f64::from(w) * factor).round() as u32).max(1);
    let nh = ((f64::from(h) * factor).round() as u32).max(1);
    if (nw, nh) == (w, h) {
        return img.clone();
    }
    imageops::resize(img, nw, nh, FilterType::Triangle)
}

/// Rotate by `angle_deg` (counter-clockwise on screen) about the center.
///
/// The output grows to the rotated bounding box; uncovered corners are white.
pub fn rotate_expand(img: &RgbImage, angle_deg: f64) -> RgbImage {
    let (w, h) = img.dimensions();
    let (wf, hf) = (f64::from(w), f64::from(h));
    let rad = angle_deg.to_radians();
    let (sin, cos) = (rad.sin().abs(), rad.cos().abs());
    let nw = ((hf * sin + wf * cos) as u32).max(1);
    let nh = ((hf * cos + wf * sin) as u32).max(1);

    // Screen space is y-down, so a counter-clockwise turn is a negative kurbo rotation.
    let forward = Affine::translate((f64::from(nw) / 2.0, f64::from(nh) / 2.0))
        * Affine::rotate(-rad)
        * Affine::translate((-wf / 2.0, -hf / 2.0));
    let inverse = forward.inverse();

    let mut out = white(nw, nh);
    for (x, y, px) in out.enumerate_pixels_mut() {
        let src = inverse * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
        *px = sample_bilinear_white(img, src.x - 0.5, src.y - 0.5);
    }
    out
}

/// Bilinear sample where texels outside the image read as white.
fn sample_bilinear_white(img: &RgbImage, x: f64, y: f64) -> Rgb<u8> {
    let (w, h) = (i64::from(img.width()), i64::from(img.height()));
    if x <= -1.0 || y <= -1.0 || x >= w as f64 || y >= h as f64 {
        return WHITE;
    }
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let texel = |tx: i64, ty: i64| -> [f64; 3] {
        if tx < 0 || ty < 0 || tx >= w || ty >= h {
            return [255.0; 3];
        }
        let p = img.get_pixel(tx as u32, ty as u32).0;
        [f64::from(p[0]), f64::from(p[1]), f64::from(p[2])]
    };
    let p00 = texel(x0, y0);
    let p10 = texel(x0 + 1, y0);
    let p01 = texel(x0, y0 + 1);
    let p11 = texel(x0 + 1, y0 + 1);

    let mut out = [0u8; 3];
    for c in 0..3 {
        let top = p00[c] + (p10[c] - p00[c]) * fx;
        let bottom = p01[c] + (p11[c] - p01[c]) * fx;
        out[c] = (top + (bottom - top) * fy).round().clamp(0.0, 255.0) as u8;
    }
    Rgb(out)
}

/// How a buffer lands on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PasteMode {
    /// Overwrite every covered pixel.
    Opaque,
    /// Copy only pixels that are not near-white.
    SkipNearWhite,
}

/// Paste `src` with its top-left at `(x, y)`, clipped to `dst`.
pub fn paste(dst: &mut RgbImage, src: &RgbImage, x: i64, y: i64, mode: PasteMode) {
    let (dw, dh) = (i64::from(dst.width()), i64::from(dst.height()));
    let (sw, sh) = (i64::from(src.width()), i64::from(src.height()));

    let x_start = x.max(0);
    let y_start = y.max(0);
    let x_end = (x + sw).min(dw);
    let y_end = (y + sh).min(dh);
    if x_end <= x_start || y_end <= y_start {
        return;
    }

    let dst_stride = dw as usize * 3;
    let src_stride = sw as usize * 3;
    let run = (x_end - x_start) as usize * 3;
    let src_x = (x_start - x) as usize * 3;
    let dst_x = x_start as usize * 3;

    let src_raw = src.as_raw();
    let dst_raw: &mut [u8] = &mut *dst;
    for dy in y_start..y_end {
        let sy = (dy - y) as usize;
        let s = &src_raw[sy * src_stride + src_x..sy * src_stride + src_x + run];
        let d = &mut dst_raw[dy as usize * dst_stride + dst_x..dy as usize * dst_stride + dst_x + run];
        match mode {
            PasteMode::Opaque => d.copy_from_slice(s),
            PasteMode::SkipNearWhite => {
                for (dp, sp) in d.chunks_exact_mut(3).zip(s.chunks_exact(3)) {
                    if sp.iter().any(|&c| c < NEAR_WHITE_THRESHOLD) {
                        dp.copy_from_slice(sp);
                    }
                }
            }
        }
    }
}

/// One-pixel outline just outside a `w x h` rectangle at `(x, y)`, clipped to the canvas.
pub fn outline(dst: &mut RgbImage, x: i64, y: i64, w: u32, h: u32, color: Rgb<u8>) {
    let canvas = Canvas {
        width: dst.width(),
        height: dst.height(),
    };
    let (left, top) = (x - 1, y - 1);
    let (right, bottom) = (x + i64::from(w), y + i64::from(h));
    let mut put = |px: i64, py: i64| {
        if canvas.contains_rect(px, py, 1, 1) {
            dst.put_pixel(px as u32, py as u32, color);
        }
    };
    for px in left..=right {
        put(px, top);
        put(px, bottom);
    }
    for py in top..=bottom {
        put(left, py);
        put(right, py);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
