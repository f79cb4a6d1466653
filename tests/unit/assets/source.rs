use super::*;
use image::Rgb;

struct NoopMasks;

impl MaskSource for NoopMasks {
    fn load_mask(&self, _path: &Path, width: u32, height: u32) -> MosaicResult<Rgb32FImage> {
        Ok(white_mask(width, height))
    }
}

fn two_tone(w: u32, h: u32) -> RgbImage {
    RgbImage::from_fn(w, h, |x, _| {
        if x < w / 2 {
            Rgb([255, 0, 0])
        } else {
            Rgb([0, 0, 255])
        }
    })
}

#[test]
fn cover_fills_the_cell() {
    let img = RgbImage::from_pixel(200, 100, Rgb([10, 20, 30]));
    let out = fit_cover(&img, 56, 56);
    assert_eq!(out.dimensions(), (56, 56));
    assert!(out.pixels().all(|p| p.0 == [10, 20, 30]));
}

#[test]
fn cover_crops_the_center() {
    // Wide image: the left and right thirds are cropped away.
    let img = RgbImage::from_fn(300, 100, |x, _| {
        if (100..200).contains(&x) {
            Rgb([0, 255, 0])
        } else {
            Rgb([0, 0, 0])
        }
    });
    let out = fit_cover(&img, 50, 50);
    assert_eq!(out.get_pixel(25, 25).0, [0, 255, 0]);
}

#[test]
fn contain_letterboxes_on_white() {
    let img = RgbImage::from_pixel(200, 100, Rgb([0, 0, 0]));
    let out = fit_contain(&img, 100, 100);
    assert_eq!(out.dimensions(), (100, 100));
    assert_eq!(out.get_pixel(50, 50).0, [0, 0, 0]);
    assert_eq!(out.get_pixel(50, 5).0, [255, 255, 255]);
    assert_eq!(out.get_pixel(50, 95).0, [255, 255, 255]);
}

#[test]
fn contain_never_upscales() {
    let img = RgbImage::from_pixel(10, 10, Rgb([0, 0, 0]));
    let out = fit_contain(&img, 40, 40);
    assert_eq!(out.get_pixel(20, 20).0, [0, 0, 0]);
    assert_eq!(out.get_pixel(5, 5).0, [255, 255, 255]);
}

#[test]
fn extract_region_truncates_at_mask_edge() {
    let mask = white_mask(100, 60);
    let masks = NoopMasks;
    assert_eq!(masks.extract_region(&mask, 10, 10, 20, 20).dimensions(), (20, 20));
    assert_eq!(masks.extract_region(&mask, 90, 50, 20, 20).dimensions(), (10, 10));
}

#[test]
fn fs_source_decodes_and_fits() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photo.png");
    two_tone(64, 32).save(&path).unwrap();

    let cover = FsImageSource::new(FitMode::Cover)
        .load_and_fit(&path, 16, 16)
        .unwrap();
    assert_eq!(cover.dimensions(), (16, 16));
    let contain = FsImageSource::new(FitMode::Contain)
        .load_and_fit(&path, 16, 16)
        .unwrap();
    assert_eq!(contain.get_pixel(8, 0).0, [255, 255, 255]);
}

#[test]
fn fs_source_reports_unreadable_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.jpg");
    std::fs::write(&path, b"not an image").unwrap();
    let src = FsImageSource::default();
    assert!(src.load_and_fit(&path, 16, 16).is_err());
    assert!(src.load_and_fit(&dir.path().join("missing.png"), 16, 16).is_err());
    assert!(src.load_and_fit(&path, 0, 16).is_err());
}

#[test]
fn fs_mask_normalizes_channels() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mask.png");
    RgbImage::from_pixel(8, 8, Rgb([255, 0, 255])).save(&path).unwrap();

    let mask = FsMaskSource.load_mask(&path, 4, 4).unwrap();
    assert_eq!(mask.dimensions(), (4, 4));
    let p = mask.get_pixel(1, 1).0;
    assert!((p[0] - 1.0).abs() < 1e-4);
    assert!(p[1].abs() < 1e-4);
    assert!(FsMaskSource.load_mask(&dir.path().join("missing.png"), 4, 4).is_err());
}
