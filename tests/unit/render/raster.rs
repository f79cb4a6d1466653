use super::*;

fn solid(w: u32, h: u32, rgb: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(w, h, Rgb(rgb))
}

#[test]
fn crossfade_endpoints_and_midpoint() {
    let a = solid(2, 2, [0, 100, 200]);
    let b = solid(2, 2, [200, 100, 0]);
    assert_eq!(crossfade(&a, &b, 0.0).unwrap(), a);
    assert_eq!(crossfade(&a, &b, 1.0).unwrap(), b);
    let mid = crossfade(&a, &b, 0.5).unwrap();
    assert_eq!(mid.get_pixel(0, 0).0, [100, 100, 100]);
}

#[test]
fn crossfade_rejects_size_mismatch() {
    let a = solid(2, 2, [0; 3]);
    let b = solid(3, 2, [0; 3]);
    assert!(matches!(
        crossfade(&a, &b, 0.5),
        Err(MosaicError::Validation(_))
    ));
}

#[test]
fn fade_moves_toward_white() {
    let mut img = solid(1, 1, [0, 0, 0]);
    fade_toward_white(&mut img, 1.0);
    assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0]);

    fade_toward_white(&mut img, 0.0);
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255]);

    let mut img = solid(1, 1, [0, 0, 0]);
    fade_toward_white(&mut img, 0.5);
    let v = img.get_pixel(0, 0).0[0];
    assert!((126..=128).contains(&v), "{v}");
}

#[test]
fn scale_resizes_about_size() {
    let img = solid(10, 10, [50, 60, 70]);
    assert_eq!(scale(&img, 1.0), img);
    assert_eq!(scale(&img, 2.5).dimensions(), (25, 25));
    assert_eq!(scale(&img, 0.01).dimensions(), (1, 1));
    assert_eq!(scale(&img, 2.0).get_pixel(10, 10).0, [50, 60, 70]);
}

#[test]
fn rotation_expands_to_bounding_box() {
    let img = solid(10, 20, [0, 0, 0]);
    assert_eq!(rotate_expand(&img, 0.0).dimensions(), (10, 20));
    let quarter = rotate_expand(&img, 90.0);
    assert_eq!(quarter.dimensions(), (20, 10));

    let tilted = rotate_expand(&solid(56, 56, [0, 0, 0]), 45.0);
    // 56 * sqrt(2) = 79.19...
    assert_eq!(tilted.dimensions(), (79, 79));
    // Corners are uncovered and read white; the center is the photo.
    assert_eq!(tilted.get_pixel(0, 0).0, [255, 255, 255]);
    assert_eq!(tilted.get_pixel(39, 39).0, [0, 0, 0]);
}

#[test]
fn rotation_direction_is_counter_clockwise_on_screen() {
    // Red marker in the top-right corner of a white square.
    let mut img = white(21, 21);
    for y in 0..5 {
        for x in 16..21 {
            img.put_pixel(x, y, Rgb([255, 0, 0]));
        }
    }
    let r = rotate_expand(&img, 90.0);
    assert_eq!(r.dimensions(), (21, 21));
    // A counter-clockwise quarter turn moves top-right to top-left.
    assert_eq!(r.get_pixel(2, 2).0, [255, 0, 0]);
    assert_eq!(r.get_pixel(18, 2).0, [255, 255, 255]);
}

#[test]
fn opaque_paste_is_clipped() {
    let mut dst = white(4, 4);
    let src = solid(3, 3, [1, 2, 3]);
    paste(&mut dst, &src, -1, 2, PasteMode::Opaque);
    assert_eq!(dst.get_pixel(0, 2).0, [1, 2, 3]);
    assert_eq!(dst.get_pixel(1, 3).0, [1, 2, 3]);
    assert_eq!(dst.get_pixel(2, 2).0, [255, 255, 255]);
    assert_eq!(dst.get_pixel(0, 1).0, [255, 255, 255]);

    // Fully outside is a no-op.
    let before = dst.clone();
    paste(&mut dst, &src, 10, 10, PasteMode::Opaque);
    paste(&mut dst, &src, -3, 0, PasteMode::Opaque);
    assert_eq!(dst, before);
}

#[test]
fn skip_near_white_keeps_canvas_under_white_pixels() {
    let mut dst = solid(3, 1, [9, 9, 9]);
    let mut src = white(3, 1);
    src.put_pixel(0, 0, Rgb([249, 255, 255]));
    src.put_pixel(1, 0, Rgb([250, 250, 250]));
    src.put_pixel(2, 0, Rgb([0, 0, 0]));
    paste(&mut dst, &src, 0, 0, PasteMode::SkipNearWhite);
    assert_eq!(dst.get_pixel(0, 0).0, [249, 255, 255]);
    assert_eq!(dst.get_pixel(1, 0).0, [9, 9, 9]);
    assert_eq!(dst.get_pixel(2, 0).0, [0, 0, 0]);
}

#[test]
fn outline_surrounds_the_rect() {
    let mut dst = white(6, 6);
    outline(&mut dst, 1, 1, 3, 3, BORDER_GRAY);
    assert_eq!(*dst.get_pixel(0, 0), BORDER_GRAY);
    assert_eq!(*dst.get_pixel(4, 4), BORDER_GRAY);
    assert_eq!(*dst.get_pixel(2, 0), BORDER_GRAY);
    assert_eq!(*dst.get_pixel(2, 2), WHITE);
    assert_eq!(*dst.get_pixel(5, 5), WHITE);

    // Clipped at the edge without panicking.
    let mut edge = white(3, 3);
    outline(&mut edge, 0, 0, 3, 3, BORDER_GRAY);
    assert_eq!(edge, white(3, 3));
}
