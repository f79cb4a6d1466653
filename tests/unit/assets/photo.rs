use super::*;
use crate::foundation::core::Canvas;
use image::Rgb;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Solid color per file name; names starting with "bad" fail to load.
struct SolidSource;

impl ImageSource for SolidSource {
    fn load_and_fit(&self, path: &Path, width: u32, height: u32) -> MosaicResult<RgbImage> {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if name.starts_with("bad") {
            return Err(MosaicError::validation(format!("cannot read {name}")));
        }
        let v = name.len() as u8 * 10;
        Ok(RgbImage::from_pixel(width, height, Rgb([v, v, v])))
    }
}

struct BlackMask;

impl MaskSource for BlackMask {
    fn load_mask(&self, _path: &Path, width: u32, height: u32) -> MosaicResult<Rgb32FImage> {
        Ok(Rgb32FImage::from_pixel(width, height, Rgb([0.0, 0.0, 0.0])))
    }
}

/// Black mask that remembers the size it was asked for.
struct SizeRecordingMask {
    requested: std::cell::Cell<Option<(u32, u32)>>,
}

impl MaskSource for SizeRecordingMask {
    fn load_mask(&self, _path: &Path, width: u32, height: u32) -> MosaicResult<Rgb32FImage> {
        self.requested.set(Some((width, height)));
        Ok(Rgb32FImage::from_pixel(width, height, Rgb([0.0, 0.0, 0.0])))
    }
}

struct MissingMask;

impl MaskSource for MissingMask {
    fn load_mask(&self, path: &Path, _width: u32, _height: u32) -> MosaicResult<Rgb32FImage> {
        Err(MosaicError::validation(format!("no mask at {}", path.display())))
    }
}

fn layout_2x1() -> GridLayout {
    GridLayout::plan(
        Canvas {
            width: 200,
            height: 100,
        },
        100,
        30,
        150,
    )
    .unwrap()
}

#[test]
fn blend_weights_photo_and_mask() {
    let photo = RgbImage::from_pixel(2, 2, Rgb([200, 100, 0]));
    let mask = Rgb32FImage::from_pixel(2, 2, Rgb([0.0, 1.0, 1.0]));
    let out = blend_mask(&photo, &mask, 0.5);
    // Truncated, not rounded.
    assert_eq!(out.get_pixel(0, 0).0, [100, 177, 127]);

    assert_eq!(blend_mask(&photo, &mask, 0.0), photo);
}

#[test]
fn blend_resizes_truncated_regions() {
    let photo = RgbImage::from_pixel(4, 4, Rgb([0, 0, 0]));
    let mask = Rgb32FImage::from_pixel(2, 4, Rgb([1.0, 1.0, 1.0]));
    let out = blend_mask(&photo, &mask, 1.0);
    assert_eq!(out.dimensions(), (4, 4));
    assert!(out.get_pixel(3, 3).0.iter().all(|&c| c >= 254));

    let empty = Rgb32FImage::new(0, 0);
    assert_eq!(blend_mask(&photo, &empty, 1.0), photo);
}

#[test]
fn prepare_shares_buffers_of_duplicated_photos() {
    let layout = layout_2x1();
    let mut rng = StdRng::seed_from_u64(1);
    let assignment = SlotAssignment::fill(1, layout.slot_count(), &mut rng).unwrap();
    let paths = vec![PathBuf::from("a.png")];

    let store = PhotoStore::prepare(&paths, &assignment, &layout, &SolidSource, None).unwrap();
    assert_eq!(store.len(), 2);
    let (a, b) = (store.get(0).unwrap(), store.get(1).unwrap());
    assert!(Arc::ptr_eq(&a.plain, &b.plain));
    // No mask: the masked variant is the plain one.
    assert!(Arc::ptr_eq(&a.plain, &a.masked));
    assert_eq!(a.plain.dimensions(), (100, 100));
}

#[test]
fn unreadable_photo_becomes_white_placeholder() {
    let layout = layout_2x1();
    let mut rng = StdRng::seed_from_u64(2);
    let assignment = SlotAssignment::fill(2, layout.slot_count(), &mut rng).unwrap();
    let paths = vec![PathBuf::from("good.png"), PathBuf::from("bad.png")];

    let store = PhotoStore::prepare(&paths, &assignment, &layout, &SolidSource, None).unwrap();
    assert_eq!(store.get(0).unwrap().plain.get_pixel(0, 0).0, [80, 80, 80]);
    assert!(store.get(1).unwrap().plain.pixels().all(|p| p.0 == [255, 255, 255]));
}

#[test]
fn mask_is_blended_into_every_slot() {
    let layout = layout_2x1();
    let mut rng = StdRng::seed_from_u64(3);
    let assignment = SlotAssignment::fill(2, layout.slot_count(), &mut rng).unwrap();
    let paths = vec![PathBuf::from("ab.png"), PathBuf::from("abc.png")];
    let mask = MaskInput {
        source: &BlackMask,
        path: Path::new("bg.png"),
        alpha: 1.0,
    };

    let store =
        PhotoStore::prepare(&paths, &assignment, &layout, &SolidSource, Some(mask)).unwrap();
    for slot in 0..2 {
        let p = store.get(slot).unwrap();
        assert!(p.masked.pixels().all(|px| px.0 == [0, 0, 0]));
        assert_ne!(p.plain, p.masked);
    }
}

#[test]
fn missing_mask_becomes_white() {
    let layout = layout_2x1();
    let mut rng = StdRng::seed_from_u64(4);
    let assignment = SlotAssignment::fill(2, layout.slot_count(), &mut rng).unwrap();
    let paths = vec![PathBuf::from("a.png"), PathBuf::from("b.png")];
    let mask = MaskInput {
        source: &MissingMask,
        path: Path::new("missing.png"),
        alpha: 1.0,
    };

    let store =
        PhotoStore::prepare(&paths, &assignment, &layout, &SolidSource, Some(mask)).unwrap();
    assert!(store.get(0).unwrap().masked.pixels().all(|px| px.0 == [255, 255, 255]));
}

#[test]
fn assignment_must_match_paths_and_grid() {
    let layout = layout_2x1();
    let bad_count = SlotAssignment {
        sources: vec![0],
        duplicated: 0,
        truncated: 0,
    };
    let paths = vec![PathBuf::from("a.png")];
    assert!(PhotoStore::prepare(&paths, &bad_count, &layout, &SolidSource, None).is_err());

    let bad_index = SlotAssignment {
        sources: vec![0, 3],
        duplicated: 0,
        truncated: 0,
    };
    assert!(matches!(
        PhotoStore::prepare(&paths, &bad_index, &layout, &SolidSource, None),
        Err(MosaicError::Layout(_))
    ));
}

#[test]
fn mask_covers_the_canvas_on_a_cropped_grid() {
    let layout = GridLayout::plan(
        Canvas {
            width: 101,
            height: 103,
        },
        50,
        30,
        150,
    )
    .unwrap();
    assert!(!layout.exact);
    assert_eq!((layout.columns, layout.rows, layout.cell_size), (2, 2, 50));

    let mut rng = StdRng::seed_from_u64(5);
    let assignment = SlotAssignment::fill(1, layout.slot_count(), &mut rng).unwrap();
    let paths = vec![PathBuf::from("a.png")];
    let recorder = SizeRecordingMask {
        requested: std::cell::Cell::new(None),
    };
    let mask = MaskInput {
        source: &recorder,
        path: Path::new("bg.png"),
        alpha: 1.0,
    };

    let store =
        PhotoStore::prepare(&paths, &assignment, &layout, &SolidSource, Some(mask)).unwrap();
    assert_eq!(recorder.requested.get(), Some((101, 103)));
    let last = store.get(3).unwrap();
    assert_eq!(last.masked.dimensions(), (50, 50));
    assert!(last.masked.pixels().all(|px| px.0 == [0, 0, 0]));
}
