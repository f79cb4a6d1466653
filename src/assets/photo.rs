use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::{Rgb32FImage, RgbImage};
use rayon::prelude::*;

use crate::assets::source::{ImageSource, MaskSource, white_mask};
use crate::foundation::error::{MosaicError, MosaicResult};
use crate::layout::grid::{GridLayout, SlotAssignment};
use crate::render::raster;

/// Cached buffers of one grid slot.
#[derive(Clone, Debug)]
pub struct PreparedPhoto {
    /// Photo fitted to the cell.
    pub plain: Arc<RgbImage>,
    /// Photo blended with its slice of the background mask.
    pub masked: Arc<RgbImage>,
}

/// Blend `photo * (1 - alpha) + region * alpha`.
///
/// A region that does not match the photo (truncated at the canvas edge) is resized first; an
/// empty region leaves the photo unchanged.
pub fn blend_mask(photo: &RgbImage, region: &Rgb32FImage, alpha: f64) -> RgbImage {
    if region.width() == 0 || region.height() == 0 {
        return photo.clone();
    }
    let resized;
    let region = if region.dimensions() == photo.dimensions() {
        region
    } else {
        resized = imageops::resize(region, photo.width(), photo.height(), FilterType::Triangle);
        &resized
    };

    let alpha = alpha.clamp(0.0, 1.0) as f32;
    let mut out = photo.clone();
    for (d, m) in out.iter_mut().zip(region.as_raw().iter()) {
        let v = (f32::from(*d) / 255.0) * (1.0 - alpha) + m.clamp(0.0, 1.0) * alpha;
        *d = (v * 255.0) as u8;
    }
    out
}

/// Where the masked variants come from.
pub struct MaskInput<'a> {
    /// Mask loader.
    pub source: &'a dyn MaskSource,
    /// Background image path.
    pub path: &'a Path,
    /// Blend weight of the mask.
    pub alpha: f64,
}

/// Per-slot photo buffers, built once before rendering.
#[derive(Clone, Debug, Default)]
pub struct PhotoStore {
    photos: Vec<PreparedPhoto>,
}

impl PhotoStore {
    /// Wrap already prepared slots.
    pub fn from_prepared(photos: Vec<PreparedPhoto>) -> Self {
        Self { photos }
    }

    /// Load every assigned photo and build the masked variant of every slot.
    ///
    /// A photo that cannot be loaded becomes a white cell and a missing mask becomes a white
    /// mask; neither aborts preparation.
    #[tracing::instrument(skip_all, fields(sources = paths.len(), slots = assignment.len()))]
    pub fn prepare(
        paths: &[PathBuf],
        assignment: &SlotAssignment,
        layout: &GridLayout,
        images: &dyn ImageSource,
        mask: Option<MaskInput<'_>>,
    ) -> MosaicResult<Self> {
        assignment.ensure_fills(layout.slot_count())?;
        let cell = layout.cell_size;

        let mut used: Vec<usize> = assignment.sources.clone();
        used.sort_unstable();
        used.dedup();
        if let Some(&bad) = used.iter().find(|&&i| i >= paths.len()) {
            return Err(MosaicError::layout(format!(
                "slot assignment references photo {bad}, only {} available",
                paths.len()
            )));
        }

        let loaded: Vec<(usize, Arc<RgbImage>)> = used
            .par_iter()
            .map(|&i| (i, Arc::new(load_or_placeholder(images, &paths[i], cell))))
            .collect();
        let mut plain_by_source: Vec<Option<Arc<RgbImage>>> = vec![None; paths.len()];
        for (i, img) in loaded {
            plain_by_source[i] = Some(img);
        }

        let mask_image = mask.as_ref().map(|m| {
            let (w, h) = (layout.canvas.width, layout.canvas.height);
            m.source.load_mask(m.path, w, h).unwrap_or_else(|e| {
                tracing::warn!(path = %m.path.display(), error = %e, "mask unreadable, using white mask");
                white_mask(w, h)
            })
        });

        let mut photos = Vec::with_capacity(assignment.len());
        for (slot, &src) in assignment.sources.iter().enumerate() {
            let plain = plain_by_source[src]
                .clone()
                .ok_or_else(|| MosaicError::layout(format!("photo {src} was not loaded")))?;
            let masked = match (&mask, &mask_image) {
                (Some(m), Some(full)) => {
                    let (x, y) = layout.positions[slot];
                    let region = m.source.extract_region(full, x, y, cell, cell);
                    Arc::new(blend_mask(&plain, &region, m.alpha))
                }
                _ => plain.clone(),
            };
            photos.push(PreparedPhoto { plain, masked });
        }

        tracing::info!(
            slots = photos.len(),
            unique = used.len(),
            masked = mask_image.is_some(),
            "photos prepared"
        );
        Ok(Self { photos })
    }

    /// Buffers of `slot`.
    pub fn get(&self, slot: usize) -> Option<&PreparedPhoto> {
        self.photos.get(slot)
    }

    /// Number of prepared slots.
    pub fn len(&self) -> usize {
        self.photos.len()
    }

    /// Return `true` when nothing was prepared.
    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }
}

fn load_or_placeholder(images: &dyn ImageSource, path: &Path, cell: u32) -> RgbImage {
    match images.load_and_fit(path, cell, cell) {
        Ok(img) if img.dimensions() == (cell, cell) => img,
        Ok(img) => {
            tracing::warn!(
                path = %path.display(),
                got = ?img.dimensions(),
                cell,
                "image source returned the wrong size, using placeholder"
            );
            raster::white(cell, cell)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "image unreadable, using placeholder");
            raster::white(cell, cell)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/photo.rs"]
mod tests;
