use rand::Rng;
use rand::seq::IndexedRandom;

use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::{MosaicError, MosaicResult};

/// Square-cell grid covering the canvas.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct GridLayout {
    /// Canvas the grid was planned for; residual pixels past the grid stay uncovered.
    pub canvas: Canvas,
    /// Cell edge length in pixels.
    pub cell_size: u32,
    /// Number of cells per row.
    pub columns: u32,
    /// Number of rows.
    pub rows: u32,
    /// `true` when `columns * cell_size` and `rows * cell_size` match the canvas exactly.
    pub exact: bool,
    /// Top-left pixel offset of every slot, row-major.
    pub positions: Vec<(u32, u32)>,
}

impl GridLayout {
    /// Plan a grid for `canvas`, preferring a cell size near `hint` that divides both dimensions.
    ///
    /// Sizes in `search_min..=search_max` are tried in ascending order; the closest exact divisor
    /// wins and the first one found wins ties. Without an exact divisor, the cell size comes from
    /// floor division of the width by the hint and the residual pixels are cropped.
    pub fn plan(canvas: Canvas, hint: u32, search_min: u32, search_max: u32) -> MosaicResult<Self> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(MosaicError::layout("canvas must have a non-zero area"));
        }
        if hint == 0 {
            return Err(MosaicError::layout("cell size hint must be > 0"));
        }

        let (cell_size, exact) = match best_exact_cell_size(canvas, hint, search_min, search_max)
        {
            Some(c) => (c, true),
            None => (fallback_cell_size(canvas, hint), false),
        };
        let columns = canvas.width / cell_size;
        let rows = canvas.height / cell_size;
        if columns == 0 || rows == 0 {
            return Err(MosaicError::layout(format!(
                "cell size {cell_size} does not fit a {}x{} canvas",
                canvas.width, canvas.height
            )));
        }

        let mut positions = Vec::with_capacity((columns as usize) * (rows as usize));
        for row in 0..rows {
            for col in 0..columns {
                positions.push((col * cell_size, row * cell_size));
            }
        }

        Ok(Self {
            canvas,
            cell_size,
            columns,
            rows,
            exact,
            positions,
        })
    }

    /// Number of slots to fill.
    pub fn slot_count(&self) -> usize {
        self.positions.len()
    }

    /// Top-left of `slot` as a floating-point point.
    pub fn slot_point(&self, slot: usize) -> Option<Point> {
        self.positions
            .get(slot)
            .map(|&(x, y)| Point::new(f64::from(x), f64::from(y)))
    }
}

fn best_exact_cell_size(canvas: Canvas, hint: u32, lo: u32, hi: u32) -> Option<u32> {
    let mut best: Option<(u32, u32)> = None;
    for size in lo.max(1)..=hi {
        if !canvas.width.is_multiple_of(size) || !canvas.height.is_multiple_of(size) {
            continue;
        }
        let diff = size.abs_diff(hint);
        if best.is_none_or(|(_, best_diff)| diff < best_diff) {
            best = Some((size, diff));
        }
    }
    best.map(|(size, _)| size)
}

fn fallback_cell_size(canvas: Canvas, hint: u32) -> u32 {
    let columns = (canvas.width / hint).max(1);
    (canvas.width / columns).min(canvas.height).max(1)
}

/// Mapping from grid slot to source-photo index (indices may repeat).
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SlotAssignment {
    /// `sources[slot]` is the index of the photo shown in `slot`.
    pub sources: Vec<usize>,
    /// How many slots were filled with duplicates.
    pub duplicated: usize,
    /// How many source photos were left out.
    pub truncated: usize,
}

impl SlotAssignment {
    /// Fill exactly `slots` slots from `photo_count` photos.
    ///
    /// Extra photos are dropped from the end; missing slots are filled with uniformly chosen
    /// originals.
    pub fn fill(photo_count: usize, slots: usize, rng: &mut impl Rng) -> MosaicResult<Self> {
        if photo_count == 0 {
            return Err(MosaicError::layout("no photos available to fill the grid"));
        }

        let mut sources: Vec<usize> = (0..photo_count.min(slots)).collect();
        let originals = sources.clone();
        let missing = slots.saturating_sub(photo_count);
        for _ in 0..missing {
            let pick = originals
                .choose(rng)
                .copied()
                .ok_or_else(|| MosaicError::layout("grid has no slots"))?;
            sources.push(pick);
        }

        let assignment = Self {
            sources,
            duplicated: missing,
            truncated: photo_count.saturating_sub(slots),
        };
        assignment.ensure_fills(slots)?;
        Ok(assignment)
    }

    /// Fail unless the assignment covers exactly `slots` slots.
    pub fn ensure_fills(&self, slots: usize) -> MosaicResult<()> {
        if self.sources.len() != slots {
            return Err(MosaicError::layout(format!(
                "slot assignment covers {} slots, grid has {slots}",
                self.sources.len()
            )));
        }
        Ok(())
    }

    /// Number of assigned slots.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Return `true` when no slot is assigned.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/grid.rs"]
mod tests;
