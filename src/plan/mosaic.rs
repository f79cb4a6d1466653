use rand::Rng;
use rand::seq::SliceRandom;

use crate::animation::motion::PhotoMotion;
use crate::config::MosaicConfig;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{MosaicError, MosaicResult};
use crate::layout::grid::{GridLayout, SlotAssignment};
use crate::schedule::timeline::Timeline;
use crate::schedule::wave::{Wave, WaveSchedule, WaveSizeDistribution, partition_waves};

/// Immutable per-slot animation data.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PhotoRecord {
    /// Grid slot the photo rests in.
    pub slot: usize,
    /// Index of the source photo shown in this slot.
    pub source: usize,
    /// Motion parameters.
    pub motion: PhotoMotion,
}

/// Everything decided before the first frame: grid, slot sources, motions, waves and windows.
///
/// The same plan drives the entrance and the exit, so both halves share wave membership and
/// per-photo parameters.
#[derive(Clone, Debug, serde::Serialize)]
pub struct MosaicPlan {
    /// Output canvas.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Grid geometry.
    pub layout: GridLayout,
    /// Slot to source mapping.
    pub assignment: SlotAssignment,
    /// One record per slot, indexed by slot.
    pub photos: Vec<PhotoRecord>,
    /// Waves in schedule order.
    pub waves: Vec<Wave>,
    /// Frame windows of the waves.
    pub schedule: WaveSchedule,
    /// Frames of the static hold.
    pub hold_frames: u64,
    /// Draw borders around resting photos.
    pub border: bool,
}

impl MosaicPlan {
    /// Plan a mosaic of `photo_count` source photos.
    ///
    /// Random draws happen in a fixed order (slot fill, per-slot motion, shuffle, wave sizes), so
    /// the same seed always yields the same plan.
    #[tracing::instrument(skip(cfg, rng))]
    pub fn build(
        cfg: &MosaicConfig,
        photo_count: usize,
        rng: &mut impl Rng,
    ) -> MosaicResult<Self> {
        cfg.validate()?;

        let layout = GridLayout::plan(
            cfg.canvas,
            cfg.cell_size_hint,
            cfg.cell_search_min,
            cfg.cell_search_max,
        )?;
        let assignment = SlotAssignment::fill(photo_count, layout.slot_count(), rng)?;

        let mut photos = Vec::with_capacity(layout.slot_count());
        for (slot, &source) in assignment.sources.iter().enumerate() {
            let target = layout
                .slot_point(slot)
                .ok_or_else(|| MosaicError::layout(format!("slot {slot} has no grid position")))?;
            let motion = PhotoMotion::random(
                target,
                layout.cell_size,
                cfg.canvas,
                cfg.max_rotation_deg,
                &cfg.scale,
                rng,
            );
            tracing::trace!(
                slot,
                source,
                category = motion.category.label(),
                scale = motion.initial_scale,
                direction = ?motion.direction,
                "photo motion"
            );
            photos.push(PhotoRecord {
                slot,
                source,
                motion,
            });
        }

        let mut order: Vec<usize> = (0..photos.len()).collect();
        order.shuffle(rng);
        let sizes = WaveSizeDistribution::new(&cfg.wave_sizes)?;
        let waves = partition_waves(&order, &sizes, rng);
        let schedule = WaveSchedule::new(
            waves.len(),
            cfg.wave_duration_frames(),
            cfg.wave_delay_frames(),
        )?;

        tracing::info!(
            cell = layout.cell_size,
            columns = layout.columns,
            rows = layout.rows,
            exact = layout.exact,
            duplicated = assignment.duplicated,
            truncated = assignment.truncated,
            waves = waves.len(),
            "mosaic planned"
        );

        Ok(Self {
            canvas: cfg.canvas,
            fps: cfg.fps,
            layout,
            assignment,
            photos,
            waves,
            schedule,
            hold_frames: cfg.hold_frames(),
            border: cfg.border,
        })
    }

    /// Entrance/hold/exit lengths.
    pub fn timeline(&self) -> Timeline {
        let motion = self.schedule.total_frames();
        Timeline::new(motion, self.hold_frames, motion)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plan/mosaic.rs"]
mod tests;
