use crate::animation::motion::ScaleCategory;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{MosaicError, MosaicResult};
use crate::plan::mosaic::MosaicPlan;
use crate::schedule::timeline::TimelinePhase;

/// Window of one wave, as reported by [`PlanSummary`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct WaveSummary {
    /// Wave index.
    pub index: usize,
    /// Photos in the wave.
    pub size: usize,
    /// First frame (phase-local).
    pub start: u64,
    /// One past the last frame (phase-local).
    pub end: u64,
}

/// Photo counts per size category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct CategoryCounts {
    /// Normal photos.
    pub normal: usize,
    /// Featured photos.
    pub featured: usize,
    /// Giant photos.
    pub giant: usize,
}

/// Frame count and duration of one timeline phase.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PhaseSummary {
    /// Phase.
    pub phase: TimelinePhase,
    /// First global frame.
    pub start: u64,
    /// Frames in the phase.
    pub frames: u64,
    /// Duration in seconds.
    pub secs: f64,
}

/// Exact numbers of a planned video, printable as JSON.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PlanSummary {
    /// Output canvas.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Chosen cell edge.
    pub cell_size: u32,
    /// Grid columns.
    pub columns: u32,
    /// Grid rows.
    pub rows: u32,
    /// `true` when the cell divides the canvas exactly.
    pub exact_fit: bool,
    /// Number of slots.
    pub slots: usize,
    /// Slots showing a repeated photo.
    pub duplicated: usize,
    /// Photos left out because the grid is smaller.
    pub truncated: usize,
    /// Size category census.
    pub categories: CategoryCounts,
    /// Frames one wave animates for.
    pub wave_frames: u64,
    /// Frames between wave starts.
    pub delay_frames: u64,
    /// Frames shared by consecutive waves.
    pub overlap_frames: u64,
    /// Wave windows.
    pub waves: Vec<WaveSummary>,
    /// Entrance, hold and exit.
    pub phases: Vec<PhaseSummary>,
    /// Frames in the whole video.
    pub total_frames: u64,
    /// Duration of the whole video in seconds.
    pub total_secs: f64,
}

impl PlanSummary {
    /// Summarize `plan`.
    pub fn of(plan: &MosaicPlan) -> Self {
        let mut categories = CategoryCounts::default();
        for record in &plan.photos {
            match record.motion.category {
                ScaleCategory::Normal => categories.normal += 1,
                ScaleCategory::Featured => categories.featured += 1,
                ScaleCategory::Giant { .. } => categories.giant += 1,
            }
        }

        let waves = plan
            .waves
            .iter()
            .zip(plan.schedule.windows())
            .map(|(wave, window)| WaveSummary {
                index: wave.index,
                size: wave.members.len(),
                start: window.start.0,
                end: window.end.0,
            })
            .collect();

        let timeline = plan.timeline();
        let phases = TimelinePhase::PLAYBACK
            .iter()
            .map(|&phase| {
                let range = timeline.range(phase);
                PhaseSummary {
                    phase,
                    start: range.start.0,
                    frames: range.len_frames(),
                    secs: plan.fps.frames_to_secs(range.len_frames()),
                }
            })
            .collect();

        Self {
            canvas: plan.canvas,
            fps: plan.fps,
            cell_size: plan.layout.cell_size,
            columns: plan.layout.columns,
            rows: plan.layout.rows,
            exact_fit: plan.layout.exact,
            slots: plan.layout.slot_count(),
            duplicated: plan.assignment.duplicated,
            truncated: plan.assignment.truncated,
            categories,
            wave_frames: plan.schedule.wave_frames,
            delay_frames: plan.schedule.delay_frames,
            overlap_frames: plan.schedule.overlap_frames(),
            waves,
            phases,
            total_frames: timeline.total_frames(),
            total_secs: plan.fps.frames_to_secs(timeline.total_frames()),
        }
    }

    /// Pretty JSON rendering.
    pub fn to_json_pretty(&self) -> MosaicResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| MosaicError::serde(format!("serialize plan summary: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plan/summary.rs"]
mod tests;
