use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;

use crate::config::WaveSizeBucket;
use crate::foundation::core::{FrameIndex, FrameRange};
use crate::foundation::error::{MosaicError, MosaicResult};

/// A group of photos that animate together.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Wave {
    /// Position of the wave in the schedule (0-based).
    pub index: usize,
    /// Slot indices in draw order.
    pub members: Vec<usize>,
}

/// Weighted distribution over wave sizes.
#[derive(Clone, Debug)]
pub struct WaveSizeDistribution {
    buckets: Vec<WaveSizeBucket>,
    index: WeightedIndex<u32>,
}

impl WaveSizeDistribution {
    /// Build the distribution. Buckets need `1 <= min <= max` and at least one non-zero weight.
    pub fn new(buckets: &[WaveSizeBucket]) -> MosaicResult<Self> {
        if let Some(b) = buckets.iter().find(|b| b.min == 0 || b.min > b.max) {
            return Err(MosaicError::validation(format!(
                "invalid wave size bucket {}..={}",
                b.min, b.max
            )));
        }
        let index = WeightedIndex::new(buckets.iter().map(|b| b.weight))
            .map_err(|e| MosaicError::validation(format!("invalid wave size weights: {e}")))?;
        Ok(Self {
            buckets: buckets.to_vec(),
            index,
        })
    }

    /// Draw a bucket, then a uniform size inside it.
    pub fn sample(&self, rng: &mut impl Rng) -> usize {
        let bucket = self.buckets[self.index.sample(rng)];
        rng.random_range(bucket.min..=bucket.max)
    }
}

/// Cut `order` into consecutive waves of randomly drawn sizes.
///
/// The concatenation of all wave members equals `order`; only the last wave can come out smaller
/// than the size drawn for it.
pub fn partition_waves(
    order: &[usize],
    sizes: &WaveSizeDistribution,
    rng: &mut impl Rng,
) -> Vec<Wave> {
    let mut waves = Vec::new();
    let mut rest = order;
    while !rest.is_empty() {
        let take = sizes.sample(rng).clamp(1, rest.len());
        let (head, tail) = rest.split_at(take);
        waves.push(Wave {
            index: waves.len(),
            members: head.to_vec(),
        });
        rest = tail;
    }
    waves
}

/// Where a wave stands relative to a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WaveState {
    /// The wave's window has not started.
    Pending,
    /// The wave is animating.
    Active {
        /// Frames since the window started.
        local_frame: u64,
        /// `local_frame / wave_frames`, in `[0, 1)`.
        progress: f64,
    },
    /// The wave's window has ended.
    Finished,
}

/// Frame windows of every wave: wave `i` covers `[i * delay, i * delay + duration)`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct WaveSchedule {
    /// Frames one wave animates for.
    pub wave_frames: u64,
    /// Frames between consecutive wave starts.
    pub delay_frames: u64,
    windows: Vec<FrameRange>,
}

impl WaveSchedule {
    /// Lay out `wave_count` windows.
    pub fn new(wave_count: usize, wave_frames: u64, delay_frames: u64) -> MosaicResult<Self> {
        if wave_frames == 0 {
            return Err(MosaicError::validation("wave duration must be >= 1 frame"));
        }
        let windows = (0..wave_count as u64)
            .map(|k| {
                let start = k.saturating_mul(delay_frames);
                FrameRange {
                    start: FrameIndex(start),
                    end: FrameIndex(start.saturating_add(wave_frames)),
                }
            })
            .collect();
        Ok(Self {
            wave_frames,
            delay_frames,
            windows,
        })
    }

    /// Number of scheduled waves.
    pub fn wave_count(&self) -> usize {
        self.windows.len()
    }

    /// Window of wave `wave`.
    pub fn window(&self, wave: usize) -> Option<FrameRange> {
        self.windows.get(wave).copied()
    }

    /// All windows in wave order.
    pub fn windows(&self) -> &[FrameRange] {
        &self.windows
    }

    /// Length of the phase: the latest window end, not the sum of durations.
    pub fn total_frames(&self) -> u64 {
        self.windows.iter().map(|w| w.end.0).max().unwrap_or(0)
    }

    /// Classify wave `wave` at phase-local frame `frame`.
    pub fn state(&self, wave: usize, frame: u64) -> WaveState {
        let Some(w) = self.windows.get(wave) else {
            return WaveState::Finished;
        };
        if frame < w.start.0 {
            WaveState::Pending
        } else if frame < w.end.0 {
            let local_frame = frame - w.start.0;
            WaveState::Active {
                local_frame,
                progress: local_frame as f64 / self.wave_frames as f64,
            }
        } else {
            WaveState::Finished
        }
    }

    /// Frames shared by consecutive windows (0 when waves do not overlap).
    pub fn overlap_frames(&self) -> u64 {
        self.wave_frames.saturating_sub(self.delay_frames)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/wave.rs"]
mod tests;
