//! Immutable render configuration.
//!
//! A [`MosaicConfig`] is built once (defaults, JSON file, CLI overrides), validated, and then passed
//! by reference into the planner, scheduler and compositor. Nothing reads configuration from
//! process-wide state.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{MosaicError, MosaicResult};

/// How a source photo is fitted into its square cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitMode {
    /// Scale to fill the cell and center-crop the overflow.
    #[default]
    Cover,
    /// Scale to fit inside the cell and letterbox on white.
    Contain,
}

/// One weighted bucket of the wave-size distribution (inclusive bounds).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WaveSizeBucket {
    /// Smallest wave size drawn from this bucket.
    pub min: usize,
    /// Largest wave size drawn from this bucket.
    pub max: usize,
    /// Relative weight of this bucket.
    pub weight: u32,
}

impl WaveSizeBucket {
    /// Convenience constructor.
    pub const fn new(min: usize, max: usize, weight: u32) -> Self {
        Self { min, max, weight }
    }
}

/// Center-weighted default: small and huge waves are rare, 16-20 is the most likely.
pub fn default_wave_sizes() -> Vec<WaveSizeBucket> {
    vec![
        WaveSizeBucket::new(1, 5, 5),
        WaveSizeBucket::new(6, 10, 10),
        WaveSizeBucket::new(11, 15, 15),
        WaveSizeBucket::new(16, 20, 20),
        WaveSizeBucket::new(21, 25, 15),
        WaveSizeBucket::new(26, 30, 10),
        WaveSizeBucket::new(31, 40, 5),
    ]
}

/// Population fractions and initial-scale ranges of the three size categories.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    /// Fraction of photos drawn as featured.
    pub featured_fraction: f64,
    /// Fraction of photos drawn as giant.
    pub giant_fraction: f64,
    /// Initial scale range `[min, max]` of normal photos.
    pub normal_range: [f64; 2],
    /// Initial scale range of featured photos.
    pub featured_range: [f64; 2],
    /// Initial scale range of giant photos.
    pub giant_range: [f64; 2],
    /// Scale at which a shrinking giant becomes fully opaque.
    pub giant_settle_scale: f64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            featured_fraction: 0.08,
            giant_fraction: 0.02,
            normal_range: [1.0, 1.6],
            featured_range: [2.0, 3.5],
            giant_range: [12.0, 18.0],
            giant_settle_scale: 8.0,
        }
    }
}

impl ScaleConfig {
    fn validate(&self) -> MosaicResult<()> {
        for (name, f) in [
            ("featured_fraction", self.featured_fraction),
            ("giant_fraction", self.giant_fraction),
        ] {
            if !(0.0..=1.0).contains(&f) {
                return Err(MosaicError::validation(format!(
                    "scale.{name} must be within [0, 1], got {f}"
                )));
            }
        }
        if self.featured_fraction + self.giant_fraction > 1.0 {
            return Err(MosaicError::validation(
                "scale.featured_fraction + scale.giant_fraction must be <= 1",
            ));
        }
        for (name, [lo, hi]) in [
            ("normal_range", self.normal_range),
            ("featured_range", self.featured_range),
            ("giant_range", self.giant_range),
        ] {
            if !lo.is_finite() || !hi.is_finite() || lo <= 0.0 || lo > hi {
                return Err(MosaicError::validation(format!(
                    "scale.{name} must satisfy 0 < min <= max, got [{lo}, {hi}]"
                )));
            }
        }
        if self.giant_fraction > 0.0
            && !(1.0..=self.giant_range[0]).contains(&self.giant_settle_scale)
        {
            return Err(MosaicError::validation(format!(
                "scale.giant_settle_scale must be within [1, giant_range.min], got {}",
                self.giant_settle_scale
            )));
        }
        Ok(())
    }
}

/// Full render configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MosaicConfig {
    /// Output canvas size.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Preferred cell edge length in pixels.
    pub cell_size_hint: u32,
    /// Smallest cell size tried by the divisor search.
    pub cell_search_min: u32,
    /// Largest cell size tried by the divisor search (inclusive).
    pub cell_search_max: u32,
    /// Seconds one wave takes to fly in (or out).
    pub wave_duration_secs: f64,
    /// Seconds between the starts of consecutive waves.
    pub wave_delay_secs: f64,
    /// Seconds the assembled mosaic is held between entrance and exit.
    pub hold_secs: f64,
    /// Weight of the background mask in the masked variant.
    pub mask_alpha: f64,
    /// Wave-size distribution.
    pub wave_sizes: Vec<WaveSizeBucket>,
    /// Size categories.
    pub scale: ScaleConfig,
    /// Largest absolute initial rotation in degrees.
    pub max_rotation_deg: f64,
    /// Draw a thin light-gray border around photos at rest.
    pub border: bool,
    /// How source photos are fitted into cells.
    pub fit: FitMode,
    /// RNG seed. `None` draws a fresh seed per run (logged for replay).
    pub seed: Option<u64>,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas {
                width: 1680,
                height: 1176,
            },
            fps: Fps::default(),
            cell_size_hint: 56,
            cell_search_min: 30,
            cell_search_max: 150,
            wave_duration_secs: 2.8,
            wave_delay_secs: 0.8,
            hold_secs: 3.0,
            mask_alpha: 0.70,
            wave_sizes: default_wave_sizes(),
            scale: ScaleConfig::default(),
            max_rotation_deg: 45.0,
            border: true,
            fit: FitMode::default(),
            seed: None,
        }
    }
}

impl MosaicConfig {
    /// Parse a config from a JSON reader. Missing fields take their defaults.
    pub fn from_reader<R: std::io::Read>(r: R) -> MosaicResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| MosaicError::serde(format!("parse mosaic config JSON: {e}")))
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> MosaicResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            MosaicError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check every field for values the planner cannot work with.
    pub fn validate(&self) -> MosaicResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(MosaicError::validation("canvas width/height must be > 0"));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        if self.cell_size_hint == 0 {
            return Err(MosaicError::validation("cell_size_hint must be > 0"));
        }
        if self.cell_search_min == 0 || self.cell_search_min > self.cell_search_max {
            return Err(MosaicError::validation(
                "cell search range must satisfy 0 < cell_search_min <= cell_search_max",
            ));
        }
        if !self.wave_duration_secs.is_finite() || self.wave_duration_secs <= 0.0 {
            return Err(MosaicError::validation("wave_duration_secs must be > 0"));
        }
        if self.fps.secs_to_frames_round(self.wave_duration_secs) == 0 {
            return Err(MosaicError::validation(
                "wave_duration_secs must cover at least one frame",
            ));
        }
        if !self.wave_delay_secs.is_finite() || self.wave_delay_secs < 0.0 {
            return Err(MosaicError::validation("wave_delay_secs must be >= 0"));
        }
        if !self.hold_secs.is_finite() || self.hold_secs < 0.0 {
            return Err(MosaicError::validation("hold_secs must be >= 0"));
        }
        if !(0.0..=1.0).contains(&self.mask_alpha) {
            return Err(MosaicError::validation("mask_alpha must be within [0, 1]"));
        }
        if !(0.0..=180.0).contains(&self.max_rotation_deg) {
            return Err(MosaicError::validation(
                "max_rotation_deg must be within [0, 180]",
            ));
        }
        validate_wave_sizes(&self.wave_sizes)?;
        self.scale.validate()
    }

    /// Frames one wave's animation spans.
    pub fn wave_duration_frames(&self) -> u64 {
        self.fps.secs_to_frames_round(self.wave_duration_secs)
    }

    /// Frames between the starts of consecutive waves.
    pub fn wave_delay_frames(&self) -> u64 {
        self.fps.secs_to_frames_round(self.wave_delay_secs)
    }

    /// Frames of the static hold.
    pub fn hold_frames(&self) -> u64 {
        self.fps.secs_to_frames_round(self.hold_secs)
    }
}

fn validate_wave_sizes(buckets: &[WaveSizeBucket]) -> MosaicResult<()> {
    if buckets.is_empty() {
        return Err(MosaicError::validation("wave_sizes must not be empty"));
    }
    for b in buckets {
        if b.min == 0 || b.min > b.max {
            return Err(MosaicError::validation(format!(
                "wave size bucket must satisfy 1 <= min <= max, got {}..={}",
                b.min, b.max
            )));
        }
    }
    if buckets.iter().all(|b| b.weight == 0) {
        return Err(MosaicError::validation(
            "at least one wave size bucket must have a non-zero weight",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
