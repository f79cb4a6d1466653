//! photo-mosaic renders a photo-mosaic wave animation as a video.
//!
//! Photos fly in from the canvas edges in overlapping waves, settle into a grid, hold as a static
//! mosaic, then fly back out. The public API is session-oriented:
//!
//! - Load a [`MosaicConfig`] and list photos with [`scan_photos`]
//! - Create a [`RenderSession`] (plans the grid, waves and motions, then loads every photo)
//! - Render single frames or stream the whole video into a [`FrameSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

pub(crate) mod animation;
/// Mosaic configuration.
pub mod config;
/// Encoding sinks.
pub mod encode;
pub(crate) mod layout;
pub(crate) mod plan;
pub(crate) mod render;
pub(crate) mod schedule;
/// Session-oriented rendering API.
pub mod session;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange, Point};
pub use crate::foundation::error::{MosaicError, MosaicResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::motion::{
    Direction, FadeRamp, MotionProfile, MotionSample, Phase, PhotoMotion, ScaleCategory,
};
pub use crate::assets::photo::{MaskInput, PhotoStore, PreparedPhoto, blend_mask};
pub use crate::assets::scan::{PHOTO_EXTENSIONS, is_photo, scan_photos};
pub use crate::assets::source::{FsImageSource, FsMaskSource, ImageSource, MaskSource};
pub use crate::config::{FitMode, MosaicConfig, ScaleConfig, WaveSizeBucket};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::layout::grid::{GridLayout, SlotAssignment};
pub use crate::plan::mosaic::{MosaicPlan, PhotoRecord};
pub use crate::plan::summary::{CategoryCounts, PhaseSummary, PlanSummary, WaveSummary};
pub use crate::render::compositor::{DrawCommand, FrameCompositor, draw_photo};
pub use crate::schedule::timeline::{Timeline, TimelineFrame, TimelinePhase};
pub use crate::schedule::wave::{
    Wave, WaveSchedule, WaveSizeDistribution, WaveState, partition_waves,
};
pub use crate::session::render_session::{RenderSession, RenderSessionOpts, RenderStats};
