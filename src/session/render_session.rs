use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, mpsc};

use image::RgbImage;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::assets::photo::{MaskInput, PhotoStore};
use crate::assets::source::ImageSource;
use crate::config::MosaicConfig;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, FrameRange};
use crate::foundation::error::{MosaicError, MosaicResult};
use crate::plan::mosaic::MosaicPlan;
use crate::plan::summary::PlanSummary;
use crate::render::compositor::FrameCompositor;
use crate::schedule::timeline::{Timeline, TimelinePhase};

const MAX_REORDER_BUFFER_BYTES: u64 = 128 * 1024 * 1024;

/// Options controlling `RenderSession` range rendering behavior.
#[derive(Clone, Debug)]
pub struct RenderSessionOpts {
    /// Enable frame-level parallelism (rayon), using a dedicated thread pool.
    pub parallel: bool,
    /// Chunk size used by the render->encode streaming pipeline.
    pub chunk_size: usize,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Bounded channel capacity between render workers and the encoder thread.
    pub channel_capacity: usize,
    /// Log a progress line every this many delivered frames (0 disables).
    pub progress_every: u64,
}

impl Default for RenderSessionOpts {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
            channel_capacity: 4,
            progress_every: 100,
        }
    }
}

/// Range render statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Total frames in the requested range.
    pub frames_total: u64,
    /// Frames actually composed.
    pub frames_rendered: u64,
    /// Hold frames served from the shared static mosaic.
    pub frames_reused: u64,
    /// Entrance frames in the range.
    pub entrance_frames: u64,
    /// Hold frames in the range.
    pub hold_frames: u64,
    /// Exit frames in the range.
    pub exit_frames: u64,
}

/// Session-oriented renderer for a planned mosaic.
///
/// A session front-loads planning and photo preparation, then renders single frames or ranges as a
/// pure function of the frame index.
pub struct RenderSession {
    plan: MosaicPlan,
    photos: PhotoStore,
    seed: Option<u64>,
    opts: RenderSessionOpts,
}

impl RenderSession {
    /// Construct a session from an existing plan and its prepared photos.
    pub fn new(plan: MosaicPlan, photos: PhotoStore, opts: RenderSessionOpts) -> MosaicResult<Self> {
        FrameCompositor::new(&plan, &photos)?;
        Ok(Self {
            plan,
            photos,
            seed: None,
            opts,
        })
    }

    /// Plan the mosaic and load every photo.
    ///
    /// The seed comes from `cfg.seed` or is drawn fresh; either way it is logged so a run can be
    /// replayed.
    #[tracing::instrument(skip_all, fields(photos = paths.len()))]
    pub fn prepare(
        cfg: &MosaicConfig,
        paths: &[PathBuf],
        images: &dyn ImageSource,
        mask: Option<MaskInput<'_>>,
        opts: RenderSessionOpts,
    ) -> MosaicResult<Self> {
        let seed = cfg.seed.unwrap_or_else(rand::random);
        tracing::info!(seed, "planning mosaic");
        let mut rng = StdRng::seed_from_u64(seed);

        let plan = MosaicPlan::build(cfg, paths.len(), &mut rng)?;
        let photos = PhotoStore::prepare(paths, &plan.assignment, &plan.layout, images, mask)?;
        let mut session = Self::new(plan, photos, opts)?;
        session.seed = Some(seed);
        Ok(session)
    }

    /// The plan driving this session.
    pub fn plan(&self) -> &MosaicPlan {
        &self.plan
    }

    /// Seed the plan was built from, when the session planned it itself.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Phase lengths of the video.
    pub fn timeline(&self) -> Timeline {
        self.plan.timeline()
    }

    /// Exact numbers of the planned video.
    pub fn summary(&self) -> PlanSummary {
        PlanSummary::of(&self.plan)
    }

    fn compositor(&self) -> MosaicResult<FrameCompositor<'_>> {
        FrameCompositor::new(&self.plan, &self.photos)
    }

    /// Render a single frame of the video.
    pub fn render_frame(&self, frame: FrameIndex) -> MosaicResult<RgbImage> {
        let tf = self.timeline().locate(frame).ok_or_else(|| {
            MosaicError::validation(format!(
                "frame {} is past the end of the video ({} frames)",
                frame.0,
                self.timeline().total_frames()
            ))
        })?;
        self.compositor()?.compose(tf)
    }

    /// Render the fully assembled mosaic.
    pub fn render_static(&self) -> MosaicResult<RgbImage> {
        self.compositor()?.compose_static()
    }

    /// Render the whole video into `sink`.
    pub fn render(&self, sink: &mut dyn FrameSink) -> MosaicResult<RenderStats> {
        let total = self.timeline().total_frames();
        self.render_range(
            FrameRange {
                start: FrameIndex(0),
                end: FrameIndex(total),
            },
            sink,
        )
    }

    /// Render a range of frames into `sink`.
    ///
    /// The sink receives frames in strictly increasing frame index order. When `parallel` is
    /// enabled, out-of-order worker completion is deterministically reordered at the sink boundary
    /// (bounded channel backpressure). Hold frames share one rendered buffer.
    #[tracing::instrument(skip(self, sink), fields(start = range.start.0, end = range.end.0))]
    pub fn render_range(
        &self,
        range: FrameRange,
        sink: &mut dyn FrameSink,
    ) -> MosaicResult<RenderStats> {
        let timeline = self.timeline();
        if range.is_empty() {
            return Err(MosaicError::validation(
                "render_range range must be non-empty",
            ));
        }
        if range.end.0 > timeline.total_frames() {
            return Err(MosaicError::validation(
                "render_range range must be within the video duration",
            ));
        }

        let compositor = self.compositor()?;
        let hold_range = timeline.range(TimelinePhase::Hold);
        let stats = range_stats(&timeline, range);
        let hold = if stats.hold_frames > 0 {
            Some(Arc::new(compositor.compose_static()?))
        } else {
            None
        };

        let cfg = SinkConfig {
            width: self.plan.canvas.width,
            height: self.plan.canvas.height,
            fps: self.plan.fps,
            total_frames: range.len_frames(),
        };

        let cap = self.opts.channel_capacity.max(1);
        let bytes_per_frame = u64::from(cfg.width)
            .saturating_mul(u64::from(cfg.height))
            .saturating_mul(3)
            .max(1);
        let max_chunk_by_mem = (MAX_REORDER_BUFFER_BYTES / bytes_per_frame).max(1);

        let mut chunk_size = normalized_chunk_size(self.opts.chunk_size).min(max_chunk_by_mem);
        chunk_size = chunk_size.min(range.len_frames());

        let pool = if self.opts.parallel {
            Some(build_thread_pool(self.opts.threads)?)
        } else {
            None
        };

        tracing::info!(
            frames = range.len_frames(),
            parallel = self.opts.parallel,
            chunk_size,
            "rendering"
        );

        let produce_one = |f: u64| -> MosaicResult<Arc<RgbImage>> {
            if let Some(hold) = hold.as_ref()
                && hold_range.contains(FrameIndex(f))
            {
                return Ok(hold.clone());
            }
            let tf = timeline
                .locate(FrameIndex(f))
                .ok_or_else(|| MosaicError::validation(format!("frame {f} is out of range")))?;
            Ok(Arc::new(compositor.compose(tf)?))
        };

        // Encoder thread: enforce in-order delivery to the sink regardless of render completion
        // order.
        std::thread::scope(|scope| -> MosaicResult<RenderStats> {
            let (tx, rx) = mpsc::sync_channel::<FrameMsg>(cap);
            let range_start = range.start.0;
            let range_end = range.end.0;
            let progress = Progress::new(timeline, range_end - range_start, self.opts.progress_every);
            let sink_ref: &mut dyn FrameSink = sink;

            let enc = scope.spawn(move || -> MosaicResult<()> {
                let mut progress = progress;
                sink_ref.begin(cfg)?;

                let mut next = range_start;
                let mut pending = HashMap::<u64, Arc<RgbImage>>::new();
                while next < range_end {
                    if let Some(frame) = pending.remove(&next) {
                        sink_ref.push_frame(FrameIndex(next), &frame)?;
                        progress.delivered(FrameIndex(next));
                        next += 1;
                        continue;
                    }

                    let msg = rx.recv().map_err(|_| {
                        MosaicError::encode("encoder channel disconnected unexpectedly")
                    })?;
                    pending.insert(msg.idx.0, msg.frame);

                    while let Some(frame) = pending.remove(&next) {
                        sink_ref.push_frame(FrameIndex(next), &frame)?;
                        progress.delivered(FrameIndex(next));
                        next += 1;
                        if next >= range_end {
                            break;
                        }
                    }
                }

                sink_ref.end()?;
                Ok(())
            });

            let send = |tx: &mpsc::SyncSender<FrameMsg>, f: u64, frame: Arc<RgbImage>| {
                tx.send(FrameMsg {
                    idx: FrameIndex(f),
                    frame,
                })
                .map_err(|_| ProduceError::Disconnected)
            };

            let produce_res = (|| -> Result<(), ProduceError> {
                let mut chunk_start = range_start;
                while chunk_start < range_end {
                    let chunk_end = (chunk_start + chunk_size).min(range_end);
                    if let Some(pool) = pool.as_ref() {
                        let tx = tx.clone();
                        pool.install(|| {
                            (chunk_start..chunk_end)
                                .into_par_iter()
                                .try_for_each(|f| send(&tx, f, produce_one(f)?))
                        })?;
                    } else {
                        for f in chunk_start..chunk_end {
                            send(&tx, f, produce_one(f)?)?;
                        }
                    }
                    chunk_start = chunk_end;
                }
                Ok(())
            })();

            drop(tx);
            let enc_res = enc
                .join()
                .map_err(|_| MosaicError::encode("encoder thread panicked"))?;

            match produce_res {
                Ok(()) => enc_res?,
                Err(ProduceError::Render(e)) => return Err(e),
                // The encoder hung up first; its error is the cause.
                Err(ProduceError::Disconnected) => {
                    enc_res?;
                    return Err(MosaicError::encode(
                        "encoder thread stopped accepting frames",
                    ));
                }
            }
            tracing::info!(
                frames = stats.frames_total,
                rendered = stats.frames_rendered,
                reused = stats.frames_reused,
                entrance = stats.entrance_frames,
                hold = stats.hold_frames,
                exit = stats.exit_frames,
                "render finished"
            );
            Ok(stats)
        })
    }
}

/// Why the producer side of `render_range` stopped.
#[derive(Debug)]
enum ProduceError {
    /// Composing a frame failed.
    Render(MosaicError),
    /// The encoder thread dropped its receiver.
    Disconnected,
}

impl From<MosaicError> for ProduceError {
    fn from(e: MosaicError) -> Self {
        Self::Render(e)
    }
}

#[derive(Debug)]
struct FrameMsg {
    idx: FrameIndex,
    frame: Arc<RgbImage>,
}

/// Periodic progress lines from the encoder thread.
struct Progress {
    timeline: Timeline,
    total: u64,
    every: u64,
    done: u64,
    phase: Option<TimelinePhase>,
}

impl Progress {
    fn new(timeline: Timeline, total: u64, every: u64) -> Self {
        Self {
            timeline,
            total,
            every,
            done: 0,
            phase: None,
        }
    }

    fn delivered(&mut self, idx: FrameIndex) {
        self.done += 1;
        let phase = self.timeline.locate(idx).map(|tf| tf.phase());
        if phase != self.phase {
            if let Some(p) = phase {
                tracing::info!(phase = ?p, frame = idx.0, "phase started");
            }
            self.phase = phase;
        }
        if self.every > 0 && (self.done % self.every == 0 || self.done == self.total) {
            let percent = (1000.0 * self.done as f64 / self.total.max(1) as f64).round() / 10.0;
            tracing::info!(done = self.done, total = self.total, percent, "progress");
        }
    }
}

/// Per-phase frame counts of `range`; the hold mosaic is composed once.
fn range_stats(timeline: &Timeline, range: FrameRange) -> RenderStats {
    let entrance_frames = timeline.range(TimelinePhase::Entrance).overlap_frames(range);
    let hold_frames = timeline.range(TimelinePhase::Hold).overlap_frames(range);
    let exit_frames = timeline.range(TimelinePhase::Exit).overlap_frames(range);
    let hold_renders = hold_frames.min(1);
    RenderStats {
        frames_total: range.len_frames(),
        frames_rendered: entrance_frames + exit_frames + hold_renders,
        frames_reused: hold_frames - hold_renders,
        entrance_frames,
        hold_frames,
        exit_frames,
    }
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

fn build_thread_pool(threads: Option<usize>) -> MosaicResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(MosaicError::validation(
            "render 'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build rayon thread pool: {e}").into())
}

#[cfg(test)]
#[path = "../../tests/unit/session/render_session.rs"]
mod tests;
