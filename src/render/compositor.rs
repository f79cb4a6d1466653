use std::borrow::Cow;

use image::RgbImage;

use crate::animation::motion::{MotionSample, Phase};
use crate::assets::photo::{PhotoStore, PreparedPhoto};
use crate::foundation::core::Canvas;
use crate::foundation::error::{MosaicError, MosaicResult};
use crate::plan::mosaic::MosaicPlan;
use crate::render::raster::{self, BORDER_GRAY, PasteMode};
use crate::schedule::timeline::TimelineFrame;
use crate::schedule::wave::WaveState;

/// Below this the photo counts as unrotated.
const ANGLE_EPSILON_DEG: f64 = 1e-6;
/// Below this the photo counts as unscaled.
const SCALE_EPSILON: f64 = 1e-6;

/// One photo to draw, in back-to-front order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCommand {
    /// Grid slot of the photo.
    pub slot: usize,
    /// State to draw it in.
    pub sample: MotionSample,
}

/// Turns a plan and its prepared photos into frames.
///
/// Composition is a pure function of the frame index, so one compositor may be shared across
/// threads.
pub struct FrameCompositor<'a> {
    plan: &'a MosaicPlan,
    photos: &'a PhotoStore,
}

impl<'a> FrameCompositor<'a> {
    /// Pair a plan with its photos; every slot must have prepared buffers.
    pub fn new(plan: &'a MosaicPlan, photos: &'a PhotoStore) -> MosaicResult<Self> {
        if photos.len() != plan.photos.len() {
            return Err(MosaicError::layout(format!(
                "plan has {} slots but {} photos were prepared",
                plan.photos.len(),
                photos.len()
            )));
        }
        Ok(Self { plan, photos })
    }

    /// Draw list of a timeline frame, back to front.
    pub fn draw_list(&self, frame: TimelineFrame) -> Vec<DrawCommand> {
        match frame {
            TimelineFrame::Entrance(f) => self.entrance_list(f),
            TimelineFrame::Hold(_) => self.static_list(),
            TimelineFrame::Exit(f) => self.exit_list(f),
        }
    }

    /// Render a timeline frame.
    pub fn compose(&self, frame: TimelineFrame) -> MosaicResult<RgbImage> {
        self.render_list(&self.draw_list(frame))
    }

    /// The fully assembled mosaic.
    pub fn compose_static(&self) -> MosaicResult<RgbImage> {
        self.render_list(&self.static_list())
    }

    /// Finished waves rest in their cells; active waves are in flight; pending waves are absent.
    fn entrance_list(&self, frame: u64) -> Vec<DrawCommand> {
        let mut out = Vec::new();
        for wave in &self.plan.waves {
            let state = self.plan.schedule.state(wave.index, frame);
            for &slot in &wave.members {
                let motion = &self.plan.photos[slot].motion;
                let sample = match state {
                    WaveState::Pending => continue,
                    WaveState::Active { progress, .. } => motion.sample(Phase::Entrance, progress),
                    WaveState::Finished => motion.at_rest(),
                };
                out.push(DrawCommand { slot, sample });
            }
        }
        out
    }

    /// Pending waves stay at rest underneath; departing photos go on top, least progressed first.
    fn exit_list(&self, frame: u64) -> Vec<DrawCommand> {
        let mut resting = Vec::new();
        let mut departing: Vec<(f64, DrawCommand)> = Vec::new();
        for wave in &self.plan.waves {
            let state = self.plan.schedule.state(wave.index, frame);
            for &slot in &wave.members {
                let motion = &self.plan.photos[slot].motion;
                match state {
                    WaveState::Pending => resting.push(DrawCommand {
                        slot,
                        sample: motion.at_rest(),
                    }),
                    WaveState::Active { progress, .. } => departing.push((
                        progress,
                        DrawCommand {
                            slot,
                            sample: motion.sample(Phase::Exit, progress),
                        },
                    )),
                    WaveState::Finished => {}
                }
            }
        }
        departing.sort_by(|a, b| a.0.total_cmp(&b.0));
        resting.extend(departing.into_iter().map(|(_, cmd)| cmd));
        resting
    }

    fn static_list(&self) -> Vec<DrawCommand> {
        self.plan
            .waves
            .iter()
            .flat_map(|w| w.members.iter())
            .map(|&slot| DrawCommand {
                slot,
                sample: self.plan.photos[slot].motion.at_rest(),
            })
            .collect()
    }

    fn render_list(&self, list: &[DrawCommand]) -> MosaicResult<RgbImage> {
        let mut canvas = raster::white(self.plan.canvas.width, self.plan.canvas.height);
        for cmd in list {
            let photo = self
                .photos
                .get(cmd.slot)
                .ok_or_else(|| MosaicError::layout(format!("no photo for slot {}", cmd.slot)))?;
            draw_photo(
                &mut canvas,
                photo,
                &cmd.sample,
                self.plan.layout.cell_size,
                self.plan.border,
            )?;
        }
        Ok(canvas)
    }
}

/// Draw one photo onto `canvas`.
///
/// Scaling and rotation happen about the photo center. Unrotated draws overwrite the covered
/// pixels; rotated draws copy only non-white pixels so the expanded corners stay invisible.
pub fn draw_photo(
    canvas: &mut RgbImage,
    photo: &PreparedPhoto,
    sample: &MotionSample,
    cell: u32,
    border: bool,
) -> MosaicResult<()> {
    if sample.opacity <= 0.0 {
        return Ok(());
    }

    let mut buf: Cow<'_, RgbImage> = if sample.mask_mix <= 0.0 {
        Cow::Borrowed(&*photo.plain)
    } else if sample.mask_mix >= 1.0 {
        Cow::Borrowed(&*photo.masked)
    } else {
        Cow::Owned(raster::crossfade(
            &photo.plain,
            &photo.masked,
            sample.mask_mix,
        )?)
    };

    if sample.opacity < 1.0 {
        raster::fade_toward_white(buf.to_mut(), sample.opacity);
    }

    let scaled = (sample.scale - 1.0).abs() > SCALE_EPSILON;
    if scaled {
        buf = Cow::Owned(raster::scale(&buf, sample.scale));
    }
    let rotated = sample.angle_deg.abs() > ANGLE_EPSILON_DEG;
    if rotated {
        buf = Cow::Owned(raster::rotate_expand(&buf, sample.angle_deg));
    }

    let half = f64::from(cell) / 2.0;
    let x = (sample.position.x + half - f64::from(buf.width()) / 2.0).round() as i64;
    let y = (sample.position.y + half - f64::from(buf.height()) / 2.0).round() as i64;
    let mode = if rotated {
        PasteMode::SkipNearWhite
    } else {
        PasteMode::Opaque
    };
    raster::paste(canvas, &buf, x, y, mode);

    if border && !rotated && !scaled {
        let bounds = Canvas {
            width: canvas.width(),
            height: canvas.height(),
        };
        if bounds.contains_rect(x, y, buf.width(), buf.height()) {
            raster::outline(canvas, x, y, buf.width(), buf.height(), BORDER_GRAY);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
