//! Per-photo motion curves.
//!
//! Every photo travels between an offscreen origin and its grid cell. The curves are analytic in
//! the wave-local progress `p`, so any frame can be evaluated without knowing its predecessors.
//! The exit curve is the entrance curve played backwards: `sample(Exit, p)` matches
//! `sample(Entrance, 1 - p)` for position, rotation, and scale.

use rand::Rng;

use crate::animation::ease::Ease;
use crate::config::ScaleConfig;
use crate::foundation::core::{Canvas, Point};
use crate::foundation::math::lerp;

/// Eased arrival at which the masked variant starts fading in during the entrance.
pub const MASK_FADE_IN_START: f64 = 0.8;
/// Local progress by which the masked variant has fully faded out during the exit.
pub const MASK_FADE_OUT_END: f64 = 0.2;

/// Which half of the timeline a photo is being evaluated for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Phase {
    /// Photos fly in from their origin to the grid.
    Entrance,
    /// Photos fly back out from the grid to their origin.
    Exit,
}

/// Side or corner of the canvas a photo enters from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    /// From the left edge, same row.
    Left,
    /// From the right edge, same row.
    Right,
    /// From the top edge, same column.
    Up,
    /// From the bottom edge, same column.
    Down,
    /// From the top-left corner.
    UpLeft,
    /// From the top-right corner.
    UpRight,
    /// From the bottom-left corner.
    DownLeft,
    /// From the bottom-right corner.
    DownRight,
}

impl Direction {
    /// All eight entry directions.
    pub const ALL: [Direction; 8] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    /// Offscreen top-left position for a `cell`-sized photo whose resting place is `target`.
    pub fn origin_for(self, target: Point, cell: u32, canvas: Canvas) -> Point {
        let before = -f64::from(cell);
        let right = f64::from(canvas.width);
        let below = f64::from(canvas.height);
        match self {
            Self::Left => Point::new(before, target.y),
            Self::Right => Point::new(right, target.y),
            Self::Up => Point::new(target.x, before),
            Self::Down => Point::new(target.x, below),
            Self::UpLeft => Point::new(before, before),
            Self::UpRight => Point::new(right, before),
            Self::DownLeft => Point::new(before, below),
            Self::DownRight => Point::new(right, below),
        }
    }

    /// Pick one of the eight directions uniformly.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Size category of a photo, fixed at setup time.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ScaleCategory {
    /// Regular photo, close to native size.
    Normal,
    /// Larger entrance, same easing as `Normal`.
    Featured,
    /// Huge entrance with a slower quadratic ease and a fade-in while it shrinks.
    Giant {
        /// Scale at which the photo becomes fully opaque.
        settle_scale: f64,
    },
}

impl ScaleCategory {
    /// Resolve the easing pair and opacity rule for a photo starting at `initial_scale`.
    ///
    /// The exit curve is the entrance curve mirrored, so an exit is the entrance played backwards.
    pub fn profile(self, initial_scale: f64) -> MotionProfile {
        let (entrance, fade) = match self {
            Self::Normal | Self::Featured => (Ease::OutQuint, None),
            Self::Giant { settle_scale } => (
                Ease::OutQuad,
                Some(FadeRamp {
                    invisible_at: initial_scale,
                    opaque_at: settle_scale,
                }),
            ),
        };
        MotionProfile {
            entrance,
            exit: entrance.mirrored(),
            fade,
        }
    }

    /// Short label used in per-photo trace logs.
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Featured => "featured",
            Self::Giant { .. } => "giant",
        }
    }
}

/// Linear opacity ramp driven by the current scale.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FadeRamp {
    /// Scale at which opacity is 0.
    pub invisible_at: f64,
    /// Scale at which opacity is 1.
    pub opaque_at: f64,
}

impl FadeRamp {
    /// Opacity in `[0, 1]` for the given scale.
    pub fn opacity(self, scale: f64) -> f64 {
        let span = self.invisible_at - self.opaque_at;
        if span.abs() <= f64::EPSILON {
            return if scale <= self.opaque_at { 1.0 } else { 0.0 };
        }
        ((self.invisible_at - scale) / span).clamp(0.0, 1.0)
    }
}

/// Easing and opacity choices resolved once per photo.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MotionProfile {
    /// Ease applied to entrance progress.
    pub entrance: Ease,
    /// Ease applied to exit progress.
    pub exit: Ease,
    /// Scale-driven fade, giants only.
    pub fade: Option<FadeRamp>,
}

/// Photo state at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionSample {
    /// Top-left of the unscaled, unrotated photo.
    pub position: Point,
    /// Rotation in degrees.
    pub angle_deg: f64,
    /// Uniform scale around the photo center (1.0 = cell size).
    pub scale: f64,
    /// Opacity against the white background.
    pub opacity: f64,
    /// Crossfade weight of the masked variant (0 = plain, 1 = masked).
    pub mask_mix: f64,
}

impl MotionSample {
    /// Photo resting in its cell with the masked variant.
    pub fn at_rest(target: Point) -> Self {
        Self {
            position: target,
            angle_deg: 0.0,
            scale: 1.0,
            opacity: 1.0,
            mask_mix: 1.0,
        }
    }
}

/// Immutable motion parameters of one photo.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PhotoMotion {
    /// Entry direction.
    pub direction: Direction,
    /// Offscreen start (entrance) and end (exit) position.
    pub origin: Point,
    /// Grid cell top-left.
    pub target: Point,
    /// Rotation while at the origin, degrees.
    pub initial_angle: f64,
    /// Scale while at the origin.
    pub initial_scale: f64,
    /// Size category.
    pub category: ScaleCategory,
    /// Resolved easing and fade rule.
    pub profile: MotionProfile,
}

impl PhotoMotion {
    /// Assemble a photo's motion and resolve its profile from the category.
    pub fn new(
        direction: Direction,
        target: Point,
        cell: u32,
        canvas: Canvas,
        initial_angle: f64,
        category: ScaleCategory,
        initial_scale: f64,
    ) -> Self {
        Self {
            direction,
            origin: direction.origin_for(target, cell, canvas),
            target,
            initial_angle,
            initial_scale,
            category,
            profile: category.profile(initial_scale),
        }
    }

    /// Draw direction, angle, and size category for a photo resting at `target`.
    pub fn random(
        target: Point,
        cell: u32,
        canvas: Canvas,
        max_rotation_deg: f64,
        scale: &ScaleConfig,
        rng: &mut impl Rng,
    ) -> Self {
        let direction = Direction::random(rng);
        let initial_angle = rng.random_range(-max_rotation_deg..=max_rotation_deg);
        let (category, initial_scale) = sample_category(scale, rng);
        Self::new(
            direction,
            target,
            cell,
            canvas,
            initial_angle,
            category,
            initial_scale,
        )
    }

    /// How far the photo has arrived in its cell (0 = at origin, 1 = at rest).
    fn arrival(&self, phase: Phase, p: f64) -> f64 {
        match phase {
            Phase::Entrance => self.profile.entrance.apply(p),
            Phase::Exit => 1.0 - self.profile.exit.apply(p),
        }
    }

    /// Evaluate the photo at local wave progress `p` in `[0, 1]`.
    pub fn sample(&self, phase: Phase, p: f64) -> MotionSample {
        let p = p.clamp(0.0, 1.0);
        let a = self.arrival(phase, p);

        let position = Point::new(
            lerp(self.origin.x, self.target.x, a),
            lerp(self.origin.y, self.target.y, a),
        );
        let angle_deg = self.initial_angle * (1.0 - a);
        let scale = lerp(self.initial_scale, 1.0, a);
        let opacity = self.profile.fade.map_or(1.0, |ramp| ramp.opacity(scale));
        let mask_mix = match phase {
            Phase::Entrance => {
                ((a - MASK_FADE_IN_START) / (1.0 - MASK_FADE_IN_START)).clamp(0.0, 1.0)
            }
            Phase::Exit => (1.0 - p / MASK_FADE_OUT_END).clamp(0.0, 1.0),
        };

        MotionSample {
            position,
            angle_deg,
            scale,
            opacity,
            mask_mix,
        }
    }

    /// The resting state in the grid cell.
    pub fn at_rest(&self) -> MotionSample {
        MotionSample::at_rest(self.target)
    }
}

/// Draw a size category and its initial scale from the configured population fractions.
pub fn sample_category(cfg: &ScaleConfig, rng: &mut impl Rng) -> (ScaleCategory, f64) {
    let roll: f64 = rng.random();
    if roll < cfg.giant_fraction {
        let s = rng.random_range(cfg.giant_range[0]..=cfg.giant_range[1]);
        (
            ScaleCategory::Giant {
                settle_scale: cfg.giant_settle_scale,
            },
            s,
        )
    } else if roll < cfg.giant_fraction + cfg.featured_fraction {
        let s = rng.random_range(cfg.featured_range[0]..=cfg.featured_range[1]);
        (ScaleCategory::Featured, s)
    } else {
        let s = rng.random_range(cfg.normal_range[0]..=cfg.normal_range[1]);
        (ScaleCategory::Normal, s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/motion.rs"]
mod tests;
