//! Easing curves and the per-photo motion model.

pub(crate) mod ease;
pub(crate) mod motion;
