//! Wave partitioning, frame windows and the playback timeline.

pub(crate) mod timeline;
pub(crate) mod wave;
