//! Frame sinks.
//!
//! Sinks consume composed frames in timeline order and are driven by `RenderSession::render`.

/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Generic frame sink trait and the in-memory sink.
pub mod sink;
