use crate::foundation::core::{FrameIndex, FrameRange};

/// Top-level playback state. Transitions only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelinePhase {
    /// Photos fly in wave by wave.
    Entrance,
    /// The assembled mosaic stands still.
    Hold,
    /// Photos fly out wave by wave.
    Exit,
    /// Nothing left to emit.
    Done,
}

impl TimelinePhase {
    /// Phases that emit frames, in playback order.
    pub const PLAYBACK: [TimelinePhase; 3] = [Self::Entrance, Self::Hold, Self::Exit];

    /// The phase that follows this one; `Done` is terminal.
    pub fn next(self) -> Self {
        match self {
            Self::Entrance => Self::Hold,
            Self::Hold => Self::Exit,
            Self::Exit | Self::Done => Self::Done,
        }
    }
}

/// Where a global frame falls, with its phase-local index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimelineFrame {
    /// Entrance frame.
    Entrance(u64),
    /// Hold frame.
    Hold(u64),
    /// Exit frame.
    Exit(u64),
}

impl TimelineFrame {
    /// Phase of the frame.
    pub fn phase(self) -> TimelinePhase {
        match self {
            Self::Entrance(_) => TimelinePhase::Entrance,
            Self::Hold(_) => TimelinePhase::Hold,
            Self::Exit(_) => TimelinePhase::Exit,
        }
    }
}

/// Phase lengths of the whole video, in frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Timeline {
    /// Entrance frames (latest wave end).
    pub entrance_frames: u64,
    /// Static hold frames (may be zero).
    pub hold_frames: u64,
    /// Exit frames (same as the entrance).
    pub exit_frames: u64,
}

impl Timeline {
    /// Build a timeline from phase lengths.
    pub fn new(entrance_frames: u64, hold_frames: u64, exit_frames: u64) -> Self {
        Self {
            entrance_frames,
            hold_frames,
            exit_frames,
        }
    }

    /// Frames emitted overall.
    pub fn total_frames(&self) -> u64 {
        self.entrance_frames + self.hold_frames + self.exit_frames
    }

    /// Global frame range of `phase`. `Done` is the empty range at the end.
    pub fn range(&self, phase: TimelinePhase) -> FrameRange {
        let hold_start = self.entrance_frames;
        let exit_start = hold_start + self.hold_frames;
        let end = exit_start + self.exit_frames;
        let (start, end) = match phase {
            TimelinePhase::Entrance => (0, hold_start),
            TimelinePhase::Hold => (hold_start, exit_start),
            TimelinePhase::Exit => (exit_start, end),
            TimelinePhase::Done => (end, end),
        };
        FrameRange {
            start: FrameIndex(start),
            end: FrameIndex(end),
        }
    }

    /// Map a global frame to its phase, or `None` past the end.
    pub fn locate(&self, frame: FrameIndex) -> Option<TimelineFrame> {
        let mut f = frame.0;
        if f < self.entrance_frames {
            return Some(TimelineFrame::Entrance(f));
        }
        f -= self.entrance_frames;
        if f < self.hold_frames {
            return Some(TimelineFrame::Hold(f));
        }
        f -= self.hold_frames;
        if f < self.exit_frames {
            return Some(TimelineFrame::Exit(f));
        }
        None
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/timeline.rs"]
mod tests;
