//! Next-frame scheduling for the panel reveal phase
//!
//! Activation is split in two: the commit happens immediately, the reveal
//! (entry animation flag + optional focus move) runs on the following frame.
//! The switcher only talks to the [`FrameScheduler`] trait, so tests can
//! drain the queue by hand instead of waiting on a real frame clock.

/// Work deferred to the next frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reveal {
    /// Panel to mark visible
    pub key: String,
    /// Move input focus to the panel once visible
    pub focus_panel: bool,
}

/// Abstract "run this on the next frame" primitive
pub trait FrameScheduler {
    fn request_frame(&mut self, reveal: Reveal);
}

/// Pending reveals, drained by the event loop on each frame tick
#[derive(Debug, Default)]
pub struct FrameQueue {
    pending: Vec<Reveal>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every reveal scheduled since the last frame, oldest first
    pub fn drain(&mut self) -> Vec<Reveal> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self, reveal: Reveal) {
        self.pending.push(reveal);
    }
}
