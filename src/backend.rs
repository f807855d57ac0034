//! Graphics backend port.
//!
//! The frame renderer never talks to a GPU API directly. It clears and
//! submits through a [`FrameBackend`], always via the
//! [`ActiveContext`](crate::context::ActiveContext) of the surface being drawn.

use crate::context::ContextId;
use crate::error::SubmitError;
use crate::render::{Color, RenderList};
use crate::view::ViewportSize;

/// Destination for finalized frames.
pub trait FrameBackend {
    /// Clear the color buffer of the drawable area.
    fn clear(&mut self, context: ContextId, color: Color, size: ViewportSize);

    /// Present the recorded primitives.
    fn submit(&mut self, context: ContextId, commands: &RenderList) -> Result<(), SubmitError>;
}

/// A frame captured by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFrame {
    /// Context the frame was submitted from.
    pub context: ContextId,
    /// Clear color and size issued before submission, if any.
    pub clear: Option<(Color, ViewportSize)>,
    /// Submitted primitives.
    pub commands: RenderList,
}

/// Headless backend that keeps every submitted frame in memory.
///
/// Submission can be made to fail to emulate device loss.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    frames: Vec<RecordedFrame>,
    pending_clear: Option<(ContextId, Color, ViewportSize)>,
    fail_with: Option<SubmitError>,
}

impl RecordingBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following submission fail with `error`.
    pub fn fail_submissions(&mut self, error: SubmitError) {
        self.fail_with = Some(error);
    }

    /// Let submissions succeed again.
    pub fn recover(&mut self) {
        self.fail_with = None;
    }

    /// Frames submitted so far.
    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    /// The most recently submitted frame.
    pub fn last_frame(&self) -> Option<&RecordedFrame> {
        self.frames.last()
    }

    /// Drain submitted frames.
    pub fn take_frames(&mut self) -> Vec<RecordedFrame> {
        std::mem::take(&mut self.frames)
    }
}

impl FrameBackend for RecordingBackend {
    fn clear(&mut self, context: ContextId, color: Color, size: ViewportSize) {
        self.pending_clear = Some((context, color, size));
    }

    fn submit(&mut self, context: ContextId, commands: &RenderList) -> Result<(), SubmitError> {
        let clear = self
            .pending_clear
            .take()
            .filter(|(cleared, _, _)| *cleared == context)
            .map(|(_, color, size)| (color, size));
        if let Some(error) = self.fail_with.clone() {
            return Err(error);
        }
        self.frames.push(RecordedFrame {
            context,
            clear,
            commands: commands.clone(),
        });
        Ok(())
    }
}
