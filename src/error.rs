//! Error types shared by the context manager, backends, and surfaces.

use crate::context::ContextId;

/// Failures raised by the drawing-context manager.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    /// The backend cannot allocate another context.
    #[error("drawing context limit of {limit} reached")]
    Exhausted {
        /// Maximum number of live contexts.
        limit: usize,
    },
    /// The handle was created by a different manager.
    #[error("drawing context {0} belongs to another context manager")]
    ForeignHandle(ContextId),
}

/// Failures raised by a backend while presenting a finalized frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// The graphics device was lost.
    #[error("graphics device lost")]
    DeviceLost,
    /// The backend rejected the frame.
    #[error("frame rejected: {0}")]
    Rejected(String),
}

/// Surface-local failure. Never propagated to sibling surfaces.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// Context creation or activation failed.
    #[error(transparent)]
    Context(#[from] ContextError),
    /// Frame submission failed.
    #[error(transparent)]
    Submit(#[from] SubmitError),
}
