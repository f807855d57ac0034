//! Drawing contexts and the active-context token.
//!
//! Immediate-mode drawing libraries keep a single process-wide "current
//! context". Every surface owns one [`ContextHandle`] and must make it current
//! with [`ContextManager::activate`] before issuing any draw call. Activation
//! returns an [`ActiveContext`], the only type through which primitives can be
//! recorded, cleared, or submitted. Each of those calls asserts that the
//! handle still holds the token, so a draw issued after another surface
//! re-activated is caught immediately instead of corrupting a sibling's frame.
//!
//! A manager is a cheap, cloneable handle. All surfaces of one host share the
//! same manager and therefore the same token.

use std::sync::{Arc, RwLock};

use crate::backend::FrameBackend;
use crate::error::{ContextError, SubmitError};
use crate::render::{Color, RenderCommand, RenderList};
use crate::view::ViewportSize;

/// Identifier of a drawing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(u64);

impl ContextId {
    /// Raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ContextId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ctx#{}", self.0)
    }
}

/// Lifecycle and drawing events recorded when tracing is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextEvent {
    /// A context was allocated.
    Created(ContextId),
    /// A context became the active one.
    Activated(ContextId),
    /// A draw primitive was recorded.
    Draw(ContextId),
    /// The backend color buffer was cleared.
    Cleared(ContextId),
    /// A finalized frame was handed to the backend.
    Submitted(ContextId),
    /// A context was released.
    Destroyed(ContextId),
}

impl ContextEvent {
    /// The context the event refers to.
    pub fn context(self) -> ContextId {
        match self {
            Self::Created(id)
            | Self::Activated(id)
            | Self::Draw(id)
            | Self::Cleared(id)
            | Self::Submitted(id)
            | Self::Destroyed(id) => id,
        }
    }

    /// True for events that issue work against the active context.
    pub fn is_draw_call(self) -> bool {
        matches!(self, Self::Draw(_) | Self::Cleared(_) | Self::Submitted(_))
    }
}

#[derive(Debug, Default)]
struct ManagerState {
    next_id: u64,
    active: Option<ContextId>,
    live: usize,
    limit: Option<usize>,
    trace: Option<Vec<ContextEvent>>,
}

impl ManagerState {
    fn record(&mut self, event: ContextEvent) {
        if let Some(trace) = self.trace.as_mut() {
            trace.push(event);
        }
    }
}

/// Owner of the active-context token.
#[derive(Debug, Clone, Default)]
pub struct ContextManager {
    inner: Arc<RwLock<ManagerState>>,
}

impl ContextManager {
    /// Create a manager with no context limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager that refuses to allocate more than `limit` live contexts.
    pub fn with_limit(limit: usize) -> Self {
        let manager = Self::new();
        manager.write().limit = Some(limit);
        manager
    }

    /// Create a manager that records every [`ContextEvent`].
    pub fn recording() -> Self {
        let manager = Self::new();
        manager.write().trace = Some(Vec::new());
        manager
    }

    /// Allocate a new drawing context.
    pub fn create(&self) -> Result<ContextHandle, ContextError> {
        let mut state = self.write();
        if let Some(limit) = state.limit
            && state.live >= limit
        {
            tracing::warn!(limit, "drawing context allocation refused");
            return Err(ContextError::Exhausted { limit });
        }
        state.next_id = state.next_id.wrapping_add(1);
        let id = ContextId(state.next_id);
        state.live += 1;
        state.record(ContextEvent::Created(id));
        drop(state);
        tracing::debug!(context = %id, "created drawing context");
        Ok(ContextHandle {
            id,
            manager: self.clone(),
            commands: RenderList::new(),
        })
    }

    /// Make `handle` the active context and return the drawing capability.
    ///
    /// Must be called at the start of every frame, even if `handle` was the
    /// most recently active context.
    pub fn activate<'a>(
        &'a self,
        handle: &'a mut ContextHandle,
    ) -> Result<ActiveContext<'a>, ContextError> {
        if !handle.manager.same_as(self) {
            return Err(ContextError::ForeignHandle(handle.id));
        }
        let mut state = self.write();
        state.active = Some(handle.id);
        state.record(ContextEvent::Activated(handle.id));
        drop(state);
        Ok(ActiveContext {
            manager: self,
            handle,
        })
    }

    /// Release a context. Consuming the handle rules out drawing afterwards.
    pub fn destroy(&self, handle: ContextHandle) {
        drop(handle);
    }

    /// The context currently holding the token.
    pub fn active(&self) -> Option<ContextId> {
        self.read().active
    }

    /// Number of contexts that have been created and not yet destroyed.
    pub fn live_contexts(&self) -> usize {
        self.read().live
    }

    /// Drain the recorded events. Empty when tracing is disabled.
    pub fn take_trace(&self) -> Vec<ContextEvent> {
        self.write()
            .trace
            .as_mut()
            .map(std::mem::take)
            .unwrap_or_default()
    }

    fn same_as(&self, other: &ContextManager) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn release(&self, id: ContextId) {
        let mut state = self.write();
        state.live = state.live.saturating_sub(1);
        if state.active == Some(id) {
            state.active = None;
        }
        state.record(ContextEvent::Destroyed(id));
        drop(state);
        tracing::debug!(context = %id, "destroyed drawing context");
    }

    /// Panic unless `id` holds the token, then record `event`.
    fn check_current(&self, id: ContextId, event: ContextEvent) {
        let mut state = self.write();
        let active = state.active;
        if active == Some(id) {
            state.record(event);
            return;
        }
        drop(state);
        panic!(
            "draw call for {id} while {} holds the active context",
            active.map_or_else(|| "no context".to_string(), |other| other.to_string()),
        );
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, ManagerState> {
        self.inner.read().expect("context manager lock")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, ManagerState> {
        self.inner.write().expect("context manager lock")
    }
}

/// Exclusive ownership of one drawing context.
///
/// Dropping the handle destroys the context.
#[derive(Debug)]
pub struct ContextHandle {
    id: ContextId,
    manager: ContextManager,
    commands: RenderList,
}

impl ContextHandle {
    /// Identifier of the owned context.
    pub fn id(&self) -> ContextId {
        self.id
    }
}

impl Drop for ContextHandle {
    fn drop(&mut self) {
        self.manager.release(self.id);
    }
}

/// Drawing capability for the context that currently holds the token.
#[derive(Debug)]
pub struct ActiveContext<'a> {
    manager: &'a ContextManager,
    handle: &'a mut ContextHandle,
}

impl ActiveContext<'_> {
    /// Identifier of the active context.
    pub fn id(&self) -> ContextId {
        self.handle.id
    }

    /// Discard primitives left over from the previous frame.
    pub fn begin_frame(&mut self) {
        self.manager
            .check_current(self.handle.id, ContextEvent::Draw(self.handle.id));
        self.handle.commands.clear();
    }

    /// Record a draw primitive.
    pub fn draw(&mut self, command: RenderCommand) {
        self.manager
            .check_current(self.handle.id, ContextEvent::Draw(self.handle.id));
        self.handle.commands.push(command);
    }

    /// Primitives recorded since [`begin_frame`](Self::begin_frame).
    pub fn commands(&self) -> &RenderList {
        &self.handle.commands
    }

    /// Clear the backend color buffer.
    pub fn clear(&mut self, backend: &mut dyn FrameBackend, color: Color, size: ViewportSize) {
        self.manager
            .check_current(self.handle.id, ContextEvent::Cleared(self.handle.id));
        backend.clear(self.handle.id, color, size);
    }

    /// Hand the recorded frame to the backend for display.
    pub fn submit(&mut self, backend: &mut dyn FrameBackend) -> Result<(), SubmitError> {
        self.manager
            .check_current(self.handle.id, ContextEvent::Submitted(self.handle.id));
        backend.submit(self.handle.id, &self.handle.commands)
    }
}
