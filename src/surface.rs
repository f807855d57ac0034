//! Independent plot surfaces.
//!
//! A [`Surface`] owns its guide values, pointer state, and drawing context.
//! Several surfaces may share one [`ContextManager`] and one
//! [`TickScheduler`]; each frame activates the surface's own context before
//! recording anything, so interleaved ticks never draw into a sibling.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::backend::FrameBackend;
use crate::context::{ContextHandle, ContextManager};
use crate::error::SurfaceError;
use crate::frame::{self, FrameScratch};
use crate::guide::GuideState;
use crate::interaction::{InteractionState, PointerEvent};
use crate::overlay;
use crate::render::Color;
use crate::signal::DEFAULT_SAMPLE_COUNT;
use crate::tick::{DEFAULT_TICK_INTERVAL, TickScheduler};
use crate::view::{Viewport, ViewportSize};

static SURFACE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId(u64);

impl SurfaceId {
    pub(crate) fn next() -> Self {
        Self(SURFACE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// Construction parameters of a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceConfig {
    /// Initial guide values.
    pub guides: GuideState,
    /// Clear color of the drawable area.
    pub background: Color,
    /// Number of samples in the generated series.
    pub sample_count: usize,
    /// Redraw interval.
    pub tick_interval: Duration,
    /// Data range initially shown by the plot area.
    pub plot_viewport: Viewport,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            guides: GuideState::default(),
            background: Color::from_rgb8(114, 144, 154),
            sample_count: DEFAULT_SAMPLE_COUNT,
            tick_interval: DEFAULT_TICK_INTERVAL,
            plot_viewport: Viewport::default(),
        }
    }
}

/// Lifecycle of a surface.
///
/// Rendering happens entirely inside [`Surface::on_tick`], so a surface is
/// never observed mid-frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    /// Waiting for the first tick to create its context.
    Uninitialized,
    /// Holding a context and rendering on every tick.
    Ready,
    /// Torn down. Ticks are ignored.
    Destroyed,
}

/// Result of delivering one tick to a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The context was created; nothing was drawn.
    Initialized,
    /// A frame was submitted.
    Rendered,
    /// The surface is destroyed and ignored the tick.
    Dropped,
    /// The surface failed and is now destroyed.
    Failed(SurfaceError),
}

enum Lifecycle {
    Uninitialized,
    Ready(ContextHandle),
    Destroyed,
}

/// One independently interactive plot surface.
pub struct Surface {
    id: SurfaceId,
    config: SurfaceConfig,
    guides: GuideState,
    plot_viewport: Viewport,
    lifecycle: Lifecycle,
    contexts: ContextManager,
    ticks: TickScheduler,
    input: InteractionState,
    scratch: FrameScratch,
    frames_rendered: u64,
}

impl Surface {
    /// Create a surface. Its context is created on the first tick.
    pub fn new(config: SurfaceConfig, contexts: ContextManager, ticks: TickScheduler) -> Self {
        let id = SurfaceId::next();
        tracing::debug!(surface = %id, "created surface");
        Self {
            id,
            guides: config.guides,
            plot_viewport: config.plot_viewport,
            config,
            lifecycle: Lifecycle::Uninitialized,
            contexts,
            ticks,
            input: InteractionState::new(),
            scratch: FrameScratch::default(),
            frames_rendered: 0,
        }
    }

    /// Unique surface id.
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    /// Construction parameters.
    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    /// Current guide values.
    pub fn guides(&self) -> &GuideState {
        &self.guides
    }

    /// Data range currently shown by the plot area.
    pub fn plot_viewport(&self) -> Viewport {
        self.plot_viewport
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SurfaceState {
        match self.lifecycle {
            Lifecycle::Uninitialized => SurfaceState::Uninitialized,
            Lifecycle::Ready(_) => SurfaceState::Ready,
            Lifecycle::Destroyed => SurfaceState::Destroyed,
        }
    }

    /// Number of frames submitted successfully.
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Latch a pointer event for the next frame.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        if matches!(self.lifecycle, Lifecycle::Destroyed) {
            return;
        }
        self.input.handle(event);
    }

    /// Deliver one tick.
    ///
    /// The first tick creates the context and registers for redraws. Later
    /// ticks render a frame of `size` into `backend`. Any failure destroys
    /// this surface only.
    pub fn on_tick(&mut self, backend: &mut dyn FrameBackend, size: ViewportSize) -> TickOutcome {
        let result = match self.lifecycle {
            Lifecycle::Destroyed => return TickOutcome::Dropped,
            Lifecycle::Uninitialized => self.initialize().map(|()| TickOutcome::Initialized),
            Lifecycle::Ready(_) => self.render(backend, size).map(|()| TickOutcome::Rendered),
        };
        match result {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::warn!(surface = %self.id, %error, "surface failed, tearing down");
                self.destroy();
                TickOutcome::Failed(error)
            }
        }
    }

    /// Release the context and stop receiving ticks. Idempotent.
    pub fn destroy(&mut self) {
        let previous = std::mem::replace(&mut self.lifecycle, Lifecycle::Destroyed);
        self.ticks.unregister(self.id);
        match previous {
            Lifecycle::Ready(handle) => {
                self.contexts.destroy(handle);
                tracing::debug!(surface = %self.id, frames = self.frames_rendered, "destroyed surface");
            }
            Lifecycle::Uninitialized => {
                tracing::debug!(surface = %self.id, "destroyed surface before first tick");
            }
            Lifecycle::Destroyed => {}
        }
    }

    fn initialize(&mut self) -> Result<(), SurfaceError> {
        let handle = self.contexts.create()?;
        tracing::debug!(surface = %self.id, context = %handle.id(), "surface ready");
        self.lifecycle = Lifecycle::Ready(handle);
        self.ticks.register(self.id, self.config.tick_interval);
        overlay::init();
        Ok(())
    }

    fn render(&mut self, backend: &mut dyn FrameBackend, size: ViewportSize) -> Result<(), SurfaceError> {
        let Lifecycle::Ready(handle) = &mut self.lifecycle else {
            return Ok(());
        };
        let overlay = overlay::init();

        let mut ctx = self.contexts.activate(handle)?;
        ctx.begin_frame();
        frame::build_frame(
            &mut ctx,
            &mut self.input,
            &mut self.guides,
            &mut self.plot_viewport,
            &mut self.scratch,
            &self.config,
            overlay,
            size,
        );
        ctx.clear(backend, self.config.background, size);
        ctx.submit(backend)?;

        self.frames_rendered += 1;
        tracing::trace!(surface = %self.id, ?size, commands = ctx.commands().len(), "frame submitted");
        Ok(())
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("guides", &self.guides)
            .field("frames_rendered", &self.frames_rendered)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RecordingBackend;
    use crate::context::{ContextEvent, ContextId};
    use crate::error::{ContextError, SubmitError};
    use crate::frame::PanelLayout;
    use crate::geom::ScreenPoint;
    use crate::render::{LineSegment, RenderCommand, build_line_segments};
    use crate::signal;
    use crate::transform::Transform;

    const SIZE: ViewportSize = ViewportSize {
        width: 200,
        height: 200,
    };

    fn ready_surface(contexts: &ContextManager, ticks: &TickScheduler) -> Surface {
        let mut surface = Surface::new(SurfaceConfig::default(), contexts.clone(), ticks.clone());
        let mut backend = RecordingBackend::new();
        assert_eq!(surface.on_tick(&mut backend, SIZE), TickOutcome::Initialized);
        assert!(backend.frames().is_empty());
        surface
    }

    fn plot_transform(surface: &Surface) -> Transform {
        let layout = PanelLayout::fullscreen(SIZE, overlay::init().text_style.size);
        Transform::new(surface.plot_viewport(), layout.plot).expect("plot area")
    }

    fn series_segments(backend: &RecordingBackend) -> Vec<LineSegment> {
        let style = overlay::init().series_style;
        backend
            .last_frame()
            .expect("frame")
            .commands
            .commands()
            .iter()
            .find_map(|command| match command {
                RenderCommand::LineSegments { segments, style: s } if *s == style && segments.len() > 1 => {
                    Some(segments.clone())
                }
                _ => None,
            })
            .unwrap_or_default()
    }

    fn drag_x1_to(surface: &mut Surface, target: f64) {
        let transform = plot_transform(surface);
        let plot = transform.screen();
        let y = (plot.min.y + plot.max.y) * 0.5;
        let from = transform.x_to_screen(surface.guides().x1);
        let to = transform.x_to_screen(target);
        surface.handle_pointer(PointerEvent::Pressed(ScreenPoint::new(from, y)));
        surface.handle_pointer(PointerEvent::Moved(ScreenPoint::new(to, y)));
    }

    #[test]
    fn first_tick_only_initializes() {
        let contexts = ContextManager::new();
        let ticks = TickScheduler::new();
        let mut surface = Surface::new(SurfaceConfig::default(), contexts.clone(), ticks.clone());
        assert_eq!(surface.state(), SurfaceState::Uninitialized);
        assert!(!ticks.is_registered(surface.id()));

        let mut backend = RecordingBackend::new();
        assert_eq!(surface.on_tick(&mut backend, SIZE), TickOutcome::Initialized);
        assert_eq!(surface.state(), SurfaceState::Ready);
        assert!(ticks.is_registered(surface.id()));
        assert_eq!(contexts.live_contexts(), 1);
        assert!(overlay::get().is_some());

        assert_eq!(surface.on_tick(&mut backend, SIZE), TickOutcome::Rendered);
        assert_eq!(surface.frames_rendered(), 1);
        let frame = backend.last_frame().expect("frame");
        assert_eq!(
            frame.clear,
            Some((Color::from_rgb8(114, 144, 154), SIZE))
        );
        assert!(!frame.commands.is_empty());
    }

    #[test]
    fn interleaved_ticks_draw_only_into_the_active_context() {
        let contexts = ContextManager::recording();
        let ticks = TickScheduler::new();
        let mut a = ready_surface(&contexts, &ticks);
        let mut b = ready_surface(&contexts, &ticks);
        let mut backend = RecordingBackend::new();

        for _ in 0..3 {
            assert_eq!(a.on_tick(&mut backend, SIZE), TickOutcome::Rendered);
            assert_eq!(b.on_tick(&mut backend, SIZE), TickOutcome::Rendered);
        }

        let trace = contexts.take_trace();
        let mut current: Option<ContextId> = None;
        let mut draws = 0;
        for event in &trace {
            match event {
                ContextEvent::Activated(id) => current = Some(*id),
                event if event.is_draw_call() => {
                    assert_eq!(current, Some(event.context()), "stray {event:?} in {trace:?}");
                    draws += 1;
                }
                _ => {}
            }
        }
        assert!(draws > 0);

        let submitted: Vec<_> = backend.frames().iter().map(|frame| frame.context).collect();
        assert_eq!(submitted.len(), 6);
        assert_ne!(submitted[0], submitted[1]);
        assert_eq!(submitted[0], submitted[2]);
    }

    #[test]
    fn dragging_one_surface_leaves_the_other_untouched() {
        let contexts = ContextManager::new();
        let ticks = TickScheduler::new();
        let mut a = ready_surface(&contexts, &ticks);
        let mut b = ready_surface(&contexts, &ticks);
        let mut backend_a = RecordingBackend::new();
        let mut backend_b = RecordingBackend::new();

        a.on_tick(&mut backend_a, SIZE);
        let before = backend_a.take_frames();

        drag_x1_to(&mut b, 0.5);
        a.on_tick(&mut backend_a, SIZE);
        b.on_tick(&mut backend_b, SIZE);

        assert!((b.guides().x1 - 0.5).abs() < 1e-4);
        assert_eq!(a.guides(), &GuideState::default());
        let after = backend_a.take_frames();
        assert_eq!(before[0].commands, after[0].commands);
        assert_ne!(
            backend_b.last_frame().map(|frame| &frame.commands),
            Some(&after[0].commands)
        );
    }

    #[test]
    fn drag_ends_on_release() {
        let contexts = ContextManager::new();
        let ticks = TickScheduler::new();
        let mut surface = ready_surface(&contexts, &ticks);
        let mut backend = RecordingBackend::new();

        drag_x1_to(&mut surface, 0.4);
        surface.on_tick(&mut backend, SIZE);
        let transform = plot_transform(&surface);
        let cursor = ScreenPoint::new(transform.x_to_screen(0.4), transform.y_to_screen(0.5));
        surface.handle_pointer(PointerEvent::Released(cursor));
        surface.on_tick(&mut backend, SIZE);

        surface.handle_pointer(PointerEvent::Moved(cursor.offset(50.0, 0.0)));
        surface.on_tick(&mut backend, SIZE);
        assert!((surface.guides().x1 - 0.4).abs() < 1e-4);
    }

    #[test]
    fn dragging_frequency_changes_only_frequency() {
        let contexts = ContextManager::new();
        let ticks = TickScheduler::new();
        let mut surface = ready_surface(&contexts, &ticks);
        let mut backend = RecordingBackend::new();

        let transform = plot_transform(&surface);
        let x = transform.x_to_screen(0.5);
        let from = ScreenPoint::new(x, transform.y_to_screen(0.1));
        let to = ScreenPoint::new(x, transform.y_to_screen(0.5));
        surface.handle_pointer(PointerEvent::Pressed(from));
        surface.handle_pointer(PointerEvent::Moved(to));
        surface.on_tick(&mut backend, SIZE);
        surface.handle_pointer(PointerEvent::Released(to));
        surface.on_tick(&mut backend, SIZE);

        let guides = *surface.guides();
        assert!((guides.frequency - 0.5).abs() < 1e-4);
        assert_eq!(
            guides,
            GuideState {
                frequency: guides.frequency,
                ..GuideState::default()
            }
        );
        assert_eq!(surface.plot_viewport(), Viewport::unit());

        let mut expected = Vec::new();
        let points = signal::generate(&guides, surface.config().sample_count);
        build_line_segments(&points, &transform, transform.screen(), &mut expected);
        assert_eq!(series_segments(&backend), expected);

        let mut before = Vec::new();
        let points = signal::generate(&GuideState::default(), surface.config().sample_count);
        build_line_segments(&points, &transform, transform.screen(), &mut before);
        assert_ne!(expected, before);
    }

    #[test]
    fn guide_dragged_out_of_view_is_recovered_by_fit() {
        let contexts = ContextManager::new();
        let ticks = TickScheduler::new();
        let mut surface = ready_surface(&contexts, &ticks);
        let mut backend = RecordingBackend::new();

        let transform = plot_transform(&surface);
        let plot = transform.screen();
        let y = transform.y_to_screen(0.5);
        let outside = ScreenPoint::new(plot.max.x + 6.0, y);
        surface.handle_pointer(PointerEvent::Pressed(ScreenPoint::new(transform.x_to_screen(0.8), y)));
        surface.handle_pointer(PointerEvent::Moved(outside));
        surface.on_tick(&mut backend, SIZE);
        surface.handle_pointer(PointerEvent::Released(outside));
        surface.on_tick(&mut backend, SIZE);
        let lost = surface.guides().x2;
        assert!(lost > surface.plot_viewport().x.max);

        let center = ScreenPoint::new(transform.x_to_screen(0.5), y);
        surface.handle_pointer(PointerEvent::DoubleClicked(center));
        surface.on_tick(&mut backend, SIZE);
        let fitted = surface.plot_viewport();
        assert!(fitted.x.min < surface.guides().x1 && fitted.x.max > lost);

        let transform = plot_transform(&surface);
        let y = transform.y_to_screen(0.45);
        let grab = ScreenPoint::new(transform.x_to_screen(lost), y);
        let target = ScreenPoint::new(transform.x_to_screen(0.9), y);
        surface.handle_pointer(PointerEvent::Pressed(grab));
        surface.handle_pointer(PointerEvent::Moved(target));
        surface.on_tick(&mut backend, SIZE);
        surface.handle_pointer(PointerEvent::Released(target));
        surface.on_tick(&mut backend, SIZE);

        assert!((surface.guides().x2 - 0.9).abs() < 1e-3);
        assert_eq!(surface.plot_viewport(), fitted);
    }

    #[test]
    fn panning_moves_the_plot_not_the_guides() {
        let contexts = ContextManager::new();
        let ticks = TickScheduler::new();
        let mut surface = ready_surface(&contexts, &ticks);
        let mut backend = RecordingBackend::new();

        let transform = plot_transform(&surface);
        let start = ScreenPoint::new(transform.x_to_screen(0.5), transform.y_to_screen(0.5));
        let end = ScreenPoint::new(transform.x_to_screen(0.3), transform.y_to_screen(0.5));
        surface.handle_pointer(PointerEvent::Pressed(start));
        surface.handle_pointer(PointerEvent::Moved(end));
        surface.on_tick(&mut backend, SIZE);

        assert_eq!(surface.guides(), &GuideState::default());
        let viewport = surface.plot_viewport();
        assert!((viewport.x.min - 0.2).abs() < 1e-4);
        assert!((viewport.x.max - 1.2).abs() < 1e-4);
        assert_eq!(viewport.y, Viewport::unit().y);
    }

    #[test]
    fn submit_failure_destroys_only_the_failing_surface() {
        let contexts = ContextManager::new();
        let ticks = TickScheduler::new();
        let mut a = ready_surface(&contexts, &ticks);
        let mut b = ready_surface(&contexts, &ticks);
        let mut lost = RecordingBackend::new();
        lost.fail_submissions(SubmitError::DeviceLost);
        let mut healthy = RecordingBackend::new();

        assert_eq!(
            a.on_tick(&mut lost, SIZE),
            TickOutcome::Failed(SurfaceError::Submit(SubmitError::DeviceLost))
        );
        assert_eq!(a.state(), SurfaceState::Destroyed);
        assert!(!ticks.is_registered(a.id()));
        assert_eq!(contexts.live_contexts(), 1);
        assert_eq!(contexts.active(), None);

        assert_eq!(b.on_tick(&mut healthy, SIZE), TickOutcome::Rendered);
        assert_eq!(b.on_tick(&mut healthy, SIZE), TickOutcome::Rendered);
        assert_eq!(a.on_tick(&mut healthy, SIZE), TickOutcome::Dropped);
        assert_eq!(healthy.frames().len(), 2);

        lost.recover();
        assert_eq!(a.on_tick(&mut lost, SIZE), TickOutcome::Dropped);
        assert_eq!(a.state(), SurfaceState::Destroyed);
        assert!(lost.frames().is_empty());
    }

    #[test]
    fn context_limit_fails_initialization() {
        let contexts = ContextManager::with_limit(1);
        let ticks = TickScheduler::new();
        let _first = ready_surface(&contexts, &ticks);
        let mut second = Surface::new(SurfaceConfig::default(), contexts.clone(), ticks.clone());
        let mut backend = RecordingBackend::new();

        assert_eq!(
            second.on_tick(&mut backend, SIZE),
            TickOutcome::Failed(SurfaceError::Context(ContextError::Exhausted { limit: 1 }))
        );
        assert_eq!(second.state(), SurfaceState::Destroyed);
        assert!(!ticks.is_registered(second.id()));
    }

    #[test]
    fn drop_releases_context_and_ticks() {
        let contexts = ContextManager::new();
        let ticks = TickScheduler::new();
        let surface = ready_surface(&contexts, &ticks);
        let id = surface.id();
        drop(surface);
        assert_eq!(contexts.live_contexts(), 0);
        assert!(!ticks.is_registered(id));
    }

    #[test]
    fn destroyed_surface_ignores_ticks_and_input() {
        let contexts = ContextManager::new();
        let ticks = TickScheduler::new();
        let mut surface = ready_surface(&contexts, &ticks);
        surface.destroy();
        surface.destroy();
        drag_x1_to(&mut surface, 0.6);

        let mut backend = RecordingBackend::new();
        assert_eq!(surface.on_tick(&mut backend, SIZE), TickOutcome::Dropped);
        assert!(backend.frames().is_empty());
        assert_eq!(surface.guides().x1, 0.2);
    }

    #[test]
    fn empty_viewport_still_submits() {
        let contexts = ContextManager::new();
        let ticks = TickScheduler::new();
        let mut surface = ready_surface(&contexts, &ticks);
        let mut backend = RecordingBackend::new();
        let empty = ViewportSize::new(0, 0);

        assert_eq!(surface.on_tick(&mut backend, empty), TickOutcome::Rendered);
        let frame = backend.last_frame().expect("frame");
        assert_eq!(frame.clear.map(|(_, size)| size), Some(empty));
        assert!(
            !frame
                .commands
                .commands()
                .iter()
                .any(|command| matches!(command, RenderCommand::ClipRect(_)))
        );
    }
}
