use std::sync::{Arc, RwLock};
use std::time::Instant;

use gpui::prelude::*;
use gpui::{
    AsyncWindowContext, MouseButton, MouseDownEvent, MouseMoveEvent, MouseUpEvent, Pixels, Point,
    ScrollWheelEvent, Timer, Window, canvas, div, px,
};

use crate::backend::FrameBackend;
use crate::context::{ContextId, ContextManager};
use crate::error::SubmitError;
use crate::geom::{ScreenPoint, ScreenRect};
use crate::guide::GuideState;
use crate::interaction::PointerEvent;
use crate::render::{Color, RenderList};
use crate::surface::{Surface, SurfaceConfig, SurfaceId, SurfaceState, TickOutcome};
use crate::tick::{DEFAULT_TICK_INTERVAL, TickScheduler};
use crate::view::ViewportSize;

use super::paint::paint_frame;

/// Last frame produced by a surface, ready to paint.
#[derive(Debug, Clone, Default)]
pub(crate) struct SurfaceFrame {
    pub(crate) origin: ScreenPoint,
    pub(crate) bounds: ScreenRect,
    pub(crate) background: Option<Color>,
    pub(crate) render: RenderList,
}

impl FrameBackend for SurfaceFrame {
    fn clear(&mut self, _context: ContextId, color: Color, size: ViewportSize) {
        self.background = Some(color);
        self.bounds = ScreenRect::from_origin_size(
            ScreenPoint::default(),
            size.width as f32,
            size.height as f32,
        );
    }

    fn submit(&mut self, _context: ContextId, commands: &RenderList) -> Result<(), SubmitError> {
        self.render = commands.clone();
        Ok(())
    }
}

#[derive(Debug, Default)]
struct ViewState {
    frame: SurfaceFrame,
    tick_pending: bool,
}

/// A GPUI view hosting one [`Surface`].
///
/// Pointer events are latched into the surface as they arrive; a frame is
/// only rendered when a tick is requested, either by [`spawn_tick_loop`] or
/// on the very first paint, which initializes the surface.
#[derive(Clone)]
pub struct GpuiSurfaceView {
    id: SurfaceId,
    surface: Arc<RwLock<Surface>>,
    state: Arc<RwLock<ViewState>>,
}

impl GpuiSurfaceView {
    /// Create a view with the default [`SurfaceConfig`].
    pub fn new(contexts: ContextManager, ticks: TickScheduler) -> Self {
        Self::with_config(SurfaceConfig::default(), contexts, ticks)
    }

    /// Create a view with a custom configuration.
    pub fn with_config(config: SurfaceConfig, contexts: ContextManager, ticks: TickScheduler) -> Self {
        let surface = Surface::new(config, contexts, ticks);
        Self {
            id: surface.id(),
            surface: Arc::new(RwLock::new(surface)),
            state: Arc::new(RwLock::new(ViewState::default())),
        }
    }

    /// Id of the hosted surface.
    pub fn surface_id(&self) -> SurfaceId {
        self.id
    }

    /// Get a handle for inspecting the hosted surface.
    pub fn surface_handle(&self) -> SurfaceHandle {
        SurfaceHandle {
            surface: Arc::clone(&self.surface),
        }
    }

    /// Render a new frame on the next paint.
    pub fn request_tick(&mut self, cx: &mut Context<Self>) {
        self.state.write().expect("surface view lock").tick_pending = true;
        cx.notify();
    }

    /// Convert a window position to surface-local pixels.
    fn local(&self, position: Point<Pixels>) -> (ScreenPoint, ScreenRect) {
        let state = self.state.read().expect("surface view lock");
        let origin = state.frame.origin;
        let local = ScreenPoint::new(
            f32::from(position.x) - origin.x,
            f32::from(position.y) - origin.y,
        );
        (local, state.frame.bounds)
    }

    fn forward(&self, event: PointerEvent) {
        self.surface
            .write()
            .expect("surface lock")
            .handle_pointer(event);
    }

    fn on_mouse_down(&mut self, ev: &MouseDownEvent) {
        let (local, _) = self.local(ev.position);
        if ev.click_count >= 2 {
            self.forward(PointerEvent::DoubleClicked(local));
        } else {
            self.forward(PointerEvent::Pressed(local));
        }
    }

    fn on_mouse_move(&mut self, ev: &MouseMoveEvent) {
        let (local, bounds) = self.local(ev.position);
        if bounds.contains(local) {
            self.forward(PointerEvent::Moved(local));
        } else {
            self.forward(PointerEvent::Left);
        }
    }

    fn on_mouse_up(&mut self, ev: &MouseUpEvent) {
        let (local, _) = self.local(ev.position);
        self.forward(PointerEvent::Released(local));
    }

    fn on_scroll(&mut self, ev: &ScrollWheelEvent) {
        let (local, _) = self.local(ev.position);
        let delta = ev.delta.pixel_delta(px(16.0));
        let delta_y = -f32::from(delta.y);
        if delta_y.abs() < 0.01 {
            return;
        }
        self.forward(PointerEvent::Scrolled { at: local, delta_y });
    }
}

impl Render for GpuiSurfaceView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let surface = Arc::clone(&self.surface);
        let state = Arc::clone(&self.state);

        div()
            .size_full()
            .child(
                canvas(
                    move |bounds, _, _| {
                        let mut surface = surface.write().expect("surface lock");
                        let mut state = state.write().expect("surface view lock");
                        state.frame.origin =
                            ScreenPoint::new(f32::from(bounds.origin.x), f32::from(bounds.origin.y));
                        let needs_tick = std::mem::take(&mut state.tick_pending)
                            || surface.state() == SurfaceState::Uninitialized;
                        if needs_tick {
                            let size = ViewportSize::new(
                                f32::from(bounds.size.width).max(0.0) as u32,
                                f32::from(bounds.size.height).max(0.0) as u32,
                            );
                            if let TickOutcome::Failed(_) = surface.on_tick(&mut state.frame, size) {
                                state.frame.background = None;
                                state.frame.render.clear();
                            }
                        }
                        state.frame.clone()
                    },
                    move |_, frame, window, cx| {
                        paint_frame(&frame, window, cx);
                    },
                )
                .size_full(),
            )
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|this, ev, _, _| {
                    this.on_mouse_down(ev);
                }),
            )
            .on_mouse_move(cx.listener(|this, ev, _, _| {
                this.on_mouse_move(ev);
            }))
            .on_mouse_up(
                MouseButton::Left,
                cx.listener(|this, ev, _, _| {
                    this.on_mouse_up(ev);
                }),
            )
            .on_mouse_up_out(
                MouseButton::Left,
                cx.listener(|this, ev, _, _| {
                    this.on_mouse_up(ev);
                }),
            )
            .on_scroll_wheel(cx.listener(|this, ev, _, _| {
                this.on_scroll(ev);
            }))
    }
}

/// A handle for reading a [`Surface`] held inside a `GpuiSurfaceView`.
#[derive(Clone)]
pub struct SurfaceHandle {
    surface: Arc<RwLock<Surface>>,
}

impl SurfaceHandle {
    /// Read the surface.
    ///
    /// The surface is locked for the duration of the callback.
    pub fn read<R>(&self, f: impl FnOnce(&Surface) -> R) -> R {
        let surface = self.surface.read().expect("surface lock");
        f(&surface)
    }

    /// Current guide values of the surface.
    pub fn guides(&self) -> GuideState {
        self.read(|surface| *surface.guides())
    }

    /// Tear the surface down. Later ticks are ignored.
    pub fn destroy(&self) {
        self.surface.write().expect("surface lock").destroy();
    }
}

/// Drive the views from `ticks` until the window closes.
///
/// Each due surface gets its own tick; views are updated one after another,
/// never concurrently.
pub fn spawn_tick_loop(
    window: &mut Window,
    cx: &mut gpui::App,
    ticks: TickScheduler,
    views: Vec<gpui::Entity<GpuiSurfaceView>>,
) {
    window
        .spawn(cx, move |cx: &mut AsyncWindowContext| {
            let mut cx = cx.clone();
            async move {
                loop {
                    let wait = ticks
                        .next_deadline()
                        .map(|deadline| deadline.saturating_duration_since(Instant::now()))
                        .unwrap_or(DEFAULT_TICK_INTERVAL);
                    Timer::after(wait).await;

                    let due = ticks.due(Instant::now());
                    if due.is_empty() {
                        continue;
                    }
                    let updated = cx.update(|_, cx| {
                        for view in &views {
                            if due.contains(&view.read(cx).surface_id()) {
                                view.update(cx, |view, view_cx| view.request_tick(view_cx));
                            }
                        }
                    });
                    if updated.is_err() {
                        tracing::debug!("window closed, stopping tick loop");
                        break;
                    }
                }
            }
        })
        .detach();
}
