//! Pointer handling and immediate-mode interaction primitives.
//!
//! Host pointer events are latched into an [`InteractionState`] between
//! frames. During a frame's interaction pass each primitive (`drag_line`,
//! `checkbox`) inspects the latched input, mutates the value it is bound to,
//! and records its own draw commands through the active context. Presses
//! that no primitive claims pan the plot; the wheel zooms it and a double
//! click fits it to the guides, so a guide dragged out of view can always be
//! brought back.

use crate::context::ActiveContext;
use crate::geom::{ScreenPoint, ScreenRect};
use crate::geom::Point;
use crate::guide::{GuideAxis, GuideId, GuideState};
use crate::overlay::GuideOverlay;
use crate::render::{Color, LineSegment, RectStyle, RenderCommand, TextStyle};
use crate::transform::Transform;
use crate::view::{Range, Viewport};

/// Fraction of the guide extent added on each side by a fit.
const FIT_MARGIN: f64 = 0.1;
/// Zoom change per scrolled pixel.
const ZOOM_PER_PIXEL: f64 = 0.002;

/// Raw pointer input routed from the host, in surface-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// The pointer moved.
    Moved(ScreenPoint),
    /// The primary button went down.
    Pressed(ScreenPoint),
    /// The primary button went up.
    Released(ScreenPoint),
    /// The primary button was double-clicked.
    DoubleClicked(ScreenPoint),
    /// The wheel scrolled by `delta_y` pixels. Positive values zoom in.
    Scrolled {
        /// Pointer position.
        at: ScreenPoint,
        /// Vertical scroll distance in pixels.
        delta_y: f32,
    },
    /// The pointer left the surface.
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingPress {
    at: ScreenPoint,
    claimed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveDrag {
    guide: GuideId,
    /// Pointer offset from the guide line at grab time, in pixels.
    grab_offset: f32,
}

/// Latched pointer input plus the guide currently being dragged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionState {
    cursor: Option<ScreenPoint>,
    down: bool,
    press: Option<PendingPress>,
    released: bool,
    drag: Option<ActiveDrag>,
    /// Last cursor position of an ongoing pan.
    pan: Option<ScreenPoint>,
    scroll: Option<(ScreenPoint, f32)>,
    fit_at: Option<ScreenPoint>,
}

impl InteractionState {
    /// Create an idle interaction state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch a host pointer event for the next interaction pass.
    pub fn handle(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Moved(pos) => {
                self.cursor = Some(pos);
            }
            PointerEvent::Pressed(pos) => {
                self.cursor = Some(pos);
                self.down = true;
                self.press = Some(PendingPress {
                    at: pos,
                    claimed: false,
                });
            }
            PointerEvent::Released(pos) => {
                self.cursor = Some(pos);
                self.down = false;
                self.released = true;
            }
            PointerEvent::DoubleClicked(pos) => {
                self.cursor = Some(pos);
                self.fit_at = Some(pos);
            }
            PointerEvent::Scrolled { at, delta_y } => {
                self.cursor = Some(at);
                let total = self.scroll.map_or(0.0, |(_, pending)| pending) + delta_y;
                self.scroll = Some((at, total));
            }
            PointerEvent::Left => {
                self.cursor = None;
            }
        }
    }

    /// Current pointer position, if the pointer is over the surface.
    pub fn cursor(&self) -> Option<ScreenPoint> {
        self.cursor
    }

    /// Guide currently being dragged.
    pub fn dragging(&self) -> Option<GuideId> {
        self.drag.map(|drag| drag.guide)
    }

    /// True while an unclaimed press is panning the plot.
    pub fn panning(&self) -> bool {
        self.pan.is_some()
    }

    /// Clear per-frame edges. Drags and pans end once the button is up.
    pub fn end_frame(&mut self) {
        self.press = None;
        if self.released || !self.down {
            self.drag = None;
            self.pan = None;
        }
        self.released = false;
        self.scroll = None;
        self.fit_at = None;
    }

    /// Claim an unclaimed press that landed inside `rect`.
    fn take_press_in(&mut self, rect: ScreenRect) -> bool {
        match self.press.as_mut() {
            Some(press) if !press.claimed && rect.contains(press.at) => {
                press.claimed = true;
                true
            }
            _ => false,
        }
    }

    /// Claim an unclaimed press within `tolerance` of a line at `line` along `axis`.
    fn take_press_near(
        &mut self,
        axis: GuideAxis,
        line: f32,
        tolerance: f32,
        plot: ScreenRect,
    ) -> Option<f32> {
        let press = self.press.as_mut()?;
        if press.claimed || !plot.contains(press.at) {
            return None;
        }
        let offset = along(axis, press.at) - line;
        if offset.abs() > tolerance {
            return None;
        }
        press.claimed = true;
        Some(offset)
    }
}

/// Draggable vertical guide bound to a data X value.
pub fn drag_line_x(
    ctx: &mut ActiveContext<'_>,
    input: &mut InteractionState,
    overlay: &GuideOverlay,
    transform: &Transform,
    guide: GuideId,
    value: &mut f64,
    show_label: bool,
) -> bool {
    drag_line(
        ctx,
        input,
        overlay,
        transform,
        GuideAxis::Vertical,
        guide,
        value,
        show_label,
    )
}

/// Draggable horizontal guide bound to a data Y value.
pub fn drag_line_y(
    ctx: &mut ActiveContext<'_>,
    input: &mut InteractionState,
    overlay: &GuideOverlay,
    transform: &Transform,
    guide: GuideId,
    value: &mut f64,
    show_label: bool,
) -> bool {
    drag_line(
        ctx,
        input,
        overlay,
        transform,
        GuideAxis::Horizontal,
        guide,
        value,
        show_label,
    )
}

#[allow(clippy::too_many_arguments)]
fn drag_line(
    ctx: &mut ActiveContext<'_>,
    input: &mut InteractionState,
    overlay: &GuideOverlay,
    transform: &Transform,
    axis: GuideAxis,
    guide: GuideId,
    value: &mut f64,
    show_label: bool,
) -> bool {
    let plot = transform.screen();
    let mut changed = false;

    if value.is_finite() {
        let line = to_screen(axis, transform, *value);
        if input.drag.is_none()
            && let Some(grab_offset) =
                input.take_press_near(axis, line, overlay.grab_tolerance_px, plot)
        {
            input.drag = Some(ActiveDrag { guide, grab_offset });
        }
    }

    if let Some(drag) = input.drag
        && drag.guide == guide
        && let Some(cursor) = input.cursor
    {
        let next = to_data(axis, transform, along(axis, cursor) - drag.grab_offset);
        if next != *value {
            *value = next;
            changed = true;
        }
    }

    if !value.is_finite() {
        return changed;
    }
    let line = to_screen(axis, transform, *value);
    let hovered = input.cursor.is_some_and(|cursor| {
        plot.contains(cursor) && (along(axis, cursor) - line).abs() <= overlay.grab_tolerance_px
    });
    let highlighted = hovered || input.dragging() == Some(guide);

    let segment = match axis {
        GuideAxis::Vertical if line >= plot.min.x && line <= plot.max.x => Some(LineSegment::new(
            ScreenPoint::new(line, plot.min.y),
            ScreenPoint::new(line, plot.max.y),
        )),
        GuideAxis::Horizontal if line >= plot.min.y && line <= plot.max.y => {
            Some(LineSegment::new(
                ScreenPoint::new(plot.min.x, line),
                ScreenPoint::new(plot.max.x, line),
            ))
        }
        _ => None,
    };
    let Some(segment) = segment else {
        return changed;
    };

    ctx.draw(RenderCommand::LineSegments {
        segments: vec![segment],
        style: overlay.style_for(guide, highlighted),
    });

    if show_label {
        let position = match axis {
            GuideAxis::Vertical => ScreenPoint::new(line + 3.0, plot.min.y + 2.0),
            GuideAxis::Horizontal => ScreenPoint::new(
                plot.min.x + 3.0,
                line - overlay.label_style.size * 1.3,
            ),
        };
        ctx.draw(RenderCommand::Text {
            position,
            text: format!("{guide} = {:.3}", *value),
            style: overlay.label_style.clone(),
        });
    }

    changed
}

/// Pan, zoom, or fit the plot viewport from input no primitive claimed.
///
/// Runs after the guides of a frame; the new viewport takes effect on the
/// next frame. Returns true when the viewport changed.
pub fn navigate(
    input: &mut InteractionState,
    viewport: &mut Viewport,
    transform: &Transform,
    guides: &GuideState,
) -> bool {
    let plot = transform.screen();
    let before = *viewport;

    if input.fit_at.take().is_some_and(|at| plot.contains(at)) {
        *viewport = fit_guides(guides);
        input.pan = None;
        return *viewport != before;
    }

    if let Some((at, delta_y)) = input.scroll.take()
        && plot.contains(at)
    {
        let factor = (1.0 - delta_y as f64 * ZOOM_PER_PIXEL).clamp(0.1, 10.0);
        *viewport = zoom_viewport(*viewport, transform.screen_to_data(at), factor, factor);
    }

    if input.drag.is_none()
        && input.pan.is_none()
        && input.take_press_in(plot)
        && let Some(press) = input.press
    {
        input.pan = Some(press.at);
    }
    if let Some(last) = input.pan
        && let Some(cursor) = input.cursor
        && cursor != last
    {
        *viewport = pan_viewport(
            *viewport,
            ScreenPoint::new(cursor.x - last.x, cursor.y - last.y),
            transform,
        );
        input.pan = Some(cursor);
    }

    *viewport != before
}

/// Viewport framing every guide, with a margin on each side.
pub fn fit_guides(guides: &GuideState) -> Viewport {
    let x_min = guides.x1.min(guides.x2);
    let x_max = guides.x1.max(guides.x2);
    let y_min = guides.y1.min(guides.y2).min(guides.frequency);
    let y_max = guides.y1.max(guides.y2).max(guides.frequency);
    let pad = |min: f64, max: f64| {
        let margin = ((max - min) * FIT_MARGIN).max(FIT_MARGIN);
        Range::new(min - margin, max + margin)
    };
    Viewport::new(pad(x_min, x_max), pad(y_min, y_max))
}

/// Pan a viewport by a pixel delta.
pub(crate) fn pan_viewport(
    viewport: Viewport,
    delta_pixels: ScreenPoint,
    transform: &Transform,
) -> Viewport {
    let origin = transform.screen_to_data(ScreenPoint::new(0.0, 0.0));
    let shifted = transform.screen_to_data(delta_pixels);
    let dx = shifted.x - origin.x;
    let dy = shifted.y - origin.y;
    Viewport::new(
        Range::new(viewport.x.min - dx, viewport.x.max - dx),
        Range::new(viewport.y.min - dy, viewport.y.max - dy),
    )
}

/// Zoom a viewport around a center point. Factors below one zoom in.
pub(crate) fn zoom_viewport(
    viewport: Viewport,
    center: Point,
    factor_x: f64,
    factor_y: f64,
) -> Viewport {
    let x_min = center.x + (viewport.x.min - center.x) * factor_x;
    let x_max = center.x + (viewport.x.max - center.x) * factor_x;
    let y_min = center.y + (viewport.y.min - center.y) * factor_y;
    let y_max = center.y + (viewport.y.max - center.y) * factor_y;
    Viewport::new(Range::new(x_min, x_max), Range::new(y_min, y_max))
}

/// Labeled checkbox. Returns true when the value was toggled this frame.
pub fn checkbox(
    ctx: &mut ActiveContext<'_>,
    input: &mut InteractionState,
    text_style: &TextStyle,
    origin: ScreenPoint,
    label: &str,
    value: &mut bool,
) -> bool {
    let size = text_style.size;
    let check = ScreenRect::from_origin_size(origin, size, size);
    let hit = ScreenRect::new(
        origin,
        origin.offset(size * 1.5 + label.len() as f32 * size * 0.6, size),
    );

    let toggled = input.drag.is_none() && input.take_press_in(hit);
    if toggled {
        *value = !*value;
    }

    ctx.draw(RenderCommand::Rect {
        rect: check,
        style: RectStyle {
            fill: Color::new(0.0, 0.0, 0.0, 0.0),
            stroke: text_style.color,
            stroke_width: 1.0,
        },
    });
    if *value {
        let inset = size * 0.25;
        ctx.draw(RenderCommand::Rect {
            rect: ScreenRect::new(
                check.min.offset(inset, inset),
                check.max.offset(-inset, -inset),
            ),
            style: RectStyle {
                fill: text_style.color,
                stroke: text_style.color,
                stroke_width: 0.0,
            },
        });
    }
    ctx.draw(RenderCommand::Text {
        position: origin.offset(size * 1.5, 0.0),
        text: label.to_string(),
        style: text_style.clone(),
    });

    toggled
}

fn along(axis: GuideAxis, point: ScreenPoint) -> f32 {
    match axis {
        GuideAxis::Vertical => point.x,
        GuideAxis::Horizontal => point.y,
    }
}

fn to_screen(axis: GuideAxis, transform: &Transform, value: f64) -> f32 {
    match axis {
        GuideAxis::Vertical => transform.x_to_screen(value),
        GuideAxis::Horizontal => transform.y_to_screen(value),
    }
}

fn to_data(axis: GuideAxis, transform: &Transform, coord: f32) -> f64 {
    match axis {
        GuideAxis::Vertical => transform.screen_to_data(ScreenPoint::new(coord, 0.0)).x,
        GuideAxis::Horizontal => transform.screen_to_data(ScreenPoint::new(0.0, coord)).y,
    }
}
