//! Per-frame content of a surface.
//!
//! The panel always covers the whole drawable area: it has no decoration and
//! cannot be moved or resized independently of the host, so its layout is a
//! pure function of the viewport size. It holds a hint line, the
//! "Show Labels" checkbox, and the plot area with the guides and the series.
//! The plot area shows a per-surface viewport that the user can pan, zoom,
//! and fit to the guides.

use crate::context::ActiveContext;
use crate::geom::{Point, ScreenPoint, ScreenRect};
use crate::guide::{GuideAxis, GuideId, GuideState};
use crate::interaction::{InteractionState, checkbox, drag_line_x, drag_line_y, navigate};
use crate::overlay::GuideOverlay;
use crate::render::{LineSegment, RectStyle, RenderCommand, build_line_segments};
use crate::signal;
use crate::surface::SurfaceConfig;
use crate::transform::Transform;
use crate::view::{Viewport, ViewportSize};

/// Hint shown at the top of every panel.
pub const HINT_TEXT: &str = "Click and drag the horizontal and vertical lines.";
/// Caption of the label toggle.
pub const SHOW_LABELS_TEXT: &str = "Show Labels";
/// Legend label of the generated series.
pub const SERIES_LABEL: &str = "Interactive Data";

const PANEL_PADDING: f32 = 8.0;
const LINE_SPACING: f32 = 1.6;
const BULLET_RADIUS: f32 = 2.0;

/// Placement of the panel's widgets for one viewport size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelLayout {
    /// Whole drawable area.
    pub panel: ScreenRect,
    /// Top-left of the hint line.
    pub hint: ScreenPoint,
    /// Top-left of the checkbox.
    pub checkbox: ScreenPoint,
    /// Plot area filling the rest of the panel.
    pub plot: ScreenRect,
}

impl PanelLayout {
    /// Lay out a panel covering the full viewport.
    pub fn fullscreen(size: ViewportSize, text_size: f32) -> Self {
        let panel = ScreenRect::from_origin_size(
            ScreenPoint::new(0.0, 0.0),
            size.width as f32,
            size.height as f32,
        );
        let hint = ScreenPoint::new(PANEL_PADDING, PANEL_PADDING);
        let checkbox = hint.offset(0.0, text_size * LINE_SPACING);
        let plot_top = checkbox.y + text_size + PANEL_PADDING;
        let plot = ScreenRect::new(
            ScreenPoint::new(PANEL_PADDING, plot_top),
            ScreenPoint::new(
                panel.max.x - PANEL_PADDING,
                (panel.max.y - PANEL_PADDING).max(plot_top),
            ),
        );
        Self {
            panel,
            hint,
            checkbox,
            plot,
        }
    }
}

/// Buffers reused across frames. Their contents are rebuilt every frame.
#[derive(Debug, Default)]
pub(crate) struct FrameScratch {
    pub(crate) series: Vec<Point>,
    segments: Vec<LineSegment>,
}

/// Record the panel, run the interaction pass, and plot the series.
#[allow(clippy::too_many_arguments)]
pub(crate) fn build_frame(
    ctx: &mut ActiveContext<'_>,
    input: &mut InteractionState,
    guides: &mut GuideState,
    viewport: &mut Viewport,
    scratch: &mut FrameScratch,
    config: &SurfaceConfig,
    overlay: &GuideOverlay,
    size: ViewportSize,
) {
    let text = &overlay.text_style;
    let layout = PanelLayout::fullscreen(size, text.size);

    build_hint(ctx, overlay, layout.hint);
    checkbox(
        ctx,
        input,
        text,
        layout.checkbox,
        SHOW_LABELS_TEXT,
        &mut guides.show_labels,
    );

    let transform = Transform::new(*viewport, layout.plot);
    if let Some(transform) = transform.as_ref() {
        ctx.draw(RenderCommand::ClipRect(layout.plot));
        ctx.draw(RenderCommand::Rect {
            rect: layout.plot,
            style: RectStyle {
                stroke: overlay.guide_style.color,
                ..RectStyle::default()
            },
        });
        build_guides(ctx, input, guides, overlay, transform);
        if navigate(input, viewport, transform, guides) {
            tracing::trace!(?viewport, "plot viewport changed");
        }
    }

    signal::generate_into(guides, config.sample_count, &mut scratch.series);

    if let Some(transform) = transform.as_ref() {
        build_series(ctx, scratch, overlay, transform);
        ctx.draw(RenderCommand::ClipEnd);
    }

    input.end_frame();
}

fn build_hint(ctx: &mut ActiveContext<'_>, overlay: &GuideOverlay, origin: ScreenPoint) {
    let size = overlay.text_style.size;
    let center = origin.offset(size * 0.5, size * 0.5);
    ctx.draw(RenderCommand::Rect {
        rect: ScreenRect::new(
            center.offset(-BULLET_RADIUS, -BULLET_RADIUS),
            center.offset(BULLET_RADIUS, BULLET_RADIUS),
        ),
        style: RectStyle {
            fill: overlay.text_style.color,
            stroke: overlay.text_style.color,
            stroke_width: 0.0,
        },
    });
    ctx.draw(RenderCommand::Text {
        position: origin.offset(size * 1.5, 0.0),
        text: HINT_TEXT.to_string(),
        style: overlay.text_style.clone(),
    });
}

fn build_guides(
    ctx: &mut ActiveContext<'_>,
    input: &mut InteractionState,
    guides: &mut GuideState,
    overlay: &GuideOverlay,
    transform: &Transform,
) {
    let labels = guides.show_labels;
    for guide in GuideId::ALL {
        let value = guide.value_mut(guides);
        match guide.axis() {
            GuideAxis::Vertical => {
                drag_line_x(ctx, input, overlay, transform, guide, value, labels);
            }
            GuideAxis::Horizontal => {
                drag_line_y(ctx, input, overlay, transform, guide, value, labels);
            }
        }
    }
}

fn build_series(
    ctx: &mut ActiveContext<'_>,
    scratch: &mut FrameScratch,
    overlay: &GuideOverlay,
    transform: &Transform,
) {
    let plot = transform.screen();
    build_line_segments(&scratch.series, transform, plot, &mut scratch.segments);
    if !scratch.segments.is_empty() {
        ctx.draw(RenderCommand::LineSegments {
            segments: scratch.segments.clone(),
            style: overlay.series_style,
        });
    }

    // Legend entry in the top-left corner of the plot.
    let size = overlay.label_style.size;
    let swatch_y = plot.min.y + PANEL_PADDING + size * 0.5;
    let swatch_x = plot.min.x + PANEL_PADDING;
    ctx.draw(RenderCommand::LineSegments {
        segments: vec![LineSegment::new(
            ScreenPoint::new(swatch_x, swatch_y),
            ScreenPoint::new(swatch_x + size * 1.5, swatch_y),
        )],
        style: overlay.series_style,
    });
    ctx.draw(RenderCommand::Text {
        position: ScreenPoint::new(swatch_x + size * 2.0, plot.min.y + PANEL_PADDING),
        text: SERIES_LABEL.to_string(),
        style: overlay.label_style.clone(),
    });
}
