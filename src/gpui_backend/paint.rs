use gpui::{
    App, BorderStyle, Bounds, ContentMask, Corners, Edges, PathBuilder, Pixels, TextRun, Window,
    font, point, px, quad,
};

use crate::geom::{ScreenPoint, ScreenRect};
use crate::render::{Color, LineSegment, LineStyle, RectStyle, RenderCommand, TextStyle};

use super::view::SurfaceFrame;

/// Paint a captured frame. Commands are surface-local and get shifted by the
/// canvas origin.
pub(crate) fn paint_frame(frame: &SurfaceFrame, window: &mut Window, cx: &mut App) {
    let origin = frame.origin;
    if let Some(background) = frame.background {
        window.paint_quad(quad(
            to_bounds(origin, frame.bounds),
            Corners::all(px(0.0)),
            to_rgba(background),
            Edges::all(px(0.0)),
            to_rgba(background),
            BorderStyle::default(),
        ));
    }

    let mut clip_stack: Vec<ContentMask<Pixels>> = Vec::new();
    for command in frame.render.commands() {
        match command {
            RenderCommand::ClipRect(rect) => {
                clip_stack.push(ContentMask {
                    bounds: to_bounds(origin, *rect),
                });
            }
            RenderCommand::ClipEnd => {
                clip_stack.pop();
            }
            RenderCommand::LineSegments { segments, style } => {
                with_clip(window, &clip_stack, |window| {
                    paint_lines(window, origin, segments, *style);
                });
            }
            RenderCommand::Rect { rect, style } => {
                with_clip(window, &clip_stack, |window| {
                    paint_rect(window, origin, *rect, *style);
                });
            }
            RenderCommand::Text {
                position,
                text,
                style,
            } => {
                with_clip(window, &clip_stack, |window| {
                    paint_text(window, cx, origin, *position, text, style);
                });
            }
        }
    }
}

fn paint_lines(window: &mut Window, origin: ScreenPoint, segments: &[LineSegment], style: LineStyle) {
    if segments.is_empty() {
        return;
    }
    let width = style.width.max(0.5);
    let mut builder = PathBuilder::stroke(px(width));
    for segment in segments {
        builder.move_to(to_point(origin, segment.start));
        builder.line_to(to_point(origin, segment.end));
    }
    if let Ok(path) = builder.build() {
        window.paint_path(path, to_rgba(style.color));
    }
}

fn paint_rect(window: &mut Window, origin: ScreenPoint, rect: ScreenRect, style: RectStyle) {
    window.paint_quad(quad(
        to_bounds(origin, rect),
        Corners::all(px(0.0)),
        to_rgba(style.fill),
        Edges::all(px(style.stroke_width)),
        to_rgba(style.stroke),
        BorderStyle::default(),
    ));
}

fn paint_text(
    window: &mut Window,
    cx: &mut App,
    origin: ScreenPoint,
    position: ScreenPoint,
    text: &str,
    style: &TextStyle,
) {
    if text.is_empty() {
        return;
    }
    let font_size = px(style.size);
    let run = TextRun {
        len: text.len(),
        font: font(".SystemUIFont"),
        color: gpui::Hsla::from(to_rgba(style.color)),
        background_color: None,
        underline: None,
        strikethrough: None,
    };
    let shaped = window
        .text_system()
        .shape_line(text.to_string().into(), font_size, &[run], None);
    let line_height = shaped.ascent + shaped.descent;
    let _ = shaped.paint(to_point(origin, position), line_height, window, cx);
}

fn to_rgba(color: Color) -> gpui::Rgba {
    gpui::Rgba {
        r: color.r,
        g: color.g,
        b: color.b,
        a: color.a,
    }
}

fn to_point(origin: ScreenPoint, local: ScreenPoint) -> gpui::Point<Pixels> {
    point(px(origin.x + local.x), px(origin.y + local.y))
}

fn to_bounds(origin: ScreenPoint, rect: ScreenRect) -> Bounds<Pixels> {
    Bounds::from_corners(to_point(origin, rect.min), to_point(origin, rect.max))
}

fn with_clip(window: &mut Window, stack: &[ContentMask<Pixels>], f: impl FnOnce(&mut Window)) {
    if let Some(mask) = stack.last() {
        window.with_content_mask(Some(mask.clone()), f);
    } else {
        f(window);
    }
}
