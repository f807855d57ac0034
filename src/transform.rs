//! Coordinate transforms between data and screen space.

use crate::geom::{Point, ScreenPoint, ScreenRect};
use crate::view::{Range, Viewport};

const MIN_SPAN: f64 = 1e-12;

/// Linear transform from data coordinates into a screen rectangle.
///
/// Screen Y grows downwards, so the data Y axis is flipped.
#[derive(Debug, Clone)]
pub struct Transform {
    screen: ScreenRect,
    x_axis: Range,
    y_axis: Range,
}

impl Transform {
    /// Create a transform for the given viewport and screen rectangle.
    ///
    /// Returns `None` when the rectangle has no area or the viewport is not finite.
    pub fn new(viewport: Viewport, screen: ScreenRect) -> Option<Self> {
        if !screen.is_valid() || !viewport.x.is_finite() || !viewport.y.is_finite() {
            return None;
        }
        Some(Self {
            screen,
            x_axis: viewport.x.with_min_span(MIN_SPAN),
            y_axis: viewport.y.with_min_span(MIN_SPAN),
        })
    }

    /// Access the screen rectangle.
    pub fn screen(&self) -> ScreenRect {
        self.screen
    }

    /// Map a data X value to a screen X coordinate.
    pub fn x_to_screen(&self, x: f64) -> f32 {
        let norm = (x - self.x_axis.min) / self.x_axis.span();
        (self.screen.min.x as f64 + norm * self.screen.width() as f64) as f32
    }

    /// Map a data Y value to a screen Y coordinate.
    pub fn y_to_screen(&self, y: f64) -> f32 {
        let norm = (y - self.y_axis.min) / self.y_axis.span();
        (self.screen.max.y as f64 - norm * self.screen.height() as f64) as f32
    }

    /// Map a data point into screen space.
    pub fn data_to_screen(&self, point: Point) -> Option<ScreenPoint> {
        if !point.x.is_finite() || !point.y.is_finite() {
            return None;
        }
        Some(ScreenPoint::new(
            self.x_to_screen(point.x),
            self.y_to_screen(point.y),
        ))
    }

    /// Map a screen point into data space.
    pub fn screen_to_data(&self, point: ScreenPoint) -> Point {
        let x_norm = (point.x as f64 - self.screen.min.x as f64) / self.screen.width() as f64;
        let y_norm = (self.screen.max.y as f64 - point.y as f64) / self.screen.height() as f64;
        Point::new(
            self.x_axis.min + x_norm * self.x_axis.span(),
            self.y_axis.min + y_norm * self.y_axis.span(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_roundtrip() {
        let viewport = Viewport::new(Range::new(0.0, 10.0), Range::new(0.0, 10.0));
        let screen = ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(100.0, 100.0));
        let transform = Transform::new(viewport, screen).expect("valid transform");
        let point = Point::new(5.0, 7.5);
        let screen_point = transform.data_to_screen(point).unwrap();
        let roundtrip = transform.screen_to_data(screen_point);
        assert!((roundtrip.x - point.x).abs() < 1e-4);
        assert!((roundtrip.y - point.y).abs() < 1e-4);
    }

    #[test]
    fn y_axis_is_flipped() {
        let screen = ScreenRect::new(ScreenPoint::new(0.0, 20.0), ScreenPoint::new(100.0, 120.0));
        let transform = Transform::new(Viewport::unit(), screen).expect("valid transform");
        assert_eq!(transform.y_to_screen(0.0), 120.0);
        assert_eq!(transform.y_to_screen(1.0), 20.0);
    }

    #[test]
    fn rejects_empty_rect() {
        let screen = ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(0.0, 10.0));
        assert!(Transform::new(Viewport::unit(), screen).is_none());
    }
}
