//! Shared styling and hit-testing parameters for guide primitives.
//!
//! The overlay is initialized once per process, the first time any surface
//! becomes ready, and is read-only afterwards.

use std::sync::OnceLock;

use crate::guide::GuideId;
use crate::render::{Color, LineStyle, TextStyle};

static OVERLAY: OnceLock<GuideOverlay> = OnceLock::new();

/// Process-wide parameters used by the drag-line and checkbox primitives.
#[derive(Debug, Clone)]
pub struct GuideOverlay {
    /// Distance in pixels within which a press grabs a guide.
    pub grab_tolerance_px: f32,
    /// Style of the four rectangle guides.
    pub guide_style: LineStyle,
    /// Style of the frequency guide.
    pub frequency_style: LineStyle,
    /// Stroke width of a hovered or dragged guide.
    pub highlight_width: f32,
    /// Style of guide value labels.
    pub label_style: TextStyle,
    /// Style of the panel text (hint, checkbox caption, legend).
    pub text_style: TextStyle,
    /// Style of the plotted series.
    pub series_style: LineStyle,
}

impl GuideOverlay {
    /// Line style for a guide, highlighted when hovered or dragged.
    pub fn style_for(&self, guide: GuideId, highlighted: bool) -> LineStyle {
        let mut style = match guide {
            GuideId::Frequency => self.frequency_style,
            _ => self.guide_style,
        };
        if highlighted {
            style.width = self.highlight_width;
        }
        style
    }
}

impl Default for GuideOverlay {
    fn default() -> Self {
        Self {
            grab_tolerance_px: 4.0,
            guide_style: LineStyle {
                color: Color::WHITE,
                width: 1.0,
            },
            frequency_style: LineStyle {
                color: Color::new(1.0, 0.5, 1.0, 1.0),
                width: 1.0,
            },
            highlight_width: 2.0,
            label_style: TextStyle {
                color: Color::WHITE,
                size: 11.0,
            },
            text_style: TextStyle {
                color: Color::new(0.95, 0.95, 0.95, 1.0),
                size: 13.0,
            },
            series_style: LineStyle {
                color: Color::new(0.0, 0.45, 0.7, 1.0),
                width: 1.5,
            },
        }
    }
}

/// Initialize the overlay if needed and return it.
pub fn init() -> &'static GuideOverlay {
    OVERLAY.get_or_init(|| {
        tracing::debug!("initialized guide overlay");
        GuideOverlay::default()
    })
}

/// The overlay, if some surface already initialized it.
pub fn get() -> Option<&'static GuideOverlay> {
    OVERLAY.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_returns_the_same_instance() {
        let first = init();
        let second = init();
        assert!(std::ptr::eq(first, second));
        assert!(get().is_some_and(|overlay| std::ptr::eq(overlay, first)));
    }

    #[test]
    fn highlight_only_changes_width() {
        let overlay = GuideOverlay::default();
        let plain = overlay.style_for(GuideId::Frequency, false);
        let hot = overlay.style_for(GuideId::Frequency, true);
        assert_eq!(plain.color, hot.color);
        assert_eq!(hot.width, overlay.highlight_width);
    }
}
