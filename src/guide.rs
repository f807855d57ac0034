//! Per-surface draggable guide values.
//!
//! A [`GuideState`] is owned by exactly one surface and is only written by
//! that surface's interaction pass. Values are unconstrained: the two X
//! guides (or the two Y guides) may cross, which simply inverts the
//! rectangle they bound.

/// Interactive parameters of one surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideState {
    /// First vertical guide.
    pub x1: f64,
    /// Second vertical guide.
    pub x2: f64,
    /// First horizontal guide.
    pub y1: f64,
    /// Second horizontal guide.
    pub y2: f64,
    /// Oscillation frequency of the generated signal.
    pub frequency: f64,
    /// Draw value labels next to each guide.
    pub show_labels: bool,
}

impl Default for GuideState {
    fn default() -> Self {
        Self {
            x1: 0.2,
            x2: 0.8,
            y1: 0.25,
            y2: 0.75,
            frequency: 0.1,
            show_labels: true,
        }
    }
}

/// Orientation of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideAxis {
    /// Vertical line at a data X value.
    Vertical,
    /// Horizontal line at a data Y value.
    Horizontal,
}

/// Identifies one draggable guide and the field it is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuideId {
    /// Bound to [`GuideState::x1`].
    X1,
    /// Bound to [`GuideState::x2`].
    X2,
    /// Bound to [`GuideState::y1`].
    Y1,
    /// Bound to [`GuideState::y2`].
    Y2,
    /// Bound to [`GuideState::frequency`].
    Frequency,
}

impl GuideId {
    /// All guides in drawing order.
    pub const ALL: [GuideId; 5] = [
        GuideId::X1,
        GuideId::X2,
        GuideId::Y1,
        GuideId::Y2,
        GuideId::Frequency,
    ];

    /// Orientation of the guide.
    pub fn axis(self) -> GuideAxis {
        match self {
            GuideId::X1 | GuideId::X2 => GuideAxis::Vertical,
            GuideId::Y1 | GuideId::Y2 | GuideId::Frequency => GuideAxis::Horizontal,
        }
    }

    /// Short name used in labels.
    pub fn label(self) -> &'static str {
        match self {
            GuideId::X1 => "x1",
            GuideId::X2 => "x2",
            GuideId::Y1 => "y1",
            GuideId::Y2 => "y2",
            GuideId::Frequency => "f",
        }
    }

    /// Read the bound value.
    pub fn value(self, state: &GuideState) -> f64 {
        match self {
            GuideId::X1 => state.x1,
            GuideId::X2 => state.x2,
            GuideId::Y1 => state.y1,
            GuideId::Y2 => state.y2,
            GuideId::Frequency => state.frequency,
        }
    }

    /// Borrow the bound field mutably.
    pub fn value_mut(self, state: &mut GuideState) -> &mut f64 {
        match self {
            GuideId::X1 => &mut state.x1,
            GuideId::X2 => &mut state.x2,
            GuideId::Y1 => &mut state.y1,
            GuideId::Y2 => &mut state.y2,
            GuideId::Frequency => &mut state.frequency,
        }
    }
}

impl std::fmt::Display for GuideId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_mut_touches_only_bound_field() {
        let mut state = GuideState::default();
        *GuideId::X1.value_mut(&mut state) = 0.5;
        assert_eq!(
            state,
            GuideState {
                x1: 0.5,
                ..GuideState::default()
            }
        );
    }

    #[test]
    fn frequency_guide_is_horizontal() {
        assert_eq!(GuideId::Frequency.axis(), GuideAxis::Horizontal);
        assert_eq!(GuideId::X2.axis(), GuideAxis::Vertical);
    }
}
