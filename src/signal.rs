//! Signal synthesis from guide state.
//!
//! The series spans the rectangle bounded by the guides: X sweeps the
//! rectangle width, Y oscillates around the rectangle's vertical center with
//! an amplitude of half its height. Widths are taken as absolute values so an
//! inverted rectangle never produces negative lengths.

use crate::geom::Point;
use crate::guide::GuideState;

/// Default number of samples per frame.
pub const DEFAULT_SAMPLE_COUNT: usize = 1000;

/// Generate `sample_count` points for the given guide state.
pub fn generate(state: &GuideState, sample_count: usize) -> Vec<Point> {
    let mut out = Vec::with_capacity(sample_count);
    generate_into(state, sample_count, &mut out);
    out
}

/// Generate into an existing buffer, replacing its previous contents.
pub fn generate_into(state: &GuideState, sample_count: usize, out: &mut Vec<Point>) {
    out.clear();
    if sample_count == 0 {
        return;
    }
    let cx = (state.x1 + state.x2) / 2.0;
    let width = (state.x2 - state.x1).abs();
    let cy = (state.y1 + state.y2) / 2.0;
    let half_height = (state.y2 - state.y1).abs() / 2.0;
    let count = sample_count as f64;
    out.extend((0..sample_count).map(|i| {
        let i = i as f64;
        Point::new(
            cx + width * (i / count - 0.5),
            cy + half_height * (state.frequency * i / 10.0).sin(),
        )
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn default_first_sample() {
        let points = generate(&GuideState::default(), DEFAULT_SAMPLE_COUNT);
        assert_eq!(points.len(), DEFAULT_SAMPLE_COUNT);
        assert!(approx(points[0].x, 0.2));
        assert!(approx(points[0].y, 0.5));
    }

    #[test]
    fn x_is_monotonic_for_ordered_and_inverted_guides() {
        let ordered = GuideState::default();
        let inverted = GuideState {
            x1: 0.8,
            x2: 0.2,
            ..GuideState::default()
        };
        for state in [ordered, inverted] {
            let points = generate(&state, 250);
            assert_eq!(points.len(), 250);
            assert!(points.windows(2).all(|pair| pair[1].x >= pair[0].x));
        }
        // Absolute width makes the inverted rectangle identical.
        assert_eq!(generate(&ordered, 64), generate(&inverted, 64));
    }

    #[test]
    fn repeated_calls_are_identical() {
        let state = GuideState {
            frequency: 3.7,
            ..GuideState::default()
        };
        assert_eq!(generate(&state, 500), generate(&state, 500));
    }

    #[test]
    fn collapsed_rectangle_yields_identical_points() {
        let state = GuideState {
            x1: 0.4,
            x2: 0.4,
            y1: -1.5,
            y2: -1.5,
            ..GuideState::default()
        };
        let points = generate(&state, DEFAULT_SAMPLE_COUNT);
        assert_eq!(points.len(), DEFAULT_SAMPLE_COUNT);
        assert!(points.iter().all(|p| p.x == 0.4 && p.y == -1.5));
    }

    #[test]
    fn moving_x1_only_changes_x() {
        let before = GuideState::default();
        let after = GuideState {
            x1: 0.5,
            ..before
        };
        let old = generate(&before, 100);
        let new = generate(&after, 100);
        // cx = 0.65, width = 0.3
        assert!(approx(new[0].x, 0.65 - 0.15));
        assert!(old.iter().zip(&new).all(|(a, b)| a.y == b.y));
    }

    #[test]
    fn generate_into_replaces_buffer() {
        let mut buffer = vec![Point::new(9.0, 9.0); 3];
        generate_into(&GuideState::default(), 10, &mut buffer);
        assert_eq!(buffer.len(), 10);
        generate_into(&GuideState::default(), 0, &mut buffer);
        assert!(buffer.is_empty());
    }
}
