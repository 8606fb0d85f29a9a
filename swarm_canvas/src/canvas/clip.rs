//! Cohen-Sutherland clipping of real-coordinate segments.

use crate::error::CanvasError;

pub type Point = (f64, f64);
pub type Segment = (Point, Point);

const INSIDE: u8 = 0b0000;
const LEFT: u8 = 0b0001;
const RIGHT: u8 = 0b0010;
const BELOW: u8 = 0b0100;
const ABOVE: u8 = 0b1000;

// Each endpoint crosses at most two boundaries.
const MAX_PASSES: usize = 4;

/// Axis-aligned visible region in real coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Window {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Window {
    pub fn outcode(&self, (x, y): Point) -> u8 {
        let mut code = INSIDE;
        if y > self.y_max {
            code |= ABOVE;
        }
        if y < self.y_min {
            code |= BELOW;
        }
        if x > self.x_max {
            code |= RIGHT;
        }
        if x < self.x_min {
            code |= LEFT;
        }
        code
    }

    pub fn contains(&self, p: Point) -> bool {
        self.outcode(p) == INSIDE
    }

    /// Clips `from`-`to` to the window.
    ///
    /// Returns `Ok(None)` when no part of the segment is visible.
    pub fn clip(&self, from: Point, to: Point) -> Result<Option<Segment>, CanvasError> {
        if !(from.0.is_finite() && from.1.is_finite() && to.0.is_finite() && to.1.is_finite()) {
            return Err(CanvasError::NonFiniteCoordinate);
        }

        if from.0 == to.0 {
            let x = from.0;
            if x < self.x_min || x > self.x_max {
                return Ok(None);
            }
            return Ok(clamp_span(from.1, to.1, self.y_min, self.y_max)
                .map(|(y1, y2)| ((x, y1), (x, y2))));
        }
        if from.1 == to.1 {
            let y = from.1;
            if y < self.y_min || y > self.y_max {
                return Ok(None);
            }
            return Ok(clamp_span(from.0, to.0, self.x_min, self.x_max)
                .map(|(x1, x2)| ((x1, y), (x2, y))));
        }

        Ok(self.clip_general(from, to))
    }

    fn clip_general(&self, mut p1: Point, mut p2: Point) -> Option<Segment> {
        for _ in 0..MAX_PASSES {
            let c1 = self.outcode(p1);
            let c2 = self.outcode(p2);
            if c1 | c2 == INSIDE {
                return Some((p1, p2));
            }
            if c1 & c2 != INSIDE {
                return None;
            }

            let c = if c1 != INSIDE { c1 } else { c2 };
            let (x1, y1) = p1;
            let (x2, y2) = p2;
            let moved = if c & LEFT != 0 {
                (self.x_min, y1 + (y2 - y1) / (x2 - x1) * (self.x_min - x1))
            } else if c & RIGHT != 0 {
                (self.x_max, y1 + (y2 - y1) / (x2 - x1) * (self.x_max - x1))
            } else if c & BELOW != 0 {
                (x1 + (x2 - x1) / (y2 - y1) * (self.y_min - y1), self.y_min)
            } else {
                (x1 + (x2 - x1) / (y2 - y1) * (self.y_max - y1), self.y_max)
            };

            if c == c1 {
                p1 = moved;
            } else {
                p2 = moved;
            }
        }

        // Rounding can leave an endpoint a hair outside a corner.
        if self.outcode(p1) & self.outcode(p2) != INSIDE {
            return None;
        }
        Some((self.clamp(p1), self.clamp(p2)))
    }

    fn clamp(&self, (x, y): Point) -> Point {
        (
            x.max(self.x_min).min(self.x_max),
            y.max(self.y_min).min(self.y_max),
        )
    }
}

fn clamp_span(a: f64, b: f64, min: f64, max: f64) -> Option<(f64, f64)> {
    if (a < min && b < min) || (a > max && b > max) {
        return None;
    }
    Some((a.max(min).min(max), b.max(min).min(max)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Window {
        Window {
            x_min: -1.0,
            x_max: 1.0,
            y_min: -1.0,
            y_max: 1.0,
        }
    }

    fn approx(a: Point, b: Point) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn test_outcode() {
        let w = window();
        assert_eq!(w.outcode((0.0, 0.0)), INSIDE);
        assert_eq!(w.outcode((2.0, 2.0)), ABOVE | RIGHT);
        assert_eq!(w.outcode((-2.0, -2.0)), BELOW | LEFT);
        assert!(w.contains((1.0, -1.0)));
    }

    #[test]
    fn test_inside_is_untouched() {
        let seg = window().clip((-0.5, -0.2), (0.3, 0.9)).unwrap();
        assert_eq!(seg, Some(((-0.5, -0.2), (0.3, 0.9))));
    }

    #[test]
    fn test_vertical_clamped() {
        let seg = window().clip((0.5, 5.0), (0.5, -5.0)).unwrap().unwrap();
        assert_eq!(seg, ((0.5, 1.0), (0.5, -1.0)));
    }

    #[test]
    fn test_horizontal_clamped() {
        let seg = window().clip((-3.0, 0.2), (0.5, 0.2)).unwrap().unwrap();
        assert_eq!(seg, ((-1.0, 0.2), (0.5, 0.2)));
    }

    #[test]
    fn test_vertical_outside_rejected() {
        assert_eq!(window().clip((100.0, 5.0), (100.0, -5.0)).unwrap(), None);
        assert_eq!(window().clip((0.0, 5.0), (0.0, 3.0)).unwrap(), None);
    }

    #[test]
    fn test_diagonal_through_window() {
        let (a, b) = window().clip((-3.0, -3.0), (3.0, 3.0)).unwrap().unwrap();
        assert!(approx(a, (-1.0, -1.0)));
        assert!(approx(b, (1.0, 1.0)));
    }

    #[test]
    fn test_one_end_inside() {
        let (a, b) = window().clip((0.0, 0.0), (4.0, 2.0)).unwrap().unwrap();
        assert!(approx(a, (0.0, 0.0)));
        assert!(approx(b, (1.0, 0.5)));
    }

    #[test]
    fn test_trivial_reject() {
        assert_eq!(window().clip((2.0, 0.0), (3.0, 0.5)).unwrap(), None);
        assert_eq!(window().clip((-5.0, 2.0), (5.0, 3.0)).unwrap(), None);
    }

    #[test]
    fn test_corner_miss_terminates() {
        // crosses the LEFT and ABOVE regions without entering the window
        assert_eq!(window().clip((-3.0, 0.0), (0.0, 3.0)).unwrap(), None);
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(window().clip((f64::NAN, 0.0), (1.0, 1.0)).is_err());
        assert!(window().clip((0.0, 0.0), (f64::INFINITY, 1.0)).is_err());
    }
}
