//! Page-space geometry for annotation bounds

use serde::{Deserialize, Serialize};

/// A point in page space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Create a new point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Origin point (0, 0)
    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

/// A rectangle defined by two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    /// Lower-left corner
    pub lower_left: Point,
    /// Upper-right corner
    pub upper_right: Point,
}

impl Rectangle {
    /// Create a new rectangle from two points
    pub fn new(lower_left: Point, upper_right: Point) -> Self {
        Self {
            lower_left,
            upper_right,
        }
    }

    /// Create a rectangle from any two opposite corners.
    ///
    /// PDF `Rect` arrays are not required to list the lower-left corner first,
    /// so the coordinates are reordered here. A NaN coordinate is carried
    /// through, unlike with `f64::min`, so `is_finite` still sees it.
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let (left, right) = ordered(x1, x2);
        let (bottom, top) = ordered(y1, y2);
        Self {
            lower_left: Point::new(left, bottom),
            upper_right: Point::new(right, top),
        }
    }

    /// Create a rectangle from position and size
    pub fn from_position_and_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            lower_left: Point::new(x, y),
            upper_right: Point::new(x + width, y + height),
        }
    }

    /// Get the width
    pub fn width(&self) -> f64 {
        self.upper_right.x - self.lower_left.x
    }

    /// Get the height
    pub fn height(&self) -> f64 {
        self.upper_right.y - self.lower_left.y
    }

    /// Get the center point
    pub fn center(&self) -> Point {
        Point::new(
            (self.lower_left.x + self.upper_right.x) / 2.0,
            (self.lower_left.y + self.upper_right.y) / 2.0,
        )
    }

    /// Whether the two rectangles share any area or edge
    pub fn intersects(&self, other: &Rectangle) -> bool {
        self.lower_left.x <= other.upper_right.x
            && other.lower_left.x <= self.upper_right.x
            && self.lower_left.y <= other.upper_right.y
            && other.lower_left.y <= self.upper_right.y
    }

    /// Whether every coordinate is a finite number
    pub fn is_finite(&self) -> bool {
        [
            self.lower_left.x,
            self.lower_left.y,
            self.upper_right.x,
            self.upper_right.y,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
