//! Planar coordinates and turn geometry.
//!
//! City maps use an arbitrary planar frame (the street list carries plain
//! `x;y` pairs, auto-assigned ones fall in a 1000 × 1000 square), so `Point`
//! is Euclidean rather than geographic.

/// A position on the city map.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance.
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Classify the manoeuvre made at `self` when arriving from `prev` and
    /// leaving towards `next`.
    ///
    /// The signed angle between the arrival and departure vectors is
    /// normalised to (−180°, 180°]; positive angles turn counter-clockwise.
    pub fn turn(self, prev: Point, next: Point) -> Turn {
        let (ax, ay) = (self.x - prev.x, self.y - prev.y);
        let (dx, dy) = (next.x - self.x, next.y - self.y);

        let mut angle = (dy.atan2(dx) - ay.atan2(ax)).to_degrees();
        while angle > 180.0 {
            angle -= 360.0;
        }
        while angle <= -180.0 {
            angle += 360.0;
        }

        if angle.abs() < 30.0 {
            Turn::Straight
        } else if (30.0..=150.0).contains(&angle) {
            Turn::Left
        } else if (-150.0..=-30.0).contains(&angle) {
            Turn::Right
        } else {
            Turn::UTurn
        }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Manoeuvre at an intersection, for turn-by-turn reporting.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Turn {
    Straight,
    Left,
    Right,
    UTurn,
}

impl Turn {
    pub fn as_str(self) -> &'static str {
        match self {
            Turn::Straight => "straight",
            Turn::Left     => "left",
            Turn::Right    => "right",
            Turn::UTurn    => "u-turn",
        }
    }
}

impl std::fmt::Display for Turn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
