use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Transposes a point so a top-down tree reads left-to-right.
///
/// The layout always grows along `y`; horizontal charts swap the axes at the path boundary.
/// Applying the rotation twice yields the original point.
pub fn rotate_point(p: Point) -> Point {
    Point { x: p.y, y: p.x }
}
