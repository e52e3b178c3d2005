//! Submenu layout: the edited menu in the middle, its children on a ring.

use super::angles::compute_item_angles;
use super::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingLayout {
    /// Origin of the cell holding the centre item.
    pub center: Point,
    pub radius: f64,
}

impl RingLayout {
    pub fn compute(width: f64, height: f64, cell: f64, radius: f64) -> Self {
        Self {
            center: Point::new((width - cell) / 2.0, (height - cell) / 2.0),
            radius,
        }
    }

    /// Cell origin for an angle in degrees, clockwise from the top.
    pub fn position(&self, angle: f64) -> Point {
        let angle = angle.to_radians();
        Point::new(
            self.center.x + (angle.sin() * self.radius).round(),
            self.center.y - (angle.cos() * self.radius).round(),
        )
    }

    pub fn targets(&self, fixed_angles: &[Option<f64>]) -> Vec<Point> {
        compute_item_angles(fixed_angles)
            .into_iter()
            .map(|angle| self.position(angle))
            .collect()
    }
}
