use super::geometry::Point;

/// Linear interpolation between two scalars over a time window (milliseconds).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimatedValue {
    pub start: f64,
    pub end: f64,
    pub start_time: f64,
    pub end_time: f64,
}

impl AnimatedValue {
    pub fn new(start: f64, end: f64, start_time: f64, end_time: f64) -> Self {
        Self {
            start,
            end,
            start_time,
            end_time,
        }
    }

    pub fn get(&self, time: f64) -> f64 {
        if time <= self.start_time {
            return self.start;
        }
        if time >= self.end_time {
            return self.end;
        }

        let progress = (time - self.start_time) / (self.end_time - self.start_time);
        self.start + (self.end - self.start) * progress
    }

    pub fn is_finished(&self, time: f64) -> bool {
        time >= self.end_time
    }
}

/// The x/y pair that positions one entity on the editor surface.
///
/// Created once when the entity is first laid out and only ever retargeted
/// afterwards, so an in-flight transition is never reset to its origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimatedPoint {
    pub x: AnimatedValue,
    pub y: AnimatedValue,
}

impl AnimatedPoint {
    /// First placement: begins at `from` and heads for `to`. Without a restart the
    /// time window stays empty, so the point sits at `to` right away.
    pub fn appear(from: Point, to: Point) -> Self {
        Self {
            x: AnimatedValue::new(from.x, to.x, 0.0, 0.0),
            y: AnimatedValue::new(from.y, to.y, 0.0, 0.0),
        }
    }

    /// Moves the target. With `restart` the transition starts over from wherever
    /// the point currently is; otherwise only the destination changes.
    pub fn retarget(&mut self, to: Point, now: f64, duration: f64, restart: bool) {
        if restart {
            self.x.start = self.x.get(now);
            self.y.start = self.y.get(now);
            self.x.start_time = now;
            self.y.start_time = now;
            self.x.end_time = now + duration;
            self.y.end_time = now + duration;
        }
        self.x.end = to.x;
        self.y.end = to.y;
    }

    /// Starts a fresh transition for a point that was just created.
    pub fn restart_window(&mut self, now: f64, duration: f64) {
        self.x.start_time = now;
        self.y.start_time = now;
        self.x.end_time = now + duration;
        self.y.end_time = now + duration;
    }

    pub fn get(&self, time: f64) -> Point {
        Point::new(self.x.get(time), self.y.get(time))
    }

    pub fn target(&self) -> Point {
        Point::new(self.x.end, self.y.end)
    }

    pub fn is_finished(&self, time: f64) -> bool {
        self.x.is_finished(time) && self.y.is_finished(time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_outside_window() {
        let value = AnimatedValue::new(10.0, 20.0, 100.0, 300.0);
        assert_eq!(value.get(-5.0), 10.0);
        assert_eq!(value.get(100.0), 10.0);
        assert_eq!(value.get(300.0), 20.0);
        assert_eq!(value.get(1e9), 20.0);
    }

    #[test]
    fn test_linear_and_monotonic_inside_window() {
        let value = AnimatedValue::new(0.0, 100.0, 0.0, 200.0);
        assert_eq!(value.get(50.0), 25.0);
        assert_eq!(value.get(100.0), 50.0);

        let samples: Vec<f64> = (0..=20).map(|i| value.get(i as f64 * 10.0)).collect();
        assert!(samples.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_finished_at_end_time() {
        let value = AnimatedValue::new(0.0, 1.0, 10.0, 20.0);
        assert!(!value.is_finished(19.999));
        assert!(value.is_finished(20.0));
        assert!(value.is_finished(25.0));
    }

    #[test]
    fn test_degenerate_windows_are_tolerated() {
        let same = AnimatedValue::new(3.0, 7.0, 50.0, 50.0);
        assert_eq!(same.get(49.0), 3.0);
        assert_eq!(same.get(50.0), 3.0);
        assert_eq!(same.get(51.0), 7.0);

        let backwards = AnimatedValue::new(3.0, 7.0, 50.0, 10.0);
        assert_eq!(backwards.get(30.0), 3.0);
        assert_eq!(backwards.get(60.0), 7.0);
        assert!(backwards.is_finished(10.0));
    }

    #[test]
    fn test_appear_without_restart_is_already_there() {
        let point = AnimatedPoint::appear(Point::new(0.0, 0.0), Point::new(64.0, 32.0));
        assert_eq!(point.get(1000.0), Point::new(64.0, 32.0));
        assert!(point.is_finished(1000.0));
    }

    #[test]
    fn test_restart_continues_from_current_position() {
        let mut point = AnimatedPoint::appear(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        point.restart_window(0.0, 200.0);
        assert_eq!(point.get(100.0), Point::new(50.0, 0.0));

        point.retarget(Point::new(0.0, 0.0), 100.0, 200.0, true);
        assert_eq!(point.get(100.0), Point::new(50.0, 0.0));
        assert_eq!(point.get(200.0), Point::new(25.0, 0.0));
        assert_eq!(point.target(), Point::new(0.0, 0.0));
        assert!(point.is_finished(300.0));
    }

    #[test]
    fn test_retarget_without_restart_keeps_window() {
        let mut point = AnimatedPoint::appear(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        point.restart_window(0.0, 200.0);

        point.retarget(Point::new(200.0, 0.0), 100.0, 200.0, false);
        assert_eq!(point.get(100.0), Point::new(100.0, 0.0));
        assert_eq!(point.x.end_time, 200.0);
    }
}
