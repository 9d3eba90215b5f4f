//! 平面向量与点。角度一律以度为单位，x 轴正方向为 0 度，y 轴向下时为顺时针。
use std::ops::{Add, AddAssign, Mul, Sub};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Builds a vector from a magnitude and a direction in degrees. A negative
    /// magnitude points the opposite way.
    pub fn from_polar(magnitude: f64, degrees: f64) -> Self {
        let radians = degrees.to_radians();
        Self {
            x: magnitude * radians.cos(),
            y: magnitude * radians.sin(),
        }
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector {
    fn add_assign(&mut self, rhs: Vector) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, scale: f64) -> Vector {
        Vector::new(self.x * scale, self.y * scale)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (other - self).length()
    }

    /// Direction from `self` towards `other`, in degrees.
    pub fn angle_to(self, other: Point) -> f64 {
        (other.y - self.y).atan2(other.x - self.x).to_degrees()
    }
}

impl Add<Vector> for Point {
    type Output = Point;

    fn add(self, rhs: Vector) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Vector;

    fn sub(self, rhs: Point) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// 轴对齐矩形，`(x, y)` 为左上角。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Smallest rectangle holding every point; `None` for an empty input.
    pub fn enclosing(points: impl IntoIterator<Item = Point>) -> Option<Rect> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (mut min, mut max) = (first, first);
        for point in points {
            min = Point::new(min.x.min(point.x), min.y.min(point.y));
            max = Point::new(max.x.max(point.x), max.y.max(point.y));
        }
        Some(Rect {
            x: min.x,
            y: min.y,
            width: max.x - min.x,
            height: max.y - min.y,
        })
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Grows the rectangle by `margin` on every side.
    pub fn inflate(self, margin: f64) -> Rect {
        Rect {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + 2.0 * margin,
            height: self.height + 2.0 * margin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn polar_construction() {
        let v = Vector::from_polar(2.0, 90.0);
        assert!(close(v.x, 0.0) && close(v.y, 2.0));
        let back = Vector::from_polar(-3.0, 0.0);
        assert!(close(back.x, -3.0) && close(back.y, 0.0));
        assert!(close(Vector::new(3.0, 4.0).length(), 5.0));
    }

    #[test]
    fn arithmetic() {
        let mut v = Vector::new(1.0, 2.0) + Vector::new(0.5, -1.0);
        v += Vector::new(1.0, 1.0);
        assert_eq!(v * 2.0, Vector::new(5.0, 4.0));
        assert_eq!(Point::new(1.0, 1.0) + v, Point::new(3.5, 3.0));
    }

    #[test]
    fn angles_and_distances() {
        let origin = Point::new(0.0, 0.0);
        assert!(close(origin.angle_to(Point::new(0.0, 5.0)), 90.0));
        assert!(close(origin.angle_to(Point::new(-1.0, 0.0)), 180.0));
        assert!(close(origin.distance(Point::new(6.0, 8.0)), 10.0));
    }

    #[test]
    fn enclosing_rectangle() {
        let rect = Rect::enclosing([
            Point::new(10.0, 40.0),
            Point::new(30.0, 20.0),
            Point::new(20.0, 30.0),
        ])
        .unwrap();
        assert_eq!(rect, Rect { x: 10.0, y: 20.0, width: 20.0, height: 20.0 });
        assert_eq!(rect.center(), Point::new(20.0, 30.0));
        assert_eq!(rect.inflate(5.0).width, 30.0);
        assert!(Rect::enclosing(std::iter::empty()).is_none());
    }
}
