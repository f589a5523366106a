//! Axis aligned extents.

use approx::{AbsDiffEq, RelativeEq};
use geo_types::CoordNum;

use crate::Point;

/// Axis aligned rectangle, stored as its lower left and upper right corner.
///
/// The y axis points north: `ymax` is the top edge of the rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect<T: CoordNum = f64> {
    min: Point<T>,
    max: Point<T>,
}

impl<T: CoordNum> Rect<T> {
    /// Rectangle spanned by two opposite corners in any order
    pub fn from_points(p1: Point<T>, p2: Point<T>) -> Self {
        Rect {
            min: Point::new(min(p1.x(), p2.x()), min(p1.y(), p2.y())),
            max: Point::new(max(p1.x(), p2.x()), max(p1.y(), p2.y())),
        }
    }

    pub fn from_nw_se(nw: Point<T>, se: Point<T>) -> Self {
        Self::from_points(nw, se)
    }

    /// Rectangle spanning the given extent, the bounds are sorted when needed
    pub fn from_extent(xmin: T, ymin: T, xmax: T, ymax: T) -> Self {
        Self::from_points(Point::new(xmin, ymin), Point::new(xmax, ymax))
    }

    pub fn xmin(&self) -> T {
        self.min.x()
    }

    pub fn xmax(&self) -> T {
        self.max.x()
    }

    pub fn ymin(&self) -> T {
        self.min.y()
    }

    pub fn ymax(&self) -> T {
        self.max.y()
    }

    pub fn width(&self) -> T {
        self.xmax() - self.xmin()
    }

    pub fn height(&self) -> T {
        self.ymax() - self.ymin()
    }

    pub fn is_empty(&self) -> bool {
        self.width() == T::zero() || self.height() == T::zero()
    }

    pub fn top_left(&self) -> Point<T> {
        Point::new(self.xmin(), self.ymax())
    }

    pub fn top_right(&self) -> Point<T> {
        self.max
    }

    pub fn bottom_left(&self) -> Point<T> {
        self.min
    }

    pub fn bottom_right(&self) -> Point<T> {
        Point::new(self.xmax(), self.ymin())
    }

    /// Overlap with a non-zero area, touching edges do not count
    pub fn intersects(&self, other: &Rect<T>) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.xmin() < other.xmax()
            && self.xmax() > other.xmin()
            && self.ymin() < other.ymax()
            && self.ymax() > other.ymin()
    }

    /// The overlapping part of both rectangles, an empty rectangle at the origin when they do not intersect
    pub fn intersection(&self, other: &Rect<T>) -> Rect<T> {
        if !self.intersects(other) {
            return Rect::from_extent(T::zero(), T::zero(), T::zero(), T::zero());
        }

        Rect::from_extent(
            max(self.xmin(), other.xmin()),
            max(self.ymin(), other.ymin()),
            min(self.xmax(), other.xmax()),
            min(self.ymax(), other.ymax()),
        )
    }
}

fn min<T: PartialOrd>(a: T, b: T) -> T {
    if b < a { b } else { a }
}

fn max<T: PartialOrd>(a: T, b: T) -> T {
    if b > a { b } else { a }
}

impl<T> AbsDiffEq for Rect<T>
where
    T: CoordNum + AbsDiffEq<Epsilon = T>,
{
    type Epsilon = T;

    fn default_epsilon() -> Self::Epsilon {
        T::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.min.abs_diff_eq(&other.min, epsilon) && self.max.abs_diff_eq(&other.max, epsilon)
    }
}

impl<T> RelativeEq for Rect<T>
where
    T: CoordNum + RelativeEq<Epsilon = T>,
{
    fn default_max_relative() -> Self::Epsilon {
        T::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        self.min.relative_eq(&other.min, epsilon, max_relative) && self.max.relative_eq(&other.max, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn unordered_extent() {
        let r = Rect::from_extent(10.0, 5.0, 0.0, -5.0);
        assert_eq!(r.xmin(), 0.0);
        assert_eq!(r.xmax(), 10.0);
        assert_eq!(r.ymin(), -5.0);
        assert_eq!(r.ymax(), 5.0);
        assert_eq!(r.width(), 10.0);
        assert_eq!(r.height(), 10.0);
        assert_eq!(r.top_left(), Point::new(0.0, 5.0));
        assert_eq!(r.bottom_right(), Point::new(10.0, -5.0));
        assert_eq!(r, Rect::from_nw_se(Point::new(0.0, 5.0), Point::new(10.0, -5.0)));
    }

    #[test]
    fn intersection() {
        let r1 = Rect::from_extent(0, 0, 10, 10);
        let r2 = Rect::from_extent(4, 4, 5, 5);

        assert!(r1.intersects(&r2));
        assert_eq!(r1.intersection(&r2), r2);
        assert_eq!(r1.intersection(&r1), r1);
    }

    #[test]
    fn lambert_extents_without_overlap() {
        let r1 = Rect::from_extent(22000.0, 153000.0, 259000.0, 245000.0);
        let r2 = Rect::from_extent(110000.0, 95800.0, 110100.0, 95900.0);

        assert!(!r1.intersects(&r2));
        assert!(r1.intersection(&r2).is_empty());
    }

    #[test]
    fn touching_and_degenerate_rectangles() {
        let r1 = Rect::from_extent(0, 0, 10, 10);
        assert!(!r1.intersects(&Rect::from_extent(10, 0, 20, 10)));

        let line = Rect::from_extent(5.0, 0.0, 5.0, 10.0);
        assert!(line.is_empty());
        assert!(!Rect::from_extent(0.0, 0.0, 10.0, 10.0).intersects(&line));
    }

    #[test]
    fn approximate_equality() {
        let r1 = Rect::from_extent(-30.000_000_763_788_11, 29.999999619212282, 60.000000763788094, 71.999_998_473_439_09);
        let r2 = Rect::from_extent(-30.0, 30.0, 60.0, 72.0);
        assert_relative_eq!(r1, r2, epsilon = 1e-5);
    }
}
