pub type Point<T = f64> = geo_types::Point<T>;

pub fn euclidean_distance(p1: Point, p2: Point) -> f64 {
    let delta = p1 - p2;
    delta.x().hypot(delta.y())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance() {
        assert_eq!(euclidean_distance(Point::new(1.0, 1.0), Point::new(4.0, 5.0)), 5.0);
        assert_eq!(euclidean_distance(Point::new(-2.0, 3.0), Point::new(-2.0, 3.0)), 0.0);
    }
}
