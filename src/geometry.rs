use geo::{Coord, LineString, Point, Polygon, Rect};
use geo::{Area, BooleanOps, Contains, EuclideanDistance, Intersects};

/// tolerance used by cost spreads and the improvement test of the local search
pub const EPSILON: f64 = 1e-6;

/// true iff a and b differ by at most eps
pub fn doubles_near(a:f64, b:f64, eps:f64) -> bool {
    (a - b).abs() <= eps
}

/** builds the polygon described by the four corners of a label candidate.
The corners may form any convex quadrilateral (rotated labels). */
pub fn quad_to_polygon(x:&[f64;4], y:&[f64;4]) -> Polygon<f64> {
    Polygon::new(quad_boundary(x, y), vec![])
}

/// closed ring running through the four corners of a candidate
pub fn quad_boundary(x:&[f64;4], y:&[f64;4]) -> LineString<f64> {
    LineString::from(vec![
        (x[0], y[0]), (x[1], y[1]), (x[2], y[2]), (x[3], y[3]), (x[0], y[0]),
    ])
}

/// axis-parallel bounding box (xmin, ymin, xmax, ymax) of the four corners
pub fn quad_bounding_box(x:&[f64;4], y:&[f64;4]) -> (f64, f64, f64, f64) {
    let mut xmin = x[0]; let mut xmax = x[0];
    let mut ymin = y[0]; let mut ymax = y[0];
    for i in 1..4 {
        if x[i] < xmin { xmin = x[i]; }
        if x[i] > xmax { xmax = x[i]; }
        if y[i] < ymin { ymin = y[i]; }
        if y[i] > ymax { ymax = y[i]; }
    }
    (xmin, ymin, xmax, ymax)
}

/** distance from the candidate borders to a point.
Negative when the point lies inside the candidate. */
pub fn signed_distance_to_point(x:&[f64;4], y:&[f64;4], px:f64, py:f64) -> f64 {
    let p = Point::new(px, py);
    let d = p.euclidean_distance(&quad_boundary(x, y));
    if quad_to_polygon(x, y).contains(&p) { -d } else { d }
}

/// true iff one of the candidate borders crosses the line
pub fn crosses_line(x:&[f64;4], y:&[f64;4], line:&LineString<f64>) -> bool {
    quad_boundary(x, y).intersects(line)
}

/// true iff one of the candidate borders crosses a ring of the polygon
pub fn crosses_boundary(x:&[f64;4], y:&[f64;4], polygon:&Polygon<f64>) -> bool {
    let boundary = quad_boundary(x, y);
    if boundary.intersects(polygon.exterior()) { return true; }
    polygon.interiors().iter().any(|ring| boundary.intersects(ring))
}

/// true iff the candidate intersects the polygon at all
pub fn intersects_polygon(x:&[f64;4], y:&[f64;4], polygon:&Polygon<f64>) -> bool {
    quad_to_polygon(x, y).intersects(polygon)
}

/** covered-area penalty of a candidate over a polygon, discretized to 0..=12
(12 = fully covered). Any non-empty intersection costs at least 1. */
pub fn polygon_intersection_cost(x:&[f64;4], y:&[f64;4], polygon:&Polygon<f64>) -> i32 {
    let quad = quad_to_polygon(x, y);
    if !quad.intersects(polygon) { return 0; }
    let label_area = quad.unsigned_area();
    if label_area <= EPSILON { return 12; }
    let covered = quad.intersection(polygon).unsigned_area();
    let fraction = (covered / label_area).min(1.0);
    std::cmp::max(1, (fraction * 12.0).round() as i32)
}

/// minimum distance from (px,py) to a ring
pub fn min_distance_to_ring(px:f64, py:f64, ring:&LineString<f64>) -> f64 {
    Point::new(px, py).euclidean_distance(ring)
}

/// closed ring following the border of a rectangle
pub fn rect_ring(rect:&Rect<f64>) -> LineString<f64> {
    let (min, max): (Coord<f64>, Coord<f64>) = (rect.min(), rect.max());
    LineString::from(vec![
        (min.x, min.y), (max.x, min.y), (max.x, max.y), (min.x, max.y), (min.x, min.y),
    ])
}


#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad(xmin:f64, ymin:f64, w:f64, h:f64) -> ([f64;4],[f64;4]) {
        ([xmin, xmin+w, xmin+w, xmin], [ymin, ymin, ymin+h, ymin+h])
    }

    #[test]
    fn test_signed_distance() {
        let (x,y) = unit_quad(0., 0., 10., 10.);
        assert!(signed_distance_to_point(&x, &y, 5., 5.) < 0.);
        assert!(doubles_near(signed_distance_to_point(&x, &y, 15., 5.), 5., EPSILON));
    }

    #[test]
    fn test_crosses_line() {
        let (x,y) = unit_quad(0., 0., 10., 10.);
        let crossing = LineString::from(vec![(-5., 5.), (15., 5.)]);
        let outside = LineString::from(vec![(20., 0.), (20., 10.)]);
        let inside = LineString::from(vec![(2., 2.), (8., 8.)]);
        assert!(crosses_line(&x, &y, &crossing));
        assert!(!crosses_line(&x, &y, &outside));
        assert!(!crosses_line(&x, &y, &inside)); // fully inside: no border is crossed
    }

    #[test]
    fn test_polygon_intersection_cost() {
        let (x,y) = unit_quad(0., 0., 30., 10.);
        // a polygon covering the left third of the label
        let third = Polygon::new(
            LineString::from(vec![(0., 0.), (10., 0.), (10., 10.), (0., 10.), (0., 0.)]),
            vec![],
        );
        assert_eq!(polygon_intersection_cost(&x, &y, &third), 4);
        // full coverage
        let all = Polygon::new(
            LineString::from(vec![(-1., -1.), (31., -1.), (31., 11.), (-1., 11.), (-1., -1.)]),
            vec![],
        );
        assert_eq!(polygon_intersection_cost(&x, &y, &all), 12);
        // disjoint
        let far = Polygon::new(
            LineString::from(vec![(100., 100.), (110., 100.), (110., 110.), (100., 110.), (100., 100.)]),
            vec![],
        );
        assert_eq!(polygon_intersection_cost(&x, &y, &far), 0);
    }

    #[test]
    fn test_ring_distance() {
        let ring = LineString::from(vec![(0., 0.), (100., 0.), (100., 100.), (0., 100.), (0., 0.)]);
        assert!(doubles_near(min_distance_to_ring(10., 50., &ring), 10., EPSILON));
        assert!(doubles_near(min_distance_to_ring(50., 50., &ring), 50., EPSILON));
    }
}
