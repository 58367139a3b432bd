//! Segment geometry for the adherence rules
//!
//! Everything here is a pure function of its inputs. Points are canvas
//! coordinates; a segment is given by its two endpoints.

use crate::Point;

/// Below this squared length a segment is treated as a single point
const DEGENERATE_LEN_SQ: f64 = 1e-12;

/// Parameter of the point on segment `a..b` closest to `p`, clamped to [0, 1]
///
/// Degenerate segments return 0.
#[inline]
pub fn closest_param_on_segment(p: Point, a: Point, b: Point) -> f64 {
    let line_vec = b - a;
    let len_sq = line_vec.length_squared();
    if len_sq < DEGENERATE_LEN_SQ {
        return 0.0;
    }
    ((p - a).dot(line_vec) / len_sq).clamp(0.0, 1.0)
}

/// Euclidean distance from `p` to the closest point of segment `a..b`
pub fn distance_point_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let t = closest_param_on_segment(p, a, b);
    let closest = a + (b - a) * t;
    p.distance(closest)
}

/// Orientation test: true when `a, b, c` turn counter-clockwise
#[inline]
fn ccw(a: Point, b: Point, c: Point) -> bool {
    (c.y - a.y) * (b.x - a.x) > (b.y - a.y) * (c.x - a.x)
}

/// Proper crossing test between segments `a..b` and `c..d`
///
/// Plain orientation formula. Collinear overlaps fall out of it as they
/// will and are not special-cased.
pub fn segments_intersect(a: Point, b: Point, c: Point, d: Point) -> bool {
    ccw(a, c, d) != ccw(b, c, d) && ccw(a, b, c) != ccw(a, b, d)
}

/// Minimum distance between segments `a..b` and `c..d` (0 when they cross)
pub fn min_distance_between_segments(a: Point, b: Point, c: Point, d: Point) -> f64 {
    if segments_intersect(a, b, c, d) {
        return 0.0;
    }
    distance_point_to_segment(a, c, d)
        .min(distance_point_to_segment(b, c, d))
        .min(distance_point_to_segment(c, a, b))
        .min(distance_point_to_segment(d, a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_distance_perpendicular() {
        let d = distance_point_to_segment(p(5.0, 3.0), p(0.0, 0.0), p(10.0, 0.0));
        assert!((d - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_clamps_to_endpoints() {
        // Beyond the end: distance to b
        let d = distance_point_to_segment(p(13.0, 4.0), p(0.0, 0.0), p(10.0, 0.0));
        assert!((d - 5.0).abs() < 1e-12);
        // Before the start: distance to a
        let d = distance_point_to_segment(p(-3.0, -4.0), p(0.0, 0.0), p(10.0, 0.0));
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_degenerate_segment() {
        let d = distance_point_to_segment(p(3.0, 4.0), p(0.0, 0.0), p(0.0, 0.0));
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_closest_param() {
        assert_eq!(closest_param_on_segment(p(5.0, 1.0), p(0.0, 0.0), p(10.0, 0.0)), 0.5);
        assert_eq!(closest_param_on_segment(p(-5.0, 1.0), p(0.0, 0.0), p(10.0, 0.0)), 0.0);
        assert_eq!(closest_param_on_segment(p(50.0, 1.0), p(0.0, 0.0), p(10.0, 0.0)), 1.0);
    }

    #[test]
    fn test_segments_cross() {
        assert!(segments_intersect(
            p(0.0, 0.0),
            p(10.0, 10.0),
            p(0.0, 10.0),
            p(10.0, 0.0)
        ));
    }

    #[test]
    fn test_segments_disjoint() {
        assert!(!segments_intersect(
            p(0.0, 0.0),
            p(10.0, 0.0),
            p(0.0, 5.0),
            p(10.0, 5.0)
        ));
        // Would cross if extended, but the segments stop short
        assert!(!segments_intersect(
            p(0.0, 0.0),
            p(4.0, 4.0),
            p(0.0, 10.0),
            p(10.0, 0.0)
        ));
    }

    #[test]
    fn test_collinear_overlap_not_reported() {
        // Collinear overlap: every orientation test is false, so no crossing
        assert!(!segments_intersect(
            p(0.0, 0.0),
            p(10.0, 0.0),
            p(5.0, 0.0),
            p(15.0, 0.0)
        ));
    }

    #[test]
    fn test_min_distance_between_segments() {
        let d = min_distance_between_segments(
            p(0.0, 0.0),
            p(10.0, 0.0),
            p(0.0, 5.0),
            p(10.0, 7.0),
        );
        assert!((d - 5.0).abs() < 1e-12);

        let crossing = min_distance_between_segments(
            p(0.0, 0.0),
            p(10.0, 10.0),
            p(0.0, 10.0),
            p(10.0, 0.0),
        );
        assert_eq!(crossing, 0.0);
    }
}
