use crate::model::Point;

/// A straight line segment in model space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f32 {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn midpoint(&self) -> Point {
        Point::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }

    /// Shortest distance from `point` to any point on the segment.
    pub fn distance_to(&self, point: Point) -> f32 {
        distance_to_segment(point, self.start, self.end)
    }

    /// SVG move/line pair for this segment.
    pub fn to_path_command(&self) -> String {
        generate_line_path(self.start, self.end)
    }
}

/// Distance from a point to the segment `a`–`b`
///
/// Projects `point` onto the segment's supporting line and clamps the
/// projection to the segment, so points beyond either end measure to that
/// endpoint. A degenerate segment (`a == b`) measures to `a`.
pub fn distance_to_segment(point: Point, a: Point, b: Point) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;

    let t = if len_sq > 0.0 {
        (((point.x - a.x) * dx + (point.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let px = a.x + t * dx;
    let py = a.y + t * dy;
    ((point.x - px).powi(2) + (point.y - py).powi(2)).sqrt()
}

/// Generate SVG path command for a straight line
///
/// # Returns
/// SVG path command string (e.g., "M 10 20 L 110 20")
pub fn generate_line_path(start: Point, end: Point) -> String {
    format!("M {} {} L {} {}", start.x, start.y, end.x, end.y)
}

/// Join several segments into one SVG path string.
pub fn generate_polyline_path<'a, I>(segments: I) -> String
where
    I: IntoIterator<Item = &'a Segment>,
{
    segments
        .into_iter()
        .map(Segment::to_path_command)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Generate a closed SVG polygon path through `points`.
pub fn generate_polygon_path(points: &[Point]) -> String {
    let mut commands = String::new();
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            commands.push(' ');
        }
        let op = if i == 0 { 'M' } else { 'L' };
        commands.push_str(&format!("{} {} {}", op, p.x, p.y));
    }
    if !points.is_empty() {
        commands.push_str(" Z");
    }
    commands
}

/// Generate an SVG circle as two arcs, since path strings have no circle primitive.
pub fn generate_circle_path(center: Point, radius: f32) -> String {
    format!(
        "M {} {} A {r} {r} 0 1 0 {} {} A {r} {r} 0 1 0 {} {} Z",
        center.x - radius,
        center.y,
        center.x + radius,
        center.y,
        center.x - radius,
        center.y,
        r = radius
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // distance_to_segment()
    // ========================================================================

    #[test]
    fn test_distance_perpendicular() {
        let d = distance_to_segment(Point::new(50.0, 10.0), Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!((d - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_distance_clamps_to_endpoints() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 0.0);
        assert!((distance_to_segment(Point::new(-30.0, 40.0), a, b) - 50.0).abs() < 1e-5);
        assert!((distance_to_segment(Point::new(130.0, 0.0), a, b) - 30.0).abs() < 1e-5);
    }

    #[test]
    fn test_distance_on_segment_is_zero() {
        let d = distance_to_segment(Point::new(0.0, 25.0), Point::new(0.0, 0.0), Point::new(0.0, 40.0));
        assert_eq!(d, 0.0);
    }

    #[test]
    fn test_distance_degenerate_segment() {
        let p = Point::new(3.0, 4.0);
        let d = distance_to_segment(Point::new(0.0, 0.0), p, p);
        assert!((d - 5.0).abs() < 1e-5);
    }

    // ========================================================================
    // Segment
    // ========================================================================

    #[test]
    fn test_segment_helpers() {
        let s = Segment::new(Point::new(0.0, 0.0), Point::new(30.0, 40.0));
        assert_eq!(s.length(), 50.0);
        assert_eq!(s.midpoint(), Point::new(15.0, 20.0));
        assert_eq!(s.distance_to(Point::new(0.0, 0.0)), 0.0);
    }

    // ========================================================================
    // Path Commands
    // ========================================================================

    #[test]
    fn test_line_path_format() {
        assert_eq!(
            generate_line_path(Point::new(10.0, 20.0), Point::new(110.0, 20.0)),
            "M 10 20 L 110 20"
        );
    }

    #[test]
    fn test_polyline_joins_segments() {
        let segments = [
            Segment::new(Point::new(0.0, 0.0), Point::new(0.0, 40.0)),
            Segment::new(Point::new(0.0, 40.0), Point::new(100.0, 40.0)),
        ];
        assert_eq!(generate_polyline_path(&segments), "M 0 0 L 0 40 M 0 40 L 100 40");
    }

    #[test]
    fn test_polyline_empty() {
        assert_eq!(generate_polyline_path(&[]), "");
    }

    #[test]
    fn test_polygon_path_is_closed() {
        let path = generate_polygon_path(&[
            Point::new(0.0, 10.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 10.0),
        ]);
        assert_eq!(path, "M 0 10 L 10 0 L 20 10 Z");
        assert_eq!(generate_polygon_path(&[]), "");
    }

    #[test]
    fn test_circle_path() {
        let path = generate_circle_path(Point::new(50.0, 50.0), 20.0);
        assert!(path.starts_with("M 30 50 A 20 20 0 1 0 70 50"));
        assert!(path.ends_with('Z'));
    }
}
