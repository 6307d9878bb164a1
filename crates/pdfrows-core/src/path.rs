use crate::geometry::{Ctm, Point};

/// A segment of a PDF path, in device space.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    /// Move to a new point (starts a new subpath).
    MoveTo(Point),
    /// Straight line from current point to target.
    LineTo(Point),
    /// Cubic Bezier curve. Only the endpoint matters for ruling detection.
    CurveTo { end: Point },
    /// Close the current subpath (line back to the subpath start).
    ClosePath,
}

/// A complete path consisting of segments.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    pub segments: Vec<PathSegment>,
}

/// Builder for constructing paths from PDF path operators.
///
/// Coordinates are transformed through the CTM before storage.
#[derive(Debug, Clone)]
pub struct PathBuilder {
    segments: Vec<PathSegment>,
    current_point: Option<Point>,
    subpath_start: Option<Point>,
    ctm: Ctm,
}

impl PathBuilder {
    pub fn new(ctm: Ctm) -> Self {
        Self {
            segments: Vec::new(),
            current_point: None,
            subpath_start: None,
            ctm,
        }
    }

    /// Update the CTM used for subsequent operators.
    pub fn set_ctm(&mut self, ctm: Ctm) {
        self.ctm = ctm;
    }

    /// `m` operator.
    pub fn move_to(&mut self, x: f64, y: f64) {
        let p = self.ctm.transform_point(Point::new(x, y));
        self.segments.push(PathSegment::MoveTo(p));
        self.current_point = Some(p);
        self.subpath_start = Some(p);
    }

    /// `l` operator. Ignored without a current point.
    pub fn line_to(&mut self, x: f64, y: f64) {
        if self.current_point.is_none() {
            return;
        }
        let p = self.ctm.transform_point(Point::new(x, y));
        self.segments.push(PathSegment::LineTo(p));
        self.current_point = Some(p);
    }

    /// `c`, `v` and `y` operators, reduced to their endpoint.
    pub fn curve_to(&mut self, x3: f64, y3: f64) {
        if self.current_point.is_none() {
            return;
        }
        let end = self.ctm.transform_point(Point::new(x3, y3));
        self.segments.push(PathSegment::CurveTo { end });
        self.current_point = Some(end);
    }

    /// `h` operator.
    pub fn close_path(&mut self) {
        if let Some(start) = self.subpath_start {
            self.segments.push(PathSegment::ClosePath);
            self.current_point = Some(start);
        }
    }

    /// `re` operator: append a rectangle as moveto + 3 lineto + closepath.
    pub fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.move_to(x, y);
        self.line_to(x + width, y);
        self.line_to(x + width, y + height);
        self.line_to(x, y + height);
        self.close_path();
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Take the accumulated segments as a `Path` and reset the builder.
    pub fn take_and_reset(&mut self) -> Path {
        let segments = std::mem::take(&mut self.segments);
        self.current_point = None;
        self.subpath_start = None;
        Path { segments }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_produces_closed_subpath() {
        let mut builder = PathBuilder::new(Ctm::identity());
        builder.rectangle(10.0, 20.0, 30.0, 40.0);
        let path = builder.take_and_reset();
        assert_eq!(
            path.segments,
            vec![
                PathSegment::MoveTo(Point::new(10.0, 20.0)),
                PathSegment::LineTo(Point::new(40.0, 20.0)),
                PathSegment::LineTo(Point::new(40.0, 60.0)),
                PathSegment::LineTo(Point::new(10.0, 60.0)),
                PathSegment::ClosePath,
            ]
        );
    }

    #[test]
    fn points_are_transformed_by_ctm() {
        let mut builder = PathBuilder::new(Ctm::new(2.0, 0.0, 0.0, 2.0, 5.0, 5.0));
        builder.move_to(1.0, 1.0);
        builder.line_to(2.0, 1.0);
        let path = builder.take_and_reset();
        assert_eq!(path.segments[0], PathSegment::MoveTo(Point::new(7.0, 7.0)));
        assert_eq!(path.segments[1], PathSegment::LineTo(Point::new(9.0, 7.0)));
    }

    #[test]
    fn line_without_current_point_is_ignored() {
        let mut builder = PathBuilder::new(Ctm::identity());
        builder.line_to(5.0, 5.0);
        builder.close_path();
        assert!(builder.is_empty());
    }

    #[test]
    fn take_and_reset_clears_state() {
        let mut builder = PathBuilder::new(Ctm::identity());
        builder.move_to(0.0, 0.0);
        builder.line_to(1.0, 0.0);
        assert!(!builder.is_empty());
        let _ = builder.take_and_reset();
        assert!(builder.is_empty());
        builder.line_to(2.0, 0.0);
        assert!(builder.is_empty());
    }
}
