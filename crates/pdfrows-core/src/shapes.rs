//! Line and Rect extraction from painted paths.
//!
//! Converts painted PDF paths into geometric shapes (Line, Rect) with
//! coordinates in top-left origin system (y-flipped from PDF's bottom-left).

use crate::geometry::{Orientation, Point};
use crate::path::{Path, PathSegment};

/// A path together with the paint operation that made it visible.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintedPath {
    pub path: Path,
    pub stroke: bool,
    pub fill: bool,
    pub line_width: f64,
}

/// A straight line segment extracted from a painted path.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
    pub line_width: f64,
    pub orientation: Orientation,
}

/// An axis-aligned rectangle extracted from a painted path.
#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
    pub line_width: f64,
    pub stroke: bool,
    pub fill: bool,
}

impl Rect {
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Tolerance for floating-point comparison when detecting axis-aligned shapes.
const AXIS_TOLERANCE: f64 = 1e-6;

fn classify_orientation(a: Point, b: Point) -> Orientation {
    if (b.y - a.y).abs() < AXIS_TOLERANCE {
        Orientation::Horizontal
    } else if (b.x - a.x).abs() < AXIS_TOLERANCE {
        Orientation::Vertical
    } else {
        Orientation::Diagonal
    }
}

fn same_point(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < AXIS_TOLERANCE && (a.y - b.y).abs() < AXIS_TOLERANCE
}

/// Split a path's segments into subpaths, each starting at a MoveTo.
fn subpaths(segments: &[PathSegment]) -> Vec<&[PathSegment]> {
    let mut result = Vec::new();
    let mut start = 0;
    for (i, seg) in segments.iter().enumerate() {
        if i > start && matches!(seg, PathSegment::MoveTo(_)) {
            result.push(&segments[start..i]);
            start = i;
        }
    }
    if start < segments.len() {
        result.push(&segments[start..]);
    }
    result
}

/// Detect an axis-aligned rectangle: four straight sides, closed either by
/// `h` or by returning to the first point.
fn detect_rect(subpath: &[PathSegment]) -> Option<[Point; 4]> {
    let mut vertices: Vec<Point> = Vec::with_capacity(5);
    let mut closed = false;
    for seg in subpath {
        match seg {
            PathSegment::MoveTo(p) | PathSegment::LineTo(p) => vertices.push(*p),
            PathSegment::CurveTo { .. } => return None,
            PathSegment::ClosePath => closed = true,
        }
    }
    if vertices.len() == 5 && same_point(vertices[0], vertices[4]) {
        vertices.pop();
        closed = true;
    }
    if !closed || vertices.len() != 4 {
        return None;
    }
    let corners = [vertices[0], vertices[1], vertices[2], vertices[3]];
    for i in 0..4 {
        if classify_orientation(corners[i], corners[(i + 1) % 4]) == Orientation::Diagonal {
            return None;
        }
    }
    Some(corners)
}

/// Extract Line and Rect objects from a painted path.
///
/// Coordinates are converted from PDF's bottom-left origin to top-left using
/// `page_height`. Closed axis-aligned four-sided subpaths become rects,
/// whatever the paint operation. Every straight segment of any other subpath
/// becomes a line. Curved segments produce nothing.
pub fn extract_shapes(painted: &PaintedPath, page_height: f64) -> (Vec<Line>, Vec<Rect>) {
    let mut lines = Vec::new();
    let mut rects = Vec::new();
    let flip = |p: Point| Point::new(p.x, page_height - p.y);

    for subpath in subpaths(&painted.path.segments) {
        if let Some(corners) = detect_rect(subpath) {
            let xs = corners.map(|p| p.x);
            let ys = corners.map(|p| page_height - p.y);
            rects.push(Rect {
                x0: xs.iter().copied().fold(f64::INFINITY, f64::min),
                top: ys.iter().copied().fold(f64::INFINITY, f64::min),
                x1: xs.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                bottom: ys.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                line_width: painted.line_width,
                stroke: painted.stroke,
                fill: painted.fill,
            });
            continue;
        }

        let mut start: Option<Point> = None;
        let mut prev: Option<Point> = None;
        for seg in subpath {
            let (from, to) = match seg {
                PathSegment::MoveTo(p) => {
                    start = Some(*p);
                    prev = Some(*p);
                    continue;
                }
                PathSegment::CurveTo { end } => {
                    prev = Some(*end);
                    continue;
                }
                PathSegment::LineTo(p) => {
                    let from = prev;
                    prev = Some(*p);
                    (from, *p)
                }
                PathSegment::ClosePath => {
                    let from = prev;
                    prev = start;
                    match start {
                        Some(s) => (from, s),
                        None => continue,
                    }
                }
            };
            let Some(from) = from else { continue };
            if same_point(from, to) {
                continue;
            }
            let (a, b) = (flip(from), flip(to));
            lines.push(Line {
                x0: a.x.min(b.x),
                top: a.y.min(b.y),
                x1: a.x.max(b.x),
                bottom: a.y.max(b.y),
                line_width: painted.line_width,
                orientation: classify_orientation(a, b),
            });
        }
    }

    (lines, rects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Ctm;
    use crate::path::PathBuilder;

    const PAGE_HEIGHT: f64 = 792.0;

    fn painted(build: impl FnOnce(&mut PathBuilder), stroke: bool, fill: bool) -> PaintedPath {
        let mut builder = PathBuilder::new(Ctm::identity());
        build(&mut builder);
        PaintedPath {
            path: builder.take_and_reset(),
            stroke,
            fill,
            line_width: 1.0,
        }
    }

    #[test]
    fn re_operator_yields_rect_with_flipped_y() {
        let p = painted(|b| b.rectangle(100.0, 500.0, 200.0, 100.0), true, false);
        let (lines, rects) = extract_shapes(&p, PAGE_HEIGHT);
        assert!(lines.is_empty());
        assert_eq!(rects.len(), 1);
        let r = &rects[0];
        assert_eq!((r.x0, r.top, r.x1, r.bottom), (100.0, 192.0, 300.0, 292.0));
        assert_eq!(r.width(), 200.0);
        assert_eq!(r.height(), 100.0);
        assert!(r.stroke && !r.fill);
    }

    #[test]
    fn filled_rect_is_still_a_rect() {
        let p = painted(|b| b.rectangle(0.0, 0.0, 10.0, 0.5), false, true);
        let (_, rects) = extract_shapes(&p, PAGE_HEIGHT);
        assert_eq!(rects.len(), 1);
        assert!(rects[0].fill);
    }

    #[test]
    fn four_lines_back_to_start_form_rect() {
        let p = painted(
            |b| {
                b.move_to(0.0, 0.0);
                b.line_to(10.0, 0.0);
                b.line_to(10.0, 10.0);
                b.line_to(0.0, 10.0);
                b.line_to(0.0, 0.0);
            },
            true,
            false,
        );
        let (lines, rects) = extract_shapes(&p, PAGE_HEIGHT);
        assert!(lines.is_empty());
        assert_eq!(rects.len(), 1);
    }

    #[test]
    fn single_segment_becomes_horizontal_line() {
        let p = painted(
            |b| {
                b.move_to(50.0, 700.0);
                b.line_to(250.0, 700.0);
            },
            true,
            false,
        );
        let (lines, rects) = extract_shapes(&p, PAGE_HEIGHT);
        assert!(rects.is_empty());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].orientation, Orientation::Horizontal);
        assert_eq!((lines[0].x0, lines[0].top, lines[0].x1), (50.0, 92.0, 250.0));
    }

    #[test]
    fn polyline_yields_one_line_per_segment() {
        let p = painted(
            |b| {
                b.move_to(0.0, 0.0);
                b.line_to(0.0, 100.0);
                b.line_to(50.0, 100.0);
                b.line_to(80.0, 140.0);
            },
            true,
            false,
        );
        let (lines, _) = extract_shapes(&p, PAGE_HEIGHT);
        let orientations: Vec<Orientation> = lines.iter().map(|l| l.orientation).collect();
        assert_eq!(
            orientations,
            vec![
                Orientation::Vertical,
                Orientation::Horizontal,
                Orientation::Diagonal
            ]
        );
    }

    #[test]
    fn close_path_adds_closing_segment() {
        let p = painted(
            |b| {
                b.move_to(0.0, 0.0);
                b.line_to(10.0, 0.0);
                b.line_to(5.0, 8.0);
                b.close_path();
            },
            true,
            false,
        );
        let (lines, rects) = extract_shapes(&p, PAGE_HEIGHT);
        assert!(rects.is_empty());
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn curves_produce_no_lines() {
        let p = painted(
            |b| {
                b.move_to(0.0, 0.0);
                b.curve_to(10.0, 10.0);
            },
            true,
            false,
        );
        let (lines, rects) = extract_shapes(&p, PAGE_HEIGHT);
        assert!(lines.is_empty());
        assert!(rects.is_empty());
    }

    #[test]
    fn multiple_subpaths_are_independent() {
        let p = painted(
            |b| {
                b.rectangle(0.0, 0.0, 10.0, 10.0);
                b.move_to(20.0, 0.0);
                b.line_to(20.0, 30.0);
            },
            true,
            false,
        );
        let (lines, rects) = extract_shapes(&p, PAGE_HEIGHT);
        assert_eq!(rects.len(), 1);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].orientation, Orientation::Vertical);
    }
}
