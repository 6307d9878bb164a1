//! Edge derivation from geometric primitives.
//!
//! Edges are the line segments the table finder works with: every line on the
//! page plus the four sides of every rect.

use crate::geometry::Orientation;
use crate::shapes::{Line, Rect};

/// Source of an edge, tracking which geometric primitive it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeSource {
    /// Derived directly from a Line object.
    Line,
    /// Top edge of a Rect.
    RectTop,
    /// Bottom edge of a Rect.
    RectBottom,
    /// Left edge of a Rect.
    RectLeft,
    /// Right edge of a Rect.
    RectRight,
}

/// A line segment edge for table detection.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Left x coordinate.
    pub x0: f64,
    /// Top y coordinate (distance from top of page).
    pub top: f64,
    /// Right x coordinate.
    pub x1: f64,
    /// Bottom y coordinate (distance from top of page).
    pub bottom: f64,
    /// Edge orientation.
    pub orientation: Orientation,
    /// Where this edge was derived from.
    pub source: EdgeSource,
}

impl Edge {
    /// Length along the edge's own axis.
    pub fn length(&self) -> f64 {
        match self.orientation {
            Orientation::Horizontal => self.x1 - self.x0,
            Orientation::Vertical => self.bottom - self.top,
            Orientation::Diagonal => {
                let dx = self.x1 - self.x0;
                let dy = self.bottom - self.top;
                (dx * dx + dy * dy).sqrt()
            }
        }
    }
}

/// Derive an Edge from a Line (direct conversion).
pub fn edge_from_line(line: &Line) -> Edge {
    Edge {
        x0: line.x0,
        top: line.top,
        x1: line.x1,
        bottom: line.bottom,
        orientation: line.orientation,
        source: EdgeSource::Line,
    }
}

/// Derive 4 Edges from a Rect (top, bottom, left, right).
pub fn edges_from_rect(rect: &Rect) -> [Edge; 4] {
    let horizontal = |y: f64, source| Edge {
        x0: rect.x0,
        top: y,
        x1: rect.x1,
        bottom: y,
        orientation: Orientation::Horizontal,
        source,
    };
    let vertical = |x: f64, source| Edge {
        x0: x,
        top: rect.top,
        x1: x,
        bottom: rect.bottom,
        orientation: Orientation::Vertical,
        source,
    };
    [
        horizontal(rect.top, EdgeSource::RectTop),
        horizontal(rect.bottom, EdgeSource::RectBottom),
        vertical(rect.x0, EdgeSource::RectLeft),
        vertical(rect.x1, EdgeSource::RectRight),
    ]
}

/// Derive all edges from the page's lines and rects, lines first.
pub fn derive_edges(lines: &[Line], rects: &[Rect]) -> Vec<Edge> {
    let mut edges: Vec<Edge> = lines.iter().map(edge_from_line).collect();
    for rect in rects {
        edges.extend(edges_from_rect(rect));
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(x0: f64, top: f64, x1: f64, bottom: f64, orientation: Orientation) -> Line {
        Line {
            x0,
            top,
            x1,
            bottom,
            line_width: 1.0,
            orientation,
        }
    }

    fn rect(x0: f64, top: f64, x1: f64, bottom: f64) -> Rect {
        Rect {
            x0,
            top,
            x1,
            bottom,
            line_width: 1.0,
            stroke: true,
            fill: false,
        }
    }

    #[test]
    fn line_converts_directly() {
        let e = edge_from_line(&line(10.0, 50.0, 200.0, 50.0, Orientation::Horizontal));
        assert_eq!((e.x0, e.top, e.x1, e.bottom), (10.0, 50.0, 200.0, 50.0));
        assert_eq!(e.orientation, Orientation::Horizontal);
        assert_eq!(e.source, EdgeSource::Line);
        assert_eq!(e.length(), 190.0);
    }

    #[test]
    fn rect_yields_four_sides() {
        let [top, bottom, left, right] = edges_from_rect(&rect(10.0, 20.0, 110.0, 70.0));

        assert_eq!((top.x0, top.top, top.x1, top.bottom), (10.0, 20.0, 110.0, 20.0));
        assert_eq!(top.source, EdgeSource::RectTop);
        assert_eq!(bottom.top, 70.0);
        assert_eq!(bottom.source, EdgeSource::RectBottom);

        assert_eq!((left.x0, left.top, left.x1, left.bottom), (10.0, 20.0, 10.0, 70.0));
        assert_eq!(left.orientation, Orientation::Vertical);
        assert_eq!(right.x0, 110.0);
        assert_eq!(right.length(), 50.0);
    }

    #[test]
    fn thin_filled_rect_yields_degenerate_sides() {
        let edges = edges_from_rect(&rect(0.0, 100.0, 300.0, 100.5));
        assert_eq!(edges[0].length(), 300.0);
        assert_eq!(edges[2].length(), 0.5);
    }

    #[test]
    fn derive_combines_lines_and_rects() {
        let lines = vec![
            line(0.0, 0.0, 100.0, 0.0, Orientation::Horizontal),
            line(0.0, 0.0, 30.0, 40.0, Orientation::Diagonal),
        ];
        let rects = vec![rect(0.0, 0.0, 10.0, 10.0)];
        let edges = derive_edges(&lines, &rects);
        assert_eq!(edges.len(), 6);
        assert_eq!(edges[0].source, EdgeSource::Line);
        assert_eq!(edges[1].length(), 50.0);
        assert_eq!(edges[2].source, EdgeSource::RectTop);
    }

    #[test]
    fn derive_on_empty_page() {
        assert!(derive_edges(&[], &[]).is_empty());
    }
}
