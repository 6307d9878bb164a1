//! Lattice table detection.
//!
//! Tables are found from ruling edges: edges are filtered, snapped into
//! alignment and joined, their crossings become vertices, the smallest
//! rectangles bounded by connected vertices become cells, and cells sharing a
//! corner are grouped into tables.

use std::collections::{HashMap, HashSet};

use crate::cluster::cluster_indices;
use crate::edges::Edge;
use crate::geometry::{BBox, Orientation};
use crate::text::Char;
use crate::words::{WordExtractor, WordOptions};

/// Configuration for table detection.
///
/// Defaults detect tables from ruling lines only.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSettings {
    /// Snap tolerance for vertical edges (x-axis).
    pub snap_x_tolerance: f64,
    /// Snap tolerance for horizontal edges (y-axis).
    pub snap_y_tolerance: f64,
    /// Join tolerance for horizontal edges.
    pub join_x_tolerance: f64,
    /// Join tolerance for vertical edges.
    pub join_y_tolerance: f64,
    /// Minimum edge length after joining.
    pub edge_min_length: f64,
    /// Minimum edge length before snapping and joining.
    pub edge_min_length_prefilter: f64,
    /// Intersection tolerance along x-axis.
    pub intersection_x_tolerance: f64,
    /// Intersection tolerance along y-axis.
    pub intersection_y_tolerance: f64,
    /// Horizontal tolerance when grouping cell chars into words.
    pub text_x_tolerance: f64,
    /// Vertical tolerance when grouping cell chars into words and lines.
    pub text_y_tolerance: f64,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            snap_x_tolerance: 3.0,
            snap_y_tolerance: 3.0,
            join_x_tolerance: 3.0,
            join_y_tolerance: 3.0,
            edge_min_length: 3.0,
            edge_min_length_prefilter: 1.0,
            intersection_x_tolerance: 3.0,
            intersection_y_tolerance: 3.0,
            text_x_tolerance: 3.0,
            text_y_tolerance: 3.0,
        }
    }
}

impl TableSettings {
    fn word_options(&self) -> WordOptions {
        WordOptions {
            x_tolerance: self.text_x_tolerance,
            y_tolerance: self.text_y_tolerance,
            ..WordOptions::default()
        }
    }
}

/// A detected table cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// Bounding box of the cell.
    pub bbox: BBox,
}

/// One row of a table's grid.
///
/// `cells` has one slot per distinct cell `x0` in the table. A slot is `None`
/// when the row has no cell starting at that column.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub cells: Vec<Option<Cell>>,
    /// Union of the row's present cells.
    pub bbox: BBox,
}

/// A detected table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Bounding box enclosing the entire table.
    pub bbox: BBox,
    /// All cells in the table, in discovery order.
    pub cells: Vec<Cell>,
    text_options: WordOptions,
}

impl Table {
    /// Build a table from its cells. Returns `None` for an empty cell list.
    pub fn from_cells(cells: Vec<Cell>) -> Option<Self> {
        let first = cells.first()?;
        let bbox = cells[1..]
            .iter()
            .fold(first.bbox, |acc, c| acc.union(&c.bbox));
        Some(Self {
            bbox,
            cells,
            text_options: WordOptions::default(),
        })
    }

    /// Rows of the table grid, top to bottom.
    ///
    /// Cells are ordered by `(top, x0)` and grouped by exact `top`. Every row
    /// spans all distinct `x0` values of the table.
    pub fn rows(&self) -> Vec<TableRow> {
        let mut sorted = self.cells.clone();
        sorted.sort_by(|a, b| {
            a.bbox
                .top
                .total_cmp(&b.bbox.top)
                .then_with(|| a.bbox.x0.total_cmp(&b.bbox.x0))
        });

        let mut xs: Vec<f64> = self.cells.iter().map(|c| c.bbox.x0).collect();
        xs.sort_by(f64::total_cmp);
        xs.dedup();

        sorted
            .chunk_by(|a, b| a.bbox.top == b.bbox.top)
            .map(|row_cells| {
                let cells: Vec<Option<Cell>> = xs
                    .iter()
                    .map(|&x| row_cells.iter().rev().find(|c| c.bbox.x0 == x).copied())
                    .collect();
                let bbox = row_cells[1..]
                    .iter()
                    .fold(row_cells[0].bbox, |acc, c| acc.union(&c.bbox));
                TableRow { cells, bbox }
            })
            .collect()
    }

    /// Extract the text grid of this table from the page's chars.
    ///
    /// A char belongs to a cell when its midpoint lies inside the cell,
    /// counting the left and top borders but not the right and bottom ones.
    /// Absent grid slots are `None`; a cell without chars yields `""`.
    pub fn extract(&self, chars: &[Char]) -> Vec<Vec<Option<String>>> {
        self.rows()
            .into_iter()
            .map(|row| {
                let row_chars: Vec<&Char> = chars
                    .iter()
                    .filter(|c| row.bbox.contains_half_open(c.bbox.center()))
                    .collect();
                row.cells
                    .iter()
                    .map(|slot| {
                        slot.map(|cell| {
                            let cell_chars: Vec<Char> = row_chars
                                .iter()
                                .filter(|c| cell.bbox.contains_half_open(c.bbox.center()))
                                .map(|&c| c.clone())
                                .collect();
                            cell_text(&cell_chars, &self.text_options)
                        })
                    })
                    .collect()
            })
            .collect()
    }
}

/// Words joined by a space, lines joined by a newline, trimmed.
fn cell_text(chars: &[Char], options: &WordOptions) -> String {
    if chars.is_empty() {
        return String::new();
    }
    let words = WordExtractor::extract(chars, options);
    let tops: Vec<f64> = words.iter().map(|w| w.top()).collect();
    let text = cluster_indices(&tops, options.y_tolerance)
        .into_iter()
        .map(|mut line| {
            line.sort_by(|&a, &b| words[a].x0().total_cmp(&words[b].x0()));
            line.into_iter()
                .map(|i| words[i].text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n");
    text.trim().to_string()
}

/// Drop edges that are diagonal or shorter than `min_length`.
pub fn filter_edges(edges: Vec<Edge>, min_length: f64) -> Vec<Edge> {
    edges
        .into_iter()
        .filter(|e| e.orientation != Orientation::Diagonal && e.length() >= min_length)
        .collect()
}

/// Snap nearby parallel edges to aligned positions.
///
/// Vertical edges are clustered by `x0` within `snap_x_tolerance`, horizontal
/// edges by `top` within `snap_y_tolerance`. Each edge is moved to its
/// cluster's mean. Returns the vertical edges followed by the horizontal
/// ones. Diagonal edges are dropped.
///
/// This does **not** merge edges; it only aligns their positions.
pub fn snap_edges(edges: Vec<Edge>, snap_x_tolerance: f64, snap_y_tolerance: f64) -> Vec<Edge> {
    let (mut verticals, mut horizontals): (Vec<Edge>, Vec<Edge>) = edges
        .into_iter()
        .filter(|e| e.orientation != Orientation::Diagonal)
        .partition(|e| e.orientation == Orientation::Vertical);

    snap_group(&mut verticals, snap_x_tolerance, |e| e.x0, |e, v| {
        e.x0 = v;
        e.x1 = v;
    });
    snap_group(&mut horizontals, snap_y_tolerance, |e| e.top, |e, v| {
        e.top = v;
        e.bottom = v;
    });

    verticals.extend(horizontals);
    verticals
}

/// Cluster edges along a single axis and snap each cluster to its mean.
/// Reorders `edges` by cluster.
fn snap_group<F, G>(edges: &mut Vec<Edge>, tolerance: f64, key: F, set: G)
where
    F: Fn(&Edge) -> f64,
    G: Fn(&mut Edge, f64),
{
    let values: Vec<f64> = edges.iter().map(&key).collect();
    let mut snapped = Vec::with_capacity(edges.len());
    for group in cluster_indices(&values, tolerance) {
        let mean = group.iter().map(|&i| values[i]).sum::<f64>() / group.len() as f64;
        for i in group {
            let mut edge = edges[i].clone();
            set(&mut edge, mean);
            snapped.push(edge);
        }
    }
    *edges = snapped;
}

/// Merge overlapping or adjacent segments of one collinear group.
///
/// `edges` must share orientation and position. They are sorted by their
/// start; an edge whose start lies within `tolerance` of the running end
/// extends it, otherwise it starts a new segment.
pub fn join_edge_group(mut edges: Vec<Edge>, tolerance: f64) -> Vec<Edge> {
    let Some(orientation) = edges.first().map(|e| e.orientation) else {
        return edges;
    };
    let horizontal = orientation == Orientation::Horizontal;
    let start = |e: &Edge| if horizontal { e.x0 } else { e.top };
    let end = |e: &Edge| if horizontal { e.x1 } else { e.bottom };

    edges.sort_by(|a, b| start(a).total_cmp(&start(b)));

    let mut joined: Vec<Edge> = Vec::with_capacity(edges.len());
    for edge in edges {
        match joined.last_mut() {
            Some(last) if start(&edge) <= end(last) + tolerance => {
                if end(&edge) > end(last) {
                    if horizontal {
                        last.x1 = edge.x1;
                    } else {
                        last.bottom = edge.bottom;
                    }
                }
            }
            _ => joined.push(edge),
        }
    }
    joined
}

/// Snap, then join collinear edges.
///
/// Groups are processed horizontal first (by `top`), then vertical (by `x0`),
/// each in ascending position.
pub fn merge_edges(edges: Vec<Edge>, settings: &TableSettings) -> Vec<Edge> {
    let snapped = snap_edges(edges, settings.snap_x_tolerance, settings.snap_y_tolerance);

    let mut keyed: Vec<(u8, f64, Edge)> = snapped
        .into_iter()
        .map(|e| match e.orientation {
            Orientation::Horizontal => (0, e.top, e),
            _ => (1, e.x0, e),
        })
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.total_cmp(&b.1)));

    let mut merged = Vec::new();
    for group in keyed.chunk_by(|a, b| a.0 == b.0 && a.1 == b.1) {
        let tolerance = if group[0].0 == 0 {
            settings.join_x_tolerance
        } else {
            settings.join_y_tolerance
        };
        let edges: Vec<Edge> = group.iter().map(|(_, _, e)| e.clone()).collect();
        merged.extend(join_edge_group(edges, tolerance));
    }
    merged
}

/// A crossing of at least one vertical and one horizontal edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection {
    /// X coordinate (the vertical edge's `x0`).
    pub x: f64,
    /// Y coordinate (the horizontal edge's `top`).
    pub y: f64,
    /// Indices of the vertical edges meeting here.
    pub v_edges: Vec<usize>,
    /// Indices of the horizontal edges meeting here.
    pub h_edges: Vec<usize>,
}

fn point_key(x: f64, y: f64) -> (u64, u64) {
    // adding 0.0 folds -0.0 into 0.0
    ((x + 0.0).to_bits(), (y + 0.0).to_bits())
}

/// Find all intersection points between horizontal and vertical edges.
///
/// A vertical `v` and horizontal `h` meet when `v` spans `h.top` and `h`
/// spans `v.x0`, each within its tolerance. Edge indices refer to `edges`.
/// The result is sorted by `(x, y)`.
pub fn edges_to_intersections(
    edges: &[Edge],
    x_tolerance: f64,
    y_tolerance: f64,
) -> Vec<Intersection> {
    let verticals: Vec<usize> = (0..edges.len())
        .filter(|&i| edges[i].orientation == Orientation::Vertical)
        .collect();
    let horizontals: Vec<usize> = (0..edges.len())
        .filter(|&i| edges[i].orientation == Orientation::Horizontal)
        .collect();

    let mut by_point: HashMap<(u64, u64), usize> = HashMap::new();
    let mut intersections: Vec<Intersection> = Vec::new();

    for &vi in &verticals {
        let v = &edges[vi];
        for &hi in &horizontals {
            let h = &edges[hi];
            if v.top <= h.top + y_tolerance
                && v.bottom >= h.top - y_tolerance
                && v.x0 >= h.x0 - x_tolerance
                && v.x0 <= h.x1 + x_tolerance
            {
                let slot = *by_point.entry(point_key(v.x0, h.top)).or_insert_with(|| {
                    intersections.push(Intersection {
                        x: v.x0,
                        y: h.top,
                        v_edges: Vec::new(),
                        h_edges: Vec::new(),
                    });
                    intersections.len() - 1
                });
                intersections[slot].v_edges.push(vi);
                intersections[slot].h_edges.push(hi);
            }
        }
    }

    intersections.sort_by(|a, b| a.x.total_cmp(&b.x).then_with(|| a.y.total_cmp(&b.y)));
    intersections
}

fn share_any(a: &[usize], b: &[usize]) -> bool {
    a.iter().any(|i| b.contains(i))
}

/// Whether two intersections lie on one common edge.
fn edge_connects(p1: &Intersection, p2: &Intersection) -> bool {
    (p1.x == p2.x && share_any(&p1.v_edges, &p2.v_edges))
        || (p1.y == p2.y && share_any(&p1.h_edges, &p2.h_edges))
}

/// Build cells from intersections.
///
/// For each point (in `(x, y)` order), the cell is the first rectangle found
/// whose top-left is the point, whose bottom-left and top-right corners are
/// later points connected to it by an edge, and whose bottom-right corner
/// exists and connects to both. `intersections` must be sorted by `(x, y)`.
pub fn intersections_to_cells(intersections: &[Intersection]) -> Vec<Cell> {
    let index: HashMap<(u64, u64), usize> = intersections
        .iter()
        .enumerate()
        .map(|(i, p)| (point_key(p.x, p.y), i))
        .collect();

    let mut cells = Vec::new();
    for (i, pt) in intersections.iter().enumerate() {
        let rest = &intersections[i + 1..];
        let below = rest.iter().filter(|p| p.x == pt.x);
        let right: Vec<&Intersection> = rest.iter().filter(|p| p.y == pt.y).collect();

        let found = below
            .filter(|b| edge_connects(pt, b))
            .find_map(|below_pt| {
                right
                    .iter()
                    .filter(|r| edge_connects(pt, r))
                    .find_map(|right_pt| {
                        let corner = index
                            .get(&point_key(right_pt.x, below_pt.y))
                            .map(|&k| &intersections[k])?;
                        (edge_connects(corner, right_pt) && edge_connects(corner, below_pt))
                            .then(|| BBox::new(pt.x, pt.y, corner.x, corner.y))
                    })
            });
        if let Some(bbox) = found {
            cells.push(Cell { bbox });
        }
    }
    cells
}

fn corners(bbox: &BBox) -> [(u64, u64); 4] {
    [
        point_key(bbox.x0, bbox.top),
        point_key(bbox.x0, bbox.bottom),
        point_key(bbox.x1, bbox.top),
        point_key(bbox.x1, bbox.bottom),
    ]
}

/// Group cells that share a corner into tables.
///
/// Groups are grown greedily by repeated passes over the remaining cells.
/// Single-cell groups are dropped. Tables are ordered by their top-left-most
/// cell corner, compared as `(top, x0)`.
pub fn cells_to_tables(cells: Vec<Cell>) -> Vec<Table> {
    let mut remaining = cells;
    let mut groups: Vec<Vec<Cell>> = Vec::new();

    while !remaining.is_empty() {
        let mut current: Vec<Cell> = Vec::new();
        let mut current_corners: HashSet<(u64, u64)> = HashSet::new();
        loop {
            let before = current.len();
            let mut kept = Vec::with_capacity(remaining.len());
            for cell in remaining {
                let cell_corners = corners(&cell.bbox);
                if current.is_empty() || cell_corners.iter().any(|c| current_corners.contains(c))
                {
                    current_corners.extend(cell_corners);
                    current.push(cell);
                } else {
                    kept.push(cell);
                }
            }
            remaining = kept;
            if current.len() == before || remaining.is_empty() {
                break;
            }
        }
        groups.push(current);
    }

    let sort_key = |cells: &[Cell]| {
        cells
            .iter()
            .map(|c| (c.bbox.top, c.bbox.x0))
            .min_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.total_cmp(&b.1)))
            .unwrap_or((f64::INFINITY, f64::INFINITY))
    };
    groups.retain(|g| g.len() > 1);
    groups.sort_by(|a, b| {
        let (at, ax) = sort_key(a);
        let (bt, bx) = sort_key(b);
        at.total_cmp(&bt).then_with(|| ax.total_cmp(&bx))
    });

    groups.into_iter().filter_map(Table::from_cells).collect()
}

/// Pick the table with the most cells; ties go to the topmost, then leftmost.
pub fn largest_table(tables: &[Table]) -> Option<&Table> {
    tables.iter().min_by(|a, b| {
        b.cells
            .len()
            .cmp(&a.cells.len())
            .then_with(|| a.bbox.top.total_cmp(&b.bbox.top))
            .then_with(|| a.bbox.x0.total_cmp(&b.bbox.x0))
    })
}

/// Orchestrator for the table detection pipeline.
pub struct TableFinder {
    edges: Vec<Edge>,
    settings: TableSettings,
}

impl TableFinder {
    /// Create a new TableFinder over a page's edges.
    pub fn new(edges: Vec<Edge>, settings: TableSettings) -> Self {
        Self { edges, settings }
    }

    /// Get a reference to the settings.
    pub fn settings(&self) -> &TableSettings {
        &self.settings
    }

    /// Edges after prefiltering, snapping, joining and length filtering.
    pub fn merged_edges(&self) -> Vec<Edge> {
        let prefiltered = filter_edges(self.edges.clone(), self.settings.edge_min_length_prefilter);
        let merged = merge_edges(prefiltered, &self.settings);
        filter_edges(merged, self.settings.edge_min_length)
    }

    /// Run the table detection pipeline and return detected tables.
    ///
    /// Pipeline: prefilter → snap → join → filter → intersections → cells → tables.
    pub fn find_tables(&self) -> Vec<Table> {
        let edges = self.merged_edges();
        let intersections = edges_to_intersections(
            &edges,
            self.settings.intersection_x_tolerance,
            self.settings.intersection_y_tolerance,
        );
        let cells = intersections_to_cells(&intersections);
        let text_options = self.settings.word_options();
        cells_to_tables(cells)
            .into_iter()
            .map(|t| Table {
                text_options: text_options.clone(),
                ..t
            })
            .collect()
    }

    /// Text grid of the largest table, or `None` when there is no table.
    pub fn extract_table(&self, chars: &[Char]) -> Option<Vec<Vec<Option<String>>>> {
        let tables = self.find_tables();
        largest_table(&tables).map(|t| t.extract(chars))
    }
}
