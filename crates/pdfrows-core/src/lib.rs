//! pdfrows-core: Backend-independent data types and algorithms.
//!
//! This crate provides the geometric types (BBox, Char, Word, Line, Rect,
//! Edge) and the algorithms that work on them: word grouping, lattice table
//! detection and visual row clustering. It does no PDF parsing.

pub mod cluster;
pub mod edges;
pub mod error;
pub mod geometry;
pub mod path;
pub mod rows;
pub mod shapes;
pub mod table;
pub mod text;
pub mod words;

pub use cluster::cluster_indices;
pub use edges::{Edge, EdgeSource, derive_edges, edge_from_line, edges_from_rect};
pub use error::{ExtractOptions, PdfError};
pub use geometry::{BBox, Ctm, Orientation, Point};
pub use path::{Path, PathBuilder, PathSegment};
pub use rows::{cluster_rows, row_key};
pub use shapes::{Line, PaintedPath, Rect, extract_shapes};
pub use table::{
    Cell, Intersection, Table, TableFinder, TableRow, TableSettings, cells_to_tables,
    edges_to_intersections, intersections_to_cells, largest_table,
};
pub use text::Char;
pub use words::{Word, WordExtractor, WordOptions};
