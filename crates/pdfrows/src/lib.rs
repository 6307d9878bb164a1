//! pdfrows: Extract table rows from PDF documents, falling back to word
//! clustering when a document has no tables.
//!
//! This is the public API facade crate. It re-exports types from
//! pdfrows-core and uses pdfrows-parse for PDF reading and interpretation.
//!
//! # Architecture
//!
//! - **pdfrows-core**: Backend-independent data types and algorithms
//! - **pdfrows-parse**: PDF parsing and content stream interpretation
//! - **pdfrows** (this crate): `Pdf`, `Page` and the row extraction flow
//!
//! # Example
//!
//! ```ignore
//! let extraction = pdfrows::extract_rows_from_path("report.pdf")?;
//! for row in &extraction.rows {
//!     println!("{row:?}");
//! }
//! ```

mod extract;
mod page;
mod pdf;

#[cfg(feature = "std")]
pub use extract::extract_rows_from_path;
pub use extract::{
    Extraction, ExtractionMethod, Row, extract_rows, extract_table_rows, extract_word_rows,
};
pub use page::Page;
pub use pdf::{PagesIter, Pdf};

pub use pdfrows_core::{
    BBox, Char, Edge, ExtractOptions, Line, PdfError, Rect, Table, TableSettings, Word,
    WordOptions, cluster_rows, row_key,
};

pub use pdfrows_core;
pub use pdfrows_parse;
