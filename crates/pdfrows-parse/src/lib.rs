//! pdfrows-parse: PDF parsing backend and content stream interpreter.
//!
//! Opens documents through lopdf, resolves fonts (widths, encodings and
//! ToUnicode maps), and interprets page content streams into glyph and
//! painted-path events. It depends on pdfrows-core for shared data types.

pub mod backend;
pub mod char_extraction;
pub mod cmap;
pub mod encoding;
pub mod error;
pub mod font;
pub mod handler;
mod interpreter;
pub mod lopdf_backend;
pub mod page_geometry;
pub mod standard_fonts;
pub mod text_state;

pub use backend::PdfBackend;
pub use char_extraction::char_from_event;
pub use cmap::ToUnicodeCMap;
pub use encoding::{BaseEncoding, FontEncoding, glyph_name_to_unicode};
pub use error::BackendError;
pub use font::LoadedFont;
pub use handler::{CharEvent, ContentHandler, PaintOp, PathEvent};
pub use lopdf_backend::{LopdfBackend, LopdfDocument, LopdfPage};
pub use page_geometry::PageGeometry;
pub use pdfrows_core;
