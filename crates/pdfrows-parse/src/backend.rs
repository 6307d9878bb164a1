//! PDF parsing backend trait.
//!
//! Defines the [`PdfBackend`] trait that abstracts the operations the row
//! extractor needs from a PDF reader: opening, page access, page geometry
//! and content interpretation.

use pdfrows_core::{BBox, ExtractOptions, PdfError};

use crate::handler::ContentHandler;

/// Trait abstracting PDF parsing operations.
///
/// # Associated Types
///
/// - `Document`: The parsed PDF document representation.
/// - `Page`: A reference to a single page within a document.
/// - `Error`: Backend-specific error type, convertible to [`PdfError`].
///
/// # Usage
///
/// ```ignore
/// let doc = MyBackend::open(pdf_bytes)?;
/// let page = MyBackend::get_page(&doc, 0)?;
/// let media_box = MyBackend::page_media_box(&doc, &page)?;
/// MyBackend::interpret_page(&doc, &page, &mut handler, &options)?;
/// ```
pub trait PdfBackend {
    /// The parsed PDF document type.
    type Document;

    /// A reference to a single page within a document.
    type Page;

    /// Backend-specific error type, convertible to [`PdfError`].
    type Error: std::error::Error + Into<PdfError>;

    /// Parse PDF bytes into a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a readable PDF or the document
    /// is encrypted.
    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error>;

    /// Return the number of pages in the document.
    fn page_count(doc: &Self::Document) -> usize;

    /// Access a page by 0-based index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range.
    fn get_page(doc: &Self::Document, index: usize) -> Result<Self::Page, Self::Error>;

    /// MediaBox of a page in native PDF units, inherited through the page
    /// tree when the page does not set one.
    ///
    /// # Errors
    ///
    /// Returns an error if the MediaBox entry exists but is malformed.
    fn page_media_box(doc: &Self::Document, page: &Self::Page) -> Result<BBox, Self::Error>;

    /// Page rotation in degrees, 0 when not specified.
    ///
    /// # Errors
    ///
    /// Returns an error if the Rotate entry exists but is malformed.
    fn page_rotate(doc: &Self::Document, page: &Self::Page) -> Result<i32, Self::Error>;

    /// Interpret the page's content stream, calling back into the handler.
    ///
    /// Coordinates reported to the handler are in upright page space with a
    /// bottom-left origin: the MediaBox offset and the page rotation are
    /// already applied.
    ///
    /// # Errors
    ///
    /// Returns an error if content stream parsing fails or a resource limit
    /// is exceeded.
    fn interpret_page(
        doc: &Self::Document,
        page: &Self::Page,
        handler: &mut dyn ContentHandler,
        options: &ExtractOptions,
    ) -> Result<(), Self::Error>;
}
