//! Top-level PDF document type for opening and extracting content.

use pdfrows_core::{Char, ExtractOptions, Line, PaintedPath, Path, PdfError, Rect, extract_shapes};
use pdfrows_parse::{
    CharEvent, ContentHandler, LopdfBackend, LopdfDocument, PageGeometry, PathEvent, PdfBackend,
    char_from_event,
};
use tracing::debug;

use crate::Page;

/// Iterator over pages of a PDF document, yielding each page on demand.
///
/// Created by [`Pdf::pages_iter()`]. Each call to [`next()`](Iterator::next)
/// interprets one page; pages are not retained after being yielded.
pub struct PagesIter<'a> {
    pdf: &'a Pdf,
    current: usize,
    count: usize,
}

impl Iterator for PagesIter<'_> {
    type Item = Result<Page, PdfError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.count {
            return None;
        }
        let result = self.pdf.page(self.current);
        self.current += 1;
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.current;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PagesIter<'_> {}

/// A PDF document opened for extraction.
///
/// The parsed document is owned by this value and released when it drops.
///
/// # Example
///
/// ```ignore
/// let pdf = Pdf::open_file("report.pdf", None)?;
/// for page in pdf.pages_iter() {
///     let words = page?.extract_words(&WordOptions::default());
/// }
/// ```
pub struct Pdf {
    doc: LopdfDocument,
    options: ExtractOptions,
}

/// Collects interpreter events for one page.
#[derive(Default)]
struct CollectingHandler {
    chars: Vec<CharEvent>,
    paths: Vec<PathEvent>,
}

impl ContentHandler for CollectingHandler {
    fn on_char(&mut self, event: CharEvent) {
        self.chars.push(event);
    }

    fn on_path_painted(&mut self, event: PathEvent) {
        self.paths.push(event);
    }
}

impl Pdf {
    /// Open a PDF document from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::IoError`] if the file cannot be read, or any error
    /// from [`Pdf::open`].
    #[cfg(feature = "std")]
    pub fn open_file(
        path: impl AsRef<std::path::Path>,
        options: Option<ExtractOptions>,
    ) -> Result<Self, PdfError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::open(&bytes, options)
    }

    /// Open a PDF document from bytes.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::PasswordRequired`] if the PDF is encrypted,
    /// [`PdfError::ResourceLimitExceeded`] if the input is larger than
    /// `max_input_bytes`, and [`PdfError::ParseError`] if the bytes are not a
    /// valid PDF document.
    pub fn open(bytes: &[u8], options: Option<ExtractOptions>) -> Result<Self, PdfError> {
        let options = options.unwrap_or_default();
        options.check_input_size(bytes.len())?;
        let doc = LopdfBackend::open(bytes)?;
        debug!(pages = LopdfBackend::page_count(&doc), "opened PDF");
        Ok(Self { doc, options })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        LopdfBackend::page_count(&self.doc)
    }

    /// Iterate pages in document order, interpreting each on demand.
    pub fn pages_iter(&self) -> PagesIter<'_> {
        PagesIter {
            pdf: self,
            current: 0,
            count: self.page_count(),
        }
    }

    /// Access a page by 0-based index, extracting its chars and shapes.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::PageOutOfRange`] for a bad index, or any error
    /// raised while interpreting the page content.
    pub fn page(&self, index: usize) -> Result<Page, PdfError> {
        let lopdf_page = LopdfBackend::get_page(&self.doc, index)?;

        let media_box = LopdfBackend::page_media_box(&self.doc, &lopdf_page)?;
        let rotation = LopdfBackend::page_rotate(&self.doc, &lopdf_page)?;
        let geometry = PageGeometry::new(media_box, rotation);

        let mut handler = CollectingHandler::default();
        LopdfBackend::interpret_page(&self.doc, &lopdf_page, &mut handler, &self.options)?;

        let height = geometry.height();
        let chars: Vec<Char> = handler
            .chars
            .iter()
            .map(|event| char_from_event(event, height))
            .collect();

        let mut lines: Vec<Line> = Vec::new();
        let mut rects: Vec<Rect> = Vec::new();
        for event in &handler.paths {
            let (page_lines, page_rects) = extract_shapes(&painted_path(event), height);
            lines.extend(page_lines);
            rects.extend(page_rects);
        }

        debug!(
            page = index,
            chars = chars.len(),
            lines = lines.len(),
            rects = rects.len(),
            "interpreted page"
        );

        Ok(Page::with_geometry(
            index,
            geometry.width(),
            height,
            chars,
            lines,
            rects,
        ))
    }
}

/// Convert a `PathEvent` from the interpreter into a `PaintedPath` for shape extraction.
fn painted_path(event: &PathEvent) -> PaintedPath {
    PaintedPath {
        path: Path {
            segments: event.segments.clone(),
        },
        stroke: event.paint_op.strokes(),
        fill: event.paint_op.fills(),
        line_width: event.line_width,
    }
}
