//! Page type for accessing extracted content from a PDF page.

use pdfrows_core::{
    Char, Edge, Line, Rect, Table, TableFinder, TableSettings, Word, WordExtractor, WordOptions,
    derive_edges,
};

/// A single page from a PDF document.
///
/// Holds the characters and ruling shapes extracted from the page, in
/// top-left page coordinates. Constructed by [`Pdf::page`](crate::Pdf::page).
pub struct Page {
    /// Page index (0-based).
    page_number: usize,
    /// Upright page width in points.
    width: f64,
    /// Upright page height in points.
    height: f64,
    chars: Vec<Char>,
    lines: Vec<Line>,
    rects: Vec<Rect>,
}

impl Page {
    /// Create a page with characters only.
    pub fn new(page_number: usize, width: f64, height: f64, chars: Vec<Char>) -> Self {
        Self::with_geometry(page_number, width, height, chars, Vec::new(), Vec::new())
    }

    /// Create a page with characters and ruling shapes.
    pub fn with_geometry(
        page_number: usize,
        width: f64,
        height: f64,
        chars: Vec<Char>,
        lines: Vec<Line>,
        rects: Vec<Rect>,
    ) -> Self {
        Self {
            page_number,
            width,
            height,
            chars,
            lines,
            rects,
        }
    }

    /// Returns the page index (0-based).
    pub fn page_number(&self) -> usize {
        self.page_number
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn chars(&self) -> &[Char] {
        &self.chars
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Ruling edges: every line plus the four sides of every rect.
    pub fn edges(&self) -> Vec<Edge> {
        derive_edges(&self.lines, &self.rects)
    }

    /// Group this page's characters into words.
    pub fn extract_words(&self, options: &WordOptions) -> Vec<Word> {
        WordExtractor::extract(&self.chars, options)
    }

    /// Detect lattice tables from the page's ruling edges.
    pub fn find_tables(&self, settings: &TableSettings) -> Vec<Table> {
        TableFinder::new(self.edges(), settings.clone()).find_tables()
    }

    /// Text grid of the largest table on the page, or `None` when the page
    /// has no table. Grid slots without a cell are `None`.
    pub fn extract_table(&self, settings: &TableSettings) -> Option<Vec<Vec<Option<String>>>> {
        TableFinder::new(self.edges(), settings.clone()).extract_table(&self.chars)
    }
}
