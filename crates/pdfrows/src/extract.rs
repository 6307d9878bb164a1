//! Document-level row extraction.
//!
//! Tables come first: every page contributes the rows of its largest lattice
//! table. Only when no page yields a single table row does the whole
//! document fall back to clustering words into visual rows by their rounded
//! `top`. The two strategies are never mixed.

use pdfrows_core::{PdfError, TableSettings, WordOptions, cluster_rows};
use tracing::debug;

use crate::Pdf;

/// One output row. Table rows may contain `None` for grid slots that have
/// no cell; word rows never do.
pub type Row = Vec<Option<String>>;

/// Which strategy produced an [`Extraction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    /// Rows came from lattice tables.
    Table,
    /// No table rows anywhere; rows are clustered words.
    Words,
}

/// Rows extracted from a document, in page order then top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub method: ExtractionMethod,
    pub rows: Vec<Row>,
}

/// Rows of the largest table on each page, concatenated in page order.
///
/// # Errors
///
/// Propagates any error raised while interpreting a page.
pub fn extract_table_rows(pdf: &Pdf, settings: &TableSettings) -> Result<Vec<Row>, PdfError> {
    let mut rows = Vec::new();
    for page in pdf.pages_iter() {
        let page = page?;
        match page.extract_table(settings) {
            Some(table) if !table.is_empty() => {
                debug!(
                    page = page.page_number(),
                    rows = table.len(),
                    "table found"
                );
                rows.extend(table);
            }
            _ => debug!(page = page.page_number(), "no table"),
        }
    }
    Ok(rows)
}

/// Words of every page grouped into visual rows, concatenated in page order.
/// Pages without words contribute nothing.
///
/// # Errors
///
/// Propagates any error raised while interpreting a page.
pub fn extract_word_rows(pdf: &Pdf, options: &WordOptions) -> Result<Vec<Row>, PdfError> {
    let mut rows = Vec::new();
    for page in pdf.pages_iter() {
        let page = page?;
        let words = page.extract_words(options);
        let page_rows = cluster_rows(&words);
        debug!(
            page = page.page_number(),
            words = words.len(),
            rows = page_rows.len(),
            "clustered words"
        );
        rows.extend(
            page_rows
                .into_iter()
                .map(|row| row.into_iter().map(Some).collect::<Row>()),
        );
    }
    Ok(rows)
}

/// Table-first extraction with a whole-document word fallback, using the
/// default table and word settings.
///
/// # Errors
///
/// Propagates any error raised while interpreting a page.
pub fn extract_rows(pdf: &Pdf) -> Result<Extraction, PdfError> {
    let rows = extract_table_rows(pdf, &TableSettings::default())?;
    if !rows.is_empty() {
        debug!(rows = rows.len(), "using table rows");
        return Ok(Extraction {
            method: ExtractionMethod::Table,
            rows,
        });
    }

    let rows = extract_word_rows(pdf, &WordOptions::default())?;
    debug!(rows = rows.len(), "no tables in document, using word rows");
    Ok(Extraction {
        method: ExtractionMethod::Words,
        rows,
    })
}

/// Open the file at `path`, extract its rows, and release the document.
///
/// # Errors
///
/// Returns [`PdfError::IoError`] if the file cannot be read, or any error
/// from opening or interpreting the document.
#[cfg(feature = "std")]
pub fn extract_rows_from_path(path: impl AsRef<std::path::Path>) -> Result<Extraction, PdfError> {
    let pdf = Pdf::open_file(path, None)?;
    extract_rows(&pdf)
}
