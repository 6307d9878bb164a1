//! Error and option types for pdfrows.
//!
//! Provides [`PdfError`] for fatal errors that stop processing and
//! [`ExtractOptions`] for the resource limits applied while interpreting
//! page content.

use std::fmt;

/// Fatal error types for PDF processing.
///
/// These errors indicate conditions that prevent further processing
/// of the PDF or current operation.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfError {
    /// Error parsing PDF structure or syntax.
    ParseError(String),
    /// I/O error reading PDF data.
    IoError(String),
    /// Error resolving font or encoding information.
    FontError(String),
    /// Error during content stream interpretation.
    InterpreterError(String),
    /// A configured resource limit was exceeded.
    ResourceLimitExceeded {
        /// Name of the limit that was exceeded (e.g., "max_input_bytes").
        limit_name: String,
        /// The configured limit value.
        limit_value: usize,
        /// The actual value that exceeded the limit.
        actual_value: usize,
    },
    /// The PDF is encrypted and requires a password to open.
    PasswordRequired,
    /// A page index past the end of the document was requested.
    PageOutOfRange {
        /// The requested 0-based index.
        index: usize,
        /// Number of pages in the document.
        count: usize,
    },
    /// Any other error not covered by specific variants.
    Other(String),
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfError::ParseError(msg) => write!(f, "parse error: {msg}"),
            PdfError::IoError(msg) => write!(f, "I/O error: {msg}"),
            PdfError::FontError(msg) => write!(f, "font error: {msg}"),
            PdfError::InterpreterError(msg) => write!(f, "interpreter error: {msg}"),
            PdfError::ResourceLimitExceeded {
                limit_name,
                limit_value,
                actual_value,
            } => write!(
                f,
                "resource limit exceeded: {limit_name} (limit: {limit_value}, actual: {actual_value})"
            ),
            PdfError::PasswordRequired => write!(f, "PDF is encrypted and requires a password"),
            PdfError::PageOutOfRange { index, count } => {
                write!(f, "page index {index} out of range (0..{count})")
            }
            PdfError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PdfError {}

impl From<std::io::Error> for PdfError {
    fn from(err: std::io::Error) -> Self {
        PdfError::IoError(err.to_string())
    }
}

/// Limits applied while opening a document and interpreting its pages.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Maximum nesting depth for Form XObjects (default: 10).
    pub max_recursion_depth: usize,
    /// Maximum decoded content stream bytes per page (default: 100 MB).
    pub max_stream_bytes: usize,
    /// Maximum input PDF size in bytes (default: None = no limit).
    pub max_input_bytes: Option<usize>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_recursion_depth: 10,
            max_stream_bytes: 100 * 1024 * 1024,
            max_input_bytes: None,
        }
    }
}

impl ExtractOptions {
    /// Check `actual` input size against `max_input_bytes`.
    pub fn check_input_size(&self, actual: usize) -> Result<(), PdfError> {
        match self.max_input_bytes {
            Some(limit) if actual > limit => Err(PdfError::ResourceLimitExceeded {
                limit_name: "max_input_bytes".to_string(),
                limit_value: limit,
                actual_value: actual,
            }),
            _ => Ok(()),
        }
    }
}
