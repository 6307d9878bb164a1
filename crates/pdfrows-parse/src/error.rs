//! Error type for the lopdf backend and content interpreter.

use pdfrows_core::PdfError;
use thiserror::Error;

/// Failure while loading a document or interpreting a page.
///
/// Converted into [`PdfError`] at the crate boundary.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Document structure could not be read.
    #[error("PDF parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A font resource was unusable.
    #[error("font error: {0}")]
    Font(String),

    /// A content stream could not be interpreted.
    #[error("interpreter error: {0}")]
    Interpreter(String),

    #[error(transparent)]
    Core(#[from] PdfError),
}

impl BackendError {
    /// Wrap a lopdf failure as a parse error, prefixed with what was being read.
    pub(crate) fn lopdf(context: &str, err: lopdf::Error) -> Self {
        BackendError::Parse(format!("{context}: {err}"))
    }
}

impl From<BackendError> for PdfError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => PdfError::ParseError(msg),
            BackendError::Io(e) => PdfError::IoError(e.to_string()),
            BackendError::Font(msg) => PdfError::FontError(msg),
            BackendError::Interpreter(msg) => PdfError::InterpreterError(msg),
            BackendError::Core(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display() {
        let err = BackendError::Parse("missing trailer".to_string());
        assert_eq!(err.to_string(), "PDF parse error: missing trailer");
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "table.pdf");
        let err: BackendError = io_err.into();
        assert!(matches!(err, BackendError::Io(_)));
        assert!(err.to_string().contains("table.pdf"));
    }

    #[test]
    fn lopdf_error_becomes_parse_with_context() {
        let err = BackendError::lopdf("load", lopdf::Error::PageNumberNotFound(4));
        match err {
            BackendError::Parse(msg) => assert!(msg.starts_with("load: ")),
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn converts_into_pdf_error_variants() {
        let cases = [
            (
                BackendError::Parse("xref".to_string()),
                PdfError::ParseError("xref".to_string()),
            ),
            (
                BackendError::Font("widths".to_string()),
                PdfError::FontError("widths".to_string()),
            ),
            (
                BackendError::Interpreter("Do".to_string()),
                PdfError::InterpreterError("Do".to_string()),
            ),
        ];
        for (backend, expected) in cases {
            assert_eq!(PdfError::from(backend), expected);
        }
    }

    #[test]
    fn core_error_passes_through() {
        let backend = BackendError::Core(PdfError::PasswordRequired);
        assert_eq!(backend.to_string(), "PDF is encrypted and requires a password");
        assert_eq!(PdfError::from(backend), PdfError::PasswordRequired);
    }
}
