use std::path::PathBuf;

use clap::Parser;

/// Print the table rows of a PDF document as a JSON array of arrays.
///
/// Rows come from the largest ruled table on each page. A document with no
/// table rows falls back to words grouped by their vertical position.
#[derive(Debug, Parser)]
#[command(name = "pdfrows", about, version)]
pub struct Cli {
    /// Path to the PDF file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}
