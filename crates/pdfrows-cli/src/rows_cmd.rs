use std::io::{self, Write};
use std::path::Path;

use pdfrows::Row;
use serde::Serialize;
use serde_json::ser::Formatter;
use tracing::info;

/// Extract rows from `file` and print them to stdout as one JSON line.
///
/// Non-ASCII text is written as-is. Absent table slots are `null`.
pub fn run(file: &Path) -> Result<(), i32> {
    let extraction = pdfrows::extract_rows_from_path(file).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;
    info!(
        method = ?extraction.method,
        rows = extraction.rows.len(),
        "extracted rows"
    );

    let mut out = io::stdout().lock();
    write_rows(&mut out, &extraction.rows)
        .map_err(io::Error::from)
        .and_then(|()| writeln!(out))
        .map_err(|e| {
            eprintln!("Error: {e}");
            1
        })
}

/// Single-line JSON with `", "` between array items and `": "` after object
/// keys, e.g. `[["Name", "Age"], ["Alice", "30"]]`.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

fn write_rows<W: io::Write>(writer: W, rows: &[Row]) -> serde_json::Result<()> {
    let mut serializer = serde_json::Serializer::with_formatter(writer, SpacedFormatter);
    rows.serialize(&mut serializer)
}
