//! Row appends for the table files.

use std::fs::OpenOptions;
use std::path::Path;

use super::{TableError, TableRecord};

/// Append one record, writing the header first when the file is new or empty.
///
/// The header decision is made on the opened handle's length. Files are not
/// locked; one writer per data directory is assumed.
pub fn append_record<R: TableRecord>(path: &Path, record: &R) -> Result<(), TableError> {
    let io_err = |source| TableError::Io {
        path: path.to_path_buf(),
        source,
    };
    let csv_err = |source| TableError::Csv {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;
    let needs_header = file.metadata().map_err(io_err)?.len() == 0;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    if needs_header {
        writer.write_record(R::HEADERS).map_err(csv_err)?;
    }
    writer.write_record(record.fields()).map_err(csv_err)?;
    writer.flush().map_err(io_err)?;
    tracing::debug!(path = %path.display(), "Appended table row");
    Ok(())
}
