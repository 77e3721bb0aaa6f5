//! Zip export of the document set.
//!
//! Every document becomes one entry `<app>-<DD-MM-YYYY>/<name>` holding the
//! document content as bytes.

use std::io::{self, Cursor, Write};

use chrono::NaiveDate;
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("export I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Folder every entry is placed under, e.g. `playground-07-03-2025`
pub fn archive_folder(app_name: &str, date: NaiveDate) -> String {
    format!("{}-{}", app_name, date.format("%d-%m-%Y"))
}

/// Download name of the archive
pub fn archive_file_name(folder: &str) -> String {
    format!("{folder}.zip")
}

/// Build the archive in memory
pub fn export_archive(entries: &[(String, String)], folder: &str) -> Result<Vec<u8>, ExportError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, content) in entries {
        writer.start_file(format!("{folder}/{name}"), options)?;
        writer.write_all(content.as_bytes())?;
    }

    let cursor = writer.finish()?;
    tracing::info!("Exported {} documents under {}", entries.len(), folder);
    Ok(cursor.into_inner())
}
