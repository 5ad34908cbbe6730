use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use tracing::{error, info};

use crate::report::error::ExportError;
use crate::report::record::SelectorRecord;

/// Write records as a pretty-printed JSON array. Non-ASCII text is kept as is.
pub fn write_json(records: &[SelectorRecord], path: &Path) -> Result<(), ExportError> {
    if records.is_empty() {
        return Err(ExportError::Empty);
    }

    let io_error = |source: std::io::Error| {
        error!(path = %path.display(), error = %source, "json export failed");
        ExportError::Io {
            path: path.to_path_buf(),
            source,
        }
    };

    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)?;
    std::io::Write::flush(&mut writer).map_err(io_error)?;

    info!(path = %path.display(), records = records.len(), "json exported");
    Ok(())
}

/// Read back a file written by `write_json`.
pub fn read_json(path: &Path) -> Result<Vec<SelectorRecord>, ExportError> {
    let content = fs::read_to_string(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}
