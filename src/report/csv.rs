use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use tracing::{error, info};

use crate::report::error::ExportError;
use crate::report::record::{FIXED_FIELDS, SelectorRecord, collapse_escaped_quotes};

// ============================================================================
// CSV export
// ============================================================================

/// Header: the fixed fields, then every dynamic key in sorted order.
pub fn csv_header(records: &[SelectorRecord]) -> Vec<String> {
    let dynamic: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.dynamic.keys().map(String::as_str))
        .collect();

    FIXED_FIELDS
        .iter()
        .copied()
        .chain(dynamic)
        .map(str::to_string)
        .collect()
}

/// Quote a CSV field: double embedded quotes, flatten newlines.
pub fn quote_field(value: &str) -> String {
    let flat = value.replace("\r\n", " ").replace(['\n', '\r'], " ");
    format!("\"{}\"", flat.replace('"', "\"\""))
}

/// Render records as CSV text. Every field is quoted; missing dynamic
/// fields are empty.
pub fn format_csv(records: &[SelectorRecord]) -> String {
    let header = csv_header(records);
    let mut out = String::new();

    let line: Vec<String> = header.iter().map(|h| quote_field(h)).collect();
    out.push_str(&line.join(","));
    out.push('\n');

    for record in records {
        let line: Vec<String> = header
            .iter()
            .map(|column| {
                let value = record.field(column).unwrap_or_default();
                if column == "xpath" || column == "full_xpath" {
                    quote_field(&collapse_escaped_quotes(&value))
                } else {
                    quote_field(&value)
                }
            })
            .collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }

    out
}

/// Write records to `path`. The parent directory must already exist.
pub fn write_csv(records: &[SelectorRecord], path: &Path) -> Result<(), ExportError> {
    if records.is_empty() {
        return Err(ExportError::Empty);
    }

    fs::write(path, format_csv(records)).map_err(|source| {
        error!(path = %path.display(), error = %source, "csv export failed");
        ExportError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;

    info!(path = %path.display(), records = records.len(), "csv exported");
    Ok(())
}
