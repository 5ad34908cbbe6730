use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::info;
use url::Url;

use crate::browser::accessor::DocumentAccessor;
use crate::report::error::ExportError;

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const MAX_PATH_PART: usize = 30;

/// `selectors_<YYYYmmdd_HHMMSS>.csv`
pub fn default_csv_name(at: &DateTime<Local>) -> String {
    format!("selectors_{}.csv", at.format(TIMESTAMP_FORMAT))
}

/// The JSON export sits next to the CSV with the extension swapped.
pub fn json_path_for(csv_path: &Path) -> PathBuf {
    csv_path.with_extension("json")
}

/// File-name-safe `<host>_<path>` for a page URL, or `page` if it does not parse.
pub fn url_slug(page_url: &str) -> String {
    let Ok(parsed) = Url::parse(page_url) else {
        return "page".to_string();
    };
    let host = parsed.host_str().unwrap_or("page").to_string();

    let path: String = parsed
        .path()
        .trim_matches('/')
        .replace('/', "_")
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .take(MAX_PATH_PART)
        .collect();

    if path.is_empty() {
        host
    } else {
        format!("{host}_{path}")
    }
}

pub fn snapshot_filename(page_url: &str, at: &DateTime<Local>) -> String {
    format!("{}_{}.html", url_slug(page_url), at.format(TIMESTAMP_FORMAT))
}

/// Save the current page source under `<output_dir>/html/`.
pub fn save_html_snapshot<A: DocumentAccessor + ?Sized>(
    accessor: &A,
    output_dir: &Path,
    at: &DateTime<Local>,
) -> Result<PathBuf, ExportError> {
    let html_dir = output_dir.join("html");
    fs::create_dir_all(&html_dir).map_err(|source| ExportError::Io {
        path: html_dir.clone(),
        source,
    })?;

    let page_url = accessor.current_url().unwrap_or_default();
    let source = accessor.page_source()?;

    let path = html_dir.join(snapshot_filename(&page_url, at));
    fs::write(&path, source).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;

    info!(path = %path.display(), "html snapshot saved");
    Ok(path)
}
