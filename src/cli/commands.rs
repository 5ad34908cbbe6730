use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::browser::accessor::DocumentAccessor;
use crate::browser::readiness::{ReadinessConfig, wait_for_page_load};
use crate::browser::webdriver::WebDriverSession;
use crate::cli::config::{AnalyzeSettings, WebDriverSettings};
use crate::collect::aggregator::{AnalysisReport, SelectorCollector};
use crate::collect::finder::{FindOptions, FoundElement, find_by_text};
use crate::element::classifier::KnownElements;
use crate::report::console::{
    format_category_summary, format_element_tables, format_found_element, format_page_overview,
};
use crate::report::csv::write_csv;
use crate::report::error::ExportError;
use crate::report::json::write_json;
use crate::report::record::{SelectorRecord, records_from_report};
use crate::report::snapshot::{default_csv_name, json_path_for, save_html_snapshot};

/// Everything one `analyze` run produced.
///
/// Export failures are collected in `export_errors`; `records` is kept either
/// way so the caller can retry the export.
#[derive(Debug)]
pub struct AnalyzeOutcome {
    pub report: AnalysisReport,
    pub records: Vec<SelectorRecord>,
    pub csv_path: Option<PathBuf>,
    pub json_path: Option<PathBuf>,
    pub snapshot_path: Option<PathBuf>,
    pub export_errors: Vec<ExportError>,
}

impl AnalyzeOutcome {
    pub fn exported(&self) -> bool {
        self.export_errors.is_empty()
    }
}

// ============================================================================
// analyze subcommand
// ============================================================================

pub fn cmd_analyze(
    url: &str,
    webdriver: &WebDriverSettings,
    settings: &AnalyzeSettings,
    known: KnownElements,
) -> Result<AnalyzeOutcome, Box<dyn std::error::Error>> {
    let mut session = WebDriverSession::launch(&webdriver.endpoint, webdriver.headless)?;
    session.navigate(url)?;

    let outcome = analyze_document(&session, settings, known);

    if let Err(e) = session.quit() {
        warn!(error = %e, "webdriver session did not close cleanly");
    }
    Ok(outcome)
}

/// Analyze an already-loaded document and export the records.
pub fn analyze_document<A: DocumentAccessor + ?Sized>(
    accessor: &A,
    settings: &AnalyzeSettings,
    known: KnownElements,
) -> AnalyzeOutcome {
    let readiness =
        ReadinessConfig::from_secs(settings.ready_timeout_secs, settings.quiesce_timeout_secs);
    wait_for_page_load(accessor, &readiness);

    let report = SelectorCollector::new(accessor)
        .with_known_elements(known)
        .collect();

    println!("{}", format_page_overview(&report));
    println!("{}", format_category_summary(&report));
    println!("{}", format_element_tables(&report));

    let output_dir = Path::new(&settings.output_dir);
    let mut export_errors = Vec::new();

    if let Err(source) = std::fs::create_dir_all(output_dir) {
        error!(dir = %output_dir.display(), error = %source, "cannot create output directory");
        export_errors.push(ExportError::Io {
            path: output_dir.to_path_buf(),
            source,
        });
    }

    let snapshot_path = if settings.save_html {
        match save_html_snapshot(accessor, output_dir, &report.analyzed_at) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(error = %e, "html snapshot skipped");
                None
            }
        }
    } else {
        None
    };

    let records = records_from_report(&report, &settings.group);

    let csv_target = settings
        .csv_output
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| output_dir.join(default_csv_name(&report.analyzed_at)));
    let json_target = settings
        .json_output
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| json_path_for(&csv_target));

    let csv_path = match write_csv(&records, &csv_target) {
        Ok(()) => Some(csv_target),
        Err(e) => {
            export_errors.push(e);
            None
        }
    };
    let json_path = match write_json(&records, &json_target) {
        Ok(()) => Some(json_target),
        Err(e) => {
            export_errors.push(e);
            None
        }
    };

    for path in csv_path.iter().chain(json_path.iter()) {
        println!("Exported {} selectors to {}", records.len(), path.display());
    }
    for e in &export_errors {
        eprintln!("Export failed: {e}");
    }
    info!(records = records.len(), failures = export_errors.len(), "analysis complete");

    AnalyzeOutcome {
        report,
        records,
        csv_path,
        json_path,
        snapshot_path,
        export_errors,
    }
}

// ============================================================================
// find subcommand
// ============================================================================

/// Split the `--element-types` flag value.
pub fn parse_element_types(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

pub fn cmd_find(
    url: &str,
    webdriver: &WebDriverSettings,
    text: &str,
    options: &FindOptions,
    readiness: &ReadinessConfig,
) -> Result<Option<FoundElement>, Box<dyn std::error::Error>> {
    let mut session = WebDriverSession::launch(&webdriver.endpoint, webdriver.headless)?;
    session.navigate(url)?;

    let found = find_in_document(&session, text, options, readiness);

    if let Err(e) = session.quit() {
        warn!(error = %e, "webdriver session did not close cleanly");
    }
    Ok(found)
}

/// Wait for the already-navigated document, then search it and print the match.
pub fn find_in_document<A: DocumentAccessor + ?Sized>(
    accessor: &A,
    text: &str,
    options: &FindOptions,
    readiness: &ReadinessConfig,
) -> Option<FoundElement> {
    wait_for_page_load(accessor, readiness);

    let found = find_by_text(accessor, text, options);
    match &found {
        Some(found) => println!("{}", format_found_element(found)),
        None => println!("No element containing \"{text}\" was found"),
    }
    found
}
