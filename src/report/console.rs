use crate::collect::aggregator::{AnalysisReport, CollectedElement};
use crate::collect::finder::FoundElement;
use crate::element::category::Category;

// ============================================================================
// Console reporter: formatted terminal output
// ============================================================================

/// Per-category counts, largest first.
///
/// ```text
/// === Category summary (12 elements) ===
///   LINK        5
///   BUTTON      4
///   TOPBAR      3
/// ```
pub fn format_category_summary(report: &AnalysisReport) -> String {
    let mut out = format!("=== Category summary ({} elements) ===\n", report.total());

    let mut counts: Vec<(&Category, &usize)> = report.categories.iter().collect();
    counts.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
    for (category, count) in counts {
        out.push_str(&format!("  {:<10} {}\n", category.as_str(), count));
    }
    out
}

/// One table per bucket: tag, text, displayed, enabled, id, class, category.
pub fn format_element_tables(report: &AnalysisReport) -> String {
    let mut out = String::new();
    out.push_str(&format_table("Clickable elements", &report.clickable));
    out.push('\n');
    out.push_str(&format_table("Input elements", &report.input));
    out
}

fn format_table(title: &str, elements: &[CollectedElement]) -> String {
    let mut out = format!("=== {} ({}) ===\n", title, elements.len());
    if elements.is_empty() {
        out.push_str("  (none)\n");
        return out;
    }

    out.push_str(&format!(
        "  {:<4} {:<8} {:<33} {:<5} {:<5} {:<20} {:<20} {}\n",
        "#", "tag", "text", "disp", "enab", "id", "class", "category"
    ));
    for (i, element) in elements.iter().enumerate() {
        let d = &element.descriptor;
        out.push_str(&format!(
            "  {:<4} {:<8} {:<33} {:<5} {:<5} {:<20} {:<20} {}\n",
            i + 1,
            d.tag,
            d.display_text(),
            yes_no(d.displayed),
            yes_no(d.enabled),
            truncate(d.id().unwrap_or("-"), 20),
            truncate(d.class(), 20),
            element.category()
        ));
    }
    out
}

/// Page header plus detected regions.
pub fn format_page_overview(report: &AnalysisReport) -> String {
    let mut out = format!("=== {} ===\n{}\n", report.title, report.url);
    let regions = report.structure.detected();
    if regions.is_empty() {
        out.push_str("  no structural regions detected\n");
    }
    for (name, region) in regions {
        out.push_str(&format!("  {:<13} {}\n", name, region.selector));
    }
    out
}

/// Result of a text search.
pub fn format_found_element(found: &FoundElement) -> String {
    let d = &found.descriptor;
    let mut out = format!(
        "Found <{}> \"{}\" via {:?}\n",
        d.tag,
        d.display_text(),
        found.method
    );
    out.push_str(&format!(
        "  best:     [{}] {}\n",
        found.best.syntax.as_str(),
        found.best.expression
    ));
    out.push_str(&format!(
        "  reliable: [{}] {}\n",
        found.reliable.syntax.as_str(),
        found.reliable.expression
    ));
    out.push_str("  suggestions:\n");
    for s in &found.suggestions {
        out.push_str(&format!(
            "    {},{},{},{}\n",
            s.group, s.name, s.selector_type, s.selector_value
        ));
    }
    out
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn truncate(value: &str, width: usize) -> String {
    let value = value.trim();
    if value.chars().count() > width {
        let cut: String = value.chars().take(width.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        value.to_string()
    }
}
