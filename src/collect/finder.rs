use serde::Serialize;
use tracing::{debug, info, warn};

use crate::browser::accessor::{DocumentAccessor, ElementHandle, QueryKind};
use crate::browser::error::AccessError;
use crate::element::builder::build_descriptor;
use crate::element::descriptor::{ElementDescriptor, ElementKind};
use crate::locator::candidate::{LocatorCandidate, LocatorKind, LocatorSet};
use crate::locator::escape::xpath_literal;
use crate::locator::synthesizer::synthesize;

pub const DEFAULT_ELEMENT_TYPES: &[&str] = &["a", "button", "div", "span"];

/// How the element was found, tried in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMethod {
    /// Scan elements of the requested tags and compare their text.
    DirectScan,
    /// Text node match, climbing to the nearest ancestor of a requested tag.
    ChildText,
    /// Innermost element wrapping a `div` with the text (component markup).
    NestedDiv,
}

#[derive(Debug, Clone)]
pub struct FindOptions {
    pub element_types: Vec<String>,
    pub exact_match: bool,
    pub group: String,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            element_types: DEFAULT_ELEMENT_TYPES.iter().map(|t| t.to_string()).collect(),
            exact_match: false,
            group: "common".to_string(),
        }
    }
}

/// A named selector ready to be added to a selector sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectorSuggestion {
    pub group: String,
    pub name: String,
    pub selector_type: String,
    pub selector_value: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct FoundElement {
    pub method: SearchMethod,
    pub descriptor: ElementDescriptor,
    pub locators: LocatorSet,
    pub best: LocatorCandidate,
    pub reliable: LocatorCandidate,
    pub suggestions: Vec<SelectorSuggestion>,
}

/// Find the element carrying `text` and suggest locators for it.
pub fn find_by_text<A: DocumentAccessor + ?Sized>(
    accessor: &A,
    text: &str,
    options: &FindOptions,
) -> Option<FoundElement> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    info!(text, "searching for element by text");

    let methods = [
        SearchMethod::DirectScan,
        SearchMethod::ChildText,
        SearchMethod::NestedDiv,
    ];
    for method in methods {
        let handle = match search(accessor, method, text, options) {
            Ok(Some(handle)) => handle,
            Ok(None) => continue,
            Err(e) => {
                debug!(?method, error = %e, "search method failed");
                continue;
            }
        };

        match build_descriptor(accessor, &handle, ElementKind::Clickable) {
            Ok(descriptor) => {
                info!(?method, tag = %descriptor.tag, "element found");
                return Some(found(method, descriptor, text, &options.group));
            }
            Err(e) => debug!(?method, error = %e, "found element could not be described"),
        }
    }

    warn!(text, "no element contains the text");
    None
}

fn text_matches(candidate: &str, text: &str, exact: bool) -> bool {
    let candidate = candidate.trim();
    if exact {
        candidate == text
    } else {
        candidate.contains(text)
    }
}

fn search<A: DocumentAccessor + ?Sized>(
    accessor: &A,
    method: SearchMethod,
    text: &str,
    options: &FindOptions,
) -> Result<Option<ElementHandle>, AccessError> {
    let literal = xpath_literal(text);
    match method {
        SearchMethod::DirectScan => {
            for tag in &options.element_types {
                for handle in accessor.query(QueryKind::Css, tag)? {
                    if !accessor.is_displayed(&handle).unwrap_or(false) {
                        continue;
                    }
                    let content = accessor.text(&handle).unwrap_or_default();
                    if text_matches(&content, text, options.exact_match) {
                        return Ok(Some(handle));
                    }
                }
            }
            Ok(None)
        }
        SearchMethod::ChildText => {
            let tags: Vec<String> = options
                .element_types
                .iter()
                .map(|t| format!("self::{t}"))
                .collect();
            let xpath = format!(
                "//*[contains(text(), {literal})]/ancestor-or-self::*[{}][1]",
                tags.join(" or ")
            );
            Ok(accessor.query(QueryKind::XPath, &xpath)?.into_iter().next())
        }
        SearchMethod::NestedDiv => {
            let xpath = format!("//*[.//div[contains(text(), {literal})]]");
            Ok(accessor.query(QueryKind::XPath, &xpath)?.into_iter().last())
        }
    }
}

fn found(method: SearchMethod, descriptor: ElementDescriptor, text: &str, group: &str) -> FoundElement {
    let locators = synthesize(&descriptor);
    let name_base = text.replace(' ', "_").to_lowercase();
    let text_xpath = format!("//*[contains(text(), {})]", xpath_literal(text));

    let suggestion = |suffix: &str, selector_type: &str, value: &str, description: String| {
        SelectorSuggestion {
            group: group.to_string(),
            name: format!("{name_base}_{suffix}"),
            selector_type: selector_type.to_string(),
            selector_value: value.to_string(),
            description,
        }
    };

    let mut suggestions = Vec::new();
    if let Some(id) = descriptor.id() {
        suggestions.push(suggestion("id", "id", id, format!("id of '{text}'")));
    }
    suggestions.push(suggestion("xpath", "xpath", &locators.xpath, format!("xpath of '{text}'")));
    suggestions.push(suggestion("text", "xpath", &text_xpath, format!("element containing '{text}'")));
    suggestions.push(suggestion("css", "css", &locators.primary_css, format!("css selector of '{text}'")));

    let best = locators
        .best()
        .cloned()
        .unwrap_or_else(|| LocatorCandidate::css(LocatorKind::Css, descriptor.tag.clone()));
    let reliable = match descriptor.id() {
        Some(id) => LocatorCandidate::css(LocatorKind::Id, format!("#{id}")),
        None => LocatorCandidate::xpath(LocatorKind::Text, text_xpath),
    };

    FoundElement {
        method,
        descriptor,
        locators,
        best,
        reliable,
        suggestions,
    }
}
