use std::collections::HashSet;

use crate::element::descriptor::{ElementDescriptor, NodeFrame, SiblingPosition, TextSource};
use crate::locator::candidate::{LocatorCandidate, LocatorKind, LocatorSet, Syntax};
use crate::locator::escape::{css_attribute_value, xpath_literal};
use crate::locator::path::{css_path, xpath_path};

/// Data attributes tried first, in order, before any other `data-*`.
pub const DATA_ATTRIBUTE_PRIORITY: &[&str] = &["data-testid", "data-rb-event-key"];

/// Plain attributes tried when no structural locator could be built.
pub const ATTRIBUTE_CHAIN: &[&str] = &[
    "name",
    "type",
    "role",
    "aria-label",
    "title",
    "placeholder",
    "for",
];

const FALLBACK_TAG: &str = "div";

// ============================================================================
// Individual heuristics (each independent, each may produce nothing)
// ============================================================================

fn tag_or_fallback(descriptor: &ElementDescriptor) -> &str {
    if descriptor.tag.trim().is_empty() {
        FALLBACK_TAG
    } else {
        descriptor.tag.as_str()
    }
}

fn id_candidates(descriptor: &ElementDescriptor) -> Vec<LocatorCandidate> {
    match descriptor.id() {
        Some(id) => vec![
            LocatorCandidate::css(LocatorKind::Id, format!("#{id}")),
            LocatorCandidate::xpath(LocatorKind::Id, format!("//*[@id={}]", xpath_literal(id))),
        ],
        None => vec![],
    }
}

fn data_attribute_candidate(descriptor: &ElementDescriptor) -> Option<LocatorCandidate> {
    let data = descriptor.data_attributes();
    let (name, value) = DATA_ATTRIBUTE_PRIORITY
        .iter()
        .find_map(|wanted| data.iter().find(|(name, _)| name == wanted))
        .or_else(|| data.first())?;

    Some(LocatorCandidate::css(
        LocatorKind::DataAttribute,
        format!(
            "{}[{}='{}']",
            tag_or_fallback(descriptor),
            name,
            css_attribute_value(value)
        ),
    ))
}

fn text_candidate(descriptor: &ElementDescriptor) -> Option<LocatorCandidate> {
    if descriptor.text_source != TextSource::Content {
        return None;
    }
    let text = descriptor.text.trim();
    if text.is_empty() {
        return None;
    }

    // text() only sees the element's own text nodes
    let own_text_matches = descriptor
        .lineage
        .first()
        .and_then(|f| f.own_text.as_deref())
        .is_some_and(|own| own == text);

    let expression = if own_text_matches && text.lines().count() == 1 {
        format!("//{}[text()={}]", tag_or_fallback(descriptor), xpath_literal(text))
    } else {
        let first_line = text.lines().map(str::trim).find(|l| !l.is_empty())?;
        format!("//*[contains(text(), {})]", xpath_literal(first_line))
    };
    Some(LocatorCandidate::xpath(LocatorKind::Text, expression))
}

fn attribute_chain_candidate(descriptor: &ElementDescriptor) -> Option<LocatorCandidate> {
    ATTRIBUTE_CHAIN.iter().find_map(|name| {
        descriptor.attribute(name).map(|value| {
            LocatorCandidate::css(
                LocatorKind::Css,
                format!(
                    "{}[{}='{}']",
                    tag_or_fallback(descriptor),
                    name,
                    css_attribute_value(value.trim())
                ),
            )
        })
    })
}

/// The descriptor's lineage with frame 0 replaced by the descriptor's own
/// tag and attributes.
fn element_lineage(descriptor: &ElementDescriptor) -> Vec<NodeFrame> {
    let mut lineage = descriptor.lineage.clone();
    let own = NodeFrame {
        tag: descriptor.tag.clone(),
        attributes: descriptor.attributes.clone(),
        position: lineage.first().map(|f| f.position).unwrap_or_else(SiblingPosition::only_child),
        own_text: lineage.first().and_then(|f| f.own_text.clone()),
    };
    match lineage.first_mut() {
        Some(first) => *first = own,
        None => lineage.push(own),
    }
    lineage
}

// ============================================================================
// Synthesis
// ============================================================================

/// Generate every locator for a descriptor, ranked most robust first,
/// plus the de-duplicated `reliable` list.
pub fn synthesize(descriptor: &ElementDescriptor) -> LocatorSet {
    let tag = tag_or_fallback(descriptor).to_string();
    let bare_xpath = format!("//{tag}");

    let ids = id_candidates(descriptor);
    let data = data_attribute_candidate(descriptor);
    let lineage = element_lineage(descriptor);
    let path_css = css_path(&lineage)
        .filter(|p| *p != tag)
        .map(|p| LocatorCandidate::css(LocatorKind::Css, p));
    let xpath = xpath_path(&lineage).unwrap_or_else(|| bare_xpath.clone());
    let text = text_candidate(descriptor);

    let structural = !ids.is_empty() || data.is_some() || path_css.is_some();
    let chain = if structural {
        None
    } else {
        attribute_chain_candidate(descriptor)
    };

    let mut candidates: Vec<LocatorCandidate> = Vec::new();
    candidates.extend(ids.iter().cloned());
    candidates.extend(data.iter().cloned());
    candidates.extend(path_css.iter().cloned());
    candidates.push(LocatorCandidate::xpath(LocatorKind::Xpath, xpath.clone()));
    candidates.extend(text.iter().cloned());
    candidates.extend(chain.iter().cloned());
    if !candidates.iter().any(|c| c.syntax == Syntax::Css) {
        candidates.push(LocatorCandidate::css(LocatorKind::Css, tag.clone()));
    }
    let mut seen = HashSet::new();
    candidates.retain(|c| seen.insert(c.expression.clone()));

    let primary = ids
        .first()
        .or(data.as_ref())
        .or(path_css.as_ref())
        .or(chain.as_ref())
        .cloned()
        .unwrap_or_else(|| LocatorCandidate::css(LocatorKind::Css, tag.clone()));

    let full_xpath = xpath.clone();

    let mut reliable: Vec<LocatorCandidate> = Vec::new();
    let mut push_unique = |candidate: LocatorCandidate| {
        if !reliable.iter().any(|r| r.expression == candidate.expression) {
            reliable.push(candidate);
        }
    };
    if primary.expression != tag {
        push_unique(primary.clone());
    }
    if let Some(text) = &text {
        push_unique(text.clone());
    }
    if xpath != bare_xpath {
        push_unique(LocatorCandidate::xpath(LocatorKind::Xpath, xpath.clone()));
    }
    if full_xpath != xpath {
        push_unique(LocatorCandidate::xpath(LocatorKind::Xpath, full_xpath.clone()));
    }
    if reliable.is_empty() {
        reliable.push(LocatorCandidate::css(LocatorKind::Css, tag.clone()));
    }

    LocatorSet {
        candidates,
        primary_css: primary.expression,
        xpath,
        full_xpath,
        reliable,
    }
}
