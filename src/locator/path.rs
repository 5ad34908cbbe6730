use crate::element::descriptor::NodeFrame;
use crate::locator::escape::{css_attribute_value, css_identifier, xpath_literal};

/// Levels climbed by the CSS path, the element included.
pub const MAX_CSS_DEPTH: usize = 5;

/// Data attributes preferred over a class token at each CSS path level.
pub const PRIORITY_DATA_ATTRIBUTES: &[&str] = &["data-testid", "data-rb-event-key", "data-id"];

/// Class prefixes that carry structural meaning and tend to survive restyles.
pub const SALIENT_CLASS_PREFIXES: &[&str] = &[
    "nav",
    "menu",
    "btn",
    "button",
    "tab",
    "header",
    "footer",
    "main",
    "content",
    "row",
    "container",
    "active",
    "selected",
    "primary",
    "navbar",
];

/// First class token starting with a salient prefix, else the first token.
pub fn salient_class<'a>(classes: &[&'a str]) -> Option<&'a str> {
    classes
        .iter()
        .find(|class| {
            let lower = class.to_lowercase();
            SALIENT_CLASS_PREFIXES.iter().any(|p| lower.starts_with(p))
        })
        .or_else(|| classes.first())
        .copied()
}

fn priority_data_attribute(frame: &NodeFrame) -> Option<(&'static str, &str)> {
    PRIORITY_DATA_ATTRIBUTES
        .iter()
        .find_map(|name| frame.attribute(name).map(|value| (*name, value)))
}

/// Hierarchical CSS path, nearest ancestor with an id as the anchor.
///
/// `lineage[0]` is the element. Returns `None` when its tag is unknown.
pub fn css_path(lineage: &[NodeFrame]) -> Option<String> {
    if lineage.first()?.tag.trim().is_empty() {
        return None;
    }
    let mut levels = Vec::new();
    let mut stopped = false;

    for frame in lineage.iter().take(MAX_CSS_DEPTH) {
        if let Some(id) = frame.id() {
            levels.push(format!("#{}", css_identifier(id)));
            stopped = true;
            break;
        }
        if frame.tag == "html" {
            stopped = true;
            break;
        }

        let mut level = frame.tag.clone();
        if frame.position.same_tag_count > 1 {
            level.push_str(&format!(":nth-child({})", frame.position.child_index));
        }

        if let Some((name, value)) = priority_data_attribute(frame) {
            level.push_str(&format!("[{}='{}']", name, css_attribute_value(value)));
        } else if let Some(class) = salient_class(&frame.classes()) {
            level.push('.');
            level.push_str(&css_identifier(class));
        }

        levels.push(level);
    }

    // the parent just past the depth limit still anchors the path by id
    if !stopped {
        if let Some(id) = lineage.get(MAX_CSS_DEPTH).and_then(NodeFrame::id) {
            levels.push(format!("#{}", css_identifier(id)));
        }
    }

    if levels.is_empty() {
        return None;
    }
    levels.reverse();
    Some(levels.join(" > "))
}

/// Hierarchical XPath from the element up to `<body>` or the first id.
///
/// Index predicates appear only where more than one sibling shares the tag.
pub fn xpath_path(lineage: &[NodeFrame]) -> Option<String> {
    let element = lineage.first().filter(|f| !f.tag.trim().is_empty())?;
    let mut segments = Vec::new();
    let mut anchored = false;

    for frame in lineage {
        if let Some(id) = frame.id() {
            segments.push(format!("//*[@id={}]", xpath_literal(id)));
            anchored = true;
            break;
        }
        if matches!(frame.tag.as_str(), "body" | "html") {
            break;
        }

        if frame.position.same_tag_count > 1 {
            segments.push(format!("/{}[{}]", frame.tag, frame.position.same_tag_index));
        } else {
            segments.push(format!("/{}", frame.tag));
        }
    }

    if segments.is_empty() {
        return Some(format!("//{}", element.tag));
    }

    segments.reverse();
    let path = segments.concat();
    if anchored {
        Some(path)
    } else {
        Some(format!("/{path}"))
    }
}
