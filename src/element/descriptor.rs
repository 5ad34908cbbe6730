use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::browser::accessor::{ElementHandle, Rect};
use crate::element::category::Category;

/// Length of `display_text` before it is cut with an ellipsis.
pub const DISPLAY_TEXT_LIMIT: usize = 30;

/// Which collection bucket an element was requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Clickable,
    Input,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Clickable => "clickable",
            ElementKind::Input => "input",
        }
    }
}

/// Where the descriptor's text came from.
///
/// Only `Content` text is matched by `text()` XPaths; text taken from an
/// attribute (input `value`, `placeholder`) is not a text node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextSource {
    Content,
    Attribute(String),
}

/// Position of a node among its parent's element children (all 1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiblingPosition {
    pub child_index: usize,
    pub sibling_count: usize,
    pub same_tag_index: usize,
    pub same_tag_count: usize,
}

impl SiblingPosition {
    /// Position for a node with no siblings.
    pub fn only_child() -> Self {
        Self {
            child_index: 1,
            sibling_count: 1,
            same_tag_index: 1,
            same_tag_count: 1,
        }
    }
}

/// One level of an element's ancestor chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeFrame {
    pub tag: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub position: SiblingPosition,
    /// Concatenated text-node children, without descendant elements' text.
    /// `None` when the accessor could not report it.
    #[serde(default, rename = "ownText")]
    pub own_text: Option<String>,
}

impl NodeFrame {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    pub fn id(&self) -> Option<&str> {
        self.attribute("id").map(str::trim)
    }

    pub fn classes(&self) -> Vec<&str> {
        self.attribute("class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }
}

/// Normalized snapshot of one element, taken during a single analysis pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDescriptor {
    pub handle: Option<ElementHandle>,
    pub kind: ElementKind,
    pub tag: String,
    /// Full text, used for matching. See `display_text` for presentation.
    pub text: String,
    pub text_source: TextSource,
    pub attributes: BTreeMap<String, String>,
    pub geometry: Rect,
    pub displayed: bool,
    pub enabled: bool,
    /// `lineage[0]` is the element itself, followed by its ancestors.
    pub lineage: Vec<NodeFrame>,
    /// `None` until classification runs.
    pub category: Option<Category>,
}

impl ElementDescriptor {
    /// Descriptor with no handle, no lineage beyond itself and no geometry.
    pub fn new(kind: ElementKind, tag: &str) -> Self {
        let tag = tag.trim().to_lowercase();
        Self {
            handle: None,
            kind,
            lineage: vec![NodeFrame {
                tag: tag.clone(),
                attributes: BTreeMap::new(),
                position: SiblingPosition::only_child(),
                own_text: None,
            }],
            tag,
            text: String::new(),
            text_source: TextSource::Content,
            attributes: BTreeMap::new(),
            geometry: Rect::EMPTY,
            displayed: true,
            enabled: true,
            category: None,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    pub fn id(&self) -> Option<&str> {
        self.attribute("id").map(str::trim)
    }

    pub fn class(&self) -> &str {
        self.attributes.get("class").map(String::as_str).unwrap_or("")
    }

    pub fn classes(&self) -> Vec<&str> {
        self.class().split_whitespace().collect()
    }

    /// Class attribute of the immediate parent, if the lineage reaches it.
    pub fn parent_class(&self) -> &str {
        self.lineage
            .get(1)
            .and_then(|p| p.attributes.get("class"))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// All `data-*` attributes with non-empty values, sorted by name.
    pub fn data_attributes(&self) -> Vec<(&str, &str)> {
        self.attributes
            .iter()
            .filter(|(k, v)| k.starts_with("data-") && !v.trim().is_empty())
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    /// Text cut to `DISPLAY_TEXT_LIMIT` characters for presentation.
    pub fn display_text(&self) -> String {
        let trimmed = self.text.trim();
        if trimmed.chars().count() > DISPLAY_TEXT_LIMIT {
            let cut: String = trimmed.chars().take(DISPLAY_TEXT_LIMIT).collect();
            format!("{cut}...")
        } else {
            trimmed.to_string()
        }
    }

    pub fn category_or_other(&self) -> Category {
        self.category.unwrap_or(Category::Other)
    }
}
