use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::browser::error::AccessError;

// ============================================================================
// DocumentAccessor: capability interface over one live document
// ============================================================================

/// Opaque reference to an element inside the live document.
///
/// `id` is the accessor's native element identity: two handles with the same
/// `id` refer to the same DOM node for the lifetime of the session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle {
    pub id: String,
}

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Locator strategy used for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Css,
    XPath,
    TagName,
}

impl QueryKind {
    /// W3C WebDriver `using` value.
    pub fn as_webdriver(&self) -> &'static str {
        match self {
            QueryKind::Css => "css selector",
            QueryKind::XPath => "xpath",
            QueryKind::TagName => "tag name",
        }
    }
}

/// Element bounding box in CSS pixels.
///
/// The all-zero rect stands for "geometry unknown".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const EMPTY: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Rect::EMPTY
    }

    /// Whether `other` lies entirely inside this rect.
    pub fn contains(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.width <= self.x + self.width
            && other.y + other.height <= self.y + self.height
    }
}

/// Everything the analysis core needs from a live document.
///
/// Every call blocks until the document answers. Implementations are
/// expected to be cheap to call repeatedly; callers never issue requests in
/// parallel.
pub trait DocumentAccessor {
    /// Find all elements in the document matching `value`.
    fn query(&self, kind: QueryKind, value: &str) -> Result<Vec<ElementHandle>, AccessError>;

    /// Find elements relative to `scope` (e.g. XPath `..` or `./*`).
    fn query_within(
        &self,
        scope: &ElementHandle,
        kind: QueryKind,
        value: &str,
    ) -> Result<Vec<ElementHandle>, AccessError>;

    /// Run a script with `arguments[i]` bound to `args[i]`.
    fn evaluate_script(&self, script: &str, args: &[ElementHandle]) -> Result<Value, AccessError>;

    /// Lower-cased tag name.
    fn tag_name(&self, handle: &ElementHandle) -> Result<String, AccessError>;

    /// Rendered text of the element.
    fn text(&self, handle: &ElementHandle) -> Result<String, AccessError>;

    /// Text held directly in the element's text nodes, which is what an
    /// XPath `text()` test sees. Excludes descendant elements.
    fn own_text(&self, handle: &ElementHandle) -> Result<String, AccessError>;

    fn read_attributes(
        &self,
        handle: &ElementHandle,
    ) -> Result<BTreeMap<String, String>, AccessError>;

    fn read_geometry(&self, handle: &ElementHandle) -> Result<Rect, AccessError>;

    fn is_displayed(&self, handle: &ElementHandle) -> Result<bool, AccessError>;

    fn is_enabled(&self, handle: &ElementHandle) -> Result<bool, AccessError>;

    fn current_url(&self) -> Result<String, AccessError>;

    fn page_title(&self) -> Result<String, AccessError>;

    fn page_source(&self) -> Result<String, AccessError>;
}
