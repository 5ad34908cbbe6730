use std::collections::BTreeMap;

use serde_json::{Value, json};

use crate::browser::accessor::{DocumentAccessor, ElementHandle, QueryKind, Rect};
use crate::browser::error::AccessError;
use crate::browser::scripts::{
    ATTRIBUTES_SCRIPT, LINEAGE_SCRIPT, OWN_TEXT_SCRIPT, QUIESCE_SCRIPT, READY_STATE_SCRIPT,
};

// ============================================================================
// FakeDocument: scripted in-memory DOM
// ============================================================================

pub type NodeId = usize;

/// Element definition for a `FakeDocument`, built fluently.
#[derive(Debug, Clone)]
pub struct FakeElement {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub text: String,
    pub rect: Option<Rect>,
    pub displayed: bool,
    pub enabled: bool,
}

impl FakeElement {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_lowercase(),
            attributes: BTreeMap::new(),
            text: String::new(),
            rect: None,
            displayed: true,
            enabled: true,
        }
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn rect(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.rect = Some(Rect::new(x, y, width, height));
        self
    }

    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

#[derive(Debug, Clone)]
struct FakeNode {
    element: FakeElement,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// In-memory `DocumentAccessor` used by tests and dry runs.
///
/// Starts with `<html><body></body></html>`. Understands compound CSS
/// selectors (tag, `.class`, `#id`, `[attr]`, `[attr='v']`, `:not(...)`,
/// comma lists), the relative XPaths `..`, `./*` and `./tag`, and the
/// crate's own page scripts. Anything else is `AccessError::Unsupported`.
#[derive(Debug, Clone)]
pub struct FakeDocument {
    nodes: Vec<FakeNode>,
    url: String,
    title: String,
    scripts_enabled: bool,
    failing_queries: Vec<String>,
    ready_state: String,
}

impl FakeDocument {
    pub const ROOT: NodeId = 0;
    pub const BODY: NodeId = 1;

    pub fn new(url: &str, title: &str) -> Self {
        let html = FakeNode {
            element: FakeElement::new("html"),
            parent: None,
            children: vec![Self::BODY],
        };
        let body = FakeNode {
            element: FakeElement::new("body"),
            parent: Some(Self::ROOT),
            children: vec![],
        };
        Self {
            nodes: vec![html, body],
            url: url.to_string(),
            title: title.to_string(),
            scripts_enabled: true,
            failing_queries: vec![],
            ready_state: "complete".to_string(),
        }
    }

    /// Append `element` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, element: FakeElement) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(FakeNode {
            element,
            parent: Some(parent),
            children: vec![],
        });
        self.nodes[parent].children.push(id);
        id
    }

    /// Make every `evaluate_script` call fail.
    pub fn without_scripts(mut self) -> Self {
        self.scripts_enabled = false;
        self
    }

    /// Make document-level queries for `selector` fail.
    pub fn fail_query(mut self, selector: &str) -> Self {
        self.failing_queries.push(selector.to_string());
        self
    }

    pub fn with_ready_state(mut self, state: &str) -> Self {
        self.ready_state = state.to_string();
        self
    }

    pub fn handle(&self, node: NodeId) -> ElementHandle {
        ElementHandle::new(format!("node-{node}"))
    }

    fn resolve(&self, handle: &ElementHandle) -> Result<NodeId, AccessError> {
        handle
            .id
            .strip_prefix("node-")
            .and_then(|n| n.parse::<NodeId>().ok())
            .filter(|n| *n < self.nodes.len())
            .ok_or_else(|| AccessError::StaleElement(handle.id.clone()))
    }

    fn node(&self, handle: &ElementHandle) -> Result<&FakeNode, AccessError> {
        self.resolve(handle).map(|id| &self.nodes[id])
    }

    /// Nodes in document order (pre-order from `<html>`).
    fn document_order(&self, from: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            order.push(id);
            for child in self.nodes[id].children.iter().rev() {
                stack.push(*child);
            }
        }
        order
    }

    fn rendered_text(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        for node in self.document_order(id) {
            let text = self.nodes[node].element.text.trim();
            if !text.is_empty() {
                parts.push(text.to_string());
            }
        }
        parts.join(" ")
    }

    fn lineage(&self, id: NodeId) -> Value {
        let mut frames = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &self.nodes[node_id];
            let siblings: Vec<NodeId> = match node.parent {
                Some(parent) => self.nodes[parent].children.clone(),
                None => vec![node_id],
            };
            let same_tag: Vec<NodeId> = siblings
                .iter()
                .copied()
                .filter(|s| self.nodes[*s].element.tag == node.element.tag)
                .collect();
            let position_of = |list: &[NodeId]| list.iter().position(|s| *s == node_id).map_or(1, |p| p + 1);

            frames.push(json!({
                "tag": node.element.tag,
                "attributes": node.element.attributes,
                "ownText": node.element.text,
                "position": {
                    "childIndex": position_of(&siblings),
                    "siblingCount": siblings.len(),
                    "sameTagIndex": position_of(&same_tag),
                    "sameTagCount": same_tag.len(),
                }
            }));
            current = node.parent;
        }
        Value::Array(frames)
    }

    fn render(&self, id: NodeId, out: &mut String) {
        let element = &self.nodes[id].element;
        out.push('<');
        out.push_str(&element.tag);
        for (name, value) in &element.attributes {
            out.push_str(&format!(" {}=\"{}\"", name, value.replace('"', "&quot;")));
        }
        out.push('>');
        out.push_str(&element.text);
        for child in &self.nodes[id].children {
            self.render(*child, out);
        }
        out.push_str(&format!("</{}>", element.tag));
    }

    fn matching(&self, scope: NodeId, selector: &str, include_scope: bool) -> Result<Vec<NodeId>, AccessError> {
        let compounds = selector
            .split(',')
            .map(parse_compound)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self
            .document_order(scope)
            .into_iter()
            .filter(|id| include_scope || *id != scope)
            .filter(|id| compounds.iter().any(|c| c.matches(&self.nodes[*id].element)))
            .collect())
    }
}

impl DocumentAccessor for FakeDocument {
    fn query(&self, kind: QueryKind, value: &str) -> Result<Vec<ElementHandle>, AccessError> {
        if self.failing_queries.iter().any(|q| q == value) {
            return Err(AccessError::Protocol {
                command: "find elements".into(),
                error: format!("invalid selector: {value}"),
            });
        }

        let ids = match kind {
            QueryKind::Css => self.matching(Self::ROOT, value, true)?,
            QueryKind::TagName => {
                let tag = value.to_lowercase();
                self.document_order(Self::ROOT)
                    .into_iter()
                    .filter(|id| self.nodes[*id].element.tag == tag)
                    .collect()
            }
            QueryKind::XPath => {
                return Err(AccessError::Unsupported(format!("document xpath '{value}'")));
            }
        };
        Ok(ids.into_iter().map(|id| self.handle(id)).collect())
    }

    fn query_within(
        &self,
        scope: &ElementHandle,
        kind: QueryKind,
        value: &str,
    ) -> Result<Vec<ElementHandle>, AccessError> {
        let scope_id = self.resolve(scope)?;
        let node = &self.nodes[scope_id];

        let ids: Vec<NodeId> = match (kind, value.trim()) {
            (QueryKind::XPath, "..") => node.parent.into_iter().collect(),
            (QueryKind::XPath, "./*") => node.children.clone(),
            (QueryKind::XPath, path) if path.starts_with("./") && is_ident(&path[2..]) => {
                let tag = path[2..].to_lowercase();
                node.children
                    .iter()
                    .copied()
                    .filter(|c| self.nodes[*c].element.tag == tag)
                    .collect()
            }
            (QueryKind::Css, selector) => self.matching(scope_id, selector, false)?,
            (QueryKind::TagName, tag) => {
                let tag = tag.to_lowercase();
                self.document_order(scope_id)
                    .into_iter()
                    .filter(|id| *id != scope_id && self.nodes[*id].element.tag == tag)
                    .collect()
            }
            _ => {
                return Err(AccessError::Unsupported(format!("relative query '{value}'")));
            }
        };
        Ok(ids.into_iter().map(|id| self.handle(id)).collect())
    }

    fn evaluate_script(&self, script: &str, args: &[ElementHandle]) -> Result<Value, AccessError> {
        if !self.scripts_enabled {
            return Err(AccessError::Script("javascript disabled".into()));
        }

        let target = || {
            args.first()
                .ok_or_else(|| AccessError::Script("missing element argument".into()))
                .and_then(|h| self.resolve(h))
        };

        if script == LINEAGE_SCRIPT {
            Ok(self.lineage(target()?))
        } else if script == ATTRIBUTES_SCRIPT {
            Ok(json!(self.nodes[target()?].element.attributes))
        } else if script == OWN_TEXT_SCRIPT {
            Ok(Value::String(self.nodes[target()?].element.text.clone()))
        } else if script == READY_STATE_SCRIPT {
            Ok(Value::String(self.ready_state.clone()))
        } else if script == QUIESCE_SCRIPT {
            Ok(Value::Bool(true))
        } else {
            Err(AccessError::Unsupported("unknown script".into()))
        }
    }

    fn tag_name(&self, handle: &ElementHandle) -> Result<String, AccessError> {
        Ok(self.node(handle)?.element.tag.clone())
    }

    fn text(&self, handle: &ElementHandle) -> Result<String, AccessError> {
        let id = self.resolve(handle)?;
        if !self.nodes[id].element.displayed {
            return Ok(String::new());
        }
        Ok(self.rendered_text(id))
    }

    fn own_text(&self, handle: &ElementHandle) -> Result<String, AccessError> {
        Ok(self.node(handle)?.element.text.clone())
    }

    fn read_attributes(
        &self,
        handle: &ElementHandle,
    ) -> Result<BTreeMap<String, String>, AccessError> {
        Ok(self.node(handle)?.element.attributes.clone())
    }

    fn read_geometry(&self, handle: &ElementHandle) -> Result<Rect, AccessError> {
        self.node(handle)?
            .element
            .rect
            .ok_or_else(|| AccessError::Unsupported("element has no layout".into()))
    }

    fn is_displayed(&self, handle: &ElementHandle) -> Result<bool, AccessError> {
        Ok(self.node(handle)?.element.displayed)
    }

    fn is_enabled(&self, handle: &ElementHandle) -> Result<bool, AccessError> {
        let element = &self.node(handle)?.element;
        Ok(element.enabled && !element.attributes.contains_key("disabled"))
    }

    fn current_url(&self) -> Result<String, AccessError> {
        Ok(self.url.clone())
    }

    fn page_title(&self) -> Result<String, AccessError> {
        Ok(self.title.clone())
    }

    fn page_source(&self) -> Result<String, AccessError> {
        let mut out = String::from("<!DOCTYPE html>");
        self.render(Self::ROOT, &mut out);
        Ok(out)
    }
}

// ============================================================================
// Compound CSS selector matching
// ============================================================================

#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    classes: Vec<String>,
    ids: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
    negations: Vec<Compound>,
}

impl Compound {
    fn matches(&self, element: &FakeElement) -> bool {
        if let Some(tag) = &self.tag {
            if *tag != element.tag {
                return false;
            }
        }

        let class_attr = element.attributes.get("class").map(String::as_str).unwrap_or("");
        let tokens: Vec<&str> = class_attr.split_whitespace().collect();
        if !self.classes.iter().all(|c| tokens.contains(&c.as_str())) {
            return false;
        }

        let id = element.attributes.get("id");
        if !self.ids.iter().all(|i| id == Some(i)) {
            return false;
        }

        let attrs_ok = self.attributes.iter().all(|(name, value)| {
            match (element.attributes.get(name), value) {
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == expected,
                (None, _) => false,
            }
        });

        attrs_ok && !self.negations.iter().any(|n| n.matches(element))
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn is_ident(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_ident_char)
}

fn unsupported(selector: &str) -> AccessError {
    AccessError::Unsupported(format!("css selector '{selector}'"))
}

fn parse_compound(selector: &str) -> Result<Compound, AccessError> {
    let chars: Vec<char> = selector.trim().chars().collect();
    let mut compound = Compound::default();
    let mut i = 0;

    let read_ident = |i: &mut usize| -> String {
        let start = *i;
        while *i < chars.len() && is_ident_char(chars[*i]) {
            *i += 1;
        }
        chars[start..*i].iter().collect()
    };

    if chars.first() == Some(&'*') {
        i += 1;
    } else {
        let tag = read_ident(&mut i);
        if !tag.is_empty() {
            compound.tag = Some(tag.to_lowercase());
        }
    }

    while i < chars.len() {
        match chars[i] {
            '.' => {
                i += 1;
                let class = read_ident(&mut i);
                if class.is_empty() {
                    return Err(unsupported(selector));
                }
                compound.classes.push(class);
            }
            '#' => {
                i += 1;
                let id = read_ident(&mut i);
                if id.is_empty() {
                    return Err(unsupported(selector));
                }
                compound.ids.push(id);
            }
            '[' => {
                let close = chars[i..]
                    .iter()
                    .position(|c| *c == ']')
                    .map(|p| p + i)
                    .ok_or_else(|| unsupported(selector))?;
                let inner: String = chars[i + 1..close].iter().collect();
                let (name, value) = match inner.split_once('=') {
                    Some((name, value)) => {
                        let value = value.trim().trim_matches(|c| c == '\'' || c == '"');
                        (name.trim().to_string(), Some(value.to_string()))
                    }
                    None => (inner.trim().to_string(), None),
                };
                if !is_ident(&name) {
                    return Err(unsupported(selector));
                }
                compound.attributes.push((name, value));
                i = close + 1;
            }
            ':' => {
                let rest: String = chars[i..].iter().collect();
                if !rest.starts_with(":not(") {
                    return Err(unsupported(selector));
                }
                let mut depth = 0;
                let mut close = None;
                for (offset, c) in chars[i..].iter().enumerate() {
                    match c {
                        '(' => depth += 1,
                        ')' => {
                            depth -= 1;
                            if depth == 0 {
                                close = Some(i + offset);
                                break;
                            }
                        }
                        _ => {}
                    }
                }
                let close = close.ok_or_else(|| unsupported(selector))?;
                let inner: String = chars[i + 5..close].iter().collect();
                compound.negations.push(parse_compound(&inner)?);
                i = close + 1;
            }
            _ => return Err(unsupported(selector)),
        }
    }

    Ok(compound)
}
