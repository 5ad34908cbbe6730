use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::browser::accessor::Rect;
use crate::element::category::Category;
use crate::element::descriptor::ElementDescriptor;

// ============================================================================
// Classification inputs
// ============================================================================

/// Page region an element was found inside, from structure detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerType {
    TopBar,
    SideBar,
    Navigation,
}

impl ContainerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerType::TopBar => "top_bar",
            ContainerType::SideBar => "side_bar",
            ContainerType::Navigation => "navigation",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "top_bar" => Some(ContainerType::TopBar),
            "side_bar" => Some(ContainerType::SideBar),
            "navigation" => Some(ContainerType::Navigation),
            _ => None,
        }
    }

    fn category(&self) -> Category {
        match self {
            ContainerType::TopBar => Category::Topbar,
            ContainerType::SideBar => Category::Sidebar,
            ContainerType::Navigation => Category::Nav,
        }
    }
}

/// Pre-mapped elements keyed by full XPath. Consulted before any heuristic.
#[derive(Debug, Clone, Default)]
pub struct KnownElements {
    by_full_xpath: BTreeMap<String, Category>,
}

impl KnownElements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, full_xpath: &str, category: Category) {
        self.by_full_xpath.insert(full_xpath.trim().to_string(), category);
    }

    pub fn get(&self, full_xpath: &str) -> Option<Category> {
        self.by_full_xpath.get(full_xpath.trim()).copied()
    }

    pub fn len(&self) -> usize {
        self.by_full_xpath.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_full_xpath.is_empty()
    }
}

impl FromIterator<(String, Category)> for KnownElements {
    fn from_iter<T: IntoIterator<Item = (String, Category)>>(iter: T) -> Self {
        let mut known = KnownElements::new();
        for (xpath, category) in iter {
            known.insert(&xpath, category);
        }
        known
    }
}

/// Everything a rule may look at. Strings are lower-cased once up front.
#[derive(Debug, Clone)]
pub struct ClassifyContext<'a> {
    pub tag: String,
    pub class: String,
    pub id: String,
    pub parent_class: String,
    pub geometry: Rect,
    pub container_type: Option<ContainerType>,
    pub full_xpath: Option<&'a str>,
    pub known: &'a KnownElements,
}

impl<'a> ClassifyContext<'a> {
    /// Context for a descriptor. An explicit `container_type` wins over a
    /// `container_type` attribute on the element.
    pub fn from_descriptor(
        descriptor: &ElementDescriptor,
        container_type: Option<ContainerType>,
        full_xpath: Option<&'a str>,
        known: &'a KnownElements,
    ) -> Self {
        let container_type = container_type.or_else(|| {
            descriptor
                .attribute("container_type")
                .and_then(ContainerType::parse)
        });
        Self {
            tag: descriptor.tag.to_lowercase(),
            class: descriptor.class().to_lowercase(),
            id: descriptor.id().unwrap_or("").to_lowercase(),
            parent_class: descriptor.parent_class().to_lowercase(),
            geometry: descriptor.geometry,
            container_type,
            full_xpath,
            known,
        }
    }

    fn class_or_id_contains(&self, tokens: &[&str]) -> bool {
        tokens
            .iter()
            .any(|t| self.class.contains(t) || self.id.contains(t))
    }
}

// ============================================================================
// Rule chain
// ============================================================================

/// One predicate → category step of the chain.
pub struct Rule {
    pub name: &'static str,
    pub apply: fn(&ClassifyContext<'_>) -> Option<Category>,
}

/// Evaluated in order; the first rule returning `Some` decides.
pub const RULES: &[Rule] = &[
    Rule { name: "known_element", apply: known_element },
    Rule { name: "container_hint", apply: container_hint },
    Rule { name: "menu_item", apply: menu_item },
    Rule { name: "navigation_token", apply: navigation_token },
    Rule { name: "sidebar_token", apply: sidebar_token },
    Rule { name: "table", apply: table },
    Rule { name: "form", apply: form },
    Rule { name: "button", apply: button },
    Rule { name: "anchor_parent", apply: anchor_parent },
    Rule { name: "content_token", apply: content_token },
    Rule { name: "geometry", apply: geometry },
];

/// Assign a category. Total: anything no rule claims is `Other`.
pub fn classify(ctx: &ClassifyContext<'_>) -> Category {
    matching_rule(ctx).map_or(Category::Other, |(_, category)| category)
}

/// The deciding rule's name and result, if any rule fires.
pub fn matching_rule(ctx: &ClassifyContext<'_>) -> Option<(&'static str, Category)> {
    RULES
        .iter()
        .find_map(|rule| (rule.apply)(ctx).map(|category| (rule.name, category)))
}

/// Classify a descriptor with no structural hints and no known elements.
pub fn classify_descriptor(descriptor: &ElementDescriptor) -> Category {
    let known = KnownElements::new();
    classify(&ClassifyContext::from_descriptor(descriptor, None, None, &known))
}

fn known_element(ctx: &ClassifyContext<'_>) -> Option<Category> {
    ctx.full_xpath.and_then(|xpath| ctx.known.get(xpath))
}

fn container_hint(ctx: &ClassifyContext<'_>) -> Option<Category> {
    ctx.container_type.map(|c| c.category())
}

fn menu_item(ctx: &ClassifyContext<'_>) -> Option<Category> {
    if !ctx.class_or_id_contains(&["menu-item", "menu-nav"]) {
        return None;
    }
    let parent = &ctx.parent_class;
    if ["submenu", "sub-menu", "dropdown"].iter().any(|t| parent.contains(t)) {
        Some(Category::Submenu)
    } else {
        Some(Category::Sidebar)
    }
}

fn navigation_token(ctx: &ClassifyContext<'_>) -> Option<Category> {
    if !ctx.class_or_id_contains(&["nav", "header", "menu"]) {
        return None;
    }
    if ["top", "header", "main-nav"].iter().any(|t| ctx.class.contains(t)) {
        Some(Category::Topbar)
    } else if ctx.class_or_id_contains(&["sub"]) {
        Some(Category::Submenu)
    } else if ctx.class_or_id_contains(&["side"]) {
        Some(Category::Sidebar)
    } else {
        Some(Category::Nav)
    }
}

fn sidebar_token(ctx: &ClassifyContext<'_>) -> Option<Category> {
    ctx.class_or_id_contains(&["sidebar", "side-bar", "sidenav"])
        .then_some(Category::Sidebar)
}

fn table(ctx: &ClassifyContext<'_>) -> Option<Category> {
    (matches!(ctx.tag.as_str(), "table" | "tr" | "td" | "th") || ctx.class_or_id_contains(&["table"]))
        .then_some(Category::Table)
}

fn form(ctx: &ClassifyContext<'_>) -> Option<Category> {
    (matches!(ctx.tag.as_str(), "form" | "input" | "select" | "textarea")
        || ctx.class_or_id_contains(&["form"]))
    .then_some(Category::Form)
}

fn button(ctx: &ClassifyContext<'_>) -> Option<Category> {
    (ctx.tag == "button" || ctx.class_or_id_contains(&["btn", "button", "submit"]))
        .then_some(Category::Button)
}

fn anchor_parent(ctx: &ClassifyContext<'_>) -> Option<Category> {
    if ctx.tag != "a" {
        return None;
    }
    let parent = &ctx.parent_class;
    if parent.contains("menu") {
        Some(Category::Sidebar)
    } else if ["navbar", "nav", "header"].iter().any(|t| parent.contains(t)) {
        Some(Category::Topbar)
    } else {
        Some(Category::Link)
    }
}

fn content_token(ctx: &ClassifyContext<'_>) -> Option<Category> {
    ctx.class_or_id_contains(&["content", "main", "body"])
        .then_some(Category::Content)
}

fn geometry(ctx: &ClassifyContext<'_>) -> Option<Category> {
    let rect = ctx.geometry;
    if rect.is_empty() || !rect.x.is_finite() || !rect.y.is_finite() {
        return None;
    }
    if rect.y < 100.0 {
        Some(Category::Topbar)
    } else if rect.x < 200.0 {
        Some(Category::Sidebar)
    } else {
        None
    }
}
