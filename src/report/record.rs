use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::collect::aggregator::{AnalysisReport, CollectedElement};
use crate::element::category::Category;
use crate::element::descriptor::ElementKind;
use crate::locator::candidate::Syntax;

/// Columns every CSV export starts with, in order.
pub const FIXED_FIELDS: &[&str] = &[
    "group",
    "name",
    "text_value",
    "id",
    "class",
    "css",
    "xpath",
    "full_xpath",
    "element_type",
    "category",
];

/// One ranked locator in a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReliableSelector {
    #[serde(rename = "type")]
    pub selector_type: String,
    pub value: String,
}

/// Exported description of one element and its locators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorRecord {
    pub group: String,
    pub name: String,
    pub text_value: String,
    pub id: String,
    pub class: String,
    pub css: String,
    pub xpath: String,
    pub full_xpath: String,
    pub element_type: String,
    pub category: Category,
    /// Fields copied from `data-*` attributes, plus `field_type` for inputs.
    #[serde(flatten)]
    pub dynamic: BTreeMap<String, String>,
    pub reliable_selectors: Vec<ReliableSelector>,
}

/// `data-foo-bar` → `foo_bar`; keys that would shadow a fixed field get a `data_` prefix.
pub fn dynamic_key(attribute: &str) -> String {
    let stripped = attribute.strip_prefix("data-").unwrap_or(attribute);
    let key = stripped.replace('-', "_");
    if FIXED_FIELDS.contains(&key.as_str()) || key == "reliable_selectors" {
        format!("data_{key}")
    } else {
        key
    }
}

/// Turn `\"` back into `"` in XPath values.
pub fn collapse_escaped_quotes(xpath: &str) -> String {
    xpath.replace("\\\"", "\"")
}

impl SelectorRecord {
    pub fn from_collected(group: &str, name: &str, element: &CollectedElement) -> Self {
        let descriptor = &element.descriptor;
        let locators = &element.locators;

        let mut dynamic = BTreeMap::new();
        for (attribute, value) in descriptor.data_attributes() {
            dynamic.insert(dynamic_key(attribute), value.to_string());
        }
        if descriptor.kind == ElementKind::Input {
            let field_type = descriptor
                .attribute("type")
                .unwrap_or(descriptor.tag.as_str())
                .to_string();
            dynamic.insert("field_type".to_string(), field_type);
        }

        let reliable_selectors = locators
            .reliable
            .iter()
            .map(|c| ReliableSelector {
                selector_type: c.syntax.as_str().to_string(),
                value: match c.syntax {
                    Syntax::Xpath => collapse_escaped_quotes(&c.expression),
                    Syntax::Css => c.expression.clone(),
                },
            })
            .collect();

        Self {
            group: group.to_string(),
            name: name.to_string(),
            text_value: descriptor.text.clone(),
            id: descriptor.id().unwrap_or("").to_string(),
            class: descriptor.class().trim().to_string(),
            css: locators.primary_css.clone(),
            xpath: collapse_escaped_quotes(&locators.xpath),
            full_xpath: collapse_escaped_quotes(&locators.full_xpath),
            element_type: descriptor.kind.as_str().to_string(),
            category: element.category(),
            dynamic,
            reliable_selectors,
        }
    }

    /// Value of a column by name, fixed or dynamic.
    pub fn field(&self, name: &str) -> Option<String> {
        let value = match name {
            "group" => self.group.clone(),
            "name" => self.name.clone(),
            "text_value" => self.text_value.clone(),
            "id" => self.id.clone(),
            "class" => self.class.clone(),
            "css" => self.css.clone(),
            "xpath" => self.xpath.clone(),
            "full_xpath" => self.full_xpath.clone(),
            "element_type" => self.element_type.clone(),
            "category" => self.category.to_string(),
            other => return self.dynamic.get(other).cloned(),
        };
        Some(value)
    }
}

/// Records for every collected element: `clickable_N` first, then `input_N`.
pub fn records_from_report(report: &AnalysisReport, group: &str) -> Vec<SelectorRecord> {
    let clickable = report
        .clickable
        .iter()
        .enumerate()
        .map(|(i, e)| SelectorRecord::from_collected(group, &format!("clickable_{}", i + 1), e));
    let input = report
        .input
        .iter()
        .enumerate()
        .map(|(i, e)| SelectorRecord::from_collected(group, &format!("input_{}", i + 1), e));
    clickable.chain(input).collect()
}
