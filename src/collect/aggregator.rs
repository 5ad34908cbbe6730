use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::browser::accessor::{DocumentAccessor, QueryKind};
use crate::collect::structure::{PageStructure, detect_structure};
use crate::element::builder::build_descriptor;
use crate::element::category::Category;
use crate::element::classifier::{ClassifyContext, ContainerType, KnownElements, classify};
use crate::element::descriptor::{ElementDescriptor, ElementKind};
use crate::locator::candidate::LocatorSet;
use crate::locator::synthesizer::synthesize;
use crate::state::dedup::Deduplicator;
use crate::state::identity::{IdentityKey, identity_keys};

/// Queries that find clickable elements, in collection order.
pub const CLICKABLE_QUERIES: &[&str] = &[
    "a",
    "button",
    "input[type='button']",
    "input[type='submit']",
    "[role='button']",
    ".btn",
    "[onclick]",
    "input[type='checkbox']",
    "input[type='radio']",
];

/// Queries that find form inputs, in collection order.
pub const INPUT_QUERIES: &[&str] = &["input:not([type='hidden'])", "textarea", "select"];

/// One element that survived filtering and deduplication.
#[derive(Debug, Clone)]
pub struct CollectedElement {
    pub descriptor: ElementDescriptor,
    pub locators: LocatorSet,
    pub container: Option<ContainerType>,
}

impl CollectedElement {
    pub fn category(&self) -> Category {
        self.descriptor.category_or_other()
    }
}

/// Result of one analysis pass. Owns everything the pass produced.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub url: String,
    pub title: String,
    pub analyzed_at: DateTime<Local>,
    pub structure: PageStructure,
    pub clickable: Vec<CollectedElement>,
    pub input: Vec<CollectedElement>,
    /// Element count per category across both buckets.
    pub categories: BTreeMap<Category, usize>,
}

impl AnalysisReport {
    pub fn total(&self) -> usize {
        self.clickable.len() + self.input.len()
    }

    pub fn elements(&self) -> impl Iterator<Item = &CollectedElement> {
        self.clickable.iter().chain(self.input.iter())
    }
}

// ============================================================================
// SelectorCollector
// ============================================================================

/// Runs one analysis pass over a document.
///
/// query → build descriptor → filter (displayed and enabled) → synthesize →
/// classify → dedup, per bucket. A failing query or element is logged and
/// skipped; nothing here aborts the pass.
pub struct SelectorCollector<'a, A: DocumentAccessor + ?Sized> {
    accessor: &'a A,
    known: KnownElements,
    clickable_queries: Vec<String>,
    input_queries: Vec<String>,
}

impl<'a, A: DocumentAccessor + ?Sized> SelectorCollector<'a, A> {
    pub fn new(accessor: &'a A) -> Self {
        Self {
            accessor,
            known: KnownElements::new(),
            clickable_queries: CLICKABLE_QUERIES.iter().map(|q| q.to_string()).collect(),
            input_queries: INPUT_QUERIES.iter().map(|q| q.to_string()).collect(),
        }
    }

    pub fn with_known_elements(mut self, known: KnownElements) -> Self {
        self.known = known;
        self
    }

    pub fn with_clickable_queries(mut self, queries: &[&str]) -> Self {
        self.clickable_queries = queries.iter().map(|q| q.to_string()).collect();
        self
    }

    pub fn collect(&self) -> AnalysisReport {
        let url = self.accessor.current_url().unwrap_or_else(|e| {
            warn!(error = %e, "could not read current url");
            String::new()
        });
        let title = self.accessor.page_title().unwrap_or_default();
        info!(url = %url, title = %title, "collecting selectors");

        let structure = detect_structure(self.accessor);
        let clickable = self.collect_bucket(ElementKind::Clickable, &self.clickable_queries, &structure);
        let input = self.collect_bucket(ElementKind::Input, &self.input_queries, &structure);

        let mut categories = BTreeMap::new();
        for element in clickable.iter().chain(input.iter()) {
            *categories.entry(element.category()).or_insert(0) += 1;
        }
        for (category, count) in &categories {
            info!(category = %category, count, "category total");
        }
        info!(clickable = clickable.len(), input = input.len(), "collection finished");

        AnalysisReport {
            url,
            title,
            analyzed_at: Local::now(),
            structure,
            clickable,
            input,
            categories,
        }
    }

    fn collect_bucket(
        &self,
        kind: ElementKind,
        queries: &[String],
        structure: &PageStructure,
    ) -> Vec<CollectedElement> {
        let mut dedup = Deduplicator::new();
        let mut bucket = Vec::new();

        for query in queries {
            let handles = match self.accessor.query(QueryKind::Css, query) {
                Ok(handles) => handles,
                Err(e) => {
                    warn!(query = %query, error = %e, "query failed, skipping selector");
                    continue;
                }
            };
            debug!(query = %query, matches = handles.len(), "query matched");

            for handle in handles {
                if dedup.has_seen(&IdentityKey::Handle(handle.id.clone())) {
                    continue;
                }

                let mut descriptor = match build_descriptor(self.accessor, &handle, kind) {
                    Ok(descriptor) => descriptor,
                    Err(e) => {
                        debug!(element = %handle.id, error = %e, "element skipped");
                        continue;
                    }
                };
                if !(descriptor.displayed && descriptor.enabled) {
                    continue;
                }

                let locators = synthesize(&descriptor);
                let container = structure.container_for(&descriptor.geometry);
                descriptor.category = Some(match kind {
                    ElementKind::Input => Category::Form,
                    ElementKind::Clickable => classify(&ClassifyContext::from_descriptor(
                        &descriptor,
                        container,
                        Some(locators.full_xpath.as_str()),
                        &self.known,
                    )),
                });

                let keys = identity_keys(&descriptor, Some(locators.xpath.as_str()));
                if dedup.admit(&keys) {
                    bucket.push(CollectedElement {
                        descriptor,
                        locators,
                        container,
                    });
                }
            }
        }

        bucket
    }
}
