//! Locator synthesis for live web documents.
//!
//! A [`browser::accessor::DocumentAccessor`] exposes one rendered page.
//! [`collect::aggregator::SelectorCollector`] walks its clickable and input
//! elements, builds an [`element::descriptor::ElementDescriptor`] for each,
//! synthesizes ranked locators ([`locator::synthesizer::synthesize`]),
//! classifies the element into a structural [`element::category::Category`]
//! and drops duplicates. [`report`] turns the result into CSV / JSON records.

pub mod browser;
pub mod cli;
pub mod collect;
pub mod element;
pub mod locator;
pub mod report;
pub mod state;
