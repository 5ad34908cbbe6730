use tracing::debug;

use crate::browser::accessor::{DocumentAccessor, ElementHandle, Rect};
use crate::browser::error::AccessError;
use crate::element::descriptor::{ElementDescriptor, ElementKind, TextSource};
use crate::element::lineage::read_lineage;

/// Build a descriptor for one element handle.
///
/// Only the tag read is required; every other read degrades to an empty
/// value. `displayed`/`enabled` fall back to `false` so an unreadable
/// element is filtered out by the caller rather than collected.
pub fn build_descriptor<A: DocumentAccessor + ?Sized>(
    accessor: &A,
    handle: &ElementHandle,
    kind: ElementKind,
) -> Result<ElementDescriptor, AccessError> {
    let tag = accessor.tag_name(handle)?.trim().to_lowercase();

    let attributes = accessor.read_attributes(handle).unwrap_or_else(|e| {
        debug!(element = %handle.id, error = %e, "attribute read failed");
        Default::default()
    });

    let geometry = accessor.read_geometry(handle).unwrap_or_else(|e| {
        debug!(element = %handle.id, error = %e, "geometry read failed");
        Rect::EMPTY
    });

    let displayed = accessor.is_displayed(handle).unwrap_or(false);
    let enabled = accessor.is_enabled(handle).unwrap_or(false);

    let attribute = |name: &str| {
        attributes
            .get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let (text, text_source) = match kind {
        ElementKind::Clickable => {
            let content = accessor
                .text(handle)
                .map(|t| t.trim().to_string())
                .unwrap_or_default();
            if !content.is_empty() {
                (content, TextSource::Content)
            } else if let Some(value) = attribute("value") {
                (value, TextSource::Attribute("value".into()))
            } else {
                (String::new(), TextSource::Content)
            }
        }
        ElementKind::Input => {
            if let Some(value) = attribute("value") {
                (value, TextSource::Attribute("value".into()))
            } else if let Some(placeholder) = attribute("placeholder") {
                (placeholder, TextSource::Attribute("placeholder".into()))
            } else {
                (String::new(), TextSource::Attribute("value".into()))
            }
        }
    };

    let lineage = read_lineage(accessor, handle, &tag, &attributes);

    Ok(ElementDescriptor {
        handle: Some(handle.clone()),
        kind,
        tag,
        text,
        text_source,
        attributes,
        geometry,
        displayed,
        enabled,
        lineage,
        category: None,
    })
}
