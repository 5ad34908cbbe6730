use std::collections::BTreeMap;

use tracing::debug;

use crate::browser::accessor::{DocumentAccessor, ElementHandle, QueryKind};
use crate::browser::error::AccessError;
use crate::browser::scripts::LINEAGE_SCRIPT;
use crate::element::descriptor::{NodeFrame, SiblingPosition};

/// Deepest ancestor chain read by the traversal fallback.
pub const MAX_LINEAGE_DEPTH: usize = 32;

/// Read the element's ancestor chain, nearest first.
///
/// Tries the in-page lineage script, then a query-based walk up the tree,
/// then settles for a single frame describing the element alone. Never fails.
/// The element's own frame always carries its own text when the accessor can
/// report it.
pub fn read_lineage<A: DocumentAccessor + ?Sized>(
    accessor: &A,
    handle: &ElementHandle,
    tag: &str,
    attributes: &BTreeMap<String, String>,
) -> Vec<NodeFrame> {
    let mut frames = lineage_frames(accessor, handle, tag, attributes);
    if let Some(own) = frames.first_mut().filter(|f| f.own_text.is_none()) {
        own.own_text = match accessor.own_text(handle) {
            Ok(text) => Some(text),
            Err(e) => {
                debug!(element = %handle.id, error = %e, "own text unavailable");
                None
            }
        };
    }
    frames
}

fn lineage_frames<A: DocumentAccessor + ?Sized>(
    accessor: &A,
    handle: &ElementHandle,
    tag: &str,
    attributes: &BTreeMap<String, String>,
) -> Vec<NodeFrame> {
    match lineage_from_script(accessor, handle) {
        Ok(frames) if !frames.is_empty() => return frames,
        Ok(_) => debug!(element = %handle.id, "lineage script returned no frames"),
        Err(e) => debug!(element = %handle.id, error = %e, "lineage script failed, walking the tree"),
    }

    let frames = lineage_from_traversal(accessor, handle, tag, attributes);
    if !frames.is_empty() {
        return frames;
    }

    vec![NodeFrame {
        tag: tag.to_string(),
        attributes: attributes.clone(),
        position: SiblingPosition::only_child(),
        own_text: None,
    }]
}

fn lineage_from_script<A: DocumentAccessor + ?Sized>(
    accessor: &A,
    handle: &ElementHandle,
) -> Result<Vec<NodeFrame>, AccessError> {
    let value = accessor.evaluate_script(LINEAGE_SCRIPT, std::slice::from_ref(handle))?;
    serde_json::from_value(value).map_err(|source| AccessError::Decode {
        context: "lineage frames".into(),
        source,
    })
}

/// Walk `..` from the element, computing sibling positions from `./*`.
/// Returns whatever frames were read before the first failure.
fn lineage_from_traversal<A: DocumentAccessor + ?Sized>(
    accessor: &A,
    handle: &ElementHandle,
    tag: &str,
    attributes: &BTreeMap<String, String>,
) -> Vec<NodeFrame> {
    let mut frames = Vec::new();
    let mut current = handle.clone();
    let mut current_tag = tag.to_string();
    let mut current_attributes = attributes.clone();

    for _ in 0..MAX_LINEAGE_DEPTH {
        let parent = match accessor.query_within(&current, QueryKind::XPath, "..") {
            Ok(found) => found.into_iter().next(),
            Err(e) => {
                debug!(element = %current.id, error = %e, "parent lookup failed");
                break;
            }
        };

        let position = match &parent {
            Some(parent) => sibling_position(accessor, parent, &current, &current_tag)
                .unwrap_or_else(|e| {
                    debug!(element = %current.id, error = %e, "sibling lookup failed");
                    SiblingPosition::only_child()
                }),
            None => SiblingPosition::only_child(),
        };

        frames.push(NodeFrame {
            tag: current_tag.clone(),
            attributes: current_attributes.clone(),
            position,
            own_text: None,
        });

        let Some(parent) = parent else { break };
        if current_tag == "html" {
            break;
        }

        current_tag = match accessor.tag_name(&parent) {
            Ok(tag) => tag.to_lowercase(),
            Err(_) => break,
        };
        current_attributes = accessor.read_attributes(&parent).unwrap_or_default();
        current = parent;
    }

    frames
}

fn sibling_position<A: DocumentAccessor + ?Sized>(
    accessor: &A,
    parent: &ElementHandle,
    node: &ElementHandle,
    tag: &str,
) -> Result<SiblingPosition, AccessError> {
    let children = accessor.query_within(parent, QueryKind::XPath, "./*")?;

    let mut position = SiblingPosition {
        child_index: 1,
        sibling_count: children.len().max(1),
        same_tag_index: 1,
        same_tag_count: 0,
    };

    for (index, child) in children.iter().enumerate() {
        let same_tag = accessor.tag_name(child)?.eq_ignore_ascii_case(tag);
        if same_tag {
            position.same_tag_count += 1;
        }
        if child == node {
            position.child_index = index + 1;
            position.same_tag_index = position.same_tag_count.max(1);
        }
    }

    position.same_tag_count = position.same_tag_count.max(1);
    Ok(position)
}
