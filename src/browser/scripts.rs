// Scripts evaluated in the page through `DocumentAccessor::evaluate_script`.
// `arguments[0]` is always the element under inspection.

/// Walks from the element up to `<html>`, returning one frame per level:
/// tag, attributes, own text nodes and the position among element siblings.
pub const LINEAGE_SCRIPT: &str = r#"
const frames = [];
let el = arguments[0];
let guard = 0;
while (el && el.nodeType === Node.ELEMENT_NODE && guard < 32) {
    const attributes = {};
    for (const attr of el.attributes) {
        attributes[attr.name] = attr.value;
    }
    const parent = el.parentElement;
    const siblings = parent ? Array.from(parent.children) : [el];
    const sameTag = siblings.filter(s => s.tagName === el.tagName);
    let ownText = '';
    for (const node of el.childNodes) {
        if (node.nodeType === Node.TEXT_NODE) {
            ownText += node.nodeValue;
        }
    }
    frames.push({
        tag: el.tagName.toLowerCase(),
        attributes: attributes,
        ownText: ownText,
        position: {
            childIndex: siblings.indexOf(el) + 1,
            siblingCount: siblings.length,
            sameTagIndex: sameTag.indexOf(el) + 1,
            sameTagCount: sameTag.length
        }
    });
    el = parent;
    guard++;
}
return frames;
"#;

/// Returns every attribute of the element as a flat object.
pub const ATTRIBUTES_SCRIPT: &str = r#"
const result = {};
for (const attr of arguments[0].attributes) {
    result[attr.name] = attr.value;
}
return result;
"#;

/// Concatenation of the element's direct text-node children.
pub const OWN_TEXT_SCRIPT: &str = r#"
let text = '';
for (const node of arguments[0].childNodes) {
    if (node.nodeType === Node.TEXT_NODE) {
        text += node.nodeValue;
    }
}
return text;
"#;

pub const READY_STATE_SCRIPT: &str = "return document.readyState";

/// True once jQuery and AngularJS report no pending requests (or are absent).
pub const QUIESCE_SCRIPT: &str = r#"
return (typeof jQuery === 'undefined' || jQuery.active === 0) &&
    (typeof angular === 'undefined' || !angular.element(document).injector() ||
     !angular.element(document).injector().get('$http').pendingRequests.length);
"#;
