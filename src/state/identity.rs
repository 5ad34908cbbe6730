use sha1::{Digest, Sha1};

use crate::element::descriptor::ElementDescriptor;

/// One way of recognizing the same logical element across query passes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdentityKey {
    /// Native element identity from the accessor.
    Handle(String),
    /// Computed hierarchical XPath.
    Xpath(String),
    /// SHA-1 over tag, text and rect. Only used when neither of the above exists.
    Composite(String),
}

/// Identity keys for a descriptor, strongest first.
pub fn identity_keys(descriptor: &ElementDescriptor, xpath: Option<&str>) -> Vec<IdentityKey> {
    let mut keys = Vec::new();

    if let Some(handle) = &descriptor.handle {
        if !handle.id.is_empty() {
            keys.push(IdentityKey::Handle(handle.id.clone()));
        }
    }
    if let Some(xpath) = xpath.map(str::trim).filter(|x| !x.is_empty()) {
        keys.push(IdentityKey::Xpath(xpath.to_string()));
    }
    if keys.is_empty() {
        keys.push(IdentityKey::Composite(composite_fingerprint(descriptor)));
    }

    keys
}

pub fn composite_fingerprint(descriptor: &ElementDescriptor) -> String {
    let rect = descriptor.geometry;
    let material = format!(
        "{}|{}|{}|{}|{}|{}",
        descriptor.tag,
        descriptor.text.trim(),
        rect.x,
        rect.y,
        rect.width,
        rect.height
    );

    let mut hasher = Sha1::new();
    hasher.update(material.as_bytes());
    format!("{:x}", hasher.finalize())
}
