mod common;

use common::{at, clickable};
use proptest::prelude::*;
use selector_synth::browser::accessor::ElementHandle;
use selector_synth::element::descriptor::ElementDescriptor;
use selector_synth::state::dedup::{Deduplicator, dedup_by_identity};
use selector_synth::state::identity::{IdentityKey, composite_fingerprint, identity_keys};

struct Item {
    label: &'static str,
    descriptor: ElementDescriptor,
    xpath: Option<String>,
}

fn item(label: &'static str, handle: Option<&str>, xpath: Option<&str>) -> Item {
    let mut descriptor = clickable("div", &[], label);
    descriptor.handle = handle.map(ElementHandle::new);
    Item {
        label,
        descriptor,
        xpath: xpath.map(String::from),
    }
}

fn survivors(items: Vec<Item>) -> Vec<&'static str> {
    dedup_by_identity(items, |i| identity_keys(&i.descriptor, i.xpath.as_deref()))
        .into_iter()
        .map(|i| i.label)
        .collect()
}

// ============================================================================
// Identity keys
// ============================================================================

#[test]
fn keys_prefer_handle_and_xpath() {
    let i = item("a", Some("h1"), Some("//div[@id='x']"));
    let keys = identity_keys(&i.descriptor, i.xpath.as_deref());
    assert_eq!(
        keys,
        vec![
            IdentityKey::Handle("h1".into()),
            IdentityKey::Xpath("//div[@id='x']".into()),
        ]
    );
}

#[test]
fn composite_only_without_handle_or_xpath() {
    let d = at(clickable("a", &[], "Help"), 1.0, 2.0, 3.0, 4.0);
    let keys = identity_keys(&d, Some("   "));
    assert_eq!(keys, vec![IdentityKey::Composite(composite_fingerprint(&d))]);
}

#[test]
fn composite_depends_on_tag_text_and_rect() {
    let a = at(clickable("a", &[], "Help"), 1.0, 2.0, 3.0, 4.0);
    let same = at(clickable("a", &[("class", "ignored")], " Help "), 1.0, 2.0, 3.0, 4.0);
    let moved = at(clickable("a", &[], "Help"), 1.0, 20.0, 3.0, 4.0);

    assert_eq!(composite_fingerprint(&a), composite_fingerprint(&same));
    assert_ne!(composite_fingerprint(&a), composite_fingerprint(&moved));
    assert_eq!(composite_fingerprint(&a).len(), 40, "hex sha1");
}

// ============================================================================
// First-seen-wins
// ============================================================================

#[test]
fn duplicate_xpath_keeps_first() {
    let kept = survivors(vec![
        item("first", Some("h1"), Some("//div[@id='x']")),
        item("second", Some("h2"), Some("//div[@id='x']")),
    ]);
    assert_eq!(kept, vec!["first"]);
}

#[test]
fn same_handle_is_dropped() {
    let kept = survivors(vec![
        item("first", Some("h1"), Some("//a[1]")),
        item("second", Some("h1"), Some("//a[2]")),
    ]);
    assert_eq!(kept, vec!["first"]);
}

#[test]
fn matching_composite_is_dropped() {
    let kept = survivors(vec![item("same", None, None), item("same", None, None)]);
    assert_eq!(kept, vec!["same"]);
}

#[test]
fn rejected_item_records_nothing() {
    let kept = survivors(vec![
        item("a", Some("H1"), Some("X1")),
        item("b", Some("H2"), Some("X1")),
        item("c", Some("H2"), Some("X2")),
    ]);
    assert_eq!(kept, vec!["a", "c"], "b's handle was never recorded");
}

#[test]
fn deduplicator_tracks_admitted_keys() {
    let mut dedup = Deduplicator::new();
    let h1 = IdentityKey::Handle("h1".into());
    let x1 = IdentityKey::Xpath("//a".into());

    assert!(dedup.admit(&[h1.clone(), x1.clone()]));
    assert_eq!(dedup.seen_count(), 2);
    assert!(dedup.has_seen(&x1));

    assert!(!dedup.admit(&[IdentityKey::Handle("h2".into()), x1]));
    assert!(!dedup.has_seen(&IdentityKey::Handle("h2".into())));
    assert_eq!(dedup.seen_count(), 2);
}

// ============================================================================
// Properties
// ============================================================================

fn key_strategy() -> impl Strategy<Value = Vec<IdentityKey>> {
    prop::collection::vec(
        prop_oneof![
            (0u8..6).prop_map(|n| IdentityKey::Handle(format!("h{n}"))),
            (0u8..6).prop_map(|n| IdentityKey::Xpath(format!("//div[{n}]"))),
        ],
        1..3,
    )
}

proptest! {
    #[test]
    fn dedup_is_idempotent(items in prop::collection::vec(key_strategy(), 0..20)) {
        let once = dedup_by_identity(items, |keys| keys.clone());
        let twice = dedup_by_identity(once.clone(), |keys| keys.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn survivors_share_no_key(items in prop::collection::vec(key_strategy(), 0..20)) {
        let kept = dedup_by_identity(items, |keys| keys.clone());
        for (i, a) in kept.iter().enumerate() {
            for b in &kept[i + 1..] {
                prop_assert!(a.iter().all(|k| !b.contains(k)));
            }
        }
    }
}
