mod common;

use common::{at, clickable, input, with_ancestor};
use proptest::prelude::*;
use selector_synth::element::category::Category;
use selector_synth::element::classifier::{
    ClassifyContext, ContainerType, KnownElements, classify, classify_descriptor, matching_rule,
};
use selector_synth::element::descriptor::ElementDescriptor;

fn category_of(d: &ElementDescriptor) -> Category {
    classify_descriptor(d)
}

fn rule_of(d: &ElementDescriptor) -> Option<&'static str> {
    let known = KnownElements::new();
    matching_rule(&ClassifyContext::from_descriptor(d, None, None, &known)).map(|(name, _)| name)
}

// ============================================================================
// Documented examples
// ============================================================================

#[test]
fn sidebar_token_beats_geometry() {
    let d = at(clickable("div", &[("class", "sidebar-menu")], ""), 10.0, 500.0, 100.0, 20.0);
    assert_eq!(category_of(&d), Category::Sidebar);
    assert_eq!(rule_of(&d), Some("navigation_token"), "menu token with 'side' decides first");
}

#[test]
fn anchor_in_navbar_is_topbar() {
    let d = with_ancestor(clickable("a", &[("class", "")], "Home"), "ul", &[("class", "navbar-nav")]);
    assert_eq!(category_of(&d), Category::Topbar);
    assert_eq!(rule_of(&d), Some("anchor_parent"));
}

// ============================================================================
// Rule precedence
// ============================================================================

#[test]
fn known_element_table_wins() {
    let d = clickable("button", &[("class", "btn")], "Export");
    let mut known = KnownElements::new();
    known.insert("//*[@id='tools']/button", Category::Content);

    let ctx = ClassifyContext::from_descriptor(&d, None, Some("//*[@id='tools']/button"), &known);
    assert_eq!(classify(&ctx), Category::Content);

    let ctx = ClassifyContext::from_descriptor(&d, None, Some("//other"), &known);
    assert_eq!(classify(&ctx), Category::Button, "No entry, heuristics apply");
}

#[test]
fn container_hint_beats_tokens() {
    let d = clickable("button", &[("class", "btn")], "Go");
    let known = KnownElements::new();

    let top = ClassifyContext::from_descriptor(&d, Some(ContainerType::TopBar), None, &known);
    assert_eq!(classify(&top), Category::Topbar);
    let side = ClassifyContext::from_descriptor(&d, Some(ContainerType::SideBar), None, &known);
    assert_eq!(classify(&side), Category::Sidebar);
    let nav = ClassifyContext::from_descriptor(&d, Some(ContainerType::Navigation), None, &known);
    assert_eq!(classify(&nav), Category::Nav);
}

#[test]
fn container_type_attribute_is_honored() {
    let d = clickable("span", &[("container_type", "side_bar")], "");
    assert_eq!(category_of(&d), Category::Sidebar);
}

#[test]
fn menu_item_depends_on_parent() {
    let plain = with_ancestor(clickable("li", &[("class", "menu-item")], ""), "ul", &[("class", "list")]);
    assert_eq!(category_of(&plain), Category::Sidebar);

    let nested = with_ancestor(
        clickable("li", &[("class", "menu-item")], ""),
        "ul",
        &[("class", "dropdown-menu")],
    );
    assert_eq!(category_of(&nested), Category::Submenu);
}

#[test]
fn navigation_token_variants() {
    assert_eq!(category_of(&clickable("div", &[("class", "top-nav")], "")), Category::Topbar);
    assert_eq!(category_of(&clickable("div", &[("class", "main-nav")], "")), Category::Topbar);
    assert_eq!(category_of(&clickable("div", &[("class", "subnav")], "")), Category::Submenu);
    assert_eq!(category_of(&clickable("div", &[("class", "side-nav")], "")), Category::Sidebar);
    assert_eq!(category_of(&clickable("div", &[("class", "nav")], "")), Category::Nav);
}

#[test]
fn topbar_tokens_only_count_in_class() {
    assert_eq!(category_of(&clickable("span", &[("id", "header-nav")], "")), Category::Nav);
    assert_eq!(category_of(&clickable("div", &[("id", "main-nav")], "")), Category::Nav);
    assert_eq!(
        category_of(&clickable("a", &[("id", "top-nav"), ("class", "link")], "")),
        Category::Nav
    );
    assert_eq!(category_of(&clickable("div", &[("id", "side-nav")], "")), Category::Sidebar);
}

#[test]
fn hybrid_tokens_resolve_by_fixed_precedence() {
    let d = clickable("div", &[("class", "nav side header")], "");
    assert_eq!(category_of(&d), Category::Topbar, "'header' is checked before 'side'");
}

#[test]
fn sidebar_tokens_without_nav() {
    assert_eq!(category_of(&clickable("div", &[("class", "sidebar")], "")), Category::Sidebar);
    assert_eq!(category_of(&clickable("div", &[("id", "side-bar")], "")), Category::Sidebar);
}

#[test]
fn structural_tags() {
    assert_eq!(category_of(&clickable("td", &[], "")), Category::Table);
    assert_eq!(category_of(&clickable("div", &[("class", "data-table")], "")), Category::Table);
    assert_eq!(category_of(&input("input", &[])), Category::Form);
    assert_eq!(category_of(&input("select", &[])), Category::Form);
    assert_eq!(category_of(&clickable("div", &[("class", "login-form")], "")), Category::Form);
}

#[test]
fn button_tag_and_tokens() {
    assert_eq!(category_of(&clickable("button", &[], "Save")), Category::Button);
    assert_eq!(category_of(&clickable("span", &[("class", "btn")], "")), Category::Button);
    assert_eq!(category_of(&clickable("div", &[("id", "btnSave")], "")), Category::Button);
}

#[test]
fn anchor_parents() {
    let in_menu = with_ancestor(clickable("a", &[], ""), "div", &[("class", "menu-list")]);
    assert_eq!(category_of(&in_menu), Category::Sidebar);

    let in_header = with_ancestor(clickable("a", &[], ""), "div", &[("class", "page-header")]);
    assert_eq!(category_of(&in_header), Category::Topbar);

    let loose = with_ancestor(clickable("a", &[], ""), "p", &[]);
    assert_eq!(category_of(&loose), Category::Link);
}

#[test]
fn content_tokens() {
    assert_eq!(category_of(&clickable("div", &[("class", "page-content")], "")), Category::Content);
    assert_eq!(category_of(&clickable("section", &[("id", "body")], "")), Category::Content);
}

#[test]
fn geometric_fallback() {
    let top = at(clickable("div", &[], ""), 400.0, 40.0, 10.0, 10.0);
    assert_eq!(category_of(&top), Category::Topbar);

    let left = at(clickable("div", &[], ""), 50.0, 300.0, 10.0, 10.0);
    assert_eq!(category_of(&left), Category::Sidebar);

    let center = at(clickable("div", &[], ""), 400.0, 300.0, 10.0, 10.0);
    assert_eq!(category_of(&center), Category::Other);
}

#[test]
fn unknown_geometry_is_other() {
    let d = clickable("div", &[], "");
    assert_eq!(category_of(&d), Category::Other, "Empty rect skips the geometric rule");
    assert_eq!(rule_of(&d), None);
}

#[test]
fn category_round_trips_through_text() {
    for category in Category::ALL {
        assert_eq!(category.as_str().parse::<Category>(), Ok(category));
    }
    assert!("sidebar".parse::<Category>().is_ok(), "Parsing is case-insensitive");
    assert!("bogus".parse::<Category>().is_err());
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn classify_is_total_and_deterministic(
        tag in "[a-z]{0,8}",
        class in "[a-z -]{0,20}",
        id in "[a-zA-Z-]{0,10}",
        parent in "[a-z -]{0,20}",
        x in -500.0f64..2000.0,
        y in -500.0f64..2000.0,
    ) {
        let d = with_ancestor(
            at(clickable(&tag, &[("class", class.as_str()), ("id", id.as_str())], ""), x, y, 10.0, 10.0),
            "div",
            &[("class", parent.as_str())],
        );

        let first = category_of(&d);
        prop_assert!(Category::ALL.contains(&first));
        prop_assert_eq!(first, category_of(&d));
    }
}
