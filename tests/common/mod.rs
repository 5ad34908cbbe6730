#![allow(dead_code)]

use selector_synth::browser::accessor::Rect;
use selector_synth::browser::fake::{FakeDocument, FakeElement};
use selector_synth::element::descriptor::{
    ElementDescriptor, ElementKind, NodeFrame, SiblingPosition, TextSource,
};

// ============================================================================
// Descriptor builders
// ============================================================================

/// Clickable descriptor with the given attributes and content text, held
/// directly in its own text node.
pub fn clickable(tag: &str, attrs: &[(&str, &str)], text: &str) -> ElementDescriptor {
    let mut d = ElementDescriptor::new(ElementKind::Clickable, tag);
    for (name, value) in attrs {
        d.attributes.insert(name.to_string(), value.to_string());
    }
    d.lineage[0].attributes = d.attributes.clone();
    d.lineage[0].own_text = Some(text.to_string());
    d.text = text.to_string();
    d.text_source = TextSource::Content;
    d
}

/// Input descriptor; text comes from `value` or `placeholder` like the builder does.
pub fn input(tag: &str, attrs: &[(&str, &str)]) -> ElementDescriptor {
    let mut d = ElementDescriptor::new(ElementKind::Input, tag);
    for (name, value) in attrs {
        d.attributes.insert(name.to_string(), value.to_string());
    }
    d.lineage[0].attributes = d.attributes.clone();
    if let Some(value) = d.attributes.get("value").cloned() {
        d.text = value;
        d.text_source = TextSource::Attribute("value".into());
    } else if let Some(placeholder) = d.attributes.get("placeholder").cloned() {
        d.text = placeholder;
        d.text_source = TextSource::Attribute("placeholder".into());
    } else {
        d.text_source = TextSource::Attribute("value".into());
    }
    d
}

/// Append an ancestor frame (nearest first).
pub fn with_ancestor(mut d: ElementDescriptor, tag: &str, attrs: &[(&str, &str)]) -> ElementDescriptor {
    d.lineage.push(NodeFrame {
        tag: tag.to_string(),
        attributes: attrs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        position: SiblingPosition::only_child(),
        own_text: None,
    });
    d
}

pub fn at(mut d: ElementDescriptor, x: f64, y: f64, width: f64, height: f64) -> ElementDescriptor {
    d.geometry = Rect::new(x, y, width, height);
    d
}

// ============================================================================
// Sample pages
// ============================================================================

/// A small dashboard:
///
/// ```text
/// header.navbar (0,0,1200,60)
///   a "Home"
/// div.sidebar (0,60,200,800)
///   ul.menu-list > li*3 > a ("Overview", "Reports", "Settings")
/// main#content (220,60,980,800)
///   button#submit1.btn.primary "Submit"
///   button "Hidden" (not displayed)
///   button "Locked" (disabled)
///   a "Help" [onclick]
///   form > input[name=email][placeholder=Email], input[type=hidden], textarea, select
/// ```
pub fn dashboard() -> FakeDocument {
    let mut doc = FakeDocument::new("https://example.com/app/dashboard", "Dashboard");
    let body = FakeDocument::BODY;

    let header = doc.append(
        body,
        FakeElement::new("header").class("navbar").rect(0.0, 0.0, 1200.0, 60.0),
    );
    doc.append(
        header,
        FakeElement::new("a").attr("href", "/").text("Home").rect(10.0, 10.0, 50.0, 20.0),
    );

    let sidebar = doc.append(
        body,
        FakeElement::new("div").class("sidebar").rect(0.0, 60.0, 200.0, 800.0),
    );
    let list = doc.append(sidebar, FakeElement::new("ul").class("menu-list").rect(0.0, 60.0, 200.0, 300.0));
    for (i, label) in ["Overview", "Reports", "Settings"].iter().enumerate() {
        let y = 70.0 + 30.0 * i as f64;
        let li = doc.append(list, FakeElement::new("li").rect(0.0, y, 200.0, 30.0));
        doc.append(
            li,
            FakeElement::new("a").class("link").text(label).rect(10.0, y, 150.0, 20.0),
        );
    }

    let main = doc.append(
        body,
        FakeElement::new("main").id("content").rect(220.0, 60.0, 980.0, 800.0),
    );
    doc.append(
        main,
        FakeElement::new("button")
            .id("submit1")
            .class("btn primary")
            .text("Submit")
            .rect(400.0, 300.0, 80.0, 30.0),
    );
    doc.append(
        main,
        FakeElement::new("button").text("Hidden").rect(500.0, 300.0, 80.0, 30.0).hidden(),
    );
    doc.append(
        main,
        FakeElement::new("button").text("Locked").rect(600.0, 300.0, 80.0, 30.0).disabled(),
    );
    doc.append(
        main,
        FakeElement::new("a")
            .attr("onclick", "openHelp()")
            .attr("data-testid", "help-link")
            .text("Help")
            .rect(700.0, 300.0, 40.0, 20.0),
    );

    let form = doc.append(main, FakeElement::new("form").rect(220.0, 400.0, 600.0, 200.0));
    doc.append(
        form,
        FakeElement::new("input")
            .attr("name", "email")
            .attr("type", "email")
            .attr("placeholder", "Email")
            .rect(230.0, 410.0, 200.0, 30.0),
    );
    doc.append(
        form,
        FakeElement::new("input").attr("type", "hidden").attr("name", "csrf").rect(0.0, 0.0, 0.0, 0.0),
    );
    doc.append(
        form,
        FakeElement::new("textarea").attr("name", "comment").rect(230.0, 450.0, 300.0, 80.0),
    );
    doc.append(
        form,
        FakeElement::new("select").attr("name", "country").rect(230.0, 540.0, 200.0, 30.0),
    );

    doc
}
