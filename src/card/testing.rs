//! In-memory `Element` used by unit tests.
//!
//! Selectors are not parsed: each child is registered under the selector
//! that should find it, and lookup is depth-first in insertion order.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::rc::Rc;

use super::dom::Element;
use crate::error::HydrateError;

#[derive(Debug, Default)]
struct FakeNode {
    tag: String,
    attrs: BTreeMap<String, String>,
    text: String,
    children: Vec<(String, FakeElement)>,
    /// Every mutation fails
    broken: bool,
    /// Every mutation panics
    explosive: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FakeElement(Rc<RefCell<FakeNode>>);

impl FakeElement {
    pub fn new(tag: &str) -> Self {
        Self(Rc::new(RefCell::new(FakeNode {
            tag: tag.to_string(),
            ..FakeNode::default()
        })))
    }

    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.0.borrow_mut().attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.0.borrow_mut().text = text.to_string();
        self
    }

    pub fn child(self, selector: &str, child: FakeElement) -> Self {
        self.0.borrow_mut().children.push((selector.to_string(), child));
        self
    }

    pub fn broken(self) -> Self {
        self.0.borrow_mut().broken = true;
        self
    }

    pub fn explosive(self) -> Self {
        self.0.borrow_mut().explosive = true;
        self
    }

    pub fn text(&self) -> String {
        self.0.borrow().text.clone()
    }

    /// Stable serialization of the whole subtree
    pub fn snapshot(&self) -> String {
        let mut out = String::new();
        self.write_snapshot(&mut out, 0);
        out
    }

    fn write_snapshot(&self, out: &mut String, depth: usize) {
        let node = self.0.borrow();
        let _ = write!(out, "{}<{}", "  ".repeat(depth), node.tag);
        for (k, v) in &node.attrs {
            let _ = write!(out, " {}=\"{}\"", k, v);
        }
        let _ = writeln!(out, ">{}", node.text);
        for (_, child) in &node.children {
            child.write_snapshot(out, depth + 1);
        }
    }

    fn check_writable(&self) -> Result<(), HydrateError> {
        let node = self.0.borrow();
        if node.explosive {
            panic!("<{}> exploded", node.tag);
        }
        if node.broken {
            return Err(HydrateError::Dom(format!("<{}> rejected mutation", node.tag)));
        }
        Ok(())
    }
}

impl Element for FakeElement {
    fn query_selector(&self, selector: &str) -> Result<Option<Self>, HydrateError> {
        let node = self.0.borrow();
        for (registered, child) in &node.children {
            if registered == selector {
                return Ok(Some(child.clone()));
            }
            if let Some(found) = child.query_selector(selector)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().attrs.get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) -> Result<(), HydrateError> {
        self.check_writable()?;
        self.0.borrow_mut().attrs.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn set_text_content(&self, text: &str) -> Result<(), HydrateError> {
        self.check_writable()?;
        self.0.borrow_mut().text = text.to_string();
        Ok(())
    }
}

/// A product card shaped like the site template
pub fn product_card(sku: &str, src: &str) -> FakeElement {
    FakeElement::new("article")
        .with_attr("class", "product")
        .with_attr("data-sku", sku)
        .with_attr("data-src", src)
        .child("img", FakeElement::new("img").with_attr("src", "/static/placeholder.webp"))
        .child("h3", FakeElement::new("h3").with_text("Static name"))
        .child(".price", FakeElement::new("p").with_attr("class", "price").with_text("—"))
        .child(
            ".actions a.btn-cta",
            FakeElement::new("a").with_attr("class", "btn btn-cta").with_attr("href", "/fallback"),
        )
        .child("[data-copy]", FakeElement::new("button").with_attr("data-copy", "STATIC"))
}
