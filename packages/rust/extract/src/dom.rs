//! Owned, typed HTML tree.
//!
//! `scraper` does the parsing; the parts of the page we inspect are copied
//! into [`Element`]/[`Node`] so extraction code works with plain enums and
//! explicit `Option` accessors instead of walking `ego_tree` handles.

use scraper::{ElementRef, Html};

/// A child of an element: either another element or a run of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An HTML element with its attributes and children, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    /// Copy a `scraper` element and its subtree. Comments and processing
    /// instructions are dropped.
    pub fn from_ref(el: ElementRef<'_>) -> Self {
        let value = el.value();
        let attrs = value
            .attrs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let children = el
            .children()
            .filter_map(|child| match child.value() {
                scraper::Node::Element(_) => {
                    ElementRef::wrap(child).map(|e| Node::Element(Self::from_ref(e)))
                }
                scraper::Node::Text(text) => Some(Node::Text(String::from(&**text))),
                _ => None,
            })
            .collect();

        Self {
            tag: value.name().to_string(),
            attrs,
            children,
        }
    }

    /// Value of attribute `name`, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the `class` attribute lists `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class))
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }

    /// Direct element children.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// All descendant elements in document (pre-)order, excluding `self`.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_descendants(&mut out);
        out
    }

    fn collect_descendants<'a>(&'a self, out: &mut Vec<&'a Element>) {
        for child in self.child_elements() {
            out.push(child);
            child.collect_descendants(out);
        }
    }

    /// First descendant with the given tag.
    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.descendants().into_iter().find(|e| e.is(tag))
    }

    /// Every descendant with the given tag, in document order.
    pub fn find_all(&self, tag: &str) -> Vec<&Element> {
        self.descendants().into_iter().filter(|e| e.is(tag)).collect()
    }

    /// Whether `other` is this exact element or lives inside it.
    pub fn contains(&self, other: &Element) -> bool {
        std::ptr::eq(self, other) || self.descendants().into_iter().any(|d| std::ptr::eq(d, other))
    }

    /// Text content: every text run trimmed, empty runs skipped, joined with
    /// single spaces.
    pub fn text(&self) -> String {
        let mut parts = Vec::new();
        self.collect_text(&mut parts);
        parts.join(" ")
    }

    fn collect_text<'a>(&'a self, parts: &mut Vec<&'a str>) {
        for child in &self.children {
            match child {
                Node::Text(t) => {
                    let t = t.trim();
                    if !t.is_empty() {
                        parts.push(t);
                    }
                }
                Node::Element(e) => e.collect_text(parts),
            }
        }
    }
}

impl Node {
    /// Text of this node with the same rules as [`Element::text`].
    pub fn text(&self) -> String {
        match self {
            Node::Text(t) => t.trim().to_string(),
            Node::Element(e) => e.text(),
        }
    }
}

/// Parse an HTML fragment and return its root element (`<html>` wrapper
/// included by the parser).
pub fn parse_fragment(html: &str) -> Element {
    let doc = Html::parse_fragment(html);
    Element::from_ref(doc.root_element())
}
