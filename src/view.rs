use std::fmt::Write as _;

use serde::Serialize;

// Elements that never get a closing tag.
const VOID_TAGS: [&str; 4] = ["img", "br", "hr", "meta"];

/// A rendered fragment. Sections produce these and the surface serializes
/// them, so the same tree can go to HTML or to JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Element(Element),
    Text { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub tag: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attrs: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.push((name.to_string(), value.into()));
        self
    }

    /// Adds a `class` attribute, skipping empty class lists so markup stays
    /// free of `class=""`.
    pub fn class(self, value: impl Into<String>) -> Self {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return self;
        }
        let trimmed = trimmed.to_string();
        self.attr("class", trimmed)
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::text(text))
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }
}

impl From<Element> for Node {
    fn from(value: Element) -> Self {
        Node::Element(value)
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_node(&mut out, self);
        out
    }

    /// Concatenated text content, depth first.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Every element in the subtree (including `self`) carrying `class`.
    pub fn find_by_class<'a>(&'a self, class: &str) -> Vec<&'a Element> {
        let mut out = Vec::new();
        collect_by_class(self, class, &mut out);
        out
    }
}

pub fn fragment_html(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(&mut out, node);
    }
    out
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Text { text } => out.push_str(&escape_text(text)),
        Node::Element(el) => {
            out.push('<');
            out.push_str(&el.tag);
            for (name, value) in &el.attrs {
                let _ = write!(out, " {}=\"{}\"", name, escape_attr(value));
            }
            out.push('>');
            if VOID_TAGS.contains(&el.tag.as_str()) {
                return;
            }
            for child in &el.children {
                write_node(out, child);
            }
            let _ = write!(out, "</{}>", el.tag);
        }
    }
}

fn collect_text(node: &Node, out: &mut String) {
    match node {
        Node::Text { text } => out.push_str(text),
        Node::Element(el) => {
            for child in &el.children {
                collect_text(child, out);
            }
        }
    }
}

fn collect_by_class<'a>(node: &'a Node, class: &str, out: &mut Vec<&'a Element>) {
    if let Node::Element(el) = node {
        if el.has_class(class) {
            out.push(el);
        }
        for child in &el.children {
            collect_by_class(child, class, out);
        }
    }
}

pub fn escape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn escape_attr(raw: &str) -> String {
    escape_text(raw).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::{Element, Node};

    #[test]
    fn escapes_text_and_attributes() {
        let node: Node = Element::new("a")
            .attr("href", "https://x.test/?a=1&b=\"2\"")
            .text("<Bills> & Co")
            .into();
        assert_eq!(
            node.to_html(),
            "<a href=\"https://x.test/?a=1&amp;b=&quot;2&quot;\">&lt;Bills&gt; &amp; Co</a>"
        );
    }

    #[test]
    fn void_tags_have_no_closing_tag() {
        let node: Node = Element::new("img").attr("src", "logo.png").into();
        assert_eq!(node.to_html(), "<img src=\"logo.png\">");
    }

    #[test]
    fn empty_class_is_dropped() {
        let el = Element::new("div").class(" ");
        assert!(el.attrs.is_empty());
        let el = Element::new("div").class("team-row winner");
        assert!(el.has_class("winner"));
        assert!(!el.has_class("win"));
    }
}
