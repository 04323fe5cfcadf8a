//! Minimal XML document builder with deterministic output
//!
//! The p2 descriptors depend on attribute order, element order, and a
//! repository-type processing instruction as the first node after the XML
//! declaration, so documents are built as explicit element trees and
//! serialized with a fixed two-space indent. Attributes serialize in
//! insertion order. Elements carry either child elements or text content,
//! never both; that is all the p2 formats need.

use std::fmt::Write;

/// An XML element under construction
#[derive(Debug, Clone, Default)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: Option<String>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Element {
            name: name.to_string(),
            ..Element::default()
        }
    }

    /// Sets an attribute; a repeated name overwrites in place
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(existing) = self.attributes.iter_mut().find(|(n, _)| n == name) {
            existing.1 = value;
        } else {
            self.attributes.push((name.to_string(), value));
        }
    }

    /// Replaces the element's text content
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Appends a child element and returns it for further construction
    pub fn add_child(&mut self, name: &str) -> &mut Element {
        self.children.push(Element::new(name));
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    fn write(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        let _ = write!(out, "{indent}<{}", self.name);
        for (name, value) in &self.attributes {
            let _ = write!(out, " {}=\"{}\"", name, escape_attr(value));
        }
        if self.children.is_empty() {
            match &self.text {
                Some(text) => {
                    let _ = writeln!(out, ">{}</{}>", escape_text(text), self.name);
                }
                None => {
                    let _ = writeln!(out, "/>");
                }
            }
        } else {
            let _ = writeln!(out, ">");
            for child in &self.children {
                child.write(out, depth + 1);
            }
            let _ = writeln!(out, "{indent}</{}>", self.name);
        }
    }
}

/// A complete document: XML declaration, one processing instruction, root
#[derive(Debug, Clone)]
pub struct Document {
    pi_target: String,
    pi_data: String,
    root: Element,
}

impl Document {
    pub fn new(pi_target: &str, pi_data: &str, root: Element) -> Self {
        Document {
            pi_target: pi_target.to_string(),
            pi_data: pi_data.to_string(),
            root,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        let _ = writeln!(out, "<?{} {}?>", self.pi_target, self.pi_data);
        self.root.write(&mut out, 0);
        out.into_bytes()
    }
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
