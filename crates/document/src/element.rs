//! Element tree for segmentation documents
//!
//! A minimal ordered tree: tag, attributes (order-preserving), optional
//! text content, children. Mixed content (text interleaved with child
//! elements) is not modelled; segmentation documents never use it.

use std::collections::BTreeSet;

/// One element of a segmentation document
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Element tag name
    pub tag: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    /// Text content, if any
    pub text: Option<String>,
    /// Child elements in document order
    pub children: Vec<Element>,
}

impl Element {
    /// Create an empty element with the given tag
    pub fn new(tag: impl Into<String>) -> Self {
        Element {
            tag: tag.into(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Create an element with text content
    pub fn with_text(tag: impl Into<String>, text: impl Into<String>) -> Self {
        let mut el = Element::new(tag);
        el.text = Some(text.into());
        el
    }

    /// Attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing any existing value and preserving position
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Remove an attribute by name
    pub fn remove_attr(&mut self, name: &str) {
        self.attributes.retain(|(n, _)| n != name);
    }

    /// First child with the given tag
    pub fn child(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// First child with the given tag, mutable
    pub fn child_mut(&mut self, tag: &str) -> Option<&mut Element> {
        self.children.iter_mut().find(|c| c.tag == tag)
    }

    /// All children with the given tag, in document order
    pub fn children_with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// First descendant with the given tag, depth-first document order
    pub fn descendant(&self, tag: &str) -> Option<&Element> {
        for child in &self.children {
            if child.tag == tag {
                return Some(child);
            }
            if let Some(found) = child.descendant(tag) {
                return Some(found);
            }
        }
        None
    }

    /// Trimmed text content, empty string if none
    pub fn text_str(&self) -> &str {
        self.text.as_deref().map(str::trim).unwrap_or("")
    }

    /// Enumerate the paths of this element and all descendants
    ///
    /// Paths look like `/segmentation/segment[2]/name`; a positional index
    /// is appended only when an element has same-tag siblings, matching the
    /// convention of common XML path tooling. The resulting set is the
    /// input to dropped-field detection: paths present before a structural
    /// transform but absent after it are reported as dropped.
    pub fn paths(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        let root = format!("/{}", self.tag);
        out.insert(root.clone());
        collect_paths(self, &root, &mut out);
        out
    }
}

fn collect_paths(el: &Element, prefix: &str, out: &mut BTreeSet<String>) {
    for (i, child) in el.children.iter().enumerate() {
        let same_tag = el.children.iter().filter(|c| c.tag == child.tag).count();
        let path = if same_tag > 1 {
            let ordinal = el.children[..i].iter().filter(|c| c.tag == child.tag).count() + 1;
            format!("{}/{}[{}]", prefix, child.tag, ordinal)
        } else {
            format!("{}/{}", prefix, child.tag)
        };
        out.insert(path.clone());
        collect_paths(child, &path, out);
    }
}
