//! Structural transform seam
//!
//! A structural transform is a declarative rewrite of a document's
//! field/attribute shape. The pipeline depends only on the [`Transform`]
//! trait; [`RuleTransform`] is the built-in implementation covering the
//! rewrites the shipped migrations need (rename, drop, add, set-text).
//!
//! Dropped-field detection lives here too: the path sets of a document
//! before and after a transform are diffed, and paths that vanished are
//! reported — never fatally — in the step's result.

use sff_core::{MigrateError, Result};
use sff_document::Element;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Named string parameters resolved for one handler invocation
pub type Params = HashMap<String, String>;

/// A declarative rewrite of a document's shape
pub trait Transform {
    /// Names of the parameters this transform requires, in declaration order
    fn declared_params(&self) -> &[String];

    /// Apply the rewrite, producing the transformed document
    ///
    /// `params` contains a value for every declared parameter.
    fn apply(&self, document: &Element, params: &Params) -> Result<Element>;
}

/// Structural locations present before a step but absent after it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DroppedFields(BTreeSet<String>);

impl DroppedFields {
    /// Whether nothing was dropped
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of dropped paths
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The dropped paths in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for DroppedFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for path in &self.0 {
            if !first {
                f.write_str(", ")?;
            }
            f.write_str(path)?;
            first = false;
        }
        Ok(())
    }
}

/// Diff the path sets of a document before and after a transform
pub fn dropped_fields(before: &Element, after: &Element) -> DroppedFields {
    let before_paths = before.paths();
    let after_paths = after.paths();
    DroppedFields(before_paths.difference(&after_paths).cloned().collect())
}

/// A value a rule writes into the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleValue {
    /// A fixed string
    Literal(String),
    /// The value of a named parameter, resolved at apply time
    Param(String),
}

impl RuleValue {
    fn resolve<'a>(&'a self, params: &'a Params) -> Result<&'a str> {
        match self {
            RuleValue::Literal(s) => Ok(s),
            RuleValue::Param(name) => params.get(name).map(String::as_str).ok_or_else(|| {
                MigrateError::Parse(format!("transform parameter {:?} not supplied", name))
            }),
        }
    }
}

/// One structural rewrite rule
///
/// Rules match elements by the tag they carry in the *input* document;
/// renames do not cascade within a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Rename every element with tag `from` to `to`
    RenameElement {
        /// Tag in the input document
        from: String,
        /// Tag in the output document
        to: String,
    },
    /// Rename an attribute on every element with the given tag
    RenameAttribute {
        /// Tag of the carrying element
        tag: String,
        /// Attribute name in the input document
        from: String,
        /// Attribute name in the output document
        to: String,
    },
    /// Remove every element with the given tag (and its subtree)
    DropElement {
        /// Tag to remove
        tag: String,
    },
    /// Remove an attribute from every element with the given tag
    DropAttribute {
        /// Tag of the carrying element
        tag: String,
        /// Attribute name to remove
        attr: String,
    },
    /// Replace the text content of every element with the given tag
    SetText {
        /// Tag of the element to rewrite
        tag: String,
        /// New text content
        value: RuleValue,
    },
    /// Append a new child element to every element with the given tag
    AddChild {
        /// Tag of the parent element
        parent: String,
        /// Tag of the new child
        tag: String,
        /// Text content of the new child
        value: RuleValue,
    },
}

/// Rule-based structural transform
#[derive(Debug, Clone, Default)]
pub struct RuleTransform {
    params: Vec<String>,
    rules: Vec<Rule>,
}

impl RuleTransform {
    /// Empty transform (identity)
    pub fn new() -> Self {
        RuleTransform::default()
    }

    /// Declare a required parameter
    pub fn with_param(mut self, name: impl Into<String>) -> Self {
        self.params.push(name.into());
        self
    }

    /// Append a rule
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Shorthand for [`Rule::RenameElement`]
    pub fn rename_element(self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.with_rule(Rule::RenameElement {
            from: from.into(),
            to: to.into(),
        })
    }

    /// Shorthand for [`Rule::DropElement`]
    pub fn drop_element(self, tag: impl Into<String>) -> Self {
        self.with_rule(Rule::DropElement { tag: tag.into() })
    }

    /// Shorthand for [`Rule::SetText`] with a literal value
    pub fn set_text(self, tag: impl Into<String>, text: impl Into<String>) -> Self {
        self.with_rule(Rule::SetText {
            tag: tag.into(),
            value: RuleValue::Literal(text.into()),
        })
    }

    /// Shorthand for [`Rule::AddChild`]
    pub fn add_child(
        self,
        parent: impl Into<String>,
        tag: impl Into<String>,
        value: RuleValue,
    ) -> Self {
        self.with_rule(Rule::AddChild {
            parent: parent.into(),
            tag: tag.into(),
            value,
        })
    }

    fn rewrite(&self, el: &Element, params: &Params) -> Result<Element> {
        let input_tag = el.tag.clone();

        let mut out = Element::new(input_tag.clone());
        for (name, value) in &el.attributes {
            out.attributes.push((name.clone(), value.clone()));
        }
        out.text = el.text.clone();

        for rule in &self.rules {
            match rule {
                Rule::RenameElement { from, to } if *from == input_tag => {
                    out.tag = to.clone();
                }
                Rule::RenameAttribute { tag, from, to } if *tag == input_tag => {
                    for attr in &mut out.attributes {
                        if attr.0 == *from {
                            attr.0 = to.clone();
                        }
                    }
                }
                Rule::DropAttribute { tag, attr } if *tag == input_tag => {
                    out.remove_attr(attr);
                }
                Rule::SetText { tag, value } if *tag == input_tag => {
                    out.text = Some(value.resolve(params)?.to_string());
                }
                _ => {}
            }
        }

        for child in &el.children {
            if self.is_dropped(&child.tag) {
                continue;
            }
            out.children.push(self.rewrite(child, params)?);
        }

        for rule in &self.rules {
            if let Rule::AddChild { parent, tag, value } = rule {
                if *parent == input_tag {
                    out.children
                        .push(Element::with_text(tag.clone(), value.resolve(params)?));
                }
            }
        }

        Ok(out)
    }

    fn is_dropped(&self, tag: &str) -> bool {
        self.rules
            .iter()
            .any(|r| matches!(r, Rule::DropElement { tag: t } if t == tag))
    }
}

impl Transform for RuleTransform {
    fn declared_params(&self) -> &[String] {
        &self.params
    }

    fn apply(&self, document: &Element, params: &Params) -> Result<Element> {
        self.rewrite(document, params)
    }
}
