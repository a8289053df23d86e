//! Mutations applied to one resolved element, or to a whole same-tag collection.

use crate::document::Document;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::range;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Tag of the value slot written by [`Mutator::Value`].
pub const VALUE_TAG: &str = "c:v";

/// A single-element mutation.
///
/// Mutators only hold their configuration and can be reused for any number of elements.
///
/// ```
/// use xml_modify::{Document, Mutator};
///
/// let mut doc = Document::parse_str(r#"<c:pt idx="0"><c:v>1</c:v></c:pt>"#).unwrap();
/// let pt = doc.root_element().unwrap();
/// Mutator::value(42, Some(3)).apply(&mut doc, pt).unwrap();
/// assert_eq!(pt.attribute(&doc, "idx"), Some("3"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mutator {
    /// Set `name` to `value`. `None` leaves the element untouched.
    Attribute { name: String, value: Option<String> },
    /// Set `name` to `"1"` or `"0"`.
    BooleanAttribute { name: String, state: bool },
    /// Overwrite the text of the first child node.
    TextContent { value: String },
    /// Overwrite the text of the nested `c:v`, and `idx` when an index is given.
    Value { value: String, index: Option<usize> },
    /// Rewrite the cell range held in the element's text.
    Range { series: usize, length: Option<usize> },
}

impl Mutator {
    pub fn attribute<S: Into<String>, V: Display>(name: S, value: V) -> Mutator {
        Mutator::Attribute {
            name: name.into(),
            value: Some(value.to_string()),
        }
    }

    pub fn optional_attribute<S: Into<String>, V: Display>(name: S, value: Option<V>) -> Mutator {
        Mutator::Attribute {
            name: name.into(),
            value: value.map(|v| v.to_string()),
        }
    }

    pub fn boolean_attribute<S: Into<String>>(name: S, state: bool) -> Mutator {
        Mutator::BooleanAttribute {
            name: name.into(),
            state,
        }
    }

    pub fn text_content<V: Display>(value: V) -> Mutator {
        Mutator::TextContent {
            value: value.to_string(),
        }
    }

    pub fn value<V: Display>(value: V, index: Option<usize>) -> Mutator {
        Mutator::Value {
            value: value.to_string(),
            index,
        }
    }

    pub fn range(series: usize, length: Option<usize>) -> Mutator {
        Mutator::Range { series, length }
    }

    /// Apply to `element`.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingValueElement`]: `Value` on an element without `c:v`.
    /// - [`Error::InvalidRange`]: `Range` on an element whose text is not a cell range.
    ///
    /// Both mean the document doesn't have the structure the modification expects,
    /// the modification pass should stop.
    pub fn apply(&self, doc: &mut Document, element: Element) -> Result<()> {
        match self {
            Mutator::Attribute { name, value } => {
                if let Some(value) = value {
                    element.set_attribute(doc, name.as_str(), value.as_str());
                }
            }
            Mutator::BooleanAttribute { name, state } => {
                element.set_attribute(doc, name.as_str(), if *state { "1" } else { "0" });
            }
            Mutator::TextContent { value } => {
                element.set_first_child_text(doc, value.as_str());
            }
            Mutator::Value { value, index } => {
                let slot = match element.elements_by_tag(doc, VALUE_TAG).first() {
                    Some(slot) => *slot,
                    None => {
                        return Err(Error::MissingValueElement {
                            tag: element.full_name(doc).to_string(),
                            index: *index,
                        })
                    }
                };
                slot.set_first_child_text(doc, value.as_str());
                if let Some(index) = index {
                    element.set_attribute(doc, "idx", index.to_string());
                }
            }
            Mutator::Range { series, length } => {
                let text = element.first_child_text(doc).unwrap_or_default();
                let range = range::set_range(&text, *series, *length)?;
                element.set_first_child_text(doc, range);
            }
        }
        Ok(())
    }
}

/// A mutation of every same-tag element under the current root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "arg", rename_all = "camelCase")]
pub enum CollectionMutator {
    /// Apply the mutator to each element, in document order.
    Each(Mutator),
    /// Keep the first `n` elements, detach the rest.
    Truncate(usize),
    /// Detach every element.
    RemoveAll,
}

impl CollectionMutator {
    pub fn apply(&self, doc: &mut Document, collection: &[Element]) -> Result<()> {
        match self {
            CollectionMutator::Each(mutator) => {
                for element in collection {
                    mutator.apply(doc, *element)?;
                }
            }
            CollectionMutator::Truncate(len) => {
                for element in collection.iter().skip(*len) {
                    element.detach(doc)?;
                }
            }
            CollectionMutator::RemoveAll => {
                for element in collection {
                    element.detach(doc)?;
                }
            }
        }
        Ok(())
    }
}
