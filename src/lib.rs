//! Declarative modification of OOXML part trees.
//!
//! Parse a part (a slide, a chart, a table graphic frame) into a [`Document`], describe
//! what to change per tag with [`ModificationTags`], and let [`XmlModifier`] find or
//! synthesize the elements and apply the [`Mutator`]s.
//!
//! ```
//! use xml_modify::{modify, Document, ModificationTags, Mutator, Rule};
//!
//! let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
//! <c:ser>
//!     <c:tx><c:strRef><c:f>Sheet1!$B$1</c:f></c:strRef></c:tx>
//!     <c:val><c:numRef><c:f>Sheet1!$B$2:$B$4</c:f></c:numRef></c:val>
//! </c:ser>"#;
//! let mut doc = Document::parse_str(xml).unwrap();
//! let ser = doc.root_element().unwrap();
//!
//! let tags = ModificationTags::new()
//!     .tag("c:val", Rule::new().children(
//!         ModificationTags::new().tag("c:f", Rule::new().mutator(Mutator::range(2, Some(5)))),
//!     ));
//! modify(&mut doc, &tags, ser).unwrap();
//! assert!(doc.write_str().unwrap().contains("Sheet1!$C$2:$C$6"));
//! ```

mod document;
mod element;
mod error;
mod factory;
mod modify;
mod mutator;
mod parser;
pub mod range;
mod tags;

pub use crate::document::{Document, Node, WriteOptions};
pub use crate::element::{Element, ElementBuilder};
pub use crate::error::{Error, Result};
pub use crate::factory::{create_element, BorderSide, ElementKind};
pub use crate::modify::{modify, XmlModifier};
pub use crate::mutator::{CollectionMutator, Mutator, VALUE_TAG};
pub use crate::parser::ReadOptions;
pub use crate::tags::{ModificationTags, Rule};
