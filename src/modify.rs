//! Walks [`ModificationTags`] against a document, resolving or synthesizing
//! the addressed elements and applying their mutators.

use crate::document::Document;
use crate::element::Element;
use crate::error::Result;
use crate::factory;
use crate::tags::{ModificationTags, Rule};
use std::collections::HashMap;

/// One modification pass over a document.
///
/// The first element resolved for a tag is remembered as that tag's template. Missing
/// siblings are cloned from the template, so they look like the first instance rather
/// than like whatever the last sibling was modified into. Templates are keyed by tag
/// only and shared by all nesting levels of the pass. They belong to one document:
/// running the modifier on another document starts with an empty cache.
///
/// ```
/// use xml_modify::{Document, ModificationTags, Mutator, Rule, XmlModifier};
///
/// let mut doc = Document::parse_str(
///     r#"<a:tcPr><a:lnL w="100" /></a:tcPr>"#,
/// ).unwrap();
/// let root = doc.root_element().unwrap();
/// let tags = ModificationTags::new()
///     .tag("a:lnL", Rule::new().mutator(Mutator::attribute("w", 12700)))
///     .tag("a:lnR", Rule::new().mutator(Mutator::attribute("w", 6350)));
/// XmlModifier::new().modify(&mut doc, &tags, root).unwrap();
/// assert_eq!(root.find(&doc, "a:lnR").unwrap().attribute(&doc, "w"), Some("6350"));
/// ```
#[derive(Debug, Default)]
pub struct XmlModifier {
    // id of the document the templates live in
    document: Option<usize>,
    templates: HashMap<String, Element>,
}

impl XmlModifier {
    pub fn new() -> XmlModifier {
        XmlModifier::default()
    }

    /// The cached template for `tag`. Detached, lives in the document it was taken from.
    pub fn template(&self, tag: &str) -> Option<Element> {
        self.templates.get(tag).copied()
    }

    fn bind(&mut self, doc: &Document) {
        if self.document != Some(doc.id()) {
            if !self.templates.is_empty() {
                log::debug!("new document, dropping {} templates", self.templates.len());
                self.templates.clear();
            }
            self.document = Some(doc.id());
        }
    }

    /// Apply `tags` under `root`.
    ///
    /// Elements that can't be resolved are skipped, with a warning for required ones.
    /// A collection rule ends its level, even with an empty list of mutators: the tags
    /// after it are not processed.
    ///
    /// # Errors
    ///
    /// Errors from mutators (see [`crate::Mutator::apply`]) stop the pass. Modifications
    /// made before the error stay in the document.
    pub fn modify(
        &mut self,
        doc: &mut Document,
        tags: &ModificationTags,
        root: Element,
    ) -> Result<()> {
        self.bind(doc);
        for (tag, rule) in tags.iter() {
            if let Some(mutators) = &rule.collection {
                let collection = root.elements_by_tag(doc, tag);
                for mutator in mutators {
                    mutator.apply(doc, &collection)?;
                }
                return Ok(());
            }

            let element = match self.assert_element(doc, tag, rule, root)? {
                Some(element) => element,
                None => {
                    if rule.is_required {
                        log::warn!(
                            "could not assert required tag <{}> @index: {}",
                            tag,
                            rule.index
                        );
                    }
                    continue;
                }
            };

            for mutator in &rule.mutators {
                mutator.apply(doc, element)?;
            }

            if let Some(children) = &rule.children {
                self.modify(doc, children, element)?;
            }
        }
        Ok(())
    }

    /// Find the `rule.index`th `tag` element under `parent`, synthesizing one element
    /// if it's missing. Returns `None` if the index is still out of reach.
    ///
    /// At most one element is added per call: a factory instance when there is no
    /// `tag` element at all, otherwise a clone of the template (or of the last
    /// sibling with `from_previous`) right after the last sibling.
    pub fn assert_element(
        &mut self,
        doc: &mut Document,
        tag: &str,
        rule: &Rule,
        parent: Element,
    ) -> Result<Option<Element>> {
        self.bind(doc);
        let collection = parent.elements_by_tag(doc, tag);
        if collection.get(rule.index).is_none() {
            match collection.last() {
                None => {
                    if factory::create_element(doc, parent, tag)?.is_none() {
                        log::debug!("no recipe to create <{}>", tag);
                    }
                }
                Some(&previous) => {
                    let model = match self.templates.get(tag) {
                        Some(&template) if !rule.from_previous => template,
                        _ => previous,
                    };
                    let clone = model.deep_clone(doc);
                    previous.insert_after(doc, clone)?;
                    log::debug!(
                        "cloned <{}> from {}",
                        tag,
                        if model == previous { "previous sibling" } else { "template" }
                    );
                }
            }
        }

        let element = match parent.elements_by_tag(doc, tag).get(rule.index) {
            Some(&element) => element,
            None => return Ok(None),
        };
        if !self.templates.contains_key(tag) {
            let template = element.deep_clone(doc);
            self.templates.insert(tag.to_string(), template);
        }
        Ok(Some(element))
    }
}

/// Apply `tags` under `root` with a fresh [`XmlModifier`].
pub fn modify(doc: &mut Document, tags: &ModificationTags, root: Element) -> Result<()> {
    XmlModifier::new().modify(doc, tags, root)
}
