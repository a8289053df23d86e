use crate::document::{Document, Node};
use crate::error::{Error, Result};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub(crate) struct ElementData {
    full_name: String,
    attributes: HashMap<String, String>, // q:attr="val" => {"q:attr": "val"}
    namespace_decls: HashMap<String, String>, // local namespace newly defined in attributes
    parent: Option<Element>,
    children: Vec<Node>,
}

/// Represents an XML element.
///
/// This struct only contains a unique usize id and implements trait `Copy`.
/// So you do not need to bother with having a reference.
///
/// Because the actual data of the element is stored in [`Document`],
/// most methods takes `&Document` or `&mut Document` as its first argument.
///
/// Detached elements (freshly created, cloned, or removed from their parent)
/// stay in the document's store and can be attached again later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Element {
    id: usize,
}

impl Element {
    /// Create a new empty, detached element with name.
    pub fn new<S: Into<String>>(doc: &mut Document, name: S) -> Element {
        Self::with_data(doc, name.into(), HashMap::new(), HashMap::new())
    }

    /// Start building an element subtree. See [`ElementBuilder`].
    pub fn build<S: Into<String>>(name: S) -> ElementBuilder {
        ElementBuilder::new(name)
    }

    pub(crate) fn with_data(
        doc: &mut Document,
        full_name: String,
        attributes: HashMap<String, String>,
        namespace_decls: HashMap<String, String>,
    ) -> Element {
        let elem = Element {
            id: doc.store.len(),
        };
        doc.store.push(ElementData {
            full_name,
            attributes,
            namespace_decls,
            parent: None,
            children: vec![],
        });
        elem
    }

    pub(crate) fn container() -> (Element, ElementData) {
        let elem_data = ElementData {
            full_name: String::new(),
            attributes: HashMap::new(),
            namespace_decls: HashMap::new(),
            parent: None,
            children: Vec::new(),
        };
        (Element { id: 0 }, elem_data)
    }

    /// The container is the invisible element holding the document's root nodes.
    pub fn is_container(&self) -> bool {
        self.id == 0
    }

    /// `"c:dPt"` -> `("c", "dPt")`, `"dPt"` -> `("", "dPt")`
    pub fn separate_prefix_name(full_name: &str) -> (&str, &str) {
        match full_name.split_once(':') {
            Some((prefix, name)) => (prefix, name),
            None => ("", full_name),
        }
    }
}

impl Element {
    fn data<'a>(&self, doc: &'a Document) -> &'a ElementData {
        &doc.store[self.id]
    }

    fn mut_data<'a>(&self, doc: &'a mut Document) -> &'a mut ElementData {
        &mut doc.store[self.id]
    }

    /// Get raw name of element, including its namespace prefix.
    /// This is the tag used by [`Element::elements_by_tag`].
    pub fn full_name<'a>(&self, doc: &'a Document) -> &'a str {
        &self.data(doc).full_name
    }

    /// Get prefix and name of element.
    ///
    /// `<prefix:name>` -> `("prefix", "name")`
    pub fn prefix_name<'a>(&self, doc: &'a Document) -> (&'a str, &'a str) {
        Self::separate_prefix_name(self.full_name(doc))
    }

    pub fn name<'a>(&self, doc: &'a Document) -> &'a str {
        self.prefix_name(doc).1
    }

    /// Get attributes of element.
    ///
    /// Attribute names keep their namespace prefix, e.g. `"r:id"`.
    pub fn attributes<'a>(&self, doc: &'a Document) -> &'a HashMap<String, String> {
        &self.data(doc).attributes
    }

    pub fn mut_attributes<'a>(&self, doc: &'a mut Document) -> &'a mut HashMap<String, String> {
        &mut self.mut_data(doc).attributes
    }

    pub fn attribute<'a>(&self, doc: &'a Document, name: &str) -> Option<&'a str> {
        self.attributes(doc).get(name).map(|v| v.as_str())
    }

    /// Add or replace attribute.
    pub fn set_attribute<S, T>(&self, doc: &mut Document, name: S, value: T)
    where
        S: Into<String>,
        T: Into<String>,
    {
        self.mut_attributes(doc).insert(name.into(), value.into());
    }

    /// Gets HashMap of `prefix:namespace` declared in its attributes.
    pub fn namespace_decls<'a>(&self, doc: &'a Document) -> &'a HashMap<String, String> {
        &self.data(doc).namespace_decls
    }

    pub fn parent(&self, doc: &Document) -> Option<Element> {
        self.data(doc).parent
    }

    pub fn has_parent(&self, doc: &Document) -> bool {
        self.parent(doc).is_some()
    }

    pub fn children<'a>(&self, doc: &'a Document) -> &'a Vec<Node> {
        &self.data(doc).children
    }

    pub fn has_children(&self, doc: &Document) -> bool {
        !self.children(doc).is_empty()
    }

    pub fn child_elements(&self, doc: &Document) -> Vec<Element> {
        self.children(doc)
            .iter()
            .filter_map(|node| node.as_element())
            .collect()
    }

    /// First direct child element with this full name.
    pub fn find(&self, doc: &Document, name: &str) -> Option<Element> {
        self.children(doc)
            .iter()
            .filter_map(|node| node.as_element())
            .find(|e| e.full_name(doc) == name)
    }

    /// All direct child elements with this full name.
    pub fn find_all(&self, doc: &Document, name: &str) -> Vec<Element> {
        self.children(doc)
            .iter()
            .filter_map(|node| node.as_element())
            .filter(|e| e.full_name(doc) == name)
            .collect()
    }

    fn collect_by_tag(&self, doc: &Document, tag: &str, found: &mut Vec<Element>) {
        for node in self.children(doc) {
            if let Node::Element(elem) = node {
                if elem.full_name(doc) == tag {
                    found.push(*elem);
                }
                elem.collect_by_tag(doc, tag, found);
            }
        }
    }

    /// All descendant elements with this full name, in document order.
    /// The element itself is not included.
    pub fn elements_by_tag(&self, doc: &Document, tag: &str) -> Vec<Element> {
        let mut found = Vec::new();
        self.collect_by_tag(doc, tag, &mut found);
        found
    }

    pub(crate) fn build_text_content(&self, doc: &Document, buf: &mut String) {
        for child in self.children(doc) {
            child.build_text_content(doc, buf);
        }
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, doc: &Document) -> String {
        let mut buf = String::new();
        self.build_text_content(doc, &mut buf);
        buf
    }

    /// Replace all children with a single text node.
    pub fn set_text_content<S: Into<String>>(&self, doc: &mut Document, text: S) {
        self.clear_children(doc);
        self.mut_data(doc).children.push(Node::Text(text.into()));
    }

    /// Text of the first child node. If the first child is an element,
    /// its [`Element::text_content`].
    pub fn first_child_text(&self, doc: &Document) -> Option<String> {
        self.children(doc)
            .first()
            .map(|node| node.text_content(doc))
    }

    /// Overwrite the text of the first child node.
    ///
    /// An element first child has its content replaced by the text.
    /// When there are no children, a text node is added.
    pub fn set_first_child_text<S: Into<String>>(&self, doc: &mut Document, text: S) {
        let text = text.into();
        let first = self.mut_data(doc).children.first_mut();
        match first {
            Some(Node::Element(elem)) => {
                let elem = *elem;
                elem.set_text_content(doc, text);
            }
            Some(Node::Text(content))
            | Some(Node::CData(content))
            | Some(Node::Comment(content))
            | Some(Node::PI(content))
            | Some(Node::DocType(content)) => *content = text,
            None => self.mut_data(doc).children.push(Node::Text(text)),
        }
    }

    /// Deep copy of this element and its descendants.
    /// The copy is detached; attach it with [`Element::push_child`] or [`Element::insert_after`].
    pub fn deep_clone(&self, doc: &mut Document) -> Element {
        let data = self.data(doc);
        let full_name = data.full_name.clone();
        let attributes = data.attributes.clone();
        let namespace_decls = data.namespace_decls.clone();
        let children = data.children.clone();
        let copy = Element::with_data(doc, full_name, attributes, namespace_decls);
        for child in children {
            let child = match child {
                Node::Element(elem) => {
                    let elem = elem.deep_clone(doc);
                    elem.mut_data(doc).parent = Some(copy);
                    Node::Element(elem)
                }
                node => node,
            };
            copy.mut_data(doc).children.push(child);
        }
        copy
    }

    fn check_attachable(&self, doc: &Document, node: &Node) -> Result<()> {
        if let Node::Element(elem) = node {
            if elem.is_container() {
                return Err(Error::ContainerCannotMove);
            }
            if elem.has_parent(doc) {
                return Err(Error::HasAParent);
            }
        }
        Ok(())
    }

    /// Equivalent to `vec.push()`.
    ///
    /// # Errors
    ///
    /// - [`Error::HasAParent`]: If node is an element, it must not have a parent.
    /// Call `elem.detach()` before.
    /// - [`Error::ContainerCannotMove`]: The container element cannot be attached.
    pub fn push_child(&self, doc: &mut Document, node: Node) -> Result<()> {
        self.check_attachable(doc, &node)?;
        if let Node::Element(elem) = node {
            elem.mut_data(doc).parent = Some(*self);
        }
        self.mut_data(doc).children.push(node);
        Ok(())
    }

    /// Equivalent to `vec.insert()`.
    ///
    /// # Errors
    ///
    /// Same as [`Element::push_child`].
    ///
    /// # Panics
    ///
    /// Panics if `index > children.len()`.
    pub fn insert_child(&self, doc: &mut Document, index: usize, node: Node) -> Result<()> {
        self.check_attachable(doc, &node)?;
        if let Node::Element(elem) = node {
            elem.mut_data(doc).parent = Some(*self);
        }
        self.mut_data(doc).children.insert(index, node);
        Ok(())
    }

    /// Equivalent to `vec.remove()`.
    ///
    /// # Panics
    ///
    /// Panics if index is out of bounds.
    pub fn remove_child(&self, doc: &mut Document, index: usize) -> Node {
        let node = self.mut_data(doc).children.remove(index);
        if let Node::Element(elem) = node {
            elem.mut_data(doc).parent = None;
        }
        node
    }

    fn clear_children(&self, doc: &mut Document) {
        let children = std::mem::take(&mut self.mut_data(doc).children);
        for child in children {
            if let Node::Element(elem) = child {
                elem.mut_data(doc).parent = None;
            }
        }
    }

    /// Position of this element among its parent's child nodes.
    pub fn position(&self, doc: &Document) -> Option<usize> {
        let parent = self.parent(doc)?;
        parent
            .children(doc)
            .iter()
            .position(|n| n.as_element() == Some(*self))
    }

    /// Remove child element by value.
    ///
    /// # Errors
    ///
    /// - [Error::NotFound]: Element was not found among its children.
    pub fn remove_child_elem(&self, doc: &mut Document, element: Element) -> Result<()> {
        let pos = self
            .children(doc)
            .iter()
            .position(|n| n.as_element() == Some(element))
            .ok_or(Error::NotFound)?;
        self.remove_child(doc, pos);
        Ok(())
    }

    /// Remove this element from its parent. Does nothing when already detached.
    pub fn detach(&self, doc: &mut Document) -> Result<()> {
        if self.is_container() {
            return Err(Error::ContainerCannotMove);
        }
        match self.parent(doc) {
            Some(parent) => parent.remove_child_elem(doc, *self),
            None => Ok(()),
        }
    }

    /// Insert `element` as the next sibling of this element.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`]: This element has no parent.
    /// - Errors from [`Element::insert_child`].
    pub fn insert_after(&self, doc: &mut Document, element: Element) -> Result<()> {
        let parent = self.parent(doc).ok_or(Error::NotFound)?;
        let pos = self.position(doc).ok_or(Error::NotFound)?;
        parent.insert_child(doc, pos + 1, Node::Element(element))
    }

    /// Insert `element` as the previous sibling of this element.
    pub fn insert_before(&self, doc: &mut Document, element: Element) -> Result<()> {
        let parent = self.parent(doc).ok_or(Error::NotFound)?;
        let pos = self.position(doc).ok_or(Error::NotFound)?;
        parent.insert_child(doc, pos, Node::Element(element))
    }
}

/// Builds a detached element subtree.
///
/// ```
/// use xml_modify::{Document, Element};
///
/// let mut doc = Document::new();
/// let container = doc.container();
/// let ser = Element::build("c:ser")
///     .child(Element::build("c:idx").attribute("val", "0"))
///     .child(Element::build("c:tx").child(Element::build("c:v").text_content("Series 1")))
///     .push_to(&mut doc, container);
/// assert_eq!(ser.elements_by_tag(&doc, "c:v")[0].text_content(&doc), "Series 1");
/// ```
#[derive(Debug, Clone)]
pub struct ElementBuilder {
    full_name: String,
    attributes: HashMap<String, String>,
    namespace_decls: HashMap<String, String>,
    text_content: Option<String>,
    children: Vec<ElementBuilder>,
}

impl ElementBuilder {
    pub fn new<S: Into<String>>(full_name: S) -> ElementBuilder {
        ElementBuilder {
            full_name: full_name.into(),
            attributes: HashMap::new(),
            namespace_decls: HashMap::new(),
            text_content: None,
            children: Vec::new(),
        }
    }

    pub fn attribute<S, T>(mut self, name: S, value: T) -> Self
    where
        S: Into<String>,
        T: Into<String>,
    {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn namespace_decl<S, T>(mut self, prefix: S, namespace: T) -> Self
    where
        S: Into<String>,
        T: Into<String>,
    {
        self.namespace_decls.insert(prefix.into(), namespace.into());
        self
    }

    /// Text node written before any child elements.
    pub fn text_content<S: Into<String>>(mut self, text: S) -> Self {
        self.text_content = Some(text.into());
        self
    }

    pub fn child(mut self, child: ElementBuilder) -> Self {
        self.children.push(child);
        self
    }

    /// Create the detached element in `doc`.
    pub fn finish(self, doc: &mut Document) -> Element {
        let elem = Element::with_data(doc, self.full_name, self.attributes, self.namespace_decls);
        if let Some(text) = self.text_content {
            elem.mut_data(doc).children.push(Node::Text(text));
        }
        for child in self.children {
            let child = child.finish(doc);
            child.mut_data(doc).parent = Some(elem);
            elem.mut_data(doc).children.push(Node::Element(child));
        }
        elem
    }

    /// Create the element and append it to `parent`.
    pub fn push_to(self, doc: &mut Document, parent: Element) -> Element {
        let elem = self.finish(doc);
        elem.mut_data(doc).parent = Some(parent);
        parent.mut_data(doc).children.push(Node::Element(elem));
        elem
    }
}
