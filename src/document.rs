use crate::element::{Element, ElementData};
use crate::error::{Error, Result};
use crate::parser::{DocumentParser, ReadOptions};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_DOCUMENT_ID: AtomicUsize = AtomicUsize::new(0);

fn next_document_id() -> usize {
    NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    CData(String),
    PI(String),
    DocType(String),
}

impl Node {
    pub fn as_element(&self) -> Option<Element> {
        match self {
            Self::Element(elem) => Some(*elem),
            _ => None,
        }
    }

    pub(crate) fn build_text_content(&self, doc: &Document, buf: &mut String) {
        match self {
            Node::Element(elem) => elem.build_text_content(doc, buf),
            Node::Text(text) => buf.push_str(text),
            Node::CData(text) => buf.push_str(text),
            Node::PI(text) => buf.push_str(text),
            _ => {}
        }
    }

    /// Returns content if node is `Text`, `CData`, or `PI`.
    /// If node is `Element`, return [Element::text_content()]
    pub fn text_content(&self, doc: &Document) -> String {
        let mut buf = String::new();
        self.build_text_content(doc, &mut buf);
        buf
    }
}

/// Options when writing xml.
///
/// `indent`: `Some((b' ', 4))` indents nested elements with 4 spaces. OOXML parts
/// are usually written without indentation.
/// `write_decl`: write `<?xml version="1.0" encoding="UTF-8"?>` at the start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    pub indent: Option<(u8, usize)>,
    pub write_decl: bool,
}

impl Default for WriteOptions {
    fn default() -> WriteOptions {
        WriteOptions {
            indent: None,
            write_decl: true,
        }
    }
}

/// Represents a XML document, such as one part of an OOXML package.
///
/// Use [`Document::parse_str()`], [`Document::parse_reader()`], or [`str::parse()`] to parse xml.
///
/// # Examples
/// ```
/// use xml_modify::Document;
///
/// let mut doc = Document::parse_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
/// <c:chartSpace>
///     <c:chart>
///         <c:title>Sales</c:title>
///     </c:chart>
/// </c:chartSpace>
/// "#).unwrap();
/// let title = doc
///   .root_element()
///   .unwrap()
///   .elements_by_tag(&doc, "c:title")[0];
/// title.set_text_content(&mut doc, "Revenue");
/// let xml = doc.write_str().unwrap();
/// assert!(xml.contains("<c:title>Revenue</c:title>"));
/// ```
#[derive(Debug)]
pub struct Document {
    // Unique per instance, clones included. Elements are only valid in their own document.
    id: usize,
    pub(crate) store: Vec<ElementData>,
    container: Element,

    pub(crate) version: String,
    pub(crate) standalone: bool,
}

impl Clone for Document {
    fn clone(&self) -> Self {
        Document {
            id: next_document_id(),
            store: self.store.clone(),
            container: self.container,
            version: self.version.clone(),
            standalone: self.standalone,
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Document::new()
    }
}

impl Document {
    /// Create a blank new xml document.
    pub fn new() -> Document {
        let (container, container_data) = Element::container();
        Document {
            id: next_document_id(),
            store: vec![container_data],
            container,
            version: String::from("1.0"),
            standalone: false,
        }
    }

    /// Identifies this document among all documents of the process.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn container(&self) -> Element {
        self.container
    }

    pub fn is_empty(&self) -> bool {
        !self.container.has_children(self)
    }

    /// Get first element of document.
    pub fn root_element(&self) -> Option<Element> {
        self.container.child_elements(self).get(0).copied()
    }

    /// Get root nodes of document.
    pub fn root_nodes(&self) -> &Vec<Node> {
        self.container.children(self)
    }

    pub fn push_root_node(&mut self, node: Node) -> Result<()> {
        let container = self.container;
        container.push_child(self, node)
    }

    pub fn standalone(&self) -> bool {
        self.standalone
    }
}

// Read and write
impl Document {
    /// Parses xml string with default [`ReadOptions`].
    pub fn parse_str(str: &str) -> Result<Document> {
        DocumentParser::parse_reader(str.as_bytes(), ReadOptions::default())
    }

    pub fn parse_str_with_opts(str: &str, opts: ReadOptions) -> Result<Document> {
        DocumentParser::parse_reader(str.as_bytes(), opts)
    }

    /// Parses xml bytes from reader. Non UTF-8 input is decoded using its BOM or declaration.
    ///
    /// # Errors
    ///
    /// - [`Error::CannotDecode`]: Could not decode XML.
    /// - [`Error::MalformedXML`]: Could not read XML.
    /// - [`Error::Io`]: IO Error
    pub fn parse_reader<R: Read>(reader: R) -> Result<Document> {
        DocumentParser::parse_reader(reader, ReadOptions::default())
    }

    pub fn parse_reader_with_opts<R: Read>(reader: R, opts: ReadOptions) -> Result<Document> {
        DocumentParser::parse_reader(reader, opts)
    }

    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
        let file = File::open(path)?;
        DocumentParser::parse_reader(file, ReadOptions::default())
    }

    /// Writes document as xml string with default [`WriteOptions`].
    pub fn write_str(&self) -> Result<String> {
        self.write_str_with_opts(&WriteOptions::default())
    }

    pub fn write_str_with_opts(&self, opts: &WriteOptions) -> Result<String> {
        let mut buf: Vec<u8> = Vec::with_capacity(200);
        self.write_with_opts(&mut buf, opts)?;
        Ok(String::from_utf8(buf)?)
    }

    /// Write document to writer. Will be written in UTF-8.
    pub fn write(&self, writer: &mut impl Write) -> Result<()> {
        self.write_with_opts(writer, &WriteOptions::default())
    }

    pub fn write_with_opts(&self, writer: &mut impl Write, opts: &WriteOptions) -> Result<()> {
        let container = self.container();
        let mut writer = match opts.indent {
            Some((indent_char, indent_size)) => {
                Writer::new_with_indent(writer, indent_char, indent_size)
            }
            None => Writer::new(writer),
        };
        if opts.write_decl {
            self.write_decl(&mut writer)?;
        }
        self.write_nodes(&mut writer, container.children(self))?;
        writer.write_event(Event::Eof)?;
        Ok(())
    }

    fn write_decl(&self, writer: &mut Writer<impl Write>) -> Result<()> {
        let standalone = match self.standalone {
            true => Some("yes".as_bytes()),
            false => None,
        };
        writer.write_event(Event::Decl(BytesDecl::new(
            self.version.as_bytes(),
            Some("UTF-8".as_bytes()),
            standalone,
        )))?;
        Ok(())
    }

    fn write_nodes(&self, writer: &mut Writer<impl Write>, nodes: &[Node]) -> Result<()> {
        for node in nodes {
            match node {
                Node::Element(eid) => self.write_element(writer, *eid)?,
                Node::Text(text) => {
                    writer.write_event(Event::Text(BytesText::from_plain_str(text)))?
                }
                Node::DocType(text) => {
                    writer.write_event(Event::DocType(BytesText::from_plain_str(text)))?
                }
                // Comment, CData, and PI content is not escaped.
                Node::Comment(text) => {
                    writer.write_event(Event::Comment(BytesText::from_escaped_str(text)))?
                }
                Node::CData(text) => {
                    writer.write_event(Event::CData(BytesText::from_escaped_str(text)))?
                }
                Node::PI(text) => {
                    writer.write_event(Event::PI(BytesText::from_escaped_str(text)))?
                }
            };
        }
        Ok(())
    }

    fn write_element(&self, writer: &mut Writer<impl Write>, element: Element) -> Result<()> {
        let name_bytes = element.full_name(self).as_bytes();
        let mut start = BytesStart::borrowed_name(name_bytes);
        // sorted for stable output, HashMap order is random
        let mut namespaces: Vec<(&String, &String)> =
            element.namespace_decls(self).iter().collect();
        namespaces.sort();
        for (prefix, val) in namespaces {
            let attr_name = if prefix.is_empty() {
                "xmlns".to_string()
            } else {
                format!("xmlns:{}", prefix)
            };
            start.push_attribute((attr_name.as_str(), val.as_str()));
        }
        let mut attributes: Vec<(&String, &String)> = element.attributes(self).iter().collect();
        attributes.sort();
        for (key, val) in attributes {
            start.push_attribute((key.as_str(), val.as_str()));
        }
        if element.has_children(self) {
            writer.write_event(Event::Start(start))?;
            self.write_nodes(writer, element.children(self))?;
            writer.write_event(Event::End(BytesEnd::borrowed(name_bytes)))?;
        } else {
            writer.write_event(Event::Empty(start))?;
        }
        Ok(())
    }
}

impl FromStr for Document {
    type Err = Error;

    fn from_str(s: &str) -> Result<Document> {
        Document::parse_str(s)
    }
}
