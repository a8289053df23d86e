use crate::document::{Document, Node};
use crate::element::Element;
use crate::error::{Error, Result};
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use quick_xml::events::{BytesDecl, BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::Read;

/// Options when parsing xml.
///
/// `empty_text_node`: `<tag></tag>` will have a `Node::Text("")` as its children, while `<tag />` won't.
///
/// `trim_text`: whitespace around text is removed and whitespace-only text is dropped.
///
/// `require_decl`: return an error if the document doesn't start with an XML declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    pub empty_text_node: bool,
    pub trim_text: bool,
    pub require_decl: bool,
}

impl Default for ReadOptions {
    fn default() -> ReadOptions {
        ReadOptions {
            empty_text_node: true,
            trim_text: true,
            require_decl: false,
        }
    }
}

/// Figure out the document encoding from the BOM, the first bytes, or the declaration.
/// Returns the encoding and the length of the BOM to skip.
fn sniff_encoding(bytes: &[u8]) -> Result<(&'static Encoding, usize)> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return Ok((encoding, bom_len));
    }
    match bytes {
        [0x00, 0x3c, 0x00, 0x3f, ..] => return Ok((UTF_16BE, 0)),
        [0x3c, 0x00, 0x3f, 0x00, ..] => return Ok((UTF_16LE, 0)),
        _ => {}
    }
    let label = match declared_encoding(bytes)? {
        Some(label) => label,
        None => return Ok((UTF_8, 0)),
    };
    let encoding = Encoding::for_label(label.as_bytes()).ok_or(Error::CannotDecode)?;
    // A UTF-16 label on ascii-compatible bytes can't be right, the bytes decide.
    if encoding == UTF_16LE || encoding == UTF_16BE {
        return Ok((UTF_8, 0));
    }
    Ok((encoding, 0))
}

// The encoding label of the XML declaration, read from an ascii compatible prefix.
fn declared_encoding(bytes: &[u8]) -> Result<Option<String>> {
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::with_capacity(100);
    let ev = match reader.read_event(&mut buf) {
        Ok(Event::Decl(ev)) => ev,
        _ => return Ok(None),
    };
    match ev.encoding() {
        Some(res) => Ok(Some(String::from_utf8(res?.to_vec())?)),
        None => Ok(None),
    }
}

fn decode(bytes: &[u8]) -> Result<Cow<str>> {
    let (encoding, bom_len) = sniff_encoding(bytes)?;
    log::trace!("decoding xml as {}", encoding.name());
    encoding
        .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
        .ok_or(Error::CannotDecode)
}

pub(crate) struct DocumentParser {
    doc: Document,
    read_opts: ReadOptions,
    element_stack: Vec<Element>,
}

impl DocumentParser {
    pub(crate) fn parse_reader<R: Read>(mut reader: R, opts: ReadOptions) -> Result<Document> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let text = decode(&bytes)?;
        let doc = Document::new();
        let container = doc.container();
        let mut parser = DocumentParser {
            doc,
            read_opts: opts,
            element_stack: vec![container],
        };
        parser.parse_content(&text)?;
        Ok(parser.doc)
    }

    fn handle_decl(&mut self, ev: &BytesDecl) -> Result<()> {
        self.doc.version = String::from_utf8(ev.version()?.to_vec())?;
        self.doc.standalone = match ev.standalone() {
            Some(res) => {
                let val = std::str::from_utf8(&*res?)?.to_lowercase();
                if val == "yes" {
                    true
                } else if val == "no" {
                    false
                } else {
                    return Err(Error::MalformedXML(
                        "Standalone Document Declaration has non boolean value".to_string(),
                    ));
                }
            }
            None => false,
        };
        Ok(())
    }

    fn current(&self) -> Result<Element> {
        self.element_stack
            .last()
            .copied()
            .ok_or_else(|| Error::MalformedXML("Invalid parser state".to_string()))
    }

    fn handle_bytes_start(&mut self, ev: &BytesStart) -> Result<Element> {
        let full_name = String::from_utf8(ev.name().to_vec())?;
        let mut attributes = HashMap::new();
        let mut namespaces = HashMap::new();
        for attr in ev.attributes() {
            let attr = attr?;
            let key = String::from_utf8(attr.key.to_vec())?;
            let value = String::from_utf8(attr.unescaped_value()?.to_vec())?;
            if key == "xmlns" {
                namespaces.insert(String::new(), value);
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                namespaces.insert(prefix.to_owned(), value);
            } else {
                attributes.insert(key, value);
            }
        }
        let element = Element::with_data(&mut self.doc, full_name, attributes, namespaces);
        let parent = self.current()?;
        parent.push_child(&mut self.doc, Node::Element(element))?;
        Ok(element)
    }

    fn push_node(&mut self, node: Node) -> Result<()> {
        let parent = self.current()?;
        parent.push_child(&mut self.doc, node)
    }

    // Returns if document parsing is finished.
    fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Start(ref ev) => {
                let element = self.handle_bytes_start(ev)?;
                self.element_stack.push(element);
            }
            Event::End(_) => {
                // quick-xml checks if tag names match, but not a stray closing tag
                if self.element_stack.len() < 2 {
                    return Err(Error::MalformedXML(
                        "Closing tag without an opening tag".to_string(),
                    ));
                }
                let elem = self.current()?;
                self.element_stack.pop();
                // distinguish <tag></tag> and <tag />
                if self.read_opts.empty_text_node && !elem.has_children(&self.doc) {
                    elem.push_child(&mut self.doc, Node::Text(String::new()))?;
                }
            }
            Event::Empty(ref ev) => {
                self.handle_bytes_start(ev)?;
            }
            Event::Text(ev) => {
                let content = String::from_utf8(ev.unescaped()?.to_vec())?;
                self.push_node(Node::Text(content))?;
            }
            Event::DocType(ev) => {
                let content = String::from_utf8(ev.to_vec())?;
                self.push_node(Node::DocType(content))?;
            }
            // Comment, CData, and PI content is not escaped.
            Event::Comment(ev) => {
                let content = String::from_utf8(ev.to_vec())?;
                self.push_node(Node::Comment(content))?;
            }
            Event::CData(ev) => {
                let content = String::from_utf8(ev.to_vec())?;
                self.push_node(Node::CData(content))?;
            }
            Event::PI(ev) => {
                let content = String::from_utf8(ev.to_vec())?;
                self.push_node(Node::PI(content))?;
            }
            Event::Decl(ev) => {
                self.handle_decl(&ev)?;
            }
            Event::Eof => {
                if self.element_stack.len() > 1 {
                    return Err(Error::MalformedXML(format!(
                        "Unclosed tag <{}>",
                        self.current()?.full_name(&self.doc)
                    )));
                }
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn parse_content(&mut self, text: &str) -> Result<()> {
        let mut reader = Reader::from_str(text);
        reader.trim_text(self.read_opts.trim_text);
        let mut buf = Vec::with_capacity(200); // reduce time increasing capacity at start.
        let mut first = true;
        loop {
            let ev = reader.read_event(&mut buf)?;
            log::trace!("{:?}", ev);
            if first {
                first = false;
                if self.read_opts.require_decl && !matches!(ev, Event::Decl(_)) {
                    return Err(Error::MalformedXML(
                        "Didn't find XML Declaration at the start of file".to_string(),
                    ));
                }
            }
            if self.handle_event(ev)? {
                return Ok(());
            }
            buf.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_encoding() {
        let label = |bytes: &[u8]| declared_encoding(bytes).unwrap();
        assert_eq!(
            label(br#"<?xml version="1.0" encoding="ISO-8859-1"?><a/>"#).as_deref(),
            Some("ISO-8859-1")
        );
        assert_eq!(
            label(b"<?xml version='1.0' encoding='UTF-8'?>").as_deref(),
            Some("UTF-8")
        );
        assert_eq!(label(br#"<?xml version="1.0"?>"#), None);
        assert_eq!(label(b"<a/>"), None);
    }

    #[test]
    fn test_decode_latin1() {
        let mut bytes = br#"<?xml version="1.0" encoding="ISO-8859-1"?><a:t>"#.to_vec();
        bytes.push(0xe9); // é
        bytes.extend_from_slice(b"</a:t>");
        let doc = DocumentParser::parse_reader(&bytes[..], ReadOptions::default()).unwrap();
        let t = doc.root_element().unwrap();
        assert_eq!(t.text_content(&doc), "\u{e9}");
    }

    #[test]
    fn test_decode_utf16_bom() {
        let xml = "<?xml version=\"1.0\" encoding=\"UTF-16\"?><c:v>7</c:v>";
        let mut bytes = vec![0xff, 0xfe];
        for unit in xml.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let doc = DocumentParser::parse_reader(&bytes[..], ReadOptions::default()).unwrap();
        assert_eq!(doc.root_element().unwrap().text_content(&doc), "7");
    }

    #[test]
    fn test_unknown_encoding() {
        let xml = br#"<?xml version="1.0" encoding="no-such-thing"?><a/>"#;
        let err = DocumentParser::parse_reader(&xml[..], ReadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::CannotDecode));
    }
}
