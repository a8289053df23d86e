use xml_modify::{Document, Error, Node, ReadOptions};

#[test]
fn test_closing_tag_mismatch_err() {
    // no closing tag
    let xml = "<img>";
    let opts = ReadOptions::default();
    let doc = Document::parse_str_with_opts(xml, opts.clone());
    assert!(matches!(doc.unwrap_err(), Error::MalformedXML(_)));

    // closing tag mismatch
    let xml = "<a><img>Te</a>xt</img>";
    let doc = Document::parse_str_with_opts(xml, opts.clone());
    assert!(matches!(doc.unwrap_err(), Error::MalformedXML(_)));

    // no opening tag
    let xml = "</abc>";
    let doc = Document::parse_str_with_opts(xml, opts.clone());
    assert!(matches!(doc.unwrap_err(), Error::MalformedXML(_)));
}

#[test]
fn test_require_decl() {
    let mut opts = ReadOptions::default();
    opts.require_decl = true;
    let doc = Document::parse_str_with_opts("<c:chartSpace />", opts.clone());
    assert!(matches!(doc.unwrap_err(), Error::MalformedXML(_)));

    let doc = Document::parse_str_with_opts(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><c:chartSpace />"#,
        opts,
    )
    .unwrap();
    assert!(doc.standalone());
}

#[test]
fn test_empty_text_node() {
    let xml = "<p><a:t></a:t><a:t/></p>";
    let doc = Document::parse_str(xml).unwrap();
    let ts = doc.root_element().unwrap().child_elements(&doc);
    assert_eq!(ts[0].children(&doc), &vec![Node::Text(String::new())]);
    assert!(ts[1].children(&doc).is_empty());

    let mut opts = ReadOptions::default();
    opts.empty_text_node = false;
    let doc = Document::parse_str_with_opts(xml, opts).unwrap();
    let ts = doc.root_element().unwrap().child_elements(&doc);
    assert!(ts[0].children(&doc).is_empty());
}

#[test]
fn test_keep_whitespace() {
    let xml = "<a:p><a:r><a:t> </a:t></a:r>\n</a:p>";
    let mut opts = ReadOptions::default();
    opts.trim_text = false;
    let doc = Document::parse_str_with_opts(xml, opts).unwrap();
    let p = doc.root_element().unwrap();
    let t = p.elements_by_tag(&doc, "a:t")[0];
    assert_eq!(t.text_content(&doc), " ");
    assert_eq!(p.children(&doc).len(), 2);
}

#[test]
fn test_entities_unescaped() {
    let doc = Document::parse_str(r#"<a:t attr="&lt;&quot;">Q&amp;A</a:t>"#).unwrap();
    let t = doc.root_element().unwrap();
    assert_eq!(t.text_content(&doc), "Q&A");
    assert_eq!(t.attribute(&doc, "attr"), Some("<\""));
}

#[test]
fn test_namespace_decls() {
    let xml = r#"<c:chartSpace xmlns:c="urn:chart" xmlns="urn:default" r:id="rId1" />"#;
    let doc = Document::parse_str(xml).unwrap();
    let root = doc.root_element().unwrap();
    assert_eq!(root.namespace_decls(&doc).get("c").unwrap(), "urn:chart");
    assert_eq!(root.namespace_decls(&doc).get("").unwrap(), "urn:default");
    assert_eq!(root.attributes(&doc).len(), 1);
    assert_eq!(root.attribute(&doc, "r:id"), Some("rId1"));
}
