use xml_modify::{Document, Element, Node, WriteOptions};

#[test]
fn test_escape() {
    let expected = concat!(
        r#"<?xml version="1.0" encoding="UTF-8"?>"#,
        r#"<root attr="&gt;&lt;&amp;&quot;&apos;attrval">"#,
        r#"<inner xmlns:ns="&gt;&lt;&amp;&quot;&apos;nsval">&gt;&lt;&amp;&quot;&apos;text</inner>"#,
        r#"</root><!--<&amp;--><![CDATA[<&amp;]]><?<&amp;?>"#,
    );
    let mut doc = Document::new();
    let container = doc.container();
    let root = Element::build("root")
        .attribute("attr", "><&\"'attrval")
        .push_to(&mut doc, container);
    Element::build("inner")
        .namespace_decl("ns", "><&\"'nsval")
        .text_content("><&\"'text")
        .push_to(&mut doc, root);
    doc.push_root_node(Node::Comment("<&amp;".to_string()))
        .unwrap();
    doc.push_root_node(Node::CData("<&amp;".to_string()))
        .unwrap();
    doc.push_root_node(Node::PI("<&amp;".to_string())).unwrap();
    let xml = doc.write_str().unwrap();

    assert_eq!(xml, expected);
}

#[test]
fn test_indent() {
    let doc = Document::parse_str("<p><a/></p>").unwrap();
    let opts = WriteOptions {
        indent: Some((b' ', 2)),
        write_decl: false,
    };
    assert_eq!(doc.write_str_with_opts(&opts).unwrap(), "<p>\n  <a/>\n</p>");
}

#[test]
fn test_write_after_modification_compact() {
    let mut doc = Document::parse_str(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:tcPr>
    <a:lnL w="12700" cmpd="sng" />
</a:tcPr>"#,
    )
    .unwrap();
    let tc_pr = doc.root_element().unwrap();
    let left = tc_pr.find(&doc, "a:lnL").unwrap();
    let copy = left.deep_clone(&mut doc);
    copy.set_attribute(&mut doc, "w", "6350");
    left.insert_after(&mut doc, copy).unwrap();
    assert_eq!(
        doc.write_str().unwrap(),
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><a:tcPr><a:lnL cmpd="sng" w="12700"/><a:lnL cmpd="sng" w="6350"/></a:tcPr>"#
    );
}
