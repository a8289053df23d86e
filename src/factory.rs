//! Minimal first instances of known OOXML elements.
//!
//! When a modification addresses a tag that doesn't exist at all under its root,
//! there is nothing to clone from. The kinds here know how to build a schema valid
//! element from scratch and where to put it among the parent's children.

use crate::document::{Document, Node};
use crate::element::{Element, ElementBuilder};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorderSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl BorderSide {
    pub fn tag(&self) -> &'static str {
        match self {
            BorderSide::Left => "a:lnL",
            BorderSide::Right => "a:lnR",
            BorderSide::Top => "a:lnT",
            BorderSide::Bottom => "a:lnB",
        }
    }
}

/// Element kinds that can be created without a model to clone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// `a:t`, created inside a new text run `a:r`.
    Text,
    /// `c:dPt`, a chart data point.
    DataPoint,
    /// `c:spPr`, shape properties with a solid fill.
    ShapeProperties,
    /// `c:dLbl`, a chart data point label.
    DataPointLabel,
    /// `a:lnL`, `a:lnR`, `a:lnT` or `a:lnB`, a table cell border.
    TableCellBorder(BorderSide),
}

// Children of c:ser that come after the data points.
const AFTER_DATA_POINTS: &[&str] = &[
    "c:dLbls",
    "c:trendline",
    "c:errBars",
    "c:cat",
    "c:val",
    "c:xVal",
    "c:yVal",
    "c:smooth",
    "c:extLst",
];

// Children that come before shape properties in c:ser, c:dPt and friends.
const BEFORE_SHAPE_PROPERTIES: &[&str] = &[
    "c:idx",
    "c:order",
    "c:tx",
    "c:invertIfNegative",
    "c:bubble3D",
    "c:explosion",
];

// Children of a:tcPr in schema order.
const CELL_PROPERTIES_ORDER: &[&str] = &[
    "a:lnL",
    "a:lnR",
    "a:lnT",
    "a:lnB",
    "a:lnTlToBr",
    "a:lnBlToTr",
    "a:cell3D",
    "a:noFill",
    "a:solidFill",
    "a:gradFill",
    "a:blipFill",
    "a:pattFill",
    "a:grpFill",
    "a:headers",
    "a:extLst",
];

impl ElementKind {
    /// `None` for tags without a creation recipe.
    pub fn from_tag(tag: &str) -> Option<ElementKind> {
        let kind = match tag {
            "a:t" => ElementKind::Text,
            "c:dPt" => ElementKind::DataPoint,
            "c:spPr" => ElementKind::ShapeProperties,
            "c:dLbl" => ElementKind::DataPointLabel,
            "a:lnL" => ElementKind::TableCellBorder(BorderSide::Left),
            "a:lnR" => ElementKind::TableCellBorder(BorderSide::Right),
            "a:lnT" => ElementKind::TableCellBorder(BorderSide::Top),
            "a:lnB" => ElementKind::TableCellBorder(BorderSide::Bottom),
            _ => return None,
        };
        Some(kind)
    }

    pub fn tag(&self) -> &'static str {
        match self {
            ElementKind::Text => "a:t",
            ElementKind::DataPoint => "c:dPt",
            ElementKind::ShapeProperties => "c:spPr",
            ElementKind::DataPointLabel => "c:dLbl",
            ElementKind::TableCellBorder(side) => side.tag(),
        }
    }

    /// Create a minimal instance under `parent`. Returns the element with this kind's tag,
    /// which may sit below a wrapper (`a:t` inside `a:r`, `c:dLbl` inside `c:dLbls`).
    pub fn create(&self, doc: &mut Document, parent: Element) -> Result<Element> {
        match self {
            ElementKind::Text => {
                let run = text_run().finish(doc);
                if let Some(end) = parent.find(doc, "a:endParaRPr") {
                    end.insert_before(doc, run)?;
                } else if let Some(props) = parent.find(doc, "a:pPr") {
                    props.insert_after(doc, run)?;
                } else {
                    parent.push_child(doc, Node::Element(run))?;
                }
                text_of_run(doc, run)
            }
            ElementKind::DataPoint => {
                let point = data_point().finish(doc);
                insert_before_any(doc, parent, point, AFTER_DATA_POINTS)?;
                Ok(point)
            }
            ElementKind::ShapeProperties => {
                let props = shape_properties().finish(doc);
                insert_after_last(doc, parent, props, BEFORE_SHAPE_PROPERTIES)?;
                Ok(props)
            }
            ElementKind::DataPointLabel => {
                let labels = if parent.full_name(doc) == "c:dLbls" {
                    parent
                } else {
                    match parent.find(doc, "c:dLbls") {
                        Some(labels) => labels,
                        None => {
                            let labels = Element::new(doc, "c:dLbls");
                            insert_before_any(doc, parent, labels, &AFTER_DATA_POINTS[1..])?;
                            labels
                        }
                    }
                };
                let label = data_point_label().finish(doc);
                labels.insert_child(doc, 0, Node::Element(label))?;
                Ok(label)
            }
            ElementKind::TableCellBorder(side) => {
                let border = cell_border(side.tag()).finish(doc);
                let pos = CELL_PROPERTIES_ORDER
                    .iter()
                    .position(|t| *t == side.tag())
                    .unwrap_or(0);
                insert_before_any(doc, parent, border, &CELL_PROPERTIES_ORDER[pos + 1..])?;
                Ok(border)
            }
        }
    }
}

/// Create a minimal `tag` element under `parent`.
/// Returns `Ok(None)` when there is no recipe for `tag`.
pub fn create_element(doc: &mut Document, parent: Element, tag: &str) -> Result<Option<Element>> {
    match ElementKind::from_tag(tag) {
        Some(kind) => kind.create(doc, parent).map(Some),
        None => Ok(None),
    }
}

fn text_of_run(doc: &Document, wrapper: Element) -> Result<Element> {
    wrapper
        .child_elements(doc)
        .iter()
        .copied()
        .find(|e| e.full_name(doc) == "a:t")
        .ok_or(Error::NotFound)
}

// Insert before the first child of `parent` named in `successors`, else append.
fn insert_before_any(
    doc: &mut Document,
    parent: Element,
    element: Element,
    successors: &[&str],
) -> Result<()> {
    let next = parent
        .child_elements(doc)
        .into_iter()
        .find(|e| successors.iter().any(|t| *t == e.full_name(doc)));
    match next {
        Some(next) => next.insert_before(doc, element),
        None => parent.push_child(doc, Node::Element(element)),
    }
}

// Insert after the last child of `parent` named in `predecessors`, else as first child.
fn insert_after_last(
    doc: &mut Document,
    parent: Element,
    element: Element,
    predecessors: &[&str],
) -> Result<()> {
    let prev = parent
        .child_elements(doc)
        .into_iter()
        .filter(|e| predecessors.iter().any(|t| *t == e.full_name(doc)))
        .last();
    match prev {
        Some(prev) => prev.insert_after(doc, element),
        None => parent.insert_child(doc, 0, Node::Element(element)),
    }
}

fn val<S: Into<String>>(tag: &str, value: S) -> ElementBuilder {
    Element::build(tag).attribute("val", value)
}

fn text_run() -> ElementBuilder {
    Element::build("a:r")
        .child(
            Element::build("a:rPr")
                .attribute("lang", "en-US")
                .attribute("dirty", "0"),
        )
        .child(Element::build("a:t").text_content(""))
}

fn solid_fill(color: ElementBuilder) -> ElementBuilder {
    Element::build("a:solidFill").child(color)
}

fn shape_properties() -> ElementBuilder {
    Element::build("c:spPr").child(solid_fill(val("a:schemeClr", "accent1")))
}

fn data_point() -> ElementBuilder {
    Element::build("c:dPt")
        .child(val("c:idx", "0"))
        .child(val("c:invertIfNegative", "0"))
        .child(val("c:bubble3D", "0"))
        .child(shape_properties())
}

fn data_point_label() -> ElementBuilder {
    Element::build("c:dLbl")
        .child(val("c:idx", "0"))
        .child(Element::build("c:spPr"))
        .child(val("c:showLegendKey", "0"))
        .child(val("c:showVal", "1"))
        .child(val("c:showCatName", "0"))
        .child(val("c:showSerName", "0"))
        .child(val("c:showPercent", "0"))
        .child(val("c:showBubbleSize", "0"))
}

fn cell_border(tag: &str) -> ElementBuilder {
    let line_end = |tag: &str| {
        Element::build(tag)
            .attribute("type", "none")
            .attribute("w", "med")
            .attribute("len", "med")
    };
    Element::build(tag)
        .attribute("w", "12700")
        .attribute("cap", "flat")
        .attribute("cmpd", "sng")
        .attribute("algn", "ctr")
        .child(solid_fill(val("a:srgbClr", "000000")))
        .child(val("a:prstDash", "solid"))
        .child(Element::build("a:round"))
        .child(line_end("a:headEnd"))
        .child(line_end("a:tailEnd"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> (Document, Element) {
        let doc = Document::parse_str(xml).unwrap();
        let root = doc.root_element().unwrap();
        (doc, root)
    }

    fn child_names(doc: &Document, element: Element) -> Vec<String> {
        element
            .child_elements(doc)
            .iter()
            .map(|e| e.full_name(doc).to_string())
            .collect()
    }

    #[test]
    fn test_unknown_tag() {
        let (mut doc, root) = parse("<c:ser />");
        assert_eq!(ElementKind::from_tag("c:foo"), None);
        assert_eq!(create_element(&mut doc, root, "c:foo").unwrap(), None);
        assert!(!root.has_children(&doc));
    }

    #[test]
    fn test_tag_round_trip() {
        for tag in &["a:t", "c:dPt", "c:spPr", "c:dLbl", "a:lnL", "a:lnR", "a:lnT", "a:lnB"] {
            assert_eq!(ElementKind::from_tag(tag).unwrap().tag(), *tag);
        }
    }

    #[test]
    fn test_text_run_placement() {
        let (mut doc, p) = parse(r#"<a:p><a:pPr algn="ctr" /><a:endParaRPr lang="en-US" /></a:p>"#);
        let t = create_element(&mut doc, p, "a:t").unwrap().unwrap();
        assert_eq!(t.full_name(&doc), "a:t");
        assert_eq!(child_names(&doc, p), vec!["a:pPr", "a:r", "a:endParaRPr"]);
        assert_eq!(p.elements_by_tag(&doc, "a:t"), vec![t]);

        let (mut doc, p) = parse(r#"<a:p><a:pPr /></a:p>"#);
        create_element(&mut doc, p, "a:t").unwrap();
        assert_eq!(child_names(&doc, p), vec!["a:pPr", "a:r"]);
    }

    #[test]
    fn test_data_point_placement() {
        let (mut doc, ser) = parse(r#"<c:ser><c:idx val="0" /><c:order val="0" /><c:cat /><c:val /></c:ser>"#);
        let dpt = create_element(&mut doc, ser, "c:dPt").unwrap().unwrap();
        assert_eq!(child_names(&doc, ser), vec!["c:idx", "c:order", "c:dPt", "c:cat", "c:val"]);
        assert_eq!(
            child_names(&doc, dpt),
            vec!["c:idx", "c:invertIfNegative", "c:bubble3D", "c:spPr"]
        );
    }

    #[test]
    fn test_shape_properties_placement() {
        let (mut doc, ser) = parse(r#"<c:ser><c:idx val="0" /><c:tx /><c:val /></c:ser>"#);
        create_element(&mut doc, ser, "c:spPr").unwrap();
        assert_eq!(child_names(&doc, ser), vec!["c:idx", "c:tx", "c:spPr", "c:val"]);

        let (mut doc, dlbl) = parse(r#"<c:dLbl><c:showVal val="1" /></c:dLbl>"#);
        create_element(&mut doc, dlbl, "c:spPr").unwrap();
        assert_eq!(child_names(&doc, dlbl), vec!["c:spPr", "c:showVal"]);
    }

    #[test]
    fn test_data_point_label_placement() {
        let (mut doc, ser) = parse(r#"<c:ser><c:dPt /><c:cat /></c:ser>"#);
        let label = create_element(&mut doc, ser, "c:dLbl").unwrap().unwrap();
        assert_eq!(child_names(&doc, ser), vec!["c:dPt", "c:dLbls", "c:cat"]);
        let labels = ser.find(&doc, "c:dLbls").unwrap();
        assert_eq!(label.parent(&doc), Some(labels));

        let (mut doc, labels) = parse(r#"<c:dLbls><c:showVal val="1" /></c:dLbls>"#);
        create_element(&mut doc, labels, "c:dLbl").unwrap();
        assert_eq!(child_names(&doc, labels), vec!["c:dLbl", "c:showVal"]);
    }

    #[test]
    fn test_border_order() {
        let (mut doc, tc_pr) = parse(r#"<a:tcPr><a:solidFill /></a:tcPr>"#);
        for tag in &["a:lnB", "a:lnL", "a:lnT", "a:lnR"] {
            create_element(&mut doc, tc_pr, tag).unwrap();
        }
        assert_eq!(
            child_names(&doc, tc_pr),
            vec!["a:lnL", "a:lnR", "a:lnT", "a:lnB", "a:solidFill"]
        );
        let left = tc_pr.find(&doc, "a:lnL").unwrap();
        assert_eq!(left.attribute(&doc, "w"), Some("12700"));
        assert_eq!(
            left.elements_by_tag(&doc, "a:srgbClr")[0].attribute(&doc, "val"),
            Some("000000")
        );
    }
}
