//! Cursor navigation over graphs produced by the reader adapter, plus
//! re-encoding a navigated graph through the tree converter.

use oxirs_xml::graph::MemoryGraph;
use oxirs_xml::infoset::XmlNodeKind;
use oxirs_xml::navigator::RdfXmlNavigator;
use oxirs_xml::reader::XmlReaderConverter;
use oxirs_xml::sink::write_xml_string;
use oxirs_xml::tree::XmlTreeConverter;
use oxirs_xml::Term;

const BASE: &str = "http://ex/";

fn parse(xml: &str) -> (MemoryGraph, Term) {
    let mut graph = MemoryGraph::new();
    let doc = XmlReaderConverter::new()
        .with_base_uri(BASE)
        .convert_str(xml, &mut graph)
        .unwrap();
    (graph, doc)
}

#[test]
fn test_navigate_parsed_document() {
    let (graph, doc) = parse("<a xmlns=\"urn:ex:\"><b id=\"x\">hi</b></a>");
    let mut nav = RdfXmlNavigator::new(&graph, doc);

    assert!(nav.move_to_first_child());
    assert_eq!(nav.node_kind(), XmlNodeKind::Element);
    let name = nav.name().unwrap();
    assert_eq!(name.local_name, "a");
    assert_eq!(name.namespace, "urn:ex:");

    assert!(nav.move_to_first_child());
    assert_eq!(nav.name().unwrap().local_name, "b");

    assert!(nav.move_to_first_attribute());
    assert_eq!(nav.node_kind(), XmlNodeKind::Attribute);
    assert_eq!(nav.name().unwrap().local_name, "id");
    assert_eq!(nav.value().as_deref(), Some("x"));
    assert!(!nav.move_to_next_attribute());
    assert!(nav.move_to_parent());

    assert!(nav.move_to_first_child());
    assert_eq!(nav.node_kind(), XmlNodeKind::Text);
    assert_eq!(nav.value().as_deref(), Some("hi"));
}

#[test]
fn test_move_to_identified_element() {
    let (graph, doc) = parse("<a xmlns=\"urn:ex:\"><b id=\"x\">hi</b></a>");
    let mut nav = RdfXmlNavigator::new(&graph, doc);
    assert!(nav.move_to_id("x"));
    assert_eq!(
        nav.underlying_node().and_then(|t| t.as_named()).map(|n| n.as_str()),
        Some("http://ex/#x")
    );
    assert!(!nav.move_to_id("missing"));
}

#[test]
fn test_declared_prefix_lookup() {
    let (graph, doc) = parse("<p:a xmlns:p=\"urn:ex:\">hi</p:a>");
    let nav = RdfXmlNavigator::new(&graph, doc);
    assert_eq!(nav.lookup_namespace("p").as_deref(), Some("urn:ex:"));
    assert_eq!(nav.lookup_prefix("urn:ex:").as_deref(), Some("p"));
}

#[test]
fn test_document_type_reconstruction() {
    let (graph, doc) = parse(
        "<!DOCTYPE a PUBLIC \"-//EX//DTD Test//EN\" \"http://ex/test.dtd\">\
         <a xmlns=\"urn:ex:\">hi</a>",
    );
    let nav = RdfXmlNavigator::new(&graph, doc);
    let decl = nav.document_type().unwrap();
    assert_eq!(decl.name, "a");
    assert_eq!(decl.public_id.as_deref(), Some("-//EX//DTD Test//EN"));
    assert_eq!(decl.system_id.as_deref(), Some("http://ex/test.dtd"));
}

#[test]
fn test_reencode_navigated_graph() {
    let xml =
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><a xmlns=\"urn:ex:\"><b id=\"x\">hi</b></a>";
    let (graph, doc) = parse(xml);
    let nav = RdfXmlNavigator::new(&graph, doc);

    let mut reencoded = MemoryGraph::new();
    let doc2 = XmlTreeConverter::new()
        .convert(&nav, &mut reencoded)
        .unwrap()
        .unwrap();
    assert_eq!(write_xml_string(&reencoded, &doc2).unwrap(), xml);
}
