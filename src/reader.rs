//! Streaming XML front end over `quick-xml`
//!
//! [`XmlReaderConverter`] tokenizes a document and drives
//! [`XmlToRdfProcessor`] event by event, tracking namespace declarations,
//! `xml:lang` and `xml:space` scopes itself since the plain tokenizer does
//! not. Namespace declarations are also passed through as ordinary
//! attributes under the `xmlns` namespace, so they re-emerge on decoding.
//!
//! Entity references the tokenizer cannot expand are preserved as
//! `rdf:XMLLiteral` values through
//! [`process_entity_reference`](XmlToRdfProcessor::process_entity_reference).

use crate::encoder::{ElementEvent, NodeContent, XmlToRdfOptions, XmlToRdfProcessor};
use crate::graph::GraphSink;
use crate::infoset::{is_xml_whitespace, AttributeNode, DocumentTypeDecl, QualifiedName};
use crate::model::Term;
use crate::vocab::{XMLNS_NAMESPACE, XML_NAMESPACE};
use crate::{Result, XmlRdfError};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::Read;
use tracing::debug;

/// Namespace of W3C schema datatypes in their unfragmented, composable form
const SCHEMA_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// Converts XML markup into structural-graph statements
#[derive(Debug, Clone, Default)]
pub struct XmlReaderConverter {
    base_uri: Option<String>,
    options: XmlToRdfOptions,
}

impl XmlReaderConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Base URI the document node and all composed identifiers derive from
    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = Some(base_uri.into());
        self
    }

    pub fn with_options(mut self, options: XmlToRdfOptions) -> Self {
        self.options = options;
        self
    }

    /// Convert a complete document held in a string
    pub fn convert_str<S: GraphSink>(&self, xml: &str, sink: &mut S) -> Result<Term> {
        debug!(base_uri = ?self.base_uri, "converting XML document");
        let mut processor = XmlToRdfProcessor::new(sink, self.options.clone())?;
        let mut driver = ReaderDriver {
            reader: Reader::from_str(xml),
            pending: None,
            scopes: vec![Scope::default()],
            base_uri: self.base_uri.clone(),
        };
        let mut content = ReaderContent {
            driver: &mut driver,
            default_namespace: None,
            after_reference: false,
            done: false,
        };
        let result = processor.process_document(self.base_uri.as_deref(), &mut content);
        let ended = processor.finish(result.is_ok());
        let node = result?;
        ended?;
        Ok(node)
    }

    /// Convert a complete document read from an IO source
    pub fn convert_reader<R: Read, S: GraphSink>(&self, mut input: R, sink: &mut S) -> Result<Term> {
        let mut xml = String::new();
        input.read_to_string(&mut xml)?;
        self.convert_str(&xml, sink)
    }
}

/// One element's contribution to the in-scope state
#[derive(Debug, Default)]
struct Scope {
    bindings: Vec<(String, String)>,
    language: Option<String>,
    preserve_space: Option<bool>,
}

struct ReaderDriver<'i> {
    reader: Reader<&'i [u8]>,
    pending: Option<Event<'i>>,
    scopes: Vec<Scope>,
    base_uri: Option<String>,
}

impl<'i> ReaderDriver<'i> {
    /// Pull the next event, consuming a buffered lookahead first
    fn next_event(&mut self) -> Result<Event<'i>> {
        match self.pending.take() {
            Some(event) => Ok(event),
            None => Ok(self.reader.read_event().map_err(quick_xml::Error::from)?),
        }
    }

    /// Whether the upcoming event is a general reference, without
    /// consuming it
    fn peek_is_reference(&mut self) -> Result<bool> {
        if self.pending.is_none() {
            self.pending = Some(self.reader.read_event().map_err(quick_xml::Error::from)?);
        }
        Ok(matches!(self.pending, Some(Event::GeneralRef(_))))
    }

    /// The namespace bound to a prefix, innermost declaration first; an
    /// empty rebinding undeclares
    fn namespace_of(&self, prefix: &str) -> Option<String> {
        if prefix == "xml" {
            return Some(XML_NAMESPACE.to_string());
        }
        for scope in self.scopes.iter().rev() {
            for (declared, namespace) in scope.bindings.iter().rev() {
                if declared == prefix {
                    return (!namespace.is_empty()).then(|| namespace.clone());
                }
            }
        }
        None
    }

    fn language(&self) -> Option<String> {
        self.scopes.iter().rev().find_map(|s| s.language.clone())
    }

    fn preserve_space(&self) -> bool {
        self.scopes
            .iter()
            .rev()
            .find_map(|s| s.preserve_space)
            .unwrap_or(false)
    }

    /// Flattened copy of the in-scope bindings, usable as a
    /// [`NamespaceResolver`](crate::encoder::NamespaceResolver)
    fn resolver_snapshot(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("xml".to_string(), XML_NAMESPACE.to_string());
        for scope in &self.scopes {
            for (prefix, namespace) in &scope.bindings {
                if namespace.is_empty() {
                    map.remove(prefix);
                } else {
                    map.insert(prefix.clone(), namespace.clone());
                }
            }
        }
        map
    }
}

/// Child supplier pulling from the shared tokenizer
struct ReaderContent<'d, 'i> {
    driver: &'d mut ReaderDriver<'i>,
    default_namespace: Option<Term>,
    after_reference: bool,
    done: bool,
}

impl<S: GraphSink> NodeContent<S> for ReaderContent<'_, '_> {
    fn next_child(
        &mut self,
        processor: &mut XmlToRdfProcessor<'_, S>,
        base_node: &Term,
    ) -> Result<Option<Option<Term>>> {
        if self.done {
            return Ok(None);
        }
        loop {
            let event = self.driver.next_event()?;
            let after_reference = std::mem::replace(
                &mut self.after_reference,
                matches!(event, Event::GeneralRef(_)),
            );
            match event {
                Event::Decl(_) => continue,
                Event::DocType(text) => {
                    let decl = parse_doctype(&String::from_utf8_lossy(&text));
                    let namespace_eligible = decl
                        .internal_subset
                        .as_deref()
                        .map_or(true, |s| s.trim().is_empty());
                    processor.process_document_type(
                        decl.public_id.as_deref(),
                        decl.system_id.as_deref(),
                        decl.internal_subset.as_deref(),
                        namespace_eligible,
                        base_node,
                        &mut self.default_namespace,
                    )?;
                    continue;
                }
                Event::Start(start) => {
                    let node = self.convert_element(processor, &start, false, base_node)?;
                    return Ok(Some(Some(node)));
                }
                Event::Empty(start) => {
                    let node = self.convert_element(processor, &start, true, base_node)?;
                    return Ok(Some(Some(node)));
                }
                Event::Text(text) => {
                    let value = text.decode().map_err(quick_xml::Error::from)?;
                    if value.is_empty() {
                        continue;
                    }
                    let language = self.driver.language();
                    // Whitespace split off a text run by an adjacent
                    // reference is content, not an ignorable whitespace node
                    if is_xml_whitespace(&value)
                        && !after_reference
                        && !self.driver.peek_is_reference()?
                    {
                        let node = processor.process_whitespace(
                            &value,
                            language.as_deref(),
                            self.driver.preserve_space(),
                        )?;
                        return Ok(Some(node));
                    }
                    let node = processor.process_text(&value, language.as_deref(), false)?;
                    return Ok(Some(Some(node)));
                }
                Event::CData(data) => {
                    let value = String::from_utf8_lossy(&data).into_owned();
                    let language = self.driver.language();
                    let node = processor.process_text(&value, language.as_deref(), true)?;
                    return Ok(Some(Some(node)));
                }
                Event::Comment(text) => {
                    let value = String::from_utf8_lossy(&text).into_owned();
                    return Ok(Some(Some(processor.process_comment(&value)?)));
                }
                Event::PI(pi) => {
                    let target = String::from_utf8_lossy(pi.target()).into_owned();
                    // content() keeps the whitespace separating target and
                    // data, which the sink re-adds on output
                    let raw = String::from_utf8_lossy(pi.content());
                    let data = raw.trim_start_matches(['\t', '\n', '\r', ' ']);
                    let node = processor.process_processing_instruction(
                        &target,
                        data,
                        self.driver.base_uri.as_deref(),
                        &self.default_namespace,
                    )?;
                    return Ok(Some(Some(node)));
                }
                Event::GeneralRef(reference) => {
                    let language = self.driver.language();
                    if let Some(ch) = reference
                        .resolve_char_ref()
                        .map_err(quick_xml::Error::from)?
                    {
                        let node =
                            processor.process_text(&ch.to_string(), language.as_deref(), false)?;
                        return Ok(Some(Some(node)));
                    }
                    let name = String::from_utf8_lossy(&reference).into_owned();
                    let node = match predefined_entity(&name) {
                        Some(text) => processor.process_text(text, language.as_deref(), false)?,
                        None => processor.process_entity_reference(&name)?,
                    };
                    return Ok(Some(Some(node)));
                }
                Event::End(_) | Event::Eof => {
                    self.done = true;
                    return Ok(None);
                }
            }
        }
    }
}

impl ReaderContent<'_, '_> {
    fn convert_element<S: GraphSink>(
        &mut self,
        processor: &mut XmlToRdfProcessor<'_, S>,
        start: &BytesStart<'_>,
        is_empty: bool,
        base_node: &Term,
    ) -> Result<Term> {
        let mut scope = Scope::default();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(quick_xml::Error::from)?
                .into_owned();
            if key == "xmlns" {
                scope.bindings.push((String::new(), value));
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                scope.bindings.push((prefix.to_string(), value));
            } else if key == "xml:lang" {
                scope.language = Some(value);
            } else if key == "xml:space" {
                scope.preserve_space = Some(value == "preserve");
            }
        }
        self.driver.scopes.push(scope);

        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(quick_xml::Error::from)?
                .into_owned();
            let mut node = AttributeNode::new(self.attribute_name(&key)?, value);
            if node.name.namespace.is_empty() && node.name.local_name == "id" {
                // Unqualified id attributes address their element the way
                // DTD-declared ID attributes do
                node.declared_type = Some(QualifiedName::new("ID", SCHEMA_NAMESPACE, ""));
            }
            attributes.push(node);
        }

        let event = ElementEvent {
            name: self.element_name(start.name().as_ref())?,
            base_uri: self.driver.base_uri.clone(),
            language: self.driver.language(),
            is_empty,
            attributes,
        };
        let resolver = self.driver.resolver_snapshot();
        let original_base_uri = self.driver.base_uri.clone();
        let default_namespace = self.default_namespace.clone();

        let outcome = if is_empty {
            processor.process_element(
                &event,
                base_node,
                original_base_uri.as_deref(),
                &default_namespace,
                &resolver,
                &mut NoContent,
            )
        } else {
            let mut content = ReaderContent {
                driver: &mut *self.driver,
                default_namespace: default_namespace.clone(),
                after_reference: false,
                done: false,
            };
            processor.process_element(
                &event,
                base_node,
                original_base_uri.as_deref(),
                &default_namespace,
                &resolver,
                &mut content,
            )
        };
        self.driver.scopes.pop();
        outcome
    }

    fn element_name(&self, raw: &[u8]) -> Result<QualifiedName> {
        let name = String::from_utf8_lossy(raw).into_owned();
        match name.split_once(':') {
            Some((prefix, local)) => {
                let namespace = self.driver.namespace_of(prefix).ok_or_else(|| {
                    XmlRdfError::UnresolvableNamespace(prefix.to_string())
                })?;
                Ok(QualifiedName::new(local, namespace, prefix))
            }
            None => {
                let namespace = self.driver.namespace_of("").unwrap_or_default();
                Ok(QualifiedName::new(name, namespace, ""))
            }
        }
    }

    fn attribute_name(&self, key: &str) -> Result<QualifiedName> {
        if key == "xmlns" {
            return Ok(QualifiedName::new("xmlns", XMLNS_NAMESPACE, ""));
        }
        if let Some(prefix) = key.strip_prefix("xmlns:") {
            return Ok(QualifiedName::new(prefix, XMLNS_NAMESPACE, "xmlns"));
        }
        match key.split_once(':') {
            Some((prefix, local)) => {
                let namespace = self.driver.namespace_of(prefix).ok_or_else(|| {
                    XmlRdfError::UnresolvableNamespace(prefix.to_string())
                })?;
                Ok(QualifiedName::new(local, namespace, prefix))
            }
            // Unprefixed attributes carry no namespace
            None => Ok(QualifiedName::local(key)),
        }
    }
}

/// Content source for empty-tag elements
struct NoContent;

impl<S: GraphSink> NodeContent<S> for NoContent {
    fn next_child(
        &mut self,
        _processor: &mut XmlToRdfProcessor<'_, S>,
        _base_node: &Term,
    ) -> Result<Option<Option<Term>>> {
        Ok(None)
    }
}

fn predefined_entity(name: &str) -> Option<&'static str> {
    match name {
        "amp" => Some("&"),
        "lt" => Some("<"),
        "gt" => Some(">"),
        "quot" => Some("\""),
        "apos" => Some("'"),
        _ => None,
    }
}

/// Split the body of a `<!DOCTYPE ...>` declaration into its parts
fn parse_doctype(text: &str) -> DocumentTypeDecl {
    let text = text.trim();
    let name_end = text
        .find(|c: char| c.is_whitespace() || c == '[')
        .unwrap_or(text.len());
    let mut decl = DocumentTypeDecl {
        name: text[..name_end].to_string(),
        ..Default::default()
    };
    let mut rest = text[name_end..].trim_start();
    if let Some(after) = rest.strip_prefix("PUBLIC") {
        let (public_id, after) = take_quoted(after);
        let (system_id, after) = take_quoted(after);
        decl.public_id = public_id;
        decl.system_id = system_id;
        rest = after;
    } else if let Some(after) = rest.strip_prefix("SYSTEM") {
        let (system_id, after) = take_quoted(after);
        decl.system_id = system_id;
        rest = after;
    }
    let rest = rest.trim_start();
    if let Some(subset) = rest.strip_prefix('[') {
        if let Some(end) = subset.rfind(']') {
            decl.internal_subset = Some(subset[..end].to_string());
        }
    }
    decl
}

/// Take one quoted literal off the front, returning it and the remainder
fn take_quoted(text: &str) -> (Option<String>, &str) {
    let text = text.trim_start();
    let mut chars = text.char_indices();
    let Some((_, quote @ ('"' | '\''))) = chars.next() else {
        return (None, text);
    };
    match text[1..].find(quote) {
        Some(end) => (Some(text[1..1 + end].to_string()), &text[end + 2..]),
        None => (None, text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphSource, MemoryGraph};
    use crate::model::{Literal, NamedNode};
    use crate::vocab::{rdf, rdfs, xsd};

    fn convert(xml: &str) -> (MemoryGraph, Term) {
        let mut graph = MemoryGraph::new();
        let node = XmlReaderConverter::new()
            .with_base_uri("http://ex/")
            .convert_str(xml, &mut graph)
            .unwrap();
        (graph, node)
    }

    #[test]
    fn test_example_document() {
        let (graph, doc) = convert("<a xmlns=\"urn:ex:\"><b id=\"x\">hi</b></a>");
        assert_eq!(doc, Term::NamedNode(NamedNode::new("http://ex/")));

        let a = graph.object_for(&doc, &rdf::VALUE).unwrap();
        assert_eq!(
            graph.object_for(&a, &rdf::TYPE),
            Some(Term::NamedNode(NamedNode::new("urn:ex:#a")))
        );

        // The id attribute gives the inner element an address
        let b = graph.object_for(&a, &rdf::VALUE).unwrap();
        assert_eq!(b, Term::NamedNode(NamedNode::new("http://ex/#x")));
        assert_eq!(
            graph.object_for(&b, &rdf::TYPE),
            Some(Term::NamedNode(NamedNode::new("urn:ex:#b")))
        );
        assert_eq!(
            graph.object_for(&b, &rdf::VALUE),
            Some(Term::Literal(Literal::new("hi")))
        );
        assert!(graph.contains(
            &b,
            &NamedNode::new("urn:ex:#b/@id"),
            &Term::Literal(Literal::new_typed("x", xsd::ID.clone()))
        ));
    }

    #[test]
    fn test_unbound_prefix_is_fatal() {
        let mut graph = MemoryGraph::new();
        let result = XmlReaderConverter::new()
            .with_base_uri("http://ex/")
            .convert_str("<p:a>hi</p:a>", &mut graph);
        assert!(matches!(result, Err(XmlRdfError::UnresolvableNamespace(_))));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_entity_reference_survives() {
        let (graph, doc) = convert("<a xmlns=\"urn:ex:\">&copy;</a>");
        let a = graph.object_for(&doc, &rdf::VALUE).unwrap();
        assert_eq!(
            graph.object_for(&a, &rdf::VALUE),
            Some(Term::Literal(Literal::new_typed(
                "&copy;",
                rdf::XML_LITERAL.clone()
            )))
        );
    }

    #[test]
    fn test_predefined_and_char_references() {
        let (graph, doc) = convert("<a xmlns=\"urn:ex:\">x &amp; &#121;</a>");
        let a = graph.object_for(&doc, &rdf::VALUE).unwrap();

        // The references split the content into a four-item text list
        let mut texts = Vec::new();
        let mut cell = graph.object_for(&a, &rdf::VALUE).unwrap();
        while cell != Term::NamedNode(rdf::NIL.clone()) {
            match graph.object_for(&cell, &rdf::FIRST) {
                Some(Term::Literal(l)) => texts.push(l.value().to_string()),
                other => panic!("unexpected list item: {other:?}"),
            }
            cell = graph.object_for(&cell, &rdf::REST).unwrap();
        }
        assert_eq!(texts, ["x ", "&", " ", "y"]);
    }

    #[test]
    fn test_instruction_data_has_no_leading_space() {
        let (graph, doc) = convert("<?xml-stylesheet href=\"a.css\"?><a xmlns=\"urn:ex:\">hi</a>");
        let head = graph.object_for(&doc, &rdf::VALUE).unwrap();
        let proc = graph.object_for(&head, &rdf::FIRST).unwrap();
        match graph.object_for(&proc, &rdfs::COMMENT) {
            Some(Term::Literal(l)) => assert_eq!(l.value(), "href=\"a.css\""),
            other => panic!("unexpected instruction data: {other:?}"),
        }
    }

    #[test]
    fn test_language_scope() {
        let (graph, doc) = convert("<a xmlns=\"urn:ex:\" xml:lang=\"en\">hi</a>");
        let a = graph.object_for(&doc, &rdf::VALUE).unwrap();
        assert_eq!(
            graph.object_for(&a, &rdf::VALUE),
            Some(Term::Literal(Literal::new_language_tagged("hi", "en")))
        );
    }

    #[test]
    fn test_doctype_becomes_default_namespace() {
        let (graph, doc) =
            convert("<!DOCTYPE a PUBLIC \"-//EX//DTD a//EN\" \"a.dtd\"><a>hi</a>");
        let public = Term::NamedNode(NamedNode::new("urn:publicid:-:EX:DTD+a:EN"));
        assert!(graph.contains(&doc, &rdf::TYPE, &public));
        assert!(graph.contains(
            &public,
            &rdfs::IS_DEFINED_BY,
            &Term::NamedNode(NamedNode::new("http://ex/a.dtd"))
        ));
        // Unqualified names compose against the public identifier
        let a = graph.object_for(&doc, &rdf::VALUE).unwrap();
        assert_eq!(
            graph.object_for(&a, &rdf::TYPE),
            Some(Term::NamedNode(NamedNode::new(
                "urn:publicid:-:EX:DTD+a:EN#a"
            )))
        );
    }

    #[test]
    fn test_empty_element_is_nil() {
        let (graph, doc) = convert("<a xmlns=\"urn:ex:\"><b/></a>");
        let a = graph.object_for(&doc, &rdf::VALUE).unwrap();
        let b = graph.object_for(&a, &rdf::VALUE).unwrap();
        assert_eq!(
            graph.object_for(&b, &rdf::VALUE),
            Some(Term::NamedNode(rdf::NIL.clone()))
        );
    }

    #[test]
    fn test_parse_doctype_forms() {
        let decl = parse_doctype("html");
        assert_eq!(decl.name, "html");
        assert_eq!(decl.public_id, None);

        let decl = parse_doctype("a SYSTEM 'a.dtd'");
        assert_eq!(decl.system_id.as_deref(), Some("a.dtd"));

        let decl = parse_doctype("a PUBLIC \"-//EX//DTD a//EN\" \"a.dtd\" [<!ENTITY x \"y\">]");
        assert_eq!(decl.public_id.as_deref(), Some("-//EX//DTD a//EN"));
        assert_eq!(decl.system_id.as_deref(), Some("a.dtd"));
        assert_eq!(decl.internal_subset.as_deref(), Some("<!ENTITY x \"y\">"));
    }
}
