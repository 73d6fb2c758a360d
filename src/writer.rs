//! Decoding writer: structural-graph statements back to XML events
//!
//! [`RdfToXmlWriter`] walks a [`GraphSource`] from a document node and
//! replays the encoded document into an [`XmlEventSink`]. Reconstruction is
//! grammar-driven: a node's `rdf:value` objects are tried first, then its
//! list structure, then `rdfs:member`, and a URI node nothing else applies
//! to becomes an external entity reference declared in the DOCTYPE.
//!
//! The root element name needed for the DOCTYPE is discovered by a dry run
//! against [`NullSink`] with the context's `find_root` flag set; the first
//! element that would be written deposits its name and stops the run.

use crate::graph::GraphSource;
use crate::infoset::{DocumentTypeDecl, QualifiedName, UniqueNamer, XmlEventSink};
use crate::model::{NamedNode, Term};
use crate::uri::{entity_name_hint, extract_public_id};
use crate::vocab::{rdf, rdfs, xsd};
use crate::Result;
use tracing::debug;

/// Per-run state of one decoding pass
struct WriteContext {
    document_node: Term,
    /// External entities referenced so far, URI paired with the assigned
    /// entity name, in first-use order
    entities: Vec<(String, String)>,
    /// Probe mode: record the first element name instead of writing
    find_root: bool,
    root_name: Option<String>,
}

impl WriteContext {
    fn new(document_node: Term, find_root: bool) -> Self {
        WriteContext {
            document_node,
            entities: Vec::new(),
            find_root,
            root_name: None,
        }
    }
}

/// Event sink that discards everything; used for dry runs
pub struct NullSink;

impl XmlEventSink for NullSink {
    fn start_document(&mut self) -> Result<()> {
        Ok(())
    }
    fn end_document(&mut self) -> Result<()> {
        Ok(())
    }
    fn doctype(&mut self, _decl: &DocumentTypeDecl) -> Result<()> {
        Ok(())
    }
    fn start_element(&mut self, _name: &QualifiedName) -> Result<()> {
        Ok(())
    }
    fn attribute(&mut self, _name: &QualifiedName, _value: &str) -> Result<()> {
        Ok(())
    }
    fn end_element(&mut self) -> Result<()> {
        Ok(())
    }
    fn text(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }
    fn raw(&mut self, _markup: &str) -> Result<()> {
        Ok(())
    }
    fn comment(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }
    fn processing_instruction(&mut self, _target: &str, _data: &str) -> Result<()> {
        Ok(())
    }
    fn entity_reference(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }
}

/// The decoding writer
pub struct RdfToXmlWriter<'g, G: GraphSource + ?Sized> {
    graph: &'g G,
    namer: UniqueNamer,
}

impl<'g, G: GraphSource + ?Sized> RdfToXmlWriter<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        RdfToXmlWriter {
            graph,
            namer: UniqueNamer::new(),
        }
    }

    /// Decode the document rooted at `document_node` into the sink
    pub fn write(&mut self, sink: &mut dyn XmlEventSink, document_node: &Term) -> Result<()> {
        debug!(node = %document_node, "writing XML document from graph");
        sink.start_document()?;
        let mut context = WriteContext::new(document_node.clone(), false);
        let result = self
            .write_document_type(sink, document_node, &mut context)
            .and_then(|_| self.write_values(sink, document_node, &mut context));
        let ended = sink.end_document();
        result.and(ended)
    }

    /// The XML name of a node: its `rdfs:label` NCName literal, qualified by
    /// the `rdfs:isDefinedBy` namespace unless the namespace is the element
    /// type itself or is local to the document.
    fn get_xml_name(
        &self,
        node: &Term,
        document_node: &Term,
        element_type: Option<&Term>,
    ) -> Option<QualifiedName> {
        let name = self
            .graph
            .objects_for(node, &rdfs::LABEL)
            .into_iter()
            .find_map(|t| match t {
                Term::Literal(l) if l.has_datatype(&xsd::NC_NAME) => Some(l.value().to_string()),
                _ => None,
            })?;
        let namespace = self
            .graph
            .objects_for(node, &rdfs::IS_DEFINED_BY)
            .into_iter()
            .find_map(|t| t.as_named().cloned());
        if let Some(namespace) = namespace {
            let namespace_term = Term::NamedNode(namespace.clone());
            if element_type != Some(&namespace_term)
                && !self
                    .graph
                    .contains(&namespace_term, &rdfs::IS_DEFINED_BY, document_node)
            {
                return Some(QualifiedName::new(name, namespace.into_string(), ""));
            }
        }
        Some(QualifiedName::local(name))
    }

    fn write_values(
        &mut self,
        sink: &mut dyn XmlEventSink,
        node: &Term,
        context: &mut WriteContext,
    ) -> Result<()> {
        for value in self.values(node) {
            if self.write_value(sink, &value, context)? {
                return Ok(());
            }
        }
        self.write_fallback(sink, node, context)
    }

    /// Write one node; returns whether the node was representable
    fn write_value(
        &mut self,
        sink: &mut dyn XmlEventSink,
        node: &Term,
        context: &mut WriteContext,
    ) -> Result<bool> {
        // A raw XML label reproduces stored markup verbatim
        let raw_label = self
            .graph
            .objects_for(node, &rdfs::LABEL)
            .into_iter()
            .find_map(|t| match t {
                Term::Literal(l) if l.has_datatype(&rdf::XML_LITERAL) => {
                    Some(l.value().to_string())
                }
                _ => None,
            });
        if let Some(markup) = raw_label {
            sink.raw(&markup)?;
            return Ok(true);
        }

        // Comment annotations come first; a datatyped comment whose type
        // carries an XML name is a processing instruction
        for annotation in self.graph.objects_for(node, &rdfs::COMMENT) {
            let Term::Literal(literal) = annotation else {
                continue;
            };
            if let Some(datatype) = literal.datatype() {
                let target = self.get_xml_name(
                    &Term::NamedNode(datatype.clone()),
                    &context.document_node,
                    None,
                );
                if let Some(target) = target {
                    sink.processing_instruction(&target.local_name, literal.value())?;
                    continue;
                }
            }
            sink.comment(literal.value())?;
        }

        if let Term::Literal(literal) = node {
            if literal.has_datatype(&rdf::XML_LITERAL) {
                sink.raw(literal.value())?;
            } else {
                sink.text(literal.value())?;
            }
            return Ok(true);
        }

        let document_node = context.document_node.clone();
        let named_type = self
            .graph
            .objects_for(node, &rdf::TYPE)
            .into_iter()
            .find_map(|t| {
                let name = self.get_xml_name(&t, &document_node, None)?;
                Some((t, name))
            });
        let element_type = match &named_type {
            Some((element_type, element_name)) => {
                if context.find_root {
                    context
                        .root_name
                        .get_or_insert_with(|| element_name.local_name.clone());
                    return Ok(true);
                }
                sink.start_element(element_name)?;
                self.write_attributes(sink, node, element_type, &document_node)?;
                Some(element_type.clone())
            }
            None => None,
        };

        let inner = self.write_content(sink, node, element_type.is_some(), context);
        if element_type.is_some() {
            match inner {
                Ok(_) => sink.end_element()?,
                Err(e) => {
                    // Close the element even on failure so the sink stays
                    // balanced
                    let _ = sink.end_element();
                    return Err(e);
                }
            }
        }
        inner
    }

    fn write_attributes(
        &mut self,
        sink: &mut dyn XmlEventSink,
        node: &Term,
        element_type: &Term,
        document_node: &Term,
    ) -> Result<()> {
        for (predicate, object) in self.graph.predicate_objects(node) {
            let predicate_term = Term::NamedNode(predicate);
            let Some(attribute_name) =
                self.get_xml_name(&predicate_term, document_node, Some(element_type))
            else {
                continue;
            };
            let value = match &object {
                Term::Literal(literal) => Some(literal.clone()),
                // A node-valued attribute is referenced through the
                // identifier literal its target carries
                other => self
                    .graph
                    .predicate_objects(other)
                    .into_iter()
                    .find_map(|(_, o)| match o {
                        Term::Literal(l) if l.has_datatype(&xsd::ID) => Some(l),
                        _ => None,
                    }),
            };
            if let Some(value) = value {
                sink.attribute(&attribute_name, value.value())?;
            }
        }
        Ok(())
    }

    fn write_content(
        &mut self,
        sink: &mut dyn XmlEventSink,
        node: &Term,
        has_element: bool,
        context: &mut WriteContext,
    ) -> Result<bool> {
        for value in self.values(node) {
            if self.write_value(sink, &value, context)? {
                return Ok(true);
            }
        }
        if let Some(list) = self.enumerate_list(node) {
            for element in list {
                let Some(element) = element else { continue };
                if !self.write_value(sink, &element, context)? {
                    self.write_fallback(sink, &element, context)?;
                }
            }
            return Ok(true);
        }
        let mut any = false;
        for member in self.graph.objects_for(node, &rdfs::MEMBER) {
            if self.write_value(sink, &member, context)? {
                any = true;
            }
        }
        if has_element {
            if !any {
                self.write_fallback(sink, node, context)?;
            }
            return Ok(true);
        }
        Ok(any)
    }

    /// A URI node that cannot be described becomes an entity reference
    fn write_fallback(
        &mut self,
        sink: &mut dyn XmlEventSink,
        node: &Term,
        context: &mut WriteContext,
    ) -> Result<()> {
        if let Some(uri) = node.as_named() {
            let uri = uri.as_str().to_string();
            self.write_external_entity(sink, &uri, context)?;
        }
        Ok(())
    }

    fn write_external_entity(
        &mut self,
        sink: &mut dyn XmlEventSink,
        uri: &str,
        context: &mut WriteContext,
    ) -> Result<()> {
        let name = match context.entities.iter().find(|(u, _)| u == uri) {
            Some((_, name)) => name.clone(),
            None => {
                let name = self.namer.next(&entity_name_hint(uri));
                context.entities.push((uri.to_string(), name.clone()));
                name
            }
        };
        sink.entity_reference(&name)
    }

    /// Entity declarations for every external entity a full write would
    /// reference, collected by a dry run
    fn dtd_subset(&mut self, document_node: &Term, context: &mut WriteContext) -> Result<String> {
        let mut null_sink = NullSink;
        for value in self.values(document_node) {
            if self.write_value(&mut null_sink, &value, context)? {
                break;
            }
        }
        if context.entities.is_empty() {
            return Ok(String::new());
        }
        let mut subset = String::from("\n");
        for (uri, name) in &context.entities {
            match extract_public_id(uri) {
                Some(public_id) => {
                    let system_id = self
                        .graph
                        .objects_for(&Term::NamedNode(NamedNode::new(uri)), &rdfs::IS_DEFINED_BY)
                        .into_iter()
                        .find_map(|t| t.as_named().map(|n| n.as_str().to_string()))
                        .unwrap_or_else(|| uri.to_string());
                    subset.push_str(&format!(
                        "<!ENTITY {name} PUBLIC \"{public_id}\" \"{system_id}\">\n"
                    ));
                }
                None => subset.push_str(&format!("<!ENTITY {name} SYSTEM \"{uri}\">\n")),
            }
        }
        Ok(subset)
    }

    /// Probe for the root element name without writing anything
    fn root_name(&mut self, document_node: &Term) -> Result<Option<String>> {
        let mut context = WriteContext::new(document_node.clone(), true);
        let mut null_sink = NullSink;
        self.write_values(&mut null_sink, document_node, &mut context)?;
        Ok(context.root_name)
    }

    fn write_document_type(
        &mut self,
        sink: &mut dyn XmlEventSink,
        document_node: &Term,
        context: &mut WriteContext,
    ) -> Result<()> {
        let Some(root) = self.root_name(document_node)? else {
            return Ok(());
        };

        let classes = self.graph.objects_for(document_node, &rdf::TYPE);
        let entity_subset = self.dtd_subset(document_node, context)?;

        let doctype = |public_id: Option<String>,
                       system_id: Option<String>,
                       subset: String|
         -> DocumentTypeDecl {
            DocumentTypeDecl {
                name: root.clone(),
                public_id,
                system_id,
                internal_subset: (!subset.is_empty()).then_some(subset),
            }
        };

        // A subset class below a public identifier, system URI known
        for class in &classes {
            let Some(public_node) = self.first_object(class, &rdfs::SUB_CLASS_OF) else {
                continue;
            };
            let Some(public_id) = extract_public_id(public_node.as_str()) else {
                continue;
            };
            let public_term = Term::NamedNode(public_node);
            if let Some(system_node) = self.first_object(&public_term, &rdfs::IS_DEFINED_BY) {
                let subset = self.first_literal_value(class);
                return sink.doctype(&doctype(
                    Some(public_id),
                    Some(system_node.into_string()),
                    format!("{}{entity_subset}", subset.unwrap_or_default()),
                ));
            }
        }

        // The same without a system URI
        for class in &classes {
            let Some(public_node) = self.first_object(class, &rdfs::SUB_CLASS_OF) else {
                continue;
            };
            if let Some(public_id) = extract_public_id(public_node.as_str()) {
                let subset = self.first_literal_value(class);
                return sink.doctype(&doctype(
                    Some(public_id),
                    None,
                    format!("{}{entity_subset}", subset.unwrap_or_default()),
                ));
            }
        }

        // The document class itself is a public identifier
        for class in &classes {
            let Some(class_node) = class.as_named() else {
                continue;
            };
            let Some(public_id) = extract_public_id(class_node.as_str()) else {
                continue;
            };
            if let Some(system_node) = self.first_object(class, &rdfs::IS_DEFINED_BY) {
                return sink.doctype(&doctype(
                    Some(public_id),
                    Some(system_node.into_string()),
                    entity_subset.clone(),
                ));
            }
        }

        for class in &classes {
            let Some(class_node) = class.as_named() else {
                continue;
            };
            if let Some(public_id) = extract_public_id(class_node.as_str()) {
                return sink.doctype(&doctype(Some(public_id), None, entity_subset.clone()));
            }
        }

        // Internal subset only
        for class in &classes {
            if let Some(subset) = self.first_literal_value(class) {
                return sink.doctype(&doctype(None, None, format!("{subset}{entity_subset}")));
            }
        }

        if !entity_subset.is_empty() {
            return sink.doctype(&doctype(None, None, entity_subset));
        }
        Ok(())
    }

    fn values(&self, node: &Term) -> Vec<Term> {
        self.graph.objects_for(node, &rdf::VALUE)
    }

    /// The first object as a named node, when the first object is one
    fn first_object(&self, subject: &Term, predicate: &NamedNode) -> Option<NamedNode> {
        self.graph
            .objects_for(subject, predicate)
            .into_iter()
            .next()
            .and_then(|t| t.as_named().cloned())
    }

    fn first_literal_value(&self, node: &Term) -> Option<String> {
        self.values(node).into_iter().find_map(|t| match t {
            Term::Literal(l) => Some(l.value().to_string()),
            _ => None,
        })
    }

    /// The list elements of a node, or `None` when it carries no list
    /// structure at all. Missing `rdf:first` values surface as `None`
    /// entries.
    fn enumerate_list(&self, list: &Term) -> Option<Vec<Option<Term>>> {
        if is_nil(list) {
            return Some(Vec::new());
        }
        let first = self.graph.object_for(list, &rdf::FIRST);
        let rest = self.graph.object_for(list, &rdf::REST);
        if first.is_none() && rest.is_none() {
            return None;
        }
        let mut elements = vec![first];
        let mut current = rest;
        while let Some(cell) = current {
            if is_nil(&cell) {
                break;
            }
            elements.push(self.graph.object_for(&cell, &rdf::FIRST));
            current = self.graph.object_for(&cell, &rdf::REST);
        }
        Some(elements)
    }
}

fn is_nil(term: &Term) -> bool {
    term.as_named() == Some(&rdf::NIL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MemoryGraph;
    use crate::model::{BlankNode, Literal, Triple};
    use crate::uri::create_public_id;

    #[derive(Default)]
    struct RecordingSink {
        events: Vec<String>,
    }

    impl XmlEventSink for RecordingSink {
        fn start_document(&mut self) -> Result<()> {
            self.events.push("start-doc".into());
            Ok(())
        }
        fn end_document(&mut self) -> Result<()> {
            self.events.push("end-doc".into());
            Ok(())
        }
        fn doctype(&mut self, decl: &DocumentTypeDecl) -> Result<()> {
            self.events.push(format!(
                "doctype {} pub={:?} sys={:?} subset={:?}",
                decl.name, decl.public_id, decl.system_id, decl.internal_subset
            ));
            Ok(())
        }
        fn start_element(&mut self, name: &QualifiedName) -> Result<()> {
            self.events.push(format!("start {name}"));
            Ok(())
        }
        fn attribute(&mut self, name: &QualifiedName, value: &str) -> Result<()> {
            self.events.push(format!("attr {name}={value}"));
            Ok(())
        }
        fn end_element(&mut self) -> Result<()> {
            self.events.push("end".into());
            Ok(())
        }
        fn text(&mut self, text: &str) -> Result<()> {
            self.events.push(format!("text {text}"));
            Ok(())
        }
        fn raw(&mut self, markup: &str) -> Result<()> {
            self.events.push(format!("raw {markup}"));
            Ok(())
        }
        fn comment(&mut self, text: &str) -> Result<()> {
            self.events.push(format!("comment {text}"));
            Ok(())
        }
        fn processing_instruction(&mut self, target: &str, data: &str) -> Result<()> {
            self.events.push(format!("pi {target} {data}"));
            Ok(())
        }
        fn entity_reference(&mut self, name: &str) -> Result<()> {
            self.events.push(format!("entity {name}"));
            Ok(())
        }
    }

    fn doc() -> Term {
        Term::NamedNode(NamedNode::new("http://ex/"))
    }

    fn named(iri: &str) -> Term {
        Term::NamedNode(NamedNode::new(iri))
    }

    fn blank(label: &str) -> Term {
        Term::BlankNode(BlankNode::new(label))
    }

    fn add(graph: &mut MemoryGraph, s: &Term, p: &NamedNode, o: impl Into<Term>) {
        let subject = s.as_subject().unwrap();
        graph.add_triple(Triple::new(subject, p.clone(), o));
    }

    fn element_graph() -> MemoryGraph {
        // <a xmlns="urn:ex:">hi</a> at http://ex/
        let mut graph = MemoryGraph::new();
        let e = blank("a1");
        let t = named("urn:ex:#a");
        add(&mut graph, &doc(), &rdf::VALUE, e.clone());
        add(&mut graph, &e, &rdf::TYPE, t.clone());
        add(&mut graph, &e, &rdf::VALUE, Literal::new("hi"));
        add(
            &mut graph,
            &t,
            &rdfs::LABEL,
            Literal::new_typed("a", xsd::NC_NAME.clone()),
        );
        add(&mut graph, &t, &rdfs::IS_DEFINED_BY, named("urn:ex:"));
        graph
    }

    fn write(graph: &MemoryGraph) -> Vec<String> {
        let mut sink = RecordingSink::default();
        RdfToXmlWriter::new(graph).write(&mut sink, &doc()).unwrap();
        sink.events
    }

    #[test]
    fn test_element_with_text() {
        let events = write(&element_graph());
        assert_eq!(
            events,
            vec![
                "start-doc",
                "start {urn:ex:}a",
                "text hi",
                "end",
                "end-doc"
            ]
        );
    }

    #[test]
    fn test_attribute_from_id_node() {
        // <b id="x"/> where the attribute type is element-scoped and the
        // attribute value node carries the identifier literal
        let mut graph = MemoryGraph::new();
        let b = named("http://ex/#x");
        let bt = named("urn:ex:#b");
        let at = named("urn:ex:#b/@id");
        let at_pred = at.as_named().unwrap().clone();
        add(&mut graph, &doc(), &rdf::VALUE, b.clone());
        add(&mut graph, &b, &rdf::TYPE, bt.clone());
        add(&mut graph, &b, &rdf::VALUE, rdf::NIL.clone());
        add(&mut graph, &b, &at_pred, b.clone());
        add(
            &mut graph,
            &b,
            &at_pred,
            Literal::new_typed("x", xsd::ID.clone()),
        );
        add(
            &mut graph,
            &bt,
            &rdfs::LABEL,
            Literal::new_typed("b", xsd::NC_NAME.clone()),
        );
        add(&mut graph, &bt, &rdfs::IS_DEFINED_BY, named("urn:ex:"));
        add(
            &mut graph,
            &at,
            &rdfs::LABEL,
            Literal::new_typed("id", xsd::NC_NAME.clone()),
        );
        add(&mut graph, &at, &rdfs::IS_DEFINED_BY, bt.clone());

        let events = write(&graph);
        assert!(events.contains(&"start {urn:ex:}b".to_string()));
        // Unqualified because the attribute namespace is the element type,
        // written once for the ID literal and once for the node value
        // chased back to it
        assert_eq!(
            events.iter().filter(|e| *e == &"attr id=x".to_string()).count(),
            2
        );
    }

    #[test]
    fn test_comment_before_element() {
        // Document content is the list [comment, element]
        let mut graph = element_graph();
        let e = blank("a1");
        let c = blank("comment1");
        let l1 = blank("list1");
        let l2 = blank("list2");
        let mut rebuilt = MemoryGraph::new();
        for t in graph.iter_triples() {
            if t.object() != &e {
                rebuilt.add_triple(t.clone());
            }
        }
        graph = rebuilt;
        add(&mut graph, &doc(), &rdf::VALUE, l1.clone());
        add(&mut graph, &l1, &rdf::FIRST, c.clone());
        add(&mut graph, &l1, &rdf::REST, l2.clone());
        add(&mut graph, &l2, &rdf::FIRST, e.clone());
        add(&mut graph, &l2, &rdf::REST, rdf::NIL.clone());
        add(&mut graph, &c, &rdf::VALUE, rdf::NIL.clone());
        add(&mut graph, &c, &rdfs::COMMENT, Literal::new("note"));

        let events = write(&graph);
        let comment_at = events.iter().position(|e| e == "comment note");
        let element_at = events.iter().position(|e| e == "start {urn:ex:}a");
        assert!(comment_at.is_some() && comment_at < element_at);
    }

    #[test]
    fn test_public_doctype() {
        let mut graph = element_graph();
        let public = named(&create_public_id("-//EX//DTD Test//EN"));
        add(&mut graph, &doc(), &rdf::TYPE, public.clone());
        add(
            &mut graph,
            &public,
            &rdfs::IS_DEFINED_BY,
            named("http://ex/test.dtd"),
        );

        let events = write(&graph);
        assert_eq!(
            events[1],
            "doctype a pub=Some(\"-//EX//DTD Test//EN\") sys=Some(\"http://ex/test.dtd\") subset=None"
        );
    }

    #[test]
    fn test_unresolvable_uri_becomes_entity() {
        let mut graph = element_graph();
        let e = blank("a1");
        let external = named("http://other/resource");
        // Second child forces list form
        let l1 = blank("list1");
        let l2 = blank("list2");
        // Rebuild the element value as a list of text and the opaque node
        let mut stripped = MemoryGraph::new();
        for t in graph.iter_triples() {
            if t.object() != &Term::Literal(Literal::new("hi")) {
                stripped.add_triple(t.clone());
            }
        }
        graph = stripped;
        add(&mut graph, &e, &rdf::VALUE, l1.clone());
        add(&mut graph, &l1, &rdf::FIRST, Literal::new("hi"));
        add(&mut graph, &l1, &rdf::REST, l2.clone());
        add(&mut graph, &l2, &rdf::FIRST, external.clone());
        add(&mut graph, &l2, &rdf::REST, rdf::NIL.clone());

        let events = write(&graph);
        assert!(events.contains(&"entity httpotherresource1".to_string()));
        // The dry run declared the entity in the DOCTYPE
        assert!(events
            .iter()
            .any(|e| e.starts_with("doctype a") && e.contains("<!ENTITY httpotherresource1 SYSTEM")));
    }

    #[test]
    fn test_no_root_no_doctype() {
        let mut graph = MemoryGraph::new();
        add(&mut graph, &doc(), &rdf::VALUE, Literal::new("only text"));
        let events = write(&graph);
        assert_eq!(events, vec!["start-doc", "text only text", "end-doc"]);
    }
}
