//! Decoding navigator: a lazy XML cursor over a structural graph
//!
//! [`RdfXmlNavigator`] exposes a graph produced by the encoding processor as
//! a read-only XML tree. Nothing is materialized up front: a sibling list is
//! computed when the cursor first descends into it, and shared between
//! clones through `Rc`, which makes cloning a cursor cheap and position
//! comparison structural.
//!
//! The cursor axes follow the XPath data model: child nodes, attributes
//! grouped per predicate, and a namespace axis derived from the graph's
//! prefix table plus the document-local namespace under the empty prefix.

use crate::encoder::LOCAL_NAMESPACE;
use crate::graph::GraphSource;
use crate::infoset::{is_xml_whitespace, DocumentTypeDecl, QualifiedName, XmlNodeKind};
use crate::model::{NamedNode, Term};
use crate::uri::{compose_uri, extract_public_id, namespace_prefix_uri, verify_namespace_prefix};
use crate::vocab::{rdf, rdfs, xsd};
use std::rc::Rc;

/// Shared per-navigation state
struct NavContext<G: GraphSource> {
    graph: G,
    document_node: Term,
    /// `compose(documentUri, "%23local")`, absent for base-less documents
    local_namespace: Option<String>,
}

/// One sibling entry of a node cursor
#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeEntry {
    kind: XmlNodeKind,
    node: Term,
}

/// One attribute of the focused node: the grouped predicate name with all
/// its object values
#[derive(Debug, Clone)]
struct AttributeEntry {
    name: QualifiedName,
    values: Vec<Term>,
}

#[derive(Clone)]
enum CursorItems {
    Nodes(Rc<[NodeEntry]>),
    Attributes(Rc<[AttributeEntry]>),
    Namespaces(Rc<[(String, String)]>),
}

impl CursorItems {
    fn ptr_eq(&self, other: &CursorItems) -> bool {
        match (self, other) {
            (CursorItems::Nodes(a), CursorItems::Nodes(b)) => Rc::ptr_eq(a, b),
            (CursorItems::Attributes(a), CursorItems::Attributes(b)) => Rc::ptr_eq(a, b),
            (CursorItems::Namespaces(a), CursorItems::Namespaces(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

struct Cursor<G: GraphSource> {
    context: Rc<NavContext<G>>,
    /// The cursor this one descended from; owned so clones are independent
    parent: Option<Box<Cursor<G>>>,
    items: CursorItems,
    position: usize,
}

impl<G: GraphSource> Clone for Cursor<G> {
    fn clone(&self) -> Self {
        Cursor {
            context: Rc::clone(&self.context),
            parent: self.parent.clone(),
            items: self.items.clone(),
            position: self.position,
        }
    }
}

impl<G: GraphSource> Cursor<G> {
    fn same_position(&self, other: &Cursor<G>) -> bool {
        self.position == other.position
            && self.items.ptr_eq(&other.items)
            && match (&self.parent, &other.parent) {
                (None, None) => true,
                (Some(a), Some(b)) => a.same_position(b),
                _ => false,
            }
    }
}

/// A cloneable XML cursor over a structural graph
pub struct RdfXmlNavigator<G: GraphSource> {
    cursor: Cursor<G>,
}

impl<G: GraphSource> Clone for RdfXmlNavigator<G> {
    fn clone(&self) -> Self {
        RdfXmlNavigator {
            cursor: self.cursor.clone(),
        }
    }
}

impl<G: GraphSource> RdfXmlNavigator<G> {
    /// Create a navigator positioned at the document node
    pub fn new(graph: G, document_node: Term) -> Self {
        let local_namespace = document_node
            .as_named()
            .map(|n| compose_uri(n.as_str(), LOCAL_NAMESPACE));
        let context = Rc::new(NavContext {
            graph,
            document_node: document_node.clone(),
            local_namespace,
        });
        RdfXmlNavigator {
            cursor: root_cursor(context, document_node, XmlNodeKind::Document),
        }
    }

    fn context(&self) -> &NavContext<G> {
        &self.cursor.context
    }

    fn current_entry(&self) -> Option<&NodeEntry> {
        match &self.cursor.items {
            CursorItems::Nodes(items) => items.get(self.cursor.position),
            _ => None,
        }
    }

    /// The kind of the focused node
    pub fn node_kind(&self) -> XmlNodeKind {
        match &self.cursor.items {
            CursorItems::Nodes(items) => items[self.cursor.position].kind,
            CursorItems::Attributes(_) => XmlNodeKind::Attribute,
            CursorItems::Namespaces(_) => XmlNodeKind::Namespace,
        }
    }

    /// The expanded name of the focused node, if it has one
    pub fn name(&self) -> Option<QualifiedName> {
        match &self.cursor.items {
            CursorItems::Nodes(items) => self
                .context()
                .type_name(&items[self.cursor.position].node),
            CursorItems::Attributes(items) => {
                Some(items[self.cursor.position].name.clone())
            }
            CursorItems::Namespaces(items) => {
                Some(QualifiedName::local(&*items[self.cursor.position].0))
            }
        }
    }

    /// The name as it would be written in markup, prefix included when the
    /// graph declares one for the namespace
    pub fn prefixed_name(&self) -> Option<String> {
        let mut name = self.name()?;
        if !name.namespace.is_empty() {
            if let Some(prefix) = self.lookup_prefix(&name.namespace) {
                name.prefix = prefix;
            }
        }
        Some(name.prefixed())
    }

    /// The string value of the focused node, for nodes that carry one
    pub fn value(&self) -> Option<String> {
        match &self.cursor.items {
            CursorItems::Nodes(items) => {
                plain_literal_value(&items[self.cursor.position].node)
            }
            CursorItems::Attributes(items) => items[self.cursor.position]
                .values
                .iter()
                .find_map(plain_literal_value),
            CursorItems::Namespaces(items) => {
                Some(items[self.cursor.position].1.clone())
            }
        }
    }

    /// The language tag in effect on the focused node
    pub fn language(&self) -> Option<String> {
        let literal_language = |term: &Term| {
            term.as_literal()
                .and_then(|l| l.language())
                .map(str::to_string)
        };
        match &self.cursor.items {
            CursorItems::Nodes(items) => literal_language(&items[self.cursor.position].node),
            CursorItems::Attributes(items) => items[self.cursor.position]
                .values
                .iter()
                .find_map(literal_language),
            CursorItems::Namespaces(_) => None,
        }
    }

    /// The declared value type of the focused node
    pub fn type_name(&self) -> Option<QualifiedName> {
        match &self.cursor.items {
            CursorItems::Nodes(items) => self
                .context()
                .type_name(&items[self.cursor.position].node),
            CursorItems::Attributes(items) => {
                let context = self.context();
                items[self.cursor.position]
                    .values
                    .iter()
                    .find_map(|v| context.type_name(v))
            }
            CursorItems::Namespaces(_) => None,
        }
    }

    /// Raw XML markup carried by the focused attribute, if any
    pub fn inner_xml(&self) -> Option<String> {
        match &self.cursor.items {
            CursorItems::Attributes(items) => items[self.cursor.position]
                .values
                .iter()
                .find_map(|v| match v {
                    Term::Literal(l) if l.has_datatype(&rdf::XML_LITERAL) => {
                        Some(l.value().to_string())
                    }
                    _ => None,
                }),
            _ => None,
        }
    }

    /// Whether the focused element was encoded from an empty element
    pub fn is_empty_element(&self) -> bool {
        match self.current_entry() {
            Some(entry) => self.context().graph.contains(
                &entry.node,
                &rdf::VALUE,
                &Term::NamedNode(rdf::NIL.clone()),
            ),
            None => false,
        }
    }

    /// The base URI of the document being navigated
    pub fn base_uri(&self) -> Option<String> {
        self.context()
            .document_node
            .as_named()
            .map(|n| n.as_str().to_string())
    }

    /// The graph term backing the focused node
    pub fn underlying_node(&self) -> Option<&Term> {
        self.current_entry().map(|entry| &entry.node)
    }

    /// The namespace bound to a prefix; the empty prefix resolves to the
    /// document-local namespace
    pub fn lookup_namespace(&self, prefix: &str) -> Option<String> {
        self.context().find_namespace(prefix)
    }

    /// The declared prefix of a namespace; the local namespace maps to the
    /// empty prefix
    pub fn lookup_prefix(&self, namespace: &str) -> Option<String> {
        self.context().find_prefix(namespace)
    }

    /// Whether two navigators focus the exact same position
    pub fn is_same_position(&self, other: &RdfXmlNavigator<G>) -> bool {
        self.cursor.same_position(&other.cursor)
    }

    /// Move to the same position as another navigator
    pub fn move_to(&mut self, other: &RdfXmlNavigator<G>) {
        self.cursor = other.cursor.clone();
    }

    pub fn move_to_parent(&mut self) -> bool {
        match self.cursor.parent.take() {
            Some(parent) => {
                self.cursor = *parent;
                true
            }
            None => false,
        }
    }

    /// Climb back to the top of the tree
    pub fn move_to_root(&mut self) {
        while self.move_to_parent() {}
    }

    pub fn move_to_next(&mut self) -> bool {
        let len = match &self.cursor.items {
            CursorItems::Nodes(items) => items.len(),
            _ => return false,
        };
        if self.cursor.position + 1 < len {
            self.cursor.position += 1;
            true
        } else {
            false
        }
    }

    pub fn move_to_previous(&mut self) -> bool {
        if matches!(self.cursor.items, CursorItems::Nodes(_)) && self.cursor.position > 0 {
            self.cursor.position -= 1;
            true
        } else {
            false
        }
    }

    pub fn move_to_first_child(&mut self) -> bool {
        let Some(entry) = self.current_entry() else {
            return false;
        };
        let children = self.context().child_entries(&entry.node);
        if children.is_empty() {
            return false;
        }
        self.descend(CursorItems::Nodes(Rc::from(children)));
        true
    }

    pub fn move_to_first_attribute(&mut self) -> bool {
        let Some(entry) = self.current_entry() else {
            return false;
        };
        let attributes = self.context().attribute_entries(&entry.node);
        if attributes.is_empty() {
            return false;
        }
        self.descend(CursorItems::Attributes(Rc::from(attributes)));
        true
    }

    pub fn move_to_next_attribute(&mut self) -> bool {
        let len = match &self.cursor.items {
            CursorItems::Attributes(items) => items.len(),
            _ => return false,
        };
        if self.cursor.position + 1 < len {
            self.cursor.position += 1;
            true
        } else {
            false
        }
    }

    pub fn move_to_first_namespace(&mut self) -> bool {
        if self.current_entry().is_none() {
            return false;
        }
        let namespaces = self.context().namespace_entries();
        if namespaces.is_empty() {
            return false;
        }
        self.descend(CursorItems::Namespaces(Rc::from(namespaces)));
        true
    }

    pub fn move_to_next_namespace(&mut self) -> bool {
        let len = match &self.cursor.items {
            CursorItems::Namespaces(items) => items.len(),
            _ => return false,
        };
        if self.cursor.position + 1 < len {
            self.cursor.position += 1;
            true
        } else {
            false
        }
    }

    /// Jump to the element addressed by an identifier, if the graph knows
    /// anything about `compose(documentBase, id)`
    pub fn move_to_id(&mut self, id: &str) -> bool {
        let context = Rc::clone(&self.cursor.context);
        let Some(document_uri) = context.document_node.as_named() else {
            return false;
        };
        let target = Term::NamedNode(NamedNode::new(compose_uri(document_uri.as_str(), id)));
        if context.graph.predicate_objects(&target).is_empty() {
            return false;
        }
        self.cursor = root_cursor(context, target, XmlNodeKind::Document);
        true
    }

    /// The document type declaration reconstructible from the graph, rooted
    /// at the first element in document order
    pub fn document_type(&self) -> Option<DocumentTypeDecl> {
        let mut probe = self.clone();
        probe.move_to_root();
        if !probe.move_to_following_element() {
            return None;
        }
        let root = probe.prefixed_name()?;
        probe.context().document_type_for_root(&root)
    }

    fn move_to_following_element(&mut self) -> bool {
        loop {
            if self.node_kind() == XmlNodeKind::Element {
                return true;
            }
            if self.move_to_first_child() {
                continue;
            }
            loop {
                if self.move_to_next() {
                    break;
                }
                if !self.move_to_parent() {
                    return false;
                }
            }
        }
    }

    fn descend(&mut self, items: CursorItems) {
        let new_cursor = Cursor {
            context: Rc::clone(&self.cursor.context),
            parent: None,
            items,
            position: 0,
        };
        let old = std::mem::replace(&mut self.cursor, new_cursor);
        self.cursor.parent = Some(Box::new(old));
    }
}

fn root_cursor<G: GraphSource>(
    context: Rc<NavContext<G>>,
    node: Term,
    kind: XmlNodeKind,
) -> Cursor<G> {
    Cursor {
        context,
        parent: None,
        items: CursorItems::Nodes(Rc::from(vec![NodeEntry { kind, node }])),
        position: 0,
    }
}

fn plain_literal_value(term: &Term) -> Option<String> {
    match term {
        Term::Literal(l) if !l.has_datatype(&rdf::XML_LITERAL) => Some(l.value().to_string()),
        _ => None,
    }
}

impl<G: GraphSource> NavContext<G> {
    fn objects(&self, node: &Term, predicate: &NamedNode) -> Vec<Term> {
        self.graph.objects_for(node, predicate)
    }

    /// The XML name a node carries: its NCName label under the namespace it
    /// is defined by. Names under the document-local namespace (directly or
    /// one level up) come out unqualified.
    fn qualified_name(&self, node: &Term) -> Option<QualifiedName> {
        let ncname = self.objects(node, &rdfs::LABEL).into_iter().find_map(|t| {
            match t {
                Term::Literal(l) if l.has_datatype(&xsd::NC_NAME) => {
                    Some(l.value().to_string())
                }
                _ => None,
            }
        })?;
        let namespace = self
            .objects(node, &rdfs::IS_DEFINED_BY)
            .into_iter()
            .find_map(|t| t.as_named().cloned())?;
        let local = self.local_namespace.as_deref();
        let is_local = Some(namespace.as_str()) == local || {
            let parent = self
                .objects(&Term::NamedNode(namespace.clone()), &rdfs::IS_DEFINED_BY)
                .into_iter()
                .find_map(|t| t.as_named().cloned());
            parent.as_ref().map(|n| n.as_str()) == local
        };
        if is_local {
            Some(QualifiedName::local(ncname))
        } else {
            Some(QualifiedName::new(ncname, namespace.into_string(), ""))
        }
    }

    /// The name of a node's type: a literal's datatype name, otherwise the
    /// first `rdf:type` with a usable name
    fn type_name(&self, node: &Term) -> Option<QualifiedName> {
        if let Term::Literal(literal) = node {
            if let Some(datatype) = literal.datatype() {
                return self.qualified_name(&Term::NamedNode(datatype.clone()));
            }
        }
        self.objects(node, &rdf::TYPE)
            .into_iter()
            .find_map(|t| self.qualified_name(&t))
    }

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

    /// The XML information items one graph node stands for.
    ///
    /// Comment annotations expand to comment or instruction items, literals
    /// to text (or significant whitespace), typed nodes to elements.
    /// Anything else recursively expands the first of its values that
    /// produces items.
    fn expand_nodes(&self, node: &Term, out: &mut Vec<NodeEntry>) {
        for annotation in self.objects(node, &rdfs::COMMENT) {
            let Term::Literal(literal) = &annotation else {
                continue;
            };
            let kind = match literal.datatype() {
                Some(dt) if dt != &*xsd::STRING && dt != &*rdf::LANG_STRING => {
                    XmlNodeKind::ProcessingInstruction
                }
                _ => XmlNodeKind::Comment,
            };
            out.push(NodeEntry {
                kind,
                node: annotation.clone(),
            });
        }

        if let Term::Literal(literal) = node {
            if !literal.value().is_empty() {
                let kind = if is_xml_whitespace(literal.value()) {
                    XmlNodeKind::SignificantWhitespace
                } else {
                    XmlNodeKind::Text
                };
                out.push(NodeEntry {
                    kind,
                    node: node.clone(),
                });
            }
            return;
        }

        let is_element = self
            .objects(node, &rdf::TYPE)
            .into_iter()
            .any(|t| self.qualified_name(&t).is_some());
        if is_element {
            out.push(NodeEntry {
                kind: XmlNodeKind::Element,
                node: node.clone(),
            });
        } else {
            for value in self.objects(node, &rdf::VALUE) {
                let mut expanded = Vec::new();
                self.expand_nodes(&value, &mut expanded);
                if !expanded.is_empty() {
                    out.append(&mut expanded);
                    break;
                }
            }
        }
    }

    fn child_entries(&self, node: &Term) -> Vec<NodeEntry> {
        // A value is either a content list or a single directly attached
        // child
        let values = self.objects(node, &rdf::VALUE);
        let collection: Vec<Option<Term>> = if values.is_empty() {
            self.objects(node, &rdfs::MEMBER).into_iter().map(Some).collect()
        } else {
            values
                .iter()
                .find_map(|v| self.enumerate_list(v))
                .unwrap_or_else(|| values.into_iter().map(Some).collect())
        };
        let mut entries = Vec::new();
        for item in collection.into_iter().flatten() {
            self.expand_nodes(&item, &mut entries);
        }
        entries
    }

    fn attribute_entries(&self, node: &Term) -> Vec<AttributeEntry> {
        // Predicates come out of the source grouped because statements sort
        // by predicate under one subject
        let mut groups: Vec<(NamedNode, Vec<Term>)> = Vec::new();
        for (predicate, object) in self.graph.predicate_objects(node) {
            match groups.last_mut() {
                Some((p, objects)) if *p == predicate => objects.push(object),
                _ => groups.push((predicate, vec![object])),
            }
        }
        groups
            .into_iter()
            .filter_map(|(predicate, values)| {
                let name = self.qualified_name(&Term::NamedNode(predicate))?;
                Some(AttributeEntry { name, values })
            })
            .collect()
    }

    fn namespace_entries(&self) -> Vec<(String, String)> {
        let mut entries: Vec<(String, String)> = self
            .graph
            .namespaces()
            .into_iter()
            .filter_map(|(prefix, uri)| Some((prefix, verify_namespace_prefix(&uri)?)))
            .collect();
        if let Some(local) = &self.local_namespace {
            if !entries.iter().any(|(prefix, _)| prefix.is_empty()) {
                entries.push((String::new(), local.clone()));
            }
        }
        entries
    }

    fn find_prefix(&self, namespace: &str) -> Option<String> {
        if Some(namespace) == self.local_namespace.as_deref() {
            return Some(String::new());
        }
        self.graph.prefix_for(&namespace_prefix_uri(namespace))
    }

    fn find_namespace(&self, prefix: &str) -> Option<String> {
        if prefix.is_empty() {
            return self.local_namespace.clone();
        }
        verify_namespace_prefix(&self.graph.namespace_for(prefix)?)
    }

    /// The same declaration priority as the decoding writer, without entity
    /// synthesis
    fn document_type_for_root(&self, root: &str) -> Option<DocumentTypeDecl> {
        let classes = self.objects(&self.document_node, &rdf::TYPE);

        let first_named = |subject: &Term, predicate: &NamedNode| -> Option<NamedNode> {
            self.objects(subject, predicate)
                .into_iter()
                .next()
                .and_then(|t| t.as_named().cloned())
        };
        let first_literal = |subject: &Term| -> Option<String> {
            self.objects(subject, &rdf::VALUE)
                .into_iter()
                .find_map(|t| match t {
                    Term::Literal(l) => Some(l.value().to_string()),
                    _ => None,
                })
        };
        let decl = |public_id: Option<String>,
                    system_id: Option<String>,
                    subset: Option<String>| {
            Some(DocumentTypeDecl {
                name: root.to_string(),
                public_id,
                system_id,
                internal_subset: subset,
            })
        };

        for class in &classes {
            let Some(public_node) = first_named(class, &rdfs::SUB_CLASS_OF) else {
                continue;
            };
            let Some(public_id) = extract_public_id(public_node.as_str()) else {
                continue;
            };
            let public_term = Term::NamedNode(public_node);
            if let Some(system_node) = first_named(&public_term, &rdfs::IS_DEFINED_BY) {
                return decl(
                    Some(public_id),
                    Some(system_node.into_string()),
                    first_literal(class),
                );
            }
        }

        for class in &classes {
            let Some(public_node) = first_named(class, &rdfs::SUB_CLASS_OF) else {
                continue;
            };
            if let Some(public_id) = extract_public_id(public_node.as_str()) {
                return decl(Some(public_id), None, first_literal(class));
            }
        }

        for class in &classes {
            let Some(class_node) = class.as_named() else {
                continue;
            };
            let Some(public_id) = extract_public_id(class_node.as_str()) else {
                continue;
            };
            if let Some(system_node) = first_named(class, &rdfs::IS_DEFINED_BY) {
                return decl(Some(public_id), Some(system_node.into_string()), None);
            }
        }

        for class in &classes {
            let Some(class_node) = class.as_named() else {
                continue;
            };
            if let Some(public_id) = extract_public_id(class_node.as_str()) {
                return decl(Some(public_id), None, None);
            }
        }

        for class in &classes {
            if let Some(subset) = first_literal(class) {
                return decl(None, None, Some(subset));
            }
        }

        None
    }
}

fn is_nil(term: &Term) -> bool {
    term.as_named() == Some(&rdf::NIL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphSink, MemoryGraph};
    use crate::model::{BlankNode, Literal, Triple};
    use crate::uri::create_public_id;
    use std::cell::Cell;

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
        graph.add_triple(Triple::new(s.as_subject().unwrap(), p.clone(), o));
    }

    /// <a xmlns="urn:ex:"><b id="x">hi</b></a> at http://ex/
    fn sample_graph() -> MemoryGraph {
        let mut graph = MemoryGraph::new();
        let a = blank("a1");
        let at = named("urn:ex:#a");
        let b = named("http://ex/#x");
        let bt = named("urn:ex:#b");
        let idt = named("urn:ex:#b/@id");
        add(&mut graph, &doc(), &rdf::VALUE, a.clone());
        add(&mut graph, &a, &rdf::TYPE, at.clone());
        add(&mut graph, &a, &rdf::VALUE, b.clone());
        add(&mut graph, &at, &rdfs::LABEL, Literal::new_typed("a", xsd::NC_NAME.clone()));
        add(&mut graph, &at, &rdfs::IS_DEFINED_BY, named("urn:ex:"));
        add(&mut graph, &b, &rdf::TYPE, bt.clone());
        add(&mut graph, &b, &rdf::VALUE, Literal::new("hi"));
        add(&mut graph, &b, &idt.as_named().unwrap().clone(), Literal::new("x"));
        add(&mut graph, &b, &rdfs::IS_DEFINED_BY, doc());
        add(&mut graph, &bt, &rdfs::LABEL, Literal::new_typed("b", xsd::NC_NAME.clone()));
        add(&mut graph, &bt, &rdfs::IS_DEFINED_BY, named("urn:ex:"));
        add(&mut graph, &idt, &rdfs::LABEL, Literal::new_typed("id", xsd::NC_NAME.clone()));
        add(&mut graph, &idt, &rdfs::IS_DEFINED_BY, bt.clone());
        graph
    }

    #[test]
    fn test_descend_and_read() {
        let graph = sample_graph();
        let mut nav = RdfXmlNavigator::new(&graph, doc());
        assert_eq!(nav.node_kind(), XmlNodeKind::Document);

        assert!(nav.move_to_first_child());
        assert_eq!(nav.node_kind(), XmlNodeKind::Element);
        let name = nav.name().unwrap();
        assert_eq!(name.local_name, "a");
        assert_eq!(name.namespace, "urn:ex:");

        assert!(nav.move_to_first_child());
        assert_eq!(nav.name().unwrap().local_name, "b");

        assert!(nav.move_to_first_child());
        assert_eq!(nav.node_kind(), XmlNodeKind::Text);
        assert_eq!(nav.value().as_deref(), Some("hi"));
        assert!(!nav.move_to_next());

        assert!(nav.move_to_parent());
        assert!(nav.move_to_parent());
        assert_eq!(nav.name().unwrap().local_name, "a");
    }

    #[test]
    fn test_attribute_axis() {
        let graph = sample_graph();
        let mut nav = RdfXmlNavigator::new(&graph, doc());
        nav.move_to_first_child();
        nav.move_to_first_child();
        assert_eq!(nav.name().unwrap().local_name, "b");

        assert!(nav.move_to_first_attribute());
        assert_eq!(nav.node_kind(), XmlNodeKind::Attribute);
        assert_eq!(nav.name().unwrap().local_name, "id");
        // Element-scoped attribute namespaces are invisible in markup
        assert_eq!(nav.value().as_deref(), Some("x"));
        assert!(!nav.move_to_next_attribute());
        assert!(nav.move_to_parent());
        assert_eq!(nav.name().unwrap().local_name, "b");
    }

    #[test]
    fn test_clone_shares_position() {
        let graph = sample_graph();
        let mut nav = RdfXmlNavigator::new(&graph, doc());
        nav.move_to_first_child();
        let copy = nav.clone();
        assert!(nav.is_same_position(&copy));
        assert!(nav.move_to_first_child());
        assert!(!nav.is_same_position(&copy));
        assert!(nav.move_to_parent());
        assert!(nav.is_same_position(&copy));
    }

    #[test]
    fn test_move_to_id() {
        let graph = sample_graph();
        let mut nav = RdfXmlNavigator::new(&graph, doc());
        assert!(nav.move_to_id("x"));
        assert!(nav.move_to_first_child());
        assert_eq!(nav.value().as_deref(), Some("hi"));

        let mut nav = RdfXmlNavigator::new(&graph, doc());
        assert!(!nav.move_to_id("missing"));
        assert_eq!(nav.node_kind(), XmlNodeKind::Document);
    }

    #[test]
    fn test_comment_and_instruction_expansion() {
        let mut graph = MemoryGraph::new();
        let list1 = blank("list1");
        let list2 = blank("list2");
        let c = blank("comment1");
        let p = blank("proc1");
        let pt = named("http://ex/#%23local/?target");
        add(&mut graph, &doc(), &rdf::VALUE, list1.clone());
        add(&mut graph, &list1, &rdf::FIRST, c.clone());
        add(&mut graph, &list1, &rdf::REST, list2.clone());
        add(&mut graph, &list2, &rdf::FIRST, p.clone());
        add(&mut graph, &list2, &rdf::REST, rdf::NIL.clone());
        add(&mut graph, &c, &rdf::VALUE, rdf::NIL.clone());
        add(&mut graph, &c, &rdfs::COMMENT, Literal::new("note"));
        add(&mut graph, &p, &rdf::VALUE, rdf::NIL.clone());
        add(
            &mut graph,
            &p,
            &rdfs::COMMENT,
            Literal::new_typed("data", pt.as_named().unwrap().clone()),
        );
        add(&mut graph, &pt, &rdfs::LABEL, Literal::new_typed("target", xsd::NC_NAME.clone()));
        add(&mut graph, &pt, &rdfs::IS_DEFINED_BY, named("http://ex/#%23local"));

        let mut nav = RdfXmlNavigator::new(&graph, doc());
        assert!(nav.move_to_first_child());
        assert_eq!(nav.node_kind(), XmlNodeKind::Comment);
        assert_eq!(nav.value().as_deref(), Some("note"));
        assert!(nav.move_to_next());
        assert_eq!(nav.node_kind(), XmlNodeKind::ProcessingInstruction);
        // The instruction target names it, unqualified under the local
        // namespace
        let name = nav.name().unwrap();
        assert_eq!(name.local_name, "target");
        assert!(name.namespace.is_empty());
        assert_eq!(nav.value().as_deref(), Some("data"));
    }

    #[test]
    fn test_whitespace_text_kind() {
        let mut graph = MemoryGraph::new();
        add(&mut graph, &doc(), &rdf::VALUE, Literal::new("   "));
        let mut nav = RdfXmlNavigator::new(&graph, doc());
        assert!(nav.move_to_first_child());
        assert_eq!(nav.node_kind(), XmlNodeKind::SignificantWhitespace);
    }

    #[test]
    fn test_namespace_axis() {
        let mut graph = sample_graph();
        graph.declare_namespace("ex", "urn:ex:#").unwrap();
        let mut nav = RdfXmlNavigator::new(&graph, doc());
        nav.move_to_first_child();
        assert!(nav.move_to_first_namespace());
        let mut seen = vec![(nav.name().unwrap().local_name, nav.value().unwrap())];
        while nav.move_to_next_namespace() {
            seen.push((nav.name().unwrap().local_name, nav.value().unwrap()));
        }
        assert!(seen.contains(&("ex".to_string(), "urn:ex:".to_string())));
        // The local namespace appears under the empty prefix
        assert!(seen.contains(&(String::new(), "http://ex/#%23local".to_string())));
    }

    #[test]
    fn test_document_type() {
        let mut graph = sample_graph();
        let public = named(&create_public_id("-//EX//DTD Test//EN"));
        add(&mut graph, &doc(), &rdf::TYPE, public.clone());
        add(
            &mut graph,
            &public,
            &rdfs::IS_DEFINED_BY,
            named("http://ex/test.dtd"),
        );

        let nav = RdfXmlNavigator::new(&graph, doc());
        let decl = nav.document_type().unwrap();
        assert_eq!(decl.name, "a");
        assert_eq!(decl.public_id.as_deref(), Some("-//EX//DTD Test//EN"));
        assert_eq!(decl.system_id.as_deref(), Some("http://ex/test.dtd"));
        assert_eq!(decl.internal_subset, None);
    }

    /// <a xmlns="urn:ex:"><b>one</b><c>two</c></a> at http://ex/, returned
    /// together with the second child element's node
    fn sibling_graph() -> (MemoryGraph, Term) {
        let mut graph = MemoryGraph::new();
        let a = blank("a1");
        let b = blank("b1");
        let c = blank("c1");
        let at = named("urn:ex:#a");
        let bt = named("urn:ex:#b");
        let ct = named("urn:ex:#c");
        let head = blank("l1");
        let rest = blank("l2");
        add(&mut graph, &doc(), &rdf::VALUE, a.clone());
        add(&mut graph, &a, &rdf::TYPE, at.clone());
        add(&mut graph, &a, &rdf::VALUE, head.clone());
        add(&mut graph, &head, &rdf::FIRST, b.clone());
        add(&mut graph, &head, &rdf::REST, rest.clone());
        add(&mut graph, &rest, &rdf::FIRST, c.clone());
        add(&mut graph, &rest, &rdf::REST, Term::NamedNode(rdf::NIL.clone()));
        add(&mut graph, &b, &rdf::TYPE, bt.clone());
        add(&mut graph, &b, &rdf::VALUE, Literal::new("one"));
        add(&mut graph, &c, &rdf::TYPE, ct.clone());
        add(&mut graph, &c, &rdf::VALUE, Literal::new("two"));
        for (node, label) in [(&at, "a"), (&bt, "b"), (&ct, "c")] {
            add(&mut graph, node, &rdfs::LABEL, Literal::new_typed(label, xsd::NC_NAME.clone()));
            add(&mut graph, node, &rdfs::IS_DEFINED_BY, named("urn:ex:"));
        }
        (graph, c)
    }

    /// Reports content reads of one particular node
    struct Watching<'a> {
        inner: &'a MemoryGraph,
        node: Term,
        content_reads: &'a Cell<usize>,
    }

    impl GraphSource for Watching<'_> {
        fn objects_for(&self, subject: &Term, predicate: &NamedNode) -> Vec<Term> {
            if subject == &self.node && predicate == &*rdf::VALUE {
                self.content_reads.set(self.content_reads.get() + 1);
            }
            self.inner.objects_for(subject, predicate)
        }
        fn predicate_objects(&self, subject: &Term) -> Vec<(NamedNode, Term)> {
            if subject == &self.node {
                self.content_reads.set(self.content_reads.get() + 1);
            }
            self.inner.predicate_objects(subject)
        }
        fn contains(&self, subject: &Term, predicate: &NamedNode, object: &Term) -> bool {
            self.inner.contains(subject, predicate, object)
        }
        fn prefix_for(&self, uri: &str) -> Option<String> {
            self.inner.prefix_for(uri)
        }
        fn namespace_for(&self, prefix: &str) -> Option<String> {
            self.inner.namespace_for(prefix)
        }
        fn namespaces(&self) -> Vec<(String, String)> {
            self.inner.namespaces()
        }
    }

    #[test]
    fn test_navigation_is_lazy() {
        let (graph, second) = sibling_graph();
        let reads = Cell::new(0);
        let watching = Watching {
            inner: &graph,
            node: second,
            content_reads: &reads,
        };
        let mut nav = RdfXmlNavigator::new(watching, doc());

        assert!(nav.move_to_first_child());
        assert!(nav.move_to_first_child());
        assert_eq!(nav.name().unwrap().local_name, "b");
        // Reading the first sibling's subtree leaves the second untouched
        assert!(nav.move_to_first_child());
        assert_eq!(nav.value().as_deref(), Some("one"));
        assert!(nav.move_to_parent());
        assert_eq!(reads.get(), 0);

        assert!(nav.move_to_next());
        assert_eq!(nav.name().unwrap().local_name, "c");
        assert!(nav.move_to_first_child());
        assert_eq!(nav.value().as_deref(), Some("two"));
        assert!(reads.get() > 0);
    }
}
