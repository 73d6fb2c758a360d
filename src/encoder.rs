//! Encoding processor: XML infoset events to structural-graph statements
//!
//! [`XmlToRdfProcessor`] is driven by an XML front end (see [`crate::reader`]
//! and [`crate::tree`]) through one `process_*` call per information item.
//! Child content is pulled lazily through the [`NodeContent`] callback so
//! that an element's statements are emitted in document order without the
//! front end materializing a tree.
//!
//! Every name in the produced graph follows the composition grammar in
//! [`crate::uri`]: element types are `compose(namespace, localName)`,
//! attribute types prepend `@`, notation types prepend `?`, and identifiers
//! compose against the document base URI.

use crate::graph::GraphSink;
use crate::infoset::{
    verify_name, verify_ncname, AttributeNode, QualifiedName, UniqueNamer, WhitespaceHandling,
};
use crate::model::{BlankNode, Literal, NamedNode, Term};
use crate::uri::{compose_uri, is_absolute_uri, namespace_prefix_uri, resolve_relative};
use crate::vocab::{rdf, rdfs, xsd, XML_NAMESPACE, XSI_NAMESPACE};
use crate::{Result, XmlRdfError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Name component addressing the anonymous per-document namespace
pub(crate) const LOCAL_NAMESPACE: &str = "%23local";

/// Prefix-to-namespace resolution at the current point of the document
pub trait NamespaceResolver {
    /// The namespace bound to the prefix, the default namespace for `""`
    fn lookup_namespace(&self, prefix: &str) -> Option<String>;
}

impl NamespaceResolver for HashMap<String, String> {
    fn lookup_namespace(&self, prefix: &str) -> Option<String> {
        self.get(prefix).cloned()
    }
}

/// Lazy supplier of an element's or document's child nodes.
///
/// `next_child` converts the next child by calling back into the processor
/// and returns its resulting node. The outer `None` ends the content; the
/// inner `None` marks a child that produced no node (dropped whitespace).
pub trait NodeContent<S: GraphSink> {
    fn next_child(
        &mut self,
        processor: &mut XmlToRdfProcessor<'_, S>,
        base_node: &Term,
    ) -> Result<Option<Option<Term>>>;
}

/// A start-element information item with its attributes
#[derive(Debug, Clone)]
pub struct ElementEvent {
    pub name: QualifiedName,
    /// Base URI of the entity the element came from
    pub base_uri: Option<String>,
    /// In-scope `xml:lang` value
    pub language: Option<String>,
    /// True for `<e/>` as opposed to `<e></e>`
    pub is_empty: bool,
    pub attributes: Vec<AttributeNode>,
}

/// Encoding options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct XmlToRdfOptions {
    /// Let a namespace-eligible DOCTYPE public identifier act as the
    /// default namespace for unqualified names
    pub use_dtd_as_default_namespace: bool,
    /// Which whitespace-only text nodes survive encoding
    pub whitespace_handling: WhitespaceHandling,
    /// Encode attributes defaulted from the DTD as if written out
    pub export_default: bool,
    /// Namespaces assigned to well-known processing-instruction targets
    pub processing_instruction_mapping: HashMap<String, String>,
    /// Instruction target that carries unexpanded entity references, see
    /// [`crate::infoset::EntityPlaceholder`]
    pub entity_instruction_name: Option<String>,
}

impl Default for XmlToRdfOptions {
    fn default() -> Self {
        let mut processing_instruction_mapping = HashMap::new();
        processing_instruction_mapping.insert("xml-stylesheet".to_string(), XML_NAMESPACE.to_string());
        XmlToRdfOptions {
            use_dtd_as_default_namespace: true,
            whitespace_handling: WhitespaceHandling::default(),
            export_default: false,
            processing_instruction_mapping,
            entity_instruction_name: None,
        }
    }
}

#[derive(Debug, Default)]
struct ElementValueInfo {
    is_nil: Option<bool>,
    datatype: Option<NamedNode>,
}

/// The encoding processor
///
/// One processor instance corresponds to one conversion run: blank node
/// names, the base-less URI cache and the local-namespace nodes are scoped
/// to it. [`new`](Self::new) opens the run on the sink, [`finish`](Self::finish)
/// closes it.
pub struct XmlToRdfProcessor<'a, S: GraphSink> {
    sink: &'a mut S,
    options: XmlToRdfOptions,
    namer: UniqueNamer,
    /// URI strings carried by blank nodes standing in for unresolvable URIs
    local_uris: HashMap<Term, String>,
    uri_blank_nodes: HashMap<String, Term>,
}

impl<'a, S: GraphSink> XmlToRdfProcessor<'a, S> {
    /// Open a conversion run on the sink
    pub fn new(sink: &'a mut S, options: XmlToRdfOptions) -> Result<Self> {
        sink.begin()?;
        sink.declare_namespace("rdf", rdf::NAMESPACE)?;
        sink.declare_namespace("rdfs", rdfs::NAMESPACE)?;
        sink.declare_namespace("xsd", xsd::NAMESPACE)?;
        debug!("starting XML to RDF run");
        Ok(XmlToRdfProcessor {
            sink,
            options,
            namer: UniqueNamer::new(),
            local_uris: HashMap::new(),
            uri_blank_nodes: HashMap::new(),
        })
    }

    /// Close the run; `committed` is false when conversion failed
    pub fn finish(self, committed: bool) -> Result<()> {
        debug!(committed, "ending XML to RDF run");
        self.sink.end(committed)
    }

    /// Encode the document information item and return its node
    pub fn process_document(
        &mut self,
        base_uri: Option<&str>,
        content: &mut dyn NodeContent<S>,
    ) -> Result<Term> {
        let base_node = self.make_uri_node(base_uri)?;
        let value = self
            .make_list(content, &base_node)?
            .unwrap_or_else(|| rdf::NIL.clone().into());
        self.assert(&base_node, &rdf::VALUE, value)?;
        Ok(base_node)
    }

    /// Encode a document type declaration against the document node.
    ///
    /// `use_as_namespace` marks a declaration whose public identifier may
    /// become the default namespace; `default_namespace` is filled in when
    /// that happens and no namespace was chosen yet.
    pub fn process_document_type(
        &mut self,
        public_id: Option<&str>,
        system_id: Option<&str>,
        internal_subset: Option<&str>,
        use_as_namespace: bool,
        base_node: &Term,
        default_namespace: &mut Option<Term>,
    ) -> Result<()> {
        let mut base_type: Option<Term> = None;
        if let Some(public_id) = public_id {
            let public_node = Term::NamedNode(NamedNode::new(crate::uri::create_public_id(public_id)));
            self.assert(
                &public_node,
                &rdfs::LABEL,
                Literal::new_typed(public_id, xsd::PUBLIC.clone()),
            )?;
            if let Some(system_id) = system_id {
                let system_node = self.make_absolute_node(base_node, system_id)?;
                self.assert(&public_node, &rdfs::IS_DEFINED_BY, system_node)?;
            }
            if use_as_namespace && self.options.use_dtd_as_default_namespace {
                default_namespace.get_or_insert_with(|| public_node.clone());
            }
            base_type = Some(public_node);
        } else if let Some(system_id) = system_id {
            let system_node = self.make_absolute_node(base_node, system_id)?;
            let doctype_node = self.blank_node("doctype");
            self.assert(&doctype_node, &rdfs::IS_DEFINED_BY, system_node)?;
            base_type = Some(doctype_node);
        }
        if let Some(subset) = internal_subset.filter(|s| !s.trim().is_empty()) {
            let subset_type = self.blank_node("dtd");
            self.assert(&subset_type, &rdf::VALUE, Literal::new(subset))?;
            if let Some(base_type) = &base_type {
                self.assert(&subset_type, &rdfs::SUB_CLASS_OF, base_type.clone())?;
            }
            base_type = Some(subset_type);
        }
        if let Some(base_type) = base_type {
            self.assert(base_node, &rdf::TYPE, base_type)?;
        }
        Ok(())
    }

    /// Encode a whitespace-only text node, subject to the whitespace policy
    pub fn process_whitespace(
        &mut self,
        text: &str,
        language: Option<&str>,
        significant: bool,
    ) -> Result<Option<Term>> {
        let keep = match self.options.whitespace_handling {
            WhitespaceHandling::All => true,
            WhitespaceHandling::Significant => significant,
            WhitespaceHandling::None => false,
        };
        if keep {
            self.process_text(text, language, false).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Encode a text or CDATA node
    pub fn process_text(&mut self, text: &str, language: Option<&str>, cdata: bool) -> Result<Term> {
        let text_value = Self::language_literal(text, language);
        if cdata {
            let cdata_node = self.blank_node("cdata");
            self.assert(&cdata_node, &rdf::VALUE, text_value)?;
            Ok(cdata_node)
        } else {
            Ok(Term::Literal(text_value))
        }
    }

    /// Encode a comment node
    pub fn process_comment(&mut self, text: &str) -> Result<Term> {
        let comment_node = self.blank_node("comment");
        self.assert(&comment_node, &rdf::VALUE, rdf::NIL.clone())?;
        self.assert(&comment_node, &rdfs::COMMENT, Literal::new(text))?;
        Ok(comment_node)
    }

    /// Encode a processing instruction.
    ///
    /// An instruction whose target is the configured entity placeholder
    /// stands for an unexpanded entity reference and encodes as the base
    /// URI node instead.
    pub fn process_processing_instruction(
        &mut self,
        target: &str,
        data: &str,
        base_uri: Option<&str>,
        default_namespace: &Option<Term>,
    ) -> Result<Term> {
        if self.options.entity_instruction_name.as_deref() == Some(target) {
            return self.make_uri_node(base_uri);
        }
        let proc_node = self.blank_node("proc");
        self.assert(&proc_node, &rdf::VALUE, rdf::NIL.clone())?;
        let datatype_node =
            self.create_processing_instruction_type(target, base_uri, default_namespace)?;
        let literal = match datatype_node.as_named() {
            Some(datatype) => Literal::new_typed(data, datatype.clone()),
            None => Literal::new(data),
        };
        self.assert(&proc_node, &rdfs::COMMENT, literal)?;
        Ok(proc_node)
    }

    /// Encode an element and, through `content`, its children
    pub fn process_element(
        &mut self,
        element: &ElementEvent,
        base_node: &Term,
        original_base_uri: Option<&str>,
        default_namespace: &Option<Term>,
        resolver: &dyn NamespaceResolver,
        content: &mut dyn NodeContent<S>,
    ) -> Result<Term> {
        trace!(name = %element.name, "processing element");
        let same_base = element.base_uri.as_deref() == original_base_uri;

        let element_type =
            self.create_element_type(&element.name, element.base_uri.as_deref(), default_namespace)?;

        let mut assertions: Vec<(Term, Term)> = Vec::new();
        let mut id: Option<String> = None;
        let mut inner_base_node = base_node.clone();
        let mut info = ElementValueInfo::default();

        for attribute in &element.attributes {
            if attribute.is_default && !self.options.export_default {
                continue;
            }
            let property = self.create_attribute_type(&attribute.name, &element_type)?;
            let attr_value = self.create_attribute_value(
                attribute,
                element.base_uri.as_deref(),
                element.language.as_deref(),
            )?;
            assertions.push((property, attr_value.clone()));

            if attr_value
                .as_literal()
                .is_some_and(|l| l.has_datatype(&xsd::ID))
            {
                id = Some(verify_ncname(&attribute.value)?.to_string());
            } else if attribute.name.namespace == XML_NAMESPACE {
                match attribute.name.local_name.as_str() {
                    "id" => id = Some(verify_ncname(&attribute.value)?.to_string()),
                    "base" => {
                        if same_base {
                            inner_base_node = self.make_absolute_node(base_node, &attribute.value)?;
                        }
                    }
                    _ => {}
                }
            } else if attribute.name.namespace == XSI_NAMESPACE {
                match attribute.name.local_name.as_str() {
                    "nil" => info.is_nil = Some(parse_xml_boolean(&attribute.value)?),
                    "type" => {
                        info.datatype = self
                            .resolve_name(
                                verify_name(&attribute.value)?,
                                element.base_uri.as_deref(),
                                default_namespace,
                                resolver,
                            )?
                            .and_then(|t| t.as_named().cloned());
                    }
                    _ => {}
                }
            }
        }

        let element_node = match id {
            Some(id) => {
                let doc_base = self.make_uri_node(element.base_uri.as_deref())?;
                self.create_id_node(&doc_base, &id)?
            }
            None => self.blank_node(&element.name.local_name),
        };
        self.assert(&element_node, &rdf::TYPE, element_type)?;
        for (property, attr_value) in assertions {
            match property.as_named() {
                Some(predicate) => {
                    let predicate = predicate.clone();
                    self.assert(&element_node, &predicate, attr_value)?;
                }
                // An attribute type under an unresolvable namespace has no
                // URI; the statement cannot be formed
                None => self.sink.warning("attribute type has no addressable name"),
            }
        }
        let element_value = self.create_element_value(content, &inner_base_node, element.is_empty, info)?;
        self.assert(&element_node, &rdf::VALUE, element_value)?;
        Ok(element_node)
    }

    /// Encode an unexpanded entity reference
    pub fn process_entity_reference(&mut self, name: &str) -> Result<Term> {
        Ok(Term::Literal(Literal::new_typed(
            format!("&{name};"),
            rdf::XML_LITERAL.clone(),
        )))
    }

    /// Direct access to the options the processor runs with
    pub fn options(&self) -> &XmlToRdfOptions {
        &self.options
    }

    fn make_list(
        &mut self,
        content: &mut dyn NodeContent<S>,
        base_node: &Term,
    ) -> Result<Option<Term>> {
        let mut list_head: Option<Term> = None;
        let mut list_tail: Option<Term> = None;

        while let Some(item) = content.next_child(self, base_node)? {
            let Some(current) = item else { continue };

            let head = match list_head.take() {
                // A single node is its own content value, no list cell yet
                None => {
                    list_head = Some(current);
                    continue;
                }
                Some(head) => head,
            };
            let tail = match list_tail.take() {
                Some(tail) => {
                    list_head = Some(head);
                    tail
                }
                None => {
                    // Second node seen, wrap the first into a list cell
                    let new_head = self.blank_node("list");
                    self.assert(&new_head, &rdf::FIRST, head)?;
                    list_head = Some(new_head.clone());
                    new_head
                }
            };
            let cell = self.blank_node("list");
            self.assert(&tail, &rdf::REST, cell.clone())?;
            self.assert(&cell, &rdf::FIRST, current)?;
            list_tail = Some(cell);
        }

        if let Some(tail) = &list_tail {
            self.assert(tail, &rdf::REST, rdf::NIL.clone())?;
        }
        Ok(list_head)
    }

    fn create_element_value(
        &mut self,
        content: &mut dyn NodeContent<S>,
        base_node: &Term,
        empty: bool,
        info: ElementValueInfo,
    ) -> Result<Term> {
        let mut element_value: Option<Term> = None;
        if empty {
            if info.is_nil != Some(false) {
                element_value = Some(rdf::NIL.clone().into());
            }
        } else {
            element_value = self.make_list(content, base_node)?;
            match &element_value {
                None if info.is_nil == Some(true) => {
                    element_value = Some(rdf::NIL.clone().into());
                }
                Some(Term::Literal(literal)) => {
                    // xsi:type overrides an existing non-string datatype
                    let retype = info.datatype.is_some()
                        && literal.datatype().unwrap_or(&xsd::STRING) != &*xsd::STRING;
                    if retype {
                        element_value = Some(Term::Literal(Literal::new_maybe_typed(
                            literal.value(),
                            info.datatype.clone(),
                        )));
                    }
                }
                _ => {}
            }
        }
        Ok(element_value
            .unwrap_or_else(|| Term::Literal(Literal::new_maybe_typed("", info.datatype))))
    }

    fn assert(&mut self, subject: &Term, predicate: &NamedNode, object: impl Into<Term>) -> Result<()> {
        match subject.as_subject() {
            Some(subject) => self
                .sink
                .insert(crate::model::Triple::new(subject, predicate.clone(), object)),
            None => Ok(()),
        }
    }

    fn blank_node(&mut self, name: &str) -> Term {
        Term::BlankNode(BlankNode::new(self.namer.next(name)))
    }

    pub(crate) fn make_uri_node(&mut self, uri: Option<&str>) -> Result<Term> {
        match uri {
            Some(uri) => Ok(Term::NamedNode(NamedNode::new(uri))),
            None => self.cache_uri_node(""),
        }
    }

    /// Blank stand-in for a URI that cannot be made absolute; one node per
    /// distinct URI string within the run
    fn cache_uri_node(&mut self, uri: &str) -> Result<Term> {
        if let Some(node) = self.uri_blank_nodes.get(uri) {
            return Ok(node.clone());
        }
        let node = self.blank_node("uri");
        self.uri_blank_nodes.insert(uri.to_string(), node.clone());
        self.local_uris.insert(node.clone(), uri.to_string());
        self.assert(
            &node,
            &rdfs::LABEL,
            Literal::new_typed(uri, xsd::ANY_URI.clone()),
        )?;
        Ok(node)
    }

    fn make_composed_node(&mut self, base_node: &Term, component: &str) -> Result<Term> {
        if let Some(base) = base_node.as_named() {
            Ok(Term::NamedNode(NamedNode::new(compose_uri(
                base.as_str(),
                component,
            ))))
        } else if let Some(base_uri) = self.local_uris.get(base_node).cloned() {
            self.cache_uri_node(&compose_uri(&base_uri, component))
        } else {
            Ok(self.blank_node("uri"))
        }
    }

    fn make_absolute_node(&mut self, base_node: &Term, relative: &str) -> Result<Term> {
        if let Some(base) = base_node.as_named() {
            Ok(Term::NamedNode(NamedNode::new(resolve_relative(
                base.as_str(),
                relative,
            )?)))
        } else if is_absolute_uri(relative) {
            Ok(Term::NamedNode(NamedNode::new(relative)))
        } else if let Some(base_uri) = self.local_uris.get(base_node).cloned() {
            self.cache_uri_node(&format!("{base_uri}{relative}"))
        } else {
            Ok(self.blank_node("uri"))
        }
    }

    fn create_sub_node(&mut self, base_node: &Term, component: &str) -> Result<Term> {
        let node = self.make_composed_node(base_node, component)?;
        self.assert(&node, &rdfs::IS_DEFINED_BY, base_node.clone())?;
        Ok(node)
    }

    fn create_id_node(&mut self, base_node: &Term, id: &str) -> Result<Term> {
        self.create_sub_node(base_node, id)
    }

    fn create_notation_type_node(&mut self, base_node: &Term, local_name: &str) -> Result<Term> {
        self.create_sub_node(base_node, &format!("?{local_name}"))
    }

    fn create_local_namespace(&mut self, base_node: &Term) -> Result<Term> {
        let node = self.create_sub_node(base_node, LOCAL_NAMESPACE)?;
        self.use_namespace("", &node)?;
        Ok(node)
    }

    fn use_namespace(&mut self, prefix: &str, namespace_node: &Term) -> Result<()> {
        if let Some(uri) = namespace_node.as_named() {
            self.sink
                .declare_namespace(prefix, &namespace_prefix_uri(uri.as_str()))?;
        }
        Ok(())
    }

    fn resolve_namespace(
        &mut self,
        name: &QualifiedName,
        base_uri: Option<&str>,
        default_namespace: &Option<Term>,
    ) -> Result<Term> {
        if !name.namespace.is_empty() {
            let namespace_node = Term::NamedNode(NamedNode::new(&name.namespace));
            if !name.prefix.is_empty() {
                self.use_namespace(&name.prefix, &namespace_node)?;
                self.assert(
                    &namespace_node,
                    &rdfs::LABEL,
                    Literal::new_typed(&name.prefix, xsd::NC_NAME.clone()),
                )?;
            }
            return Ok(namespace_node);
        }
        match default_namespace {
            Some(namespace) => Ok(namespace.clone()),
            None => {
                let base_node = self.make_uri_node(base_uri)?;
                self.create_local_namespace(&base_node)
            }
        }
    }

    fn resolve_name(
        &mut self,
        name: &str,
        base_uri: Option<&str>,
        default_namespace: &Option<Term>,
        resolver: &dyn NamespaceResolver,
    ) -> Result<Option<Term>> {
        let (namespace_node, local_name) = match name.split_once(':') {
            Some((prefix, local_name)) => {
                match resolver.lookup_namespace(prefix).filter(|ns| !ns.is_empty()) {
                    Some(ns) => (Term::NamedNode(NamedNode::new(ns)), local_name),
                    None => return Ok(None),
                }
            }
            None => {
                let node = match resolver.lookup_namespace("").filter(|ns| !ns.is_empty()) {
                    Some(ns) => Term::NamedNode(NamedNode::new(ns)),
                    None => match default_namespace {
                        Some(namespace) => namespace.clone(),
                        None => {
                            let base_node = self.make_uri_node(base_uri)?;
                            self.create_local_namespace(&base_node)?
                        }
                    },
                };
                (node, name)
            }
        };
        self.make_composed_node(&namespace_node, local_name).map(Some)
    }

    fn assign_node_name(&mut self, name: &QualifiedName, node: &Term) -> Result<()> {
        self.assert(
            node,
            &rdfs::LABEL,
            Literal::new_typed(&name.local_name, xsd::NC_NAME.clone()),
        )?;
        if !name.prefix.is_empty() {
            self.assert(
                node,
                &rdfs::LABEL,
                Literal::new_typed(name.prefixed(), xsd::Q_NAME.clone()),
            )?;
        }
        Ok(())
    }

    fn create_element_type(
        &mut self,
        name: &QualifiedName,
        base_uri: Option<&str>,
        default_namespace: &Option<Term>,
    ) -> Result<Term> {
        let namespace = self.resolve_namespace(name, base_uri, default_namespace)?;
        let node = self.create_sub_node(&namespace, &name.local_name)?;
        self.assign_node_name(name, &node)?;
        Ok(node)
    }

    fn create_attribute_type(&mut self, name: &QualifiedName, element_type: &Term) -> Result<Term> {
        let component = format!("@{}", name.local_name);
        let node = if name.namespace.is_empty() {
            // Unprefixed attributes live in an element-scoped namespace
            self.create_sub_node(element_type, &component)?
        } else {
            let base_node = Term::NamedNode(NamedNode::new(&name.namespace));
            if !name.prefix.is_empty() {
                self.use_namespace(&name.prefix, &base_node)?;
                self.assert(
                    &base_node,
                    &rdfs::LABEL,
                    Literal::new_typed(&name.prefix, xsd::NC_NAME.clone()),
                )?;
            }
            self.create_sub_node(&base_node, &component)?
        };
        self.assign_node_name(name, &node)?;
        Ok(node)
    }

    fn create_processing_instruction_type(
        &mut self,
        target: &str,
        base_uri: Option<&str>,
        default_namespace: &Option<Term>,
    ) -> Result<Term> {
        let name = QualifiedName::local(target);
        let namespace = match self.options.processing_instruction_mapping.get(target) {
            Some(uri) => Term::NamedNode(NamedNode::new(uri.clone())),
            None => self.resolve_namespace(&name, base_uri, default_namespace)?,
        };
        let node = self.create_notation_type_node(&namespace, target)?;
        self.assign_node_name(&name, &node)?;
        Ok(node)
    }

    fn language_literal(value: &str, language: Option<&str>) -> Literal {
        match language.filter(|l| !l.is_empty()) {
            Some(language) => Literal::new_language_tagged(value, language),
            None => Literal::new(value),
        }
    }

    fn create_attribute_value(
        &mut self,
        attribute: &AttributeNode,
        base_uri: Option<&str>,
        language: Option<&str>,
    ) -> Result<Term> {
        let datatype = attribute
            .declared_type
            .as_ref()
            .map(|t| NamedNode::new(compose_uri(&t.namespace, &t.local_name)));
        if let Some(datatype) = &datatype {
            if datatype == &*xsd::IDREF {
                let base_node = self.make_uri_node(base_uri)?;
                return self.create_id_node(&base_node, &attribute.value);
            } else if datatype == &*xsd::NOTATION {
                let base_node = self.make_uri_node(base_uri)?;
                return self.create_notation_type_node(&base_node, &attribute.value);
            } else if datatype == &*rdf::LANG_STRING {
                return Ok(Term::Literal(Self::language_literal(
                    &attribute.value,
                    language,
                )));
            }
        }
        Ok(Term::Literal(Literal::new_maybe_typed(
            &attribute.value,
            datatype,
        )))
    }
}

fn parse_xml_boolean(value: &str) -> Result<bool> {
    match value.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(XmlRdfError::MalformedName(format!(
            "not an XML boolean: {other}"
        ))),
    }
}
