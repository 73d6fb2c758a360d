//! Tree-cursor front end for the encoding processor
//!
//! [`XmlTreeCursor`] is the read-only cursor capability a document tree must
//! offer so that [`XmlTreeConverter`] can drive [`XmlToRdfProcessor`] over
//! it. [`RdfXmlNavigator`] implements the trait, which makes a structural
//! graph re-encodable without ever serializing it back to markup.

use crate::encoder::{
    ElementEvent, NamespaceResolver, NodeContent, XmlToRdfOptions, XmlToRdfProcessor,
};
use crate::graph::{GraphSink, GraphSource};
use crate::infoset::{AttributeNode, DocumentTypeDecl, QualifiedName, XmlNodeKind};
use crate::model::Term;
use crate::navigator::RdfXmlNavigator;
use crate::{Result, XmlRdfError};

/// Cursor over an XML document tree.
///
/// All moves return whether they succeeded; a failed move leaves the
/// position unchanged, except that a failed `move_to_next` during attribute
/// iteration still requires [`move_to_parent`](Self::move_to_parent) to
/// leave the attribute axis.
pub trait XmlTreeCursor: Clone {
    fn node_kind(&self) -> XmlNodeKind;

    /// The expanded name of the current node, when it has one
    fn name(&self) -> Option<QualifiedName>;

    /// The text value of the current node, when it carries one
    fn value(&self) -> Option<String>;

    /// The `xml:lang` value in effect
    fn language(&self) -> Option<String>;

    /// The base URI in effect
    fn base_uri(&self) -> Option<String>;

    /// Whether the current element was written as an empty tag
    fn is_empty_element(&self) -> bool;

    /// The declared type of the current node's value, when known
    fn type_name(&self) -> Option<QualifiedName> {
        None
    }

    /// The document type declaration, when the tree carries one
    fn document_type(&self) -> Option<DocumentTypeDecl> {
        None
    }

    fn move_to_first_child(&mut self) -> bool;
    fn move_to_next(&mut self) -> bool;
    fn move_to_parent(&mut self) -> bool;
    fn move_to_first_attribute(&mut self) -> bool;
    fn move_to_next_attribute(&mut self) -> bool;

    /// The namespace bound to a prefix at the current position
    fn lookup_namespace(&self, prefix: &str) -> Option<String>;
}

/// Converts any [`XmlTreeCursor`] tree into structural-graph statements
#[derive(Debug, Clone, Default)]
pub struct XmlTreeConverter {
    options: XmlToRdfOptions,
}

impl XmlTreeConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: XmlToRdfOptions) -> Self {
        XmlTreeConverter { options }
    }

    /// Convert the subtree under the cursor into the sink.
    ///
    /// Returns the node of the converted item, or `None` when the
    /// whitespace policy dropped it. Entering at an attribute or namespace
    /// position is not convertible and fails with
    /// [`XmlRdfError::UnsupportedNodeKind`].
    pub fn convert<C: XmlTreeCursor, S: GraphSink>(
        &self,
        cursor: &C,
        sink: &mut S,
    ) -> Result<Option<Term>> {
        let mut processor = XmlToRdfProcessor::new(sink, self.options.clone())?;
        let mut cursor = cursor.clone();
        let base_uri = cursor.base_uri();
        let result = convert_root(&mut processor, &mut cursor, base_uri.as_deref());
        let ended = processor.finish(result.is_ok());
        let node = result?;
        ended?;
        Ok(node)
    }
}

fn convert_root<C: XmlTreeCursor, S: GraphSink>(
    processor: &mut XmlToRdfProcessor<'_, S>,
    cursor: &mut C,
    base_uri: Option<&str>,
) -> Result<Option<Term>> {
    let base_node = processor.make_uri_node(base_uri)?;
    convert_node(processor, cursor, &base_node, base_uri, &None)
}

fn convert_node<C: XmlTreeCursor, S: GraphSink>(
    processor: &mut XmlToRdfProcessor<'_, S>,
    cursor: &mut C,
    base_node: &Term,
    original_base_uri: Option<&str>,
    default_namespace: &Option<Term>,
) -> Result<Option<Term>> {
    match cursor.node_kind() {
        XmlNodeKind::Document => {
            let base_uri = cursor.base_uri();
            let doctype = cursor.document_type();
            let mut content = TreeContent {
                cursor,
                original_base_uri: base_uri.clone(),
                default_namespace: default_namespace.clone(),
                doctype,
                state: ContentState::Fresh,
            };
            processor
                .process_document(base_uri.as_deref(), &mut content)
                .map(Some)
        }
        XmlNodeKind::Element => {
            let Some(name) = cursor.name() else {
                return Err(XmlRdfError::MalformedName(
                    "element without a usable name".to_string(),
                ));
            };
            let event = ElementEvent {
                name,
                base_uri: cursor.base_uri(),
                language: cursor.language(),
                is_empty: cursor.is_empty_element(),
                attributes: collect_attributes(cursor),
            };
            let resolver = CursorScope(cursor.clone());
            let mut content = TreeContent {
                cursor,
                original_base_uri: event.base_uri.clone(),
                default_namespace: default_namespace.clone(),
                doctype: None,
                state: ContentState::Fresh,
            };
            processor
                .process_element(
                    &event,
                    base_node,
                    original_base_uri,
                    default_namespace,
                    &resolver,
                    &mut content,
                )
                .map(Some)
        }
        XmlNodeKind::Text => processor
            .process_text(
                &cursor.value().unwrap_or_default(),
                cursor.language().as_deref(),
                false,
            )
            .map(Some),
        XmlNodeKind::Cdata => processor
            .process_text(
                &cursor.value().unwrap_or_default(),
                cursor.language().as_deref(),
                true,
            )
            .map(Some),
        XmlNodeKind::Whitespace => processor.process_whitespace(
            &cursor.value().unwrap_or_default(),
            cursor.language().as_deref(),
            false,
        ),
        XmlNodeKind::SignificantWhitespace => processor.process_whitespace(
            &cursor.value().unwrap_or_default(),
            cursor.language().as_deref(),
            true,
        ),
        XmlNodeKind::Comment => processor
            .process_comment(&cursor.value().unwrap_or_default())
            .map(Some),
        XmlNodeKind::ProcessingInstruction => {
            let target = cursor
                .name()
                .map(|n| n.local_name)
                .ok_or_else(|| XmlRdfError::MalformedName("instruction without a target".to_string()))?;
            processor
                .process_processing_instruction(
                    &target,
                    &cursor.value().unwrap_or_default(),
                    cursor.base_uri().as_deref(),
                    default_namespace,
                )
                .map(Some)
        }
        XmlNodeKind::EntityReference => {
            let name = cursor
                .name()
                .map(|n| n.local_name)
                .ok_or_else(|| XmlRdfError::MalformedName("entity reference without a name".to_string()))?;
            processor.process_entity_reference(&name).map(Some)
        }
        kind => Err(XmlRdfError::UnsupportedNodeKind(kind.to_string())),
    }
}

fn collect_attributes<C: XmlTreeCursor>(cursor: &mut C) -> Vec<AttributeNode> {
    let mut attributes = Vec::new();
    if cursor.move_to_first_attribute() {
        loop {
            if let Some(name) = cursor.name() {
                let mut attribute = AttributeNode::new(name, cursor.value().unwrap_or_default());
                attribute.declared_type = cursor.type_name();
                attributes.push(attribute);
            }
            if !cursor.move_to_next_attribute() {
                break;
            }
        }
        cursor.move_to_parent();
    }
    attributes
}

/// Namespace resolution frozen at one tree position
struct CursorScope<C: XmlTreeCursor>(C);

impl<C: XmlTreeCursor> NamespaceResolver for CursorScope<C> {
    fn lookup_namespace(&self, prefix: &str) -> Option<String> {
        self.0.lookup_namespace(prefix)
    }
}

enum ContentState {
    Fresh,
    Active,
    Done,
}

/// Child supplier that advances the shared cursor between calls
struct TreeContent<'a, C: XmlTreeCursor> {
    cursor: &'a mut C,
    original_base_uri: Option<String>,
    default_namespace: Option<Term>,
    doctype: Option<DocumentTypeDecl>,
    state: ContentState,
}

impl<C: XmlTreeCursor, S: GraphSink> NodeContent<S> for TreeContent<'_, C> {
    fn next_child(
        &mut self,
        processor: &mut XmlToRdfProcessor<'_, S>,
        base_node: &Term,
    ) -> Result<Option<Option<Term>>> {
        if matches!(self.state, ContentState::Fresh) {
            // The declaration precedes content, so it may still pick the
            // default namespace for it
            if let Some(decl) = self.doctype.take() {
                processor.process_document_type(
                    decl.public_id.as_deref(),
                    decl.system_id.as_deref(),
                    decl.internal_subset.as_deref(),
                    true,
                    base_node,
                    &mut self.default_namespace,
                )?;
            }
        }
        let moved = match self.state {
            ContentState::Fresh => {
                self.state = ContentState::Active;
                self.cursor.move_to_first_child()
            }
            ContentState::Active => self.cursor.move_to_next(),
            ContentState::Done => false,
        };
        if !moved {
            if matches!(self.state, ContentState::Active) {
                self.cursor.move_to_parent();
            }
            self.state = ContentState::Done;
            return Ok(None);
        }
        let node = convert_node(
            processor,
            self.cursor,
            base_node,
            self.original_base_uri.as_deref(),
            &self.default_namespace,
        )?;
        Ok(Some(node))
    }
}

impl<G: GraphSource> XmlTreeCursor for RdfXmlNavigator<G> {
    fn node_kind(&self) -> XmlNodeKind {
        self.node_kind()
    }

    fn name(&self) -> Option<QualifiedName> {
        self.name()
    }

    fn value(&self) -> Option<String> {
        self.value()
    }

    fn language(&self) -> Option<String> {
        self.language()
    }

    fn base_uri(&self) -> Option<String> {
        self.base_uri()
    }

    fn is_empty_element(&self) -> bool {
        self.is_empty_element()
    }

    fn type_name(&self) -> Option<QualifiedName> {
        self.type_name()
    }

    fn document_type(&self) -> Option<DocumentTypeDecl> {
        self.document_type()
    }

    fn move_to_first_child(&mut self) -> bool {
        self.move_to_first_child()
    }

    fn move_to_next(&mut self) -> bool {
        self.move_to_next()
    }

    fn move_to_parent(&mut self) -> bool {
        self.move_to_parent()
    }

    fn move_to_first_attribute(&mut self) -> bool {
        self.move_to_first_attribute()
    }

    fn move_to_next_attribute(&mut self) -> bool {
        self.move_to_next_attribute()
    }

    fn lookup_namespace(&self, prefix: &str) -> Option<String> {
        self.lookup_namespace(prefix)
    }
}
