//! RDF term and statement types used by the structural graph
//!
//! A deliberately small model: named nodes (IRIs), blank nodes, literals
//! (plain, language-tagged or datatyped) and triples whose subjects are
//! named or blank nodes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An RDF IRI node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NamedNode {
    iri: String,
}

impl NamedNode {
    /// Create a new named node from an IRI string
    pub fn new(iri: impl Into<String>) -> Self {
        NamedNode { iri: iri.into() }
    }

    /// Get the IRI as a string slice
    pub fn as_str(&self) -> &str {
        &self.iri
    }

    /// Consume the node and return the IRI
    pub fn into_string(self) -> String {
        self.iri
    }
}

impl fmt::Display for NamedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.iri)
    }
}

/// An RDF blank node, identified by a label unique within one graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlankNode {
    label: String,
}

impl BlankNode {
    /// Create a new blank node with the given label
    pub fn new(label: impl Into<String>) -> Self {
        BlankNode {
            label: label.into(),
        }
    }

    /// Get the blank node label
    pub fn as_str(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.label)
    }
}

/// An RDF literal: a lexical value with an optional language tag or datatype
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    value: String,
    language: Option<String>,
    datatype: Option<NamedNode>,
}

impl Literal {
    /// Create a plain literal
    pub fn new(value: impl Into<String>) -> Self {
        Literal {
            value: value.into(),
            language: None,
            datatype: None,
        }
    }

    /// Create a language-tagged literal
    pub fn new_language_tagged(value: impl Into<String>, language: impl Into<String>) -> Self {
        Literal {
            value: value.into(),
            language: Some(language.into()),
            datatype: None,
        }
    }

    /// Create a datatyped literal
    pub fn new_typed(value: impl Into<String>, datatype: NamedNode) -> Self {
        Literal {
            value: value.into(),
            language: None,
            datatype: Some(datatype),
        }
    }

    /// Create a literal with an optional datatype
    pub fn new_maybe_typed(value: impl Into<String>, datatype: Option<NamedNode>) -> Self {
        Literal {
            value: value.into(),
            language: None,
            datatype,
        }
    }

    /// Get the lexical value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Get the language tag, if any
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Get the datatype, if any
    pub fn datatype(&self) -> Option<&NamedNode> {
        self.datatype.as_ref()
    }

    /// Check whether the literal carries the given datatype
    pub fn has_datatype(&self, datatype: &NamedNode) -> bool {
        self.datatype.as_ref() == Some(datatype)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.value)?;
        if let Some(lang) = &self.language {
            write!(f, "@{lang}")?;
        } else if let Some(dt) = &self.datatype {
            write!(f, "^^{dt}")?;
        }
        Ok(())
    }
}

/// A node that can appear in subject position: named or blank
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NamedOrBlankNode {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
}

impl NamedOrBlankNode {
    /// The IRI string when this is a named node
    pub fn as_named(&self) -> Option<&NamedNode> {
        match self {
            NamedOrBlankNode::NamedNode(n) => Some(n),
            NamedOrBlankNode::BlankNode(_) => None,
        }
    }
}

impl From<NamedNode> for NamedOrBlankNode {
    fn from(node: NamedNode) -> Self {
        NamedOrBlankNode::NamedNode(node)
    }
}

impl From<BlankNode> for NamedOrBlankNode {
    fn from(node: BlankNode) -> Self {
        NamedOrBlankNode::BlankNode(node)
    }
}

impl fmt::Display for NamedOrBlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamedOrBlankNode::NamedNode(n) => n.fmt(f),
            NamedOrBlankNode::BlankNode(n) => n.fmt(f),
        }
    }
}

/// Any RDF term
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
    Literal(Literal),
}

impl Term {
    /// Interpret the term as a named node
    pub fn as_named(&self) -> Option<&NamedNode> {
        match self {
            Term::NamedNode(n) => Some(n),
            _ => None,
        }
    }

    /// Interpret the term as a literal
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(l) => Some(l),
            _ => None,
        }
    }

    /// Interpret the term as a possible subject
    pub fn as_subject(&self) -> Option<NamedOrBlankNode> {
        match self {
            Term::NamedNode(n) => Some(NamedOrBlankNode::NamedNode(n.clone())),
            Term::BlankNode(b) => Some(NamedOrBlankNode::BlankNode(b.clone())),
            Term::Literal(_) => None,
        }
    }

    /// True when the term is a literal
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }
}

impl From<NamedNode> for Term {
    fn from(node: NamedNode) -> Self {
        Term::NamedNode(node)
    }
}

impl From<BlankNode> for Term {
    fn from(node: BlankNode) -> Self {
        Term::BlankNode(node)
    }
}

impl From<Literal> for Term {
    fn from(literal: Literal) -> Self {
        Term::Literal(literal)
    }
}

impl From<NamedOrBlankNode> for Term {
    fn from(node: NamedOrBlankNode) -> Self {
        match node {
            NamedOrBlankNode::NamedNode(n) => Term::NamedNode(n),
            NamedOrBlankNode::BlankNode(b) => Term::BlankNode(b),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::NamedNode(n) => n.fmt(f),
            Term::BlankNode(n) => n.fmt(f),
            Term::Literal(l) => l.fmt(f),
        }
    }
}

/// An RDF statement
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    subject: NamedOrBlankNode,
    predicate: NamedNode,
    object: Term,
}

impl Triple {
    /// Create a new triple
    pub fn new(
        subject: impl Into<NamedOrBlankNode>,
        predicate: impl Into<NamedNode>,
        object: impl Into<Term>,
    ) -> Self {
        Triple {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Get the subject
    pub fn subject(&self) -> &NamedOrBlankNode {
        &self.subject
    }

    /// Get the predicate
    pub fn predicate(&self) -> &NamedNode {
        &self.predicate
    }

    /// Get the object
    pub fn object(&self) -> &Term {
        &self.object
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}
