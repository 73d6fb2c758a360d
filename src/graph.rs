//! Graph capability traits and an in-memory statement store
//!
//! The conversion engines never see a concrete store: the encoder talks to a
//! [`GraphSink`], the writer and navigator to a [`GraphSource`].
//! [`MemoryGraph`] implements both over a `BTreeSet` of triples plus a
//! prefix table.

use crate::model::{NamedNode, NamedOrBlankNode, Term, Triple};
use crate::uri::{namespace_prefix_uri, verify_namespace_prefix};
use crate::Result;
use std::collections::{BTreeMap, BTreeSet};

/// Statement-construction capability used by the encoding processor.
///
/// One encode run is bracketed by [`begin`](GraphSink::begin) and
/// [`end`](GraphSink::end); `end(false)` signals that the emitted statements
/// must be discarded.
pub trait GraphSink {
    /// Assert one statement
    fn insert(&mut self, triple: Triple) -> Result<()>;

    /// Declare a namespace prefix binding
    fn declare_namespace(&mut self, prefix: &str, uri: &str) -> Result<()>;

    /// Start of a conversion run
    fn begin(&mut self) -> Result<()>;

    /// End of a conversion run; `committed` is false when the run failed
    fn end(&mut self, committed: bool) -> Result<()>;

    /// Optional warning channel; implementations may log or collect
    fn warning(&mut self, _message: &str) {}
}

/// Statement-query capability used by the decoding writer and navigator.
///
/// Lookups take any [`Term`]; literal subjects simply match nothing.
pub trait GraphSource {
    /// All objects of statements with the given subject and predicate
    fn objects_for(&self, subject: &Term, predicate: &NamedNode) -> Vec<Term>;

    /// All predicate-object pairs for the given subject
    fn predicate_objects(&self, subject: &Term) -> Vec<(NamedNode, Term)>;

    /// Whether the exact statement is present
    fn contains(&self, subject: &Term, predicate: &NamedNode, object: &Term) -> bool;

    /// The declared prefix for a namespace URI (composition-root form)
    fn prefix_for(&self, uri: &str) -> Option<String>;

    /// The declared namespace URI (composition-root form) for a prefix
    fn namespace_for(&self, prefix: &str) -> Option<String>;

    /// All declared prefix bindings
    fn namespaces(&self) -> Vec<(String, String)>;

    /// The first object for subject and predicate, if any
    fn object_for(&self, subject: &Term, predicate: &NamedNode) -> Option<Term> {
        self.objects_for(subject, predicate).into_iter().next()
    }
}

impl<G: GraphSource + ?Sized> GraphSource for &G {
    fn objects_for(&self, subject: &Term, predicate: &NamedNode) -> Vec<Term> {
        (**self).objects_for(subject, predicate)
    }

    fn predicate_objects(&self, subject: &Term) -> Vec<(NamedNode, Term)> {
        (**self).predicate_objects(subject)
    }

    fn contains(&self, subject: &Term, predicate: &NamedNode, object: &Term) -> bool {
        (**self).contains(subject, predicate, object)
    }

    fn prefix_for(&self, uri: &str) -> Option<String> {
        (**self).prefix_for(uri)
    }

    fn namespace_for(&self, prefix: &str) -> Option<String> {
        (**self).namespace_for(prefix)
    }

    fn namespaces(&self) -> Vec<(String, String)> {
        (**self).namespaces()
    }
}

/// In-memory structural graph
///
/// A `BTreeSet` keeps statements ordered and deduplicated; insertion order
/// is irrelevant to the grammar, which navigates by predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryGraph {
    triples: BTreeSet<Triple>,
    prefixes: BTreeMap<String, String>,
}

impl MemoryGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a triple to the graph
    pub fn add_triple(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    /// Check if a triple exists in the graph
    pub fn contains_triple(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// Iterate over all triples
    pub fn iter_triples(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Get the number of triples in the graph
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Check if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Clear all triples and prefix declarations
    pub fn clear(&mut self) {
        self.triples.clear();
        self.prefixes.clear();
    }

    /// Declared prefix table (prefix -> composition-root URI)
    pub fn prefix_table(&self) -> &BTreeMap<String, String> {
        &self.prefixes
    }

    fn subject_matches(subject: &NamedOrBlankNode, term: &Term) -> bool {
        match (subject, term) {
            (NamedOrBlankNode::NamedNode(a), Term::NamedNode(b)) => a == b,
            (NamedOrBlankNode::BlankNode(a), Term::BlankNode(b)) => a == b,
            _ => false,
        }
    }
}

impl GraphSink for MemoryGraph {
    fn insert(&mut self, triple: Triple) -> Result<()> {
        self.triples.insert(triple);
        Ok(())
    }

    fn declare_namespace(&mut self, prefix: &str, uri: &str) -> Result<()> {
        self.prefixes.insert(prefix.to_string(), uri.to_string());
        Ok(())
    }

    fn begin(&mut self) -> Result<()> {
        Ok(())
    }

    fn end(&mut self, committed: bool) -> Result<()> {
        if !committed {
            self.clear();
        }
        Ok(())
    }
}

impl GraphSource for MemoryGraph {
    fn objects_for(&self, subject: &Term, predicate: &NamedNode) -> Vec<Term> {
        self.triples
            .iter()
            .filter(|t| Self::subject_matches(t.subject(), subject) && t.predicate() == predicate)
            .map(|t| t.object().clone())
            .collect()
    }

    fn predicate_objects(&self, subject: &Term) -> Vec<(NamedNode, Term)> {
        self.triples
            .iter()
            .filter(|t| Self::subject_matches(t.subject(), subject))
            .map(|t| (t.predicate().clone(), t.object().clone()))
            .collect()
    }

    fn contains(&self, subject: &Term, predicate: &NamedNode, object: &Term) -> bool {
        self.triples.iter().any(|t| {
            Self::subject_matches(t.subject(), subject)
                && t.predicate() == predicate
                && t.object() == object
        })
    }

    fn prefix_for(&self, uri: &str) -> Option<String> {
        self.prefixes
            .iter()
            .find(|(_, u)| u.as_str() == uri)
            .map(|(p, _)| p.clone())
    }

    fn namespace_for(&self, prefix: &str) -> Option<String> {
        self.prefixes.get(prefix).cloned()
    }

    fn namespaces(&self) -> Vec<(String, String)> {
        self.prefixes
            .iter()
            .map(|(p, u)| (p.clone(), u.clone()))
            .collect()
    }
}

/// Resolve a namespace URI to its declared prefix, if the source knows one.
///
/// The table stores composition-root URIs; callers pass the plain namespace
/// URI and this helper performs the translation.
pub fn find_declared_prefix<G: GraphSource + ?Sized>(graph: &G, namespace: &str) -> Option<String> {
    graph.prefix_for(&namespace_prefix_uri(namespace))
}

/// Resolve a declared prefix back to the plain namespace URI.
pub fn find_declared_namespace<G: GraphSource + ?Sized>(graph: &G, prefix: &str) -> Option<String> {
    verify_namespace_prefix(&graph.namespace_for(prefix)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlankNode, Literal};
    use crate::vocab::rdf;

    #[test]
    fn test_memory_graph_queries() {
        let mut graph = MemoryGraph::new();
        let subject = BlankNode::new("e1");
        graph.add_triple(Triple::new(
            subject.clone(),
            rdf::VALUE.clone(),
            Literal::new("hi"),
        ));

        let term = Term::BlankNode(subject);
        assert_eq!(graph.objects_for(&term, &rdf::VALUE).len(), 1);
        assert_eq!(graph.predicate_objects(&term).len(), 1);
        assert!(graph.contains(
            &term,
            &rdf::VALUE,
            &Term::Literal(Literal::new("hi"))
        ));
        // Literal subjects match nothing
        assert!(graph
            .objects_for(&Term::Literal(Literal::new("hi")), &rdf::VALUE)
            .is_empty());
    }

    #[test]
    fn test_abort_discards() {
        let mut graph = MemoryGraph::new();
        graph.begin().unwrap();
        graph
            .insert(Triple::new(
                BlankNode::new("e1"),
                rdf::VALUE.clone(),
                Literal::new("x"),
            ))
            .unwrap();
        graph.end(false).unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn test_prefix_lookup() {
        let mut graph = MemoryGraph::new();
        graph.declare_namespace("ex", "urn:ex:#").unwrap();
        assert_eq!(find_declared_prefix(&graph, "urn:ex:"), Some("ex".into()));
        assert_eq!(
            find_declared_namespace(&graph, "ex"),
            Some("urn:ex:".into())
        );
    }
}
