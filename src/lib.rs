//! # OxiRS XML
//!
//! Lossless, reversible conversion between XML document structure and an RDF
//! "structural graph", plus a lazy cursor that navigates such a graph as if
//! it were an XML tree.
//!
//! The crate is built around three engines sharing one naming grammar:
//!
//! - [`encoder::XmlToRdfProcessor`] consumes XML infoset events and emits
//!   subject-predicate-object statements,
//! - [`writer::RdfToXmlWriter`] walks a graph rooted at a document node and
//!   re-emits XML events,
//! - [`navigator::RdfXmlNavigator`] exposes the same graph as a cloneable,
//!   lazily-evaluated XML cursor.
//!
//! Graph storage and XML tokenizing sit behind narrow capability traits
//! ([`graph::GraphSink`], [`graph::GraphSource`], [`infoset::XmlEventSink`],
//! [`tree::XmlTreeCursor`]); ready-made adapters for `quick-xml` live in
//! [`reader`] and [`sink`], and an in-memory store in [`graph::MemoryGraph`].
//!
//! ## Examples
//!
//! ```
//! use oxirs_xml::graph::MemoryGraph;
//! use oxirs_xml::reader::XmlReaderConverter;
//!
//! # fn main() -> oxirs_xml::Result<()> {
//! let mut graph = MemoryGraph::new();
//! let converter = XmlReaderConverter::new().with_base_uri("http://example.com/doc");
//! let doc = converter.convert_str("<a xmlns=\"urn:ex:\"><b id=\"x\">hi</b></a>", &mut graph)?;
//! assert!(!graph.is_empty());
//! # let _ = doc;
//! # Ok(())
//! # }
//! ```

pub mod encoder;
pub mod graph;
pub mod infoset;
pub mod model;
pub mod navigator;
pub mod reader;
pub mod sink;
pub mod tree;
pub mod uri;
pub mod vocab;
pub mod writer;

// Re-export the term types for convenience
pub use model::{BlankNode, Literal, NamedNode, NamedOrBlankNode, Term, Triple};

/// Core error type for XML <-> RDF conversion
#[derive(Debug, thiserror::Error)]
pub enum XmlRdfError {
    /// An invalid NCName or XML Name was encountered during composition or
    /// identity assignment
    #[error("Malformed XML name: {0}")]
    MalformedName(String),
    /// A namespace prefix could not be resolved
    #[error("Unresolvable namespace prefix: {0}")]
    UnresolvableNamespace(String),
    /// An event type reached an entry point that cannot encode it
    #[error("Unsupported node kind: {0}")]
    UnsupportedNodeKind(String),
    /// The XML sink rejected a generated name or structure
    #[error("Write conformance error: {0}")]
    WriteConformance(String),
    /// IRI parsing or resolution failure
    #[error("IRI error: {0}")]
    Iri(#[from] oxiri::IriParseError),
    /// XML tokenizer error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for XML <-> RDF conversion operations
pub type Result<T> = std::result::Result<T, XmlRdfError>;

/// Version information for OxiRS XML
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
