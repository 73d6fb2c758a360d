//! Serializing event sink over `quick-xml`
//!
//! [`WriterEventSink`] turns the event stream produced by
//! [`RdfToXmlWriter`](crate::writer::RdfToXmlWriter) back into markup. The
//! start tag is buffered until content arrives so attribute calls and
//! synthesized namespace declarations still land on it, and prefix bindings
//! are tracked per element scope so a namespace is declared at most once per
//! branch.

use crate::graph::GraphSource;
use crate::infoset::{
    verify_name, verify_ncname, DocumentTypeDecl, QualifiedName, UniqueNamer, XmlEventSink,
};
use crate::model::Term;
use crate::vocab::{XMLNS_NAMESPACE, XML_NAMESPACE};
use crate::writer::RdfToXmlWriter;
use crate::{Result, XmlRdfError};
use quick_xml::events::{BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::collections::HashSet;
use std::io::Write;

/// One buffered start tag, held back until content decides whether it
/// closes as `<tag/>` or `<tag>`
struct PendingElement {
    tag: String,
    attributes: Vec<(String, String)>,
}

/// [`XmlEventSink`] that serializes into any [`Write`] target
pub struct WriterEventSink<W: Write> {
    writer: Writer<W>,
    namer: UniqueNamer,
    pending: Option<PendingElement>,
    /// Tag names of open elements, innermost last
    open: Vec<String>,
    /// Prefix bindings declared per open element
    scopes: Vec<Vec<(String, String)>>,
}

impl<W: Write> WriterEventSink<W> {
    pub fn new(inner: W) -> Self {
        WriterEventSink {
            writer: Writer::new(inner),
            namer: UniqueNamer::new(),
            pending: None,
            open: Vec::new(),
            scopes: Vec::new(),
        }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn flush_pending(&mut self) -> Result<()> {
        if let Some(pending) = self.pending.take() {
            let mut start = BytesStart::new(pending.tag.as_str());
            for (key, value) in &pending.attributes {
                start.push_attribute((key.as_str(), value.as_str()));
            }
            self.writer.write_event(Event::Start(start))?;
        }
        Ok(())
    }

    /// The namespace the prefix resolves to at the current position
    fn in_scope_namespace(&self, prefix: &str) -> Option<&str> {
        if prefix == "xml" {
            return Some(XML_NAMESPACE);
        }
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.iter().rev())
            .find(|(p, _)| p.as_str() == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    /// An unshadowed non-empty prefix already bound to the namespace
    fn prefix_for_namespace(&self, namespace: &str) -> Option<String> {
        if namespace == XML_NAMESPACE {
            return Some("xml".to_string());
        }
        let mut shadowed = HashSet::new();
        for (prefix, uri) in self.scopes.iter().rev().flat_map(|scope| scope.iter().rev()) {
            if !shadowed.insert(prefix.as_str()) {
                continue;
            }
            if !prefix.is_empty() && uri == namespace {
                return Some(prefix.clone());
            }
        }
        None
    }

    /// Bind a prefix on the current element and emit its declaration
    fn declare(&mut self, prefix: &str, uri: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.push((prefix.to_string(), uri.to_string()));
        }
        if let Some(pending) = &mut self.pending {
            let key = if prefix.is_empty() {
                "xmlns".to_string()
            } else {
                format!("xmlns:{prefix}")
            };
            pending.attributes.push((key, uri.to_string()));
        }
    }
}

impl<W: Write> XmlEventSink for WriterEventSink<W> {
    fn start_document(&mut self) -> Result<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(())
    }

    fn end_document(&mut self) -> Result<()> {
        if self.pending.is_some() || !self.open.is_empty() {
            return Err(XmlRdfError::WriteConformance(
                "document ended with an open element".to_string(),
            ));
        }
        Ok(())
    }

    fn doctype(&mut self, decl: &DocumentTypeDecl) -> Result<()> {
        self.flush_pending()?;
        verify_name(&decl.name)
            .map_err(|_| XmlRdfError::WriteConformance(format!("invalid DOCTYPE name: {:?}", decl.name)))?;
        if decl.public_id.as_deref().is_some_and(|p| p.contains('"'))
            || decl.system_id.as_deref().is_some_and(|s| s.contains('"'))
        {
            return Err(XmlRdfError::WriteConformance(
                "quote character in DOCTYPE identifier".to_string(),
            ));
        }
        let mut text = decl.name.clone();
        if let Some(public) = &decl.public_id {
            let system = decl.system_id.as_deref().unwrap_or("");
            text.push_str(&format!(" PUBLIC \"{public}\" \"{system}\""));
        } else if let Some(system) = &decl.system_id {
            text.push_str(&format!(" SYSTEM \"{system}\""));
        }
        if let Some(subset) = &decl.internal_subset {
            text.push_str(&format!(" [{subset}]"));
        }
        self.writer
            .write_event(Event::DocType(BytesText::from_escaped(text)))?;
        Ok(())
    }

    fn start_element(&mut self, name: &QualifiedName) -> Result<()> {
        self.flush_pending()?;
        check_ncname(&name.local_name)?;

        let mut declarations: Vec<(String, String)> = Vec::new();
        let tag = if name.namespace.is_empty() {
            // An unbound default namespace must not capture this element
            if self.in_scope_namespace("").is_some_and(|ns| !ns.is_empty()) {
                declarations.push((String::new(), String::new()));
            }
            name.local_name.clone()
        } else if !name.prefix.is_empty() {
            check_ncname(&name.prefix)?;
            if name.prefix != "xml"
                && self.in_scope_namespace(&name.prefix) != Some(name.namespace.as_str())
            {
                declarations.push((name.prefix.clone(), name.namespace.clone()));
            }
            format!("{}:{}", name.prefix, name.local_name)
        } else if self.in_scope_namespace("") == Some(name.namespace.as_str()) {
            name.local_name.clone()
        } else if let Some(prefix) = self.prefix_for_namespace(&name.namespace) {
            format!("{prefix}:{}", name.local_name)
        } else {
            declarations.push((String::new(), name.namespace.clone()));
            name.local_name.clone()
        };

        self.scopes.push(Vec::new());
        self.open.push(tag.clone());
        self.pending = Some(PendingElement {
            tag,
            attributes: Vec::new(),
        });
        for (prefix, uri) in declarations {
            self.declare(&prefix, &uri);
        }
        Ok(())
    }

    fn attribute(&mut self, name: &QualifiedName, value: &str) -> Result<()> {
        if self.pending.is_none() {
            return Err(XmlRdfError::WriteConformance(format!(
                "attribute {name} written outside a start tag"
            )));
        }
        check_ncname(&name.local_name)?;

        let key = if name.namespace == XMLNS_NAMESPACE {
            // Declarations round-tripped through the graph rebind the scope
            // in addition to reappearing as attributes
            let (prefix, key) = if name.local_name == "xmlns" && name.prefix.is_empty() {
                (String::new(), "xmlns".to_string())
            } else {
                (name.local_name.clone(), format!("xmlns:{}", name.local_name))
            };
            if let Some(scope) = self.scopes.last_mut() {
                scope.push((prefix, value.to_string()));
            }
            key
        } else if name.namespace.is_empty() {
            name.local_name.clone()
        } else if !name.prefix.is_empty() {
            check_ncname(&name.prefix)?;
            if name.prefix != "xml"
                && self.in_scope_namespace(&name.prefix) != Some(name.namespace.as_str())
            {
                self.declare(&name.prefix, &name.namespace);
            }
            format!("{}:{}", name.prefix, name.local_name)
        } else if let Some(prefix) = self.prefix_for_namespace(&name.namespace) {
            format!("{prefix}:{}", name.local_name)
        } else {
            // Default namespaces never apply to attributes, so one without a
            // usable binding gets a fresh prefix
            let prefix = loop {
                let candidate = self.namer.next("ns");
                if self.in_scope_namespace(&candidate).is_none() {
                    break candidate;
                }
            };
            self.declare(&prefix, &name.namespace);
            format!("{prefix}:{}", name.local_name)
        };

        if let Some(pending) = &mut self.pending {
            // The same attribute can arrive more than once, as when an
            // identifier is stored both as a literal and through its node
            if let Some((_, existing)) = pending.attributes.iter().find(|(k, _)| k == &key) {
                if existing == value {
                    return Ok(());
                }
                return Err(XmlRdfError::WriteConformance(format!(
                    "conflicting values for attribute {key}"
                )));
            }
            pending.attributes.push((key, value.to_string()));
        }
        Ok(())
    }

    fn end_element(&mut self) -> Result<()> {
        self.scopes.pop();
        if let Some(pending) = self.pending.take() {
            let mut start = BytesStart::new(pending.tag.as_str());
            for (key, value) in &pending.attributes {
                start.push_attribute((key.as_str(), value.as_str()));
            }
            self.open.pop();
            self.writer.write_event(Event::Empty(start))?;
            return Ok(());
        }
        let tag = self.open.pop().ok_or_else(|| {
            XmlRdfError::WriteConformance("end of element with none open".to_string())
        })?;
        self.writer.write_event(Event::End(BytesEnd::new(tag)))?;
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<()> {
        self.flush_pending()?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }

    fn raw(&mut self, markup: &str) -> Result<()> {
        self.flush_pending()?;
        self.writer
            .write_event(Event::Text(BytesText::from_escaped(markup)))?;
        Ok(())
    }

    fn comment(&mut self, text: &str) -> Result<()> {
        if text.contains("--") || text.ends_with('-') {
            return Err(XmlRdfError::WriteConformance(format!(
                "comment text not serializable: {text:?}"
            )));
        }
        self.flush_pending()?;
        self.writer
            .write_event(Event::Comment(BytesText::from_escaped(text)))?;
        Ok(())
    }

    fn processing_instruction(&mut self, target: &str, data: &str) -> Result<()> {
        check_ncname(target)?;
        if target.eq_ignore_ascii_case("xml") || data.contains("?>") {
            return Err(XmlRdfError::WriteConformance(format!(
                "instruction not serializable: {target} {data:?}"
            )));
        }
        self.flush_pending()?;
        let content = if data.is_empty() {
            target.to_string()
        } else {
            format!("{target} {data}")
        };
        self.writer.write_event(Event::PI(BytesPI::new(content)))?;
        Ok(())
    }

    fn entity_reference(&mut self, name: &str) -> Result<()> {
        check_ncname(name)?;
        self.flush_pending()?;
        self.writer
            .write_event(Event::Text(BytesText::from_escaped(format!("&{name};"))))?;
        Ok(())
    }
}

fn check_ncname(name: &str) -> Result<()> {
    verify_ncname(name)
        .map(|_| ())
        .map_err(|_| XmlRdfError::WriteConformance(format!("not a valid NCName: {name:?}")))
}

/// Decode the document rooted at `document_node` straight to a string
pub fn write_xml_string<G: GraphSource + ?Sized>(graph: &G, document_node: &Term) -> Result<String> {
    let mut sink = WriterEventSink::new(Vec::new());
    RdfToXmlWriter::new(graph).write(&mut sink, document_node)?;
    String::from_utf8(sink.into_inner())
        .map_err(|e| XmlRdfError::WriteConformance(format!("serialized document is not UTF-8: {e}")))
}
