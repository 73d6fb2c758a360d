//! XML infoset building blocks shared by both conversion directions
//!
//! Qualified names, node kinds, the [`XmlEventSink`] capability the decoding
//! writer emits into, whitespace policy, and small naming utilities.

use crate::{Result, XmlRdfError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// The kinds of XML information items the grammar distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum XmlNodeKind {
    Document,
    Element,
    Attribute,
    Namespace,
    Text,
    SignificantWhitespace,
    Whitespace,
    Cdata,
    Comment,
    ProcessingInstruction,
    EntityReference,
    DocumentType,
}

impl fmt::Display for XmlNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// An expanded XML name: local part, namespace URI and the prefix it was
/// written with
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct QualifiedName {
    pub local_name: String,
    pub namespace: String,
    pub prefix: String,
}

impl QualifiedName {
    /// Create a qualified name
    pub fn new(
        local_name: impl Into<String>,
        namespace: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        QualifiedName {
            local_name: local_name.into(),
            namespace: namespace.into(),
            prefix: prefix.into(),
        }
    }

    /// A name with no namespace and no prefix
    pub fn local(local_name: impl Into<String>) -> Self {
        QualifiedName {
            local_name: local_name.into(),
            namespace: String::new(),
            prefix: String::new(),
        }
    }

    /// The name as written in markup, `prefix:local` or bare `local`
    pub fn prefixed(&self) -> String {
        if self.prefix.is_empty() {
            self.local_name.clone()
        } else {
            format!("{}:{}", self.prefix, self.local_name)
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.local_name)
        } else {
            write!(f, "{{{}}}{}", self.namespace, self.local_name)
        }
    }
}

/// One attribute as seen by the encoding processor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeNode {
    pub name: QualifiedName,
    pub value: String,
    /// True when the attribute was supplied by a DTD default, not written
    /// in the document
    pub is_default: bool,
    /// The attribute type declared by the DTD, when known
    pub declared_type: Option<QualifiedName>,
}

impl AttributeNode {
    pub fn new(name: QualifiedName, value: impl Into<String>) -> Self {
        AttributeNode {
            name,
            value: value.into(),
            is_default: false,
            declared_type: None,
        }
    }
}

/// A parsed document type declaration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentTypeDecl {
    /// Root element name from the declaration
    pub name: String,
    pub public_id: Option<String>,
    pub system_id: Option<String>,
    /// Internal subset text, without the surrounding brackets
    pub internal_subset: Option<String>,
}

/// How text nodes made of whitespace only are treated during encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WhitespaceHandling {
    /// Drop all whitespace-only text
    None,
    /// Keep whitespace-only text inside mixed or xml:space="preserve"
    /// content, drop the rest
    #[default]
    Significant,
    /// Keep all whitespace-only text
    All,
}

/// Event-accepting capability the decoding writer emits into.
///
/// Calls arrive in document order. `start_element` opens a pending element
/// whose attributes follow before any content call; implementations may
/// buffer until content forces the start tag out.
pub trait XmlEventSink {
    fn start_document(&mut self) -> Result<()>;
    fn end_document(&mut self) -> Result<()>;
    fn doctype(&mut self, decl: &DocumentTypeDecl) -> Result<()>;
    fn start_element(&mut self, name: &QualifiedName) -> Result<()>;
    fn attribute(&mut self, name: &QualifiedName, value: &str) -> Result<()>;
    fn end_element(&mut self) -> Result<()>;
    fn text(&mut self, text: &str) -> Result<()>;
    /// Pre-serialized markup, written through without escaping
    fn raw(&mut self, markup: &str) -> Result<()>;
    fn comment(&mut self, text: &str) -> Result<()>;
    fn processing_instruction(&mut self, target: &str, data: &str) -> Result<()>;
    fn entity_reference(&mut self, name: &str) -> Result<()>;
}

/// True for the XML whitespace characters
pub fn is_xml_whitespace_char(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// True when the string is entirely XML whitespace
pub fn is_xml_whitespace(s: &str) -> bool {
    s.chars().all(is_xml_whitespace_char)
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        'A'..='Z' | 'a'..='z' | '_'
        | '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}' | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c, '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}')
}

/// Verify that a string is a valid NCName (an XML name without a colon).
pub fn verify_ncname(name: &str) -> Result<&str> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c != ':' && is_name_start_char(c))
        && chars.all(|c| c != ':' && is_name_char(c));
    if valid {
        Ok(name)
    } else {
        Err(XmlRdfError::MalformedName(name.to_string()))
    }
}

/// Verify that a string is a valid XML Name (colons allowed).
pub fn verify_name(name: &str) -> Result<&str> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(|c| c == ':' || is_name_start_char(c))
        && chars.all(|c| c == ':' || is_name_char(c));
    if valid {
        Ok(name)
    } else {
        Err(XmlRdfError::MalformedName(name.to_string()))
    }
}

/// Hands out names unique within one run by appending a counter,
/// `name1`, `name2` and so on per distinct base name.
#[derive(Debug, Default)]
pub struct UniqueNamer {
    counters: HashMap<String, usize>,
}

impl UniqueNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next unique name for the given base
    pub fn next(&mut self, base: &str) -> String {
        let counter = self.counters.entry(base.to_string()).or_insert(0);
        *counter += 1;
        format!("{base}{counter}")
    }
}

/// A processing-instruction target unlikely to collide with real targets,
/// used to carry entity references through tokenizers that cannot report
/// them as their own event.
#[derive(Debug, Clone)]
pub struct EntityPlaceholder {
    target: String,
}

impl EntityPlaceholder {
    pub fn new() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos() as u128 | (d.as_secs() as u128) << 32)
            .unwrap_or(0);
        EntityPlaceholder {
            target: format!("entity{nanos:x}"),
        }
    }

    /// The placeholder instruction target
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The instruction carrying a reference to the named entity
    pub fn instruction(&self, entity: &str) -> (String, String) {
        (self.target.clone(), entity.to_string())
    }
}

impl Default for EntityPlaceholder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_name_prefixed() {
        let name = QualifiedName::new("b", "urn:ex:", "ex");
        assert_eq!(name.prefixed(), "ex:b");
        assert_eq!(name.to_string(), "{urn:ex:}b");
        assert_eq!(QualifiedName::local("a").prefixed(), "a");
    }

    #[test]
    fn test_verify_ncname() {
        assert!(verify_ncname("a-b.c").is_ok());
        assert!(verify_ncname("élan").is_ok());
        assert!(verify_ncname("").is_err());
        assert!(verify_ncname("1a").is_err());
        assert!(verify_ncname("a:b").is_err());
        assert!(verify_ncname("a b").is_err());
        assert!(verify_name("a:b").is_ok());
    }

    #[test]
    fn test_unique_namer() {
        let mut namer = UniqueNamer::new();
        assert_eq!(namer.next("a"), "a1");
        assert_eq!(namer.next("a"), "a2");
        assert_eq!(namer.next("b"), "b1");
    }

    #[test]
    fn test_whitespace() {
        assert!(is_xml_whitespace(" \t\r\n"));
        assert!(!is_xml_whitespace(" x "));
        assert!(is_xml_whitespace(""));
    }
}
