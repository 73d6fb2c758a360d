//! URI composition and public-identifier transcoding
//!
//! These functions are the fixed wire conventions of the structural-graph
//! grammar; both conversion directions and the navigator rely on them being
//! exact inverses of each other.
//!
//! - Type URIs are composed as `base + ('#' | '/') + component`, `'/'`
//!   escaped inside the component; `'#'` is used when the base has no
//!   fragment yet, `'/'` once it does.
//! - DOCTYPE public identifiers are carried as `urn:publicid:` URIs using
//!   the RFC 3151 substitutions.

use crate::Result;
use oxiri::Iri;
use percent_encoding::percent_decode_str;

const PUBLICID_PREFIX: &str = "urn:publicid:";

/// Compose a sub-URI from a base URI and a name component.
///
/// The component has `/` escaped as `%2F` so that [`decompose_uri`] can split
/// it back off unambiguously.
pub fn compose_uri(base: &str, component: &str) -> String {
    let separator = if base.contains('#') { '/' } else { '#' };
    format!("{base}{separator}{}", component.replace('/', "%2F"))
}

/// Split a composed URI back into its base URI and name component.
///
/// Returns `None` for URIs without a fragment part, which cannot have been
/// produced by [`compose_uri`].
pub fn decompose_uri(uri: &str) -> Option<(String, String)> {
    let hash = uri.find('#')?;
    let fragment = &uri[hash..];
    // Position of the last '/' inside the fragment; the leading '#' plays
    // the same role when none is present.
    let pos = fragment.rfind('/').unwrap_or(0);
    let component = fragment[pos + 1..].replace("%2F", "/");
    let base = uri[..uri.len() - (fragment.len() - pos)].to_string();
    Some((base, component))
}

/// The URI under which names of a namespace are composed: the namespace URI
/// with an empty component appended.
pub fn namespace_prefix_uri(uri: &str) -> String {
    compose_uri(uri, "")
}

/// Reverse of [`namespace_prefix_uri`]: recover the namespace URI if the
/// given URI is a composition root (empty component).
pub fn verify_namespace_prefix(uri: &str) -> Option<String> {
    let (base, component) = decompose_uri(uri)?;
    component.is_empty().then_some(base)
}

/// Create a `urn:publicid:` URI from a DOCTYPE public identifier.
pub fn create_public_id(id: &str) -> String {
    format!("{PUBLICID_PREFIX}{}", transcribe_public_id(id))
}

fn push_escaped(out: &mut String, c: char) {
    let mut buf = [0u8; 4];
    for byte in c.encode_utf8(&mut buf).bytes() {
        out.push_str(&format!("%{byte:02X}"));
    }
}

/// Transcribe a public identifier into its URI form (RFC 3151).
///
/// Leading/trailing whitespace is dropped, internal whitespace runs become
/// `+`, `//` becomes `:`, `::` becomes `;`, and the remaining reserved
/// characters are percent-escaped. [`extract_public_id`] undoes each
/// substitution exactly.
pub fn transcribe_public_id(id: &str) -> String {
    let id = id.trim();
    let mut out = String::with_capacity(id.len());
    let mut chars = id.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_whitespace() {
            while chars.peek().is_some_and(|c| c.is_whitespace()) {
                chars.next();
            }
            out.push('+');
        } else if c == '/' && chars.peek() == Some(&'/') {
            chars.next();
            out.push(':');
        } else if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            out.push(';');
        } else if matches!(c, '+' | ':' | '/' | ';' | '\'' | '?' | '#' | '%') {
            push_escaped(&mut out, c);
        } else {
            out.push(c);
        }
    }
    out
}

/// Extract the public identifier from a `urn:publicid:` URI, if it is one.
pub fn extract_public_id(uri: &str) -> Option<String> {
    if uri.contains('#') || !uri.starts_with(PUBLICID_PREFIX) {
        return None;
    }
    let path = &uri[PUBLICID_PREFIX.len()..];
    let mut out = String::with_capacity(path.len());
    let bytes = path.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(' ');
                i += 1;
            }
            b':' => {
                out.push_str("//");
                i += 1;
            }
            b';' => {
                out.push_str("::");
                i += 1;
            }
            b'%' => {
                // Maximal run of percent escapes, decoded as one UTF-8 unit
                let start = i;
                while bytes.get(i) == Some(&b'%')
                    && bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                    && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit)
                {
                    i += 3;
                }
                if i == start {
                    out.push('%');
                    i += 1;
                } else {
                    out.push_str(&percent_decode_str(&path[start..i]).decode_utf8_lossy());
                }
            }
            _ => {
                let c = path[i..].chars().next()?;
                out.push(c);
                i += c.len_utf8();
            }
        }
    }
    Some(out)
}

/// Resolve a possibly-relative URI reference against an absolute base URI.
pub fn resolve_relative(base: &str, reference: &str) -> Result<String> {
    Ok(Iri::parse(base.to_string())?
        .resolve(reference)?
        .into_inner())
}

/// True when the string parses as an absolute IRI.
pub fn is_absolute_uri(uri: &str) -> bool {
    Iri::parse(uri).is_ok()
}

/// Strip everything but ASCII letters from the percent-decoded form of a
/// URI; used to derive readable entity names.
pub fn entity_name_hint(uri: &str) -> String {
    percent_decode_str(uri)
        .decode_utf8_lossy()
        .chars()
        .filter(char::is_ascii_alphabetic)
        .collect()
}
