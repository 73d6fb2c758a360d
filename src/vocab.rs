//! Fixed vocabularies and namespaces of the structural-graph grammar

use crate::model::NamedNode;
use std::sync::LazyLock;

/// The XML namespace (`xml:` attributes)
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// The XML Schema instance namespace (`xsi:` attributes)
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// The namespace-declaration namespace (`xmlns` attributes)
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// The XLink namespace
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

/// The XInclude namespace
pub const XINCLUDE_NAMESPACE: &str = "http://www.w3.org/2001/XInclude";

/// RDF vocabulary namespace
pub mod rdf {
    use super::*;

    /// The RDF namespace IRI
    pub const NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

    /// rdf:type predicate
    pub static TYPE: LazyLock<NamedNode> =
        LazyLock::new(|| NamedNode::new(format!("{}type", NAMESPACE)));

    /// rdf:List class
    pub static LIST: LazyLock<NamedNode> =
        LazyLock::new(|| NamedNode::new(format!("{}List", NAMESPACE)));

    /// rdf:first predicate
    pub static FIRST: LazyLock<NamedNode> =
        LazyLock::new(|| NamedNode::new(format!("{}first", NAMESPACE)));

    /// rdf:rest predicate
    pub static REST: LazyLock<NamedNode> =
        LazyLock::new(|| NamedNode::new(format!("{}rest", NAMESPACE)));

    /// rdf:nil resource
    pub static NIL: LazyLock<NamedNode> =
        LazyLock::new(|| NamedNode::new(format!("{}nil", NAMESPACE)));

    /// rdf:value predicate
    pub static VALUE: LazyLock<NamedNode> =
        LazyLock::new(|| NamedNode::new(format!("{}value", NAMESPACE)));

    /// rdf:XMLLiteral datatype
    pub static XML_LITERAL: LazyLock<NamedNode> =
        LazyLock::new(|| NamedNode::new(format!("{}XMLLiteral", NAMESPACE)));

    /// rdf:langString datatype
    pub static LANG_STRING: LazyLock<NamedNode> =
        LazyLock::new(|| NamedNode::new(format!("{}langString", NAMESPACE)));
}

/// RDFS vocabulary namespace
pub mod rdfs {
    use super::*;

    /// The RDFS namespace IRI
    pub const NAMESPACE: &str = "http://www.w3.org/2000/01/rdf-schema#";

    /// rdfs:label predicate
    pub static LABEL: LazyLock<NamedNode> =
        LazyLock::new(|| NamedNode::new(format!("{}label", NAMESPACE)));

    /// rdfs:comment predicate
    pub static COMMENT: LazyLock<NamedNode> =
        LazyLock::new(|| NamedNode::new(format!("{}comment", NAMESPACE)));

    /// rdfs:seeAlso predicate
    pub static SEE_ALSO: LazyLock<NamedNode> =
        LazyLock::new(|| NamedNode::new(format!("{}seeAlso", NAMESPACE)));

    /// rdfs:isDefinedBy predicate
    pub static IS_DEFINED_BY: LazyLock<NamedNode> =
        LazyLock::new(|| NamedNode::new(format!("{}isDefinedBy", NAMESPACE)));

    /// rdfs:subClassOf predicate
    pub static SUB_CLASS_OF: LazyLock<NamedNode> =
        LazyLock::new(|| NamedNode::new(format!("{}subClassOf", NAMESPACE)));

    /// rdfs:member predicate
    pub static MEMBER: LazyLock<NamedNode> =
        LazyLock::new(|| NamedNode::new(format!("{}member", NAMESPACE)));
}

/// XML Schema datatypes vocabulary namespace
pub mod xsd {
    use super::*;

    /// The XSD namespace IRI
    pub const NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";

    /// xsd:string datatype
    pub static STRING: LazyLock<NamedNode> =
        LazyLock::new(|| NamedNode::new(format!("{}string", NAMESPACE)));

    /// xsd:boolean datatype
    pub static BOOLEAN: LazyLock<NamedNode> =
        LazyLock::new(|| NamedNode::new(format!("{}boolean", NAMESPACE)));

    /// xsd:anyURI datatype
    pub static ANY_URI: LazyLock<NamedNode> =
        LazyLock::new(|| NamedNode::new(format!("{}anyURI", NAMESPACE)));

    /// xsd:NCName datatype
    pub static NC_NAME: LazyLock<NamedNode> =
        LazyLock::new(|| NamedNode::new(format!("{}NCName", NAMESPACE)));

    /// xsd:QName datatype
    pub static Q_NAME: LazyLock<NamedNode> =
        LazyLock::new(|| NamedNode::new(format!("{}QName", NAMESPACE)));

    /// xsd:public datatype, labeling transcoded public identifiers
    pub static PUBLIC: LazyLock<NamedNode> =
        LazyLock::new(|| NamedNode::new(format!("{}public", NAMESPACE)));

    /// xsd:ID datatype
    pub static ID: LazyLock<NamedNode> =
        LazyLock::new(|| NamedNode::new(format!("{}ID", NAMESPACE)));

    /// xsd:IDREF datatype
    pub static IDREF: LazyLock<NamedNode> =
        LazyLock::new(|| NamedNode::new(format!("{}IDREF", NAMESPACE)));

    /// xsd:NOTATION datatype
    pub static NOTATION: LazyLock<NamedNode> =
        LazyLock::new(|| NamedNode::new(format!("{}NOTATION", NAMESPACE)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocab_iris() {
        assert_eq!(
            rdf::TYPE.as_str(),
            "http://www.w3.org/1999/02/22-rdf-syntax-ns#type"
        );
        assert_eq!(
            rdfs::IS_DEFINED_BY.as_str(),
            "http://www.w3.org/2000/01/rdf-schema#isDefinedBy"
        );
        assert_eq!(xsd::ID.as_str(), "http://www.w3.org/2001/XMLSchema#ID");
    }
}
