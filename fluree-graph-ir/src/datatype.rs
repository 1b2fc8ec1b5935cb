//! RDF literal datatypes
//!
//! Datatypes are always explicit - there is no "untyped" literal. Plain strings
//! use `xsd:string`, language-tagged strings use `rdf:langString`.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::vocab::{rdf, xsd};

/// RDF literal datatype, always an expanded IRI.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Datatype(Arc<str>);

impl Datatype {
    /// Create a datatype from an expanded IRI
    pub fn from_iri(iri: impl AsRef<str>) -> Self {
        Self(Arc::from(iri.as_ref()))
    }

    /// xsd:string - default for plain string literals
    pub fn xsd_string() -> Self {
        Self::from_iri(xsd::STRING)
    }

    pub fn xsd_boolean() -> Self {
        Self::from_iri(xsd::BOOLEAN)
    }

    pub fn xsd_integer() -> Self {
        Self::from_iri(xsd::INTEGER)
    }

    pub fn xsd_decimal() -> Self {
        Self::from_iri(xsd::DECIMAL)
    }

    pub fn xsd_double() -> Self {
        Self::from_iri(xsd::DOUBLE)
    }

    /// rdf:langString - for language-tagged literals
    pub fn rdf_lang_string() -> Self {
        Self::from_iri(rdf::LANG_STRING)
    }

    /// The expanded datatype IRI
    pub fn as_iri(&self) -> &str {
        &self.0
    }

    pub fn is_xsd_string(&self) -> bool {
        self.as_iri() == xsd::STRING
    }

    pub fn is_lang_string(&self) -> bool {
        self.as_iri() == rdf::LANG_STRING
    }

    /// Numeric XSD types produced by Turtle number shorthands
    pub fn is_numeric(&self) -> bool {
        matches!(self.as_iri(), xsd::INTEGER | xsd::DECIMAL | xsd::DOUBLE)
    }
}

impl std::fmt::Display for Datatype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datatype_constructors() {
        assert_eq!(Datatype::xsd_string().as_iri(), xsd::STRING);
        assert_eq!(Datatype::xsd_integer().as_iri(), xsd::INTEGER);
        assert_eq!(Datatype::rdf_lang_string().as_iri(), rdf::LANG_STRING);
        assert_eq!(
            Datatype::from_iri("http://www.w3.org/2001/XMLSchema#date").to_string(),
            "http://www.w3.org/2001/XMLSchema#date"
        );
    }

    #[test]
    fn test_is_checks() {
        assert!(Datatype::xsd_string().is_xsd_string());
        assert!(!Datatype::xsd_integer().is_xsd_string());
        assert!(Datatype::rdf_lang_string().is_lang_string());
        assert!(Datatype::xsd_double().is_numeric());
        assert!(Datatype::xsd_decimal().is_numeric());
        assert!(!Datatype::xsd_boolean().is_numeric());
    }
}
