//! Typed parsers for FHIR search parameter values.
//!
//! One module per value type:
//! - String: plain text, no value grammar
//! - Token: `system|code` coded values
//! - Number: exact decimals with comparator prefixes
//! - Date: precision-tagged date/times with comparator prefixes
//! - Quantity: `number|system|code` with comparator prefixes
//! - Reference: local id, absolute URL, or chained sub-query
//! - URI: plain URIs
//! - Composite: `$`-separated component tuples
//! - Or: comma-separated alternatives of any of the above
//!
//! Each parser is a pure function of `(raw value, descriptor)` and returns a
//! node that can reproduce its canonical query form via
//! [`SearchParam::query_param_and_value`].

pub mod composite;
pub mod date;
pub mod number;
pub mod or;
pub mod quantity;
pub mod reference;
pub mod string;
pub mod token;
pub mod uri;

pub use composite::CompositeParam;
pub use date::DateParam;
pub use number::NumberParam;
pub use or::OrParam;
pub use quantity::QuantityParam;
pub use reference::{Reference, ReferenceParam};
pub use string::StringParam;
pub use token::TokenParam;
pub use uri::UriParam;

use crate::error::{Result, SearchError};
use crate::parameters::{Prefix, SearchParamInfo, SearchParamType};

/// A fully typed search parameter node.
///
/// The closed sum keeps dispatch exhaustive: adding a value type forces every
/// match site to handle it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchParam {
    Date(DateParam),
    Number(NumberParam),
    Quantity(QuantityParam),
    Token(TokenParam),
    String(StringParam),
    Uri(UriParam),
    Reference(ReferenceParam),
    Composite(CompositeParam),
    Or(OrParam),
    Untyped(UntypedParam),
}

/// An underscore-prefixed parameter passed through without interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UntypedParam {
    pub name: String,
    pub value: String,
}

/// Parse a single raw value according to the descriptor's declared type.
pub fn parse_search_param(raw: &str, info: &SearchParamInfo) -> Result<SearchParam> {
    match info.param_type {
        SearchParamType::Number => number::parse_number_param(raw, info).map(SearchParam::Number),
        SearchParamType::Date => date::parse_date_param(raw, info).map(SearchParam::Date),
        SearchParamType::String => string::parse_string_param(raw, info).map(SearchParam::String),
        SearchParamType::Token => token::parse_token_param(raw, info).map(SearchParam::Token),
        SearchParamType::Reference => {
            reference::parse_reference_param(raw, info).map(SearchParam::Reference)
        }
        SearchParamType::Composite => {
            composite::parse_composite_param(raw, info).map(SearchParam::Composite)
        }
        SearchParamType::Quantity => {
            quantity::parse_quantity_param(raw, info).map(SearchParam::Quantity)
        }
        SearchParamType::Uri => uri::parse_uri_param(raw, info).map(SearchParam::Uri),
    }
}

impl SearchParam {
    /// The descriptor this node was parsed against; `None` for untyped
    /// pass-through parameters.
    pub fn info(&self) -> Option<&SearchParamInfo> {
        match self {
            Self::Date(p) => Some(&p.info),
            Self::Number(p) => Some(&p.info),
            Self::Quantity(p) => Some(&p.info),
            Self::Token(p) => Some(&p.info),
            Self::String(p) => Some(&p.info),
            Self::Uri(p) => Some(&p.info),
            Self::Reference(p) => Some(&p.info),
            Self::Composite(p) => Some(&p.info),
            Self::Or(p) => Some(&p.info),
            Self::Untyped(_) => None,
        }
    }

    /// Base parameter name.
    pub fn name(&self) -> &str {
        match self {
            Self::Untyped(p) => &p.name,
            _ => self.info().map(|i| i.name.as_str()).unwrap_or_default(),
        }
    }

    /// Canonical `(parameter, value)` pair for re-emission into a query
    /// string. Values are percent-decoded; escapes of the FHIR delimiter set
    /// are kept intact.
    pub fn query_param_and_value(&self) -> (String, String) {
        match self {
            Self::Date(p) => p.query_param_and_value(),
            Self::Number(p) => p.query_param_and_value(),
            Self::Quantity(p) => p.query_param_and_value(),
            Self::Token(p) => p.query_param_and_value(),
            Self::String(p) => p.query_param_and_value(),
            Self::Uri(p) => p.query_param_and_value(),
            Self::Reference(p) => p.query_param_and_value(),
            Self::Composite(p) => p.query_param_and_value(),
            Self::Or(p) => p.query_param_and_value(),
            Self::Untyped(p) => (p.name.clone(), p.value.clone()),
        }
    }
}

/// Reject an explicit comparator prefix on a type that does not take one.
pub(crate) fn reject_prefix(raw: &str, info: &SearchParamInfo) -> Result<()> {
    if !info.param_type.accepts_prefix() && Prefix::extract(raw).0.is_some() {
        return Err(SearchError::InvalidPrefix(info.name.clone()));
    }
    Ok(())
}

/// Prepend the comparator to an emitted value; `eq` stays implicit.
pub(crate) fn prefixed_value(prefix: Prefix, value: String) -> String {
    if prefix == Prefix::Eq {
        value
    } else {
        format!("{prefix}{value}")
    }
}
