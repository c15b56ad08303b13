//! Query assembly and normalization.
//!
//! [`Query`] holds the raw query component of a search URL against one
//! resource type. [`Query::params`] tokenizes it into ordered, typed
//! parameter nodes (resolving descriptors through the registry), and
//! [`Query::normalized_values`] runs the reverse direction: every node
//! re-emits its canonical `(name, value)` pair, optionally with the
//! pagination defaults filled in.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};
use crate::escape::split_unescaped;
use crate::parameters::SearchParamInfo;
use crate::registry::SearchParamRegistry;
use crate::types::{SearchParam, UntypedParam, or::parse_or_param, parse_search_param};

/// Reserved pagination parameter names.
pub const COUNT_PARAM: &str = "_count";
pub const OFFSET_PARAM: &str = "_offset";

pub const DEFAULT_COUNT: usize = 100;
pub const DEFAULT_OFFSET: usize = 0;

/// Ordered, percent-decoded query values: name to values, insertion order.
pub type QueryValues = IndexMap<String, Vec<String>>;

/// A search query against a single resource type, as received on the wire.
///
/// The raw query string is retained; typed representations are derived on
/// demand and never mutate the original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub resource: String,
    pub query: String,
}

impl Query {
    pub fn new(resource: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            query: query.into(),
        }
    }

    /// Decode the query string into ordered `(name, value)` pairs.
    ///
    /// `+` and percent-escapes are decoded; duplicates and insertion order
    /// are preserved. Undecodable components are an [`SearchError::InvalidContent`]
    /// on the parameter they belong to.
    fn pairs(&self) -> Result<Vec<(String, String)>> {
        let mut pairs = Vec::new();
        for piece in self.query.split('&') {
            if piece.is_empty() {
                continue;
            }
            let (raw_name, raw_value) = piece.split_once('=').unwrap_or((piece, ""));
            let name = decode_component(raw_name)
                .map_err(|_| SearchError::InvalidContent(raw_name.to_string()))?;
            let value = decode_component(raw_value)
                .map_err(|_| SearchError::InvalidContent(name.clone()))?;
            pairs.push((name, value));
        }
        Ok(pairs)
    }

    /// Parse the query into ordered, typed parameter nodes.
    ///
    /// Parameter names are stripped of their `:modifier` and `.postfix`
    /// suffixes before descriptor lookup; the registry is consulted once per
    /// distinct base name. Comma-separated values become an OR node.
    /// `_count`/`_offset` are consumed by [`Query::options`]; other
    /// underscore parameters pass through untyped.
    pub fn params(&self, registry: &SearchParamRegistry) -> Result<Vec<SearchParam>> {
        let mut descriptors: HashMap<String, Arc<SearchParamInfo>> = HashMap::new();
        let mut params = Vec::new();

        for (name, value) in self.pairs()? {
            if name.starts_with('_') {
                if name == COUNT_PARAM || name == OFFSET_PARAM {
                    continue;
                }
                params.push(SearchParam::Untyped(UntypedParam { name, value }));
                continue;
            }

            let (base, modifier, postfix) = split_param_name(&name);
            let descriptor = match descriptors.entry(base.to_string()) {
                Entry::Occupied(entry) => entry.get().clone(),
                Entry::Vacant(entry) => {
                    let descriptor = registry
                        .lookup(&self.resource, base)
                        .ok_or_else(|| SearchError::UnknownParameter(base.to_string()))?;
                    entry.insert(descriptor).clone()
                }
            };

            let mut info = (*descriptor).clone();
            if let Some(modifier) = modifier {
                info.modifier = Some(modifier.to_string());
            }
            if let Some(postfix) = postfix {
                info.postfix = Some(postfix.to_string());
            }

            let values = split_unescaped(&value, ',');
            let param = if values.len() == 1 {
                parse_search_param(values[0], &info)?
            } else {
                SearchParam::Or(parse_or_param(&values, &info)?)
            };
            params.push(param);
        }

        tracing::debug!(resource = %self.resource, params = params.len(), "parsed search query");
        Ok(params)
    }

    /// Pagination controls, parsed leniently: the first occurrence of each
    /// reserved parameter wins, unparsable values fall back to the defaults.
    pub fn options(&self) -> QueryOptions {
        let pairs = self.pairs().unwrap_or_default();
        let first = |key: &str| {
            pairs
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value.as_str())
        };
        QueryOptions {
            count: first(COUNT_PARAM)
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_COUNT),
            offset: first(OFFSET_PARAM)
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_OFFSET),
        }
    }

    /// Re-emit every parameter in canonical form, in source order.
    ///
    /// With `include_defaults`, the pagination keys are appended: values from
    /// the original query when present, `_count=100`/`_offset=0` otherwise.
    pub fn normalized_values(
        &self,
        registry: &SearchParamRegistry,
        include_defaults: bool,
    ) -> Result<QueryValues> {
        let mut values = QueryValues::new();
        for param in self.params(registry)? {
            let (name, value) = param.query_param_and_value();
            values.entry(name).or_default().push(value);
        }
        if include_defaults {
            for (name, value) in self.options().query_values() {
                values.insert(name, value);
            }
        }
        Ok(values)
    }
}

/// Pagination controls extracted from the reserved parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOptions {
    pub count: usize,
    pub offset: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            offset: DEFAULT_OFFSET,
        }
    }
}

impl QueryOptions {
    /// The pagination keys in emission form.
    pub fn query_values(&self) -> QueryValues {
        let mut values = QueryValues::new();
        values.insert(COUNT_PARAM.to_string(), vec![self.count.to_string()]);
        values.insert(OFFSET_PARAM.to_string(), vec![self.offset.to_string()]);
        values
    }
}

/// Percent-encode normalized values back into a query string.
pub fn encode_query_values(values: &QueryValues) -> String {
    let mut out = String::new();
    for (name, entries) in values {
        for value in entries {
            if !out.is_empty() {
                out.push('&');
            }
            out.push_str(&urlencoding::encode(name));
            out.push('=');
            out.push_str(&urlencoding::encode(value));
        }
    }
    out
}

/// Split a raw parameter name into `(base, modifier, postfix)`.
///
/// `subject:Patient.name` has all three parts; `name:exact` only a modifier;
/// `subject.name` only a postfix.
fn split_param_name(name: &str) -> (&str, Option<&str>, Option<&str>) {
    if let Some((base, suffix)) = name.split_once(':') {
        match suffix.split_once('.') {
            Some((modifier, postfix)) => (base, Some(modifier), Some(postfix)),
            None => (base, Some(suffix), None),
        }
    } else if let Some((base, postfix)) = name.split_once('.') {
        (base, None, Some(postfix))
    } else {
        (name, None, None)
    }
}

fn decode_component(raw: &str) -> std::result::Result<String, std::string::FromUtf8Error> {
    let plus_decoded = raw.replace('+', " ");
    urlencoding::decode(&plus_decoded).map(|decoded| decoded.into_owned())
}
