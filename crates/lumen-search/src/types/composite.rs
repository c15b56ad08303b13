//! Composite search parameter parsing.
//!
//! A composite value packs one segment per component parameter, separated by
//! unescaped `$`. Segments are kept in their raw (still escaped) form here;
//! interpreting each against the parameter named in `composites` is deferred
//! to the query executor, which knows the component descriptors.

use crate::error::{Result, SearchError};
use crate::escape::split_unescaped;
use crate::parameters::SearchParamInfo;
use crate::types::reject_prefix;

/// A parsed composite search parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeParam {
    pub info: SearchParamInfo,
    /// Raw component values, escapes intact, one per `info.composites` entry.
    pub values: Vec<String>,
}

pub fn parse_composite_param(raw: &str, info: &SearchParamInfo) -> Result<CompositeParam> {
    reject_prefix(raw, info)?;
    let segments = split_unescaped(raw, '$');
    if segments.len() != info.composites.len() {
        return Err(SearchError::InvalidContent(info.name.clone()));
    }
    Ok(CompositeParam {
        info: info.clone(),
        values: segments.into_iter().map(str::to_string).collect(),
    })
}

impl CompositeParam {
    pub(crate) fn query_param_and_value(&self) -> (String, String) {
        (self.info.query_param_name(), self.values.join("$"))
    }
}
