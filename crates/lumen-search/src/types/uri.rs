//! URI search parameter parsing.
//!
//! Like strings, URIs carry no inner grammar; the value is kept verbatim and
//! the modifier (`:below`, `:above`) only affects the emitted parameter name.

use crate::error::Result;
use crate::parameters::SearchParamInfo;
use crate::types::reject_prefix;

/// A parsed URI search parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriParam {
    pub info: SearchParamInfo,
    pub uri: String,
}

pub fn parse_uri_param(raw: &str, info: &SearchParamInfo) -> Result<UriParam> {
    reject_prefix(raw, info)?;
    Ok(UriParam {
        info: info.clone(),
        uri: raw.to_string(),
    })
}

impl UriParam {
    pub(crate) fn query_param_and_value(&self) -> (String, String) {
        (self.info.query_param_name(), self.uri.clone())
    }
}
