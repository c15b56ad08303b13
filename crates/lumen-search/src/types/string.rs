//! String search parameter parsing.
//!
//! Strings have no inner value grammar: `|` is an ordinary character here and
//! only the OR/composite separators participate in escaping, which happens
//! before this parser runs. The value is stored and emitted verbatim.

use crate::error::Result;
use crate::parameters::SearchParamInfo;
use crate::types::reject_prefix;

/// A parsed string search parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringParam {
    pub info: SearchParamInfo,
    pub value: String,
}

pub fn parse_string_param(raw: &str, info: &SearchParamInfo) -> Result<StringParam> {
    reject_prefix(raw, info)?;
    Ok(StringParam {
        info: info.clone(),
        value: raw.to_string(),
    })
}

impl StringParam {
    pub(crate) fn query_param_and_value(&self) -> (String, String) {
        (self.info.query_param_name(), self.value.clone())
    }
}
