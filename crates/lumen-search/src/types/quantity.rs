//! Quantity search parameter parsing.
//!
//! Value grammar: `[prefix]number[|system[|code]]`. The numeric head follows
//! the number grammar; `system` and `code` are stored unescaped and
//! re-escaped on emission.

use crate::error::{Result, SearchError};
use crate::escape::{escape, split_unescaped, unescape};
use crate::parameters::{Prefix, SearchParamInfo};
use crate::types::prefixed_value;
use lumen_core::FhirDecimal;

/// A parsed quantity search parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityParam {
    pub info: SearchParamInfo,
    pub prefix: Prefix,
    pub number: FhirDecimal,
    pub system: String,
    pub code: String,
}

pub fn parse_quantity_param(raw: &str, info: &SearchParamInfo) -> Result<QuantityParam> {
    let (prefix, rest) = Prefix::extract(raw);
    let fields = split_unescaped(rest, '|');
    if fields.len() > 3 {
        return Err(SearchError::InvalidContent(info.name.clone()));
    }
    let number = fields[0]
        .parse()
        .map_err(|_| SearchError::InvalidContent(info.name.clone()))?;
    Ok(QuantityParam {
        info: info.clone(),
        prefix: prefix.unwrap_or_default(),
        number,
        system: fields.get(1).map(|s| unescape(s)).unwrap_or_default(),
        code: fields.get(2).map(|s| unescape(s)).unwrap_or_default(),
    })
}

impl QuantityParam {
    pub(crate) fn query_param_and_value(&self) -> (String, String) {
        let value = if self.system.is_empty() && self.code.is_empty() {
            self.number.to_string()
        } else {
            format!(
                "{}|{}|{}",
                self.number,
                escape(&self.system),
                escape(&self.code)
            )
        };
        (
            self.info.query_param_name(),
            prefixed_value(self.prefix, value),
        )
    }
}
