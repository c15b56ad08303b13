//! Number search parameter parsing.
//!
//! Values are exact decimals; trailing zeros and the implied precision are
//! kept by [`lumen_core::FhirDecimal`] so emission reproduces the literal.

use crate::error::{Result, SearchError};
use crate::parameters::{Prefix, SearchParamInfo};
use crate::types::prefixed_value;
use lumen_core::FhirDecimal;

/// A parsed number search parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberParam {
    pub info: SearchParamInfo,
    pub prefix: Prefix,
    pub number: FhirDecimal,
}

pub fn parse_number_param(raw: &str, info: &SearchParamInfo) -> Result<NumberParam> {
    let (prefix, rest) = Prefix::extract(raw);
    let number = rest
        .parse()
        .map_err(|_| SearchError::InvalidContent(info.name.clone()))?;
    Ok(NumberParam {
        info: info.clone(),
        prefix: prefix.unwrap_or_default(),
        number,
    })
}

impl NumberParam {
    pub(crate) fn query_param_and_value(&self) -> (String, String) {
        (
            self.info.query_param_name(),
            prefixed_value(self.prefix, self.number.to_string()),
        )
    }
}
