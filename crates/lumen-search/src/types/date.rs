//! Date search parameter parsing.
//!
//! The value grammar is an optional comparator prefix followed by a FHIR
//! date/time literal; precision and timezone handling live in
//! [`lumen_core::FhirDateTime`].

use crate::error::{Result, SearchError};
use crate::parameters::{Prefix, SearchParamInfo};
use crate::types::prefixed_value;
use lumen_core::FhirDateTime;

/// A parsed date search parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParam {
    pub info: SearchParamInfo,
    pub prefix: Prefix,
    pub date: FhirDateTime,
}

pub fn parse_date_param(raw: &str, info: &SearchParamInfo) -> Result<DateParam> {
    let (prefix, rest) = Prefix::extract(raw);
    let date = rest
        .parse()
        .map_err(|_| SearchError::InvalidContent(info.name.clone()))?;
    Ok(DateParam {
        info: info.clone(),
        prefix: prefix.unwrap_or_default(),
        date,
    })
}

impl DateParam {
    pub(crate) fn query_param_and_value(&self) -> (String, String) {
        (
            self.info.query_param_name(),
            prefixed_value(self.prefix, self.date.to_string()),
        )
    }
}
