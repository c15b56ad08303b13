//! OR combinator over typed search parameters.
//!
//! A comma-separated value becomes one [`OrParam`] wrapping one typed node
//! per alternative. Every item is parsed with the same descriptor, so name,
//! modifier, and postfix are uniform by construction; the combinator's own
//! descriptor drops the paths and composites, which only make sense on the
//! element-typed items.

use crate::error::Result;
use crate::parameters::SearchParamInfo;
use crate::types::{SearchParam, parse_search_param};

/// A disjunction of alternative values for one parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrParam {
    pub info: SearchParamInfo,
    pub items: Vec<SearchParam>,
}

pub fn parse_or_param(raw_values: &[&str], info: &SearchParamInfo) -> Result<OrParam> {
    let items = raw_values
        .iter()
        .map(|raw| parse_search_param(raw, info))
        .collect::<Result<Vec<_>>>()?;
    let mut info = info.clone();
    info.paths.clear();
    info.composites.clear();
    Ok(OrParam { info, items })
}

impl OrParam {
    pub(crate) fn query_param_and_value(&self) -> (String, String) {
        let Some(first) = self.items.first() else {
            return (self.info.query_param_name(), String::new());
        };
        let (name, first_value) = first.query_param_and_value();
        let mut value = first_value;
        for item in &self.items[1..] {
            value.push(',');
            value.push_str(&item.query_param_and_value().1);
        }
        (name, value)
    }
}
