//! Reference search parameter parsing.
//!
//! A reference value takes one of three shapes, decided in order:
//! 1. a chained sub-query, when the parameter name carried a `.postfix`
//!    (`subject.name=Peter`)
//! 2. an absolute URL (`http://acme.org/fhir/Patient/23`)
//! 3. a local reference, either `Type/id` or a bare id resolved against the
//!    descriptor's single declared target
//!
//! The shapes form a closed sum so downstream dispatch stays exhaustive. The
//! referenced type is validated against the descriptor's `targets`, and a
//! `:Type` modifier must agree with both; emission canonicalizes the modifier
//! away except in the chained form `name:Type.postfix`.

use crate::error::{Result, SearchError};
use crate::parameters::SearchParamInfo;
use crate::query::Query;
use crate::types::reject_prefix;

/// The three shapes a reference search value can take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// `Type/id`, or a bare id resolved against the declared target.
    Local { resource_type: String, id: String },
    /// An absolute URL; the type is its second-to-last path segment.
    External { url: String, resource_type: String },
    /// A sub-query to run against the referenced resource type.
    Chained { query: Query, resource_type: String },
}

/// A parsed reference search parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceParam {
    pub info: SearchParamInfo,
    pub reference: Reference,
}

pub fn parse_reference_param(raw: &str, info: &SearchParamInfo) -> Result<ReferenceParam> {
    // Chained values are sub-query values; their grammar (including any
    // comparator prefix) belongs to the chained parameter, so no prefix
    // rejection here.
    if let Some(postfix) = info.postfix.as_deref().filter(|p| !p.is_empty()) {
        let resource_type = target_from_descriptor(info)?;
        let query = Query::new(resource_type.clone(), format!("{postfix}={raw}"));
        return Ok(ReferenceParam {
            info: info.clone(),
            reference: Reference::Chained {
                query,
                resource_type,
            },
        });
    }

    reject_prefix(raw, info)?;

    let reference = if raw.starts_with("http://") || raw.starts_with("https://") {
        let resource_type = second_to_last_segment(raw)
            .ok_or_else(|| SearchError::InvalidContent(info.name.clone()))?
            .to_string();
        check_modifier(info, &resource_type)?;
        if !info.targets.contains(&resource_type) {
            return Err(SearchError::InvalidContent(info.name.clone()));
        }
        Reference::External {
            url: raw.to_string(),
            resource_type,
        }
    } else if let Some((resource_type, id)) = raw.split_once('/') {
        check_modifier(info, resource_type)?;
        if !info.targets.iter().any(|t| t == resource_type) {
            return Err(SearchError::InvalidContent(info.name.clone()));
        }
        Reference::Local {
            resource_type: resource_type.to_string(),
            id: id.to_string(),
        }
    } else {
        let resource_type = target_from_descriptor(info)?;
        Reference::Local {
            resource_type,
            id: raw.to_string(),
        }
    };

    Ok(ReferenceParam {
        info: info.clone(),
        reference,
    })
}

/// Resolve the referenced type when the value itself does not name one:
/// the `:Type` modifier wins, otherwise the descriptor must declare exactly
/// one target.
fn target_from_descriptor(info: &SearchParamInfo) -> Result<String> {
    if let Some(modifier) = &info.modifier {
        if !info.targets.contains(modifier) {
            return Err(SearchError::InvalidModifier(info.name.clone()));
        }
        return Ok(modifier.clone());
    }
    match info.targets.as_slice() {
        [single] => Ok(single.clone()),
        _ => Err(SearchError::InvalidContent(info.name.clone())),
    }
}

/// A `:Type` modifier must be a declared target or match the type derived
/// from the value.
fn check_modifier(info: &SearchParamInfo, derived: &str) -> Result<()> {
    let Some(modifier) = &info.modifier else {
        return Ok(());
    };
    if info.targets.contains(modifier) || modifier == derived {
        Ok(())
    } else {
        Err(SearchError::InvalidModifier(info.name.clone()))
    }
}

fn second_to_last_segment(url: &str) -> Option<&str> {
    let mut segments = url.rsplit('/');
    segments.next()?;
    segments.next().filter(|s| !s.is_empty())
}

impl ReferenceParam {
    pub(crate) fn query_param_and_value(&self) -> (String, String) {
        match &self.reference {
            Reference::Local { resource_type, id } => {
                (self.info.name.clone(), format!("{resource_type}/{id}"))
            }
            Reference::External { url, .. } => (self.info.name.clone(), url.clone()),
            Reference::Chained {
                query,
                resource_type,
            } => {
                let postfix = self.info.postfix.as_deref().unwrap_or_default();
                let value = query.query.split_once('=').map(|(_, v)| v).unwrap_or_default();
                (
                    format!("{}:{resource_type}.{postfix}", self.info.name),
                    value.to_string(),
                )
            }
        }
    }
}
