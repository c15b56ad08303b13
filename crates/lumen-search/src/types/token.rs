//! Token search parameter parsing.
//!
//! A token is `code` or `system|code`, split on the first unescaped `|`.
//! The three input shapes are distinct and all survive emission:
//! - `code` matches any system (`any_system`)
//! - `|code` matches a missing system
//! - `system|code` matches exactly

use crate::error::Result;
use crate::escape::{escape, split_unescaped, unescape};
use crate::parameters::SearchParamInfo;
use crate::types::reject_prefix;

/// A parsed token search parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenParam {
    pub info: SearchParamInfo,
    pub system: String,
    pub code: String,
    /// True when the literal had no `|` at all: any system matches.
    pub any_system: bool,
}

pub fn parse_token_param(raw: &str, info: &SearchParamInfo) -> Result<TokenParam> {
    reject_prefix(raw, info)?;
    let fields = split_unescaped(raw, '|');
    let (system, code, any_system) = if fields.len() == 1 {
        (String::new(), unescape(fields[0]), true)
    } else {
        // Only the first unescaped pipe separates; any further pipes belong
        // to the code.
        (unescape(fields[0]), unescape(&fields[1..].join("|")), false)
    };
    Ok(TokenParam {
        info: info.clone(),
        system,
        code,
        any_system,
    })
}

impl TokenParam {
    pub(crate) fn query_param_and_value(&self) -> (String, String) {
        let value = if self.any_system {
            escape(&self.code)
        } else {
            format!("{}|{}", escape(&self.system), escape(&self.code))
        };
        (self.info.query_param_name(), value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::parameters::SearchParamType;

    fn info() -> SearchParamInfo {
        SearchParamInfo::new("foo", SearchParamType::Token).with_path("bar", "CodeableConcept")
    }

    #[test]
    fn test_bare_code() {
        let t = parse_token_param("M", &info()).unwrap();
        assert_eq!(t.info.name, "foo");
        assert!(t.any_system);
        assert_eq!(t.code, "M");
        assert_eq!(t.system, "");
    }

    #[test]
    fn test_system_and_code() {
        let t = parse_token_param("http://hl7.org/fhir/v2/0001|M", &info()).unwrap();
        assert!(!t.any_system);
        assert_eq!(t.system, "http://hl7.org/fhir/v2/0001");
        assert_eq!(t.code, "M");
    }

    #[test]
    fn test_systemless_code() {
        let t = parse_token_param("|M", &info()).unwrap();
        assert!(!t.any_system);
        assert_eq!(t.system, "");
        assert_eq!(t.code, "M");
    }

    #[test]
    fn test_escaped_pipes_and_backslashes() {
        let t = parse_token_param(r"foo\|bar", &info()).unwrap();
        assert!(t.any_system);
        assert_eq!(t.code, "foo|bar");
        assert_eq!(t.system, "");

        let t = parse_token_param(r"foo\|bar|foo\\\|baz", &info()).unwrap();
        assert!(!t.any_system);
        assert_eq!(t.system, "foo|bar");
        assert_eq!(t.code, r"foo\|baz");
    }

    #[test]
    fn test_prefix_is_rejected() {
        let err = parse_token_param("ne123", &info()).unwrap_err();
        assert_eq!(err, SearchError::InvalidPrefix("foo".to_string()));
    }

    #[test]
    fn test_reconstitution() {
        for raw in [
            "http://hl7.org/fhir/v2/0001|M",
            "|M",
            "M",
            r"http://hl7.org/fhir/v2/0001|M\|F",
        ] {
            let t = parse_token_param(raw, &info()).unwrap();
            assert_eq!(t.query_param_and_value(), ("foo".to_string(), raw.to_string()));
        }
    }

    #[test]
    fn test_reconstitution_with_modifier() {
        let info = info().with_modifier("text");
        let t = parse_token_param("M", &info).unwrap();
        assert_eq!(t.query_param_and_value(), ("foo:text".to_string(), "M".to_string()));
    }
}
