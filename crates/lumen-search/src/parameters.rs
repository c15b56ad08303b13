use serde::{Deserialize, Serialize};
use std::fmt;

/// FHIR search parameter value types handled by the parser.
/// See: https://hl7.org/fhir/R4B/search.html#table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchParamType {
    Number,
    Date,
    String,
    Token,
    Reference,
    Composite,
    Quantity,
    Uri,
}

impl SearchParamType {
    /// Whether values of this type may start with a comparator prefix.
    pub fn accepts_prefix(&self) -> bool {
        matches!(self, Self::Number | Self::Date | Self::Quantity)
    }
}

/// Comparator prefixes for number/date/quantity values
/// e.g. `ge2020-01-01`, `lt5.0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prefix {
    #[default]
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    Ap,
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Prefix::Eq => "eq",
            Prefix::Ne => "ne",
            Prefix::Gt => "gt",
            Prefix::Lt => "lt",
            Prefix::Ge => "ge",
            Prefix::Le => "le",
            Prefix::Ap => "ap",
        };
        f.write_str(s)
    }
}

impl Prefix {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "eq" => Some(Self::Eq),
            "ne" => Some(Self::Ne),
            "gt" => Some(Self::Gt),
            "lt" => Some(Self::Lt),
            "ge" => Some(Self::Ge),
            "le" => Some(Self::Le),
            "ap" => Some(Self::Ap),
            _ => None,
        }
    }

    /// Split a raw value into its comparator prefix and remainder.
    ///
    /// The two leading characters count as a prefix only when they form one
    /// of the seven comparators and the following character does not continue
    /// a word (`le5.4` has a prefix, `lessthan` does not). Values without a
    /// recognizable prefix are returned whole.
    pub fn extract(value: &str) -> (Option<Self>, &str) {
        let mut chars = value.chars();
        let (Some(a), Some(b)) = (chars.next(), chars.next()) else {
            return (None, value);
        };
        if !a.is_ascii_lowercase() || !b.is_ascii_lowercase() {
            return (None, value);
        }
        let rest = chars.as_str();
        if rest.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
            return (None, value);
        }
        match Self::parse(&value[..2]) {
            Some(prefix) => (Some(prefix), rest),
            None => (None, value),
        }
    }
}

/// One resolved element path of a search parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParamPath {
    pub path: String,
    #[serde(rename = "type")]
    pub value_type: String,
}

impl SearchParamPath {
    pub fn new(path: impl Into<String>, value_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            value_type: value_type.into(),
        }
    }
}

/// Static metadata describing one search parameter.
///
/// Descriptors are supplied by the registry and treated as read-only by the
/// parsers; `modifier` and `postfix` are filled in per request from the
/// `name:modifier.postfix` form of the parameter name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParamInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: SearchParamType,
    /// Element paths this parameter searches, with their FHIR types.
    #[serde(default)]
    pub paths: Vec<SearchParamPath>,
    /// For composite parameters: the names of the component parameters.
    #[serde(default)]
    pub composites: Vec<String>,
    /// For reference parameters: the permitted target resource types.
    #[serde(default)]
    pub targets: Vec<String>,
    /// Modifier from the request (`name:exact`, `subject:Patient`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<String>,
    /// Chain postfix from the request (`subject.name`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postfix: Option<String>,
}

impl SearchParamInfo {
    pub fn new(name: impl Into<String>, param_type: SearchParamType) -> Self {
        Self {
            name: name.into(),
            param_type,
            paths: Vec::new(),
            composites: Vec::new(),
            targets: Vec::new(),
            modifier: None,
            postfix: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>, value_type: impl Into<String>) -> Self {
        self.paths.push(SearchParamPath::new(path, value_type));
        self
    }

    pub fn with_composites(mut self, composites: Vec<String>) -> Self {
        self.composites = composites;
        self
    }

    pub fn with_targets(mut self, targets: Vec<String>) -> Self {
        self.targets = targets;
        self
    }

    pub fn with_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifier = Some(modifier.into());
        self
    }

    pub fn with_postfix(mut self, postfix: impl Into<String>) -> Self {
        self.postfix = Some(postfix.into());
        self
    }

    /// Parameter name as it appears in a query, with the modifier suffix.
    pub(crate) fn query_param_name(&self) -> String {
        match &self.modifier {
            Some(modifier) => format!("{}:{modifier}", self.name),
            None => self.name.clone(),
        }
    }
}
