use thiserror::Error;

/// Errors raised while parsing a search query.
///
/// Every variant carries the offending parameter name. A failure is fatal to
/// the enclosing query: there is no partial result and no recovery. The HTTP
/// layer is expected to render these as 400-class OperationOutcome responses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("Parameter \"{0}\" is unknown")]
    UnknownParameter(String),

    #[error("Parameter \"{0}\" content is invalid")]
    InvalidContent(String),

    #[error("Parameter \"{0}\" modifier is invalid")]
    InvalidModifier(String),

    #[error("Parameter \"{0}\" comparator prefix is invalid")]
    InvalidPrefix(String),
}

impl SearchError {
    /// The offending parameter name.
    pub fn parameter(&self) -> &str {
        match self {
            Self::UnknownParameter(name)
            | Self::InvalidContent(name)
            | Self::InvalidModifier(name)
            | Self::InvalidPrefix(name) => name,
        }
    }

    /// Message-catalogue code for OperationOutcome rendering.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownParameter(_) => "MSG_PARAM_UNKNOWN",
            Self::InvalidContent(_) => "MSG_PARAM_INVALID",
            Self::InvalidModifier(_) => "MSG_PARAM_MODIFIER_INVALID",
            Self::InvalidPrefix(_) => "MSG_PARAM_PREFIX_INVALID",
        }
    }
}

/// Convenience result type for search operations
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_follow_the_catalogue() {
        let err = SearchError::InvalidContent("foo".to_string());
        assert_eq!(err.to_string(), "Parameter \"foo\" content is invalid");
        assert_eq!(err.code(), "MSG_PARAM_INVALID");
        assert_eq!(err.parameter(), "foo");

        let err = SearchError::InvalidModifier("foo".to_string());
        assert_eq!(err.to_string(), "Parameter \"foo\" modifier is invalid");
        assert_eq!(err.code(), "MSG_PARAM_MODIFIER_INVALID");
    }
}
