use thiserror::Error;

/// Core error types for Lumen value parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Invalid FHIR date literal: {0}")]
    InvalidDate(String),

    #[error("Invalid FHIR decimal literal: {0}")]
    InvalidDecimal(String),
}

impl CoreError {
    /// Create a new InvalidDate error
    pub fn invalid_date(literal: impl Into<String>) -> Self {
        Self::InvalidDate(literal.into())
    }

    /// Create a new InvalidDecimal error
    pub fn invalid_decimal(literal: impl Into<String>) -> Self {
        Self::InvalidDecimal(literal.into())
    }

    /// Check if this error is a client error (4xx category)
    ///
    /// Both variants describe malformed input, so everything here maps to a
    /// 400-class response at the HTTP layer.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidDate(_) | Self::InvalidDecimal(_))
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
