use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Rejected input. Both variants surface as 400 at the HTTP edge; storage
/// and permission failures have their own error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A request field broke a format or range rule.
    #[error("{0}")]
    Validation(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// The human readable part, without the variant prefix.
    pub fn detail(&self) -> &str {
        match self {
            Self::Validation(msg) | Self::InvalidId(msg) => msg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_is_shown_verbatim() {
        let err = DomainError::validation("due_month must be between 1 and 12");
        assert_eq!(err.to_string(), "due_month must be between 1 and 12");
        assert_eq!(err.detail(), "due_month must be between 1 and 12");
        assert_eq!(DomainError::invalid_id("x").detail(), "x");
    }
}
