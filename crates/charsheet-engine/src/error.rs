use charsheet_core::{SchemaViolation, ValidationErrors};

use crate::provider::{ProviderError, ProviderErrorKind};

/// Why a name → profile request produced no profile.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The request body was not a JSON document.
    #[error("invalid JSON body: {0}")]
    BadRequest(String),
    /// The name failed validation. No generator call was made.
    #[error("invalid input: {0}")]
    InvalidInput(ValidationErrors),
    #[error("generation failed: {0}")]
    GenerationFailed(FailureCause),
}

/// Classified cause of a [`GenerationError::GenerationFailed`].
#[derive(Debug, thiserror::Error)]
pub enum FailureCause {
    /// Transient: network, deadline, rate limit, provider 5xx.
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    /// The provider refused the call or the model refused the task.
    #[error("provider rejected the request: {0}")]
    Rejected(String),
    /// Output failed profile validation.
    #[error("output does not conform to the profile schema ({} violations)", .0.len())]
    NonConforming(Vec<SchemaViolation>),
}

impl FailureCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureCause::Unavailable(_) => "unavailable",
            FailureCause::Rejected(_) => "rejected",
            FailureCause::NonConforming(_) => "non_conforming",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, FailureCause::Unavailable(_))
    }
}

impl From<ProviderError> for FailureCause {
    fn from(e: ProviderError) -> Self {
        if e.is_retryable() {
            return FailureCause::Unavailable(e.to_string());
        }
        match e.kind {
            ProviderErrorKind::InvalidResponse => FailureCause::NonConforming(vec![SchemaViolation {
                path: String::new(),
                keyword: "json".to_string(),
                message: e.message,
            }]),
            _ => FailureCause::Rejected(e.to_string()),
        }
    }
}

impl From<FailureCause> for GenerationError {
    fn from(cause: FailureCause) -> Self {
        GenerationError::GenerationFailed(cause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_map_to_causes() {
        let cases = [
            (ProviderErrorKind::Network, "unavailable"),
            (ProviderErrorKind::RateLimit, "unavailable"),
            (ProviderErrorKind::ServerError, "unavailable"),
            (ProviderErrorKind::Auth, "rejected"),
            (ProviderErrorKind::Refused, "rejected"),
            (ProviderErrorKind::NotFound, "rejected"),
            (ProviderErrorKind::InvalidResponse, "non_conforming"),
        ];
        for (kind, expected) in cases {
            let cause = FailureCause::from(ProviderError::new(kind, "x"));
            assert_eq!(cause.as_str(), expected, "{kind:?}");
        }
    }

    #[test]
    fn only_unavailable_is_retryable() {
        assert!(FailureCause::Unavailable("x".into()).is_retryable());
        assert!(!FailureCause::Rejected("x".into()).is_retryable());
        assert!(!FailureCause::NonConforming(Vec::new()).is_retryable());
    }
}
