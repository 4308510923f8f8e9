use std::fmt;

/// Classified provider failure, so callers can tell a transient outage from
/// a request the provider will never accept.
#[derive(Debug)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub status: Option<u16>,
    pub message: String,
    /// Seconds to wait before retrying (from a 429 body).
    pub retry_after_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// 401/403: bad API key or permissions.
    Auth,
    /// 402: billing/quota exhausted.
    Billing,
    /// 429: rate limited; check retry_after_secs.
    RateLimit,
    /// 404 or unknown model.
    NotFound,
    /// 408 or the request took too long.
    Timeout,
    /// Connection refused, DNS failure, reset.
    Network,
    /// 500/502/503/504.
    ServerError,
    /// The model declined to produce the profile.
    Refused,
    /// 2xx response whose content is not a JSON document.
    InvalidResponse,
    /// Anything else.
    Unknown,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
            retry_after_secs: None,
        }
    }

    pub fn from_status(status: u16, body: &str) -> Self {
        let kind = match status {
            401 | 403 => ProviderErrorKind::Auth,
            402 => ProviderErrorKind::Billing,
            404 => ProviderErrorKind::NotFound,
            408 => ProviderErrorKind::Timeout,
            429 => ProviderErrorKind::RateLimit,
            500 | 502 | 503 | 504 => ProviderErrorKind::ServerError,
            _ => ProviderErrorKind::Unknown,
        };

        let retry_after_secs = if kind == ProviderErrorKind::RateLimit {
            extract_retry_after(body)
        } else {
            None
        };

        Self {
            kind,
            status: Some(status),
            message: truncate_body(body),
            retry_after_secs,
        }
    }

    pub fn network(err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ProviderErrorKind::Timeout
        } else {
            ProviderErrorKind::Network
        };
        Self::new(kind, err.to_string())
    }

    /// Whether the same request may succeed if sent again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            ProviderErrorKind::RateLimit
                | ProviderErrorKind::Timeout
                | ProviderErrorKind::Network
                | ProviderErrorKind::ServerError
        )
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(status) = self.status {
            write!(f, "provider error ({status}, {:?}): {}", self.kind, self.message)
        } else {
            write!(f, "provider error ({:?}): {}", self.kind, self.message)
        }
    }
}

impl std::error::Error for ProviderError {}

/// Handles `{"error": {"retry_after": 5}}` and `{"retry_after": 5}`.
fn extract_retry_after(body: &str) -> Option<u64> {
    let v: serde_json::Value = serde_json::from_str(body).ok()?;
    v["error"]["retry_after"]
        .as_u64()
        .or_else(|| v["retry_after"].as_u64())
        .or_else(|| {
            v["error"]["retry_after"]
                .as_f64()
                .or_else(|| v["retry_after"].as_f64())
                .map(|f| f.ceil() as u64)
        })
}

pub(crate) fn truncate_body(body: &str) -> String {
    const LIMIT: usize = 300;
    if body.len() <= LIMIT {
        return body.to_string();
    }
    let mut end = LIMIT;
    while end > 0 && !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        let cases = [
            (401, ProviderErrorKind::Auth, false),
            (402, ProviderErrorKind::Billing, false),
            (404, ProviderErrorKind::NotFound, false),
            (408, ProviderErrorKind::Timeout, true),
            (429, ProviderErrorKind::RateLimit, true),
            (503, ProviderErrorKind::ServerError, true),
            (400, ProviderErrorKind::Unknown, false),
        ];
        for (status, kind, retryable) in cases {
            let e = ProviderError::from_status(status, "");
            assert_eq!(e.kind, kind, "{status}");
            assert_eq!(e.is_retryable(), retryable, "{status}");
        }
    }

    #[test]
    fn refusal_and_bad_content_are_not_retryable() {
        assert!(!ProviderError::new(ProviderErrorKind::Refused, "no").is_retryable());
        assert!(!ProviderError::new(ProviderErrorKind::InvalidResponse, "x").is_retryable());
    }

    #[test]
    fn retry_after_parsed_for_rate_limits() {
        let e = ProviderError::from_status(429, r#"{"error":{"retry_after":2.5}}"#);
        assert_eq!(e.retry_after_secs, Some(3));
        let e = ProviderError::from_status(500, r#"{"retry_after":9}"#);
        assert_eq!(e.retry_after_secs, None);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let body = "あ".repeat(200);
        let t = truncate_body(&body);
        assert!(t.ends_with("..."));
        assert!(t.len() <= 303);
    }
}
