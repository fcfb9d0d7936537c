use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A non-fatal failure recorded during a scan, attached to the owning session.
///
/// `ScanError` is data, not a Rust error: scanners never propagate a `ScanError` as
/// an `Err`, they append it to their error buffer and keep going.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanError {
    /// Neutral service name (e.g. `ec2`).
    pub service: String,
    /// Region the error occurred in (or `"global"`).
    pub region: String,
    /// The operation that failed (e.g. `"DescribeInstances"`, `"cancel"`, `"scan"`).
    pub operation: String,
    /// Human-readable message.
    pub message: String,
    /// Provider-native error code, if any.
    pub code: Option<String>,
    /// When the error was recorded.
    pub timestamp: DateTime<Utc>,
}

impl ScanError {
    /// The well-known operation name used for cancellation errors.
    pub const CANCEL_OPERATION: &'static str = "cancel";
    /// The well-known operation name used when a scanner invocation itself panics
    /// or otherwise escapes its own error handling.
    pub const SCAN_OPERATION: &'static str = "scan";

    /// Build a cancellation `ScanError` with the well-known message and operation.
    pub fn cancelled(service: impl Into<String>, region: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
            operation: Self::CANCEL_OPERATION.to_string(),
            message: "cancelled by user".to_string(),
            code: None,
            timestamp: now,
        }
    }
}

/// A non-fatal deviation from the expected scan path (e.g. a degraded fetch path
/// was used). Never aborts a scanner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Neutral service name.
    pub service: String,
    /// Region the warning occurred in.
    pub region: String,
    /// Human-readable message.
    pub message: String,
    /// When the warning was recorded.
    pub timestamp: DateTime<Utc>,
}

/// Provider-neutral classification of a single failed API call, used by the rate
/// limiter to decide whether to retry.
///
/// This is distinct from [`ScanError`]: a `ScanErrorKind` is the *input* a scanner
/// gives the rate limiter about one attempt; a `ScanError` is the *record* attached
/// to a session once all retries for that attempt are exhausted. The same failed
/// call produces at most one `ScanError` but may produce several `ScanErrorKind`
/// classifications (one per retry attempt).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanErrorKind {
    /// Provider-side rate limiting (`Throttling`, `429`, "rate exceeded", ...).
    Throttled,
    /// Transient infrastructure error (`ServiceUnavailable`, `RequestTimeout`, 5xx
    /// other than 501).
    Transient,
    /// Anything else, including `AccessDenied`, `NotFound`, and validation errors.
    Terminal {
        /// The provider-native error code, if known.
        code: Option<String>,
    },
}

impl ScanErrorKind {
    /// Classify a provider error by its code/name and message.
    pub fn classify(code: Option<&str>, message: &str) -> Self {
        const THROTTLE_CODES: &[&str] = &[
            "Throttling",
            "ThrottlingException",
            "RequestLimitExceeded",
            "TooManyRequestsException",
            "429",
        ];
        const TRANSIENT_CODES: &[&str] = &["ServiceUnavailable", "RequestTimeout"];

        let lowered_message = message.to_ascii_lowercase();
        if code.is_some_and(|c| THROTTLE_CODES.contains(&c))
            || lowered_message.contains("rate exceeded")
            || lowered_message.contains("throttled")
        {
            return ScanErrorKind::Throttled;
        }
        if code.is_some_and(|c| TRANSIENT_CODES.contains(&c)) || is_retryable_5xx(code) {
            return ScanErrorKind::Transient;
        }
        ScanErrorKind::Terminal {
            code: code.map(str::to_string),
        }
    }

    /// Whether this classification should be retried by the rate limiter.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ScanErrorKind::Terminal { .. })
    }
}

/// Implemented by provider-call error types so `discovery-ratelimit`'s
/// `RateLimiter::with_backoff` can decide whether to retry without depending on
/// any particular provider SDK's error shape.
pub trait ClassifyScanError {
    /// Classify `self` per the table.
    fn classify(&self) -> ScanErrorKind;
}

fn is_retryable_5xx(code: Option<&str>) -> bool {
    match code.and_then(|c| c.parse::<u16>().ok()) {
        Some(status) => (500..600).contains(&status) && status != 501,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_throttling_codes() {
        assert_eq!(
            ScanErrorKind::classify(Some("ThrottlingException"), "slow down"),
            ScanErrorKind::Throttled
        );
        assert_eq!(
            ScanErrorKind::classify(Some("429"), "too many requests"),
            ScanErrorKind::Throttled
        );
    }

    #[test]
    fn classifies_throttling_by_message() {
        assert_eq!(
            ScanErrorKind::classify(None, "Rate exceeded for this account"),
            ScanErrorKind::Throttled
        );
    }

    #[test]
    fn classifies_transient_5xx_except_501() {
        assert_eq!(
            ScanErrorKind::classify(Some("503"), "oops"),
            ScanErrorKind::Transient
        );
        assert!(matches!(
            ScanErrorKind::classify(Some("501"), "not implemented"),
            ScanErrorKind::Terminal { .. }
        ));
    }

    #[test]
    fn classifies_terminal_by_default() {
        assert!(matches!(
            ScanErrorKind::classify(Some("AccessDenied"), "nope"),
            ScanErrorKind::Terminal { .. }
        ));
    }

    #[test]
    fn terminal_is_not_retryable() {
        let terminal = ScanErrorKind::Terminal { code: None };
        assert!(!terminal.is_retryable());
        assert!(ScanErrorKind::Throttled.is_retryable());
        assert!(ScanErrorKind::Transient.is_retryable());
    }
}
