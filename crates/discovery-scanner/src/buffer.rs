use chrono::Utc;
use discovery_types::{ScanError, ScanWarning};

/// An invocation-owned accumulator for the errors and warnings a single
/// `scan()` call produces.
///
/// Owned by the invocation rather than the scanner instance, so two concurrent
/// `scan()` calls against the same shared, stateless scanner can never
/// interleave writes into the same buffer. There is deliberately no `clear()`
/// method: a fresh `ScanBuffer` is created at the top of
/// every `scan()` call instead, which makes "clear errors at the start of each
/// scan" true by construction rather than by discipline.
#[derive(Debug, Default)]
pub struct ScanBuffer {
    service: String,
    region: String,
    errors: Vec<ScanError>,
    warnings: Vec<ScanWarning>,
}

impl ScanBuffer {
    /// Start a fresh buffer for one `scan()` invocation.
    pub fn new(service: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Record a non-fatal error for `operation`.
    pub fn record_error(&mut self, operation: impl Into<String>, message: impl Into<String>) {
        self.record_error_with_code(operation, message, None);
    }

    /// Record a non-fatal error with a provider-native error code.
    pub fn record_error_with_code(
        &mut self,
        operation: impl Into<String>,
        message: impl Into<String>,
        code: Option<String>,
    ) {
        self.errors.push(ScanError {
            service: self.service.clone(),
            region: self.region.clone(),
            operation: operation.into(),
            message: message.into(),
            code,
            timestamp: Utc::now(),
        });
    }

    /// Record a non-fatal warning.
    pub fn record_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(ScanWarning {
            service: self.service.clone(),
            region: self.region.clone(),
            message: message.into(),
            timestamp: Utc::now(),
        });
    }

    /// Consume the buffer, returning what was recorded.
    pub fn into_parts(self) -> (Vec<ScanError>, Vec<ScanWarning>) {
        (self.errors, self.warnings)
    }
}
