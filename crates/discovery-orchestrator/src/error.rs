use thiserror::Error;

/// The only errors that come back as a Rust `Result::Err` from orchestrator
/// operations.
#[derive(Debug, Error, Clone)]
pub enum DiscoveryError {
    /// Credential validation failed; no session was created.
    #[error("credential validation failed: {0}")]
    CredentialInvalid(String),
    /// The resolved region list was empty after applying exclusions.
    #[error("no regions resolved for this session")]
    NoRegionsResolved,
    /// `get_progress`/`get_inventory`/`get_session`/`cancel_discovery` referenced
    /// an id with no matching session (never created, or swept by `cleanup_sessions`).
    #[error("no session found with id {0}")]
    SessionNotFound(uuid::Uuid),
    /// An internal invariant was violated; the session (if any) transitions to
    /// `failed`.
    #[error("internal error: {0}")]
    Internal(String),
}
