use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use thiserror::Error;

/// An opaque, provider-specific credential handed to scanners. The orchestrator and
/// scanners never inspect its contents; only the scanner's provider SDK client
/// construction (out of scope for this crate) does.
#[derive(Debug, Clone)]
pub struct Credential(Arc<dyn std::any::Any + Send + Sync>);

impl Credential {
    /// Wrap a concrete, provider-specific credential value.
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Recover the concrete credential value, if `T` matches what was stored.
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

/// Fatal at setup: the credential provider could not produce a usable credential.
#[derive(Debug, Error)]
#[error("credential validation failed: {message}")]
pub struct CredentialError {
    /// Human-readable description of why validation failed.
    pub message: String,
}

impl CredentialError {
    /// Build a new credential error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The result of [`CredentialProvider::validate_credentials`].
#[derive(Debug, Clone)]
pub struct CredentialValidation {
    /// Whether the credential is usable.
    pub valid: bool,
    /// The validated credential, if `valid`.
    pub credential: Option<Credential>,
    /// Why validation failed, if not `valid`.
    pub error: Option<String>,
}

/// Opaque accessor for per-provider credentials and default account/subscription
/// id. Implementations live outside this crate (per-provider SDK
/// credential chains are out of scope); this crate only depends on the trait.
#[async_trait]
pub trait CredentialProvider: Debug + Send + Sync {
    /// Fetch a usable credential, or fail if none is configured.
    async fn get_credential(&self) -> Result<Credential, CredentialError>;

    /// The default AWS account id, if this provider is AWS-flavored.
    fn default_account_id(&self) -> Option<String>;

    /// The default Azure subscription id, if this provider is Azure-flavored.
    fn default_subscription_id(&self) -> Option<String>;

    /// Validate that a usable credential is currently available.
    async fn validate_credentials(&self) -> CredentialValidation {
        match self.get_credential().await {
            Ok(credential) => CredentialValidation {
                valid: true,
                credential: Some(credential),
                error: None,
            },
            Err(err) => CredentialValidation {
                valid: false,
                credential: None,
                error: Some(err.message),
            },
        }
    }
}

/// A cloneable, type-erased [`CredentialProvider`].
pub type SharedCredentialProvider = Arc<dyn CredentialProvider>;
