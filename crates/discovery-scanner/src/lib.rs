//! The `ServiceScanner` contract and the shared scaffolding every concrete
//! scanner is built on.

mod base;
mod buffer;
mod context;
mod credentials;
mod pagination;
mod registry;
mod scanner;

pub use base::{
    build_arn, create_resource, get_name_from_tags, redact_sensitive_properties, tags_from_map, tags_to_record,
    ArnParams, NativeTag, REDACTED,
};
pub use buffer::ScanBuffer;
pub use context::ScannerContext;
pub use credentials::{
    Credential, CredentialError, CredentialProvider, CredentialValidation, SharedCredentialProvider,
};
pub use pagination::{collect_all, paginate};
pub use registry::ScannerRegistry;
pub use scanner::{ScanOutcome, ServiceScanner};
