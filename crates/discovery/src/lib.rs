#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

//! Thin facade over the discovery core: wires concrete scanners into
//! [`ScannerRegistry`]s and re-exports the public surface a caller needs
//! without depending on `discovery-aws`/`discovery-azure`
//! directly.
//!
//! This crate owns no logic of its own beyond registry construction and the
//! optional session-sweeping background task; the
//! orchestrator, scanners, rate limiter, and inventory types all live in their
//! own crates and are simply re-exported here for convenience.

mod aws;
mod azure;
mod sweep;

pub use aws::{aws_registry, AwsClients};
pub use azure::{azure_registry, AzureClients};
pub use sweep::spawn_session_sweeper;

pub use discovery_orchestrator::{DiscoveryError, DiscoveryOrchestrator, ProgressCallback, RegionLister, StaticRegionLister};
pub use discovery_ratelimit::{RateLimiter, RateLimiterConfig, RateLimiterError, RateLimiterStats};
pub use discovery_scanner::{
    build_arn, create_resource, get_name_from_tags, tags_from_map, tags_to_record, ArnParams, Credential,
    CredentialError, CredentialProvider, CredentialValidation, NativeTag, ScanBuffer, ScanOutcome, ScannerContext,
    ScannerRegistry, ServiceScanner, SharedCredentialProvider,
};
pub use discovery_types::{
    merge_resources, push_relationship, synthesize_neutral_type, AccountContext, ClassifyScanError,
    DiscoveredResource, DiscoveryConfig, DiscoveryConfigBuilder, DiscoveryProgress, DiscoverySession,
    InfrastructureInventory, InventoryMetadata, InventorySummary, NewResource, Provider, RegionSelector,
    RelationshipType, ResourceRelationship, ScanError, ScanErrorKind, ScanWarning, SessionStatus, GLOBAL_REGION,
};
