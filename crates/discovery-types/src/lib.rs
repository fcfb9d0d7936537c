#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

//! Provider-neutral types for the cloud infrastructure discovery core.
//!
//! This crate has no knowledge of any particular cloud provider's SDK. Scanners in
//! `discovery-aws`/`discovery-azure` map provider DTOs into the shapes defined here;
//! the orchestrator in `discovery-orchestrator` only ever sees these shapes.

mod config;
mod error;
mod inventory;
mod merge;
mod progress;
mod provider;
mod relationship;
mod resource;
mod session;
mod summary;
mod typemap;

pub use config::{DiscoveryConfig, DiscoveryConfigBuilder, RegionSelector};
pub use error::{ClassifyScanError, ScanError, ScanErrorKind, ScanWarning};
pub use inventory::{AccountContext, InfrastructureInventory, InventoryMetadata};
pub use merge::merge_resources;
pub use progress::{DiscoveryProgress, SessionStatus};
pub use provider::Provider;
pub use relationship::{push_relationship, RelationshipType, ResourceRelationship};
pub use resource::{DiscoveredResource, NewResource, GLOBAL_REGION};
pub use session::DiscoverySession;
pub use summary::InventorySummary;
pub use typemap::synthesize_neutral_type;
