//! Opaque Azure client contracts each scanner depends on.

use async_trait::async_trait;
use discovery_types::ClassifyScanError;
use discovery_types::ScanErrorKind;
use indexmap::IndexMap;
use std::fmt::Debug;
use thiserror::Error;

/// A single Azure Resource Manager call's failure.
#[derive(Debug, Error, Clone)]
#[error("{operation} failed: {message}")]
pub struct AzureCallError {
    /// The API operation that failed (e.g. `"storageAccounts.list"`).
    pub operation: String,
    /// Provider error code (e.g. `"TooManyRequests"`), if known.
    pub code: Option<String>,
    /// Human-readable message.
    pub message: String,
}

impl ClassifyScanError for AzureCallError {
    fn classify(&self) -> ScanErrorKind {
        ScanErrorKind::classify(self.code.as_deref(), &self.message)
    }
}

/// One page of a paginated ARM list call.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items returned on this page.
    pub items: Vec<T>,
    /// Continuation token for the next page, or `None` if this was the last page.
    pub next_token: Option<String>,
}

/// A minimal storage account DTO.
#[derive(Debug, Clone)]
pub struct StorageAccountDto {
    /// Storage account name.
    pub name: String,
    /// Resource group the account lives in.
    pub resource_group: String,
    /// Azure region.
    pub location: String,
    /// Tags as returned by ARM (already a flat `{key: value}` map).
    pub tags: Vec<(String, String)>,
    /// Provisioning state (`"Succeeded"`, `"Creating"`, ...).
    pub provisioning_state: String,
}

/// A minimal virtual machine DTO.
#[derive(Debug, Clone)]
pub struct VirtualMachineDto {
    /// VM name.
    pub name: String,
    /// Resource group the VM lives in.
    pub resource_group: String,
    /// Azure region.
    pub location: String,
    /// Tags.
    pub tags: Vec<(String, String)>,
    /// Resource IDs of managed disks attached to this VM.
    pub disk_resource_ids: Vec<String>,
    /// Power/provisioning state.
    pub provisioning_state: String,
}

/// Storage account list operations, paginated.
#[async_trait]
pub trait StorageClient: Debug + Send + Sync {
    /// List storage accounts visible to this client's subscription.
    async fn list_storage_accounts(&self, next_token: Option<String>) -> Result<Page<StorageAccountDto>, AzureCallError>;
}

/// Virtual machine list operations, paginated.
#[async_trait]
pub trait ComputeClient: Debug + Send + Sync {
    /// List virtual machines visible to this client's subscription.
    async fn list_virtual_machines(&self, next_token: Option<String>) -> Result<Page<VirtualMachineDto>, AzureCallError>;
}

/// Build the canonical tag-pair vector into the crate's tag map shape.
pub fn tags_to_map(tags: &[(String, String)]) -> IndexMap<String, String> {
    tags.iter().cloned().collect()
}
