//! Azure resource-id handling, native-to-neutral type mapping, and concrete
//! `ServiceScanner` implementations for Storage and Compute.

mod clients;
mod resource_id;
mod scanners;
mod types;

pub use clients::{AzureCallError, ComputeClient, Page, StorageAccountDto, StorageClient, VirtualMachineDto};
pub use resource_id::{build_resource_id, parse_resource_id, ParsedResourceId, ResourceIdParseError};
pub use scanners::{StorageAccountsScanner, VirtualMachinesScanner};
pub use types::resolve_type;
