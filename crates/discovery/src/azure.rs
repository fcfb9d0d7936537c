use discovery_azure::{ComputeClient, StorageAccountsScanner, StorageClient, VirtualMachinesScanner};
use discovery_scanner::ScannerRegistry;
use std::sync::Arc;

/// The opaque Azure Resource Manager clients the registered scanners depend on.
#[derive(Clone)]
pub struct AzureClients {
    /// Storage account listing.
    pub storage: Arc<dyn StorageClient>,
    /// Virtual machine listing.
    pub compute: Arc<dyn ComputeClient>,
}

/// Build a registry with every scanner this crate ships for Azure
/// (`storage_accounts`, `virtual_machines`).
pub fn azure_registry(clients: AzureClients) -> ScannerRegistry {
    let mut registry = ScannerRegistry::new();
    registry.register(Arc::new(StorageAccountsScanner::new(clients.storage)));
    registry.register(Arc::new(VirtualMachinesScanner::new(clients.compute)));
    registry
}
