use discovery_types::synthesize_neutral_type;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Native Azure Resource Manager type strings (`Vendor.Namespace/type`) mapped to
/// this crate's neutral vocabulary. Entries absent here fall back to
/// [`synthesize_neutral_type`].
static NATIVE_TO_NEUTRAL: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Microsoft.Storage/storageAccounts", "azurerm_storage_account"),
        ("Microsoft.Compute/virtualMachines", "azurerm_virtual_machine"),
        ("Microsoft.Compute/disks", "azurerm_managed_disk"),
    ])
});

/// Resolve a native Azure type string to this crate's neutral vocabulary.
pub fn resolve_type(native_type: &str) -> String {
    NATIVE_TO_NEUTRAL
        .get(native_type)
        .map(|neutral| neutral.to_string())
        .unwrap_or_else(|| synthesize_neutral_type(native_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_mapped_type() {
        assert_eq!(resolve_type("Microsoft.Storage/storageAccounts"), "azurerm_storage_account");
    }

    #[test]
    fn falls_back_for_unmapped_type() {
        assert_eq!(
            resolve_type("Microsoft.Network/virtualNetworks"),
            "network_virtualnetworks"
        );
    }
}
