//! Concrete Azure `ServiceScanner` implementations.

mod storage_accounts;
mod virtual_machines;

pub use storage_accounts::StorageAccountsScanner;
pub use virtual_machines::VirtualMachinesScanner;
