//! Storage trait definitions

use crate::error::Result;

/// Platform secret store addressed by a (service, account) pair.
///
/// Calls are synchronous and may block briefly on OS-level I/O. Async callers
/// should run them on a blocking thread.
pub trait SecretStore: Send + Sync {
    /// Store `value` under (service, account), overwriting any existing entry
    fn store(&self, service: &str, account: &str, value: &[u8]) -> Result<()>;

    /// Retrieve the value stored under (service, account)
    fn retrieve(&self, service: &str, account: &str) -> Result<Option<Vec<u8>>>;

    /// Delete the entry under (service, account). Deleting a missing entry is not an error.
    fn delete(&self, service: &str, account: &str) -> Result<()>;

    /// Whether values written to this store survive process restart
    fn is_available(&self) -> bool;

    /// Get a human-readable name for this storage backend
    fn backend_name(&self) -> &'static str;
}
