//! Secret store for hosts without a trusted secure-storage facility

use super::SecretStore;
use crate::error::Result;

/// Writes are discarded and reads always come back empty.
///
/// This is the explicit "no secure storage" case: a key saved here does not
/// survive the process, and nothing is written to disk in its place.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStore;

impl SecretStore for UnavailableStore {
    fn store(&self, _service: &str, _account: &str, _value: &[u8]) -> Result<()> {
        Ok(())
    }

    fn retrieve(&self, _service: &str, _account: &str) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    fn delete(&self, _service: &str, _account: &str) -> Result<()> {
        Ok(())
    }

    fn is_available(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "Unavailable"
    }
}
