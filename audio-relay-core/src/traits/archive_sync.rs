use std::path::Path;

use crate::models::error::RelayError;

/// Boundary to the external file-mirroring tool.
pub trait ArchiveSync: Send + Sync {
    /// Mirror the local recordings root to the remote archive once.
    ///
    /// A failed pass surfaces as [`RelayError::Sync`].
    fn mirror(&self, local_root: &Path, remote_path: &str) -> Result<(), RelayError>;
}
