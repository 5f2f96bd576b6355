use std::path::Path;

use crate::models::error::RelayError;
use crate::pipeline::run_checked;
use crate::traits::archive_sync::ArchiveSync;

/// Mirrors the recordings root to the remote archive with `rsync`.
#[derive(Debug, Clone, Default)]
pub struct RsyncInvoker;

impl RsyncInvoker {
    pub fn new() -> Self {
        Self
    }
}

/// `-avz` with a trailing slash on the source, so the root's contents land
/// directly under the remote path.
pub(crate) fn build_args(local_root: &Path, remote_path: &str) -> Vec<String> {
    vec![
        "-avz".into(),
        format!("{}/", local_root.display()),
        remote_path.to_string(),
    ]
}

impl ArchiveSync for RsyncInvoker {
    fn mirror(&self, local_root: &Path, remote_path: &str) -> Result<(), RelayError> {
        let args = build_args(local_root, remote_path);
        log::info!("mirroring {} to {remote_path}", local_root.display());
        run_checked("rsync", &args).map_err(RelayError::Sync)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_gets_a_trailing_slash() {
        let args = build_args(Path::new("recordings"), "archive@backup:/srv/audio");

        assert_eq!(args, vec!["-avz", "recordings/", "archive@backup:/srv/audio"]);
    }
}
