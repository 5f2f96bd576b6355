use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::config::ConfigSnapshot;
use crate::models::error::RelayError;

/// Loads and reloads the configuration file, publishing immutable
/// [`ConfigSnapshot`]s.
///
/// Readers clone the current `Arc` and keep using their snapshot for the
/// whole operation; `reload` swaps the shared reference in one step, so a
/// reader sees either the old snapshot or the fully-loaded new one, never
/// a mix. A failed reload leaves the previous snapshot current.
#[derive(Debug)]
pub struct SettingsProvider {
    path: PathBuf,
    current: Mutex<Arc<ConfigSnapshot>>,
    next_version: AtomicU64,
}

impl SettingsProvider {
    /// Load the file eagerly; missing or malformed keys fail here.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RelayError> {
        let path = path.into();
        let snapshot = load_file(&path, 1)?;
        Ok(Self {
            path,
            current: Mutex::new(Arc::new(snapshot)),
            next_version: AtomicU64::new(2),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The snapshot currently in effect.
    pub fn current(&self) -> Arc<ConfigSnapshot> {
        Arc::clone(&self.current.lock())
    }

    /// Re-parse the file and atomically replace the current snapshot.
    pub fn reload(&self) -> Result<Arc<ConfigSnapshot>, RelayError> {
        let version = self.next_version.fetch_add(1, Ordering::SeqCst);
        let snapshot = Arc::new(load_file(&self.path, version)?);
        *self.current.lock() = Arc::clone(&snapshot);
        log::debug!("settings reloaded (version {version})");
        Ok(snapshot)
    }
}

fn load_file(path: &Path, version: u64) -> Result<ConfigSnapshot, RelayError> {
    let cfg = config::Config::builder()
        .add_source(config::File::from(path).format(config::FileFormat::Ini))
        .build()
        .map_err(|e| RelayError::Config(format!("failed to read {}: {e}", path.display())))?;
    ConfigSnapshot::from_file(&cfg, version)
}
