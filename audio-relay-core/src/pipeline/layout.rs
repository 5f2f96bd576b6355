use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDateTime};

/// Directory holding one day's segments:
/// `<root>/<mountpoint>/<YYYY>/<MM>/<DD>`.
pub fn segment_directory(root: &Path, mount_point: &str, timestamp: NaiveDateTime) -> PathBuf {
    root.join(mount_point)
        .join(format!("{:04}", timestamp.year()))
        .join(format!("{:02}", timestamp.month()))
        .join(format!("{:02}", timestamp.day()))
}

/// Full segment path:
/// `<root>/<mountpoint>/<YYYY>/<MM>/<DD>/<mountpoint>_<YYYY-MM-DD_HH-MM-SS>.<ext>`.
pub fn segment_path(
    root: &Path,
    mount_point: &str,
    extension: &str,
    timestamp: NaiveDateTime,
) -> PathBuf {
    segment_directory(root, mount_point, timestamp).join(format!(
        "{}_{}.{}",
        mount_point,
        timestamp.format("%Y-%m-%d_%H-%M-%S"),
        extension
    ))
}
