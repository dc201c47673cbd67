//! Shared filesystem helpers used by the deletion engine.

use std::path::{Path, PathBuf};

/// Windows MAX_PATH; longer paths need the `\\?\` prefix for Win32 file APIs.
#[cfg(windows)]
const MAX_PATH: usize = 260;

/// Returns true if this path is a Windows reparse point (junction/symlink/mount point).
///
/// `walkdir`'s `follow_links(false)` stops it from following *symlinks*, but
/// junctions and some OneDrive placeholders still look like plain directories
/// and can lead a recursive scan into cycles or out of the tree being cleaned.
pub fn is_windows_reparse_point(path: &Path) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        const FILE_ATTRIBUTE_REPARSE_POINT: u32 = 0x0400;
        if let Ok(meta) = std::fs::symlink_metadata(path) {
            return meta.file_attributes() & FILE_ATTRIBUTE_REPARSE_POINT != 0;
        }
        false
    }
    #[cfg(not(windows))]
    {
        let _ = path;
        false
    }
}

/// Rewrite an absolute path into its extended-length form when it is too long
/// for the legacy Win32 APIs. Other paths are returned unchanged.
pub fn long_path(path: &Path) -> PathBuf {
    #[cfg(windows)]
    {
        let raw = path.as_os_str().to_string_lossy();
        if raw.len() >= MAX_PATH && path.is_absolute() && !raw.starts_with(r"\\?\") {
            if let Some(unc) = raw.strip_prefix(r"\\") {
                return PathBuf::from(format!(r"\\?\UNC\{unc}"));
            }
            return PathBuf::from(format!(r"\\?\{raw}"));
        }
        path.to_path_buf()
    }
    #[cfg(not(windows))]
    {
        path.to_path_buf()
    }
}
