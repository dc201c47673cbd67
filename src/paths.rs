//! Folder resolution.
//!
//! Every location the cleanup battery touches is resolved once at startup
//! into [`CleanupPaths`]. A missing environment value is reported here, as a
//! single startup failure, instead of surfacing halfway through a run.

use std::env;
use std::ffi::OsString;
use std::path::{PathBuf, MAIN_SEPARATOR_STR};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PathError {
    #[error("{0} environment variable is not set")]
    MissingVariable(&'static str),
}

/// Vendor folders left behind by GPU/chipset driver installers, relative to the system drive.
const DRIVER_REMNANT_DIRS: &[&str] = &["AMD", "NVIDIA", "INTEL"];

/// Base folders everything else is derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderRoots {
    pub user_profile: PathBuf,
    pub local_app_data: PathBuf,
    pub windows_dir: PathBuf,
    pub program_data: PathBuf,
    pub system_drive: PathBuf,
    pub temp: PathBuf,
}

impl FolderRoots {
    /// Read the roots from the process environment.
    ///
    /// The profile folders fall back to the `directories` crate when the
    /// variables are absent (e.g. under a stripped-down service environment).
    pub fn from_env() -> Result<Self, PathError> {
        let base_dirs = directories::BaseDirs::new();
        Self::from_lookup(
            |name| {
                env::var_os(name).or_else(|| {
                    let dirs = base_dirs.as_ref()?;
                    match name {
                        "USERPROFILE" => Some(dirs.home_dir().as_os_str().to_os_string()),
                        "LOCALAPPDATA" => Some(dirs.data_local_dir().as_os_str().to_os_string()),
                        _ => None,
                    }
                })
            },
            env::temp_dir(),
        )
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<OsString>,
        temp: PathBuf,
    ) -> Result<Self, PathError> {
        let require = |name: &'static str| -> Result<OsString, PathError> {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(PathError::MissingVariable(name))
        };

        let windows_dir = require("SystemRoot").or_else(|_| require("windir"))?;

        let mut system_drive = require("SystemDrive")?;
        // "C:" alone is drive-relative; the driver folders live at the root
        if system_drive.to_string_lossy().ends_with(':') {
            system_drive.push(MAIN_SEPARATOR_STR);
        }

        Ok(Self {
            user_profile: require("USERPROFILE")?.into(),
            local_app_data: require("LOCALAPPDATA")?.into(),
            windows_dir: windows_dir.into(),
            program_data: require("ProgramData")?.into(),
            system_drive: system_drive.into(),
            temp,
        })
    }
}

/// Every folder the cleanup battery works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupPaths {
    pub downloads: PathBuf,
    pub cookies: PathBuf,
    pub history: PathBuf,
    pub driver_remnants: Vec<PathBuf>,
    /// Trees searched for `*.old`, `*.bak`, `*.tmp` and `*.trace`
    pub stale_file_roots: Vec<PathBuf>,
    pub temp_folders: Vec<PathBuf>,
    pub log_folders: Vec<PathBuf>,
}

impl CleanupPaths {
    pub fn resolve() -> Result<Self, PathError> {
        Ok(Self::from_roots(&FolderRoots::from_env()?))
    }

    pub fn from_roots(roots: &FolderRoots) -> Self {
        let explorer_data = roots.local_app_data.join("Microsoft").join("Windows");

        let mut temp_folders = vec![
            roots.temp.clone(),
            roots.windows_dir.join("Temp"),
            roots.windows_dir.join("Prefetch"),
        ];
        // A service running as LocalSystem gets Windows\Temp as its temp dir
        temp_folders.dedup();

        Self {
            downloads: roots.user_profile.join("Downloads"),
            cookies: explorer_data.join("INetCookies"),
            history: explorer_data.join("History"),
            driver_remnants: DRIVER_REMNANT_DIRS
                .iter()
                .map(|name| roots.system_drive.join(name))
                .collect(),
            stale_file_roots: vec![roots.windows_dir.clone(), roots.user_profile.clone()],
            temp_folders,
            log_folders: vec![
                roots.windows_dir.join("Logs"),
                roots.windows_dir.join("Panther"),
                roots.windows_dir.join("SoftwareDistribution").join("Download"),
                roots
                    .program_data
                    .join("Microsoft")
                    .join("Windows")
                    .join("WER")
                    .join("Temp"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let map: HashMap<String, OsString> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), OsString::from(v)))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    fn full_env() -> Vec<(&'static str, &'static str)> {
        vec![
            ("USERPROFILE", "/profile"),
            ("LOCALAPPDATA", "/profile/AppData/Local"),
            ("SystemRoot", "/Windows"),
            ("ProgramData", "/ProgramData"),
            ("SystemDrive", "/drive"),
        ]
    }

    #[test]
    fn test_roots_from_lookup() {
        let roots =
            FolderRoots::from_lookup(lookup_from(&full_env()), PathBuf::from("/tmp")).unwrap();
        assert_eq!(roots.user_profile, PathBuf::from("/profile"));
        assert_eq!(roots.windows_dir, PathBuf::from("/Windows"));
        assert_eq!(roots.system_drive, PathBuf::from("/drive"));
    }

    #[test]
    fn test_windir_fallback() {
        let mut vars = full_env();
        vars.retain(|(k, _)| *k != "SystemRoot");
        vars.push(("windir", "/WinDir"));

        let roots = FolderRoots::from_lookup(lookup_from(&vars), PathBuf::from("/tmp")).unwrap();
        assert_eq!(roots.windows_dir, PathBuf::from("/WinDir"));
    }

    #[test]
    fn test_missing_variable_is_reported() {
        let mut vars = full_env();
        vars.retain(|(k, _)| *k != "ProgramData");

        let err = FolderRoots::from_lookup(lookup_from(&vars), PathBuf::from("/tmp")).unwrap_err();
        assert_eq!(err, PathError::MissingVariable("ProgramData"));
    }

    #[test]
    fn test_empty_variable_counts_as_missing() {
        let mut vars = full_env();
        vars.retain(|(k, _)| *k != "USERPROFILE");
        vars.push(("USERPROFILE", ""));

        let err = FolderRoots::from_lookup(lookup_from(&vars), PathBuf::from("/tmp")).unwrap_err();
        assert_eq!(err, PathError::MissingVariable("USERPROFILE"));
    }

    #[test]
    fn test_bare_drive_letter_gets_root_separator() {
        let mut vars = full_env();
        vars.retain(|(k, _)| *k != "SystemDrive");
        vars.push(("SystemDrive", "C:"));

        let roots = FolderRoots::from_lookup(lookup_from(&vars), PathBuf::from("/tmp")).unwrap();
        assert_eq!(
            roots.system_drive,
            PathBuf::from(format!("C:{MAIN_SEPARATOR_STR}"))
        );
    }

    #[test]
    fn test_cleanup_paths_layout() {
        let roots =
            FolderRoots::from_lookup(lookup_from(&full_env()), PathBuf::from("/tmp")).unwrap();
        let paths = CleanupPaths::from_roots(&roots);

        assert_eq!(paths.downloads, PathBuf::from("/profile/Downloads"));
        assert_eq!(paths.driver_remnants.len(), 3);
        assert!(paths.driver_remnants.contains(&PathBuf::from("/drive/NVIDIA")));
        assert_eq!(paths.temp_folders.len(), 3);
        assert_eq!(paths.log_folders.len(), 4);
        assert!(paths
            .log_folders
            .contains(&PathBuf::from("/ProgramData/Microsoft/Windows/WER/Temp")));
    }

    #[test]
    fn test_service_temp_folder_is_not_listed_twice() {
        let roots =
            FolderRoots::from_lookup(lookup_from(&full_env()), PathBuf::from("/Windows/Temp"))
                .unwrap();
        let paths = CleanupPaths::from_roots(&roots);
        assert_eq!(paths.temp_folders.len(), 2);
    }
}
