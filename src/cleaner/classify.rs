//! Deletion failure classification.
//!
//! Every deletion path funnels its `io::Error` through [`classify`] so that
//! locked files, permission problems and already-removed targets are handled
//! the same way no matter which primitive hit them.

use std::io;

/// What went wrong with a single delete call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Another process holds an open handle to the target.
    Locked,
    PermissionDenied,
    /// The target is already gone.
    NotFound,
    Unexpected,
}

/// OS error codes reported when another process holds the target open.
#[cfg(windows)]
const SHARING_VIOLATION_CODES: &[i32] = &[
    32, // ERROR_SHARING_VIOLATION
    33, // ERROR_LOCK_VIOLATION
];

#[cfg(unix)]
const SHARING_VIOLATION_CODES: &[i32] = &[libc::EBUSY, libc::ETXTBSY];

#[cfg(not(any(windows, unix)))]
const SHARING_VIOLATION_CODES: &[i32] = &[];

/// Returns true if the error means "file in use by another process".
pub fn is_sharing_violation(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::ResourceBusy {
        return true;
    }
    matches!(err.raw_os_error(), Some(code) if SHARING_VIOLATION_CODES.contains(&code))
}

pub fn classify(err: &io::Error) -> FailureKind {
    if is_sharing_violation(err) {
        return FailureKind::Locked;
    }

    match err.kind() {
        io::ErrorKind::NotFound => FailureKind::NotFound,
        io::ErrorKind::PermissionDenied => FailureKind::PermissionDenied,
        _ => FailureKind::Unexpected,
    }
}
