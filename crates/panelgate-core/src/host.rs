//! Host-environment probe.
//!
//! A client should use the local transport exactly when the process is
//! running *as the hosted account on the panel server*: the panel's local
//! UAPI binary exists and the process is not privileged (an administrator
//! shell has the binary too, but must go through the remote API as the
//! acting user). The probe is evaluated once, by the caller, at client
//! construction — it is not a transport error path.
//!
//! Both inputs are injectable so tests never stat the real filesystem or
//! depend on the uid of the test runner.

use std::path::Path;

use crate::transport::local::UAPI_BIN;

/// The OS identity of the current process owner.
///
/// Detected automatically. On Unix this reads the uid from
/// `/proc/self/status`; on non-Unix platforms the probe reports
/// unprivileged, and the binary-existence check decides alone.
#[derive(Debug, Clone, Copy)]
pub struct HostIdentity {
    /// Numeric user ID (Unix uid). `u32::MAX` when undeterminable.
    pub uid: u32,
}

impl HostIdentity {
    /// Detect the identity of the current process owner.
    pub fn detect() -> Self {
        Self { uid: current_uid() }
    }

    /// Construct a `HostIdentity` from an explicit uid (for testing).
    pub fn from_uid(uid: u32) -> Self {
        Self { uid }
    }

    /// Whether this identity has elevated privileges (uid == 0 on Unix).
    pub fn is_privileged(&self) -> bool {
        self.uid == 0
    }
}

/// Whether the process is running as a hosted account on the panel server.
///
/// True when the local UAPI binary exists and the process is unprivileged.
/// Pure given its inputs; the filesystem probe is a closure so tests can
/// substitute it.
pub fn is_panel_account_with<F>(identity: &HostIdentity, binary_exists: F) -> bool
where
    F: Fn(&Path) -> bool,
{
    binary_exists(Path::new(UAPI_BIN)) && !identity.is_privileged()
}

/// [`is_panel_account_with`] against the real filesystem.
pub fn is_panel_account(identity: &HostIdentity) -> bool {
    is_panel_account_with(identity, |p| p.exists())
}

#[cfg(unix)]
fn current_uid() -> u32 {
    // std does not expose getuid(); parse /proc/self/status to stay free of
    // unsafe FFI. Falls back to u32::MAX (treated as unprivileged).
    std::fs::read_to_string("/proc/self/status")
        .ok()
        .and_then(|s| {
            s.lines()
                .find(|line| line.starts_with("Uid:"))
                .and_then(|line| line.split_whitespace().nth(1))
                .and_then(|uid| uid.parse().ok())
        })
        .unwrap_or(u32::MAX)
}

#[cfg(not(unix))]
fn current_uid() -> u32 {
    u32::MAX
}
