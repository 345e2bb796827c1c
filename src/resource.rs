//! Transfer resources
//!
//! A [`TransferResource`] names the artifact a syncer produces on the source
//! side and consumes on the target side. Single-file resources get a unique
//! timestamp+pid suffix so repeated runs never collide; directory resources
//! use the configured path verbatim.

use chrono::Utc;

/// The artifact moved between environments during a sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferResource {
    /// Path of the artifact on the host it lives on.
    pub name: String,
    /// Directory resources are transferred recursively.
    pub is_directory: bool,
    /// Cleanup-exempt resources are never removed by the cleanup phase.
    ///
    /// Directory resources are always exempt: a filesystem sync's directory
    /// is the user's actual data, not a transient dump. This differs from
    /// every other resource kind's default.
    pub skip_cleanup: bool,
    /// Exclusion patterns passed through verbatim to the transfer tool.
    pub exclusions: Vec<String>,
}

impl TransferResource {
    /// A single-file artifact, cleaned up after the sync.
    pub fn file(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_directory: false,
            skip_cleanup: false,
            exclusions: Vec::new(),
        }
    }

    /// A directory artifact. Always cleanup-exempt.
    pub fn directory(name: &str, exclusions: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            is_directory: true,
            skip_cleanup: true,
            exclusions,
        }
    }
}

/// Build a unique transfer file name under `/tmp`.
///
/// The suffix combines a UTC timestamp with the process id. Timestamps alone
/// collide when two runs start within a second; the pid covers concurrent
/// invocations on one host.
pub fn unique_transfer_name(prefix: &str, extension: &str) -> String {
    format!(
        "/tmp/{}-{}-{}.{}",
        prefix,
        Utc::now().format("%Y%m%d%H%M%S"),
        std::process::id(),
        extension
    )
}
