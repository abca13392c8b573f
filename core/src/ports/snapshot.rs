//! Snapshot provider port (interface).

use crate::domain::Protocol;
use crate::error::Result;

/// Port for obtaining raw connection-table snapshots.
///
/// Implementations invoke the OS connection-table query (netstat or an
/// equivalent) and return its raw text output. One call per scan.
pub trait SnapshotProvider: Send + Sync {
    /// Fetch one point-in-time listing of the OS connection table.
    fn fetch(&self, protocol: Protocol) -> impl std::future::Future<Output = Result<String>> + Send;
}
