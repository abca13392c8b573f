//! Process kill port (interface).

use crate::error::Result;

/// Port for forcefully terminating processes.
///
/// Implementations handle the platform-specific termination primitive.
pub trait KillProvider: Send + Sync {
    /// Request forceful termination of the process with the given id.
    fn kill(&self, pid: u32) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Check if a process is currently running.
    fn is_running(&self, pid: u32) -> bool;
}
