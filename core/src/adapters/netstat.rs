//! Snapshot provider backed by the netstat command.

use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::domain::Protocol;
use crate::error::{Error, Result};
use crate::ports::SnapshotProvider;

/// Fetches connection-table snapshots by running netstat.
///
/// Windows: `netstat -a -n -o -p tcp` (all sockets, numeric, owning PID,
/// one protocol). Unix: `netstat -a -n -t -p` / `-u` (the PID/Program column
/// requires matching privileges; undisclosed owners print as "-").
pub struct NetstatSnapshot;

impl NetstatSnapshot {
    /// Create a new netstat snapshot provider.
    pub fn new() -> Self {
        Self
    }

    fn args(protocol: Protocol) -> Vec<&'static str> {
        #[cfg(windows)]
        {
            vec!["-a", "-n", "-o", "-p", protocol.as_str()]
        }
        #[cfg(not(windows))]
        {
            match protocol {
                Protocol::Tcp => vec!["-a", "-n", "-t", "-p"],
                Protocol::Udp => vec!["-a", "-n", "-u", "-p"],
            }
        }
    }
}

impl Default for NetstatSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotProvider for NetstatSnapshot {
    async fn fetch(&self, protocol: Protocol) -> Result<String> {
        let args = Self::args(protocol);
        debug!(?args, "running netstat");

        let output = Command::new("netstat")
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Error::CommandFailed(format!("failed to run netstat: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::CommandFailed(format!(
                "netstat exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
