//! Kill provider backed by the platform's process-termination command.
//!
//! Uses `taskkill /F /PID <pid>` on Windows and `/bin/kill -9 <pid>`
//! elsewhere. Termination is forceful only; graceful-shutdown escalation is
//! left to the operator.

use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::ports::KillProvider;

/// Kill provider invoking the OS termination primitive.
pub struct SystemKill;

impl SystemKill {
    /// Create a new system kill provider.
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemKill {
    fn default() -> Self {
        Self::new()
    }
}

impl KillProvider for SystemKill {
    async fn kill(&self, pid: u32) -> Result<()> {
        debug!(pid, "sending forceful termination request");

        #[cfg(windows)]
        let output = Command::new("taskkill")
            .args(["/F", "/PID"])
            .arg(pid.to_string())
            .output()
            .await
            .map_err(|e| Error::CommandFailed(format!("failed to run taskkill: {}", e)))?;

        #[cfg(not(windows))]
        let output = Command::new("/bin/kill")
            .arg("-9")
            .arg(pid.to_string())
            .output()
            .await
            .map_err(|e| Error::CommandFailed(format!("failed to run kill: {}", e)))?;

        if output.status.success() {
            debug!(pid, "termination request delivered");
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);

        if stderr.contains("No such process") || stderr.contains("not found") {
            debug!(pid, "process not found");
            return Err(Error::CommandFailed(format!("process {} not found", pid)));
        }

        if stderr.contains("Operation not permitted")
            || stderr.contains("Permission denied")
            || stderr.contains("Access is denied")
        {
            warn!(pid, "permission denied killing process");
            return Err(Error::PermissionDenied(format!(
                "cannot terminate process {}",
                pid
            )));
        }

        Err(Error::CommandFailed(format!(
            "kill {} failed: {}",
            pid,
            stderr.trim()
        )))
    }

    /// Probe liveness with signal 0 on Unix; `tasklist` on Windows.
    fn is_running(&self, pid: u32) -> bool {
        #[cfg(unix)]
        {
            nix::sys::signal::kill(nix::unistd::Pid::from_raw(pid as i32), None).is_ok()
        }
        #[cfg(windows)]
        {
            let filter = format!("PID eq {}", pid);
            match std::process::Command::new("tasklist")
                .args(["/FI", &filter, "/NH"])
                .output()
            {
                Ok(output) => String::from_utf8_lossy(&output.stdout).contains(&pid.to_string()),
                Err(_) => false,
            }
        }
        #[cfg(not(any(unix, windows)))]
        {
            let _ = pid;
            false
        }
    }
}
