//! Kill command - terminate the process owning a connection.

use anyhow::Result;
use portmon_core::{ProcessTerminator, SystemKill};

pub async fn run(pid: String, json: bool) -> Result<()> {
    let terminator = ProcessTerminator::new(SystemKill::new());

    match terminator.terminate(Some(&pid)).await {
        Ok(()) => {
            println!("Terminated process {}", pid.trim());
            // Refresh the table once so the operator sees the result.
            super::list::run(None, false, None, false, json).await
        }
        Err(err) => Err(err.into()),
    }
}
