//! Monitor command - poll the connection table until interrupted.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use portmon_core::{NetstatSnapshot, ScanScheduler, SchedulerOptions};

use crate::sink::StdoutSink;

pub async fn run(interval: u64, ports: Option<String>, all: bool, json: bool) -> Result<()> {
    let (store, filter) = super::load_filter(ports.as_deref(), all).await?;

    let sink = Arc::new(StdoutSink::new(json));
    let options = SchedulerOptions {
        interval: Duration::from_secs(interval.max(1)),
        ..Default::default()
    };
    let scheduler =
        ScanScheduler::with_options(NetstatSnapshot::new(), store, sink, filter, options);

    scheduler.start();
    tokio::signal::ctrl_c().await?;
    scheduler.stop();
    println!();

    Ok(())
}
