//! Stdout implementation of the engine's display sink.

use std::time::SystemTime;

use chrono::{DateTime, Local};
use portmon_core::{ConnectionRecord, DisplaySink, Error};
use tracing::{debug, warn};

use crate::table;

/// Prints each published record set to stdout.
pub struct StdoutSink {
    json: bool,
}

impl StdoutSink {
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

impl DisplaySink for StdoutSink {
    fn scan_started(&self) {
        debug!("scan started");
    }

    fn publish(&self, records: &[ConnectionRecord], updated_at: SystemTime) {
        if self.json {
            match serde_json::to_string(records) {
                Ok(line) => println!("{}", line),
                Err(err) => warn!(error = %err, "failed to serialize records"),
            }
            return;
        }

        let at: DateTime<Local> = updated_at.into();
        println!();
        println!(
            "Updated at {} - {} connections",
            at.format("%H:%M:%S"),
            records.len()
        );
        if !records.is_empty() {
            table::print_records(records);
        }
    }

    fn scan_failed(&self, error: &Error) {
        eprintln!("scan failed: {}", error);
    }
}
