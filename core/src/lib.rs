//! Portmon Core Library
//!
//! Cross-platform engine for live monitoring of the host's TCP connection
//! table. Provides functionality to:
//! - Sample the OS connection table on a polling cadence
//! - Parse raw netstat-style snapshots into typed records
//! - Filter and sort the record set for inspection
//! - Terminate the process owning a connection, by its identifier
//!
//! # Architecture
//! This library follows hexagonal architecture (ports & adapters):
//! - `domain`: Pure business logic and data models
//! - `ports`: Trait definitions (interfaces)
//! - `adapters`: External system implementations
//! - `scheduler` / `terminator`: The engine built on top of the ports
//!
//! # Platform Support
//! - Windows: Uses the `netstat` and `taskkill` commands
//! - Linux/macOS: Uses the `netstat` and `kill` commands

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod parser;
pub mod ports;
pub mod scheduler;
pub mod terminator;

// Re-export domain types (primary API)
pub use domain::{
    compare_records, filter_records, parse_port_list, sort_records, ConnState, ConnectionRecord,
    FilterConfig, Protocol, SortDirection, SortField, DEFAULT_PORTS,
};

// Re-export other commonly used types
pub use adapters::{NetstatSnapshot, SystemKill};
pub use config::{Settings, SettingsStore};
pub use error::{Error, Result, TerminationError};
pub use parser::{parse_snapshot, SnapshotGrammar};
pub use ports::{DisplaySink, KillProvider, SnapshotProvider};
pub use scheduler::{ScanScheduler, ScanState, SchedulerOptions, DEFAULT_SCAN_INTERVAL};
pub use terminator::ProcessTerminator;
