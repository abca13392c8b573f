//! Ports layer - Trait definitions (interfaces).
//!
//! This module defines the interfaces the engine uses to interact with
//! external systems. Implementations live in `adapters`; the display side is
//! implemented by whichever UI consumes the engine.

mod kill;
mod sink;
mod snapshot;

pub use kill::KillProvider;
pub use sink::DisplaySink;
pub use snapshot::SnapshotProvider;
