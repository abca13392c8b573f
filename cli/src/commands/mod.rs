//! CLI command implementations.

pub mod config;
pub mod kill;
pub mod list;
pub mod monitor;

use anyhow::Result;
use portmon_core::{FilterConfig, SettingsStore};

/// Load the persisted filter and apply command-line overrides.
///
/// An explicit `--ports` list is a one-off view and is not written back to
/// the settings file.
pub(crate) async fn load_filter(ports: Option<&str>, all: bool) -> Result<(SettingsStore, FilterConfig)> {
    let store = SettingsStore::new()?;
    let mut filter = store.load_or_init().await;

    if let Some(list) = ports {
        filter = FilterConfig::from_port_list(list, filter.listening_only);
    }
    if all {
        filter.listening_only = false;
    }

    Ok((store, filter))
}
