//! Config command - show the persisted filter settings.

use anyhow::Result;
use portmon_core::{Settings, SettingsStore};

pub async fn show(json: bool) -> Result<()> {
    let store = SettingsStore::new()?;
    let filter = store.load_or_init().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&Settings::from(&filter))?);
        return Ok(());
    }

    println!("Settings file: {}", store.path().display());
    if filter.ports.is_empty() {
        println!("Ports: (no restriction)");
    } else {
        println!("Ports: {}", filter.port_list());
    }
    println!("Listening only: {}", filter.listening_only);
    Ok(())
}
