//! List command - one-shot scan of the connection table.

use anyhow::Result;
use portmon_core::{
    filter_records, parse_snapshot, sort_records, NetstatSnapshot, Protocol, SnapshotGrammar,
    SnapshotProvider, SortDirection, SortField,
};

use crate::table;

pub async fn run(
    ports: Option<String>,
    all: bool,
    sort: Option<String>,
    desc: bool,
    json: bool,
) -> Result<()> {
    let (_store, filter) = super::load_filter(ports.as_deref(), all).await?;

    let provider = NetstatSnapshot::new();
    let raw = provider.fetch(Protocol::Tcp).await?;
    let records = parse_snapshot(&raw, &SnapshotGrammar::for_host(), Some(Protocol::Tcp));

    let mut view = filter_records(&records, &filter);
    if let Some(token) = sort {
        let field = parse_sort(&token)?;
        let direction = if desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        view = sort_records(&view, field, direction);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    if view.is_empty() {
        println!("No matching connections.");
        return Ok(());
    }

    table::print_records(&view);
    println!("\nTotal: {} connections", view.len());
    Ok(())
}

fn parse_sort(token: &str) -> Result<SortField> {
    match token.to_ascii_lowercase().as_str() {
        "protocol" | "proto" => Ok(SortField::Protocol),
        "address" | "local" => Ok(SortField::LocalAddress),
        "port" => Ok(SortField::LocalPort),
        "state" => Ok(SortField::State),
        "owner" | "pid" => Ok(SortField::Owner),
        "process" | "name" => Ok(SortField::ProcessName),
        other => anyhow::bail!("unknown sort column: {}", other),
    }
}
