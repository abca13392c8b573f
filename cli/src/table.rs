//! Plain-text table rendering of record sets.

use portmon_core::ConnectionRecord;

pub fn print_records(records: &[ConnectionRecord]) {
    println!(
        "{:<6} {:<28} {:<7} {:<13} {:<8} PROCESS",
        "PROTO", "LOCAL ADDRESS", "PORT", "STATE", "PID"
    );
    println!("{}", "-".repeat(80));

    for record in records {
        let state = record
            .state
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "-".to_string());
        let owner = record.owner.as_deref().unwrap_or("-");
        let process = record.process_name.as_deref().unwrap_or("-");

        println!(
            "{:<6} {:<28} {:<7} {:<13} {:<8} {}",
            record.protocol.to_string(),
            truncate(&record.local_address, 28),
            record.local_port,
            truncate(&state, 13),
            owner,
            truncate(process, 24)
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}…", &s[..max - 1])
    }
}
