//! Filter configuration and the record predicate.

use serde::{Deserialize, Serialize};

use super::record::ConnectionRecord;

/// Port set applied when no settings file exists yet.
pub const DEFAULT_PORTS: [u16; 4] = [4200, 8080, 8765, 2910];

/// Operator-controlled filter criteria for the record set.
///
/// Lives for the session; the port set is persisted through the settings
/// store whenever it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Ports to restrict the view to. Empty means no port restriction.
    pub ports: Vec<u16>,
    /// Only show endpoints in a passive/listening state.
    pub listening_only: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            ports: DEFAULT_PORTS.to_vec(),
            listening_only: true,
        }
    }
}

impl FilterConfig {
    /// Create a filter, deduplicating the port set while preserving order.
    pub fn new(ports: Vec<u16>, listening_only: bool) -> Self {
        let mut distinct = Vec::with_capacity(ports.len());
        for port in ports {
            if !distinct.contains(&port) {
                distinct.push(port);
            }
        }
        Self {
            ports: distinct,
            listening_only,
        }
    }

    /// Build a filter from a comma-separated port list.
    pub fn from_port_list(list: &str, listening_only: bool) -> Self {
        Self::new(parse_port_list(list), listening_only)
    }

    /// The port set as a comma-separated string (the persisted shape).
    pub fn port_list(&self) -> String {
        self.ports
            .iter()
            .map(u16::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Whether a record passes the active filter. Pure predicate.
    ///
    /// Under `listening_only`, records with no state concept (connectionless
    /// protocols) are rejected along with non-listening ones.
    pub fn passes(&self, record: &ConnectionRecord) -> bool {
        if self.listening_only && !record.is_listening() {
            return false;
        }
        if !self.ports.is_empty() && !self.ports.contains(&record.local_port) {
            return false;
        }
        true
    }
}

/// Apply a filter to a record set, preserving order.
pub fn filter_records(records: &[ConnectionRecord], filter: &FilterConfig) -> Vec<ConnectionRecord> {
    records
        .iter()
        .filter(|r| filter.passes(r))
        .cloned()
        .collect()
}

/// Parse a comma-separated port list.
///
/// Tokens are trimmed; empty and non-numeric tokens are dropped. Duplicates
/// keep their first position.
pub fn parse_port_list(list: &str) -> Vec<u16> {
    let mut ports = Vec::new();
    for token in list.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let Ok(port) = token.parse::<u16>() else {
            continue;
        };
        if !ports.contains(&port) {
            ports.push(port);
        }
    }
    ports
}

// ============================================================================
// Tests
// ============================================================================
