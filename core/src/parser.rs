//! Snapshot parsing with platform-specific column grammars.
//!
//! A snapshot is one raw netstat-style listing of the OS connection table.
//! The column layout differs per platform, so the parser is driven by a
//! [`SnapshotGrammar`] describing header prefixes and field positions instead
//! of hardcoded offsets. The parser itself never fails: lines it cannot make
//! sense of are dropped and the rest of the snapshot still parses.

use regex::Regex;

use crate::domain::{ConnState, ConnectionRecord, Protocol};

/// Column layout of one snapshot format.
///
/// Two grammars ship: [`SnapshotGrammar::windows`] for `netstat -ano` output
/// and [`SnapshotGrammar::unix`] for Linux `netstat -anp` output. Further
/// format variants only need a new grammar, not parser changes.
#[derive(Debug, Clone)]
pub struct SnapshotGrammar {
    /// Prefixes of banner/header lines emitted by the OS tool.
    header_prefixes: &'static [&'static str],
    protocol_col: usize,
    local_col: usize,
    state_col: usize,
    owner_col: usize,
    /// Splits combined owner tokens such as "1234/nginx" into pid and name.
    owner_pattern: Option<Regex>,
}

impl SnapshotGrammar {
    /// Grammar for Windows `netstat -ano -p tcp` output:
    ///
    /// ```text
    ///   Proto  Local Address          Foreign Address        State           PID
    ///   TCP    0.0.0.0:135            0.0.0.0:0              LISTENING       1020
    /// ```
    pub fn windows() -> Self {
        Self {
            header_prefixes: &["Active Connections", "Proto"],
            protocol_col: 0,
            local_col: 1,
            state_col: 3,
            owner_col: 4,
            owner_pattern: None,
        }
    }

    /// Grammar for Linux `netstat -antp` output:
    ///
    /// ```text
    /// Active Internet connections (servers and established)
    /// Proto Recv-Q Send-Q Local Address    Foreign Address  State   PID/Program name
    /// tcp        0      0 0.0.0.0:22       0.0.0.0:*        LISTEN  912/sshd
    /// ```
    pub fn unix() -> Self {
        Self {
            header_prefixes: &["Active Internet connections", "Proto"],
            protocol_col: 0,
            local_col: 3,
            state_col: 5,
            owner_col: 6,
            owner_pattern: Some(Regex::new(r"^(\d+)/(.+)$").unwrap()),
        }
    }

    /// The grammar matching the compiled platform's netstat flavor.
    pub fn for_host() -> Self {
        #[cfg(windows)]
        {
            Self::windows()
        }
        #[cfg(not(windows))]
        {
            Self::unix()
        }
    }

    fn is_header(&self, line: &str) -> bool {
        self.header_prefixes
            .iter()
            .any(|prefix| line.starts_with(prefix))
    }

    /// Parse one whitespace-split line into a record.
    ///
    /// A row must carry the full column layout, with one tolerated exception:
    /// connectionless protocols print no state column, so a row exactly one
    /// field short parses with an absent state and the owner shifted into the
    /// state column's position. Any other field-count mismatch drops the line.
    fn parse_fields(&self, fields: &[&str]) -> Option<ConnectionRecord> {
        let protocol = Protocol::parse(fields.get(self.protocol_col)?)?;
        let local_address = *fields.get(self.local_col)?;
        let local_port = port_of(local_address)?;

        let full = self.owner_col + 1;
        let (state, owner_token) = if fields.len() >= full {
            (
                Some(ConnState::parse(fields[self.state_col])),
                fields.get(self.owner_col).copied(),
            )
        } else if protocol.is_connectionless() && fields.len() == full - 1 {
            (None, fields.get(self.state_col).copied())
        } else {
            return None;
        };

        let (owner, process_name) = match owner_token {
            Some(token) => self.split_owner(token),
            None => (None, None),
        };

        Some(ConnectionRecord::new(
            protocol,
            local_address,
            local_port,
            state,
            owner,
            process_name,
        ))
    }

    /// A "-" owner means the OS would not disclose the process; combined
    /// "pid/program" tokens split into both parts.
    fn split_owner(&self, token: &str) -> (Option<String>, Option<String>) {
        if token == "-" {
            return (None, None);
        }
        if let Some(pattern) = &self.owner_pattern {
            if let Some(caps) = pattern.captures(token) {
                return (Some(caps[1].to_string()), Some(caps[2].to_string()));
            }
        }
        (Some(token.to_string()), None)
    }
}

impl Default for SnapshotGrammar {
    fn default() -> Self {
        Self::for_host()
    }
}

/// Port is the substring after the LAST ':' so IPv6 hosts parse correctly.
fn port_of(address: &str) -> Option<u16> {
    let (_, port) = address.rsplit_once(':')?;
    port.parse().ok()
}

/// Parse a raw snapshot into records, preserving source line order.
///
/// Blank lines, header lines and malformed lines are dropped, never fatal.
/// When `protocol_filter` is set, rows of other protocols are dropped too.
pub fn parse_snapshot(
    raw: &str,
    grammar: &SnapshotGrammar,
    protocol_filter: Option<Protocol>,
) -> Vec<ConnectionRecord> {
    let mut records = Vec::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || grammar.is_header(line) {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        let Some(record) = grammar.parse_fields(&fields) else {
            continue;
        };

        if let Some(wanted) = protocol_filter {
            if record.protocol != wanted {
                continue;
            }
        }

        records.push(record);
    }

    records
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOWS_SNAPSHOT: &str = "\
Active Connections

  Proto  Local Address          Foreign Address        State           PID
  TCP    0.0.0.0:135            0.0.0.0:0              LISTENING       1020
  TCP    127.0.0.1:4200         0.0.0.0:0              LISTENING       1234
  TCP    10.0.0.5:50311         142.250.74.14:443      ESTABLISHED     7788
  TCP    [::]:445               [::]:0                 LISTENING       4
";

    #[test]
    fn test_one_record_per_data_line_in_order() {
        let records = parse_snapshot(WINDOWS_SNAPSHOT, &SnapshotGrammar::windows(), None);
        assert_eq!(records.len(), 4);

        let ports: Vec<u16> = records.iter().map(|r| r.local_port).collect();
        assert_eq!(ports, vec![135, 4200, 50311, 445]);
    }

    #[test]
    fn test_scenario_fields() {
        let raw = "Proto  Local Address  Foreign Address  State  PID\n\
                   TCP  0.0.0.0:4200  0.0.0.0:0  LISTENING  1234\n";
        let records = parse_snapshot(raw, &SnapshotGrammar::windows(), Some(Protocol::Tcp));
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.protocol, Protocol::Tcp);
        assert_eq!(record.local_address, "0.0.0.0:4200");
        assert_eq!(record.local_port, 4200);
        assert_eq!(record.state, Some(ConnState::Listening));
        assert_eq!(record.owner.as_deref(), Some("1234"));
    }

    #[test]
    fn test_malformed_lines_skipped_without_disturbing_neighbors() {
        let raw = "\
  TCP    0.0.0.0:80             0.0.0.0:0              LISTENING       1
  TCP    garbage
  nonsense line with words
  TCP    0.0.0.0:443            0.0.0.0:0              LISTENING       2
";
        let records = parse_snapshot(raw, &SnapshotGrammar::windows(), None);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].local_port, 80);
        assert_eq!(records[1].local_port, 443);
    }

    #[test]
    fn test_unparsable_port_skips_line() {
        let raw = "  TCP    0.0.0.0:http    0.0.0.0:0    LISTENING    1\n";
        assert!(parse_snapshot(raw, &SnapshotGrammar::windows(), None).is_empty());
    }

    #[test]
    fn test_ipv6_port_is_after_last_colon() {
        let records = parse_snapshot(WINDOWS_SNAPSHOT, &SnapshotGrammar::windows(), None);
        let v6 = records.iter().find(|r| r.local_address == "[::]:445").unwrap();
        assert_eq!(v6.local_port, 445);
    }

    #[test]
    fn test_stateless_row_shifts_owner_column() {
        let raw = "  UDP    0.0.0.0:5353           *:*                    5600\n";
        let records = parse_snapshot(raw, &SnapshotGrammar::windows(), None);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].protocol, Protocol::Udp);
        assert_eq!(records[0].state, None);
        assert_eq!(records[0].owner.as_deref(), Some("5600"));
    }

    #[test]
    fn test_short_tcp_row_is_dropped_not_shifted() {
        let raw = "  TCP    0.0.0.0:80             0.0.0.0:0              1020\n";
        assert!(parse_snapshot(raw, &SnapshotGrammar::windows(), None).is_empty());
    }

    #[test]
    fn test_protocol_filter() {
        let raw = "\
  TCP    0.0.0.0:80             0.0.0.0:0              LISTENING       1
  UDP    0.0.0.0:53             *:*                    2
";
        let records = parse_snapshot(raw, &SnapshotGrammar::windows(), Some(Protocol::Tcp));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].protocol, Protocol::Tcp);
    }

    #[test]
    fn test_unix_grammar() {
        let raw = "\
Active Internet connections (servers and established)
Proto Recv-Q Send-Q Local Address           Foreign Address         State       PID/Program name
tcp        0      0 0.0.0.0:22              0.0.0.0:*               LISTEN      912/sshd
tcp6       0      0 :::80                   :::*                    LISTEN      -
udp        0      0 0.0.0.0:68              0.0.0.0:*                           612/dhclient
";
        let records = parse_snapshot(raw, &SnapshotGrammar::unix(), None);
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].local_port, 22);
        assert_eq!(records[0].state, Some(ConnState::Listening));
        assert_eq!(records[0].owner.as_deref(), Some("912"));
        assert_eq!(records[0].process_name.as_deref(), Some("sshd"));

        // Undisclosed owner is absent, not "-".
        assert_eq!(records[1].local_port, 80);
        assert_eq!(records[1].owner, None);
        assert_eq!(records[1].process_name, None);

        // Stateless udp row, one column short.
        assert_eq!(records[2].protocol, Protocol::Udp);
        assert_eq!(records[2].state, None);
        assert_eq!(records[2].owner.as_deref(), Some("612"));
        assert_eq!(records[2].process_name.as_deref(), Some("dhclient"));
    }

    #[test]
    fn test_crlf_line_endings() {
        let raw = "Proto  Local Address  Foreign Address  State  PID\r\n\
                   TCP  0.0.0.0:4200  0.0.0.0:0  LISTENING  1234\r\n";
        let records = parse_snapshot(raw, &SnapshotGrammar::windows(), None);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].owner.as_deref(), Some("1234"));
    }

    #[test]
    fn test_parse_then_filter_end_to_end() {
        use crate::domain::FilterConfig;

        let raw = "Proto  Local Address  Foreign Address  State  PID\n\
                   TCP  0.0.0.0:4200  0.0.0.0:0  LISTENING  1234\n";
        let records = parse_snapshot(raw, &SnapshotGrammar::windows(), Some(Protocol::Tcp));

        let matching = FilterConfig::new(vec![4200], true);
        let hits: Vec<_> = records.iter().filter(|r| matching.passes(r)).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].local_port, 4200);
        assert_eq!(hits[0].state, Some(ConnState::Listening));
        assert_eq!(hits[0].owner.as_deref(), Some("1234"));

        let other_port = FilterConfig::new(vec![9999], true);
        assert!(records.iter().all(|r| !other_port.passes(r)));
    }

    #[test]
    fn test_blank_lines_ignored() {
        let raw = "\n   \n  TCP    0.0.0.0:80    0.0.0.0:0    LISTENING    9\n\n";
        let records = parse_snapshot(raw, &SnapshotGrammar::windows(), None);
        assert_eq!(records.len(), 1);
    }
}
