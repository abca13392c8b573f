//! Connection record domain models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Protocol
// ============================================================================

/// Transport protocol of a connection table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
}

impl Protocol {
    /// Parse a protocol token from a connection listing.
    ///
    /// Tolerates the case and address-family suffixes the various netstat
    /// flavors emit ("TCP", "tcp", "tcp4", "tcp6", ...).
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "tcp" | "tcp4" | "tcp6" => Some(Protocol::Tcp),
            "udp" | "udp4" | "udp6" => Some(Protocol::Udp),
            _ => None,
        }
    }

    /// Whether the protocol has no connection state concept.
    pub fn is_connectionless(&self) -> bool {
        matches!(self, Protocol::Udp)
    }

    /// Lowercase token used when invoking the OS snapshot command.
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "TCP"),
            Protocol::Udp => write!(f, "UDP"),
        }
    }
}

// ============================================================================
// ConnState
// ============================================================================

/// State of a TCP endpoint as reported by the OS.
///
/// Unknown tokens are preserved verbatim in `Other` rather than dropped, so a
/// record always reflects exactly what the snapshot said.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnState {
    Listening,
    Established,
    TimeWait,
    CloseWait,
    SynSent,
    SynReceived,
    FinWait1,
    FinWait2,
    Closing,
    LastAck,
    Closed,
    Other(String),
}

impl ConnState {
    /// Parse a state token, accepting both the Windows netstat spellings
    /// ("LISTENING", "TIME_WAIT") and the Unix ones ("LISTEN", "SYN_RECV").
    pub fn parse(token: &str) -> Self {
        match token {
            "LISTENING" | "LISTEN" => ConnState::Listening,
            "ESTABLISHED" => ConnState::Established,
            "TIME_WAIT" => ConnState::TimeWait,
            "CLOSE_WAIT" => ConnState::CloseWait,
            "SYN_SENT" => ConnState::SynSent,
            "SYN_RECEIVED" | "SYN_RECV" => ConnState::SynReceived,
            "FIN_WAIT_1" | "FIN_WAIT1" => ConnState::FinWait1,
            "FIN_WAIT_2" | "FIN_WAIT2" => ConnState::FinWait2,
            "CLOSING" => ConnState::Closing,
            "LAST_ACK" => ConnState::LastAck,
            "CLOSED" | "CLOSE" => ConnState::Closed,
            other => ConnState::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for ConnState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnState::Listening => write!(f, "LISTENING"),
            ConnState::Established => write!(f, "ESTABLISHED"),
            ConnState::TimeWait => write!(f, "TIME_WAIT"),
            ConnState::CloseWait => write!(f, "CLOSE_WAIT"),
            ConnState::SynSent => write!(f, "SYN_SENT"),
            ConnState::SynReceived => write!(f, "SYN_RECEIVED"),
            ConnState::FinWait1 => write!(f, "FIN_WAIT_1"),
            ConnState::FinWait2 => write!(f, "FIN_WAIT_2"),
            ConnState::Closing => write!(f, "CLOSING"),
            ConnState::LastAck => write!(f, "LAST_ACK"),
            ConnState::Closed => write!(f, "CLOSED"),
            ConnState::Other(token) => write!(f, "{}", token),
        }
    }
}

// ============================================================================
// ConnectionRecord
// ============================================================================

/// One parsed row of the OS connection table.
///
/// Records are immutable once constructed; every scan produces an entirely
/// fresh set that replaces the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    /// Unique identifier for this record instance.
    pub id: Uuid,
    /// Transport protocol of the row.
    pub protocol: Protocol,
    /// Local endpoint exactly as the OS reported it (host:port).
    pub local_address: String,
    /// Port number derived from `local_address`.
    pub local_port: u16,
    /// Connection state; absent for connectionless protocols.
    pub state: Option<ConnState>,
    /// Opaque identifier of the owning process, as reported.
    pub owner: Option<String>,
    /// Name of the owning process, when the snapshot format carries one.
    pub process_name: Option<String>,
}

impl ConnectionRecord {
    /// Create a record from parsed snapshot fields.
    pub fn new(
        protocol: Protocol,
        local_address: impl Into<String>,
        local_port: u16,
        state: Option<ConnState>,
        owner: Option<String>,
        process_name: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            protocol,
            local_address: local_address.into(),
            local_port,
            state,
            owner,
            process_name,
        }
    }

    /// The owner identifier as a process id, if it is a positive integer.
    pub fn owner_pid(&self) -> Option<u32> {
        self.owner
            .as_deref()?
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|pid| *pid > 0)
    }

    /// Whether the endpoint is in a passive/listening state.
    pub fn is_listening(&self) -> bool {
        matches!(self.state, Some(ConnState::Listening))
    }
}

impl std::fmt::Display for ConnectionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.protocol, self.local_address)?;
        if let Some(state) = &self.state {
            write!(f, " {}", state)?;
        }
        if let Some(owner) = &self.owner {
            write!(f, " (PID: {})", owner)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_parse() {
        assert_eq!(Protocol::parse("TCP"), Some(Protocol::Tcp));
        assert_eq!(Protocol::parse("tcp6"), Some(Protocol::Tcp));
        assert_eq!(Protocol::parse("udp"), Some(Protocol::Udp));
        assert_eq!(Protocol::parse("UDP6"), Some(Protocol::Udp));
        assert_eq!(Protocol::parse("unix"), None);
    }

    #[test]
    fn test_state_parse_both_spellings() {
        assert_eq!(ConnState::parse("LISTENING"), ConnState::Listening);
        assert_eq!(ConnState::parse("LISTEN"), ConnState::Listening);
        assert_eq!(ConnState::parse("TIME_WAIT"), ConnState::TimeWait);
        assert_eq!(
            ConnState::parse("BOUND"),
            ConnState::Other("BOUND".to_string())
        );
    }

    #[test]
    fn test_owner_pid() {
        let record = ConnectionRecord::new(
            Protocol::Tcp,
            "0.0.0.0:4200",
            4200,
            Some(ConnState::Listening),
            Some("1234".to_string()),
            None,
        );
        assert_eq!(record.owner_pid(), Some(1234));

        let garbage = ConnectionRecord::new(
            Protocol::Tcp,
            "0.0.0.0:80",
            80,
            Some(ConnState::Listening),
            Some("-".to_string()),
            None,
        );
        assert_eq!(garbage.owner_pid(), None);

        let zero = ConnectionRecord::new(
            Protocol::Tcp,
            "0.0.0.0:80",
            80,
            Some(ConnState::Listening),
            Some("0".to_string()),
            None,
        );
        assert_eq!(zero.owner_pid(), None);
    }

    #[test]
    fn test_display() {
        let record = ConnectionRecord::new(
            Protocol::Tcp,
            "127.0.0.1:8080",
            8080,
            Some(ConnState::Established),
            Some("42".to_string()),
            None,
        );
        assert_eq!(record.to_string(), "TCP 127.0.0.1:8080 ESTABLISHED (PID: 42)");
    }
}
