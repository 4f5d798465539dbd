use std::fmt;

/// One parsed line of a connection-state dump.
///
/// Every field is kept as the token printed in the report; ports and PIDs
/// stay strings so the graph reproduces them exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRecord {
    pub protocol: String,
    pub local_address: String,
    pub local_port: String,
    pub remote_address: String,
    pub remote_port: String,
    pub state: String,
    pub pid: String,
}

pub const IPV4_ANY: &str = "0.0.0.0";
pub const IPV4_LOOPBACK: &str = "127.0.0.1";
pub const IPV6_ANY: &str = "[::]";
pub const IPV6_LOOPBACK: &str = "[::1]";

impl ConnectionRecord {
    pub fn is_tcp(&self) -> bool {
        self.protocol.contains("TCP")
    }

    pub fn is_established(&self) -> bool {
        self.state.contains("ESTABLISHED")
    }

    pub fn is_listening(&self) -> bool {
        self.state.contains("LISTENING")
    }
}

pub fn is_loopback(address: &str) -> bool {
    address == IPV4_LOOPBACK || address == IPV6_LOOPBACK
}

pub fn is_unspecified(address: &str) -> bool {
    address == IPV4_ANY || address == IPV6_ANY
}

/// IPv6 any-address or loopback; these never name a listening service.
pub fn is_ipv6_wildcard(address: &str) -> bool {
    address == IPV6_ANY || address == IPV6_LOOPBACK
}

impl fmt::Display for ConnectionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}:{} -> {}:{} {} (PID: {})",
            self.protocol,
            self.local_address,
            self.local_port,
            self.remote_address,
            self.remote_port,
            self.state,
            self.pid
        )
    }
}
