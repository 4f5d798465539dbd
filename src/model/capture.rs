use crate::error::NetgraphError;
use crate::model::{ConnectionRecord, HostIdentity};
use std::collections::HashSet;

/// Classified content of one capture.
#[derive(Debug, Default)]
pub struct CaptureBatch {
    /// Established remote connections, in input line order.
    pub established: Vec<ConnectionRecord>,
    pub listening_ports: HashSet<String>,
    /// Distinct local addresses in order of first discovery.
    pub local_addresses: Vec<String>,
    /// Lines that were dropped as malformed.
    pub skipped: Vec<NetgraphError>,
}

impl CaptureBatch {
    pub fn add_listening_port(&mut self, port: &str) -> bool {
        self.listening_ports.insert(port.to_string())
    }

    pub fn add_local_address(&mut self, address: &str) -> bool {
        if self.local_addresses.iter().any(|a| a == address) {
            return false;
        }
        self.local_addresses.push(address.to_string());
        true
    }

    pub fn is_listening_port(&self, port: &str) -> bool {
        self.listening_ports.contains(port)
    }
}

/// Summary of how one capture was merged into the graph.
#[derive(Debug)]
pub struct CaptureReport {
    pub source: String,
    pub lines: usize,
    pub established: usize,
    pub listening_ports: usize,
    pub local_addresses: usize,
    pub links_added: usize,
    /// Local addresses the capture was attributed to.
    pub host: HostIdentity,
    pub warnings: Vec<NetgraphError>,
}

impl CaptureReport {
    pub fn skipped_lines(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, NetgraphError::MalformedLine { .. }))
            .count()
    }
}
