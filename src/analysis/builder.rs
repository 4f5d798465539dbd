use crate::error::{NetgraphError, Result};
use crate::graph::ConnectionGraph;
use crate::model::{CaptureBatch, ConnectionRecord, HostIdentity};

/// What one capture added to the graph.
#[derive(Debug, Default)]
pub struct BuildSummary {
    pub local_node: String,
    pub links_added: usize,
    pub warnings: Vec<NetgraphError>,
}

/// Which way a connection was opened, relative to the local host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// A remote peer connected to a local listening service.
    Inbound,
    /// The local host connected out to a remote service.
    Outbound,
}

/// Inbound when the local port is one of the capture's listening ports.
pub fn direction(record: &ConnectionRecord, batch: &CaptureBatch) -> Direction {
    if batch.is_listening_port(&record.local_port) {
        Direction::Inbound
    } else {
        Direction::Outbound
    }
}

/// Merges one classified capture into `graph`.
///
/// Every established connection attaches to the single local node named by
/// `identity`. Connections to any of the host's own addresses are skipped
/// with a `SelfConnection` warning. The local node is only added when the
/// capture has at least one connection. Identities are not reconciled across captures: a capture
/// that discovers a different address set produces a different local node.
pub fn build_capture(
    graph: &mut ConnectionGraph,
    capture: &str,
    batch: &CaptureBatch,
    identity: &HostIdentity,
) -> Result<BuildSummary> {
    let local = identity.node_name();
    let mut summary = BuildSummary {
        local_node: local.clone(),
        ..Default::default()
    };

    if identity.is_empty() {
        let warning = NetgraphError::EmptyLocalAddressSet {
            capture: capture.to_string(),
        };
        log::warn!("{}", warning);
        summary.warnings.push(warning);
    }

    let mut connections = Vec::with_capacity(batch.established.len());
    for record in &batch.established {
        if identity.contains(&record.remote_address) || record.remote_address == local {
            let warning = NetgraphError::SelfConnection {
                capture: capture.to_string(),
                address: record.remote_address.clone(),
            };
            log::warn!("{}", warning);
            summary.warnings.push(warning);
            continue;
        }
        connections.push(record);
    }

    if connections.is_empty() {
        log::debug!("Capture {} has no connections to add", capture);
        return Ok(summary);
    }

    graph.ensure_node(&local, true);
    for record in &connections {
        graph.ensure_node(&record.remote_address, false);
    }

    for record in connections {
        let added = match direction(record, batch) {
            Direction::Inbound => {
                graph.add_link(capture, &record.remote_address, &local, &record.local_port)?
            }
            Direction::Outbound => {
                graph.add_link(capture, &local, &record.remote_address, &record.remote_port)?
            }
        };
        if added {
            summary.links_added += 1;
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_line;

    fn batch(records: &[&str], listening: &[&str], locals: &[&str]) -> CaptureBatch {
        let mut batch = CaptureBatch::default();
        for line in records {
            batch.established.push(parse_line(line).unwrap());
        }
        for port in listening {
            batch.add_listening_port(port);
        }
        for address in locals {
            batch.add_local_address(address);
        }
        batch
    }

    fn identity(batch: &CaptureBatch) -> HostIdentity {
        HostIdentity::new(batch.local_addresses.clone())
    }

    #[test]
    fn test_inbound_connection_points_at_local_node() {
        let b = batch(&["TCP 10.0.0.5:80 203.0.113.5:60311 ESTABLISHED 4"], &["80"], &["10.0.0.5"]);
        let mut graph = ConnectionGraph::new();

        build_capture(&mut graph, "cap", &b, &identity(&b)).unwrap();

        assert!(graph.find_link("203.0.113.5", "10.0.0.5", "80").is_some());
        assert_eq!(graph.link_count(), 1);
    }

    #[test]
    fn test_outbound_connection_uses_remote_port() {
        let b = batch(
            &["TCP 10.0.0.5:51514 93.184.216.34:443 ESTABLISHED 4120"],
            &["80"],
            &["10.0.0.5"],
        );
        let mut graph = ConnectionGraph::new();

        build_capture(&mut graph, "cap", &b, &identity(&b)).unwrap();

        assert!(graph.find_link("10.0.0.5", "93.184.216.34", "443").is_some());
        assert!(graph.find_link("10.0.0.5", "93.184.216.34", "51514").is_none());
    }

    #[test]
    fn test_multi_homed_host_is_one_node() {
        let b = batch(
            &[
                "TCP 10.0.0.5:80 203.0.113.5:60311 ESTABLISHED 4",
                "TCP 192.168.1.10:50001 198.51.100.7:22 ESTABLISHED 900",
            ],
            &["80"],
            &["10.0.0.5", "192.168.1.10"],
        );
        let mut graph = ConnectionGraph::new();

        let summary = build_capture(&mut graph, "cap", &b, &identity(&b)).unwrap();

        let local = "10.0.0.5\n192.168.1.10";
        assert_eq!(summary.local_node, local);
        assert_eq!(summary.links_added, 2);
        assert_eq!(graph.node_count(), 3);
        assert!(graph.node(local).unwrap().local);
        assert!(graph.find_link("203.0.113.5", local, "80").is_some());
        assert!(graph.find_link(local, "198.51.100.7", "22").is_some());
    }

    #[test]
    fn test_empty_local_set_warns_and_uses_empty_name() {
        let b = batch(&["TCP 10.0.0.5:51514 93.184.216.34:443 ESTABLISHED 1"], &[], &[]);
        let mut graph = ConnectionGraph::new();

        let summary = build_capture(&mut graph, "cap", &b, &identity(&b)).unwrap();

        assert!(matches!(summary.warnings[0], NetgraphError::EmptyLocalAddressSet { .. }));
        assert!(graph.contains_node(""));
        assert!(graph.find_link("", "93.184.216.34", "443").is_some());
    }

    #[test]
    fn test_capture_without_connections_adds_nothing() {
        let b = batch(&[], &["80"], &["10.0.0.5"]);
        let mut graph = ConnectionGraph::new();

        let summary = build_capture(&mut graph, "cap", &b, &identity(&b)).unwrap();

        assert_eq!(graph.node_count(), 0);
        assert!(summary.warnings.is_empty());
    }

    #[test]
    fn test_connection_to_own_address_is_skipped() {
        let b = batch(
            &[
                "TCP 10.0.0.5:50000 10.0.0.5:8080 ESTABLISHED 1",
                "TCP 10.0.0.5:50001 93.184.216.34:443 ESTABLISHED 1",
            ],
            &[],
            &["10.0.0.5"],
        );
        let mut graph = ConnectionGraph::new();

        let summary = build_capture(&mut graph, "cap", &b, &identity(&b)).unwrap();

        assert_eq!(summary.links_added, 1);
        assert!(matches!(summary.warnings[0], NetgraphError::SelfConnection { .. }));
    }

    #[test]
    fn test_connection_between_own_interfaces_is_skipped() {
        let b = batch(
            &[
                "TCP 10.0.0.5:50000 192.168.1.10:8080 ESTABLISHED 1",
                "TCP 192.168.1.10:8080 10.0.0.5:50000 ESTABLISHED 1",
            ],
            &["8080"],
            &["10.0.0.5", "192.168.1.10"],
        );
        let mut graph = ConnectionGraph::new();

        let summary = build_capture(&mut graph, "cap", &b, &identity(&b)).unwrap();

        assert_eq!(summary.links_added, 0);
        assert_eq!(summary.warnings.len(), 2);
        assert!(summary
            .warnings
            .iter()
            .all(|w| matches!(w, NetgraphError::SelfConnection { .. })));
        assert!(!graph.contains_node("10.0.0.5"));
        assert!(!graph.contains_node("192.168.1.10"));
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn test_own_address_is_skipped_under_label() {
        let b = batch(
            &[
                "TCP 10.0.0.5:50000 192.168.1.10:8080 ESTABLISHED 1",
                "TCP 10.0.0.5:50001 93.184.216.34:443 ESTABLISHED 1",
            ],
            &[],
            &["10.0.0.5", "192.168.1.10"],
        );
        let mut graph = ConnectionGraph::new();

        let summary =
            build_capture(&mut graph, "cap", &b, &identity(&b).with_label("workstation")).unwrap();

        assert_eq!(summary.links_added, 1);
        assert!(graph.find_link("workstation", "93.184.216.34", "443").is_some());
        assert!(!graph.contains_node("192.168.1.10"));
    }

    #[test]
    fn test_label_overrides_composite_name() {
        let b = batch(&["TCP 10.0.0.5:51514 93.184.216.34:443 ESTABLISHED 1"], &[], &["10.0.0.5"]);
        let mut graph = ConnectionGraph::new();

        build_capture(&mut graph, "cap", &b, &identity(&b).with_label("workstation")).unwrap();

        assert!(graph.find_link("workstation", "93.184.216.34", "443").is_some());
        assert!(!graph.contains_node("10.0.0.5"));
    }

    #[test]
    fn test_direction() {
        let b = batch(&["TCP 10.0.0.5:80 203.0.113.5:60311 ESTABLISHED 4"], &["80"], &[]);
        assert_eq!(direction(&b.established[0], &b), Direction::Inbound);

        let b = batch(&["TCP 10.0.0.5:80 203.0.113.5:60311 ESTABLISHED 4"], &["8080"], &[]);
        assert_eq!(direction(&b.established[0], &b), Direction::Outbound);
    }
}
