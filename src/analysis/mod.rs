pub mod builder;
pub mod classifier;

pub use builder::{build_capture, direction, BuildSummary, Direction};
pub use classifier::classify;

use crate::error::Result;
use crate::graph::ConnectionGraph;
use crate::model::{CaptureReport, HostIdentity};
use std::collections::BTreeMap;

/// Classifies one capture and merges it into `graph`.
///
/// `lines` must already be normalized. `host_label`, when given, names the
/// local node instead of the discovered addresses.
pub fn process_capture<S: AsRef<str>>(
    graph: &mut ConnectionGraph,
    source: &str,
    lines: &[S],
    host_label: Option<&str>,
) -> Result<CaptureReport> {
    let mut batch = classify(lines);
    log::debug!("{}: established {:?}", source, batch.established);
    log::debug!("{}: service ports {:?}", source, batch.listening_ports);
    log::debug!("{}: local IPs {:?}", source, batch.local_addresses);

    let mut identity = HostIdentity::new(batch.local_addresses.clone());
    if let Some(label) = host_label {
        identity = identity.with_label(label);
    }

    let summary = build_capture(graph, source, &batch, &identity)?;
    graph.record_capture(source);

    let mut warnings = std::mem::take(&mut batch.skipped);
    warnings.extend(summary.warnings);

    Ok(CaptureReport {
        source: source.to_string(),
        lines: lines.len(),
        established: batch.established.len(),
        listening_ports: batch.listening_ports.len(),
        local_addresses: identity.addresses().len(),
        links_added: summary.links_added,
        host: identity,
        warnings,
    })
}

/// Processes every capture in key order, stopping at the first fatal error.
pub fn process_captures(
    graph: &mut ConnectionGraph,
    captures: &BTreeMap<String, Vec<String>>,
    host_label: Option<&str>,
) -> Result<Vec<CaptureReport>> {
    let mut reports: Vec<CaptureReport> = Vec::with_capacity(captures.len());
    for (source, lines) in captures {
        let report = process_capture(graph, source, lines, host_label)?;
        if host_label.is_none() && local_host_changed(reports.last(), &report) {
            log::warn!(
                "{}: local addresses {:?} changed, using a separate local node",
                report.source,
                report.host.addresses()
            );
        }
        log::info!(
            "{}: {} lines, {} established, {} listening ports, {} local IPs, {} skipped",
            report.source,
            report.lines,
            report.established,
            report.listening_ports,
            report.local_addresses,
            report.skipped_lines()
        );
        reports.push(report);
    }
    Ok(reports)
}

/// True when both captures discovered local addresses and the sets differ.
fn local_host_changed(previous: Option<&CaptureReport>, current: &CaptureReport) -> bool {
    match previous {
        Some(previous) if !previous.host.is_empty() && !current.host.is_empty() => {
            previous.host != current.host
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_capture_reports_skipped_lines() {
        let lines = [
            "TCP 0.0.0.0:80 0.0.0.0:0 LISTENING 4",
            "TCP 10.0.0.5:80 203.0.113.5:60311 ESTABLISHED 4",
            "TCP 10.0.0.5 203.0.113.9:443 ESTABLISHED 4",
        ];
        let mut graph = ConnectionGraph::new();

        let report = process_capture(&mut graph, "host-a", &lines, None).unwrap();

        assert_eq!(report.lines, 3);
        assert_eq!(report.established, 1);
        assert_eq!(report.skipped_lines(), 1);
        assert_eq!(report.links_added, 1);
        assert_eq!(graph.captures(), ["host-a".to_string()]);
        assert!(graph.find_link("203.0.113.5", "10.0.0.5", "80").is_some());
    }

    #[test]
    fn test_local_host_change_ignores_discovery_order() {
        let mut graph = ConnectionGraph::new();
        let first = process_capture(
            &mut graph,
            "monday",
            &[
                "TCP 10.0.0.5:50000 93.184.216.34:443 ESTABLISHED 1",
                "TCP 192.168.1.10:139 0.0.0.0:0 LISTENING 4",
            ],
            None,
        )
        .unwrap();
        let reordered = process_capture(
            &mut graph,
            "tuesday",
            &[
                "TCP 192.168.1.10:139 0.0.0.0:0 LISTENING 4",
                "TCP 10.0.0.5:50001 93.184.216.34:443 ESTABLISHED 1",
            ],
            None,
        )
        .unwrap();
        let moved = process_capture(
            &mut graph,
            "wednesday",
            &["TCP 10.0.0.7:50002 93.184.216.34:443 ESTABLISHED 1"],
            None,
        )
        .unwrap();
        let empty =
            process_capture(&mut graph, "thursday", &["UDP 0.0.0.0:123 *:* 1368"], None).unwrap();

        assert_eq!(first.local_addresses, 2);
        assert!(!local_host_changed(None, &first));
        assert!(!local_host_changed(Some(&first), &reordered));
        assert!(local_host_changed(Some(&reordered), &moved));
        assert!(!local_host_changed(Some(&moved), &empty));
    }

    #[test]
    fn test_process_capture_with_host_label() {
        let lines = ["TCP 10.0.0.5:51514 93.184.216.34:443 ESTABLISHED 4"];
        let mut graph = ConnectionGraph::new();

        process_capture(&mut graph, "host-a", &lines, Some("LAPTOP")).unwrap();

        assert!(graph.find_link("LAPTOP", "93.184.216.34", "443").is_some());
    }
}
