use crate::model::connection::{is_ipv6_wildcard, is_loopback, is_unspecified};
use crate::model::{CaptureBatch, ConnectionRecord};
use crate::parser::parse_line;

/// Partitions one capture's normalized lines into established connections,
/// listening ports and local addresses.
///
/// Each parsed TCP line is checked against every rule; a line may feed more
/// than one of them. Lines that are not TCP rows are ignored, malformed TCP
/// rows are recorded in `CaptureBatch::skipped`.
pub fn classify<S: AsRef<str>>(lines: &[S]) -> CaptureBatch {
    let mut batch = CaptureBatch::default();

    for line in lines {
        let line = line.as_ref();
        if !is_tcp_row(line) {
            log::debug!("Skipping : {}", line);
            continue;
        }

        let record = match parse_line(line) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("{}", e);
                batch.skipped.push(e);
                continue;
            }
        };

        if is_remote_connection(&record) {
            log::debug!("Adding connection: {}", record);
            batch.established.push(record.clone());
        }

        if is_listening_service(&record) && batch.add_listening_port(&record.local_port) {
            log::debug!("Found local service port: {}", record);
        }

        if is_local_address(&record) {
            if batch.add_local_address(&record.local_address) {
                log::debug!("Found unique IP: {}", record);
            }
        } else {
            log::debug!("Skipping : {}", record);
        }
    }

    batch
}

fn is_tcp_row(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|protocol| protocol.contains("TCP"))
}

/// Established TCP connection between two routable endpoints.
pub fn is_remote_connection(record: &ConnectionRecord) -> bool {
    record.is_tcp()
        && record.is_established()
        && !is_excluded_address(&record.local_address)
        && !is_excluded_address(&record.remote_address)
}

/// Listening TCP socket bound to something other than the IPv6 wildcards.
pub fn is_listening_service(record: &ConnectionRecord) -> bool {
    record.is_tcp() && record.is_listening() && !is_ipv6_wildcard(&record.local_address)
}

/// TCP socket whose local address is a concrete interface address.
pub fn is_local_address(record: &ConnectionRecord) -> bool {
    record.is_tcp() && !is_excluded_address(&record.local_address)
}

fn is_excluded_address(address: &str) -> bool {
    is_loopback(address) || is_unspecified(address)
}
