use crate::error::{NetgraphError, Result};
use crate::model::ConnectionRecord;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SPACE_RUN: Regex = Regex::new(r" {2,}").unwrap();
}

/// Uppercases and trims a raw report line.
pub fn normalize_line(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Parses one normalized line, e.g.
/// `TCP    192.168.1.10:51514   93.184.216.34:443   ESTABLISHED   4120`.
pub fn parse_line(line: &str) -> Result<ConnectionRecord> {
    let collapsed = SPACE_RUN.replace_all(line, " ");
    let collapsed = collapsed.strip_prefix(' ').unwrap_or(&*collapsed);

    let tokens: Vec<&str> = collapsed.split(' ').collect();
    if tokens.len() < 5 {
        return Err(malformed(line));
    }

    let (local_address, local_port) = split_endpoint(tokens[1]).ok_or_else(|| malformed(line))?;
    let (remote_address, remote_port) = split_endpoint(tokens[2]).ok_or_else(|| malformed(line))?;

    Ok(ConnectionRecord {
        protocol: tokens[0].to_string(),
        local_address: local_address.to_string(),
        local_port: local_port.to_string(),
        remote_address: remote_address.to_string(),
        remote_port: remote_port.to_string(),
        state: tokens[3].to_string(),
        pid: tokens[4].to_string(),
    })
}

// Splits on the last ':' so "[::1]:445" keeps its brackets intact.
fn split_endpoint(token: &str) -> Option<(&str, &str)> {
    token.rsplit_once(':')
}

fn malformed(line: &str) -> NetgraphError {
    NetgraphError::MalformedLine {
        line: line.to_string(),
    }
}
