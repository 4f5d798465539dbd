//! Builds a host-to-host graph from `netstat -ano` style connection dumps.
//!
//! Raw lines are normalized ([`parser::normalize_line`]), classified per
//! capture ([`analysis::classify`]), merged into one [`graph::ConnectionGraph`]
//! ([`analysis::build_capture`]) and finally exported as a node-link
//! document ([`graph::to_node_link`]).

pub mod analysis;
pub mod config;
pub mod error;
pub mod graph;
pub mod input;
pub mod model;
pub mod parser;

pub use error::{NetgraphError, Result};
