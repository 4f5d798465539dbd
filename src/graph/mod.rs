pub mod export;

pub use export::{to_node_link, write_node_link};

use crate::error::{NetgraphError, Result};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostNode {
    pub name: String,
    /// Set once the name has served as a capture's local node.
    pub local: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub port: String,
    pub observations: u32,
}

/// Directed multigraph of hosts accumulated over every capture.
///
/// Nodes are keyed by name. Links are keyed by (source, target, port):
/// a repeated triple bumps `observations`, a new port between the same pair
/// adds a parallel link. Nothing is ever removed, so node indices stay
/// dense and in insertion order.
#[derive(Debug, Default)]
pub struct ConnectionGraph {
    inner: DiGraph<HostNode, Link>,
    index: HashMap<String, NodeIndex>,
    captures: Vec<String>,
}

impl ConnectionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures a node named `name` exists and returns its index.
    ///
    /// Repeated calls return the same index and add nothing. Passing
    /// `local = true` marks the node local; the mark is never cleared.
    pub fn ensure_node(&mut self, name: &str, local: bool) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            if local {
                self.inner[idx].local = true;
            }
            return idx;
        }

        let idx = self.inner.add_node(HostNode {
            name: name.to_string(),
            local,
        });
        self.index.insert(name.to_string(), idx);
        idx
    }

    /// Adds `source -> target` on `port`, or counts another observation of
    /// it. Returns `true` when a new link was created.
    ///
    /// Both nodes must already exist and be distinct.
    pub fn add_link(
        &mut self,
        capture: &str,
        source: &str,
        target: &str,
        port: &str,
    ) -> Result<bool> {
        let from = self.resolve(capture, source)?;
        let to = self.resolve(capture, target)?;
        if from == to {
            return Err(NetgraphError::InvariantViolation {
                capture: capture.to_string(),
                detail: format!("link from {:?} to itself on port {}", source, port),
            });
        }

        let existing = self
            .inner
            .edges_connecting(from, to)
            .find(|e| e.weight().port == port)
            .map(|e| e.id());

        match existing {
            Some(edge) => {
                self.inner[edge].observations += 1;
                Ok(false)
            }
            None => {
                self.inner.add_edge(
                    from,
                    to,
                    Link {
                        port: port.to_string(),
                        observations: 1,
                    },
                );
                Ok(true)
            }
        }
    }

    fn resolve(&self, capture: &str, name: &str) -> Result<NodeIndex> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| NetgraphError::InvariantViolation {
                capture: capture.to_string(),
                detail: format!("link endpoint {:?} is not a node", name),
            })
    }

    pub fn record_capture(&mut self, source: &str) {
        self.captures.push(source.to_string());
    }

    pub fn captures(&self) -> &[String] {
        &self.captures
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn node(&self, name: &str) -> Option<&HostNode> {
        self.index.get(name).map(|&idx| &self.inner[idx])
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn link_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn find_link(&self, source: &str, target: &str, port: &str) -> Option<&Link> {
        let from = *self.index.get(source)?;
        let to = *self.index.get(target)?;
        self.inner
            .edges_connecting(from, to)
            .map(|e| e.weight())
            .find(|link| link.port == port)
    }

    pub(crate) fn inner(&self) -> &DiGraph<HostNode, Link> {
        &self.inner
    }
}
