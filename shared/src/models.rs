use serde::{Deserialize, Serialize};

/// Node-link document consumed by the visualisation front end.
///
/// `links[*].source` and `links[*].target` are zero-based indices into
/// `nodes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLinkGraph {
    pub directed: bool,
    pub multigraph: bool,
    pub graph: GraphMeta,
    pub nodes: Vec<NodeEntry>,
    pub links: Vec<LinkEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMeta {
    pub generated_at: String,
    pub captures: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeEntry {
    pub id: String,
    pub name: String,
    pub local: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkEntry {
    pub source: usize,
    pub target: usize,
    pub port: String,
    pub observations: u32,
}

impl GraphMeta {
    pub fn new(captures: Vec<String>) -> Self {
        Self {
            generated_at: chrono::Local::now().to_rfc3339(),
            captures,
        }
    }
}

impl NodeLinkGraph {
    pub fn node_name(&self, index: usize) -> Option<&str> {
        self.nodes.get(index).map(|n| n.name.as_str())
    }

    /// Number of links that touch the node at `index`, in either direction.
    pub fn degree(&self, index: usize) -> usize {
        self.links
            .iter()
            .filter(|l| l.source == index || l.target == index)
            .count()
    }
}
