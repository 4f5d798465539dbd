use crate::error::{NetgraphError, Result};
use crate::graph::ConnectionGraph;
use petgraph::visit::EdgeRef;
use shared::{GraphMeta, LinkEntry, NodeEntry, NodeLinkGraph};
use std::fs;
use std::path::Path;

/// Reshapes the graph into a node-link document.
///
/// Node order is insertion order and links refer to nodes by position.
/// An `InvariantViolation` here means the graph was corrupted upstream.
pub fn to_node_link(graph: &ConnectionGraph) -> Result<NodeLinkGraph> {
    let inner = graph.inner();

    let nodes: Vec<NodeEntry> = inner
        .node_indices()
        .map(|idx| {
            let node = &inner[idx];
            NodeEntry {
                id: node.name.clone(),
                name: node.name.clone(),
                local: node.local,
            }
        })
        .collect();

    let mut links = Vec::with_capacity(inner.edge_count());
    for edge in inner.edge_references() {
        let (source, target) = (edge.source().index(), edge.target().index());
        if source >= nodes.len() || target >= nodes.len() || source == target {
            return Err(NetgraphError::InvariantViolation {
                capture: "export".to_string(),
                detail: format!(
                    "link {} -> {} on port {} is unresolved",
                    source,
                    target,
                    edge.weight().port
                ),
            });
        }
        links.push(LinkEntry {
            source,
            target,
            port: edge.weight().port.clone(),
            observations: edge.weight().observations,
        });
    }

    Ok(NodeLinkGraph {
        directed: true,
        multigraph: true,
        graph: GraphMeta::new(graph.captures().to_vec()),
        nodes,
        links,
    })
}

pub fn write_node_link(document: &NodeLinkGraph, path: &Path, pretty: bool) -> Result<()> {
    let content = if pretty {
        serde_json::to_string_pretty(document)?
    } else {
        serde_json::to_string(document)?
    };
    fs::write(path, content)?;
    log::info!(
        "Wrote {} nodes and {} links to {}",
        document.nodes.len(),
        document.links.len(),
        path.display()
    );
    Ok(())
}
