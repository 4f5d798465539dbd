use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};
use colored::*;
use shared::{LinkEntry, NodeLinkGraph};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "netgraph-cli")]
#[command(about = "Inspect an exported connection graph", long_about = None)]
struct Cli {
    /// Node-link document written by netgraph
    #[arg(short, long, global = true, default_value = "graph.json")]
    graph: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List hosts
    Nodes {
        /// Only local hosts
        #[arg(long, conflicts_with = "remote")]
        local: bool,

        /// Only remote hosts
        #[arg(long)]
        remote: bool,
    },

    /// List connections
    Links {
        /// Filter by port
        #[arg(short, long)]
        port: Option<String>,

        /// Show only the last N links
        #[arg(short, long)]
        last: Option<usize>,
    },

    /// Show statistics
    Stats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let graph = load_graph(&cli.graph)?;

    match cli.command {
        Commands::Nodes { local, remote } => show_nodes(&graph, local, remote),
        Commands::Links { port, last } => show_links(&graph, port.as_deref(), last),
        Commands::Stats => show_stats(&graph),
    }

    Ok(())
}

fn load_graph(path: &Path) -> Result<NodeLinkGraph> {
    let content =
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a node-link graph", path.display()))
}

fn header(title: &str) {
    println!("\n{}", "═══════════════════════════════════════════════════════".cyan());
    println!("{} {}", "netgraph".bright_cyan().bold(), title.white());
    println!("{}\n", "═══════════════════════════════════════════════════════".cyan());
}

// Multi-homed local nodes carry newline-joined addresses.
fn display_name(name: &str) -> String {
    if name.is_empty() {
        "<unknown local host>".to_string()
    } else {
        name.replace('\n', " | ")
    }
}

fn show_nodes(graph: &NodeLinkGraph, only_local: bool, only_remote: bool) {
    header("Hosts");

    let mut shown = 0;
    for (index, node) in graph.nodes.iter().enumerate() {
        if (only_local && !node.local) || (only_remote && node.local) {
            continue;
        }
        let kind = if node.local { "LOCAL ".green().bold() } else { "REMOTE".blue().bold() };
        println!(
            "{} {} {}",
            kind,
            display_name(&node.name).bright_white(),
            format!("({} links)", graph.degree(index)).bright_black()
        );
        shown += 1;
    }

    if shown == 0 {
        println!("{}", "No hosts matching criteria.".yellow());
    }
}

fn select_links<'a>(
    graph: &'a NodeLinkGraph,
    port: Option<&str>,
    last: Option<usize>,
) -> Vec<&'a LinkEntry> {
    let mut links: Vec<&LinkEntry> = graph
        .links
        .iter()
        .filter(|l| port.is_none_or(|p| l.port == p))
        .collect();

    if let Some(n) = last {
        let start = links.len().saturating_sub(n);
        links = links.split_off(start);
    }
    links
}

fn endpoint_name(graph: &NodeLinkGraph, index: usize) -> String {
    graph
        .node_name(index)
        .map(display_name)
        .unwrap_or_else(|| "?".to_string())
}

fn show_links(graph: &NodeLinkGraph, port: Option<&str>, last: Option<usize>) {
    header("Connections");

    let links = select_links(graph, port, last);
    if links.is_empty() {
        println!("{}", "No connections matching criteria.".yellow());
        return;
    }

    for link in links {
        let source = endpoint_name(graph, link.source);
        let target = endpoint_name(graph, link.target);
        println!(
            "{} {} {} {} {}",
            source.bright_white(),
            "->".bright_black(),
            target.bright_white(),
            format!(":{}", link.port).yellow(),
            format!("(x{})", link.observations).bright_black()
        );
    }
}

/// Ports ordered by how many links use them, most used first.
fn port_counts(graph: &NodeLinkGraph) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for link in &graph.links {
        *counts.entry(link.port.as_str()).or_insert(0) += 1;
    }

    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(p, c)| (p.to_string(), c))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

fn show_stats(graph: &NodeLinkGraph) {
    header("Statistics");

    let local = graph.nodes.iter().filter(|n| n.local).count();
    println!("{} {}", "Hosts:".bright_blue(), graph.nodes.len().to_string().bright_white().bold());
    println!("{} {}", "  local:".bright_blue(), local);
    println!("{} {}", "  remote:".bright_blue(), graph.nodes.len() - local);
    println!(
        "{} {}",
        "Connections:".bright_blue(),
        graph.links.len().to_string().bright_white().bold()
    );

    let generated = DateTime::parse_from_rfc3339(&graph.graph.generated_at)
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| graph.graph.generated_at.clone());
    println!("{} {}", "Generated:".bright_blue(), generated);

    println!("{}", "Captures:".bright_blue());
    for capture in &graph.graph.captures {
        println!("  {}", capture);
    }

    println!("{}", "Top ports:".bright_blue());
    for (port, count) in port_counts(graph).into_iter().take(10) {
        println!("  {:>6} {}", port.yellow(), count);
    }
    println!();
}
