use anyhow::{bail, Context};
use netgraph::analysis::process_captures;
use netgraph::graph::{to_node_link, write_node_link, ConnectionGraph};
use netgraph::{config, input};
use simplelog::*;

fn main() -> anyhow::Result<()> {
    // Setup logging; narrowed to Info below unless debug is enabled
    CombinedLogger::init(vec![TermLogger::new(
        LevelFilter::Debug,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )])?;

    let settings = config::load_settings();
    if !settings.debug {
        log::set_max_level(LevelFilter::Info);
    }

    let Some(dir) = input::capture_dir(settings.input_dir.as_deref()) else {
        bail!("cannot find any files! Did you export {}?", input::CAPTURE_DIR_VAR);
    };
    let files = input::find_capture_files(&dir, &settings.file_extension)
        .with_context(|| format!("cannot list captures in {}", dir.display()))?;
    if files.is_empty() {
        bail!(
            "cannot find any files in {}! Did you export {}?",
            dir.display(),
            input::CAPTURE_DIR_VAR
        );
    }
    log::debug!("Capture files: {:?}", files);

    let captures = input::load_captures(&files).context("error opening capture file")?;

    let mut graph = ConnectionGraph::new();
    let reports = process_captures(&mut graph, &captures, settings.host_identity.as_deref())
        .context("graph construction aborted")?;

    let skipped: usize = reports.iter().map(|r| r.skipped_lines()).sum();
    if skipped > 0 {
        log::warn!("{} malformed lines skipped across {} captures", skipped, reports.len());
    }

    let document = to_node_link(&graph).context("graph export aborted")?;
    log::debug!("Nodes: {:?}", document.nodes);
    log::debug!("Links: {:?}", document.links);
    write_node_link(&document, &settings.output_path, settings.pretty)
        .with_context(|| format!("cannot write {}", settings.output_path.display()))?;

    Ok(())
}
