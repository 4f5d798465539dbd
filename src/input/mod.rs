//! Capture discovery and loading for the binary. The core pipeline only
//! ever sees the normalized lines produced here.

use crate::error::Result;
use crate::parser::normalize_line;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CAPTURE_DIR_VAR: &str = "NETWORKVIS";
const DEFAULT_CAPTURE_DIR: &str = ".network_vis";

/// Picks the capture directory: explicit setting, then `NETWORKVIS`, then
/// `~/.network_vis`.
pub fn capture_dir(input_dir: Option<&Path>) -> Option<PathBuf> {
    resolve_capture_dir(
        input_dir,
        env::var_os(CAPTURE_DIR_VAR).map(PathBuf::from),
        env::var_os("HOME").map(PathBuf::from),
    )
}

fn resolve_capture_dir(
    input_dir: Option<&Path>,
    from_env: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(dir) = input_dir {
        return Some(dir.to_path_buf());
    }
    from_env
        .filter(|dir| !dir.as_os_str().is_empty())
        .or_else(|| home.map(|home| home.join(DEFAULT_CAPTURE_DIR)))
}

/// Files in `dir` with the given extension, sorted by path.
pub fn find_capture_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if path.is_file() && matches {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Reads a capture file as normalized lines.
pub fn read_capture(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).lines().map(normalize_line).collect())
}

/// Loads every file, keyed by its path.
pub fn load_captures(files: &[PathBuf]) -> Result<BTreeMap<String, Vec<String>>> {
    let mut captures = BTreeMap::new();
    for path in files {
        let lines = read_capture(path)?;
        log::debug!("Read {} lines from {}", lines.len(), path.display());
        captures.insert(path.display().to_string(), lines);
    }
    Ok(captures)
}
