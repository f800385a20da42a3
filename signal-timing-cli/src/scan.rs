//! Directory scanning
//!
//! Collects every `*.dat` file under a directory (extension matched without
//! regard to case) and decodes them on the rayon pool. A file that cannot be
//! read becomes an error row instead of aborting the scan.

use anyhow::{Context, Result};
use rayon::prelude::*;
use signal_timing::{DatDecoder, DatSummary};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Outcome of decoding one file
pub type ScanOutcome = std::result::Result<DatSummary, String>;

/// All DAT files below `dir`, sorted by path
///
/// Symlinks are not followed, so a link back up the tree cannot list the
/// same file twice.
pub fn find_dat_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();

    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry.with_context(|| format!("Failed to read directory: {:?}", dir))?;
        if entry.file_type().is_file() && is_dat_file(entry.path()) {
            found.push(entry.into_path());
        }
    }

    found.sort();
    log::debug!("Found {} DAT files under {:?}", found.len(), dir);
    Ok(found)
}

fn is_dat_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("dat"))
}

/// Decode every DAT file below `dir` in parallel, preserving path order
pub fn scan_directory(dir: &Path) -> Result<Vec<(PathBuf, ScanOutcome)>> {
    let files = find_dat_files(dir)?;

    let rows = files
        .into_par_iter()
        .map(|path| {
            let outcome = DatDecoder::decode_file(&path).map_err(|e| {
                log::warn!("Skipping {:?}: {}", path, e);
                e.to_string()
            });
            (path, outcome)
        })
        .collect();
    Ok(rows)
}
