//! Work enumeration and partitioning.
//!
//! The input corpus is enumerated once, sorted, and split into one contiguous chunk per
//! worker. Chunk sizes differ by at most one; the first `len % workers` chunks carry the extra
//! unit. Concatenating the chunks in worker order reproduces the sorted list exactly.

use crate::io;
use crate::ops::error::Error;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Splits `units` into exactly `worker_count` contiguous chunks.
///
/// When there are more workers than units, the surplus chunks are empty.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`] when `worker_count` is zero.
pub fn partition<T>(units: &[T], worker_count: usize) -> Result<Vec<&[T]>, Error> {
    if worker_count == 0 {
        return Err(Error::invalid_config("worker count must be at least 1"));
    }

    let base = units.len() / worker_count;
    let remainder = units.len() % worker_count;

    let mut chunks = Vec::with_capacity(worker_count);
    let mut start = 0;
    for worker in 0..worker_count {
        let len = base + usize::from(worker < remainder);
        chunks.push(&units[start..start + len]);
        start += len;
    }

    Ok(chunks)
}

/// Lists every regular file below `root`, recursively, in sorted path order.
///
/// # Arguments
///
/// * `root` - Corpus directory.
/// * `extension` - When set, only files with this extension (without the dot) are kept.
/// * `excluded` - Files or directories left out of the listing, such as the combined output
///   and the scratch root of an earlier run. Paths that do not exist are ignored.
///
/// # Errors
///
/// Returns [`Error::Io`] when `root` or one of its subdirectories cannot be read.
pub fn enumerate_work_units(
    root: &Path,
    extension: Option<&str>,
    excluded: &[&Path],
) -> Result<Vec<PathBuf>, Error> {
    let excluded: Vec<PathBuf> = excluded
        .iter()
        .filter_map(|path| fs::canonicalize(path).ok())
        .collect();
    let is_excluded = |path: &Path| {
        !excluded.is_empty()
            && fs::canonicalize(path).is_ok_and(|resolved| excluded.contains(&resolved))
    };

    let mut units = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries =
            fs::read_dir(&dir).map_err(|e| io::Error::from_io(e, Some(dir.clone())))?;
        for entry in entries {
            let entry = entry.map_err(|e| io::Error::from_io(e, Some(dir.clone())))?;
            let path = entry.path();
            let file_type = entry
                .file_type()
                .map_err(|e| io::Error::from_io(e, Some(path.clone())))?;

            if is_excluded(&path) {
                debug!("Not enumerating '{}'", path.display());
                continue;
            }
            if file_type.is_dir() {
                pending.push(path);
            } else if path.is_file() && matches_extension(&path, extension) {
                units.push(path);
            }
        }
    }

    units.sort();
    Ok(units)
}

fn matches_extension(path: &Path, extension: Option<&str>) -> bool {
    match extension {
        None => true,
        Some(wanted) => path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted.trim_start_matches('.'))),
    }
}
