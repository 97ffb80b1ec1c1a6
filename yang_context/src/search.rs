//! Schema file search (spec §4.9): given search paths, a module name, and
//! an optional revision, locate a `<name>[@<revision>].{yang,yin}` file on
//! disk.

use std::path::PathBuf;

use yang_diagnostic::{Error, Result};
use yang_ir::{SchemaPath, SourceFormat};

/// A schema file located on disk, with its detected format (spec §6:
/// `.yang` -> YANG text, `.yin` -> YIN).
#[derive(Clone, Debug)]
pub struct FoundSchema {
    pub path: PathBuf,
    pub format: SourceFormat,
}

type Candidate = (PathBuf, SourceFormat, Option<String>);

/// Walk each of `search_paths` (and the current working directory, if
/// `include_cwd`), non-recursively, for a file matching `name`.
pub fn search_localfile(
    search_paths: &[PathBuf],
    include_cwd: bool,
    name: &str,
    revision: Option<&str>,
) -> Result<FoundSchema> {
    let mut dirs: Vec<PathBuf> = search_paths.to_vec();
    if include_cwd {
        if let Ok(cwd) = std::env::current_dir() {
            dirs.push(cwd);
        }
    }

    let mut candidates: Vec<Candidate> = Vec::new();
    for dir in &dirs {
        let Ok(entries) = std::fs::read_dir(dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if !file_type.is_file() {
                continue;
            }
            let path = entry.path();
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some((revision, format)) = match_filename(file_name, name) {
                candidates.push((path, format, revision));
            }
        }
    }

    let not_found = || Error::not_found(SchemaPath::root(name), format!("no schema file found for module '{name}'"));

    let chosen = match revision {
        Some(wanted) => candidates
            .iter()
            .find(|(_, _, rev)| rev.as_deref() == Some(wanted))
            .or_else(|| candidates.first())
            .cloned(),
        None => pick_latest(&candidates),
    };

    let Some((path, format, _)) = chosen else {
        return Err(not_found());
    };
    let path = path.canonicalize().unwrap_or(path);
    Ok(FoundSchema { path, format })
}

/// Match `<name>[@<revision>].{yang,yin}`, returning the revision text (if
/// any) and detected format.
fn match_filename(file_name: &str, name: &str) -> Option<(Option<String>, SourceFormat)> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    let format = SourceFormat::from_extension(ext)?;
    if let Some(rev) = stem.strip_prefix(name).and_then(|rest| rest.strip_prefix('@')) {
        return Some((Some(rev.to_string()), format));
    }
    if stem == name {
        return Some((None, format));
    }
    None
}

/// Among candidates without a requested revision: the dated candidate with
/// the lexicographically-newest (spec §4.8: `YYYY-MM-DD` dates sort
/// chronologically) revision, or an un-dated one only if no dated
/// candidate exists.
fn pick_latest(candidates: &[Candidate]) -> Option<Candidate> {
    candidates
        .iter()
        .filter(|(_, _, rev)| rev.is_some())
        .max_by(|a, b| a.2.cmp(&b.2))
        .or_else(|| candidates.first())
        .cloned()
}
