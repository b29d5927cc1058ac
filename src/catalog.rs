//! Weekly roster workbooks found in the data folder

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

use crate::error::RosterError;
use crate::roster::normalize_text;

const ROSTER_EXTENSIONS: [&str; 2] = [".xlsx", ".xls"];

/// A roster workbook on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterFile {
    /// NFC-normalised file name, as shown to the user
    pub name: String,
    /// Path as returned by the file system (may be NFD on macOS)
    pub path: PathBuf,
}

impl RosterFile {
    /// Build from a path given directly on the command line
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| normalize_text(&n.to_string_lossy()))
            .unwrap_or_default();
        Self {
            name,
            path: path.to_path_buf(),
        }
    }

    /// File name without its workbook extension, used in titles
    pub fn label(&self) -> String {
        file_label(&self.name)
    }
}

/// Strip a trailing `.xlsx` / `.xls` (any case)
pub fn file_label(name: &str) -> String {
    match ROSTER_EXTENSIONS.iter().find(|ext| has_suffix(name, ext)) {
        Some(ext) => name[..name.len() - ext.len()].to_string(),
        None => name.to_string(),
    }
}

fn has_suffix(name: &str, ext: &str) -> bool {
    name.len()
        .checked_sub(ext.len())
        .and_then(|cut| name.get(cut..))
        .is_some_and(|tail| tail.eq_ignore_ascii_case(ext))
}

fn is_roster_name(name: &str) -> bool {
    ROSTER_EXTENSIONS.iter().any(|ext| has_suffix(name, ext))
}

/// List roster workbooks in `dir`, sorted by name. The folder is created when missing.
pub fn list_roster_files(dir: &Path) -> Result<Vec<RosterFile>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create data folder: {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)
        .with_context(|| format!("Failed to list data folder: {}", dir.display()))?
    {
        let entry = entry?;
        let raw_name = entry.file_name();
        let name = normalize_text(&raw_name.to_string_lossy());
        if !is_roster_name(&name) || !entry.path().is_file() {
            continue;
        }
        files.push(RosterFile {
            name,
            path: entry.path(),
        });
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    debug!("found {} roster file(s) in {}", files.len(), dir.display());

    if files.is_empty() {
        return Err(RosterError::EmptyCatalog(dir.to_path_buf()).into());
    }

    Ok(files)
}

/// Find a roster by its displayed name, or treat `name` as a path
pub fn resolve(dir: &Path, name: &str) -> Result<RosterFile> {
    let direct = Path::new(name);
    if direct.is_file() {
        return Ok(RosterFile::from_path(direct));
    }

    let wanted = normalize_text(name);
    list_roster_files(dir)?
        .into_iter()
        .find(|f| f.name == wanted || f.label() == wanted)
        .ok_or_else(|| RosterError::UnknownFile(name.to_string()).into())
}
