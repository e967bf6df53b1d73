use std::path::Path;

use log::debug;

use crate::error::{NoteError, Result};

const NOTE_EXTENSION: &str = ".md";

fn list_entries(
    root: &Path,
    keep: impl Fn(&std::fs::DirEntry, &str) -> bool,
) -> Result<Vec<String>> {
    let unreadable = |source| NoteError::UnreadableDir {
        path: root.to_owned(),
        source,
    };

    let mut names = vec![];
    for entry in std::fs::read_dir(root).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let name = entry.file_name().to_string_lossy().to_string();
        if keep(&entry, &name) {
            names.push(name);
        }
    }

    if names.is_empty() {
        return Err(NoteError::NoCandidates(root.to_owned()));
    }
    names.sort();
    debug!("Candidates in {root:?}: {names:?}");
    Ok(names)
}

/// Subdirectories of the vault whose name starts with a digit.
pub(crate) fn list_note_dirs(root: &Path) -> Result<Vec<String>> {
    list_entries(root, |entry, name| {
        entry.file_type().map_or(false, |t| t.is_dir())
            && name.starts_with(|c: char| c.is_ascii_digit())
    })
}

pub(crate) fn list_templates(root: &Path) -> Result<Vec<String>> {
    list_entries(root, |entry, name| {
        entry.file_type().map_or(false, |t| !t.is_dir()) && name.ends_with(NOTE_EXTENSION)
    })
}
