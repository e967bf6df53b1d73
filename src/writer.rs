use std::{
    fs::OpenOptions,
    io::{ErrorKind, Write},
    path::{Component, Path, PathBuf},
};

use log::{info, warn};

use crate::error::{NoteError, Result};

/// A filename must stay a single plain component of the chosen directory.
fn check_filename(filename: &str) -> Result<()> {
    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(NoteError::InvalidFilename(filename.to_string())),
    }
}

/// Writes `content` to the freshly created `path`, removing it again on failure.
fn fill_or_remove<W: Write>(path: &Path, mut out: W, content: &[u8]) -> Result<()> {
    if let Err(e) = out.write_all(content) {
        drop(out);
        if let Err(rm) = std::fs::remove_file(path) {
            warn!("Could not remove partially written {path:?}: {rm}");
        }
        return Err(NoteError::io(path, e));
    }
    Ok(())
}

/// Creates `directory/<filename>.md` with `content`, refusing to overwrite.
pub(crate) fn write_note(directory: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    check_filename(filename)?;
    let path = directory.join(format!("{filename}.md"));

    let fd = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => NoteError::AlreadyExists(path.clone()),
            _ => NoteError::io(&path, e),
        })?;
    fill_or_remove(&path, fd, content.as_bytes())?;

    let path = path.canonicalize().map_err(|e| NoteError::io(&path, e))?;
    info!("Created note {path:?}");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_write_new_note() {
        let temp = TempDir::new().unwrap();
        let path = write_note(temp.path(), "my-entry", "# my entry\n").unwrap();

        assert!(path.is_absolute());
        assert_eq!(path.file_name().unwrap(), "my-entry.md");
        assert_eq!(fs::read_to_string(&path).unwrap(), "# my entry\n");
    }

    #[test]
    fn test_existing_note_is_never_overwritten() {
        let temp = TempDir::new().unwrap();
        let existing = temp.path().join("taken.md");
        fs::write(&existing, "original content").unwrap();

        let err = write_note(temp.path(), "taken", "new content").unwrap_err();

        assert!(matches!(err, NoteError::AlreadyExists(ref p) if *p == existing));
        assert_eq!(fs::read_to_string(&existing).unwrap(), "original content");
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let temp = TempDir::new().unwrap();
        let err = write_note(&temp.path().join("missing"), "a", "x").unwrap_err();
        assert!(matches!(err, NoteError::Io { .. }));
    }

    #[test]
    fn test_filename_cannot_leave_directory() {
        let temp = TempDir::new().unwrap();
        let vault = temp.path().join("vault");
        fs::create_dir(&vault).unwrap();
        let outside = temp.path().join("escaped");

        for name in [outside.to_str().unwrap(), "../x", "sub/x", "..", ""] {
            let err = write_note(&vault, name, "x").unwrap_err();
            assert!(matches!(err, NoteError::InvalidFilename(_)), "{name:?}");
        }
        assert!(!outside.with_extension("md").exists());
        assert!(!temp.path().join("x.md").exists());
        assert_eq!(fs::read_dir(&vault).unwrap().count(), 0);
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_partial_note_is_removed_on_write_failure() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("half.md");
        fs::write(&path, "").unwrap();

        let err = fill_or_remove(&path, FailingWriter, b"# half\n").unwrap_err();

        assert!(matches!(err, NoteError::Io { .. }));
        assert!(!path.exists());
    }
}
