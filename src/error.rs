use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum NoteError {
    #[error("{0} environment variable not set")]
    MissingEnv(&'static str),

    #[error("error reading directory {path:?}")]
    UnreadableDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no candidates found in {0:?}")]
    NoCandidates(PathBuf),

    #[error("invalid input: input stream closed")]
    InputClosed,

    #[error("note creation aborted")]
    Aborted,

    #[error("error reading from stdin")]
    Stdin(#[source] io::Error),

    #[error("error writing to stdout")]
    Stdout(#[source] io::Error),

    #[error("terminal i/o error")]
    Terminal(#[source] io::Error),

    #[error("invalid note filename {0:?}: must be a plain name inside the chosen directory")]
    InvalidFilename(String),

    #[error("file already exists: {0:?}")]
    AlreadyExists(PathBuf),

    #[error("i/o error on {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error loading tags from {path:?}: {reason}")]
    TagsFile { path: PathBuf, reason: String },

    #[error("failed to launch editor `{program}`")]
    EditorLaunch {
        program: &'static str,
        #[source]
        source: io::Error,
    },
}

impl NoteError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub(crate) type Result<T> = std::result::Result<T, NoteError>;
