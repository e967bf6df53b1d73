use std::path::PathBuf;

use crate::{
    editor::Editor,
    error::{NoteError, Result},
};

pub(crate) const VAULT_ENV: &str = "OBSIDIAN_VAULT";
pub(crate) const TEMPLATES_ENV: &str = "OBSIDIAN_TEMPLATES";
pub(crate) const EDITOR_ENV: &str = "NOTE_EDITOR";
pub(crate) const TAGS_FILE_ENV: &str = "NOTE_TAGS_FILE";

const DEFAULT_TAGS_FILE: &str = "tags.json";

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub vault_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub editor: Editor,
    pub tags_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .ok_or(NoteError::MissingEnv(key))
        };

        let vault_dir = required(VAULT_ENV)?;
        let templates_dir = required(TEMPLATES_ENV)?;
        let editor = Editor::from_preference(lookup(EDITOR_ENV).as_deref());
        let tags_file = lookup(TAGS_FILE_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| vault_dir.join(DEFAULT_TAGS_FILE));

        Ok(Config {
            vault_dir,
            templates_dir,
            editor,
            tags_file,
        })
    }
}
