use std::{path::Path, sync::OnceLock};

use log::debug;
use regex::{Captures, Regex};

use crate::{
    error::{NoteError, Result},
    metadata::Metadata,
};

static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();

fn placeholder() -> &'static Regex {
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{\{\s*(title|tags|aliases)\s*\}\}").unwrap())
}

/// Renders a list as front-matter entries, one `  - item` per line.
pub(crate) fn format_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("  - {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Substitutes `{{title}}`, `{{tags}}` and `{{aliases}}` in one pass.
/// Any other `{{...}}` marker is left for Obsidian's own templater.
pub(crate) fn render(template: &str, meta: &Metadata) -> String {
    let tags = format_list(&meta.tags);
    let aliases = format_list(&meta.aliases);

    placeholder()
        .replace_all(template, |caps: &Captures| match &caps[1] {
            "title" => meta.title.clone(),
            "tags" => tags.clone(),
            "aliases" => aliases.clone(),
            _ => caps[0].to_string(),
        })
        .into_owned()
}

pub(crate) fn read_template(path: &Path) -> Result<String> {
    debug!("Reading template {path:?}");
    std::fs::read_to_string(path).map_err(|e| NoteError::io(path, e))
}
