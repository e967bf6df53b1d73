#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Metadata {
    pub title: String,
    pub tags: Vec<String>,
    pub aliases: Vec<String>,
}

impl Metadata {
    pub fn new(title: impl Into<String>, tags: Vec<String>, aliases: Vec<String>) -> Self {
        Self {
            title: title.into(),
            tags,
            aliases,
        }
    }
}

/// Filenames are written `kebab-case`; titles read them back with spaces.
pub(crate) fn title_from_filename(filename: &str) -> String {
    filename.replace('-', " ")
}

/// Splits a comma-separated flag value, dropping blank entries.
pub(crate) fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
