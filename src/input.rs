use std::path::PathBuf;

use crate::{config::Config, error::Result, metadata::Metadata};

pub(crate) mod form;
pub(crate) mod menu;

pub(crate) use form::FormInput;
pub(crate) use menu::MenuInput;

/// Everything the user picked for one new note.
#[derive(Debug, Clone)]
pub(crate) struct Selection {
    pub directory: PathBuf,
    pub template: PathBuf,
    pub filename: String,
    pub metadata: Metadata,
}

pub(crate) trait InputSource {
    fn collect(&mut self, config: &Config) -> Result<Selection>;
}
