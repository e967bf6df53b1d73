use std::path::PathBuf;

use log::debug;

use crate::{
    config::Config,
    error::Result,
    input::InputSource,
    template::{read_template, render},
    writer::write_note,
};

/// Gathers the user's choices, renders the template and writes the note.
/// Returns the absolute path of the new note.
pub(crate) fn create_note(config: &Config, input: &mut dyn InputSource) -> Result<PathBuf> {
    let selection = input.collect(config)?;

    let template = read_template(&selection.template)?;
    let content = render(&template, &selection.metadata);
    debug!("Rendered {} bytes from {:?}", content.len(), selection.template);

    write_note(&selection.directory, &selection.filename, &content)
}
