use std::{
    fmt,
    io::{BufRead, Write},
};

use log::debug;

use crate::{
    config::Config,
    error::{NoteError, Result},
    metadata::{split_list, title_from_filename, Metadata},
    scanner,
};

use super::{InputSource, Selection};

const DEFAULT_TAGS: [&str; 3] = ["tag1", "tag2", "tag3"];
const DEFAULT_ALIASES: [&str; 2] = ["aliases1", "aliases2"];

/// Values given on the command line; anything missing is prompted for or defaulted.
#[derive(Debug, Clone, Default)]
pub(crate) struct MenuArgs {
    pub name: Option<String>,
    pub tags: Option<String>,
    pub aliases: Option<String>,
}

/// Numbered-prompt flow over any line reader, usually stdin/stdout.
pub(crate) struct MenuInput<R, W> {
    reader: R,
    writer: W,
    args: MenuArgs,
}

impl<R: BufRead, W: Write> MenuInput<R, W> {
    pub fn new(reader: R, writer: W, args: MenuArgs) -> Self {
        Self {
            reader,
            writer,
            args,
        }
    }

    /// Undecodable bytes are replaced, so a garbled line just fails to parse.
    fn read_line(&mut self) -> Result<String> {
        let mut buf = vec![];
        if self
            .reader
            .read_until(b'\n', &mut buf)
            .map_err(NoteError::Stdin)?
            == 0
        {
            return Err(NoteError::InputClosed);
        }
        Ok(String::from_utf8_lossy(&buf).trim().to_string())
    }

    fn print(&mut self, args: fmt::Arguments) -> Result<()> {
        self.writer
            .write_fmt(args)
            .and_then(|_| self.writer.flush())
            .map_err(NoteError::Stdout)
    }

    fn prompt_filename(&mut self) -> Result<String> {
        loop {
            self.print(format_args!("Enter a filename: "))?;
            let text = self.read_line()?;
            if !text.is_empty() {
                return Ok(text);
            }
        }
    }

    /// Prints `choices` as a 1-based list and returns the picked index.
    fn select(&mut self, heading: &str, prompt: &str, choices: &[String]) -> Result<usize> {
        self.print(format_args!("\n{heading}:\n"))?;
        for (i, choice) in choices.iter().enumerate() {
            self.print(format_args!("{}: {}\n", i + 1, choice))?;
        }

        loop {
            self.print(format_args!("\n{prompt}: "))?;
            match self.read_line()?.parse::<usize>() {
                Ok(n) if (1..=choices.len()).contains(&n) => return Ok(n - 1),
                _ => self.print(format_args!(
                    "Please enter a number between 1 and {}\n",
                    choices.len()
                ))?,
            }
        }
    }

    fn metadata(&self, filename: &str) -> Metadata {
        let list_or = |flag: &Option<String>, default: &[&str]| match flag.as_deref() {
            Some(raw) if !raw.is_empty() => split_list(raw),
            _ => default.iter().map(|s| s.to_string()).collect(),
        };

        Metadata::new(
            title_from_filename(filename),
            list_or(&self.args.tags, &DEFAULT_TAGS[..]),
            list_or(&self.args.aliases, &DEFAULT_ALIASES[..]),
        )
    }
}

impl<R: BufRead, W: Write> InputSource for MenuInput<R, W> {
    fn collect(&mut self, config: &Config) -> Result<Selection> {
        let filename = match self.args.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.prompt_filename()?,
        };
        let metadata = self.metadata(&filename);

        let dirs = scanner::list_note_dirs(&config.vault_dir)?;
        let dir = self.select("Available directories", "Select dir number", &dirs)?;

        let templates = scanner::list_templates(&config.templates_dir)?;
        let template = self.select("Available templates", "Select template number", &templates)?;

        let selection = Selection {
            directory: config.vault_dir.join(&dirs[dir]),
            template: config.templates_dir.join(&templates[template]),
            filename,
            metadata,
        };
        debug!("Menu selection: {selection:?}");
        Ok(selection)
    }
}
