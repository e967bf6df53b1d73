use std::{
    io::{self, Stdout},
    path::Path,
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, info};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
    Terminal,
};
use serde::Deserialize;

use crate::{
    config::Config,
    error::{NoteError, Result},
    metadata::{split_list, Metadata},
    scanner,
};

use super::{InputSource, Selection};

#[derive(Deserialize)]
#[serde(untagged)]
enum TagsFile {
    List(Vec<String>),
    Object { tags: Vec<String> },
}

/// Reads the selectable tags. A missing file just means no tags to offer.
pub(crate) fn load_tag_choices(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        info!("Tags file({path:?}) does not exist. ignoring...");
        return Ok(vec![]);
    }
    let tags_error = |reason: String| NoteError::TagsFile {
        path: path.to_owned(),
        reason,
    };

    let raw = std::fs::read_to_string(path).map_err(|e| tags_error(e.to_string()))?;
    let tags = match serde_json::from_str(&raw).map_err(|e| tags_error(e.to_string()))? {
        TagsFile::List(tags) | TagsFile::Object { tags } => tags,
    };
    debug!("Loaded {} tag choices", tags.len());
    Ok(tags)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Filename,
    Location,
    Metadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Dirs,
    Templates,
    Tags,
    Aliases,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum FormOutcome {
    Continue,
    Submit,
    Abort,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct FormAnswers {
    pub filename: String,
    pub dir: usize,
    pub template: usize,
    pub tags: Vec<String>,
    pub aliases: Vec<String>,
}

/// Key handling for the three form steps, kept apart from drawing.
#[derive(Debug)]
pub(crate) struct FormState {
    step: Step,
    focus: Focus,
    filename: String,
    dirs: Vec<String>,
    templates: Vec<String>,
    tags: Vec<String>,
    dir: usize,
    template: usize,
    tag_cursor: usize,
    picked: Vec<bool>,
    aliases: String,
    error: Option<String>,
}

impl FormState {
    pub fn new(dirs: Vec<String>, templates: Vec<String>, tags: Vec<String>) -> Self {
        let picked = vec![false; tags.len()];
        Self {
            step: Step::Filename,
            focus: Focus::Dirs,
            filename: String::new(),
            dirs,
            templates,
            tags,
            dir: 0,
            template: 0,
            tag_cursor: 0,
            picked,
            aliases: String::new(),
            error: None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormOutcome {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if key.code == KeyCode::Esc || (ctrl && key.code == KeyCode::Char('c')) {
            return FormOutcome::Abort;
        }

        match self.step {
            Step::Filename => match key.code {
                KeyCode::Enter => {
                    if self.filename.trim().is_empty() {
                        self.error = Some("Filename cannot be empty".to_string());
                    } else {
                        self.error = None;
                        self.step = Step::Location;
                        self.focus = Focus::Dirs;
                    }
                }
                KeyCode::Backspace => {
                    self.filename.pop();
                }
                KeyCode::Char(c) if !ctrl => self.filename.push(c),
                _ => {}
            },
            Step::Location => match key.code {
                KeyCode::Tab | KeyCode::BackTab => {
                    self.focus = match self.focus {
                        Focus::Dirs => Focus::Templates,
                        _ => Focus::Dirs,
                    };
                }
                KeyCode::Up => self.move_cursor(-1),
                KeyCode::Down => self.move_cursor(1),
                KeyCode::Enter if self.focus == Focus::Dirs => self.focus = Focus::Templates,
                KeyCode::Enter => {
                    self.step = Step::Metadata;
                    self.focus = if self.tags.is_empty() {
                        Focus::Aliases
                    } else {
                        Focus::Tags
                    };
                }
                _ => {}
            },
            Step::Metadata => match (key.code, self.focus) {
                (KeyCode::Enter, _) => return FormOutcome::Submit,
                (KeyCode::Tab | KeyCode::BackTab, Focus::Tags) => self.focus = Focus::Aliases,
                (KeyCode::Tab | KeyCode::BackTab, _) if !self.tags.is_empty() => {
                    self.focus = Focus::Tags
                }
                (KeyCode::Up, Focus::Tags) => self.move_cursor(-1),
                (KeyCode::Down, Focus::Tags) => self.move_cursor(1),
                (KeyCode::Char(' '), Focus::Tags) => {
                    if let Some(p) = self.picked.get_mut(self.tag_cursor) {
                        *p = !*p;
                    }
                }
                (KeyCode::Backspace, Focus::Aliases) => {
                    self.aliases.pop();
                }
                (KeyCode::Char(c), Focus::Aliases) if !ctrl => self.aliases.push(c),
                _ => {}
            },
        }
        FormOutcome::Continue
    }

    fn move_cursor(&mut self, delta: isize) {
        let (cursor, len) = match self.focus {
            Focus::Dirs => (&mut self.dir, self.dirs.len()),
            Focus::Templates => (&mut self.template, self.templates.len()),
            Focus::Tags => (&mut self.tag_cursor, self.tags.len()),
            Focus::Aliases => return,
        };
        if len > 0 {
            *cursor = (*cursor as isize + delta).clamp(0, len as isize - 1) as usize;
        }
    }

    pub fn into_answers(self) -> FormAnswers {
        let tags = self
            .tags
            .into_iter()
            .zip(self.picked)
            .filter_map(|(tag, picked)| picked.then_some(tag))
            .collect();
        FormAnswers {
            filename: self.filename.trim().to_string(),
            dir: self.dir,
            template: self.template,
            tags,
            aliases: split_list(&self.aliases),
        }
    }
}

fn item_style(selected: bool, focused: bool) -> Style {
    match (selected, focused) {
        (true, true) => Style::default().bg(Color::Blue).fg(Color::White),
        (true, false) => Style::default().add_modifier(Modifier::BOLD),
        _ => Style::default(),
    }
}

fn section(title: &str, focused: bool) -> Block<'_> {
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);
    if focused {
        block.border_style(Style::default().fg(Color::Yellow))
    } else {
        block
    }
}

fn draw_list(
    frame: &mut ratatui::Frame,
    area: Rect,
    title: &str,
    choices: &[String],
    cursor: usize,
    focused: bool,
) {
    let items: Vec<ListItem> = choices
        .iter()
        .enumerate()
        .map(|(i, c)| ListItem::new(c.as_str()).style(item_style(i == cursor, focused)))
        .collect();
    frame.render_widget(List::new(items).block(section(title, focused)), area);
}

fn draw_text_field(frame: &mut ratatui::Frame, area: Rect, title: &str, value: &str, focused: bool) {
    let cursor = if focused { "_" } else { "" };
    let text = Paragraph::new(format!("{value}{cursor}")).block(section(title, focused));
    frame.render_widget(text, area);
}

fn draw(frame: &mut ratatui::Frame, state: &FormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let (step_no, heading) = match state.step {
        Step::Filename => (1, "Name the note"),
        Step::Location => (2, "Pick a directory and a template"),
        Step::Metadata => (3, "Tags and aliases"),
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                format!(" New note [{step_no}/3] "),
                Style::default().fg(Color::Black).bg(Color::Cyan),
            ),
            Span::raw(format!(" {heading}")),
        ])),
        chunks[0],
    );

    match state.step {
        Step::Filename => {
            let area = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(0)])
                .split(chunks[1]);
            draw_text_field(frame, area[0], "Filename", &state.filename, true);
        }
        Step::Location => {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(chunks[1]);
            draw_list(
                frame,
                cols[0],
                "Directory",
                &state.dirs,
                state.dir,
                state.focus == Focus::Dirs,
            );
            draw_list(
                frame,
                cols[1],
                "Template",
                &state.templates,
                state.template,
                state.focus == Focus::Templates,
            );
        }
        Step::Metadata => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(3), Constraint::Length(3)])
                .split(chunks[1]);
            let tags: Vec<String> = state
                .tags
                .iter()
                .zip(&state.picked)
                .map(|(tag, picked)| format!("[{}] {tag}", if *picked { "x" } else { " " }))
                .collect();
            draw_list(
                frame,
                rows[0],
                "Tags",
                &tags,
                state.tag_cursor,
                state.focus == Focus::Tags,
            );
            draw_text_field(
                frame,
                rows[1],
                "Aliases (comma-separated)",
                &state.aliases,
                state.focus == Focus::Aliases,
            );
        }
    }

    let footer = match &state.error {
        Some(msg) => Line::styled(format!(" {msg}"), Style::default().fg(Color::Red)),
        None => Line::styled(
            " Enter: next  Tab: switch field  Space: toggle tag  Esc: cancel",
            Style::default().fg(Color::DarkGray),
        ),
    };
    frame.render_widget(Paragraph::new(footer), chunks[2]);
}

/// Raw mode and the alternate screen, restored on drop.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

/// Runs `restore` when `setup` failed, passing the result through.
fn undo_on_error<T>(setup: io::Result<T>, restore: impl FnOnce()) -> io::Result<T> {
    if setup.is_err() {
        restore();
    }
    setup
}

fn leave_terminal() {
    execute!(io::stdout(), LeaveAlternateScreen).ok();
    disable_raw_mode().ok();
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().map_err(NoteError::Terminal)?;
        let setup = (|| -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen)?;
            Terminal::new(CrosstermBackend::new(stdout))
        })();
        let terminal = undo_on_error(setup, leave_terminal).map_err(NoteError::Terminal)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        disable_raw_mode().ok();
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen).ok();
        self.terminal.show_cursor().ok();
    }
}

fn run_form(state: &mut FormState) -> Result<FormOutcome> {
    let mut guard = TerminalGuard::enter()?;
    loop {
        guard
            .terminal
            .draw(|frame| draw(frame, state))
            .map_err(NoteError::Terminal)?;
        match event::read().map_err(NoteError::Terminal)? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match state.handle_key(key) {
                FormOutcome::Continue => {}
                outcome => return Ok(outcome),
            },
            _ => {}
        }
    }
}

/// Full-screen form flow.
#[derive(Debug, Default)]
pub(crate) struct FormInput;

impl InputSource for FormInput {
    fn collect(&mut self, config: &Config) -> Result<Selection> {
        let tags = load_tag_choices(&config.tags_file)?;
        let dirs = scanner::list_note_dirs(&config.vault_dir)?;
        let templates = scanner::list_templates(&config.templates_dir)?;

        let mut state = FormState::new(dirs.clone(), templates.clone(), tags);
        if run_form(&mut state)? == FormOutcome::Abort {
            return Err(NoteError::Aborted);
        }

        let answers = state.into_answers();
        let selection = Selection {
            directory: config.vault_dir.join(&dirs[answers.dir]),
            template: config.templates_dir.join(&templates[answers.template]),
            metadata: Metadata::new(answers.filename.clone(), answers.tags, answers.aliases),
            filename: answers.filename,
        };
        debug!("Form selection: {selection:?}");
        Ok(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::Cell, fs};
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(state: &mut FormState, text: &str) {
        for c in text.chars() {
            assert_eq!(state.handle_key(key(KeyCode::Char(c))), FormOutcome::Continue);
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> FormState {
        FormState::new(
            strings(&["01-journal", "02-projects"]),
            strings(&["daily.md", "meeting.md", "weekly.md"]),
            strings(&["rust", "cli", "ideas"]),
        )
    }

    #[test]
    fn test_full_walkthrough() {
        let mut state = sample();
        type_text(&mut state, "  release notes ");
        state.handle_key(key(KeyCode::Enter));
        assert_eq!(state.step, Step::Location);

        state.handle_key(key(KeyCode::Down));
        state.handle_key(key(KeyCode::Enter));
        state.handle_key(key(KeyCode::Down));
        state.handle_key(key(KeyCode::Down));
        state.handle_key(key(KeyCode::Down));
        state.handle_key(key(KeyCode::Enter));
        assert_eq!(state.step, Step::Metadata);

        state.handle_key(key(KeyCode::Char(' ')));
        state.handle_key(key(KeyCode::Down));
        state.handle_key(key(KeyCode::Down));
        state.handle_key(key(KeyCode::Char(' ')));
        state.handle_key(key(KeyCode::Tab));
        type_text(&mut state, "rn, changelog");
        assert_eq!(state.handle_key(key(KeyCode::Enter)), FormOutcome::Submit);

        assert_eq!(
            state.into_answers(),
            FormAnswers {
                filename: "release notes".to_string(),
                dir: 1,
                template: 2,
                tags: strings(&["rust", "ideas"]),
                aliases: strings(&["rn", "changelog"]),
            }
        );
    }

    #[test]
    fn test_blank_filename_does_not_advance() {
        let mut state = sample();
        type_text(&mut state, "   ");
        assert_eq!(state.handle_key(key(KeyCode::Enter)), FormOutcome::Continue);
        assert_eq!(state.step, Step::Filename);
        assert!(state.error.is_some());

        type_text(&mut state, "x");
        state.handle_key(key(KeyCode::Enter));
        assert_eq!(state.step, Step::Location);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_cancel_aborts_from_any_step() {
        let mut state = sample();
        assert_eq!(state.handle_key(key(KeyCode::Esc)), FormOutcome::Abort);

        type_text(&mut state, "a");
        state.handle_key(key(KeyCode::Enter));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(state.handle_key(ctrl_c), FormOutcome::Abort);
    }

    #[test]
    fn test_no_tag_choices_focuses_aliases() {
        let mut state = FormState::new(strings(&["1"]), strings(&["t.md"]), vec![]);
        type_text(&mut state, "a");
        state.handle_key(key(KeyCode::Enter));
        state.handle_key(key(KeyCode::Tab));
        state.handle_key(key(KeyCode::Enter));
        assert_eq!(state.focus, Focus::Aliases);

        state.handle_key(key(KeyCode::Tab));
        assert_eq!(state.focus, Focus::Aliases);
        assert_eq!(state.handle_key(key(KeyCode::Enter)), FormOutcome::Submit);
        assert!(state.into_answers().tags.is_empty());
    }

    #[test]
    fn test_load_tag_choices() {
        let temp = TempDir::new().unwrap();

        let list = temp.path().join("list.json");
        fs::write(&list, r#"["rust", "notes"]"#).unwrap();
        assert_eq!(load_tag_choices(&list).unwrap(), strings(&["rust", "notes"]));

        let object = temp.path().join("object.json");
        fs::write(&object, r#"{"tags": ["a"]}"#).unwrap();
        assert_eq!(load_tag_choices(&object).unwrap(), strings(&["a"]));

        assert!(load_tag_choices(&temp.path().join("missing.json")).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_tags_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tags.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(load_tag_choices(&path), Err(NoteError::TagsFile { .. })));
    }

    #[test]
    fn test_failed_terminal_setup_is_rolled_back() {
        let restored = Cell::new(false);
        let setup: io::Result<()> = Err(io::Error::new(io::ErrorKind::Other, "no tty"));

        assert!(undo_on_error(setup, || restored.set(true)).is_err());
        assert!(restored.get());

        let restored = Cell::new(false);
        assert_eq!(undo_on_error(Ok(7), || restored.set(true)).unwrap(), 7);
        assert!(!restored.get());
    }
}
