use std::{
    path::Path,
    process::{Command, ExitStatus, Stdio},
};

use log::{info, warn};

use crate::error::{NoteError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Editor {
    #[default]
    Neovim,
    Vim,
    Nano,
    Helix,
    VsCode,
}

impl Editor {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "nvim" | "neovim" => Some(Editor::Neovim),
            "vim" => Some(Editor::Vim),
            "nano" => Some(Editor::Nano),
            "hx" | "helix" => Some(Editor::Helix),
            "code" | "vscode" => Some(Editor::VsCode),
            _ => None,
        }
    }

    /// Unset or unrecognized preferences fall back to the default editor.
    pub fn from_preference(pref: Option<&str>) -> Self {
        match pref.filter(|p| !p.trim().is_empty()) {
            None => Editor::default(),
            Some(name) => Editor::from_name(name).unwrap_or_else(|| {
                warn!("Unknown editor {name:?}, falling back to {:?}", Editor::default());
                Editor::default()
            }),
        }
    }

    pub fn program(self) -> &'static str {
        match self {
            Editor::Neovim => "nvim",
            Editor::Vim => "vim",
            Editor::Nano => "nano",
            Editor::Helix => "hx",
            Editor::VsCode => "code",
        }
    }

    pub fn command(self, path: &Path) -> Command {
        let mut cmd = Command::new(self.program());
        match self {
            // open at the top, centered, in insert mode
            Editor::Neovim => {
                cmd.arg("+ normal ggzzi").arg(path).args(["-c", ":ZenMode"]);
            }
            Editor::VsCode => {
                cmd.arg("--wait").arg(path);
            }
            Editor::Vim | Editor::Nano | Editor::Helix => {
                cmd.arg(path);
            }
        }
        cmd
    }
}

fn run_attached(mut cmd: Command, program: &'static str) -> Result<ExitStatus> {
    cmd.stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|source| NoteError::EditorLaunch { program, source })
}

/// Runs the editor on `path` attached to this terminal and waits for it.
pub(crate) fn launch(editor: Editor, path: &Path) -> Result<ExitStatus> {
    info!("Opening {path:?} with {}", editor.program());
    let status = run_attached(editor.command(path), editor.program())?;
    if !status.success() {
        warn!("{} exited with {status}", editor.program());
    }
    Ok(status)
}
