use std::io;

use anyhow::Context;
use clap::{command, Arg, ArgAction, ArgMatches, Command};
use config::Config;
use input::{menu::MenuArgs, FormInput, InputSource, MenuInput};
use log::info;

mod app;
mod config;
mod editor;
mod error;
mod input;
mod metadata;
mod scanner;
mod template;
mod writer;

const AFTER_HELP: &str = "\
Environment Variables:
  OBSIDIAN_VAULT       Path to your Obsidian vault directory (required)
  OBSIDIAN_TEMPLATES   Path to your Obsidian templates directory (required)
  NOTE_EDITOR          Editor to open the note with: nvim, vim, nano, hx, code (default: nvim)
  NOTE_TAGS_FILE       JSON list of tags offered by --form (default: $OBSIDIAN_VAULT/tags.json)

Examples:
  note
  note -n 'my-new-note' -t 'rust,notes' -a 'rust notes'
  note --form";

fn cli() -> Command {
    command!()
        .name("note")
        .about("Create a note in your Obsidian vault from a template and open it in your editor")
        .after_help(AFTER_HELP)
        .args([
            Arg::new("name")
                .short('n')
                .long("name")
                .value_name("NAME")
                .help("Name of the note"),
            Arg::new("tags")
                .short('t')
                .long("tags")
                .value_name("TAGS")
                .help("Tags for the note (comma-separated)"),
            Arg::new("aliases")
                .short('a')
                .long("aliases")
                .value_name("ALIASES")
                .help("Aliases for the note (comma-separated)"),
            Arg::new("form")
                .short('f')
                .long("form")
                .action(ArgAction::SetTrue)
                .conflicts_with_all(["name", "tags", "aliases"])
                .help("Fill in the note details in a full-screen form"),
        ])
}

fn menu_args(matches: &ArgMatches) -> MenuArgs {
    MenuArgs {
        name: matches.get_one::<String>("name").cloned(),
        tags: matches.get_one::<String>("tags").cloned(),
        aliases: matches.get_one::<String>("aliases").cloned(),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let matches = cli().get_matches();
    let config = Config::from_env()?;
    info!("Using vault {:?}", config.vault_dir);

    let mut input: Box<dyn InputSource> = if matches.get_flag("form") {
        Box::new(FormInput)
    } else {
        Box::new(MenuInput::new(io::stdin().lock(), io::stdout(), menu_args(&matches)))
    };

    let path = app::create_note(&config, input.as_mut()).context("while creating note")?;
    println!("\nCreated note at {}", path.display());

    println!("Opening note...");
    let status = editor::launch(config.editor, &path)?;
    if !status.success() {
        std::process::exit(status.code().unwrap_or(1));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn test_menu_flags() {
        let matches = cli()
            .try_get_matches_from(["note", "-n", "my-new-note", "--tags", "rust,notes"])
            .unwrap();
        let args = menu_args(&matches);

        assert_eq!(args.name.as_deref(), Some("my-new-note"));
        assert_eq!(args.tags.as_deref(), Some("rust,notes"));
        assert_eq!(args.aliases, None);
        assert!(!matches.get_flag("form"));
    }

    #[test]
    fn test_form_conflicts_with_menu_flags() {
        let err = cli()
            .try_get_matches_from(["note", "--form", "-n", "x"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_help_mentions_environment() {
        let help = cli().render_help().to_string();
        assert!(help.contains("OBSIDIAN_VAULT"));
        assert!(help.contains("--aliases"));
    }
}
