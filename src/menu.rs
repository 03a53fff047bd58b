// Menu dispatcher: show the options, read one selection and run exactly
// one command. The menu is shown again only for a number that is not an
// option; anything that isn't a number ends the run with an error.

use anyhow::Result;
use thiserror::Error;

use crate::input::{collect_fields, Console};
use crate::ops;
use crate::store::RecordStore;

const MENU: &str = "CRUD operations\n\
1 - Create record\n\
2 - Read records\n\
3 - Update record\n\
4 - Delete record\n\
0 - Exit";

/// One menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Create,
    ReadAll,
    Update,
    Delete,
    Exit,
}

impl Command {
    /// Map a menu number to its command, `None` if it isn't on the menu.
    pub fn from_selection(n: i64) -> Option<Self> {
        match n {
            1 => Some(Command::Create),
            2 => Some(Command::ReadAll),
            3 => Some(Command::Update),
            4 => Some(Command::Delete),
            0 => Some(Command::Exit),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MenuError {
    #[error("Option must be an integer, got {0:?}")]
    NotANumber(String),
}

/// Parse the raw menu input. Surrounding whitespace is ignored.
pub fn parse_selection(raw: &str) -> Result<i64, MenuError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| MenuError::NotANumber(raw.trim().to_string()))
}

/// Run the menu once against `store`. Returns after the first command
/// that is on the menu has finished.
pub fn run<S, C>(store: &S, console: &mut C) -> Result<()>
where
    S: RecordStore + ?Sized,
    C: Console + ?Sized,
{
    loop {
        console.say(MENU)?;
        let raw = console.ask("Select your option")?;
        let n = parse_selection(&raw)?;
        match Command::from_selection(n) {
            Some(cmd) => return execute(cmd, store, console),
            None => {
                tracing::debug!(selection = n, "selection not on the menu");
                console.say(&format!("Unknown option {n}"))?;
            }
        }
    }
}

/// Run a single command.
pub fn execute<S, C>(cmd: Command, store: &S, console: &mut C) -> Result<()>
where
    S: RecordStore + ?Sized,
    C: Console + ?Sized,
{
    tracing::debug!(?cmd, "dispatch");
    match cmd {
        Command::Create => {
            let fields = collect_fields(console)?;
            ops::create_record(store, console, fields)?;
        }
        Command::ReadAll => {
            ops::read_all(store, console)?;
        }
        Command::Update => {
            ops::update_record(store, console)?;
        }
        Command::Delete => {
            ops::delete_record(store, console)?;
        }
        Command::Exit => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selections_map_to_commands() {
        assert_eq!(Command::from_selection(1), Some(Command::Create));
        assert_eq!(Command::from_selection(2), Some(Command::ReadAll));
        assert_eq!(Command::from_selection(3), Some(Command::Update));
        assert_eq!(Command::from_selection(4), Some(Command::Delete));
        assert_eq!(Command::from_selection(0), Some(Command::Exit));
        assert_eq!(Command::from_selection(5), None);
        assert_eq!(Command::from_selection(-1), None);
    }

    #[test]
    fn parse_selection_accepts_padded_numbers() {
        assert_eq!(parse_selection(" 3 "), Ok(3));
        assert_eq!(parse_selection("0"), Ok(0));
    }

    #[test]
    fn parse_selection_rejects_text() {
        assert_eq!(
            parse_selection("abc"),
            Err(MenuError::NotANumber("abc".into()))
        );
        assert!(parse_selection("").is_err());
        assert!(parse_selection("1.5").is_err());
    }
}
