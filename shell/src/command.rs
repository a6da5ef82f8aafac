use std::fmt;

pub const HELP: &str = "\
Type text and press Enter to add a todo.
  /toggle N   flip completion of row N
  /edit N     edit the text of row N: the next line is the new text,
              or /cancel; other /commands wait until the edit is done
  /delete N   remove row N
  /reload     fetch the list again
  /html       print the list as HTML
  /help       show this help
  /quit       exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text: fill the input field and press Enter.
    Add(String),
    Toggle(usize),
    Edit(usize),
    Delete(usize),
    Reload,
    Html,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Unknown(String),
    MissingRow(&'static str),
    BadRow(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Unknown(name) => write!(f, "unknown command /{name} (try /help)"),
            CommandError::MissingRow(name) => write!(f, "/{name} needs a row number"),
            CommandError::BadRow(raw) => write!(f, "not a row number: {raw}"),
        }
    }
}

impl std::error::Error for CommandError {}

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let Some(rest) = line.trim_start().strip_prefix('/') else {
        return Ok(Command::Add(line.to_string()));
    };
    let mut words = rest.split_whitespace();
    let name = words.next().unwrap_or_default();
    let arg = words.next();
    match name {
        "toggle" => row("toggle", arg).map(Command::Toggle),
        "edit" => row("edit", arg).map(Command::Edit),
        "delete" => row("delete", arg).map(Command::Delete),
        "reload" => Ok(Command::Reload),
        "html" => Ok(Command::Html),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn row(name: &'static str, arg: Option<&str>) -> Result<usize, CommandError> {
    let raw = arg.ok_or(CommandError::MissingRow(name))?;
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::BadRow(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_an_add() {
        assert_eq!(parse("Buy milk"), Ok(Command::Add("Buy milk".to_string())));
        assert_eq!(parse(""), Ok(Command::Add(String::new())));
        assert_eq!(parse("  "), Ok(Command::Add("  ".to_string())));
    }

    #[test]
    fn row_commands() {
        assert_eq!(parse("/toggle 2"), Ok(Command::Toggle(2)));
        assert_eq!(parse(" /edit 1 "), Ok(Command::Edit(1)));
        assert_eq!(parse("/delete 10"), Ok(Command::Delete(10)));
        assert_eq!(parse("/delete"), Err(CommandError::MissingRow("delete")));
        assert_eq!(parse("/toggle 0"), Err(CommandError::BadRow("0".to_string())));
        assert_eq!(parse("/toggle x"), Err(CommandError::BadRow("x".to_string())));
    }

    #[test]
    fn other_commands() {
        assert_eq!(parse("/reload"), Ok(Command::Reload));
        assert_eq!(parse("/html"), Ok(Command::Html));
        assert_eq!(parse("/exit"), Ok(Command::Quit));
        assert_eq!(parse("/frobnicate"), Err(CommandError::Unknown("frobnicate".to_string())));
    }
}
