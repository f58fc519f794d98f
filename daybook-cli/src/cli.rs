use clap::{Parser, Subcommand};
use daybook_core::{Position, Selection};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

use crate::render::ColorMode;

static SELECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d+)(?:-(\d+):(\d+))?$").expect("selection pattern is valid")
});

/// daybook - dated Markdown journal and notes
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Journal directory, overrides `base_path` from the config file.
    #[arg(long, env = "DAYBOOK_DIR", global = true)]
    pub dir: Option<PathBuf>,
    /// Prints the journal root directory
    #[arg(long, short)]
    pub path: bool,
    /// Print the path of the opened file instead of launching $EDITOR.
    #[arg(long, global = true)]
    pub no_edit: bool,
    /// Control ANSI colors in output.
    /// By default, colors are disabled when output is redirected (e.g with `>` or `|`).
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Option<Command>,

    /// What to open (e.g. `daybook`, `daybook -1`, `daybook next friday`,
    /// `daybook task: call bob`, `daybook note: Team sync`). Prompts when empty.
    #[arg(allow_negative_numbers = true)]
    pub text: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Creates or opens today's note (e.g. `daybook note Team sync`). Prompts when empty.
    Note { title: Vec<String> },
    /// Opens the entry OFFSET days from today (e.g. `daybook entry -1`).
    Entry {
        #[arg(allow_negative_numbers = true)]
        offset: i64,
    },
    /// Opens the journal directory.
    Workspace,
    /// Sums the numbers under the cursors and writes the total at the first empty one.
    ///
    /// Cursors are LINE:COL, ranges LINE:COL-LINE:COL, both 1-based.
    Sum {
        file: PathBuf,
        #[arg(required = true, value_parser = parse_selection)]
        selections: Vec<Selection>,
    },
    /// Writes the hours between two selected times at the third, empty selection.
    Duration {
        file: PathBuf,
        #[arg(required = true, value_parser = parse_selection)]
        selections: Vec<Selection>,
    },
    /// Writes the current time at POS, replacing the range if one is given.
    Time {
        file: PathBuf,
        #[arg(value_parser = parse_selection)]
        position: Selection,
    },
    /// Prints the log file.
    Logs,
}

impl Cli {
    pub fn new() -> Self {
        Cli::parse()
    }
}

/// `3:5` is a cursor, `3:1-3:6` a range. Lines and columns count from 1.
pub fn parse_selection(s: &str) -> Result<Selection, String> {
    let caps = SELECTION
        .captures(s.trim())
        .ok_or_else(|| format!("'{s}' is not LINE:COL or LINE:COL-LINE:COL"))?;
    let number = |i: usize| -> Result<Option<usize>, String> {
        caps.get(i)
            .map(|m| {
                m.as_str()
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .ok_or_else(|| format!("'{s}': lines and columns start at 1"))
            })
            .transpose()
    };

    let anchor = match (number(1)?, number(2)?) {
        (Some(line), Some(col)) => Position::new(line, col),
        _ => return Err(format!("'{s}' is not LINE:COL")),
    };
    let active = match (number(3)?, number(4)?) {
        (Some(line), Some(col)) => Position::new(line, col),
        _ => anchor,
    };
    Ok(Selection::new(anchor, active))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn selections() {
        assert_eq!(
            parse_selection("2:1").unwrap(),
            Selection::cursor(Position::new(1, 0))
        );
        assert_eq!(
            parse_selection("1:1-1:6").unwrap(),
            Selection::new(Position::new(0, 0), Position::new(0, 5))
        );
        assert!(parse_selection("0:1").is_err());
        assert!(parse_selection("1").is_err());
        assert!(parse_selection("1:1-").is_err());
    }

    #[test]
    fn negative_offsets_are_text() {
        let cli = Cli::try_parse_from(["daybook", "-1"]).unwrap();
        assert_eq!(cli.text, vec!["-1"]);
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["daybook", "entry", "-2"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Entry { offset: -2 })));
    }

    #[test]
    fn subcommands_follow_global_flags() {
        let cli =
            Cli::try_parse_from(["daybook", "--no-edit", "sum", "f.md", "1:1", "2:1"]).unwrap();
        assert!(cli.no_edit);
        assert!(cli.text.is_empty());
        match cli.command {
            Some(Command::Sum { file, selections }) => {
                assert_eq!(file, PathBuf::from("f.md"));
                assert_eq!(selections.len(), 2);
            }
            other => panic!("expected sum, got {other:?}"),
        }

        let cli = Cli::try_parse_from(["daybook", "--color", "never", "workspace"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Workspace)));
    }

    #[test]
    fn clauses_are_not_subcommands() {
        let cli = Cli::try_parse_from(["daybook", "note:", "Team", "sync"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.text.join(" "), "note: Team sync");
    }
}
