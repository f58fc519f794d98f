use chrono::{Datelike, Days, Local, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

use crate::error::{JournalError, JournalResult};
use crate::keywords::{Keyword, Keywords};

/// Default accepted input date formats (parsing only).
const DEFAULT_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d"];

static SIGNED_OFFSET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]\d+$").expect("offset pattern is valid"));

/// `<date part> <word>: <text>`. The word decides whether this is a note, a memo or a task.
static CLAUSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^(?P<head>[^:]*?)\s*(?P<word>[^\s:]+)\s*:\s*(?P<text>.*)$")
        .expect("clause pattern is valid")
});

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A day entry, `offset` days away from today.
    Plain(PlainInput),
    /// A file the user picked directly.
    Selected(SelectedInput),
    /// A new note for today.
    Note(NoteInput),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainInput {
    pub offset: i64,
    /// Line to add to the entry once it is loaded (`memo: ...`, `task: ...`).
    pub clause: Option<Clause>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub flag: Flag,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Memo,
    Task,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedInput {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteInput {
    pub title: String,
}

impl PlainInput {
    pub fn with_offset(offset: i64) -> Self {
        Self {
            offset,
            clause: None,
        }
    }

    /// The calendar day this input points at.
    pub fn date(&self, today: NaiveDate) -> JournalResult<NaiveDate> {
        let days = Days::new(self.offset.unsigned_abs());
        let date = if self.offset >= 0 {
            today.checked_add_days(days)
        } else {
            today.checked_sub_days(days)
        };
        date.ok_or_else(|| {
            JournalError::resolution(format!(
                "{} days from {today} is outside the calendar",
                self.offset
            ))
        })
    }
}

impl Input {
    pub fn today() -> Self {
        Input::Plain(PlainInput::with_offset(0))
    }
}

/// Configuration options for parsing functions.
#[derive(Copy, Clone, Debug, Default)]
pub struct ParseOptions<'a> {
    /// The date to use as "today" for relative keywords.
    pub reference_date: Option<NaiveDate>,
    /// A slice of `chrono` format strings to try for parsing dates.
    pub formats: Option<&'a [&'a str]>,
}

/// Parses what the user typed into an [`Input`].
///
/// Grammar, keywords are case-insensitive and honour configured synonyms:
///
/// ```text
/// note: <title>                 a new note for today
/// [<date>] [task|todo|memo: <text>]
///
/// <date> := ""                  today
///         | +N | -N             N days from today
///         | today | yesterday | tomorrow
///         | [next|last] <weekday>
///         | a literal in one of the input date formats (2026-10-18)
/// ```
///
/// A bare weekday is the most recent such day, today included. `next` is strictly
/// after today and `last` strictly before it.
///
/// Anything else is a [`JournalError::Resolution`]. Paths are not recognized here;
/// picking an existing file is the caller's fallback.
///
/// # Examples
///
/// ```
/// # use chrono::NaiveDate;
/// # use daybook_core::parse_input::{parse_input, Input, PlainInput, ParseOptions};
/// let opts = ParseOptions {
///     reference_date: Some(NaiveDate::from_ymd_opt(2026, 10, 12).unwrap()), // a Monday
///     ..Default::default()
/// };
///
/// let input = parse_input("next wednesday", Some(opts)).unwrap();
/// assert_eq!(input, Input::Plain(PlainInput::with_offset(2)));
/// ```
pub fn parse_input(raw: &str, options: Option<ParseOptions>) -> JournalResult<Input> {
    let text = raw.trim();

    let Some(caps) = CLAUSE.captures(text) else {
        return parse_date_part(text, options)
            .map(|offset| Input::Plain(PlainInput::with_offset(offset)));
    };

    let head = caps["head"].trim();
    let word = &caps["word"];
    let body = caps["text"].trim();
    let flag = match Keywords::lookup(word) {
        Some(Keyword::Note) => {
            if !head.is_empty() {
                return Err(JournalError::resolution(
                    "Notes are always created for today; remove the date before 'note:'",
                ));
            }
            if body.is_empty() {
                return Err(JournalError::resolution("A note needs a title"));
            }
            return Ok(Input::Note(NoteInput {
                title: body.to_string(),
            }));
        }
        Some(Keyword::Task | Keyword::Todo) => Flag::Task,
        Some(Keyword::Memo) => Flag::Memo,
        _ => return Err(unrecognized(text)),
    };
    if body.is_empty() {
        return Err(JournalError::resolution(format!(
            "Nothing to add after '{word}:'"
        )));
    }

    let offset = parse_date_part(head, options)?;
    Ok(Input::Plain(PlainInput {
        offset,
        clause: Some(Clause {
            flag,
            text: body.to_string(),
        }),
    }))
}

fn parse_date_part(s: &str, options: Option<ParseOptions>) -> JournalResult<i64> {
    parse_offset(s, options).ok_or_else(|| unrecognized(s))
}

fn unrecognized(s: &str) -> JournalError {
    JournalError::resolution(format!(
        "'{s}' is not an offset, a date, a weekday or a note"
    ))
}

/// Parses a date expression into a day offset relative to the reference date.
///
/// Understands, in order: the empty string, signed offsets (`+3`, `-1`), the
/// relative keywords `today`, `yesterday`, `tomorrow` (and their synonyms),
/// optionally qualified weekday names, and finally any of the `formats`.
///
/// # Examples
///
/// ```
/// # use chrono::NaiveDate;
/// # use daybook_core::parse_input::{parse_offset, ParseOptions};
/// let opts = ParseOptions {
///     reference_date: Some(NaiveDate::from_ymd_opt(2025, 8, 17).unwrap()),
///     formats: Some(&["%Y-%m-%d"]),
/// };
///
/// assert_eq!(parse_offset("yesterday", Some(opts)), Some(-1));
/// assert_eq!(parse_offset("+3", Some(opts)), Some(3));
/// assert_eq!(parse_offset("2025-08-20", Some(opts)), Some(3));
/// assert_eq!(parse_offset("soon", Some(opts)), None);
/// ```
pub fn parse_offset(s: &str, options: Option<ParseOptions>) -> Option<i64> {
    let options = options.unwrap_or_default();
    let reference_date = options
        .reference_date
        .unwrap_or_else(|| Local::now().date_naive());
    let formats = options.formats.unwrap_or(DEFAULT_FORMATS);
    let s = s.trim();

    if s.is_empty() {
        return Some(0);
    }
    if SIGNED_OFFSET.is_match(s) {
        // `i64::from_str` accepts a leading `+`.
        return s.parse::<i64>().ok();
    }

    let words: Vec<&str> = s.split_whitespace().collect();
    match words.as_slice() {
        [word] => match Keywords::lookup(word) {
            Some(Keyword::Today) => return Some(0),
            Some(Keyword::Yesterday) => return Some(-1),
            Some(Keyword::Tomorrow) => return Some(1),
            Some(keyword) => {
                if let Some(weekday) = keyword.weekday() {
                    return Some(weekday_offset(reference_date.weekday(), weekday, None));
                }
            }
            None => {}
        },
        [qualifier, word] => {
            let qualifier = Keywords::lookup(qualifier)
                .filter(|k| matches!(k, Keyword::Next | Keyword::Last));
            let weekday = Keywords::lookup(word).and_then(Keyword::weekday);
            if let (Some(qualifier), Some(weekday)) = (qualifier, weekday) {
                return Some(weekday_offset(
                    reference_date.weekday(),
                    weekday,
                    Some(qualifier),
                ));
            }
        }
        _ => {}
    }

    // Fallback to formatted dates
    formats
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .map(|date| date.signed_duration_since(reference_date).num_days())
        .next()
}

/// Days from `today` to the `target` weekday.
///
/// - no qualifier: the most recent `target`, today included (`-6..=0`)
/// - `next`: the first `target` strictly after today (`1..=7`)
/// - `last`: the last `target` strictly before today (`-7..=-1`)
fn weekday_offset(today: Weekday, target: Weekday, qualifier: Option<Keyword>) -> i64 {
    let ahead = (7 + target.num_days_from_monday() - today.num_days_from_monday()) % 7;
    let behind = (7 - ahead) % 7;
    match qualifier {
        Some(Keyword::Next) if ahead == 0 => 7,
        Some(Keyword::Next) => ahead as i64,
        Some(Keyword::Last) if behind == 0 => -7,
        _ => -(behind as i64),
    }
}
