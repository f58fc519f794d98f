use chrono::{NaiveTime, Timelike};

use super::{Scan, SelectionToken, Token};
use crate::document::{Position, Selection, TextDocument};
use crate::error::{JournalError, JournalResult};

pub const WRONG_SELECTION_COUNT: &str =
    "Select exactly three ranges: a start time, an end time and an empty target.";
pub const NO_START: &str = "No valid start time selected";
pub const NO_END: &str = "No valid end time selected";
pub const NO_TARGET: &str = "No valid target selected for printing the duration.";

/// Two times in chronological order and where the duration goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationResult {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub target: Position,
}

impl DurationResult {
    pub fn hours(&self) -> f64 {
        (self.end - self.start).num_seconds().abs() as f64 / 3600.0
    }

    /// Hours with exactly two fraction digits, e.g. `"1.50"`. Halves round up.
    pub fn formatted(&self) -> String {
        format!("{:.2}", (self.hours() * 100.0).round() / 100.0)
    }
}

/// Classifies three selections into a start time, an end time and an empty target.
///
/// Each selection's text is tried as a short time (`9:00`, `09:00:30`, `5:30 pm`), then
/// as a glued meridiem time (`123pm`), then as a glued 24-hour time (`2330`). A selection
/// that is none of these and blank becomes the target.
pub fn scan_duration(
    document: &TextDocument,
    selections: &[Selection],
) -> JournalResult<DurationResult> {
    if selections.len() != 3 {
        return Err(JournalError::validation(WRONG_SELECTION_COUNT));
    }

    let scan = Scan::fold(selections.iter().map(|selection| {
        let text = document.text_in(selection);
        let position = selection.start();
        match parse_time(text) {
            Some(time) => Some(SelectionToken {
                token: Token::Time(time),
                position,
            }),
            None if text.trim().is_empty() => Some(SelectionToken {
                token: Token::Empty,
                position,
            }),
            None => None,
        }
    }));

    let times = scan.times();
    let first = *times
        .first()
        .ok_or_else(|| JournalError::validation(NO_START))?;
    let second = *times
        .get(1)
        .ok_or_else(|| JournalError::validation(NO_END))?;
    let target = scan
        .target
        .ok_or_else(|| JournalError::validation(NO_TARGET))?;

    Ok(DurationResult {
        start: first.min(second),
        end: first.max(second),
        target,
    })
}

/// Parses one selection's text as a time of day.
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    let lower = s.trim().to_ascii_lowercase();
    if lower.is_empty() {
        return None;
    }
    parse_short_time(&lower)
        .or_else(|| parse_glued_meridiem(&lower))
        .or_else(|| parse_glued_24h(&lower))
}

/// "HH:MM" or "HH:MM:SS", optionally followed by am/pm.
fn parse_short_time(s: &str) -> Option<NaiveTime> {
    let (core, is_pm) = split_meridiem(s);
    if !core.contains(':') {
        return None;
    }
    let time = NaiveTime::parse_from_str(core, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(core, "%H:%M"))
        .ok()?;
    match is_pm {
        None => Some(time),
        Some(is_pm) => to_24h(time.hour(), time.minute(), time.second(), is_pm),
    }
}

/// "5pm", "123pm", "1230am": the digits before the marker are `H`, `HH`, `Hmm` or `HHmm`.
fn parse_glued_meridiem(s: &str) -> Option<NaiveTime> {
    let (digits, Some(is_pm)) = split_meridiem(s) else {
        return None;
    };
    if !(1..=4).contains(&digits.len()) || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (h, m) = if digits.len() <= 2 {
        (digits, "0")
    } else {
        digits.split_at(digits.len() - 2)
    };
    to_24h(h.parse().ok()?, m.parse().ok()?, 0, is_pm)
}

/// "930", "2330".
fn parse_glued_24h(s: &str) -> Option<NaiveTime> {
    if !(3..=4).contains(&s.len()) || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (h, m) = s.split_at(s.len() - 2);
    NaiveTime::from_hms_opt(h.parse().ok()?, m.parse().ok()?, 0)
}

/// Strips a trailing am/pm marker. `Some(true)` means pm.
fn split_meridiem(s: &str) -> (&str, Option<bool>) {
    if let Some(core) = s.strip_suffix("am") {
        (core.trim_end(), Some(false))
    } else if let Some(core) = s.strip_suffix("pm") {
        (core.trim_end(), Some(true))
    } else {
        (s, None)
    }
}

fn to_24h(h: u32, m: u32, s: u32, is_pm: bool) -> Option<NaiveTime> {
    if h == 0 || h > 12 {
        return None;
    }
    let h24 = match (h, is_pm) {
        (12, false) => 0, // 12am is midnight
        (12, true) => 12, // 12pm is noon
        (_, true) => h + 12,
        (_, false) => h,
    };
    NaiveTime::from_hms_opt(h24, m, s)
}
