//! Selection scanners behind `printSum` and `printDuration`.
//!
//! Each selection of a snapshot classifies as a value or as an empty slot. The first
//! empty slot becomes the target that receives the computed string; the rest must be
//! values for the command to succeed.

mod duration;
mod sum;

pub use duration::{DurationResult, parse_time, scan_duration};
pub use sum::{SumResult, parse_number, scan_sum};

use chrono::NaiveTime;

use crate::document::Position;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(f64),
    Time(NaiveTime),
    Empty,
}

/// A classified selection and where it sits in the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionToken {
    pub token: Token,
    pub position: Position,
}

/// Every classified selection in selection order plus the chosen target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scan {
    pub tokens: Vec<SelectionToken>,
    pub target: Option<Position>,
}

impl Scan {
    /// Folds classified selections; `None` marks a selection that is neither a value nor empty.
    /// The first `Empty` token wins the target, later ones are kept but ignored.
    pub fn fold(items: impl IntoIterator<Item = Option<SelectionToken>>) -> Self {
        items
            .into_iter()
            .flatten()
            .fold(Scan::default(), |mut scan, item| {
                if item.token == Token::Empty && scan.target.is_none() {
                    scan.target = Some(item.position);
                }
                scan.tokens.push(item);
                scan
            })
    }

    pub fn numbers(&self) -> Vec<f64> {
        self.tokens
            .iter()
            .filter_map(|t| match t.token {
                Token::Number(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    pub fn times(&self) -> Vec<NaiveTime> {
        self.tokens
            .iter()
            .filter_map(|t| match t.token {
                Token::Time(time) => Some(time),
                _ => None,
            })
            .collect()
    }
}
