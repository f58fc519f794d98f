use super::{Scan, SelectionToken, Token};
use crate::document::{Position, Selection, TextDocument};
use crate::error::{JournalError, JournalResult};

pub const TOO_FEW_NUMBERS: &str = "You have to select at least two numbers";
pub const NO_TARGET: &str = "No valid target selected for printing the sum.";

/// The numbers in selection order and where their sum goes.
#[derive(Debug, Clone, PartialEq)]
pub struct SumResult {
    pub numbers: Vec<f64>,
    pub target: Position,
}

impl SumResult {
    pub fn total(&self) -> f64 {
        self.numbers.iter().sum()
    }

    /// Shortest decimal form of the total: `12`, `7.5`.
    pub fn formatted(&self) -> String {
        self.total().to_string()
    }
}

/// Classifies the word under each cursor as a number or as an empty slot.
///
/// A cursor with no word under it, or with a word that is not a non-negative number,
/// is an empty slot; the first one receives the sum.
pub fn scan_sum(document: &TextDocument, selections: &[Selection]) -> JournalResult<SumResult> {
    let scan = Scan::fold(selections.iter().map(|selection| {
        let position = selection.active;
        let number = document
            .word_range_at(position)
            .and_then(|word| parse_number(document.text_in(&word)));
        Some(SelectionToken {
            token: number.map_or(Token::Empty, Token::Number),
            position,
        })
    }));

    let numbers = scan.numbers();
    if numbers.len() < 2 {
        return Err(JournalError::validation(TOO_FEW_NUMBERS));
    }
    let target = scan
        .target
        .ok_or_else(|| JournalError::validation(NO_TARGET))?;
    Ok(SumResult { numbers, target })
}

/// A finite, non-negative decimal.
pub fn parse_number(s: &str) -> Option<f64> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n >= 0.0)
}
