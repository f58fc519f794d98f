//! In-memory snapshot of a text file plus editor-style positions and selections.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};

/// Numbers (`12`, `3.75`) first, then any run of word characters.
static WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?|\w+").expect("word pattern is valid"));

/// Zero-based line and character (Unicode scalar value) index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

/// Shown one-based, the way editors number lines and columns.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.character + 1)
    }
}

/// A selection runs from `anchor` (where it started) to `active` (the cursor).
/// Either end may come first in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Position,
    pub active: Position,
}

impl Selection {
    pub fn new(anchor: Position, active: Position) -> Self {
        Self { anchor, active }
    }

    /// An empty selection, i.e. a bare cursor.
    pub fn cursor(position: Position) -> Self {
        Self::new(position, position)
    }

    pub fn start(&self) -> Position {
        self.anchor.min(self.active)
    }

    pub fn end(&self) -> Position {
        self.anchor.max(self.active)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDocument {
    path: PathBuf,
    text: String,
}

impl TextDocument {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Line content without its terminator.
    pub fn line(&self, line: usize) -> Option<&str> {
        self.text
            .split('\n')
            .nth(line)
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
    }

    /// Byte offset of `position`. Characters past the end of a line clamp to the line end,
    /// lines past the end of the document clamp to the document end.
    pub fn offset_at(&self, position: Position) -> usize {
        let mut offset = 0;
        for (n, line) in self.text.split('\n').enumerate() {
            if n == position.line {
                let content = line.strip_suffix('\r').unwrap_or(line);
                let within = content
                    .char_indices()
                    .nth(position.character)
                    .map(|(i, _)| i)
                    .unwrap_or(content.len());
                return offset + within;
            }
            offset += line.len() + 1;
        }
        self.text.len()
    }

    pub fn text_in(&self, selection: &Selection) -> &str {
        let start = self.offset_at(selection.start());
        let end = self.offset_at(selection.end());
        &self.text[start..end]
    }

    /// The number or word touching `position`, if any.
    pub fn word_range_at(&self, position: Position) -> Option<Selection> {
        let line = self.line(position.line)?;
        WORD.find_iter(line).find_map(|m| {
            let start = line[..m.start()].chars().count();
            let end = start + m.as_str().chars().count();
            (start <= position.character && position.character <= end).then(|| {
                Selection::new(
                    Position::new(position.line, start),
                    Position::new(position.line, end),
                )
            })
        })
    }

    /// A new snapshot with `text` inserted at `position`.
    pub fn insert(&self, position: Position, text: &str) -> TextDocument {
        let at = self.offset_at(position);
        let mut updated = self.text.clone();
        updated.insert_str(at, text);
        TextDocument::new(self.path.clone(), updated)
    }

    /// A new snapshot with the text between the ends of `selection` replaced by `text`.
    pub fn replace(&self, selection: &Selection, text: &str) -> TextDocument {
        let start = self.offset_at(selection.start());
        let end = self.offset_at(selection.end());
        let mut updated = self.text.clone();
        updated.replace_range(start..end, text);
        TextDocument::new(self.path.clone(), updated)
    }

    /// A new snapshot with `line` added as the last line.
    pub fn append_line(&self, line: &str) -> TextDocument {
        let mut updated = self.text.clone();
        if !updated.is_empty() && !updated.ends_with('\n') {
            updated.push('\n');
        }
        updated.push_str(line);
        updated.push('\n');
        TextDocument::new(self.path.clone(), updated)
    }
}

/// The active document and its selections, captured once when a command starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSnapshot {
    pub document: TextDocument,
    pub selections: Vec<Selection>,
}

impl EditorSnapshot {
    pub fn new(document: TextDocument, selections: Vec<Selection>) -> Self {
        Self {
            document,
            selections,
        }
    }

    /// The first selection, where single-cursor commands act.
    pub fn primary(&self) -> Option<&Selection> {
        self.selections.first()
    }
}
