use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;

use crate::config::Config;
use crate::error::JournalResult;
use crate::parse_input::{Input, NoteInput, PlainInput, SelectedInput};
use crate::paths::{entry_path, note_path};
use crate::templates::{format_entry, format_note};

/// Where an input leads and what to write there if the file has to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub path: PathBuf,
    pub content: Option<String>,
}

/// Maps inputs to files. Everything is relative to the configured reference date.
#[derive(Debug, Clone)]
pub struct Resolver {
    config: Arc<Config>,
}

impl Resolver {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    pub fn today(&self) -> NaiveDate {
        self.config.reference_date
    }

    /// The pure half of [`resolve`](Self::resolve): path and template content, ignoring
    /// whether the file exists.
    pub fn plan(&self, input: &Input) -> JournalResult<Resolved> {
        match input {
            Input::Plain(plain) => self.plan_entry(plain),
            Input::Note(note) => Ok(self.plan_note(note)),
            Input::Selected(selected) => Ok(Self::plan_selected(selected)),
        }
    }

    fn plan_entry(&self, plain: &PlainInput) -> JournalResult<Resolved> {
        let date = plain.date(self.today())?;
        Ok(self.entry(date))
    }

    fn plan_note(&self, note: &NoteInput) -> Resolved {
        Resolved {
            path: note_path(&self.config, &note.title, self.today()),
            content: Some(format_note(&note.title, self.today(), &self.config)),
        }
    }

    fn plan_selected(selected: &SelectedInput) -> Resolved {
        Resolved {
            path: selected.path.clone(),
            content: None,
        }
    }

    /// The entry of `date` with its default content.
    pub fn entry(&self, date: NaiveDate) -> Resolved {
        Resolved {
            path: entry_path(&self.config, date),
            content: Some(format_entry(date, &self.config)),
        }
    }

    /// Resolves `input` against the file system.
    ///
    /// - entries: content only when the file does not exist yet
    /// - notes: content always, the note is created explicitly
    /// - selected files: never any content
    pub async fn resolve(&self, input: &Input) -> JournalResult<Resolved> {
        match input {
            Input::Plain(plain) => {
                let mut resolved = self.plan_entry(plain)?;
                if fs::try_exists(&resolved.path).await? {
                    resolved.content = None;
                }
                Ok(resolved)
            }
            Input::Note(note) => {
                let (path, content) = tokio::join!(self.note_path(note), self.format_note(note));
                Ok(Resolved {
                    path,
                    content: Some(content),
                })
            }
            Input::Selected(selected) => Ok(Self::plan_selected(selected)),
        }
    }

    pub async fn note_path(&self, note: &NoteInput) -> PathBuf {
        note_path(&self.config, &note.title, self.today())
    }

    pub async fn format_note(&self, note: &NoteInput) -> String {
        format_note(&note.title, self.today(), &self.config)
    }
}
