//! The command surface: every user-facing action runs through [`Journal`].

use anyhow::Context;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinSet;
use tracing::{debug, trace, warn};

use crate::config::Config;
use crate::document::{EditorSnapshot, TextDocument};
use crate::error::{ErrorReport, JournalError, JournalResult};
use crate::host::{EditorHandle, Host};
use crate::parse_input::{
    Clause, Flag, Input, NoteInput, ParseOptions, PlainInput, SelectedInput, parse_input,
};
use crate::paths::relative_link;
use crate::pipeline::{Invocation, Stage};
use crate::resolve::{Resolved, Resolver};
use crate::scanner::{scan_duration, scan_sum};
use crate::store::DocumentStore;
use crate::templates::{format_memo, format_note_link, format_task, format_time};

const INPUT_PROMPT: &str = "Entry (today, +1, next friday, 2026-10-18, task: ..., note: ...)";
const NOTE_PROMPT: &str = "Note title";
const NO_CURSOR: &str = "Place a cursor where the time should go";

/// The central struct for all journal commands.
///
/// Commands return `Ok(None)` when the user cancelled a prompt. Any other error has
/// already been logged when it reaches the caller.
pub struct Journal<H: Host> {
    config: Arc<Config>,
    store: DocumentStore,
    resolver: Resolver,
    host: H,
    background: Mutex<JoinSet<()>>,
}

impl<H: Host> Journal<H> {
    /// Creates a new `Journal`, making sure the base directory exists.
    pub fn new(config: Config, host: H) -> anyhow::Result<Self> {
        fs::create_dir_all(&config.base_path)
            .with_context(|| format!("creating {}", config.base_path.display()))?;
        let config = Arc::new(config);
        Ok(Self {
            store: DocumentStore::new(Arc::clone(&config)),
            resolver: Resolver::new(Arc::clone(&config)),
            config,
            host,
            background: Mutex::new(JoinSet::new()),
        })
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn base_path(&self) -> &Path {
        self.store.base_path()
    }

    /// The current time rendered with the `time` template.
    pub fn time_string(&self) -> String {
        format_time(Local::now().time(), &self.config)
    }

    /// Parses `raw`, falling back to an existing file named by it.
    pub async fn parse(&self, raw: &str) -> JournalResult<Input> {
        let formats: Vec<&str> = self
            .config
            .input_date_formats
            .iter()
            .map(AsRef::as_ref)
            .collect();
        let opts = ParseOptions {
            reference_date: Some(self.config.reference_date),
            formats: Some(&formats),
        };
        match parse_input(raw, Some(opts)) {
            Err(JournalError::Resolution(message)) => match self.store.find_existing(raw).await {
                Some(path) => Ok(Input::Selected(SelectedInput { path })),
                None => Err(JournalError::Resolution(message)),
            },
            parsed => parsed,
        }
    }

    /// Prompts until the host answers, then parses the answer.
    pub async fn input_with_validation(&self) -> JournalResult<Input> {
        let raw = self.host.get_user_input(INPUT_PROMPT).await?;
        self.parse(&raw).await
    }

    pub async fn open_document(&self, path: &Path) -> JournalResult<TextDocument> {
        Ok(self.store.open_document(path).await?)
    }

    /// Resolves `input` and opens its file, creating it from the template when needed.
    pub async fn load_entry_for_input(&self, input: &Input) -> JournalResult<TextDocument> {
        let resolved = self.resolver.resolve(input).await?;
        Ok(self.store.load(&resolved).await?)
    }

    /// Appends the memo or task line of `clause` to `document`.
    pub async fn inject_input(
        &self,
        document: &TextDocument,
        clause: &Clause,
    ) -> JournalResult<TextDocument> {
        let line = match clause.flag {
            Flag::Memo => format_memo(&clause.text, Local::now().time(), &self.config),
            Flag::Task => format_task(&clause.text, &self.config),
        };
        Ok(self.store.inject_line(document, &line).await?)
    }

    /// Opens the entry, note or file the user typed, prompting when `raw` is `None`.
    pub async fn process_input(&self, raw: Option<&str>) -> JournalResult<Option<EditorHandle>> {
        let mut run = Invocation::start("process_input");
        let result = async {
            run.enter(Stage::Parsing);
            let input = match raw {
                Some(raw) => self.parse(raw).await?,
                None => self.input_with_validation().await?,
            };
            self.open_input(&input, &mut run).await
        }
        .await;
        run.finish(result)
    }

    /// Creates or opens today's note titled `title`, prompting when it is `None`.
    pub async fn show_note(&self, title: Option<&str>) -> JournalResult<Option<EditorHandle>> {
        let mut run = Invocation::start("show_note");
        let result = async {
            run.enter(Stage::Parsing);
            let title = match title {
                Some(title) => title.to_string(),
                None => self.host.get_user_input(NOTE_PROMPT).await?,
            };
            let title = title.trim();
            if title.is_empty() {
                return Err(JournalError::resolution("A note needs a title"));
            }
            let input = Input::Note(NoteInput {
                title: title.to_string(),
            });
            self.open_input(&input, &mut run).await
        }
        .await;
        run.finish(result)
    }

    /// Opens the entry `offset` days away from today.
    pub async fn show_entry(&self, offset: i64) -> JournalResult<Option<EditorHandle>> {
        let mut run = Invocation::start("show_entry");
        let input = Input::Plain(PlainInput::with_offset(offset));
        let result = self.open_input(&input, &mut run).await;
        run.finish(result)
    }

    /// Opens the journal's base directory.
    pub async fn load_journal_workspace(&self) -> JournalResult<Option<PathBuf>> {
        let mut run = Invocation::start("load_journal_workspace");
        let result = async {
            run.enter(Stage::Loading);
            self.host.open_folder(self.base_path()).await?;
            Ok::<_, JournalError>(self.base_path().to_path_buf())
        }
        .await;
        run.finish(result)
    }

    /// Writes the sum of the selected numbers at the first empty selection.
    pub async fn print_sum(&self, snapshot: &EditorSnapshot) -> JournalResult<Option<String>> {
        let mut run = Invocation::start("print_sum");
        let result = async {
            run.enter(Stage::Parsing);
            let sum = scan_sum(&snapshot.document, &snapshot.selections)?;
            let text = sum.formatted();
            run.enter(Stage::Injecting);
            self.store
                .inject_string(&snapshot.document, &text, sum.target)
                .await?;
            Ok::<_, JournalError>(text)
        }
        .await;
        run.finish(result)
    }

    /// Writes the hours between the two selected times at the empty selection.
    pub async fn print_duration(&self, snapshot: &EditorSnapshot) -> JournalResult<Option<String>> {
        let mut run = Invocation::start("print_duration");
        let result = async {
            run.enter(Stage::Parsing);
            let duration = scan_duration(&snapshot.document, &snapshot.selections)?;
            let text = duration.formatted();
            run.enter(Stage::Injecting);
            self.store
                .inject_string(&snapshot.document, &text, duration.target)
                .await?;
            Ok::<_, JournalError>(text)
        }
        .await;
        run.finish(result)
    }

    /// Replaces the primary selection with the current time.
    pub async fn print_time(&self, snapshot: &EditorSnapshot) -> JournalResult<Option<String>> {
        let mut run = Invocation::start("print_time");
        let result = async {
            let selection = snapshot
                .primary()
                .ok_or_else(|| JournalError::validation(NO_CURSOR))?;
            let text = self.time_string();
            run.enter(Stage::Injecting);
            let updated = snapshot.document.replace(selection, &text);
            self.store.save(&updated).await?;
            Ok::<_, JournalError>(text)
        }
        .await;
        run.finish(result)
    }

    /// Shows `report` as an error notification, and the logs if the user asks for them.
    pub async fn show_error(&self, report: impl Into<ErrorReport>) {
        let Some(message) = report.into().resolve().await else {
            return;
        };
        if self.host.show_error_message(&message).await {
            if let Err(err) = self.host.show_log_channel().await {
                warn!("could not show the log: {err:#}");
            }
        }
    }

    /// Waits for detached work such as backlinks. Failures were already logged.
    pub async fn settle(&self) {
        let mut pending = std::mem::take(
            &mut *self
                .background
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        while let Some(joined) = pending.join_next().await {
            if let Err(err) = joined {
                warn!("background task did not finish: {err}");
            }
        }
    }

    async fn open_input(&self, input: &Input, run: &mut Invocation) -> JournalResult<EditorHandle> {
        run.enter(Stage::Resolving);
        let resolved = self.resolver.resolve(input).await?;
        debug!(path = %resolved.path.display(), created = resolved.content.is_some(), "resolved");

        run.enter(Stage::Loading);
        let document = {
            // Backlinks from earlier notes may still be writing to this entry.
            let _guard = self.store.lock(&resolved.path).await;
            let mut document = self.store.load(&resolved).await?;
            if let Input::Plain(PlainInput {
                clause: Some(clause),
                ..
            }) = input
            {
                run.enter(Stage::Injecting);
                document = self.inject_input(&document, clause).await?;
            }
            document
        };
        if let Input::Note(note) = input {
            self.spawn_backlink(note, &resolved.path);
        }

        self.host.show_document(&document).await
    }

    /// Adds a link to `note_path` to today's entry without waiting for it.
    fn spawn_backlink(&self, note: &NoteInput, note_path: &Path) {
        let entry = self.resolver.entry(self.resolver.today());
        if entry.path == note_path {
            warn!(path = %note_path.display(), "note and entry are the same file, no backlink");
            return;
        }
        let link = match entry.path.parent() {
            Some(dir) => relative_link(dir, note_path),
            None => note_path.display().to_string(),
        };
        let line = format_note_link(&note.title, &link, &self.config);
        let store = self.store.clone();

        self.background
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .spawn(async move {
                if let Err(err) = inject_backlink(&store, &entry, &line).await {
                    warn!(entry = %entry.path.display(), "backlink not added: {err:#}");
                }
            });
    }
}

async fn inject_backlink(store: &DocumentStore, entry: &Resolved, line: &str) -> anyhow::Result<()> {
    let _guard = store.lock(&entry.path).await;
    let document = store.load(entry).await?;
    if document.text().lines().any(|l| l.trim_end() == line) {
        trace!(entry = %entry.path.display(), "backlink already present");
        return Ok(());
    }
    store.inject_line(&document, line).await?;
    debug!(entry = %entry.path.display(), "backlink added");
    Ok(())
}
