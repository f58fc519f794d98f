use crate::Config;
use crate::config::{Patterns, Templates};
use crate::document::TextDocument;
use crate::error::{JournalError, JournalResult};
use crate::host::{EditorHandle, Host};
use chrono::{Local, NaiveDate};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Test helper to create a default `Config` for testing purposes.
///
/// This is the single source of truth for test configuration.
/// If you add a field to `Config`, you only need to update it here.
pub fn mk_config(tmp_dir: PathBuf, reference_date: Option<NaiveDate>) -> Config {
    Config {
        base_path: tmp_dir,
        editor: None,
        ext: "md".to_string(),
        date_format: "%A, %d %b %Y".to_string(),
        time_format: "%H:%M".to_string(),
        input_date_formats: vec!["%Y-%m-%d".to_string(), "%Y%m%d".to_string()],
        reference_date: reference_date.unwrap_or(Local::now().date_naive()),
        patterns: Patterns::default(),
        templates: Templates::default(),
    }
}

/// A scripted host: answers prompts from a queue and records everything it is asked to show.
///
/// An exhausted queue answers like a dismissed prompt.
#[derive(Debug, Default)]
pub struct MockHost {
    answers: Mutex<VecDeque<JournalResult<String>>>,
    shown: Mutex<Vec<PathBuf>>,
    folders: Mutex<Vec<PathBuf>>,
    errors: Mutex<Vec<String>>,
    view_logs: bool,
    log_views: AtomicUsize,
}

impl MockHost {
    pub fn answering(answers: impl IntoIterator<Item = JournalResult<String>>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Every error notification gets its "view logs" button clicked.
    pub fn viewing_logs(mut self) -> Self {
        self.view_logs = true;
        self
    }

    pub fn shown(&self) -> Vec<PathBuf> {
        self.shown.lock().unwrap().clone()
    }

    pub fn folders(&self) -> Vec<PathBuf> {
        self.folders.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn log_views(&self) -> usize {
        self.log_views.load(Ordering::SeqCst)
    }
}

impl Host for MockHost {
    async fn get_user_input(&self, _prompt: &str) -> JournalResult<String> {
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(JournalError::Cancelled))
    }

    async fn show_document(&self, document: &TextDocument) -> JournalResult<EditorHandle> {
        let path = document.path().to_path_buf();
        self.shown.lock().unwrap().push(path.clone());
        Ok(EditorHandle { path })
    }

    async fn open_folder(&self, path: &Path) -> JournalResult<()> {
        self.folders.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    async fn show_error_message(&self, message: &str) -> bool {
        self.errors.lock().unwrap().push(message.to_string());
        self.view_logs
    }

    async fn show_log_channel(&self) -> JournalResult<()> {
        self.log_views.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
