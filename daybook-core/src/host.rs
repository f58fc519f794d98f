//! What the front-end has to provide: prompting, showing documents and notifications.

use std::future::Future;
use std::path::{Path, PathBuf};

use crate::document::TextDocument;
use crate::error::JournalResult;

/// A document the front-end has put in front of the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorHandle {
    pub path: PathBuf,
}

pub trait Host {
    /// Asks the user for a line of text. Dismissing the prompt is [`JournalError::Cancelled`].
    ///
    /// [`JournalError::Cancelled`]: crate::JournalError::Cancelled
    fn get_user_input(&self, prompt: &str) -> impl Future<Output = JournalResult<String>> + Send;

    fn show_document(
        &self,
        document: &TextDocument,
    ) -> impl Future<Output = JournalResult<EditorHandle>> + Send;

    fn open_folder(&self, path: &Path) -> impl Future<Output = JournalResult<()>> + Send;

    /// Shows an error notification. Returns `true` when the user asked to see the logs.
    fn show_error_message(&self, message: &str) -> impl Future<Output = bool> + Send;

    fn show_log_channel(&self) -> impl Future<Output = JournalResult<()>> + Send;
}
