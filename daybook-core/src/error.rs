//! Error taxonomy shared by every command.

use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

pub type JournalResult<T> = Result<T, JournalError>;

#[derive(Debug, Error)]
pub enum JournalError {
    /// The user dismissed a prompt. Commands absorb this and finish without a value.
    #[error("cancelled")]
    Cancelled,
    /// Selection preconditions of a scanner were not met.
    #[error("{0}")]
    Validation(String),
    /// User input could not be mapped to an entry, a note or a file.
    #[error("{0}")]
    Resolution(String),
    /// The file system or the host failed underneath a command.
    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),
}

impl JournalError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn resolution(message: impl Into<String>) -> Self {
        Self::Resolution(message.into())
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<std::io::Error> for JournalError {
    fn from(error: std::io::Error) -> Self {
        Self::Collaborator(error.into())
    }
}

/// What can be handed to the error display: a message, a message still being produced,
/// or an error.
pub enum ErrorReport {
    Message(String),
    Pending(Pin<Box<dyn Future<Output = String> + Send>>),
    Error(JournalError),
}

impl ErrorReport {
    pub fn pending(message: impl Future<Output = String> + Send + 'static) -> Self {
        Self::Pending(Box::pin(message))
    }

    /// The text to show, or `None` when there is nothing to report.
    pub async fn resolve(self) -> Option<String> {
        match self {
            Self::Message(message) => Some(message),
            Self::Pending(message) => Some(message.await),
            Self::Error(error) if error.is_cancelled() => None,
            Self::Error(error) => Some(format!("{error:#}")),
        }
    }
}

impl std::fmt::Debug for ErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Message(message) => f.debug_tuple("Message").field(message).finish(),
            Self::Pending(_) => f.write_str("Pending(..)"),
            Self::Error(error) => f.debug_tuple("Error").field(error).finish(),
        }
    }
}

impl From<&str> for ErrorReport {
    fn from(message: &str) -> Self {
        Self::Message(message.to_string())
    }
}

impl From<String> for ErrorReport {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

impl From<JournalError> for ErrorReport {
    fn from(error: JournalError) -> Self {
        Self::Error(error)
    }
}

impl From<anyhow::Error> for ErrorReport {
    fn from(error: anyhow::Error) -> Self {
        Self::Error(error.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[tokio::test]
    async fn reports_resolve_to_text() {
        assert_eq!(ErrorReport::from("plain").resolve().await.as_deref(), Some("plain"));
        let pending = ErrorReport::pending(async { "later".to_string() });
        assert_eq!(pending.resolve().await.as_deref(), Some("later"));
        let validation = ErrorReport::from(JournalError::validation("bad"));
        assert_eq!(validation.resolve().await.as_deref(), Some("bad"));
    }

    #[tokio::test]
    async fn cancellation_reports_nothing() {
        assert_eq!(ErrorReport::from(JournalError::Cancelled).resolve().await, None);
    }

    #[tokio::test]
    async fn collaborator_errors_keep_their_context() {
        let err: anyhow::Result<()> = Err(anyhow::anyhow!("denied")).context("writing x.md");
        let text = ErrorReport::from(err.unwrap_err()).resolve().await.unwrap();
        assert_eq!(text, "writing x.md: denied");
    }

    #[test]
    fn io_errors_are_collaborator_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(JournalError::from(io), JournalError::Collaborator(_)));
        assert!(JournalError::Cancelled.is_cancelled());
    }
}
