//! The terminal as a [`Host`]: stdin prompts, `$EDITOR`, and stderr notifications.

use anyhow::{Context, bail};
use daybook_core::{EditorHandle, Host, JournalError, JournalResult, TextDocument};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;

use crate::render::Renderer;

pub struct TerminalHost {
    editor: String,
    no_edit: bool,
    renderer: Renderer,
    log_path: Option<PathBuf>,
}

impl TerminalHost {
    pub fn new(
        editor: String,
        no_edit: bool,
        renderer: Renderer,
        log_path: Option<PathBuf>,
    ) -> Self {
        Self {
            editor,
            no_edit,
            renderer,
            log_path,
        }
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    async fn open_in_editor(&self, path: &Path) -> anyhow::Result<()> {
        let status = Command::new(&self.editor)
            .arg(path)
            .status()
            .await
            .with_context(|| format!("launching {}", self.editor))?;
        if !status.success() {
            bail!("Editor exited with status {}", status);
        }
        Ok(())
    }
}

/// The configured editor, then `$VISUAL`, then `$EDITOR`, then vim.
pub fn resolve_editor(editor: &Option<String>) -> String {
    editor
        .as_deref()
        .map(str::to_string)
        .or_else(|| std::env::var("VISUAL").ok())
        .or_else(|| std::env::var("EDITOR").ok())
        .unwrap_or_else(|| "vim".into())
}

impl Host for TerminalHost {
    /// End of input (Ctrl-D) dismisses the prompt.
    async fn get_user_input(&self, prompt: &str) -> JournalResult<String> {
        let mut stderr = tokio::io::stderr();
        stderr.write_all(format!("{prompt}: ").as_bytes()).await?;
        stderr.flush().await?;

        let mut line = String::new();
        let read = BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await?;
        if read == 0 {
            return Err(JournalError::Cancelled);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    async fn show_document(&self, document: &TextDocument) -> JournalResult<EditorHandle> {
        let path = document.path().to_path_buf();
        if self.no_edit {
            self.renderer.print_value(&path.display().to_string());
        } else {
            self.open_in_editor(&path).await?;
        }
        Ok(EditorHandle { path })
    }

    async fn open_folder(&self, path: &Path) -> JournalResult<()> {
        if self.no_edit {
            self.renderer.print_value(&path.display().to_string());
            return Ok(());
        }
        Ok(self.open_in_editor(path).await?)
    }

    /// Nothing to click in a terminal: the message says where the log is instead.
    async fn show_error_message(&self, message: &str) -> bool {
        self.renderer.print_error(message);
        if self.log_path.is_some() {
            self.renderer.print_error("run `daybook logs` for details");
        }
        false
    }

    async fn show_log_channel(&self) -> JournalResult<()> {
        let Some(path) = &self.log_path else {
            self.renderer.print_info("Logging is disabled.");
            return Ok(());
        };
        match tokio::fs::read_to_string(path).await {
            Ok(log) => self.renderer.print_value(log.trim_end()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.renderer.print_info("The log is empty.")
            }
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("reading {}", path.display()))
                    .into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_editor_wins() {
        assert_eq!(resolve_editor(&Some("hx".to_string())), "hx");
    }
}
