//! File-system persistence of entries and notes.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::config::Config;
use crate::document::{Position, TextDocument};
use crate::paths::candidate_path;
use crate::resolve::Resolved;

/// Clones share one set of per-file write locks.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    config: Arc<Config>,
    locks: Arc<Mutex<HashMap<PathBuf, Arc<AsyncMutex<()>>>>>,
}

impl DocumentStore {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            locks: Arc::default(),
        }
    }

    /// Exclusive access to `path` for a read-modify-write. Hold the guard from the
    /// read until the write has landed.
    pub async fn lock(&self, path: &Path) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(path.to_path_buf()).or_default())
        };
        lock.lock_owned().await
    }

    pub fn base_path(&self) -> &Path {
        &self.config.base_path
    }

    /// Reads a snapshot of an existing file.
    pub async fn open_document(&self, path: &Path) -> Result<TextDocument> {
        let text = fs::read_to_string(path)
            .await
            .with_context(|| format!("opening {}", path.display()))?;
        Ok(TextDocument::new(path, text))
    }

    /// The existing file `raw` names, absolute or relative to the base path.
    pub async fn find_existing(&self, raw: &str) -> Option<PathBuf> {
        if raw.trim().is_empty() {
            return None;
        }
        let path = candidate_path(&self.config, raw);
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Some(path),
            _ => None,
        }
    }

    /// Opens the resolved file, creating it first when there is content for it.
    pub async fn load(&self, resolved: &Resolved) -> Result<TextDocument> {
        match &resolved.content {
            Some(content) => self.load_note(&resolved.path, content).await,
            None => self.open_document(&resolved.path).await,
        }
    }

    /// Opens a file, writing `content` only if the file does not exist yet.
    pub async fn load_note(&self, path: &Path, content: &str) -> Result<TextDocument> {
        self.create_if_missing(path, content).await?;
        self.open_document(path).await
    }

    /// Writes `text` at `position` and returns the updated snapshot.
    pub async fn inject_string(
        &self,
        document: &TextDocument,
        text: &str,
        position: Position,
    ) -> Result<TextDocument> {
        let updated = document.insert(position, text);
        self.save(&updated).await?;
        Ok(updated)
    }

    /// Appends `line` to the document and returns the updated snapshot.
    pub async fn inject_line(&self, document: &TextDocument, line: &str) -> Result<TextDocument> {
        let updated = document.append_line(line);
        self.save(&updated).await?;
        Ok(updated)
    }

    pub async fn save(&self, document: &TextDocument) -> Result<()> {
        fs::write(document.path(), document.text())
            .await
            .with_context(|| format!("writing {}", document.path().display()))
    }

    /// Returns `true` when the file was created.
    async fn create_if_missing(&self, path: &Path, content: &str) -> Result<bool> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating parent directory {}", parent.display()))?;
        }
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await;
        match file {
            Ok(mut f) => {
                f.write_all(content.as_bytes())
                    .await
                    .with_context(|| format!("writing {}", path.display()))?;
                f.flush()
                    .await
                    .with_context(|| format!("writing {}", path.display()))?;
                tracing::debug!(path = %path.display(), "created");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(e).with_context(|| format!("creating {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::mk_config;
    use tempfile::tempdir;

    fn mk_store(root: PathBuf) -> DocumentStore {
        DocumentStore::new(Arc::new(mk_config(root, None)))
    }

    #[tokio::test]
    async fn load_creates_missing_file_with_content() {
        let tmp = tempdir().unwrap();
        let store = mk_store(tmp.path().to_path_buf());
        let path = tmp.path().join("2026/10/2026-10-18.md");
        let resolved = Resolved {
            path: path.clone(),
            content: Some("# Day\n\n".to_string()),
        };

        let doc = store.load(&resolved).await.unwrap();
        assert_eq!(doc.text(), "# Day\n\n");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Day\n\n");
    }

    #[tokio::test]
    async fn load_never_overwrites() {
        let tmp = tempdir().unwrap();
        let store = mk_store(tmp.path().to_path_buf());
        let path = tmp.path().join("n.md");
        std::fs::write(&path, "mine").unwrap();

        let doc = store.load_note(&path, "template").await.unwrap();
        assert_eq!(doc.text(), "mine");
    }

    #[tokio::test]
    async fn load_without_content_requires_the_file() {
        let tmp = tempdir().unwrap();
        let store = mk_store(tmp.path().to_path_buf());
        let resolved = Resolved {
            path: tmp.path().join("missing.md"),
            content: None,
        };
        assert!(store.load(&resolved).await.is_err());
    }

    #[tokio::test]
    async fn inject_string_writes_through() {
        let tmp = tempdir().unwrap();
        let store = mk_store(tmp.path().to_path_buf());
        let path = tmp.path().join("t.md");
        std::fs::write(&path, "09:00\n\n17:30\n").unwrap();

        let doc = store.open_document(&path).await.unwrap();
        let updated = store
            .inject_string(&doc, "8.50", Position::new(1, 0))
            .await
            .unwrap();
        assert_eq!(updated.text(), "09:00\n8.50\n17:30\n");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), updated.text());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn locked_appends_keep_every_line() {
        let tmp = tempdir().unwrap();
        let store = mk_store(tmp.path().to_path_buf());
        let path = tmp.path().join("day.md");
        std::fs::write(&path, "# Day\n").unwrap();

        let mut tasks = tokio::task::JoinSet::new();
        for i in 0..16 {
            let store = store.clone();
            let path = path.clone();
            tasks.spawn(async move {
                let _guard = store.lock(&path).await;
                let doc = store.open_document(&path).await.unwrap();
                store.inject_line(&doc, &format!("- {i}")).await.unwrap();
            });
        }
        while let Some(joined) = tasks.join_next().await {
            joined.unwrap();
        }

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 17, "{text}");
    }

    #[tokio::test]
    async fn find_existing_files_only() {
        let tmp = tempdir().unwrap();
        let store = mk_store(tmp.path().to_path_buf());
        std::fs::create_dir_all(tmp.path().join("notes")).unwrap();
        std::fs::write(tmp.path().join("notes/x.md"), "").unwrap();

        assert_eq!(
            store.find_existing("notes/x.md").await,
            Some(tmp.path().join("notes/x.md"))
        );
        let absolute = tmp.path().join("notes/x.md");
        assert!(store.find_existing(absolute.to_str().unwrap()).await.is_some());
        assert_eq!(store.find_existing("notes").await, None);
        assert_eq!(store.find_existing("nope.md").await, None);
        assert_eq!(store.find_existing("  ").await, None);
    }
}
