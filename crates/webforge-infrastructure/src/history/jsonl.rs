//! Append-only JSONL session-history log.
//!
//! One file per session under the history directory:
//! `<base64url(session_id)>.jsonl`, one serialized [`Turn`] per line.

use anyhow::Context;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use webforge_core::conversation::Turn;
use webforge_core::generation::SessionHistory;

pub struct JsonlSessionHistory {
    dir: PathBuf,
    // Serializes appends so lines from concurrent writers never interleave
    write_lock: Mutex<()>,
}

impl JsonlSessionHistory {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    fn session_file(&self, session_id: &str) -> PathBuf {
        self.dir
            .join(format!("{}.jsonl", URL_SAFE_NO_PAD.encode(session_id.as_bytes())))
    }
}

#[async_trait]
impl SessionHistory for JsonlSessionHistory {
    async fn load(&self, session_id: &str) -> anyhow::Result<Vec<Turn>> {
        let path = self.session_file(session_id);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        let mut turns = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Turn>(line) {
                Ok(turn) => turns.push(turn),
                Err(e) => {
                    // A torn final line from an interrupted append is skipped
                    tracing::warn!(
                        "[JsonlSessionHistory] Skipping bad line {} in {}: {}",
                        index + 1,
                        path.display(),
                        e
                    );
                }
            }
        }
        Ok(turns)
    }

    async fn append(&self, session_id: &str, entries: &[Turn]) -> anyhow::Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut buffer = String::new();
        for entry in entries {
            buffer.push_str(&serde_json::to_string(entry).context("Failed to serialize turn")?);
            buffer.push('\n');
        }

        let _guard = self.write_lock.lock().await;
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let path = self.session_file(session_id);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .with_context(|| format!("Failed to open {}", path.display()))?;
        file.write_all(buffer.as_bytes())
            .await
            .with_context(|| format!("Failed to append to {}", path.display()))?;
        file.flush().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_unknown_session_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let history = JsonlSessionHistory::new(temp_dir.path().join("history"));
        assert!(history.load("nope").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_preserves_order() {
        let temp_dir = TempDir::new().unwrap();
        let history = JsonlSessionHistory::new(temp_dir.path().join("history"));

        history
            .append("chat-1", &[Turn::user("one"), Turn::assistant("two")])
            .await
            .unwrap();
        history.append("chat-1", &[Turn::user("three")]).await.unwrap();
        history.append("chat-2", &[Turn::user("other")]).await.unwrap();

        let texts: Vec<_> = history
            .load("chat-1")
            .await
            .unwrap()
            .into_iter()
            .map(|turn| turn.text)
            .collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
        assert_eq!(history.load("chat-2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_torn_line_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let history = JsonlSessionHistory::new(temp_dir.path());
        history.append("s", &[Turn::user("kept")]).await.unwrap();

        let path = history.session_file("s");
        let mut content = std::fs::read_to_string(&path).unwrap();
        content.push_str("{\"author\":\"USER\",\"te");
        std::fs::write(&path, content).unwrap();

        let turns = history.load("s").await.unwrap();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].text, "kept");
    }
}
