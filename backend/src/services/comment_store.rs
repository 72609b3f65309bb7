// src/services/comment_store.rs

use std::path::PathBuf;

use crate::{error::QuizError, models::comment::CommentRecord, services::json_store::JsonFileStore};

/// Player feedback, readable only through the admin view.
#[derive(Debug, Clone)]
pub struct CommentStore {
    store: JsonFileStore<CommentRecord>,
}

impl CommentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: JsonFileStore::new(path),
        }
    }

    pub async fn append(&self, record: CommentRecord) -> Result<(), QuizError> {
        self.store.append(record).await.map(|_| ()).map_err(|e| {
            tracing::error!(
                "Failed to write comments {}: {}",
                self.store.path().display(),
                e
            );
            e
        })
    }

    /// Every comment in insertion order.
    pub async fn all(&self) -> Result<Vec<CommentRecord>, QuizError> {
        self.store.load_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn comments_come_back_in_insertion_order() {
        let path = std::env::temp_dir().join(format!(
            "aml-comments-{}-{}.json",
            std::process::id(),
            crate::utils::rand::generate_player_id()
        ));
        let store = CommentStore::new(&path);

        for (name, text) in [("Alice###", "Loved it"), ("Bob###", "Too hard")] {
            store
                .append(CommentRecord {
                    name: name.to_string(),
                    comment: text.to_string(),
                    timestamp: "2026-01-01T00:00:00+00:00".to_string(),
                })
                .await
                .unwrap();
        }

        let all = store.all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].comment, "Loved it");
        assert_eq!(all[1].name, "Bob###");

        let _ = std::fs::remove_file(path);
    }
}
