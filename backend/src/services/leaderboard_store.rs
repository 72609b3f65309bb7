// src/services/leaderboard_store.rs

use std::path::PathBuf;

use crate::{
    error::QuizError, models::leaderboard::LeaderboardRecord, services::json_store::JsonFileStore,
};

/// Finished games, one record per completed session.
#[derive(Debug, Clone)]
pub struct LeaderboardStore {
    store: JsonFileStore<LeaderboardRecord>,
}

impl LeaderboardStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: JsonFileStore::new(path),
        }
    }

    pub async fn append(&self, record: LeaderboardRecord) -> Result<(), QuizError> {
        let count = self.store.append(record).await.map_err(|e| {
            tracing::error!(
                "Failed to write leaderboard {}: {}",
                self.store.path().display(),
                e
            );
            e
        })?;
        tracing::debug!("Leaderboard now holds {} records", count);
        Ok(())
    }

    pub async fn all(&self) -> Result<Vec<LeaderboardRecord>, QuizError> {
        self.store.load_all().await
    }

    /// Best `n` games: highest score first, faster games first on equal score.
    pub async fn top_n(&self, n: usize) -> Result<Vec<LeaderboardRecord>, QuizError> {
        Ok(rank(self.store.load_all().await?, n))
    }

    pub async fn total_players(&self) -> Result<usize, QuizError> {
        Ok(self.store.load_all().await?.len())
    }
}

/// Sorts by `(score desc, duration asc)`. The sort is stable, so full ties keep
/// insertion order.
pub fn rank(mut records: Vec<LeaderboardRecord>, n: usize) -> Vec<LeaderboardRecord> {
    records.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.duration.cmp(&b.duration))
    });
    records.truncate(n);
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::GameMode;

    fn record(name: &str, score: u32, duration: u64) -> LeaderboardRecord {
        LeaderboardRecord {
            name: name.to_string(),
            mode: GameMode::Classic,
            category: "Crypto".to_string(),
            score,
            total: 10,
            percent: score * 10,
            duration,
            timestamp: "2026-01-01T00:00:00+00:00".to_string(),
        }
    }

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "aml-leaderboard-{}-{}-{}.json",
            label,
            std::process::id(),
            crate::utils::rand::generate_player_id()
        ))
    }

    #[test]
    fn equal_scores_rank_faster_first() {
        let ranked = rank(vec![record("slow", 8, 120), record("fast", 8, 90)], 2);
        assert_eq!(ranked[0].name, "fast");
        assert_eq!(ranked[1].name, "slow");
    }

    #[test]
    fn ranking_is_sorted_and_truncated() {
        let records = vec![
            record("a", 3, 50),
            record("b", 9, 300),
            record("c", 9, 100),
            record("d", 5, 10),
            record("e", 7, 70),
        ];
        let ranked = rank(records, 4);

        assert_eq!(ranked.len(), 4);
        for pair in ranked.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(a.score > b.score || (a.score == b.score && a.duration <= b.duration));
        }
        assert_eq!(ranked[0].name, "c");
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let store = LeaderboardStore::new(temp_path("missing"));
        assert!(store.all().await.unwrap().is_empty());
        assert_eq!(store.total_players().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn append_grows_by_one_and_preserves_prior_records() {
        let path = temp_path("append");
        let store = LeaderboardStore::new(&path);

        store.append(record("first", 8, 120)).await.unwrap();
        let before = store.all().await.unwrap();
        store.append(record("second", 8, 90)).await.unwrap();
        let after = store.all().await.unwrap();

        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(&after[..before.len()], &before[..]);

        let top = store.top_n(2).await.unwrap();
        assert_eq!(top[0].name, "second");
        assert_eq!(top[1].name, "first");

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn corrupted_file_is_reported_not_overwritten() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "{oops").unwrap();
        let store = LeaderboardStore::new(&path);

        assert!(matches!(
            store.append(record("x", 1, 1)).await,
            Err(QuizError::Serialization(_))
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{oops");

        let _ = std::fs::remove_file(path);
    }
}
