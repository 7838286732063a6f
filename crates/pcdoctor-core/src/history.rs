//! SQLite diagnosis history
//!
//! Per-user history of diagnosis runs. Records are append-only: they are
//! written once after a diagnosis completes and only ever removed by an
//! explicit delete from their owner.

use crate::error::{Error, Result};
use crate::types::{DiagnosisResult, StoredDiagnosis, SystemSpecs};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};
use uuid::Uuid;

/// Default number of records returned by a list/search.
pub const DEFAULT_LIMIT: i64 = 50;

/// Hard cap on list/search page size.
pub const MAX_LIMIT: i64 = 200;

/// SQLite-backed diagnosis history store.
pub struct HistoryStore {
    pool: SqlitePool,
}

impl HistoryStore {
    /// Open (or create) the history database at the given path.
    pub async fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::Internal(format!("failed to create database directory: {e}"))
                })?;
            }
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))
            .map_err(|e| Error::Internal(format!("invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;

        info!(path = %path.display(), "history store initialized");
        Ok(store)
    }

    /// In-memory store for tests.
    pub async fn new_in_memory() -> Result<Self> {
        // Single connection: each SQLite :memory: connection is its own db
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Close the underlying pool. Inserts after this fail, which the
    /// diagnosis pipeline treats as non-fatal.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS diagnoses (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                system_specs TEXT NOT NULL,
                problem_description TEXT NOT NULL,
                diagnosis_result TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_diagnoses_user_created
                ON diagnoses(user_id, created_at)
            "#,
        )
        .execute(&self.pool)
        .await?;

        debug!("history schema initialized");
        Ok(())
    }

    /// Append one record and return it with its assigned id and timestamp.
    pub async fn insert(
        &self,
        user_id: &str,
        specs: &SystemSpecs,
        problem: &str,
        result: &DiagnosisResult,
    ) -> Result<StoredDiagnosis> {
        let record = StoredDiagnosis {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            system_specs: specs.clone(),
            problem_description: problem.to_string(),
            diagnosis_result: result.clone(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO diagnoses (id, user_id, system_specs, problem_description, diagnosis_result, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id.to_string())
        .bind(&record.user_id)
        .bind(serde_json::to_string(&record.system_specs)?)
        .bind(&record.problem_description)
        .bind(serde_json::to_string(&record.diagnosis_result)?)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    /// Most recent records for a user, newest first.
    pub async fn list(&self, user_id: &str, limit: i64) -> Result<Vec<StoredDiagnosis>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, system_specs, problem_description, diagnosis_result, created_at
            FROM diagnoses
            WHERE user_id = ?
            ORDER BY created_at DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(clamp_limit(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_record).collect()
    }

    /// Case-insensitive substring search over a user's history.
    ///
    /// Matches the problem text, the diagnosis summary, and the cpu/gpu/os
    /// spec fields, newest first.
    pub async fn search(
        &self,
        user_id: &str,
        query: &str,
        limit: i64,
    ) -> Result<Vec<StoredDiagnosis>> {
        // LIKE metacharacters in the query are matched literally
        let escaped = query
            .trim()
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        let pattern = format!("%{escaped}%");
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, system_specs, problem_description, diagnosis_result, created_at
            FROM diagnoses
            WHERE user_id = ?1
              AND (
                problem_description LIKE ?2 ESCAPE '\'
                OR json_extract(diagnosis_result, '$.diagnosis') LIKE ?2 ESCAPE '\'
                OR json_extract(system_specs, '$.cpu') LIKE ?2 ESCAPE '\'
                OR json_extract(system_specs, '$.gpu') LIKE ?2 ESCAPE '\'
                OR json_extract(system_specs, '$.os') LIKE ?2 ESCAPE '\'
              )
            ORDER BY created_at DESC
            LIMIT ?3
            "#,
        )
        .bind(user_id)
        .bind(&pattern)
        .bind(clamp_limit(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_record).collect()
    }

    /// Fetch one record, scoped to its owner.
    pub async fn get(&self, user_id: &str, id: Uuid) -> Result<Option<StoredDiagnosis>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, system_specs, problem_description, diagnosis_result, created_at
            FROM diagnoses
            WHERE user_id = ? AND id = ?
            "#,
        )
        .bind(user_id)
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    /// Delete one record, scoped to its owner. Returns whether a row was
    /// removed.
    pub async fn delete(&self, user_id: &str, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM diagnoses WHERE user_id = ? AND id = ?")
            .bind(user_id)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> Result<StoredDiagnosis> {
        let id: String = row.get("id");
        let id = Uuid::parse_str(&id)
            .map_err(|e| Error::Internal(format!("corrupt record id {id:?}: {e}")))?;
        let system_specs: String = row.get("system_specs");
        let diagnosis_result: String = row.get("diagnosis_result");
        let created_at: DateTime<Utc> = row.get("created_at");

        Ok(StoredDiagnosis {
            id,
            user_id: row.get("user_id"),
            system_specs: serde_json::from_str(&system_specs)?,
            problem_description: row.get("problem_description"),
            diagnosis_result: serde_json::from_str(&diagnosis_result)?,
            created_at,
        })
    }
}

fn clamp_limit(limit: i64) -> i64 {
    if limit <= 0 {
        DEFAULT_LIMIT
    } else {
        limit.min(MAX_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DiagnosisStep;

    fn sample_result(diagnosis: &str) -> DiagnosisResult {
        DiagnosisResult {
            diagnosis: diagnosis.to_string(),
            confidence: 80,
            possible_causes: vec!["Dust buildup".to_string()],
            steps: vec![DiagnosisStep {
                step: 1,
                title: "Clean fans".to_string(),
                ..Default::default()
            }],
            preventive_tips: vec!["Clean regularly".to_string()],
        }
    }

    fn sample_specs() -> SystemSpecs {
        SystemSpecs {
            cpu: Some("Intel i7".to_string()),
            gpu: Some("RTX 3070".to_string()),
            os: Some("Windows 11".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn insert_and_get_round_trip() {
        let store = HistoryStore::new_in_memory().await.unwrap();
        let record = store
            .insert("alice", &sample_specs(), "PC freezes", &sample_result("Overheating"))
            .await
            .unwrap();

        let fetched = store.get("alice", record.id).await.unwrap().unwrap();
        assert_eq!(fetched, record);

        // Not visible to other users
        assert!(store.get("bob", record.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_is_newest_first_and_scoped() {
        let store = HistoryStore::new_in_memory().await.unwrap();
        let specs = SystemSpecs::default();
        for i in 0..3 {
            store
                .insert("alice", &specs, &format!("problem {i}"), &sample_result("d"))
                .await
                .unwrap();
            // force distinct created_at stamps for deterministic ordering
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        store
            .insert("bob", &specs, "other user", &sample_result("d"))
            .await
            .unwrap();

        let listed = store.list("alice", 10).await.unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].problem_description, "problem 2");
        assert_eq!(listed[2].problem_description, "problem 0");

        let limited = store.list("alice", 2).await.unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[tokio::test]
    async fn limit_is_clamped() {
        let store = HistoryStore::new_in_memory().await.unwrap();
        store
            .insert("alice", &SystemSpecs::default(), "p", &sample_result("d"))
            .await
            .unwrap();
        // Nonsense limits fall back to defaults instead of erroring
        assert_eq!(store.list("alice", 0).await.unwrap().len(), 1);
        assert_eq!(store.list("alice", -5).await.unwrap().len(), 1);
        assert_eq!(store.list("alice", 1_000_000).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn search_matches_problem_diagnosis_and_specs() {
        let store = HistoryStore::new_in_memory().await.unwrap();
        store
            .insert("alice", &sample_specs(), "Screen flickers", &sample_result("Driver issue"))
            .await
            .unwrap();
        store
            .insert("alice", &SystemSpecs::default(), "No sound", &sample_result("Muted output"))
            .await
            .unwrap();

        let by_problem = store.search("alice", "flicker", 50).await.unwrap();
        assert_eq!(by_problem.len(), 1);

        let by_diagnosis = store.search("alice", "muted", 50).await.unwrap();
        assert_eq!(by_diagnosis.len(), 1);
        assert_eq!(by_diagnosis[0].problem_description, "No sound");

        let by_gpu = store.search("alice", "rtx", 50).await.unwrap();
        assert_eq!(by_gpu.len(), 1);

        assert!(store.search("alice", "nomatch", 50).await.unwrap().is_empty());
        assert!(store.search("bob", "flicker", 50).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_treats_like_wildcards_literally() {
        let store = HistoryStore::new_in_memory().await.unwrap();
        store
            .insert(
                "alice",
                &SystemSpecs::default(),
                "CPU pinned at 100% load",
                &sample_result("Thermal throttling"),
            )
            .await
            .unwrap();
        store
            .insert("alice", &SystemSpecs::default(), "Fan is loud", &sample_result("d"))
            .await
            .unwrap();

        // "%" must not act as a match-all
        let hits = store.search("alice", "100%", 50).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].problem_description, "CPU pinned at 100% load");

        // "_" must not act as a single-character wildcard
        assert!(store.search("alice", "100_", 50).await.unwrap().is_empty());
        assert!(store.search("alice", "F_n", 50).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_is_scoped_to_owner() {
        let store = HistoryStore::new_in_memory().await.unwrap();
        let record = store
            .insert("alice", &SystemSpecs::default(), "p", &sample_result("d"))
            .await
            .unwrap();

        assert!(!store.delete("bob", record.id).await.unwrap());
        assert!(store.delete("alice", record.id).await.unwrap());
        assert!(!store.delete("alice", record.id).await.unwrap());
        assert!(store.get("alice", record.id).await.unwrap().is_none());
    }
}
