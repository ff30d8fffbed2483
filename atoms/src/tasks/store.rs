use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use std::sync::Mutex;

use super::error::TaskError;
use super::model::Task;

/// Persistence contract for task rows. Every method touches exactly one row,
/// except `list` which scans the whole table newest first.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Insert a new, not yet completed task and return it with its assigned id
    async fn insert(&self, task: &str) -> Result<Task, TaskError>;

    async fn get(&self, id: i64) -> Result<Option<Task>, TaskError>;

    /// Flip `completed` on one row. Returns false when no row has this id.
    async fn toggle_completed(&self, id: i64) -> Result<bool, TaskError>;

    /// Returns false when no row has this id
    async fn delete(&self, id: i64) -> Result<bool, TaskError>;

    /// All tasks ordered by `created_at` descending, ties by `id` descending
    async fn list(&self) -> Result<Vec<Task>, TaskError>;

    async fn close(&self) {}
}

/// Process-local store with the same semantics as the MySQL table.
/// Used for local runs (`STORE_BACKEND=memory`) and in tests.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    inner: Mutex<MemoryTable>,
}

#[derive(Debug, Default)]
struct MemoryTable {
    last_id: i64,
    rows: Vec<Task>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> Result<std::sync::MutexGuard<'_, MemoryTable>, TaskError> {
        self.inner
            .lock()
            .map_err(|_| TaskError::Internal("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn insert(&self, task: &str) -> Result<Task, TaskError> {
        let mut table = self.table()?;
        table.last_id += 1;

        // DATETIME has whole-second precision
        let row = Task {
            id: table.last_id,
            task: task.to_string(),
            completed: false,
            created_at: Utc::now().naive_utc().trunc_subsecs(0),
        };
        table.rows.push(row.clone());
        Ok(row)
    }

    async fn get(&self, id: i64) -> Result<Option<Task>, TaskError> {
        let table = self.table()?;
        Ok(table.rows.iter().find(|t| t.id == id).cloned())
    }

    async fn toggle_completed(&self, id: i64) -> Result<bool, TaskError> {
        let mut table = self.table()?;
        match table.rows.iter_mut().find(|t| t.id == id) {
            Some(row) => {
                row.completed = !row.completed;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, TaskError> {
        let mut table = self.table()?;
        let before = table.rows.len();
        table.rows.retain(|t| t.id != id);
        Ok(table.rows.len() < before)
    }

    async fn list(&self) -> Result<Vec<Task>, TaskError> {
        let table = self.table()?;
        let mut rows = table.rows.clone();
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ids_are_never_reused_after_delete() {
        let store = MemoryTaskStore::new();
        let first = store.insert("a").await.unwrap();
        assert!(store.delete(first.id).await.unwrap());

        let second = store.insert("b").await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = MemoryTaskStore::new();
        for text in ["one", "two", "three"] {
            store.insert(text).await.unwrap();
        }

        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.task)
            .collect();
        assert_eq!(names, vec!["three", "two", "one"]);
    }

    #[tokio::test]
    async fn toggle_and_delete_report_missing_rows() {
        let store = MemoryTaskStore::new();
        assert!(!store.toggle_completed(99).await.unwrap());
        assert!(!store.delete(99).await.unwrap());
        assert!(store.get(99).await.unwrap().is_none());
    }
}
