use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};

use super::error::TaskError;
use super::model::Task;
use super::store::TaskStore;

const SCHEMA: &str = include_str!("../../migrations/0001_create_todos.sql");

const SELECT_COLUMNS: &str = "SELECT id, task, completed, created_at FROM todos";

/// `todos` table behind a sqlx MySQL pool
#[derive(Debug, Clone)]
pub struct MySqlTaskStore {
    pool: MySqlPool,
}

impl MySqlTaskStore {
    /// Open the pool and make sure the table exists
    pub async fn connect(
        options: MySqlConnectOptions,
        max_connections: u32,
    ) -> Result<Self, TaskError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let store = Self::from_pool(pool);
        store.migrate().await?;
        Ok(store)
    }

    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), TaskError> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        tracing::info!("todos schema ready");
        Ok(())
    }
}

#[async_trait]
impl TaskStore for MySqlTaskStore {
    async fn insert(&self, task: &str) -> Result<Task, TaskError> {
        let result = sqlx::query("INSERT INTO todos (task, completed) VALUES (?, 0)")
            .bind(task)
            .execute(&self.pool)
            .await?;

        let id = i64::try_from(result.last_insert_id())
            .map_err(|e| TaskError::Internal(format!("insert id out of range: {}", e)))?;

        // Read back so created_at is the value the database actually stored
        self.get(id)
            .await?
            .ok_or_else(|| TaskError::Internal(format!("inserted todo {} vanished", id)))
    }

    async fn get(&self, id: i64) -> Result<Option<Task>, TaskError> {
        let task = sqlx::query_as::<_, Task>(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn toggle_completed(&self, id: i64) -> Result<bool, TaskError> {
        // Single statement, so two concurrent toggles cannot lose an update
        let result = sqlx::query("UPDATE todos SET completed = NOT completed WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool, TaskError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<Task>, TaskError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "{} ORDER BY created_at DESC, id DESC",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("MySQL pool closed");
    }
}
