/// PostgreSQL entity store
///
/// Each session is one connection checked out of the pool. Every query runs
/// under `operation_timeout`; a query that overruns yields
/// [`StoreError::Timeout`] instead of hanging the request.
///
/// Unique violations on `users_username_key` / `users_email_key` are mapped
/// to [`StoreError::Conflict`].

use crate::models::task::{Task, TaskFields};
use crate::models::user::{User, UserFields};
use crate::models::Entity;
use crate::store::{Repository, Store, StoreError};
use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

const USER_COLUMNS: &str = "id, username, email, hashed_password, is_active";
const TASK_COLUMNS: &str = "id, title, description, is_completed, user_id";

/// Store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
    operation_timeout: Duration,
}

impl PgStore {
    /// Wraps an existing pool
    pub fn new(pool: PgPool, operation_timeout: Duration) -> Self {
        Self {
            pool,
            operation_timeout,
        }
    }

    /// The underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn timed<T, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>> + Send,
    {
        match tokio::time::timeout(self.operation_timeout, fut).await {
            Ok(result) => result.map_err(map_db_error),
            Err(_) => {
                warn!(
                    timeout_ms = self.operation_timeout.as_millis() as u64,
                    "Database operation timed out"
                );
                Err(StoreError::Timeout)
            }
        }
    }
}

/// Maps constraint violations to a conflict naming the offending field
fn map_db_error(err: sqlx::Error) -> StoreError {
    if matches!(err, sqlx::Error::PoolTimedOut) {
        return StoreError::Timeout;
    }

    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let field = match db_err.constraint() {
                Some(c) if c.contains("username") => "username",
                Some(c) if c.contains("email") => "email",
                _ => "value",
            };
            return StoreError::Conflict {
                entity: User::NAME,
                field,
            };
        }
    }

    StoreError::Database(err)
}

#[async_trait]
impl Store for PgStore {
    type Session = PoolConnection<Postgres>;

    async fn session(&self) -> Result<Self::Session, StoreError> {
        self.timed(self.pool.acquire()).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.timed(crate::db::pool::health_check(&self.pool)).await
    }
}

#[async_trait]
impl Repository<User> for PgStore {
    async fn create(&self, session: &mut Self::Session, fields: UserFields) -> Result<User, StoreError> {
        let record = fields.into_record().await?;
        let query = format!(
            "INSERT INTO users (username, email, hashed_password) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );

        let user = self
            .timed(
                sqlx::query_as::<_, User>(&query)
                    .bind(record.username)
                    .bind(record.email)
                    .bind(record.hashed_password)
                    .fetch_one(&mut **session),
            )
            .await?;

        debug!(user_id = user.id, "Inserted user");
        Ok(user)
    }

    async fn get(&self, session: &mut Self::Session, id: i32) -> Result<Option<User>, StoreError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        self.timed(
            sqlx::query_as::<_, User>(&query)
                .bind(id)
                .fetch_optional(&mut **session),
        )
        .await
    }

    async fn update(
        &self,
        session: &mut Self::Session,
        id: i32,
        fields: UserFields,
    ) -> Result<Option<User>, StoreError> {
        let record = fields.into_record().await?;
        let query = format!(
            "UPDATE users SET username = $2, email = $3, hashed_password = $4 WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );

        self.timed(
            sqlx::query_as::<_, User>(&query)
                .bind(id)
                .bind(record.username)
                .bind(record.email)
                .bind(record.hashed_password)
                .fetch_optional(&mut **session),
        )
        .await
    }

    async fn delete(&self, session: &mut Self::Session, id: i32) -> Result<bool, StoreError> {
        // tasks.user_id is cleared by ON DELETE SET NULL
        let result = self
            .timed(
                sqlx::query("DELETE FROM users WHERE id = $1")
                    .bind(id)
                    .execute(&mut **session),
            )
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Repository<Task> for PgStore {
    async fn create(&self, session: &mut Self::Session, fields: TaskFields) -> Result<Task, StoreError> {
        let query = format!(
            "INSERT INTO tasks (title, description) VALUES ($1, $2) RETURNING {}",
            TASK_COLUMNS
        );

        let task = self
            .timed(
                sqlx::query_as::<_, Task>(&query)
                    .bind(fields.title)
                    .bind(fields.description)
                    .fetch_one(&mut **session),
            )
            .await?;

        debug!(task_id = task.id, "Inserted task");
        Ok(task)
    }

    async fn get(&self, session: &mut Self::Session, id: i32) -> Result<Option<Task>, StoreError> {
        let query = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);

        self.timed(
            sqlx::query_as::<_, Task>(&query)
                .bind(id)
                .fetch_optional(&mut **session),
        )
        .await
    }

    async fn update(
        &self,
        session: &mut Self::Session,
        id: i32,
        fields: TaskFields,
    ) -> Result<Option<Task>, StoreError> {
        let query = format!(
            "UPDATE tasks SET title = $2, description = $3 WHERE id = $1 RETURNING {}",
            TASK_COLUMNS
        );

        self.timed(
            sqlx::query_as::<_, Task>(&query)
                .bind(id)
                .bind(fields.title)
                .bind(fields.description)
                .fetch_optional(&mut **session),
        )
        .await
    }

    async fn delete(&self, session: &mut Self::Session, id: i32) -> Result<bool, StoreError> {
        let result = self
            .timed(
                sqlx::query("DELETE FROM tasks WHERE id = $1")
                    .bind(id)
                    .execute(&mut **session),
            )
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
