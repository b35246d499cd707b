/// Task model
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id SERIAL PRIMARY KEY,
///     title TEXT NOT NULL,
///     description TEXT,
///     is_completed BOOLEAN NOT NULL DEFAULT FALSE,
///     user_id INTEGER REFERENCES users(id) ON DELETE SET NULL
/// );
/// ```
///
/// `user_id` is a lookup reference only. No exposed operation assigns it, and
/// deleting the referenced user clears it.

use crate::models::Entity;

/// Task as stored
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Task {
    /// Generated identity
    pub id: i32,

    pub title: String,

    pub description: Option<String>,

    /// Defaults to false; not writable through create or update
    pub is_completed: bool,

    /// Optional owning user
    pub user_id: Option<i32>,
}

/// Fields supplied on create and update
#[derive(Debug, Clone)]
pub struct TaskFields {
    pub title: String,
    pub description: Option<String>,
}

impl Entity for Task {
    const NAME: &'static str = "Task";
    type Fields = TaskFields;
}
