/// Entity models for Taskman
///
/// Entities are plain data. Persistence lives behind the
/// [`Repository`](crate::store::Repository) trait.
///
/// # Models
///
/// - `user`: User accounts with hashed credentials
/// - `task`: Tasks, optionally referencing a user
///
/// # Example
///
/// ```
/// use taskman_shared::models::{task::Task, user::User, Entity};
///
/// assert_eq!(User::NAME, "User");
/// assert_eq!(Task::NAME, "Task");
/// ```

pub mod task;
pub mod user;

/// A persisted record with a generated integer identity
pub trait Entity: Send + Sync + Sized + 'static {
    /// Human-readable entity name used in not-found messages
    const NAME: &'static str;

    /// Input accepted by both create and update.
    ///
    /// Updates are full replacements, so callers resupply unchanged fields.
    type Fields: Send + 'static;
}
