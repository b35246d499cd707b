/// Entity store abstraction
///
/// Every operation takes an explicit unit-of-work handle (`Session`) acquired
/// once per request. Dropping the session releases whatever it holds, so a
/// handler that bails out early still gives its connection back.
///
/// # Backends
///
/// - [`postgres::PgStore`]: sqlx over a PostgreSQL pool, one pooled connection per session
/// - [`memory::MemoryStore`]: in-process tables, used in tests and local runs
/// - [`any::AnyStore`]: whichever of the two was configured at startup
///
/// # Example
///
/// ```
/// use taskman_shared::models::task::{Task, TaskFields};
/// use taskman_shared::store::{memory::MemoryStore, Repository, Store};
///
/// # async fn example() -> Result<(), taskman_shared::store::StoreError> {
/// let store = MemoryStore::new();
/// let mut session = store.session().await?;
///
/// let fields = TaskFields { title: "Write docs".into(), description: None };
/// let task = Repository::<Task>::create(&store, &mut session, fields).await?;
///
/// let found = Repository::<Task>::get(&store, &mut session, task.id).await?;
/// assert_eq!(found, Some(task));
/// # Ok(())
/// # }
/// ```

pub mod any;
pub mod memory;
pub mod postgres;

use crate::auth::password::PasswordError;
use crate::models::Entity;
use async_trait::async_trait;

/// Errors surfaced by store operations
///
/// "Not found" is not an error: lookups return `Option` and deletes return `bool`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write
    #[error("{entity} with this {field} already exists")]
    Conflict {
        entity: &'static str,
        field: &'static str,
    },

    /// The operation did not finish within the configured timeout
    #[error("Store operation timed out")]
    Timeout,

    /// Any other storage or connection failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A session was used with a store other than the one that issued it
    #[error("Session does not belong to this store")]
    SessionMismatch,

    /// Password hashing failed before the write
    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// A backing store that hands out per-request sessions
#[async_trait]
pub trait Store: Clone + Send + Sync + 'static {
    /// Unit of work for one request
    type Session: Send;

    /// Acquires a session
    async fn session(&self) -> Result<Self::Session, StoreError>;

    /// Checks the backing store is reachable
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Single-row CRUD for one entity type
#[async_trait]
pub trait Repository<E: Entity>: Store {
    /// Inserts a new row and returns it with generated fields filled in
    async fn create(&self, session: &mut Self::Session, fields: E::Fields) -> Result<E, StoreError>;

    /// Looks up a row by id
    async fn get(&self, session: &mut Self::Session, id: i32) -> Result<Option<E>, StoreError>;

    /// Overwrites all mutable fields of an existing row
    ///
    /// Returns `None` and leaves storage untouched when `id` does not exist.
    async fn update(
        &self,
        session: &mut Self::Session,
        id: i32,
        fields: E::Fields,
    ) -> Result<Option<E>, StoreError>;

    /// Removes a row permanently
    ///
    /// Returns `false` when `id` does not exist.
    async fn delete(&self, session: &mut Self::Session, id: i32) -> Result<bool, StoreError>;
}
