/// Runtime-selected store
///
/// The backend is chosen from configuration at startup, so the API holds an
/// [`AnyStore`] and dispatches to whichever backend it wraps. A session is
/// only valid with the store that produced it.

use crate::models::Entity;
use crate::store::memory::{MemorySession, MemoryStore};
use crate::store::postgres::PgStore;
use crate::store::{Repository, Store, StoreError};
use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::Postgres;

/// Either backend behind one type
#[derive(Debug, Clone)]
pub enum AnyStore {
    Postgres(PgStore),
    Memory(MemoryStore),
}

/// Session for [`AnyStore`]
#[derive(Debug)]
pub enum AnySession {
    Postgres(PoolConnection<Postgres>),
    Memory(MemorySession),
}

impl AnyStore {
    /// Short backend name for logs and health output
    pub fn backend_name(&self) -> &'static str {
        match self {
            AnyStore::Postgres(_) => "postgres",
            AnyStore::Memory(_) => "memory",
        }
    }
}

impl From<PgStore> for AnyStore {
    fn from(store: PgStore) -> Self {
        AnyStore::Postgres(store)
    }
}

impl From<MemoryStore> for AnyStore {
    fn from(store: MemoryStore) -> Self {
        AnyStore::Memory(store)
    }
}

#[async_trait]
impl Store for AnyStore {
    type Session = AnySession;

    async fn session(&self) -> Result<Self::Session, StoreError> {
        match self {
            AnyStore::Postgres(store) => Ok(AnySession::Postgres(store.session().await?)),
            AnyStore::Memory(store) => Ok(AnySession::Memory(store.session().await?)),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        match self {
            AnyStore::Postgres(store) => store.ping().await,
            AnyStore::Memory(store) => store.ping().await,
        }
    }
}

#[async_trait]
impl<E> Repository<E> for AnyStore
where
    E: Entity,
    PgStore: Repository<E>,
    MemoryStore: Repository<E>,
{
    async fn create(&self, session: &mut Self::Session, fields: E::Fields) -> Result<E, StoreError> {
        match (self, session) {
            (AnyStore::Postgres(store), AnySession::Postgres(conn)) => {
                Repository::<E>::create(store, conn, fields).await
            }
            (AnyStore::Memory(store), AnySession::Memory(inner)) => {
                Repository::<E>::create(store, inner, fields).await
            }
            _ => Err(StoreError::SessionMismatch),
        }
    }

    async fn get(&self, session: &mut Self::Session, id: i32) -> Result<Option<E>, StoreError> {
        match (self, session) {
            (AnyStore::Postgres(store), AnySession::Postgres(conn)) => {
                Repository::<E>::get(store, conn, id).await
            }
            (AnyStore::Memory(store), AnySession::Memory(inner)) => {
                Repository::<E>::get(store, inner, id).await
            }
            _ => Err(StoreError::SessionMismatch),
        }
    }

    async fn update(
        &self,
        session: &mut Self::Session,
        id: i32,
        fields: E::Fields,
    ) -> Result<Option<E>, StoreError> {
        match (self, session) {
            (AnyStore::Postgres(store), AnySession::Postgres(conn)) => {
                Repository::<E>::update(store, conn, id, fields).await
            }
            (AnyStore::Memory(store), AnySession::Memory(inner)) => {
                Repository::<E>::update(store, inner, id, fields).await
            }
            _ => Err(StoreError::SessionMismatch),
        }
    }

    async fn delete(&self, session: &mut Self::Session, id: i32) -> Result<bool, StoreError> {
        match (self, session) {
            (AnyStore::Postgres(store), AnySession::Postgres(conn)) => {
                Repository::<E>::delete(store, conn, id).await
            }
            (AnyStore::Memory(store), AnySession::Memory(inner)) => {
                Repository::<E>::delete(store, inner, id).await
            }
            _ => Err(StoreError::SessionMismatch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::{Task, TaskFields};

    #[tokio::test]
    async fn test_dispatches_to_memory_backend() {
        let store = AnyStore::from(MemoryStore::new());
        assert_eq!(store.backend_name(), "memory");

        let mut session = store.session().await.unwrap();
        let task = Repository::<Task>::create(
            &store,
            &mut session,
            TaskFields {
                title: "dispatch".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();

        let found = Repository::<Task>::get(&store, &mut session, task.id)
            .await
            .unwrap();
        assert_eq!(found, Some(task));
        store.ping().await.unwrap();
    }
}
