/// In-memory entity store
///
/// Mirrors the PostgreSQL schema semantics: ids start at 1 and are never
/// reused, username and email are unique, and deleting a user clears
/// `user_id` on the tasks that referenced it.
///
/// The table lock is held for the duration of one operation only. Password
/// hashing happens before the lock is taken.

use crate::models::task::{Task, TaskFields};
use crate::models::user::{User, UserFields, UserRecord};
use crate::models::Entity;
use crate::store::{Repository, Store, StoreError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    tasks: BTreeMap<i32, Task>,
    last_user_id: i32,
    last_task_id: i32,
}

impl Tables {
    /// Rejects a user write that would duplicate another row's username or email
    fn check_unique(&self, record: &UserRecord, except: Option<i32>) -> Result<(), StoreError> {
        for user in self.users.values().filter(|u| Some(u.id) != except) {
            if user.username == record.username {
                return Err(StoreError::Conflict {
                    entity: User::NAME,
                    field: "username",
                });
            }
            if user.email == record.email {
                return Err(StoreError::Conflict {
                    entity: User::NAME,
                    field: "email",
                });
            }
        }
        Ok(())
    }
}

/// Store that keeps both tables in process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

/// Session handle for [`MemoryStore`]
#[derive(Debug)]
pub struct MemorySession {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Tables behind `session`, provided it was issued by this store
    fn tables<'s>(&self, session: &'s MemorySession) -> Result<&'s Mutex<Tables>, StoreError> {
        if Arc::ptr_eq(&self.tables, &session.tables) {
            Ok(&*session.tables)
        } else {
            Err(StoreError::SessionMismatch)
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    type Session = MemorySession;

    async fn session(&self) -> Result<Self::Session, StoreError> {
        Ok(MemorySession {
            tables: Arc::clone(&self.tables),
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl Repository<User> for MemoryStore {
    async fn create(&self, session: &mut Self::Session, fields: UserFields) -> Result<User, StoreError> {
        let record = fields.into_record().await?;
        let mut tables = self.tables(session)?.lock().await;

        tables.check_unique(&record, None)?;

        tables.last_user_id += 1;
        let user = User {
            id: tables.last_user_id,
            username: record.username,
            email: record.email,
            hashed_password: record.hashed_password,
            is_active: true,
        };
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn get(&self, session: &mut Self::Session, id: i32) -> Result<Option<User>, StoreError> {
        Ok(self.tables(session)?.lock().await.users.get(&id).cloned())
    }

    async fn update(
        &self,
        session: &mut Self::Session,
        id: i32,
        fields: UserFields,
    ) -> Result<Option<User>, StoreError> {
        let record = fields.into_record().await?;
        let mut tables = self.tables(session)?.lock().await;

        if !tables.users.contains_key(&id) {
            return Ok(None);
        }
        tables.check_unique(&record, Some(id))?;

        let updated = tables.users.get_mut(&id).map(|user| {
            user.username = record.username;
            user.email = record.email;
            user.hashed_password = record.hashed_password;
            user.clone()
        });

        Ok(updated)
    }

    async fn delete(&self, session: &mut Self::Session, id: i32) -> Result<bool, StoreError> {
        let mut tables = self.tables(session)?.lock().await;

        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }

        for task in tables.tasks.values_mut() {
            if task.user_id == Some(id) {
                task.user_id = None;
            }
        }

        Ok(true)
    }
}

#[async_trait]
impl Repository<Task> for MemoryStore {
    async fn create(&self, session: &mut Self::Session, fields: TaskFields) -> Result<Task, StoreError> {
        let mut tables = self.tables(session)?.lock().await;

        tables.last_task_id += 1;
        let task = Task {
            id: tables.last_task_id,
            title: fields.title,
            description: fields.description,
            is_completed: false,
            user_id: None,
        };
        tables.tasks.insert(task.id, task.clone());

        Ok(task)
    }

    async fn get(&self, session: &mut Self::Session, id: i32) -> Result<Option<Task>, StoreError> {
        Ok(self.tables(session)?.lock().await.tasks.get(&id).cloned())
    }

    async fn update(
        &self,
        session: &mut Self::Session,
        id: i32,
        fields: TaskFields,
    ) -> Result<Option<Task>, StoreError> {
        let mut tables = self.tables(session)?.lock().await;

        Ok(tables.tasks.get_mut(&id).map(|task| {
            task.title = fields.title;
            task.description = fields.description;
            task.clone()
        }))
    }

    async fn delete(&self, session: &mut Self::Session, id: i32) -> Result<bool, StoreError> {
        Ok(self.tables(session)?.lock().await.tasks.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;

    fn alice() -> UserFields {
        UserFields {
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password: "secret".to_string(),
        }
    }

    fn task_fields(title: &str) -> TaskFields {
        TaskFields {
            title: title.to_string(),
            description: Some("details".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_user_assigns_id_and_hashes() {
        let store = MemoryStore::new();
        let mut session = store.session().await.unwrap();

        let user = Repository::<User>::create(&store, &mut session, alice()).await.unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.username, "alice");
        assert!(user.is_active);
        assert_ne!(user.hashed_password, "secret");
        assert!(verify_password("secret", &user.hashed_password).unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = MemoryStore::new();
        let mut session = store.session().await.unwrap();

        let _ = Repository::<User>::create(&store, &mut session, alice()).await.unwrap();

        let mut dup = alice();
        dup.email = "other@x.com".to_string();
        let err = Repository::<User>::create(&store, &mut session, dup)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StoreError::Conflict {
                field: "username",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_on_update() {
        let store = MemoryStore::new();
        let mut session = store.session().await.unwrap();

        let _ = Repository::<User>::create(&store, &mut session, alice()).await.unwrap();
        let bob = Repository::<User>::create(
            &store,
            &mut session,
            UserFields {
                username: "bob".to_string(),
                email: "b@x.com".to_string(),
                password: "pw".to_string(),
            },
        )
        .await
        .unwrap();

        let err = Repository::<User>::update(
            &store,
            &mut session,
            bob.id,
            UserFields {
                username: "bob".to_string(),
                email: "a@x.com".to_string(),
                password: "pw".to_string(),
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, StoreError::Conflict { field: "email", .. }));
    }

    #[tokio::test]
    async fn test_update_user_keeps_own_username() {
        let store = MemoryStore::new();
        let mut session = store.session().await.unwrap();

        let user = Repository::<User>::create(&store, &mut session, alice()).await.unwrap();

        let mut fields = alice();
        fields.password = "new-secret".to_string();
        let updated = Repository::<User>::update(&store, &mut session, user.id, fields)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.username, "alice");
        assert!(verify_password("new-secret", &updated.hashed_password).unwrap());
        assert!(!verify_password("secret", &updated.hashed_password).unwrap());
    }

    #[tokio::test]
    async fn test_update_missing_task_leaves_storage_unchanged() {
        let store = MemoryStore::new();
        let mut session = store.session().await.unwrap();

        let task = Repository::<Task>::create(&store, &mut session, task_fields("one")).await.unwrap();

        let missing = Repository::<Task>::update(&store, &mut session, 999, task_fields("changed"))
            .await
            .unwrap();
        assert!(missing.is_none());

        let found = Repository::<Task>::get(&store, &mut session, task.id).await.unwrap();
        assert_eq!(found, Some(task));
    }

    #[tokio::test]
    async fn test_delete_task_twice() {
        let store = MemoryStore::new();
        let mut session = store.session().await.unwrap();

        let task = Repository::<Task>::create(&store, &mut session, task_fields("one")).await.unwrap();

        assert!(Repository::<Task>::delete(&store, &mut session, task.id).await.unwrap());
        assert!(!Repository::<Task>::delete(&store, &mut session, task.id).await.unwrap());

        let found = Repository::<Task>::get(&store, &mut session, task.id).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let store = MemoryStore::new();
        let mut session = store.session().await.unwrap();

        let first = Repository::<Task>::create(&store, &mut session, task_fields("one")).await.unwrap();
        Repository::<Task>::delete(&store, &mut session, first.id).await.unwrap();
        let second = Repository::<Task>::create(&store, &mut session, task_fields("two")).await.unwrap();

        assert_eq!(second.id, first.id + 1);
    }

    #[tokio::test]
    async fn test_delete_user_clears_task_reference() {
        let store = MemoryStore::new();
        let mut session = store.session().await.unwrap();

        let user = Repository::<User>::create(&store, &mut session, alice()).await.unwrap();
        let task = Repository::<Task>::create(&store, &mut session, task_fields("owned")).await.unwrap();

        // No exposed operation assigns an owner, so set it directly.
        session
            .tables
            .lock()
            .await
            .tasks
            .get_mut(&task.id)
            .unwrap()
            .user_id = Some(user.id);

        assert!(Repository::<User>::delete(&store, &mut session, user.id).await.unwrap());

        let task = Repository::<Task>::get(&store, &mut session, task.id).await.unwrap().unwrap();
        assert_eq!(task.user_id, None);
    }

    #[tokio::test]
    async fn test_sessions_share_tables() {
        let store = MemoryStore::new();
        let mut first = store.session().await.unwrap();
        let mut second = store.session().await.unwrap();

        let task = Repository::<Task>::create(&store, &mut first, task_fields("shared")).await.unwrap();
        let found = Repository::<Task>::get(&store, &mut second, task.id).await.unwrap();

        assert_eq!(found, Some(task));
    }

    #[tokio::test]
    async fn test_session_from_other_store_rejected() {
        let store = MemoryStore::new();
        let other = MemoryStore::new();
        let mut foreign = other.session().await.unwrap();

        let result = Repository::<Task>::create(&store, &mut foreign, task_fields("stray")).await;
        assert!(matches!(result, Err(StoreError::SessionMismatch)));

        let result = Repository::<User>::create(&store, &mut foreign, alice()).await;
        assert!(matches!(result, Err(StoreError::SessionMismatch)));

        let mut own = other.session().await.unwrap();
        assert_eq!(Repository::<Task>::get(&other, &mut own, 1).await.unwrap(), None);
        assert_eq!(Repository::<User>::get(&other, &mut own, 1).await.unwrap(), None);
    }
}
