/// User model
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id SERIAL PRIMARY KEY,
///     username TEXT NOT NULL,
///     email TEXT NOT NULL,
///     hashed_password TEXT NOT NULL,
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     CONSTRAINT users_username_key UNIQUE (username),
///     CONSTRAINT users_email_key UNIQUE (email)
/// );
/// ```
///
/// `User` deliberately has no `Serialize` impl. The only way out over HTTP is
/// through the API's response schema, which drops `hashed_password`.

use crate::auth::password::{self, PasswordError};
use crate::models::Entity;

/// User account as stored
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    /// Generated identity
    pub id: i32,

    /// Unique login name
    pub username: String,

    /// Unique email address
    pub email: String,

    /// Argon2id PHC string, never the plaintext
    pub hashed_password: String,

    /// Defaults to true on insert
    pub is_active: bool,
}

/// Fields supplied on registration and on update
///
/// `password` is plaintext here. It is hashed by the store before it is
/// written anywhere.
#[derive(Debug, Clone)]
pub struct UserFields {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// [`UserFields`] with the password already hashed, ready to write
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub username: String,
    pub email: String,
    pub hashed_password: String,
}

impl UserFields {
    /// Hashes the plaintext password and returns the writable record
    ///
    /// # Errors
    ///
    /// Returns a [`PasswordError`] if hashing fails
    pub async fn into_record(self) -> Result<UserRecord, PasswordError> {
        let hashed_password = password::hash_password_blocking(self.password).await?;

        Ok(UserRecord {
            username: self.username,
            email: self.email,
            hashed_password,
        })
    }
}

impl Entity for User {
    const NAME: &'static str = "User";
    type Fields = UserFields;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_into_record_hashes_password() {
        let fields = UserFields {
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password: "secret".to_string(),
        };

        let record = fields.into_record().await.unwrap();

        assert_eq!(record.username, "alice");
        assert_eq!(record.email, "a@x.com");
        assert_ne!(record.hashed_password, "secret");
        assert!(password::verify_password("secret", &record.hashed_password).unwrap());
    }
}
