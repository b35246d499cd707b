/// Request and response schemas
///
/// Requests are deserialized and validated through [`ValidatedJson`];
/// responses are built from stored entities with `From`, which is the only
/// path from a `User` to JSON and leaves `hashed_password` behind.

use crate::error::ApiError;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use taskman_shared::models::task::{Task, TaskFields};
use taskman_shared::models::user::{User, UserFields};
use utoipa::ToSchema;
use validator::Validate;

/// Registration and update body for users
///
/// Updates are full replacements: all three fields are required.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UserCreate {
    #[validate(length(min = 1, message = "Username must not be empty"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Plaintext; hashed before storage
    pub password: String,
}

/// User as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub is_active: bool,
}

/// Create and update body for tasks
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct TaskCreate {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// Task as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TaskResponse {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
}

impl From<UserCreate> for UserFields {
    fn from(body: UserCreate) -> Self {
        UserFields {
            username: body.username,
            email: body.email,
            password: body.password,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            is_active: user.is_active,
        }
    }
}

impl From<TaskCreate> for TaskFields {
    fn from(body: TaskCreate) -> Self {
        TaskFields {
            title: body.title,
            description: body.description,
        }
    }
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        TaskResponse {
            id: task.id,
            title: task.title,
            description: task.description,
            is_completed: task.is_completed,
        }
    }
}

/// JSON body extractor that also runs `validator` rules
///
/// Every failure (bad syntax, wrong types, missing fields, rule violations)
/// becomes a 422 [`ApiError::ValidationError`].
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Integer `{id}` path segment; a non-integer segment is a 422
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityId(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for EntityId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i32>::from_request_parts(parts, state).await?;
        Ok(EntityId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_has_no_password() {
        let user = User {
            id: 1,
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            hashed_password: "$argon2id$v=19$...".to_string(),
            is_active: true,
        };

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "username": "alice",
                "email": "a@x.com",
                "is_active": true
            })
        );
    }

    #[test]
    fn test_task_response_serializes_null_description() {
        let task = Task {
            id: 3,
            title: "Buy milk".to_string(),
            description: None,
            is_completed: false,
            user_id: Some(1),
        };

        let json = serde_json::to_value(TaskResponse::from(task)).unwrap();

        assert_eq!(json["description"], serde_json::Value::Null);
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn test_user_create_validation() {
        let valid = UserCreate {
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password: "secret".to_string(),
        };
        assert!(valid.validate().is_ok());

        let invalid = UserCreate {
            username: String::new(),
            email: "not-an-email".to_string(),
            password: "secret".to_string(),
        };
        let errors = invalid.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn test_task_create_description_optional() {
        let body: TaskCreate = serde_json::from_str(r#"{"title": "Write docs"}"#).unwrap();
        assert_eq!(body.description, None);
        assert!(body.validate().is_ok());
    }
}
