/// API route handlers
///
/// Organized by resource:
///
/// - `root`: welcome message and OpenAPI document
/// - `health`: store connectivity check
/// - `users`: user CRUD
/// - `tasks`: task CRUD

pub mod health;
pub mod root;
pub mod tasks;
pub mod users;
