/// OpenAPI document
///
/// Paths and schemas are collected at compile time; title, description and
/// contact come from [`AppMetadata`] at startup.

use crate::config::AppMetadata;
use utoipa::openapi::info::ContactBuilder;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::root::welcome_message,
        crate::routes::health::health_check,
        crate::routes::users::create_user,
        crate::routes::users::read_user,
        crate::routes::users::update_user,
        crate::routes::users::delete_user,
        crate::routes::tasks::create_task,
        crate::routes::tasks::read_task,
        crate::routes::tasks::update_task,
        crate::routes::tasks::delete_task,
    ),
    components(schemas(
        crate::schemas::UserCreate,
        crate::schemas::UserResponse,
        crate::schemas::TaskCreate,
        crate::schemas::TaskResponse,
        crate::routes::root::WelcomeResponse,
        crate::routes::health::HealthResponse,
        crate::error::ErrorResponse,
        crate::error::ValidationErrorDetail,
    )),
    tags(
        (name = "root", description = "Start page."),
        (name = "users", description = "User registration and management."),
        (name = "tasks", description = "Task management."),
    )
)]
pub struct ApiDoc;

/// Builds the document with runtime metadata applied
pub fn document(meta: &AppMetadata) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();

    doc.info.title = meta.title.clone();
    doc.info.description = Some(meta.description.clone());
    // The derive fills contact from the crate authors; only configured values are published
    doc.info.contact = if meta.contact_name.is_some() || meta.contact_email.is_some() {
        Some(
            ContactBuilder::new()
                .name(meta.contact_name.clone())
                .email(meta.contact_email.clone())
                .build(),
        )
    } else {
        None
    };

    doc
}
