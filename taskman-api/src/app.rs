/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use taskman_api::{app::AppState, config::Config};
/// use taskman_shared::store::memory::MemoryStore;
///
/// let state = AppState::new(MemoryStore::new().into(), Config::in_memory());
/// let app = taskman_api::app::build_router(state);
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer, openapi};
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use taskman_shared::store::{any::AnyStore, Store, StoreError};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Prefix for the entity routes
pub const API_PREFIX: &str = "/api/v1";

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Entity store; each request takes its own session from it
    pub store: AnyStore,

    /// Application configuration
    pub config: Arc<Config>,

    /// OpenAPI document with the configured metadata applied
    pub openapi: Arc<utoipa::openapi::OpenApi>,
}

impl AppState {
    /// Creates new application state
    pub fn new(store: AnyStore, config: Config) -> Self {
        let openapi = openapi::document(&config.app);

        Self {
            store,
            config: Arc::new(config),
            openapi: Arc::new(openapi),
        }
    }

    /// Opens the unit of work for one request
    ///
    /// The session is released when it is dropped, including on early returns.
    pub async fn session(&self) -> Result<<AnyStore as Store>::Session, StoreError> {
        self.store.session().await
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET  /                    # Welcome message
/// ├── GET  /health              # Store connectivity
/// ├── GET  /openapi.json        # API document
/// └── /api/v1/
///     ├── /users
///     │   ├── POST   /
///     │   ├── GET    /:id
///     │   ├── PUT    /:id
///     │   └── DELETE /:id
///     └── /tasks
///         ├── POST   /
///         ├── GET    /:id
///         ├── PUT    /:id
///         └── DELETE /:id
/// ```
///
/// Middleware, outermost first: security headers, CORS, request tracing.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let user_routes = Router::new()
        .route("/", axum::routing::post(routes::users::create_user))
        .route(
            "/:id",
            get(routes::users::read_user)
                .put(routes::users::update_user)
                .delete(routes::users::delete_user),
        );

    let task_routes = Router::new()
        .route("/", axum::routing::post(routes::tasks::create_task))
        .route(
            "/:id",
            get(routes::tasks::read_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        );

    let v1_routes = Router::new()
        .nest("/users", user_routes)
        .nest("/tasks", task_routes);

    let cors = build_cors(&state.config.api.cors_origins);
    let production = state.config.api.production;

    Router::new()
        .route("/", get(routes::root::welcome_message))
        .route("/health", get(routes::health::health_check))
        .route("/openapi.json", get(routes::root::openapi_json))
        .nest(API_PREFIX, v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(production))
        .with_state(state)
}

fn build_cors(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}
