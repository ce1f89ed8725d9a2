pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, MethodRouter},
    Router,
};
use tower_http::services::ServeDir;

use crate::applications::handlers as applications;
use crate::blogs::handlers as blogs;
use crate::config::MediaConfig;
use crate::errors::AppError;
use crate::images::handlers as images;
use crate::jobs::handlers as jobs;
use crate::state::AppState;

/// Room for multipart boundaries and text fields on top of the file itself.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

/// Answers unsupported methods with the JSON error body instead of an empty 405.
fn strict(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.fallback(method_not_allowed)
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state
        .config
        .max_upload_bytes
        .saturating_add(FORM_OVERHEAD_BYTES);

    let mut router = Router::new()
        .route("/", strict(get(health::root_handler)))
        .route("/health", strict(get(health::health_handler)))
        // Job Directory
        .route(
            "/api/jobs",
            strict(get(jobs::handle_list_jobs).post(jobs::handle_create_job)),
        )
        .route(
            "/api/jobs/:id",
            strict(
                get(jobs::handle_get_job)
                    .put(jobs::handle_update_job)
                    .delete(jobs::handle_delete_job),
            ),
        )
        // Application Intake
        .route(
            "/api/applications",
            strict(
                get(applications::handle_list_applications)
                    .post(applications::handle_submit_application),
            ),
        )
        .route(
            "/api/applications/:id",
            strict(delete(applications::handle_delete_application)),
        )
        // Blog Directory
        .route(
            "/api/blogs",
            strict(get(blogs::handle_list_blogs).post(blogs::handle_create_blog)),
        )
        .route(
            "/api/blogs/:id",
            strict(
                get(blogs::handle_get_blog)
                    .put(blogs::handle_update_blog)
                    .delete(blogs::handle_delete_blog),
            ),
        )
        // Generic Image Upload
        .route(
            "/api/images/upload",
            strict(post(images::handle_upload_image)),
        )
        .route(
            "/api/images/latest",
            strict(get(images::handle_latest_image)),
        );

    if let MediaConfig::Local { root, .. } = &state.config.media {
        router = router.nest_service("/uploads", ServeDir::new(root));
    }

    router
        .fallback(route_not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
