use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::rate_limit::limit;
use crate::middleware::role::require_admin;
use crate::modules::admin::init_admin_router;
use crate::modules::auth::init_auth_router;
use crate::modules::courses::init_courses_router;
use crate::modules::resources::init_resources_router;
use crate::modules::users::init_users_router;
use crate::state::AppState;

pub fn init_router(state: AppState) -> Router {
    let rate_limits = &state.rate_limit_config;

    let api = Router::new()
        .nest(
            "/auth",
            limit(init_auth_router(), "auth", rate_limits.auth_quota()),
        )
        .nest(
            "/user",
            init_users_router().nest("/courses", init_courses_router()),
        )
        .nest("/resources", init_resources_router())
        .nest(
            "/admin",
            init_admin_router()
                .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
        );

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest("/api", limit(api, "general", rate_limits.general_quota()))
        .with_state(state.clone())
        .layer(middleware::from_fn(metrics_middleware))
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}
