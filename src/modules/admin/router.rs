use axum::{
    Router,
    routing::{get, patch, post, put},
};

use crate::state::AppState;

use super::controller::{
    delete_user, get_resource, get_stats, get_user, get_user_emails, list_resources, list_users,
    set_resource_status, set_user_role, update_user,
};

/// Admin console routes. Callers must layer [`require_admin`] on top.
///
/// [`require_admin`]: crate::middleware::role::require_admin
pub fn init_admin_router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/users", get(list_users))
        .route("/users/emails", post(get_user_emails))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users/{id}/role", put(set_user_role))
        .route("/resources", get(list_resources))
        .route("/resources/{id}", get(get_resource))
        .route("/resources/{id}/status", patch(set_resource_status))
}
