use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::{forgot_password, login_user, register_user, reset_password, verify_email};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/verify-email", post(verify_email))
        .route("/login", post(login_user))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
}
