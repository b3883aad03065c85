use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_course, delete_course, enroll_in_course, get_course, get_course_filters,
    list_courses, update_course,
};

pub fn init_courses_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route("/filters", get(get_course_filters))
        .route(
            "/{id}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/{id}/enroll", post(enroll_in_course))
}
