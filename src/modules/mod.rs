pub mod admin;
pub mod auth;
pub mod courses;
pub mod resources;
pub mod users;
